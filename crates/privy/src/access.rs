//! Member access operations
//!
//! Every operation follows the same path: guard the caller's input, resolve
//! one member through a [`MemberDescriptor`], check the permission policy,
//! then read, write or call the member. Nothing is cached between calls and
//! nothing is retried.
//!
//! | Operation              | Lookup                                  | Miss                |
//! |------------------------|-----------------------------------------|---------------------|
//! | `get_constant`         | static fields, any visibility           | `MemberNotFound`    |
//! | `get_field`/`set_field`| instance fields, non-public             | `MemberNotFound`    |
//! | `get_property`         | instance properties, any visibility     | `MemberNotFound`    |
//! | `set_property`         | instance properties, any visibility     | `AssignmentFailed`  |
//! | `get_static_field`     | static fields, non-public               | `MemberNotFound`    |
//! | `set_static_field`     | static fields, non-public               | `AssignmentFailed`  |
//! | `invoke_*`             | methods of matching scope, non-public   | `UnsupportedMember` |
//! | `construct`            | constructors by exact parameter types   | `Ok(None)`          |
//!
//! The `*_of` variants resolve on a declaring type instead of the instance's
//! own type and narrow the instance to that embedded part first. The policy
//! must allow the access on both the declaring type and the instance's type.
//!
//! The free functions in this module use a permissive [`Accessor`].

use std::any::Any;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{AccessError, AccessResult};
use crate::guard;
use crate::reflect::{
    AccessPermission, AccessPolicy, MemberAccess, MemberDescriptor, MemberInfo, MemberKind,
    Reflect, TypeInfo, Typed,
};
use crate::value::{Args, ParamType, Value};

/// Performs member access under a permission policy
#[derive(Debug, Clone, Default)]
pub struct Accessor {
    policy: AccessPolicy,
}

fn member_not_found(info: &TypeInfo, kind: MemberKind, name: &str) -> AccessError {
    debug!(type_name = info.name(), member = name, kind = %kind, "member not found");
    AccessError::MemberNotFound {
        kind,
        name: name.to_string(),
        type_name: info.name(),
    }
}

fn unsupported_member(info: &TypeInfo, name: &str) -> AccessError {
    debug!(type_name = info.name(), member = name, "no such method");
    AccessError::UnsupportedMember {
        name: name.to_string(),
        type_name: info.name(),
    }
}

fn check_arity(member: &str, expected: usize, actual: usize) -> AccessResult<()> {
    guard::against(expected != actual, || AccessError::ArgumentCount {
        member: member.to_string(),
        expected,
        actual,
    })
}

fn report_thrown(info: &TypeInfo, member: &str, err: AccessError) -> AccessError {
    if let AccessError::Thrown(inner) = &err {
        debug!(type_name = info.name(), member, error = %inner, "member raised an error");
    }
    err
}

fn assignment_failed(kind: MemberKind, name: &str, value: String, err: AccessError) -> AccessError {
    match err {
        AccessError::InvalidArgument { .. } | AccessError::PermissionDenied { .. } => err,
        other => AccessError::AssignmentFailed {
            kind,
            name: name.to_string(),
            value,
            source: Box::new(other),
        },
    }
}

fn part<'a>(instance: &'a dyn Reflect, declaring: &TypeInfo) -> AccessResult<&'a dyn Any> {
    let actual = instance.reflect_type();
    actual
        .project(instance.as_any(), declaring)
        .ok_or(AccessError::TargetMismatch {
            expected: declaring.name(),
            actual: actual.name(),
        })
}

fn part_mut<'a>(instance: &'a mut dyn Reflect, declaring: &TypeInfo) -> AccessResult<&'a mut dyn Any> {
    let actual = instance.reflect_type();
    actual
        .project_mut(instance.as_any_mut(), declaring)
        .ok_or(AccessError::TargetMismatch {
            expected: declaring.name(),
            actual: actual.name(),
        })
}

impl Accessor {
    /// Create an accessor that allows everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accessor bound to a permission policy
    pub fn with_policy(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    /// The permission policy in effect
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    fn check(&self, info: &TypeInfo, member: &MemberInfo, required: AccessPermission) -> AccessResult<()> {
        if !self.policy.has_any_restrictions() || self.policy.allows(info, required) {
            return Ok(());
        }
        debug!(
            type_name = info.name(),
            member = member.name(),
            required = %required,
            "reflection access denied"
        );
        Err(AccessError::PermissionDenied {
            required,
            kind: member.kind(),
            name: member.name().to_string(),
            type_name: info.name(),
        })
    }

    /// Check `declaring` and, when the member sits on an embedded part, the
    /// instance's own type as well
    fn check_part(
        &self,
        instance: &dyn Reflect,
        declaring: &TypeInfo,
        member: &MemberInfo,
        required: AccessPermission,
    ) -> AccessResult<()> {
        self.check(declaring, member, required)?;
        let actual = instance.reflect_type();
        if actual.type_id() != declaring.type_id() {
            self.check(actual, member, required)?;
        }
        Ok(())
    }

    // ===== Constants =====

    /// Read a constant or any other static field, public or not
    pub fn get_constant(&self, ty: &TypeInfo, name: &str) -> AccessResult<Value> {
        guard::against_blank(name, "constant_name")?;
        let member = ty
            .resolve(&MemberDescriptor::constant(name))
            .ok_or_else(|| member_not_found(ty, MemberKind::Field, name))?;
        self.read_static(ty, member)
    }

    // ===== Instance Fields =====

    /// Read a non-public instance field
    pub fn get_field(&self, instance: &dyn Reflect, name: &str) -> AccessResult<Value> {
        self.get_field_of(instance, instance.reflect_type(), name)
    }

    /// Read a non-public field declared on `declaring`, which may be a base
    /// part embedded in the instance
    pub fn get_field_of(&self, instance: &dyn Reflect, declaring: &TypeInfo, name: &str) -> AccessResult<Value> {
        guard::against_blank(name, "field_name")?;
        let member = declaring
            .resolve(&MemberDescriptor::field(name))
            .ok_or_else(|| member_not_found(declaring, MemberKind::Field, name))?;
        self.check_part(instance, declaring, member, AccessPermission::read(member.visibility()))?;

        let target = part(instance, declaring)?;
        match &member.access {
            MemberAccess::Field { get, .. } => get(target),
            _ => Err(member_not_found(declaring, MemberKind::Field, name)),
        }
    }

    /// Write a non-public instance field
    pub fn set_field(&self, instance: &mut dyn Reflect, name: &str, value: impl Into<Value>) -> AccessResult<()> {
        let declaring = instance.reflect_type();
        self.set_field_of(instance, declaring, name, value)
    }

    /// Write a non-public field declared on `declaring`
    pub fn set_field_of(
        &self,
        instance: &mut dyn Reflect,
        declaring: &TypeInfo,
        name: &str,
        value: impl Into<Value>,
    ) -> AccessResult<()> {
        guard::against_blank(name, "field_name")?;
        let member = declaring
            .resolve(&MemberDescriptor::field(name))
            .ok_or_else(|| member_not_found(declaring, MemberKind::Field, name))?;
        self.check_part(instance, declaring, member, AccessPermission::write(member.visibility()))?;

        let target = part_mut(instance, declaring)?;
        match &member.access {
            MemberAccess::Field { set, .. } => set(target, value.into()),
            _ => Err(member_not_found(declaring, MemberKind::Field, name)),
        }
    }

    // ===== Properties =====

    /// Read an instance property of any visibility
    pub fn get_property(&self, instance: &dyn Reflect, name: &str) -> AccessResult<Value> {
        self.get_property_of(instance, instance.reflect_type(), name)
    }

    /// Read a property declared on `declaring`, which may be a base part
    /// embedded in the instance
    pub fn get_property_of(&self, instance: &dyn Reflect, declaring: &TypeInfo, name: &str) -> AccessResult<Value> {
        guard::against_blank(name, "property_name")?;
        let member = declaring
            .resolve(&MemberDescriptor::property(name))
            .ok_or_else(|| member_not_found(declaring, MemberKind::Property, name))?;
        self.check_part(instance, declaring, member, AccessPermission::read(member.visibility()))?;

        let target = part(instance, declaring)?;
        match &member.access {
            MemberAccess::Property { get: Some(get), .. } => {
                get(target).map_err(|err| report_thrown(declaring, name, err))
            }
            _ => Err(AccessError::WriteOnly {
                kind: MemberKind::Property,
                name: name.to_string(),
                type_name: declaring.name(),
            }),
        }
    }

    /// Write an instance property of any visibility
    ///
    /// Failures past the input guard are wrapped in `AssignmentFailed`, which
    /// names the property and the attempted value.
    pub fn set_property(&self, instance: &mut dyn Reflect, name: &str, value: impl Into<Value>) -> AccessResult<()> {
        let declaring = instance.reflect_type();
        self.set_property_of(instance, declaring, name, value)
    }

    /// Write a property declared on `declaring`, wrapping failures like
    /// [`Accessor::set_property`]
    pub fn set_property_of(
        &self,
        instance: &mut dyn Reflect,
        declaring: &TypeInfo,
        name: &str,
        value: impl Into<Value>,
    ) -> AccessResult<()> {
        guard::against_blank(name, "property_name")?;
        let value = value.into();
        let shown = format!("{:?}", value);
        self.assign_property(instance, declaring, name, value)
            .map_err(|err| assignment_failed(MemberKind::Property, name, shown, err))
    }

    fn assign_property(
        &self,
        instance: &mut dyn Reflect,
        declaring: &TypeInfo,
        name: &str,
        value: Value,
    ) -> AccessResult<()> {
        let member = declaring
            .resolve(&MemberDescriptor::property(name))
            .ok_or_else(|| member_not_found(declaring, MemberKind::Property, name))?;
        self.check_part(instance, declaring, member, AccessPermission::write(member.visibility()))?;

        let MemberAccess::Property { set: Some(set), .. } = &member.access else {
            return Err(AccessError::ReadOnly {
                kind: MemberKind::Property,
                name: name.to_string(),
                type_name: declaring.name(),
            });
        };
        let target = part_mut(instance, declaring)?;
        set(target, value).map_err(|err| report_thrown(declaring, name, err))
    }

    // ===== Static Fields =====

    /// Read a non-public static field
    pub fn get_static_field(&self, ty: &TypeInfo, name: &str) -> AccessResult<Value> {
        guard::against_blank(name, "field_name")?;
        let member = ty
            .resolve(&MemberDescriptor::static_field(name))
            .ok_or_else(|| member_not_found(ty, MemberKind::Field, name))?;
        self.read_static(ty, member)
    }

    fn read_static(&self, ty: &TypeInfo, member: &MemberInfo) -> AccessResult<Value> {
        self.check(ty, member, AccessPermission::read(member.visibility()))?;
        match &member.access {
            MemberAccess::StaticField { get, .. } => Ok(get()),
            _ => Err(member_not_found(ty, MemberKind::Field, member.name())),
        }
    }

    /// Write a non-public static field
    ///
    /// Failures past the input guard are wrapped in `AssignmentFailed`.
    pub fn set_static_field(&self, ty: &TypeInfo, name: &str, value: impl Into<Value>) -> AccessResult<()> {
        guard::against_blank(name, "field_name")?;
        let value = value.into();
        let shown = format!("{:?}", value);
        self.assign_static(ty, name, value)
            .map_err(|err| assignment_failed(MemberKind::Field, name, shown, err))
    }

    fn assign_static(&self, ty: &TypeInfo, name: &str, value: Value) -> AccessResult<()> {
        let member = ty
            .resolve(&MemberDescriptor::static_field(name))
            .ok_or_else(|| member_not_found(ty, MemberKind::Field, name))?;
        self.check(ty, member, AccessPermission::write(member.visibility()))?;

        match &member.access {
            MemberAccess::StaticField { set: Some(set), .. } => set(value),
            _ => Err(AccessError::ReadOnly {
                kind: MemberKind::Field,
                name: name.to_string(),
                type_name: ty.name(),
            }),
        }
    }

    // ===== Methods =====

    /// Call a non-public instance method, discarding any result
    pub fn invoke_method(&self, instance: &mut dyn Reflect, name: &str, args: Vec<Value>) -> AccessResult<()> {
        let declaring = instance.reflect_type();
        self.call_instance(instance, declaring, name, args).map(|_| ())
    }

    /// Call a non-public method declared on `declaring`, discarding any result
    pub fn invoke_method_of(
        &self,
        instance: &mut dyn Reflect,
        declaring: &TypeInfo,
        name: &str,
        args: Vec<Value>,
    ) -> AccessResult<()> {
        self.call_instance(instance, declaring, name, args).map(|_| ())
    }

    /// Call a non-public instance method and take its result as `R`
    pub fn invoke_function<R: Any>(&self, instance: &mut dyn Reflect, name: &str, args: Vec<Value>) -> AccessResult<R> {
        let declaring = instance.reflect_type();
        self.invoke_function_of(instance, declaring, name, args)
    }

    /// Call a non-public method declared on `declaring` and take its result as `R`
    pub fn invoke_function_of<R: Any>(
        &self,
        instance: &mut dyn Reflect,
        declaring: &TypeInfo,
        name: &str,
        args: Vec<Value>,
    ) -> AccessResult<R> {
        self.call_instance(instance, declaring, name, args)?
            .unwrap_or_else(Value::unit)
            .cast::<R>(name)
    }

    fn call_instance(
        &self,
        instance: &mut dyn Reflect,
        declaring: &TypeInfo,
        name: &str,
        args: Vec<Value>,
    ) -> AccessResult<Option<Value>> {
        guard::against_blank(name, "method_name")?;
        let member = declaring
            .resolve(&MemberDescriptor::method(name))
            .ok_or_else(|| unsupported_member(declaring, name))?;
        self.check_part(instance, declaring, member, AccessPermission::invoke(member.visibility()))?;

        let MemberAccess::Method { arity, call } = &member.access else {
            return Err(unsupported_member(declaring, name));
        };
        check_arity(member.name(), *arity, args.len())?;
        let target = part_mut(instance, declaring)?;
        let mut args = Args::new(member.name(), args);
        call(target, &mut args).map_err(|err| report_thrown(declaring, name, err))
    }

    /// Call a non-public static method, discarding any result
    pub fn invoke_static_method(&self, ty: &TypeInfo, name: &str, args: Vec<Value>) -> AccessResult<()> {
        self.call_static(ty, name, args).map(|_| ())
    }

    /// Call a non-public static method and take its result as `R`
    pub fn invoke_static_function<R: Any>(&self, ty: &TypeInfo, name: &str, args: Vec<Value>) -> AccessResult<R> {
        self.call_static(ty, name, args)?
            .unwrap_or_else(Value::unit)
            .cast::<R>(name)
    }

    fn call_static(&self, ty: &TypeInfo, name: &str, args: Vec<Value>) -> AccessResult<Option<Value>> {
        guard::against_blank(name, "method_name")?;
        let member = ty
            .resolve(&MemberDescriptor::static_method(name))
            .ok_or_else(|| unsupported_member(ty, name))?;
        self.check(ty, member, AccessPermission::invoke(member.visibility()))?;

        let MemberAccess::StaticMethod { arity, call } = &member.access else {
            return Err(unsupported_member(ty, name));
        };
        check_arity(member.name(), *arity, args.len())?;
        let mut args = Args::new(member.name(), args);
        call(&mut args).map_err(|err| report_thrown(ty, name, err))
    }

    // ===== Constructors =====

    /// Run the constructor of `T` whose parameter types equal `arg_types`
    ///
    /// Returns `Ok(None)` when no constructor has that exact signature.
    pub fn construct<T: Typed>(&self, arg_types: &[ParamType], args: Vec<Value>) -> AccessResult<Option<T>> {
        guard::against(arg_types.len() != args.len(), || AccessError::InvalidArgument {
            param: "args",
            reason: format!(
                "{} argument type(s) given for {} value(s)",
                arg_types.len(),
                args.len()
            ),
        })?;

        let info = T::type_info();
        let found = info.constructors().find_map(|member| match &member.access {
            MemberAccess::Constructor { params, call }
                if params.iter().map(ParamType::id).eq(arg_types.iter().map(ParamType::id)) =>
            {
                Some((member, call))
            }
            _ => None,
        });
        let Some((member, call)) = found else {
            debug!(
                type_name = info.name(),
                signature = ?arg_types.iter().map(ParamType::name).collect::<Vec<_>>(),
                "no constructor matches"
            );
            return Ok(None);
        };
        self.check(info, member, AccessPermission::construct(member.visibility()))?;

        let mut args = Args::new(info.name(), args);
        match call(&mut args).map_err(|err| report_thrown(info, member.name(), err))? {
            Some(value) => value.cast::<T>(info.name()).map(Some),
            None => Ok(None),
        }
    }
}

static PERMISSIVE: Lazy<Accessor> = Lazy::new(Accessor::new);

/// Read a constant or other static field on `ty`
pub fn get_constant(ty: &TypeInfo, name: &str) -> AccessResult<Value> {
    PERMISSIVE.get_constant(ty, name)
}

/// Read a non-public instance field
pub fn get_field(instance: &dyn Reflect, name: &str) -> AccessResult<Value> {
    PERMISSIVE.get_field(instance, name)
}

/// Read a non-public field declared on a base part of the instance
pub fn get_field_of(instance: &dyn Reflect, declaring: &TypeInfo, name: &str) -> AccessResult<Value> {
    PERMISSIVE.get_field_of(instance, declaring, name)
}

/// Write a non-public instance field
pub fn set_field(instance: &mut dyn Reflect, name: &str, value: impl Into<Value>) -> AccessResult<()> {
    PERMISSIVE.set_field(instance, name, value)
}

/// Write a non-public field declared on a base part of the instance
pub fn set_field_of(
    instance: &mut dyn Reflect,
    declaring: &TypeInfo,
    name: &str,
    value: impl Into<Value>,
) -> AccessResult<()> {
    PERMISSIVE.set_field_of(instance, declaring, name, value)
}

/// Read an instance property of any visibility
pub fn get_property(instance: &dyn Reflect, name: &str) -> AccessResult<Value> {
    PERMISSIVE.get_property(instance, name)
}

/// Read a property declared on a base part of the instance
pub fn get_property_of(instance: &dyn Reflect, declaring: &TypeInfo, name: &str) -> AccessResult<Value> {
    PERMISSIVE.get_property_of(instance, declaring, name)
}

/// Write an instance property of any visibility
pub fn set_property(instance: &mut dyn Reflect, name: &str, value: impl Into<Value>) -> AccessResult<()> {
    PERMISSIVE.set_property(instance, name, value)
}

/// Write a property declared on a base part of the instance
pub fn set_property_of(
    instance: &mut dyn Reflect,
    declaring: &TypeInfo,
    name: &str,
    value: impl Into<Value>,
) -> AccessResult<()> {
    PERMISSIVE.set_property_of(instance, declaring, name, value)
}

/// Read a non-public static field
pub fn get_static_field(ty: &TypeInfo, name: &str) -> AccessResult<Value> {
    PERMISSIVE.get_static_field(ty, name)
}

/// Write a non-public static field
pub fn set_static_field(ty: &TypeInfo, name: &str, value: impl Into<Value>) -> AccessResult<()> {
    PERMISSIVE.set_static_field(ty, name, value)
}

/// Call a non-public instance method
pub fn invoke_method(instance: &mut dyn Reflect, name: &str, args: Vec<Value>) -> AccessResult<()> {
    PERMISSIVE.invoke_method(instance, name, args)
}

/// Call a non-public method declared on a base part of the instance
pub fn invoke_method_of(
    instance: &mut dyn Reflect,
    declaring: &TypeInfo,
    name: &str,
    args: Vec<Value>,
) -> AccessResult<()> {
    PERMISSIVE.invoke_method_of(instance, declaring, name, args)
}

/// Call a non-public instance method returning `R`
pub fn invoke_function<R: Any>(instance: &mut dyn Reflect, name: &str, args: Vec<Value>) -> AccessResult<R> {
    PERMISSIVE.invoke_function(instance, name, args)
}

/// Call a non-public method declared on a base part of the instance, returning `R`
pub fn invoke_function_of<R: Any>(
    instance: &mut dyn Reflect,
    declaring: &TypeInfo,
    name: &str,
    args: Vec<Value>,
) -> AccessResult<R> {
    PERMISSIVE.invoke_function_of(instance, declaring, name, args)
}

/// Call a non-public static method
pub fn invoke_static_method(ty: &TypeInfo, name: &str, args: Vec<Value>) -> AccessResult<()> {
    PERMISSIVE.invoke_static_method(ty, name, args)
}

/// Call a non-public static method returning `R`
pub fn invoke_static_function<R: Any>(ty: &TypeInfo, name: &str, args: Vec<Value>) -> AccessResult<R> {
    PERMISSIVE.invoke_static_function(ty, name, args)
}

/// Construct `T` through the constructor matching `arg_types` exactly
pub fn construct<T: Typed>(arg_types: &[ParamType], args: Vec<Value>) -> AccessResult<Option<T>> {
    PERMISSIVE.construct(arg_types, args)
}
