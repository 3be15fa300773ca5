//! Type tables for reflection
//!
//! A `TypeInfo` lists every member a type exposes to the accessor, including
//! the non-public ones, together with type-erased closures that read, write
//! or call them. Tables are built once per type with [`TypeBuilder`] and
//! handed out as `&'static TypeInfo`.
//!
//! [`TypeBuilder`]: super::TypeBuilder

use std::any::{Any, TypeId};
use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::AccessResult;
use crate::value::{Args, ParamType, Value};

/// Member kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Stored field (instance or static)
    Field,
    /// Computed property with getter and/or setter
    Property,
    /// Callable method
    Method,
    /// Constructor
    Constructor,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberKind::Field => "Field",
            MemberKind::Property => "Property",
            MemberKind::Method => "Method",
            MemberKind::Constructor => "Constructor",
        })
    }
}

/// Whether a member belongs to the type or to an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Member of each instance
    Instance,
    /// Member of the type itself
    Static,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Instance => "instance",
            Scope::Static => "static",
        })
    }
}

/// Declared visibility of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Part of the type's public contract
    Public,
    /// Visible to the declaring type only
    Private,
    /// Non-public; embedding types reach it through the `*_of` accessors
    Protected,
    /// Visible inside the owning crate
    Internal,
}

impl Visibility {
    /// Check if the member is public
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

pub(crate) type InstanceGetter = Box<dyn Fn(&dyn Any) -> AccessResult<Value> + Send + Sync>;
pub(crate) type InstanceSetter = Box<dyn Fn(&mut dyn Any, Value) -> AccessResult<()> + Send + Sync>;
pub(crate) type StaticGetter = Box<dyn Fn() -> Value + Send + Sync>;
pub(crate) type StaticSetter = Box<dyn Fn(Value) -> AccessResult<()> + Send + Sync>;
pub(crate) type InstanceCall =
    Box<dyn Fn(&mut dyn Any, &mut Args) -> AccessResult<Option<Value>> + Send + Sync>;
pub(crate) type StaticCall = Box<dyn Fn(&mut Args) -> AccessResult<Option<Value>> + Send + Sync>;
pub(crate) type Projection = Box<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;
pub(crate) type ProjectionMut =
    Box<dyn for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync>;

/// How a member is reached once resolved
pub(crate) enum MemberAccess {
    Field {
        get: InstanceGetter,
        set: InstanceSetter,
    },
    StaticField {
        get: StaticGetter,
        set: Option<StaticSetter>,
    },
    Property {
        get: Option<InstanceGetter>,
        set: Option<InstanceSetter>,
    },
    Method {
        arity: usize,
        call: InstanceCall,
    },
    StaticMethod {
        arity: usize,
        call: StaticCall,
    },
    Constructor {
        params: Vec<ParamType>,
        call: StaticCall,
    },
}

/// A single registered member
pub struct MemberInfo {
    name: &'static str,
    kind: MemberKind,
    scope: Scope,
    visibility: Visibility,
    pub(crate) access: MemberAccess,
}

impl MemberInfo {
    pub(crate) fn new(
        name: &'static str,
        kind: MemberKind,
        scope: Scope,
        visibility: Visibility,
        access: MemberAccess,
    ) -> Self {
        Self {
            name,
            kind,
            scope,
            visibility,
            access,
        }
    }

    /// Member name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Member kind
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Member scope
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Declared visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether the member can be written (fields, static fields, properties)
    pub fn is_writable(&self) -> bool {
        match &self.access {
            MemberAccess::Field { .. } => true,
            MemberAccess::StaticField { set, .. } => set.is_some(),
            MemberAccess::Property { set, .. } => set.is_some(),
            _ => false,
        }
    }

    /// Whether the member can be read (fields, static fields, properties)
    pub fn is_readable(&self) -> bool {
        match &self.access {
            MemberAccess::Field { .. } | MemberAccess::StaticField { .. } => true,
            MemberAccess::Property { get, .. } => get.is_some(),
            _ => false,
        }
    }

    /// Declared argument count (methods) or parameter count (constructors)
    pub fn arity(&self) -> Option<usize> {
        match &self.access {
            MemberAccess::Method { arity, .. } | MemberAccess::StaticMethod { arity, .. } => {
                Some(*arity)
            }
            MemberAccess::Constructor { params, .. } => Some(params.len()),
            _ => None,
        }
    }

    /// Constructor parameter types
    pub fn parameters(&self) -> Option<&[ParamType]> {
        match &self.access {
            MemberAccess::Constructor { params, .. } => Some(params),
            _ => None,
        }
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("scope", &self.scope)
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// Link from a type to an embedded base part
pub(crate) struct BaseLink {
    pub(crate) info: fn() -> &'static TypeInfo,
    pub(crate) project: Projection,
    pub(crate) project_mut: ProjectionMut,
}

/// Reflection table for one type
pub struct TypeInfo {
    name: &'static str,
    path: &'static str,
    type_id: TypeId,
    members: Vec<MemberInfo>,
    /// Member name to positions in `members`, in declaration order
    member_indices: FxHashMap<&'static str, Vec<usize>>,
    bases: Vec<BaseLink>,
}

impl TypeInfo {
    pub(crate) fn new(
        name: &'static str,
        path: &'static str,
        type_id: TypeId,
        members: Vec<MemberInfo>,
        bases: Vec<BaseLink>,
    ) -> Self {
        let mut member_indices: FxHashMap<&'static str, Vec<usize>> = FxHashMap::default();
        for (index, member) in members.iter().enumerate() {
            member_indices.entry(member.name).or_default().push(index);
        }
        Self {
            name,
            path,
            type_id,
            members,
            member_indices,
            bases,
        }
    }

    /// Short type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full type path as reported by `std::any::type_name`
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// `TypeId` of the described type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// All members in declaration order
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    /// Members registered under `name`, in declaration order
    pub fn members_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a MemberInfo> + 'a {
        self.member_indices
            .get(name)
            .map(|indices| indices.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.members[i])
    }

    /// Check if any member is registered under `name`
    pub fn has_member(&self, name: &str) -> bool {
        self.member_indices.contains_key(name)
    }

    /// Tables of the embedded base parts, nearest first
    pub fn base_types(&self) -> Vec<&'static TypeInfo> {
        self.bases.iter().map(|b| (b.info)()).collect()
    }

    /// Check if `other` is this type or one of its (transitive) bases
    pub fn is_subtype_of(&self, other: &TypeInfo) -> bool {
        if self.type_id == other.type_id {
            return true;
        }
        self.bases
            .iter()
            .any(|base| (base.info)().is_subtype_of(other))
    }

    /// Narrow `target` (an instance of this type) to its `declaring` part
    pub(crate) fn project<'a>(&self, target: &'a dyn Any, declaring: &TypeInfo) -> Option<&'a dyn Any> {
        if self.type_id == declaring.type_id {
            return Some(target);
        }
        for base in &self.bases {
            let info = (base.info)();
            if !info.is_subtype_of(declaring) {
                continue;
            }
            let part = (base.project)(target)?;
            return info.project(part, declaring);
        }
        None
    }

    /// Mutable counterpart of [`TypeInfo::project`]
    pub(crate) fn project_mut<'a>(
        &self,
        target: &'a mut dyn Any,
        declaring: &TypeInfo,
    ) -> Option<&'a mut dyn Any> {
        if self.type_id == declaring.type_id {
            return Some(target);
        }
        for base in &self.bases {
            let info = (base.info)();
            if !info.is_subtype_of(declaring) {
                continue;
            }
            let part = (base.project_mut)(target)?;
            return info.project_mut(part, declaring);
        }
        None
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("members", &self.members)
            .field("bases", &self.base_types().iter().map(|b| b.name).collect::<Vec<_>>())
            .finish()
    }
}

/// Types that publish an accessor table
///
/// Implementations usually keep the table in a `once_cell::sync::Lazy`:
///
/// ```ignore
/// impl Typed for Counter {
///     fn type_info() -> &'static TypeInfo {
///         static INFO: Lazy<TypeInfo> = Lazy::new(|| {
///             TypeBuilder::<Counter>::new("Counter")
///                 .field("_count", Visibility::Private, |c| &c.count, |c| &mut c.count)
///                 .build()
///         });
///         &INFO
///     }
/// }
/// ```
pub trait Typed: Any + Sized {
    /// The accessor table for `Self`
    fn type_info() -> &'static TypeInfo;
}

/// Object-safe view of a [`Typed`] instance
pub trait Reflect: Any {
    /// Runtime accessor table of this instance
    fn reflect_type(&self) -> &'static TypeInfo;

    /// Upcast to `Any`
    fn as_any(&self) -> &dyn Any;

    /// Upcast to mutable `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Typed> Reflect for T {
    fn reflect_type(&self) -> &'static TypeInfo {
        T::type_info()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_is_public() {
        assert!(Visibility::Public.is_public());
        assert!(!Visibility::Private.is_public());
        assert!(!Visibility::Protected.is_public());
        assert!(!Visibility::Internal.is_public());
    }

    #[test]
    fn test_member_indices_keep_declaration_order() {
        let members = vec![
            MemberInfo::new(
                "run",
                MemberKind::Method,
                Scope::Instance,
                Visibility::Private,
                MemberAccess::Method {
                    arity: 0,
                    call: Box::new(|_: &mut dyn Any, _: &mut Args| Ok(None)),
                },
            ),
            MemberInfo::new(
                "run",
                MemberKind::Method,
                Scope::Instance,
                Visibility::Private,
                MemberAccess::Method {
                    arity: 1,
                    call: Box::new(|_: &mut dyn Any, _: &mut Args| Ok(None)),
                },
            ),
        ];
        let info = TypeInfo::new("Job", "tests::Job", TypeId::of::<u8>(), members, Vec::new());

        let arities: Vec<_> = info.members_named("run").map(|m| m.arity()).collect();
        assert_eq!(arities, vec![Some(0), Some(1)]);
        assert!(info.has_member("run"));
        assert!(!info.has_member("Run"));
        assert_eq!(info.members_named("missing").count(), 0);
    }
}
