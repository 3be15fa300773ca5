//! Typed construction of accessor tables
//!
//! `TypeBuilder<T>` takes closures written against the concrete type and
//! erases them into the `dyn Any` shapes the resolver works with. Each
//! registration appends to the member list; registering a name twice keeps
//! both entries and resolution sees the earlier one first.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use crate::error::{AccessError, AccessResult};
use crate::value::{Args, ParamType, Value};

use super::type_info::{
    BaseLink, MemberAccess, MemberInfo, MemberKind, Projection, ProjectionMut, Scope, TypeInfo,
    Typed, Visibility,
};

/// Builder for a [`TypeInfo`] describing `T`
pub struct TypeBuilder<T> {
    name: &'static str,
    members: Vec<MemberInfo>,
    bases: Vec<BaseLink>,
    _marker: PhantomData<fn() -> T>,
}

fn target_mismatch<T>(actual: &'static str) -> AccessError {
    AccessError::TargetMismatch {
        expected: std::any::type_name::<T>(),
        actual,
    }
}

fn downcast_target<T: Any>(target: &dyn Any) -> AccessResult<&T> {
    target
        .downcast_ref::<T>()
        .ok_or_else(|| target_mismatch::<T>("<unknown>"))
}

fn downcast_target_mut<T: Any>(target: &mut dyn Any) -> AccessResult<&mut T> {
    target
        .downcast_mut::<T>()
        .ok_or_else(|| target_mismatch::<T>("<unknown>"))
}

fn projection<P>(project: P) -> Projection
where
    P: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Box::new(project)
}

fn projection_mut<P>(project: P) -> ProjectionMut
where
    P: for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync + 'static,
{
    Box::new(project)
}

impl<T: Any> TypeBuilder<T> {
    /// Start a table for `T` under a short display name
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            members: Vec::new(),
            bases: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn push(
        mut self,
        name: &'static str,
        kind: MemberKind,
        scope: Scope,
        visibility: Visibility,
        access: MemberAccess,
    ) -> Self {
        self.members
            .push(MemberInfo::new(name, kind, scope, visibility, access));
        self
    }

    /// Register a stored instance field
    pub fn field<F, G, S>(self, name: &'static str, visibility: Visibility, get: G, get_mut: S) -> Self
    where
        F: Any + Clone + Send + fmt::Debug,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        S: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        let access = MemberAccess::Field {
            get: Box::new(move |target: &dyn Any| {
                let this = downcast_target::<T>(target)?;
                Ok(Value::new(get(this).clone()))
            }),
            set: Box::new(move |target: &mut dyn Any, value: Value| {
                let this = downcast_target_mut::<T>(target)?;
                *get_mut(this) = value.cast::<F>(name)?;
                Ok(())
            }),
        };
        self.push(name, MemberKind::Field, Scope::Instance, visibility, access)
    }

    /// Register a static field backed by caller-owned storage
    pub fn static_field<F, G, S>(self, name: &'static str, visibility: Visibility, get: G, set: S) -> Self
    where
        F: Any + Send + fmt::Debug,
        G: Fn() -> F + Send + Sync + 'static,
        S: Fn(F) + Send + Sync + 'static,
    {
        let access = MemberAccess::StaticField {
            get: Box::new(move || Value::new(get())),
            set: Some(Box::new(move |value: Value| {
                set(value.cast::<F>(name)?);
                Ok(())
            })),
        };
        self.push(name, MemberKind::Field, Scope::Static, visibility, access)
    }

    /// Register a constant: a static field with no setter
    pub fn constant<F>(self, name: &'static str, visibility: Visibility, value: F) -> Self
    where
        F: Any + Clone + Send + Sync + fmt::Debug,
    {
        let access = MemberAccess::StaticField {
            get: Box::new(move || Value::new(value.clone())),
            set: None,
        };
        self.push(name, MemberKind::Field, Scope::Static, visibility, access)
    }

    /// Register a get-only property
    pub fn property<V, G>(self, name: &'static str, visibility: Visibility, get: G) -> Self
    where
        V: Any + Send + fmt::Debug,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        let access = MemberAccess::Property {
            get: Some(Box::new(move |target: &dyn Any| {
                Ok(Value::new(get(downcast_target::<T>(target)?)))
            })),
            set: None,
        };
        self.push(name, MemberKind::Property, Scope::Instance, visibility, access)
    }

    /// Register a property with a getter and a fallible setter
    pub fn property_rw<V, G, S>(self, name: &'static str, visibility: Visibility, get: G, set: S) -> Self
    where
        V: Any + Send + fmt::Debug,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) -> AccessResult<()> + Send + Sync + 'static,
    {
        let access = MemberAccess::Property {
            get: Some(Box::new(move |target: &dyn Any| {
                Ok(Value::new(get(downcast_target::<T>(target)?)))
            })),
            set: Some(Box::new(move |target: &mut dyn Any, value: Value| {
                let value = value.cast::<V>(name)?;
                set(downcast_target_mut::<T>(target)?, value)
            })),
        };
        self.push(name, MemberKind::Property, Scope::Instance, visibility, access)
    }

    /// Register a set-only property
    pub fn property_set_only<V, S>(self, name: &'static str, visibility: Visibility, set: S) -> Self
    where
        V: Any + Send + fmt::Debug,
        S: Fn(&mut T, V) -> AccessResult<()> + Send + Sync + 'static,
    {
        let access = MemberAccess::Property {
            get: None,
            set: Some(Box::new(move |target: &mut dyn Any, value: Value| {
                let value = value.cast::<V>(name)?;
                set(downcast_target_mut::<T>(target)?, value)
            })),
        };
        self.push(name, MemberKind::Property, Scope::Instance, visibility, access)
    }

    /// Register an instance method with no result
    pub fn method<M>(self, name: &'static str, visibility: Visibility, arity: usize, body: M) -> Self
    where
        M: Fn(&mut T, &mut Args) -> AccessResult<()> + Send + Sync + 'static,
    {
        let access = MemberAccess::Method {
            arity,
            call: Box::new(move |target: &mut dyn Any, args: &mut Args| {
                body(downcast_target_mut::<T>(target)?, args)?;
                Ok(None)
            }),
        };
        self.push(name, MemberKind::Method, Scope::Instance, visibility, access)
    }

    /// Register an instance method returning `R`
    pub fn function<R, M>(self, name: &'static str, visibility: Visibility, arity: usize, body: M) -> Self
    where
        R: Any + Send + fmt::Debug,
        M: Fn(&mut T, &mut Args) -> AccessResult<R> + Send + Sync + 'static,
    {
        let access = MemberAccess::Method {
            arity,
            call: Box::new(move |target: &mut dyn Any, args: &mut Args| {
                let result = body(downcast_target_mut::<T>(target)?, args)?;
                Ok(Some(Value::new(result)))
            }),
        };
        self.push(name, MemberKind::Method, Scope::Instance, visibility, access)
    }

    /// Register a static method with no result
    pub fn static_method<M>(self, name: &'static str, visibility: Visibility, arity: usize, body: M) -> Self
    where
        M: Fn(&mut Args) -> AccessResult<()> + Send + Sync + 'static,
    {
        let access = MemberAccess::StaticMethod {
            arity,
            call: Box::new(move |args: &mut Args| {
                body(args)?;
                Ok(None)
            }),
        };
        self.push(name, MemberKind::Method, Scope::Static, visibility, access)
    }

    /// Register a static method returning `R`
    pub fn static_function<R, M>(
        self,
        name: &'static str,
        visibility: Visibility,
        arity: usize,
        body: M,
    ) -> Self
    where
        R: Any + Send + fmt::Debug,
        M: Fn(&mut Args) -> AccessResult<R> + Send + Sync + 'static,
    {
        let access = MemberAccess::StaticMethod {
            arity,
            call: Box::new(move |args: &mut Args| Ok(Some(Value::new(body(args)?)))),
        };
        self.push(name, MemberKind::Method, Scope::Static, visibility, access)
    }

    /// Register a constructor taking the given parameter types
    pub fn constructor<C>(self, visibility: Visibility, params: Vec<ParamType>, body: C) -> Self
    where
        T: Send + fmt::Debug,
        C: Fn(&mut Args) -> AccessResult<T> + Send + Sync + 'static,
    {
        let access = MemberAccess::Constructor {
            params,
            call: Box::new(move |args: &mut Args| Ok(Some(Value::new(body(args)?)))),
        };
        self.push(".ctor", MemberKind::Constructor, Scope::Static, visibility, access)
    }

    /// Declare an embedded base part reachable through the `*_of` accessors
    pub fn base<B, P, Q>(mut self, project: P, project_mut: Q) -> Self
    where
        B: Typed,
        P: Fn(&T) -> &B + Send + Sync + 'static,
        Q: Fn(&mut T) -> &mut B + Send + Sync + 'static,
    {
        self.bases.push(BaseLink {
            info: B::type_info,
            project: projection(move |target| {
                let this = target.downcast_ref::<T>()?;
                Some(project(this) as &dyn Any)
            }),
            project_mut: projection_mut(move |target| {
                let this = target.downcast_mut::<T>()?;
                Some(project_mut(this) as &mut dyn Any)
            }),
        });
        self
    }

    /// Finish the table
    pub fn build(self) -> TypeInfo {
        TypeInfo::new(
            self.name,
            std::any::type_name::<T>(),
            TypeId::of::<T>(),
            self.members,
            self.bases,
        )
    }
}
