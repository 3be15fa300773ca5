//! Type-erased values passed to and returned from members
//!
//! A `Value` owns a boxed `Any` together with the static type name it was
//! created from, so mismatches can always report both sides by name.

use std::any::{Any, TypeId};
use std::fmt;

use crate::error::{AccessError, AccessResult};

/// Owned dynamically-typed value
pub struct Value {
    inner: Box<dyn Any + Send>,
    type_name: &'static str,
    debug: fn(&dyn Any, &mut fmt::Formatter<'_>) -> fmt::Result,
}

fn debug_erased<T: Any + fmt::Debug>(value: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(v) => fmt::Debug::fmt(v, f),
        None => f.write_str("<opaque>"),
    }
}

impl Value {
    /// Box a value
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + fmt::Debug,
    {
        Self {
            inner: Box::new(value),
            type_name: std::any::type_name::<T>(),
            debug: debug_erased::<T>,
        }
    }

    /// The unit value, returned by members with no result
    pub fn unit() -> Self {
        Self::new(())
    }

    /// Static type name of the boxed value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// `TypeId` of the boxed value
    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    /// Check the boxed type
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the boxed value as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the boxed value as `T`, handing the value back on mismatch
    pub fn downcast<T: Any>(self) -> Result<T, Value> {
        if self.inner.is::<T>() {
            let Value { inner, type_name, debug } = self;
            match inner.downcast::<T>() {
                Ok(v) => Ok(*v),
                Err(inner) => Err(Value { inner, type_name, debug }),
            }
        } else {
            Err(self)
        }
    }

    /// Take the boxed value as `T`, reporting a cast failure against `member`
    pub fn cast<T: Any>(self, member: &str) -> AccessResult<T> {
        self.downcast::<T>().map_err(|v| AccessError::CastMismatch {
            member: member.to_string(),
            expected: std::any::type_name::<T>(),
            actual: v.type_name(),
        })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(&*self.inner, f)
    }
}

macro_rules! impl_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::new(v)
                }
            }
        )*
    };
}

impl_value_from!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::new(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Any + Send + fmt::Debug,
{
    fn from(v: Option<T>) -> Self {
        Value::new(v)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Any + Send + fmt::Debug,
{
    fn from(v: Vec<T>) -> Self {
        Value::new(v)
    }
}

/// Build an argument list from expressions convertible into [`Value`]
///
/// ```ignore
/// let args = privy::args![5, "label", 2.5];
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}

/// Parameter type of a constructor, used for exact signature matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamType {
    id: TypeId,
    name: &'static str,
}

impl ParamType {
    /// Parameter type for `T`
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type id
    pub fn id(&self) -> TypeId {
        self.id
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Arguments handed to a method or constructor body
///
/// Each argument can be taken once; taking converts it to the parameter type
/// and reports `ArgumentMismatch` when the runtime type differs.
#[derive(Debug)]
pub struct Args {
    member: &'static str,
    values: Vec<Option<Value>>,
}

impl Args {
    pub(crate) fn new(member: &'static str, values: Vec<Value>) -> Self {
        Self {
            member,
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// Number of arguments supplied
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments were supplied
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name of the member being called
    pub fn member(&self) -> &'static str {
        self.member
    }

    /// Take argument `index` as `T`
    pub fn take<T: Any>(&mut self, index: usize) -> AccessResult<T> {
        let count = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or_else(|| AccessError::ArgumentCount {
                member: self.member.to_string(),
                expected: index + 1,
                actual: count,
            })?;
        let value = slot.take().ok_or_else(|| AccessError::InvalidArgument {
            param: "args",
            reason: format!("argument {} of '{}' was already taken", index, self.member),
        })?;
        match value.downcast::<T>() {
            Ok(v) => Ok(v),
            Err(value) => {
                let actual = value.type_name();
                *slot = Some(value);
                Err(AccessError::ArgumentMismatch {
                    member: self.member.to_string(),
                    index,
                    expected: std::any::type_name::<T>(),
                    actual,
                })
            }
        }
    }

    /// Borrow argument `index` as `T` without consuming it
    pub fn peek<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.as_ref()?.downcast_ref::<T>()
    }
}
