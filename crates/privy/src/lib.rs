//! Privy: runtime access to non-public members from tests
//!
//! This crate lets test code read and write fields, properties and static
//! state, call methods and run constructors that are not part of a type's
//! public surface. Types opt in by publishing an accessor table:
//! - **Tables**: `TypeInfo` built with `TypeBuilder`, exposed through `Typed`
//! - **Access**: `Accessor` and the free functions in [`access`]
//! - **Values**: `Value` for type-erased arguments and results
//! - **Policy**: `AccessPolicy` limits what an `Accessor` may touch
//!
//! # Example
//!
//! ```rust,ignore
//! use privy::{access, args};
//!
//! let mut counter = Counter::default();
//! access::set_field(&mut counter, "_count", 5)?;
//! let count: i32 = access::get_field(&counter, "_count")?.cast("_count")?;
//! assert_eq!(count, 5);
//!
//! let total: i64 = access::invoke_function(&mut counter, "add", args![3])?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Member access operations
pub mod access;

/// Error types
pub mod error;

/// Input guards
pub mod guard;

/// Type tables, lookup and permissions
pub mod reflect;

/// Type-erased values and argument lists
pub mod value;

// ============================================================================
// Re-exports
// ============================================================================

pub use access::Accessor;
pub use error::{AccessError, AccessResult, PolicyError, Thrown};
pub use reflect::{
    AccessPermission, AccessPolicy, MemberDescriptor, MemberInfo, MemberKind, Reflect, Scope,
    TypeBuilder, TypeInfo, TypePermissionRule, Typed, Visibility, VisibilityFilter,
};
pub use value::{Args, ParamType, Value};

/// Re-exported so accessor tables can be declared without a direct dependency
pub use once_cell::sync::Lazy;
