//! Reflection tables
//!
//! This module holds the runtime description of accessible types: member
//! tables, the typed builder that produces them, descriptor-based lookup and
//! the permission policy consulted before any member is touched.
//!
//! ## Usage
//!
//! ```ignore
//! impl Typed for Counter {
//!     fn type_info() -> &'static TypeInfo {
//!         static INFO: Lazy<TypeInfo> = Lazy::new(|| {
//!             TypeBuilder::<Counter>::new("Counter")
//!                 .field("_count", Visibility::Private, |c| &c.count, |c| &mut c.count)
//!                 .method("reset", Visibility::Private, 0, |c, _| {
//!                     c.count = 0;
//!                     Ok(())
//!                 })
//!                 .build()
//!         });
//!         &INFO
//!     }
//! }
//! ```

mod builder;
mod permissions;
mod resolve;
mod type_info;

pub use builder::TypeBuilder;
pub use permissions::{AccessPermission, AccessPolicy, TypePermissionRule};
pub use resolve::{MemberDescriptor, VisibilityFilter};
pub(crate) use type_info::MemberAccess;
pub use type_info::{MemberInfo, MemberKind, Reflect, Scope, TypeInfo, Typed, Visibility};
