//! Leaf helpers for tests written against privy
//!
//! - **assert**: tolerance-based float equality
//! - **resources**: embedded text assets with explicit output sinks
//! - **strings**: blank checks and line splitting
//!
//! None of these depend on the accessor core.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod assert;
pub mod resources;
pub mod strings;

pub use assert::{
    assert_within_tolerance, assert_within_tolerance_with_message, check_within_tolerance,
    check_within_tolerance_with_message, ToleranceError,
};
pub use resources::{Resource, ResourceError, ResourceSet};
pub use strings::{has_content, is_blank, split_lines};
