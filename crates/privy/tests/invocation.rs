//! Tests for instance and static method invocation

mod common;

use common::{Badge, Circle, Counter, CounterError, Shape};
use privy::{access, args, AccessError, Typed};

// ============================================================================
// Instance Methods
// ============================================================================

#[test]
fn test_invoke_method_runs_side_effects() {
    let mut counter = Counter::default();
    access::set_field(&mut counter, "_count", 12).unwrap();

    access::invoke_method(&mut counter, "reset", args![]).unwrap();

    assert_eq!(access::get_field(&counter, "_count").unwrap().downcast::<i32>().unwrap(), 0);
}

#[test]
fn test_invoke_function_returns_typed_result() {
    let mut counter = Counter::default();
    let first: i32 = access::invoke_function(&mut counter, "add", args![4]).unwrap();
    let second: i32 = access::invoke_function(&mut counter, "add", args![6]).unwrap();
    assert_eq!((first, second), (4, 10));

    let history = access::get_field(&counter, "_history").unwrap();
    assert_eq!(history.downcast::<Vec<i32>>().unwrap(), vec![4, 6]);
}

#[test]
fn test_invoke_method_discards_result() {
    let mut counter = Counter::default();
    access::invoke_method(&mut counter, "add", args![2]).unwrap();
    assert_eq!(access::get_field(&counter, "_count").unwrap().downcast::<i32>().unwrap(), 2);
}

#[test]
fn test_invoke_function_cast_mismatch_names_method_and_types() {
    let mut counter = Counter::with_label("x");
    let err = access::invoke_function::<i64>(&mut counter, "describe", args![]).unwrap_err();

    match &err {
        AccessError::CastMismatch { member, expected, actual } => {
            assert_eq!(member, "describe");
            assert_eq!(*expected, "i64");
            assert_eq!(*actual, std::any::type_name::<String>());
        }
        other => panic!("Expected cast mismatch, got {:?}", other),
    }

    let msg = err.to_string();
    assert!(msg.contains("describe"));
    assert!(msg.contains("i64"));
    assert!(msg.contains("String"));
}

#[test]
fn test_invoke_function_on_void_method() {
    let mut counter = Counter::default();
    access::invoke_function::<()>(&mut counter, "reset", args![]).unwrap();

    let err = access::invoke_function::<i32>(&mut counter, "reset", args![]).unwrap_err();
    assert!(matches!(err, AccessError::CastMismatch { actual: "()", .. }));
}

#[test]
fn test_thrown_error_propagates_unwrapped() {
    let mut counter = Counter::default();
    let err = access::invoke_method(&mut counter, "fail", args!["no budget"]).unwrap_err();

    assert_eq!(err.to_string(), "counter rejected: no budget");
    assert_eq!(
        err.thrown_ref::<CounterError>(),
        Some(&CounterError::Rejected("no budget".to_string()))
    );

    let inner = err.into_thrown().unwrap();
    let raised = inner.downcast::<CounterError>().unwrap();
    assert_eq!(*raised, CounterError::Rejected("no budget".to_string()));
}

#[test]
fn test_public_method_is_unsupported() {
    let mut counter = Counter::default();
    let err = access::invoke_function::<i32>(&mut counter, "peek", args![]).unwrap_err();
    assert!(matches!(
        err,
        AccessError::UnsupportedMember { ref name, type_name: "Counter" } if name == "peek"
    ));
}

#[test]
fn test_missing_method_is_unsupported() {
    let mut counter = Counter::default();
    let err = access::invoke_method(&mut counter, "launch", args![]).unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedMember { .. }));
    assert!(err.to_string().contains("launch"));
}

#[test]
fn test_wrong_argument_count() {
    let mut counter = Counter::default();
    let err = access::invoke_method(&mut counter, "add", args![1, 2]).unwrap_err();
    assert!(matches!(
        err,
        AccessError::ArgumentCount { expected: 1, actual: 2, .. }
    ));
}

#[test]
fn test_wrong_argument_type() {
    let mut counter = Counter::default();
    let err = access::invoke_method(&mut counter, "add", args![1.5]).unwrap_err();
    assert!(matches!(
        err,
        AccessError::ArgumentMismatch { index: 0, expected: "i32", actual: "f64", .. }
    ));
    assert_eq!(access::get_field(&counter, "_count").unwrap().downcast::<i32>().unwrap(), 0);
}

#[test]
fn test_blank_method_name_is_rejected() {
    let mut counter = Counter::default();
    let err = access::invoke_method(&mut counter, "", args![]).unwrap_err();
    assert!(matches!(err, AccessError::InvalidArgument { param: "method_name", .. }));
}

// ============================================================================
// Static Methods
// ============================================================================

#[test]
fn test_invoke_static_function() {
    let scaled: i32 =
        access::invoke_static_function(Counter::type_info(), "scale", args![6, 7]).unwrap();
    assert_eq!(scaled, 42);
}

#[test]
fn test_static_function_cast_mismatch() {
    let err = access::invoke_static_function::<String>(Counter::type_info(), "scale", args![1, 1])
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("scale"));
    assert!(msg.contains("i32"));
    assert!(msg.contains("String"));
}

#[test]
fn test_static_thrown_error_propagates_unwrapped() {
    let err = access::invoke_static_method(Counter::type_info(), "explode", args![]).unwrap_err();
    assert_eq!(
        err.thrown_ref::<CounterError>(),
        Some(&CounterError::Rejected("static".to_string()))
    );
}

#[test]
fn test_public_static_method_is_unsupported() {
    let err = access::invoke_static_function::<u32>(Counter::type_info(), "version", args![])
        .unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedMember { .. }));
}

#[test]
fn test_instance_method_is_not_static() {
    let err = access::invoke_static_method(Counter::type_info(), "reset", args![]).unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedMember { .. }));
}

#[test]
fn test_blank_static_method_name_is_rejected() {
    let ty = Counter::type_info();
    let err = access::invoke_static_method(ty, "", args![]).unwrap_err();
    assert!(matches!(err, AccessError::InvalidArgument { param: "method_name", .. }));

    let err = access::invoke_static_function::<i32>(ty, "  ", args![1, 2]).unwrap_err();
    assert!(matches!(err, AccessError::InvalidArgument { param: "method_name", .. }));
}

// ============================================================================
// Base part methods
// ============================================================================

#[test]
fn test_base_method_needs_declaring_type() {
    let mut circle = Circle::new(2, 1.0);
    let err = access::invoke_method(&mut circle, "renumber", args![5u32]).unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedMember { type_name: "Circle", .. }));

    access::invoke_method_of(&mut circle, Shape::type_info(), "renumber", args![5u32]).unwrap();
    let id = access::get_field_of(&circle, Shape::type_info(), "_id").unwrap();
    assert_eq!(id.downcast::<u32>().unwrap(), 5);
}

#[test]
fn test_base_function_through_two_levels() {
    let mut badge = Badge::new(7, "sale");
    let described: String =
        access::invoke_function_of(&mut badge, Shape::type_info(), "describe", args![]).unwrap();
    assert_eq!(described, "#7 circle");
}

#[test]
fn test_base_method_argument_errors() {
    let mut circle = Circle::new(2, 1.0);
    let err = access::invoke_method_of(&mut circle, Shape::type_info(), "renumber", args![5])
        .unwrap_err();
    assert!(matches!(err, AccessError::ArgumentMismatch { expected: "u32", actual: "i32", .. }));

    let err = access::invoke_function_of::<u64>(&mut circle, Shape::type_info(), "describe", args![])
        .unwrap_err();
    assert!(matches!(err, AccessError::CastMismatch { expected: "u64", .. }));
}

#[test]
fn test_base_method_on_unrelated_instance() {
    let mut counter = Counter::default();
    let err = access::invoke_method_of(&mut counter, Shape::type_info(), "renumber", args![1u32])
        .unwrap_err();
    assert!(matches!(err, AccessError::TargetMismatch { expected: "Shape", actual: "Counter" }));
}
