//! Tolerance-based float assertions
//!
//! `check_*` returns the failure as a value; `assert_*` panics with the same
//! message, for direct use inside `#[test]` functions.

use thiserror::Error;

/// Failure of a tolerance comparison
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToleranceError {
    /// The values differ by more than the tolerance
    #[error("{}Expected: {expected}, Actual: {actual} (tolerance {tolerance})", prefix(.message))]
    ToleranceMismatch {
        /// Value the caller expected
        expected: f64,
        /// Value actually observed
        actual: f64,
        /// Allowed absolute difference
        tolerance: f64,
        /// Caller context, shown before the values
        message: Option<String>,
    },

    /// The tolerance itself is negative or NaN
    #[error("Invalid tolerance {0}: must be a non-negative number")]
    InvalidTolerance(f64),
}

fn prefix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!("{}. ", message),
        None => String::new(),
    }
}

/// Compare `actual` to `expected` within an inclusive absolute tolerance
///
/// NaN never compares equal, not even to NaN.
pub fn check_within_tolerance(expected: f64, actual: f64, tolerance: f64) -> Result<(), ToleranceError> {
    compare(expected, actual, tolerance, None)
}

/// Like [`check_within_tolerance`], with a caller message prefixed to the failure
pub fn check_within_tolerance_with_message(
    expected: f64,
    actual: f64,
    tolerance: f64,
    message: &str,
) -> Result<(), ToleranceError> {
    compare(expected, actual, tolerance, Some(message))
}

fn compare(expected: f64, actual: f64, tolerance: f64, message: Option<&str>) -> Result<(), ToleranceError> {
    if tolerance.is_nan() || tolerance < 0.0 {
        return Err(ToleranceError::InvalidTolerance(tolerance));
    }
    // `<=` is false for NaN operands, so NaN falls through to the mismatch
    if (expected - actual).abs() <= tolerance {
        return Ok(());
    }
    Err(ToleranceError::ToleranceMismatch {
        expected,
        actual,
        tolerance,
        message: message.map(str::to_string),
    })
}

/// Panic unless `actual` is within `tolerance` of `expected`
#[track_caller]
pub fn assert_within_tolerance(expected: f64, actual: f64, tolerance: f64) {
    if let Err(err) = check_within_tolerance(expected, actual, tolerance) {
        panic!("{}", err);
    }
}

/// Panic with `message` unless `actual` is within `tolerance` of `expected`
#[track_caller]
pub fn assert_within_tolerance_with_message(expected: f64, actual: f64, tolerance: f64, message: &str) {
    if let Err(err) = check_within_tolerance_with_message(expected, actual, tolerance, message) {
        panic!("{}", err);
    }
}
