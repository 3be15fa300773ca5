//! Guard clauses
//!
//! Checks run on caller input before any member lookup happens.

use crate::error::{AccessError, AccessResult};

/// Fail with `error()` when `condition` holds
#[inline]
pub fn against<E, F>(condition: bool, error: F) -> Result<(), E>
where
    F: FnOnce() -> E,
{
    if condition {
        Err(error())
    } else {
        Ok(())
    }
}

/// Reject empty or whitespace-only input for `param`
pub fn against_blank(value: &str, param: &'static str) -> AccessResult<()> {
    against(value.trim().is_empty(), || AccessError::InvalidArgument {
        param,
        reason: "must not be empty or whitespace".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_against() {
        assert_eq!(against(false, || "boom"), Ok(()));
        assert_eq!(against(true, || "boom"), Err("boom"));
    }

    #[test]
    fn test_against_blank() {
        assert!(against_blank("name", "field_name").is_ok());

        for blank in ["", " ", "\t\n"] {
            let err = against_blank(blank, "field_name").unwrap_err();
            assert!(matches!(
                err,
                AccessError::InvalidArgument { param: "field_name", .. }
            ));
        }
    }
}
