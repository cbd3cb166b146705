//! Validation Traits
//!
//! Request bodies implement [`Validate`] and are checked before any SQL runs.
//! Field rules come from `hrm_core::rules`; the helpers here adapt them to
//! optional update fields and to `ApiResult`.

use crate::error::{ApiError, ApiResult};
use hrm_core::ValidationError;

/// Request validation run before any write.
pub trait Validate {
    fn validate(&self) -> ApiResult<()>;
}

/// Apply a rule to an optional update field. `None` means "unchanged" and
/// always passes.
pub fn when<T>(
    value: Option<T>,
    rule: impl FnOnce(T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => rule(value),
        None => Ok(()),
    }
}

/// Trait for checking if an update request has any fields set.
pub trait HasUpdates {
    /// Check if any update fields are set.
    fn has_any_updates(&self) -> bool;

    /// Validate that at least one update field is set.
    fn validate_has_updates(&self) -> ApiResult<()> {
        if !self.has_any_updates() {
            return Err(ApiError::invalid_input(
                "At least one field must be provided for update",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use hrm_core::rules;
    use rust_decimal::Decimal;

    struct Patch {
        name: Option<String>,
    }

    impl HasUpdates for Patch {
        fn has_any_updates(&self) -> bool {
            self.name.is_some()
        }
    }

    #[test]
    fn test_when_skips_absent_fields() {
        assert!(when(None, |v| rules::rating("rating", v)).is_ok());
        assert!(when(Some(Decimal::new(55, 1)), |v| rules::rating("rating", v)).is_err());
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        let err = match (Patch { name: None }).validate_has_updates() {
            Err(err) => err,
            Ok(()) => panic!("empty patch accepted"),
        };
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!((Patch { name: Some("x".into()) }).validate_has_updates().is_ok());
    }
}
