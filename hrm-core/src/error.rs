//! Error types for HRM operations

use thiserror::Error;

/// Validation errors raised before a write reaches the store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid range: {field_start} must not be after {field_end}")]
    InvalidRange {
        field_start: String,
        field_end: String,
    },

    #[error("Field {field} exceeds {max} characters")]
    TooLong { field: String, max: usize },
}

impl ValidationError {
    /// Name of the offending field, for error details.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::RequiredFieldMissing { field }
            | ValidationError::InvalidValue { field, .. }
            | ValidationError::TooLong { field, .. } => field,
            ValidationError::InvalidRange { field_end, .. } => field_end,
        }
    }
}
