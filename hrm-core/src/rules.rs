//! Field rules shared by create and update validation.
//!
//! Every rule returns `Ok(())` or a [`ValidationError`] naming the field.
//! Uniqueness and foreign-key existence are left to the store.

use crate::{Date, ValidationError};
use rust_decimal::Decimal;

/// Column widths from the schema.
pub mod limits {
    pub const DEPARTMENT_NAME: usize = 100;
    pub const DEPARTMENT_CODE: usize = 10;
    pub const ROLE_TITLE: usize = 100;
    pub const ROLE_LEVEL: usize = 50;
    pub const PERSON_NAME: usize = 50;
    pub const EMAIL: usize = 254;
    pub const ATTENDANCE_NOTES: usize = 255;
    pub const PROJECT_NAME: usize = 150;
    pub const PROJECT_CODE: usize = 20;
    pub const ROLE_ON_PROJECT: usize = 100;

    /// NUMERIC precisions (total digits) for amounts stored at scale 2.
    pub const SALARY_DIGITS: u32 = 10;
    pub const BUDGET_DIGITS: u32 = 12;
    pub const HOURS_DIGITS: u32 = 5;
}

/// Non-blank text no longer than `max` characters.
pub fn text(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: field.to_string(),
        });
    }
    optional_text(field, value, max)
}

/// Text that may be blank but is bounded by `max` characters.
pub fn optional_text(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Minimal address shape: one `@` with text on both sides and a dot in the
/// domain part.
pub fn email(field: &str, value: &str) -> Result<(), ValidationError> {
    text(field, value, limits::EMAIL)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid || value.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: "not a valid email address".to_string(),
        });
    }
    Ok(())
}

pub fn non_negative(field: &str, value: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: "must not be negative".to_string(),
        });
    }
    Ok(())
}

pub fn non_negative_int(field: &str, value: i32) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: "must not be negative".to_string(),
        });
    }
    Ok(())
}

/// Fits a `NUMERIC(precision, scale)` column without rounding. Trailing
/// zeros past `scale` are accepted.
pub fn numeric(field: &str, value: Decimal, precision: u32, scale: u32) -> Result<(), ValidationError> {
    if value.normalize().scale() > scale {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!("must have at most {} decimal places", scale),
        });
    }
    let whole_digits = precision.saturating_sub(scale);
    if value.abs().trunc() >= Decimal::from(10u64.pow(whole_digits)) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!("must have at most {} digits before the decimal point", whole_digits),
        });
    }
    Ok(())
}

/// Non-negative money or hours amount with two decimal places.
pub fn amount(field: &str, value: Decimal, precision: u32) -> Result<(), ValidationError> {
    non_negative(field, value)?;
    numeric(field, value, precision, 2)
}

/// Inclusive decimal range.
pub fn within(field: &str, value: Decimal, min: Decimal, max: Decimal) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Review rating on the 0.0 to 5.0 scale.
pub fn rating(field: &str, value: Decimal) -> Result<(), ValidationError> {
    numeric(field, value, 3, 1)?;
    within(field, value, Decimal::ZERO, Decimal::new(5, 0))
}

/// Allocation between 0 and 100 percent.
pub fn percent(field: &str, value: Decimal) -> Result<(), ValidationError> {
    numeric(field, value, 5, 2)?;
    within(field, value, Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// `min <= max` for a pair of decimal bounds (salary bands).
pub fn ordered_bounds(
    min_field: &str,
    min: Decimal,
    max_field: &str,
    max: Decimal,
) -> Result<(), ValidationError> {
    if min > max {
        return Err(ValidationError::InvalidRange {
            field_start: min_field.to_string(),
            field_end: max_field.to_string(),
        });
    }
    Ok(())
}

/// `start <= end` when an end date is present.
pub fn date_order(
    start_field: &str,
    start: Date,
    end_field: &str,
    end: Option<Date>,
) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => Err(ValidationError::InvalidRange {
            field_start: start_field.to_string(),
            field_end: end_field.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn day(d: u32) -> Date {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap_or_default()
    }

    #[test]
    fn test_text_rejects_blank_and_long() {
        assert!(matches!(
            text("name", "   ", 10),
            Err(ValidationError::RequiredFieldMissing { .. })
        ));
        assert!(matches!(
            text("code", "ABCDEFGHIJK", limits::DEPARTMENT_CODE),
            Err(ValidationError::TooLong { max: 10, .. })
        ));
        assert!(text("code", "ENG", limits::DEPARTMENT_CODE).is_ok());
    }

    #[test]
    fn test_email_shapes() {
        assert!(email("email", "ada.lovelace@example.com").is_ok());
        assert!(email("email", "ada@@example.com").is_err());
        assert!(email("email", "ada@example").is_err());
        assert!(email("email", "ada lovelace@example.com").is_err());
        assert!(email("email", "@example.com").is_err());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(rating("rating", Decimal::new(50, 1)).is_ok());
        assert!(rating("rating", Decimal::ZERO).is_ok());
        assert!(rating("rating", Decimal::new(51, 1)).is_err());
        assert!(rating("rating", Decimal::new(-1, 1)).is_err());
    }

    #[test]
    fn test_date_order() {
        assert!(date_order("start_date", day(2), "end_date", None).is_ok());
        assert!(date_order("start_date", day(2), "end_date", Some(day(2))).is_ok());
        let err = date_order("start_date", day(3), "end_date", Some(day(2)));
        assert_eq!(
            err,
            Err(ValidationError::InvalidRange {
                field_start: "start_date".to_string(),
                field_end: "end_date".to_string(),
            })
        );
    }

    #[test]
    fn test_negative_zero_is_allowed() {
        assert!(non_negative("budget", Decimal::new(-0, 2)).is_ok());
        assert!(non_negative("budget", Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_amount_rejects_sub_cent_values() {
        let err = amount("base_salary", Decimal::new(50_000_005, 3), limits::SALARY_DIGITS);
        assert!(matches!(err, Err(ValidationError::InvalidValue { ref field, .. }) if field == "base_salary"));
        assert!(amount("bonus_amount", Decimal::new(1_000_005, 3), limits::SALARY_DIGITS).is_err());
        assert!(amount("base_salary", Decimal::new(5_000_001, 2), limits::SALARY_DIGITS).is_ok());
        // 50000.500 normalizes to two places.
        assert!(amount("base_salary", Decimal::new(50_000_500, 3), limits::SALARY_DIGITS).is_ok());
    }

    #[test]
    fn test_amount_rejects_overflowing_whole_part() {
        assert!(amount("base_salary", Decimal::new(99_999_999_99, 2), limits::SALARY_DIGITS).is_ok());
        assert!(amount("base_salary", Decimal::new(100_000_000, 0), limits::SALARY_DIGITS).is_err());
        assert!(amount("budget", Decimal::new(100_000_000, 0), limits::BUDGET_DIGITS).is_ok());
        assert!(amount("hours_worked", Decimal::new(1000, 0), limits::HOURS_DIGITS).is_err());
        assert!(amount("hours_worked", Decimal::new(99_975, 2), limits::HOURS_DIGITS).is_ok());
    }

    #[test]
    fn test_rating_and_percent_scale() {
        assert!(rating("rating", Decimal::new(445, 2)).is_err());
        assert!(rating("rating", Decimal::new(450, 2)).is_ok());
        assert!(percent("allocation_percent", Decimal::new(33_333, 3)).is_err());
        assert!(percent("allocation_percent", Decimal::new(3_333, 2)).is_ok());
    }

    proptest! {
        #[test]
        fn prop_percent_accepts_exactly_zero_to_hundred(cents in -20_000i64..20_000) {
            let value = Decimal::new(cents, 2);
            let expected = (0..=10_000).contains(&cents);
            prop_assert_eq!(percent("allocation_percent", value).is_ok(), expected);
        }

        #[test]
        fn prop_ordered_bounds(a in 0i64..1_000_000, b in 0i64..1_000_000) {
            let result = ordered_bounds("salary_band_min", Decimal::new(a, 2), "salary_band_max", Decimal::new(b, 2));
            prop_assert_eq!(result.is_ok(), a <= b);
        }
    }
}
