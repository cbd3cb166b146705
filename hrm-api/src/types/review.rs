//! Performance review API types

use crate::component::{ListFilter, SqlParam, WhereBuilder};
use crate::error::ApiResult;
use crate::validation::{when, HasUpdates, Validate};
use hrm_core::rules::{self, limits};
use hrm_core::{Date, EntityId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to record a review for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateReviewRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub employee_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub period_start: Date,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub period_end: Date,
    /// 0.0 to 5.0, one decimal place
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "4.5"))]
    pub rating: Decimal,
    #[serde(default)]
    pub goals_met: i32,
    #[serde(default)]
    pub manager_feedback: String,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "1500.00"))]
    pub bonus_amount: Decimal,
}

/// Partial update of a review. A lone period bound is checked against the
/// stored value of the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateReviewRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub employee_id: Option<EntityId>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub period_start: Option<Date>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub period_end: Option<Date>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub rating: Option<Decimal>,
    pub goals_met: Option<i32>,
    pub manager_feedback: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub bonus_amount: Option<Decimal>,
}

impl Validate for CreateReviewRequest {
    fn validate(&self) -> ApiResult<()> {
        rules::date_order("period_start", self.period_start, "period_end", Some(self.period_end))?;
        rules::rating("rating", self.rating)?;
        rules::non_negative_int("goals_met", self.goals_met)?;
        rules::amount("bonus_amount", self.bonus_amount, limits::SALARY_DIGITS)?;
        Ok(())
    }
}

impl Validate for UpdateReviewRequest {
    fn validate(&self) -> ApiResult<()> {
        self.validate_has_updates()?;
        if let Some(start) = self.period_start {
            rules::date_order("period_start", start, "period_end", self.period_end)?;
        }
        when(self.rating, |v| rules::rating("rating", v))?;
        when(self.goals_met, |v| rules::non_negative_int("goals_met", v))?;
        when(self.bonus_amount, |v| rules::amount("bonus_amount", v, limits::SALARY_DIGITS))?;
        Ok(())
    }
}

impl HasUpdates for UpdateReviewRequest {
    fn has_any_updates(&self) -> bool {
        self.employee_id.is_some()
            || self.period_start.is_some()
            || self.period_end.is_some()
            || self.rating.is_some()
            || self.goals_met.is_some()
            || self.manager_feedback.is_some()
            || self.bonus_amount.is_some()
    }
}

/// Exact-match filters for `GET /performance-reviews`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ReviewFilter {
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>, format = "uuid"))]
    pub employee: Option<EntityId>,
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>, format = "date"))]
    pub period_start: Option<Date>,
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>, format = "date"))]
    pub period_end: Option<Date>,
}

impl ListFilter for ReviewFilter {
    fn apply(&self, builder: &mut WhereBuilder) {
        builder
            .eq_opt("t.employee_id", self.employee, SqlParam::Uuid)
            .eq_opt("t.period_start", self.period_start, SqlParam::Date)
            .eq_opt("t.period_end", self.period_end, SqlParam::Date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap_or_default()
    }

    fn review(start: Date, end: Date, rating: Decimal) -> CreateReviewRequest {
        CreateReviewRequest {
            employee_id: Uuid::nil(),
            period_start: start,
            period_end: end,
            rating,
            goals_met: 4,
            manager_feedback: String::new(),
            bonus_amount: Decimal::ZERO,
        }
    }

    #[test]
    fn test_period_order() {
        assert!(review(date(1, 1), date(3, 31), Decimal::new(40, 1)).validate().is_ok());
        assert_eq!(
            review(date(4, 1), date(3, 31), Decimal::new(40, 1)).validate().map_err(|e| e.code),
            Err(ErrorCode::InvalidRange)
        );
    }

    #[test]
    fn test_rating_out_of_scale() {
        assert!(review(date(1, 1), date(3, 31), Decimal::new(51, 1)).validate().is_err());
    }
}
