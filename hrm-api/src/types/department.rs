//! Department API types

use crate::component::{ListFilter, WhereBuilder};
use crate::error::ApiResult;
use crate::validation::{when, HasUpdates, Validate};
use hrm_core::rules::{self, limits};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to create a department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateDepartmentRequest {
    pub name: String,
    /// Short unique code, e.g. `ENG`
    pub code: String,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "250000.00"))]
    pub budget: Decimal,
    /// Cached employee count; normally left at 0 and refreshed by the
    /// recompute endpoint.
    #[serde(default)]
    pub headcount: i32,
}

/// Partial update of a department.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub budget: Option<Decimal>,
    pub headcount: Option<i32>,
}

impl Validate for CreateDepartmentRequest {
    fn validate(&self) -> ApiResult<()> {
        rules::text("name", &self.name, limits::DEPARTMENT_NAME)?;
        rules::text("code", &self.code, limits::DEPARTMENT_CODE)?;
        rules::amount("budget", self.budget, limits::BUDGET_DIGITS)?;
        rules::non_negative_int("headcount", self.headcount)?;
        Ok(())
    }
}

impl Validate for UpdateDepartmentRequest {
    fn validate(&self) -> ApiResult<()> {
        self.validate_has_updates()?;
        when(self.name.as_deref(), |v| rules::text("name", v, limits::DEPARTMENT_NAME))?;
        when(self.code.as_deref(), |v| rules::text("code", v, limits::DEPARTMENT_CODE))?;
        when(self.budget, |v| rules::amount("budget", v, limits::BUDGET_DIGITS))?;
        when(self.headcount, |v| rules::non_negative_int("headcount", v))?;
        Ok(())
    }
}

impl HasUpdates for UpdateDepartmentRequest {
    fn has_any_updates(&self) -> bool {
        self.name.is_some() || self.code.is_some() || self.budget.is_some() || self.headcount.is_some()
    }
}

/// Departments have no exact-match filters.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct DepartmentFilter {}

impl ListFilter for DepartmentFilter {
    fn apply(&self, _builder: &mut WhereBuilder) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_create_defaults_from_json() -> Result<(), serde_json::Error> {
        let req: CreateDepartmentRequest =
            serde_json::from_str(r#"{"name":"Engineering","code":"ENG"}"#)?;
        assert_eq!(req.budget, Decimal::ZERO);
        assert_eq!(req.headcount, 0);
        assert!(req.validate().is_ok());
        Ok(())
    }

    #[test]
    fn test_budget_accepts_string_or_number() -> Result<(), serde_json::Error> {
        let a: CreateDepartmentRequest =
            serde_json::from_str(r#"{"name":"HR","code":"HR","budget":"1000.50"}"#)?;
        let b: CreateDepartmentRequest =
            serde_json::from_str(r#"{"name":"HR","code":"HR","budget":1000.50}"#)?;
        assert_eq!(a.budget, b.budget);
        Ok(())
    }

    #[test]
    fn test_negative_headcount_rejected() {
        let req = UpdateDepartmentRequest {
            headcount: Some(-1),
            ..Default::default()
        };
        assert_eq!(req.validate().map_err(|e| e.code), Err(ErrorCode::ValidationFailed));
    }

    #[test]
    fn test_empty_update_rejected() {
        let err = UpdateDepartmentRequest::default().validate().map_err(|e| e.code);
        assert_eq!(err, Err(ErrorCode::InvalidInput));
    }
}
