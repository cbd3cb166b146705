//! Employee API types

use crate::component::{ListFilter, SqlParam, WhereBuilder};
use crate::error::ApiResult;
use crate::validation::{when, HasUpdates, Validate};
use hrm_core::rules::{self, limits};
use hrm_core::{Date, EntityId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

/// Request to hire an employee. The salary is not checked against the
/// role's band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub hire_date: Date,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub department_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub role_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "95000.00"))]
    pub base_salary: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Partial update of an employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub hire_date: Option<Date>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub department_id: Option<EntityId>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub role_id: Option<EntityId>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub base_salary: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl Validate for CreateEmployeeRequest {
    fn validate(&self) -> ApiResult<()> {
        rules::text("first_name", &self.first_name, limits::PERSON_NAME)?;
        rules::text("last_name", &self.last_name, limits::PERSON_NAME)?;
        rules::email("email", &self.email)?;
        rules::amount("base_salary", self.base_salary, limits::SALARY_DIGITS)?;
        Ok(())
    }
}

impl Validate for UpdateEmployeeRequest {
    fn validate(&self) -> ApiResult<()> {
        self.validate_has_updates()?;
        when(self.first_name.as_deref(), |v| rules::text("first_name", v, limits::PERSON_NAME))?;
        when(self.last_name.as_deref(), |v| rules::text("last_name", v, limits::PERSON_NAME))?;
        when(self.email.as_deref(), |v| rules::email("email", v))?;
        when(self.base_salary, |v| rules::amount("base_salary", v, limits::SALARY_DIGITS))?;
        Ok(())
    }
}

impl HasUpdates for UpdateEmployeeRequest {
    fn has_any_updates(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.email.is_some()
            || self.hire_date.is_some()
            || self.department_id.is_some()
            || self.role_id.is_some()
            || self.base_salary.is_some()
            || self.is_active.is_some()
    }
}

/// Exact-match filters for `GET /employees`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct EmployeeFilter {
    /// Department id
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>, format = "uuid"))]
    pub department: Option<EntityId>,
    /// Role id
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>, format = "uuid"))]
    pub role: Option<EntityId>,
    pub is_active: Option<bool>,
}

impl ListFilter for EmployeeFilter {
    fn apply(&self, builder: &mut WhereBuilder) {
        builder
            .eq_opt("t.department_id", self.department, SqlParam::Uuid)
            .eq_opt("t.role_id", self.role, SqlParam::Uuid)
            .eq_opt("t.is_active", self.is_active, SqlParam::Bool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_is_active_defaults_true() -> Result<(), serde_json::Error> {
        let req: CreateEmployeeRequest = serde_json::from_value(serde_json::json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada.lovelace@example.com",
            "hire_date": "2020-01-15",
            "department_id": Uuid::nil(),
            "role_id": Uuid::nil(),
            "base_salary": "250000.00",
        }))?;
        assert!(req.is_active);
        // far outside any band, still accepted
        assert!(req.validate().is_ok());
        Ok(())
    }

    #[test]
    fn test_bad_email_rejected() {
        let req = UpdateEmployeeRequest {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_filter_binds_only_present_fields() {
        let filter = EmployeeFilter {
            is_active: Some(false),
            ..Default::default()
        };
        let mut builder = WhereBuilder::new();
        filter.apply(&mut builder);
        let (clause, params) = builder.build();
        assert_eq!(clause, "t.is_active = $1");
        assert_eq!(params, vec![SqlParam::Bool(false)]);
    }
}
