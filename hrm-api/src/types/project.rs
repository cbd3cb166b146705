//! Project API types

use super::nullable;
use crate::component::{ListFilter, SqlParam, WhereBuilder};
use crate::error::ApiResult;
use crate::validation::{when, HasUpdates, Validate};
use hrm_core::rules::{self, limits};
use hrm_core::{Date, EntityId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to create a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateProjectRequest {
    pub name: String,
    /// Unique code, e.g. `PRJ001`
    pub code: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub department_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub start_date: Date,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub end_date: Option<Date>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub budget: Decimal,
}

/// Partial update of a project. `"end_date": null` clears the end date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub department_id: Option<EntityId>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub end_date: Option<Option<Date>>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub budget: Option<Decimal>,
}

impl Validate for CreateProjectRequest {
    fn validate(&self) -> ApiResult<()> {
        rules::text("name", &self.name, limits::PROJECT_NAME)?;
        rules::text("code", &self.code, limits::PROJECT_CODE)?;
        rules::date_order("start_date", self.start_date, "end_date", self.end_date)?;
        rules::amount("budget", self.budget, limits::BUDGET_DIGITS)?;
        Ok(())
    }
}

impl Validate for UpdateProjectRequest {
    fn validate(&self) -> ApiResult<()> {
        self.validate_has_updates()?;
        when(self.name.as_deref(), |v| rules::text("name", v, limits::PROJECT_NAME))?;
        when(self.code.as_deref(), |v| rules::text("code", v, limits::PROJECT_CODE))?;
        if let Some(start) = self.start_date {
            rules::date_order("start_date", start, "end_date", self.end_date.flatten())?;
        }
        when(self.budget, |v| rules::amount("budget", v, limits::BUDGET_DIGITS))?;
        Ok(())
    }
}

impl HasUpdates for UpdateProjectRequest {
    fn has_any_updates(&self) -> bool {
        self.name.is_some()
            || self.code.is_some()
            || self.department_id.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.budget.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ProjectFilter {
    /// Department id
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>, format = "uuid"))]
    pub department: Option<EntityId>,
}

impl ListFilter for ProjectFilter {
    fn apply(&self, builder: &mut WhereBuilder) {
        builder.eq_opt("t.department_id", self.department, SqlParam::Uuid);
    }
}
