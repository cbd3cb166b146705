//! Assignment API types

use super::nullable;
use crate::component::{ListFilter, SqlParam, WhereBuilder};
use crate::error::ApiResult;
use crate::validation::{when, HasUpdates, Validate};
use hrm_core::rules::{self, limits};
use hrm_core::{Date, EntityId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_allocation() -> Decimal {
    Decimal::ONE_HUNDRED
}

/// Request to staff an employee on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateAssignmentRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub employee_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub project_id: EntityId,
    pub role_on_project: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub start_date: Date,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub end_date: Option<Date>,
    /// 0 to 100, defaults to 100
    #[serde(default = "default_allocation")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "75"))]
    pub allocation_percent: Decimal,
}

/// Partial update of an assignment. `"end_date": null` clears the end date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateAssignmentRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub employee_id: Option<EntityId>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub project_id: Option<EntityId>,
    pub role_on_project: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub end_date: Option<Option<Date>>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub allocation_percent: Option<Decimal>,
}

impl Validate for CreateAssignmentRequest {
    fn validate(&self) -> ApiResult<()> {
        rules::text("role_on_project", &self.role_on_project, limits::ROLE_ON_PROJECT)?;
        rules::date_order("start_date", self.start_date, "end_date", self.end_date)?;
        rules::percent("allocation_percent", self.allocation_percent)?;
        Ok(())
    }
}

impl Validate for UpdateAssignmentRequest {
    fn validate(&self) -> ApiResult<()> {
        self.validate_has_updates()?;
        when(self.role_on_project.as_deref(), |v| {
            rules::text("role_on_project", v, limits::ROLE_ON_PROJECT)
        })?;
        if let Some(start) = self.start_date {
            rules::date_order("start_date", start, "end_date", self.end_date.flatten())?;
        }
        when(self.allocation_percent, |v| rules::percent("allocation_percent", v))?;
        Ok(())
    }
}

impl HasUpdates for UpdateAssignmentRequest {
    fn has_any_updates(&self) -> bool {
        self.employee_id.is_some()
            || self.project_id.is_some()
            || self.role_on_project.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.allocation_percent.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AssignmentFilter {
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>, format = "uuid"))]
    pub employee: Option<EntityId>,
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>, format = "uuid"))]
    pub project: Option<EntityId>,
}

impl ListFilter for AssignmentFilter {
    fn apply(&self, builder: &mut WhereBuilder) {
        builder
            .eq_opt("t.employee_id", self.employee, SqlParam::Uuid)
            .eq_opt("t.project_id", self.project, SqlParam::Uuid);
    }
}
