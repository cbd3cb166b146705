//! Role API types

use crate::component::{ListFilter, WhereBuilder};
use crate::error::ApiResult;
use crate::validation::{when, HasUpdates, Validate};
use hrm_core::rules::{self, limits};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to create a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateRoleRequest {
    pub title: String,
    pub level: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "80000.00"))]
    pub salary_band_min: Decimal,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "120000.00"))]
    pub salary_band_max: Decimal,
}

/// Partial update of a role. When only one band edge is sent it is checked
/// against the stored value of the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateRoleRequest {
    pub title: Option<String>,
    pub level: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub salary_band_min: Option<Decimal>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub salary_band_max: Option<Decimal>,
}

impl Validate for CreateRoleRequest {
    fn validate(&self) -> ApiResult<()> {
        rules::text("title", &self.title, limits::ROLE_TITLE)?;
        rules::text("level", &self.level, limits::ROLE_LEVEL)?;
        rules::amount("salary_band_min", self.salary_band_min, limits::SALARY_DIGITS)?;
        rules::amount("salary_band_max", self.salary_band_max, limits::SALARY_DIGITS)?;
        rules::ordered_bounds(
            "salary_band_min",
            self.salary_band_min,
            "salary_band_max",
            self.salary_band_max,
        )?;
        Ok(())
    }
}

impl Validate for UpdateRoleRequest {
    fn validate(&self) -> ApiResult<()> {
        self.validate_has_updates()?;
        when(self.title.as_deref(), |v| rules::text("title", v, limits::ROLE_TITLE))?;
        when(self.level.as_deref(), |v| rules::text("level", v, limits::ROLE_LEVEL))?;
        when(self.salary_band_min, |v| rules::amount("salary_band_min", v, limits::SALARY_DIGITS))?;
        when(self.salary_band_max, |v| rules::amount("salary_band_max", v, limits::SALARY_DIGITS))?;
        if let (Some(min), Some(max)) = (self.salary_band_min, self.salary_band_max) {
            rules::ordered_bounds("salary_band_min", min, "salary_band_max", max)?;
        }
        Ok(())
    }
}

impl HasUpdates for UpdateRoleRequest {
    fn has_any_updates(&self) -> bool {
        self.title.is_some()
            || self.level.is_some()
            || self.salary_band_min.is_some()
            || self.salary_band_max.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct RoleFilter {}

impl ListFilter for RoleFilter {
    fn apply(&self, _builder: &mut WhereBuilder) {}
}
