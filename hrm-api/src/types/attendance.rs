//! Attendance API types

use crate::component::{ListFilter, SqlParam, WhereBuilder};
use crate::error::ApiResult;
use crate::validation::{when, HasUpdates, Validate};
use hrm_core::rules::{self, limits};
use hrm_core::{AttendanceStatus, Date, EntityId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to record one day of attendance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateAttendanceRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub employee_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub date: Date,
    pub status: AttendanceStatus,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "7.50"))]
    pub hours_worked: Decimal,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateAttendanceRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub employee_id: Option<EntityId>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub date: Option<Date>,
    pub status: Option<AttendanceStatus>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub hours_worked: Option<Decimal>,
    pub notes: Option<String>,
}

impl Validate for CreateAttendanceRequest {
    fn validate(&self) -> ApiResult<()> {
        rules::amount("hours_worked", self.hours_worked, limits::HOURS_DIGITS)?;
        rules::optional_text("notes", &self.notes, limits::ATTENDANCE_NOTES)?;
        Ok(())
    }
}

impl Validate for UpdateAttendanceRequest {
    fn validate(&self) -> ApiResult<()> {
        self.validate_has_updates()?;
        when(self.hours_worked, |v| rules::amount("hours_worked", v, limits::HOURS_DIGITS))?;
        when(self.notes.as_deref(), |v| {
            rules::optional_text("notes", v, limits::ATTENDANCE_NOTES)
        })?;
        Ok(())
    }
}

impl HasUpdates for UpdateAttendanceRequest {
    fn has_any_updates(&self) -> bool {
        self.employee_id.is_some()
            || self.date.is_some()
            || self.status.is_some()
            || self.hours_worked.is_some()
            || self.notes.is_some()
    }
}

/// Exact-match filters for `GET /attendance`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AttendanceFilter {
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>, format = "uuid"))]
    pub employee: Option<EntityId>,
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>, format = "date"))]
    pub date: Option<Date>,
    pub status: Option<AttendanceStatus>,
}

impl ListFilter for AttendanceFilter {
    fn apply(&self, builder: &mut WhereBuilder) {
        builder
            .eq_opt("t.employee_id", self.employee, SqlParam::Uuid)
            .eq_opt("t.date", self.date, SqlParam::Date)
            .eq_opt("t.status", self.status, |s| {
                SqlParam::String(s.as_db_str().to_string())
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_unknown_status_rejected_at_deserialization() {
        let result: Result<CreateAttendanceRequest, _> = serde_json::from_value(serde_json::json!({
            "employee_id": Uuid::nil(),
            "date": "2024-03-01",
            "status": "vacation",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() -> Result<(), serde_json::Error> {
        let req: CreateAttendanceRequest = serde_json::from_value(serde_json::json!({
            "employee_id": Uuid::nil(),
            "date": "2024-03-01",
            "status": "leave",
        }))?;
        assert_eq!(req.hours_worked, Decimal::ZERO);
        assert!(req.notes.is_empty());
        assert!(req.validate().is_ok());
        Ok(())
    }

    #[test]
    fn test_status_filter_uses_db_value() {
        let filter = AttendanceFilter {
            status: Some(AttendanceStatus::Remote),
            ..Default::default()
        };
        let mut builder = WhereBuilder::new();
        filter.apply(&mut builder);
        let (clause, params) = builder.build();
        assert_eq!(clause, "t.status = $1");
        assert_eq!(params, vec![SqlParam::String("remote".to_string())]);
    }
}
