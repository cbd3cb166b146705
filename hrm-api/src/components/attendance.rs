//! Attendance component implementation.

use crate::component::{push_updates, Component, SqlParam};
use crate::error::{ApiError, ApiResult};
use crate::types::{AttendanceFilter, CreateAttendanceRequest, UpdateAttendanceRequest};
use hrm_core::{Attendance, AttendanceStatus, EntityKind};
use tokio_postgres::Row;

fn status_param(status: AttendanceStatus) -> SqlParam {
    SqlParam::String(status.as_db_str().to_string())
}

impl Component for Attendance {
    type Create = CreateAttendanceRequest;
    type Update = UpdateAttendanceRequest;
    type ListFilter = AttendanceFilter;

    const KIND: EntityKind = EntityKind::Attendance;
    const TABLE: &'static str = "attendance";
    const SELECT: &'static str = "SELECT t.id, t.employee_id, t.date, t.status, t.hours_worked, \
         t.notes FROM attendance t JOIN employees e ON e.id = t.employee_id";
    const SEARCH_FIELDS: &'static [&'static str] = &["e.first_name", "e.last_name", "t.status"];
    const ORDERING_FIELDS: &'static [(&'static str, &'static str)] =
        &[("date", "t.date"), ("hours_worked", "t.hours_worked")];
    const DEFAULT_ORDERING: &'static str = "t.date DESC";

    fn create_columns(req: &Self::Create) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("employee_id", SqlParam::Uuid(req.employee_id)),
            ("date", SqlParam::Date(req.date)),
            ("status", status_param(req.status)),
            ("hours_worked", SqlParam::Decimal(req.hours_worked)),
            ("notes", SqlParam::String(req.notes.clone())),
        ]
    }

    fn update_columns(req: &Self::Update) -> Vec<(&'static str, SqlParam)> {
        let mut cols = Vec::new();
        push_updates!(cols, req, {
            employee_id => SqlParam::Uuid,
            date => SqlParam::Date,
            status => status_param,
            hours_worked => SqlParam::Decimal,
            notes => SqlParam::String,
        });
        cols
    }

    fn from_row(row: &Row) -> ApiResult<Self> {
        let status: String = row.try_get("status")?;
        let status = AttendanceStatus::from_db_str(&status)
            .map_err(|e| ApiError::database_error(e.to_string()))?;
        Ok(Attendance {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            date: row.try_get("date")?,
            status,
            hours_worked: row.try_get("hours_worked")?,
            notes: row.try_get("notes")?,
        })
    }
}
