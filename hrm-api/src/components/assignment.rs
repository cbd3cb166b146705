//! Assignment component implementation.

use crate::component::{push_updates, Component, SqlParam};
use crate::error::ApiResult;
use crate::types::{AssignmentFilter, CreateAssignmentRequest, UpdateAssignmentRequest};
use hrm_core::{rules, Assignment, EntityKind, ValidationError};
use tokio_postgres::Row;

impl Component for Assignment {
    type Create = CreateAssignmentRequest;
    type Update = UpdateAssignmentRequest;
    type ListFilter = AssignmentFilter;

    const KIND: EntityKind = EntityKind::Assignment;
    const TABLE: &'static str = "assignments";
    const SELECT: &'static str = "SELECT t.id, t.employee_id, t.project_id, t.role_on_project, \
         t.start_date, t.end_date, t.allocation_percent \
         FROM assignments t \
         JOIN employees e ON e.id = t.employee_id \
         JOIN projects p ON p.id = t.project_id";
    const SEARCH_FIELDS: &'static [&'static str] = &["e.first_name", "e.last_name", "p.name"];
    const ORDERING_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("start_date", "t.start_date"),
        ("end_date", "t.end_date"),
        ("allocation_percent", "t.allocation_percent"),
    ];
    const DEFAULT_ORDERING: &'static str = "t.start_date ASC";

    fn create_columns(req: &Self::Create) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("employee_id", SqlParam::Uuid(req.employee_id)),
            ("project_id", SqlParam::Uuid(req.project_id)),
            ("role_on_project", SqlParam::text(req.role_on_project.clone())),
            ("start_date", SqlParam::Date(req.start_date)),
            ("end_date", SqlParam::OptDate(req.end_date)),
            ("allocation_percent", SqlParam::Decimal(req.allocation_percent)),
        ]
    }

    fn update_columns(req: &Self::Update) -> Vec<(&'static str, SqlParam)> {
        let mut cols = Vec::new();
        push_updates!(cols, req, {
            employee_id => SqlParam::Uuid,
            project_id => SqlParam::Uuid,
            role_on_project => SqlParam::text,
            start_date => SqlParam::Date,
            end_date => SqlParam::OptDate,
            allocation_percent => SqlParam::Decimal,
        });
        cols
    }

    fn from_row(row: &Row) -> ApiResult<Self> {
        Ok(Assignment {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            project_id: row.try_get("project_id")?,
            role_on_project: row.try_get("role_on_project")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            allocation_percent: row.try_get("allocation_percent")?,
        })
    }

    fn check_stored(&self) -> Result<(), ValidationError> {
        rules::date_order("start_date", self.start_date, "end_date", self.end_date)
    }
}
