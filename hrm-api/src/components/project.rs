//! Project component implementation.

use crate::component::{push_updates, Component, SqlParam};
use crate::error::ApiResult;
use crate::types::{CreateProjectRequest, ProjectFilter, UpdateProjectRequest};
use hrm_core::{rules, EntityKind, Project, ValidationError};
use tokio_postgres::Row;

impl Component for Project {
    type Create = CreateProjectRequest;
    type Update = UpdateProjectRequest;
    type ListFilter = ProjectFilter;

    const KIND: EntityKind = EntityKind::Project;
    const TABLE: &'static str = "projects";
    const SELECT: &'static str = "SELECT t.id, t.name, t.code, t.department_id, t.start_date, \
         t.end_date, t.budget, t.created_at \
         FROM projects t JOIN departments d ON d.id = t.department_id";
    const SEARCH_FIELDS: &'static [&'static str] = &["t.name", "t.code", "d.name"];
    const ORDERING_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("start_date", "t.start_date"),
        ("end_date", "t.end_date"),
        ("budget", "t.budget"),
    ];
    const DEFAULT_ORDERING: &'static str = "t.start_date ASC";

    fn create_columns(req: &Self::Create) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("name", SqlParam::text(req.name.clone())),
            ("code", SqlParam::text(req.code.clone())),
            ("department_id", SqlParam::Uuid(req.department_id)),
            ("start_date", SqlParam::Date(req.start_date)),
            ("end_date", SqlParam::OptDate(req.end_date)),
            ("budget", SqlParam::Decimal(req.budget)),
        ]
    }

    fn update_columns(req: &Self::Update) -> Vec<(&'static str, SqlParam)> {
        let mut cols = Vec::new();
        push_updates!(cols, req, {
            name => SqlParam::text,
            code => SqlParam::text,
            department_id => SqlParam::Uuid,
            start_date => SqlParam::Date,
            end_date => SqlParam::OptDate,
            budget => SqlParam::Decimal,
        });
        cols
    }

    fn from_row(row: &Row) -> ApiResult<Self> {
        Ok(Project {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            code: row.try_get("code")?,
            department_id: row.try_get("department_id")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            budget: row.try_get("budget")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn check_stored(&self) -> Result<(), ValidationError> {
        rules::date_order("start_date", self.start_date, "end_date", self.end_date)
    }
}
