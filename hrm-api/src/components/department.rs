//! Department component implementation.

use crate::component::{push_updates, Component, SqlParam};
use crate::error::ApiResult;
use crate::types::{CreateDepartmentRequest, DepartmentFilter, UpdateDepartmentRequest};
use hrm_core::{Department, EntityKind};
use tokio_postgres::Row;

impl Component for Department {
    type Create = CreateDepartmentRequest;
    type Update = UpdateDepartmentRequest;
    type ListFilter = DepartmentFilter;

    const KIND: EntityKind = EntityKind::Department;
    const TABLE: &'static str = "departments";
    const SELECT: &'static str = "SELECT t.id, t.name, t.code, t.budget, t.headcount, \
         t.created_at, t.updated_at FROM departments t";
    const SEARCH_FIELDS: &'static [&'static str] = &["t.name", "t.code"];
    const ORDERING_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("name", "t.name"),
        ("code", "t.code"),
        ("budget", "t.budget"),
        ("headcount", "t.headcount"),
    ];
    const DEFAULT_ORDERING: &'static str = "t.id ASC";
    const HAS_UPDATED_AT: bool = true;

    fn create_columns(req: &Self::Create) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("name", SqlParam::text(req.name.clone())),
            ("code", SqlParam::text(req.code.clone())),
            ("budget", SqlParam::Decimal(req.budget)),
            ("headcount", SqlParam::Int(req.headcount)),
        ]
    }

    fn update_columns(req: &Self::Update) -> Vec<(&'static str, SqlParam)> {
        let mut cols = Vec::new();
        push_updates!(cols, req, {
            name => SqlParam::text,
            code => SqlParam::text,
            budget => SqlParam::Decimal,
            headcount => SqlParam::Int,
        });
        cols
    }

    fn from_row(row: &Row) -> ApiResult<Self> {
        Ok(Department {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            code: row.try_get("code")?,
            budget: row.try_get("budget")?,
            headcount: row.try_get("headcount")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
