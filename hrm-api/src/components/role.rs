//! Role component implementation.

use crate::component::{push_updates, Component, SqlParam};
use crate::error::ApiResult;
use crate::types::{CreateRoleRequest, RoleFilter, UpdateRoleRequest};
use hrm_core::{rules, EntityKind, Role, ValidationError};
use tokio_postgres::Row;

impl Component for Role {
    type Create = CreateRoleRequest;
    type Update = UpdateRoleRequest;
    type ListFilter = RoleFilter;

    const KIND: EntityKind = EntityKind::Role;
    const TABLE: &'static str = "roles";
    const SELECT: &'static str = "SELECT t.id, t.title, t.level, t.salary_band_min, \
         t.salary_band_max, t.created_at, t.updated_at FROM roles t";
    const SEARCH_FIELDS: &'static [&'static str] = &["t.title", "t.level"];
    const ORDERING_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("title", "t.title"),
        ("level", "t.level"),
        ("salary_band_min", "t.salary_band_min"),
        ("salary_band_max", "t.salary_band_max"),
    ];
    const DEFAULT_ORDERING: &'static str = "t.id ASC";
    const HAS_UPDATED_AT: bool = true;

    fn create_columns(req: &Self::Create) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("title", SqlParam::text(req.title.clone())),
            ("level", SqlParam::text(req.level.clone())),
            ("salary_band_min", SqlParam::Decimal(req.salary_band_min)),
            ("salary_band_max", SqlParam::Decimal(req.salary_band_max)),
        ]
    }

    fn update_columns(req: &Self::Update) -> Vec<(&'static str, SqlParam)> {
        let mut cols = Vec::new();
        push_updates!(cols, req, {
            title => SqlParam::text,
            level => SqlParam::text,
            salary_band_min => SqlParam::Decimal,
            salary_band_max => SqlParam::Decimal,
        });
        cols
    }

    fn from_row(row: &Row) -> ApiResult<Self> {
        Ok(Role {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            level: row.try_get("level")?,
            salary_band_min: row.try_get("salary_band_min")?,
            salary_band_max: row.try_get("salary_band_max")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn check_stored(&self) -> Result<(), ValidationError> {
        rules::ordered_bounds(
            "salary_band_min",
            self.salary_band_min,
            "salary_band_max",
            self.salary_band_max,
        )
    }
}
