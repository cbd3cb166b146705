//! Employee component implementation.
//!
//! Reads join the department and role so the response can embed both. The
//! joined columns carry `d_` and `r_` prefixes to keep names unique within a
//! row.

use crate::component::{push_updates, Component, SqlParam};
use crate::error::ApiResult;
use crate::types::{CreateEmployeeRequest, EmployeeFilter, UpdateEmployeeRequest};
use hrm_core::{Department, Employee, EntityId, EntityKind, Role};
use tokio_postgres::Row;

impl Component for Employee {
    type Create = CreateEmployeeRequest;
    type Update = UpdateEmployeeRequest;
    type ListFilter = EmployeeFilter;

    const KIND: EntityKind = EntityKind::Employee;
    const TABLE: &'static str = "employees";
    const SELECT: &'static str = "SELECT t.id, t.first_name, t.last_name, t.email, t.hire_date, \
         t.base_salary, t.is_active, t.department_id, t.role_id, t.created_at, t.updated_at, \
         d.name AS d_name, d.code AS d_code, d.budget AS d_budget, d.headcount AS d_headcount, \
         d.created_at AS d_created_at, d.updated_at AS d_updated_at, \
         r.title AS r_title, r.level AS r_level, r.salary_band_min AS r_salary_band_min, \
         r.salary_band_max AS r_salary_band_max, r.created_at AS r_created_at, \
         r.updated_at AS r_updated_at \
         FROM employees t \
         JOIN departments d ON d.id = t.department_id \
         JOIN roles r ON r.id = t.role_id";
    const SEARCH_FIELDS: &'static [&'static str] =
        &["t.first_name", "t.last_name", "t.email", "d.name", "r.title"];
    const ORDERING_FIELDS: &'static [(&'static str, &'static str)] =
        &[("hire_date", "t.hire_date"), ("base_salary", "t.base_salary")];
    const DEFAULT_ORDERING: &'static str = "t.id ASC";
    const HAS_UPDATED_AT: bool = true;

    fn create_columns(req: &Self::Create) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("first_name", SqlParam::text(req.first_name.clone())),
            ("last_name", SqlParam::text(req.last_name.clone())),
            ("email", SqlParam::text(req.email.clone())),
            ("hire_date", SqlParam::Date(req.hire_date)),
            ("department_id", SqlParam::Uuid(req.department_id)),
            ("role_id", SqlParam::Uuid(req.role_id)),
            ("base_salary", SqlParam::Decimal(req.base_salary)),
            ("is_active", SqlParam::Bool(req.is_active)),
        ]
    }

    fn update_columns(req: &Self::Update) -> Vec<(&'static str, SqlParam)> {
        let mut cols = Vec::new();
        push_updates!(cols, req, {
            first_name => SqlParam::text,
            last_name => SqlParam::text,
            email => SqlParam::text,
            hire_date => SqlParam::Date,
            department_id => SqlParam::Uuid,
            role_id => SqlParam::Uuid,
            base_salary => SqlParam::Decimal,
            is_active => SqlParam::Bool,
        });
        cols
    }

    fn from_row(row: &Row) -> ApiResult<Self> {
        let department_id: EntityId = row.try_get("department_id")?;
        let role_id: EntityId = row.try_get("role_id")?;
        Ok(Employee {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            hire_date: row.try_get("hire_date")?,
            base_salary: row.try_get("base_salary")?,
            is_active: row.try_get("is_active")?,
            department_id,
            role_id,
            department: Department {
                id: department_id,
                name: row.try_get("d_name")?,
                code: row.try_get("d_code")?,
                budget: row.try_get("d_budget")?,
                headcount: row.try_get("d_headcount")?,
                created_at: row.try_get("d_created_at")?,
                updated_at: row.try_get("d_updated_at")?,
            },
            role: Role {
                id: role_id,
                title: row.try_get("r_title")?,
                level: row.try_get("r_level")?,
                salary_band_min: row.try_get("r_salary_band_min")?,
                salary_band_max: row.try_get("r_salary_band_max")?,
                created_at: row.try_get("r_created_at")?,
                updated_at: row.try_get("r_updated_at")?,
            },
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
