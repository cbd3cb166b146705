//! Core record structures

use crate::{AttendanceStatus, Date, EntityId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Organizational unit owning employees and projects.
///
/// `headcount` is a cached employee count. It is refreshed explicitly
/// (seed utility, recompute endpoint) and is never maintained by writes to
/// the employee table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Department {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: EntityId,
    pub name: String,
    pub code: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "250000.00"))]
    pub budget: Decimal,
    pub headcount: i32,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}

/// Job title at a level, with its salary band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Role {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: EntityId,
    pub title: String,
    pub level: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub salary_band_min: Decimal,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub salary_band_max: Decimal,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

impl Role {
    /// Label used in summaries, e.g. `Software Engineer (L2)`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.title, self.level)
    }

    /// Whether a salary lies inside the band. Informational only; the
    /// store accepts salaries outside the band.
    pub fn band_contains(&self, salary: Decimal) -> bool {
        salary >= self.salary_band_min && salary <= self.salary_band_max
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Employee record with its department and role embedded for reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Employee {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub hire_date: Date,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub base_salary: Decimal,
    pub is_active: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub department_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub role_id: EntityId,
    pub department: Department,
    pub role: Role,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One attendance entry per employee per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Attendance {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub employee_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub date: Date,
    pub status: AttendanceStatus,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub hours_worked: Decimal,
    pub notes: String,
}

/// Review covering one period for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PerformanceReview {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub employee_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub period_start: Date,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub period_end: Date,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "4.5"))]
    pub rating: Decimal,
    pub goals_met: i32,
    pub manager_feedback: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub bonus_amount: Decimal,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Project {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: EntityId,
    pub name: String,
    pub code: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub department_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub start_date: Date,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub end_date: Option<Date>,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub budget: Decimal,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

/// Staffing of an employee on a project from `start_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Assignment {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub employee_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub project_id: EntityId,
    pub role_on_project: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub start_date: Date,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date"))]
    pub end_date: Option<Date>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "100"))]
    pub allocation_percent: Decimal,
}
