//! Enum types for HRM records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ATTENDANCE STATUS
// ============================================================================

/// Day status recorded on an attendance entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Remote,
    Leave,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Remote,
        AttendanceStatus::Leave,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Remote => "remote",
            AttendanceStatus::Leave => "leave",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, AttendanceStatusParseError> {
        match s.trim().to_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "remote" => Ok(AttendanceStatus::Remote),
            "leave" => Ok(AttendanceStatus::Leave),
            _ => Err(AttendanceStatusParseError(s.to_string())),
        }
    }

    /// Whether a day with this status normally has hours logged.
    pub fn is_working_day(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Remote)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = AttendanceStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid attendance status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceStatusParseError(pub String);

impl fmt::Display for AttendanceStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid attendance status: {}", self.0)
    }
}

impl std::error::Error for AttendanceStatusParseError {}

// ============================================================================
// ENTITY KIND
// ============================================================================

/// Discriminator for the seven record types.
///
/// Carries the REST collection segment and display label so the API and the
/// admin console agree on naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EntityKind {
    Department,
    Role,
    Employee,
    Attendance,
    PerformanceReview,
    Project,
    Assignment,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Department,
        EntityKind::Role,
        EntityKind::Employee,
        EntityKind::Attendance,
        EntityKind::PerformanceReview,
        EntityKind::Project,
        EntityKind::Assignment,
    ];

    /// Path segment under `/api/v1`.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Department => "departments",
            EntityKind::Role => "roles",
            EntityKind::Employee => "employees",
            EntityKind::Attendance => "attendance",
            EntityKind::PerformanceReview => "performance-reviews",
            EntityKind::Project => "projects",
            EntityKind::Assignment => "assignments",
        }
    }

    /// Plural label for headers and tabs.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Department => "Departments",
            EntityKind::Role => "Roles",
            EntityKind::Employee => "Employees",
            EntityKind::Attendance => "Attendance",
            EntityKind::PerformanceReview => "Reviews",
            EntityKind::Project => "Projects",
            EntityKind::Assignment => "Assignments",
        }
    }
}

fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            EntityKind::Department => "Department",
            EntityKind::Role => "Role",
            EntityKind::Employee => "Employee",
            EntityKind::Attendance => "Attendance",
            EntityKind::PerformanceReview => "PerformanceReview",
            EntityKind::Project => "Project",
            EntityKind::Assignment => "Assignment",
        };
        write!(f, "{}", value)
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "department" | "departments" => Ok(EntityKind::Department),
            "role" | "roles" => Ok(EntityKind::Role),
            "employee" | "employees" => Ok(EntityKind::Employee),
            "attendance" => Ok(EntityKind::Attendance),
            "performancereview" | "performancereviews" | "review" | "reviews" => {
                Ok(EntityKind::PerformanceReview)
            }
            "project" | "projects" => Ok(EntityKind::Project),
            "assignment" | "assignments" => Ok(EntityKind::Assignment),
            _ => Err(format!("Invalid EntityKind: {}", s)),
        }
    }
}
