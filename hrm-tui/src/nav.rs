//! Navigation and view switching utilities.

use hrm_core::EntityKind;
use serde::{Deserialize, Serialize};

/// One tab of the console: a record collection or the analytics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum View {
    Departments,
    Roles,
    Employees,
    Attendance,
    Reviews,
    Projects,
    Assignments,
    Analytics,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self.entity() {
            Some(kind) => kind.label(),
            None => "Analytics",
        }
    }

    /// Record type shown in this view; `None` for analytics.
    pub fn entity(&self) -> Option<EntityKind> {
        match self {
            View::Departments => Some(EntityKind::Department),
            View::Roles => Some(EntityKind::Role),
            View::Employees => Some(EntityKind::Employee),
            View::Attendance => Some(EntityKind::Attendance),
            View::Reviews => Some(EntityKind::PerformanceReview),
            View::Projects => Some(EntityKind::Project),
            View::Assignments => Some(EntityKind::Assignment),
            View::Analytics => None,
        }
    }

    pub fn all() -> &'static [View] {
        &[
            View::Departments,
            View::Roles,
            View::Employees,
            View::Attendance,
            View::Reviews,
            View::Projects,
            View::Assignments,
            View::Analytics,
        ]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> View {
        let all = Self::all();
        let idx = self.index();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}
