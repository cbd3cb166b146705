//! HRM Core - Record Types
//!
//! Pure data structures, field rules and aggregation helpers with no I/O.
//! The API, the admin console and the test utilities all depend on this
//! crate.

mod entities;
mod enums;
mod error;
mod identity;
pub mod reports;
pub mod rules;

pub use entities::*;
pub use enums::*;
pub use error::*;
pub use identity::*;
pub use reports::{
    AnalyticsSummary, ChartData, EmployeeExportRow, EmployeeSummary, HeadcountRow, RatingRow,
    CSV_HEADER,
};
