//! API Request and Response Types
//!
//! Create, update and filter shapes for each record type, plus the list
//! envelope shared by every collection.

// Paging and list envelope
mod list;
pub use list::*;

// Department types
mod department;
pub use department::*;

// Role types
mod role;
pub use role::*;

// Employee types
mod employee;
pub use employee::*;

// Attendance types
mod attendance;
pub use attendance::*;

// Performance review types
mod review;
pub use review::*;

// Project types
mod project;
pub use project::*;

// Assignment types
mod assignment;
pub use assignment::*;

// Report responses that only exist at the HTTP layer
mod report;
pub use report::*;

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`) for nullable columns in update bodies.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
