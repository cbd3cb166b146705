//! Report responses owned by the HTTP layer.

use serde::{Deserialize, Serialize};

/// Result of `POST /departments/recompute-headcount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecomputeHeadcountResponse {
    /// Number of departments whose cache was rewritten.
    pub updated: u64,
}
