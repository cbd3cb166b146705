//! List query parameters, pagination and the list envelope.

use serde::{Deserialize, Serialize};

/// Query parameters accepted by every collection endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ListParams {
    /// Whitespace-separated terms; every term must match some search field.
    pub search: Option<String>,
    /// Comma list of field names, `-` prefix for descending.
    pub ordering: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Page size bounds applied to [`ListParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: 20,
            max_size: 500,
        }
    }
}

/// Resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Page 0 is treated as page 1; page size is clamped to
    /// `1..=limits.max_size`.
    pub fn resolve(params: &ListParams, limits: PageLimits) -> Self {
        let max_size = limits.max_size.max(1);
        let page_size = params
            .page_size
            .unwrap_or(limits.default_size)
            .clamp(1, max_size);
        Self {
            page: params.page.unwrap_or(1).max(1),
            page_size,
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    /// Whether this page lies past the end of `total` rows. Page 1 is
    /// always valid, even for an empty collection.
    pub fn is_past_end(&self, total: i64) -> bool {
        self.page > 1 && self.offset() >= total
    }
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    /// Matching rows before paging.
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}
