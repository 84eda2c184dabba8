//! Offset pagination utilities for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Upper bound on page size; larger requests are clamped, not rejected.
pub const MAX_PER_PAGE: u32 = 100;

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageParams {
    /// Page size after clamping to `1..=MAX_PER_PAGE`.
    pub fn limit(&self) -> i64 {
        self.per_page.clamp(1, MAX_PER_PAGE) as i64
    }

    /// Row offset for the (1-based) requested page.
    pub fn offset(&self) -> i64 {
        let page = self.page.max(1) as i64;
        (page - 1) * self.limit()
    }
}

/// Pagination metadata returned alongside list items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: u32,
}

impl PageInfo {
    pub fn new(params: PageParams, total: i64) -> Self {
        let per_page = params.per_page.clamp(1, MAX_PER_PAGE);
        let total_pages = if total <= 0 {
            0
        } else {
            ((total as u64).div_ceil(per_page as u64)) as u32
        };
        Self {
            page: params.page.max(1),
            per_page,
            total,
            total_pages,
        }
    }
}
