//! Pagination types for list endpoints

use serde::{Deserialize, Serialize};

/// Maximum items per page. Product lists are rendered in a virtualized
/// table, so pages are large.
const MAX_PER_PAGE: u32 = 1000;

/// Default items per page
const DEFAULT_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page (max 1000)
    pub per_page: u32,
}

impl Pagination {
    /// Create pagination with clamping.
    ///
    /// - Page is clamped to minimum of 1
    /// - Per page is clamped to 1..=1000
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Calculate SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> u32 {
        self.per_page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Number of pages for `total` (at least 1)
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: Pagination) -> Self {
        Self {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
            total_pages: total_pages(total, page.per_page),
        }
    }
}

fn total_pages(total: i64, per_page: u32) -> u32 {
    if total <= 0 {
        1
    } else {
        (total as u64).div_ceil(per_page.max(1) as u64).max(1) as u32
    }
}

/// Query parameters for pagination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self::new(
            params.page.unwrap_or(1),
            params.per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
    }
}
