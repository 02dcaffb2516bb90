//! Pagination related types for list endpoints

use serde::{Deserialize, Serialize};

/// Default page size
pub const DEFAULT_LIMIT: u32 = 10;

/// Upper bound on page size
pub const MAX_LIMIT: u32 = 100;

/// Pagination parameters for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: u32,

    /// Number of items per page
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Create a pagination, clamping out of range values
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Build from optional query values
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Self {
        Self::new(page.unwrap_or(1), limit.unwrap_or(DEFAULT_LIMIT))
    }

    /// Number of items to skip
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }

    /// Slice one page out of a full result set
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect()
    }
}

/// Page metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageInfo {
    pub fn new(pagination: Pagination, total: usize) -> Self {
        let limit = pagination.limit.max(1) as usize;
        let total_pages = total.div_ceil(limit) as u32;
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages,
            has_next_page: pagination.page < total_pages,
            has_prev_page: pagination.page > 1,
        }
    }
}

/// One page of results with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, total: usize) -> Self {
        Self {
            data,
            pagination: PageInfo::new(pagination, total),
        }
    }
}
