//! Page bounds and pagination metadata.

use serde::{Deserialize, Serialize};

use crate::error::FieldViolation;

/// Requested page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub page: u32,

    /// Rows per page, between [`Page::MIN_SIZE`] and [`Page::MAX_SIZE`].
    pub size: u32,
}

impl Page {
    pub const MIN_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 100;

    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Field-level violations for out-of-range values. Out-of-range pages
    /// are rejected up front rather than degrading to an unbounded fetch.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.page < 1 {
            violations.push(FieldViolation::new("page", "must be at least 1"));
        }
        if self.size < Self::MIN_SIZE || self.size > Self::MAX_SIZE {
            violations.push(FieldViolation::new(
                "size",
                format!(
                    "must be between {} and {}",
                    Self::MIN_SIZE,
                    Self::MAX_SIZE
                ),
            ));
        }
        violations
    }

    /// Row offset of this page: `(page - 1) * size`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.size)
    }
}

/// Pagination metadata returned alongside a result page.
///
/// `total_pages` is computed here, once, by ceiling division; consumers
/// must not recompute it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
    pub total_rows: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: Page, total_rows: u64) -> Self {
        let total_pages = if page.size == 0 {
            0
        } else {
            total_rows.div_ceil(u64::from(page.size))
        };

        Self {
            page: page.page,
            size: page.size,
            total_rows,
            total_pages,
        }
    }
}
