//! Pagination parameters for collection queries
//!
//! `page` is 1-based; `per_page` is clamped to `1..=100`.

const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self { Self { page, per_page } }

    /// Clamp to sane values and return `(offset, limit)` in rows.
    pub fn bounds(self) -> (u64, u64) {
        let page = self.page.max(1) as u64;
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE) as u64;
        ((page - 1) * per_page, per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}
