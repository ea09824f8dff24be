//! Page parameters and paged results.

use serde::{Deserialize, Serialize};

/// Page size used when the request does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Upper bound on the page size a request may ask for.
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    /// Zero or missing values fall back to the defaults; `per_page` is capped at
    /// [`MAX_PER_PAGE`].
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self::with_default_per_page(page, per_page, DEFAULT_PER_PAGE)
    }

    pub fn with_default_per_page(page: Option<u32>, per_page: Option<u32>, default_per_page: u32) -> Self {
        let default_per_page = default_per_page.clamp(1, MAX_PER_PAGE);
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1),
            per_page: per_page
                .filter(|p| *p > 0)
                .unwrap_or(default_per_page)
                .min(MAX_PER_PAGE),
        }
    }

    /// Builds pagination from raw query-string values; unparsable values are ignored.
    pub fn from_query(page: Option<&str>, per_page: Option<&str>, default_per_page: u32) -> Self {
        let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<u32>().ok());
        Self::with_default_per_page(parse(page), parse(per_page), default_per_page)
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.per_page as usize
    }

    pub fn limit(&self) -> usize {
        self.per_page as usize
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of records across all pages.
    pub total: u64,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn empty(pagination: Pagination) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            pagination,
        }
    }

    pub fn pages(&self) -> u64 {
        self.total.div_ceil(self.pagination.per_page.max(1) as u64)
    }

    /// Serializable summary for templates.
    pub fn view(&self) -> PaginationView {
        let pages = self.pages();
        let page = self.pagination.page as u64;
        PaginationView {
            page: self.pagination.page,
            per_page: self.pagination.per_page,
            total: self.total,
            pages,
            has_previous: page > 1,
            has_next: page < pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}
