use serde::{Deserialize, Serialize};

// Re-export UserRole and Permission from the permission module
pub use crate::domains::permission::{UserRole, Permission};

/// Hard ceiling on page size accepted from callers
pub const MAX_PER_PAGE: u32 = 100;

/// Default page size when the caller does not supply one
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Pagination parameters
///
/// `page` is 1-based; `per_page` is clamped into `[1, MAX_PER_PAGE]` by
/// the constructor, so repositories never see out-of-range values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u32,
    pub per_page: u32,
}

impl PaginationParams {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Row offset for the current page
    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.per_page
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Paginated result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, params: PaginationParams) -> Self {
        let total_pages = (total as f64 / params.per_page as f64).ceil() as u32;
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
            total_pages,
            has_next: params.page < total_pages,
            has_prev: params.page > 1,
        }
    }

    /// Map items into another representation while keeping page metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// List filter shared by every list endpoint: optional case-insensitive
/// substring match on `name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFilter {
    pub search: Option<String>,
}

impl ListFilter {
    pub fn search(term: &str) -> Self {
        Self {
            search: Some(term.to_string()),
        }
    }

    /// Returns the trimmed search term, or None when absent/empty
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_clamping() {
        let params = PaginationParams::new(0, 0);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 1);

        let params = PaginationParams::new(3, 500);
        assert_eq!(params.page, 3);
        assert_eq!(params.per_page, MAX_PER_PAGE);

        let params = PaginationParams::new(1, 100);
        assert_eq!(params.per_page, 100);
    }

    #[test]
    fn test_pagination_offset() {
        assert_eq!(PaginationParams::new(1, 20).offset(), 0);
        assert_eq!(PaginationParams::new(3, 20).offset(), 40);
    }

    #[test]
    fn test_paginated_result_math() {
        let params = PaginationParams::new(2, 10);
        let result = PaginatedResult::new(vec![0u8; 10], 35, params);
        assert_eq!(result.total_pages, 4);
        assert!(result.has_next);
        assert!(result.has_prev);

        let params = PaginationParams::new(4, 10);
        let result = PaginatedResult::new(vec![0u8; 5], 35, params);
        assert!(!result.has_next);
        assert!(result.has_prev);

        let params = PaginationParams::new(1, 10);
        let result = PaginatedResult::new(Vec::<u8>::new(), 0, params);
        assert_eq!(result.total_pages, 0);
        assert!(!result.has_next);
        assert!(!result.has_prev);
    }

    #[test]
    fn test_list_filter_search_term() {
        assert_eq!(ListFilter::default().search_term(), None);
        assert_eq!(ListFilter::search("  ").search_term(), None);
        assert_eq!(ListFilter::search(" kampala ").search_term(), Some("kampala"));
    }
}
