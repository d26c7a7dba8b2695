// ABOUTME: Page/offset pagination for sales and subscription listings
// ABOUTME: Validates page requests and computes offsets and the last page number
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::constants::limits::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{AppError, AppResult};

const fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

const fn first_page() -> i64 {
    1
}

/// Requested page, as sent by the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of records per page
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// One-based page number
    #[serde(rename = "page", default = "first_page")]
    pub current_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
        }
    }
}

impl PageRequest {
    /// Create a page request
    #[must_use]
    pub const fn new(page_size: i64, current_page: i64) -> Self {
        Self {
            page_size,
            current_page,
        }
    }

    /// Reject page numbers below one and page sizes outside `1..=MAX_PAGE_SIZE`
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` when either bound is violated
    pub fn validate(&self) -> AppResult<()> {
        if self.current_page < 1 {
            return Err(AppError::invalid_input("page must be at least 1"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(AppError::invalid_input(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }

    /// Rows to skip for this page
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.current_page - 1) * self.page_size
    }

    /// Last page for `total_records`; an empty listing still has page 1
    #[must_use]
    pub const fn last_page(&self, total_records: i64) -> i64 {
        if total_records <= 0 {
            return 1;
        }
        (total_records + self.page_size - 1) / self.page_size
    }
}

/// One page of results plus the metadata needed to render a pager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub current_page: i64,
    pub page_size: i64,
    pub last_page: i64,
    pub total_records: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page from the request that produced it
    #[must_use]
    pub const fn new(request: PageRequest, total_records: i64, items: Vec<T>) -> Self {
        Self {
            current_page: request.current_page,
            page_size: request.page_size,
            last_page: request.last_page(total_records),
            total_records,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(PageRequest::new(10, 1).offset(), 0);
        assert_eq!(PageRequest::new(10, 3).offset(), 20);
        assert_eq!(PageRequest::new(25, 2).offset(), 25);
    }

    #[test]
    fn test_last_page_rounds_up() {
        let request = PageRequest::new(10, 1);
        assert_eq!(request.last_page(0), 1);
        assert_eq!(request.last_page(1), 1);
        assert_eq!(request.last_page(10), 1);
        assert_eq!(request.last_page(11), 2);
        assert_eq!(request.last_page(95), 10);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(PageRequest::new(10, 1).validate().is_ok());
        assert!(PageRequest::new(MAX_PAGE_SIZE, 7).validate().is_ok());
        assert!(PageRequest::new(0, 1).validate().is_err());
        assert!(PageRequest::new(MAX_PAGE_SIZE + 1, 1).validate().is_err());
        assert!(PageRequest::new(10, 0).validate().is_err());
        assert!(PageRequest::new(-5, 1).validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults_and_rename() {
        let parsed: PageRequest = serde_json::from_str(r#"{"page": 4}"#).unwrap();
        assert_eq!(parsed.current_page, 4);
        assert_eq!(parsed.page_size, DEFAULT_PAGE_SIZE);

        let parsed: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, PageRequest::default());
    }
}
