//! Common types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ARCHIVE_PAGE_SIZE, MAX_PAGE_SIZE};

/// Requested page window. Always normalized: `page >= 1`, `1 <= per_page <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Missing values fall back to page 1 and `default_per_page`; the rest
    /// are clamped into range.
    pub fn new(page: Option<i64>, per_page: Option<i64>, default_per_page: u32) -> Self {
        Self {
            page: clamp_u32(page.unwrap_or(1), 1, u32::MAX),
            per_page: clamp_u32(
                per_page.unwrap_or_else(|| i64::from(default_per_page)),
                1,
                MAX_PAGE_SIZE,
            ),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

fn clamp_u32(value: i64, min: u32, max: u32) -> u32 {
    u32::try_from(value.clamp(i64::from(min), i64::from(max))).unwrap_or(min)
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_ARCHIVE_PAGE_SIZE }
    }
}

/// One page of results plus the metadata a pager needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u32,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, total: u64) -> Self {
        let per_page = u64::from(pagination.per_page);
        let last_page = total.div_ceil(per_page).max(1);
        Self {
            data,
            current_page: pagination.page,
            per_page: pagination.per_page,
            total,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normalizes_bounds() {
        let p = Pagination::new(Some(0), Some(1000), 10);
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, MAX_PAGE_SIZE);

        let p = Pagination::new(None, None, 10);
        assert_eq!(p, Pagination { page: 1, per_page: 10 });

        let p = Pagination::new(Some(3), Some(0), 10);
        assert_eq!(p.per_page, 1);
        assert_eq!(p.offset(), 2);

        let p = Pagination::new(Some(-1), Some(-20), 10);
        assert_eq!(p, Pagination { page: 1, per_page: 1 });

        let p = Pagination::new(Some(i64::MAX), None, 10);
        assert_eq!(p.page, u32::MAX);
    }

    #[test]
    fn test_page_last_page() {
        let p = Pagination::new(Some(2), Some(10), 10);
        assert_eq!(Page::<u8>::new(vec![], p, 0).last_page, 1);
        assert_eq!(Page::<u8>::new(vec![], p, 10).last_page, 1);
        assert_eq!(Page::<u8>::new(vec![], p, 11).last_page, 2);
        assert_eq!(Page::<u8>::new(vec![], p, 25).current_page, 2);
    }
}
