//! Pagination and relative date-range types shared by all list queries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A 1-based page request.
///
/// All list views paginate with a fixed page size; the backend receives an
/// inclusive offset range of `[(page - 1) * per_page, page * per_page - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: u32 = 10;

    /// Create a request, clamping `page` to at least 1 and `per_page` to a
    /// sane non-zero value.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: if per_page == 0 {
                Self::DEFAULT_PER_PAGE
            } else {
                per_page
            },
        }
    }

    /// Zero-based offset of the first row on this page.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Inclusive `(from, to)` row range for this page.
    #[must_use]
    pub const fn range(self) -> (u64, u64) {
        let from = self.offset();
        (from, from + self.per_page as u64 - 1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PER_PAGE)
    }
}

/// One page of results together with the total matching-row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// Total rows matching the filters server-side.
    ///
    /// When a client-side-only filter is active (orders free-text search),
    /// this instead reflects the filtered subset of the current page; see
    /// the orders resource for the documented inconsistency.
    pub total: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// An empty page (read failures degrade to this in dashboard views).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Relative creation-date filter offered by the dashboard's period selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatedWithin {
    Today,
    Week,
    Month,
    Year,
}

impl CreatedWithin {
    /// The lower bound for `created_at` relative to `now`.
    ///
    /// `Today` means since local midnight (UTC); the other periods are
    /// rolling windows.
    #[must_use]
    pub fn since(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map_or(now, |midnight| midnight.and_utc()),
            Self::Week => now - Duration::days(7),
            Self::Month => now - Duration::days(30),
            Self::Year => now - Duration::days(365),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_page_request_range_math() {
        let req = PageRequest::new(1, 10);
        assert_eq!(req.range(), (0, 9));

        let req = PageRequest::new(3, 25);
        assert_eq!(req.offset(), 50);
        assert_eq!(req.range(), (50, 74));
    }

    #[test]
    fn test_page_request_clamps_zero_page() {
        let req = PageRequest::new(0, 10);
        assert_eq!(req.page, 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_request_clamps_zero_per_page() {
        let req = PageRequest::new(1, 0);
        assert_eq!(req.per_page, PageRequest::DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_created_within_today_is_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 14, 30, 45).unwrap();
        let since = CreatedWithin::Today.since(now);
        assert_eq!(since, Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_created_within_rolling_windows() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(CreatedWithin::Week.since(now), now - Duration::days(7));
        assert_eq!(CreatedWithin::Month.since(now), now - Duration::days(30));
        assert_eq!(CreatedWithin::Year.since(now), now - Duration::days(365));
    }
}
