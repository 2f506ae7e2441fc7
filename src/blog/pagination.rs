//! Page-number pagination.
//!
//! Requests never fail: a page indicator that is not a positive integer
//! selects page 1 and one past the end selects the last page.

use serde::Serialize;

/// Number of posts shown per list page.
pub const POSTS_PER_PAGE: i64 = 3;

/// A resolved page request: which page to show and the window to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub number: i64,
    /// Total number of pages (at least 1).
    pub num_pages: i64,
    /// Number of items to skip.
    pub offset: i64,
    /// Maximum number of items to return.
    pub limit: i64,
}

impl Pagination {
    /// Resolve a raw page indicator against `total` items split into pages
    /// of `per_page`.
    pub fn resolve(requested: Option<&str>, total: i64, per_page: i64) -> Self {
        let per_page = per_page.max(1);
        let num_pages = num_pages(total, per_page);

        let number = match requested.map(str::trim) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n.min(num_pages),
                Ok(_) => 1,
                // Digits too large for i64 are still past the end
                Err(_) if is_overflowing_digits(raw) => num_pages,
                Err(_) => 1,
            },
            None => 1,
        };

        Self {
            number,
            num_pages,
            offset: (number - 1) * per_page,
            limit: per_page,
        }
    }

    /// Wrap the fetched items into a page.
    pub fn into_page<T>(self, items: Vec<T>, total: i64) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            total,
        }
    }
}

fn is_overflowing_digits(raw: &str) -> bool {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Number of pages needed for `total` items; an empty sequence still has one.
fn num_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        1
    } else {
        (total + per_page - 1) / per_page
    }
}

/// One page of results with its position metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: i64,
    /// Total number of pages.
    pub num_pages: i64,
    /// Total number of items across all pages.
    pub total: i64,
}

impl<T> Page<T> {
    /// Whether a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Previous page number, if any.
    pub fn previous_page_number(&self) -> Option<i64> {
        self.has_previous().then(|| self.number - 1)
    }

    /// Next page number, if any.
    pub fn next_page_number(&self) -> Option<i64> {
        self.has_next().then(|| self.number + 1)
    }

    /// Metadata for templates.
    pub fn info(&self) -> PageInfo {
        PageInfo {
            number: self.number,
            num_pages: self.num_pages,
            has_previous: self.has_previous(),
            has_next: self.has_next(),
            previous_page_number: self.previous_page_number(),
            next_page_number: self.next_page_number(),
        }
    }
}

/// Serializable page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub number: i64,
    pub num_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: Option<i64>,
    pub next_page_number: Option<i64>,
}
