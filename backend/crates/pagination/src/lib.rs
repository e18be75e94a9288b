//! Page-number pagination primitives shared by applicant list endpoints.
//!
//! [`PageRequest`] normalises caller supplied page coordinates into a bounded,
//! 1-based window. [`Page`] is the response envelope carrying one slice of a
//! filtered result set together with the counts clients need to render page
//! controls.
//!
//! Out-of-range coordinates are clamped rather than rejected: a page below 1
//! becomes 1 and a page size above the ceiling becomes the ceiling.

use serde::{Deserialize, Serialize};

/// Largest page number a caller may request.
pub const MAX_PAGE: u32 = 10_000;

/// Largest number of items a single page may carry.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size applied when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Bounded 1-based page coordinates.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::clamped(Some(0), Some(500));
/// assert_eq!(request.page(), 1);
/// assert_eq!(request.page_size(), 100);
/// assert_eq!(request.offset(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from raw, possibly absent or negative, coordinates.
    ///
    /// Missing values fall back to page 1 and [`DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub fn clamped(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self::clamped_with_default(page, page_size, DEFAULT_PAGE_SIZE)
    }

    /// Same as [`PageRequest::clamped`] with an explicit default page size.
    #[must_use]
    pub fn clamped_with_default(
        page: Option<i64>,
        page_size: Option<i64>,
        default_page_size: u32,
    ) -> Self {
        let default_page_size = default_page_size.clamp(1, MAX_PAGE_SIZE);
        Self {
            page: page.map_or(1, |value| clamp_to(value, MAX_PAGE)),
            page_size: page_size.map_or(default_page_size, |value| clamp_to(value, MAX_PAGE_SIZE)),
        }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items preceding this page in the full result set.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

fn clamp_to(value: i64, max: u32) -> u32 {
    let bounded = value.clamp(1, i64::from(max));
    u32::try_from(bounded).unwrap_or(max)
}

/// One page of a filtered result set.
///
/// `total_count` always describes the full filtered set, before the page
/// window was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in result order.
    pub items: Vec<T>,
    /// Number of items matching the filter across all pages.
    pub total_count: u64,
    /// 1-based number of this page.
    pub current_page: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Number of pages needed to hold `total_count` items.
    pub total_pages: u64,
    /// Whether a page precedes this one.
    pub has_previous_page: bool,
    /// Whether a page follows this one.
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// Assemble an envelope for `items` fetched with `request`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let page = Page::new(vec!["a", "b"], 5, PageRequest::clamped(Some(2), Some(2)));
    /// assert_eq!(page.total_pages, 3);
    /// assert!(page.has_previous_page);
    /// assert!(page.has_next_page);
    /// ```
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        let total_pages = total_count.div_ceil(u64::from(request.page_size()));
        let current_page = request.page();
        Self {
            items,
            total_count,
            current_page,
            page_size: request.page_size(),
            total_pages,
            has_previous_page: current_page > 1,
            has_next_page: u64::from(current_page) < total_pages,
        }
    }

    /// Convert every item while keeping the page metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            current_page: self.current_page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}
