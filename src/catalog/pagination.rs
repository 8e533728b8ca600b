use serde::Serialize;
use utoipa::ToSchema;

use super::browser::{CatalogFilter, DEFAULT_CATEGORY_ID};
use crate::models::PageInfo;

pub const DEFAULT_PAGE_SIZE: i64 = 5;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page metadata as shown to the user: one-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageView {
    pub page_number: i64,
    pub page_size: i64,
    pub total_elements: i64,
}

impl From<PageInfo> for PageView {
    fn from(page: PageInfo) -> Self {
        Self {
            page_number: page.number + 1,
            page_size: page.size,
            total_elements: page.total_elements,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Category,
    Search,
}

/// Remembers the last filter and the page cursor.
///
/// Any change of filter (a different category, a different keyword, or a
/// switch between category and search) sends the cursor back to page 1, so
/// the next request never asks for a page beyond the new result set.
#[derive(Debug, Clone)]
pub struct PaginationTracker {
    previous_mode: Mode,
    previous_category_id: Option<i64>,
    previous_keyword: Option<String>,
    page_number: i64,
    page_size: i64,
}

impl Default for PaginationTracker {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationTracker {
    /// Starts out as if the default category had already been shown, so a
    /// first visit to it keeps whatever page was asked for.
    pub fn new(page_size: i64) -> Self {
        Self {
            previous_mode: Mode::Category,
            previous_category_id: Some(DEFAULT_CATEGORY_ID),
            previous_keyword: None,
            page_number: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page_number(&self) -> i64 {
        self.page_number
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Zero-based index sent to the remote API.
    pub fn page_index(&self) -> i64 {
        self.page_number - 1
    }

    pub fn previous_category_id(&self) -> Option<i64> {
        self.previous_category_id
    }

    pub fn previous_keyword(&self) -> Option<&str> {
        self.previous_keyword.as_deref()
    }

    /// Compare `filter` with the remembered one, reset the cursor when they
    /// differ, then remember `filter`. Returns whether a reset happened.
    pub fn sync_filter(&mut self, filter: &CatalogFilter) -> bool {
        let changed = match filter {
            CatalogFilter::Category(id) => {
                self.previous_mode != Mode::Category
                    || self.previous_category_id != Some(*id)
            }
            CatalogFilter::Search(keyword) => {
                self.previous_mode != Mode::Search
                    || self.previous_keyword.as_deref() != Some(keyword.as_str())
            }
        };
        if changed {
            self.page_number = 1;
        }

        match filter {
            CatalogFilter::Category(id) => {
                self.previous_mode = Mode::Category;
                self.previous_category_id = Some(*id);
            }
            CatalogFilter::Search(keyword) => {
                self.previous_mode = Mode::Search;
                self.previous_keyword = Some(keyword.clone());
            }
        }
        changed
    }

    pub fn set_page_size(&mut self, size: i64) {
        self.page_size = size.max(1);
        self.page_number = 1;
    }

    pub fn go_to_page(&mut self, page_number: i64) {
        self.page_number = page_number.max(1);
    }

    /// Take page number and size from a response that was applied.
    pub fn sync_with(&mut self, page: &PageView) {
        self.page_number = page.page_number.max(1);
        self.page_size = page.page_size.max(1);
    }
}
