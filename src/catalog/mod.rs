pub mod browser;
pub mod pagination;

pub use browser::{
    BrowseOutcome, CatalogBrowser, CatalogFilter, FetchRequest, FetchTicket, ProductListView,
    RouteParams, DEFAULT_CATEGORY_ID,
};
pub use pagination::{PageView, PaginationTracker, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
