//! Catalog browsing: turn route parameters into a filter, drive the
//! pagination tracker and apply paginated responses to the view.
//!
//! Fetching is split into [`CatalogBrowser::begin`] and
//! [`CatalogBrowser::complete`] so the caller can release whatever guards the
//! browser while the request is in flight. Every ticket carries the
//! generation it was issued under; a response for an older generation is
//! dropped instead of overwriting a newer view.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::pagination::{PageView, PaginationTracker};
use crate::{
    api::{ApiError, ApiResult, StorefrontApi},
    error::{AppError, AppResult},
    models::{Product, ProductPage},
};

pub const DEFAULT_CATEGORY_ID: i64 = 1;

/// Navigation parameters, as raw strings from the route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteParams {
    pub id: Option<String>,
    pub keyword: Option<String>,
}

impl RouteParams {
    pub fn category(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            keyword: None,
        }
    }

    pub fn search(keyword: impl Into<String>) -> Self {
        Self {
            id: None,
            keyword: Some(keyword.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum CatalogFilter {
    Category(i64),
    Search(String),
}

impl CatalogFilter {
    /// Search mode when a keyword is present, category mode otherwise.
    pub fn from_params(params: &RouteParams) -> AppResult<Self> {
        if let Some(keyword) = &params.keyword {
            let keyword = keyword.trim();
            if keyword.is_empty() {
                return Err(AppError::BadRequest("search keyword must not be blank".into()));
            }
            return Ok(Self::Search(keyword.to_string()));
        }
        match params.id.as_deref() {
            None => Ok(Self::Category(DEFAULT_CATEGORY_ID)),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(Self::Category)
                .map_err(|_| AppError::BadRequest(format!("invalid category id '{raw}'"))),
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Self::Search(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub filter: CatalogFilter,
    pub page_index: i64,
    pub page_size: i64,
}

impl FetchRequest {
    pub async fn send(&self, api: &dyn StorefrontApi) -> ApiResult<ProductPage> {
        match &self.filter {
            CatalogFilter::Category(id) => {
                api.products_by_category(self.page_index, self.page_size, *id)
                    .await
            }
            CatalogFilter::Search(keyword) => {
                api.search_products(self.page_index, self.page_size, keyword)
                    .await
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub request: FetchRequest,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductListView {
    pub filter: CatalogFilter,
    pub products: Vec<Product>,
    pub page: PageView,
}

impl ProductListView {
    /// Map one paginated response onto the view; products and all three page
    /// fields come from the same response.
    pub fn from_response(filter: CatalogFilter, response: ProductPage) -> Self {
        Self {
            filter,
            products: response.products,
            page: PageView::from(response.page),
        }
    }
}

#[derive(Debug)]
pub enum BrowseOutcome {
    Updated(ProductListView),
    Stale,
    Failed(ApiError),
}

/// `tracker` and `filter` move as soon as a fetch is issued; `committed` and
/// `committed_filter` hold the state that produced the current view and are
/// restored when the latest fetch fails.
#[derive(Debug, Clone, Default)]
pub struct CatalogBrowser {
    tracker: PaginationTracker,
    filter: Option<CatalogFilter>,
    committed: PaginationTracker,
    committed_filter: Option<CatalogFilter>,
    generation: u64,
    view: Option<ProductListView>,
}

impl CatalogBrowser {
    pub fn new(page_size: i64) -> Self {
        let tracker = PaginationTracker::new(page_size);
        Self {
            committed: tracker.clone(),
            tracker,
            ..Default::default()
        }
    }

    pub fn tracker(&self) -> &PaginationTracker {
        &self.tracker
    }

    pub fn view(&self) -> Option<&ProductListView> {
        self.view.as_ref()
    }

    pub fn current_filter(&self) -> Option<&CatalogFilter> {
        self.filter.as_ref()
    }

    /// Start a fetch for a navigation change. `page` is the one-based page
    /// the user asked for, if any; a filter change still forces page 1.
    pub fn begin(&mut self, params: &RouteParams, page: Option<i64>) -> AppResult<FetchTicket> {
        let filter = CatalogFilter::from_params(params)?;
        if let Some(page) = page {
            self.tracker.go_to_page(page);
        }
        if self.tracker.sync_filter(&filter) {
            tracing::debug!(?filter, "catalog filter changed, page reset to 1");
        }
        self.filter = Some(filter.clone());
        Ok(self.issue(filter))
    }

    /// Change the page size and refetch the current filter from page 1.
    pub fn change_page_size(&mut self, size: i64) -> FetchTicket {
        self.tracker.set_page_size(size);
        let filter = self
            .filter
            .clone()
            .unwrap_or(CatalogFilter::Category(DEFAULT_CATEGORY_ID));
        self.tracker.sync_filter(&filter);
        self.filter = Some(filter.clone());
        self.issue(filter)
    }

    fn issue(&mut self, filter: CatalogFilter) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            request: FetchRequest {
                filter,
                page_index: self.tracker.page_index(),
                page_size: self.tracker.page_size(),
            },
        }
    }

    pub fn complete(&mut self, ticket: FetchTicket, result: ApiResult<ProductPage>) -> BrowseOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale catalog response"
            );
            return BrowseOutcome::Stale;
        }
        match result {
            Ok(response) => {
                let view = ProductListView::from_response(ticket.request.filter, response);
                self.tracker.sync_with(&view.page);
                self.committed = self.tracker.clone();
                self.committed_filter = Some(view.filter.clone());
                self.view = Some(view.clone());
                BrowseOutcome::Updated(view)
            }
            Err(err) => {
                tracing::warn!(error = %err, filter = ?ticket.request.filter, "catalog fetch failed, keeping previous page");
                self.tracker = self.committed.clone();
                self.filter = self.committed_filter.clone();
                BrowseOutcome::Failed(err)
            }
        }
    }

    /// Begin, fetch and complete in one go, for callers that own the browser.
    pub async fn browse(
        &mut self,
        api: &dyn StorefrontApi,
        params: &RouteParams,
        page: Option<i64>,
    ) -> AppResult<BrowseOutcome> {
        let ticket = self.begin(params, page)?;
        let result = ticket.request.send(api).await;
        Ok(self.complete(ticket, result))
    }
}
