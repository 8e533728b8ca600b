//! Client side of the remote product/order API.
//!
//! Handlers and the catalog browser only ever see [`StorefrontApi`], so the
//! HTTP client can be swapped for an in-memory double in tests.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Country, Product, ProductCategory, ProductPage, Purchase, PurchaseResponse, State};

pub mod http;

pub use http::{HttpClientConfig, HttpStorefrontClient};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,

    #[error("remote API responded with status {status}")]
    Status { status: u16 },

    #[error("remote API request failed: {0}")]
    Transport(String),

    #[error("could not decode remote API response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Fetch one page of products belonging to a category.
    async fn products_by_category(
        &self,
        page_index: i64,
        page_size: i64,
        category_id: i64,
    ) -> ApiResult<ProductPage>;

    /// Fetch one page of products whose name contains `keyword`.
    async fn search_products(
        &self,
        page_index: i64,
        page_size: i64,
        keyword: &str,
    ) -> ApiResult<ProductPage>;

    async fn product(&self, id: i64) -> ApiResult<Product>;

    async fn categories(&self) -> ApiResult<Vec<ProductCategory>>;

    async fn countries(&self) -> ApiResult<Vec<Country>>;

    async fn states(&self, country_code: &str) -> ApiResult<Vec<State>>;

    async fn place_order(&self, purchase: &Purchase) -> ApiResult<PurchaseResponse>;
}

pub type SharedApi = Arc<dyn StorefrontApi>;
