//! `reqwest` implementation of [`StorefrontApi`] against the Spring Data REST
//! backend. Collections arrive wrapped in a HAL `_embedded` envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use super::{ApiError, ApiResult, StorefrontApi};
use crate::models::{
    Country, PageInfo, Product, ProductCategory, ProductPage, Purchase, PurchaseResponse, State,
};

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Embedded<T> {
    #[serde(rename = "_embedded", default)]
    embedded: T,
}

#[derive(Debug, Deserialize)]
struct ProductsPageResponse {
    #[serde(rename = "_embedded", default)]
    embedded: ProductsBody,
    page: PageInfo,
}

#[derive(Debug, Default, Deserialize)]
struct ProductsBody {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Default, Deserialize)]
struct CategoriesBody {
    #[serde(rename = "productCategory", default)]
    product_category: Vec<ProductCategory>,
}

#[derive(Debug, Default, Deserialize)]
struct CountriesBody {
    #[serde(default)]
    countries: Vec<Country>,
}

#[derive(Debug, Default, Deserialize)]
struct StatesBody {
    #[serde(default)]
    states: Vec<State>,
}

#[derive(Debug, Clone)]
pub struct HttpStorefrontClient {
    client: Client,
    base_url: String,
}

impl HttpStorefrontClient {
    pub fn new(base_url: impl Into<String>, config: &HttpClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?query, "remote GET");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn page_query(page_index: i64, page_size: i64) -> [(&'static str, String); 2] {
    [
        ("page", page_index.to_string()),
        ("size", page_size.to_string()),
    ]
}

#[async_trait]
impl StorefrontApi for HttpStorefrontClient {
    async fn products_by_category(
        &self,
        page_index: i64,
        page_size: i64,
        category_id: i64,
    ) -> ApiResult<ProductPage> {
        let [page, size] = page_query(page_index, page_size);
        let body: ProductsPageResponse = self
            .get_json(
                "/products/search/findByCategoryId",
                &[("id", category_id.to_string()), page, size],
            )
            .await?;
        Ok(ProductPage {
            products: body.embedded.products,
            page: body.page,
        })
    }

    async fn search_products(
        &self,
        page_index: i64,
        page_size: i64,
        keyword: &str,
    ) -> ApiResult<ProductPage> {
        let [page, size] = page_query(page_index, page_size);
        let body: ProductsPageResponse = self
            .get_json(
                "/products/search/findByNameContaining",
                &[("name", keyword.to_string()), page, size],
            )
            .await?;
        Ok(ProductPage {
            products: body.embedded.products,
            page: body.page,
        })
    }

    async fn product(&self, id: i64) -> ApiResult<Product> {
        self.get_json(&format!("/products/{id}"), &[]).await
    }

    async fn categories(&self) -> ApiResult<Vec<ProductCategory>> {
        let body: Embedded<CategoriesBody> = self.get_json("/product-category", &[]).await?;
        Ok(body.embedded.product_category)
    }

    async fn countries(&self) -> ApiResult<Vec<Country>> {
        let body: Embedded<CountriesBody> = self.get_json("/countries", &[]).await?;
        Ok(body.embedded.countries)
    }

    async fn states(&self, country_code: &str) -> ApiResult<Vec<State>> {
        let body: Embedded<StatesBody> = self
            .get_json(
                "/states/search/findByCountryCode",
                &[("code", country_code.to_string())],
            )
            .await?;
        Ok(body.embedded.states)
    }

    async fn place_order(&self, purchase: &Purchase) -> ApiResult<PurchaseResponse> {
        let url = format!("{}/checkout/purchase", self.base_url);
        tracing::debug!(%url, items = purchase.order_items.len(), "remote POST purchase");
        let response = self
            .client
            .post(&url)
            .json(purchase)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(response).await
    }
}
