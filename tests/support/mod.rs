#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use eshop_storefront::{
    api::{ApiError, ApiResult, StorefrontApi},
    models::{
        Country, PageInfo, Product, ProductCategory, ProductPage, Purchase, PurchaseResponse,
        State,
    },
    state::AppState,
};
use rust_decimal::Decimal;

pub fn product(id: i64, category_id: i64, name: &str, price: Decimal) -> Product {
    Product {
        id,
        sku: Some(format!("SKU-{id:04}")),
        name: name.to_string(),
        description: None,
        unit_price: price,
        image_url: Some(format!("assets/images/products/{id}.png")),
        active: true,
        units_in_stock: 100,
        category_id: Some(category_id),
    }
}

/// In-memory remote API with a small catalog.
#[derive(Default)]
pub struct FakeApi {
    pub products: Vec<Product>,
    pub categories: Vec<ProductCategory>,
    pub countries: Vec<Country>,
    pub states: HashMap<String, Vec<State>>,
    pub failing: AtomicBool,
    pub calls: Mutex<Vec<String>>,
    pub orders: Mutex<Vec<Purchase>>,
}

impl FakeApi {
    pub fn seeded() -> Self {
        let mut products = Vec::new();
        for id in 1..=12 {
            products.push(product(
                id,
                1,
                &format!("Crash Course in Rust vol. {id}"),
                Decimal::new(1999, 2),
            ));
        }
        for id in 13..=15 {
            products.push(product(id, 2, &format!("Coffee Mug {id}"), Decimal::new(1850, 2)));
        }

        let mut states = HashMap::new();
        states.insert(
            "BR".to_string(),
            vec![
                State { id: 1, name: "Acre".into() },
                State { id: 2, name: "Alagoas".into() },
            ],
        );
        states.insert(
            "CA".to_string(),
            vec![
                State { id: 28, name: "Alberta".into() },
                State { id: 29, name: "British Columbia".into() },
            ],
        );

        Self {
            products,
            categories: vec![
                ProductCategory { id: 1, category_name: "Books".into() },
                ProductCategory { id: 2, category_name: "Coffee Mugs".into() },
            ],
            countries: vec![
                Country { id: 1, code: "BR".into(), name: "Brazil".into() },
                Country { id: 2, code: "CA".into(), name: "Canada".into() },
            ],
            states,
            ..Default::default()
        }
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Status { status: 503 });
        }
        Ok(())
    }

    fn page(matching: Vec<Product>, page_index: i64, page_size: i64) -> ProductPage {
        let total = matching.len() as i64;
        let products = matching
            .into_iter()
            .skip((page_index * page_size) as usize)
            .take(page_size as usize)
            .collect();
        ProductPage {
            products,
            page: PageInfo {
                number: page_index,
                size: page_size,
                total_elements: total,
                total_pages: (total + page_size - 1) / page_size,
            },
        }
    }
}

#[async_trait]
impl StorefrontApi for FakeApi {
    async fn products_by_category(
        &self,
        page_index: i64,
        page_size: i64,
        category_id: i64,
    ) -> ApiResult<ProductPage> {
        self.record(format!("category:{category_id}:{page_index}:{page_size}"))?;
        let matching = self
            .products
            .iter()
            .filter(|p| p.category_id == Some(category_id))
            .cloned()
            .collect();
        Ok(Self::page(matching, page_index, page_size))
    }

    async fn search_products(
        &self,
        page_index: i64,
        page_size: i64,
        keyword: &str,
    ) -> ApiResult<ProductPage> {
        self.record(format!("search:{keyword}:{page_index}:{page_size}"))?;
        let needle = keyword.to_lowercase();
        let matching = self
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Self::page(matching, page_index, page_size))
    }

    async fn product(&self, id: i64) -> ApiResult<Product> {
        self.record(format!("product:{id}"))?;
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn categories(&self) -> ApiResult<Vec<ProductCategory>> {
        self.record("categories".into())?;
        Ok(self.categories.clone())
    }

    async fn countries(&self) -> ApiResult<Vec<Country>> {
        self.record("countries".into())?;
        Ok(self.countries.clone())
    }

    async fn states(&self, country_code: &str) -> ApiResult<Vec<State>> {
        self.record(format!("states:{country_code}"))?;
        Ok(self.states.get(country_code).cloned().unwrap_or_default())
    }

    async fn place_order(&self, purchase: &Purchase) -> ApiResult<PurchaseResponse> {
        self.record("purchase".into())?;
        let mut orders = self.orders.lock().unwrap();
        orders.push(purchase.clone());
        Ok(PurchaseResponse {
            order_tracking_number: format!("TRACK-{:04}", orders.len()),
        })
    }
}

pub fn app_state(api: Arc<FakeApi>) -> AppState {
    AppState::new(api, 5)
}
