use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{catalog::MAX_PAGE_SIZE, checkout::AddressSection};

/// One-based page requested by the browser.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn normalize(&self) -> Option<i64> {
        self.page.map(|page| page.max(1))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PageSizeRequest {
    pub size: i64,
}

impl PageSizeRequest {
    pub const MAX: i64 = MAX_PAGE_SIZE;

    pub fn normalize(&self) -> i64 {
        self.size.clamp(1, Self::MAX)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatesRequest {
    pub section: AddressSection,
    pub country_code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BillingCopyRequest {
    pub enabled: bool,
}
