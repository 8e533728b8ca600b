use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::CartTotals,
    catalog::{CatalogFilter, PageView, ProductListView},
    checkout::{
        AddressForm, AddressSection, CheckoutForm, CreditCardForm, CustomerForm, FieldError,
        FieldErrorKind,
    },
    models::{
        Address, CartItem, Country, Customer, Order, OrderItem, PageInfo, Product,
        ProductCategory, Purchase, PurchaseResponse, State,
    },
    response::{ApiResponse, Meta},
    routes::{cart, catalog, checkout, health, params, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        catalog::list_default_category,
        catalog::list_category,
        catalog::search,
        catalog::change_page_size,
        catalog::list_categories,
        products::get_product,
        cart::cart_details,
        cart::add_to_cart,
        cart::decrement,
        cart::remove_from_cart,
        checkout::checkout_details,
        checkout::update_form,
        checkout::reference_data,
        checkout::load_states,
        checkout::copy_shipping_to_billing,
        checkout::purchase
    ),
    components(
        schemas(
            Product,
            ProductCategory,
            CartItem,
            Country,
            State,
            PageInfo,
            Customer,
            Address,
            Order,
            OrderItem,
            Purchase,
            PurchaseResponse,
            CatalogFilter,
            PageView,
            ProductListView,
            CartTotals,
            cart::CartView,
            CustomerForm,
            AddressForm,
            CreditCardForm,
            CheckoutForm,
            AddressSection,
            FieldError,
            FieldErrorKind,
            checkout::CheckoutView,
            checkout::ReferenceData,
            checkout::StatesView,
            params::PageSizeRequest,
            params::AddToCartRequest,
            params::StatesRequest,
            params::BillingCopyRequest,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductListView>,
            ApiResponse<cart::CartView>,
            ApiResponse<checkout::CheckoutView>,
            ApiResponse<PurchaseResponse>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Category and search browsing"),
        (name = "Products", description = "Product endpoints"),
        (name = "Cart", description = "Session cart endpoints"),
        (name = "Checkout", description = "Checkout form and purchase endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
