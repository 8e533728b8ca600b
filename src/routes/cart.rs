use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    cart::{Cart, CartTotals},
    error::{AppError, AppResult},
    middleware::session::SessionId,
    models::CartItem,
    response::{ApiResponse, Meta},
    routes::params::AddToCartRequest,
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            totals: cart.totals(),
        }
    }
}

type CartResponse = AppResult<(SessionId, Json<ApiResponse<CartView>>)>;

fn respond(session: SessionId, message: &str, view: CartView) -> CartResponse {
    let total = view.items.len() as i64;
    let meta = Meta::new(1, total, total);
    Ok((session, Json(ApiResponse::success(message, view, Some(meta)))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_details).post(add_to_cart))
        .route("/{product_id}", delete(remove_from_cart))
        .route("/{product_id}/decrement", post(decrement))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart items and totals for the session", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn cart_details(State(state): State<AppState>, session: SessionId) -> CartResponse {
    let view = state.sessions.read(session.0, |s| CartView::from(&s.cart));
    respond(session, "OK", view)
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add one unit of a product", body = ApiResponse<CartView>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<AddToCartRequest>,
) -> CartResponse {
    let product = state.api.product(payload.product_id).await?;
    let view = state.sessions.with(session.0, |s| {
        let item = s.cart.add(&product);
        tracing::info!(product_id = item.product_id, quantity = item.quantity, "added to cart");
        CartView::from(&s.cart)
    });
    respond(session, "Added to cart", view)
}

#[utoipa::path(
    post,
    path = "/api/cart/{product_id}/decrement",
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Remove one unit of a product", body = ApiResponse<CartView>),
        (status = 404, description = "Product not in cart"),
    ),
    tag = "Cart"
)]
pub async fn decrement(
    State(state): State<AppState>,
    session: SessionId,
    Path(product_id): Path<i64>,
) -> CartResponse {
    let view = state.sessions.with(session.0, |s| {
        s.cart
            .decrement(product_id)
            .then(|| CartView::from(&s.cart))
    });
    match view {
        Some(view) => respond(session, "OK", view),
        None => Err(AppError::NotFound),
    }
}

#[utoipa::path(
    delete,
    path = "/api/cart/{product_id}",
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Remove a line from the cart", body = ApiResponse<CartView>),
        (status = 404, description = "Product not in cart"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session: SessionId,
    Path(product_id): Path<i64>,
) -> CartResponse {
    let view = state.sessions.with(session.0, |s| {
        if s.cart.remove(product_id) {
            tracing::info!(product_id, "removed from cart");
            Some(CartView::from(&s.cart))
        } else {
            None
        }
    });
    match view {
        Some(view) => respond(session, "Removed from cart", view),
        None => Err(AppError::NotFound),
    }
}
