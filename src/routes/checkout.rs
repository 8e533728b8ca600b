use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use chrono::{Datelike, Local};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    cart::CartTotals,
    checkout::{
        AddressSection, CheckoutForm, SubmitOutcome,
        reference::{credit_card_years, expiry_months_for},
    },
    error::{AppError, AppResult},
    middleware::session::SessionId,
    models::{Country, PurchaseResponse, State as CountryState},
    response::{ApiResponse, Meta},
    routes::params::{BillingCopyRequest, StatesRequest},
    session::Session,
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutView {
    pub form: CheckoutForm,
    pub touched: Vec<String>,
    pub shipping_states: Vec<CountryState>,
    pub billing_states: Vec<CountryState>,
    pub billing_same_as_shipping: bool,
    pub totals: CartTotals,
}

impl From<&Session> for CheckoutView {
    fn from(session: &Session) -> Self {
        let checkout = &session.checkout;
        Self {
            form: checkout.form().clone(),
            touched: checkout.touched().map(str::to_string).collect(),
            shipping_states: checkout.states(AddressSection::Shipping).to_vec(),
            billing_states: checkout.states(AddressSection::Billing).to_vec(),
            billing_same_as_shipping: checkout.billing_same_as_shipping(),
            totals: session.cart.totals(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReferenceData {
    pub countries: Vec<Country>,
    pub credit_card_months: Vec<u32>,
    pub credit_card_years: Vec<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatesView {
    pub states: Vec<CountryState>,
    pub selected: Option<CountryState>,
}

type CheckoutResponse = AppResult<(SessionId, Json<ApiResponse<CheckoutView>>)>;

fn respond(session: SessionId, view: CheckoutView) -> CheckoutResponse {
    Ok((session, Json(ApiResponse::success("Checkout", view, Some(Meta::empty())))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout_details))
        .route("/form", put(update_form))
        .route("/reference", get(reference_data))
        .route("/states", post(load_states))
        .route("/billing-copy", post(copy_shipping_to_billing))
        .route("/purchase", post(purchase))
}

#[utoipa::path(
    get,
    path = "/api/checkout",
    responses(
        (status = 200, description = "Checkout form state and cart totals", body = ApiResponse<CheckoutView>)
    ),
    tag = "Checkout"
)]
pub async fn checkout_details(State(state): State<AppState>, session: SessionId) -> CheckoutResponse {
    let view = state.sessions.read(session.0, |s| CheckoutView::from(s));
    respond(session, view)
}

#[utoipa::path(
    put,
    path = "/api/checkout/form",
    request_body = CheckoutForm,
    responses(
        (status = 200, description = "Replace the form values", body = ApiResponse<CheckoutView>)
    ),
    tag = "Checkout"
)]
pub async fn update_form(
    State(state): State<AppState>,
    session: SessionId,
    Json(form): Json<CheckoutForm>,
) -> CheckoutResponse {
    let view = state.sessions.with(session.0, |s| {
        s.checkout.set_form(form);
        CheckoutView::from(&*s)
    });
    respond(session, view)
}

#[utoipa::path(
    get,
    path = "/api/checkout/reference",
    responses(
        (status = 200, description = "Countries and credit card expiry ranges", body = ApiResponse<ReferenceData>),
        (status = 502, description = "Remote API failure"),
    ),
    tag = "Checkout"
)]
pub async fn reference_data(
    State(state): State<AppState>,
    session: SessionId,
) -> AppResult<(SessionId, Json<ApiResponse<ReferenceData>>)> {
    let countries = state.api.countries().await?;
    let today = Local::now().date_naive();
    let selected_year = state
        .sessions
        .read(session.0, |s| s.checkout.form().credit_card.expiration_year);
    let data = ReferenceData {
        countries,
        credit_card_months: expiry_months_for(selected_year, today),
        credit_card_years: credit_card_years(today.year()),
    };
    Ok((session, Json(ApiResponse::success("Reference data", data, None))))
}

#[utoipa::path(
    post,
    path = "/api/checkout/states",
    request_body = StatesRequest,
    responses(
        (status = 200, description = "States of the selected country; the first is selected", body = ApiResponse<StatesView>),
        (status = 409, description = "Country changed while the lookup was in flight"),
        (status = 502, description = "Remote API failure"),
    ),
    tag = "Checkout"
)]
pub async fn load_states(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<StatesRequest>,
) -> AppResult<(SessionId, Json<ApiResponse<StatesView>>)> {
    let code = payload.country_code.trim().to_string();
    if code.is_empty() {
        return Err(AppError::BadRequest("country_code is required".into()));
    }
    state
        .sessions
        .with(session.0, |s| s.checkout.select_country(payload.section, &code));

    let states = state.api.states(&code).await?;

    let view = state.sessions.with(session.0, |s| {
        let form = s.checkout.form();
        let current = match payload.section {
            AddressSection::Shipping => &form.shipping_address.country,
            AddressSection::Billing => &form.billing_address.country,
        };
        if current.as_deref() != Some(code.as_str()) {
            return None;
        }
        let selected = s.checkout.apply_states(payload.section, states).cloned();
        Some(StatesView {
            states: s.checkout.states(payload.section).to_vec(),
            selected,
        })
    });

    match view {
        Some(view) => Ok((session, Json(ApiResponse::success("States", view, None)))),
        None => Err(AppError::Conflict(
            "country selection changed during the lookup".into(),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/api/checkout/billing-copy",
    request_body = BillingCopyRequest,
    responses(
        (status = 200, description = "Copy shipping into billing, or clear billing", body = ApiResponse<CheckoutView>)
    ),
    tag = "Checkout"
)]
pub async fn copy_shipping_to_billing(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<BillingCopyRequest>,
) -> CheckoutResponse {
    let view = state.sessions.with(session.0, |s| {
        s.checkout.copy_shipping_to_billing(payload.enabled);
        CheckoutView::from(&*s)
    });
    respond(session, view)
}

#[utoipa::path(
    post,
    path = "/api/checkout/purchase",
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<PurchaseResponse>),
        (status = 400, description = "Cart is empty"),
        (status = 422, description = "Form is invalid; every field is marked touched"),
        (status = 502, description = "Remote API failure"),
    ),
    tag = "Checkout"
)]
pub async fn purchase(
    State(state): State<AppState>,
    session: SessionId,
) -> AppResult<(SessionId, Json<ApiResponse<PurchaseResponse>>)> {
    let outcome = state
        .sessions
        .with(session.0, |s| s.checkout.submit(&s.cart));
    let purchase = match outcome {
        SubmitOutcome::Invalid(errors) => return Err(AppError::Validation(errors)),
        SubmitOutcome::Ready(purchase) => purchase,
    };
    if purchase.order_items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let response = state.api.place_order(&purchase).await?;
    tracing::info!(
        tracking_number = %response.order_tracking_number,
        total_quantity = purchase.order.total_quantity,
        total_price = %purchase.order.total_price,
        "order placed"
    );

    state.sessions.with(session.0, |s| {
        s.cart.clear();
        s.checkout.reset();
    });

    Ok((
        session,
        Json(ApiResponse::success("Order placed", response, Some(Meta::empty()))),
    ))
}
