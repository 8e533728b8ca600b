use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};

use crate::{
    catalog::{BrowseOutcome, FetchTicket, ProductListView, RouteParams},
    error::{AppError, AppResult},
    middleware::session::SessionId,
    models::ProductCategory,
    response::{ApiResponse, Meta},
    routes::params::{PageQuery, PageSizeRequest},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/category", get(list_default_category))
        .route("/category/{id}", get(list_category))
        .route("/search/{keyword}", get(search))
        .route("/page-size", put(change_page_size))
}

pub fn categories_router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

type CatalogResponse = AppResult<(SessionId, Json<ApiResponse<ProductListView>>)>;

/// Run a ticket against the remote API and apply the result to the session.
/// The session entry is only locked before and after the fetch.
async fn run_ticket(state: &AppState, session: SessionId, ticket: FetchTicket) -> CatalogResponse {
    let result = ticket.request.send(state.api.as_ref()).await;
    let outcome = state
        .sessions
        .with(session.0, |s| s.browser.complete(ticket, result));
    match outcome {
        BrowseOutcome::Updated(view) => {
            let meta = Meta::from(view.page);
            Ok((session, Json(ApiResponse::success("Products", view, Some(meta)))))
        }
        BrowseOutcome::Stale => Err(AppError::Conflict(
            "superseded by a newer catalog request".into(),
        )),
        BrowseOutcome::Failed(err) => Err(err.into()),
    }
}

async fn browse(
    state: &AppState,
    session: SessionId,
    params: RouteParams,
    query: PageQuery,
) -> CatalogResponse {
    let ticket = state
        .sessions
        .with(session.0, |s| s.browser.begin(&params, query.normalize()))?;
    run_ticket(state, session, ticket).await
}

#[utoipa::path(
    get,
    path = "/api/catalog/category",
    params(PageQuery),
    responses(
        (status = 200, description = "Products of the default category", body = ApiResponse<ProductListView>),
        (status = 502, description = "Remote API failure"),
    ),
    tag = "Catalog"
)]
pub async fn list_default_category(
    State(state): State<AppState>,
    session: SessionId,
    Query(query): Query<PageQuery>,
) -> CatalogResponse {
    browse(&state, session, RouteParams::default(), query).await
}

#[utoipa::path(
    get,
    path = "/api/catalog/category/{id}",
    params(
        ("id" = String, Path, description = "Category ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Products of a category", body = ApiResponse<ProductListView>),
        (status = 400, description = "Invalid category id"),
        (status = 502, description = "Remote API failure"),
    ),
    tag = "Catalog"
)]
pub async fn list_category(
    State(state): State<AppState>,
    session: SessionId,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> CatalogResponse {
    browse(&state, session, RouteParams::category(id), query).await
}

#[utoipa::path(
    get,
    path = "/api/catalog/search/{keyword}",
    params(
        ("keyword" = String, Path, description = "Search keyword"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Products matching the keyword", body = ApiResponse<ProductListView>),
        (status = 502, description = "Remote API failure"),
    ),
    tag = "Catalog"
)]
pub async fn search(
    State(state): State<AppState>,
    session: SessionId,
    Path(keyword): Path<String>,
    Query(query): Query<PageQuery>,
) -> CatalogResponse {
    browse(&state, session, RouteParams::search(keyword), query).await
}

#[utoipa::path(
    put,
    path = "/api/catalog/page-size",
    request_body = PageSizeRequest,
    responses(
        (status = 200, description = "First page with the new page size", body = ApiResponse<ProductListView>)
    ),
    tag = "Catalog"
)]
pub async fn change_page_size(
    State(state): State<AppState>,
    session: SessionId,
    Json(payload): Json<PageSizeRequest>,
) -> CatalogResponse {
    let size = payload.normalize();
    let ticket = state
        .sessions
        .with(session.0, |s| s.browser.change_page_size(size));
    run_ticket(&state, session, ticket).await
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Product categories", body = ApiResponse<Vec<ProductCategory>>)
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ProductCategory>>>> {
    let categories = state.api.categories().await?;
    let total = categories.len() as i64;
    Ok(Json(ApiResponse::success(
        "Categories",
        categories,
        Some(Meta::new(1, total, total)),
    )))
}
