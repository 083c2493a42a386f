use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ClientId, ClientRecord, ProductId, ProductRecord};
use super::repository::{ClientDirectory, DirectoryError, ProductCatalog};

/// Shared handler state bundling both directories.
pub struct CatalogState<C, P> {
    pub clients: Arc<C>,
    pub products: Arc<P>,
}

impl<C, P> Clone for CatalogState<C, P> {
    fn clone(&self) -> Self {
        Self {
            clients: self.clients.clone(),
            products: self.products.clone(),
        }
    }
}

/// Router builder exposing registration and lookup endpoints. Handlers
/// forward straight to the directory traits; there is no service layer to
/// put between them.
pub fn catalog_router<C, P>(clients: Arc<C>, products: Arc<P>) -> Router
where
    C: ClientDirectory + 'static,
    P: ProductCatalog + 'static,
{
    Router::new()
        .route("/api/v1/clients", post(register_client_handler::<C, P>))
        .route(
            "/api/v1/clients/:client_id",
            get(client_lookup_handler::<C, P>),
        )
        .route(
            "/api/v1/catalog/products",
            post(register_product_handler::<C, P>).get(list_products_handler::<C, P>),
        )
        .route(
            "/api/v1/catalog/products/:product_id",
            get(product_lookup_handler::<C, P>),
        )
        .with_state(CatalogState { clients, products })
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterClientRequest {
    pub(crate) id: String,
    pub(crate) display_name: String,
    #[serde(default)]
    pub(crate) registered_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterProductRequest {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) unit_price_cents: u32,
    #[serde(default)]
    pub(crate) listed_on: Option<NaiveDate>,
}

pub(crate) async fn register_client_handler<C, P>(
    State(state): State<CatalogState<C, P>>,
    axum::Json(request): axum::Json<RegisterClientRequest>,
) -> Response
where
    C: ClientDirectory + 'static,
    P: ProductCatalog + 'static,
{
    let record = ClientRecord {
        id: ClientId(request.id),
        display_name: request.display_name,
        registered_on: request
            .registered_on
            .unwrap_or_else(|| Local::now().date_naive()),
    };

    match state.clients.register(record) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(err) => directory_error_response(err),
    }
}

pub(crate) async fn client_lookup_handler<C, P>(
    State(state): State<CatalogState<C, P>>,
    Path(client_id): Path<String>,
) -> Response
where
    C: ClientDirectory + 'static,
    P: ProductCatalog + 'static,
{
    let id = ClientId(client_id);
    match state.clients.fetch(&id) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record)).into_response(),
        Ok(None) => not_found_response("client", &id.0),
        Err(err) => directory_error_response(err),
    }
}

pub(crate) async fn register_product_handler<C, P>(
    State(state): State<CatalogState<C, P>>,
    axum::Json(request): axum::Json<RegisterProductRequest>,
) -> Response
where
    C: ClientDirectory + 'static,
    P: ProductCatalog + 'static,
{
    let record = ProductRecord {
        id: ProductId(request.id),
        name: request.name,
        unit_price_cents: request.unit_price_cents,
        listed_on: request
            .listed_on
            .unwrap_or_else(|| Local::now().date_naive()),
    };

    match state.products.register(record) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(err) => directory_error_response(err),
    }
}

pub(crate) async fn list_products_handler<C, P>(
    State(state): State<CatalogState<C, P>>,
) -> Response
where
    C: ClientDirectory + 'static,
    P: ProductCatalog + 'static,
{
    match state.products.list() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(err) => directory_error_response(err),
    }
}

pub(crate) async fn product_lookup_handler<C, P>(
    State(state): State<CatalogState<C, P>>,
    Path(product_id): Path<String>,
) -> Response
where
    C: ClientDirectory + 'static,
    P: ProductCatalog + 'static,
{
    let id = ProductId(product_id);
    match state.products.fetch(&id) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record)).into_response(),
        Ok(None) => not_found_response("product", &id.0),
        Err(err) => directory_error_response(err),
    }
}

fn not_found_response(entity: &str, id: &str) -> Response {
    let payload = json!({
        "error": format!("{entity} '{id}' is not registered"),
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn directory_error_response(err: DirectoryError) -> Response {
    let status = match err {
        DirectoryError::Conflict => StatusCode::CONFLICT,
        DirectoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
