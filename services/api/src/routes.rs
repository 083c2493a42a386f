use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use storefront::catalog::{catalog_router, ClientDirectory, ProductCatalog};
use storefront::ratings::{rating_router, RatingInferenceService, RatingStore, SignalPublisher};

/// Compose the interaction, rating, catalog, and operational routes into
/// one application router.
pub(crate) fn with_storefront_routes<C, P, S, O>(
    service: Arc<RatingInferenceService<C, P, S, O>>,
    clients: Arc<C>,
    products: Arc<P>,
) -> axum::Router
where
    C: ClientDirectory + 'static,
    P: ProductCatalog + 'static,
    S: RatingStore + 'static,
    O: SignalPublisher + 'static,
{
    rating_router(service)
        .merge(catalog_router(clients, products))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
