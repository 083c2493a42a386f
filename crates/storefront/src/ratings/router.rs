use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{InteractionEvent, InteractionKind, ProcessOutcome};
use super::service::{RatingInferenceService, RatingServiceError};
use super::store::{RatingStore, SignalPublisher};
use crate::catalog::{ClientDirectory, ClientId, ProductCatalog, ProductId};

/// Router builder exposing interaction ingestion and rating lookup.
pub fn rating_router<C, P, S, O>(service: Arc<RatingInferenceService<C, P, S, O>>) -> Router
where
    C: ClientDirectory + 'static,
    P: ProductCatalog + 'static,
    S: RatingStore + 'static,
    O: SignalPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/interactions",
            post(record_interaction_handler::<C, P, S, O>),
        )
        .route(
            "/api/v1/ratings/:client_id/:product_id",
            get(rating_lookup_handler::<C, P, S, O>),
        )
        .with_state(service)
}

/// Wire shape for one interaction. Unknown `interaction` strings map to the
/// no-score kind; missing required fields never reach the service.
#[derive(Debug, Deserialize)]
pub(crate) struct InteractionRequest {
    pub(crate) client_id: String,
    pub(crate) product_id: String,
    pub(crate) interaction: InteractionKind,
    #[serde(default)]
    pub(crate) quantity: Option<i32>,
}

pub(crate) async fn record_interaction_handler<C, P, S, O>(
    State(service): State<Arc<RatingInferenceService<C, P, S, O>>>,
    axum::Json(request): axum::Json<InteractionRequest>,
) -> Response
where
    C: ClientDirectory + 'static,
    P: ProductCatalog + 'static,
    S: RatingStore + 'static,
    O: SignalPublisher + 'static,
{
    let event = InteractionEvent {
        client_id: ClientId(request.client_id),
        product_id: ProductId(request.product_id),
        kind: request.interaction,
        quantity: request.quantity,
    };

    match service.process(event) {
        Ok(ProcessOutcome::Created(record)) => {
            (StatusCode::CREATED, axum::Json(record.view("created"))).into_response()
        }
        Ok(ProcessOutcome::Updated(record)) => {
            (StatusCode::OK, axum::Json(record.view("updated"))).into_response()
        }
        Ok(ProcessOutcome::Skipped(reason)) => {
            let payload = json!({
                "outcome": "skipped",
                "reason": reason.summary(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err @ RatingServiceError::UnknownClient(_))
        | Err(err @ RatingServiceError::UnknownProduct(_)) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(RatingServiceError::Policy(err)) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn rating_lookup_handler<C, P, S, O>(
    State(service): State<Arc<RatingInferenceService<C, P, S, O>>>,
    Path((client_id, product_id)): Path<(String, String)>,
) -> Response
where
    C: ClientDirectory + 'static,
    P: ProductCatalog + 'static,
    S: RatingStore + 'static,
    O: SignalPublisher + 'static,
{
    let client_id = ClientId(client_id);
    let product_id = ProductId(product_id);

    match service.rating(&client_id, &product_id) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record.view("stored"))).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("no rating stored for client '{client_id}' and product '{product_id}'"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
