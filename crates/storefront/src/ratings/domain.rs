use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{ClientId, ProductId};

/// One shopper action against one catalog product. Constructed by whatever
/// delivers the event (HTTP handler, CSV replay), consumed exactly once by
/// the inference service, and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub client_id: ClientId,
    pub product_id: ProductId,
    pub kind: InteractionKind,
    /// Explicit rating value for [`InteractionKind::Rating`] events; carried
    /// opaquely for purchases.
    pub quantity: Option<i32>,
}

/// The interaction taxonomy the scoring policy understands. Wire values that
/// match none of the known kinds deserialize to [`InteractionKind::Other`]
/// and take the no-score path instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    View,
    Click,
    Search,
    AddToCart,
    Purchase,
    Rating,
    #[serde(other)]
    Other,
}

/// Persisted rating aggregate, at most one per (client, product) pair. Owned
/// by the store; the service only holds it for the duration of one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub client_id: ClientId,
    pub product_id: ProductId,
    pub value: f32,
    pub updated_at: DateTime<Utc>,
}

impl RatingRecord {
    pub fn view(&self, outcome_label: &'static str) -> RatingView {
        RatingView {
            client_id: self.client_id.clone(),
            product_id: self.product_id.clone(),
            value: self.value,
            updated_at: self.updated_at,
            outcome: outcome_label,
        }
    }
}

/// Result of pushing one event through the inference service.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// First interaction for the pair; a record was created.
    Created(RatingRecord),
    /// The candidate beat the stored value; the record was upgraded.
    Updated(RatingRecord),
    /// Nothing was written.
    Skipped(SkipReason),
}

/// Why a processed event produced no write.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The policy produced no candidate (unrecognized interaction kind).
    NoScore,
    /// The candidate did not beat the stored value.
    NotAnUpgrade { current: f32 },
}

impl SkipReason {
    pub fn summary(&self) -> String {
        match self {
            SkipReason::NoScore => "interaction kind produces no score".to_string(),
            SkipReason::NotAnUpgrade { current } => {
                format!("stored rating {current} already meets or beats the candidate")
            }
        }
    }
}

/// Sanitized representation of a rating for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct RatingView {
    pub client_id: ClientId,
    pub product_id: ProductId,
    pub value: f32,
    pub updated_at: DateTime<Utc>,
    pub outcome: &'static str,
}
