use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::RatingRecord;
use crate::catalog::{ClientId, ProductId};

/// Storage abstraction keyed by (client, product) so the inference service
/// can be exercised in isolation.
///
/// `upsert_max` is the conditional-write primitive the upgrade-only merge
/// rides on: implementations must apply the compare-and-set atomically per
/// key, so that two racing candidates for the same pair can never both read
/// a stale value and clobber each other. Distinct pairs must not contend on
/// a common lock.
pub trait RatingStore: Send + Sync {
    fn find(
        &self,
        client_id: &ClientId,
        product_id: &ProductId,
    ) -> Result<Option<RatingRecord>, RatingStoreError>;

    /// Create the record when absent; raise `value` and `updated_at` when
    /// `candidate` is strictly greater than the stored value; otherwise leave
    /// the record untouched and report it back.
    fn upsert_max(
        &self,
        client_id: &ClientId,
        product_id: &ProductId,
        candidate: f32,
        at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, RatingStoreError>;
}

/// What the conditional write did.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Created(RatingRecord),
    Updated(RatingRecord),
    /// The stored record won; returned so callers can report the current value.
    Unchanged(RatingRecord),
}

/// Error enumeration for store failures. Callers own redelivery policy;
/// replaying the same event after a failure is safe because the merge rule
/// is idempotent.
#[derive(Debug, thiserror::Error)]
pub enum RatingStoreError {
    #[error("rating store unavailable: {0}")]
    Unavailable(String),
}

/// Outcome notifications the service emits once per processed event.
/// Deliberately infallible: observability must never fail event processing.
pub trait SignalPublisher: Send + Sync {
    fn record(&self, signal: RatingSignal);
}

/// Per-event processing outcome, with stable labels for counter backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingSignal {
    Created,
    Updated,
    SkippedNoUpgrade,
    SkippedNoScore,
    Error,
}

impl RatingSignal {
    pub fn label(&self) -> &'static str {
        match self {
            RatingSignal::Created => "created",
            RatingSignal::Updated => "updated",
            RatingSignal::SkippedNoUpgrade => "skipped_no_upgrade",
            RatingSignal::SkippedNoScore => "skipped_no_score",
            RatingSignal::Error => "error",
        }
    }
}
