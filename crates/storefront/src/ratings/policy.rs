use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{InteractionEvent, InteractionKind};

/// Scoring table mapping interaction kinds to candidate rating values.
///
/// The defaults are business constants, not derived numbers; deployments may
/// override them through configuration but the stock table must stay exactly
/// as listed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionWeights {
    pub view: f32,
    pub click: f32,
    pub search: f32,
    pub add_to_cart: f32,
    pub purchase: f32,
}

impl Default for InteractionWeights {
    fn default() -> Self {
        Self {
            view: 1.0,
            click: 2.0,
            search: 0.5,
            add_to_cart: 3.0,
            purchase: 5.0,
        }
    }
}

/// Pure mapping from an interaction event to a candidate rating. Stateless
/// apart from the weight table, so one instance can be shared across however
/// many threads deliver events.
#[derive(Debug, Clone, Default)]
pub struct RatingPolicy {
    weights: InteractionWeights,
}

impl RatingPolicy {
    pub fn new(weights: InteractionWeights) -> Self {
        Self { weights }
    }

    /// Score one event. `Ok(None)` means the event carries no rating signal
    /// and must not touch the store.
    pub fn score(&self, event: &InteractionEvent) -> Result<Option<f32>, PolicyError> {
        match event.kind {
            InteractionKind::View => Ok(Some(self.weights.view)),
            InteractionKind::Click => Ok(Some(self.weights.click)),
            InteractionKind::Search => Ok(Some(self.weights.search)),
            InteractionKind::AddToCart => Ok(Some(self.weights.add_to_cart)),
            InteractionKind::Purchase => Ok(Some(self.weights.purchase)),
            InteractionKind::Rating => {
                let value = event.quantity.ok_or(PolicyError::MissingRatingValue)?;
                if !(0..=5).contains(&value) {
                    return Err(PolicyError::OutOfRangeRating(value));
                }
                Ok(Some(value as f32))
            }
            InteractionKind::Other => {
                warn!(
                    client = %event.client_id,
                    product = %event.product_id,
                    "ignoring interaction with unrecognized kind"
                );
                Ok(None)
            }
        }
    }
}

/// Validation failures for explicit-rating events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("explicit rating events must carry a rating value")]
    MissingRatingValue,
    #[error("explicit rating {0} is outside the allowed 0-5 range")]
    OutOfRangeRating(i32),
}
