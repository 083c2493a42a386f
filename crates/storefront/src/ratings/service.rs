use std::sync::Arc;

use chrono::Utc;

use super::domain::{InteractionEvent, ProcessOutcome, RatingRecord, SkipReason};
use super::policy::{InteractionWeights, PolicyError, RatingPolicy};
use super::store::{RatingSignal, RatingStore, RatingStoreError, SignalPublisher, UpsertOutcome};
use crate::catalog::{ClientDirectory, ClientId, DirectoryError, ProductCatalog, ProductId};

/// Service turning interaction events into at most one rating write each,
/// composed from the client/product directories, the rating store, and the
/// outcome signal publisher.
pub struct RatingInferenceService<C, P, S, O> {
    clients: Arc<C>,
    products: Arc<P>,
    store: Arc<S>,
    signals: Arc<O>,
    policy: RatingPolicy,
}

impl<C, P, S, O> RatingInferenceService<C, P, S, O>
where
    C: ClientDirectory + 'static,
    P: ProductCatalog + 'static,
    S: RatingStore + 'static,
    O: SignalPublisher + 'static,
{
    pub fn new(
        clients: Arc<C>,
        products: Arc<P>,
        store: Arc<S>,
        signals: Arc<O>,
        weights: InteractionWeights,
    ) -> Self {
        Self {
            clients,
            products,
            store,
            signals,
            policy: RatingPolicy::new(weights),
        }
    }

    /// Process one event: validate the pair, score it, and merge the
    /// candidate under the upgrade-only rule. Exactly one signal fires per
    /// call and at most one store write happens.
    ///
    /// Validation and store failures return synchronously; nothing here
    /// retries. Redelivering the same event later is always safe because a
    /// candidate that already applied can never upgrade twice.
    pub fn process(&self, event: InteractionEvent) -> Result<ProcessOutcome, RatingServiceError> {
        if !self
            .clients
            .contains(&event.client_id)
            .map_err(|err| self.fail(err.into()))?
        {
            return Err(self.fail(RatingServiceError::UnknownClient(event.client_id)));
        }

        if !self
            .products
            .contains(&event.product_id)
            .map_err(|err| self.fail(err.into()))?
        {
            return Err(self.fail(RatingServiceError::UnknownProduct(event.product_id)));
        }

        let candidate = match self.policy.score(&event) {
            Ok(Some(candidate)) => candidate,
            Ok(None) => {
                self.signals.record(RatingSignal::SkippedNoScore);
                return Ok(ProcessOutcome::Skipped(SkipReason::NoScore));
            }
            Err(err) => return Err(self.fail(err.into())),
        };

        let outcome = self
            .store
            .upsert_max(&event.client_id, &event.product_id, candidate, Utc::now())
            .map_err(|err| self.fail(err.into()))?;

        Ok(match outcome {
            UpsertOutcome::Created(record) => {
                self.signals.record(RatingSignal::Created);
                ProcessOutcome::Created(record)
            }
            UpsertOutcome::Updated(record) => {
                self.signals.record(RatingSignal::Updated);
                ProcessOutcome::Updated(record)
            }
            UpsertOutcome::Unchanged(record) => {
                self.signals.record(RatingSignal::SkippedNoUpgrade);
                ProcessOutcome::Skipped(SkipReason::NotAnUpgrade {
                    current: record.value,
                })
            }
        })
    }

    /// Read path for API responses; no signal fires for plain lookups.
    pub fn rating(
        &self,
        client_id: &ClientId,
        product_id: &ProductId,
    ) -> Result<Option<RatingRecord>, RatingServiceError> {
        Ok(self.store.find(client_id, product_id)?)
    }

    fn fail(&self, err: RatingServiceError) -> RatingServiceError {
        self.signals.record(RatingSignal::Error);
        err
    }
}

/// Error raised by the inference service.
#[derive(Debug, thiserror::Error)]
pub enum RatingServiceError {
    #[error("client '{0}' is not registered")]
    UnknownClient(ClientId),
    #[error("product '{0}' is not listed")]
    UnknownProduct(ProductId),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Store(#[from] RatingStoreError),
}
