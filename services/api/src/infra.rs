use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use metrics_exporter_prometheus::PrometheusHandle;
use storefront::catalog::{
    ClientDirectory, ClientId, ClientRecord, DirectoryError, ProductCatalog, ProductId,
    ProductRecord,
};
use storefront::ratings::{
    RatingRecord, RatingSignal, RatingStore, RatingStoreError, SignalPublisher, UpsertOutcome,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryClientDirectory {
    records: Arc<Mutex<HashMap<ClientId, ClientRecord>>>,
}

impl ClientDirectory for InMemoryClientDirectory {
    fn register(&self, record: ClientRecord) -> Result<ClientRecord, DirectoryError> {
        let mut guard = self.records.lock().expect("client directory mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(DirectoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ClientId) -> Result<Option<ClientRecord>, DirectoryError> {
        let guard = self.records.lock().expect("client directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn contains(&self, id: &ClientId) -> Result<bool, DirectoryError> {
        let guard = self.records.lock().expect("client directory mutex poisoned");
        Ok(guard.contains_key(id))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProductCatalog {
    records: Arc<Mutex<HashMap<ProductId, ProductRecord>>>,
}

impl ProductCatalog for InMemoryProductCatalog {
    fn register(&self, record: ProductRecord) -> Result<ProductRecord, DirectoryError> {
        let mut guard = self.records.lock().expect("product catalog mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(DirectoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ProductId) -> Result<Option<ProductRecord>, DirectoryError> {
        let guard = self.records.lock().expect("product catalog mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn contains(&self, id: &ProductId) -> Result<bool, DirectoryError> {
        let guard = self.records.lock().expect("product catalog mutex poisoned");
        Ok(guard.contains_key(id))
    }

    fn list(&self) -> Result<Vec<ProductRecord>, DirectoryError> {
        let guard = self.records.lock().expect("product catalog mutex poisoned");
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
    }
}

/// Sharded in-memory rating store. The entry API holds the shard guard
/// across the compare-and-set, so concurrent candidates for one pair can
/// never both observe a stale value, and pairs on different shards never
/// wait on each other.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRatingStore {
    records: Arc<DashMap<(ClientId, ProductId), RatingRecord>>,
}

impl InMemoryRatingStore {
    pub(crate) fn all(&self) -> Vec<RatingRecord> {
        let mut records: Vec<_> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| {
            (a.client_id.0.as_str(), a.product_id.0.as_str())
                .cmp(&(b.client_id.0.as_str(), b.product_id.0.as_str()))
        });
        records
    }
}

impl RatingStore for InMemoryRatingStore {
    fn find(
        &self,
        client_id: &ClientId,
        product_id: &ProductId,
    ) -> Result<Option<RatingRecord>, RatingStoreError> {
        Ok(self
            .records
            .get(&(client_id.clone(), product_id.clone()))
            .map(|entry| entry.value().clone()))
    }

    fn upsert_max(
        &self,
        client_id: &ClientId,
        product_id: &ProductId,
        candidate: f32,
        at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, RatingStoreError> {
        match self.records.entry((client_id.clone(), product_id.clone())) {
            Entry::Occupied(mut slot) => {
                if candidate > slot.get().value {
                    let record = slot.get_mut();
                    record.value = candidate;
                    record.updated_at = at;
                    Ok(UpsertOutcome::Updated(record.clone()))
                } else {
                    Ok(UpsertOutcome::Unchanged(slot.get().clone()))
                }
            }
            Entry::Vacant(slot) => {
                let record = RatingRecord {
                    client_id: client_id.clone(),
                    product_id: product_id.clone(),
                    value: candidate,
                    updated_at: at,
                };
                slot.insert(record.clone());
                Ok(UpsertOutcome::Created(record))
            }
        }
    }
}

/// Publishes outcome signals as Prometheus counters through the `metrics`
/// facade; the exporter installed in `server.rs` renders them at `/metrics`.
#[derive(Default, Clone, Copy)]
pub(crate) struct MetricsSignalPublisher;

impl SignalPublisher for MetricsSignalPublisher {
    fn record(&self, signal: RatingSignal) {
        metrics::counter!("rating_inference_outcomes_total", "outcome" => signal.label())
            .increment(1);
    }
}
