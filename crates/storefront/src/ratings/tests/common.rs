use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};

use crate::catalog::{
    ClientDirectory, ClientId, ClientRecord, DirectoryError, ProductCatalog, ProductId,
    ProductRecord,
};
use crate::ratings::domain::{InteractionEvent, InteractionKind, RatingRecord};
use crate::ratings::policy::InteractionWeights;
use crate::ratings::service::RatingInferenceService;
use crate::ratings::store::{
    RatingSignal, RatingStore, RatingStoreError, SignalPublisher, UpsertOutcome,
};

#[derive(Default, Clone)]
pub(super) struct MemoryClients {
    records: Arc<Mutex<HashMap<ClientId, ClientRecord>>>,
}

impl ClientDirectory for MemoryClients {
    fn register(&self, record: ClientRecord) -> Result<ClientRecord, DirectoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&record.id) {
            return Err(DirectoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ClientId) -> Result<Option<ClientRecord>, DirectoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn contains(&self, id: &ClientId) -> Result<bool, DirectoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.contains_key(id))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProducts {
    records: Arc<Mutex<HashMap<ProductId, ProductRecord>>>,
}

impl ProductCatalog for MemoryProducts {
    fn register(&self, record: ProductRecord) -> Result<ProductRecord, DirectoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&record.id) {
            return Err(DirectoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ProductId) -> Result<Option<ProductRecord>, DirectoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn contains(&self, id: &ProductId) -> Result<bool, DirectoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.contains_key(id))
    }

    fn list(&self) -> Result<Vec<ProductRecord>, DirectoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.values().cloned().collect())
    }
}

/// Coarse-grained store double. The whole-map mutex makes every upsert
/// atomic, which is all the service contract asks of a test double.
#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<HashMap<(ClientId, ProductId), RatingRecord>>>,
}

impl MemoryStore {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("lock").len()
    }
}

impl RatingStore for MemoryStore {
    fn find(
        &self,
        client_id: &ClientId,
        product_id: &ProductId,
    ) -> Result<Option<RatingRecord>, RatingStoreError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(&(client_id.clone(), product_id.clone())).cloned())
    }

    fn upsert_max(
        &self,
        client_id: &ClientId,
        product_id: &ProductId,
        candidate: f32,
        at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, RatingStoreError> {
        let mut guard = self.records.lock().expect("lock");
        let key = (client_id.clone(), product_id.clone());
        match guard.get_mut(&key) {
            Some(existing) if candidate > existing.value => {
                existing.value = candidate;
                existing.updated_at = at;
                Ok(UpsertOutcome::Updated(existing.clone()))
            }
            Some(existing) => Ok(UpsertOutcome::Unchanged(existing.clone())),
            None => {
                let record = RatingRecord {
                    client_id: client_id.clone(),
                    product_id: product_id.clone(),
                    value: candidate,
                    updated_at: at,
                };
                guard.insert(key, record.clone());
                Ok(UpsertOutcome::Created(record))
            }
        }
    }
}

/// Store double that fails every write, for persistence-error paths.
#[derive(Default, Clone)]
pub(super) struct BrokenStore;

impl RatingStore for BrokenStore {
    fn find(
        &self,
        _client_id: &ClientId,
        _product_id: &ProductId,
    ) -> Result<Option<RatingRecord>, RatingStoreError> {
        Err(RatingStoreError::Unavailable("store offline".to_string()))
    }

    fn upsert_max(
        &self,
        _client_id: &ClientId,
        _product_id: &ProductId,
        _candidate: f32,
        _at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, RatingStoreError> {
        Err(RatingStoreError::Unavailable("store offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySignals {
    signals: Arc<Mutex<Vec<RatingSignal>>>,
}

impl MemorySignals {
    pub(super) fn signals(&self) -> Vec<RatingSignal> {
        self.signals.lock().expect("lock").clone()
    }
}

impl SignalPublisher for MemorySignals {
    fn record(&self, signal: RatingSignal) {
        self.signals.lock().expect("lock").push(signal);
    }
}

pub(super) fn client(id: &str) -> ClientRecord {
    ClientRecord {
        id: ClientId(id.to_string()),
        display_name: format!("Shopper {id}"),
        registered_on: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
    }
}

pub(super) fn product(id: &str) -> ProductRecord {
    ProductRecord {
        id: ProductId(id.to_string()),
        name: format!("Product {id}"),
        unit_price_cents: 2499,
        listed_on: NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date"),
    }
}

pub(super) fn event(client_id: &str, product_id: &str, kind: InteractionKind) -> InteractionEvent {
    InteractionEvent {
        client_id: ClientId(client_id.to_string()),
        product_id: ProductId(product_id.to_string()),
        kind,
        quantity: None,
    }
}

pub(super) fn rating_event(client_id: &str, product_id: &str, value: i32) -> InteractionEvent {
    InteractionEvent {
        client_id: ClientId(client_id.to_string()),
        product_id: ProductId(product_id.to_string()),
        kind: InteractionKind::Rating,
        quantity: Some(value),
    }
}

pub(super) type MemoryService =
    RatingInferenceService<MemoryClients, MemoryProducts, MemoryStore, MemorySignals>;

/// Service over in-memory doubles with `client-1` and `product-1` seeded.
pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryClients>,
    Arc<MemoryProducts>,
    Arc<MemoryStore>,
    Arc<MemorySignals>,
) {
    let clients = Arc::new(MemoryClients::default());
    let products = Arc::new(MemoryProducts::default());
    let store = Arc::new(MemoryStore::default());
    let signals = Arc::new(MemorySignals::default());

    clients.register(client("client-1")).expect("seed client");
    products
        .register(product("product-1"))
        .expect("seed product");

    let service = RatingInferenceService::new(
        clients.clone(),
        products.clone(),
        store.clone(),
        signals.clone(),
        InteractionWeights::default(),
    );

    (service, clients, products, store, signals)
}
