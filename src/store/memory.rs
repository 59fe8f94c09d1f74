use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use super::RecordStore;
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::error::StoreError;

// =============================================================================
// 1. THE MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum StoreRequest {
    List {
        respond_to: Response<Vec<Product>>,
    },
    Create {
        payload: ProductCreate,
        respond_to: Response<Product>,
    },
    Update {
        id: String,
        patch: ProductPatch,
        respond_to: Response<Product>,
    },
    Delete {
        id: String,
        respond_to: Response<()>,
    },
}

// =============================================================================
// 2. THE ACTOR
// =============================================================================

/// An in-process record service.
///
/// Behaves like the hosted collection: it assigns ids, skus and timestamps,
/// keeps records in insertion order and rejects invalid prices. Used by the
/// demo mode and by tests.
pub struct MemoryStore {
    receiver: mpsc::Receiver<StoreRequest>,
    records: Vec<Product>,
    collection: String,
    issued: u64,
}

impl MemoryStore {
    pub fn new(buffer_size: usize, collection: impl Into<String>) -> (Self, StoreHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            records: Vec::new(),
            collection: collection.into(),
            issued: 0,
        };
        (store, StoreHandle::new(sender))
    }

    /// Seeds records before the actor starts.
    pub fn with_records(mut self, payloads: impl IntoIterator<Item = ProductCreate>) -> Self {
        for payload in payloads {
            let record = self.insert(payload);
            self.records.push(record);
        }
        self
    }

    #[instrument(name = "memory_store", skip_all)]
    pub async fn run(mut self) {
        info!(collection = %self.collection, "MemoryStore starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::List { respond_to } => {
                    debug!(count = self.records.len(), "Listing records");
                    let _ = respond_to.send(Ok(self.records.clone()));
                }
                StoreRequest::Create { payload, respond_to } => {
                    let _ = respond_to.send(self.handle_create(payload));
                }
                StoreRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(&id, patch));
                }
                StoreRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(&id));
                }
            }
        }

        info!("MemoryStore stopped");
    }

    fn handle_create(&mut self, payload: ProductCreate) -> Result<Product, StoreError> {
        if !valid_price(payload.price) {
            warn!(price = payload.price, "Rejected record with invalid price");
            return Err(StoreError::Api {
                status: 400,
                message: "Failed to create record.".to_string(),
            });
        }
        let record = self.insert(payload);
        info!(record_id = %record.id, sku = %record.sku, "Record created");
        self.records.push(record.clone());
        Ok(record)
    }

    fn handle_update(&mut self, id: &str, patch: ProductPatch) -> Result<Product, StoreError> {
        if patch.price.is_some_and(|price| !valid_price(price)) {
            return Err(StoreError::Api {
                status: 400,
                message: "Failed to update record.".to_string(),
            });
        }
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.apply(&patch);
        record.updated = timestamp();
        info!(record_id = %id, "Record updated");
        Ok(record.clone())
    }

    fn handle_delete(&mut self, id: &str) -> Result<(), StoreError> {
        let position = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.records.remove(position);
        info!(record_id = %id, "Record deleted");
        Ok(())
    }

    fn insert(&mut self, payload: ProductCreate) -> Product {
        self.issued += 1;
        let now = timestamp();
        Product {
            id: format!("r{:014}", self.issued),
            name: payload.name,
            price: payload.price,
            stock: payload.stock,
            low_stock_threshold: payload.low_stock_threshold,
            category: payload.category,
            sku: format!("SKU-{:05}", self.issued),
            created: now.clone(),
            updated: now,
            collection_id: format!("pbc_{}", self.collection),
            collection_name: self.collection.clone(),
        }
    }
}

fn valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

/// Timestamp in the record service's `YYYY-MM-DD HH:MM:SS.mmmZ` format.
fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ").to_string()
}

// =============================================================================
// 3. THE HANDLE
// =============================================================================

/// Channel handle to a [`MemoryStore`]. Cloneable.
#[derive(Clone)]
pub struct StoreHandle {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreHandle {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::ActorCommunicationError("Actor closed".to_string()))?;
        // A dropped responder means the request was cancelled before it completed.
        response.await.map_err(|_| StoreError::Aborted)?
    }
}

#[async_trait]
impl RecordStore for StoreHandle {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        self.request(|respond_to| StoreRequest::List { respond_to }).await
    }

    async fn create(&self, payload: ProductCreate) -> Result<Product, StoreError> {
        self.request(|respond_to| StoreRequest::Create { payload, respond_to })
            .await
    }

    async fn update(&self, id: &str, patch: ProductPatch) -> Result<Product, StoreError> {
        let id = id.to_string();
        self.request(|respond_to| StoreRequest::Update { id, patch, respond_to })
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        self.request(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }
}
