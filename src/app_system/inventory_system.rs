use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::DashboardConfig;
use crate::dashboard::{DashboardClient, DashboardService};
use crate::domain::ProductCreate;
use crate::error::{DashboardError, StoreError};
use crate::store::{MemoryStore, PocketBaseStore, RecordStore};

const CHANNEL_BUFFER: usize = 32;

/// Which record service the dashboard talks to.
pub enum Backend {
    Remote,
    /// An in-process store seeded with sample inventory.
    Demo,
}

/// Starts the services and owns their tasks until shutdown.
pub struct InventorySystem {
    pub dashboard: DashboardClient,
    handles: Vec<JoinHandle<()>>,
}

impl InventorySystem {
    pub fn start(config: &DashboardConfig, backend: Backend) -> Result<Self, StoreError> {
        info!(collection = %config.collection, "Starting inventory system");

        let mut handles = Vec::new();
        let store: Arc<dyn RecordStore> = match backend {
            Backend::Remote => {
                info!(base_url = %config.base_url, "Using remote record service");
                Arc::new(PocketBaseStore::new(config)?)
            }
            Backend::Demo => {
                info!("Using in-memory demo inventory");
                let (store, handle) = MemoryStore::new(CHANNEL_BUFFER, config.collection.clone());
                let store = store.with_records(demo_inventory(config.default_low_stock_threshold));
                handles.push(tokio::spawn(store.run()));
                Arc::new(handle)
            }
        };

        Ok(Self::with_store(store, handles))
    }

    pub fn with_store(store: Arc<dyn RecordStore>, mut handles: Vec<JoinHandle<()>>) -> Self {
        let (service, dashboard) = DashboardService::new(CHANNEL_BUFFER, store);
        // The dashboard goes first so it stops, and releases the store, before the store is awaited.
        handles.insert(0, tokio::spawn(service.run()));
        Self { dashboard, handles }
    }

    pub async fn shutdown(self) -> Result<(), DashboardError> {
        info!("Shutting down system...");
        self.dashboard.shutdown().await?;
        drop(self.dashboard);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Service task failed: {:?}", e);
                return Err(DashboardError::ActorCommunicationError(format!(
                    "Service task failed: {e}"
                )));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

fn demo_inventory(threshold: u32) -> Vec<ProductCreate> {
    let item = |name: &str, price: f64, stock: u32, category: &str| ProductCreate {
        name: name.to_string(),
        price,
        stock,
        low_stock_threshold: threshold,
        category: category.to_string(),
    };
    vec![
        item("Mechanical Keyboard", 129.0, 42, "Peripherals"),
        item("Wireless Mouse", 34.5, 8, "Peripherals"),
        item("27\" Monitor", 1249.99, 12, "Displays"),
        item("USB-C Hub", 59.0, 3, "Accessories"),
        item("Laptop Stand", 45.0, 0, "Accessories"),
    ]
}
