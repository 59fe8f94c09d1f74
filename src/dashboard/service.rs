use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use super::client::DashboardClient;
use super::messages::{DashboardRequest, DashboardView, ServiceResponse, ServiceResult};
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::error::{DashboardError, StoreError};
use crate::store::RecordStore;

/// Owns the in-memory product list and mirrors every mutation into it.
///
/// The list is fetched on mount (the first `Load`) and again only on an
/// explicit reload, so it can drift from the service in between. Requests
/// are handled one at a time; the last write wins.
pub struct DashboardService {
    receiver: mpsc::Receiver<DashboardRequest>,
    store: Arc<dyn RecordStore>,
    products: Vec<Product>,
    loading: bool,
    error: Option<String>,
    status: Option<String>,
}

impl DashboardService {
    pub fn new(buffer_size: usize, store: Arc<dyn RecordStore>) -> (Self, DashboardClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            store,
            products: Vec::new(),
            loading: true,
            error: None,
            status: None,
        };
        (service, DashboardClient::new(sender))
    }

    #[instrument(name = "dashboard_service", skip(self))]
    pub async fn run(mut self) {
        info!("DashboardService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                DashboardRequest::Load { respond_to } => {
                    let result = self.handle_load().await;
                    let _ = respond_to.send(result);
                }
                DashboardRequest::Add { payload, respond_to } => {
                    self.handle_add(payload, respond_to).await;
                }
                DashboardRequest::Edit {
                    id,
                    patch,
                    respond_to,
                } => {
                    self.handle_edit(id, patch, respond_to).await;
                }
                DashboardRequest::Delete { id, respond_to } => {
                    self.handle_delete(id, respond_to).await;
                }
                DashboardRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.view()));
                }
                DashboardRequest::Shutdown => {
                    info!("DashboardService shutting down");
                    break;
                }
            }
        }

        info!("DashboardService stopped");
    }

    fn view(&self) -> DashboardView {
        DashboardView {
            products: self.products.clone(),
            loading: self.loading,
            error: self.error.clone(),
            status: self.status.clone(),
        }
    }

    #[instrument(skip(self))]
    async fn handle_load(&mut self) -> ServiceResult<usize> {
        debug!("Processing load request");
        self.loading = true;
        let result = self.store.list_all().await;
        self.loading = false;

        match result {
            Ok(records) => {
                info!(count = records.len(), "Inventory loaded");
                self.products = records;
                self.error = None;
                self.status = None;
                Ok(self.products.len())
            }
            Err(StoreError::Aborted) => {
                debug!("Load aborted, keeping previous state");
                Err(DashboardError::Aborted)
            }
            Err(e) => {
                let err = DashboardError::Load(e.describe());
                error!(error = %e, "Error fetching products");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_add(&mut self, payload: ProductCreate, respond_to: ServiceResponse<Product>) {
        debug!("Processing add request");

        let result = match self.store.create(payload).await {
            Ok(product) => {
                info!(product_id = %product.id, sku = %product.sku, "Product added");
                self.products.push(product.clone());
                Ok(product)
            }
            Err(e) => Err(DashboardError::Add(e.describe())),
        };

        let _ = respond_to.send(self.settle(result));
    }

    #[instrument(fields(product_id = %id), skip(self, patch, respond_to))]
    async fn handle_edit(
        &mut self,
        id: String,
        patch: ProductPatch,
        respond_to: ServiceResponse<Product>,
    ) {
        debug!("Processing edit request");

        let result = match self.position(&id) {
            None => Err(DashboardError::Update(StoreError::NotFound(id).describe())),
            Some(index) => match self.store.update(&id, patch).await {
                Ok(product) => {
                    self.products[index] = product.clone();
                    info!(low_stock = product.is_low_stock(), "Product updated");
                    Ok(product)
                }
                Err(e) => Err(DashboardError::Update(e.describe())),
            },
        };

        let _ = respond_to.send(self.settle(result));
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    async fn handle_delete(&mut self, id: String, respond_to: ServiceResponse<()>) {
        debug!("Processing delete request");

        let result = match self.position(&id) {
            None => Err(DashboardError::Delete(StoreError::NotFound(id).describe())),
            Some(_) => match self.store.delete(&id).await {
                Ok(()) => {
                    self.products.retain(|product| product.id != id);
                    info!(remaining = self.products.len(), "Product deleted");
                    Ok(())
                }
                Err(e) => Err(DashboardError::Delete(e.describe())),
            },
        };

        let _ = respond_to.send(self.settle(result));
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|product| product.id == id)
    }

    /// Records the outcome of a mutation in the status panel.
    fn settle<T>(&mut self, result: ServiceResult<T>) -> ServiceResult<T> {
        match &result {
            Ok(_) => self.status = None,
            Err(e) => {
                warn!(error = %e, "Mutation failed");
                self.status = Some(e.to_string());
            }
        }
        result
    }
}
