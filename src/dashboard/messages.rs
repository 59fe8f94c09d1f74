use tokio::sync::oneshot;

use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::error::DashboardError;

pub type ServiceResult<T> = std::result::Result<T, DashboardError>;
pub type ServiceResponse<T> = oneshot::Sender<ServiceResult<T>>;

/// Where the fetch-on-mount currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Failed(String),
    Ready,
}

/// Point-in-time copy of the dashboard, handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub products: Vec<Product>,
    pub loading: bool,
    pub error: Option<String>,
    /// Outcome of the last failed mutation, cleared by the next success.
    pub status: Option<String>,
}

impl DashboardView {
    pub fn state(&self) -> LoadState {
        if self.loading {
            LoadState::Loading
        } else if let Some(error) = &self.error {
            LoadState::Failed(error.clone())
        } else {
            LoadState::Ready
        }
    }

    pub fn low_stock(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|product| product.is_low_stock())
    }
}

#[derive(Debug)]
pub enum DashboardRequest {
    Load {
        respond_to: ServiceResponse<usize>,
    },
    Add {
        payload: ProductCreate,
        respond_to: ServiceResponse<Product>,
    },
    Edit {
        id: String,
        patch: ProductPatch,
        respond_to: ServiceResponse<Product>,
    },
    Delete {
        id: String,
        respond_to: ServiceResponse<()>,
    },
    Snapshot {
        respond_to: ServiceResponse<DashboardView>,
    },
    Shutdown,
}
