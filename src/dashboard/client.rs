use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use super::messages::{DashboardRequest, DashboardView};
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::error::DashboardError;

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, DashboardError> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| DashboardError::ActorCommunicationError("Actor closed".to_string()))?;

                response
                    .await
                    .map_err(|_| DashboardError::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

/// Handle to a running [`DashboardService`](super::DashboardService).
#[derive(Clone)]
pub struct DashboardClient {
    sender: mpsc::Sender<DashboardRequest>,
}

impl DashboardClient {
    pub fn new(sender: mpsc::Sender<DashboardRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), DashboardError> {
        debug!("Sending shutdown request");
        self.sender
            .send(DashboardRequest::Shutdown)
            .await
            .map_err(|_| DashboardError::ActorCommunicationError("Actor closed".to_string()))
    }
}

// Fetch the full list; returns the number of products now held.
client_method!(DashboardClient => fn load() -> usize as DashboardRequest::Load);
client_method!(DashboardClient => fn add(payload: ProductCreate) -> Product as DashboardRequest::Add);
client_method!(DashboardClient => fn edit(id: String, patch: ProductPatch) -> Product as DashboardRequest::Edit);
client_method!(DashboardClient => fn delete(id: String) -> () as DashboardRequest::Delete);
client_method!(DashboardClient => fn snapshot() -> DashboardView as DashboardRequest::Snapshot);
