//! # Mock Framework
//!
//! Utilities for testing the dashboard against a scripted record service.
//!
//! Use [`create_mock_store`] to get a store handle and a receiver.
//! Then use helpers like [`expect_list`] or [`expect_create`] to assert the
//! requests the dashboard makes and to answer them.

use tokio::sync::mpsc;

use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::store::memory::Response;
use crate::store::{StoreHandle, StoreRequest};

/// Creates a store handle whose requests arrive on the returned receiver.
///
/// The test plays the record service: it inspects each request and decides
/// the answer (success, failure, or dropping the responder to simulate an
/// aborted request).
pub fn create_mock_store(buffer_size: usize) -> (StoreHandle, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreHandle::new(sender), receiver)
}

/// Helper to verify that the next message is a List request
pub async fn expect_list(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<Response<Vec<Product>>> {
    match receiver.recv().await {
        Some(StoreRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(ProductCreate, Response<Product>)> {
    match receiver.recv().await {
        Some(StoreRequest::Create {
            payload,
            respond_to,
        }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(String, ProductPatch, Response<Product>)> {
    match receiver.recv().await {
        Some(StoreRequest::Update {
            id,
            patch,
            respond_to,
        }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(String, Response<()>)> {
    match receiver.recv().await {
        Some(StoreRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::RecordStore;

    #[tokio::test]
    async fn test_mock_store() {
        let (store, mut receiver) = create_mock_store(10);

        let create_task = tokio::spawn(async move {
            let payload = ProductCreate {
                name: "Test".to_string(),
                price: 1.0,
                stock: 1,
                low_stock_threshold: 10,
                category: String::new(),
            };
            store.create(payload).await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.name, "Test");
        responder
            .send(Ok(Product::new("r1", "Test", 1.0, 1)))
            .unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result.unwrap().id, "r1");
    }

    #[tokio::test]
    async fn test_dropped_responder_is_aborted() {
        let (store, mut receiver) = create_mock_store(10);

        let list_task = tokio::spawn(async move { store.list_all().await });
        drop(expect_list(&mut receiver).await.expect("Expected List request"));

        assert_eq!(list_task.await.unwrap(), Err(StoreError::Aborted));
    }
}
