//! The record service seam: list, create, update and delete records of one collection.

pub mod memory;
pub mod pocketbase;

use async_trait::async_trait;

use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::error::StoreError;

pub use memory::{MemoryStore, StoreHandle, StoreRequest};
pub use pocketbase::PocketBaseStore;

/// A remote (or in-process) collection of product records.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Every record in the collection, in service order.
    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn create(&self, payload: ProductCreate) -> Result<Product, StoreError>;

    async fn update(&self, id: &str, patch: ProductPatch) -> Result<Product, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
