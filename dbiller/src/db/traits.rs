use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewProduct, Product};

/// Read-only catalog queries consumed by the recognition pipeline.
///
/// Both methods return a snapshot in the store's natural (id) order. The
/// store is expected to tolerate concurrent readers and external mutation;
/// results reflect whatever the read returned, no lock is held here.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Entries whose name or category contains any of the given lowercase
    /// tokens (case-insensitive substring), capped at `cap`.
    async fn find_by_tokens(&self, tokens: &[String], cap: usize) -> Result<Vec<Product>>;

    /// Full catalog snapshot in id order.
    async fn list_all(&self) -> Result<Vec<Product>>;
}

/// CRUD operations for catalog management.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create_product(&self, fields: &NewProduct) -> Result<Product>;
    async fn get_product(&self, id: i64) -> Result<Option<Product>>;
    async fn list_products(&self, limit: u32, offset: u32) -> Result<Vec<Product>>;
    async fn count_products(&self) -> Result<u64>;
    async fn update_product(&self, id: i64, fields: &NewProduct) -> Result<Option<Product>>;
    async fn delete_product(&self, id: i64) -> Result<bool>;
}

/// Combined catalog backend used by the HTTP layer.
#[async_trait]
pub trait CatalogBackend: CatalogReader + ProductStore {
    /// Cheap liveness probe for health reporting.
    async fn ping(&self) -> Result<()>;
}
