use async_trait::async_trait;

use crate::db::connection::Database;
use crate::db::repository::ProductRepository;
use crate::db::traits::{CatalogBackend, CatalogReader, ProductStore};
use crate::error::Result;
use crate::models::{NewProduct, Product};

pub struct LibSqlCatalog {
    db: Database,
}

impl LibSqlCatalog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogReader for LibSqlCatalog {
    async fn find_by_tokens(&self, tokens: &[String], cap: usize) -> Result<Vec<Product>> {
        let conn = self.db.connect()?;
        ProductRepository::find_by_tokens(&conn, tokens, cap).await
    }

    async fn list_all(&self) -> Result<Vec<Product>> {
        let conn = self.db.connect()?;
        ProductRepository::list_all(&conn).await
    }
}

#[async_trait]
impl ProductStore for LibSqlCatalog {
    async fn create_product(&self, fields: &NewProduct) -> Result<Product> {
        let conn = self.db.connect()?;
        ProductRepository::create(&conn, fields).await
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let conn = self.db.connect()?;
        ProductRepository::get_by_id(&conn, id).await
    }

    async fn list_products(&self, limit: u32, offset: u32) -> Result<Vec<Product>> {
        let conn = self.db.connect()?;
        ProductRepository::list(&conn, limit, offset).await
    }

    async fn count_products(&self) -> Result<u64> {
        let conn = self.db.connect()?;
        ProductRepository::count(&conn).await
    }

    async fn update_product(&self, id: i64, fields: &NewProduct) -> Result<Option<Product>> {
        let conn = self.db.connect()?;
        ProductRepository::update(&conn, id, fields).await
    }

    async fn delete_product(&self, id: i64) -> Result<bool> {
        let conn = self.db.connect()?;
        ProductRepository::delete(&conn, id).await
    }
}

#[async_trait]
impl CatalogBackend for LibSqlCatalog {
    async fn ping(&self) -> Result<()> {
        let conn = self.db.connect()?;
        conn.query("SELECT 1", ()).await?;
        Ok(())
    }
}
