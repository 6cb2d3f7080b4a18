use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Product, ProductFields};
use crate::database::repository::ProductRepository;

/// Process-local product store used when no database is configured.
/// Ids start at 1 and are never reused.
pub struct InMemoryProductRepository {
    rows: RwLock<BTreeMap<i64, Product>>,
    next_id: AtomicI64,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, DatabaseError> {
        let rows = self.rows.read().await;
        Ok(rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DatabaseError> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).cloned())
    }

    async fn insert(&self, fields: &ProductFields) -> Result<Product, DatabaseError> {
        let mut rows = self.rows.write().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let product = Product::from_fields(id, fields.clone());
        rows.insert(id, product.clone());
        Ok(product)
    }

    async fn overwrite(&self, product: &Product) -> Result<Product, DatabaseError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&product.id) {
            Some(row) => {
                *row = product.clone();
                Ok(product.clone())
            }
            None => Err(DatabaseError::NotFound(format!("product {}", product.id))),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.write().await;
        Ok(rows.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
