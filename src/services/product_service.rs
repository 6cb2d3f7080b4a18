use std::sync::Arc;
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::models::{Product, ProductFields};
use crate::database::repository::ProductRepository;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Product not found: {0}")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Product use cases on top of a `ProductRepository`. Cheap to clone.
#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub async fn find_all(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Product, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    pub async fn create(&self, fields: ProductFields) -> Result<Product, ServiceError> {
        let product = self.repo.save(None, fields).await?;
        debug!(id = product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Load the existing row, overwrite name/price/stock and write it back.
    pub async fn update(&self, id: i64, fields: ProductFields) -> Result<Product, ServiceError> {
        let mut product = self.find_by_id(id).await?;
        product.apply(fields);

        let saved = self
            .repo
            .save(Some(product.id), product.fields())
            .await
            .map_err(|e| match e {
                // Row deleted between the read and the write
                DatabaseError::NotFound(_) => ServiceError::NotFound(id),
                other => ServiceError::Database(other),
            })?;
        debug!(id, "product updated");
        Ok(saved)
    }

    /// Idempotent: deleting an unknown id succeeds without changing the store.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if self.repo.delete_by_id(id).await? {
            debug!(id, "product deleted");
        } else {
            debug!(id, "delete of unknown product ignored");
        }
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(self.repo.health_check().await?)
    }
}
