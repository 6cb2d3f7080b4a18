use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Product, ProductFields};

/// Persistence gateway for products, keyed by numeric identity.
///
/// Every method is a single atomic statement against the store; nothing
/// here spans a transaction across calls.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products ordered by id.
    async fn find_all(&self) -> Result<Vec<Product>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DatabaseError>;

    /// Insert a new row; the store assigns the id.
    async fn insert(&self, fields: &ProductFields) -> Result<Product, DatabaseError>;

    /// Full-row overwrite of an existing product. Fails with `NotFound`
    /// if no row carries `product.id`.
    async fn overwrite(&self, product: &Product) -> Result<Product, DatabaseError>;

    /// Returns whether a row was removed. A missing id is not an error.
    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Insert when `id` is absent, otherwise overwrite the row with that id.
    async fn save(&self, id: Option<i64>, fields: ProductFields) -> Result<Product, DatabaseError> {
        match id {
            None => self.insert(&fields).await,
            Some(id) => self.overwrite(&Product::from_fields(id, fields)).await,
        }
    }
}

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, DatabaseError> {
        let rows = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DatabaseError> {
        let row = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, fields: &ProductFields) -> Result<Product, DatabaseError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, stock)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, stock
            "#,
        )
        .bind(&fields.name)
        .bind(fields.price)
        .bind(fields.stock)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn overwrite(&self, product: &Product) -> Result<Product, DatabaseError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2, price = $3, stock = $4
            WHERE id = $1
            RETURNING id, name, price, stock
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("product {}", product.id)))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(id, rows = result.rows_affected(), "delete products row");
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    /// Repository on the database named by `DATABASE_URL`, or `None` when unset.
    async fn pg_repo() -> Option<PgProductRepository> {
        let url = std::env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty())?;
        let mut config = AppConfig::development().database;
        config.url = Some(url);
        config.max_connections = 2;
        let pool = DatabaseManager::connect(&config)
            .await
            .expect("DATABASE_URL is set but the database is unreachable");
        DatabaseManager::run_migrations(&pool)
            .await
            .expect("migrations failed");
        Some(PgProductRepository::new(pool))
    }

    fn fields(name: &str, price: &str, stock: i32) -> ProductFields {
        ProductFields {
            name: name.to_string(),
            price: Decimal::from_str(price).unwrap(),
            stock,
        }
    }

    #[tokio::test]
    async fn pg_insert_overwrite_delete() {
        let Some(repo) = pg_repo().await else {
            eprintln!("DATABASE_URL not set; skipping");
            return;
        };

        let created = repo.save(None, fields("Widget", "9.99", 5)).await.unwrap();
        assert_eq!(created.fields(), fields("Widget", "9.99", 5));
        assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created.clone()));
        assert!(repo.find_all().await.unwrap().contains(&created));

        let updated = repo
            .save(Some(created.id), fields("Widget", "8.99", 3))
            .await
            .unwrap();
        assert_eq!(updated, Product::from_fields(created.id, fields("Widget", "8.99", 3)));

        assert!(repo.delete_by_id(created.id).await.unwrap());
        assert!(!repo.delete_by_id(created.id).await.unwrap());
        assert_eq!(repo.find_by_id(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn pg_overwrite_of_missing_row_is_not_found() {
        let Some(repo) = pg_repo().await else {
            eprintln!("DATABASE_URL not set; skipping");
            return;
        };

        let ghost = Product::from_fields(i64::MAX, fields("Ghost", "1", 1));
        assert!(matches!(
            repo.overwrite(&ghost).await,
            Err(DatabaseError::NotFound(_))
        ));
        assert_eq!(repo.find_by_id(i64::MAX).await.unwrap(), None);
    }

    #[tokio::test]
    async fn pg_health_check_pings() {
        let Some(repo) = pg_repo().await else {
            eprintln!("DATABASE_URL not set; skipping");
            return;
        };
        repo.health_check().await.unwrap();
    }
}
