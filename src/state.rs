use std::sync::Arc;

use crate::auth::Credentials;
use crate::config::AppConfig;
use crate::database::{InMemoryProductRepository, ProductRepository};
use crate::services::ProductService;

/// Shared handler state: the product service plus the credential the
/// auth layer checks against. Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub credentials: Arc<Credentials>,
}

impl AppState {
    pub fn new(repo: Arc<dyn ProductRepository>, credentials: Credentials) -> Self {
        Self {
            products: ProductService::new(repo),
            credentials: Arc::new(credentials),
        }
    }

    /// State backed by the process-local store
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(InMemoryProductRepository::new()),
            Credentials::from_config(&config.security),
        )
    }
}
