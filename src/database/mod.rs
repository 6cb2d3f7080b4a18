pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::InMemoryProductRepository;
pub use models::{Product, ProductFields};
pub use repository::{PgProductRepository, ProductRepository};
