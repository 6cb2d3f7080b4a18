use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted product row. `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

/// The mutable columns of a product, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

impl Product {
    pub fn from_fields(id: i64, fields: ProductFields) -> Self {
        Self {
            id,
            name: fields.name,
            price: fields.price,
            stock: fields.stock,
        }
    }

    /// Overwrite every mutable column, keeping the identity.
    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.price = fields.price;
        self.stock = fields.stock;
    }

    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            price: self.price,
            stock: self.stock,
        }
    }
}
