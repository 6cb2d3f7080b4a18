//! Field constraints for product request bodies.
//!
//! Runs on the deserialized payload before the service is called, so a
//! rejected request never touches the store.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::database::models::ProductFields;

pub const NAME_MAX_LENGTH: usize = 255;

/// Fraction digits kept by the `NUMERIC(38, 2)` price column.
pub const PRICE_MAX_SCALE: u32 = 2;

/// Create/update request body. Fields are optional so a missing value
/// surfaces as a constraint violation instead of a parse failure.
/// A client-supplied `id` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPayload {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check every constraint and return either the accepted fields or the
/// full list of violations.
pub fn validate_product(payload: &ProductPayload) -> Result<ProductFields, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    match payload.name.as_deref() {
        None => violations.push(FieldViolation::new("name", "must not be blank")),
        Some(name) if name.trim().is_empty() => {
            violations.push(FieldViolation::new("name", "must not be blank"))
        }
        Some(name) if name.chars().count() > NAME_MAX_LENGTH => violations.push(FieldViolation::new(
            "name",
            format!("size must be between 1 and {}", NAME_MAX_LENGTH),
        )),
        Some(_) => {}
    }

    match payload.price {
        None => violations.push(FieldViolation::new("price", "must not be null")),
        Some(price) if price.is_sign_negative() && !price.is_zero() => violations.push(
            FieldViolation::new("price", "must be greater than or equal to 0.0"),
        ),
        // Trailing zeros do not count: 1.500 is stored as 1.50.
        Some(price) if price.normalize().scale() > PRICE_MAX_SCALE => violations.push(FieldViolation::new(
            "price",
            format!("must have at most {} fraction digits", PRICE_MAX_SCALE),
        )),
        Some(_) => {}
    }

    match payload.stock {
        None => violations.push(FieldViolation::new("stock", "must not be null")),
        Some(stock) if stock < 0 => violations.push(FieldViolation::new(
            "stock",
            "must be greater than or equal to 0",
        )),
        Some(_) => {}
    }

    match (&payload.name, payload.price, payload.stock) {
        (Some(name), Some(price), Some(stock)) if violations.is_empty() => Ok(ProductFields {
            name: name.clone(),
            price,
            stock,
        }),
        _ => Err(violations),
    }
}

/// Collapse violations into the field → message map used in error bodies.
/// Messages for the same field are joined.
pub fn violations_by_field(violations: &[FieldViolation]) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = HashMap::new();
    for v in violations {
        map.entry(v.field.to_string())
            .and_modify(|existing| {
                existing.push_str("; ");
                existing.push_str(&v.message);
            })
            .or_insert_with(|| v.message.clone());
    }
    map
}
