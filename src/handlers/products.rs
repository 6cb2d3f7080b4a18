use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::database::models::{Product, ProductFields};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::validation::{validate_product, ProductPayload};

fn product_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::bad_request(format!("Invalid product id: {}", e.body_text())))
}

fn product_fields(body: Result<Json<ProductPayload>, JsonRejection>) -> Result<ProductFields, ApiError> {
    let Json(payload) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    Ok(validate_product(&payload)?)
}

/// GET /api/products
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.find_all().await?))
}

/// GET /api/products/:id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = product_id(path)?;
    Ok(Json(state.products.find_by_id(id).await?))
}

/// POST /api/products - any `id` in the body is ignored
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = product_fields(body)?;
    let product = state.products.create(fields).await?;
    tracing::info!(user = %user.username, role = %user.role, id = product.id, "create product");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/:id - full overwrite of name, price and stock
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = product_id(path)?;
    let fields = product_fields(body)?;
    let product = state.products.update(id, fields).await?;
    tracing::info!(user = %user.username, role = %user.role, id, "update product");
    Ok(Json(product))
}

/// DELETE /api/products/:id - succeeds whether or not the product exists
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = product_id(path)?;
    state.products.delete(id).await?;
    tracing::info!(user = %user.username, role = %user.role, id, "delete product");
    Ok(StatusCode::NO_CONTENT)
}
