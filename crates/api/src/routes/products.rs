//! Catalog item handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};

use shopfront_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::schema::{JsonBody, ProductSchema};
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/{id}", get(show).put(update).delete(destroy))
}

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

/// `POST /products` - create a catalog item.
///
/// # Errors
///
/// 400 for an invalid body.
pub async fn create(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Product>)> {
    let input = body.load::<ProductSchema>()?;

    let mut tx = state.begin().await?;
    let product = ProductRepository::new(&mut tx).create(&input).await?;
    tx.commit().await?;

    tracing::info!(product_id = %product.id, price = %product.price, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /products` - list every catalog item.
///
/// # Errors
///
/// 500 if the store is unavailable.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let mut tx = state.begin().await?;
    let products = ProductRepository::new(&mut tx).list().await?;
    tx.commit().await?;

    Ok(Json(products))
}

/// `GET /products/{id}` - fetch one catalog item.
///
/// # Errors
///
/// 404 if the product doesn't exist.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let mut tx = state.begin().await?;
    let product = ProductRepository::new(&mut tx)
        .get_by_id(id)
        .await?
        .ok_or_else(not_found)?;
    tx.commit().await?;

    Ok(Json(product))
}

/// `PUT /products/{id}` - replace a catalog item's name and price.
///
/// # Errors
///
/// 404 if the product doesn't exist, 400 for an invalid body.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    body: JsonBody,
) -> Result<Json<Product>> {
    let mut tx = state.begin().await?;
    let mut products = ProductRepository::new(&mut tx);

    if products.get_by_id(id).await?.is_none() {
        return Err(not_found());
    }

    let input = body.load::<ProductSchema>()?;
    let product = products.update(id, &input).await?;
    tx.commit().await?;

    tracing::info!(product_id = %id, "Product updated");
    Ok(Json(product))
}

/// `DELETE /products/{id}` - delete a catalog item and its order memberships.
///
/// # Errors
///
/// 404 if the product doesn't exist.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    let mut tx = state.begin().await?;
    if !ProductRepository::new(&mut tx).delete(id).await? {
        return Err(not_found());
    }
    tx.commit().await?;

    tracing::info!(product_id = %id, "Product deleted");
    Ok(Json(json!({ "message": format!("Deleted product {id}") })))
}
