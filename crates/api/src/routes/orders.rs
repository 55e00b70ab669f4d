//! Purchase order handlers, including order/product membership.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use serde_json::{Value, json};

use shopfront_core::{OrderId, ProductId, UserId};

use crate::db::{OrderProductRepository, OrderRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::{Order, Product};
use crate::schema::{JsonBody, OrderSchema, RemoveProductSchema};
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list).post(create))
        .route("/orders/{order_id}", get(show).delete(destroy))
        .route(
            "/orders/{order_id}/add_product/{product_id}",
            put(add_product),
        )
        .route("/orders/{order_id}/remove_product", delete(remove_product))
        .route("/orders/{order_id}/products", get(products))
        .route("/orders/user/{user_id}", get(list_for_user))
}

fn order_not_found() -> AppError {
    AppError::NotFound("Order not found".to_string())
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

/// Check that both sides of an association exist.
async fn require_order_and_product(
    conn: &mut sqlx::PgConnection,
    order_id: OrderId,
    product_id: ProductId,
) -> Result<()> {
    if !OrderRepository::new(conn).exists(order_id).await? {
        return Err(order_not_found());
    }
    if ProductRepository::new(conn)
        .get_by_id(product_id)
        .await?
        .is_none()
    {
        return Err(product_not_found());
    }
    Ok(())
}

/// `POST /orders` - create an order with no products.
///
/// # Errors
///
/// 400 for an invalid body or a `user_id` that matches no user.
pub async fn create(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Order>)> {
    let input = body.load::<OrderSchema>()?;

    let mut tx = state.begin().await?;
    let order = OrderRepository::new(&mut tx).create(&input).await?;
    tx.commit().await?;

    tracing::info!(order_id = %order.id, user_id = %order.user_id, "Order created");
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders` - list every order.
///
/// # Errors
///
/// 500 if the store is unavailable.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let mut tx = state.begin().await?;
    let orders = OrderRepository::new(&mut tx).list().await?;
    tx.commit().await?;

    Ok(Json(orders))
}

/// `GET /orders/{order_id}` - fetch one order.
///
/// # Errors
///
/// 404 if the order doesn't exist.
pub async fn show(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Order>> {
    let mut tx = state.begin().await?;
    let order = OrderRepository::new(&mut tx)
        .get_by_id(order_id)
        .await?
        .ok_or_else(order_not_found)?;
    tx.commit().await?;

    Ok(Json(order))
}

/// `DELETE /orders/{order_id}` - delete an order and its product memberships.
///
/// # Errors
///
/// 404 if the order doesn't exist.
pub async fn destroy(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Value>> {
    let mut tx = state.begin().await?;
    if !OrderRepository::new(&mut tx).delete(order_id).await? {
        return Err(order_not_found());
    }
    tx.commit().await?;

    tracing::info!(order_id = %order_id, "Order deleted");
    Ok(message(&format!("Deleted order {order_id}")))
}

/// `PUT /orders/{order_id}/add_product/{product_id}` - put a product on an order.
///
/// # Errors
///
/// 404 if the order or product doesn't exist, 400 if the product is already
/// on the order (including when a concurrent request added it first).
pub async fn add_product(
    State(state): State<AppState>,
    Path((order_id, product_id)): Path<(OrderId, ProductId)>,
) -> Result<Json<Value>> {
    let mut tx = state.begin().await?;
    require_order_and_product(&mut tx, order_id, product_id).await?;

    let mut memberships = OrderProductRepository::new(&mut tx);
    if memberships.contains(order_id, product_id).await? {
        return Err(AppError::Conflict("Product already in order".to_string()));
    }

    match memberships.add(order_id, product_id).await {
        Ok(()) => {}
        Err(RepositoryError::Conflict(msg)) => return Err(AppError::Conflict(msg)),
        Err(e) => return Err(e.into()),
    }
    tx.commit().await?;

    tracing::info!(order_id = %order_id, product_id = %product_id, "Product added to order");
    Ok(message("Product added to order"))
}

/// `DELETE /orders/{order_id}/remove_product` - take a product off an order.
///
/// The product is named in the body: `{"product_id": 1}`.
///
/// # Errors
///
/// 400 for an invalid body or a product that is not on the order, 404 if the
/// order or product doesn't exist.
pub async fn remove_product(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
    body: JsonBody,
) -> Result<Json<Value>> {
    let product_id = body.load::<RemoveProductSchema>()?;

    let mut tx = state.begin().await?;
    require_order_and_product(&mut tx, order_id, product_id).await?;

    if !OrderProductRepository::new(&mut tx)
        .remove(order_id, product_id)
        .await?
    {
        return Err(AppError::Conflict("Product not in order".to_string()));
    }
    tx.commit().await?;

    tracing::info!(order_id = %order_id, product_id = %product_id, "Product removed from order");
    Ok(message("Product removed from order"))
}

/// `GET /orders/user/{user_id}` - list a customer's orders.
///
/// An unknown user simply has no orders.
///
/// # Errors
///
/// 500 if the store is unavailable.
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Order>>> {
    let mut tx = state.begin().await?;
    let orders = OrderRepository::new(&mut tx).list_for_user(user_id).await?;
    tx.commit().await?;

    Ok(Json(orders))
}

/// `GET /orders/{order_id}/products` - list the products on an order.
///
/// # Errors
///
/// 404 if the order doesn't exist.
pub async fn products(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Vec<Product>>> {
    let mut tx = state.begin().await?;
    if !OrderRepository::new(&mut tx).exists(order_id).await? {
        return Err(order_not_found());
    }
    let products = OrderProductRepository::new(&mut tx)
        .products(order_id)
        .await?;
    tx.commit().await?;

    Ok(Json(products))
}
