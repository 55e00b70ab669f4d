//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                   - Liveness probe
//! GET    /health/ready                             - Readiness probe (database)
//!
//! # Users
//! POST   /users                                    - Create user
//! GET    /users                                    - List users
//! GET    /users/{id}                               - Get user
//! PUT    /users/{id}                               - Replace user fields
//! DELETE /users/{id}                               - Delete user
//!
//! # Products
//! POST   /products                                 - Create product
//! GET    /products                                 - List products
//! GET    /products/{id}                            - Get product
//! PUT    /products/{id}                            - Replace product fields
//! DELETE /products/{id}                            - Delete product
//!
//! # Orders
//! POST   /orders                                   - Create order
//! GET    /orders                                   - List orders
//! GET    /orders/{order_id}                        - Get order
//! DELETE /orders/{order_id}                        - Delete order
//! PUT    /orders/{order_id}/add_product/{product_id} - Add product to order
//! DELETE /orders/{order_id}/remove_product         - Remove product (body: product_id)
//! GET    /orders/{order_id}/products               - Products on an order
//! GET    /orders/user/{user_id}                    - Orders of a user
//! ```

pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use axum::{Router, middleware::from_fn};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// All resource routes, without middleware or state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(products::router())
        .merge(orders::router())
}

/// Build the complete application with middleware and state attached.
///
/// Sentry layers are added by the binary on top of this.
pub fn build_router(state: AppState) -> Router {
    routes()
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
