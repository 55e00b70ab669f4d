//! Purchase order domain types.

use chrono::NaiveDateTime;
use serde::Serialize;

use shopfront_core::{OrderId, UserId};

/// A purchase order.
///
/// The products on an order are not embedded; they are listed through
/// `GET /orders/{id}/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// When the order was placed (no time zone, e.g. `2024-01-01T00:00:00`).
    pub order_date: NaiveDateTime,
    /// Customer who owns the order.
    pub user_id: UserId,
}

/// Validated fields for creating an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderInput {
    /// Placement time; the store fills in the current time when `None`.
    pub order_date: Option<NaiveDateTime>,
    pub user_id: UserId,
}
