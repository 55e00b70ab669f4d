//! Catalog item domain types.

use serde::Serialize;

use shopfront_core::{Price, ProductId};

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub product_name: String,
    /// Unit price, serialized as a JSON number.
    pub price: Price,
}

/// Validated fields for creating or replacing a catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub product_name: String,
    pub price: Price,
}
