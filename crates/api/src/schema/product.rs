//! Catalog item request schema.

use serde_json::Value;

use super::{Fields, Schema, ValidationErrors};
use crate::models::ProductInput;

const PRODUCT_NAME_MAX: usize = 100;

/// Schema for `POST /products` and `PUT /products/{id}`.
///
/// `product_name` is a required string of at most 100 characters; `price` is
/// a required non-negative number (a numeric string is also accepted).
pub struct ProductSchema;

impl Schema for ProductSchema {
    type Output = ProductInput;

    fn load(body: &Value) -> Result<ProductInput, ValidationErrors> {
        let mut fields = Fields::new(body, &["id", "product_name", "price"])?;

        let _ = fields.optional_integer("id");
        let product_name = fields.required_string("product_name", PRODUCT_NAME_MAX);
        let price = fields.required_price("price");

        fields.finish(|| {
            Some(ProductInput {
                product_name: product_name?,
                price: price?,
            })
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::schema::{MISSING, NEGATIVE, NOT_NUMBER};

    #[test]
    fn test_load() {
        let input = ProductSchema::load(&json!({"product_name": "Pen", "price": 1.5})).unwrap();
        assert_eq!(input.product_name, "Pen");
        assert_eq!(input.price.amount(), Decimal::new(15, 1));
    }

    #[test]
    fn test_integer_and_string_prices() {
        let input = ProductSchema::load(&json!({"product_name": "Pen", "price": 3})).unwrap();
        assert_eq!(input.price.amount(), Decimal::new(3, 0));

        let input = ProductSchema::load(&json!({"product_name": "Pen", "price": "2.75"})).unwrap();
        assert_eq!(input.price.amount(), Decimal::new(275, 2));
    }

    #[test]
    fn test_free_product() {
        let input = ProductSchema::load(&json!({"product_name": "Sticker", "price": 0})).unwrap();
        assert!(input.price.amount().is_zero());
    }

    #[test]
    fn test_missing_fields() {
        let err = ProductSchema::load(&json!({})).unwrap_err();
        assert_eq!(err.field("product_name"), [MISSING]);
        assert_eq!(err.field("price"), [MISSING]);
    }

    #[test]
    fn test_non_numeric_price() {
        let err = ProductSchema::load(&json!({"product_name": "Pen", "price": "cheap"})).unwrap_err();
        assert_eq!(err.field("price"), [NOT_NUMBER]);

        let err = ProductSchema::load(&json!({"product_name": "Pen", "price": true})).unwrap_err();
        assert_eq!(err.field("price"), [NOT_NUMBER]);
    }

    #[test]
    fn test_negative_price() {
        let err = ProductSchema::load(&json!({"product_name": "Pen", "price": -0.01})).unwrap_err();
        assert_eq!(err.field("price"), [NEGATIVE]);
    }
}
