//! Order request schemas.

use serde_json::Value;

use shopfront_core::{ProductId, UserId};

use super::{Fields, Schema, ValidationErrors};
use crate::models::OrderInput;

/// Schema for `POST /orders`.
///
/// `user_id` is a required integer. `order_date` is optional (the store
/// stamps the current time) but may not be null when given.
pub struct OrderSchema;

impl Schema for OrderSchema {
    type Output = OrderInput;

    fn load(body: &Value) -> Result<OrderInput, ValidationErrors> {
        let mut fields = Fields::new(body, &["id", "order_date", "user_id"])?;

        let _ = fields.optional_integer("id");
        let order_date = fields.optional_datetime("order_date");
        let user_id = fields.required_id::<UserId>("user_id");

        fields.finish(|| {
            Some(OrderInput {
                order_date: order_date?,
                user_id: user_id?,
            })
        })
    }
}

/// Schema for the body of `DELETE /orders/{order_id}/remove_product`.
pub struct RemoveProductSchema;

impl Schema for RemoveProductSchema {
    type Output = ProductId;

    fn load(body: &Value) -> Result<ProductId, ValidationErrors> {
        let mut fields = Fields::new(body, &["product_id"])?;
        let product_id = fields.required_id::<ProductId>("product_id");
        fields.finish(|| product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::schema::{MISSING, NOT_DATETIME, NOT_INTEGER, NULL};

    #[test]
    fn test_load_order() {
        let input = OrderSchema::load(&json!({
            "order_date": "2024-01-01T00:00:00",
            "user_id": 1
        }))
        .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(input.order_date, Some(expected));
        assert_eq!(input.user_id, UserId::new(1));
    }

    #[test]
    fn test_order_date_defaults() {
        let input = OrderSchema::load(&json!({"user_id": 4})).unwrap();
        assert_eq!(input.order_date, None);
    }

    #[test]
    fn test_order_errors() {
        let err = OrderSchema::load(&json!({"order_date": "soon"})).unwrap_err();
        assert_eq!(err.field("order_date"), [NOT_DATETIME]);
        assert_eq!(err.field("user_id"), [MISSING]);

        let err = OrderSchema::load(&json!({"order_date": null, "user_id": "x"})).unwrap_err();
        assert_eq!(err.field("order_date"), [NULL]);
        assert_eq!(err.field("user_id"), [NOT_INTEGER]);
    }

    #[test]
    fn test_remove_product_body() {
        let id = RemoveProductSchema::load(&json!({"product_id": 7})).unwrap();
        assert_eq!(id, ProductId::new(7));

        let err = RemoveProductSchema::load(&json!({})).unwrap_err();
        assert_eq!(err.field("product_id"), [MISSING]);
    }
}
