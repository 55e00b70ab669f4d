//! Customer request schema.

use serde_json::Value;

use super::{Fields, Schema, ValidationErrors};
use crate::models::UserInput;

const NAME_MAX: usize = 100;
const ADDRESS_MAX: usize = 200;

/// Schema for `POST /users` and `PUT /users/{id}`.
///
/// | field | rule |
/// |---|---|
/// | `name` | required string, at most 100 characters |
/// | `address` | optional string or null, at most 200 characters |
/// | `email` | required email address, at most 100 characters |
/// | `id` | accepted and ignored; must be an integer if present |
pub struct UserSchema;

impl Schema for UserSchema {
    type Output = UserInput;

    fn load(body: &Value) -> Result<UserInput, ValidationErrors> {
        let mut fields = Fields::new(body, &["id", "name", "address", "email"])?;

        let _ = fields.optional_integer("id");
        let name = fields.required_string("name", NAME_MAX);
        let address = fields.optional_string("address", ADDRESS_MAX);
        let email = fields.required_email("email");

        fields.finish(|| {
            Some(UserInput {
                name: name?,
                address: address?,
                email: email?,
            })
        })
    }
}
