//! Domain models.
//!
//! These are the request-scoped representations of stored rows. Each entity
//! serializes to its wire format through serde; each `*Input` type is the
//! validated field set produced by the matching [`crate::schema`] loader.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderInput};
pub use product::{Product, ProductInput};
pub use user::{User, UserInput};
