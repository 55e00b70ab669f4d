//! Customer domain types.

use serde::Serialize;

use shopfront_core::{Email, UserId};

/// A customer.
///
/// Serializes as `{"id", "name", "address", "email"}`; a missing address is
/// emitted as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Postal address, if given.
    pub address: Option<String>,
    /// Email address, unique across users.
    pub email: Email,
}

/// Validated fields for creating or replacing a customer.
///
/// Updates replace every field; leaving `address` out clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub name: String,
    pub address: Option<String>,
    pub email: Email,
}
