//! Shopfront data API library.
//!
//! The HTTP/JSON service for users, products and orders, exposed as a
//! library so the binary, the CLI and the tests share one router and one
//! set of repositories.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod state;
