//! Contact records with any number of phone numbers, stored in PostgreSQL.
//!
//! A [`db::Database`] owns one connection and is passed to every entity operation.
//! [`models::Client`] and [`models::Phone`] map to the `clients` and `phones` tables.

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use db::{Database, SqlParam};
pub use error::{ContactError, Result};
pub use models::{Client, ClientLookup, ClientRecord, ClientUpdate, Phone};
