//! Persistence layer for course cohorts.
//!
//! - [`db`] holds the schema, column enums, connection pool and the query operations.
//! - [`model`] holds the record types read from and written to each table.

pub mod db;
pub mod error;
pub mod model;
