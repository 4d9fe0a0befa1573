//! Operator tooling for the course cohorts data model.

pub mod logging;
pub mod overview;
