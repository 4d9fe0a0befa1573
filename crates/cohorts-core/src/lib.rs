//! Core types and configuration for the course cohorts data model.
//!
//! This crate has no database dependency; it carries the pieces shared by the
//! storage layer and the operator binary.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
