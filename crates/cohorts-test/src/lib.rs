//! Course cohorts - integration test support.
//!
//! Re-exports the workspace crates so integration tests can use a single path.

pub use cohorts_app as app;
pub use cohorts_core as shared;
pub use cohorts_db as db;
