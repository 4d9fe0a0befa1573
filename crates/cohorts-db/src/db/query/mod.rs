// Query composition and write operations for the cohort tables.
pub mod cohort;
pub mod group;
pub mod membership;
pub mod partition_group;
pub mod settings;
