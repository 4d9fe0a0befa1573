pub mod cohort;
pub mod group;
pub mod user;
