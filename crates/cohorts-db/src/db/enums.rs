//! Database enum types with Diesel serialization.
//!
//! This module provides type-safe enum wrappers for database CHECK constraints.
//! Each enum implements `ToSql` and `FromSql` for automatic conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::DbError;

/// Kind of a course user group.
///
/// Maps to `course_groups_courseusergroup.group_type` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    /// A cohort; a learner is in at most one cohort per course.
    Cohort,
}

impl ToSql<Text, Pg> for GroupType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for GroupType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"cohort" => Ok(Self::Cohort),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl GroupType {
    /// Returns the database string representation of this group type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cohort => "cohort",
        }
    }
}

impl FromStr for GroupType {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cohort" => Ok(Self::Cohort),
            other => Err(DbError::ValidationError(format!(
                "unknown group type {other:?}"
            ))),
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How learners are placed into a cohort.
///
/// Maps to `course_groups_coursecohort.assignment_type` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    /// Learners may be placed automatically.
    Random,
    /// Learners are only placed by staff.
    #[default]
    Manual,
}

impl ToSql<Text, Pg> for AssignmentType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for AssignmentType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"random" => Ok(Self::Random),
            b"manual" => Ok(Self::Manual),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl AssignmentType {
    /// Returns the database string representation of this assignment type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Manual => "manual",
        }
    }
}

impl FromStr for AssignmentType {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "manual" => Ok(Self::Manual),
            other => Err(DbError::ValidationError(format!(
                "unknown assignment type {other:?}"
            ))),
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
