use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};
use thiserror::Error;

use cohorts_core::error::CoreError;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    /// A unique constraint is already satisfied by another row.
    #[error("Uniqueness violation on {}: {message}", .constraint.as_deref().unwrap_or("unknown constraint"))]
    UniquenessViolation {
        constraint: Option<String>,
        message: String,
    },

    /// A referenced group, user or course does not exist.
    #[error("Referential integrity violation on {}: {message}", .constraint.as_deref().unwrap_or("unknown constraint"))]
    ReferentialIntegrityViolation {
        constraint: Option<String>,
        message: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),
}

impl DbError {
    #[must_use]
    pub const fn is_uniqueness_violation(&self) -> bool {
        matches!(self, Self::UniquenessViolation { .. })
    }

    #[must_use]
    pub const fn is_referential_integrity_violation(&self) -> bool {
        matches!(self, Self::ReferentialIntegrityViolation { .. })
    }

    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Error for a write that references a row which does not exist.
    #[must_use]
    pub fn missing_reference(constraint: &str, message: impl Into<String>) -> Self {
        Self::ReferentialIntegrityViolation {
            constraint: Some(constraint.to_owned()),
            message: message.into(),
        }
    }
}

fn constraint_of(info: &(dyn DatabaseErrorInformation + Send + Sync)) -> Option<String> {
    info.constraint_name().map(str::to_owned)
}

impl From<diesel::result::Error> for DbError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniquenessViolation {
                    constraint: constraint_of(info.as_ref()),
                    message: info.message().to_owned(),
                }
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ReferentialIntegrityViolation {
                    constraint: constraint_of(info.as_ref()),
                    message: info.message().to_owned(),
                }
            }
            diesel::result::Error::DatabaseError(
                DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation,
                info,
            ) => Self::ValidationError(info.message().to_owned()),
            other => Self::DatabaseError(other),
        }
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(message) => Self::ValidationError(message),
        }
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;
