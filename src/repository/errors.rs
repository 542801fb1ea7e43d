//! Failures of the persistence layer.
//!
//! Diesel and pool errors are collapsed into a closed set of categories at
//! this boundary; services decide what each category means for the caller.

use diesel::r2d2::{Error as R2D2Error, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// No row matched the id within the caller's organization.
    #[error("entity not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// NOT NULL and CHECK violations.
    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("connection unavailable: {0}")]
    ConnectionError(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    /// A stored value failed to convert into its domain type, or a value
    /// could not be bound into a query.
    #[error("invalid data: {0}")]
    ValidationError(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Whether the datastore rejected the write because of a constraint.
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            RepositoryError::UniqueViolation(_)
                | RepositoryError::ForeignKeyViolation(_)
                | RepositoryError::ConstraintViolation(_)
        )
    }
}

fn from_database_error(kind: DatabaseErrorKind, message: String) -> RepositoryError {
    match kind {
        DatabaseErrorKind::UniqueViolation => RepositoryError::UniqueViolation(message),
        DatabaseErrorKind::ForeignKeyViolation => RepositoryError::ForeignKeyViolation(message),
        DatabaseErrorKind::NotNullViolation | DatabaseErrorKind::CheckViolation => {
            RepositoryError::ConstraintViolation(message)
        }
        DatabaseErrorKind::ClosedConnection => RepositoryError::ConnectionError(message),
        _ => RepositoryError::DatabaseError(message),
    }
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(kind, info) => {
                from_database_error(kind, info.message().to_string())
            }
            DieselError::InvalidCString(_)
            | DieselError::SerializationError(_)
            | DieselError::DeserializationError(_)
            | DieselError::QueryBuilderError(_) => RepositoryError::ValidationError(err.to_string()),
            DieselError::RollbackTransaction
            | DieselError::AlreadyInTransaction
            | DieselError::NotInTransaction
            | DieselError::BrokenTransactionManager => {
                RepositoryError::DatabaseError(err.to_string())
            }
            other => RepositoryError::Unexpected(other.to_string()),
        }
    }
}

impl From<R2D2Error> for RepositoryError {
    fn from(err: R2D2Error) -> Self {
        RepositoryError::ConnectionError(err.to_string())
    }
}

impl From<PoolError> for RepositoryError {
    fn from(err: PoolError) -> Self {
        RepositoryError::ConnectionError(err.to_string())
    }
}
