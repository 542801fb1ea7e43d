//! Error type returned by every service operation.

use serde_json::{Value, json};
use thiserror::Error;

use crate::forms::FormError;
use crate::pagination::{CursorError, ListParamsError};
use crate::repository::errors::RepositoryError;

/// Reason a write conflicted with existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictCode {
    DuplicateEmail,
    HasDependents,
    Constraint,
}

impl ConflictCode {
    pub const fn code(self) -> &'static str {
        match self {
            ConflictCode::DuplicateEmail => "duplicate_email",
            ConflictCode::HasDependents => "has_dependents",
            ConflictCode::Constraint => "conflict",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            ConflictCode::DuplicateEmail => "a customer with this email already exists",
            ConflictCode::HasDependents => "the resource is still referenced by other records",
            ConflictCode::Constraint => "the change conflicts with existing data",
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication required")]
    Unauthorized,

    #[error("access denied")]
    Forbidden,

    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("resource not found")]
    NotFound,

    #[error("{}", .0.message())]
    Conflict(ConflictCode),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Machine readable code sent in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Unauthorized => "unauthorized",
            ServiceError::Forbidden => "forbidden",
            ServiceError::Validation { .. } => "validation_error",
            ServiceError::InvalidCursor(_) => "invalid_cursor",
            ServiceError::NotFound => "not_found",
            ServiceError::Conflict(code) => code.code(),
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::UniqueViolation(_)
            | RepositoryError::ForeignKeyViolation(_)
            | RepositoryError::ConstraintViolation(_) => {
                ServiceError::Conflict(ConflictCode::Constraint)
            }
            RepositoryError::ConnectionError(_)
            | RepositoryError::DatabaseError(_)
            | RepositoryError::ValidationError(_)
            | RepositoryError::Unexpected(_) => ServiceError::Internal(err.to_string()),
        }
    }
}

impl From<CursorError> for ServiceError {
    fn from(err: CursorError) -> Self {
        ServiceError::InvalidCursor(err.to_string())
    }
}

impl From<ListParamsError> for ServiceError {
    fn from(err: ListParamsError) -> Self {
        match err {
            ListParamsError::Cursor(err) => err.into(),
            other => ServiceError::validation(other.to_string()),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        let details = match &err {
            FormError::Validation(errors) => serde_json::to_value(errors).ok(),
            FormError::Field { field, source } => Some(json!({ *field: [source.to_string()] })),
            FormError::EmptyUpdate => None,
        };
        let message = match &err {
            FormError::Validation(_) => "request body failed validation".to_string(),
            other => other.to_string(),
        };
        ServiceError::Validation { message, details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_collapse_into_categories() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::UniqueViolation("x".into())),
            ServiceError::Conflict(ConflictCode::Constraint)
        ));
        let internal = ServiceError::from(RepositoryError::ConnectionError("pool".into()));
        assert_eq!(internal.code(), "internal_error");
    }

    #[test]
    fn cursor_errors_keep_their_own_code() {
        let err = ServiceError::from(ListParamsError::Cursor(CursorError::Encoding));
        assert_eq!(err.code(), "invalid_cursor");
        let err = ServiceError::from(ListParamsError::UnknownSort("x".into()));
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn form_errors_carry_field_details() {
        let err = ServiceError::from(FormError::Field {
            field: "email",
            source: crate::domain::types::TypeConstraintError::InvalidEmail,
        });
        match err {
            ServiceError::Validation { details, .. } => {
                assert_eq!(details, Some(json!({"email": ["invalid email address"]})));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            ServiceError::from(FormError::EmptyUpdate).code(),
            "validation_error"
        );
    }

    #[test]
    fn conflict_codes() {
        assert_eq!(
            ServiceError::Conflict(ConflictCode::DuplicateEmail).code(),
            "duplicate_email"
        );
        assert_eq!(
            ServiceError::Conflict(ConflictCode::HasDependents).code(),
            "has_dependents"
        );
    }
}
