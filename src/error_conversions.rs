//! Conversions from domain constraint failures into layer errors.
//!
//! Kept out of `domain` so value objects stay free of service and
//! persistence types.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;
#[cfg(feature = "server")]
use crate::services::errors::ServiceError;

/// A value that fails its constraints on the way in is the caller's fault.
#[cfg(feature = "server")]
impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::validation(err.to_string())
    }
}

/// A stored row that fails them on the way out is corrupt data.
impl From<TypeConstraintError> for RepositoryError {
    fn from(err: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(err.to_string())
    }
}
