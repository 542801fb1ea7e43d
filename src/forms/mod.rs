//! Request bodies accepted by the mutation endpoints.
//!
//! Forms are deserialized from JSON, checked with `validator`, and then
//! converted into domain values. Update forms distinguish an absent field
//! (left untouched) from an explicit `null` (cleared) for nullable columns.

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod customers;
pub mod notifications;
pub mod templates;
pub mod tickets;

#[derive(Debug, Error)]
/// Errors that can occur when processing request bodies.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{field}: {source}")]
    Field {
        field: &'static str,
        source: TypeConstraintError,
    },

    #[error("update must change at least one field")]
    EmptyUpdate,
}

impl FormError {
    /// Attaches the offending field name to a domain constraint failure.
    pub fn field(field: &'static str) -> impl Fn(TypeConstraintError) -> FormError {
        move |source| FormError::Field { field, source }
    }
}

/// Maps a present field, including an explicit `null`, to `Some`.
///
/// Used with `#[serde(default)]` so that a missing field stays `None`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Drops blank optional text so it is stored as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Converts a nullable patch field: `null` and blank text clear the column.
pub(crate) fn nullable_patch<T>(
    value: Option<Option<String>>,
    field: &'static str,
    convert: impl Fn(String) -> Result<T, TypeConstraintError>,
) -> Result<Option<Option<T>>, FormError> {
    match value {
        None => Ok(None),
        Some(inner) => match non_blank(inner) {
            None => Ok(Some(None)),
            Some(text) => convert(text).map(|v| Some(Some(v))).map_err(FormError::field(field)),
        },
    }
}
