//! Opaque pagination tokens.
//!
//! A cursor is base64url-encoded JSON `{"v":1,"sortValue":…,"id":…}` that
//! records the position of the last row of a page. Tokens arrive from the
//! network, so decoding treats every input as hostile and reports all
//! failures as [`CursorError`].

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};
use thiserror::Error;

/// Version tag written into every token.
pub const CURSOR_VERSION: u64 = 1;

/// Upper bound on the accepted token length, checked before decoding.
pub const MAX_CURSOR_LEN: usize = 1024;

const CURSOR_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Reasons a pagination token was rejected.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CursorError {
    #[error("cursor is too long")]
    TooLong,
    #[error("cursor is not valid base64url")]
    Encoding,
    #[error("cursor payload is malformed")]
    Payload,
    #[error("unsupported cursor version")]
    Version,
    #[error("cursor id is empty")]
    EmptyId,
    #[error("cursor sort value does not match the sort field")]
    SortValueMismatch,
}

/// Last-seen value of the sort column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortValue {
    Number(Number),
    Text(String),
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        SortValue::Text(value)
    }
}

impl From<i64> for SortValue {
    fn from(value: i64) -> Self {
        SortValue::Number(value.into())
    }
}

impl From<i32> for SortValue {
    fn from(value: i32) -> Self {
        SortValue::Number(value.into())
    }
}

/// Decoded position of the last row returned to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPayload {
    pub sort_value: SortValue,
    /// Primary key of the row, used as the tie-break.
    pub id: String,
}

#[derive(Deserialize)]
struct WireCursor {
    v: u64,
    #[serde(rename = "sortValue")]
    sort_value: SortValue,
    id: String,
}

impl CursorPayload {
    pub fn new(sort_value: impl Into<SortValue>, id: impl Into<String>) -> Self {
        Self {
            sort_value: sort_value.into(),
            id: id.into(),
        }
    }

    /// Serializes the payload into a URL-safe token.
    pub fn encode(&self) -> String {
        let sort_value = match &self.sort_value {
            SortValue::Number(n) => Value::Number(n.clone()),
            SortValue::Text(s) => Value::String(s.clone()),
        };
        let payload = json!({
            "v": CURSOR_VERSION,
            "sortValue": sort_value,
            "id": self.id,
        });
        CURSOR_ENGINE.encode(payload.to_string())
    }

    /// Parses a token produced by [`CursorPayload::encode`].
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        if token.len() > MAX_CURSOR_LEN {
            return Err(CursorError::TooLong);
        }
        let bytes = CURSOR_ENGINE
            .decode(token)
            .map_err(|_| CursorError::Encoding)?;
        let wire: WireCursor =
            serde_json::from_slice(&bytes).map_err(|_| CursorError::Payload)?;
        if wire.v != CURSOR_VERSION {
            return Err(CursorError::Version);
        }
        if wire.id.is_empty() {
            return Err(CursorError::EmptyId);
        }
        Ok(Self {
            sort_value: wire.sort_value,
            id: wire.id,
        })
    }
}
