//! External representations returned by the HTTP API.
//!
//! Keys are camelCase, timestamps are RFC 3339 UTC strings and absent
//! optional values are serialized as `null`.

use serde::Serialize;
use serde_json::Value;

pub mod customers;
pub mod notifications;
pub mod templates;
pub mod tickets;

/// Body of every error response: `{"error": {"code", "message", "details"?}}`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    pub fn new(code: &'static str, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                details,
            },
        }
    }
}

/// Response of bulk updates that report how many rows changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatedCount {
    pub updated: usize,
}
