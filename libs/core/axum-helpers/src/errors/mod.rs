pub mod handlers;
pub mod messages;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Failure half of the `{success, ...}` envelope.
///
/// Every error leaving the API is rendered through this type so clients can
/// branch on `success` alone.
///
/// # JSON Examples
///
/// ```json
/// { "success": false, "error": "Product not found" }
/// { "success": false, "error": { "ValidationError": "Missing required fields: price" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FailureBody {
    /// Always `false`
    pub success: bool,
    /// Plain message, or a map keyed by error kind
    pub error: FailureDetail,
}

/// Payload of the `error` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FailureDetail {
    Message(String),
    Keyed(BTreeMap<String, String>),
}

impl FailureBody {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: FailureDetail::Message(message.into()),
        }
    }

    /// Single-entry keyed failure, e.g. `{ "ValidationError": "..." }`
    pub fn keyed(key: impl Into<String>, message: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(key.into(), message.into());
        Self {
            success: false,
            error: FailureDetail::Keyed(map),
        }
    }

    /// The opaque body used for anything that must not leak internals
    pub fn internal() -> Self {
        Self::message(messages::INTERNAL_ERROR)
    }

    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
