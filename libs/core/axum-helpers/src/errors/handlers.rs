use axum::{http::StatusCode, response::Response};
use std::any::Any;

use super::{FailureBody, messages};

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    FailureBody::message(messages::ROUTE_NOT_FOUND).with_status(StatusCode::NOT_FOUND)
}

/// Handler for 405 Method Not Allowed.
pub async fn method_not_allowed() -> Response {
    FailureBody::message(messages::METHOD_NOT_ALLOWED).with_status(StatusCode::METHOD_NOT_ALLOWED)
}

/// Turns a handler panic into the opaque failure envelope.
///
/// Wired through `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Request handler panicked");

    FailureBody::internal().with_status(StatusCode::INTERNAL_SERVER_ERROR)
}
