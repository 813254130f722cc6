//! Request body extractor accepting JSON or URL-encoded forms.

use crate::errors::FailureBody;
use axum::{
    extract::{Form, FromRequest, Json, Request},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Body extractor that picks the decoder from `Content-Type`.
///
/// `application/x-www-form-urlencoded` is decoded as a form; everything else
/// goes through the JSON extractor, so a missing or wrong content type is
/// reported the same way axum's `Json` reports it.
///
/// # Example
/// ```ignore
/// async fn create(body: Result<JsonOrForm<CreateThing>, BodyRejection>) -> Response {
///     match body {
///         Ok(JsonOrForm(input)) => { /* ... */ }
///         Err(rejection) => rejection.into_response(),
///     }
/// }
/// ```
pub struct JsonOrForm<T>(pub T);

/// Why a body could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRejection {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        tracing::info!(status = %self.status, "Rejected request body: {}", self.message);
        FailureBody::message(self.message).with_status(self.status)
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(data) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| BodyRejection {
                    status: e.status(),
                    message: e.body_text(),
                })?;
            return Ok(JsonOrForm(data));
        }

        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| BodyRejection {
                status: e.status(),
                message: e.body_text(),
            })?;

        Ok(JsonOrForm(data))
    }
}
