use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::FailureBody;
use strum::{Display, EnumString};
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::ProductId;

pub const INVALID_ID_MESSAGE: &str = "Id must be a non-negative integer";
pub const PRODUCT_NOT_FOUND_MESSAGE: &str = "Product not found";

/// Discriminant callers branch on instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ErrorKind {
    ValidationError,
    NotFoundError,
    InvalidIdError,
    Unknown,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error("Product with id {0} not found")]
    NotFound(ProductId),

    #[error("Invalid product id '{0}'")]
    InvalidId(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation(_) => ErrorKind::ValidationError,
            CatalogError::NotFound(_) => ErrorKind::NotFoundError,
            CatalogError::InvalidId(_) => ErrorKind::InvalidIdError,
            CatalogError::Storage(_) | CatalogError::Internal(_) => ErrorKind::Unknown,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::ValidationError | ErrorKind::InvalidIdError => StatusCode::BAD_REQUEST,
            ErrorKind::NotFoundError => StatusCode::NOT_FOUND,
            ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing failure body. `Unknown` failures never expose their message.
    pub fn to_failure(&self) -> FailureBody {
        match self.kind() {
            ErrorKind::ValidationError => {
                FailureBody::keyed(ErrorKind::ValidationError.to_string(), self.to_string())
            }
            ErrorKind::NotFoundError => {
                FailureBody::message(format!("{}: {}", ErrorKind::NotFoundError, self))
            }
            ErrorKind::InvalidIdError => FailureBody::message(INVALID_ID_MESSAGE),
            ErrorKind::Unknown => FailureBody::internal(),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::Unknown => tracing::error!(error = %self, "Unexpected catalog failure"),
            kind => tracing::info!(%kind, "Catalog request rejected: {}", self),
        }
        self.to_failure().with_status(self.status())
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        CatalogError::Validation(format!(
            "Missing or invalid required fields: {}",
            fields.join(", ")
        ))
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Storage(err.to_string())
    }
}
