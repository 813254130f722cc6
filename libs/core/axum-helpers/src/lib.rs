//! # Axum Helpers
//!
//! Shared plumbing for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: router assembly, `/health`, graceful shutdown
//! - **[`errors`]**: the `{success: false, error}` failure envelope and fallbacks
//! - **[`extractors`]**: JSON-or-form body extractor

pub mod errors;
pub mod extractors;
pub mod server;

pub use errors::{FailureBody, FailureDetail};
pub use extractors::{BodyRejection, JsonOrForm};
pub use server::{HealthResponse, create_app, create_router, health_router, shutdown_signal};
