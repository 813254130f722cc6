//! Products Domain
//!
//! The product catalog: a store that owns product records, and a service that
//! validates requests before they reach it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, `{success, ...}` envelopes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← id parsing, create validation, list limit
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Store    │  ← trait + in-memory and JSON file implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product, request bodies, envelopes
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, CatalogService, JsonFileProductStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonFileProductStore::open("data/products.json").await?;
//! let service = CatalogService::new(store);
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod json_file;
pub mod models;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult, ErrorKind};
pub use handlers::ApiDoc;
pub use json_file::JsonFileProductStore;
pub use models::{
    CreateProduct, DeletedProductResponse, NewProduct, Product, ProductId, ProductListResponse,
    ProductResponse, UpdateProduct,
};
pub use service::{CatalogService, parse_id, require_id};
pub use store::{CatalogState, InMemoryProductStore, ProductStore};
