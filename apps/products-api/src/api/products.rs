//! Products API routes

use axum::Router;
use core_config::storage::{StorageBackend, StorageConfig};
use domain_products::{
    handlers, CatalogService, InMemoryProductStore, JsonFileProductStore, ProductStore,
};

/// Create products router backed by the configured store
pub async fn router(storage: &StorageConfig) -> eyre::Result<Router> {
    let router = match &storage.backend {
        StorageBackend::Memory => catalog(InMemoryProductStore::new()),
        StorageBackend::File(path) => catalog(JsonFileProductStore::open(path.clone()).await?),
    };
    Ok(router)
}

fn catalog<S: ProductStore + 'static>(store: S) -> Router {
    handlers::router(CatalogService::new(store))
}
