//! Catalog Service - validation and list policy in front of a [`ProductStore`]

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateProduct, NewProduct, Product, ProductId, UpdateProduct};
use crate::store::ProductStore;

/// Parse an id or limit from request text.
///
/// Total: yields a non-negative integer or `None`. Negative numbers, decimals,
/// blanks and non-numeric text are all `None`.
pub fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

/// [`parse_id`], failing with [`CatalogError::InvalidId`].
pub fn require_id(raw: &str) -> CatalogResult<ProductId> {
    parse_id(raw).ok_or_else(|| CatalogError::InvalidId(raw.to_string()))
}

/// Service layer between untrusted request data and the store.
///
/// Ids arrive as raw path text and are parsed here, so a malformed id is
/// rejected before the store is touched.
pub struct CatalogService<S: ProductStore> {
    store: Arc<S>,
}

impl<S: ProductStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Share an existing store handle.
    pub fn from_shared(store: Arc<S>) -> Self {
        Self { store }
    }

    /// List products, keeping only the first `limit` when `limit` is a number
    /// within `1..=total`. Any other value returns the full list.
    #[instrument(skip(self))]
    pub async fn list_products(&self, limit: Option<&str>) -> CatalogResult<Vec<Product>> {
        let mut products = self.store.list().await?;

        let limit = limit
            .and_then(parse_id)
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| (1..=products.len()).contains(n));

        if let Some(n) = limit {
            products.truncate(n);
        }

        Ok(products)
    }

    /// Look up one product; `Ok(None)` when the id is valid but unknown.
    #[instrument(skip(self))]
    pub async fn get_product(&self, raw_id: &str) -> CatalogResult<Option<Product>> {
        let id = require_id(raw_id)?;
        self.store.get_by_id(id).await
    }

    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        let product = NewProduct::try_from(input)?;
        self.store.save(product).await
    }

    #[instrument(skip(self, changes))]
    pub async fn update_product(
        &self,
        raw_id: &str,
        changes: UpdateProduct,
    ) -> CatalogResult<Product> {
        let id = require_id(raw_id)?;
        changes.validate()?;
        self.store.update(id, changes).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, raw_id: &str) -> CatalogResult<Product> {
        let id = require_id(raw_id)?;
        self.store.delete(id).await
    }
}

impl<S: ProductStore> Clone for CatalogService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
