use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{NewProduct, Product, ProductId, UpdateProduct};

/// Storage interface for the product catalog.
///
/// Implementations own the collection exclusively and do no validation beyond
/// existence checks. Mutations must be serialized so id assignment never races.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products in creation order
    async fn list(&self) -> CatalogResult<Vec<Product>>;

    /// The matching product, or `None`
    async fn get_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// Assign the next id and store the product
    async fn save(&self, product: NewProduct) -> CatalogResult<Product>;

    /// Merge `changes` over an existing product
    async fn update(&self, id: ProductId, changes: UpdateProduct) -> CatalogResult<Product>;

    /// Remove a product and return it
    async fn delete(&self, id: ProductId) -> CatalogResult<Product>;
}

fn first_id() -> ProductId {
    1
}

/// The collection plus its id counter; shared by every store backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogState {
    #[serde(default = "first_id")]
    next_id: ProductId,
    #[serde(default)]
    products: Vec<Product>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogState {
    pub fn new() -> Self {
        Self {
            next_id: first_id(),
            products: Vec::new(),
        }
    }

    /// Rebuild state from a bare product list, e.g. a hand-written data file.
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            next_id: first_id(),
            products,
        }
        .normalized()
    }

    /// Raise `next_id` above every stored id so a tampered counter cannot
    /// hand out an id that is already taken.
    pub fn normalized(mut self) -> Self {
        let floor = self
            .products
            .iter()
            .map(|p| p.id.saturating_add(1))
            .max()
            .unwrap_or_else(first_id);
        self.next_id = self.next_id.max(floor);
        self
    }

    pub fn next_id(&self) -> ProductId {
        self.next_id
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn insert(&mut self, new: NewProduct) -> Product {
        let id = self.next_id;
        self.next_id += 1;

        let product = Product::new(id, new);
        self.products.push(product.clone());
        product
    }

    pub fn apply(&mut self, id: ProductId, changes: UpdateProduct) -> CatalogResult<Product> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        product.apply_update(changes);
        Ok(product.clone())
    }

    pub fn remove(&mut self, id: ProductId) -> CatalogResult<Product> {
        let position = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        Ok(self.products.remove(position))
    }
}

/// Volatile store; contents are lost when the process exits.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductStore {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing products, keeping their ids.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            state: Arc::new(RwLock::new(CatalogState::from_products(products))),
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> CatalogResult<Vec<Product>> {
        let state = self.state.read().await;
        Ok(state.products().to_vec())
    }

    async fn get_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.get(id).cloned())
    }

    async fn save(&self, product: NewProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;
        let product = state.insert(product);

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn update(&self, id: ProductId, changes: UpdateProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;
        let product = state.apply(id, changes)?;

        tracing::info!(product_id = id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<Product> {
        let mut state = self.state.write().await;
        let product = state.remove(id)?;

        tracing::info!(product_id = id, "Deleted product");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn new_product(title: &str) -> NewProduct {
        NewProduct {
            title: title.to_string(),
            description: format!("{} description", title),
            price: 10.0,
            code: format!("{}-code", title),
        }
    }

    #[tokio::test]
    async fn test_save_and_get_product() {
        let store = InMemoryProductStore::new();

        let product = store.save(new_product("mug")).await.unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.title, "mug");

        let fetched = store.get_by_id(product.id).await.unwrap();
        assert_eq!(fetched, Some(product));
        assert_eq!(store.get_by_id(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ids_are_never_reused_after_delete() {
        let store = InMemoryProductStore::new();
        let mut seen = HashSet::new();

        for round in 0..5 {
            let a = store.save(new_product(&format!("a{}", round))).await.unwrap();
            let b = store.save(new_product(&format!("b{}", round))).await.unwrap();
            assert!(seen.insert(a.id));
            assert!(seen.insert(b.id));
            store.delete(a.id).await.unwrap();
        }

        let last = store.save(new_product("last")).await.unwrap();
        assert!(!seen.contains(&last.id));
        assert_eq!(last.id, 11);
    }

    #[tokio::test]
    async fn test_list_keeps_creation_order() {
        let store = InMemoryProductStore::new();
        for name in ["one", "two", "three"] {
            store.save(new_product(name)).await.unwrap();
        }
        store.delete(2).await.unwrap();
        store.save(new_product("four")).await.unwrap();

        let titles: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["one", "three", "four"]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = InMemoryProductStore::new();
        let original = store.save(new_product("lamp")).await.unwrap();

        let updated = store
            .update(
                original.id,
                UpdateProduct {
                    price: Some(50.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, 50.0);
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.description, original.description);
        assert_eq!(updated.code, original.code);
        assert_eq!(store.get_by_id(original.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_not_found() {
        let store = InMemoryProductStore::new();

        let update = store.update(5, UpdateProduct::default()).await;
        assert!(matches!(update, Err(CatalogError::NotFound(5))));

        let delete = store.delete(5).await;
        assert!(matches!(delete, Err(CatalogError::NotFound(5))));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_product() {
        let store = InMemoryProductStore::new();
        let saved = store.save(new_product("chair")).await.unwrap();

        let deleted = store.delete(saved.id).await.unwrap();
        assert_eq!(deleted, saved);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_saves_get_distinct_ids() {
        let store = InMemoryProductStore::new();

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.save(new_product(&format!("p{}", i))).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let product = handle.await.unwrap().unwrap();
            assert!(ids.insert(product.id));
        }
        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn test_seeded_store_continues_after_highest_id() {
        let seeded = Product::new(41, new_product("seed"));
        let store = InMemoryProductStore::with_products(vec![seeded]);

        let next = store.save(new_product("next")).await.unwrap();
        assert_eq!(next.id, 42);
    }

    #[test]
    fn test_normalized_raises_stale_counter() {
        let mut state = CatalogState::new();
        state.insert(new_product("a"));
        state.insert(new_product("b"));
        state.next_id = 1;

        assert_eq!(state.normalized().next_id(), 3);
    }
}
