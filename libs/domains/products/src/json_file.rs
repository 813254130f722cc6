//! File-backed product store persisted as a single JSON document.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{NewProduct, Product, ProductId, UpdateProduct};
use crate::store::{CatalogState, ProductStore};

/// Decode either the `{next_id, products}` document or a bare product array.
/// The layout is chosen by the first non-blank byte so a bad file reports the
/// serde error of the layout it was meant to be.
fn decode_catalog(bytes: &[u8]) -> serde_json::Result<CatalogState> {
    let is_array = bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'[');

    if is_array {
        serde_json::from_slice::<Vec<Product>>(bytes).map(CatalogState::from_products)
    } else {
        serde_json::from_slice::<CatalogState>(bytes).map(CatalogState::normalized)
    }
}

/// Product store that keeps the catalog in memory and rewrites the JSON file
/// on every mutation.
///
/// The write lock is held across the disk write. New state is only committed
/// in memory after it reached disk, so a failed write leaves the store as it was.
#[derive(Debug)]
pub struct JsonFileProductStore {
    state: RwLock<CatalogState>,
    path: PathBuf,
}

impl JsonFileProductStore {
    /// Load the catalog from `path`. A missing or empty file starts an empty
    /// catalog; unreadable JSON is an error.
    pub async fn open<P: Into<PathBuf>>(path: P) -> CatalogResult<Self> {
        let path = path.into();

        let state = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => CatalogState::new(),
            Ok(bytes) => match decode_catalog(&bytes) {
                Ok(state) => state,
                Err(e) => {
                    return Err(CatalogError::Storage(format!(
                        "failed to parse {}: {}",
                        path.display(),
                        e
                    )));
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CatalogState::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            path = %path.display(),
            products = state.products().len(),
            next_id = state.next_id(),
            "Opened product data file"
        );

        Ok(Self {
            state: RwLock::new(state),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, state: &CatalogState) -> CatalogResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for JsonFileProductStore {
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
        let mut next = state.clone();
        let product = next.insert(product);

        self.persist(&next).await?;
        *state = next;

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn update(&self, id: ProductId, changes: UpdateProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let product = next.apply(id, changes)?;

        self.persist(&next).await?;
        *state = next;

        tracing::info!(product_id = id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<Product> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let product = next.remove(id)?;

        self.persist(&next).await?;
        *state = next;

        tracing::info!(product_id = id, "Deleted product");
        Ok(product)
    }
}
