//! The catalog store: live product list plus its persisted snapshot.
//!
//! Every applied mutation rewrites the whole list into one storage slot
//! (last writer wins; there is no versioning). Two stores sharing a slot will
//! overwrite each other.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use storefront_core::entity::position_of;
use storefront_core::{Clock, ProductId, SystemClock};

use crate::category::{Category, CategoryFilter};
use crate::product::{NewProduct, Product};
use crate::storage::{SnapshotStorage, StorageError};

/// Slot the catalog snapshot is kept under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "products";

pub const LOAD_FAILED: &str = "Failed to load products";
pub const REFRESH_FAILED: &str = "Failed to refresh products";
pub const SAVE_FAILED: &str = "Failed to save products";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("malformed catalog snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reads the persisted snapshot without holding the store.
///
/// Handed out by [`CatalogStore::begin_refresh`] so a shared handle can read
/// storage outside its lock.
#[derive(Clone)]
pub struct SnapshotReader {
    storage: Arc<dyn SnapshotStorage>,
    key: String,
}

impl SnapshotReader {
    pub fn read(&self) -> Result<Option<Vec<Product>>, SnapshotError> {
        match self.storage.get_item(&self.key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

pub struct CatalogStore {
    products: Vec<Product>,
    seed: Vec<Product>,
    storage: Arc<dyn SnapshotStorage>,
    key: String,
    clock: Arc<dyn Clock>,
    loading: bool,
    error: Option<String>,
}

impl core::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("key", &self.key)
            .field("products", &self.products.len())
            .field("seed", &self.seed.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish()
    }
}

impl CatalogStore {
    /// Open the catalog under [`DEFAULT_STORAGE_KEY`].
    pub fn open(storage: Arc<dyn SnapshotStorage>, seed: Vec<Product>) -> Self {
        Self::open_with_key(storage, DEFAULT_STORAGE_KEY, seed)
    }

    /// Open the catalog.
    ///
    /// A parseable snapshot is adopted verbatim. With no snapshot the seed list
    /// becomes the catalog and is persisted. An unreadable snapshot also falls
    /// back to the seed list (left unpersisted) and records an error message.
    pub fn open_with_key(
        storage: Arc<dyn SnapshotStorage>,
        key: impl Into<String>,
        seed: Vec<Product>,
    ) -> Self {
        let mut store = Self {
            products: Vec::new(),
            seed,
            storage,
            key: key.into(),
            clock: Arc::new(SystemClock),
            loading: false,
            error: None,
        };

        match store.reader().read() {
            Ok(Some(products)) => {
                info!(key = %store.key, count = products.len(), "restored catalog snapshot");
                store.products = products;
            }
            Ok(None) => {
                info!(key = %store.key, count = store.seed.len(), "no catalog snapshot; seeding");
                store.products = store.seed.clone();
                store.persist();
            }
            Err(err) => {
                warn!(key = %store.key, error = %err, "unreadable catalog snapshot; using seed");
                store.products = store.seed.clone();
                store.error = Some(LOAD_FAILED.to_string());
            }
        }

        store
    }

    /// Replace the time source used for ids and timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        position_of(&self.products, id).map(|idx| &self.products[idx])
    }

    /// Distinct categories present in the catalog, in display order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.products.iter().any(|p| p.category == *c))
            .collect()
    }

    /// Add a product and persist the catalog.
    ///
    /// The id is the current time in milliseconds, moved forward one
    /// millisecond at a time while it collides with an existing id.
    pub fn add_product(&mut self, candidate: NewProduct) -> ProductId {
        let now = self.clock.now();
        let mut millis = now.timestamp_millis();
        while position_of(&self.products, &ProductId::from_millis(millis)).is_some() {
            millis += 1;
        }
        let id = ProductId::from_millis(millis);

        let product = candidate.into_product(id.clone(), now);
        info!(id = %id, category = %product.category, "product added");
        self.products.push(product);
        self.persist();
        id
    }

    /// Replace the product with the record's id.
    ///
    /// The replacement is wholesale; only `updatedAt` is restamped. Returns
    /// `false` (and changes nothing) when no product has that id.
    pub fn update_product(&mut self, mut record: Product) -> bool {
        let Some(idx) = position_of(&self.products, &record.id) else {
            debug!(id = %record.id, "update ignored; no such product");
            return false;
        };

        record.updated_at = self.clock.now().max(record.created_at);
        info!(id = %record.id, "product updated");
        self.products[idx] = record;
        self.persist();
        true
    }

    /// Remove the product with `id`. Returns `false` when absent.
    pub fn delete_product(&mut self, id: &ProductId) -> bool {
        let Some(idx) = position_of(&self.products, id) else {
            debug!(id = %id, "delete ignored; no such product");
            return false;
        };

        self.products.remove(idx);
        info!(id = %id, "product deleted");
        self.persist();
        true
    }

    /// Products in `category`, or all of them for `"All"`.
    ///
    /// Matching is exact and case-sensitive; an unknown label matches nothing.
    pub fn products_by_category(&self, category: &str) -> Vec<Product> {
        match category.parse::<CategoryFilter>() {
            Ok(filter) => self.filter(&filter),
            Err(_) => {
                debug!(category, "unknown category filter");
                Vec::new()
            }
        }
    }

    pub fn filter(&self, filter: &CategoryFilter) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| filter.matches(p.category))
            .cloned()
            .collect()
    }

    /// Reload the catalog from its snapshot.
    ///
    /// Adopts the snapshot when present, resets to the seed list when the slot
    /// is empty, and leaves the list untouched on a read or parse failure.
    /// The loading flag is cleared on every path.
    pub fn refresh(&mut self) {
        let reader = self.begin_refresh();
        let outcome = reader.read();
        self.finish_refresh(outcome);
    }

    /// First half of [`refresh`](Self::refresh): raise the loading flag.
    pub fn begin_refresh(&mut self) -> SnapshotReader {
        self.loading = true;
        self.reader()
    }

    /// Second half of [`refresh`](Self::refresh): apply the read outcome and
    /// lower the loading flag.
    pub fn finish_refresh(&mut self, outcome: Result<Option<Vec<Product>>, SnapshotError>) {
        match outcome {
            Ok(Some(products)) => {
                debug!(count = products.len(), "catalog refreshed from snapshot");
                self.products = products;
                self.error = None;
            }
            Ok(None) => {
                debug!("catalog snapshot missing; reset to seed");
                self.products = self.seed.clone();
                self.error = None;
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "catalog refresh failed");
                self.error = Some(REFRESH_FAILED.to_string());
            }
        }
        self.loading = false;
    }

    fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            storage: Arc::clone(&self.storage),
            key: self.key.clone(),
        }
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.products)
            .map_err(SnapshotError::from)
            .and_then(|raw| Ok(self.storage.set_item(&self.key, &raw)?));

        match result {
            Ok(()) => {
                if self.error.as_deref() == Some(SAVE_FAILED) {
                    self.error = None;
                }
            }
            Err(err) => {
                error!(key = %self.key, error = %err, "failed to persist catalog snapshot");
                self.error = Some(SAVE_FAILED.to_string());
            }
        }
    }
}
