//! Storefront product catalog.
//!
//! This crate owns the client-side catalog: the live product list, its
//! persisted snapshot in a key/value storage slot, seed decoding and currency
//! conversion, and the provider scope UI components use to reach the store.

pub mod category;
pub mod context;
pub mod currency;
pub mod product;
pub mod seed;
pub mod storage;
pub mod store;

pub use category::{Category, CategoryFilter};
pub use context::{CatalogHandle, CatalogProvider, ContextError, expect_catalog, use_catalog};
pub use product::{DEFAULT_SIZES, MediaKind, MediaRef, NewProduct, Price, Product};
pub use seed::{SeedData, SeedError};
pub use storage::{InMemoryStorage, SnapshotStorage, StorageError, validate_key};
pub use store::{CatalogStore, DEFAULT_STORAGE_KEY, SnapshotError};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
