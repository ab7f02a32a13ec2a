//! `storefront-app`
//!
//! **Responsibility:** composition root for the storefront catalog.
//!
//! Builds the snapshot storage from configuration, opens the catalog with the
//! built-in seed data and hands out the provider UI code renders under.

pub mod config;
pub mod render;

use std::sync::Arc;

use anyhow::Context;

use storefront_catalog::{
    CatalogHandle, CatalogProvider, CatalogStore, FileStorage, InMemoryStorage, SeedData,
    SnapshotStorage, validate_key,
};
use storefront_core::{Clock, SystemClock};

pub use config::{AppConfig, StorageBackend};

/// Owns the catalog for the lifetime of the process.
#[derive(Debug)]
pub struct App {
    config: AppConfig,
    provider: CatalogProvider,
}

impl App {
    pub fn build(config: AppConfig) -> anyhow::Result<Self> {
        validate_key(&config.storage_key).with_context(|| {
            format!(
                "STOREFRONT_STORAGE_KEY {:?} is not a valid storage key",
                config.storage_key
            )
        })?;
        let storage = open_storage(&config.storage)?;

        let clock = Arc::new(SystemClock);
        let seed = SeedData::builtin()
            .context("built-in seed data is malformed")?
            .into_products(clock.now())
            .context("failed to decode built-in seed data")?;

        let store = CatalogStore::open_with_key(storage, config.storage_key.clone(), seed)
            .with_clock(clock);
        if let Some(err) = store.error() {
            tracing::warn!(error = err, "catalog opened with errors");
        }
        tracing::info!(
            key = store.storage_key(),
            products = store.products().len(),
            "catalog ready"
        );

        Ok(Self {
            config,
            provider: CatalogProvider::new(CatalogHandle::new(store)),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogHandle {
        self.provider.handle()
    }

    /// Run `f` inside the catalog provider scope.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        self.provider.provide(f)
    }
}

fn open_storage(backend: &StorageBackend) -> anyhow::Result<Arc<dyn SnapshotStorage>> {
    match backend {
        StorageBackend::InMemory => Ok(Arc::new(InMemoryStorage::new())),
        StorageBackend::Files(Some(dir)) => {
            let storage = FileStorage::open(dir)
                .with_context(|| format!("failed to open catalog storage at {dir:?}"))?;
            Ok(Arc::new(storage))
        }
        StorageBackend::Files(None) => {
            let storage = FileStorage::open_default()
                .context("failed to open catalog storage in the app data directory")?;
            Ok(Arc::new(storage))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::{Category, use_catalog};

    fn in_memory() -> AppConfig {
        AppConfig {
            storage: StorageBackend::InMemory,
            ..AppConfig::default()
        }
    }

    #[test]
    fn builds_with_seeded_catalog() {
        let app = App::build(in_memory()).unwrap();
        assert_eq!(app.catalog().products().len(), 12);
        assert_eq!(app.catalog().error(), None);
    }

    #[test]
    fn run_provides_the_catalog() {
        let app = App::build(in_memory()).unwrap();
        let watches = app.run(|| {
            use_catalog()
                .map(|catalog| catalog.products_by_category(Category::Watches.label()).len())
                .unwrap_or(0)
        });
        assert_eq!(watches, 3);
        assert!(use_catalog().is_err());
    }

    #[test]
    fn file_backend_persists_under_configured_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            storage: StorageBackend::Files(Some(dir.path().to_path_buf())),
            storage_key: "shop".to_string(),
            ..AppConfig::default()
        };
        App::build(config).unwrap();
        assert!(dir.path().join("shop.json").exists());
    }

    #[test]
    fn invalid_storage_key_fails_the_build() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            storage: StorageBackend::Files(Some(dir.path().to_path_buf())),
            storage_key: "my catalog".to_string(),
            ..AppConfig::default()
        };

        let err = App::build(config).unwrap_err();
        assert!(format!("{err:#}").contains("my catalog"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
