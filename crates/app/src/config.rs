//! Environment configuration for the storefront binary.

use std::path::PathBuf;

use storefront_catalog::DEFAULT_STORAGE_KEY;
use storefront_observability::LogFormat;

/// Where the catalog snapshot lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process memory; nothing survives a restart.
    InMemory,
    /// Files under a directory. `None` means the OS default data directory.
    Files(Option<PathBuf>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub storage_key: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Files(None),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// - `STOREFRONT_IN_MEMORY`: `1`/`true` keeps the catalog in memory
    /// - `STOREFRONT_DATA_DIR`: snapshot directory
    /// - `STOREFRONT_STORAGE_KEY`: snapshot slot name (default `products`)
    /// - `STOREFRONT_LOG_FORMAT`: `json` (default) or `pretty`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let in_memory = lookup("STOREFRONT_IN_MEMORY")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let storage = if in_memory {
            StorageBackend::InMemory
        } else {
            StorageBackend::Files(
                lookup("STOREFRONT_DATA_DIR")
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from),
            )
        };

        let storage_key = lookup("STOREFRONT_STORAGE_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.storage_key);

        let log_format = lookup("STOREFRONT_LOG_FORMAT")
            .and_then(|v| LogFormat::parse(&v))
            .unwrap_or(defaults.log_format);

        Self {
            storage,
            storage_key,
            log_format,
        }
    }
}
