//! Provider scope through which UI components reach the catalog.
//!
//! The composition root owns a [`CatalogHandle`] and wraps rendering in
//! [`CatalogProvider::provide`]; components call [`use_catalog`] to get the
//! handle. Calling it outside a provider is a programming error and fails
//! immediately.

use std::cell::RefCell;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use storefront_core::ProductId;

use crate::product::{NewProduct, Product};
use crate::store::CatalogStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("use_catalog must be called within a CatalogProvider scope")]
    MissingProvider,
}

/// Shared handle to a [`CatalogStore`].
///
/// Cloning is cheap; every clone sees the same catalog.
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    inner: Arc<RwLock<CatalogStore>>,
}

impl CatalogHandle {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn products(&self) -> Vec<Product> {
        self.read().products().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.read().error().map(str::to_string)
    }

    pub fn add_product(&self, candidate: NewProduct) -> ProductId {
        self.write().add_product(candidate)
    }

    pub fn update_product(&self, record: Product) -> bool {
        self.write().update_product(record)
    }

    pub fn delete_product(&self, id: &ProductId) -> bool {
        self.write().delete_product(id)
    }

    pub fn products_by_category(&self, category: &str) -> Vec<Product> {
        self.read().products_by_category(category)
    }

    /// Reload from the snapshot. The storage read happens outside the lock,
    /// so readers observe `is_loading() == true` while it runs.
    ///
    /// The lock is taken twice. A mutation made through another clone between
    /// the read and the apply is persisted but then replaced in memory by the
    /// older snapshot, and overlapping refreshes clear each other's loading
    /// flag. Both only arise with concurrent callers; the catalog assumes one
    /// UI thread.
    pub fn refresh(&self) {
        let reader = self.write().begin_refresh();
        let outcome = reader.read();
        self.write().finish_refresh(outcome);
    }

    /// Run `f` against the store under a read lock.
    pub fn with_store<R>(&self, f: impl FnOnce(&CatalogStore) -> R) -> R {
        f(&self.read())
    }
}

thread_local! {
    static PROVIDED: RefCell<Vec<CatalogHandle>> = const { RefCell::new(Vec::new()) };
}

/// Makes a catalog available to [`use_catalog`] for the duration of a call.
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    handle: CatalogHandle,
}

impl CatalogProvider {
    pub fn new(handle: CatalogHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &CatalogHandle {
        &self.handle
    }

    /// Run `f` with this provider's catalog current on this thread.
    ///
    /// Providers nest; the innermost wins. The scope is popped even if `f`
    /// panics.
    pub fn provide<R>(&self, f: impl FnOnce() -> R) -> R {
        PROVIDED.with(|stack| stack.borrow_mut().push(self.handle.clone()));
        let _scope = ScopeGuard;
        f()
    }
}

struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        PROVIDED.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// The catalog of the innermost enclosing provider.
pub fn use_catalog() -> Result<CatalogHandle, ContextError> {
    PROVIDED
        .with(|stack| stack.borrow().last().cloned())
        .ok_or(ContextError::MissingProvider)
}

/// Like [`use_catalog`], but panics outside a provider.
pub fn expect_catalog() -> CatalogHandle {
    match use_catalog() {
        Ok(handle) => handle,
        Err(err) => panic!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::product::Price;
    use crate::storage::InMemoryStorage;

    fn handle_with(names: &[&str]) -> CatalogHandle {
        let mut store = CatalogStore::open(Arc::new(InMemoryStorage::new()), Vec::new());
        for name in names {
            store.add_product(NewProduct::new(
                *name,
                Category::Bags,
                Price::new(100.0).unwrap(),
            ));
        }
        CatalogHandle::new(store)
    }

    #[test]
    fn outside_provider_is_an_error() {
        assert_eq!(use_catalog().unwrap_err(), ContextError::MissingProvider);
    }

    #[test]
    #[should_panic(expected = "within a CatalogProvider scope")]
    fn expect_outside_provider_panics() {
        let _ = expect_catalog();
    }

    #[test]
    fn provider_exposes_its_handle() {
        let provider = CatalogProvider::new(handle_with(&["Tote"]));
        let names = provider.provide(|| {
            let catalog = use_catalog().unwrap();
            catalog.products().into_iter().map(|p| p.name).collect::<Vec<_>>()
        });
        assert_eq!(names, vec!["Tote"]);
        assert!(use_catalog().is_err());
    }

    #[test]
    fn innermost_provider_wins() {
        let outer = CatalogProvider::new(handle_with(&["Outer"]));
        let inner = CatalogProvider::new(handle_with(&["Inner"]));

        outer.provide(|| {
            inner.provide(|| {
                assert_eq!(expect_catalog().products()[0].name, "Inner");
            });
            assert_eq!(expect_catalog().products()[0].name, "Outer");
        });
    }

    #[test]
    fn scope_is_popped_after_panic() {
        let provider = CatalogProvider::new(handle_with(&[]));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            provider.provide(|| -> usize { panic!("render failed") })
        }));
        assert!(result.is_err());
        assert!(use_catalog().is_err());
    }

    #[test]
    fn clones_share_state() {
        let handle = handle_with(&[]);
        let other = handle.clone();
        let id = handle.add_product(NewProduct::new(
            "Duffel",
            Category::Bags,
            Price::new(1.0).unwrap(),
        ));
        assert_eq!(other.products().len(), 1);
        assert!(other.delete_product(&id));
        assert!(handle.products().is_empty());
        assert!(!handle.is_loading());
        assert_eq!(handle.error(), None);
    }
}
