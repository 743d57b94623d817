//! # Catalog Lock
//!
//! Products and variants live in separate store actors, so "a product with variants cannot
//! be deleted" spans two stores. [`CatalogLock`] is shared by the product and variant
//! services to keep that rule atomic:
//!
//! - variant create holds it **shared** from the parent check until the insert commits
//! - product delete holds it **exclusive** from the existence check until the delete commits
//!
//! Creates under different products still run side by side; only a product delete waits
//! for in-flight creates and blocks new ones.

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default)]
pub struct CatalogLock {
    inner: Arc<RwLock<()>>,
}

impl CatalogLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Held while a variant is attached to its product.
    pub async fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.inner.read().await
    }

    /// Held while a product is checked for variants and removed.
    pub async fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.inner.write().await
    }
}
