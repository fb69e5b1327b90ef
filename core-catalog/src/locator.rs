//! Backend selection.
//!
//! The mode is chosen once, before the first catalog is built. After
//! `open` the locator is sealed and further `set_mode` calls fail loudly;
//! mixing entities from two backend families is never possible.

use crate::backend::{sqlite::DatabaseConfig, MemoryBackend, SqliteBackend};
use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::events::EventHub;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendMode {
    /// SQLite-backed catalog.
    #[default]
    Live,
    /// In-memory stub, for tests and engineless runs.
    Stub,
}

pub struct Locator {
    mode: Mutex<BackendMode>,
    sealed: AtomicBool,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator {
    pub fn new() -> Self {
        Locator {
            mode: Mutex::new(BackendMode::default()),
            sealed: AtomicBool::new(false),
        }
    }

    pub fn with_mode(mode: BackendMode) -> Self {
        Locator {
            mode: Mutex::new(mode),
            sealed: AtomicBool::new(false),
        }
    }

    pub fn mode(&self) -> BackendMode {
        *self.mode.lock()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::SeqCst)
    }

    /// Fails once a catalog has been opened from this locator.
    pub fn set_mode(&self, mode: BackendMode) -> Result<()> {
        if self.is_sealed() {
            return Err(CatalogError::LocatorSealed);
        }
        *self.mode.lock() = mode;
        Ok(())
    }

    /// Seal the mode, build the backend and hand out the catalog root.
    /// The stub mode ignores the database configuration.
    pub async fn open(&self, config: DatabaseConfig) -> Result<Catalog> {
        let mode = {
            let mode = self.mode.lock();
            self.sealed.store(true, Ordering::SeqCst);
            *mode
        };
        info!(?mode, "opening catalog");
        let catalog = match mode {
            BackendMode::Live => {
                let backend = SqliteBackend::connect(config).await?;
                Catalog::new(Arc::new(backend), Arc::new(EventHub::new()))
            }
            BackendMode::Stub => {
                Catalog::new(Arc::new(MemoryBackend::new()), Arc::new(EventHub::new()))
            }
        };
        catalog.init().await;
        Ok(catalog)
    }

    /// Live catalog over a throwaway in-memory database.
    pub async fn open_in_memory(&self) -> Result<Catalog> {
        self.open(DatabaseConfig::in_memory()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_mode_fails_after_open() {
        let locator = Locator::new();
        locator.set_mode(BackendMode::Stub).unwrap();
        assert_eq!(locator.mode(), BackendMode::Stub);

        let catalog = locator.open_in_memory().await.unwrap();
        assert!(catalog.is_initiated().await);

        assert!(matches!(
            locator.set_mode(BackendMode::Live),
            Err(CatalogError::LocatorSealed)
        ));
    }
}
