//! Catalog dispatch layer: per-entity store traits, the SQLite and
//! in-memory backends, the sealed backend locator and the [`Catalog`]
//! facade UI code talks to.

pub mod backend;
pub mod catalog;
pub mod error;
pub mod events;
pub mod locator;

pub use backend::sqlite::DatabaseConfig;
pub use backend::{CatalogBackend, MemoryBackend, SqliteBackend};
pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use events::EventHub;
pub use locator::{BackendMode, Locator};
