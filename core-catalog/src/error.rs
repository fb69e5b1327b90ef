//! Catalog error types.
//!
//! Absence of data is not an error anywhere in this crate: lookups that
//! find nothing return empty vectors, `None` or `false`. The variants here
//! cover caller bugs (sealed locator, invalid input) and backend I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Underlying SQLite failure on the live backend.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Model(#[from] core_model::ModelError),

    /// `Locator::set_mode` after a catalog has been built from it.
    #[error("backend mode is sealed once a catalog has been opened")]
    LocatorSealed,

    #[error("invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
