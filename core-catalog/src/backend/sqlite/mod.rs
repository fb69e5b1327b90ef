//! SQLite-backed live backend.
//!
//! Connection pooling, WAL journaling and embedded migrations; one
//! submodule per store trait. Entities are mapped from rows by hand since
//! the model crate knows nothing about the database.

use crate::error::Result;
use core_model::{artist, Media, MediaKind, StateFlags};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

mod album;
mod artist_store;
mod control;
mod folder;
mod genre;
mod history;
mod media;
mod playlist;
mod subscription;
mod video_group;

/// SQLite pool configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `sqlite:catalog.db`, or `sqlite::memory:` for tests.
    pub database_url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        DatabaseConfig {
            database_url: database_url.into(),
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn in_memory() -> Self {
        // A single connection keeps the in-memory database alive.
        DatabaseConfig {
            database_url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// The live backend: every store trait implemented over one pool.
pub struct SqliteBackend {
    pool: SqlitePool,
    initiated: AtomicBool,
    paused: AtomicBool,
}

impl SqliteBackend {
    /// Open the pool, apply pragmas and run migrations.
    pub async fn connect(config: DatabaseConfig) -> Result<Self> {
        info!(url = %config.database_url, "opening catalog database");
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        debug!("migrations applied");

        Ok(SqliteBackend {
            pool,
            initiated: AtomicBool::new(false),
            paused: AtomicBool::new(false),
        })
    }

    /// Throwaway database for tests.
    pub async fn in_memory() -> Result<Self> {
        Self::connect(DatabaseConfig::in_memory()).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub(crate) fn ready(&self) -> bool {
        self.initiated.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_initiated(&self) -> bool {
        !self.initiated.swap(true, Ordering::SeqCst)
    }

    /// Verify the pool answers queries.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Write surface for importers: store a media entity, linking the
    /// artist/album/genre rows its tags name, and return the stored copy.
    pub async fn insert_media(&self, media: &Media) -> Result<Media> {
        let mut stored = media.clone();
        if stored.insertion_date == 0 {
            stored.insertion_date = chrono::Utc::now().timestamp();
        }
        let slaves = serde_json::to_string(&stored.slaves)
            .map_err(|e| crate::error::CatalogError::InvalidInput {
                field: "slaves".to_string(),
                message: e.to_string(),
            })?;

        let mut tx = self.pool.begin().await?;
        let id = sqlx::query(
            "INSERT INTO media (location, kind, title, display_title, filename, artist, genre, \
             album, album_artist, width, height, artwork_url, audio_track, spu_track, \
             track_number, disc_number, duration_ms, position_ms, last_modified, seen, \
             insertion_date, release_date, thumbnail_generated, present, favorite, slaves) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&stored.location)
        .bind(stored.kind.as_i64())
        .bind(&stored.title)
        .bind(&stored.display_title)
        .bind(&stored.filename)
        .bind(&stored.artist)
        .bind(&stored.genre)
        .bind(&stored.album)
        .bind(&stored.album_artist)
        .bind(stored.width as i64)
        .bind(stored.height as i64)
        .bind(&stored.artwork_url)
        .bind(stored.audio_track)
        .bind(stored.spu_track)
        .bind(stored.track_number as i64)
        .bind(stored.disc_number as i64)
        .bind(stored.duration_ms)
        .bind(stored.position_ms)
        .bind(stored.last_modified)
        .bind(stored.seen)
        .bind(stored.insertion_date)
        .bind(stored.release_date)
        .bind(stored.thumbnail_generated)
        .bind(stored.present)
        .bind(stored.flags.contains(StateFlags::FAVORITE))
        .bind(slaves)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        stored.id = id;

        if stored.kind == MediaKind::Audio {
            if let Some(name) = stored.reference_artist() {
                sqlx::query("INSERT OR IGNORE INTO artists (name) VALUES (?)")
                    .bind(name)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query(
                    "UPDATE artists SET nb_tracks = nb_tracks + 1, \
                     nb_present_tracks = nb_present_tracks + ? WHERE name = ?",
                )
                .bind(stored.present as i64)
                .bind(name)
                .execute(&mut *tx)
                .await?;
            }
            if let Some(title) = stored.album.as_deref().filter(|t| !t.is_empty()) {
                sqlx::query(
                    "INSERT OR IGNORE INTO albums (title, album_artist) VALUES (?, ?)",
                )
                .bind(title)
                .bind(stored.reference_artist())
                .execute(&mut *tx)
                .await?;
                sqlx::query(
                    "UPDATE albums SET nb_tracks = nb_tracks + 1, \
                     nb_present_tracks = nb_present_tracks + ?, \
                     duration_ms = duration_ms + ? WHERE title = ?",
                )
                .bind(stored.present as i64)
                .bind(stored.duration_ms.max(0))
                .bind(title)
                .execute(&mut *tx)
                .await?;
            }
            if let Some(genre) = stored.genre.as_deref().filter(|g| !g.is_empty()) {
                sqlx::query(
                    "INSERT OR IGNORE INTO genres (name) \
                     SELECT ? WHERE NOT EXISTS \
                     (SELECT 1 FROM genres WHERE name = ? COLLATE NOCASE)",
                )
                .bind(genre)
                .bind(genre)
                .execute(&mut *tx)
                .await?;
                sqlx::query(
                    "UPDATE genres SET nb_tracks = nb_tracks + 1, \
                     nb_present_tracks = nb_present_tracks + ? \
                     WHERE name = ? COLLATE NOCASE",
                )
                .bind(stored.present as i64)
                .bind(genre)
                .execute(&mut *tx)
                .await?;
            }
        }
        tx.commit().await?;
        Ok(stored)
    }
}

/// SQL expression implementing the title resolution order.
pub(crate) const TITLE_EXPR: &str =
    "COALESCE(NULLIF(display_title, ''), NULLIF(title, ''), filename, location)";

/// ORDER BY clause for media listings, with a stable title tiebreak.
pub(crate) fn media_order(sort: core_model::Sort) -> String {
    use core_model::SortKey;
    let column = match sort.key {
        SortKey::Duration => "duration_ms",
        SortKey::InsertionDate => "insertion_date",
        SortKey::LastModificationDate => "last_modified",
        SortKey::ReleaseDate => "release_date",
        SortKey::Filename => "filename",
        SortKey::Artist => "artist",
        SortKey::Album => "album",
        SortKey::TrackNumber => "track_number",
        SortKey::PlayCount => "seen",
        // FileSize is not tracked; unsupported keys use the default order.
        SortKey::Default | SortKey::Alpha | SortKey::FileSize => TITLE_EXPR,
    };
    let direction = if sort.desc { "DESC" } else { "ASC" };
    format!("ORDER BY {column} {direction}, {TITLE_EXPR} COLLATE NOCASE {direction}")
}

/// ORDER BY for tables whose display title is a plain column.
pub(crate) fn named_order(title_column: &str, sort: core_model::Sort) -> String {
    let direction = if sort.desc { "DESC" } else { "ASC" };
    format!("ORDER BY {title_column} COLLATE NOCASE {direction}")
}

pub(crate) fn favorite_flags(favorite: bool) -> StateFlags {
    if favorite {
        StateFlags::FAVORITE
    } else {
        StateFlags::NONE
    }
}

/// Name resolution for artist rows read back from the database.
pub(crate) fn artist_row_name(id: i64, stored: &str) -> String {
    artist::resolve_name(id, Some(stored))
}

pub(crate) fn like_pattern(query: &str) -> String {
    format!("%{query}%")
}

pub(crate) fn row_u32(row: &SqliteRow, column: &str) -> std::result::Result<u32, sqlx::Error> {
    Ok(row.try_get::<i64, _>(column)?.max(0) as u32)
}
