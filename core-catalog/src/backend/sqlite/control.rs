//! Lifecycle, indexing roots and aggregated search over SQLite.

use super::SqliteBackend;
use crate::backend::{
    normalized_query, AlbumStore, ArtistStore, ControlStore, GenreStore, MediaStore,
    PlaylistStore,
};
use crate::error::Result;
use async_trait::async_trait;
use core_model::{Paging, SearchAggregate, Sort, Storage};
use sqlx::Row;
use std::sync::atomic::Ordering;
use tracing::info;

#[async_trait]
impl ControlStore for SqliteBackend {
    async fn init(&self) -> Result<bool> {
        if !self.mark_initiated() {
            return Ok(false);
        }
        self.health_check().await?;
        info!("catalog database ready");
        Ok(true)
    }

    async fn is_initiated(&self) -> bool {
        self.ready()
    }

    async fn devices(&self) -> Result<Vec<Storage>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query("SELECT name, mrl, removable FROM devices ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(Storage::new(
                row.try_get::<String, _>("name")?.as_str(),
                row.try_get::<String, _>("mrl")?.as_str(),
                row.try_get("removable")?,
            ));
        }
        Ok(items)
    }

    async fn add_device(&self, device: Storage) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let mut tx = self.pool.begin().await?;
        let inserted =
            sqlx::query("INSERT OR IGNORE INTO devices (name, mrl, removable) VALUES (?, ?, ?)")
                .bind(&device.name)
                .bind(&device.mrl)
                .bind(device.removable)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        if inserted == 0 {
            return Ok(false);
        }
        sqlx::query("INSERT OR IGNORE INTO pending_storages (mrl) VALUES (?)")
            .bind(&device.mrl)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn remove_device(&self, name: &str) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM devices WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn entry_points(&self) -> Result<Vec<String>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        Ok(
            sqlx::query_scalar("SELECT mrl FROM entry_points WHERE banned = 0 ORDER BY mrl")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn add_entry_point(&self, mrl: &str) -> Result<bool> {
        if !self.ready() || mrl.trim().is_empty() {
            return Ok(false);
        }
        let result = sqlx::query("INSERT OR IGNORE INTO entry_points (mrl) VALUES (?)")
            .bind(mrl)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_entry_point(&self, mrl: &str) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM entry_points WHERE mrl = ?")
            .bind(mrl)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ban_folder(&self, mrl: &str) -> Result<bool> {
        if !self.ready() || mrl.trim().is_empty() {
            return Ok(false);
        }
        let result = sqlx::query(
            "INSERT INTO entry_points (mrl, banned) VALUES (?, 1) \
             ON CONFLICT (mrl) DO UPDATE SET banned = 1 WHERE banned = 0",
        )
        .bind(mrl)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn unban_folder(&self, mrl: &str) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE entry_points SET banned = 0 WHERE mrl = ? AND banned = 1")
            .bind(mrl)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn banned_folders(&self) -> Result<Vec<String>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        Ok(
            sqlx::query_scalar("SELECT mrl FROM entry_points WHERE banned = 1 ORDER BY mrl")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn discover(&self, mrl: &str) -> Result<bool> {
        self.add_entry_point(mrl).await
    }

    async fn reload_all(&self) -> Result<bool> {
        Ok(self.ready())
    }

    async fn reload(&self, entry_point: &str) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let known: Option<String> =
            sqlx::query_scalar("SELECT mrl FROM entry_points WHERE mrl = ? AND banned = 0")
                .bind(entry_point)
                .fetch_optional(&self.pool)
                .await?;
        Ok(known.is_some())
    }

    async fn pause_background_operations(&self) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        self.paused.store(true, Ordering::SeqCst);
        Ok(true)
    }

    async fn resume_background_operations(&self) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        self.paused.store(false, Ordering::SeqCst);
        Ok(true)
    }

    async fn force_rescan(&self) -> Result<bool> {
        Ok(self.ready())
    }

    async fn force_parser_retry(&self) -> Result<bool> {
        Ok(self.ready())
    }

    async fn clear_database(&self, restore_playlists: bool) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let mut tx = self.pool.begin().await?;
        for table in [
            "bookmarks",
            "subscription_media",
            "subscriptions",
            "services",
            "video_group_media",
            "video_groups",
            "folders",
            "playlist_media",
            "history",
            "media",
            "genres",
            "albums",
            "artists",
        ] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        if !restore_playlists {
            sqlx::query("DELETE FROM playlists").execute(&mut *tx).await?;
        } else {
            sqlx::query(
                "UPDATE playlists SET nb_video = 0, nb_audio = 0, nb_unknown = 0, \
                 nb_duration_unknown = 0, duration_ms = 0",
            )
            .execute(&mut *tx)
            .await?;
        }
        sqlx::query("INSERT INTO artists (id, name) VALUES (1, 'Unknown Artist')")
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO artists (id, name) VALUES (2, 'Various Artists')")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!(restore_playlists, "catalog database cleared");
        Ok(true)
    }

    async fn search(&self, query: &str) -> Result<SearchAggregate> {
        let mut results = SearchAggregate::default();
        if normalized_query(query).is_none() || !self.ready() {
            return Ok(results);
        }
        results.tracks = self.search_audio(query, Sort::default(), Paging::all()).await?;
        results.videos = self.search_videos(query, Sort::default(), Paging::all()).await?;
        results.albums = self.search_albums(query, Sort::default(), Paging::all()).await?;
        results.artists = self.search_artists(query, Sort::default(), Paging::all()).await?;
        results.genres = self.search_genres(query, Sort::default(), Paging::all()).await?;
        results.playlists = self
            .search_playlists(query, Sort::default(), Paging::all())
            .await?;
        Ok(results)
    }

    async fn pending_storages(&self) -> Result<Vec<String>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        Ok(sqlx::query_scalar("SELECT mrl FROM pending_storages ORDER BY mrl")
            .fetch_all(&self.pool)
            .await?)
    }
}
