//! Playlist store over SQLite.
//!
//! Member edits rewrite the position column inside one transaction so a
//! failed edit leaves the playlist untouched.

use super::media::media_from_row;
use super::{like_pattern, named_order, row_u32, SqliteBackend};
use crate::backend::{normalized_query, PlaylistStore};
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use core_model::{Media, MediaFilter, Paging, Playlist, Sort};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};

const PLAYLIST_COLUMNS: &str =
    "id, title, nb_video, nb_audio, nb_unknown, nb_duration_unknown, duration_ms, favorite";

fn playlist_from_row(row: &SqliteRow) -> std::result::Result<Playlist, sqlx::Error> {
    Ok(Playlist {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        flags: super::favorite_flags(row.try_get("favorite")?),
        nb_video: row_u32(row, "nb_video")?,
        nb_audio: row_u32(row, "nb_audio")?,
        nb_unknown: row_u32(row, "nb_unknown")?,
        nb_duration_unknown: row_u32(row, "nb_duration_unknown")?,
        duration_ms: row.try_get("duration_ms")?,
    })
}

async fn member_ids(
    tx: &mut Transaction<'_, Sqlite>,
    playlist_id: i64,
) -> std::result::Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT media_id FROM playlist_media WHERE playlist_id = ? ORDER BY position",
    )
    .bind(playlist_id)
    .fetch_all(&mut **tx)
    .await
}

async fn write_members(
    tx: &mut Transaction<'_, Sqlite>,
    playlist_id: i64,
    ids: &[i64],
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM playlist_media WHERE playlist_id = ?")
        .bind(playlist_id)
        .execute(&mut **tx)
        .await?;
    for (position, media_id) in ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO playlist_media (playlist_id, media_id, position) VALUES (?, ?, ?)",
        )
        .bind(playlist_id)
        .bind(media_id)
        .bind(position as i64)
        .execute(&mut **tx)
        .await?;
    }
    refresh_counters(tx, playlist_id).await
}

async fn refresh_counters(
    tx: &mut Transaction<'_, Sqlite>,
    playlist_id: i64,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE playlists SET \
         nb_video = (SELECT COUNT(*) FROM playlist_media pm JOIN media m ON m.id = pm.media_id \
                     WHERE pm.playlist_id = playlists.id AND m.kind = 0), \
         nb_audio = (SELECT COUNT(*) FROM playlist_media pm JOIN media m ON m.id = pm.media_id \
                     WHERE pm.playlist_id = playlists.id AND m.kind = 1), \
         nb_unknown = (SELECT COUNT(*) FROM playlist_media pm JOIN media m ON m.id = pm.media_id \
                       WHERE pm.playlist_id = playlists.id AND m.kind NOT IN (0, 1)), \
         nb_duration_unknown = (SELECT COUNT(*) FROM playlist_media pm JOIN media m \
                                ON m.id = pm.media_id \
                                WHERE pm.playlist_id = playlists.id AND m.duration_ms <= 0), \
         duration_ms = (SELECT COALESCE(SUM(MAX(m.duration_ms, 0)), 0) FROM playlist_media pm \
                        JOIN media m ON m.id = pm.media_id \
                        WHERE pm.playlist_id = playlists.id) \
         WHERE id = ?",
    )
    .bind(playlist_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn playlist_exists(
    tx: &mut Transaction<'_, Sqlite>,
    playlist_id: i64,
) -> std::result::Result<bool, sqlx::Error> {
    let known: Option<i64> = sqlx::query_scalar("SELECT id FROM playlists WHERE id = ?")
        .bind(playlist_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(known.is_some())
}

async fn media_exist(
    tx: &mut Transaction<'_, Sqlite>,
    ids: &[i64],
) -> std::result::Result<bool, sqlx::Error> {
    for id in ids {
        let known: Option<i64> = sqlx::query_scalar("SELECT id FROM media WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        if known.is_none() {
            return Ok(false);
        }
    }
    Ok(true)
}

#[async_trait]
impl PlaylistStore for SqliteBackend {
    async fn playlists(
        &self,
        filter: MediaFilter,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Playlist>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let favorite_clause = if filter.only_favorites {
            "favorite = 1"
        } else {
            "1 = 1"
        };
        let sql = format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE {favorite_clause} {} \
             LIMIT ? OFFSET ?",
            named_order("title", sort),
        );
        let rows = sqlx::query(&sql)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(playlist_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn playlists_count(&self, filter: MediaFilter) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        let favorite_clause = if filter.only_favorites {
            "favorite = 1"
        } else {
            "1 = 1"
        };
        let sql = format!("SELECT COUNT(*) AS n FROM playlists WHERE {favorite_clause}");
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn playlist(&self, id: i64) -> Result<Option<Playlist>> {
        if !self.ready() || id == 0 {
            return Ok(None);
        }
        let sql = format!("SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ?");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(playlist_from_row).transpose()?)
    }

    async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        if name.trim().is_empty() {
            return Err(CatalogError::InvalidInput {
                field: "name".to_string(),
                message: "playlist name cannot be empty".to_string(),
            });
        }
        let id = sqlx::query("INSERT INTO playlists (title) VALUES (?)")
            .bind(name.trim())
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(Playlist::new(id, name.trim()))
    }

    async fn playlist_tracks(&self, playlist_id: i64, paging: Paging) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = "SELECT m.* FROM media m JOIN playlist_media pm ON m.id = pm.media_id \
                   WHERE pm.playlist_id = ? ORDER BY pm.position LIMIT ? OFFSET ?";
        let rows = sqlx::query(sql)
            .bind(playlist_id)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(media_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn playlist_tracks_count(&self, playlist_id: i64) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        let row =
            sqlx::query("SELECT COUNT(*) AS n FROM playlist_media WHERE playlist_id = ?")
                .bind(playlist_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn playlist_append(&self, playlist_id: i64, media_ids: &[i64]) -> Result<bool> {
        if !self.ready() || playlist_id == 0 || media_ids.is_empty() {
            return Ok(false);
        }
        let mut tx = self.pool.begin().await?;
        if !playlist_exists(&mut tx, playlist_id).await?
            || !media_exist(&mut tx, media_ids).await?
        {
            return Ok(false);
        }
        let mut members = member_ids(&mut tx, playlist_id).await?;
        members.extend_from_slice(media_ids);
        write_members(&mut tx, playlist_id, &members).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn playlist_insert(
        &self,
        playlist_id: i64,
        media_id: i64,
        position: u32,
    ) -> Result<bool> {
        if !self.ready() || playlist_id == 0 || media_id == 0 {
            return Ok(false);
        }
        let mut tx = self.pool.begin().await?;
        if !playlist_exists(&mut tx, playlist_id).await?
            || !media_exist(&mut tx, &[media_id]).await?
        {
            return Ok(false);
        }
        let mut members = member_ids(&mut tx, playlist_id).await?;
        let position = (position as usize).min(members.len());
        members.insert(position, media_id);
        write_members(&mut tx, playlist_id, &members).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn playlist_move(&self, playlist_id: i64, from: u32, to: u32) -> Result<bool> {
        if !self.ready() || playlist_id == 0 {
            return Ok(false);
        }
        let mut tx = self.pool.begin().await?;
        let mut members = member_ids(&mut tx, playlist_id).await?;
        let (from, to) = (from as usize, to as usize);
        if from >= members.len() || to >= members.len() {
            return Ok(false);
        }
        let id = members.remove(from);
        members.insert(to, id);
        write_members(&mut tx, playlist_id, &members).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn playlist_remove_at(&self, playlist_id: i64, position: u32) -> Result<bool> {
        if !self.ready() || playlist_id == 0 {
            return Ok(false);
        }
        let mut tx = self.pool.begin().await?;
        let mut members = member_ids(&mut tx, playlist_id).await?;
        let position = position as usize;
        if position >= members.len() {
            return Ok(false);
        }
        members.remove(position);
        write_members(&mut tx, playlist_id, &members).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn delete_playlist(&self, playlist_id: i64) -> Result<bool> {
        if !self.ready() || playlist_id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(playlist_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn rename_playlist(&self, playlist_id: i64, name: &str) -> Result<bool> {
        if !self.ready() || playlist_id == 0 || name.trim().is_empty() {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE playlists SET title = ? WHERE id = ?")
            .bind(name.trim())
            .bind(playlist_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search_playlists(
        &self,
        query: &str,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Playlist>> {
        let Some(query) = normalized_query(query) else {
            return Ok(Vec::new());
        };
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE title LIKE ? {} LIMIT ? OFFSET ?",
            named_order("title", sort),
        );
        let rows = sqlx::query(&sql)
            .bind(like_pattern(query))
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(playlist_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn search_playlists_count(&self, query: &str) -> Result<u32> {
        let Some(query) = normalized_query(query) else {
            return Ok(0);
        };
        if !self.ready() {
            return Ok(0);
        }
        let row = sqlx::query("SELECT COUNT(*) AS n FROM playlists WHERE title LIKE ?")
            .bind(like_pattern(query))
            .fetch_one(&self.pool)
            .await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn set_playlist_favorite(&self, id: i64, favorite: bool) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE playlists SET favorite = ? WHERE id = ?")
            .bind(favorite)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
