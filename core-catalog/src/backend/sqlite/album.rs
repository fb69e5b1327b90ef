//! Album store over SQLite.

use super::media::media_from_row;
use super::{like_pattern, media_order, named_order, row_u32, SqliteBackend};
use crate::backend::{normalized_query, AlbumStore};
use crate::error::Result;
use async_trait::async_trait;
use core_model::{Album, Media, MediaFilter, Paging, Sort, SortKey};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

pub(super) const ALBUM_COLUMNS: &str = "id, title, release_year, artwork_url, album_artist, \
    album_artist_id, nb_tracks, nb_present_tracks, duration_ms, favorite";

pub(super) fn album_from_row(row: &SqliteRow) -> std::result::Result<Album, sqlx::Error> {
    Ok(Album {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        flags: super::favorite_flags(row.try_get("favorite")?),
        release_year: row.try_get::<i64, _>("release_year")? as i32,
        artwork_url: row.try_get("artwork_url")?,
        album_artist: row.try_get("album_artist")?,
        album_artist_id: row.try_get("album_artist_id")?,
        nb_tracks: row_u32(row, "nb_tracks")?,
        nb_present_tracks: row_u32(row, "nb_present_tracks")?,
        duration_ms: row.try_get("duration_ms")?,
    })
}

fn album_filter_clause(filter: MediaFilter) -> &'static str {
    match (filter.include_missing, filter.only_favorites) {
        (true, false) => "1 = 1",
        (false, false) => "nb_present_tracks > 0",
        (true, true) => "favorite = 1",
        (false, true) => "nb_present_tracks > 0 AND favorite = 1",
    }
}

fn album_order(sort: Sort) -> String {
    match sort.key {
        SortKey::ReleaseDate => {
            let direction = if sort.desc { "DESC" } else { "ASC" };
            format!("ORDER BY release_year {direction}, title COLLATE NOCASE {direction}")
        }
        SortKey::Duration => {
            let direction = if sort.desc { "DESC" } else { "ASC" };
            format!("ORDER BY duration_ms {direction}, title COLLATE NOCASE {direction}")
        }
        SortKey::Artist => {
            let direction = if sort.desc { "DESC" } else { "ASC" };
            format!("ORDER BY album_artist COLLATE NOCASE {direction}, title COLLATE NOCASE {direction}")
        }
        _ => named_order("title", sort),
    }
}

#[async_trait]
impl AlbumStore for SqliteBackend {
    async fn albums(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Album>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {ALBUM_COLUMNS} FROM albums WHERE {} {} LIMIT ? OFFSET ?",
            album_filter_clause(filter),
            album_order(sort),
        );
        let rows = sqlx::query(&sql)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(album_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn albums_count(&self, filter: MediaFilter) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        let sql = format!(
            "SELECT COUNT(*) AS n FROM albums WHERE {}",
            album_filter_clause(filter)
        );
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn album(&self, id: i64) -> Result<Option<Album>> {
        if !self.ready() || id == 0 {
            return Ok(None);
        }
        let sql = format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE id = ?");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(album_from_row).transpose()?)
    }

    async fn album_tracks(&self, album_id: i64, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        // Tracks default to disc/track order inside an album.
        let order = if sort.key == SortKey::Default {
            "ORDER BY disc_number, track_number, filename COLLATE NOCASE".to_string()
        } else {
            media_order(sort)
        };
        let sql = format!(
            "SELECT m.* FROM media m JOIN albums a ON m.album = a.title \
             WHERE a.id = ? {order} LIMIT ? OFFSET ?",
        );
        let rows = sqlx::query(&sql)
            .bind(album_id)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(media_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn search_albums(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Album>> {
        let Some(query) = normalized_query(query) else {
            return Ok(Vec::new());
        };
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {ALBUM_COLUMNS} FROM albums WHERE title LIKE ? {} LIMIT ? OFFSET ?",
            album_order(sort),
        );
        let rows = sqlx::query(&sql)
            .bind(like_pattern(query))
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(album_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn search_albums_count(&self, query: &str) -> Result<u32> {
        let Some(query) = normalized_query(query) else {
            return Ok(0);
        };
        if !self.ready() {
            return Ok(0);
        }
        let row = sqlx::query("SELECT COUNT(*) AS n FROM albums WHERE title LIKE ?")
            .bind(like_pattern(query))
            .fetch_one(&self.pool)
            .await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn set_album_favorite(&self, id: i64, favorite: bool) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE albums SET favorite = ? WHERE id = ?")
            .bind(favorite)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
