//! Artist store over SQLite.

use super::album::{album_from_row, ALBUM_COLUMNS};
use super::media::media_from_row;
use super::{artist_row_name, like_pattern, media_order, named_order, row_u32, SqliteBackend};
use crate::backend::{normalized_query, ArtistStore};
use crate::error::Result;
use async_trait::async_trait;
use core_model::{Album, Artist, Media, MediaFilter, Paging, Sort};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

pub(super) const ARTIST_COLUMNS: &str = "id, name, short_bio, artwork_url, external_id, \
    nb_albums, nb_tracks, nb_present_tracks, favorite";

pub(super) fn artist_from_row(row: &SqliteRow) -> std::result::Result<Artist, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let stored: String = row.try_get("name")?;
    Ok(Artist {
        id,
        name: artist_row_name(id, &stored),
        flags: super::favorite_flags(row.try_get("favorite")?),
        short_bio: row.try_get("short_bio")?,
        artwork_url: row.try_get("artwork_url")?,
        external_id: row.try_get("external_id")?,
        nb_albums: row_u32(row, "nb_albums")?,
        nb_tracks: row_u32(row, "nb_tracks")?,
        nb_present_tracks: row_u32(row, "nb_present_tracks")?,
    })
}

fn artist_filter_clause(all: bool, filter: MediaFilter) -> String {
    let mut clauses: Vec<&str> = Vec::new();
    if !all {
        clauses.push("nb_albums > 0");
    }
    if !filter.include_missing {
        clauses.push("nb_present_tracks > 0");
    }
    if filter.only_favorites {
        clauses.push("favorite = 1");
    }
    if clauses.is_empty() {
        "1 = 1".to_string()
    } else {
        clauses.join(" AND ")
    }
}

#[async_trait]
impl ArtistStore for SqliteBackend {
    async fn artists(
        &self,
        all: bool,
        filter: MediaFilter,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Artist>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {ARTIST_COLUMNS} FROM artists WHERE {} {} LIMIT ? OFFSET ?",
            artist_filter_clause(all, filter),
            named_order("name", sort),
        );
        let rows = sqlx::query(&sql)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(artist_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn artists_count(&self, all: bool, filter: MediaFilter) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        let sql = format!(
            "SELECT COUNT(*) AS n FROM artists WHERE {}",
            artist_filter_clause(all, filter)
        );
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn artist(&self, id: i64) -> Result<Option<Artist>> {
        if !self.ready() || id == 0 {
            return Ok(None);
        }
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(artist_from_row).transpose()?)
    }

    async fn artist_albums(
        &self,
        artist_id: i64,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Album>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {ALBUM_COLUMNS} FROM albums \
             WHERE album_artist_id = ? OR album_artist = (SELECT name FROM artists WHERE id = ?) \
             {} LIMIT ? OFFSET ?",
            named_order("title", sort),
        );
        let rows = sqlx::query(&sql)
            .bind(artist_id)
            .bind(artist_id)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(album_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn artist_tracks(
        &self,
        artist_id: i64,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT m.* FROM media m JOIN artists a \
             ON COALESCE(m.album_artist, m.artist) = a.name \
             WHERE a.id = ? {} LIMIT ? OFFSET ?",
            media_order(sort),
        );
        let rows = sqlx::query(&sql)
            .bind(artist_id)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(media_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn search_artists(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Artist>> {
        let Some(query) = normalized_query(query) else {
            return Ok(Vec::new());
        };
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {ARTIST_COLUMNS} FROM artists WHERE name LIKE ? {} LIMIT ? OFFSET ?",
            named_order("name", sort),
        );
        let rows = sqlx::query(&sql)
            .bind(like_pattern(query))
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(artist_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn search_artists_count(&self, query: &str) -> Result<u32> {
        let Some(query) = normalized_query(query) else {
            return Ok(0);
        };
        if !self.ready() {
            return Ok(0);
        }
        let row = sqlx::query("SELECT COUNT(*) AS n FROM artists WHERE name LIKE ?")
            .bind(like_pattern(query))
            .fetch_one(&self.pool)
            .await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn set_artist_favorite(&self, id: i64, favorite: bool) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE artists SET favorite = ? WHERE id = ?")
            .bind(favorite)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
