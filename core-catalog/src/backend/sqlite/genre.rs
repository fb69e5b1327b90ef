//! Genre store over SQLite.

use super::album::{album_from_row, ALBUM_COLUMNS};
use super::artist_store::{artist_from_row, ARTIST_COLUMNS};
use super::media::media_from_row;
use super::{like_pattern, media_order, named_order, row_u32, SqliteBackend};
use crate::backend::{normalized_query, GenreStore};
use crate::error::Result;
use async_trait::async_trait;
use core_model::{Album, Artist, Genre, Media, MediaFilter, Paging, Sort};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const GENRE_COLUMNS: &str = "id, name, nb_tracks, nb_present_tracks, favorite";

fn genre_from_row(row: &SqliteRow) -> std::result::Result<Genre, sqlx::Error> {
    Ok(Genre {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        flags: super::favorite_flags(row.try_get("favorite")?),
        nb_tracks: row_u32(row, "nb_tracks")?,
        nb_present_tracks: row_u32(row, "nb_present_tracks")?,
    })
}

fn genre_filter_clause(filter: MediaFilter) -> &'static str {
    match (filter.include_missing, filter.only_favorites) {
        (true, false) => "1 = 1",
        (false, false) => "nb_present_tracks > 0",
        (true, true) => "favorite = 1",
        (false, true) => "nb_present_tracks > 0 AND favorite = 1",
    }
}

fn media_filter_clause(filter: MediaFilter) -> &'static str {
    match (filter.include_missing, filter.only_favorites) {
        (true, false) => "1 = 1",
        (false, false) => "m.present = 1",
        (true, true) => "m.favorite = 1",
        (false, true) => "m.present = 1 AND m.favorite = 1",
    }
}

#[async_trait]
impl GenreStore for SqliteBackend {
    async fn genres(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Genre>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {GENRE_COLUMNS} FROM genres WHERE {} {} LIMIT ? OFFSET ?",
            genre_filter_clause(filter),
            named_order("name", sort),
        );
        let rows = sqlx::query(&sql)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(genre_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn genres_count(&self, filter: MediaFilter) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        let sql = format!(
            "SELECT COUNT(*) AS n FROM genres WHERE {}",
            genre_filter_clause(filter)
        );
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn genre(&self, id: i64) -> Result<Option<Genre>> {
        if !self.ready() || id == 0 {
            return Ok(None);
        }
        let sql = format!("SELECT {GENRE_COLUMNS} FROM genres WHERE id = ?");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(genre_from_row).transpose()?)
    }

    async fn genre_tracks(
        &self,
        genre_id: i64,
        filter: MediaFilter,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT m.* FROM media m JOIN genres g ON m.genre = g.name COLLATE NOCASE \
             WHERE g.id = ? AND {} {} LIMIT ? OFFSET ?",
            media_filter_clause(filter),
            media_order(sort),
        );
        let rows = sqlx::query(&sql)
            .bind(genre_id)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(media_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn genre_albums(&self, genre_id: i64, sort: Sort, paging: Paging) -> Result<Vec<Album>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {ALBUM_COLUMNS} FROM albums WHERE title IN \
             (SELECT DISTINCT m.album FROM media m JOIN genres g \
              ON m.genre = g.name COLLATE NOCASE WHERE g.id = ? AND m.album IS NOT NULL) \
             {} LIMIT ? OFFSET ?",
            named_order("title", sort),
        );
        let rows = sqlx::query(&sql)
            .bind(genre_id)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(album_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn genre_artists(
        &self,
        genre_id: i64,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Artist>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {ARTIST_COLUMNS} FROM artists WHERE name IN \
             (SELECT DISTINCT COALESCE(m.album_artist, m.artist) FROM media m \
              JOIN genres g ON m.genre = g.name COLLATE NOCASE WHERE g.id = ?) \
             {} LIMIT ? OFFSET ?",
            named_order("name", sort),
        );
        let rows = sqlx::query(&sql)
            .bind(genre_id)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(artist_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn search_genres(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Genre>> {
        let Some(query) = normalized_query(query) else {
            return Ok(Vec::new());
        };
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {GENRE_COLUMNS} FROM genres WHERE name LIKE ? {} LIMIT ? OFFSET ?",
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
            .map(genre_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn search_genres_count(&self, query: &str) -> Result<u32> {
        let Some(query) = normalized_query(query) else {
            return Ok(0);
        };
        if !self.ready() {
            return Ok(0);
        }
        let row = sqlx::query("SELECT COUNT(*) AS n FROM genres WHERE name LIKE ?")
            .bind(like_pattern(query))
            .fetch_one(&self.pool)
            .await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn set_genre_favorite(&self, id: i64, favorite: bool) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE genres SET favorite = ? WHERE id = ?")
            .bind(favorite)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
