//! Media store over SQLite.

use super::{like_pattern, media_order, row_u32, SqliteBackend, TITLE_EXPR};
use crate::backend::{normalized_query, MediaStore};
use crate::error::Result;
use async_trait::async_trait;
use core_model::{
    Bookmark, Media, MediaFilter, MediaKind, Paging, Slave, Sort, SortKey, StateFlags,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const MEDIA_COLUMNS: &str = "id, location, kind, title, display_title, filename, artist, genre, \
    album, album_artist, width, height, artwork_url, audio_track, spu_track, track_number, \
    disc_number, duration_ms, position_ms, last_modified, seen, insertion_date, release_date, \
    thumbnail_generated, present, favorite, slaves";

pub(crate) fn media_from_row(row: &SqliteRow) -> std::result::Result<Media, sqlx::Error> {
    let slaves: Vec<Slave> = serde_json::from_str(row.try_get::<String, _>("slaves")?.as_str())
        .unwrap_or_default();
    Ok(Media {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        flags: super::favorite_flags(row.try_get("favorite")?),
        location: row.try_get("location")?,
        kind: MediaKind::from_i64(row.try_get("kind")?),
        display_title: row.try_get("display_title")?,
        filename: row.try_get("filename")?,
        artist: row.try_get("artist")?,
        genre: row.try_get("genre")?,
        album: row.try_get("album")?,
        album_artist: row.try_get("album_artist")?,
        width: row_u32(row, "width")?,
        height: row_u32(row, "height")?,
        artwork_url: row.try_get("artwork_url")?,
        audio_track: row.try_get("audio_track")?,
        spu_track: row.try_get("spu_track")?,
        track_number: row_u32(row, "track_number")?,
        disc_number: row_u32(row, "disc_number")?,
        duration_ms: row.try_get("duration_ms")?,
        position_ms: row.try_get("position_ms")?,
        last_modified: row.try_get("last_modified")?,
        seen: row.try_get("seen")?,
        insertion_date: row.try_get("insertion_date")?,
        release_date: row.try_get("release_date")?,
        thumbnail_generated: row.try_get("thumbnail_generated")?,
        present: row.try_get("present")?,
        slaves,
    })
}

/// WHERE fragment for the two recurring media filters.
fn filter_clause(filter: MediaFilter) -> &'static str {
    match (filter.include_missing, filter.only_favorites) {
        (true, false) => "1 = 1",
        (false, false) => "present = 1",
        (true, true) => "favorite = 1",
        (false, true) => "present = 1 AND favorite = 1",
    }
}

impl SqliteBackend {
    async fn media_by_kind(
        &self,
        kind: MediaKind,
        filter: MediaFilter,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Media>> {
        let sql = format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE kind = ? AND {} {} LIMIT ? OFFSET ?",
            filter_clause(filter),
            media_order(sort),
        );
        let rows = sqlx::query(&sql)
            .bind(kind.as_i64())
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(media_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn media_count_by_kind(&self, kind: MediaKind, filter: MediaFilter) -> Result<u32> {
        let sql = format!(
            "SELECT COUNT(*) AS n FROM media WHERE kind = ? AND {}",
            filter_clause(filter)
        );
        let row = sqlx::query(&sql)
            .bind(kind.as_i64())
            .fetch_one(&self.pool)
            .await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn search_by_kind(
        &self,
        kind: Option<MediaKind>,
        query: &str,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Media>> {
        let Some(query) = normalized_query(query) else {
            return Ok(Vec::new());
        };
        if !self.ready() {
            return Ok(Vec::new());
        }
        let kind_clause = if kind.is_some() { "kind = ? AND" } else { "" };
        let sql = format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE {kind_clause} {TITLE_EXPR} LIKE ? {} \
             LIMIT ? OFFSET ?",
            media_order(sort),
        );
        let mut q = sqlx::query(&sql);
        if let Some(kind) = kind {
            q = q.bind(kind.as_i64());
        }
        let rows = q
            .bind(like_pattern(query))
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(media_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn search_count_by_kind(&self, kind: Option<MediaKind>, query: &str) -> Result<u32> {
        let Some(query) = normalized_query(query) else {
            return Ok(0);
        };
        if !self.ready() {
            return Ok(0);
        }
        let kind_clause = if kind.is_some() { "kind = ? AND" } else { "" };
        let sql =
            format!("SELECT COUNT(*) AS n FROM media WHERE {kind_clause} {TITLE_EXPR} LIKE ?");
        let mut q = sqlx::query(&sql);
        if let Some(kind) = kind {
            q = q.bind(kind.as_i64());
        }
        let row = q.bind(like_pattern(query)).fetch_one(&self.pool).await?;
        Ok(row_u32(&row, "n")?)
    }
}

#[async_trait]
impl MediaStore for SqliteBackend {
    async fn videos(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        self.media_by_kind(MediaKind::Video, filter, sort, paging).await
    }

    async fn videos_count(&self, filter: MediaFilter) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        self.media_count_by_kind(MediaKind::Video, filter).await
    }

    async fn audio(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        self.media_by_kind(MediaKind::Audio, filter, sort, paging).await
    }

    async fn audio_count(&self, filter: MediaFilter) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        self.media_count_by_kind(MediaKind::Audio, filter).await
    }

    async fn recent_videos(&self, paging: Paging) -> Result<Vec<Media>> {
        self.videos(
            MediaFilter::present_only(),
            Sort::descending(SortKey::InsertionDate),
            paging,
        )
        .await
    }

    async fn recent_audio(&self, paging: Paging) -> Result<Vec<Media>> {
        self.audio(
            MediaFilter::present_only(),
            Sort::descending(SortKey::InsertionDate),
            paging,
        )
        .await
    }

    async fn media(&self, id: i64) -> Result<Option<Media>> {
        if !self.ready() || id == 0 {
            return Ok(None);
        }
        let sql = format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = ?");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(media_from_row).transpose()?)
    }

    async fn media_by_location(&self, location: &str) -> Result<Option<Media>> {
        if !self.ready() {
            return Ok(None);
        }
        let location = core_model::media::normalize_location(location);
        let sql = format!("SELECT {MEDIA_COLUMNS} FROM media WHERE location = ?");
        let row = sqlx::query(&sql)
            .bind(location)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(media_from_row).transpose()?)
    }

    async fn add_media(&self, location: &str) -> Result<Option<Media>> {
        if !self.ready() {
            return Ok(None);
        }
        if let Some(existing) = self.media_by_location(location).await? {
            return Ok(Some(existing));
        }
        let media = Media::from_location(location)?;
        Ok(Some(self.insert_media(&media).await?))
    }

    async fn add_stream(&self, location: &str, title: &str) -> Result<Option<Media>> {
        if !self.ready() {
            return Ok(None);
        }
        if let Some(existing) = self.media_by_location(location).await? {
            return Ok(Some(existing));
        }
        let media = Media::stream(location, title)?;
        Ok(Some(self.insert_media(&media).await?))
    }

    async fn remove_external_media(&self, id: i64) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM media WHERE id = ? AND kind IN (?, ?)")
            .bind(id)
            .bind(MediaKind::Stream.as_i64())
            .bind(MediaKind::Unknown.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search_media(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        self.search_by_kind(None, query, sort, paging).await
    }

    async fn search_media_count(&self, query: &str) -> Result<u32> {
        self.search_count_by_kind(None, query).await
    }

    async fn search_videos(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        self.search_by_kind(Some(MediaKind::Video), query, sort, paging).await
    }

    async fn search_videos_count(&self, query: &str) -> Result<u32> {
        self.search_count_by_kind(Some(MediaKind::Video), query).await
    }

    async fn search_audio(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        self.search_by_kind(Some(MediaKind::Audio), query, sort, paging).await
    }

    async fn search_audio_count(&self, query: &str) -> Result<u32> {
        self.search_count_by_kind(Some(MediaKind::Audio), query).await
    }

    async fn set_media_favorite(&self, id: i64, favorite: bool) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE media SET favorite = ? WHERE id = ?")
            .bind(favorite)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_play_position(&self, id: i64, position_ms: i64) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE media SET position_ms = ? WHERE id = ?")
            .bind(position_ms)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increase_play_count(&self, id: i64) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE media SET seen = seen + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn bookmarks(&self, media_id: i64) -> Result<Vec<Bookmark>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT id, media_id, name, description, offset_ms FROM bookmarks \
             WHERE media_id = ? ORDER BY offset_ms",
        )
        .bind(media_id)
        .fetch_all(&self.pool)
        .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(Bookmark {
                id: row.try_get("id")?,
                media_id: row.try_get("media_id")?,
                name: row.try_get("name")?,
                description: row.try_get("description")?,
                offset_ms: row.try_get("offset_ms")?,
                flags: StateFlags::NONE,
            });
        }
        Ok(items)
    }

    async fn add_bookmark(
        &self,
        media_id: i64,
        name: &str,
        offset_ms: i64,
    ) -> Result<Option<Bookmark>> {
        if !self.ready() || media_id == 0 {
            return Ok(None);
        }
        let known: Option<i64> = sqlx::query_scalar("SELECT id FROM media WHERE id = ?")
            .bind(media_id)
            .fetch_optional(&self.pool)
            .await?;
        if known.is_none() {
            return Ok(None);
        }
        let id = sqlx::query("INSERT INTO bookmarks (media_id, name, offset_ms) VALUES (?, ?, ?)")
            .bind(media_id)
            .bind(name)
            .bind(offset_ms)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(Some(Bookmark::new(id, media_id, name, offset_ms)))
    }

    async fn remove_bookmark(&self, bookmark_id: i64) -> Result<bool> {
        if !self.ready() || bookmark_id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = ?")
            .bind(bookmark_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_bookmarks(&self, media_id: i64) -> Result<bool> {
        if !self.ready() || media_id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM bookmarks WHERE media_id = ?")
            .bind(media_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
