//! Folder store over SQLite.

use super::media::media_from_row;
use super::{media_order, named_order, row_u32, SqliteBackend};
use crate::backend::FolderStore;
use crate::error::Result;
use async_trait::async_trait;
use core_model::{Folder, Media, MediaKind, Paging, Sort, StateFlags};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const FOLDER_COLUMNS: &str = "id, name, mrl, nb_video, nb_audio";

fn folder_from_row(row: &SqliteRow) -> std::result::Result<Folder, sqlx::Error> {
    Ok(Folder {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        flags: StateFlags::NONE,
        mrl: row.try_get("mrl")?,
        nb_video: row_u32(row, "nb_video")?,
        nb_audio: row_u32(row, "nb_audio")?,
    })
}

fn kind_clause(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Video => "nb_video > 0",
        MediaKind::Audio => "nb_audio > 0",
        _ => "nb_video + nb_audio > 0",
    }
}

#[async_trait]
impl FolderStore for SqliteBackend {
    async fn folders(&self, kind: MediaKind, sort: Sort, paging: Paging) -> Result<Vec<Folder>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE {} {} LIMIT ? OFFSET ?",
            kind_clause(kind),
            named_order("name", sort),
        );
        let rows = sqlx::query(&sql)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(folder_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn folders_count(&self, kind: MediaKind) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        let sql = format!("SELECT COUNT(*) AS n FROM folders WHERE {}", kind_clause(kind));
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn folder_media(
        &self,
        folder_id: i64,
        kind: MediaKind,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        // A media item belongs to the folder whose mrl prefixes its
        // location with no deeper path segment.
        let media_kind_clause = if kind == MediaKind::Unknown {
            ""
        } else {
            "AND m.kind = ?"
        };
        let sql = format!(
            "SELECT m.* FROM media m JOIN folders f ON f.id = ? \
             WHERE m.location LIKE RTRIM(f.mrl, '/') || '/%' \
             AND INSTR(SUBSTR(m.location, LENGTH(RTRIM(f.mrl, '/')) + 2), '/') = 0 \
             {media_kind_clause} {} LIMIT ? OFFSET ?",
            media_order(sort),
        );
        let mut q = sqlx::query(&sql).bind(folder_id);
        if kind != MediaKind::Unknown {
            q = q.bind(kind.as_i64());
        }
        let rows = q
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(media_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn folder_media_count(&self, folder_id: i64, kind: MediaKind) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        let media_kind_clause = if kind == MediaKind::Unknown {
            ""
        } else {
            "AND m.kind = ?"
        };
        let sql = format!(
            "SELECT COUNT(*) AS n FROM media m JOIN folders f ON f.id = ? \
             WHERE m.location LIKE RTRIM(f.mrl, '/') || '/%' \
             AND INSTR(SUBSTR(m.location, LENGTH(RTRIM(f.mrl, '/')) + 2), '/') = 0 \
             {media_kind_clause}",
        );
        let mut q = sqlx::query(&sql).bind(folder_id);
        if kind != MediaKind::Unknown {
            q = q.bind(kind.as_i64());
        }
        let row = q.fetch_one(&self.pool).await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn set_folder_favorite(&self, _id: i64, _favorite: bool) -> Result<bool> {
        Ok(false)
    }
}
