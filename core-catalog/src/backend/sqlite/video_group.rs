//! Video group store over SQLite.

use super::media::media_from_row;
use super::{media_order, named_order, row_u32, SqliteBackend};
use crate::backend::VideoGroupStore;
use crate::error::Result;
use async_trait::async_trait;
use core_model::{Media, Paging, Sort, StateFlags, VideoGroup};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const GROUP_COLUMNS: &str = "id, name, nb_media, nb_present_media, is_network";

fn group_from_row(row: &SqliteRow) -> std::result::Result<VideoGroup, sqlx::Error> {
    Ok(VideoGroup {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        flags: StateFlags::NONE,
        nb_media: row_u32(row, "nb_media")?,
        nb_present_media: row_u32(row, "nb_present_media")?,
        is_network: row.try_get("is_network")?,
    })
}

#[async_trait]
impl VideoGroupStore for SqliteBackend {
    async fn video_groups(&self, sort: Sort, paging: Paging) -> Result<Vec<VideoGroup>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {GROUP_COLUMNS} FROM video_groups {} LIMIT ? OFFSET ?",
            named_order("name", sort),
        );
        let rows = sqlx::query(&sql)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(group_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn video_groups_count(&self) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        let row = sqlx::query("SELECT COUNT(*) AS n FROM video_groups")
            .fetch_one(&self.pool)
            .await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn video_group_media(
        &self,
        group_id: i64,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT m.* FROM media m JOIN video_group_media vgm ON m.id = vgm.media_id \
             WHERE vgm.group_id = ? {} LIMIT ? OFFSET ?",
            media_order(sort),
        );
        let rows = sqlx::query(&sql)
            .bind(group_id)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(media_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn create_video_group(&self, name: &str) -> Result<Option<VideoGroup>> {
        if !self.ready() || name.trim().is_empty() {
            return Ok(None);
        }
        let id = sqlx::query("INSERT INTO video_groups (name) VALUES (?)")
            .bind(name.trim())
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(Some(VideoGroup::new(id, name.trim())))
    }

    async fn rename_video_group(&self, group_id: i64, name: &str) -> Result<bool> {
        if !self.ready() || group_id == 0 || name.trim().is_empty() {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE video_groups SET name = ? WHERE id = ?")
            .bind(name.trim())
            .bind(group_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn video_group_add_media(&self, group_id: i64, media_id: i64) -> Result<bool> {
        if !self.ready() || group_id == 0 || media_id == 0 {
            return Ok(false);
        }
        let mut tx = self.pool.begin().await?;
        let media: Option<(bool, String)> =
            sqlx::query_as("SELECT present, location FROM media WHERE id = ?")
                .bind(media_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((present, location)) = media else {
            return Ok(false);
        };
        let local = location.starts_with("file://");
        let (prior_members,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM video_group_media WHERE group_id = ?")
                .bind(group_id)
                .fetch_one(&mut *tx)
                .await?;
        let inserted =
            sqlx::query("INSERT OR IGNORE INTO video_group_media (group_id, media_id) VALUES (?, ?)")
                .bind(group_id)
                .bind(media_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        if inserted == 0 {
            return Ok(false);
        }
        // A group stays network only while every member is; a local join
        // clears the flag for good.
        sqlx::query(
            "UPDATE video_groups SET nb_media = nb_media + 1, \
             nb_present_media = nb_present_media + ?, \
             is_network = CASE WHEN ? THEN 0 WHEN ? THEN 1 ELSE is_network END \
             WHERE id = ?",
        )
        .bind(present as i64)
        .bind(local)
        .bind(!local && prior_members == 0)
        .bind(group_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn video_group_remove_media(&self, group_id: i64, media_id: i64) -> Result<bool> {
        if !self.ready() || group_id == 0 || media_id == 0 {
            return Ok(false);
        }
        let mut tx = self.pool.begin().await?;
        let removed =
            sqlx::query("DELETE FROM video_group_media WHERE group_id = ? AND media_id = ?")
                .bind(group_id)
                .bind(media_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        if removed == 0 {
            return Ok(false);
        }
        sqlx::query("UPDATE video_groups SET nb_media = MAX(nb_media - 1, 0) WHERE id = ?")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn destroy_video_group(&self, group_id: i64) -> Result<bool> {
        if !self.ready() || group_id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM video_groups WHERE id = ?")
            .bind(group_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
