//! Playback history over SQLite.

use super::SqliteBackend;
use crate::backend::HistoryStore;
use crate::error::Result;
use async_trait::async_trait;
use core_model::{HistoryEntry, HistoryKind, Paging};
use sqlx::Row;

fn kind_as_i64(kind: HistoryKind) -> i64 {
    match kind {
        HistoryKind::Local => 0,
        HistoryKind::Network => 1,
    }
}

#[async_trait]
impl HistoryStore for SqliteBackend {
    async fn history(&self, kind: HistoryKind, paging: Paging) -> Result<Vec<HistoryEntry>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT location, title, insertion_date, favorite FROM history \
             WHERE kind = ? ORDER BY insertion_date DESC LIMIT ? OFFSET ?",
        )
        .bind(kind_as_i64(kind))
        .bind(paging.sql_limit())
        .bind(paging.sql_offset())
        .fetch_all(&self.pool)
        .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(HistoryEntry {
                location: row.try_get("location")?,
                title: row.try_get("title")?,
                insertion_date: row.try_get("insertion_date")?,
                flags: super::favorite_flags(row.try_get("favorite")?),
            });
        }
        Ok(items)
    }

    async fn add_to_history(
        &self,
        location: &str,
        title: &str,
        kind: HistoryKind,
    ) -> Result<bool> {
        if !self.ready() || location.trim().is_empty() {
            return Ok(false);
        }
        // Replaying a location supersedes its previous entry.
        sqlx::query(
            "INSERT INTO history (location, kind, title, insertion_date) VALUES (?, ?, ?, ?) \
             ON CONFLICT (location, kind) DO UPDATE SET \
             title = excluded.title, insertion_date = excluded.insertion_date",
        )
        .bind(location)
        .bind(kind_as_i64(kind))
        .bind(title)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await?;
        Ok(true)
    }

    async fn clear_history(&self, kind: HistoryKind) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        sqlx::query("DELETE FROM history WHERE kind = ?")
            .bind(kind_as_i64(kind))
            .execute(&self.pool)
            .await?;
        Ok(true)
    }
}
