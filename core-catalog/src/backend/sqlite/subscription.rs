//! Subscription store over SQLite.

use super::media::media_from_row;
use super::{media_order, named_order, row_u32, SqliteBackend};
use crate::backend::SubscriptionStore;
use crate::error::Result;
use async_trait::async_trait;
use core_model::{Media, Paging, Service, ServiceKind, Sort, StateFlags, Subscription};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const SUBSCRIPTION_COLUMNS: &str = "id, service, name, parent_id, artwork_url, cached_size, \
    max_cached_size, nb_media, nb_unplayed_media";

fn service_kind_as_i64(kind: ServiceKind) -> i64 {
    match kind {
        ServiceKind::Podcast => 1,
    }
}

fn service_kind_from_i64(value: i64) -> ServiceKind {
    // Single known service today.
    let _ = value;
    ServiceKind::Podcast
}

fn subscription_from_row(row: &SqliteRow) -> std::result::Result<Subscription, sqlx::Error> {
    Ok(Subscription {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        flags: StateFlags::NONE,
        service: service_kind_from_i64(row.try_get("service")?),
        parent_id: row.try_get("parent_id")?,
        artwork_url: row.try_get("artwork_url")?,
        cached_size: row.try_get("cached_size")?,
        max_cached_size: row.try_get("max_cached_size")?,
        nb_media: row_u32(row, "nb_media")?,
        nb_unplayed_media: row_u32(row, "nb_unplayed_media")?,
    })
}

fn service_from_row(row: &SqliteRow) -> std::result::Result<Service, sqlx::Error> {
    Ok(Service {
        kind: service_kind_from_i64(row.try_get("kind")?),
        auto_download: row.try_get("auto_download")?,
        new_media_notification: row.try_get("new_media_notification")?,
        max_cached_size: row.try_get("max_cached_size")?,
        nb_subscriptions: row_u32(row, "nb_subscriptions")?,
        nb_unplayed_media: row_u32(row, "nb_unplayed_media")?,
    })
}

impl SqliteBackend {
    /// Write surface for importers: store a subscription, creating its
    /// service row on first use.
    pub async fn insert_subscription(&self, subscription: &Subscription) -> Result<Subscription> {
        let mut stored = subscription.clone();
        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT OR IGNORE INTO services (kind) VALUES (?)")
            .bind(service_kind_as_i64(stored.service))
            .execute(&mut *tx)
            .await?;
        let id = sqlx::query(
            "INSERT INTO subscriptions (service, name, parent_id, artwork_url, cached_size, \
             max_cached_size, nb_media, nb_unplayed_media) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(service_kind_as_i64(stored.service))
        .bind(&stored.name)
        .bind(stored.parent_id)
        .bind(&stored.artwork_url)
        .bind(stored.cached_size)
        .bind(stored.max_cached_size)
        .bind(stored.nb_media as i64)
        .bind(stored.nb_unplayed_media as i64)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        sqlx::query(
            "UPDATE services SET nb_subscriptions = nb_subscriptions + 1 WHERE kind = ?",
        )
        .bind(service_kind_as_i64(stored.service))
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        stored.id = id;
        Ok(stored)
    }
}

#[async_trait]
impl SubscriptionStore for SqliteBackend {
    async fn services(&self) -> Result<Vec<Service>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT kind, auto_download, new_media_notification, max_cached_size, \
             nb_subscriptions, nb_unplayed_media FROM services",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(service_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn subscriptions(
        &self,
        service: ServiceKind,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Subscription>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE service = ? AND parent_id = 0 {} LIMIT ? OFFSET ?",
            named_order("name", sort),
        );
        let rows = sqlx::query(&sql)
            .bind(service_kind_as_i64(service))
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(subscription_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn subscription(&self, id: i64) -> Result<Option<Subscription>> {
        if !self.ready() || id == 0 {
            return Ok(None);
        }
        let sql = format!("SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = ?");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(subscription_from_row).transpose()?)
    }

    async fn subscription_children(&self, id: i64) -> Result<Vec<Subscription>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE parent_id = ? \
             ORDER BY name COLLATE NOCASE"
        );
        let rows = sqlx::query(&sql).bind(id).fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(subscription_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn subscription_media(&self, id: i64, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT m.* FROM media m JOIN subscription_media sm ON m.id = sm.media_id \
             WHERE sm.subscription_id = ? {} LIMIT ? OFFSET ?",
            media_order(sort),
        );
        let rows = sqlx::query(&sql)
            .bind(id)
            .bind(paging.sql_limit())
            .bind(paging.sql_offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(media_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn subscription_cached_size(&self, id: i64) -> Result<i64> {
        Ok(self.subscription(id).await?.map_or(0, |s| s.cached_size))
    }

    async fn subscription_max_cached_size(&self, id: i64) -> Result<i64> {
        Ok(self.subscription(id).await?.map_or(-1, |s| s.max_cached_size))
    }

    async fn set_subscription_max_cached_size(&self, id: i64, size: i64) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE subscriptions SET max_cached_size = ? WHERE id = ?")
            .bind(size)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn service_max_cached_size(&self, service: ServiceKind) -> Result<i64> {
        if !self.ready() {
            return Ok(-1);
        }
        let size: Option<i64> =
            sqlx::query_scalar("SELECT max_cached_size FROM services WHERE kind = ?")
                .bind(service_kind_as_i64(service))
                .fetch_optional(&self.pool)
                .await?;
        Ok(size.unwrap_or(-1))
    }

    async fn set_service_max_cached_size(&self, service: ServiceKind, size: i64) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        sqlx::query("INSERT OR IGNORE INTO services (kind) VALUES (?)")
            .bind(service_kind_as_i64(service))
            .execute(&self.pool)
            .await?;
        sqlx::query("UPDATE services SET max_cached_size = ? WHERE kind = ?")
            .bind(size)
            .bind(service_kind_as_i64(service))
            .execute(&self.pool)
            .await?;
        Ok(true)
    }

    async fn service_unplayed_count(&self, service: ServiceKind) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        let row = sqlx::query(
            "SELECT COALESCE(SUM(nb_unplayed_media), 0) AS n FROM subscriptions WHERE service = ?",
        )
        .bind(service_kind_as_i64(service))
        .fetch_one(&self.pool)
        .await?;
        Ok(row_u32(&row, "n")?)
    }

    async fn refresh_subscription(&self, id: i64) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let result = sqlx::query("UPDATE subscriptions SET refresh_pending = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_subscription(&self, id: i64) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let mut tx = self.pool.begin().await?;
        let service: Option<i64> =
            sqlx::query_scalar("SELECT service FROM subscriptions WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(service) = service else {
            return Ok(false);
        };
        sqlx::query("DELETE FROM subscriptions WHERE id = ? OR parent_id = ?")
            .bind(id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE services SET nb_subscriptions = MAX(nb_subscriptions - 1, 0) WHERE kind = ?",
        )
        .bind(service)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(true)
    }
}
