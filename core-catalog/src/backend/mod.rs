//! Backend dispatch surface: one async trait per entity family, composed
//! into [`CatalogBackend`].
//!
//! Conventions shared by every implementation:
//! - reads on an uninitialized backend return empty/`None`/`0`;
//! - mutations on an uninitialized backend, or on an `id` of `0`, return
//!   `Ok(false)` without dispatching;
//! - a failed mutation leaves state untouched;
//! - an empty or whitespace-only search query yields an empty result and a
//!   count of `0`.

use crate::error::Result;
use async_trait::async_trait;
use core_model::{
    Bookmark, HistoryEntry, HistoryKind, Media, MediaFilter, MediaKind, Paging, Playlist,
    SearchAggregate, Service, ServiceKind, Sort, Storage, Subscription, VideoGroup,
};
use core_model::{Album, Artist, Folder, Genre};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn videos(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Media>>;
    async fn videos_count(&self, filter: MediaFilter) -> Result<u32>;
    async fn audio(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Media>>;
    async fn audio_count(&self, filter: MediaFilter) -> Result<u32>;

    /// Most recently indexed videos, newest first.
    async fn recent_videos(&self, paging: Paging) -> Result<Vec<Media>>;
    async fn recent_audio(&self, paging: Paging) -> Result<Vec<Media>>;

    async fn media(&self, id: i64) -> Result<Option<Media>>;
    async fn media_by_location(&self, location: &str) -> Result<Option<Media>>;

    /// Index a location outside the scanned roots. Returns the stored
    /// entity, or `None` when the backend cannot take it.
    async fn add_media(&self, location: &str) -> Result<Option<Media>>;
    async fn add_stream(&self, location: &str, title: &str) -> Result<Option<Media>>;
    async fn remove_external_media(&self, id: i64) -> Result<bool>;

    async fn search_media(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Media>>;
    async fn search_media_count(&self, query: &str) -> Result<u32>;
    async fn search_videos(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Media>>;
    async fn search_videos_count(&self, query: &str) -> Result<u32>;
    async fn search_audio(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Media>>;
    async fn search_audio_count(&self, query: &str) -> Result<u32>;

    async fn set_media_favorite(&self, id: i64, favorite: bool) -> Result<bool>;
    async fn set_play_position(&self, id: i64, position_ms: i64) -> Result<bool>;
    async fn increase_play_count(&self, id: i64) -> Result<bool>;

    async fn bookmarks(&self, media_id: i64) -> Result<Vec<Bookmark>>;
    async fn add_bookmark(
        &self,
        media_id: i64,
        name: &str,
        offset_ms: i64,
    ) -> Result<Option<Bookmark>>;
    async fn remove_bookmark(&self, bookmark_id: i64) -> Result<bool>;
    async fn clear_bookmarks(&self, media_id: i64) -> Result<bool>;
}

#[async_trait]
pub trait AlbumStore: Send + Sync {
    async fn albums(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Album>>;
    async fn albums_count(&self, filter: MediaFilter) -> Result<u32>;
    async fn album(&self, id: i64) -> Result<Option<Album>>;
    async fn album_tracks(&self, album_id: i64, sort: Sort, paging: Paging) -> Result<Vec<Media>>;
    async fn search_albums(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Album>>;
    async fn search_albums_count(&self, query: &str) -> Result<u32>;
    async fn set_album_favorite(&self, id: i64, favorite: bool) -> Result<bool>;
}

#[async_trait]
pub trait ArtistStore: Send + Sync {
    /// `all` includes artists that only appear on compilations.
    async fn artists(
        &self,
        all: bool,
        filter: MediaFilter,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Artist>>;
    async fn artists_count(&self, all: bool, filter: MediaFilter) -> Result<u32>;
    async fn artist(&self, id: i64) -> Result<Option<Artist>>;
    async fn artist_albums(&self, artist_id: i64, sort: Sort, paging: Paging)
        -> Result<Vec<Album>>;
    async fn artist_tracks(&self, artist_id: i64, sort: Sort, paging: Paging)
        -> Result<Vec<Media>>;
    async fn search_artists(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Artist>>;
    async fn search_artists_count(&self, query: &str) -> Result<u32>;
    async fn set_artist_favorite(&self, id: i64, favorite: bool) -> Result<bool>;
}

#[async_trait]
pub trait GenreStore: Send + Sync {
    async fn genres(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Genre>>;
    async fn genres_count(&self, filter: MediaFilter) -> Result<u32>;
    async fn genre(&self, id: i64) -> Result<Option<Genre>>;
    async fn genre_tracks(
        &self,
        genre_id: i64,
        filter: MediaFilter,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Media>>;
    async fn genre_albums(&self, genre_id: i64, sort: Sort, paging: Paging) -> Result<Vec<Album>>;
    async fn genre_artists(&self, genre_id: i64, sort: Sort, paging: Paging)
        -> Result<Vec<Artist>>;
    async fn search_genres(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Genre>>;
    async fn search_genres_count(&self, query: &str) -> Result<u32>;
    async fn set_genre_favorite(&self, id: i64, favorite: bool) -> Result<bool>;
}

#[async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn playlists(
        &self,
        filter: MediaFilter,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Playlist>>;
    async fn playlists_count(&self, filter: MediaFilter) -> Result<u32>;
    async fn playlist(&self, id: i64) -> Result<Option<Playlist>>;

    /// Fails loudly on an empty name; that is a caller bug.
    async fn create_playlist(&self, name: &str) -> Result<Playlist>;

    /// Members in playlist order.
    async fn playlist_tracks(&self, playlist_id: i64, paging: Paging) -> Result<Vec<Media>>;
    async fn playlist_tracks_count(&self, playlist_id: i64) -> Result<u32>;
    async fn playlist_append(&self, playlist_id: i64, media_ids: &[i64]) -> Result<bool>;
    async fn playlist_insert(&self, playlist_id: i64, media_id: i64, position: u32)
        -> Result<bool>;
    /// Move the member at `from` so it ends up at index `to`.
    async fn playlist_move(&self, playlist_id: i64, from: u32, to: u32) -> Result<bool>;
    async fn playlist_remove_at(&self, playlist_id: i64, position: u32) -> Result<bool>;
    async fn delete_playlist(&self, playlist_id: i64) -> Result<bool>;
    async fn rename_playlist(&self, playlist_id: i64, name: &str) -> Result<bool>;

    async fn search_playlists(
        &self,
        query: &str,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Playlist>>;
    async fn search_playlists_count(&self, query: &str) -> Result<u32>;
    async fn set_playlist_favorite(&self, id: i64, favorite: bool) -> Result<bool>;
}

#[async_trait]
pub trait FolderStore: Send + Sync {
    /// Folders containing at least one item of `kind`.
    async fn folders(&self, kind: MediaKind, sort: Sort, paging: Paging) -> Result<Vec<Folder>>;
    async fn folders_count(&self, kind: MediaKind) -> Result<u32>;
    async fn folder_media(
        &self,
        folder_id: i64,
        kind: MediaKind,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Media>>;
    async fn folder_media_count(&self, folder_id: i64, kind: MediaKind) -> Result<u32>;

    /// Folders are not favoritable; always `Ok(false)`.
    async fn set_folder_favorite(&self, id: i64, favorite: bool) -> Result<bool>;
}

#[async_trait]
pub trait VideoGroupStore: Send + Sync {
    async fn video_groups(&self, sort: Sort, paging: Paging) -> Result<Vec<VideoGroup>>;
    async fn video_groups_count(&self) -> Result<u32>;
    async fn video_group_media(
        &self,
        group_id: i64,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Media>>;
    async fn create_video_group(&self, name: &str) -> Result<Option<VideoGroup>>;
    async fn rename_video_group(&self, group_id: i64, name: &str) -> Result<bool>;
    async fn video_group_add_media(&self, group_id: i64, media_id: i64) -> Result<bool>;
    async fn video_group_remove_media(&self, group_id: i64, media_id: i64) -> Result<bool>;
    async fn destroy_video_group(&self, group_id: i64) -> Result<bool>;
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn services(&self) -> Result<Vec<Service>>;
    async fn subscriptions(
        &self,
        service: ServiceKind,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Subscription>>;
    async fn subscription(&self, id: i64) -> Result<Option<Subscription>>;
    async fn subscription_children(&self, id: i64) -> Result<Vec<Subscription>>;
    async fn subscription_media(&self, id: i64, sort: Sort, paging: Paging) -> Result<Vec<Media>>;

    async fn subscription_cached_size(&self, id: i64) -> Result<i64>;
    async fn subscription_max_cached_size(&self, id: i64) -> Result<i64>;
    async fn set_subscription_max_cached_size(&self, id: i64, size: i64) -> Result<bool>;
    async fn service_max_cached_size(&self, service: ServiceKind) -> Result<i64>;
    async fn set_service_max_cached_size(&self, service: ServiceKind, size: i64) -> Result<bool>;
    async fn service_unplayed_count(&self, service: ServiceKind) -> Result<u32>;

    /// Mark a subscription for refresh on the next sync pass.
    async fn refresh_subscription(&self, id: i64) -> Result<bool>;
    async fn remove_subscription(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Most recent first.
    async fn history(&self, kind: HistoryKind, paging: Paging) -> Result<Vec<HistoryEntry>>;
    async fn add_to_history(&self, location: &str, title: &str, kind: HistoryKind)
        -> Result<bool>;
    async fn clear_history(&self, kind: HistoryKind) -> Result<bool>;
}

/// Lifecycle, indexing roots and cross-entity search.
#[async_trait]
pub trait ControlStore: Send + Sync {
    /// Idempotent; `Ok(true)` on the transition from uninitialized.
    async fn init(&self) -> Result<bool>;
    async fn is_initiated(&self) -> bool;

    async fn devices(&self) -> Result<Vec<Storage>>;
    async fn add_device(&self, device: Storage) -> Result<bool>;
    async fn remove_device(&self, name: &str) -> Result<bool>;

    async fn entry_points(&self) -> Result<Vec<String>>;
    async fn add_entry_point(&self, mrl: &str) -> Result<bool>;
    async fn remove_entry_point(&self, mrl: &str) -> Result<bool>;
    async fn ban_folder(&self, mrl: &str) -> Result<bool>;
    async fn unban_folder(&self, mrl: &str) -> Result<bool>;
    async fn banned_folders(&self) -> Result<Vec<String>>;

    /// Register a root for indexing. Walking the filesystem is the engine's
    /// job, not this crate's.
    async fn discover(&self, mrl: &str) -> Result<bool>;
    async fn reload_all(&self) -> Result<bool>;
    async fn reload(&self, entry_point: &str) -> Result<bool>;

    async fn pause_background_operations(&self) -> Result<bool>;
    async fn resume_background_operations(&self) -> Result<bool>;
    async fn force_rescan(&self) -> Result<bool>;
    /// Re-queue items whose metadata extraction previously failed.
    async fn force_parser_retry(&self) -> Result<bool>;
    async fn clear_database(&self, restore_playlists: bool) -> Result<bool>;

    async fn search(&self, query: &str) -> Result<SearchAggregate>;

    /// Raw storage roots seen by devices but not yet imported.
    async fn pending_storages(&self) -> Result<Vec<String>>;
}

/// The full backend contract. A catalog talks to exactly one of these.
pub trait CatalogBackend:
    MediaStore
    + AlbumStore
    + ArtistStore
    + GenreStore
    + PlaylistStore
    + FolderStore
    + VideoGroupStore
    + SubscriptionStore
    + HistoryStore
    + ControlStore
    + Send
    + Sync
{
}

impl<T> CatalogBackend for T where
    T: MediaStore
        + AlbumStore
        + ArtistStore
        + GenreStore
        + PlaylistStore
        + FolderStore
        + VideoGroupStore
        + SubscriptionStore
        + HistoryStore
        + ControlStore
        + Send
        + Sync
{
}

/// Shared guard for the empty-query convention.
pub(crate) fn normalized_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
