//! The catalog root: the one handle UI code talks to.
//!
//! Wraps the selected backend and the event hub. Reads never surface
//! backend failures to callers: an I/O error is logged and presented as
//! the empty result, because absence and failure look the same to a list
//! view. Entity-creating calls keep their `Result` so invalid arguments
//! fail loudly.

use crate::backend::CatalogBackend;
use crate::error::Result;
use crate::events::EventHub;
use core_model::{
    Album, Artist, Bookmark, Folder, Genre, HistoryEntry, HistoryKind, ItemType, Media,
    MediaFilter, MediaKind, Paging, Playlist, SearchAggregate, Service, ServiceKind, Sort,
    StateFlags, Storage, Subscription, VideoGroup,
};
use std::sync::Arc;
use tracing::warn;

fn or_default<T: Default>(result: Result<T>, op: &'static str) -> T {
    match result {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, op, "catalog read failed");
            T::default()
        }
    }
}

#[derive(Clone)]
pub struct Catalog {
    backend: Arc<dyn CatalogBackend>,
    events: Arc<EventHub>,
}

impl Catalog {
    pub fn new(backend: Arc<dyn CatalogBackend>, events: Arc<EventHub>) -> Self {
        Catalog { backend, events }
    }

    pub fn events(&self) -> &EventHub {
        &self.events
    }

    pub(crate) async fn init(&self) {
        if let Err(error) = self.backend.init().await {
            warn!(%error, "catalog init failed");
        }
    }

    pub async fn is_initiated(&self) -> bool {
        self.backend.is_initiated().await
    }

    // --- media ---

    pub async fn videos(&self, sort: Sort) -> Vec<Media> {
        self.videos_paged(MediaFilter::default(), sort, Paging::all()).await
    }

    pub async fn videos_paged(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Vec<Media> {
        or_default(self.backend.videos(filter, sort, paging).await, "videos")
    }

    pub async fn videos_count(&self, filter: MediaFilter) -> u32 {
        or_default(self.backend.videos_count(filter).await, "videos_count")
    }

    pub async fn audio(&self, sort: Sort) -> Vec<Media> {
        self.audio_paged(MediaFilter::default(), sort, Paging::all()).await
    }

    pub async fn audio_paged(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Vec<Media> {
        or_default(self.backend.audio(filter, sort, paging).await, "audio")
    }

    pub async fn audio_count(&self, filter: MediaFilter) -> u32 {
        or_default(self.backend.audio_count(filter).await, "audio_count")
    }

    pub async fn recent_videos(&self, paging: Paging) -> Vec<Media> {
        or_default(self.backend.recent_videos(paging).await, "recent_videos")
    }

    pub async fn recent_audio(&self, paging: Paging) -> Vec<Media> {
        or_default(self.backend.recent_audio(paging).await, "recent_audio")
    }

    pub async fn media(&self, id: i64) -> Option<Media> {
        or_default(self.backend.media(id).await, "media")
    }

    pub async fn media_by_location(&self, location: &str) -> Option<Media> {
        or_default(self.backend.media_by_location(location).await, "media_by_location")
    }

    /// Resolve an unpersisted wrapper against the catalog. A known location
    /// comes back as the stored entity carrying the wrapper's transient
    /// selection state; an unknown one comes back unchanged.
    pub async fn find_media(&self, media: Media) -> Media {
        match or_default(
            self.backend.media_by_location(&media.location).await,
            "find_media",
        ) {
            Some(mut stored) => {
                if media.flags.contains(StateFlags::SELECTED) {
                    stored.flags.insert(StateFlags::SELECTED);
                }
                if stored.display_title.is_none() {
                    stored.display_title = media.display_title.clone();
                }
                stored
            }
            None => media,
        }
    }

    pub async fn add_media(&self, location: &str) -> Result<Option<Media>> {
        let added = self.backend.add_media(location).await?;
        if added.is_some() {
            self.events.notify_media_added();
        }
        Ok(added)
    }

    pub async fn add_stream(&self, location: &str, title: &str) -> Result<Option<Media>> {
        let added = self.backend.add_stream(location, title).await?;
        if added.is_some() {
            self.events.notify_media_added();
        }
        Ok(added)
    }

    pub async fn remove_external_media(&self, id: i64) -> bool {
        let removed = or_default(
            self.backend.remove_external_media(id).await,
            "remove_external_media",
        );
        if removed {
            self.events.notify_media_deleted(&[id]);
        }
        removed
    }

    pub async fn search_media(&self, query: &str, sort: Sort, paging: Paging) -> Vec<Media> {
        or_default(self.backend.search_media(query, sort, paging).await, "search_media")
    }

    pub async fn search_media_count(&self, query: &str) -> u32 {
        or_default(self.backend.search_media_count(query).await, "search_media_count")
    }

    pub async fn search_videos(&self, query: &str, sort: Sort, paging: Paging) -> Vec<Media> {
        or_default(self.backend.search_videos(query, sort, paging).await, "search_videos")
    }

    pub async fn search_videos_count(&self, query: &str) -> u32 {
        or_default(self.backend.search_videos_count(query).await, "search_videos_count")
    }

    pub async fn search_audio(&self, query: &str, sort: Sort, paging: Paging) -> Vec<Media> {
        or_default(self.backend.search_audio(query, sort, paging).await, "search_audio")
    }

    pub async fn search_audio_count(&self, query: &str) -> u32 {
        or_default(self.backend.search_audio_count(query).await, "search_audio_count")
    }

    pub async fn set_play_position(&self, id: i64, position_ms: i64) -> bool {
        let updated = or_default(
            self.backend.set_play_position(id, position_ms).await,
            "set_play_position",
        );
        if updated {
            self.events.notify_media_modified();
        }
        updated
    }

    pub async fn increase_play_count(&self, id: i64) -> bool {
        let updated = or_default(
            self.backend.increase_play_count(id).await,
            "increase_play_count",
        );
        if updated {
            self.events.notify_media_modified();
        }
        updated
    }

    pub async fn bookmarks(&self, media_id: i64) -> Vec<Bookmark> {
        or_default(self.backend.bookmarks(media_id).await, "bookmarks")
    }

    pub async fn add_bookmark(&self, media_id: i64, name: &str, offset_ms: i64) -> Option<Bookmark> {
        or_default(
            self.backend.add_bookmark(media_id, name, offset_ms).await,
            "add_bookmark",
        )
    }

    pub async fn remove_bookmark(&self, bookmark_id: i64) -> bool {
        or_default(self.backend.remove_bookmark(bookmark_id).await, "remove_bookmark")
    }

    pub async fn clear_bookmarks(&self, media_id: i64) -> bool {
        or_default(self.backend.clear_bookmarks(media_id).await, "clear_bookmarks")
    }

    // --- albums ---

    pub async fn albums(&self, sort: Sort) -> Vec<Album> {
        self.albums_paged(MediaFilter::default(), sort, Paging::all()).await
    }

    pub async fn albums_paged(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Vec<Album> {
        or_default(self.backend.albums(filter, sort, paging).await, "albums")
    }

    pub async fn albums_count(&self, filter: MediaFilter) -> u32 {
        or_default(self.backend.albums_count(filter).await, "albums_count")
    }

    pub async fn album(&self, id: i64) -> Option<Album> {
        or_default(self.backend.album(id).await, "album")
    }

    pub async fn album_tracks(&self, album_id: i64, sort: Sort, paging: Paging) -> Vec<Media> {
        or_default(self.backend.album_tracks(album_id, sort, paging).await, "album_tracks")
    }

    pub async fn search_albums(&self, query: &str, sort: Sort, paging: Paging) -> Vec<Album> {
        or_default(self.backend.search_albums(query, sort, paging).await, "search_albums")
    }

    pub async fn search_albums_count(&self, query: &str) -> u32 {
        or_default(self.backend.search_albums_count(query).await, "search_albums_count")
    }

    // --- artists ---

    pub async fn artists(&self, all: bool, sort: Sort) -> Vec<Artist> {
        self.artists_paged(all, MediaFilter::default(), sort, Paging::all()).await
    }

    pub async fn artists_paged(
        &self,
        all: bool,
        filter: MediaFilter,
        sort: Sort,
        paging: Paging,
    ) -> Vec<Artist> {
        or_default(self.backend.artists(all, filter, sort, paging).await, "artists")
    }

    pub async fn artists_count(&self, all: bool, filter: MediaFilter) -> u32 {
        or_default(self.backend.artists_count(all, filter).await, "artists_count")
    }

    pub async fn artist(&self, id: i64) -> Option<Artist> {
        or_default(self.backend.artist(id).await, "artist")
    }

    pub async fn artist_albums(&self, artist_id: i64, sort: Sort, paging: Paging) -> Vec<Album> {
        or_default(
            self.backend.artist_albums(artist_id, sort, paging).await,
            "artist_albums",
        )
    }

    pub async fn artist_tracks(&self, artist_id: i64, sort: Sort, paging: Paging) -> Vec<Media> {
        or_default(
            self.backend.artist_tracks(artist_id, sort, paging).await,
            "artist_tracks",
        )
    }

    pub async fn search_artists(&self, query: &str, sort: Sort, paging: Paging) -> Vec<Artist> {
        or_default(self.backend.search_artists(query, sort, paging).await, "search_artists")
    }

    pub async fn search_artists_count(&self, query: &str) -> u32 {
        or_default(
            self.backend.search_artists_count(query).await,
            "search_artists_count",
        )
    }

    // --- genres ---

    pub async fn genres(&self, sort: Sort) -> Vec<Genre> {
        self.genres_paged(MediaFilter::default(), sort, Paging::all()).await
    }

    pub async fn genres_paged(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Vec<Genre> {
        or_default(self.backend.genres(filter, sort, paging).await, "genres")
    }

    pub async fn genres_count(&self, filter: MediaFilter) -> u32 {
        or_default(self.backend.genres_count(filter).await, "genres_count")
    }

    pub async fn genre(&self, id: i64) -> Option<Genre> {
        or_default(self.backend.genre(id).await, "genre")
    }

    pub async fn genre_tracks(
        &self,
        genre_id: i64,
        filter: MediaFilter,
        sort: Sort,
        paging: Paging,
    ) -> Vec<Media> {
        or_default(
            self.backend.genre_tracks(genre_id, filter, sort, paging).await,
            "genre_tracks",
        )
    }

    pub async fn genre_albums(&self, genre_id: i64, sort: Sort, paging: Paging) -> Vec<Album> {
        or_default(self.backend.genre_albums(genre_id, sort, paging).await, "genre_albums")
    }

    pub async fn genre_artists(&self, genre_id: i64, sort: Sort, paging: Paging) -> Vec<Artist> {
        or_default(
            self.backend.genre_artists(genre_id, sort, paging).await,
            "genre_artists",
        )
    }

    pub async fn search_genres(&self, query: &str, sort: Sort, paging: Paging) -> Vec<Genre> {
        or_default(self.backend.search_genres(query, sort, paging).await, "search_genres")
    }

    pub async fn search_genres_count(&self, query: &str) -> u32 {
        or_default(self.backend.search_genres_count(query).await, "search_genres_count")
    }

    // --- playlists ---

    pub async fn playlists(&self, sort: Sort) -> Vec<Playlist> {
        self.playlists_paged(MediaFilter::default(), sort, Paging::all()).await
    }

    pub async fn playlists_paged(
        &self,
        filter: MediaFilter,
        sort: Sort,
        paging: Paging,
    ) -> Vec<Playlist> {
        or_default(self.backend.playlists(filter, sort, paging).await, "playlists")
    }

    pub async fn playlists_count(&self, filter: MediaFilter) -> u32 {
        or_default(self.backend.playlists_count(filter).await, "playlists_count")
    }

    pub async fn playlist(&self, id: i64) -> Option<Playlist> {
        or_default(self.backend.playlist(id).await, "playlist")
    }

    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let playlist = self.backend.create_playlist(name).await?;
        self.events.notify_playlists_added();
        Ok(playlist)
    }

    pub async fn playlist_tracks(&self, playlist_id: i64, paging: Paging) -> Vec<Media> {
        or_default(
            self.backend.playlist_tracks(playlist_id, paging).await,
            "playlist_tracks",
        )
    }

    pub async fn playlist_tracks_count(&self, playlist_id: i64) -> u32 {
        or_default(
            self.backend.playlist_tracks_count(playlist_id).await,
            "playlist_tracks_count",
        )
    }

    pub async fn playlist_append(&self, playlist_id: i64, media_ids: &[i64]) -> bool {
        let changed = or_default(
            self.backend.playlist_append(playlist_id, media_ids).await,
            "playlist_append",
        );
        if changed {
            self.events.notify_playlists_modified();
        }
        changed
    }

    pub async fn playlist_insert(&self, playlist_id: i64, media_id: i64, position: u32) -> bool {
        let changed = or_default(
            self.backend.playlist_insert(playlist_id, media_id, position).await,
            "playlist_insert",
        );
        if changed {
            self.events.notify_playlists_modified();
        }
        changed
    }

    pub async fn playlist_move(&self, playlist_id: i64, from: u32, to: u32) -> bool {
        let changed = or_default(
            self.backend.playlist_move(playlist_id, from, to).await,
            "playlist_move",
        );
        if changed {
            self.events.notify_playlists_modified();
        }
        changed
    }

    pub async fn playlist_remove_at(&self, playlist_id: i64, position: u32) -> bool {
        let changed = or_default(
            self.backend.playlist_remove_at(playlist_id, position).await,
            "playlist_remove_at",
        );
        if changed {
            self.events.notify_playlists_modified();
        }
        changed
    }

    pub async fn delete_playlist(&self, playlist_id: i64) -> bool {
        let deleted = or_default(
            self.backend.delete_playlist(playlist_id).await,
            "delete_playlist",
        );
        if deleted {
            self.events.notify_playlists_deleted();
        }
        deleted
    }

    pub async fn rename_playlist(&self, playlist_id: i64, name: &str) -> bool {
        let renamed = or_default(
            self.backend.rename_playlist(playlist_id, name).await,
            "rename_playlist",
        );
        if renamed {
            self.events.notify_playlists_modified();
        }
        renamed
    }

    pub async fn search_playlists(&self, query: &str, sort: Sort, paging: Paging) -> Vec<Playlist> {
        or_default(
            self.backend.search_playlists(query, sort, paging).await,
            "search_playlists",
        )
    }

    pub async fn search_playlists_count(&self, query: &str) -> u32 {
        or_default(
            self.backend.search_playlists_count(query).await,
            "search_playlists_count",
        )
    }

    // --- folders ---

    pub async fn folders(&self, kind: MediaKind, sort: Sort, paging: Paging) -> Vec<Folder> {
        or_default(self.backend.folders(kind, sort, paging).await, "folders")
    }

    pub async fn folders_count(&self, kind: MediaKind) -> u32 {
        or_default(self.backend.folders_count(kind).await, "folders_count")
    }

    pub async fn folder_media(
        &self,
        folder_id: i64,
        kind: MediaKind,
        sort: Sort,
        paging: Paging,
    ) -> Vec<Media> {
        or_default(
            self.backend.folder_media(folder_id, kind, sort, paging).await,
            "folder_media",
        )
    }

    pub async fn folder_media_count(&self, folder_id: i64, kind: MediaKind) -> u32 {
        or_default(
            self.backend.folder_media_count(folder_id, kind).await,
            "folder_media_count",
        )
    }

    // --- video groups ---

    pub async fn video_groups(&self, sort: Sort, paging: Paging) -> Vec<VideoGroup> {
        or_default(self.backend.video_groups(sort, paging).await, "video_groups")
    }

    pub async fn video_groups_count(&self) -> u32 {
        or_default(self.backend.video_groups_count().await, "video_groups_count")
    }

    pub async fn video_group_media(&self, group_id: i64, sort: Sort, paging: Paging) -> Vec<Media> {
        or_default(
            self.backend.video_group_media(group_id, sort, paging).await,
            "video_group_media",
        )
    }

    pub async fn create_video_group(&self, name: &str) -> Option<VideoGroup> {
        or_default(self.backend.create_video_group(name).await, "create_video_group")
    }

    pub async fn rename_video_group(&self, group_id: i64, name: &str) -> bool {
        or_default(
            self.backend.rename_video_group(group_id, name).await,
            "rename_video_group",
        )
    }

    pub async fn video_group_add_media(&self, group_id: i64, media_id: i64) -> bool {
        or_default(
            self.backend.video_group_add_media(group_id, media_id).await,
            "video_group_add_media",
        )
    }

    pub async fn video_group_remove_media(&self, group_id: i64, media_id: i64) -> bool {
        or_default(
            self.backend.video_group_remove_media(group_id, media_id).await,
            "video_group_remove_media",
        )
    }

    pub async fn destroy_video_group(&self, group_id: i64) -> bool {
        or_default(self.backend.destroy_video_group(group_id).await, "destroy_video_group")
    }

    // --- subscriptions ---

    pub async fn services(&self) -> Vec<Service> {
        or_default(self.backend.services().await, "services")
    }

    pub async fn subscriptions(
        &self,
        service: ServiceKind,
        sort: Sort,
        paging: Paging,
    ) -> Vec<Subscription> {
        or_default(self.backend.subscriptions(service, sort, paging).await, "subscriptions")
    }

    pub async fn subscription(&self, id: i64) -> Option<Subscription> {
        or_default(self.backend.subscription(id).await, "subscription")
    }

    pub async fn subscription_children(&self, id: i64) -> Vec<Subscription> {
        or_default(self.backend.subscription_children(id).await, "subscription_children")
    }

    pub async fn subscription_media(&self, id: i64, sort: Sort, paging: Paging) -> Vec<Media> {
        or_default(
            self.backend.subscription_media(id, sort, paging).await,
            "subscription_media",
        )
    }

    pub async fn subscription_cached_size(&self, id: i64) -> i64 {
        or_default(
            self.backend.subscription_cached_size(id).await,
            "subscription_cached_size",
        )
    }

    pub async fn subscription_max_cached_size(&self, id: i64) -> i64 {
        match self.backend.subscription_max_cached_size(id).await {
            Ok(size) => size,
            Err(error) => {
                warn!(%error, "subscription_max_cached_size failed");
                -1
            }
        }
    }

    pub async fn set_subscription_max_cached_size(&self, id: i64, size: i64) -> bool {
        or_default(
            self.backend.set_subscription_max_cached_size(id, size).await,
            "set_subscription_max_cached_size",
        )
    }

    pub async fn service_max_cached_size(&self, service: ServiceKind) -> i64 {
        match self.backend.service_max_cached_size(service).await {
            Ok(size) => size,
            Err(error) => {
                warn!(%error, "service_max_cached_size failed");
                -1
            }
        }
    }

    pub async fn set_service_max_cached_size(&self, service: ServiceKind, size: i64) -> bool {
        or_default(
            self.backend.set_service_max_cached_size(service, size).await,
            "set_service_max_cached_size",
        )
    }

    pub async fn service_unplayed_count(&self, service: ServiceKind) -> u32 {
        or_default(
            self.backend.service_unplayed_count(service).await,
            "service_unplayed_count",
        )
    }

    pub async fn refresh_subscription(&self, id: i64) -> bool {
        or_default(self.backend.refresh_subscription(id).await, "refresh_subscription")
    }

    pub async fn remove_subscription(&self, id: i64) -> bool {
        or_default(self.backend.remove_subscription(id).await, "remove_subscription")
    }

    // --- history ---

    pub async fn history(&self, kind: HistoryKind, paging: Paging) -> Vec<HistoryEntry> {
        or_default(self.backend.history(kind, paging).await, "history")
    }

    pub async fn add_to_history(&self, location: &str, title: &str, kind: HistoryKind) -> bool {
        let added = or_default(
            self.backend.add_to_history(location, title, kind).await,
            "add_to_history",
        );
        if added {
            self.events.notify_media_modified();
        }
        added
    }

    pub async fn clear_history(&self, kind: HistoryKind) -> bool {
        or_default(self.backend.clear_history(kind).await, "clear_history")
    }

    // --- control ---

    pub async fn devices(&self) -> Vec<Storage> {
        or_default(self.backend.devices().await, "devices")
    }

    pub async fn add_device(&self, device: Storage) -> bool {
        or_default(self.backend.add_device(device).await, "add_device")
    }

    pub async fn remove_device(&self, name: &str) -> bool {
        or_default(self.backend.remove_device(name).await, "remove_device")
    }

    pub async fn entry_points(&self) -> Vec<String> {
        or_default(self.backend.entry_points().await, "entry_points")
    }

    pub async fn add_entry_point(&self, mrl: &str) -> bool {
        let added = or_default(self.backend.add_entry_point(mrl).await, "add_entry_point");
        self.events.notify_entry_point_added(mrl, added);
        added
    }

    pub async fn remove_entry_point(&self, mrl: &str) -> bool {
        let removed = or_default(self.backend.remove_entry_point(mrl).await, "remove_entry_point");
        self.events.notify_entry_point_removed(mrl, removed);
        removed
    }

    pub async fn ban_folder(&self, mrl: &str) -> bool {
        let banned = or_default(self.backend.ban_folder(mrl).await, "ban_folder");
        self.events.notify_entry_point_banned(mrl, banned);
        banned
    }

    pub async fn unban_folder(&self, mrl: &str) -> bool {
        let unbanned = or_default(self.backend.unban_folder(mrl).await, "unban_folder");
        self.events.notify_entry_point_unbanned(mrl, unbanned);
        unbanned
    }

    pub async fn banned_folders(&self) -> Vec<String> {
        or_default(self.backend.banned_folders().await, "banned_folders")
    }

    /// Register a root for indexing and fire the discovery cycle events.
    /// Walking the filesystem belongs to the engine, not this crate.
    pub async fn discover(&self, mrl: &str) -> bool {
        self.events.notify_discovery_started();
        let registered = or_default(self.backend.discover(mrl).await, "discover");
        if registered {
            self.events.notify_discovery_progress(mrl);
            self.events.notify_discovery_completed();
        } else {
            self.events.notify_discovery_failed(mrl);
        }
        registered
    }

    pub async fn reload_all(&self) -> bool {
        self.events.notify_reload_started("");
        let reloaded = or_default(self.backend.reload_all().await, "reload_all");
        if reloaded {
            self.events.notify_reload_completed("");
        }
        reloaded
    }

    pub async fn reload(&self, entry_point: &str) -> bool {
        self.events.notify_reload_started(entry_point);
        let reloaded = or_default(self.backend.reload(entry_point).await, "reload");
        if reloaded {
            self.events.notify_reload_completed(entry_point);
        }
        reloaded
    }

    pub async fn pause_background_operations(&self) -> bool {
        let paused = or_default(
            self.backend.pause_background_operations().await,
            "pause_background_operations",
        );
        if paused {
            self.events.notify_idle_changed(true);
        }
        paused
    }

    pub async fn resume_background_operations(&self) -> bool {
        let resumed = or_default(
            self.backend.resume_background_operations().await,
            "resume_background_operations",
        );
        if resumed {
            self.events.notify_idle_changed(false);
        }
        resumed
    }

    pub async fn force_rescan(&self) -> bool {
        or_default(self.backend.force_rescan().await, "force_rescan")
    }

    pub async fn force_parser_retry(&self) -> bool {
        or_default(self.backend.force_parser_retry().await, "force_parser_retry")
    }

    pub async fn clear_database(&self, restore_playlists: bool) -> bool {
        or_default(
            self.backend.clear_database(restore_playlists).await,
            "clear_database",
        )
    }

    pub async fn search(&self, query: &str) -> SearchAggregate {
        or_default(self.backend.search(query).await, "search")
    }

    pub async fn pending_storages(&self) -> Vec<String> {
        or_default(self.backend.pending_storages().await, "pending_storages")
    }

    // --- cross-entity helpers ---

    /// The base-contract track expansion for any entity: what "the tracks
    /// of this item" means for its type.
    pub async fn expand(&self, item_type: ItemType, id: i64) -> Vec<Media> {
        match item_type {
            ItemType::Media => self.media(id).await.into_iter().collect(),
            ItemType::Album => self.album_tracks(id, Sort::default(), Paging::all()).await,
            ItemType::Artist => self.artist_tracks(id, Sort::default(), Paging::all()).await,
            ItemType::Genre => {
                self.genre_tracks(id, MediaFilter::default(), Sort::default(), Paging::all())
                    .await
            }
            ItemType::Playlist => self.playlist_tracks(id, Paging::all()).await,
            ItemType::Folder => {
                self.folder_media(id, MediaKind::Unknown, Sort::default(), Paging::all())
                    .await
            }
            ItemType::VideoGroup => {
                self.video_group_media(id, Sort::default(), Paging::all()).await
            }
            ItemType::Subscription => {
                self.subscription_media(id, Sort::default(), Paging::all()).await
            }
            _ => Vec::new(),
        }
    }

    /// Favorite toggle dispatched by entity type. Types with no persistent
    /// favorite state report `false`.
    pub async fn set_favorite(&self, item_type: ItemType, id: i64, favorite: bool) -> bool {
        let updated = match item_type {
            ItemType::Media => self.backend.set_media_favorite(id, favorite).await,
            ItemType::Album => self.backend.set_album_favorite(id, favorite).await,
            ItemType::Artist => self.backend.set_artist_favorite(id, favorite).await,
            ItemType::Genre => self.backend.set_genre_favorite(id, favorite).await,
            ItemType::Playlist => self.backend.set_playlist_favorite(id, favorite).await,
            ItemType::Folder => self.backend.set_folder_favorite(id, favorite).await,
            _ => Ok(false),
        };
        let updated = or_default(updated, "set_favorite");
        if updated {
            match item_type {
                ItemType::Media => self.events.notify_media_modified(),
                ItemType::Album => self.events.notify_albums_modified(),
                ItemType::Artist => self.events.notify_artists_modified(),
                ItemType::Genre => self.events.notify_genres_modified(),
                ItemType::Playlist => self.events.notify_playlists_modified(),
                _ => {}
            }
        }
        updated
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}
