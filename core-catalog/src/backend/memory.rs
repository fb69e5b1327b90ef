//! In-memory backend: plain `Vec` stores behind a lock, no engine, no I/O.
//!
//! Exists so UI code and the contract tests can run against the full
//! dispatch surface without a database. Relations are matched by string
//! the way scraped metadata actually links (track's album title to the
//! album row, artist name to the artist row).

use crate::backend::{
    normalized_query, AlbumStore, ArtistStore, ControlStore, FolderStore, GenreStore,
    HistoryStore, MediaStore, PlaylistStore, SubscriptionStore, VideoGroupStore,
};
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use core_model::{
    artist, Album, Artist, Bookmark, CatalogItem, Folder, Genre, HistoryEntry, HistoryKind,
    Media, MediaFilter, MediaKind, Paging, Playlist, SearchAggregate, Service, ServiceKind,
    Sort, SortKey, StateFlags, Storage, Subscription, VideoGroup,
};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering as AtomicOrdering};
use tracing::debug;

/// First id handed out; 1 and 2 are the reserved artist rows.
const FIRST_FREE_ID: i64 = artist::VARIOUS_ARTISTS_ID + 1;

#[derive(Default)]
struct StubStore {
    media: Vec<Media>,
    albums: Vec<Album>,
    artists: Vec<Artist>,
    genres: Vec<Genre>,
    playlists: Vec<Playlist>,
    playlist_members: HashMap<i64, Vec<i64>>,
    folders: Vec<Folder>,
    video_groups: Vec<VideoGroup>,
    group_members: HashMap<i64, Vec<i64>>,
    services: Vec<Service>,
    subscriptions: Vec<Subscription>,
    subscription_members: HashMap<i64, Vec<i64>>,
    refresh_queue: Vec<i64>,
    bookmarks: Vec<Bookmark>,
    history_local: Vec<HistoryEntry>,
    history_network: Vec<HistoryEntry>,
    devices: Vec<Storage>,
    entry_points: Vec<String>,
    banned: Vec<String>,
    pending_storages: Vec<String>,
    paused: bool,
}

pub struct MemoryBackend {
    initiated: AtomicBool,
    next_id: AtomicI64,
    store: RwLock<StubStore>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend {
            initiated: AtomicBool::new(false),
            next_id: AtomicI64::new(FIRST_FREE_ID),
            store: RwLock::new(StubStore::default()),
        }
    }

    fn ready(&self) -> bool {
        self.initiated.load(AtomicOrdering::SeqCst)
    }

    fn take_id(&self) -> i64 {
        self.next_id.fetch_add(1, AtomicOrdering::SeqCst)
    }

    /// Store a media entity, assigning an id and auto-creating the artist,
    /// album and genre rows its tags name. Returns the stored copy.
    pub fn seed_media(&self, mut media: Media) -> Media {
        if media.id == 0 {
            media.id = self.take_id();
        }
        if media.insertion_date == 0 {
            media.insertion_date = chrono::Utc::now().timestamp();
        }
        let mut store = self.store.write();
        if media.kind == MediaKind::Audio {
            self.link_audio_tags(&mut store, &media);
        }
        store.media.push(media.clone());
        media
    }

    pub fn seed_artist(&self, mut item: Artist) -> Artist {
        if item.id == 0 {
            item.id = self.take_id();
        }
        self.store.write().artists.push(item.clone());
        item
    }

    pub fn seed_album(&self, mut item: Album) -> Album {
        if item.id == 0 {
            item.id = self.take_id();
        }
        self.store.write().albums.push(item.clone());
        item
    }

    pub fn seed_genre(&self, mut item: Genre) -> Genre {
        if item.id == 0 {
            item.id = self.take_id();
        }
        self.store.write().genres.push(item.clone());
        item
    }

    pub fn seed_folder(&self, mut item: Folder) -> Folder {
        if item.id == 0 {
            item.id = self.take_id();
        }
        self.store.write().folders.push(item.clone());
        item
    }

    pub fn seed_subscription(&self, mut item: Subscription) -> Subscription {
        if item.id == 0 {
            item.id = self.take_id();
        }
        let mut store = self.store.write();
        if !store.services.iter().any(|s| s.kind == item.service) {
            store.services.push(Service::new(item.service));
        }
        if let Some(service) = store.services.iter_mut().find(|s| s.kind == item.service) {
            service.nb_subscriptions += 1;
        }
        store.subscriptions.push(item.clone());
        item
    }

    fn link_audio_tags(&self, store: &mut StubStore, media: &Media) {
        if let Some(name) = media.reference_artist() {
            if !store.artists.iter().any(|a| a.name == name) {
                let id = self.take_id();
                store.artists.push(Artist::new(id, name));
            }
            if let Some(row) = store.artists.iter_mut().find(|a| a.name == name) {
                row.nb_tracks += 1;
                if media.present {
                    row.nb_present_tracks += 1;
                }
            }
        }
        if let Some(title) = media.album.as_deref().filter(|t| !t.is_empty()) {
            if !store.albums.iter().any(|a| a.title == title) {
                let id = self.take_id();
                let mut album = Album::new(id, title);
                album.album_artist = media.reference_artist().map(str::to_string);
                store.albums.push(album);
            }
            if let Some(row) = store.albums.iter_mut().find(|a| a.title == title) {
                row.nb_tracks += 1;
                if media.present {
                    row.nb_present_tracks += 1;
                }
                row.duration_ms += media.duration_ms.max(0);
            }
        }
        if let Some(name) = media.genre.as_deref().filter(|g| !g.is_empty()) {
            let exists = store
                .genres
                .iter()
                .any(|g| g.name.eq_ignore_ascii_case(name));
            if !exists {
                let id = self.take_id();
                store.genres.push(Genre::new(id, name));
            }
            if let Some(row) = store
                .genres
                .iter_mut()
                .find(|g| g.name.eq_ignore_ascii_case(name))
            {
                row.nb_tracks += 1;
                if media.present {
                    row.nb_present_tracks += 1;
                }
            }
        }
    }
}

fn matches_filter(media: &Media, filter: MediaFilter) -> bool {
    (filter.include_missing || media.present)
        && (!filter.only_favorites || media.flags.contains(StateFlags::FAVORITE))
}

fn title_matches(title: &str, query: &str) -> bool {
    title.to_lowercase().contains(&query.to_lowercase())
}

/// Compare by the sort key, falling back to title order so every key yields
/// a total, deterministic order.
fn compare_media(a: &Media, b: &Media, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Duration => a.duration_ms.cmp(&b.duration_ms),
        SortKey::InsertionDate => a.insertion_date.cmp(&b.insertion_date),
        SortKey::LastModificationDate => a.last_modified.cmp(&b.last_modified),
        SortKey::ReleaseDate => a.release_date.cmp(&b.release_date),
        SortKey::Filename => a.file_name().cmp(&b.file_name()),
        SortKey::Artist => a.artist.cmp(&b.artist),
        SortKey::Album => a.album.cmp(&b.album),
        SortKey::TrackNumber => a.track_number.cmp(&b.track_number),
        SortKey::PlayCount => a.seen.cmp(&b.seen),
        _ => Ordering::Equal,
    };
    primary.then_with(|| a.title().to_lowercase().cmp(&b.title().to_lowercase()))
}

fn sorted_media(mut items: Vec<Media>, sort: Sort) -> Vec<Media> {
    items.sort_by(|a, b| compare_media(a, b, sort.key));
    if sort.desc {
        items.reverse();
    }
    items
}

fn sorted_albums(mut items: Vec<Album>, sort: Sort) -> Vec<Album> {
    items.sort_by(|a, b| {
        let primary = match sort.key {
            SortKey::ReleaseDate => a.release_year.cmp(&b.release_year),
            SortKey::Duration => a.duration_ms.cmp(&b.duration_ms),
            SortKey::Artist => a.album_artist_name().cmp(&b.album_artist_name()),
            _ => Ordering::Equal,
        };
        primary.then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
    if sort.desc {
        items.reverse();
    }
    items
}

fn sorted_by_title<T: CatalogItem>(mut items: Vec<T>, sort: Sort) -> Vec<T> {
    items.sort_by_key(|i| i.title().to_lowercase());
    if sort.desc {
        items.reverse();
    }
    items
}

#[async_trait]
impl MediaStore for MemoryBackend {
    async fn videos(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items: Vec<Media> = self
            .store
            .read()
            .media
            .iter()
            .filter(|m| m.kind == MediaKind::Video && matches_filter(m, filter))
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_media(items, sort)))
    }

    async fn videos_count(&self, filter: MediaFilter) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        let count = self
            .store
            .read()
            .media
            .iter()
            .filter(|m| m.kind == MediaKind::Video && matches_filter(m, filter))
            .count();
        Ok(count as u32)
    }

    async fn audio(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items: Vec<Media> = self
            .store
            .read()
            .media
            .iter()
            .filter(|m| m.kind == MediaKind::Audio && matches_filter(m, filter))
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_media(items, sort)))
    }

    async fn audio_count(&self, filter: MediaFilter) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        let count = self
            .store
            .read()
            .media
            .iter()
            .filter(|m| m.kind == MediaKind::Audio && matches_filter(m, filter))
            .count();
        Ok(count as u32)
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
        Ok(self.store.read().media.iter().find(|m| m.id == id).cloned())
    }

    async fn media_by_location(&self, location: &str) -> Result<Option<Media>> {
        if !self.ready() {
            return Ok(None);
        }
        let location = core_model::media::normalize_location(location);
        Ok(self
            .store
            .read()
            .media
            .iter()
            .find(|m| m.location == location)
            .cloned())
    }

    async fn add_media(&self, location: &str) -> Result<Option<Media>> {
        if !self.ready() {
            return Ok(None);
        }
        if let Some(existing) = self.media_by_location(location).await? {
            return Ok(Some(existing));
        }
        let media = Media::from_location(location)?;
        Ok(Some(self.seed_media(media)))
    }

    async fn add_stream(&self, location: &str, title: &str) -> Result<Option<Media>> {
        if !self.ready() {
            return Ok(None);
        }
        if let Some(existing) = self.media_by_location(location).await? {
            return Ok(Some(existing));
        }
        let media = Media::stream(location, title)?;
        Ok(Some(self.seed_media(media)))
    }

    async fn remove_external_media(&self, id: i64) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        let before = store.media.len();
        store
            .media
            .retain(|m| !(m.id == id && matches!(m.kind, MediaKind::Stream | MediaKind::Unknown)));
        Ok(store.media.len() != before)
    }

    async fn search_media(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        let Some(query) = normalized_query(query) else {
            return Ok(Vec::new());
        };
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items: Vec<Media> = self
            .store
            .read()
            .media
            .iter()
            .filter(|m| title_matches(&m.title(), query))
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_media(items, sort)))
    }

    async fn search_media_count(&self, query: &str) -> Result<u32> {
        Ok(self.search_media(query, Sort::default(), Paging::all()).await?.len() as u32)
    }

    async fn search_videos(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        let mut items = self.search_media(query, sort, Paging::all()).await?;
        items.retain(|m| m.kind == MediaKind::Video);
        Ok(paging.apply(&items))
    }

    async fn search_videos_count(&self, query: &str) -> Result<u32> {
        Ok(self.search_videos(query, Sort::default(), Paging::all()).await?.len() as u32)
    }

    async fn search_audio(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        let mut items = self.search_media(query, sort, Paging::all()).await?;
        items.retain(|m| m.kind == MediaKind::Audio);
        Ok(paging.apply(&items))
    }

    async fn search_audio_count(&self, query: &str) -> Result<u32> {
        Ok(self.search_audio(query, Sort::default(), Paging::all()).await?.len() as u32)
    }

    async fn set_media_favorite(&self, id: i64, favorite: bool) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        match store.media.iter_mut().find(|m| m.id == id) {
            Some(media) => {
                media.flags.set(StateFlags::FAVORITE, favorite);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_play_position(&self, id: i64, position_ms: i64) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        match store.media.iter_mut().find(|m| m.id == id) {
            Some(media) => {
                media.position_ms = position_ms;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increase_play_count(&self, id: i64) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        match store.media.iter_mut().find(|m| m.id == id) {
            Some(media) => {
                media.seen += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn bookmarks(&self, media_id: i64) -> Result<Vec<Bookmark>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let mut items: Vec<Bookmark> = self
            .store
            .read()
            .bookmarks
            .iter()
            .filter(|b| b.media_id == media_id)
            .cloned()
            .collect();
        items.sort_by_key(|b| b.offset_ms);
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
        let mut store = self.store.write();
        if !store.media.iter().any(|m| m.id == media_id) {
            return Ok(None);
        }
        let bookmark = Bookmark::new(self.take_id(), media_id, name, offset_ms);
        store.bookmarks.push(bookmark.clone());
        Ok(Some(bookmark))
    }

    async fn remove_bookmark(&self, bookmark_id: i64) -> Result<bool> {
        if !self.ready() || bookmark_id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        let before = store.bookmarks.len();
        store.bookmarks.retain(|b| b.id != bookmark_id);
        Ok(store.bookmarks.len() != before)
    }

    async fn clear_bookmarks(&self, media_id: i64) -> Result<bool> {
        if !self.ready() || media_id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        let before = store.bookmarks.len();
        store.bookmarks.retain(|b| b.media_id != media_id);
        Ok(store.bookmarks.len() != before)
    }
}

#[async_trait]
impl AlbumStore for MemoryBackend {
    async fn albums(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Album>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items: Vec<Album> = self
            .store
            .read()
            .albums
            .iter()
            .filter(|a| {
                (filter.include_missing || a.nb_present_tracks > 0)
                    && (!filter.only_favorites || a.flags.contains(StateFlags::FAVORITE))
            })
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_albums(items, sort)))
    }

    async fn albums_count(&self, filter: MediaFilter) -> Result<u32> {
        Ok(self.albums(filter, Sort::default(), Paging::all()).await?.len() as u32)
    }

    async fn album(&self, id: i64) -> Result<Option<Album>> {
        if !self.ready() || id == 0 {
            return Ok(None);
        }
        Ok(self.store.read().albums.iter().find(|a| a.id == id).cloned())
    }

    async fn album_tracks(&self, album_id: i64, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let store = self.store.read();
        let Some(album) = store.albums.iter().find(|a| a.id == album_id) else {
            return Ok(Vec::new());
        };
        let items: Vec<Media> = store
            .media
            .iter()
            .filter(|m| m.album.as_deref() == Some(album.title.as_str()))
            .cloned()
            .collect();
        let sort = if sort.key == SortKey::Default {
            Sort::by(SortKey::TrackNumber)
        } else {
            sort
        };
        Ok(paging.apply(&sorted_media(items, sort)))
    }

    async fn search_albums(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Album>> {
        let Some(query) = normalized_query(query) else {
            return Ok(Vec::new());
        };
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items: Vec<Album> = self
            .store
            .read()
            .albums
            .iter()
            .filter(|a| title_matches(&a.title, query))
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_albums(items, sort)))
    }

    async fn search_albums_count(&self, query: &str) -> Result<u32> {
        Ok(self.search_albums(query, Sort::default(), Paging::all()).await?.len() as u32)
    }

    async fn set_album_favorite(&self, id: i64, favorite: bool) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        match store.albums.iter_mut().find(|a| a.id == id) {
            Some(album) => {
                album.flags.set(StateFlags::FAVORITE, favorite);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ArtistStore for MemoryBackend {
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
        let items: Vec<Artist> = self
            .store
            .read()
            .artists
            .iter()
            .filter(|a| {
                (all || a.nb_albums > 0)
                    && (filter.include_missing || a.nb_present_tracks > 0)
                    && (!filter.only_favorites || a.flags.contains(StateFlags::FAVORITE))
            })
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_by_title(items, sort)))
    }

    async fn artists_count(&self, all: bool, filter: MediaFilter) -> Result<u32> {
        Ok(self.artists(all, filter, Sort::default(), Paging::all()).await?.len() as u32)
    }

    async fn artist(&self, id: i64) -> Result<Option<Artist>> {
        if !self.ready() || id == 0 {
            return Ok(None);
        }
        Ok(self.store.read().artists.iter().find(|a| a.id == id).cloned())
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
        let store = self.store.read();
        let Some(row) = store.artists.iter().find(|a| a.id == artist_id) else {
            return Ok(Vec::new());
        };
        let items: Vec<Album> = store
            .albums
            .iter()
            .filter(|a| a.album_artist.as_deref() == Some(row.name.as_str()))
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_albums(items, sort)))
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
        let store = self.store.read();
        let Some(row) = store.artists.iter().find(|a| a.id == artist_id) else {
            return Ok(Vec::new());
        };
        let items: Vec<Media> = store
            .media
            .iter()
            .filter(|m| m.reference_artist() == Some(row.name.as_str()))
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_media(items, sort)))
    }

    async fn search_artists(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Artist>> {
        let Some(query) = normalized_query(query) else {
            return Ok(Vec::new());
        };
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items: Vec<Artist> = self
            .store
            .read()
            .artists
            .iter()
            .filter(|a| title_matches(&a.title(), query))
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_by_title(items, sort)))
    }

    async fn search_artists_count(&self, query: &str) -> Result<u32> {
        Ok(self.search_artists(query, Sort::default(), Paging::all()).await?.len() as u32)
    }

    async fn set_artist_favorite(&self, id: i64, favorite: bool) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        match store.artists.iter_mut().find(|a| a.id == id) {
            Some(row) => {
                row.flags.set(StateFlags::FAVORITE, favorite);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl GenreStore for MemoryBackend {
    async fn genres(&self, filter: MediaFilter, sort: Sort, paging: Paging) -> Result<Vec<Genre>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items: Vec<Genre> = self
            .store
            .read()
            .genres
            .iter()
            .filter(|g| {
                (filter.include_missing || g.nb_present_tracks > 0)
                    && (!filter.only_favorites || g.flags.contains(StateFlags::FAVORITE))
            })
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_by_title(items, sort)))
    }

    async fn genres_count(&self, filter: MediaFilter) -> Result<u32> {
        Ok(self.genres(filter, Sort::default(), Paging::all()).await?.len() as u32)
    }

    async fn genre(&self, id: i64) -> Result<Option<Genre>> {
        if !self.ready() || id == 0 {
            return Ok(None);
        }
        Ok(self.store.read().genres.iter().find(|g| g.id == id).cloned())
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
        let store = self.store.read();
        let Some(genre) = store.genres.iter().find(|g| g.id == genre_id) else {
            return Ok(Vec::new());
        };
        let items: Vec<Media> = store
            .media
            .iter()
            .filter(|m| {
                m.genre
                    .as_deref()
                    .map_or(false, |g| g.eq_ignore_ascii_case(&genre.name))
                    && matches_filter(m, filter)
            })
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_media(items, sort)))
    }

    async fn genre_albums(&self, genre_id: i64, sort: Sort, paging: Paging) -> Result<Vec<Album>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let tracks = self
            .genre_tracks(genre_id, MediaFilter::default(), Sort::default(), Paging::all())
            .await?;
        let store = self.store.read();
        let mut items: Vec<Album> = store
            .albums
            .iter()
            .filter(|a| {
                tracks
                    .iter()
                    .any(|m| m.album.as_deref() == Some(a.title.as_str()))
            })
            .cloned()
            .collect();
        items = sorted_albums(items, sort);
        Ok(paging.apply(&items))
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
        let tracks = self
            .genre_tracks(genre_id, MediaFilter::default(), Sort::default(), Paging::all())
            .await?;
        let store = self.store.read();
        let items: Vec<Artist> = store
            .artists
            .iter()
            .filter(|a| {
                tracks
                    .iter()
                    .any(|m| m.reference_artist() == Some(a.name.as_str()))
            })
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_by_title(items, sort)))
    }

    async fn search_genres(&self, query: &str, sort: Sort, paging: Paging) -> Result<Vec<Genre>> {
        let Some(query) = normalized_query(query) else {
            return Ok(Vec::new());
        };
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items: Vec<Genre> = self
            .store
            .read()
            .genres
            .iter()
            .filter(|g| title_matches(&g.name, query))
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_by_title(items, sort)))
    }

    async fn search_genres_count(&self, query: &str) -> Result<u32> {
        Ok(self.search_genres(query, Sort::default(), Paging::all()).await?.len() as u32)
    }

    async fn set_genre_favorite(&self, id: i64, favorite: bool) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        match store.genres.iter_mut().find(|g| g.id == id) {
            Some(genre) => {
                genre.flags.set(StateFlags::FAVORITE, favorite);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl MemoryBackend {
    /// Recompute a playlist's per-kind counters from its members.
    fn refresh_playlist_counters(store: &mut StubStore, playlist_id: i64) {
        let members = store
            .playlist_members
            .get(&playlist_id)
            .cloned()
            .unwrap_or_default();
        let Some(playlist) = store.playlists.iter_mut().find(|p| p.id == playlist_id) else {
            return;
        };
        playlist.nb_video = 0;
        playlist.nb_audio = 0;
        playlist.nb_unknown = 0;
        playlist.nb_duration_unknown = 0;
        playlist.duration_ms = 0;
        for id in members {
            let Some(media) = store.media.iter().find(|m| m.id == id) else {
                continue;
            };
            match media.kind {
                MediaKind::Video => playlist.nb_video += 1,
                MediaKind::Audio => playlist.nb_audio += 1,
                _ => playlist.nb_unknown += 1,
            }
            if media.duration_ms <= 0 {
                playlist.nb_duration_unknown += 1;
            } else {
                playlist.duration_ms += media.duration_ms;
            }
        }
    }
}

#[async_trait]
impl PlaylistStore for MemoryBackend {
    async fn playlists(
        &self,
        filter: MediaFilter,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Playlist>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items: Vec<Playlist> = self
            .store
            .read()
            .playlists
            .iter()
            .filter(|p| !filter.only_favorites || p.flags.contains(StateFlags::FAVORITE))
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_by_title(items, sort)))
    }

    async fn playlists_count(&self, filter: MediaFilter) -> Result<u32> {
        Ok(self.playlists(filter, Sort::default(), Paging::all()).await?.len() as u32)
    }

    async fn playlist(&self, id: i64) -> Result<Option<Playlist>> {
        if !self.ready() || id == 0 {
            return Ok(None);
        }
        Ok(self.store.read().playlists.iter().find(|p| p.id == id).cloned())
    }

    async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        if name.trim().is_empty() {
            return Err(CatalogError::InvalidInput {
                field: "name".to_string(),
                message: "playlist name cannot be empty".to_string(),
            });
        }
        let playlist = Playlist::new(self.take_id(), name.trim());
        let mut store = self.store.write();
        store.playlist_members.insert(playlist.id, Vec::new());
        store.playlists.push(playlist.clone());
        Ok(playlist)
    }

    async fn playlist_tracks(&self, playlist_id: i64, paging: Paging) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let store = self.store.read();
        let Some(members) = store.playlist_members.get(&playlist_id) else {
            return Ok(Vec::new());
        };
        let items: Vec<Media> = members
            .iter()
            .filter_map(|id| store.media.iter().find(|m| m.id == *id).cloned())
            .collect();
        Ok(paging.apply(&items))
    }

    async fn playlist_tracks_count(&self, playlist_id: i64) -> Result<u32> {
        Ok(self.playlist_tracks(playlist_id, Paging::all()).await?.len() as u32)
    }

    async fn playlist_append(&self, playlist_id: i64, media_ids: &[i64]) -> Result<bool> {
        if !self.ready() || playlist_id == 0 || media_ids.is_empty() {
            return Ok(false);
        }
        let mut store = self.store.write();
        if !media_ids.iter().all(|id| store.media.iter().any(|m| m.id == *id)) {
            return Ok(false);
        }
        let Some(members) = store.playlist_members.get_mut(&playlist_id) else {
            return Ok(false);
        };
        members.extend_from_slice(media_ids);
        Self::refresh_playlist_counters(&mut store, playlist_id);
        Ok(true)
    }

    async fn playlist_insert(
        &self,
        playlist_id: i64,
        media_id: i64,
        position: u32,
    ) -> Result<bool> {
        if !self.ready() || playlist_id == 0 || media_id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        if !store.media.iter().any(|m| m.id == media_id) {
            return Ok(false);
        }
        let Some(members) = store.playlist_members.get_mut(&playlist_id) else {
            return Ok(false);
        };
        let position = (position as usize).min(members.len());
        members.insert(position, media_id);
        Self::refresh_playlist_counters(&mut store, playlist_id);
        Ok(true)
    }

    async fn playlist_move(&self, playlist_id: i64, from: u32, to: u32) -> Result<bool> {
        if !self.ready() || playlist_id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        let Some(members) = store.playlist_members.get_mut(&playlist_id) else {
            return Ok(false);
        };
        let (from, to) = (from as usize, to as usize);
        if from >= members.len() || to >= members.len() {
            return Ok(false);
        }
        let id = members.remove(from);
        members.insert(to, id);
        Ok(true)
    }

    async fn playlist_remove_at(&self, playlist_id: i64, position: u32) -> Result<bool> {
        if !self.ready() || playlist_id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        let Some(members) = store.playlist_members.get_mut(&playlist_id) else {
            return Ok(false);
        };
        let position = position as usize;
        if position >= members.len() {
            return Ok(false);
        }
        members.remove(position);
        Self::refresh_playlist_counters(&mut store, playlist_id);
        Ok(true)
    }

    async fn delete_playlist(&self, playlist_id: i64) -> Result<bool> {
        if !self.ready() || playlist_id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        let before = store.playlists.len();
        store.playlists.retain(|p| p.id != playlist_id);
        store.playlist_members.remove(&playlist_id);
        Ok(store.playlists.len() != before)
    }

    async fn rename_playlist(&self, playlist_id: i64, name: &str) -> Result<bool> {
        if !self.ready() || playlist_id == 0 || name.trim().is_empty() {
            return Ok(false);
        }
        let mut store = self.store.write();
        match store.playlists.iter_mut().find(|p| p.id == playlist_id) {
            Some(playlist) => {
                playlist.title = name.trim().to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search_playlists(
        &self,
        query: &str,
        sort: Sort,
        paging: Paging,
    ) -> Result<Vec<Playlist>> {
        let Some(query) = normalized_query(query) else {
            return Ok(Vec::new());
        };
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items: Vec<Playlist> = self
            .store
            .read()
            .playlists
            .iter()
            .filter(|p| title_matches(&p.title, query))
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_by_title(items, sort)))
    }

    async fn search_playlists_count(&self, query: &str) -> Result<u32> {
        Ok(self.search_playlists(query, Sort::default(), Paging::all()).await?.len() as u32)
    }

    async fn set_playlist_favorite(&self, id: i64, favorite: bool) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        match store.playlists.iter_mut().find(|p| p.id == id) {
            Some(playlist) => {
                playlist.flags.set(StateFlags::FAVORITE, favorite);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl FolderStore for MemoryBackend {
    async fn folders(&self, kind: MediaKind, sort: Sort, paging: Paging) -> Result<Vec<Folder>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items: Vec<Folder> = self
            .store
            .read()
            .folders
            .iter()
            .filter(|f| match kind {
                MediaKind::Video => f.nb_video > 0,
                MediaKind::Audio => f.nb_audio > 0,
                _ => f.media_count() > 0,
            })
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_by_title(items, sort)))
    }

    async fn folders_count(&self, kind: MediaKind) -> Result<u32> {
        Ok(self.folders(kind, Sort::default(), Paging::all()).await?.len() as u32)
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
        let store = self.store.read();
        let Some(folder) = store.folders.iter().find(|f| f.id == folder_id) else {
            return Ok(Vec::new());
        };
        let prefix = folder.mrl.trim_end_matches('/').to_string() + "/";
        let items: Vec<Media> = store
            .media
            .iter()
            .filter(|m| {
                m.location.starts_with(&prefix)
                    && !m.location[prefix.len()..].contains('/')
                    && (kind == MediaKind::Unknown || m.kind == kind)
            })
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_media(items, sort)))
    }

    async fn folder_media_count(&self, folder_id: i64, kind: MediaKind) -> Result<u32> {
        Ok(self
            .folder_media(folder_id, kind, Sort::default(), Paging::all())
            .await?
            .len() as u32)
    }

    async fn set_folder_favorite(&self, _id: i64, _favorite: bool) -> Result<bool> {
        Ok(false)
    }
}

#[async_trait]
impl VideoGroupStore for MemoryBackend {
    async fn video_groups(&self, sort: Sort, paging: Paging) -> Result<Vec<VideoGroup>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let items = self.store.read().video_groups.clone();
        Ok(paging.apply(&sorted_by_title(items, sort)))
    }

    async fn video_groups_count(&self) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        Ok(self.store.read().video_groups.len() as u32)
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
        let store = self.store.read();
        let Some(members) = store.group_members.get(&group_id) else {
            return Ok(Vec::new());
        };
        let items: Vec<Media> = members
            .iter()
            .filter_map(|id| store.media.iter().find(|m| m.id == *id).cloned())
            .collect();
        Ok(paging.apply(&sorted_media(items, sort)))
    }

    async fn create_video_group(&self, name: &str) -> Result<Option<VideoGroup>> {
        if !self.ready() || name.trim().is_empty() {
            return Ok(None);
        }
        let group = VideoGroup::new(self.take_id(), name.trim());
        let mut store = self.store.write();
        store.group_members.insert(group.id, Vec::new());
        store.video_groups.push(group.clone());
        Ok(Some(group))
    }

    async fn rename_video_group(&self, group_id: i64, name: &str) -> Result<bool> {
        if !self.ready() || group_id == 0 || name.trim().is_empty() {
            return Ok(false);
        }
        let mut store = self.store.write();
        match store.video_groups.iter_mut().find(|g| g.id == group_id) {
            Some(group) => {
                group.name = name.trim().to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn video_group_add_media(&self, group_id: i64, media_id: i64) -> Result<bool> {
        if !self.ready() || group_id == 0 || media_id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        let media = match store.media.iter().find(|m| m.id == media_id) {
            Some(m) => (m.present, m.location.starts_with("file://")),
            None => return Ok(false),
        };
        let Some(members) = store.group_members.get_mut(&group_id) else {
            return Ok(false);
        };
        if members.contains(&media_id) {
            return Ok(false);
        }
        members.push(media_id);
        let first_member = members.len() == 1;
        if let Some(group) = store.video_groups.iter_mut().find(|g| g.id == group_id) {
            group.nb_media += 1;
            if media.0 {
                group.nb_present_media += 1;
            }
            // A group stays network only while every member is; a local join
            // clears the flag for good.
            group.is_network = !media.1 && (first_member || group.is_network);
        }
        Ok(true)
    }

    async fn video_group_remove_media(&self, group_id: i64, media_id: i64) -> Result<bool> {
        if !self.ready() || group_id == 0 || media_id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        let Some(members) = store.group_members.get_mut(&group_id) else {
            return Ok(false);
        };
        let before = members.len();
        members.retain(|id| *id != media_id);
        let removed = members.len() != before;
        if removed {
            if let Some(group) = store.video_groups.iter_mut().find(|g| g.id == group_id) {
                group.nb_media = group.nb_media.saturating_sub(1);
            }
        }
        Ok(removed)
    }

    async fn destroy_video_group(&self, group_id: i64) -> Result<bool> {
        if !self.ready() || group_id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        let before = store.video_groups.len();
        store.video_groups.retain(|g| g.id != group_id);
        store.group_members.remove(&group_id);
        Ok(store.video_groups.len() != before)
    }
}

#[async_trait]
impl SubscriptionStore for MemoryBackend {
    async fn services(&self) -> Result<Vec<Service>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        Ok(self.store.read().services.clone())
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
        let items: Vec<Subscription> = self
            .store
            .read()
            .subscriptions
            .iter()
            .filter(|s| s.service == service && s.is_root())
            .cloned()
            .collect();
        Ok(paging.apply(&sorted_by_title(items, sort)))
    }

    async fn subscription(&self, id: i64) -> Result<Option<Subscription>> {
        if !self.ready() || id == 0 {
            return Ok(None);
        }
        Ok(self
            .store
            .read()
            .subscriptions
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn subscription_children(&self, id: i64) -> Result<Vec<Subscription>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        Ok(self
            .store
            .read()
            .subscriptions
            .iter()
            .filter(|s| s.parent_id == id)
            .cloned()
            .collect())
    }

    async fn subscription_media(&self, id: i64, sort: Sort, paging: Paging) -> Result<Vec<Media>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let store = self.store.read();
        let Some(members) = store.subscription_members.get(&id) else {
            return Ok(Vec::new());
        };
        let items: Vec<Media> = members
            .iter()
            .filter_map(|m| store.media.iter().find(|media| media.id == *m).cloned())
            .collect();
        Ok(paging.apply(&sorted_media(items, sort)))
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
        let mut store = self.store.write();
        match store.subscriptions.iter_mut().find(|s| s.id == id) {
            Some(subscription) => {
                subscription.max_cached_size = size;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn service_max_cached_size(&self, service: ServiceKind) -> Result<i64> {
        if !self.ready() {
            return Ok(-1);
        }
        Ok(self
            .store
            .read()
            .services
            .iter()
            .find(|s| s.kind == service)
            .map_or(-1, |s| s.max_cached_size))
    }

    async fn set_service_max_cached_size(&self, service: ServiceKind, size: i64) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let mut store = self.store.write();
        if !store.services.iter().any(|s| s.kind == service) {
            store.services.push(Service::new(service));
        }
        if let Some(row) = store.services.iter_mut().find(|s| s.kind == service) {
            row.max_cached_size = size;
        }
        Ok(true)
    }

    async fn service_unplayed_count(&self, service: ServiceKind) -> Result<u32> {
        if !self.ready() {
            return Ok(0);
        }
        Ok(self
            .store
            .read()
            .subscriptions
            .iter()
            .filter(|s| s.service == service)
            .map(|s| s.nb_unplayed_media)
            .sum())
    }

    async fn refresh_subscription(&self, id: i64) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        if !store.subscriptions.iter().any(|s| s.id == id) {
            return Ok(false);
        }
        if !store.refresh_queue.contains(&id) {
            store.refresh_queue.push(id);
        }
        Ok(true)
    }

    async fn remove_subscription(&self, id: i64) -> Result<bool> {
        if !self.ready() || id == 0 {
            return Ok(false);
        }
        let mut store = self.store.write();
        let service = match store.subscriptions.iter().find(|s| s.id == id) {
            Some(s) => s.service,
            None => return Ok(false),
        };
        store.subscriptions.retain(|s| s.id != id && s.parent_id != id);
        store.subscription_members.remove(&id);
        store.refresh_queue.retain(|queued| *queued != id);
        if let Some(row) = store.services.iter_mut().find(|s| s.kind == service) {
            row.nb_subscriptions = row.nb_subscriptions.saturating_sub(1);
        }
        Ok(true)
    }
}

#[async_trait]
impl HistoryStore for MemoryBackend {
    async fn history(&self, kind: HistoryKind, paging: Paging) -> Result<Vec<HistoryEntry>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        let store = self.store.read();
        let entries = match kind {
            HistoryKind::Local => &store.history_local,
            HistoryKind::Network => &store.history_network,
        };
        let mut items = entries.clone();
        items.sort_by(|a, b| b.insertion_date.cmp(&a.insertion_date));
        Ok(paging.apply(&items))
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
        let entry = HistoryEntry::new(location, title, chrono::Utc::now().timestamp());
        let mut store = self.store.write();
        let entries = match kind {
            HistoryKind::Local => &mut store.history_local,
            HistoryKind::Network => &mut store.history_network,
        };
        // Replaying a location supersedes its previous entry.
        entries.retain(|e| e.location != entry.location);
        entries.push(entry);
        Ok(true)
    }

    async fn clear_history(&self, kind: HistoryKind) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let mut store = self.store.write();
        match kind {
            HistoryKind::Local => store.history_local.clear(),
            HistoryKind::Network => store.history_network.clear(),
        }
        Ok(true)
    }
}

#[async_trait]
impl ControlStore for MemoryBackend {
    async fn init(&self) -> Result<bool> {
        if self.initiated.swap(true, AtomicOrdering::SeqCst) {
            return Ok(false);
        }
        let mut store = self.store.write();
        store.artists.push(Artist::new(
            artist::UNKNOWN_ARTIST_ID,
            artist::UNKNOWN_ARTIST_NAME,
        ));
        store.artists.push(Artist::new(
            artist::VARIOUS_ARTISTS_ID,
            artist::VARIOUS_ARTISTS_NAME,
        ));
        debug!("memory backend initialized");
        Ok(true)
    }

    async fn is_initiated(&self) -> bool {
        self.ready()
    }

    async fn devices(&self) -> Result<Vec<Storage>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        Ok(self.store.read().devices.clone())
    }

    async fn add_device(&self, device: Storage) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let mut store = self.store.write();
        if store.devices.iter().any(|d| d.name == device.name) {
            return Ok(false);
        }
        store.pending_storages.push(device.mrl.clone());
        store.devices.push(device);
        Ok(true)
    }

    async fn remove_device(&self, name: &str) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let mut store = self.store.write();
        let before = store.devices.len();
        store.devices.retain(|d| d.name != name);
        Ok(store.devices.len() != before)
    }

    async fn entry_points(&self) -> Result<Vec<String>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        Ok(self.store.read().entry_points.clone())
    }

    async fn add_entry_point(&self, mrl: &str) -> Result<bool> {
        if !self.ready() || mrl.trim().is_empty() {
            return Ok(false);
        }
        let mut store = self.store.write();
        if store.entry_points.iter().any(|e| e == mrl) {
            return Ok(false);
        }
        store.entry_points.push(mrl.to_string());
        Ok(true)
    }

    async fn remove_entry_point(&self, mrl: &str) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let mut store = self.store.write();
        let before = store.entry_points.len();
        store.entry_points.retain(|e| e != mrl);
        Ok(store.entry_points.len() != before)
    }

    async fn ban_folder(&self, mrl: &str) -> Result<bool> {
        if !self.ready() || mrl.trim().is_empty() {
            return Ok(false);
        }
        let mut store = self.store.write();
        if store.banned.iter().any(|b| b == mrl) {
            return Ok(false);
        }
        store.banned.push(mrl.to_string());
        Ok(true)
    }

    async fn unban_folder(&self, mrl: &str) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let mut store = self.store.write();
        let before = store.banned.len();
        store.banned.retain(|b| b != mrl);
        Ok(store.banned.len() != before)
    }

    async fn banned_folders(&self) -> Result<Vec<String>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        Ok(self.store.read().banned.clone())
    }

    async fn discover(&self, mrl: &str) -> Result<bool> {
        self.add_entry_point(mrl).await
    }

    async fn reload_all(&self) -> Result<bool> {
        Ok(self.ready())
    }

    async fn reload(&self, entry_point: &str) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        Ok(self.store.read().entry_points.iter().any(|e| e == entry_point))
    }

    async fn pause_background_operations(&self) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        self.store.write().paused = true;
        Ok(true)
    }

    async fn resume_background_operations(&self) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        self.store.write().paused = false;
        Ok(true)
    }

    async fn force_rescan(&self) -> Result<bool> {
        Ok(self.ready())
    }

    async fn force_parser_retry(&self) -> Result<bool> {
        Ok(self.ready())
    }

    async fn clear_database(&self, restore_playlists: bool) -> Result<bool> {
        if !self.ready() {
            return Ok(false);
        }
        let mut store = self.store.write();
        store.media.clear();
        store.albums.clear();
        store.artists.clear();
        store.genres.clear();
        store.folders.clear();
        store.video_groups.clear();
        store.group_members.clear();
        store.subscriptions.clear();
        store.subscription_members.clear();
        store.refresh_queue.clear();
        store.bookmarks.clear();
        store.history_local.clear();
        store.history_network.clear();
        if !restore_playlists {
            store.playlists.clear();
            store.playlist_members.clear();
        } else {
            for members in store.playlist_members.values_mut() {
                members.clear();
            }
            let ids: Vec<i64> = store.playlists.iter().map(|p| p.id).collect();
            for id in ids {
                Self::refresh_playlist_counters(&mut store, id);
            }
        }
        store.artists.push(Artist::new(
            artist::UNKNOWN_ARTIST_ID,
            artist::UNKNOWN_ARTIST_NAME,
        ));
        store.artists.push(Artist::new(
            artist::VARIOUS_ARTISTS_ID,
            artist::VARIOUS_ARTISTS_NAME,
        ));
        Ok(true)
    }

    async fn search(&self, query: &str) -> Result<SearchAggregate> {
        let mut results = SearchAggregate::default();
        if normalized_query(query).is_none() || !self.ready() {
            return Ok(results);
        }
        results.tracks = self.search_audio(query, Sort::default(), Paging::all()).await?;
        results.videos = self.search_videos(query, Sort::default(), Paging::all()).await?;
        results.albums = self.search_albums(query, Sort::default(), Paging::all()).await?;
        results.artists = self.search_artists(query, Sort::default(), Paging::all()).await?;
        results.genres = self.search_genres(query, Sort::default(), Paging::all()).await?;
        results.playlists = self
            .search_playlists(query, Sort::default(), Paging::all())
            .await?;
        Ok(results)
    }

    async fn pending_storages(&self) -> Result<Vec<String>> {
        if !self.ready() {
            return Ok(Vec::new());
        }
        Ok(self.store.read().pending_storages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(location: &str, artist: &str, album: &str, duration_ms: i64) -> Media {
        let mut media = Media::from_location(location).unwrap();
        media.kind = MediaKind::Audio;
        media.artist = Some(artist.to_string());
        media.album = Some(album.to_string());
        media.duration_ms = duration_ms;
        media
    }

    #[tokio::test]
    async fn reads_are_empty_before_init() {
        let backend = MemoryBackend::new();
        assert!(backend.videos(MediaFilter::default(), Sort::default(), Paging::all())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(backend.audio_count(MediaFilter::default()).await.unwrap(), 0);
        assert!(!backend.set_media_favorite(5, true).await.unwrap());
    }

    #[tokio::test]
    async fn init_seeds_the_reserved_artists() {
        let backend = MemoryBackend::new();
        assert!(backend.init().await.unwrap());
        assert!(!backend.init().await.unwrap());

        let unknown = backend.artist(artist::UNKNOWN_ARTIST_ID).await.unwrap().unwrap();
        assert_eq!(unknown.title(), "Unknown Artist");
        let various = backend.artist(artist::VARIOUS_ARTISTS_ID).await.unwrap().unwrap();
        assert_eq!(various.title(), "Various Artists");
    }

    #[tokio::test]
    async fn seeding_audio_creates_artist_album_genre() {
        let backend = MemoryBackend::new();
        backend.init().await.unwrap();

        let mut media = audio("/music/one.mp3", "The Artist", "The Album", 180_000);
        media.genre = Some("Jazz".to_string());
        let stored = backend.seed_media(media);
        assert!(stored.id >= FIRST_FREE_ID);

        let artists = backend
            .artists(true, MediaFilter::default(), Sort::default(), Paging::all())
            .await
            .unwrap();
        assert!(artists.iter().any(|a| a.name == "The Artist"));

        let albums = backend
            .albums(MediaFilter::default(), Sort::default(), Paging::all())
            .await
            .unwrap();
        let album = albums.iter().find(|a| a.title == "The Album").unwrap();
        assert_eq!(album.nb_tracks, 1);
        assert_eq!(album.duration_ms, 180_000);

        let genres = backend
            .genres(MediaFilter::default(), Sort::default(), Paging::all())
            .await
            .unwrap();
        assert!(genres.iter().any(|g| g.name == "Jazz"));
    }

    #[tokio::test]
    async fn playlist_member_order_survives_edits() {
        let backend = MemoryBackend::new();
        backend.init().await.unwrap();
        let a = backend.seed_media(audio("/m/a.mp3", "X", "AlbumX", 1000));
        let b = backend.seed_media(audio("/m/b.mp3", "X", "AlbumX", 1000));
        let c = backend.seed_media(audio("/m/c.mp3", "X", "AlbumX", 1000));

        let playlist = backend.create_playlist("Mix").await.unwrap();
        assert!(backend.playlist_append(playlist.id, &[a.id, b.id, c.id]).await.unwrap());

        assert!(backend.playlist_move(playlist.id, 0, 2).await.unwrap());
        let tracks = backend.playlist_tracks(playlist.id, Paging::all()).await.unwrap();
        let ids: Vec<i64> = tracks.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![b.id, c.id, a.id]);

        assert!(backend.playlist_remove_at(playlist.id, 1).await.unwrap());
        let tracks = backend.playlist_tracks(playlist.id, Paging::all()).await.unwrap();
        let ids: Vec<i64> = tracks.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn create_playlist_rejects_empty_name() {
        let backend = MemoryBackend::new();
        backend.init().await.unwrap();
        assert!(matches!(
            backend.create_playlist("  ").await,
            Err(CatalogError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn delete_twice_reports_false_the_second_time() {
        let backend = MemoryBackend::new();
        backend.init().await.unwrap();
        let playlist = backend.create_playlist("Gone").await.unwrap();
        assert!(backend.delete_playlist(playlist.id).await.unwrap());
        assert!(!backend.delete_playlist(playlist.id).await.unwrap());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_empty_query_is_empty() {
        let backend = MemoryBackend::new();
        backend.init().await.unwrap();
        backend.seed_media(audio("/m/blue train.flac", "John Coltrane", "Blue Train", 1_000));

        let hits = backend
            .search_media("BLUE", Sort::default(), Paging::all())
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        assert!(backend.search_media("   ", Sort::default(), Paging::all()).await.unwrap().is_empty());
        assert_eq!(backend.search_media_count("").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn paged_windows_concatenate_to_the_full_list() {
        let backend = MemoryBackend::new();
        backend.init().await.unwrap();
        for i in 0..7 {
            let mut media = Media::from_location(&format!("/v/clip{i}.mkv")).unwrap();
            media.duration_ms = i * 1000;
            backend.seed_media(media);
        }
        let full = backend
            .videos(MediaFilter::default(), Sort::by(SortKey::Duration), Paging::all())
            .await
            .unwrap();
        let mut paged = Vec::new();
        for offset in (0..7).step_by(3) {
            paged.extend(
                backend
                    .videos(
                        MediaFilter::default(),
                        Sort::by(SortKey::Duration),
                        Paging::new(3, offset),
                    )
                    .await
                    .unwrap(),
            );
        }
        assert_eq!(paged.len(), full.len());
        assert_eq!(paged, full);
    }

    #[tokio::test]
    async fn history_replaces_replayed_locations() {
        let backend = MemoryBackend::new();
        backend.init().await.unwrap();
        assert!(backend
            .add_to_history("file:///a.mkv", "A", HistoryKind::Local)
            .await
            .unwrap());
        assert!(backend
            .add_to_history("http://host/live", "Live", HistoryKind::Network)
            .await
            .unwrap());
        assert!(backend
            .add_to_history("file:///a.mkv", "A again", HistoryKind::Local)
            .await
            .unwrap());

        let local = backend.history(HistoryKind::Local, Paging::all()).await.unwrap();
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].title, "A again");

        assert!(backend.clear_history(HistoryKind::Local).await.unwrap());
        assert!(backend.history(HistoryKind::Local, Paging::all()).await.unwrap().is_empty());
        assert_eq!(backend.history(HistoryKind::Network, Paging::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_database_can_keep_playlists() {
        let backend = MemoryBackend::new();
        backend.init().await.unwrap();
        let media = backend.seed_media(audio("/m/x.mp3", "A", "B", 1000));
        let playlist = backend.create_playlist("Keep").await.unwrap();
        backend.playlist_append(playlist.id, &[media.id]).await.unwrap();

        assert!(backend.clear_database(true).await.unwrap());
        assert_eq!(backend.audio_count(MediaFilter::default()).await.unwrap(), 0);
        let kept = backend.playlist(playlist.id).await.unwrap().unwrap();
        assert_eq!(kept.tracks_count(), 0);

        // Reserved artist rows come back after a wipe.
        assert!(backend.artist(artist::UNKNOWN_ARTIST_ID).await.unwrap().is_some());
    }
}
