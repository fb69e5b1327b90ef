//! Behavioral contract shared by the two backends: every property here
//! must hold identically for the in-memory stub and the SQLite catalog.

use core_catalog::backend::{
    AlbumStore, ArtistStore, CatalogBackend, ControlStore, FolderStore, MediaStore,
    PlaylistStore, VideoGroupStore,
};
use core_catalog::{MemoryBackend, SqliteBackend};
use core_model::{
    artist, CatalogItem, Media, MediaFilter, MediaKind, Paging, Sort, SortKey, StateFlags,
    VideoGroup,
};
use std::sync::Arc;

enum Backend {
    Memory(Arc<MemoryBackend>),
    Sqlite(Arc<SqliteBackend>),
}

impl Backend {
    fn store(&self) -> Arc<dyn CatalogBackend> {
        match self {
            Backend::Memory(b) => b.clone(),
            Backend::Sqlite(b) => b.clone(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Backend::Memory(_) => "memory",
            Backend::Sqlite(_) => "sqlite",
        }
    }

    async fn seed(&self, media: Media) -> Media {
        match self {
            Backend::Memory(b) => b.seed_media(media),
            Backend::Sqlite(b) => b.insert_media(&media).await.unwrap(),
        }
    }
}

async fn backends() -> Vec<Backend> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let memory = Arc::new(MemoryBackend::new());
    memory.init().await.unwrap();
    let sqlite = Arc::new(SqliteBackend::in_memory().await.unwrap());
    sqlite.init().await.unwrap();
    vec![Backend::Memory(memory), Backend::Sqlite(sqlite)]
}

fn video(location: &str, duration_ms: i64) -> Media {
    let mut media = Media::from_location(location).unwrap();
    assert_eq!(media.kind, MediaKind::Video);
    media.duration_ms = duration_ms;
    media
}

fn audio(location: &str, artist: &str, album: &str) -> Media {
    let mut media = Media::from_location(location).unwrap();
    media.kind = MediaKind::Audio;
    media.artist = Some(artist.to_string());
    media.album = Some(album.to_string());
    media.duration_ms = 240_000;
    media
}

#[tokio::test]
async fn reserved_artists_exist_with_canonical_names() {
    for backend in backends().await {
        let store = backend.store();
        let unknown = store.artist(artist::UNKNOWN_ARTIST_ID).await.unwrap();
        assert_eq!(
            unknown.map(|a| a.title()).as_deref(),
            Some("Unknown Artist"),
            "{}",
            backend.name()
        );
        let various = store.artist(artist::VARIOUS_ARTISTS_ID).await.unwrap();
        assert_eq!(
            various.map(|a| a.title()).as_deref(),
            Some("Various Artists"),
            "{}",
            backend.name()
        );
    }
}

#[tokio::test]
async fn seeded_audio_links_album_and_tracks_back() {
    for backend in backends().await {
        let store = backend.store();
        backend.seed(audio("/music/one.flac", "Mingus", "Ah Um")).await;
        backend.seed(audio("/music/two.flac", "Mingus", "Ah Um")).await;

        let albums = store
            .albums(MediaFilter::default(), Sort::default(), Paging::all())
            .await
            .unwrap();
        let album = albums
            .iter()
            .find(|a| a.title == "Ah Um")
            .unwrap_or_else(|| panic!("album missing on {}", backend.name()));
        assert_eq!(album.nb_tracks, 2, "{}", backend.name());

        let tracks = store
            .album_tracks(album.id, Sort::default(), Paging::all())
            .await
            .unwrap();
        assert_eq!(tracks.len(), 2, "{}", backend.name());

        let artists = store
            .artists(true, MediaFilter::default(), Sort::default(), Paging::all())
            .await
            .unwrap();
        assert!(
            artists.iter().any(|a| a.name == "Mingus"),
            "{}",
            backend.name()
        );
    }
}

#[tokio::test]
async fn paged_windows_concatenate_to_the_unpaged_list() {
    for backend in backends().await {
        let store = backend.store();
        for i in 0..10 {
            backend.seed(video(&format!("/videos/clip{i:02}.mkv"), i * 500)).await;
        }
        let sort = Sort::by(SortKey::Duration);
        let full = store
            .videos(MediaFilter::default(), sort, Paging::all())
            .await
            .unwrap();
        assert_eq!(full.len(), 10, "{}", backend.name());

        let mut paged = Vec::new();
        for offset in (0..10).step_by(4) {
            paged.extend(
                store
                    .videos(MediaFilter::default(), sort, Paging::new(4, offset))
                    .await
                    .unwrap(),
            );
        }
        assert_eq!(paged, full, "{}", backend.name());

        // A window past the end is empty, never an error.
        assert!(store
            .videos(MediaFilter::default(), sort, Paging::new(4, 100))
            .await
            .unwrap()
            .is_empty());
    }
}

#[tokio::test]
async fn unsupported_sort_key_falls_back_to_title_order() {
    for backend in backends().await {
        let store = backend.store();
        // Title order inverts duration order, so a leak of some other
        // column into the fallback shows up immediately.
        backend.seed(video("/videos/zzz.mkv", 1000)).await;
        backend.seed(video("/videos/aaa.mkv", 9000)).await;

        let titles: Vec<String> = store
            .videos(
                MediaFilter::default(),
                Sort::by(SortKey::FileSize),
                Paging::all(),
            )
            .await
            .unwrap()
            .iter()
            .map(|m| m.title())
            .collect();
        assert_eq!(titles, vec!["aaa", "zzz"], "{}", backend.name());
    }
}

async fn group_by_id(store: &Arc<dyn CatalogBackend>, id: i64) -> VideoGroup {
    store
        .video_groups(Sort::default(), Paging::all())
        .await
        .unwrap()
        .into_iter()
        .find(|g| g.id == id)
        .unwrap()
}

#[tokio::test]
async fn group_is_network_only_while_every_member_is() {
    for backend in backends().await {
        let store = backend.store();
        let remote = backend.seed(video("smb://host/share/net.mkv", 1000)).await;
        let local = backend.seed(video("/videos/local.mkv", 1000)).await;

        let group = store.create_video_group("Mixed").await.unwrap().unwrap();
        assert!(!group.is_network, "{}", backend.name());

        assert!(store.video_group_add_media(group.id, remote.id).await.unwrap());
        assert!(
            group_by_id(&store, group.id).await.is_network,
            "{}",
            backend.name()
        );

        assert!(store.video_group_add_media(group.id, local.id).await.unwrap());
        assert!(
            !group_by_id(&store, group.id).await.is_network,
            "{}",
            backend.name()
        );

        // A group that ever held a local member stays local.
        let other = store.create_video_group("Local first").await.unwrap().unwrap();
        assert!(store.video_group_add_media(other.id, local.id).await.unwrap());
        assert!(store.video_group_add_media(other.id, remote.id).await.unwrap());
        assert!(
            !group_by_id(&store, other.id).await.is_network,
            "{}",
            backend.name()
        );
    }
}

#[tokio::test]
async fn empty_search_query_yields_nothing() {
    for backend in backends().await {
        let store = backend.store();
        backend.seed(video("/videos/findable.mkv", 1000)).await;

        assert!(store
            .search_media("", Sort::default(), Paging::all())
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .search_media("   ", Sort::default(), Paging::all())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(store.search_media_count("  ").await.unwrap(), 0);

        let hits = store
            .search_videos("findable", Sort::default(), Paging::all())
            .await
            .unwrap();
        assert_eq!(hits.len(), 1, "{}", backend.name());
    }
}

#[tokio::test]
async fn favorite_is_idempotent_and_persisted() {
    for backend in backends().await {
        let store = backend.store();
        let media = backend.seed(video("/videos/fav.mkv", 1000)).await;

        assert!(store.set_media_favorite(media.id, true).await.unwrap());
        assert!(store.set_media_favorite(media.id, true).await.unwrap());
        let reloaded = store.media(media.id).await.unwrap().unwrap();
        assert!(reloaded.flags.contains(StateFlags::FAVORITE), "{}", backend.name());

        assert!(store.set_media_favorite(media.id, false).await.unwrap());
        let reloaded = store.media(media.id).await.unwrap().unwrap();
        assert!(!reloaded.is_favorite(), "{}", backend.name());

        // Unpersisted ids are rejected without dispatch.
        assert!(!store.set_media_favorite(0, true).await.unwrap());
    }
}

#[tokio::test]
async fn folders_never_persist_favorites() {
    for backend in backends().await {
        let store = backend.store();
        assert!(!store.set_folder_favorite(1, true).await.unwrap(), "{}", backend.name());
    }
}

#[tokio::test]
async fn playlist_edit_sequence_keeps_order() {
    for backend in backends().await {
        let store = backend.store();
        let a = backend.seed(audio("/m/a.mp3", "X", "Singles")).await;
        let b = backend.seed(audio("/m/b.mp3", "X", "Singles")).await;
        let c = backend.seed(audio("/m/c.mp3", "X", "Singles")).await;

        let playlist = store.create_playlist("Ordered").await.unwrap();
        assert!(store.playlist_append(playlist.id, &[a.id, b.id, c.id]).await.unwrap());

        assert!(store.playlist_move(playlist.id, 0, 2).await.unwrap());
        let ids: Vec<i64> = store
            .playlist_tracks(playlist.id, Paging::all())
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![b.id, c.id, a.id], "{}", backend.name());

        assert!(store.playlist_remove_at(playlist.id, 1).await.unwrap());
        let ids: Vec<i64> = store
            .playlist_tracks(playlist.id, Paging::all())
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![b.id, a.id], "{}", backend.name());

        // Out-of-range edits change nothing.
        assert!(!store.playlist_move(playlist.id, 0, 9).await.unwrap());
        assert!(!store.playlist_remove_at(playlist.id, 9).await.unwrap());
        assert_eq!(store.playlist_tracks_count(playlist.id).await.unwrap(), 2);
    }
}

#[tokio::test]
async fn delete_twice_reports_false() {
    for backend in backends().await {
        let store = backend.store();
        let playlist = store.create_playlist("Ephemeral").await.unwrap();
        assert!(store.delete_playlist(playlist.id).await.unwrap());
        assert!(!store.delete_playlist(playlist.id).await.unwrap(), "{}", backend.name());
    }
}

#[tokio::test]
async fn unknown_lookups_are_absent_not_errors() {
    for backend in backends().await {
        let store = backend.store();
        assert!(store.media(9999).await.unwrap().is_none());
        assert!(store.album(9999).await.unwrap().is_none());
        assert!(store
            .album_tracks(9999, Sort::default(), Paging::all())
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .media_by_location("file:///nowhere.mkv")
            .await
            .unwrap()
            .is_none());
    }
}

#[tokio::test]
async fn add_media_normalizes_and_deduplicates_locations() {
    for backend in backends().await {
        let store = backend.store();
        let first = store.add_media("/ext/clip.webm").await.unwrap().unwrap();
        assert_eq!(first.location, "file:///ext/clip.webm", "{}", backend.name());

        let again = store.add_media("file:///ext/clip.webm").await.unwrap().unwrap();
        assert_eq!(again.id, first.id, "{}", backend.name());

        let stream = store
            .add_stream("http://example.com/radio", "Radio")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stream.kind, MediaKind::Stream);
        assert!(store.remove_external_media(stream.id).await.unwrap());
        assert!(!store.remove_external_media(stream.id).await.unwrap());
    }
}
