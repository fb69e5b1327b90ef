//! The media item: playback-relevant metadata around a single location.

use crate::error::{ModelError, Result};
use crate::extensions;
use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

/// Duration thresholds for the podcast heuristic, in milliseconds.
const PODCAST_THRESHOLD_MS: i64 = 900_000;
const PODCAST_ABSOLUTE_MS: i64 = 3_600_000;

const PODCAST_GENRES: &[&str] = &["podcast", "audiobook", "audiobooks", "speech", "vocal"];

/// Track selection sentinel: no track picked yet. `-1` is a valid
/// selection meaning "disabled".
pub const TRACK_UNSET: i32 = -2;

/// Broad media classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MediaKind {
    #[default]
    Unknown,
    Video,
    Audio,
    Group,
    Directory,
    Subtitle,
    Playlist,
    Stream,
}

impl MediaKind {
    pub fn as_i64(self) -> i64 {
        match self {
            MediaKind::Unknown => -1,
            MediaKind::Video => 0,
            MediaKind::Audio => 1,
            MediaKind::Group => 2,
            MediaKind::Directory => 3,
            MediaKind::Subtitle => 4,
            MediaKind::Playlist => 5,
            MediaKind::Stream => 6,
        }
    }

    pub fn from_i64(value: i64) -> Self {
        match value {
            0 => MediaKind::Video,
            1 => MediaKind::Audio,
            2 => MediaKind::Group,
            3 => MediaKind::Directory,
            4 => MediaKind::Subtitle,
            5 => MediaKind::Playlist,
            6 => MediaKind::Stream,
            _ => MediaKind::Unknown,
        }
    }
}

/// Classification of an external companion track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlaveKind {
    Subtitle,
    Audio,
}

/// An external subtitle or audio file attached to a media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slave {
    pub kind: SlaveKind,
    pub priority: i32,
    pub uri: String,
}

/// A playable catalog entry.
///
/// Field order is the serialization contract: base identity fields first,
/// then the variant fields in declared order. Appending a field is the only
/// compatible evolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: i64,
    pub title: Option<String>,
    pub flags: StateFlags,
    pub location: String,
    pub kind: MediaKind,
    /// User-facing title override, distinct from the metadata title.
    pub display_title: Option<String>,
    pub filename: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub width: u32,
    pub height: u32,
    pub artwork_url: Option<String>,
    pub audio_track: i32,
    pub spu_track: i32,
    pub track_number: u32,
    pub disc_number: u32,
    pub duration_ms: i64,
    /// Saved playback position in milliseconds.
    pub position_ms: i64,
    pub last_modified: i64,
    pub seen: i64,
    pub insertion_date: i64,
    pub release_date: i64,
    pub thumbnail_generated: bool,
    /// Whether the underlying file is currently found on disk.
    pub present: bool,
    pub slaves: Vec<Slave>,
}

impl Media {
    /// Lightweight wrapper around a not-yet-indexed location, e.g. a URI
    /// dragged into the player. Fails loudly on an empty location, which is
    /// a caller bug rather than a data-absence condition.
    pub fn from_location(location: &str) -> Result<Self> {
        if location.trim().is_empty() {
            return Err(ModelError::EmptyLocation);
        }
        let location = normalize_location(location);
        let kind = extensions::kind_for_location(&location);
        Ok(Media {
            id: 0,
            title: None,
            flags: StateFlags::NONE,
            location,
            kind,
            display_title: None,
            filename: None,
            artist: None,
            genre: None,
            album: None,
            album_artist: None,
            width: 0,
            height: 0,
            artwork_url: None,
            audio_track: TRACK_UNSET,
            spu_track: TRACK_UNSET,
            track_number: 0,
            disc_number: 0,
            duration_ms: 0,
            position_ms: 0,
            last_modified: 0,
            seen: 0,
            insertion_date: 0,
            release_date: 0,
            thumbnail_generated: false,
            present: true,
            slaves: Vec::new(),
        })
    }

    /// Stream entry: like [`Media::from_location`] but pre-classified.
    pub fn stream(location: &str, title: &str) -> Result<Self> {
        let mut media = Media::from_location(location)?;
        media.kind = MediaKind::Stream;
        if !title.is_empty() {
            media.title = Some(title.to_string());
        }
        Ok(media)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Last path segment of the location, ignoring any query string.
    pub fn file_name(&self) -> String {
        if let Some(name) = &self.filename {
            return name.clone();
        }
        let segment = self.location.rsplit('/').next().unwrap_or(&self.location);
        segment.split('?').next().unwrap_or(segment).to_string()
    }

    /// Re-run extension classification; only refines an `Unknown` kind.
    pub fn define_kind(&mut self) {
        if self.kind == MediaKind::Unknown {
            self.kind = extensions::kind_for_location(&self.location);
        }
    }

    /// Audio entries over an hour, album-less audio over fifteen minutes,
    /// and the spoken-word genres classify as podcasts.
    pub fn is_podcast(&self) -> bool {
        if self.kind != MediaKind::Audio {
            return false;
        }
        if self.duration_ms > PODCAST_ABSOLUTE_MS {
            return true;
        }
        if self.album.as_deref().map_or(true, str::is_empty) && self.duration_ms > PODCAST_THRESHOLD_MS
        {
            return true;
        }
        self.genre
            .as_deref()
            .map_or(false, |g| PODCAST_GENRES.contains(&g.to_lowercase().as_str()))
    }

    /// Album artist when set, otherwise the track artist.
    pub fn reference_artist(&self) -> Option<&str> {
        self.album_artist.as_deref().or(self.artist.as_deref())
    }

    /// Genre normalized to leading-uppercase for case-insensitive grouping.
    pub fn display_genre(&self) -> Option<String> {
        self.genre.as_deref().map(|g| {
            let mut chars = g.chars();
            match chars.next() {
                Some(first) if g.chars().count() > 1 => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                _ => g.to_string(),
            }
        })
    }
}

/// Location normalization applied by every media constructor: bare absolute
/// paths gain a `file://` scheme, and the player-internal `vlc://` prefix is
/// unwrapped (defaulting to `http://` when nothing remains).
pub fn normalize_location(location: &str) -> String {
    if location.starts_with('/') {
        return format!("file://{location}");
    }
    let lower = location.to_lowercase();
    if let Some(rest) = lower
        .starts_with("vlc://")
        .then(|| &location[6..])
    {
        if rest.contains("://") {
            return rest.to_string();
        }
        return format!("http://{rest}");
    }
    location.to_string()
}

impl CatalogItem for Media {
    fn id(&self) -> i64 {
        self.id
    }

    /// Display title wins over the metadata title; a media item with
    /// neither falls back to its filename without the extension.
    fn title(&self) -> String {
        if let Some(title) = self.display_title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => name,
        }
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// "artist - album" for audio entries that carry either.
    fn description(&self) -> Option<String> {
        if self.kind != MediaKind::Audio {
            return None;
        }
        match (self.artist.as_deref(), self.album.as_deref()) {
            (Some(artist), Some(album)) => Some(format!("{artist} - {album}")),
            (Some(artist), None) => Some(artist.to_string()),
            (None, Some(album)) => Some(album.to_string()),
            (None, None) => None,
        }
    }

    fn artwork(&self) -> Option<&str> {
        self.artwork_url.as_deref()
    }

    fn flags(&self) -> StateFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut StateFlags {
        &mut self.flags
    }

    fn item_type(&self) -> ItemType {
        ItemType::Media
    }

    fn tracks_count(&self) -> u32 {
        1
    }
}

impl PartialEq for Media {
    /// Equal when both backend ids are assigned and match, otherwise when
    /// the locations match.
    fn eq(&self, other: &Self) -> bool {
        if self.id != 0 && other.id != 0 {
            return self.id == other.id;
        }
        self.location == other.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_location_fails_loudly() {
        assert!(matches!(Media::from_location(""), Err(ModelError::EmptyLocation)));
        assert!(matches!(Media::from_location("   "), Err(ModelError::EmptyLocation)));
    }

    #[test]
    fn bare_path_gains_file_scheme() {
        let media = Media::from_location("/music/song.mp3").unwrap();
        assert_eq!(media.location(), "file:///music/song.mp3");
        assert_eq!(media.kind, MediaKind::Audio);
    }

    #[test]
    fn vlc_scheme_is_unwrapped() {
        let media = Media::from_location("vlc://example.com/live").unwrap();
        assert_eq!(media.location(), "http://example.com/live");

        let media = Media::from_location("vlc://https://example.com/live").unwrap();
        assert_eq!(media.location(), "https://example.com/live");
    }

    #[test]
    fn video_extension_and_filename_title() {
        let media = Media::from_location("/sdcard/movie.mkv").unwrap();
        assert_eq!(media.kind, MediaKind::Video);
        assert_eq!(media.title(), "movie");
        assert_eq!(media.file_name(), "movie.mkv");
    }

    #[test]
    fn title_resolution_order() {
        let mut media = Media::from_location("/music/track01.flac").unwrap();
        assert_eq!(media.title(), "track01");

        media.set_title("Meta Title");
        assert_eq!(media.title(), "Meta Title");

        media.display_title = Some("Display Title".to_string());
        assert_eq!(media.title(), "Display Title");
    }

    #[test]
    fn podcast_heuristics() {
        let mut media = Media::from_location("/music/episode.mp3").unwrap();
        media.kind = MediaKind::Audio;

        // Short track with an album: a song.
        media.album = Some("An Album".to_string());
        media.duration_ms = 200_000;
        assert!(!media.is_podcast());

        // Over an hour is always a podcast.
        media.duration_ms = PODCAST_ABSOLUTE_MS + 1;
        assert!(media.is_podcast());

        // Album-less and over fifteen minutes.
        media.duration_ms = PODCAST_THRESHOLD_MS + 1;
        media.album = None;
        assert!(media.is_podcast());

        // Genre match regardless of duration.
        media.duration_ms = 60_000;
        media.album = Some("An Album".to_string());
        media.genre = Some("Audiobook".to_string());
        assert!(media.is_podcast());

        // Video is never a podcast.
        media.kind = MediaKind::Video;
        assert!(!media.is_podcast());
    }

    #[test]
    fn equality_prefers_ids_then_location() {
        let mut a = Media::from_location("/a.mkv").unwrap();
        let mut b = Media::from_location("/b.mkv").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        a.id = 7;
        b.id = 7;
        assert_eq!(a, b);

        b.id = 8;
        assert_ne!(a, b);

        // Unpersisted wrapper matches the hydrated row for the same location.
        let raw = Media::from_location("/a.mkv").unwrap();
        assert_eq!(raw, a);
    }

    #[test]
    fn audio_description_combines_artist_and_album() {
        let mut media = Media::from_location("/music/t.mp3").unwrap();
        media.artist = Some("Artist".to_string());
        media.album = Some("Album".to_string());
        assert_eq!(media.description().as_deref(), Some("Artist - Album"));

        media.album = None;
        assert_eq!(media.description().as_deref(), Some("Artist"));
    }

    #[test]
    fn serde_round_trip_preserves_every_field() {
        let mut media = Media::from_location("/videos/clip.webm").unwrap();
        media.id = 42;
        media.display_title = Some("Clip".to_string());
        media.duration_ms = 123_456;
        media.position_ms = 60_000;
        media.seen = 3;
        media.flags.insert(StateFlags::FAVORITE);
        media.slaves.push(Slave {
            kind: SlaveKind::Subtitle,
            priority: 2,
            uri: "file:///videos/clip.srt".to_string(),
        });

        let encoded = serde_json::to_string(&media).unwrap();
        let decoded: Media = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, media);
        assert_eq!(decoded.duration_ms, media.duration_ms);
        assert_eq!(decoded.position_ms, media.position_ms);
        assert_eq!(decoded.seen, media.seen);
        assert_eq!(decoded.flags, media.flags);
        assert_eq!(decoded.slaves, media.slaves);
    }
}
