//! Album entity.

use crate::artist;
use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub flags: StateFlags,
    pub release_year: i32,
    pub artwork_url: Option<String>,
    /// Stored name of the album artist. The reserved artist ids resolve to
    /// their canonical names regardless of this value.
    pub album_artist: Option<String>,
    pub album_artist_id: i64,
    pub nb_tracks: u32,
    pub nb_present_tracks: u32,
    pub duration_ms: i64,
}

impl Album {
    pub fn new(id: i64, title: &str) -> Self {
        Album {
            id,
            title: title.to_string(),
            ..Album::default()
        }
    }

    /// Album-artist display name, resolving the reserved artist rows.
    pub fn album_artist_name(&self) -> String {
        artist::resolve_name(self.album_artist_id, self.album_artist.as_deref())
    }

    /// "artist - year" when the release year is known.
    pub fn release_line(&self) -> String {
        let name = self.album_artist_name();
        if self.release_year > 0 {
            format!("{name} - {}", self.release_year)
        } else {
            name
        }
    }
}

impl CatalogItem for Album {
    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn description(&self) -> Option<String> {
        Some(self.album_artist_name()).filter(|n| !n.is_empty())
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
        ItemType::Album
    }

    fn tracks_count(&self) -> u32 {
        self.nb_tracks
    }
}

impl PartialEq for Album {
    fn eq(&self, other: &Self) -> bool {
        if self.id != 0 && other.id != 0 {
            return self.id == other.id;
        }
        self.title == other.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artist::{UNKNOWN_ARTIST_ID, VARIOUS_ARTISTS_ID};

    #[test]
    fn reserved_album_artist_ids_resolve() {
        let mut album = Album::new(5, "A Compilation");
        album.album_artist_id = VARIOUS_ARTISTS_ID;
        album.album_artist = Some("stale stored name".to_string());
        assert_eq!(album.album_artist_name(), "Various Artists");

        album.album_artist_id = UNKNOWN_ARTIST_ID;
        assert_eq!(album.album_artist_name(), "Unknown Artist");

        album.album_artist_id = 9;
        album.album_artist = Some("Nick Cave".to_string());
        assert_eq!(album.album_artist_name(), "Nick Cave");
    }

    #[test]
    fn release_line_includes_year_when_known() {
        let mut album = Album::new(5, "Push the Sky Away");
        album.album_artist_id = 9;
        album.album_artist = Some("Nick Cave".to_string());
        assert_eq!(album.release_line(), "Nick Cave");

        album.release_year = 2013;
        assert_eq!(album.release_line(), "Nick Cave - 2013");
    }

    #[test]
    fn equality_prefers_ids_then_title() {
        let a = Album::new(1, "Blue");
        let b = Album::new(2, "Blue");
        assert_ne!(a, b);
        assert_eq!(Album::new(0, "Blue"), a);
    }

    #[test]
    fn serde_round_trip_preserves_every_field() {
        let mut album = Album::new(7, "Blue Lines");
        album.flags.insert(StateFlags::FAVORITE);
        album.release_year = 1991;
        album.artwork_url = Some("file:///covers/blue-lines.jpg".to_string());
        album.album_artist = Some("Massive Attack".to_string());
        album.album_artist_id = 9;
        album.nb_tracks = 8;
        album.nb_present_tracks = 7;
        album.duration_ms = 2_712_000;

        let encoded = serde_json::to_string(&album).unwrap();
        let decoded: Album = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, album);
        assert_eq!(decoded.flags, album.flags);
        assert_eq!(decoded.release_year, album.release_year);
        assert_eq!(decoded.artwork_url, album.artwork_url);
        assert_eq!(decoded.album_artist, album.album_artist);
        assert_eq!(decoded.album_artist_id, album.album_artist_id);
        assert_eq!(decoded.nb_tracks, album.nb_tracks);
        assert_eq!(decoded.nb_present_tracks, album.nb_present_tracks);
        assert_eq!(decoded.duration_ms, album.duration_ms);
    }
}
