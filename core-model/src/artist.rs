//! Artist entity, including the two aggregate rows every backend pre-seeds.

use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

/// Reserved id for the aggregate of tracks with no artist metadata.
pub const UNKNOWN_ARTIST_ID: i64 = 1;
/// Reserved id for multi-artist compilation albums.
pub const VARIOUS_ARTISTS_ID: i64 = 2;

pub const UNKNOWN_ARTIST_NAME: &str = "Unknown Artist";
pub const VARIOUS_ARTISTS_NAME: &str = "Various Artists";

/// Display name for an artist id, resolving the two reserved rows.
pub fn resolve_name(id: i64, name: Option<&str>) -> String {
    match id {
        UNKNOWN_ARTIST_ID => UNKNOWN_ARTIST_NAME.to_string(),
        VARIOUS_ARTISTS_ID => VARIOUS_ARTISTS_NAME.to_string(),
        _ => name.unwrap_or_default().to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub flags: StateFlags,
    pub short_bio: Option<String>,
    pub artwork_url: Option<String>,
    /// Identifier on an external metadata service, e.g. a MusicBrainz id.
    pub external_id: Option<String>,
    pub nb_albums: u32,
    pub nb_tracks: u32,
    pub nb_present_tracks: u32,
}

impl Artist {
    pub fn new(id: i64, name: &str) -> Self {
        Artist {
            id,
            name: name.to_string(),
            ..Artist::default()
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.id == UNKNOWN_ARTIST_ID
    }

    pub fn is_various(&self) -> bool {
        self.id == VARIOUS_ARTISTS_ID
    }
}

impl CatalogItem for Artist {
    fn id(&self) -> i64 {
        self.id
    }

    /// The reserved rows always present their canonical names, whatever the
    /// stored value says.
    fn title(&self) -> String {
        resolve_name(self.id, Some(&self.name))
    }

    fn set_title(&mut self, title: &str) {
        self.name = title.to_string();
    }

    fn description(&self) -> Option<String> {
        self.short_bio.clone()
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
        ItemType::Artist
    }

    fn tracks_count(&self) -> u32 {
        self.nb_tracks
    }
}

impl PartialEq for Artist {
    /// Id equality when both rows are persisted, name equality otherwise.
    fn eq(&self, other: &Self) -> bool {
        if self.id != 0 && other.id != 0 {
            return self.id == other.id;
        }
        self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_rows_resolve_canonical_names() {
        let unknown = Artist::new(UNKNOWN_ARTIST_ID, "");
        assert_eq!(unknown.title(), "Unknown Artist");
        assert!(unknown.is_unknown());

        let various = Artist::new(VARIOUS_ARTISTS_ID, "whatever was stored");
        assert_eq!(various.title(), "Various Artists");
        assert!(various.is_various());

        let regular = Artist::new(10, "Nina Simone");
        assert_eq!(regular.title(), "Nina Simone");
    }

    #[test]
    fn equality_prefers_ids_then_name() {
        let a = Artist::new(3, "Same Name");
        let b = Artist::new(4, "Same Name");
        assert_ne!(a, b);

        let unsaved = Artist::new(0, "Same Name");
        assert_eq!(unsaved, a);
        assert_eq!(unsaved, b);
    }

    #[test]
    fn serde_round_trip_preserves_every_field() {
        let mut artist = Artist::new(10, "Nina Simone");
        artist.flags.insert(StateFlags::FAVORITE);
        artist.short_bio = Some("High Priestess of Soul".to_string());
        artist.artwork_url = Some("file:///art/nina.jpg".to_string());
        artist.external_id = Some("mb:2944824d-4c26".to_string());
        artist.nb_albums = 4;
        artist.nb_tracks = 48;
        artist.nb_present_tracks = 40;

        let encoded = serde_json::to_string(&artist).unwrap();
        let decoded: Artist = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, artist);
        assert_eq!(decoded.name, artist.name);
        assert_eq!(decoded.flags, artist.flags);
        assert_eq!(decoded.short_bio, artist.short_bio);
        assert_eq!(decoded.artwork_url, artist.artwork_url);
        assert_eq!(decoded.external_id, artist.external_id);
        assert_eq!(decoded.nb_albums, artist.nb_albums);
        assert_eq!(decoded.nb_tracks, artist.nb_tracks);
        assert_eq!(decoded.nb_present_tracks, artist.nb_present_tracks);
    }
}
