//! Playlist entity. Membership and ordering live behind the backend; the
//! struct only carries the per-kind counters the list views render.

use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Playlist {
    pub id: i64,
    pub title: String,
    pub flags: StateFlags,
    pub nb_video: u32,
    pub nb_audio: u32,
    pub nb_unknown: u32,
    /// Members whose duration has not been probed yet.
    pub nb_duration_unknown: u32,
    pub duration_ms: i64,
}

impl Playlist {
    pub fn new(id: i64, title: &str) -> Self {
        Playlist {
            id,
            title: title.to_string(),
            ..Playlist::default()
        }
    }
}

impl CatalogItem for Playlist {
    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn flags(&self) -> StateFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut StateFlags {
        &mut self.flags
    }

    fn item_type(&self) -> ItemType {
        ItemType::Playlist
    }

    /// Derived from the per-kind counters rather than stored.
    fn tracks_count(&self) -> u32 {
        self.nb_video + self.nb_audio + self.nb_unknown
    }
}

impl PartialEq for Playlist {
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

    #[test]
    fn tracks_count_sums_per_kind_counters() {
        let mut playlist = Playlist::new(1, "Road Trip");
        playlist.nb_video = 2;
        playlist.nb_audio = 10;
        playlist.nb_unknown = 1;
        assert_eq!(playlist.tracks_count(), 13);
    }

    #[test]
    fn serde_round_trip_preserves_every_field() {
        let mut playlist = Playlist::new(3, "Road Trip");
        playlist.flags.insert(StateFlags::FAVORITE);
        playlist.nb_video = 2;
        playlist.nb_audio = 10;
        playlist.nb_unknown = 1;
        playlist.nb_duration_unknown = 4;
        playlist.duration_ms = 3_540_000;

        let encoded = serde_json::to_string(&playlist).unwrap();
        let decoded: Playlist = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, playlist);
        assert_eq!(decoded.title, playlist.title);
        assert_eq!(decoded.flags, playlist.flags);
        assert_eq!(decoded.nb_video, playlist.nb_video);
        assert_eq!(decoded.nb_audio, playlist.nb_audio);
        assert_eq!(decoded.nb_unknown, playlist.nb_unknown);
        assert_eq!(decoded.nb_duration_unknown, playlist.nb_duration_unknown);
        assert_eq!(decoded.duration_ms, playlist.duration_ms);
    }
}
