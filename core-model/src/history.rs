//! Playback history. Entries have no backend id: a location plus its
//! insertion timestamp is the identity.

use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

/// Which history stream an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryKind {
    Local,
    Network,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub location: String,
    pub title: String,
    pub insertion_date: i64,
    pub flags: StateFlags,
}

impl HistoryEntry {
    pub fn new(location: &str, title: &str, insertion_date: i64) -> Self {
        HistoryEntry {
            location: location.to_string(),
            title: title.to_string(),
            insertion_date,
            flags: StateFlags::NONE,
        }
    }
}

impl CatalogItem for HistoryEntry {
    /// History rows carry no backend id.
    fn id(&self) -> i64 {
        0
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn description(&self) -> Option<String> {
        Some(self.location.clone())
    }

    fn flags(&self) -> StateFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut StateFlags {
        &mut self.flags
    }

    fn item_type(&self) -> ItemType {
        ItemType::History
    }
}

impl PartialEq for HistoryEntry {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location && self.insertion_date == other.insertion_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_location_plus_timestamp() {
        let a = HistoryEntry::new("file:///a.mkv", "A", 100);
        let later = HistoryEntry::new("file:///a.mkv", "A again", 200);
        assert_ne!(a, later);
        assert_eq!(a, HistoryEntry::new("file:///a.mkv", "renamed", 100));
    }

    #[test]
    fn serde_round_trip_preserves_every_field() {
        let mut entry = HistoryEntry::new("http://radio.example.com/live", "Late Show", 1_700_000_000);
        entry.flags.insert(StateFlags::FAVORITE);

        let encoded = serde_json::to_string(&entry).unwrap();
        let decoded: HistoryEntry = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, entry);
        // Equality only checks location and timestamp.
        assert_eq!(decoded.title, entry.title);
        assert_eq!(decoded.flags, entry.flags);
    }
}
