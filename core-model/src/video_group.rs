//! Video group entity: a named grouping of related videos.

use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VideoGroup {
    pub id: i64,
    pub name: String,
    pub flags: StateFlags,
    pub nb_media: u32,
    pub nb_present_media: u32,
    /// Whether every member lives on a network share.
    pub is_network: bool,
}

impl VideoGroup {
    pub fn new(id: i64, name: &str) -> Self {
        VideoGroup {
            id,
            name: name.to_string(),
            ..VideoGroup::default()
        }
    }
}

impl CatalogItem for VideoGroup {
    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.name = title.to_string();
    }

    fn flags(&self) -> StateFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut StateFlags {
        &mut self.flags
    }

    fn item_type(&self) -> ItemType {
        ItemType::VideoGroup
    }

    fn tracks_count(&self) -> u32 {
        self.nb_media
    }
}

impl PartialEq for VideoGroup {
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
    fn serde_round_trip_preserves_every_field() {
        let mut group = VideoGroup::new(4, "Vacation 2025");
        group.flags.insert(StateFlags::SELECTED);
        group.nb_media = 6;
        group.nb_present_media = 5;
        group.is_network = true;

        let encoded = serde_json::to_string(&group).unwrap();
        let decoded: VideoGroup = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, group);
        assert_eq!(decoded.name, group.name);
        assert_eq!(decoded.flags, group.flags);
        assert_eq!(decoded.nb_media, group.nb_media);
        assert_eq!(decoded.nb_present_media, group.nb_present_media);
        assert_eq!(decoded.is_network, group.is_network);
    }
}
