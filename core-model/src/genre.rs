//! Genre entity.

use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub flags: StateFlags,
    pub nb_tracks: u32,
    pub nb_present_tracks: u32,
}

impl Genre {
    pub fn new(id: i64, name: &str) -> Self {
        Genre {
            id,
            name: name.to_string(),
            ..Genre::default()
        }
    }
}

impl CatalogItem for Genre {
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
        ItemType::Genre
    }

    fn tracks_count(&self) -> u32 {
        self.nb_tracks
    }
}

impl PartialEq for Genre {
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
    fn equality_prefers_ids_then_name() {
        assert_ne!(Genre::new(1, "Jazz"), Genre::new(2, "Jazz"));
        assert_eq!(Genre::new(0, "Jazz"), Genre::new(1, "Jazz"));
    }
}
