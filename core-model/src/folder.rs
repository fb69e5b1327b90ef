//! Folder entity: a directory the indexer knows about.

use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub flags: StateFlags,
    pub mrl: String,
    pub nb_video: u32,
    pub nb_audio: u32,
}

impl Folder {
    pub fn new(id: i64, name: &str, mrl: &str) -> Self {
        Folder {
            id,
            name: name.to_string(),
            mrl: mrl.to_string(),
            ..Folder::default()
        }
    }

    pub fn media_count(&self) -> u32 {
        self.nb_video + self.nb_audio
    }
}

impl CatalogItem for Folder {
    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.name = title.to_string();
    }

    fn description(&self) -> Option<String> {
        Some(self.mrl.clone())
    }

    fn flags(&self) -> StateFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut StateFlags {
        &mut self.flags
    }

    fn item_type(&self) -> ItemType {
        ItemType::Folder
    }

    fn tracks_count(&self) -> u32 {
        self.media_count()
    }
}

impl PartialEq for Folder {
    fn eq(&self, other: &Self) -> bool {
        if self.id != 0 && other.id != 0 {
            return self.id == other.id;
        }
        self.mrl == other.mrl
    }
}
