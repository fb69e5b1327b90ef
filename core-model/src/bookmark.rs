//! Bookmark entity: a named offset inside a media item.

use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Bookmark {
    pub id: i64,
    pub media_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub offset_ms: i64,
    pub flags: StateFlags,
}

impl Bookmark {
    pub fn new(id: i64, media_id: i64, name: &str, offset_ms: i64) -> Self {
        Bookmark {
            id,
            media_id,
            name: name.to_string(),
            description: None,
            offset_ms,
            flags: StateFlags::NONE,
        }
    }
}

impl CatalogItem for Bookmark {
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
        self.description.clone()
    }

    fn flags(&self) -> StateFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut StateFlags {
        &mut self.flags
    }

    fn item_type(&self) -> ItemType {
        ItemType::Bookmark
    }
}

impl PartialEq for Bookmark {
    fn eq(&self, other: &Self) -> bool {
        if self.id != 0 && other.id != 0 {
            return self.id == other.id;
        }
        self.media_id == other.media_id && self.offset_ms == other.offset_ms
    }
}
