//! Placeholder entity used by list views for section headers.

use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DummyItem {
    pub title: String,
    pub description: Option<String>,
    pub flags: StateFlags,
}

impl DummyItem {
    pub fn new(title: &str) -> Self {
        DummyItem {
            title: title.to_string(),
            ..DummyItem::default()
        }
    }

    pub fn with_description(title: &str, description: &str) -> Self {
        DummyItem {
            title: title.to_string(),
            description: Some(description.to_string()),
            flags: StateFlags::NONE,
        }
    }
}

impl CatalogItem for DummyItem {
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
        self.description.clone()
    }

    fn flags(&self) -> StateFlags {
        self.flags
    }

    fn flags_mut(&mut self) -> &mut StateFlags {
        &mut self.flags
    }

    fn item_type(&self) -> ItemType {
        ItemType::Dummy
    }
}
