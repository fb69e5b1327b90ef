//! Storage entity: a mounted volume the indexer can scan.

use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    pub name: String,
    pub mrl: String,
    pub removable: bool,
    pub flags: StateFlags,
}

impl Storage {
    pub fn new(name: &str, mrl: &str, removable: bool) -> Self {
        Storage {
            name: name.to_string(),
            mrl: mrl.to_string(),
            removable,
            flags: StateFlags::STORAGE,
        }
    }
}

impl CatalogItem for Storage {
    fn id(&self) -> i64 {
        0
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
        ItemType::Storage
    }
}

impl PartialEq for Storage {
    /// Volumes are compared by display name.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_the_storage_flag_and_name_identity() {
        let internal = Storage::new("Internal", "file:///storage/emulated/0", false);
        assert!(internal.has_flag(StateFlags::STORAGE));

        let same_name = Storage::new("Internal", "file:///another/mount", true);
        assert_eq!(internal, same_name);
    }
}
