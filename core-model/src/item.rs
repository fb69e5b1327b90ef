//! The identity/state contract shared by every catalog object.

use crate::flags::StateFlags;
use serde::{Deserialize, Serialize};

/// Discriminant used by callers to downcast safely across the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Media,
    Album,
    Artist,
    Genre,
    Playlist,
    Folder,
    VideoGroup,
    Subscription,
    Bookmark,
    History,
    Storage,
    Dummy,
}

/// Identity and state shared by all catalog entities.
///
/// Entities are plain values: an id of `0` means "not yet persisted by a
/// backend". Once a backend assigns an id it is stable and uniquely
/// identifies the entity within its concrete type.
pub trait CatalogItem {
    fn id(&self) -> i64;

    /// Display title. Some variants derive it (media falls back to the
    /// filename stem), so this returns an owned string.
    fn title(&self) -> String;

    fn set_title(&mut self, title: &str);

    fn description(&self) -> Option<String> {
        None
    }

    /// Opaque reference to cover art, when the variant carries one.
    fn artwork(&self) -> Option<&str> {
        None
    }

    fn flags(&self) -> StateFlags;

    fn flags_mut(&mut self) -> &mut StateFlags;

    fn item_type(&self) -> ItemType;

    /// Cached track count. Trivial variants report 0, a media item 1.
    fn tracks_count(&self) -> u32 {
        0
    }

    fn has_flag(&self, flag: StateFlags) -> bool {
        self.flags().contains(flag)
    }

    fn add_flag(&mut self, flag: StateFlags) {
        self.flags_mut().insert(flag);
    }

    fn remove_flag(&mut self, flag: StateFlags) {
        self.flags_mut().remove(flag);
    }

    fn toggle_flag(&mut self, flag: StateFlags) {
        self.flags_mut().toggle(flag);
    }

    fn is_favorite(&self) -> bool {
        self.flags().contains(StateFlags::FAVORITE)
    }
}
