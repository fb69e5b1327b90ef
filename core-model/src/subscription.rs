//! Subscription tree: services (podcast feeds for now) and the
//! subscriptions cached under them.

use crate::flags::StateFlags;
use crate::item::{CatalogItem, ItemType};
use serde::{Deserialize, Serialize};

/// The remote services a subscription can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    Podcast,
}

/// A subscription provider with its cache budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub kind: ServiceKind,
    pub auto_download: bool,
    pub new_media_notification: bool,
    pub max_cached_size: i64,
    pub nb_subscriptions: u32,
    pub nb_unplayed_media: u32,
}

impl Service {
    pub fn new(kind: ServiceKind) -> Self {
        Service {
            kind,
            auto_download: false,
            new_media_notification: false,
            max_cached_size: -1,
            nb_subscriptions: 0,
            nb_unplayed_media: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub flags: StateFlags,
    pub service: ServiceKind,
    /// Parent subscription id, 0 at the root of the tree.
    pub parent_id: i64,
    pub artwork_url: Option<String>,
    pub cached_size: i64,
    /// Per-subscription cache cap; -1 inherits the service budget.
    pub max_cached_size: i64,
    pub nb_media: u32,
    pub nb_unplayed_media: u32,
}

impl Subscription {
    pub fn new(id: i64, service: ServiceKind, name: &str) -> Self {
        Subscription {
            id,
            name: name.to_string(),
            flags: StateFlags::NONE,
            service,
            parent_id: 0,
            artwork_url: None,
            cached_size: 0,
            max_cached_size: -1,
            nb_media: 0,
            nb_unplayed_media: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id == 0
    }
}

impl CatalogItem for Subscription {
    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.name = title.to_string();
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
        ItemType::Subscription
    }

    fn tracks_count(&self) -> u32 {
        self.nb_media
    }
}

impl PartialEq for Subscription {
    fn eq(&self, other: &Self) -> bool {
        if self.id != 0 && other.id != 0 {
            return self.id == other.id;
        }
        self.service == other.service && self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip_preserves_every_field() {
        let mut sub = Subscription::new(6, ServiceKind::Podcast, "Linux After Dark");
        sub.flags.insert(StateFlags::FAVORITE);
        sub.parent_id = 3;
        sub.artwork_url = Some("https://feeds.example.com/art.png".to_string());
        sub.cached_size = 250_000_000;
        sub.max_cached_size = 500_000_000;
        sub.nb_media = 12;
        sub.nb_unplayed_media = 2;

        let encoded = serde_json::to_string(&sub).unwrap();
        let decoded: Subscription = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, sub);
        assert_eq!(decoded.flags, sub.flags);
        assert_eq!(decoded.service, sub.service);
        assert_eq!(decoded.parent_id, sub.parent_id);
        assert_eq!(decoded.artwork_url, sub.artwork_url);
        assert_eq!(decoded.cached_size, sub.cached_size);
        assert_eq!(decoded.max_cached_size, sub.max_cached_size);
        assert_eq!(decoded.nb_media, sub.nb_media);
        assert_eq!(decoded.nb_unplayed_media, sub.nb_unplayed_media);
    }
}
