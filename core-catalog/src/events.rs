//! Catalog change notifications.
//!
//! Listener traits with no-op defaults; UI layers implement only the
//! callbacks they render. Registration is by `Arc` identity, so the same
//! listener object can be removed later without an id scheme. Callbacks
//! fire on the caller's task after the backend call succeeds.

use parking_lot::RwLock;
use std::sync::Arc;

pub trait MediaListener: Send + Sync {
    fn on_media_added(&self) {}
    fn on_media_modified(&self) {}
    fn on_media_deleted(&self, _ids: &[i64]) {}
}

pub trait ArtistsListener: Send + Sync {
    fn on_artists_added(&self) {}
    fn on_artists_modified(&self) {}
    fn on_artists_deleted(&self) {}
}

pub trait AlbumsListener: Send + Sync {
    fn on_albums_added(&self) {}
    fn on_albums_modified(&self) {}
    fn on_albums_deleted(&self) {}
}

pub trait GenresListener: Send + Sync {
    fn on_genres_added(&self) {}
    fn on_genres_modified(&self) {}
    fn on_genres_deleted(&self) {}
}

pub trait PlaylistsListener: Send + Sync {
    fn on_playlists_added(&self) {}
    fn on_playlists_modified(&self) {}
    fn on_playlists_deleted(&self) {}
}

pub trait DiscoveryListener: Send + Sync {
    fn on_discovery_started(&self) {}
    fn on_discovery_progress(&self, _entry_point: &str) {}
    fn on_discovery_completed(&self) {}
    fn on_discovery_failed(&self, _entry_point: &str) {}
    fn on_parsing_progress(&self, _done: u32, _scheduled: u32) {}
    fn on_reload_started(&self, _entry_point: &str) {}
    fn on_reload_completed(&self, _entry_point: &str) {}
}

pub trait EntryPointListener: Send + Sync {
    fn on_entry_point_added(&self, _entry_point: &str, _success: bool) {}
    fn on_entry_point_removed(&self, _entry_point: &str, _success: bool) {}
    fn on_entry_point_banned(&self, _entry_point: &str, _success: bool) {}
    fn on_entry_point_unbanned(&self, _entry_point: &str, _success: bool) {}
}

pub trait IdleListener: Send + Sync {
    fn on_idle_changed(&self, _idle: bool) {}
}

struct Listeners<T: ?Sized> {
    entries: RwLock<Vec<Arc<T>>>,
}

impl<T: ?Sized> Default for Listeners<T> {
    fn default() -> Self {
        Listeners {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<T: ?Sized> Listeners<T> {
    fn add(&self, listener: Arc<T>) {
        let mut entries = self.entries.write();
        if !entries.iter().any(|e| Arc::ptr_eq(e, &listener)) {
            entries.push(listener);
        }
    }

    fn remove(&self, listener: &Arc<T>) {
        self.entries.write().retain(|e| !Arc::ptr_eq(e, listener));
    }

    fn each(&self, f: impl Fn(&T)) {
        let snapshot: Vec<Arc<T>> = self.entries.read().clone();
        for listener in &snapshot {
            f(listener);
        }
    }
}

/// Fan-out point for every listener family.
#[derive(Default)]
pub struct EventHub {
    media: Listeners<dyn MediaListener>,
    artists: Listeners<dyn ArtistsListener>,
    albums: Listeners<dyn AlbumsListener>,
    genres: Listeners<dyn GenresListener>,
    playlists: Listeners<dyn PlaylistsListener>,
    discovery: Listeners<dyn DiscoveryListener>,
    entry_points: Listeners<dyn EntryPointListener>,
    idle: Listeners<dyn IdleListener>,
}

impl EventHub {
    pub fn new() -> Self {
        EventHub::default()
    }

    pub fn add_media_listener(&self, listener: Arc<dyn MediaListener>) {
        self.media.add(listener);
    }

    pub fn remove_media_listener(&self, listener: &Arc<dyn MediaListener>) {
        self.media.remove(listener);
    }

    pub fn add_artists_listener(&self, listener: Arc<dyn ArtistsListener>) {
        self.artists.add(listener);
    }

    pub fn remove_artists_listener(&self, listener: &Arc<dyn ArtistsListener>) {
        self.artists.remove(listener);
    }

    pub fn add_albums_listener(&self, listener: Arc<dyn AlbumsListener>) {
        self.albums.add(listener);
    }

    pub fn remove_albums_listener(&self, listener: &Arc<dyn AlbumsListener>) {
        self.albums.remove(listener);
    }

    pub fn add_genres_listener(&self, listener: Arc<dyn GenresListener>) {
        self.genres.add(listener);
    }

    pub fn remove_genres_listener(&self, listener: &Arc<dyn GenresListener>) {
        self.genres.remove(listener);
    }

    pub fn add_playlists_listener(&self, listener: Arc<dyn PlaylistsListener>) {
        self.playlists.add(listener);
    }

    pub fn remove_playlists_listener(&self, listener: &Arc<dyn PlaylistsListener>) {
        self.playlists.remove(listener);
    }

    pub fn add_discovery_listener(&self, listener: Arc<dyn DiscoveryListener>) {
        self.discovery.add(listener);
    }

    pub fn remove_discovery_listener(&self, listener: &Arc<dyn DiscoveryListener>) {
        self.discovery.remove(listener);
    }

    pub fn add_entry_point_listener(&self, listener: Arc<dyn EntryPointListener>) {
        self.entry_points.add(listener);
    }

    pub fn remove_entry_point_listener(&self, listener: &Arc<dyn EntryPointListener>) {
        self.entry_points.remove(listener);
    }

    pub fn add_idle_listener(&self, listener: Arc<dyn IdleListener>) {
        self.idle.add(listener);
    }

    pub fn remove_idle_listener(&self, listener: &Arc<dyn IdleListener>) {
        self.idle.remove(listener);
    }

    pub(crate) fn notify_media_added(&self) {
        self.media.each(|l| l.on_media_added());
    }

    pub(crate) fn notify_media_modified(&self) {
        self.media.each(|l| l.on_media_modified());
    }

    pub(crate) fn notify_media_deleted(&self, ids: &[i64]) {
        self.media.each(|l| l.on_media_deleted(ids));
    }

    pub(crate) fn notify_artists_modified(&self) {
        self.artists.each(|l| l.on_artists_modified());
    }

    pub(crate) fn notify_albums_modified(&self) {
        self.albums.each(|l| l.on_albums_modified());
    }

    pub(crate) fn notify_genres_modified(&self) {
        self.genres.each(|l| l.on_genres_modified());
    }

    pub(crate) fn notify_playlists_added(&self) {
        self.playlists.each(|l| l.on_playlists_added());
    }

    pub(crate) fn notify_playlists_modified(&self) {
        self.playlists.each(|l| l.on_playlists_modified());
    }

    pub(crate) fn notify_playlists_deleted(&self) {
        self.playlists.each(|l| l.on_playlists_deleted());
    }

    pub(crate) fn notify_discovery_started(&self) {
        self.discovery.each(|l| l.on_discovery_started());
    }

    pub(crate) fn notify_discovery_progress(&self, entry_point: &str) {
        self.discovery.each(|l| l.on_discovery_progress(entry_point));
    }

    pub(crate) fn notify_discovery_completed(&self) {
        self.discovery.each(|l| l.on_discovery_completed());
    }

    pub(crate) fn notify_discovery_failed(&self, entry_point: &str) {
        self.discovery.each(|l| l.on_discovery_failed(entry_point));
    }

    pub(crate) fn notify_reload_started(&self, entry_point: &str) {
        self.discovery.each(|l| l.on_reload_started(entry_point));
    }

    pub(crate) fn notify_reload_completed(&self, entry_point: &str) {
        self.discovery.each(|l| l.on_reload_completed(entry_point));
    }

    pub(crate) fn notify_entry_point_added(&self, entry_point: &str, success: bool) {
        self.entry_points
            .each(|l| l.on_entry_point_added(entry_point, success));
    }

    pub(crate) fn notify_entry_point_removed(&self, entry_point: &str, success: bool) {
        self.entry_points
            .each(|l| l.on_entry_point_removed(entry_point, success));
    }

    pub(crate) fn notify_entry_point_banned(&self, entry_point: &str, success: bool) {
        self.entry_points
            .each(|l| l.on_entry_point_banned(entry_point, success));
    }

    pub(crate) fn notify_entry_point_unbanned(&self, entry_point: &str, success: bool) {
        self.entry_points
            .each(|l| l.on_entry_point_unbanned(entry_point, success));
    }

    pub(crate) fn notify_idle_changed(&self, idle: bool) {
        self.idle.each(|l| l.on_idle_changed(idle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Counter {
        added: AtomicU32,
    }

    impl MediaListener for Counter {
        fn on_media_added(&self) {
            self.added.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn listeners_are_registered_once_and_removable() {
        let hub = EventHub::new();
        let counter = Arc::new(Counter::default());
        let as_listener: Arc<dyn MediaListener> = counter.clone();

        hub.add_media_listener(as_listener.clone());
        hub.add_media_listener(as_listener.clone());
        hub.notify_media_added();
        assert_eq!(counter.added.load(Ordering::SeqCst), 1);

        hub.remove_media_listener(&as_listener);
        hub.notify_media_added();
        assert_eq!(counter.added.load(Ordering::SeqCst), 1);
    }
}
