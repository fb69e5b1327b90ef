//! Aggregated search results across the entity types.

use crate::album::Album;
use crate::artist::Artist;
use crate::genre::Genre;
use crate::media::Media;
use crate::playlist::Playlist;
use serde::{Deserialize, Serialize};

/// One search pass over the whole catalog, grouped by type. Not an entity
/// itself; absent matches are empty arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchAggregate {
    pub tracks: Vec<Media>,
    pub videos: Vec<Media>,
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
    pub genres: Vec<Genre>,
    pub playlists: Vec<Playlist>,
}

impl SearchAggregate {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
            && self.videos.is_empty()
            && self.albums.is_empty()
            && self.artists.is_empty()
            && self.genres.is_empty()
            && self.playlists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_any_bucket_fills() {
        let mut results = SearchAggregate::default();
        assert!(results.is_empty());

        results.genres.push(Genre::new(1, "Jazz"));
        assert!(!results.is_empty());
    }
}
