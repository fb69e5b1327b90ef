//! Paging and media filter conventions shared by every listing operation.

use serde::{Deserialize, Serialize};

/// Zero-based offset/limit window.
///
/// A limit of zero or less means "unbounded"; an offset past the end of the
/// result yields an empty list, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub limit: i64,
    pub offset: i64,
}

impl Paging {
    pub fn new(limit: i64, offset: i64) -> Self {
        Paging { limit, offset }
    }

    /// The unbounded window starting at zero.
    pub fn all() -> Self {
        Paging {
            limit: 0,
            offset: 0,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.limit <= 0
    }

    /// LIMIT value for SQLite, where `-1` means no limit.
    pub fn sql_limit(&self) -> i64 {
        if self.is_unbounded() {
            -1
        } else {
            self.limit
        }
    }

    pub fn sql_offset(&self) -> i64 {
        self.offset.max(0)
    }

    /// Apply the window to an in-memory result, clamping out-of-range
    /// offsets to an empty slice.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = self.sql_offset() as usize;
        if start >= items.len() {
            return Vec::new();
        }
        let end = if self.is_unbounded() {
            items.len()
        } else {
            (start + self.limit as usize).min(items.len())
        };
        items[start..end].to_vec()
    }
}

impl Default for Paging {
    fn default() -> Self {
        Paging::all()
    }
}

/// The two boolean filters recurring across media-returning operations.
///
/// Defaults to `(include_missing = true, only_favorites = false)`, matching
/// the convenience overloads of the query contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFilter {
    /// Include entries whose underlying file is no longer found on disk.
    pub include_missing: bool,
    /// Restrict to favorite-flagged entries.
    pub only_favorites: bool,
}

impl MediaFilter {
    pub fn favorites() -> Self {
        MediaFilter {
            include_missing: true,
            only_favorites: true,
        }
    }

    pub fn present_only() -> Self {
        MediaFilter {
            include_missing: false,
            only_favorites: false,
        }
    }
}

impl Default for MediaFilter {
    fn default() -> Self {
        MediaFilter {
            include_missing: true,
            only_favorites: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_windows_the_slice() {
        let items = vec![1, 2, 3, 4, 5];
        assert_eq!(Paging::new(2, 0).apply(&items), vec![1, 2]);
        assert_eq!(Paging::new(2, 2).apply(&items), vec![3, 4]);
        assert_eq!(Paging::new(2, 4).apply(&items), vec![5]);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let items = vec![1, 2, 3];
        assert!(Paging::new(2, 3).apply(&items).is_empty());
        assert!(Paging::new(2, 100).apply(&items).is_empty());
    }

    #[test]
    fn zero_or_negative_limit_is_unbounded() {
        let items = vec![1, 2, 3];
        assert_eq!(Paging::new(0, 1).apply(&items), vec![2, 3]);
        assert_eq!(Paging::new(-5, 0).apply(&items), items);
        assert_eq!(Paging::new(0, 0).sql_limit(), -1);
    }

    #[test]
    fn default_filter_matches_convenience_overloads() {
        let filter = MediaFilter::default();
        assert!(filter.include_missing);
        assert!(!filter.only_favorites);
    }
}
