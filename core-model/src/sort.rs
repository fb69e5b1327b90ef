//! Type-agnostic sort contract shared by every listing operation.

use serde::{Deserialize, Serialize};

/// Sort criterion. Each entity variant honors the subset meaningful to it
/// and falls back to its default ordering for unsupported keys; an
/// unsupported key is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortKey {
    #[default]
    Default,
    Alpha,
    Duration,
    InsertionDate,
    LastModificationDate,
    ReleaseDate,
    FileSize,
    Artist,
    PlayCount,
    Album,
    Filename,
    TrackNumber,
}

/// A sort key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Sort {
    pub key: SortKey,
    pub desc: bool,
}

impl Sort {
    pub fn by(key: SortKey) -> Self {
        Sort { key, desc: false }
    }

    pub fn descending(key: SortKey) -> Self {
        Sort { key, desc: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sort_is_ascending_default_key() {
        let sort = Sort::default();
        assert_eq!(sort.key, SortKey::Default);
        assert!(!sort.desc);
    }

    #[test]
    fn constructors_set_direction() {
        assert!(!Sort::by(SortKey::Alpha).desc);
        assert!(Sort::descending(SortKey::Duration).desc);
    }
}
