//! Transient and persisted UI-relevant markers carried by every catalog item.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A small typed flag set over a stable bit layout.
///
/// The bit layout is part of the cross-process contract and must not change:
/// `SELECTED = 1`, `FAVORITE = 2`, `STORAGE = 4`. The favorite bit is a
/// best-effort mirror of the backend-persisted favorite state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateFlags(u32);

impl StateFlags {
    pub const NONE: StateFlags = StateFlags(0);
    pub const SELECTED: StateFlags = StateFlags(1 << 0);
    pub const FAVORITE: StateFlags = StateFlags(1 << 1);
    pub const STORAGE: StateFlags = StateFlags(1 << 2);

    pub const fn from_bits(bits: u32) -> Self {
        StateFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: StateFlags) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn insert(&mut self, other: StateFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: StateFlags) {
        self.0 &= !other.0;
    }

    /// Order-independent toggle: flips every bit in `other`.
    pub fn toggle(&mut self, other: StateFlags) {
        self.0 ^= other.0;
    }

    pub fn set(&mut self, other: StateFlags, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl BitOr for StateFlags {
    type Output = StateFlags;

    fn bitor(self, rhs: StateFlags) -> StateFlags {
        StateFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for StateFlags {
    fn bitor_assign(&mut self, rhs: StateFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for StateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_layout_is_stable() {
        assert_eq!(StateFlags::NONE.bits(), 0);
        assert_eq!(StateFlags::SELECTED.bits(), 1);
        assert_eq!(StateFlags::FAVORITE.bits(), 2);
        assert_eq!(StateFlags::STORAGE.bits(), 4);
    }

    #[test]
    fn insert_remove_contains() {
        let mut flags = StateFlags::NONE;
        assert!(!flags.contains(StateFlags::SELECTED));

        flags.insert(StateFlags::SELECTED);
        flags.insert(StateFlags::FAVORITE);
        assert!(flags.contains(StateFlags::SELECTED));
        assert!(flags.contains(StateFlags::FAVORITE));
        assert!(flags.contains(StateFlags::SELECTED | StateFlags::FAVORITE));

        flags.remove(StateFlags::SELECTED);
        assert!(!flags.contains(StateFlags::SELECTED));
        assert!(flags.contains(StateFlags::FAVORITE));
    }

    #[test]
    fn toggle_is_order_independent() {
        let mut a = StateFlags::NONE;
        a.toggle(StateFlags::SELECTED);
        a.toggle(StateFlags::FAVORITE);

        let mut b = StateFlags::NONE;
        b.toggle(StateFlags::FAVORITE);
        b.toggle(StateFlags::SELECTED);

        assert_eq!(a, b);

        a.toggle(StateFlags::SELECTED);
        assert!(!a.contains(StateFlags::SELECTED));
        assert!(a.contains(StateFlags::FAVORITE));
    }

    #[test]
    fn empty_set_contains_nothing() {
        // contains() on the empty flag is false by convention, matching
        // the "has no marker" reading used by callers.
        assert!(!StateFlags::NONE.contains(StateFlags::NONE));
        assert!(!StateFlags::FAVORITE.contains(StateFlags::NONE));
    }
}
