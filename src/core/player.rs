//! Side identification and per-side data storage.
//!
//! ## Side
//!
//! A match always has exactly two sides: the lobby host and the opponent.
//!
//! ## SideMap
//!
//! Per-side storage indexed by `Side`. Replaces the mirrored
//! `host*`/`opponent*` field pairs of a flat match document, so every
//! executor reaches a side's zones through one typed accessor.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// The player who created the lobby.
    Host,
    /// The player who joined the lobby.
    Opponent,
}

impl Side {
    /// Both sides, host first.
    ///
    /// Every sweep that visits both sides uses this order.
    pub const ALL: [Side; 2] = [Side::Host, Side::Opponent];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Host => Side::Opponent,
            Side::Opponent => Side::Host,
        }
    }

    /// Check if this is the host side.
    #[must_use]
    pub const fn is_host(self) -> bool {
        matches!(self, Side::Host)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Host => write!(f, "host"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

/// Per-side data storage.
///
/// ```
/// use rust_tcg::core::{Side, SideMap};
///
/// let mut life: SideMap<i64> = SideMap::with_value(8000);
/// life[Side::Opponent] -= 1000;
///
/// assert_eq!(life[Side::Host], 8000);
/// assert_eq!(life[Side::Opponent], 7000);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    host: T,
    opponent: T,
}

impl<T> SideMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            host: factory(Side::Host),
            opponent: factory(Side::Opponent),
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            host: value.clone(),
            opponent: value,
        }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Host => &self.host,
            Side::Opponent => &self.opponent,
        }
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Host => &mut self.host,
            Side::Opponent => &mut self.opponent,
        }
    }

    /// Replace a side's data, returning the previous value.
    pub fn set(&mut self, side: Side, value: T) -> T {
        std::mem::replace(self.get_mut(side), value)
    }

    /// Iterate over (Side, &T) pairs, host first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Host, &self.host), (Side::Opponent, &self.opponent)].into_iter()
    }

    /// Map both entries into a new `SideMap`.
    pub fn map<U>(&self, f: impl Fn(Side, &T) -> U) -> SideMap<U> {
        SideMap {
            host: f(Side::Host, &self.host),
            opponent: f(Side::Opponent, &self.opponent),
        }
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Host.opponent(), Side::Opponent);
        assert_eq!(Side::Opponent.opponent(), Side::Host);
        assert!(Side::Host.is_host());
        assert_eq!(format!("{}", Side::Opponent), "opponent");
    }

    #[test]
    fn test_side_map_new() {
        let map = SideMap::new(|s| if s.is_host() { 1 } else { 2 });
        assert_eq!(map[Side::Host], 1);
        assert_eq!(map[Side::Opponent], 2);
    }

    #[test]
    fn test_side_map_set_and_iter() {
        let mut map: SideMap<Vec<u32>> = SideMap::default();
        map[Side::Host].push(7);
        let old = map.set(Side::Opponent, vec![1, 2]);

        assert!(old.is_empty());
        let pairs: Vec<_> = map.iter().map(|(s, v)| (s, v.len())).collect();
        assert_eq!(pairs, vec![(Side::Host, 1), (Side::Opponent, 2)]);
    }

    #[test]
    fn test_side_map_serialization() {
        let map = SideMap::new(|s| s.is_host());
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SideMap<bool> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
