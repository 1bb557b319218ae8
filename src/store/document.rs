//! Match document access.
//!
//! The engine sees the match store through two calls: read the whole
//! document, and patch the top-level fields that changed. `MatchPatch`
//! carries only those fields, so two patches that touch different fields
//! never overwrite each other.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{EngineError, EngineResult, MatchId, MatchState, MatchStatus, Side, SideMap, SideState};
use crate::rules::Phase;
use crate::stack::Chain;

/// Partial update of a match document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPatch {
    pub sides: SideMap<Option<SideState>>,
    pub current_phase: Option<Phase>,
    pub turn_number: Option<u32>,
    pub current_turn_player: Option<Side>,
    pub current_chain: Option<Chain>,
    pub status: Option<MatchStatus>,
    pub next_token_serial: Option<u32>,
}

fn changed<T: PartialEq + Clone>(before: &T, after: &T) -> Option<T> {
    (before != after).then(|| after.clone())
}

impl MatchPatch {
    /// Fields of `after` that differ from `before`.
    ///
    /// ```
    /// use rust_tcg::core::{LobbyRef, MatchId, MatchState, Side, SideMap, SideState, UserRef};
    /// use rust_tcg::store::MatchPatch;
    ///
    /// let before = MatchState::new(
    ///     MatchId::new("m"),
    ///     LobbyRef("l".into()),
    ///     SideMap::new(|s| UserRef(s.to_string())),
    ///     SideMap::new(|_| SideState::new([], 8000)),
    /// );
    /// let mut after = before.clone();
    /// after.side_mut(Side::Opponent).life_points = 7000;
    ///
    /// let patch = MatchPatch::diff(&before, &after);
    /// assert!(patch.sides[Side::Host].is_none());
    /// assert_eq!(patch.sides[Side::Opponent].as_ref().map(|s| s.life_points), Some(7000));
    /// assert_eq!(patch.changed_fields(), 1);
    /// ```
    #[must_use]
    pub fn diff(before: &MatchState, after: &MatchState) -> Self {
        Self {
            sides: SideMap::new(|side| changed(before.side(side), after.side(side))),
            current_phase: changed(&before.current_phase, &after.current_phase),
            turn_number: changed(&before.turn_number, &after.turn_number),
            current_turn_player: changed(&before.current_turn_player, &after.current_turn_player),
            current_chain: changed(&before.current_chain, &after.current_chain),
            status: changed(&before.status, &after.status),
            next_token_serial: changed(&before.next_token_serial, &after.next_token_serial),
        }
    }

    /// Number of top-level fields this patch writes.
    #[must_use]
    pub fn changed_fields(&self) -> usize {
        let sides = self.sides.iter().filter(|(_, s)| s.is_some()).count();
        sides
            + usize::from(self.current_phase.is_some())
            + usize::from(self.turn_number.is_some())
            + usize::from(self.current_turn_player.is_some())
            + usize::from(self.current_chain.is_some())
            + usize::from(self.status.is_some())
            + usize::from(self.next_token_serial.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed_fields() == 0
    }

    /// Write the patched fields into `state`.
    pub fn apply(self, state: &mut MatchState) {
        let MatchPatch {
            sides,
            current_phase,
            turn_number,
            current_turn_player,
            current_chain,
            status,
            next_token_serial,
        } = self;

        for side in Side::ALL {
            if let Some(side_state) = sides.get(side).clone() {
                state.sides[side] = side_state;
            }
        }
        if let Some(phase) = current_phase {
            state.current_phase = phase;
        }
        if let Some(turn) = turn_number {
            state.turn_number = turn;
        }
        if let Some(player) = current_turn_player {
            state.current_turn_player = player;
        }
        if let Some(chain) = current_chain {
            state.current_chain = chain;
        }
        if let Some(status) = status {
            state.status = status;
        }
        if let Some(serial) = next_token_serial {
            state.next_token_serial = serial;
        }
    }
}

/// Read/patch access to match documents.
pub trait MatchStore {
    /// Read the latest committed document.
    fn read_match(&self, id: &MatchId) -> EngineResult<MatchState>;

    /// Commit a partial update.
    fn patch_match(&mut self, id: &MatchId, patch: MatchPatch) -> EngineResult<()>;
}

/// In-memory match store.
///
/// Documents are held as `MatchState` values; `snapshot` and `restore`
/// move them in and out as bincode bytes.
#[derive(Clone, Debug, Default)]
pub struct MemoryMatchStore {
    matches: FxHashMap<MatchId, MatchState>,
    patches: usize,
}

impl MemoryMatchStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a whole document.
    pub fn insert(&mut self, state: MatchState) {
        self.matches.insert(state.match_id.clone(), state);
    }

    #[must_use]
    pub fn get(&self, id: &MatchId) -> Option<&MatchState> {
        self.matches.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &MatchId) -> bool {
        self.matches.contains_key(id)
    }

    /// Total patches committed across all matches.
    #[must_use]
    pub fn patch_count(&self) -> usize {
        self.patches
    }

    /// Serialize a document to bytes.
    pub fn snapshot(&self, id: &MatchId) -> EngineResult<Vec<u8>> {
        let state = self.matches.get(id).ok_or_else(|| EngineError::MatchNotFound(id.clone()))?;
        Ok(bincode::serialize(state)?)
    }

    /// Load a document from bytes, replacing any document with the same id.
    pub fn restore(&mut self, bytes: &[u8]) -> EngineResult<MatchId> {
        let state: MatchState = bincode::deserialize(bytes)?;
        let id = state.match_id.clone();
        self.insert(state);
        Ok(id)
    }
}

impl MatchStore for MemoryMatchStore {
    fn read_match(&self, id: &MatchId) -> EngineResult<MatchState> {
        self.matches
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::MatchNotFound(id.clone()))
    }

    fn patch_match(&mut self, id: &MatchId, patch: MatchPatch) -> EngineResult<()> {
        let state = self
            .matches
            .get_mut(id)
            .ok_or_else(|| EngineError::MatchNotFound(id.clone()))?;
        patch.apply(state);
        self.patches += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{BoardCard, CardDefinition, CardId, Position};
    use crate::core::{LobbyRef, UserRef};

    fn state(id: &str) -> MatchState {
        MatchState::new(
            MatchId::new(id),
            LobbyRef("l".into()),
            SideMap::new(|s| UserRef(s.to_string())),
            SideMap::new(|side| match side {
                Side::Host => SideState::new([CardId::new(1), CardId::new(2)], 8000),
                Side::Opponent => SideState::new([CardId::new(3), CardId::new(4)], 8000),
            }),
        )
    }

    #[test]
    fn test_diff_only_changed_fields() {
        let before = state("m");
        let mut after = before.clone();
        after.current_phase = Phase::Main1;
        after.current_chain.push(CardId::new(9), Side::Host);

        let patch = MatchPatch::diff(&before, &after);
        assert_eq!(patch.changed_fields(), 2);
        assert_eq!(patch.current_phase, Some(Phase::Main1));
        assert!(patch.sides[Side::Host].is_none());
        assert!(MatchPatch::diff(&before, &before).is_empty());
    }

    #[test]
    fn test_patches_do_not_clobber_each_other() {
        let mut store = MemoryMatchStore::new();
        store.insert(state("m"));
        let id = MatchId::new("m");

        let base = store.read_match(&id).unwrap();
        let mut host_write = base.clone();
        host_write.side_mut(Side::Host).life_points = 100;
        let mut opponent_write = base.clone();
        opponent_write.side_mut(Side::Opponent).breakdowns_caused = 1;

        store.patch_match(&id, MatchPatch::diff(&base, &host_write)).unwrap();
        store.patch_match(&id, MatchPatch::diff(&base, &opponent_write)).unwrap();

        let latest = store.read_match(&id).unwrap();
        assert_eq!(latest.side(Side::Host).life_points, 100);
        assert_eq!(latest.side(Side::Opponent).breakdowns_caused, 1);
        assert_eq!(store.patch_count(), 2);
    }

    #[test]
    fn test_missing_match() {
        let mut store = MemoryMatchStore::new();
        let id = MatchId::new("nope");
        assert_eq!(store.read_match(&id).unwrap_err(), EngineError::MatchNotFound(id.clone()));
        assert!(store.patch_match(&id, MatchPatch::default()).is_err());
        assert!(store.snapshot(&id).is_err());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut store = MemoryMatchStore::new();
        let mut original = state("m");
        let def = CardDefinition::monster(CardId::new(3), "Knight", 4, 1800, 1000);
        let mut card = BoardCard::from_definition(&def, Position::Defense, true, 1);
        card.equipped_cards.push(CardId::new(4));
        original.side_mut(Side::Opponent).board.push_back(card);
        store.insert(original.clone());

        let bytes = store.snapshot(&original.match_id).unwrap();
        let mut other = MemoryMatchStore::new();
        let id = other.restore(&bytes).unwrap();

        assert_eq!(id, original.match_id);
        assert_eq!(other.get(&id), Some(&original));
    }
}
