//! Zone kinds and card location lookup.
//!
//! Ownership is decided by membership: a card belongs to whichever side's
//! zone contains it. Every executor finds its target through [`locate`]
//! instead of trusting a caller-supplied side.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{MatchState, Side, SideState};

/// A named zone on one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Hand,
    Deck,
    Board,
    Graveyard,
    Banished,
    SpellTrap,
    FieldSpell,
}

impl ZoneKind {
    /// Is this one of the on-field zones?
    #[must_use]
    pub fn is_field(self) -> bool {
        matches!(self, ZoneKind::Board | ZoneKind::SpellTrap | ZoneKind::FieldSpell)
    }
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ZoneKind::Hand => "hand",
            ZoneKind::Deck => "deck",
            ZoneKind::Board => "board",
            ZoneKind::Graveyard => "graveyard",
            ZoneKind::Banished => "banished zone",
            ZoneKind::SpellTrap => "spell/trap zone",
            ZoneKind::FieldSpell => "field spell zone",
        };
        f.write_str(name)
    }
}

/// Where a card was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub side: Side,
    pub zone: ZoneKind,
    /// Index within the zone (always 0 for the field-spell slot).
    pub index: usize,
}

/// Index of `card_id` in one side's `zone`.
#[must_use]
pub fn index_in(side: &SideState, card_id: CardId, zone: ZoneKind) -> Option<usize> {
    match zone {
        ZoneKind::Hand => side.hand.index_of(&card_id),
        ZoneKind::Deck => side.deck.index_of(&card_id),
        ZoneKind::Graveyard => side.graveyard.index_of(&card_id),
        ZoneKind::Banished => side.banished.index_of(&card_id),
        ZoneKind::Board => side.board_index(card_id),
        ZoneKind::SpellTrap => side.spell_trap_index(card_id),
        ZoneKind::FieldSpell => side
            .field_spell
            .as_ref()
            .filter(|f| f.card_id == card_id)
            .map(|_| 0),
    }
}

/// Locate `card_id` in `zone` on either side, host first.
#[must_use]
pub fn locate(state: &MatchState, card_id: CardId, zone: ZoneKind) -> Option<Location> {
    Side::ALL.into_iter().find_map(|side| locate_on(state, side, card_id, zone))
}

/// Locate `card_id` in `zone` on one side only.
#[must_use]
pub fn locate_on(state: &MatchState, side: Side, card_id: CardId, zone: ZoneKind) -> Option<Location> {
    index_in(state.side(side), card_id, zone).map(|index| Location { side, zone, index })
}

/// Locate `card_id` in the first of `zones` that holds it, host first within each zone.
#[must_use]
pub fn locate_any(state: &MatchState, card_id: CardId, zones: &[ZoneKind]) -> Option<Location> {
    zones.iter().find_map(|zone| locate(state, card_id, *zone))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{BoardCard, CardDefinition, Position, ZoneCard};
    use crate::core::{LobbyRef, MatchId, SideMap, UserRef};

    fn state() -> MatchState {
        let mut state = MatchState::new(
            MatchId::new("m"),
            LobbyRef("l".into()),
            SideMap::new(|s| UserRef(s.to_string())),
            SideMap::default(),
        );
        let def = CardDefinition::monster(CardId::new(10), "Knight", 4, 1800, 1000);
        state
            .side_mut(Side::Opponent)
            .board
            .push_back(BoardCard::from_definition(&def, Position::Attack, false, 1));
        state.side_mut(Side::Host).graveyard.push_back(CardId::new(11));
        state.side_mut(Side::Opponent).field_spell = Some(ZoneCard::face_up(CardId::new(12), 1));
        state
    }

    #[test]
    fn test_locate_by_membership() {
        let state = state();
        let loc = locate(&state, CardId::new(10), ZoneKind::Board).unwrap();
        assert_eq!(loc.side, Side::Opponent);
        assert_eq!(loc.index, 0);

        assert!(locate(&state, CardId::new(10), ZoneKind::Hand).is_none());
        assert_eq!(
            locate(&state, CardId::new(12), ZoneKind::FieldSpell).map(|l| l.side),
            Some(Side::Opponent)
        );
    }

    #[test]
    fn test_locate_on_one_side() {
        let state = state();
        assert!(locate_on(&state, Side::Host, CardId::new(11), ZoneKind::Graveyard).is_some());
        assert!(locate_on(&state, Side::Opponent, CardId::new(11), ZoneKind::Graveyard).is_none());
    }

    #[test]
    fn test_locate_any_order() {
        let state = state();
        let loc = locate_any(&state, CardId::new(12), &[ZoneKind::Board, ZoneKind::SpellTrap, ZoneKind::FieldSpell]);
        assert_eq!(loc.map(|l| l.zone), Some(ZoneKind::FieldSpell));
    }
}
