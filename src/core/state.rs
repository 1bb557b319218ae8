//! Match state: the authoritative document for one match.
//!
//! ## SideState
//!
//! Everything one side owns: its zones, life points, and per-turn flags.
//! Zones are `im::Vector`s so reading a snapshot of the document and
//! diffing it after an executor runs are both cheap.
//!
//! ## MatchState
//!
//! Identity, both sides (indexed by `Side`), and the shared turn, phase,
//! and chain state.
//!
//! A card identifier is never present in two zones at once: every
//! executor removes a card from its source before adding it to its
//! destination within the same patch.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::player::{Side, SideMap};
use crate::cards::{BoardCard, CardId, ZoneCard};
use crate::rules::Phase;
use crate::stack::Chain;

/// Match identifier issued by the match store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub String);

impl MatchId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a user account, owned by an external service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef(pub String);

/// Reference to the lobby a match was created from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LobbyRef(pub String);

/// Lifecycle status of a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    Active,
    /// The match is over. `winner: None` is a draw.
    Completed { winner: Option<Side> },
}

impl MatchStatus {
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, MatchStatus::Completed { .. })
    }
}

/// Zones and scalars for one side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideState {
    pub hand: Vector<CardId>,
    /// Ordered, index 0 is the top of the deck.
    pub deck: Vector<CardId>,
    pub board: Vector<BoardCard>,
    pub graveyard: Vector<CardId>,
    pub banished: Vector<CardId>,
    pub spell_trap_zone: Vector<ZoneCard>,
    pub field_spell: Option<ZoneCard>,
    pub life_points: i64,
    /// Breakdowns this side has inflicted on the opponent.
    pub breakdowns_caused: u32,
    pub normal_summoned_this_turn: bool,
}

impl SideState {
    /// Create a side with a deck and starting life points.
    #[must_use]
    pub fn new(deck: impl IntoIterator<Item = CardId>, life_points: i64) -> Self {
        Self {
            deck: deck.into_iter().collect(),
            life_points,
            ..Self::default()
        }
    }

    /// Index of a monster on the board.
    #[must_use]
    pub fn board_index(&self, card_id: CardId) -> Option<usize> {
        self.board.iter().position(|c| c.card_id == card_id)
    }

    #[must_use]
    pub fn board_card(&self, card_id: CardId) -> Option<&BoardCard> {
        self.board.iter().find(|c| c.card_id == card_id)
    }

    pub fn board_card_mut(&mut self, card_id: CardId) -> Option<&mut BoardCard> {
        self.board.iter_mut().find(|c| c.card_id == card_id)
    }

    /// Index of a card in the spell/trap zone.
    #[must_use]
    pub fn spell_trap_index(&self, card_id: CardId) -> Option<usize> {
        self.spell_trap_zone.iter().position(|c| c.card_id == card_id)
    }

    /// Free board slots under `capacity`.
    #[must_use]
    pub fn board_slots_free(&self, capacity: usize) -> usize {
        capacity.saturating_sub(self.board.len())
    }

    /// Free spell/trap slots under `capacity`.
    #[must_use]
    pub fn spell_trap_slots_free(&self, capacity: usize) -> usize {
        capacity.saturating_sub(self.spell_trap_zone.len())
    }

    /// Count of `card_id` across every zone of this side.
    #[must_use]
    pub fn count_of(&self, card_id: CardId) -> usize {
        let plain = [&self.hand, &self.deck, &self.graveyard, &self.banished]
            .into_iter()
            .map(|zone| zone.iter().filter(|c| **c == card_id).count())
            .sum::<usize>();
        let board = self.board.iter().filter(|c| c.card_id == card_id).count();
        let spell_trap = self.spell_trap_zone.iter().filter(|c| c.card_id == card_id).count();
        let field = usize::from(self.field_spell.as_ref().is_some_and(|f| f.card_id == card_id));
        plain + board + spell_trap + field
    }

    /// Clear per-turn flags at the start of a new turn.
    pub fn reset_turn_flags(&mut self) {
        self.normal_summoned_this_turn = false;
        for card in self.board.iter_mut() {
            card.has_attacked = false;
            card.has_changed_position = false;
        }
    }
}

/// The match document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub match_id: MatchId,
    pub lobby: LobbyRef,
    pub users: SideMap<UserRef>,
    pub sides: SideMap<SideState>,
    pub current_phase: Phase,
    pub turn_number: u32,
    pub current_turn_player: Side,
    pub current_chain: Chain,
    pub status: MatchStatus,
    /// Serial for the next synthetic token id.
    pub next_token_serial: u32,
}

impl MatchState {
    /// Create a match on turn 1, draw phase, host to move.
    #[must_use]
    pub fn new(match_id: MatchId, lobby: LobbyRef, users: SideMap<UserRef>, sides: SideMap<SideState>) -> Self {
        Self {
            match_id,
            lobby,
            users,
            sides,
            current_phase: Phase::Draw,
            turn_number: 1,
            current_turn_player: Side::Host,
            current_chain: Chain::new(),
            status: MatchStatus::Active,
            next_token_serial: 0,
        }
    }

    /// A side's zones.
    #[must_use]
    pub fn side(&self, side: Side) -> &SideState {
        &self.sides[side]
    }

    /// A side's zones, mutably.
    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        &mut self.sides[side]
    }

    /// Is it `side`'s turn?
    #[must_use]
    pub fn is_turn_of(&self, side: Side) -> bool {
        self.current_turn_player == side
    }

    /// Allocate the next synthetic token id.
    pub fn alloc_token_id(&mut self) -> CardId {
        let id = CardId::token(self.next_token_serial);
        self.next_token_serial += 1;
        id
    }

    /// Count of `card_id` across all zones of both sides.
    #[must_use]
    pub fn count_of(&self, card_id: CardId) -> usize {
        Side::ALL.iter().map(|s| self.sides[*s].count_of(card_id)).sum()
    }

    /// Find which side's board holds `card_id`.
    #[must_use]
    pub fn board_owner(&self, card_id: CardId) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|s| self.sides[*s].board_index(card_id).is_some())
    }
}
