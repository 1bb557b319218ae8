//! Card instances on the field.
//!
//! `BoardCard` is a monster occupying a board slot, with combat stats
//! that may differ from its template. `ZoneCard` is a spell or trap in a
//! spell/trap zone or the field-spell slot.
//!
//! ## Tokens
//!
//! A token is a `BoardCard` with `token: Some(..)`. It carries its own
//! cosmetic stats instead of a template reference and only ever exists on
//! a board.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardDefinition, CardId};

/// Battle position of a board card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Attack,
    Defense,
}

impl Position {
    /// Signed tag used by the match document (`1` attack, `-1` defense).
    #[must_use]
    pub const fn tag(self) -> i8 {
        match self {
            Position::Attack => 1,
            Position::Defense => -1,
        }
    }

    /// Decode a document tag. Any non-negative tag reads as attack.
    #[must_use]
    pub const fn from_tag(tag: i8) -> Self {
        if tag < 0 {
            Position::Defense
        } else {
            Position::Attack
        }
    }

    /// The other position.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Position::Attack => Position::Defense,
            Position::Defense => Position::Attack,
        }
    }
}

/// Inline stats of a token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenData {
    pub name: String,
    pub level: u8,
    pub attribute: String,
    pub monster_type: String,
}

/// A monster on a board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardCard {
    pub card_id: CardId,
    pub position: Position,
    /// Current attack, after modifiers.
    pub attack: i64,
    /// Current defense, after modifiers.
    pub defense: i64,
    pub is_face_down: bool,
    pub has_attacked: bool,
    pub has_changed_position: bool,
    pub turn_summoned: u32,
    pub token: Option<TokenData>,
    pub vice_counters: u32,
    pub equipped_cards: SmallVec<[CardId; 2]>,
    pub cannot_be_destroyed_by_effects: bool,
}

impl BoardCard {
    /// Create a board entry for a template card summoned on `turn`.
    #[must_use]
    pub fn from_definition(def: &CardDefinition, position: Position, face_down: bool, turn: u32) -> Self {
        Self {
            card_id: def.id,
            position,
            attack: def.attack,
            defense: def.defense,
            is_face_down: face_down,
            has_attacked: false,
            has_changed_position: false,
            turn_summoned: turn,
            token: None,
            vice_counters: 0,
            equipped_cards: SmallVec::new(),
            cannot_be_destroyed_by_effects: false,
        }
    }

    /// Create a token entry. Tokens are face-up and count as having
    /// already attacked on the turn they appear.
    #[must_use]
    pub fn token(card_id: CardId, data: TokenData, attack: i64, defense: i64, position: Position, turn: u32) -> Self {
        Self {
            card_id,
            position,
            attack: attack.max(0),
            defense: defense.max(0),
            is_face_down: false,
            has_attacked: true,
            has_changed_position: false,
            turn_summoned: turn,
            token: Some(data),
            vice_counters: 0,
            equipped_cards: SmallVec::new(),
            cannot_be_destroyed_by_effects: false,
        }
    }

    #[must_use]
    pub fn is_token(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn is_face_up(&self) -> bool {
        !self.is_face_down
    }

    #[must_use]
    pub fn in_attack_position(&self) -> bool {
        self.position == Position::Attack
    }

    /// Was this card summoned on `turn`?
    #[must_use]
    pub fn summoned_on(&self, turn: u32) -> bool {
        self.turn_summoned == turn
    }

    /// Stat this card uses when it is attacked.
    #[must_use]
    pub fn battle_stat(&self) -> i64 {
        match self.position {
            Position::Attack => self.attack,
            Position::Defense => self.defense,
        }
    }

    /// Detach an equip card. Returns false if it was not attached.
    pub fn detach_equip(&mut self, equip: CardId) -> bool {
        let before = self.equipped_cards.len();
        self.equipped_cards.retain(|c| *c != equip);
        self.equipped_cards.len() != before
    }
}

/// A spell or trap on the field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneCard {
    pub card_id: CardId,
    /// Board monster this card augments, for equip spells.
    pub equipped_to: Option<CardId>,
    pub is_face_down: bool,
    pub turn_set: u32,
}

impl ZoneCard {
    /// A face-down card set on `turn`.
    #[must_use]
    pub fn set(card_id: CardId, turn: u32) -> Self {
        Self {
            card_id,
            equipped_to: None,
            is_face_down: true,
            turn_set: turn,
        }
    }

    /// A face-up card placed on `turn`.
    #[must_use]
    pub fn face_up(card_id: CardId, turn: u32) -> Self {
        Self {
            card_id,
            equipped_to: None,
            is_face_down: false,
            turn_set: turn,
        }
    }

    /// A face-up equip card attached to `host`.
    #[must_use]
    pub fn equip(card_id: CardId, host: CardId, turn: u32) -> Self {
        Self {
            card_id,
            equipped_to: Some(host),
            is_face_down: false,
            turn_set: turn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tag() {
        assert_eq!(Position::Attack.tag(), 1);
        assert_eq!(Position::Defense.tag(), -1);
        assert_eq!(Position::from_tag(-1), Position::Defense);
        assert_eq!(Position::from_tag(0), Position::Attack);
        assert_eq!(Position::Attack.flipped(), Position::Defense);
    }

    #[test]
    fn test_board_card_from_definition() {
        let def = CardDefinition::monster(CardId::new(1), "Knight", 4, 1800, 1000);
        let card = BoardCard::from_definition(&def, Position::Defense, true, 3);

        assert_eq!(card.attack, 1800);
        assert_eq!(card.battle_stat(), 1000);
        assert!(card.is_face_down);
        assert!(card.summoned_on(3));
        assert!(!card.is_token());
    }

    #[test]
    fn test_token_flags() {
        let data = TokenData {
            name: "Sheep".into(),
            level: 1,
            attribute: "earth".into(),
            monster_type: "beast".into(),
        };
        let token = BoardCard::token(CardId::token(0), data, 0, -5, Position::Defense, 2);

        assert!(token.is_token());
        assert!(token.is_face_up());
        assert!(token.has_attacked);
        assert_eq!(token.defense, 0);
    }

    #[test]
    fn test_detach_equip() {
        let def = CardDefinition::monster(CardId::new(1), "Knight", 4, 1800, 1000);
        let mut card = BoardCard::from_definition(&def, Position::Attack, false, 1);
        card.equipped_cards.push(CardId::new(20));
        card.equipped_cards.push(CardId::new(21));

        assert!(card.detach_equip(CardId::new(20)));
        assert!(!card.detach_equip(CardId::new(20)));
        assert_eq!(card.equipped_cards.as_slice(), &[CardId::new(21)]);
    }
}
