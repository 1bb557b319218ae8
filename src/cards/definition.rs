//! Card definitions - static card templates.
//!
//! `CardDefinition` holds the immutable properties of a card: name,
//! type, level, and base stats. A board card's current attack and
//! defense live on the `BoardCard`; the template's base values never
//! change during a match.

use serde::{Deserialize, Serialize};

use super::ability::{ParsedAbility, Trigger};

/// Identifier for a card in a match.
///
/// Template cards use the template id directly. Tokens get synthetic ids
/// at or above [`CardId::TOKEN_BASE`] so they never collide with a
/// template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// First id reserved for synthetic token ids.
    pub const TOKEN_BASE: u32 = 0x8000_0000;

    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Create the id for the `serial`-th token of a match.
    #[must_use]
    pub const fn token(serial: u32) -> Self {
        Self(Self::TOKEN_BASE + serial)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this id was allocated for a token.
    #[must_use]
    pub const fn is_token_id(self) -> bool {
        self.0 >= Self::TOKEN_BASE
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_token_id() {
            write!(f, "Token({})", self.0 - Self::TOKEN_BASE)
        } else {
            write!(f, "Card({})", self.0)
        }
    }
}

/// Sub-kind of a spell card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellKind {
    /// Main phase only, goes to the graveyard after resolving.
    Normal,
    /// Can also be activated during battle phases and, once set, on the opponent's turn.
    QuickPlay,
    /// Stays on the field after resolving.
    Continuous,
    /// Attaches to a monster on the board.
    Equip,
    /// Occupies the field-spell slot.
    Field,
}

/// Card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Monster,
    Spell(SpellKind),
    Trap,
}

impl CardType {
    #[must_use]
    pub fn is_monster(self) -> bool {
        matches!(self, CardType::Monster)
    }

    #[must_use]
    pub fn is_spell(self) -> bool {
        matches!(self, CardType::Spell(_))
    }

    #[must_use]
    pub fn is_trap(self) -> bool {
        matches!(self, CardType::Trap)
    }

    /// Spell kind, if this is a spell.
    #[must_use]
    pub fn spell_kind(self) -> Option<SpellKind> {
        match self {
            CardType::Spell(kind) => Some(kind),
            _ => None,
        }
    }

    /// Does this card leave the field once its activation resolves?
    #[must_use]
    pub fn leaves_field_after_resolving(self) -> bool {
        matches!(
            self,
            CardType::Trap | CardType::Spell(SpellKind::Normal) | CardType::Spell(SpellKind::QuickPlay)
        )
    }
}

/// Card rarity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Static card template.
///
/// ## Example
///
/// ```
/// use rust_tcg::cards::{CardDefinition, CardId};
///
/// let dragon = CardDefinition::monster(CardId::new(1), "Sky Dragon", 7, 2500, 2000)
///     .with_archetype("dragons");
///
/// assert_eq!(dragon.level, 7);
/// assert!(dragon.card_type.is_monster());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub rarity: Rarity,
    pub archetype: String,
    pub card_type: CardType,
    /// Monster level (0 for spells and traps).
    pub level: u8,
    pub attack: i64,
    pub defense: i64,
    pub cost: i64,
    pub ability: ParsedAbility,
}

impl CardDefinition {
    /// Create a definition of the given type with zeroed stats.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id,
            name: name.into(),
            rarity: Rarity::default(),
            archetype: String::new(),
            card_type,
            level: 0,
            attack: 0,
            defense: 0,
            cost: 0,
            ability: ParsedAbility::default(),
        }
    }

    /// Create a monster definition.
    #[must_use]
    pub fn monster(id: CardId, name: impl Into<String>, level: u8, attack: i64, defense: i64) -> Self {
        let mut def = Self::new(id, name, CardType::Monster);
        def.level = level;
        def.attack = attack;
        def.defense = defense;
        def
    }

    /// Create a spell definition.
    #[must_use]
    pub fn spell(id: CardId, name: impl Into<String>, kind: SpellKind) -> Self {
        Self::new(id, name, CardType::Spell(kind))
    }

    /// Create a trap definition.
    #[must_use]
    pub fn trap(id: CardId, name: impl Into<String>) -> Self {
        Self::new(id, name, CardType::Trap)
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_archetype(mut self, archetype: impl Into<String>) -> Self {
        self.archetype = archetype.into();
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i64) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: ParsedAbility) -> Self {
        self.ability = ability;
        self
    }

    /// Does the parsed ability declare an on-destroy trigger?
    #[must_use]
    pub fn has_destroy_trigger(&self) -> bool {
        self.ability.has_trigger(Trigger::OnDestroy)
    }
}
