//! Parsed effect descriptors.
//!
//! An `Effect` is what the ability parser produces for one clause of card
//! text. The engine never sees ability text; it only executes these
//! descriptors against a chosen target.

use serde::{Deserialize, Serialize};

use super::summon::TokenSpec;
use crate::cards::Position;
use crate::stack::{NegateFilter, NegateScope};
use crate::zones::{DeckPosition, ZoneKind};

/// A parsed effect.
///
/// ## Zone Transitions
///
/// `Draw`, `ToHand`, `SendToGraveyard`, `Banish`, `ReturnToDeck`, `Destroy`
///
/// ## Stats and Resources
///
/// `ModifyAttack`, `ModifyDefense`, `GainLp`, `Damage`
///
/// ## Summons
///
/// `SpecialSummon`, `GenerateToken`
///
/// ## Chain and Breakdown
///
/// `Negate`, `AddViceCounter`, `ResetViceCounters`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Target: player (defaults to the actor).
    Draw { count: usize },

    /// Target: card.
    ToHand { from: ZoneKind },

    /// Target: card.
    SendToGraveyard { from: ZoneKind },

    /// Target: card.
    Banish { from: ZoneKind },

    /// Target: card.
    ReturnToDeck { from: ZoneKind, position: DeckPosition },

    /// Target: card on the field.
    Destroy,

    /// Target: board card.
    ModifyAttack { delta: i64 },

    /// Target: board card.
    ModifyDefense { delta: i64 },

    /// Target: player (defaults to the actor).
    GainLp { amount: i64 },

    /// Target: player (defaults to the actor's opponent).
    Damage { amount: i64 },

    /// Target: card in one of the actor's zones.
    SpecialSummon { from: ZoneKind, position: Position },

    /// Target: player whose board receives the tokens (defaults to the actor).
    GenerateToken(TokenSpec),

    /// Target: card on the chain.
    Negate { scope: NegateScope, filter: NegateFilter },

    /// Target: board card.
    AddViceCounter,

    /// Target: player whose board is cleared (defaults to the actor).
    ResetViceCounters,
}

impl Effect {
    /// Does this effect take a card as its target?
    #[must_use]
    pub fn targets_card(&self) -> bool {
        !matches!(
            self,
            Effect::Draw { .. }
                | Effect::GainLp { .. }
                | Effect::Damage { .. }
                | Effect::GenerateToken(_)
                | Effect::ResetViceCounters
        )
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Draw { .. } => "draw",
            Effect::ToHand { .. } => "to_hand",
            Effect::SendToGraveyard { .. } => "to_graveyard",
            Effect::Banish { .. } => "banish",
            Effect::ReturnToDeck { .. } => "return_to_deck",
            Effect::Destroy => "destroy",
            Effect::ModifyAttack { .. } => "modify_atk",
            Effect::ModifyDefense { .. } => "modify_def",
            Effect::GainLp { .. } => "gain_lp",
            Effect::Damage { .. } => "damage",
            Effect::SpecialSummon { .. } => "special_summon",
            Effect::GenerateToken(_) => "generate_token",
            Effect::Negate { .. } => "negate",
            Effect::AddViceCounter => "add_vice_counter",
            Effect::ResetViceCounters => "reset_vice_counters",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_card() {
        assert!(Effect::Destroy.targets_card());
        assert!(Effect::ModifyAttack { delta: 500 }.targets_card());
        assert!(!Effect::Draw { count: 2 }.targets_card());
        assert!(!Effect::Damage { amount: 100 }.targets_card());
        assert!(!Effect::ResetViceCounters.targets_card());
    }

    #[test]
    fn test_effect_serialization() {
        let effect = Effect::ReturnToDeck {
            from: ZoneKind::Graveyard,
            position: DeckPosition::Bottom,
        };
        let json = serde_json::to_string(&effect).unwrap();
        let deserialized: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(effect, deserialized);
        assert_eq!(effect.name(), "return_to_deck");
    }
}
