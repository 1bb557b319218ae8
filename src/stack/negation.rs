//! Negation of chain links.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{CardId, CardLookup, CardType, SpellKind};
use crate::core::{EngineError, EngineResult, MatchState};
use crate::effects::{Applied, FailureKind, OutcomeDetail, Rejected, Step};
use crate::store::EventType;

/// What a negation cancels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NegateScope {
    /// The activation itself; the card is treated as never having been activated.
    Activation,
    /// Only the effect; the card still counts as activated.
    Effect,
}

/// Card types a negation effect may target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NegateFilter {
    #[default]
    Any,
    Monster,
    Spell,
    Trap,
    /// Equip spells only.
    Equipment,
}

impl NegateFilter {
    /// Does a card of `card_type` pass this filter?
    #[must_use]
    pub fn matches(self, card_type: CardType) -> bool {
        match self {
            NegateFilter::Any => true,
            NegateFilter::Monster => card_type.is_monster(),
            NegateFilter::Spell => card_type.is_spell(),
            NegateFilter::Trap => card_type.is_trap(),
            NegateFilter::Equipment => card_type.spell_kind() == Some(SpellKind::Equip),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NegateFilter::Any => "any",
            NegateFilter::Monster => "monster",
            NegateFilter::Spell => "spell",
            NegateFilter::Trap => "trap",
            NegateFilter::Equipment => "equipment",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown negation filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for NegateFilter {
    type Err = UnknownFilter;

    /// Parse a filter name. Older card text uses `creature` for monsters
    /// and `equip` for equipment; both are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "card" | "" => Ok(NegateFilter::Any),
            "monster" | "creature" => Ok(NegateFilter::Monster),
            "spell" => Ok(NegateFilter::Spell),
            "trap" => Ok(NegateFilter::Trap),
            "equipment" | "equip" => Ok(NegateFilter::Equipment),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

/// Negate the topmost active chain link for `card_id`.
///
/// Fails with `NOT_ON_CHAIN` when the card has no active link, then with
/// `TYPE_MISMATCH` when its type does not pass `filter`. The card stays
/// where it is; the caller decides what a negated link means.
pub fn negate(
    state: &mut MatchState,
    cards: &dyn CardLookup,
    card_id: CardId,
    scope: NegateScope,
    filter: NegateFilter,
) -> EngineResult<Step> {
    let Some(index) = state.current_chain.active_index(card_id) else {
        return Ok(Err(Rejected::new(
            FailureKind::NotOnChain,
            format!("{} has no active chain link", cards.name_of(card_id)),
        )));
    };

    if filter != NegateFilter::Any {
        let def = cards
            .card_definition(card_id)
            .ok_or(EngineError::UnknownCard(card_id))?;
        if !filter.matches(def.card_type) {
            return Ok(Err(Rejected::new(
                FailureKind::TypeMismatch,
                format!("{} is not a {} card", def.name, filter.as_str()),
            )));
        }
    }

    state.current_chain.negate(index, scope);

    let message = match scope {
        NegateScope::Activation => format!("Negated the activation of {}", cards.name_of(card_id)),
        NegateScope::Effect => format!("Negated the effect of {}", cards.name_of(card_id)),
    };
    Ok(Ok(Applied::new(EventType::ActivationNegated, message)
        .with_detail(OutcomeDetail::ChainLink { card_id, index })
        .with_card("card_id", card_id)
        .with_meta("chain_index", index as i64)))
}
