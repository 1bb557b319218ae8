//! Summon executors: special summons and token generation.
//!
//! Both are bounded by `RulesConfig::board_capacity`, the same limit the
//! normal summon and the legal-move enumerator use.

use serde::{Deserialize, Serialize};

use super::resolver::ResolverContext;
use crate::cards::{BoardCard, CardId, Position, TokenData};
use crate::core::{EngineError, EngineResult, MatchState, Side};
use crate::effects::{Applied, FailureKind, OutcomeDetail, Rejected, Step};
use crate::store::EventType;
use crate::zones::{lift, locate_on, ZoneKind};

/// Parameters of a token-generation effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenSpec {
    pub name: String,
    pub attack: i64,
    pub defense: i64,
    pub level: u8,
    pub attribute: String,
    pub monster_type: String,
    pub count: usize,
    pub position: Position,
}

impl TokenSpec {
    /// One level-1 attack-position token.
    pub fn new(name: impl Into<String>, attack: i64, defense: i64) -> Self {
        Self {
            name: name.into(),
            attack,
            defense,
            level: 1,
            attribute: String::new(),
            monster_type: String::new(),
            count: 1,
            position: Position::Attack,
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, attribute: impl Into<String>, monster_type: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self.monster_type = monster_type.into();
        self
    }

    fn data(&self) -> TokenData {
        TokenData {
            name: self.name.clone(),
            level: self.level,
            attribute: self.attribute.clone(),
            monster_type: self.monster_type.clone(),
        }
    }
}

/// Special summon a monster from one of `side`'s own zones.
///
/// Bypasses the once-per-turn normal summon restriction but not board
/// capacity.
pub fn special_summon(
    state: &mut MatchState,
    ctx: &ResolverContext<'_>,
    side: Side,
    card_id: CardId,
    from: ZoneKind,
    position: Position,
) -> EngineResult<Step> {
    if !matches!(from, ZoneKind::Hand | ZoneKind::Deck | ZoneKind::Graveyard | ZoneKind::Banished) {
        return Ok(Err(Rejected::illegal(format!("cannot special summon from the {from}"))));
    }
    let Some(loc) = locate_on(state, side, card_id, from) else {
        return Ok(Err(Rejected::not_found(card_id, from)));
    };

    let def = ctx.cards.card_definition(card_id).ok_or(EngineError::UnknownCard(card_id))?;
    if !def.card_type.is_monster() {
        return Ok(Err(Rejected::illegal(format!("{} is not a monster", def.name))));
    }
    if state.side(side).board_slots_free(ctx.config.board_capacity) == 0 {
        return Ok(Err(Rejected::new(
            FailureKind::CapacityExceeded,
            format!("{side}'s board is full"),
        )));
    }

    if lift(state, loc).is_none() {
        return Ok(Err(Rejected::not_found(card_id, from)));
    }
    let card = BoardCard::from_definition(def, position, false, state.turn_number);
    state.side_mut(side).board.push_back(card);

    Ok(Ok(Applied::new(EventType::SpecialSummon, format!("Special summoned {} from {from}", def.name))
        .with_detail(OutcomeDetail::Summoned {
            card_id,
            owner: side,
            tributes: 0,
        })
        .with_card("card_id", card_id)
        .with_meta("position", i64::from(position.tag()))))
}

/// Create up to `spec.count` tokens on `side`'s board.
///
/// Creation stops at board capacity. A short run is still a success with
/// the created count reported; a full board is `CAPACITY_EXCEEDED`.
pub fn generate_token(state: &mut MatchState, ctx: &ResolverContext<'_>, side: Side, spec: &TokenSpec) -> Step {
    if spec.count == 0 {
        return Err(Rejected::illegal("token count must be at least 1"));
    }

    let free = state.side(side).board_slots_free(ctx.config.board_capacity);
    if free == 0 {
        return Err(Rejected::new(
            FailureKind::CapacityExceeded,
            format!("{side}'s board is full; no {} created", spec.name),
        )
        .with_detail(OutcomeDetail::Tokens {
            requested: spec.count,
            created: 0,
            ids: Vec::new(),
        }));
    }

    let created = spec.count.min(free);
    let turn = state.turn_number;
    let mut ids = Vec::with_capacity(created);
    for _ in 0..created {
        let id = state.alloc_token_id();
        let token = BoardCard::token(id, spec.data(), spec.attack, spec.defense, spec.position, turn);
        state.side_mut(side).board.push_back(token);
        ids.push(id);
    }

    let message = if created < spec.count {
        format!("Created {created} of {} {}; board is full", spec.count, spec.name)
    } else {
        format!("Created {created} {}", spec.name)
    };

    Ok(Applied::new(EventType::TokenGenerated, message)
        .with_detail(OutcomeDetail::Tokens {
            requested: spec.count,
            created,
            ids,
        })
        .with_meta("requested", spec.count as i64)
        .with_meta("created", created as i64))
}
