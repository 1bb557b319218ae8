//! Effect resolution: dispatching a parsed effect to its executor.
//!
//! The `EffectResolver` runs one [`Effect`] against a working copy of the
//! match. It never commits anything; the engine patches the result.

use serde::{Deserialize, Serialize};

use super::{equip, stats, summon, Effect, Rejected, Step};
use crate::breakdown;
use crate::cards::{CardId, CardLookup};
use crate::core::{EngineResult, MatchState, RulesConfig, Side};
use crate::stack;
use crate::zones;

/// What the executors need besides the match itself.
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    pub cards: &'a dyn CardLookup,
    pub config: &'a RulesConfig,
}

impl<'a> ResolverContext<'a> {
    pub fn new(cards: &'a dyn CardLookup, config: &'a RulesConfig) -> Self {
        Self { cards, config }
    }
}

/// The chosen target of an effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Use the effect's default target.
    #[default]
    None,
    Player(Side),
    Card(CardId),
}

impl Target {
    fn player_or(self, default: Side) -> Side {
        match self {
            Target::Player(side) => side,
            _ => default,
        }
    }

    fn card(self) -> Result<CardId, Rejected> {
        match self {
            Target::Card(card_id) => Ok(card_id),
            _ => Err(Rejected::illegal("effect requires a card target")),
        }
    }
}

/// Resolves effects on match state.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve one effect activated by `actor`.
    pub fn resolve(
        state: &mut MatchState,
        ctx: &ResolverContext<'_>,
        actor: Side,
        effect: &Effect,
        target: Target,
    ) -> EngineResult<Step> {
        if effect.targets_card() {
            if let Err(rejected) = target.card() {
                return Ok(Err(rejected));
            }
        }
        let cards = ctx.cards;

        let step = match (effect, target) {
            (Effect::Draw { count }, _) => zones::draw(state, target.player_or(actor), *count),
            (Effect::GainLp { amount }, _) => stats::gain_lp(state, target.player_or(actor), *amount),
            (Effect::Damage { amount }, _) => stats::damage(state, target.player_or(actor.opponent()), *amount),
            (Effect::GenerateToken(spec), _) => summon::generate_token(state, ctx, target.player_or(actor), spec),
            (Effect::ResetViceCounters, _) => breakdown::clear_vice_counters(state, target.player_or(actor)),

            (Effect::ToHand { from }, Target::Card(id)) => zones::to_hand(state, cards, actor, id, *from),
            (Effect::SendToGraveyard { from }, Target::Card(id)) => zones::to_graveyard(state, cards, id, *from),
            (Effect::Banish { from }, Target::Card(id)) => zones::banish(state, cards, id, *from),
            (Effect::ReturnToDeck { from, position }, Target::Card(id)) => {
                zones::return_to_deck(state, cards, id, *from, *position)
            }
            (Effect::Destroy, Target::Card(id)) => zones::destroy(state, cards, id)?,
            (Effect::ModifyAttack { delta }, Target::Card(id)) => stats::modify_attack(state, cards, id, *delta),
            (Effect::ModifyDefense { delta }, Target::Card(id)) => stats::modify_defense(state, cards, id, *delta),
            (Effect::SpecialSummon { from, position }, Target::Card(id)) => {
                summon::special_summon(state, ctx, actor, id, *from, *position)?
            }
            (Effect::Negate { scope, filter }, Target::Card(id)) => stack::negate(state, cards, id, *scope, *filter)?,
            (Effect::AddViceCounter, Target::Card(id)) => {
                breakdown::add_vice_counter(state, cards, id, ctx.config.breakdown_threshold)
            }

            _ => Err(Rejected::illegal(format!("{} requires a card target", effect.name()))),
        };
        Ok(step)
    }

    /// Attach an equip spell. Equips are not a parsed effect: they are
    /// played from hand onto a chosen monster.
    pub fn attach_equip(
        state: &mut MatchState,
        ctx: &ResolverContext<'_>,
        actor: Side,
        equip_id: CardId,
        target: CardId,
    ) -> EngineResult<Step> {
        equip::equip(state, ctx, actor, equip_id, target)
    }
}
