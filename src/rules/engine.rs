//! The match engine.
//!
//! `Engine` owns the collaborators (match store, event recorder, lobby
//! lifecycle), the card registry, and the rules configuration. Every
//! operation is one transaction:
//!
//! 1. Read the latest match document.
//! 2. Run one executor against a working copy.
//! 3. On success, patch the fields that changed and append one event.
//! 4. On rejection, write nothing and return the failure.
//!
//! The breakdown sweep is the one multi-step operation: it commits the
//! host side's breakdowns, then re-reads the document before processing
//! the opponent's, so the second patch is built on the first.

use tracing::{debug, info, warn};

use super::battle;
use super::legal::{self, check_active, LegalMoves};
use super::setup::MatchSetup;
use super::turn::{self, SummonMode};
use super::victory::{complete_match, life_point_winner, recorded_result, EndReason, VictoryCheck};
use crate::breakdown;
use crate::cards::{CardId, CardRegistry, Position};
use crate::core::{EngineResult, LobbyRef, MatchId, MatchState, RulesConfig, Side, SideMap, UserRef};
use crate::effects::{
    self, Applied, Effect, EffectOutcome, EffectResolver, OutcomeDetail, Rejected, ResolverContext, Step, Target,
    TokenSpec,
};
use crate::stack::{self, NegateFilter, NegateScope};
use crate::store::{EventRecorder, GameEvent, MatchLifecycle, MatchPatch, MatchStore};
use crate::zones::{self, DeckPosition, ZoneKind};

/// Rules engine for matches held in a `MatchStore`.
pub struct Engine<S, E, L> {
    store: S,
    events: E,
    lifecycle: L,
    cards: CardRegistry,
    config: RulesConfig,
}

impl<S, E, L> Engine<S, E, L>
where
    S: MatchStore,
    E: EventRecorder,
    L: MatchLifecycle,
{
    pub fn new(store: S, events: E, lifecycle: L, cards: CardRegistry, config: RulesConfig) -> Self {
        Self {
            store,
            events,
            lifecycle,
            cards,
            config,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn events(&self) -> &E {
        &self.events
    }

    #[must_use]
    pub fn lifecycle(&self) -> &L {
        &self.lifecycle
    }

    #[must_use]
    pub fn cards(&self) -> &CardRegistry {
        &self.cards
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Read the latest committed document.
    pub fn read_match(&self, id: &MatchId) -> EngineResult<MatchState> {
        self.store.read_match(id)
    }

    /// Build an opening document with this engine's rules and card registry.
    ///
    /// The caller hands the result to its store; creating documents is not
    /// part of the store interface.
    pub fn setup_match(
        &self,
        seed: u64,
        match_id: MatchId,
        lobby: LobbyRef,
        users: SideMap<UserRef>,
        decks: SideMap<Vec<CardId>>,
    ) -> EngineResult<MatchState> {
        MatchSetup::new(self.config.clone(), seed).build(&self.cards, match_id, lobby, users, decks)
    }

    // === Transactions ===

    fn transact<F>(&mut self, id: &MatchId, actor: Option<Side>, op: F) -> EngineResult<EffectOutcome>
    where
        F: FnOnce(&mut MatchState, &ResolverContext<'_>) -> EngineResult<Step>,
    {
        let before = self.store.read_match(id)?;
        if let Err(rejected) = check_active(&before) {
            return Ok(self.reject(id, actor, rejected));
        }

        let mut working = before.clone();
        let step = op(&mut working, &ResolverContext::new(&self.cards, &self.config))?;
        match step {
            Ok(applied) => self.commit(id, actor, &before, &working, applied),
            Err(rejected) => Ok(self.reject(id, actor, rejected)),
        }
    }

    fn commit(
        &mut self,
        id: &MatchId,
        actor: Option<Side>,
        before: &MatchState,
        after: &MatchState,
        applied: Applied,
    ) -> EngineResult<EffectOutcome> {
        let patch = MatchPatch::diff(before, after);
        if !patch.is_empty() {
            self.store.patch_match(id, patch)?;
        }
        debug!(match_id = %id, event = %applied.event, actor = ?actor, "{}", applied.message);

        let event = GameEvent::new(id.clone(), after.turn_number, applied.event, applied.message.clone())
            .with_player(actor)
            .with_metadata(applied.metadata.clone());
        if let Err(err) = self.events.record_event(event) {
            warn!(match_id = %id, event = %applied.event, error = %err, "failed to record event");
        }

        Ok(applied.into())
    }

    fn reject(&self, id: &MatchId, actor: Option<Side>, rejected: Rejected) -> EffectOutcome {
        warn!(match_id = %id, actor = ?actor, code = rejected.kind.code(), "{}", rejected.message);
        rejected.into()
    }

    /// End the match if `decide` finds a result. Idempotent once completed.
    fn conclude<F>(&mut self, id: &MatchId, actor: Option<Side>, reason: EndReason, decide: F) -> EngineResult<VictoryCheck>
    where
        F: FnOnce(&MatchState) -> Option<Option<Side>>,
    {
        let before = self.store.read_match(id)?;
        if let Some(winner) = recorded_result(&before) {
            return Ok(VictoryCheck::AlreadyCompleted { winner });
        }
        let Some(winner) = decide(&before) else {
            return Ok(VictoryCheck::Ongoing);
        };

        let mut working = before.clone();
        let applied = complete_match(&mut working, winner, reason);
        info!(match_id = %id, reason = reason.as_str(), winner = ?winner, "match completed");
        self.commit(id, actor, &before, &working, applied)?;
        self.lifecycle.mark_match_completed(id, winner)?;

        Ok(VictoryCheck::Decided { winner })
    }

    // === Zone transitions ===

    /// Draw up to `count` cards for `side`.
    pub fn draw(&mut self, id: &MatchId, side: Side, count: usize) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, _| Ok(zones::draw(state, side, count)))
    }

    /// Return a card to its owner's hand from the board, or from `actor`'s graveyard or banished zone.
    pub fn to_hand(&mut self, id: &MatchId, actor: Side, card_id: CardId, from: ZoneKind) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, ctx| {
            Ok(zones::to_hand(state, ctx.cards, actor, card_id, from))
        })
    }

    pub fn to_graveyard(
        &mut self,
        id: &MatchId,
        actor: Side,
        card_id: CardId,
        from: ZoneKind,
    ) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, ctx| {
            Ok(zones::to_graveyard(state, ctx.cards, card_id, from))
        })
    }

    pub fn banish(&mut self, id: &MatchId, actor: Side, card_id: CardId, from: ZoneKind) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, ctx| Ok(zones::banish(state, ctx.cards, card_id, from)))
    }

    pub fn return_to_deck(
        &mut self,
        id: &MatchId,
        actor: Side,
        card_id: CardId,
        from: ZoneKind,
        position: DeckPosition,
    ) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, ctx| {
            Ok(zones::return_to_deck(state, ctx.cards, card_id, from, position))
        })
    }

    /// Destroy a card on the field by card effect.
    pub fn destroy(&mut self, id: &MatchId, actor: Side, card_id: CardId) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, ctx| zones::destroy(state, ctx.cards, card_id))
    }

    // === Stats and resources ===

    pub fn modify_attack(&mut self, id: &MatchId, actor: Side, card_id: CardId, delta: i64) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, ctx| {
            Ok(effects::modify_attack(state, ctx.cards, card_id, delta))
        })
    }

    pub fn modify_defense(
        &mut self,
        id: &MatchId,
        actor: Side,
        card_id: CardId,
        delta: i64,
    ) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, ctx| {
            Ok(effects::modify_defense(state, ctx.cards, card_id, delta))
        })
    }

    pub fn gain_lp(&mut self, id: &MatchId, actor: Side, side: Side, amount: i64) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, _| Ok(effects::gain_lp(state, side, amount)))
    }

    pub fn damage(&mut self, id: &MatchId, actor: Side, side: Side, amount: i64) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, _| Ok(effects::damage(state, side, amount)))
    }

    // === Summons ===

    pub fn special_summon(
        &mut self,
        id: &MatchId,
        side: Side,
        card_id: CardId,
        from: ZoneKind,
        position: Position,
    ) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, ctx| {
            effects::special_summon(state, ctx, side, card_id, from, position)
        })
    }

    pub fn generate_token(&mut self, id: &MatchId, side: Side, spec: &TokenSpec) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, ctx| Ok(effects::generate_token(state, ctx, side, spec)))
    }

    /// Normal summon (or set) a monster from hand.
    pub fn normal_summon(
        &mut self,
        id: &MatchId,
        side: Side,
        card_id: CardId,
        tributes: &[CardId],
        mode: SummonMode,
    ) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, ctx| {
            turn::normal_summon(state, ctx, side, card_id, tributes, mode)
        })
    }

    // === Spells, traps and the chain ===

    pub fn set_spell_trap(&mut self, id: &MatchId, side: Side, card_id: CardId) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, ctx| turn::set_spell_trap(state, ctx, side, card_id))
    }

    /// Activate a spell; equip spells need `equip_target`.
    pub fn activate_spell(
        &mut self,
        id: &MatchId,
        side: Side,
        card_id: CardId,
        equip_target: Option<CardId>,
    ) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, ctx| {
            turn::activate_spell(state, ctx, side, card_id, equip_target)
        })
    }

    pub fn activate_trap(&mut self, id: &MatchId, side: Side, card_id: CardId) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, ctx| turn::activate_trap(state, ctx, side, card_id))
    }

    /// Attach an equip spell from hand without starting a chain.
    pub fn equip(&mut self, id: &MatchId, side: Side, equip_id: CardId, target: CardId) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, ctx| {
            EffectResolver::attach_equip(state, ctx, side, equip_id, target)
        })
    }

    /// Flag the active chain link of `card_id` as negated.
    pub fn negate(
        &mut self,
        id: &MatchId,
        actor: Side,
        card_id: CardId,
        scope: NegateScope,
        filter: NegateFilter,
    ) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, ctx| {
            stack::negate(state, ctx.cards, card_id, scope, filter)
        })
    }

    /// Pop and resolve the top chain link.
    pub fn resolve_chain_link(&mut self, id: &MatchId, actor: Side) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, ctx| turn::resolve_chain_link(state, ctx.cards))
    }

    /// Run one parsed effect with its chosen target.
    pub fn resolve_effect(
        &mut self,
        id: &MatchId,
        actor: Side,
        effect: &Effect,
        target: Target,
    ) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, ctx| {
            EffectResolver::resolve(state, ctx, actor, effect, target)
        })
    }

    // === Board actions and turn flow ===

    pub fn change_position(&mut self, id: &MatchId, side: Side, card_id: CardId) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, ctx| {
            Ok(turn::change_position(state, ctx.cards, side, card_id))
        })
    }

    /// Attack `target`, or attack directly when it is `None`.
    pub fn declare_attack(
        &mut self,
        id: &MatchId,
        side: Side,
        attacker: CardId,
        target: Option<CardId>,
    ) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, ctx| {
            battle::declare_attack(state, ctx.cards, side, attacker, target)
        })
    }

    pub fn advance_phase(&mut self, id: &MatchId, side: Side) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, _| Ok(turn::advance_phase(state, side)))
    }

    pub fn end_turn(&mut self, id: &MatchId, side: Side) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(side), |state, _| Ok(turn::end_turn(state, side)))
    }

    /// Every action `side` may take. Read-only.
    pub fn legal_moves(&self, id: &MatchId, side: Side) -> EngineResult<LegalMoves> {
        let state = self.store.read_match(id)?;
        legal::legal_moves(&state, &self.cards, &self.config, side)
    }

    // === Breakdowns ===

    /// Add a vice counter to a board card on either side.
    pub fn add_vice_counter(&mut self, id: &MatchId, actor: Side, card_id: CardId) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, ctx| {
            Ok(breakdown::add_vice_counter(state, ctx.cards, card_id, ctx.config.breakdown_threshold))
        })
    }

    /// Zero every vice counter on `side`'s board.
    pub fn reset_vice_counters(&mut self, id: &MatchId, actor: Side, side: Side) -> EngineResult<EffectOutcome> {
        self.transact(id, Some(actor), |state, _| Ok(breakdown::clear_vice_counters(state, side)))
    }

    /// Break down every board card at the threshold, host side first.
    ///
    /// Each side is its own patch, built on a fresh read of the document.
    pub fn check_breakdowns(&mut self, id: &MatchId) -> EngineResult<EffectOutcome> {
        let threshold = self.config.breakdown_threshold;
        let current = self.store.read_match(id)?;
        if let Err(rejected) = check_active(&current) {
            return Ok(self.reject(id, None, rejected));
        }

        let mut broken = SideMap::with_value(0usize);
        for side in Side::ALL {
            let before = self.store.read_match(id)?;
            let count = breakdown::offending(before.side(side), threshold).len();
            let mut working = before.clone();
            if let Some(applied) = breakdown::break_down_side(&mut working, side, threshold) {
                self.commit(id, None, &before, &working, applied)?;
                broken[side] = count;
            }
        }

        let (host, opponent) = (broken[Side::Host], broken[Side::Opponent]);
        let message = if host + opponent == 0 {
            "No cards broke down".to_string()
        } else {
            format!("{host} host and {opponent} opponent card(s) broke down")
        };
        Ok(EffectOutcome {
            success: true,
            message,
            failure: None,
            detail: OutcomeDetail::Breakdowns { host, opponent },
        })
    }

    /// End the match if either side has caused enough breakdowns.
    ///
    /// When both sides are over the limit the higher count wins and equal
    /// counts are a draw.
    pub fn check_breakdown_win_condition(&mut self, id: &MatchId) -> EngineResult<VictoryCheck> {
        let max = self.config.max_breakdowns_win;
        self.conclude(id, None, EndReason::Breakdowns, |state| breakdown::breakdown_winner(state, max))
    }

    // === Other terminal conditions ===

    /// End the match if a side is at 0 life points.
    pub fn check_life_points(&mut self, id: &MatchId) -> EngineResult<VictoryCheck> {
        self.conclude(id, None, EndReason::LifePoints, life_point_winner)
    }

    /// `side` must draw from an empty deck: the opponent wins.
    ///
    /// Reports `Ongoing` if `side` still has cards.
    pub fn declare_deck_out(&mut self, id: &MatchId, side: Side) -> EngineResult<VictoryCheck> {
        self.conclude(id, None, EndReason::DeckOut, |state| {
            state.side(side).deck.is_empty().then_some(Some(side.opponent()))
        })
    }

    /// `side` concedes.
    pub fn forfeit(&mut self, id: &MatchId, side: Side) -> EngineResult<VictoryCheck> {
        self.conclude(id, Some(side), EndReason::Forfeit, |_| Some(Some(side.opponent())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{BoardCard, CardDefinition};
    use crate::core::{EngineError, MatchStatus, SideState};
    use crate::effects::FailureKind;
    use crate::rules::Phase;
    use crate::store::{EventLog, EventType, LifecycleLog, MemoryMatchStore};

    const KNIGHT: CardId = CardId::new(1);
    const IMP: CardId = CardId::new(2);

    type TestEngine = Engine<MemoryMatchStore, EventLog, LifecycleLog>;

    fn engine() -> (TestEngine, MatchId) {
        let cards: CardRegistry = [
            CardDefinition::monster(KNIGHT, "Knight", 4, 1800, 1000),
            CardDefinition::monster(IMP, "Imp", 3, 1200, 800),
        ]
        .into_iter()
        .collect();
        let id = MatchId::new("m1");
        let mut state = MatchState::new(
            id.clone(),
            LobbyRef("l1".into()),
            SideMap::new(|s| UserRef(s.to_string())),
            SideMap::new(|side| match side {
                Side::Host => SideState::new([CardId::new(10)], 8000),
                Side::Opponent => SideState::new([CardId::new(20)], 8000),
            }),
        );
        let knight = BoardCard::from_definition(cards.get(KNIGHT).unwrap(), Position::Attack, false, 1);
        state.side_mut(Side::Opponent).board.push_back(knight);
        let imp = BoardCard::from_definition(cards.get(IMP).unwrap(), Position::Attack, false, 1);
        state.side_mut(Side::Host).board.push_back(imp);

        let mut store = MemoryMatchStore::new();
        store.insert(state);
        let engine = Engine::new(store, EventLog::new(), LifecycleLog::new(), cards, RulesConfig::default());
        (engine, id)
    }

    #[test]
    fn test_success_patches_and_records() {
        let (mut engine, id) = engine();
        let outcome = engine.modify_attack(&id, Side::Host, KNIGHT, -300).unwrap();

        assert!(outcome.success);
        assert_eq!(engine.read_match(&id).unwrap().side(Side::Opponent).board[0].attack, 1500);
        assert_eq!(engine.store().patch_count(), 1);
        let event = engine.events().last().unwrap();
        assert_eq!(event.event_type, EventType::StatModified);
        assert_eq!(event.acting_player, Some(Side::Host));
        assert_eq!(event.value("value", 0), 1500);
    }

    #[test]
    fn test_rejection_writes_nothing() {
        let (mut engine, id) = engine();
        let before = engine.read_match(&id).unwrap();

        let outcome = engine.destroy(&id, Side::Host, CardId::new(99)).unwrap();

        assert!(outcome.is_failure(FailureKind::NotFound));
        assert_eq!(engine.read_match(&id).unwrap(), before);
        assert_eq!(engine.store().patch_count(), 0);
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_missing_match_is_hard_error() {
        let (mut engine, _) = engine();
        let err = engine.draw(&MatchId::new("ghost"), Side::Host, 1).unwrap_err();
        assert_eq!(err, EngineError::MatchNotFound(MatchId::new("ghost")));
    }

    #[test]
    fn test_sweep_patches_each_side_separately() {
        let (mut engine, id) = engine();
        for _ in 0..3 {
            engine.add_vice_counter(&id, Side::Host, KNIGHT).unwrap();
            engine.add_vice_counter(&id, Side::Opponent, IMP).unwrap();
        }
        let patches = engine.store().patch_count();

        let outcome = engine.check_breakdowns(&id).unwrap();

        assert_eq!(outcome.detail, OutcomeDetail::Breakdowns { host: 1, opponent: 1 });
        assert_eq!(engine.store().patch_count(), patches + 2);
        let state = engine.read_match(&id).unwrap();
        assert_eq!(state.side(Side::Host).breakdowns_caused, 1);
        assert_eq!(state.side(Side::Opponent).breakdowns_caused, 1);
        assert!(state.side(Side::Host).board.is_empty());
        assert!(state.side(Side::Opponent).board.is_empty());
        assert_eq!(engine.events().of_type(EventType::Breakdown).count(), 2);
    }

    #[test]
    fn test_empty_sweep_is_quiet() {
        let (mut engine, id) = engine();
        let outcome = engine.check_breakdowns(&id).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.detail, OutcomeDetail::Breakdowns { host: 0, opponent: 0 });
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_completed_match_rejects_actions() {
        let (mut engine, id) = engine();
        assert_eq!(
            engine.forfeit(&id, Side::Host).unwrap(),
            VictoryCheck::Decided { winner: Some(Side::Opponent) }
        );
        assert_eq!(
            engine.read_match(&id).unwrap().status,
            MatchStatus::Completed { winner: Some(Side::Opponent) }
        );

        let outcome = engine.draw(&id, Side::Host, 1).unwrap();
        assert!(outcome.is_failure(FailureKind::IllegalAction));
        assert_eq!(
            engine.check_life_points(&id).unwrap(),
            VictoryCheck::AlreadyCompleted { winner: Some(Side::Opponent) }
        );
        assert_eq!(engine.lifecycle().times_completed(&id), 1);
    }

    #[test]
    fn test_deck_out_needs_empty_deck() {
        let (mut engine, id) = engine();
        assert_eq!(engine.declare_deck_out(&id, Side::Host).unwrap(), VictoryCheck::Ongoing);

        engine.draw(&id, Side::Host, 1).unwrap();
        assert_eq!(
            engine.declare_deck_out(&id, Side::Host).unwrap(),
            VictoryCheck::Decided { winner: Some(Side::Opponent) }
        );
    }

    #[test]
    fn test_turn_flow_through_engine() {
        let (mut engine, id) = engine();
        let outcome = engine.end_turn(&id, Side::Host).unwrap();
        assert!(outcome.is_failure(FailureKind::IllegalAction));

        for _ in 0..5 {
            assert!(engine.advance_phase(&id, Side::Host).unwrap().success);
        }
        assert_eq!(engine.read_match(&id).unwrap().current_phase, Phase::Main2);
        assert!(engine.end_turn(&id, Side::Host).unwrap().success);

        let state = engine.read_match(&id).unwrap();
        assert!(state.is_turn_of(Side::Opponent));
        assert_eq!(state.turn_number, 2);
        assert!(engine.legal_moves(&id, Side::Opponent).unwrap().game_state.is_my_turn);
    }
}
