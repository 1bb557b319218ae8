//! Legal-move enumeration.
//!
//! The `check_*` predicates are shared by the enumerator and by the
//! action executors in `turn` and `battle`, so a move offered in
//! [`LegalMoves`] is exactly a move the engine accepts.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::phase::Phase;
use crate::cards::{BoardCard, CardDefinition, CardId, CardLookup, CardType, DirectAttackCondition, SpellKind, ZoneCard};
use crate::core::{EngineError, EngineResult, MatchState, RulesConfig, Side};
use crate::effects::{FailureKind, Rejected};

/// A card in hand that can be normal summoned or set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummonOption {
    pub card_id: CardId,
    pub level: u8,
    pub requires_tributes: usize,
    /// Face-up board cards that may be tributed.
    pub valid_tributes: Vec<CardId>,
}

/// A board card that can attack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOption {
    pub card_id: CardId,
    /// Opponent monsters it may attack.
    pub targets: Vec<CardId>,
    pub can_direct_attack: bool,
}

/// Counts and life points from one side's point of view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateSummary {
    pub phase: Phase,
    pub turn_number: u32,
    pub is_my_turn: bool,
    pub hand_count: usize,
    pub board_count: usize,
    pub spell_trap_count: usize,
    pub deck_count: usize,
    pub life_points: i64,
    pub opponent_hand_count: usize,
    pub opponent_board_count: usize,
    pub opponent_life_points: i64,
    pub chain_length: usize,
}

/// Every action available to one side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMoves {
    pub can_summon: Vec<SummonOption>,
    pub can_attack: Vec<AttackOption>,
    pub can_set_spell_trap: Vec<CardId>,
    pub can_activate_spell: Vec<CardId>,
    pub can_activate_trap: Vec<CardId>,
    pub can_change_position: Vec<CardId>,
    pub can_end_turn: bool,
    pub game_state: GameStateSummary,
}

/// Where a spell is activated from.
#[derive(Clone, Copy, Debug)]
pub enum SpellSource<'a> {
    Hand,
    /// Already set in the spell/trap zone.
    Set(&'a ZoneCard),
}

fn illegal<T>(message: impl Into<String>) -> Result<T, Rejected> {
    Err(Rejected::illegal(message))
}

/// The match is still being played.
pub fn check_active(state: &MatchState) -> Result<(), Rejected> {
    if state.status.is_completed() {
        return illegal("the match is already completed");
    }
    Ok(())
}

/// It is `side`'s turn.
pub fn check_turn(state: &MatchState, side: Side) -> Result<(), Rejected> {
    check_active(state)?;
    if !state.is_turn_of(side) {
        return illegal(format!("it is not {side}'s turn"));
    }
    Ok(())
}

/// It is `side`'s turn and a main phase.
pub fn check_main_phase(state: &MatchState, side: Side) -> Result<(), Rejected> {
    check_turn(state, side)?;
    if !state.current_phase.is_main() {
        return illegal(format!("not allowed during the {} phase", state.current_phase));
    }
    Ok(())
}

/// Face-up board cards `side` may tribute.
#[must_use]
pub fn tribute_candidates(state: &MatchState, side: Side) -> Vec<CardId> {
    state
        .side(side)
        .board
        .iter()
        .filter(|c| c.is_face_up())
        .map(|c| c.card_id)
        .collect()
}

/// Can `side` normal summon (or set) a monster of `def`'s level right now?
///
/// Returns the number of tributes required. A tribute summon frees the
/// slots it consumes, so only the board left after tributing must have room.
pub fn check_normal_summon(
    state: &MatchState,
    config: &RulesConfig,
    side: Side,
    def: &CardDefinition,
) -> Result<usize, Rejected> {
    check_main_phase(state, side)?;
    if !def.card_type.is_monster() {
        return illegal(format!("{} is not a monster", def.name));
    }
    let side_state = state.side(side);
    if side_state.normal_summoned_this_turn {
        return illegal("already normal summoned this turn");
    }

    let required = config.tributes_for_level(def.level);
    let available = tribute_candidates(state, side).len();
    if available < required {
        return illegal(format!(
            "{} needs {required} tribute(s), only {available} available",
            def.name
        ));
    }
    if side_state.board.len() - required >= config.board_capacity {
        return Err(Rejected::new(FailureKind::CapacityExceeded, format!("{side}'s board is full")));
    }
    Ok(required)
}

/// Can this board card declare an attack right now?
pub fn check_attacker(state: &MatchState, side: Side, card: &BoardCard) -> Result<(), Rejected> {
    check_turn(state, side)?;
    if !state.current_phase.allows_attacks() {
        return illegal(format!("cannot attack during the {} phase", state.current_phase));
    }
    if card.is_face_down {
        return illegal("face-down monsters cannot attack");
    }
    if !card.in_attack_position() {
        return illegal("only attack-position monsters can attack");
    }
    if card.has_attacked {
        return illegal("this monster has already attacked this turn");
    }
    if card.summoned_on(state.turn_number) {
        return illegal("a monster cannot attack the turn it is summoned");
    }
    Ok(())
}

/// May `attacker` (on `side`'s board) attack the opponent directly?
pub fn direct_attack_allowed(
    state: &MatchState,
    cards: &dyn CardLookup,
    side: Side,
    attacker: &BoardCard,
) -> EngineResult<bool> {
    let opposing = &state.side(side.opponent()).board;
    if opposing.is_empty() {
        return Ok(true);
    }
    if attacker.is_token() {
        return Ok(false);
    }
    let def = cards
        .card_definition(attacker.card_id)
        .ok_or(EngineError::UnknownCard(attacker.card_id))?;
    Ok(match def.ability.direct_attack {
        Some(DirectAttackCondition::Always) => true,
        Some(DirectAttackCondition::NoOpponentAttackPosition) => !opposing.iter().any(BoardCard::in_attack_position),
        None => false,
    })
}

/// Can this board card change position right now?
pub fn check_change_position(state: &MatchState, side: Side, card: &BoardCard) -> Result<(), Rejected> {
    check_main_phase(state, side)?;
    if card.has_changed_position {
        return illegal("this monster already changed position this turn");
    }
    if card.summoned_on(state.turn_number) {
        return illegal("a monster cannot change position the turn it is summoned");
    }
    Ok(())
}

/// Can `side` set this spell or trap from hand right now?
pub fn check_set_spell_trap(
    state: &MatchState,
    config: &RulesConfig,
    side: Side,
    def: &CardDefinition,
) -> Result<(), Rejected> {
    check_main_phase(state, side)?;
    match def.card_type {
        CardType::Monster => return illegal(format!("{} is not a spell or trap", def.name)),
        CardType::Spell(SpellKind::Field) => return illegal("field spells are activated, not set"),
        _ => {}
    }
    if state.side(side).spell_trap_slots_free(config.spell_trap_capacity) == 0 {
        return Err(Rejected::new(
            FailureKind::CapacityExceeded,
            format!("{side}'s spell/trap zone is full"),
        ));
    }
    Ok(())
}

/// Can `side` activate this spell right now?
pub fn check_spell_activation(
    state: &MatchState,
    config: &RulesConfig,
    side: Side,
    def: &CardDefinition,
    source: SpellSource<'_>,
) -> Result<(), Rejected> {
    check_active(state)?;
    let Some(kind) = def.card_type.spell_kind() else {
        return illegal(format!("{} is not a spell", def.name));
    };

    let own_turn = state.is_turn_of(side);
    let phase = state.current_phase;
    match (kind, own_turn) {
        (SpellKind::QuickPlay, true) if phase.is_main() || phase.is_battle() => {}
        (SpellKind::QuickPlay, true) => return illegal(format!("cannot activate during the {phase} phase")),
        (SpellKind::QuickPlay, false) if matches!(source, SpellSource::Set(_)) => {}
        (SpellKind::QuickPlay, false) => return illegal("quick-play spells must be set to use on the opponent's turn"),
        (_, true) if phase.is_main() => {}
        (_, true) => return illegal(format!("{} can only be activated in a main phase", def.name)),
        (_, false) => return illegal(format!("{} can only be activated on your own turn", def.name)),
    }

    match source {
        SpellSource::Set(zone_card) => {
            if !zone_card.is_face_down {
                return illegal(format!("{} is already face-up", def.name));
            }
            if kind == SpellKind::QuickPlay && zone_card.turn_set >= state.turn_number {
                return illegal("a quick-play spell cannot be activated the turn it is set");
            }
        }
        SpellSource::Hand if kind != SpellKind::Field => {
            if state.side(side).spell_trap_slots_free(config.spell_trap_capacity) == 0 {
                return Err(Rejected::new(
                    FailureKind::CapacityExceeded,
                    format!("{side}'s spell/trap zone is full"),
                ));
            }
        }
        SpellSource::Hand => {}
    }

    if kind == SpellKind::Equip && Side::ALL.iter().all(|s| state.side(*s).board.is_empty()) {
        return illegal("there is no monster to equip");
    }
    Ok(())
}

/// Can `side` activate this set trap right now? Traps work on either turn.
pub fn check_trap_activation(state: &MatchState, zone_card: &ZoneCard) -> Result<(), Rejected> {
    check_active(state)?;
    if !zone_card.is_face_down {
        return illegal("this trap is already face-up");
    }
    if zone_card.turn_set >= state.turn_number {
        return illegal("a trap cannot be activated the turn it is set");
    }
    Ok(())
}

/// Can `side` end the turn right now?
pub fn check_end_turn(state: &MatchState, side: Side) -> Result<(), Rejected> {
    check_turn(state, side)?;
    if !state.current_phase.allows_end_turn() {
        return illegal(format!("cannot end the turn from the {} phase", state.current_phase));
    }
    Ok(())
}

fn definition<'c>(cards: &'c dyn CardLookup, card_id: CardId) -> EngineResult<&'c CardDefinition> {
    cards.card_definition(card_id).ok_or(EngineError::UnknownCard(card_id))
}

/// Summary of the match from `side`'s point of view.
#[must_use]
pub fn summarize(state: &MatchState, side: Side) -> GameStateSummary {
    let mine = state.side(side);
    let theirs = state.side(side.opponent());
    GameStateSummary {
        phase: state.current_phase,
        turn_number: state.turn_number,
        is_my_turn: state.is_turn_of(side),
        hand_count: mine.hand.len(),
        board_count: mine.board.len(),
        spell_trap_count: mine.spell_trap_zone.len(),
        deck_count: mine.deck.len(),
        life_points: mine.life_points,
        opponent_hand_count: theirs.hand.len(),
        opponent_board_count: theirs.board.len(),
        opponent_life_points: theirs.life_points,
        chain_length: state.current_chain.len(),
    }
}

/// Enumerate every action `side` may take. Read-only.
pub fn legal_moves(
    state: &MatchState,
    cards: &dyn CardLookup,
    config: &RulesConfig,
    side: Side,
) -> EngineResult<LegalMoves> {
    let mine = state.side(side);
    let mut moves = LegalMoves {
        can_summon: Vec::new(),
        can_attack: Vec::new(),
        can_set_spell_trap: Vec::new(),
        can_activate_spell: Vec::new(),
        can_activate_trap: Vec::new(),
        can_change_position: Vec::new(),
        can_end_turn: check_end_turn(state, side).is_ok(),
        game_state: summarize(state, side),
    };
    if check_active(state).is_err() {
        return Ok(moves);
    }

    let tributes = tribute_candidates(state, side);
    for card_id in mine.hand.iter().copied() {
        let def = definition(cards, card_id)?;
        if def.card_type.is_monster() {
            if let Ok(requires_tributes) = check_normal_summon(state, config, side, def) {
                moves.can_summon.push(SummonOption {
                    card_id,
                    level: def.level,
                    requires_tributes,
                    valid_tributes: if requires_tributes > 0 { tributes.clone() } else { Vec::new() },
                });
            }
            continue;
        }
        if check_set_spell_trap(state, config, side, def).is_ok() {
            moves.can_set_spell_trap.push(card_id);
        }
        if check_spell_activation(state, config, side, def, SpellSource::Hand).is_ok() {
            moves.can_activate_spell.push(card_id);
        }
    }

    for zone_card in mine.spell_trap_zone.iter() {
        let def = definition(cards, zone_card.card_id)?;
        let ok = match def.card_type {
            CardType::Trap => check_trap_activation(state, zone_card).is_ok(),
            CardType::Spell(_) => check_spell_activation(state, config, side, def, SpellSource::Set(zone_card)).is_ok(),
            CardType::Monster => false,
        };
        match (ok, def.card_type.is_trap()) {
            (true, true) => moves.can_activate_trap.push(zone_card.card_id),
            (true, false) => moves.can_activate_spell.push(zone_card.card_id),
            _ => {}
        }
    }

    let targets: SmallVec<[CardId; 5]> = state
        .side(side.opponent())
        .board
        .iter()
        .map(|c| c.card_id)
        .collect();
    for card in mine.board.iter() {
        if check_attacker(state, side, card).is_ok() {
            moves.can_attack.push(AttackOption {
                card_id: card.card_id,
                targets: targets.to_vec(),
                can_direct_attack: direct_attack_allowed(state, cards, side, card)?,
            });
        }
        if check_change_position(state, side, card).is_ok() {
            moves.can_change_position.push(card.card_id);
        }
    }

    Ok(moves)
}
