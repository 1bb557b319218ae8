//! Turn actions: summons, spell/trap play, the chain, positions, phases.
//!
//! Each action validates with the same predicates the legal-move
//! enumerator uses, then mutates the working copy.

use smallvec::SmallVec;

use super::legal::{
    check_change_position, check_end_turn, check_normal_summon, check_set_spell_trap, check_spell_activation,
    check_trap_activation, check_turn, SpellSource,
};
use crate::cards::{BoardCard, CardDefinition, CardId, CardLookup, Position, SpellKind, ZoneCard};
use crate::core::{EngineError, EngineResult, MatchState, Side};
use crate::effects::{Applied, OutcomeDetail, Rejected, ResolverContext, Step};
use crate::store::EventType;
use crate::zones::{lift, lift_from_board, locate, locate_any, locate_on, place, Destination, ZoneKind};

/// How a monster enters the board from hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummonMode {
    /// Face-up in the chosen position.
    Summon(Position),
    /// Face-down defense.
    Set,
}

fn definition<'c>(cards: &'c dyn CardLookup, card_id: CardId) -> EngineResult<&'c CardDefinition> {
    cards.card_definition(card_id).ok_or(EngineError::UnknownCard(card_id))
}

/// Normal summon or set a monster from `side`'s hand, tributing `tributes`.
pub fn normal_summon(
    state: &mut MatchState,
    ctx: &ResolverContext<'_>,
    side: Side,
    card_id: CardId,
    tributes: &[CardId],
    mode: SummonMode,
) -> EngineResult<Step> {
    let Some(in_hand) = locate_on(state, side, card_id, ZoneKind::Hand) else {
        return Ok(Err(Rejected::not_found(card_id, ZoneKind::Hand)));
    };
    let def = definition(ctx.cards, card_id)?;
    let required = match check_normal_summon(state, ctx.config, side, def) {
        Ok(required) => required,
        Err(rejected) => return Ok(Err(rejected)),
    };

    let mut chosen: SmallVec<[CardId; 2]> = SmallVec::new();
    for tribute in tributes {
        if chosen.contains(tribute) {
            return Ok(Err(Rejected::illegal(format!("{tribute} was offered as a tribute twice"))));
        }
        match state.side(side).board_card(*tribute) {
            Some(card) if card.is_face_up() => chosen.push(*tribute),
            Some(_) => return Ok(Err(Rejected::illegal("face-down monsters cannot be tributed"))),
            None => return Ok(Err(Rejected::not_found(*tribute, ZoneKind::Board))),
        }
    }
    if chosen.len() != required {
        return Ok(Err(Rejected::illegal(format!(
            "{} needs exactly {required} tribute(s), {} offered",
            def.name,
            chosen.len()
        ))));
    }

    let mut equips_sent = 0;
    for tribute in &chosen {
        if let Some(index) = state.side(side).board_index(*tribute) {
            let (card, sent) = lift_from_board(state, side, index);
            equips_sent += sent;
            if !card.is_token() {
                place(state.side_mut(side), card.card_id, Destination::Graveyard);
            }
        }
    }

    let (position, face_down, verb) = match mode {
        SummonMode::Summon(position) => (position, false, "Normal summoned"),
        SummonMode::Set => (Position::Defense, true, "Set"),
    };
    let turn = state.turn_number;
    let side_state = state.side_mut(side);
    side_state.hand.remove(in_hand.index);
    side_state
        .board
        .push_back(BoardCard::from_definition(def, position, face_down, turn));
    side_state.normal_summoned_this_turn = true;

    Ok(Ok(Applied::new(EventType::NormalSummon, format!("{verb} {}", def.name))
        .with_detail(OutcomeDetail::Summoned {
            card_id,
            owner: side,
            tributes: required,
        })
        .with_card("card_id", card_id)
        .with_meta("tributes", required as i64)
        .with_meta("face_down", i64::from(face_down))
        .with_meta("equips_sent", equips_sent as i64)))
}

/// Set a spell or trap from `side`'s hand face-down.
pub fn set_spell_trap(state: &mut MatchState, ctx: &ResolverContext<'_>, side: Side, card_id: CardId) -> EngineResult<Step> {
    let Some(in_hand) = locate_on(state, side, card_id, ZoneKind::Hand) else {
        return Ok(Err(Rejected::not_found(card_id, ZoneKind::Hand)));
    };
    let def = definition(ctx.cards, card_id)?;
    if let Err(rejected) = check_set_spell_trap(state, ctx.config, side, def) {
        return Ok(Err(rejected));
    }

    let turn = state.turn_number;
    let side_state = state.side_mut(side);
    side_state.hand.remove(in_hand.index);
    side_state.spell_trap_zone.push_back(ZoneCard::set(card_id, turn));

    Ok(Ok(Applied::new(EventType::SpellTrapSet, format!("{side} set a card"))
        .with_card("card_id", card_id)))
}

/// Activate a spell from `side`'s hand or spell/trap zone and add it to the chain.
///
/// Equip spells attach to `equip_target` as they are activated. A field
/// spell from hand replaces the current field spell, which goes to the
/// graveyard.
pub fn activate_spell(
    state: &mut MatchState,
    ctx: &ResolverContext<'_>,
    side: Side,
    card_id: CardId,
    equip_target: Option<CardId>,
) -> EngineResult<Step> {
    let def = definition(ctx.cards, card_id)?;
    let from_hand = locate_on(state, side, card_id, ZoneKind::Hand);
    let from_zone = locate_on(state, side, card_id, ZoneKind::SpellTrap);

    let checked = match (from_hand, from_zone) {
        (Some(_), _) => check_spell_activation(state, ctx.config, side, def, SpellSource::Hand),
        (None, Some(loc)) => {
            let zone_card = &state.side(side).spell_trap_zone[loc.index];
            check_spell_activation(state, ctx.config, side, def, SpellSource::Set(zone_card))
        }
        (None, None) => Err(Rejected::not_found(card_id, "hand or spell/trap zone")),
    };
    if let Err(rejected) = checked {
        return Ok(Err(rejected));
    }

    let kind = def.card_type.spell_kind().unwrap_or(SpellKind::Normal);
    let host = match (kind, equip_target) {
        (SpellKind::Equip, Some(target)) => match locate(state, target, ZoneKind::Board) {
            Some(loc) => Some((target, loc)),
            None => return Ok(Err(Rejected::not_found(target, ZoneKind::Board))),
        },
        (SpellKind::Equip, None) => return Ok(Err(Rejected::illegal("an equip spell needs a target monster"))),
        _ => None,
    };

    let turn = state.turn_number;
    if let Some(loc) = from_hand {
        state.side_mut(side).hand.remove(loc.index);
        if kind == SpellKind::Field {
            let previous = state.side_mut(side).field_spell.replace(ZoneCard::face_up(card_id, turn));
            if let Some(previous) = previous {
                place(state.side_mut(side), previous.card_id, Destination::Graveyard);
            }
        } else {
            state.side_mut(side).spell_trap_zone.push_back(ZoneCard::face_up(card_id, turn));
        }
    } else if let Some(loc) = from_zone {
        state.side_mut(side).spell_trap_zone[loc.index].is_face_down = false;
    }

    if let Some((target, loc)) = host {
        if let Some(index) = state.side(side).spell_trap_index(card_id) {
            state.side_mut(side).spell_trap_zone[index].equipped_to = Some(target);
        }
        state.side_mut(loc.side).board[loc.index].equipped_cards.push(card_id);
    }

    Ok(Ok(push_link(state, def, side)))
}

/// Activate a set trap from `side`'s spell/trap zone and add it to the chain.
pub fn activate_trap(state: &mut MatchState, ctx: &ResolverContext<'_>, side: Side, card_id: CardId) -> EngineResult<Step> {
    let Some(loc) = locate_on(state, side, card_id, ZoneKind::SpellTrap) else {
        return Ok(Err(Rejected::not_found(card_id, ZoneKind::SpellTrap)));
    };
    let def = definition(ctx.cards, card_id)?;
    if !def.card_type.is_trap() {
        return Ok(Err(Rejected::illegal(format!("{} is not a trap", def.name))));
    }
    if let Err(rejected) = check_trap_activation(state, &state.side(side).spell_trap_zone[loc.index]) {
        return Ok(Err(rejected));
    }

    state.side_mut(side).spell_trap_zone[loc.index].is_face_down = false;
    Ok(Ok(push_link(state, def, side)))
}

fn push_link(state: &mut MatchState, def: &CardDefinition, side: Side) -> Applied {
    let index = state.current_chain.push(def.id, side);
    Applied::new(
        EventType::ChainLinkAdded,
        format!("{side} activated {} (chain link {})", def.name, index + 1),
    )
    .with_detail(OutcomeDetail::ChainLink {
        card_id: def.id,
        index,
    })
    .with_card("card_id", def.id)
    .with_meta("chain_index", index as i64)
}

/// Resolve the top chain link.
///
/// A negated link fizzles and its card leaves the field. A resolved
/// normal, quick-play or trap card goes to the graveyard; continuous,
/// equip and field cards stay. Running the card's effects is the
/// caller's job.
pub fn resolve_chain_link(state: &mut MatchState, cards: &dyn CardLookup) -> EngineResult<Step> {
    let Some(link) = state.current_chain.top().cloned() else {
        return Ok(Err(Rejected::illegal("the chain is empty")));
    };
    let def = definition(cards, link.card_id)?;
    state.current_chain.resolve_top();

    let leaves = link.negated || def.card_type.leaves_field_after_resolving();
    if leaves {
        if let Some(loc) = locate_any(state, link.card_id, &[ZoneKind::SpellTrap, ZoneKind::FieldSpell]) {
            if let Some(exit) = lift(state, loc) {
                place(state.side_mut(exit.owner), exit.card_id, Destination::Graveyard);
            }
        }
    }

    let message = if link.negated {
        format!("{} was negated and fizzled", def.name)
    } else {
        format!("{} resolved", def.name)
    };
    Ok(Ok(Applied::new(EventType::ChainLinkResolved, message)
        .with_detail(OutcomeDetail::Resolved {
            card_id: link.card_id,
            negated: link.negated,
        })
        .with_card("card_id", link.card_id)
        .with_meta("negated", i64::from(link.negated))
        .with_meta("remaining", state.current_chain.len() as i64)))
}

/// Switch a monster between attack and defense. A face-down monster is flipped face-up.
pub fn change_position(state: &mut MatchState, cards: &dyn CardLookup, side: Side, card_id: CardId) -> Step {
    let loc = locate_on(state, side, card_id, ZoneKind::Board).ok_or_else(|| Rejected::not_found(card_id, ZoneKind::Board))?;
    check_change_position(state, side, &state.side(side).board[loc.index])?;

    let card = &mut state.side_mut(side).board[loc.index];
    card.position = card.position.flipped();
    card.is_face_down = false;
    card.has_changed_position = true;
    let position = card.position;

    Ok(Applied::new(
        EventType::PositionChanged,
        format!("{} switched to {position:?} position", cards.name_of(card_id)),
    )
    .with_card("card_id", card_id)
    .with_meta("position", i64::from(position.tag())))
}

/// Move to the next phase of `side`'s turn. Advancing past `End` ends the turn.
pub fn advance_phase(state: &mut MatchState, side: Side) -> Step {
    check_turn(state, side)?;
    if !state.current_chain.is_empty() {
        return Err(Rejected::illegal("resolve the chain before changing phase"));
    }
    if state.current_phase == super::Phase::End {
        return end_turn(state, side);
    }

    let from = state.current_phase;
    state.current_phase = from.next();
    Ok(Applied::new(EventType::PhaseChanged, format!("{side}: {from} -> {}", state.current_phase))
        .with_meta("turn", i64::from(state.turn_number)))
}

/// Pass the turn to the opponent.
///
/// The new turn starts in the draw phase with every per-turn flag cleared
/// and an empty chain.
pub fn end_turn(state: &mut MatchState, side: Side) -> Step {
    check_end_turn(state, side)?;

    let next = side.opponent();
    state.current_turn_player = next;
    state.turn_number += 1;
    state.current_phase = super::Phase::Draw;
    state.current_chain.clear();
    for s in Side::ALL {
        state.side_mut(s).reset_turn_flags();
    }

    Ok(Applied::new(EventType::TurnEnded, format!("{side} ended the turn; turn {} begins", state.turn_number))
        .with_meta("turn", i64::from(state.turn_number))
        .with_meta("next_is_host", i64::from(next.is_host())))
}
