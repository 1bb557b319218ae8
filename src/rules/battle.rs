//! Attack declaration and damage calculation.
//!
//! Battle resolves as soon as the attack is declared. Destruction by
//! battle ignores `cannot_be_destroyed_by_effects` but otherwise follows
//! the board exit rules: equips cascade to the graveyard and tokens are
//! removed.

use smallvec::SmallVec;

use super::legal::{check_attacker, direct_attack_allowed};
use crate::cards::{CardId, CardLookup};
use crate::core::{EngineResult, MatchState, Side};
use crate::effects::{Applied, OutcomeDetail, Rejected, Step};
use crate::store::EventType;
use crate::zones::{lift_from_board, locate_on, place, Destination, ZoneKind};

/// Result of damage calculation, before it is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Calculation {
    attacker_destroyed: bool,
    defender_destroyed: bool,
    /// Damage and the side that takes it.
    damage: Option<(Side, i64)>,
}

fn calculate(attacker_side: Side, attack: i64, defender_attack_position: bool, defender_stat: i64) -> Calculation {
    let defender_side = attacker_side.opponent();
    let diff = attack - defender_stat;
    match (defender_attack_position, diff.signum()) {
        (true, 1) => Calculation {
            defender_destroyed: true,
            damage: Some((defender_side, diff)),
            ..Calculation::default()
        },
        (true, -1) => Calculation {
            attacker_destroyed: true,
            damage: Some((attacker_side, -diff)),
            ..Calculation::default()
        },
        (true, _) => Calculation {
            attacker_destroyed: true,
            defender_destroyed: true,
            damage: None,
        },
        (false, 1) => Calculation {
            defender_destroyed: true,
            ..Calculation::default()
        },
        (false, -1) => Calculation {
            damage: Some((attacker_side, -diff)),
            ..Calculation::default()
        },
        (false, _) => Calculation::default(),
    }
}

fn destroy_by_battle(state: &mut MatchState, side: Side, card_id: CardId) -> usize {
    let Some(index) = state.side(side).board_index(card_id) else {
        return 0;
    };
    let (card, sent) = lift_from_board(state, side, index);
    if !card.is_token() {
        place(state.side_mut(side), card.card_id, Destination::Graveyard);
    }
    sent
}

/// Declare an attack with `attacker`, against `target` or directly when `None`.
pub fn declare_attack(
    state: &mut MatchState,
    cards: &dyn CardLookup,
    side: Side,
    attacker: CardId,
    target: Option<CardId>,
) -> EngineResult<Step> {
    let Some(loc) = locate_on(state, side, attacker, ZoneKind::Board) else {
        return Ok(Err(Rejected::not_found(attacker, ZoneKind::Board)));
    };
    let attacking = state.side(side).board[loc.index].clone();
    if let Err(rejected) = check_attacker(state, side, &attacking) {
        return Ok(Err(rejected));
    }

    let defender_side = side.opponent();
    let (calc, defender) = match target {
        None => {
            if !direct_attack_allowed(state, cards, side, &attacking)? {
                return Ok(Err(Rejected::illegal("cannot attack directly while the opponent controls monsters")));
            }
            let calc = Calculation {
                damage: Some((defender_side, attacking.attack)),
                ..Calculation::default()
            };
            (calc, None)
        }
        Some(target_id) => {
            let Some(target_loc) = locate_on(state, defender_side, target_id, ZoneKind::Board) else {
                return Ok(Err(Rejected::not_found(target_id, "the opponent's board")));
            };
            let defending = &mut state.side_mut(defender_side).board[target_loc.index];
            defending.is_face_down = false;
            let calc = calculate(side, attacking.attack, defending.in_attack_position(), defending.battle_stat());
            (calc, Some(target_id))
        }
    };

    state.side_mut(side).board[loc.index].has_attacked = true;

    let mut destroyed: SmallVec<[CardId; 2]> = SmallVec::new();
    let mut equips_sent = 0;
    if let (true, Some(defender)) = (calc.defender_destroyed, defender) {
        equips_sent += destroy_by_battle(state, defender_side, defender);
        destroyed.push(defender);
    }
    if calc.attacker_destroyed {
        equips_sent += destroy_by_battle(state, side, attacker);
        destroyed.push(attacker);
    }

    let (damaged, amount) = match calc.damage {
        Some((damaged, amount)) if amount > 0 => {
            let lp = &mut state.side_mut(damaged).life_points;
            *lp = lp.saturating_sub(amount).max(0);
            (Some(damaged), amount)
        }
        _ => (None, 0),
    };

    let message = match (defender, damaged) {
        (None, _) => format!("{} attacked directly for {amount}", cards.name_of(attacker)),
        (Some(d), Some(hit)) => format!(
            "{} attacked {}; {hit} took {amount} damage",
            cards.name_of(attacker),
            cards.name_of(d)
        ),
        (Some(d), None) => format!("{} attacked {}", cards.name_of(attacker), cards.name_of(d)),
    };

    Ok(Ok(Applied::new(EventType::BattleResolved, message)
        .with_detail(OutcomeDetail::Battle {
            attacker,
            defender,
            damage: amount,
            damaged,
            destroyed: destroyed.to_vec(),
        })
        .with_card("attacker_id", attacker)
        .with_meta("direct", i64::from(defender.is_none()))
        .with_meta("damage", amount)
        .with_meta("destroyed", destroyed.len() as i64)
        .with_meta("equips_sent", equips_sent as i64)))
}
