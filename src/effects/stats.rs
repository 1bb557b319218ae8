//! Stat and resource executors.
//!
//! Every stored value here has a floor of 0: a modifier larger than the
//! current value clamps instead of going negative.

use crate::cards::{CardId, CardLookup};
use crate::core::{MatchState, Side};
use crate::effects::{Applied, FailureKind, OutcomeDetail, Rejected, Step};
use crate::store::EventType;
use crate::zones::{locate, ZoneKind};

/// Which combat stat a modifier targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stat {
    Attack,
    Defense,
}

impl Stat {
    fn label(self) -> &'static str {
        match self {
            Stat::Attack => "ATK",
            Stat::Defense => "DEF",
        }
    }
}

/// Add `delta` to a board card's current stat, clamped at 0.
pub fn modify_stat(state: &mut MatchState, cards: &dyn CardLookup, card_id: CardId, stat: Stat, delta: i64) -> Step {
    let loc = locate(state, card_id, ZoneKind::Board).ok_or_else(|| Rejected::not_found(card_id, ZoneKind::Board))?;
    let card = &mut state.side_mut(loc.side).board[loc.index];

    let slot = match stat {
        Stat::Attack => &mut card.attack,
        Stat::Defense => &mut card.defense,
    };
    let before = *slot;
    *slot = before.saturating_add(delta).max(0);
    let value = *slot;

    Ok(Applied::new(
        EventType::StatModified,
        format!("{} {} {before} -> {value}", cards.name_of(card_id), stat.label()),
    )
    .with_detail(OutcomeDetail::Stat { card_id, value })
    .with_card("card_id", card_id)
    .with_meta("delta", delta)
    .with_meta("value", value))
}

pub fn modify_attack(state: &mut MatchState, cards: &dyn CardLookup, card_id: CardId, delta: i64) -> Step {
    modify_stat(state, cards, card_id, Stat::Attack, delta)
}

pub fn modify_defense(state: &mut MatchState, cards: &dyn CardLookup, card_id: CardId, delta: i64) -> Step {
    modify_stat(state, cards, card_id, Stat::Defense, delta)
}

/// Add life points to `side`.
pub fn gain_lp(state: &mut MatchState, side: Side, amount: i64) -> Step {
    if amount < 0 {
        return Err(Rejected::illegal(format!("cannot gain a negative amount of life points ({amount})")));
    }
    let side_state = state.side_mut(side);
    side_state.life_points = side_state.life_points.saturating_add(amount);
    let value = side_state.life_points;

    Ok(Applied::new(EventType::LifePointsChanged, format!("{side} gained {amount} LP ({value})"))
        .with_detail(OutcomeDetail::LifePoints { side, value })
        .with_meta("amount", amount)
        .with_meta("value", value))
}

/// Deal damage to `side`, clamping life points at 0.
///
/// Reaching 0 is a loss the caller checks for separately. Damaging a side
/// already at 0 is `RESOURCE_EXHAUSTED`.
pub fn damage(state: &mut MatchState, side: Side, amount: i64) -> Step {
    if amount < 0 {
        return Err(Rejected::illegal(format!("cannot deal negative damage ({amount})")));
    }
    let side_state = state.side_mut(side);
    if side_state.life_points <= 0 {
        return Err(Rejected::new(FailureKind::ResourceExhausted, format!("{side} has no life points left"))
            .with_detail(OutcomeDetail::LifePoints { side, value: 0 }));
    }
    side_state.life_points = side_state.life_points.saturating_sub(amount).max(0);
    let value = side_state.life_points;

    Ok(Applied::new(EventType::LifePointsChanged, format!("{side} took {amount} damage ({value})"))
        .with_detail(OutcomeDetail::LifePoints { side, value })
        .with_meta("amount", -amount)
        .with_meta("value", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{BoardCard, CardDefinition, CardRegistry, Position};
    use crate::core::{LobbyRef, MatchId, SideMap, SideState, UserRef};

    const KNIGHT: CardId = CardId::new(1);

    fn setup() -> (CardRegistry, MatchState) {
        let cards: CardRegistry = [CardDefinition::monster(KNIGHT, "Knight", 4, 1800, 1000)].into_iter().collect();
        let mut state = MatchState::new(
            MatchId::new("m"),
            LobbyRef("l".into()),
            SideMap::new(|s| UserRef(s.to_string())),
            SideMap::new(|_| SideState::new([], 8000)),
        );
        let card = BoardCard::from_definition(cards.get(KNIGHT).unwrap(), Position::Attack, false, 1);
        state.side_mut(Side::Opponent).board.push_back(card);
        (cards, state)
    }

    #[test]
    fn test_modify_on_either_board() {
        let (cards, mut state) = setup();
        let applied = modify_attack(&mut state, &cards, KNIGHT, 500).unwrap();
        assert_eq!(applied.detail, OutcomeDetail::Stat { card_id: KNIGHT, value: 2300 });
        assert_eq!(state.side(Side::Opponent).board[0].attack, 2300);
    }

    #[test]
    fn test_modify_clamps_at_zero() {
        let (cards, mut state) = setup();
        modify_defense(&mut state, &cards, KNIGHT, -5000).unwrap();
        assert_eq!(state.side(Side::Opponent).board[0].defense, 0);

        modify_attack(&mut state, &cards, KNIGHT, i64::MIN).unwrap();
        assert_eq!(state.side(Side::Opponent).board[0].attack, 0);
    }

    #[test]
    fn test_modify_missing_card() {
        let (cards, mut state) = setup();
        let rejected = modify_attack(&mut state, &cards, CardId::new(9), 100).unwrap_err();
        assert_eq!(rejected.kind, FailureKind::NotFound);
    }

    #[test]
    fn test_damage_and_gain() {
        let (_, mut state) = setup();
        gain_lp(&mut state, Side::Host, 1000).unwrap();
        assert_eq!(state.side(Side::Host).life_points, 9000);

        let applied = damage(&mut state, Side::Host, 10_000).unwrap();
        assert_eq!(applied.detail, OutcomeDetail::LifePoints { side: Side::Host, value: 0 });

        let rejected = damage(&mut state, Side::Host, 1).unwrap_err();
        assert_eq!(rejected.kind, FailureKind::ResourceExhausted);
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let (_, mut state) = setup();
        assert_eq!(damage(&mut state, Side::Host, -5).unwrap_err().kind, FailureKind::IllegalAction);
        assert_eq!(gain_lp(&mut state, Side::Host, -5).unwrap_err().kind, FailureKind::IllegalAction);
        assert_eq!(state.side(Side::Host).life_points, 8000);
    }
}
