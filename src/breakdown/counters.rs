//! Vice counters on board cards.

use im::Vector;

use crate::cards::{BoardCard, CardId, CardLookup};
use crate::core::{MatchState, Side};
use crate::effects::{Applied, OutcomeDetail, Rejected, Step};
use crate::store::EventType;
use crate::zones::{locate, ZoneKind};

/// Add one vice counter to a board card on either side.
///
/// The detail reports whether the new count reached `threshold`.
pub fn add_vice_counter(state: &mut MatchState, cards: &dyn CardLookup, card_id: CardId, threshold: u32) -> Step {
    let loc = locate(state, card_id, ZoneKind::Board).ok_or_else(|| Rejected::not_found(card_id, ZoneKind::Board))?;
    let card = &mut state.side_mut(loc.side).board[loc.index];
    card.vice_counters = card.vice_counters.saturating_add(1);
    let counters = card.vice_counters;
    let reached_threshold = counters >= threshold;

    Ok(Applied::new(
        EventType::ViceCounterAdded,
        format!("{} now has {counters} vice counter(s)", cards.name_of(card_id)),
    )
    .with_detail(OutcomeDetail::ViceCounter {
        card_id,
        counters,
        reached_threshold,
    })
    .with_card("card_id", card_id)
    .with_meta("counters", i64::from(counters))
    .with_meta("reached_threshold", i64::from(reached_threshold)))
}

/// Copy of `board` with every vice counter zeroed.
#[must_use]
pub fn reset_vice_counters(board: &Vector<BoardCard>) -> Vector<BoardCard> {
    board
        .iter()
        .map(|card| BoardCard {
            vice_counters: 0,
            ..card.clone()
        })
        .collect()
}

/// Clear every vice counter on `side`'s board.
pub fn clear_vice_counters(state: &mut MatchState, side: Side) -> Step {
    let cleared = state
        .side(side)
        .board
        .iter()
        .filter(|c| c.vice_counters > 0)
        .count();
    let side_state = state.side_mut(side);
    side_state.board = reset_vice_counters(&side_state.board);

    Ok(Applied::new(EventType::ViceCountersReset, format!("Cleared vice counters on {side}'s board"))
        .with_meta("cleared", cleared as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardRegistry, Position};
    use crate::core::{LobbyRef, MatchId, SideMap, UserRef, BREAKDOWN_THRESHOLD};
    use crate::effects::FailureKind;

    const IMP: CardId = CardId::new(1);

    fn setup() -> (CardRegistry, MatchState) {
        let cards: CardRegistry = [CardDefinition::monster(IMP, "Imp", 3, 1200, 800)].into_iter().collect();
        let mut state = MatchState::new(
            MatchId::new("m"),
            LobbyRef("l".into()),
            SideMap::new(|s| UserRef(s.to_string())),
            SideMap::default(),
        );
        let imp = BoardCard::from_definition(cards.get(IMP).unwrap(), Position::Attack, false, 1);
        state.side_mut(Side::Opponent).board.push_back(imp);
        (cards, state)
    }

    #[test]
    fn test_add_reports_threshold() {
        let (cards, mut state) = setup();
        for expected in 1..=BREAKDOWN_THRESHOLD {
            let applied = add_vice_counter(&mut state, &cards, IMP, BREAKDOWN_THRESHOLD).unwrap();
            assert_eq!(
                applied.detail,
                OutcomeDetail::ViceCounter {
                    card_id: IMP,
                    counters: expected,
                    reached_threshold: expected == BREAKDOWN_THRESHOLD,
                }
            );
        }
    }

    #[test]
    fn test_add_missing_card() {
        let (cards, mut state) = setup();
        let rejected = add_vice_counter(&mut state, &cards, CardId::new(9), 3).unwrap_err();
        assert_eq!(rejected.kind, FailureKind::NotFound);
    }

    #[test]
    fn test_reset_is_pure() {
        let (cards, mut state) = setup();
        add_vice_counter(&mut state, &cards, IMP, 3).unwrap();

        let board = state.side(Side::Opponent).board.clone();
        let reset = reset_vice_counters(&board);
        assert_eq!(board[0].vice_counters, 1);
        assert_eq!(reset[0].vice_counters, 0);
        assert_eq!(reset[0].attack, board[0].attack);

        clear_vice_counters(&mut state, Side::Opponent).unwrap();
        assert_eq!(state.side(Side::Opponent).board[0].vice_counters, 0);
    }
}
