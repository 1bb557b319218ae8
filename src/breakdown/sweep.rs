//! Breakdown sweep and the breakdown win condition.

use smallvec::SmallVec;

use crate::cards::CardId;
use crate::core::{MatchState, Side, SideState};
use crate::effects::{Applied, OutcomeDetail};
use crate::store::EventType;
use crate::zones::lift_from_board;

/// Board cards of one side at or above `threshold` vice counters.
#[must_use]
pub fn offending(side: &SideState, threshold: u32) -> SmallVec<[CardId; 4]> {
    side.board
        .iter()
        .filter(|c| c.vice_counters >= threshold)
        .map(|c| c.card_id)
        .collect()
}

/// Break down every offending card on `side`'s board.
///
/// Each card goes to `side`'s graveyard with the usual equip cascade
/// (tokens are removed instead), and the opponent is credited one
/// breakdown per card. Returns `None` when nothing was at threshold.
pub fn break_down_side(state: &mut MatchState, side: Side, threshold: u32) -> Option<Applied> {
    let cards = offending(state.side(side), threshold);
    if cards.is_empty() {
        return None;
    }

    let mut equips_sent = 0;
    for card_id in &cards {
        let Some(index) = state.side(side).board_index(*card_id) else {
            continue;
        };
        let (card, sent) = lift_from_board(state, side, index);
        equips_sent += sent;
        if !card.is_token() {
            state.side_mut(side).graveyard.push_back(card.card_id);
        }
    }

    let count = cards.len();
    let credited = side.opponent();
    let caused = state.side_mut(credited);
    caused.breakdowns_caused = caused.breakdowns_caused.saturating_add(count as u32);

    let (host, opponent) = match side {
        Side::Host => (count, 0),
        Side::Opponent => (0, count),
    };
    Some(
        Applied::new(EventType::Breakdown, format!("{count} card(s) broke down on {side}'s board"))
            .with_detail(OutcomeDetail::Breakdowns { host, opponent })
            .with_meta("broken", count as i64)
            .with_meta("equips_sent", equips_sent as i64)
            .with_meta("credited_is_host", i64::from(credited.is_host())),
    )
}

/// Decide the breakdown winner, if any.
///
/// `Some(Some(side))` is a win, `Some(None)` a draw, `None` means play
/// continues. When both sides are at or above `max_breakdowns`, the higher
/// count wins and equal counts draw.
#[must_use]
pub fn breakdown_winner(state: &MatchState, max_breakdowns: u32) -> Option<Option<Side>> {
    let host = state.side(Side::Host).breakdowns_caused;
    let opponent = state.side(Side::Opponent).breakdowns_caused;

    match (host >= max_breakdowns, opponent >= max_breakdowns) {
        (false, false) => None,
        (true, false) => Some(Some(Side::Host)),
        (false, true) => Some(Some(Side::Opponent)),
        (true, true) => Some(match host.cmp(&opponent) {
            std::cmp::Ordering::Greater => Some(Side::Host),
            std::cmp::Ordering::Less => Some(Side::Opponent),
            std::cmp::Ordering::Equal => None,
        }),
    }
}
