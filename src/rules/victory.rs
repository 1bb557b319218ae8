//! Terminal conditions.
//!
//! Life points at 0, deck-out, forfeit and the breakdown count all end the
//! match through [`complete_match`]. Once a match is completed every
//! further check reports the recorded result and changes nothing.

use serde::{Deserialize, Serialize};

use crate::core::{MatchState, MatchStatus, Side};
use crate::effects::{Applied, OutcomeDetail};
use crate::store::EventType;

/// Result of a terminal-condition check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictoryCheck {
    /// No terminal condition holds.
    Ongoing,
    /// This check ended the match. `winner: None` is a draw.
    Decided { winner: Option<Side> },
    /// The match had already ended.
    AlreadyCompleted { winner: Option<Side> },
}

impl VictoryCheck {
    /// The winner, if the match is over and was not drawn.
    #[must_use]
    pub fn winner(self) -> Option<Side> {
        match self {
            VictoryCheck::Ongoing => None,
            VictoryCheck::Decided { winner } | VictoryCheck::AlreadyCompleted { winner } => winner,
        }
    }

    #[must_use]
    pub fn is_over(self) -> bool {
        !matches!(self, VictoryCheck::Ongoing)
    }
}

/// Why a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    LifePoints,
    DeckOut,
    Forfeit,
    Breakdowns,
}

impl EndReason {
    fn event(self) -> EventType {
        match self {
            EndReason::Breakdowns => EventType::BreakdownVictory,
            EndReason::Forfeit => EventType::Forfeit,
            EndReason::LifePoints | EndReason::DeckOut => EventType::MatchCompleted,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EndReason::LifePoints => "life points",
            EndReason::DeckOut => "deck out",
            EndReason::Forfeit => "forfeit",
            EndReason::Breakdowns => "breakdowns",
        }
    }
}

/// Mark the match completed on the working copy.
pub fn complete_match(state: &mut MatchState, winner: Option<Side>, reason: EndReason) -> Applied {
    state.status = MatchStatus::Completed { winner };
    let message = match winner {
        Some(side) => format!("{side} wins by {}", reason.as_str()),
        None => format!("Match drawn by {}", reason.as_str()),
    };
    let applied = Applied::new(reason.event(), message).with_detail(OutcomeDetail::Completed { winner });
    match winner {
        Some(side) => applied.with_meta("winner_is_host", i64::from(side.is_host())),
        None => applied.with_meta("draw", 1),
    }
}

/// Recorded result of a completed match, if any.
#[must_use]
pub fn recorded_result(state: &MatchState) -> Option<Option<Side>> {
    match state.status {
        MatchStatus::Completed { winner } => Some(winner),
        MatchStatus::Active => None,
    }
}

/// Life-point winner: a side at 0 loses; both at 0 is a draw.
#[must_use]
pub fn life_point_winner(state: &MatchState) -> Option<Option<Side>> {
    let host_out = state.side(Side::Host).life_points <= 0;
    let opponent_out = state.side(Side::Opponent).life_points <= 0;
    match (host_out, opponent_out) {
        (false, false) => None,
        (true, false) => Some(Some(Side::Opponent)),
        (false, true) => Some(Some(Side::Host)),
        (true, true) => Some(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LobbyRef, MatchId, SideMap, SideState, UserRef};

    fn state() -> MatchState {
        MatchState::new(
            MatchId::new("m"),
            LobbyRef("l".into()),
            SideMap::new(|s| UserRef(s.to_string())),
            SideMap::new(|_| SideState::new([], 8000)),
        )
    }

    #[test]
    fn test_life_point_winner() {
        let mut state = state();
        assert_eq!(life_point_winner(&state), None);

        state.side_mut(Side::Host).life_points = 0;
        assert_eq!(life_point_winner(&state), Some(Some(Side::Opponent)));

        state.side_mut(Side::Opponent).life_points = 0;
        assert_eq!(life_point_winner(&state), Some(None));
    }

    #[test]
    fn test_complete_match() {
        let mut state = state();
        let applied = complete_match(&mut state, Some(Side::Opponent), EndReason::Forfeit);

        assert_eq!(applied.event, EventType::Forfeit);
        assert_eq!(applied.detail, OutcomeDetail::Completed { winner: Some(Side::Opponent) });
        assert_eq!(recorded_result(&state), Some(Some(Side::Opponent)));
        assert_eq!(VictoryCheck::Decided { winner: Some(Side::Host) }.winner(), Some(Side::Host));
        assert!(!VictoryCheck::Ongoing.is_over());
    }
}
