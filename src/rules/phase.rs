//! Turn phases.

use serde::{Deserialize, Serialize};

/// Phases of a turn, in order. `End` is followed by the next player's `Draw`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Draw,
    Main1,
    BattleStart,
    Battle,
    BattleEnd,
    Main2,
    End,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::Draw,
        Phase::Main1,
        Phase::BattleStart,
        Phase::Battle,
        Phase::BattleEnd,
        Phase::Main2,
        Phase::End,
    ];

    /// The following phase in the cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Phase::Draw => Phase::Main1,
            Phase::Main1 => Phase::BattleStart,
            Phase::BattleStart => Phase::Battle,
            Phase::Battle => Phase::BattleEnd,
            Phase::BattleEnd => Phase::Main2,
            Phase::Main2 => Phase::End,
            Phase::End => Phase::Draw,
        }
    }

    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, Phase::Main1 | Phase::Main2)
    }

    /// Phases in which attacks may be declared.
    #[must_use]
    pub const fn allows_attacks(self) -> bool {
        matches!(self, Phase::BattleStart | Phase::Battle)
    }

    /// Any of the three battle phases.
    #[must_use]
    pub const fn is_battle(self) -> bool {
        matches!(self, Phase::BattleStart | Phase::Battle | Phase::BattleEnd)
    }

    /// Phases from which the turn may be ended.
    #[must_use]
    pub const fn allows_end_turn(self) -> bool {
        matches!(self, Phase::Main2 | Phase::End)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Draw => "draw",
            Phase::Main1 => "main1",
            Phase::BattleStart => "battle_start",
            Phase::Battle => "battle",
            Phase::BattleEnd => "battle_end",
            Phase::Main2 => "main2",
            Phase::End => "end",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
