//! Rules configuration.
//!
//! `RulesConfig` is the one place zone capacities, thresholds, and
//! starting resources are defined. Summons, token generation, and the
//! legal-move enumerator all read board capacity from here.

use serde::{Deserialize, Serialize};

/// Default maximum number of monsters per board.
pub const DEFAULT_BOARD_CAPACITY: usize = 5;

/// Default maximum number of cards in a spell/trap zone.
pub const DEFAULT_SPELL_TRAP_CAPACITY: usize = 5;

/// Vice counters at which a board card breaks down.
pub const BREAKDOWN_THRESHOLD: u32 = 3;

/// Breakdowns a side must inflict to win the match.
pub const MAX_BREAKDOWNS_WIN: u32 = 3;

/// Rules configuration for a match.
///
/// ```
/// use rust_tcg::core::RulesConfig;
///
/// let config = RulesConfig::default().with_board_capacity(3);
/// assert_eq!(config.board_capacity, 3);
/// assert_eq!(config.tributes_for_level(7), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Maximum monsters a board can hold.
    pub board_capacity: usize,

    /// Maximum cards a spell/trap zone can hold (field slot excluded).
    pub spell_trap_capacity: usize,

    /// Life points each side starts with.
    pub starting_life_points: i64,

    /// Cards dealt to each side at match setup.
    pub opening_hand_size: usize,

    /// Vice counters at which a board card breaks down.
    pub breakdown_threshold: u32,

    /// Breakdowns a side must cause to win.
    pub max_breakdowns_win: u32,

    /// Minimum level that needs one tribute.
    pub one_tribute_level: u8,

    /// Minimum level that needs two tributes.
    pub two_tribute_level: u8,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            board_capacity: DEFAULT_BOARD_CAPACITY,
            spell_trap_capacity: DEFAULT_SPELL_TRAP_CAPACITY,
            starting_life_points: 8000,
            opening_hand_size: 5,
            breakdown_threshold: BREAKDOWN_THRESHOLD,
            max_breakdowns_win: MAX_BREAKDOWNS_WIN,
            one_tribute_level: 5,
            two_tribute_level: 7,
        }
    }
}

impl RulesConfig {
    /// Set the board capacity.
    #[must_use]
    pub fn with_board_capacity(mut self, capacity: usize) -> Self {
        self.board_capacity = capacity;
        self
    }

    /// Set the spell/trap zone capacity.
    #[must_use]
    pub fn with_spell_trap_capacity(mut self, capacity: usize) -> Self {
        self.spell_trap_capacity = capacity;
        self
    }

    /// Set starting life points.
    #[must_use]
    pub fn with_starting_life_points(mut self, life: i64) -> Self {
        self.starting_life_points = life;
        self
    }

    /// Set the opening hand size.
    #[must_use]
    pub fn with_opening_hand_size(mut self, size: usize) -> Self {
        self.opening_hand_size = size;
        self
    }

    /// Set the breakdown threshold and the breakdowns needed to win.
    #[must_use]
    pub fn with_breakdowns(mut self, threshold: u32, to_win: u32) -> Self {
        self.breakdown_threshold = threshold;
        self.max_breakdowns_win = to_win;
        self
    }

    /// Number of tributes a monster of `level` needs for a normal summon.
    #[must_use]
    pub fn tributes_for_level(&self, level: u8) -> usize {
        if level >= self.two_tribute_level {
            2
        } else if level >= self.one_tribute_level {
            1
        } else {
            0
        }
    }
}
