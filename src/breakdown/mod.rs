//! Breakdown (vice counter) subsystem.
//!
//! Vice counters stack on board cards. A card at the breakdown threshold
//! is removed by the sweep and its controller's opponent is credited with
//! a breakdown; enough credited breakdowns win the match.
//!
//! The sweep itself is driven by the engine, which commits the host
//! side's breakdowns and re-reads the match before processing the
//! opponent's.

mod counters;
mod sweep;

pub use counters::{add_vice_counter, clear_vice_counters, reset_vice_counters};
pub use sweep::{break_down_side, breakdown_winner, offending};
