//! Match rules: phases, turn actions, battle, legality, and the engine.
//!
//! ## Key Types
//!
//! - `Phase`: Turn phase state machine
//! - `LegalMoves`: Every action available to one side
//! - `MatchSetup`: Builds an opening match document
//! - `Engine`: Transactional facade over the match store
//!
//! The executors in `turn` and `battle` only touch a working copy; the
//! engine decides whether the result is committed.

pub mod battle;
pub mod engine;
pub mod legal;
pub mod phase;
pub mod setup;
pub mod turn;
pub mod victory;

pub use battle::declare_attack;
pub use engine::Engine;
pub use legal::{legal_moves, AttackOption, GameStateSummary, LegalMoves, SpellSource, SummonOption};
pub use phase::Phase;
pub use setup::MatchSetup;
pub use turn::{
    activate_spell, activate_trap, advance_phase, change_position, end_turn, normal_summon, resolve_chain_link,
    set_spell_trap, SummonMode,
};
pub use victory::{complete_match, life_point_winner, recorded_result, EndReason, VictoryCheck};
