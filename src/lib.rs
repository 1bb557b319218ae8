//! # rust-tcg
//!
//! Authoritative rules engine for a two-player trading card game match.
//!
//! ## Design Principles
//!
//! 1. **Working Copies**: Every action runs against a clone of the match
//!    document. Nothing is written unless the action succeeds.
//!
//! 2. **Ownership by Membership**: A card belongs to whichever side's zone
//!    holds it. There is no separate owner field to drift out of sync.
//!
//! 3. **Failures Are Values**: Game-rule violations come back as an
//!    unsuccessful `EffectOutcome` with a stable code. `EngineError` is
//!    reserved for missing documents and unknown card templates.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Zones are `im-rs` vectors, so the
//!   working copy of a match is a cheap clone.
//!
//! - **Field Patches**: Commits write only the top-level fields that
//!   changed (`MatchPatch`), so independent writes don't clobber each other.
//!
//! ## Modules
//!
//! - `core`: Sides, match document, configuration, errors, deck RNG
//! - `cards`: Card templates, board instances, registry
//! - `zones`: Card location and zone transitions
//! - `effects`: Stat, summon and equip executors, effect dispatch
//! - `stack`: Activation chain and negation
//! - `breakdown`: Vice counters and the breakdown sweep
//! - `rules`: Phases, turn actions, battle, legal moves, the engine
//! - `store`: Match store, event log and lifecycle interfaces

pub mod core;
pub mod cards;
pub mod zones;
pub mod effects;
pub mod stack;
pub mod breakdown;
pub mod rules;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    EngineError, EngineResult,
    LobbyRef, MatchId, MatchState, MatchStatus, SideState, UserRef,
    RulesConfig, Side, SideMap,
};

pub use crate::cards::{
    BoardCard, CardDefinition, CardId, CardLookup, CardRegistry, CardType, Position, SpellKind, ZoneCard,
};

pub use crate::zones::{DeckPosition, Location, ZoneKind};

pub use crate::effects::{Effect, EffectOutcome, EffectResolver, FailureKind, OutcomeDetail, Target, TokenSpec};

pub use crate::stack::{Chain, ChainLink, NegateFilter, NegateScope};

pub use crate::rules::{Engine, EndReason, LegalMoves, MatchSetup, Phase, SummonMode, VictoryCheck};

pub use crate::store::{
    EventLog, EventRecorder, EventType, GameEvent, LifecycleLog, MatchLifecycle, MatchPatch, MatchStore,
    MemoryMatchStore,
};
