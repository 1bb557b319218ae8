//! Core engine types: sides, match state, configuration, errors, RNG.

pub mod player;
pub mod config;
pub mod error;
pub mod rng;
pub mod state;

pub use player::{Side, SideMap};
pub use config::{RulesConfig, BREAKDOWN_THRESHOLD, MAX_BREAKDOWNS_WIN};
pub use error::{EngineError, EngineResult};
pub use rng::DeckRng;
pub use state::{LobbyRef, MatchId, MatchState, MatchStatus, SideState, UserRef};
