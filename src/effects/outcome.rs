//! Executor results.
//!
//! Executors return a [`Step`]: `Ok(Applied)` when the working copy of
//! the match was changed and should be committed, `Err(Rejected)` when
//! the action is not possible and nothing may be written. The engine turns
//! either into an [`EffectOutcome`] for the caller.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::Side;
use crate::store::EventType;

/// Game-logic failure categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Target card absent from the claimed zone on either side.
    NotFound,
    /// Destroy blocked by a "cannot be destroyed by effects" flag.
    Protected,
    /// Board or spell/trap zone full.
    CapacityExceeded,
    /// Negation target has no active chain entry.
    NotOnChain,
    /// Negation target's card type doesn't match the declared scope.
    TypeMismatch,
    /// Empty deck, or life points already at the floor.
    ResourceExhausted,
    /// Action attempted outside its phase, turn, or once-per-turn window.
    IllegalAction,
}

impl FailureKind {
    /// Stable upper-snake code for clients.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            FailureKind::NotFound => "NOT_FOUND",
            FailureKind::Protected => "PROTECTED",
            FailureKind::CapacityExceeded => "CAPACITY_EXCEEDED",
            FailureKind::NotOnChain => "NOT_ON_CHAIN",
            FailureKind::TypeMismatch => "TYPE_MISMATCH",
            FailureKind::ResourceExhausted => "RESOURCE_EXHAUSTED",
            FailureKind::IllegalAction => "ILLEGAL_ACTION",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Structured payload of an outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeDetail {
    #[default]
    None,
    /// A card changed zones. `removed` is true when a token ceased to exist instead.
    Moved { card_id: CardId, owner: Side, removed: bool, equips_sent: usize },
    Drew { requested: usize, drawn: usize },
    Stat { card_id: CardId, value: i64 },
    LifePoints { side: Side, value: i64 },
    Summoned { card_id: CardId, owner: Side, tributes: usize },
    Tokens { requested: usize, created: usize, ids: Vec<CardId> },
    Destroyed { card_id: CardId, owner: Side, has_destroy_trigger: bool, equips_sent: usize, removed: bool },
    ChainLink { card_id: CardId, index: usize },
    ViceCounter { card_id: CardId, counters: u32, reached_threshold: bool },
    Breakdowns { host: usize, opponent: usize },
    Battle { attacker: CardId, defender: Option<CardId>, damage: i64, damaged: Option<Side>, destroyed: Vec<CardId> },
    Resolved { card_id: CardId, negated: bool },
    Completed { winner: Option<Side> },
}

/// Event metadata. Values follow the engine's i64-only convention:
/// card ids as their raw value, flags as 0/1.
pub type Metadata = FxHashMap<String, i64>;

/// A change that was applied to the working copy.
#[derive(Clone, Debug)]
pub struct Applied {
    pub event: EventType,
    pub message: String,
    pub detail: OutcomeDetail,
    pub metadata: Metadata,
}

impl Applied {
    pub fn new(event: EventType, message: impl Into<String>) -> Self {
        Self {
            event,
            message: message.into(),
            detail: OutcomeDetail::None,
            metadata: Metadata::default(),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: OutcomeDetail) -> Self {
        self.detail = detail;
        self
    }

    #[must_use]
    pub fn with_meta(mut self, key: &str, value: i64) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    #[must_use]
    pub fn with_card(self, key: &str, card_id: CardId) -> Self {
        self.with_meta(key, i64::from(card_id.raw()))
    }
}

/// An action that could not be applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejected {
    pub kind: FailureKind,
    pub message: String,
    pub detail: OutcomeDetail,
}

impl Rejected {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: OutcomeDetail::None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: OutcomeDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn not_found(card_id: CardId, zone: impl std::fmt::Display) -> Self {
        Self::new(FailureKind::NotFound, format!("{card_id} not found in {zone}"))
    }

    pub fn illegal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::IllegalAction, message)
    }
}

/// Result of one executor run against a working copy.
pub type Step = Result<Applied, Rejected>;

/// What the caller sees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectOutcome {
    pub success: bool,
    pub message: String,
    pub failure: Option<FailureKind>,
    pub detail: OutcomeDetail,
}

impl EffectOutcome {
    #[must_use]
    pub fn is_failure(&self, kind: FailureKind) -> bool {
        self.failure == Some(kind)
    }
}

impl From<Applied> for EffectOutcome {
    fn from(applied: Applied) -> Self {
        Self {
            success: true,
            message: applied.message,
            failure: None,
            detail: applied.detail,
        }
    }
}

impl From<Rejected> for EffectOutcome {
    fn from(rejected: Rejected) -> Self {
        Self {
            success: false,
            message: rejected.message,
            failure: Some(rejected.kind),
            detail: rejected.detail,
        }
    }
}
