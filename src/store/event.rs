//! Match events.
//!
//! Every committed engine step appends one `GameEvent` to the match's
//! audit log. The log is append-only and owned outside the engine; a
//! failed append never rolls back the step that produced it.

use serde::{Deserialize, Serialize};

use crate::core::{EngineResult, MatchId, Side};
use crate::effects::Metadata;

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    CardDrawn,
    CardToHand,
    CardToGraveyard,
    CardBanished,
    CardToDeck,
    CardDestroyed,
    TokenGenerated,
    TokenRemoved,
    StatModified,
    LifePointsChanged,
    NormalSummon,
    SpecialSummon,
    SpellTrapSet,
    EquipAttached,
    ChainLinkAdded,
    ChainLinkResolved,
    ActivationNegated,
    PositionChanged,
    BattleResolved,
    PhaseChanged,
    TurnEnded,
    ViceCounterAdded,
    ViceCountersReset,
    Breakdown,
    BreakdownVictory,
    Forfeit,
    MatchCompleted,
}

impl EventType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EventType::CardDrawn => "card_drawn",
            EventType::CardToHand => "card_to_hand",
            EventType::CardToGraveyard => "card_to_graveyard",
            EventType::CardBanished => "card_banished",
            EventType::CardToDeck => "card_to_deck",
            EventType::CardDestroyed => "card_destroyed",
            EventType::TokenGenerated => "token_generated",
            EventType::TokenRemoved => "token_removed",
            EventType::StatModified => "stat_modified",
            EventType::LifePointsChanged => "life_points_changed",
            EventType::NormalSummon => "normal_summon",
            EventType::SpecialSummon => "special_summon",
            EventType::SpellTrapSet => "spell_trap_set",
            EventType::EquipAttached => "equip_attached",
            EventType::ChainLinkAdded => "chain_link_added",
            EventType::ChainLinkResolved => "chain_link_resolved",
            EventType::ActivationNegated => "activation_negated",
            EventType::PositionChanged => "position_changed",
            EventType::BattleResolved => "battle_resolved",
            EventType::PhaseChanged => "phase_changed",
            EventType::TurnEnded => "turn_ended",
            EventType::ViceCounterAdded => "vice_counter_added",
            EventType::ViceCountersReset => "vice_counters_reset",
            EventType::Breakdown => "breakdown",
            EventType::BreakdownVictory => "breakdown_victory",
            EventType::Forfeit => "forfeit",
            EventType::MatchCompleted => "match_completed",
        }
    }

    /// Does this event end the match?
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            EventType::BreakdownVictory | EventType::Forfeit | EventType::MatchCompleted
        )
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a match's audit log.
///
/// ## Metadata
///
/// Values are `i64`: card ids as their raw value, flags as 0/1, sides as
/// `*_is_host` flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub match_id: MatchId,
    pub turn_number: u32,
    pub event_type: EventType,
    /// Side whose action produced the event, if any.
    pub acting_player: Option<Side>,
    pub description: String,
    pub metadata: Metadata,
}

impl GameEvent {
    pub fn new(match_id: MatchId, turn_number: u32, event_type: EventType, description: impl Into<String>) -> Self {
        Self {
            match_id,
            turn_number,
            event_type,
            acting_player: None,
            description: description.into(),
            metadata: Metadata::default(),
        }
    }

    #[must_use]
    pub fn with_player(mut self, side: Option<Side>) -> Self {
        self.acting_player = side;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Metadata value, or a default.
    #[must_use]
    pub fn value(&self, key: &str, default: i64) -> i64 {
        self.metadata.get(key).copied().unwrap_or(default)
    }
}

/// Append-only event sink.
pub trait EventRecorder {
    /// Append an event. Errors are logged by the engine and otherwise ignored.
    fn record_event(&mut self, event: GameEvent) -> EngineResult<()>;
}

/// In-memory event log.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    /// Events of one type, oldest first.
    pub fn of_type(&self, event_type: EventType) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().filter(move |e| e.event_type == event_type)
    }

    /// Events for one match, oldest first.
    pub fn for_match<'a>(&'a self, match_id: &'a MatchId) -> impl Iterator<Item = &'a GameEvent> {
        self.events.iter().filter(move |e| &e.match_id == match_id)
    }
}

impl EventRecorder for EventLog {
    fn record_event(&mut self, event: GameEvent) -> EngineResult<()> {
        self.events.push(event);
        Ok(())
    }
}
