//! Hard errors.
//!
//! Game-logic failures (missing target, protected card, full zone) are
//! not errors: they come back as an unsuccessful `EffectOutcome`. The
//! variants here abort a call because the match document or a card
//! reference cannot be trusted.

use thiserror::Error;

use super::state::MatchId;
use crate::cards::CardId;

/// Errors that abort an engine call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("card template not found: {0}")]
    UnknownCard(CardId),

    #[error("card appears more than once across both decks: {0}")]
    DuplicateCard(CardId),

    #[error("match snapshot error: {0}")]
    Snapshot(String),

    #[error("event recorder error: {0}")]
    Recorder(String),

    #[error("match lifecycle error: {0}")]
    Lifecycle(String),
}

impl From<bincode::Error> for EngineError {
    fn from(err: bincode::Error) -> Self {
        EngineError::Snapshot(err.to_string())
    }
}

/// Result alias for engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::MatchNotFound(MatchId::new("m1"));
        assert_eq!(err.to_string(), "match not found: m1");

        let err = EngineError::UnknownCard(CardId::new(42));
        assert_eq!(err.to_string(), "card template not found: Card(42)");

        let err = EngineError::DuplicateCard(CardId::new(7));
        assert_eq!(err.to_string(), "card appears more than once across both decks: Card(7)");
    }
}
