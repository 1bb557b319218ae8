//! Match/lobby lifecycle.

use crate::core::{EngineResult, MatchId, Side};

/// Receives terminal results. Owned by the lobby service.
pub trait MatchLifecycle {
    /// Record that a match ended. `winner: None` is a draw.
    fn mark_match_completed(&mut self, id: &MatchId, winner: Option<Side>) -> EngineResult<()>;
}

/// In-memory lifecycle sink that remembers every completion it was told about.
#[derive(Clone, Debug, Default)]
pub struct LifecycleLog {
    completed: Vec<(MatchId, Option<Side>)>,
}

impl LifecycleLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn completed(&self) -> &[(MatchId, Option<Side>)] {
        &self.completed
    }

    /// How many times `id` was marked completed.
    #[must_use]
    pub fn times_completed(&self, id: &MatchId) -> usize {
        self.completed.iter().filter(|(m, _)| m == id).count()
    }
}

impl MatchLifecycle for LifecycleLog {
    fn mark_match_completed(&mut self, id: &MatchId, winner: Option<Side>) -> EngineResult<()> {
        self.completed.push((id.clone(), winner));
        Ok(())
    }
}
