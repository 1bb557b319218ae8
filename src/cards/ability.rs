//! Parsed card abilities.
//!
//! Ability text is parsed elsewhere; the engine only sees the result:
//! a list of triggered effects plus a few static flags the rules consult
//! directly.

use serde::{Deserialize, Serialize};

use crate::effects::Effect;

/// When a triggered effect fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    OnSummon,
    OnDestroy,
    OnActivate,
    OnBattle,
    OnTurnStart,
    OnTurnEnd,
}

/// Condition under which a monster may attack directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectAttackCondition {
    /// May always attack directly.
    Always,
    /// May attack directly if the opponent controls no attack-position monsters.
    NoOpponentAttackPosition,
}

/// A trigger paired with the effect it produces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredEffect {
    pub trigger: Trigger,
    pub effect: Effect,
}

impl TriggeredEffect {
    #[must_use]
    pub fn new(trigger: Trigger, effect: Effect) -> Self {
        Self { trigger, effect }
    }
}

/// Parsed ability of a card template.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAbility {
    pub triggered: Vec<TriggeredEffect>,
    pub direct_attack: Option<DirectAttackCondition>,
}

impl ParsedAbility {
    #[must_use]
    pub fn with_triggered(mut self, triggered: TriggeredEffect) -> Self {
        self.triggered.push(triggered);
        self
    }

    #[must_use]
    pub fn with_direct_attack(mut self, condition: DirectAttackCondition) -> Self {
        self.direct_attack = Some(condition);
        self
    }

    /// Does any triggered effect fire on `trigger`?
    #[must_use]
    pub fn has_trigger(&self, trigger: Trigger) -> bool {
        self.triggered.iter().any(|t| t.trigger == trigger)
    }

    /// Effects that fire on `trigger`, in declaration order.
    pub fn effects_for(&self, trigger: Trigger) -> impl Iterator<Item = &Effect> {
        self.triggered
            .iter()
            .filter(move |t| t.trigger == trigger)
            .map(|t| &t.effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effects_for_trigger() {
        let ability = ParsedAbility::default()
            .with_triggered(TriggeredEffect::new(Trigger::OnSummon, Effect::Draw { count: 1 }))
            .with_triggered(TriggeredEffect::new(Trigger::OnDestroy, Effect::Damage { amount: 300 }))
            .with_triggered(TriggeredEffect::new(Trigger::OnSummon, Effect::GainLp { amount: 500 }));

        let on_summon: Vec<_> = ability.effects_for(Trigger::OnSummon).collect();
        assert_eq!(on_summon.len(), 2);
        assert!(ability.has_trigger(Trigger::OnDestroy));
        assert!(!ability.has_trigger(Trigger::OnBattle));
    }
}
