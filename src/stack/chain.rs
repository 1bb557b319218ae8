//! The chain: activations in flight, resolved last-in first-out.
//!
//! A link is pushed when a card is activated and popped when it resolves.
//! Negation only flags a link; a negated link fizzles when it reaches the
//! top instead of resolving.

use serde::{Deserialize, Serialize};

use super::negation::NegateScope;
use crate::cards::CardId;
use crate::core::Side;

/// One activation on the chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainLink {
    pub card_id: CardId,
    /// Side that activated the card.
    pub activator: Side,
    pub negated: bool,
    /// How the link was negated, if it was.
    pub negated_scope: Option<NegateScope>,
}

impl ChainLink {
    #[must_use]
    pub fn new(card_id: CardId, activator: Side) -> Self {
        Self {
            card_id,
            activator,
            negated: false,
            negated_scope: None,
        }
    }
}

/// LIFO chain of activations.
///
/// ```
/// use rust_tcg::cards::CardId;
/// use rust_tcg::core::Side;
/// use rust_tcg::stack::{Chain, NegateScope};
///
/// let mut chain = Chain::new();
/// chain.push(CardId::new(1), Side::Host);
/// let index = chain.push(CardId::new(2), Side::Opponent);
/// chain.negate(index, NegateScope::Activation);
///
/// let top = chain.resolve_top().unwrap();
/// assert!(top.negated);
/// assert_eq!(chain.resolve_top().unwrap().card_id, CardId::new(1));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chain {
    links: Vec<ChainLink>,
}

impl Chain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an activation. Returns its index (0 is the first link).
    pub fn push(&mut self, card_id: CardId, activator: Side) -> usize {
        self.links.push(ChainLink::new(card_id, activator));
        self.links.len() - 1
    }

    /// Does any link reference `card_id`?
    #[must_use]
    pub fn contains(&self, card_id: CardId) -> bool {
        self.links.iter().any(|l| l.card_id == card_id)
    }

    /// Index of the topmost link for `card_id` that is not yet negated.
    #[must_use]
    pub fn active_index(&self, card_id: CardId) -> Option<usize> {
        self.links
            .iter()
            .rposition(|l| l.card_id == card_id && !l.negated)
    }

    /// Flag the link at `index` as negated. Returns false if there is no such link.
    pub fn negate(&mut self, index: usize, scope: NegateScope) -> bool {
        match self.links.get_mut(index) {
            Some(link) => {
                link.negated = true;
                link.negated_scope = Some(scope);
                true
            }
            None => false,
        }
    }

    /// Pop the topmost link.
    pub fn resolve_top(&mut self) -> Option<ChainLink> {
        self.links.pop()
    }

    #[must_use]
    pub fn top(&self) -> Option<&ChainLink> {
        self.links.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links from first activated to most recent.
    #[must_use]
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_resolve_lifo() {
        let mut chain = Chain::new();
        assert_eq!(chain.push(CardId::new(1), Side::Host), 0);
        assert_eq!(chain.push(CardId::new(2), Side::Opponent), 1);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.top().map(|l| l.card_id), Some(CardId::new(2)));

        assert_eq!(chain.resolve_top().map(|l| l.card_id), Some(CardId::new(2)));
        assert_eq!(chain.resolve_top().map(|l| l.card_id), Some(CardId::new(1)));
        assert!(chain.resolve_top().is_none());
        assert!(chain.is_empty());
    }

    #[test]
    fn test_active_index_skips_negated() {
        let mut chain = Chain::new();
        chain.push(CardId::new(7), Side::Host);
        let second = chain.push(CardId::new(7), Side::Host);

        assert_eq!(chain.active_index(CardId::new(7)), Some(second));
        assert!(chain.negate(second, NegateScope::Effect));
        assert_eq!(chain.active_index(CardId::new(7)), Some(0));
        assert!(chain.negate(0, NegateScope::Activation));
        assert_eq!(chain.active_index(CardId::new(7)), None);
        assert!(chain.contains(CardId::new(7)));
    }

    #[test]
    fn test_negate_out_of_range() {
        let mut chain = Chain::new();
        assert!(!chain.negate(0, NegateScope::Activation));
    }

    #[test]
    fn test_chain_serialization() {
        let mut chain = Chain::new();
        let idx = chain.push(CardId::new(3), Side::Opponent);
        chain.negate(idx, NegateScope::Activation);

        let json = serde_json::to_string(&chain).unwrap();
        let deserialized: Chain = serde_json::from_str(&json).unwrap();
        assert_eq!(chain, deserialized);
    }
}
