//! Card template lookup.
//!
//! `CardLookup` is the engine's only view of the card catalogue.
//! `CardRegistry` is the in-memory implementation.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};

/// Read-only access to card templates.
pub trait CardLookup {
    /// Get a template by id, or `None` if it does not exist.
    fn card_definition(&self, id: CardId) -> Option<&CardDefinition>;

    /// Display name of a card, falling back to its id.
    fn name_of(&self, id: CardId) -> String {
        self.card_definition(id)
            .map_or_else(|| id.to_string(), |def| def.name.clone())
    }
}

/// In-memory card catalogue keyed by template id.
///
/// ```
/// use rust_tcg::cards::{CardDefinition, CardId, CardLookup, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::monster(CardId::new(1), "Knight", 4, 1800, 1000));
///
/// let found = registry.card_definition(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Knight");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, replacing any template with the same id.
    ///
    /// Returns the replaced template.
    pub fn register(&mut self, card: CardDefinition) -> Option<CardDefinition> {
        self.cards.insert(card.id, card)
    }

    /// Template for `id`. Ids in the token range never resolve.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        if id.is_token_id() {
            return None;
        }
        self.cards.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All templates, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}

impl CardLookup for CardRegistry {
    fn card_definition(&self, id: CardId) -> Option<&CardDefinition> {
        self.get(id)
    }
}

impl FromIterator<CardDefinition> for CardRegistry {
    fn from_iter<I: IntoIterator<Item = CardDefinition>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().map(|card| (card.id, card)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::SpellKind;

    #[test]
    fn test_register_and_lookup() {
        let registry: CardRegistry = [
            CardDefinition::monster(CardId::new(1), "Knight", 4, 1800, 1000),
            CardDefinition::spell(CardId::new(2), "Bolt", SpellKind::Normal),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(CardId::new(2)));
        assert!(registry.card_definition(CardId::new(3)).is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = CardRegistry::new();
        assert!(registry.register(CardDefinition::trap(CardId::new(1), "Old Mirror")).is_none());
        let replaced = registry.register(CardDefinition::trap(CardId::new(1), "Mirror"));

        assert_eq!(replaced.map(|c| c.name), Some("Old Mirror".to_string()));
        assert_eq!(registry.name_of(CardId::new(1)), "Mirror");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_token_ids_never_resolve() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::trap(CardId::token(0), "Impostor"));

        assert!(registry.card_definition(CardId::token(0)).is_none());
        assert!(!registry.contains(CardId::token(0)));
        assert_eq!(registry.name_of(CardId::new(9)), CardId::new(9).to_string());
    }
}
