//! Match setup.

use rustc_hash::FxHashSet;

use crate::cards::{CardId, CardLookup};
use crate::core::{
    DeckRng, EngineError, EngineResult, LobbyRef, MatchId, MatchState, RulesConfig, Side, SideMap, SideState, UserRef,
};

/// Builds the opening match document from two decks.
///
/// ```
/// use rust_tcg::cards::{CardDefinition, CardId, CardRegistry};
/// use rust_tcg::core::{LobbyRef, MatchId, RulesConfig, Side, SideMap, UserRef};
/// use rust_tcg::rules::MatchSetup;
///
/// let cards: CardRegistry = (1..=20)
///     .map(|i| CardDefinition::monster(CardId::new(i), format!("Card {i}"), 4, 1000, 1000))
///     .collect();
/// let decks = SideMap::new(|side| match side {
///     Side::Host => (1..=10).map(CardId::new).collect::<Vec<_>>(),
///     Side::Opponent => (11..=20).map(CardId::new).collect(),
/// });
///
/// let state = MatchSetup::new(RulesConfig::default(), 42)
///     .build(&cards, MatchId::new("m1"), LobbyRef("l1".into()), SideMap::new(|s| UserRef(s.to_string())), decks)
///     .unwrap();
///
/// assert_eq!(state.side(Side::Host).hand.len(), 5);
/// assert_eq!(state.side(Side::Opponent).deck.len(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct MatchSetup {
    config: RulesConfig,
    seed: u64,
}

impl MatchSetup {
    #[must_use]
    pub fn new(config: RulesConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle both decks, deal opening hands, and set starting life points.
    ///
    /// Every deck entry must be a registered template, and no id may occur
    /// twice across both decks.
    pub fn build(
        &self,
        cards: &dyn CardLookup,
        match_id: MatchId,
        lobby: LobbyRef,
        users: SideMap<UserRef>,
        decks: SideMap<Vec<CardId>>,
    ) -> EngineResult<MatchState> {
        let mut seen = FxHashSet::default();
        for (_, deck) in decks.iter() {
            for &card_id in deck {
                if card_id.is_token_id() || cards.card_definition(card_id).is_none() {
                    return Err(EngineError::UnknownCard(card_id));
                }
                if !seen.insert(card_id) {
                    return Err(EngineError::DuplicateCard(card_id));
                }
            }
        }

        let mut rng = DeckRng::new(self.seed);
        let mut sides = SideMap::default();
        for side in Side::ALL {
            let mut deck = decks[side].clone();
            rng.shuffle(&mut deck);

            let mut state = SideState::new(deck, self.config.starting_life_points);
            let dealt = self.config.opening_hand_size.min(state.deck.len());
            for _ in 0..dealt {
                if let Some(card_id) = state.deck.pop_front() {
                    state.hand.push_back(card_id);
                }
            }
            sides[side] = state;
        }

        Ok(MatchState::new(match_id, lobby, users, sides))
    }
}
