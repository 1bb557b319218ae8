//! Zone transition executors.
//!
//! Every executor here works on a working copy of the match document and
//! follows the same contract:
//!
//! 1. Locate the card in the claimed source zone (on either side unless
//!    the variant is restricted to the actor's own zones).
//! 2. Reject with `NOT_FOUND` if it is not there.
//! 3. Lift it out of the source zone.
//! 4. Leaving a board sends every equip attached to it to the graveyard of
//!    the side whose spell/trap zone held the equip.
//! 5. Leaving a spell/trap zone detaches an equip from its host monster.
//! 6. A token that leaves a board ceases to exist and is never placed.
//! 7. Place the card in the destination zone of the side that owned it.

use serde::{Deserialize, Serialize};

use super::location::{locate, locate_any, locate_on, Location, ZoneKind};
use crate::cards::{BoardCard, CardId, CardLookup, ZoneCard};
use crate::core::{EngineError, EngineResult, MatchState, Side, SideState};
use crate::effects::{Applied, FailureKind, OutcomeDetail, Rejected, Step};
use crate::store::EventType;

/// Where a card returned to the deck is inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckPosition {
    Top,
    Bottom,
    /// Appended like `Bottom`; reordering is left to the deck-order mechanism.
    Shuffle,
}

/// Non-field destination of a zone transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    Hand,
    Graveyard,
    Banished,
    Deck(DeckPosition),
}

impl Destination {
    #[must_use]
    pub fn zone(self) -> ZoneKind {
        match self {
            Destination::Hand => ZoneKind::Hand,
            Destination::Graveyard => ZoneKind::Graveyard,
            Destination::Banished => ZoneKind::Banished,
            Destination::Deck(_) => ZoneKind::Deck,
        }
    }

    fn event(self) -> EventType {
        match self {
            Destination::Hand => EventType::CardToHand,
            Destination::Graveyard => EventType::CardToGraveyard,
            Destination::Banished => EventType::CardBanished,
            Destination::Deck(_) => EventType::CardToDeck,
        }
    }
}

/// Which sides a lookup may search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Search {
    EitherSide,
    OwnSide(Side),
}

/// A card that has left its zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exit {
    pub card_id: CardId,
    pub owner: Side,
    /// Name of the token, if the card was a token.
    pub token_name: Option<String>,
    pub equips_sent: usize,
}

impl Exit {
    #[must_use]
    pub fn is_token(&self) -> bool {
        self.token_name.is_some()
    }
}

/// Send every equip attached to `host` to the graveyard of the side holding it.
///
/// Returns the number of equips sent.
pub fn send_equips_to_graveyard(state: &mut MatchState, host: &BoardCard) -> usize {
    let attached = |z: &ZoneCard| z.equipped_to == Some(host.card_id);
    let mut sent = 0;

    for side in Side::ALL {
        let side_state = state.side_mut(side);
        let equips: Vec<CardId> = side_state
            .spell_trap_zone
            .iter()
            .filter(|&z| attached(z))
            .map(|z| z.card_id)
            .collect();
        if equips.is_empty() {
            continue;
        }
        side_state.spell_trap_zone.retain(|z| !attached(z));
        sent += equips.len();
        side_state.graveyard.extend(equips);
    }

    sent
}

/// Remove `equip` from the equipped list of whichever monster carries it.
pub fn detach_equip_everywhere(state: &mut MatchState, equip: CardId) {
    for side in Side::ALL {
        for card in state.side_mut(side).board.iter_mut() {
            card.detach_equip(equip);
        }
    }
}

/// Lift a board card out, applying the equip cascade.
pub fn lift_from_board(state: &mut MatchState, side: Side, index: usize) -> (BoardCard, usize) {
    let card = state.side_mut(side).board.remove(index);
    let sent = send_equips_to_graveyard(state, &card);
    (card, sent)
}

/// Lift the card at `loc` out of its zone, applying cascade and detach rules.
///
/// Returns `None` only if `loc` no longer points at a card.
pub fn lift(state: &mut MatchState, loc: Location) -> Option<Exit> {
    let side = loc.side;
    match loc.zone {
        ZoneKind::Board => {
            if loc.index >= state.side(side).board.len() {
                return None;
            }
            let (card, equips_sent) = lift_from_board(state, side, loc.index);
            Some(Exit {
                card_id: card.card_id,
                owner: side,
                token_name: card.token.map(|t| t.name),
                equips_sent,
            })
        }
        ZoneKind::SpellTrap | ZoneKind::FieldSpell => {
            let zone_card = take_zone_card(state.side_mut(side), loc)?;
            detach_equip_everywhere(state, zone_card.card_id);
            Some(Exit {
                card_id: zone_card.card_id,
                owner: side,
                token_name: None,
                equips_sent: 0,
            })
        }
        ZoneKind::Hand | ZoneKind::Deck | ZoneKind::Graveyard | ZoneKind::Banished => {
            let side_state = state.side_mut(side);
            let zone = match loc.zone {
                ZoneKind::Hand => &mut side_state.hand,
                ZoneKind::Deck => &mut side_state.deck,
                ZoneKind::Graveyard => &mut side_state.graveyard,
                _ => &mut side_state.banished,
            };
            if loc.index >= zone.len() {
                return None;
            }
            let card_id = zone.remove(loc.index);
            Some(Exit {
                card_id,
                owner: side,
                token_name: None,
                equips_sent: 0,
            })
        }
    }
}

fn take_zone_card(side: &mut SideState, loc: Location) -> Option<ZoneCard> {
    if loc.zone == ZoneKind::FieldSpell {
        side.field_spell.take()
    } else if loc.index < side.spell_trap_zone.len() {
        Some(side.spell_trap_zone.remove(loc.index))
    } else {
        None
    }
}

/// Place a card in one side's destination zone.
pub fn place(side: &mut SideState, card_id: CardId, to: Destination) {
    match to {
        Destination::Hand => side.hand.push_back(card_id),
        Destination::Graveyard => side.graveyard.push_back(card_id),
        Destination::Banished => side.banished.push_back(card_id),
        Destination::Deck(DeckPosition::Top) => side.deck.push_front(card_id),
        Destination::Deck(DeckPosition::Bottom | DeckPosition::Shuffle) => side.deck.push_back(card_id),
    }
}

/// Move a card between zones.
///
/// The destination side is the side that owned the card, never the actor.
pub fn transfer(
    state: &mut MatchState,
    cards: &dyn CardLookup,
    card_id: CardId,
    from: ZoneKind,
    to: Destination,
    search: Search,
) -> Step {
    if from == to.zone() {
        return Err(Rejected::illegal(format!("{card_id} is already in the {from}")));
    }

    let found = match search {
        Search::EitherSide => locate(state, card_id, from),
        Search::OwnSide(side) => locate_on(state, side, card_id, from),
    };
    let loc = found.ok_or_else(|| Rejected::not_found(card_id, from))?;
    let exit = lift(state, loc).ok_or_else(|| Rejected::not_found(card_id, from))?;

    let detail = OutcomeDetail::Moved {
        card_id,
        owner: exit.owner,
        removed: exit.is_token(),
        equips_sent: exit.equips_sent,
    };

    let applied = if let Some(name) = &exit.token_name {
        Applied::new(EventType::TokenRemoved, format!("{name} left the field and was removed"))
    } else {
        place(state.side_mut(exit.owner), card_id, to);
        Applied::new(to.event(), format!("Moved {} from {from} to {}", cards.name_of(card_id), to.zone()))
    };

    Ok(applied
        .with_detail(detail)
        .with_card("card_id", card_id)
        .with_meta("owner_is_host", i64::from(exit.owner.is_host()))
        .with_meta("equips_sent", exit.equips_sent as i64))
}

/// Draw up to `count` cards from the top of `side`'s deck.
///
/// A short deck yields a partial draw reported as success; an empty deck
/// is a deck-out failure.
pub fn draw(state: &mut MatchState, side: Side, count: usize) -> Step {
    let side_state = state.side_mut(side);
    if side_state.deck.is_empty() {
        return Err(Rejected::new(FailureKind::ResourceExhausted, "Deck out: no cards left to draw")
            .with_detail(OutcomeDetail::Drew { requested: count, drawn: 0 }));
    }

    let drawn = count.min(side_state.deck.len());
    for _ in 0..drawn {
        if let Some(card_id) = side_state.deck.pop_front() {
            side_state.hand.push_back(card_id);
        }
    }

    let message = if drawn < count {
        format!("Drew {drawn} of {count} requested card(s); deck exhausted")
    } else {
        format!("Drew {drawn} card(s)")
    };

    Ok(Applied::new(EventType::CardDrawn, message)
        .with_detail(OutcomeDetail::Drew { requested: count, drawn })
        .with_meta("requested", count as i64)
        .with_meta("drawn", drawn as i64))
}

/// Return a card to its owner's hand.
///
/// Graveyard and banished retrievals only search the actor's own zones;
/// from the board this is a bounce that may target either side's monster.
pub fn to_hand(state: &mut MatchState, cards: &dyn CardLookup, actor: Side, card_id: CardId, from: ZoneKind) -> Step {
    let search = match from {
        ZoneKind::Graveyard | ZoneKind::Banished => Search::OwnSide(actor),
        ZoneKind::Board => Search::EitherSide,
        other => return Err(Rejected::illegal(format!("cannot return a card to hand from the {other}"))),
    };
    transfer(state, cards, card_id, from, Destination::Hand, search)
}

/// Send a card to its owner's graveyard.
pub fn to_graveyard(state: &mut MatchState, cards: &dyn CardLookup, card_id: CardId, from: ZoneKind) -> Step {
    transfer(state, cards, card_id, from, Destination::Graveyard, Search::EitherSide)
}

/// Banish a card.
pub fn banish(state: &mut MatchState, cards: &dyn CardLookup, card_id: CardId, from: ZoneKind) -> Step {
    transfer(state, cards, card_id, from, Destination::Banished, Search::EitherSide)
}

/// Return a card to its owner's deck.
pub fn return_to_deck(
    state: &mut MatchState,
    cards: &dyn CardLookup,
    card_id: CardId,
    from: ZoneKind,
    position: DeckPosition,
) -> Step {
    transfer(state, cards, card_id, from, Destination::Deck(position), Search::EitherSide)
}

/// Destroy a card on the field by card effect.
///
/// Board monsters flagged `cannot_be_destroyed_by_effects` are protected.
/// The detail reports whether the destroyed card declares an on-destroy
/// trigger; resolving it is up to the caller.
pub fn destroy(state: &mut MatchState, cards: &dyn CardLookup, card_id: CardId) -> EngineResult<Step> {
    let zones = [ZoneKind::Board, ZoneKind::SpellTrap, ZoneKind::FieldSpell];
    let Some(loc) = locate_any(state, card_id, &zones) else {
        return Ok(Err(Rejected::not_found(card_id, "the field")));
    };

    let mut is_token = false;
    if loc.zone == ZoneKind::Board {
        let card = &state.side(loc.side).board[loc.index];
        if card.cannot_be_destroyed_by_effects {
            return Ok(Err(Rejected::new(
                FailureKind::Protected,
                format!("{} cannot be destroyed by card effects", cards.name_of(card_id)),
            )));
        }
        is_token = card.is_token();
    }

    let has_destroy_trigger = if is_token {
        false
    } else {
        cards
            .card_definition(card_id)
            .ok_or(EngineError::UnknownCard(card_id))?
            .has_destroy_trigger()
    };

    let Some(exit) = lift(state, loc) else {
        return Ok(Err(Rejected::not_found(card_id, loc.zone)));
    };

    let message = if let Some(name) = &exit.token_name {
        format!("Destroyed {name}; the token was removed")
    } else {
        place(state.side_mut(exit.owner), card_id, Destination::Graveyard);
        format!("Destroyed {}", cards.name_of(card_id))
    };

    Ok(Ok(Applied::new(EventType::CardDestroyed, message)
        .with_detail(OutcomeDetail::Destroyed {
            card_id,
            owner: exit.owner,
            has_destroy_trigger,
            equips_sent: exit.equips_sent,
            removed: exit.is_token(),
        })
        .with_card("card_id", card_id)
        .with_meta("has_destroy_trigger", i64::from(has_destroy_trigger))
        .with_meta("equips_sent", exit.equips_sent as i64)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardRegistry, ParsedAbility, Position, SpellKind, TokenData, Trigger, TriggeredEffect};
    use crate::core::{LobbyRef, MatchId, SideMap, UserRef};
    use crate::effects::Effect;

    const KNIGHT: CardId = CardId::new(1);
    const AXE: CardId = CardId::new(2);
    const SWORD: CardId = CardId::new(3);
    const PHOENIX: CardId = CardId::new(4);
    const OGRE: CardId = CardId::new(5);

    fn registry() -> CardRegistry {
        [
            CardDefinition::monster(KNIGHT, "Knight", 4, 1800, 1000),
            CardDefinition::monster(OGRE, "Ogre", 4, 1600, 1400),
            CardDefinition::spell(AXE, "Axe", SpellKind::Equip),
            CardDefinition::spell(SWORD, "Sword", SpellKind::Equip),
            CardDefinition::monster(PHOENIX, "Phoenix", 4, 1500, 1200).with_ability(
                ParsedAbility::default().with_triggered(TriggeredEffect::new(
                    Trigger::OnDestroy,
                    Effect::Damage { amount: 500 },
                )),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn state() -> MatchState {
        MatchState::new(
            MatchId::new("m"),
            LobbyRef("l".into()),
            SideMap::new(|s| UserRef(s.to_string())),
            SideMap::new(|side| match side {
                Side::Host => SideState::new([CardId::new(100), CardId::new(101), CardId::new(102)], 8000),
                Side::Opponent => SideState::new([CardId::new(200), CardId::new(201), CardId::new(202)], 8000),
            }),
        )
    }

    fn put_on_board(state: &mut MatchState, side: Side, def: &CardDefinition) {
        state
            .side_mut(side)
            .board
            .push_back(BoardCard::from_definition(def, Position::Attack, false, 1));
    }

    fn equip(state: &mut MatchState, holder: Side, equip: CardId, host: CardId) {
        state.side_mut(holder).spell_trap_zone.push_back(ZoneCard::equip(equip, host, 1));
        let owner = state.board_owner(host).unwrap();
        state.side_mut(owner).board_card_mut(host).unwrap().equipped_cards.push(equip);
    }

    fn sheep(state: &mut MatchState, side: Side) -> CardId {
        let id = state.alloc_token_id();
        let data = TokenData {
            name: "Sheep Token".into(),
            level: 1,
            attribute: "earth".into(),
            monster_type: "beast".into(),
        };
        state
            .side_mut(side)
            .board
            .push_back(BoardCard::token(id, data, 0, 0, Position::Defense, 1));
        id
    }

    #[test]
    fn test_draw_full_partial_and_empty() {
        let mut state = state();

        let applied = draw(&mut state, Side::Host, 2).unwrap();
        assert_eq!(applied.detail, OutcomeDetail::Drew { requested: 2, drawn: 2 });
        assert_eq!(state.side(Side::Host).hand.iter().copied().collect::<Vec<_>>(), vec![CardId::new(100), CardId::new(101)]);

        let applied = draw(&mut state, Side::Host, 5).unwrap();
        assert_eq!(applied.detail, OutcomeDetail::Drew { requested: 5, drawn: 1 });
        assert_eq!(state.side(Side::Host).hand.len(), 3);

        let rejected = draw(&mut state, Side::Host, 1).unwrap_err();
        assert_eq!(rejected.kind, FailureKind::ResourceExhausted);
    }

    #[test]
    fn test_bounce_returns_to_owner_not_actor() {
        let cards = registry();
        let mut state = state();
        put_on_board(&mut state, Side::Opponent, cards.get(KNIGHT).unwrap());

        to_hand(&mut state, &cards, Side::Host, KNIGHT, ZoneKind::Board).unwrap();

        assert!(state.side(Side::Opponent).board.is_empty());
        assert_eq!(state.side(Side::Opponent).hand.index_of(&KNIGHT), Some(0));
        assert!(state.side(Side::Host).hand.is_empty());
    }

    #[test]
    fn test_graveyard_retrieval_is_own_side_only() {
        let cards = registry();
        let mut state = state();
        state.side_mut(Side::Opponent).graveyard.push_back(KNIGHT);

        let rejected = to_hand(&mut state, &cards, Side::Host, KNIGHT, ZoneKind::Graveyard).unwrap_err();
        assert_eq!(rejected.kind, FailureKind::NotFound);

        to_hand(&mut state, &cards, Side::Opponent, KNIGHT, ZoneKind::Graveyard).unwrap();
        assert_eq!(state.side(Side::Opponent).hand.len(), 1);
    }

    #[test]
    fn test_to_hand_rejects_other_sources() {
        let cards = registry();
        let mut state = state();
        let rejected = to_hand(&mut state, &cards, Side::Host, CardId::new(100), ZoneKind::Deck).unwrap_err();
        assert_eq!(rejected.kind, FailureKind::IllegalAction);
    }

    #[test]
    fn test_missing_card_not_found() {
        let cards = registry();
        let mut state = state();
        let rejected = banish(&mut state, &cards, KNIGHT, ZoneKind::Board).unwrap_err();
        assert_eq!(rejected.kind, FailureKind::NotFound);
    }

    #[test]
    fn test_leaving_board_cascades_equips() {
        let cards = registry();
        let mut state = state();
        put_on_board(&mut state, Side::Opponent, cards.get(KNIGHT).unwrap());
        equip(&mut state, Side::Host, AXE, KNIGHT);
        equip(&mut state, Side::Opponent, SWORD, KNIGHT);

        let applied = banish(&mut state, &cards, KNIGHT, ZoneKind::Board).unwrap();

        assert!(matches!(applied.detail, OutcomeDetail::Moved { equips_sent: 2, .. }));
        assert_eq!(state.side(Side::Opponent).banished.index_of(&KNIGHT), Some(0));
        assert_eq!(state.side(Side::Host).graveyard.index_of(&AXE), Some(0));
        assert_eq!(state.side(Side::Opponent).graveyard.index_of(&SWORD), Some(0));
        assert!(state.side(Side::Host).spell_trap_zone.is_empty());
        assert!(state.side(Side::Opponent).spell_trap_zone.is_empty());
    }

    #[test]
    fn test_cascade_spares_equip_on_another_monster() {
        let cards = registry();
        let mut state = state();
        put_on_board(&mut state, Side::Host, cards.get(KNIGHT).unwrap());
        put_on_board(&mut state, Side::Host, cards.get(OGRE).unwrap());
        equip(&mut state, Side::Host, AXE, KNIGHT);
        equip(&mut state, Side::Host, AXE, OGRE);

        let applied = banish(&mut state, &cards, KNIGHT, ZoneKind::Board).unwrap();

        assert!(matches!(applied.detail, OutcomeDetail::Moved { equips_sent: 1, .. }));
        let host = state.side(Side::Host);
        assert_eq!(host.graveyard.iter().filter(|c| **c == AXE).count(), 1);
        assert_eq!(host.spell_trap_zone.len(), 1);
        assert_eq!(host.spell_trap_zone[0].equipped_to, Some(OGRE));
        assert_eq!(host.board_card(OGRE).unwrap().equipped_cards.as_slice(), &[AXE]);
    }

    #[test]
    fn test_token_leaving_board_is_removed() {
        let cards = registry();
        let mut state = state();
        let token = sheep(&mut state, Side::Host);

        let applied = return_to_deck(&mut state, &cards, token, ZoneKind::Board, DeckPosition::Top).unwrap();

        assert_eq!(applied.event, EventType::TokenRemoved);
        assert_eq!(state.count_of(token), 0);
        assert_eq!(state.side(Side::Host).deck.len(), 3);
    }

    #[test]
    fn test_return_to_deck_positions() {
        let cards = registry();
        let mut state = state();
        state.side_mut(Side::Host).graveyard.push_back(KNIGHT);
        state.side_mut(Side::Host).graveyard.push_back(PHOENIX);

        return_to_deck(&mut state, &cards, KNIGHT, ZoneKind::Graveyard, DeckPosition::Top).unwrap();
        return_to_deck(&mut state, &cards, PHOENIX, ZoneKind::Graveyard, DeckPosition::Shuffle).unwrap();

        let deck = &state.side(Side::Host).deck;
        assert_eq!(deck.front(), Some(&KNIGHT));
        assert_eq!(deck.back(), Some(&PHOENIX));
    }

    #[test]
    fn test_same_zone_rejected() {
        let cards = registry();
        let mut state = state();
        state.side_mut(Side::Host).graveyard.push_back(KNIGHT);
        let rejected = to_graveyard(&mut state, &cards, KNIGHT, ZoneKind::Graveyard).unwrap_err();
        assert_eq!(rejected.kind, FailureKind::IllegalAction);
    }

    #[test]
    fn test_destroy_protected_monster() {
        let cards = registry();
        let mut state = state();
        put_on_board(&mut state, Side::Opponent, cards.get(KNIGHT).unwrap());
        state
            .side_mut(Side::Opponent)
            .board_card_mut(KNIGHT)
            .unwrap()
            .cannot_be_destroyed_by_effects = true;

        let rejected = destroy(&mut state, &cards, KNIGHT).unwrap().unwrap_err();
        assert_eq!(rejected.kind, FailureKind::Protected);
        assert_eq!(state.side(Side::Opponent).board.len(), 1);
    }

    #[test]
    fn test_destroy_reports_trigger() {
        let cards = registry();
        let mut state = state();
        put_on_board(&mut state, Side::Host, cards.get(PHOENIX).unwrap());

        let applied = destroy(&mut state, &cards, PHOENIX).unwrap().unwrap();
        assert!(matches!(
            applied.detail,
            OutcomeDetail::Destroyed { has_destroy_trigger: true, owner: Side::Host, .. }
        ));
        assert_eq!(state.side(Side::Host).graveyard.index_of(&PHOENIX), Some(0));
    }

    #[test]
    fn test_destroy_equip_detaches_from_host() {
        let cards = registry();
        let mut state = state();
        put_on_board(&mut state, Side::Host, cards.get(KNIGHT).unwrap());
        equip(&mut state, Side::Host, AXE, KNIGHT);

        destroy(&mut state, &cards, AXE).unwrap().unwrap();

        let knight = state.side(Side::Host).board_card(KNIGHT).unwrap();
        assert!(knight.equipped_cards.is_empty());
        assert_eq!(state.side(Side::Host).graveyard.index_of(&AXE), Some(0));
    }

    #[test]
    fn test_destroy_token_skips_graveyard() {
        let cards = registry();
        let mut state = state();
        let token = sheep(&mut state, Side::Opponent);

        let applied = destroy(&mut state, &cards, token).unwrap().unwrap();
        assert!(matches!(applied.detail, OutcomeDetail::Destroyed { removed: true, .. }));
        assert!(state.side(Side::Opponent).graveyard.is_empty());
        assert_eq!(state.count_of(token), 0);
    }

    #[test]
    fn test_destroy_unknown_template_is_hard_error() {
        let cards = registry();
        let mut state = state();
        state.side_mut(Side::Host).spell_trap_zone.push_back(ZoneCard::set(CardId::new(999), 1));

        let err = destroy(&mut state, &cards, CardId::new(999)).unwrap_err();
        assert_eq!(err, EngineError::UnknownCard(CardId::new(999)));
    }
}
