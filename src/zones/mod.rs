//! Zone system: card location lookup and zone transition executors.
//!
//! ## Key Types
//!
//! - `ZoneKind`: Named zone on one side (hand, deck, board, ...)
//! - `Location`: Side, zone, and index of a located card
//! - `Destination` / `DeckPosition`: Where a transition places a card
//!
//! Transitions infer ownership from membership: a card found in the
//! opponent's zone goes to the opponent's destination zone.

pub mod location;
pub mod transfer;

pub use location::{index_in, locate, locate_any, locate_on, Location, ZoneKind};
pub use transfer::{
    banish, destroy, draw, lift, lift_from_board, place, return_to_deck, send_equips_to_graveyard, to_graveyard,
    to_hand, transfer, DeckPosition, Destination, Exit, Search,
};
