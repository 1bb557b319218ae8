//! Card system: templates, parsed abilities, field instances, and lookup.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for templates and synthetic tokens
//! - `CardDefinition`: Static template with base stats
//! - `ParsedAbility`: Triggered effects and static flags
//! - `BoardCard` / `ZoneCard`: Cards on the field
//! - `CardLookup`: Template lookup seam, implemented by `CardRegistry`

pub mod ability;
pub mod definition;
pub mod instance;
pub mod registry;

pub use ability::{DirectAttackCondition, ParsedAbility, Trigger, TriggeredEffect};
pub use definition::{CardDefinition, CardId, CardType, Rarity, SpellKind};
pub use instance::{BoardCard, Position, TokenData, ZoneCard};
pub use registry::{CardLookup, CardRegistry};
