//! Effect execution.
//!
//! ## Key Types
//!
//! - `Effect`: A parsed effect descriptor
//! - `EffectResolver`: Dispatches an effect and its target to an executor
//! - `Step` / `Applied` / `Rejected`: What an executor did to the working copy
//! - `EffectOutcome`: What the caller sees
//!
//! Zone transitions live in `zones`; this module holds the stat, summon
//! and equip executors.

mod effect;
mod equip;
mod outcome;
mod resolver;
mod stats;
mod summon;

pub use effect::Effect;
pub use equip::equip;
pub use outcome::{Applied, EffectOutcome, FailureKind, Metadata, OutcomeDetail, Rejected, Step};
pub use resolver::{EffectResolver, ResolverContext, Target};
pub use stats::{damage, gain_lp, modify_attack, modify_defense, modify_stat, Stat};
pub use summon::{generate_token, special_summon, TokenSpec};
