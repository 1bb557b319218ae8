//! Chain and negation.
//!
//! The chain is an explicit LIFO of activations. Activating a card pushes
//! a link; negation flags a link; resolving pops the top link, and a
//! negated link fizzles instead of resolving.

mod chain;
mod negation;

pub use chain::{Chain, ChainLink};
pub use negation::{negate, NegateFilter, NegateScope, UnknownFilter};
