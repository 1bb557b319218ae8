//! External collaborators at their interface boundary.
//!
//! ## Key Types
//!
//! - `MatchStore` / `MatchPatch`: Read the match document, patch changed fields
//! - `EventRecorder` / `GameEvent`: Append-only audit log
//! - `MatchLifecycle`: Told when a match ends
//!
//! `MemoryMatchStore`, `EventLog` and `LifecycleLog` are in-memory
//! implementations for embedding and tests.

mod document;
mod event;
mod lifecycle;

pub use document::{MatchPatch, MatchStore, MemoryMatchStore};
pub use event::{EventLog, EventRecorder, EventType, GameEvent};
pub use lifecycle::{LifecycleLog, MatchLifecycle};
