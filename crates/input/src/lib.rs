//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Each key
//! press is one action; holding a key relies on the terminal's own repeat.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
