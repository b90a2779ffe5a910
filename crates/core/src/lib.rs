//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules and state transitions.
//! It has **no dependencies** on UI, timers, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Pure**: Every transition returns a new [`GameState`]; old states stay valid
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`pieces`]: Tetromino shape catalog, positions and the active piece value
//! - [`geometry`]: Clockwise rotation, collision test and wall kicks
//! - [`board`]: 10x20 game board with merging and line clearing
//! - [`scoring`]: Line clear points, level curve and gravity interval
//! - [`game_state`]: The state machine driven by actions and ticks
//! - [`rng`]: Seedable uniform piece selection
//! - [`snapshot`]: Plain read-only view for renderers
//!
//! # Game Rules
//!
//! - **Random pieces**: Each new piece is drawn uniformly from the seven kinds
//! - **Rotation**: Clockwise only, with six simple kick offsets; O never rotates
//! - **Locking**: A piece locks when a downward move is blocked
//! - **Lock-out**: Locking with the piece origin in the top two rows ends the game
//! - **Scoring**: 100/300/500/800 for 1-4 lines, times the current level
//! - **Levels**: One level per 10 lines, starting at level 1
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::GameAction;
//!
//! let game = GameState::new(12345);
//!
//! let game = game.apply(GameAction::Right);
//! let game = game.apply(GameAction::Rotate);
//! let game = game.apply(GameAction::HardDrop);
//! let game = game.tick(); // locks the dropped piece
//!
//! assert_eq!(game.board().filled_count(), 4);
//! assert!(!game.game_over());
//! ```

pub mod board;
pub mod game_state;
pub mod geometry;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::GameState;
pub use geometry::{collides, drop_distance, rotate_cw, try_rotate, WALL_KICKS};
pub use pieces::{shape_of, spawn, spawn_position, Piece, Position, Shape};
pub use rng::SimpleRng;
pub use scoring::{level_for, line_score, tick_interval_ms};
pub use snapshot::{GameSnapshot, PieceSnapshot};
