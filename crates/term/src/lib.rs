//! Terminal rendering for the falling-block game.
//!
//! Frames are drawn into a plain [`FrameBuffer`] by [`GameView`] (pure, testable)
//! and written to the terminal by [`TerminalRenderer`], which only sends the
//! cells that changed.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{piece_color, FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{GameView, Layout, Viewport, PANEL_WIDTH};
pub use renderer::{encode_diff, encode_full, TerminalRenderer};
