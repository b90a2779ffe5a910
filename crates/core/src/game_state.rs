//! Game state module - the engine's state machine
//!
//! This module ties together all core components: board, pieces, RNG, and scoring.
//! Every transition takes `&self` and returns a new `GameState`; nothing is
//! mutated in place, so a caller may keep any earlier state around.
//!
//! Modes are two flags rather than an enum, with this transition table:
//!
//! | Input | Running | Paused | Game over |
//! |-------|---------|--------|-----------|
//! | Left/Right/Down/Rotate/HardDrop | applied | no-op | no-op |
//! | Pause | pause | resume | no-op |
//! | Restart | fresh game | fresh game | fresh game |
//! | Tick | move down | no-op | no-op |

use crate::board::Board;
use crate::geometry::{collides, drop_distance, try_rotate};
use crate::pieces::{spawn, Piece};
use crate::rng::SimpleRng;
use crate::scoring::{level_for, line_score};
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::{GameAction, LOCK_OUT_ROW};

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current: Option<Piece>,
    next: Option<Piece>,
    /// Piece generator; advanced only in the returned state.
    rng: SimpleRng,
    score: u32,
    level: u32,
    lines_cleared: u32,
    game_over: bool,
    paused: bool,
}

impl GameState {
    /// Create a new game with the given RNG seed
    ///
    /// Empty board, two random pieces, score 0, level 1.
    pub fn new(seed: u32) -> Self {
        Self::fresh(SimpleRng::new(seed))
    }

    fn fresh(mut rng: SimpleRng) -> Self {
        let current = spawn(&mut rng);
        let next = spawn(&mut rng);

        Self {
            board: Board::new(),
            current: Some(current),
            next: Some(next),
            rng,
            score: 0,
            level: 1,
            lines_cleared: 0,
            game_over: false,
            paused: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<Piece> {
        self.current
    }

    pub fn next_piece(&self) -> Option<Piece> {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Whether gameplay inputs and ticks currently have an effect
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// Replace the board (for puzzles and tests)
    pub fn with_board(self, board: Board) -> Self {
        Self { board, ..self }
    }

    /// Replace the falling piece (for puzzles and tests)
    pub fn with_current_piece(self, current: Option<Piece>) -> Self {
        Self { current, ..self }
    }

    /// Replace the preview piece (for puzzles and tests)
    pub fn with_next_piece(self, next: Option<Piece>) -> Self {
        Self { next, ..self }
    }

    /// Start from a cumulative line count; the level follows the curve
    pub fn with_lines_cleared(self, lines_cleared: u32) -> Self {
        Self {
            lines_cleared,
            level: level_for(lines_cleared),
            ..self
        }
    }

    /// Apply a discrete player action
    pub fn apply(&self, action: GameAction) -> Self {
        match action {
            GameAction::Restart => self.restart(),
            _ if self.game_over => self.clone(),
            GameAction::Pause => Self {
                paused: !self.paused,
                ..self.clone()
            },
            _ if self.paused => self.clone(),
            GameAction::Left => self.move_by(-1, 0),
            GameAction::Right => self.move_by(1, 0),
            GameAction::Down => self.move_by(0, 1),
            GameAction::Rotate => self.rotate(),
            GameAction::HardDrop => self.hard_drop(),
        }
    }

    /// Gravity: one row down, locking the piece if it is resting
    pub fn tick(&self) -> Self {
        if !self.playable() {
            return self.clone();
        }
        self.move_by(0, 1)
    }

    /// Fresh game; the piece sequence continues from the current RNG state
    pub fn restart(&self) -> Self {
        Self::fresh(self.rng.clone())
    }

    /// Try to move the active piece
    ///
    /// A blocked downward move locks the piece; a blocked sideways move is
    /// rejected.
    pub fn move_by(&self, dx: i8, dy: i8) -> Self {
        let Some(piece) = self.current else {
            return self.clone();
        };
        if !self.playable() {
            return self.clone();
        }

        let candidate = piece.position.offset(dx, dy);
        if !collides(&piece, &self.board, Some(candidate)) {
            return Self {
                current: Some(piece.at(candidate)),
                ..self.clone()
            };
        }

        if dy > 0 {
            return self.lock(piece);
        }

        self.clone()
    }

    /// Lock the active piece onto the board and handle line clears
    fn lock(&self, piece: Piece) -> Self {
        let merged = self.board.merge(&piece);

        // Lock-out: the piece came to rest touching the top two rows.
        if piece.position.y <= LOCK_OUT_ROW {
            return Self {
                board: merged,
                game_over: true,
                ..self.clone()
            };
        }

        let (board, cleared) = merged.clear_full_rows();

        let mut score = self.score;
        let mut level = self.level;
        let mut lines_cleared = self.lines_cleared;
        if cleared > 0 {
            score = score.saturating_add(line_score(cleared, self.level));
            lines_cleared = lines_cleared.saturating_add(cleared as u32);
            level = level_for(lines_cleared);
        }

        let mut rng = self.rng.clone();
        let next = spawn(&mut rng);

        Self {
            board,
            current: self.next,
            next: Some(next),
            rng,
            score,
            level,
            lines_cleared,
            ..self.clone()
        }
    }

    /// Rotate clockwise with wall kicks; O pieces and blocked rotations are no-ops
    pub fn rotate(&self) -> Self {
        let Some(piece) = self.current else {
            return self.clone();
        };
        if !self.playable() {
            return self.clone();
        }

        match try_rotate(&piece, &self.board) {
            Some(rotated) => Self {
                current: Some(rotated),
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    /// Move the active piece straight down to its resting row
    ///
    /// The piece is not locked here: the next Down or tick does that.
    pub fn hard_drop(&self) -> Self {
        let Some(piece) = self.current else {
            return self.clone();
        };
        if !self.playable() {
            return self.clone();
        }

        self.move_by(0, drop_distance(&piece, &self.board))
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i8> {
        let piece = self.current?;
        Some(piece.position.y + drop_distance(&piece, &self.board))
    }

    /// Seed that replays the piece sequence from this point
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.current = self.current.map(PieceSnapshot::from);
        out.next = self.next.map(PieceSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.score = self.score;
        out.level = self.level;
        out.lines_cleared = self.lines_cleared;
        out.paused = self.paused;
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
