//! Pieces module - tetromino shape catalog and the active piece value
//!
//! Shapes are square grids stored row-major (`rows[y][x]`), matching the way
//! the board is indexed. Every orientation of a kind keeps the same grid size.

use serde::Serialize;

use crate::rng::SimpleRng;
use crate::types::{PieceKind, MAX_SHAPE_SIZE};

/// One orientation of a piece: a square grid of filled/empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Shape {
    pub(crate) size: u8,
    pub(crate) rows: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from an `N`x`N` pattern of 0/1 values.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_core::Shape;
    ///
    /// let bar = Shape::new([[1, 1], [0, 0]]);
    /// assert_eq!(bar.size(), 2);
    /// assert!(bar.is_filled(1, 0));
    /// assert!(!bar.is_filled(1, 1));
    /// ```
    pub const fn new<const N: usize>(pattern: [[u8; N]; N]) -> Self {
        assert!(N <= MAX_SHAPE_SIZE, "shape grids are at most 4x4");
        let mut rows = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < N {
            let mut x = 0;
            while x < N {
                rows[y][x] = pattern[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            size: N as u8,
            rows,
        }
    }

    /// Edge length of the grid.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Whether the cell at column `x`, row `y` is filled. Out of range is empty.
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.size as usize && y < self.size as usize && self.rows[y][x]
    }

    /// Offsets `(x, y)` of the filled cells relative to the grid origin, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        let n = self.size as usize;
        (0..n).flat_map(move |y| {
            (0..n)
                .filter(move |&x| self.rows[y][x])
                .map(move |x| (x as i8, y as i8))
        })
    }
}

const I_SHAPE: Shape = Shape::new([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]);
const J_SHAPE: Shape = Shape::new([[1, 0, 0], [1, 1, 1], [0, 0, 0]]);
const L_SHAPE: Shape = Shape::new([[0, 0, 1], [1, 1, 1], [0, 0, 0]]);
const O_SHAPE: Shape = Shape::new([[1, 1], [1, 1]]);
const S_SHAPE: Shape = Shape::new([[0, 1, 1], [1, 1, 0], [0, 0, 0]]);
const T_SHAPE: Shape = Shape::new([[0, 1, 0], [1, 1, 1], [0, 0, 0]]);
const Z_SHAPE: Shape = Shape::new([[1, 1, 0], [0, 1, 1], [0, 0, 0]]);

/// Get the spawn (0°) shape for a piece kind
pub fn shape_of(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::Z => Z_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
    }
}

/// Grid origin of a freshly spawned piece.
///
/// The 4-wide I and 2-wide O start at column 3, the 3-wide kinds at column 4.
pub fn spawn_position(kind: PieceKind) -> Position {
    match kind {
        PieceKind::I | PieceKind::O => Position::new(3, 0),
        _ => Position::new(4, 0),
    }
}

/// Board coordinate of a shape grid's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub position: Position,
}

impl Piece {
    /// Create a piece of `kind` in its spawn orientation and position
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: shape_of(kind),
            position: spawn_position(kind),
        }
    }

    /// Same piece moved to `position`.
    pub fn at(self, position: Position) -> Self {
        Self { position, ..self }
    }

    /// Absolute board coordinates of the filled cells at the current position.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        let Position { x, y } = self.position;
        self.shape
            .cells()
            .map(move |(dx, dy)| (x.saturating_add(dx), y.saturating_add(dy)))
    }
}

/// Generate a piece of uniformly random kind at its spawn position
pub fn spawn(rng: &mut SimpleRng) -> Piece {
    Piece::spawn(rng.next_kind())
}
