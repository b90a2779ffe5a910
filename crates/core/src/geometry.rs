//! Geometry module - rotation transform and collision tests
//!
//! Collision semantics:
//! - side walls and the floor always block
//! - there is no ceiling: cells above row 0 only collide with the walls,
//!   which lets pieces spawn partly above the visible board

use crate::board::Board;
use crate::pieces::{Piece, Position, Shape};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, MAX_SHAPE_SIZE};

/// Kick offsets tried, in order, when a rotation does not fit in place
pub const WALL_KICKS: [(i8, i8); 6] = [(0, 0), (-1, 0), (1, 0), (0, -1), (-1, -1), (1, -1)];

/// Rotate a shape 90° clockwise
///
/// Cell (row `y`, column `x`) of the input lands at row `x`, column
/// `size - 1 - y` of the output.
pub fn rotate_cw(shape: &Shape) -> Shape {
    let n = shape.size as usize;
    let mut rows = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
    for (y, row) in shape.rows.iter().enumerate().take(n) {
        for (x, &filled) in row.iter().enumerate().take(n) {
            rows[x][n - 1 - y] = filled;
        }
    }
    Shape {
        size: shape.size,
        rows,
    }
}

/// Check whether `piece` overlaps a wall, the floor or a locked cell
///
/// Tests at `position` when given, otherwise at the piece's own position.
pub fn collides(piece: &Piece, board: &Board, position: Option<Position>) -> bool {
    let origin = position.unwrap_or(piece.position);
    piece.shape.cells().any(|(dx, dy)| {
        let x = origin.x as i16 + dx as i16;
        let y = origin.y as i16 + dy as i16;

        if x < 0 || x >= BOARD_WIDTH as i16 || y >= BOARD_HEIGHT as i16 {
            return true;
        }

        y >= 0 && board.is_occupied(x as i8, y as i8)
    })
}

/// Try to rotate a piece clockwise with wall kicks
///
/// Returns the rotated piece at the first kick offset that fits, or `None`
/// when every offset collides. O pieces never rotate.
pub fn try_rotate(piece: &Piece, board: &Board) -> Option<Piece> {
    if piece.kind == PieceKind::O {
        return None;
    }

    let rotated = Piece {
        shape: rotate_cw(&piece.shape),
        ..*piece
    };

    WALL_KICKS
        .iter()
        .map(|&(dx, dy)| piece.position.offset(dx, dy))
        .find(|&pos| !collides(&rotated, board, Some(pos)))
        .map(|pos| rotated.at(pos))
}

/// Number of rows the piece can fall before it would collide
pub fn drop_distance(piece: &Piece, board: &Board) -> i8 {
    let mut distance: i8 = 0;
    // Every shape has a filled cell at or below its origin row, so the floor
    // is reached before the origin passes the last row.
    while piece.position.y.saturating_add(distance) < BOARD_HEIGHT as i8
        && !collides(piece, board, Some(piece.position.offset(0, distance + 1)))
    {
        distance += 1;
    }
    distance
}
