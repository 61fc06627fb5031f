//! Pure move and threat predicates shared by the world and adapters.

use crate::Cell;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: i32 = 8;

/// Row pawns occupy when they spawn, one row above the board.
pub const PAWN_SPAWN_ROW: i32 = -1;

/// Row a pawn reaches when it walks past the last rank.
pub const PAWN_EXIT_ROW: i32 = BOARD_SIZE;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
];

/// Reports whether the displacement between two cells is an L-shaped knight jump.
///
/// Any coordinates are accepted; board bounds are checked separately by
/// [`is_inside_board`].
#[must_use]
pub fn is_valid_knight_move(from: Cell, to: Cell) -> bool {
    let columns = from.column().abs_diff(to.column());
    let rows = from.row().abs_diff(to.row());
    matches!((columns, rows), (1, 2) | (2, 1))
}

/// Reports whether the cell lies on the 8×8 board.
#[must_use]
pub fn is_inside_board(cell: Cell) -> bool {
    (0..BOARD_SIZE).contains(&cell.column()) && (0..BOARD_SIZE).contains(&cell.row())
}

/// Reports whether a pawn standing on `pawn` attacks `target`.
///
/// Pawns capture one row forward (toward increasing rows) on either diagonal.
#[must_use]
pub fn pawn_threatens_cell(pawn: Cell, target: Cell) -> bool {
    pawn.row().checked_add(1) == Some(target.row())
        && pawn.column().abs_diff(target.column()) == 1
}

/// Enumerates the on-board cells a knight standing on `from` may jump to.
pub fn knight_destinations(from: Cell) -> impl Iterator<Item = Cell> {
    KNIGHT_OFFSETS
        .into_iter()
        .map(move |(columns, rows)| from.offset(columns, rows))
        .filter(|cell| is_inside_board(*cell))
}
