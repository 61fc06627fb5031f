//! Greedy stand-in for a human player.

use std::cmp::Reverse;

use knight_adventure_core::{
    knight_destinations, pawn_threatens_cell, Cell, KnightSnapshot, PawnView,
};

/// Row from which an unchecked pawn is treated as about to escape.
const CHASE_ROW: i32 = 4;

/// Picks the next jump for the knight, or `None` to stay put.
///
/// Never lands on a guarded square. Captures come first, then escapes from a
/// pending capture, then closing in on the most advanced pawn once it nears
/// the last rows.
pub(crate) fn choose_move(knight: KnightSnapshot, pawns: &PawnView) -> Option<Cell> {
    if !knight.movable {
        return None;
    }

    let guarded = |cell: Cell| pawns.iter().any(|pawn| pawn_threatens_cell(pawn.cell, cell));
    let safe: Vec<Cell> = knight_destinations(knight.cell)
        .filter(|cell| !guarded(*cell))
        .collect();

    if let Some(capture) = safe
        .iter()
        .copied()
        .find(|cell| pawns.iter().any(|pawn| pawn.cell == *cell))
    {
        return Some(capture);
    }

    let runner = pawns
        .iter()
        .max_by_key(|pawn| (pawn.cell.row(), Reverse(pawn.id)));
    let in_danger = guarded(knight.cell);

    let target = match runner {
        Some(pawn) if in_danger || pawn.cell.row() >= CHASE_ROW => pawn.cell,
        _ => return None,
    };

    let current = knight.cell.distance_squared(target);
    safe.into_iter()
        .min_by_key(|cell| cell.distance_squared(target))
        .filter(|cell| in_danger || cell.distance_squared(target) < current)
}
