//! Pawn bookkeeping owned by the world.

use knight_adventure_core::{pawn_threatens_cell, Cell, PawnId};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Pawn {
    pub(crate) id: PawnId,
    pub(crate) cell: Cell,
    pub(crate) pending_capture: bool,
}

/// Live pawns in spawn order. Spawn order doubles as the tie-break order
/// when several pawns qualify for the same capture.
#[derive(Debug, Default)]
pub(crate) struct PawnRoster {
    pawns: Vec<Pawn>,
    next_id: u32,
}

impl PawnRoster {
    pub(crate) fn clear(&mut self) {
        self.pawns.clear();
        self.next_id = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.pawns.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Pawn> {
        self.pawns.iter()
    }

    pub(crate) fn spawn(&mut self, cell: Cell) -> PawnId {
        let id = PawnId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pawns.push(Pawn {
            id,
            cell,
            pending_capture: false,
        });
        id
    }

    pub(crate) fn get_mut(&mut self, id: PawnId) -> Option<&mut Pawn> {
        self.pawns.iter_mut().find(|pawn| pawn.id == id)
    }

    pub(crate) fn occupant(&self, cell: Cell) -> Option<PawnId> {
        self.pawns
            .iter()
            .find(|pawn| pawn.cell == cell)
            .map(|pawn| pawn.id)
    }

    pub(crate) fn column_occupied(&self, column: i32) -> bool {
        self.pawns.iter().any(|pawn| pawn.cell.column() == column)
    }

    pub(crate) fn remove_at(&mut self, cell: Cell) -> Option<Pawn> {
        let index = self.pawns.iter().position(|pawn| pawn.cell == cell)?;
        Some(self.pawns.remove(index))
    }

    /// Closest pawn attacking `target`, measured by Euclidean distance.
    pub(crate) fn nearest_threat(&self, target: Cell) -> Option<PawnId> {
        self.pawns
            .iter()
            .filter(|pawn| pawn_threatens_cell(pawn.cell, target))
            .min_by_key(|pawn| pawn.cell.distance_squared(target))
            .map(|pawn| pawn.id)
    }
}
