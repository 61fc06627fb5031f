#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that turns screen taps into knight move commands.

use glam::Vec2;
use knight_adventure_core::{Cell, Command, Event};
use tracing::debug;

/// Affine mapping between screen space and board cells.
///
/// The origin is the screen position of the top-left corner of cell (0, 0)
/// and every cell is a square of `tile_size` screen units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    origin: Vec2,
    tile_size: f32,
}

impl BoardLayout {
    /// Creates a layout anchored at `origin` with square tiles.
    #[must_use]
    pub const fn new(origin: Vec2, tile_size: f32) -> Self {
        Self { origin, tile_size }
    }

    /// Screen position of the board's top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Edge length of a single cell in screen units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Maps a screen point to the cell underneath it.
    ///
    /// Points left of or above the board floor to negative coordinates rather
    /// than truncating towards zero, so they land outside the board. Returns
    /// `None` when the layout is degenerate or the point is not finite.
    #[must_use]
    pub fn screen_to_board(&self, point: Vec2) -> Option<Cell> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return None;
        }

        let scaled = ((point - self.origin) / self.tile_size).floor();
        if !scaled.is_finite() {
            return None;
        }

        Some(Cell::new(scaled.x as i32, scaled.y as i32))
    }

    /// Screen position of the centre of `cell`.
    #[must_use]
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        let corner = Vec2::new(cell.column() as f32, cell.row() as f32);
        self.origin + (corner + Vec2::splat(0.5)) * self.tile_size
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}

/// Input snapshot distilled from adapter-provided pointer data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TapInput {
    /// Screen position tapped during this frame, if any.
    pub point: Option<Vec2>,
}

impl TapInput {
    /// Creates an input descriptor carrying a single tap.
    #[must_use]
    pub const fn at(point: Vec2) -> Self {
        Self { point: Some(point) }
    }
}

/// Input system that forwards taps to the world while a game runs.
#[derive(Debug, Clone, Default)]
pub struct KnightControl {
    running: bool,
}

impl KnightControl {
    /// Creates a new control system that ignores taps until a game starts.
    #[must_use]
    pub const fn new() -> Self {
        Self { running: false }
    }

    /// Consumes world events and tap input to emit knight move commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: TapInput,
        layout: &BoardLayout,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::GameStarted { .. } => self.running = true,
                Event::GameOver { .. } => self.running = false,
                _ => {}
            }
        }

        let Some(point) = input.point else {
            return;
        };

        if !self.running {
            debug!(x = point.x, y = point.y, "tap ignored outside a running game");
            return;
        }

        match layout.screen_to_board(point) {
            Some(to) => out.push(Command::MoveKnight { to }),
            None => debug!(x = point.x, y = point.y, "tap does not map to a cell"),
        }
    }
}
