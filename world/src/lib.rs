#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Knight Adventure.
//!
//! The world owns the knight, the live pawns, the score and the game phase.
//! It resolves knight jumps, pawn steps and every capture synchronously inside
//! [`apply`], so the order in which commands arrive fully determines the
//! outcome of a game.

mod pawns;

use std::time::Duration;

use knight_adventure_core::{
    is_inside_board, is_valid_knight_move, pawn_threatens_cell, Cell, Command, Event,
    GameConfig, GameOutcome, GamePhase, GameSummary, Level, LevelSettings, MoveRejection, PawnId,
    BOARD_SIZE, PAWN_EXIT_ROW, PAWN_SPAWN_ROW, WELCOME_BANNER,
};
use tracing::{debug, info, warn};

use pawns::PawnRoster;

/// Represents the authoritative Knight Adventure board state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    phase: GamePhase,
    knight: Knight,
    pawns: PawnRoster,
    score: u32,
    level: Level,
    elapsed: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Knight {
    cell: Cell,
    movable: bool,
    settling: Duration,
}

impl World {
    /// Creates a world using the stock game configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    /// Creates a world using the provided configuration.
    ///
    /// The world stays idle until it receives [`Command::StartGame`].
    #[must_use]
    pub fn with_config(mut config: GameConfig) -> Self {
        if !is_inside_board(config.knight_start) {
            let fallback = GameConfig::default().knight_start;
            warn!(
                requested = %config.knight_start,
                fallback = %fallback,
                "knight start lies outside the board"
            );
            config.knight_start = fallback;
        }

        Self {
            banner: WELCOME_BANNER,
            knight: Knight {
                cell: config.knight_start,
                movable: false,
                settling: Duration::ZERO,
            },
            config,
            phase: GamePhase::Idle,
            pawns: PawnRoster::default(),
            score: 0,
            level: Level::FIRST,
            elapsed: Duration::ZERO,
        }
    }

    fn reset(&mut self) {
        self.phase = GamePhase::Running;
        self.knight = Knight {
            cell: self.config.knight_start,
            movable: true,
            settling: Duration::ZERO,
        };
        self.pawns.clear();
        self.score = 0;
        self.level = Level::FIRST;
        self.elapsed = Duration::ZERO;
    }

    fn level_settings(&self) -> LevelSettings {
        self.config.difficulty.settings(self.level)
    }

    fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score,
            level: self.level,
            elapsed: self.elapsed,
        }
    }

    fn move_rejection(&self, to: Cell) -> Option<MoveRejection> {
        match self.phase {
            GamePhase::Idle => return Some(MoveRejection::NotStarted),
            GamePhase::Over => return Some(MoveRejection::GameOver),
            GamePhase::Running => {}
        }

        if !self.knight.movable {
            Some(MoveRejection::KnightBusy)
        } else if !is_inside_board(to) {
            Some(MoveRejection::OutsideBoard)
        } else if !is_valid_knight_move(self.knight.cell, to) {
            Some(MoveRejection::NotKnightMove)
        } else {
            None
        }
    }

    fn move_knight(&mut self, to: Cell, out_events: &mut Vec<Event>) {
        if let Some(reason) = self.move_rejection(to) {
            debug!(?reason, to = %to, "knight move rejected");
            out_events.push(Event::KnightMoveRejected { to, reason });
            return;
        }

        let from = self.knight.cell;
        self.knight = Knight {
            cell: to,
            movable: false,
            settling: self.config.knight_move_duration(),
        };
        out_events.push(Event::KnightMoved { from, to });

        // A pawn guarding the landing square wins over any capture the knight makes there.
        if let Some(attacker) = self.pawns.nearest_threat(to) {
            self.capture_knight(attacker, out_events);
            return;
        }

        if let Some(captured) = self.pawns.remove_at(to) {
            self.record_capture(captured.id, to, out_events);
        }
    }

    fn record_capture(&mut self, pawn: PawnId, cell: Cell, out_events: &mut Vec<Event>) {
        self.score = self.score.saturating_add(1);
        out_events.push(Event::PawnCaptured { pawn, cell });
        out_events.push(Event::ScoreChanged { score: self.score });

        let level = self.config.difficulty.level_for_score(self.score);
        if level != self.level {
            self.level = level;
            let settings = self.level_settings();
            info!(level = level.get(), score = self.score, "level increased");
            out_events.push(Event::LevelChanged { level, settings });
        }
    }

    fn settle_knight(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.knight.movable {
            return;
        }

        self.knight.settling = self.knight.settling.saturating_sub(dt);
        if self.knight.settling.is_zero() {
            self.knight.movable = true;
            out_events.push(Event::KnightReady {
                cell: self.knight.cell,
            });
        }
    }

    fn spawn_pawn(&mut self, column: i32, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::Running {
            return;
        }

        if !(0..BOARD_SIZE).contains(&column) {
            debug!(column, "spawn column outside the board");
            return;
        }

        let max_pawns = usize::try_from(self.level_settings().max_pawns).unwrap_or(usize::MAX);
        if self.pawns.len() >= max_pawns {
            debug!(column, max_pawns, "spawn skipped: pawn cap reached");
            return;
        }

        if self.pawns.column_occupied(column) {
            debug!(column, "spawn skipped: column occupied");
            return;
        }

        let cell = Cell::new(column, PAWN_SPAWN_ROW);
        let pawn = self.pawns.spawn(cell);
        out_events.push(Event::PawnSpawned { pawn, cell });
    }

    fn advance_pawn(&mut self, pawn_id: PawnId, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::Running {
            return;
        }

        let knight = self.knight.cell;
        let Some(pawn) = self.pawns.get_mut(pawn_id) else {
            debug!(pawn = pawn_id.get(), "advance requested for a missing pawn");
            return;
        };

        if pawn.pending_capture {
            if pawn_threatens_cell(pawn.cell, knight) {
                self.capture_knight(pawn_id, out_events);
                return;
            }
            pawn.pending_capture = false;
            out_events.push(Event::PawnThreatCleared { pawn: pawn_id });
        }

        let from = pawn.cell;
        let to = from.offset(0, 1);
        if to == knight || self.pawns.occupant(to).is_some() {
            out_events.push(Event::PawnBlocked {
                pawn: pawn_id,
                blocked_by: to,
            });
            return;
        }

        let threatens_knight = pawn_threatens_cell(to, knight);
        if let Some(pawn) = self.pawns.get_mut(pawn_id) {
            pawn.cell = to;
            pawn.pending_capture = threatens_knight;
        }
        out_events.push(Event::PawnAdvanced {
            pawn: pawn_id,
            from,
            to,
            threatens_knight,
        });

        if to.row() >= PAWN_EXIT_ROW {
            out_events.push(Event::PawnEscaped {
                pawn: pawn_id,
                column: to.column(),
            });
            self.end_game(GameOutcome::PawnEscaped, out_events);
        }
    }

    fn capture_knight(&mut self, pawn: PawnId, out_events: &mut Vec<Event>) {
        self.knight.movable = false;
        out_events.push(Event::KnightCaptured {
            pawn,
            cell: self.knight.cell,
        });
        self.end_game(GameOutcome::KnightCaptured, out_events);
    }

    fn end_game(&mut self, outcome: GameOutcome, out_events: &mut Vec<Event>) {
        self.phase = GamePhase::Over;
        self.knight.movable = false;
        let summary = self.summary();
        info!(
            ?outcome,
            score = summary.score,
            level = summary.level.get(),
            time = %summary.time_taken(),
            "game over"
        );
        out_events.push(Event::GameOver { outcome, summary });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame => {
            world.reset();
            info!(knight = %world.knight.cell, "game started");
            out_events.push(Event::GameStarted {
                knight: world.knight.cell,
            });
        }
        Command::Tick { dt } => {
            if world.phase != GamePhase::Running {
                return;
            }

            world.elapsed = world.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.settle_knight(dt, out_events);
        }
        Command::MoveKnight { to } => world.move_knight(to, out_events),
        Command::SpawnPawn { column } => world.spawn_pawn(column, out_events),
        Command::AdvancePawn { pawn } => world.advance_pawn(pawn, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use knight_adventure_core::{
        Cell, GameConfig, GamePhase, GameSummary, HudSnapshot, KnightSnapshot, Level,
        LevelSettings, PawnId, PawnSnapshot, PawnView, BOARD_SIZE,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Current lifecycle phase of the game.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Reports whether the game reached its terminal state.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.phase == GamePhase::Over
    }

    /// Captures the knight's position and readiness.
    #[must_use]
    pub fn knight(world: &World) -> KnightSnapshot {
        KnightSnapshot {
            cell: world.knight.cell,
            movable: world.knight.movable,
        }
    }

    /// Captures a read-only view of the live pawns.
    #[must_use]
    pub fn pawn_view(world: &World) -> PawnView {
        let snapshots = world
            .pawns
            .iter()
            .map(|pawn| PawnSnapshot {
                id: pawn.id,
                cell: pawn.cell,
                pending_capture: pawn.pending_capture,
            })
            .collect();
        PawnView::from_snapshots(snapshots)
    }

    /// Number of live pawns.
    #[must_use]
    pub fn pawn_count(world: &World) -> usize {
        world.pawns.len()
    }

    /// Returns the pawn occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(world: &World, cell: Cell) -> Option<PawnId> {
        world.pawns.occupant(cell)
    }

    /// Enumerates the columns that hold no pawn in any row.
    #[must_use]
    pub fn free_columns(world: &World) -> Vec<i32> {
        (0..BOARD_SIZE)
            .filter(|column| !world.pawns.column_occupied(*column))
            .collect()
    }

    /// Number of pawns captured in the current game.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Level derived from the current score.
    #[must_use]
    pub fn level(world: &World) -> Level {
        world.level
    }

    /// Pacing attached to the current level.
    #[must_use]
    pub fn level_settings(world: &World) -> LevelSettings {
        world.level_settings()
    }

    /// Simulated time since the game started, frozen once it ends.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Values the heads-up display renders.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        HudSnapshot {
            score: world.score,
            level: world.level,
            elapsed: world.elapsed,
        }
    }

    /// Results of the current or most recent game.
    #[must_use]
    pub fn summary(world: &World) -> GameSummary {
        world.summary()
    }
}
