#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-game controller that owns the world and every system.
//!
//! A [`Session`] is the only mutation surface a host needs. Player input goes
//! through [`Session::attempt_move`] or [`Session::tap`], the host clock goes
//! through [`Session::advance`], and each call pumps world events through the
//! systems until no further commands are produced. Hosts should deliver the
//! input of a frame before advancing its clock so that a knight jump always
//! resolves before pawn timers due at the same instant.

use std::{mem, time::Duration};

use glam::Vec2;
use knight_adventure_core::{
    is_inside_board, Cell, Command, Event, GameConfig, GameOutcome, GamePhase, GameSummary,
    HudSnapshot, MoveRejection, SoundCue,
};
use knight_adventure_system_advance::PawnAdvance;
use knight_adventure_system_audio_cues::AudioCues;
use knight_adventure_system_knight_control::{KnightControl, TapInput};
use knight_adventure_system_spawning::{Config as SpawningConfig, Spawning};
use knight_adventure_world::{self as world, query, World};
use thiserror::Error;
use tracing::{debug, info};

pub use knight_adventure_system_knight_control::BoardLayout;

/// Errors raised while assembling a session.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// The configured knight start square lies off the board.
    #[error("knight start {cell} lies outside the 8x8 board")]
    KnightStartOutsideBoard {
        /// Offending start cell.
        cell: Cell,
    },
    /// The configured knight settle time is zero.
    #[error("knight move duration must be positive")]
    ZeroKnightMoveDuration,
    /// The layout cannot map screen points to cells.
    #[error("tile size {tile_size} must be a positive finite number")]
    InvalidTileSize {
        /// Offending tile size.
        tile_size: f32,
    },
}

/// Result of a single knight move request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The knight jumped to the requested cell.
    Accepted,
    /// The request was refused without touching the board.
    Rejected(MoveRejection),
}

impl MoveOutcome {
    /// Reports whether the knight actually moved.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Explicit per-game context owning the world and its systems.
#[derive(Debug)]
pub struct Session {
    world: World,
    layout: BoardLayout,
    control: KnightControl,
    spawning: Spawning,
    advance: PawnAdvance,
    audio: AudioCues,
    cues: Vec<SoundCue>,
    journal: Vec<Event>,
    outcome: Option<GameOutcome>,
}

impl Session {
    /// Validates the configuration and assembles an idle session.
    pub fn new(config: GameConfig, layout: BoardLayout) -> Result<Self, SessionError> {
        if !is_inside_board(config.knight_start) {
            return Err(SessionError::KnightStartOutsideBoard {
                cell: config.knight_start,
            });
        }
        if config.knight_move_duration_ms == 0 {
            return Err(SessionError::ZeroKnightMoveDuration);
        }
        let tile_size = layout.tile_size();
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(SessionError::InvalidTileSize { tile_size });
        }

        let spawning = Spawning::new(SpawningConfig::new(config.rng_seed));
        debug!(
            seed = config.rng_seed,
            levels = config.difficulty.max_level().get(),
            "session created"
        );

        Ok(Self {
            world: World::with_config(config),
            layout,
            control: KnightControl::new(),
            spawning,
            advance: PawnAdvance::new(),
            audio: AudioCues::new(),
            cues: Vec::new(),
            journal: Vec::new(),
            outcome: None,
        })
    }

    /// Starts a fresh game, discarding any game in progress.
    pub fn start(&mut self) {
        self.outcome = None;
        let _ = self.dispatch(Command::StartGame);
    }

    /// Requests that the knight jump to `to`.
    pub fn attempt_move(&mut self, to: Cell) -> MoveOutcome {
        let first = self.dispatch(Command::MoveKnight { to });
        move_outcome(first.as_ref())
    }

    /// Delivers a pointer tap in screen coordinates.
    ///
    /// Returns `None` when the tap produced no move request, for example
    /// before a game starts.
    pub fn tap(&mut self, point: Vec2) -> Option<MoveOutcome> {
        let mut commands = Vec::new();
        self.control
            .handle(&[], TapInput::at(point), &self.layout, &mut commands);

        let command = commands.into_iter().next()?;
        let first = self.dispatch(command);
        Some(move_outcome(first.as_ref()))
    }

    /// Advances the simulation clock and resolves every timer that fell due.
    pub fn advance(&mut self, dt: Duration) {
        let _ = self.dispatch(Command::Tick { dt });
    }

    /// Drains the sound cues produced since the previous call.
    pub fn take_cues(&mut self) -> Vec<SoundCue> {
        mem::take(&mut self.cues)
    }

    /// Drains every world event produced since the previous call.
    pub fn take_events(&mut self) -> Vec<Event> {
        mem::take(&mut self.journal)
    }

    /// Values for the heads-up display.
    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        query::hud(&self.world)
    }

    /// Results of the current or most recent game.
    #[must_use]
    pub fn summary(&self) -> GameSummary {
        query::summary(&self.world)
    }

    /// Lifecycle phase of the current game.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        query::phase(&self.world)
    }

    /// How the most recent game ended, once it has.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Screen layout used to interpret taps.
    #[must_use]
    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Read-only access to the underlying world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Applies a command and pumps the resulting events, returning the first
    /// event the command itself produced.
    fn dispatch(&mut self, command: Command) -> Option<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        let first = events.first().cloned();
        self.pump(events);
        first
    }

    fn pump(&mut self, pending_events: Vec<Event>) {
        let mut events = pending_events;

        loop {
            if events.is_empty() {
                break;
            }

            self.observe(&events);

            let settings = query::level_settings(&self.world);
            let free_columns = query::free_columns(&self.world);
            let pawn_count = query::pawn_count(&self.world);
            let mut commands = Vec::new();
            self.control
                .handle(&events, TapInput::default(), &self.layout, &mut commands);
            self.spawning
                .handle(&events, settings, &free_columns, pawn_count, &mut commands);
            self.advance.handle(&events, settings, &mut commands);

            self.journal.append(&mut events);

            if commands.is_empty() {
                break;
            }

            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn observe(&mut self, events: &[Event]) {
        self.audio.handle(events, &mut self.cues);

        for event in events {
            if let Event::GameOver { outcome, summary } = event {
                self.outcome = Some(*outcome);
                info!(
                    ?outcome,
                    score = summary.score,
                    time = %summary.time_taken(),
                    "session finished a game"
                );
            }
        }
    }
}

fn move_outcome(first: Option<&Event>) -> MoveOutcome {
    match first {
        Some(Event::KnightMoveRejected { reason, .. }) => MoveOutcome::Rejected(*reason),
        _ => MoveOutcome::Accepted,
    }
}
