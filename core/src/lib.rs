#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Knight Adventure engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod config;
mod difficulty;
mod rules;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

pub use config::GameConfig;
pub use difficulty::{DifficultyError, DifficultyTable, Level, LevelSettings, LevelSpec};
pub use rules::{
    is_inside_board, is_valid_knight_move, knight_destinations, pawn_threatens_cell, BOARD_SIZE,
    PAWN_EXIT_ROW, PAWN_SPAWN_ROW,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Knight Adventure.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resets the board and begins a fresh game.
    StartGame,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the knight jump to the provided cell.
    MoveKnight {
        /// Destination cell requested by the player.
        to: Cell,
    },
    /// Requests that a pawn enter the board above the provided column.
    SpawnPawn {
        /// Column the pawn should occupy.
        column: i32,
    },
    /// Requests that a pawn attempt its next scheduled step.
    AdvancePawn {
        /// Identifier of the pawn whose timer fired.
        pawn: PawnId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a fresh game began.
    GameStarted {
        /// Cell the knight occupies at the start of the game.
        knight: Cell,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the knight jumped between two cells.
    KnightMoved {
        /// Cell the knight occupied before the jump.
        from: Cell,
        /// Cell the knight occupies after the jump.
        to: Cell,
    },
    /// Reports that a knight move request was rejected without mutation.
    KnightMoveRejected {
        /// Destination requested by the player.
        to: Cell,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// Announces that the knight finished settling and accepts new moves.
    KnightReady {
        /// Cell the knight occupies.
        cell: Cell,
    },
    /// Confirms that a pawn entered the spawn row.
    PawnSpawned {
        /// Identifier assigned to the new pawn.
        pawn: PawnId,
        /// Cell the pawn occupies after spawning.
        cell: Cell,
    },
    /// Confirms that a pawn moved one row forward.
    PawnAdvanced {
        /// Identifier of the pawn that advanced.
        pawn: PawnId,
        /// Cell the pawn occupied before advancing.
        from: Cell,
        /// Cell the pawn occupies after advancing.
        to: Cell,
        /// Whether the pawn now threatens the knight and will capture on its next step.
        threatens_knight: bool,
    },
    /// Reports that a pawn could not advance because the next cell is occupied.
    PawnBlocked {
        /// Identifier of the blocked pawn.
        pawn: PawnId,
        /// Cell the pawn attempted to enter.
        blocked_by: Cell,
    },
    /// Reports that the knight escaped a pawn's pending capture.
    PawnThreatCleared {
        /// Identifier of the pawn whose threat lapsed.
        pawn: PawnId,
    },
    /// Confirms that the knight captured a pawn.
    PawnCaptured {
        /// Identifier of the captured pawn.
        pawn: PawnId,
        /// Cell where the capture took place.
        cell: Cell,
    },
    /// Reports the updated score after a capture.
    ScoreChanged {
        /// Total number of pawns captured in this game.
        score: u32,
    },
    /// Announces that the score crossed a level threshold.
    LevelChanged {
        /// Level that became active.
        level: Level,
        /// Difficulty settings attached to the new level.
        settings: LevelSettings,
    },
    /// Reports that a pawn captured the knight.
    KnightCaptured {
        /// Identifier of the capturing pawn.
        pawn: PawnId,
        /// Cell where the knight was taken.
        cell: Cell,
    },
    /// Reports that a pawn walked past the last row.
    PawnEscaped {
        /// Identifier of the escaping pawn.
        pawn: PawnId,
        /// Column the pawn escaped through.
        column: i32,
    },
    /// Announces the terminal transition of the game.
    GameOver {
        /// Event that ended the game.
        outcome: GameOutcome,
        /// Final results recorded at the moment the game ended.
        summary: GameSummary,
    },
}

/// Lifecycle phase of a single game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game has been started yet.
    Idle,
    /// A game is in progress.
    Running,
    /// The game ended; further mutations are ignored.
    Over,
}

/// Reasons a knight move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// No game is in progress yet.
    NotStarted,
    /// The game already ended.
    GameOver,
    /// The knight is still settling after its previous move.
    KnightBusy,
    /// The requested cell lies outside the board.
    OutsideBoard,
    /// The displacement is not an L-shaped knight jump.
    NotKnightMove,
}

impl MoveRejection {
    /// Reports whether the rejection stems from the player's choice of cell.
    ///
    /// Presentation layers use this to decide whether to play a failure cue.
    #[must_use]
    pub const fn is_illegal_target(self) -> bool {
        matches!(self, Self::OutsideBoard | Self::NotKnightMove)
    }
}

/// Terminal events that may end a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// A pawn captured the knight.
    KnightCaptured,
    /// A pawn walked past the last row.
    PawnEscaped,
}

/// Location of a board cell expressed as column and row coordinates.
///
/// Rows grow toward the bottom of the board, which is also the direction
/// pawns advance. Coordinates are signed because pawns spawn one row above
/// the board and leave one row below it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    column: i32,
    row: i32,
}

impl Cell {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the cell displaced by the provided column and row deltas.
    ///
    /// Coordinates saturate at the `i32` bounds, which all lie off the board.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self {
            column: self.column.saturating_add(columns),
            row: self.row.saturating_add(rows),
        }
    }

    /// Squared Euclidean distance between two cells.
    #[must_use]
    pub fn distance_squared(self, other: Cell) -> u64 {
        let columns = u64::from(self.column.abs_diff(other.column));
        let rows = u64::from(self.row.abs_diff(other.row));
        columns * columns + rows * rows
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Unique identifier assigned to a pawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PawnId(u32);

impl PawnId {
    /// Creates a new pawn identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of the knight used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnightSnapshot {
    /// Cell currently occupied by the knight.
    pub cell: Cell,
    /// Indicates whether the knight accepts a new move.
    pub movable: bool,
}

/// Immutable representation of a single pawn's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PawnSnapshot {
    /// Unique identifier assigned to the pawn.
    pub id: PawnId,
    /// Cell currently occupied by the pawn.
    pub cell: Cell,
    /// Indicates whether the pawn will capture the knight on its next step.
    pub pending_capture: bool,
}

/// Read-only snapshot describing all pawns on or around the board.
#[derive(Clone, Debug, Default)]
pub struct PawnView {
    snapshots: Vec<PawnSnapshot>,
}

impl PawnView {
    /// Creates a new pawn view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PawnSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured pawn snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PawnSnapshot> {
        self.snapshots.iter()
    }

    /// Number of pawns captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no pawns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PawnSnapshot> {
        self.snapshots
    }
}

/// Final results of a game handed to presentation and persistence layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameSummary {
    /// Number of pawns captured.
    pub score: u32,
    /// Level reached when the game ended.
    pub level: Level,
    /// Simulated time the game lasted.
    pub elapsed: Duration,
}

impl GameSummary {
    /// Elapsed time rendered as `M:SS.t`.
    #[must_use]
    pub fn time_taken(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

/// Values displayed by the heads-up display while a game runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudSnapshot {
    /// Number of pawns captured so far.
    pub score: u32,
    /// Currently active level.
    pub level: Level,
    /// Simulated time since the game started.
    pub elapsed: Duration,
}

impl fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time {}  pawns {}  level {}",
            format_elapsed(self.elapsed),
            self.score,
            self.level
        )
    }
}

/// Sound cues the presentation layer may play in response to game events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// The knight jumped.
    Move,
    /// The knight captured a pawn.
    Capture,
    /// A pawn entered the board.
    PawnSpawn,
    /// A pawn advanced one row.
    PawnMove,
    /// The player tapped a cell the knight cannot reach.
    Illegal,
    /// The level increased.
    LevelUp,
    /// A new game began.
    GameStart,
    /// The game ended.
    GameOver,
}

/// Formats an elapsed duration as minutes, zero-padded seconds and tenths.
///
/// Partial tenths are truncated, so `65.43s` renders as `1:05.4`.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    let tenths = elapsed.subsec_millis() / 100;
    format!("{}:{:02}.{}", seconds / 60, seconds % 60, tenths)
}
