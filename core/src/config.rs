//! Tunable parameters describing a single game session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Cell, DifficultyTable};

const DEFAULT_KNIGHT_START: Cell = Cell::new(4, 4);
const DEFAULT_KNIGHT_MOVE_MS: u64 = 500;
const DEFAULT_RNG_SEED: u64 = 0x6b6e_6967_6874_0001;

/// Configuration consumed when a session is created.
///
/// Every field falls back to the stock game values when omitted from a
/// configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cell the knight occupies when a game starts.
    pub knight_start: Cell,
    /// Time the knight needs to settle after a jump before it may move again.
    pub knight_move_duration_ms: u64,
    /// Seed for the spawn column generator.
    pub rng_seed: u64,
    /// Score thresholds and pacing per level.
    pub difficulty: DifficultyTable,
}

impl GameConfig {
    /// Settling time after each knight jump.
    #[must_use]
    pub const fn knight_move_duration(&self) -> Duration {
        Duration::from_millis(self.knight_move_duration_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            knight_start: DEFAULT_KNIGHT_START,
            knight_move_duration_ms: DEFAULT_KNIGHT_MOVE_MS,
            rng_seed: DEFAULT_RNG_SEED,
            difficulty: DifficultyTable::default(),
        }
    }
}
