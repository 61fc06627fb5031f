//! Score-driven difficulty progression.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest level a difficulty table may describe.
const MAX_LEVELS: usize = 10;

/// Difficulty tier derived from the player's score.
///
/// Levels are one-based and never exceed ten.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Level(u8);

impl Level {
    /// Level every game starts at.
    pub const FIRST: Level = Level(1);

    /// Creates a level, clamping the value into the supported `1..=10` range.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value == 0 {
            Self(1)
        } else if value as usize > MAX_LEVELS {
            Self(MAX_LEVELS as u8)
        } else {
            Self(value)
        }
    }

    /// Retrieves the one-based level number.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pacing parameters that apply while a level is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelSettings {
    /// Delay between successive spawn attempts.
    pub spawn_interval: Duration,
    /// Delay between successive steps of a single pawn.
    pub move_interval: Duration,
    /// Maximum number of pawns allowed at once.
    pub max_pawns: u32,
}

/// Serializable description of one row of the difficulty table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Minimum score required to reach the level.
    pub threshold: u32,
    /// Delay between spawn attempts, in milliseconds.
    pub spawn_interval_ms: u64,
    /// Delay between pawn steps, in milliseconds.
    pub move_interval_ms: u64,
    /// Maximum number of pawns allowed at once.
    pub max_pawns: u32,
}

impl LevelSpec {
    const fn new(
        threshold: u32,
        spawn_interval_ms: u64,
        move_interval_ms: u64,
        max_pawns: u32,
    ) -> Self {
        Self {
            threshold,
            spawn_interval_ms,
            move_interval_ms,
            max_pawns,
        }
    }

    fn settings(&self) -> LevelSettings {
        LevelSettings {
            spawn_interval: Duration::from_millis(self.spawn_interval_ms),
            move_interval: Duration::from_millis(self.move_interval_ms),
            max_pawns: self.max_pawns,
        }
    }
}

const DEFAULT_LEVELS: [LevelSpec; MAX_LEVELS] = [
    LevelSpec::new(0, 3_000, 3_000, 2),
    LevelSpec::new(3, 3_000, 3_000, 3),
    LevelSpec::new(6, 2_500, 3_000, 3),
    LevelSpec::new(9, 2_500, 3_000, 4),
    LevelSpec::new(12, 2_500, 2_500, 4),
    LevelSpec::new(15, 2_000, 2_500, 4),
    LevelSpec::new(18, 2_000, 2_500, 5),
    LevelSpec::new(21, 2_000, 2_000, 5),
    LevelSpec::new(24, 1_500, 2_000, 5),
    LevelSpec::new(27, 1_500, 2_000, 6),
];

/// Reasons a difficulty table may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DifficultyError {
    /// The table did not describe any level.
    #[error("difficulty table must describe at least one level")]
    Empty,
    /// The table described more levels than supported.
    #[error("difficulty table describes {count} levels but at most 10 are supported")]
    TooManyLevels {
        /// Number of levels supplied.
        count: usize,
    },
    /// The first level did not start at a score of zero.
    #[error("level 1 must start at score 0, found {threshold}")]
    FirstThresholdNotZero {
        /// Threshold supplied for the first level.
        threshold: u32,
    },
    /// A threshold did not exceed the previous one.
    #[error("threshold of level {level} must exceed the threshold of the previous level")]
    ThresholdsNotAscending {
        /// One-based level whose threshold is out of order.
        level: usize,
    },
    /// A spawn or move interval was zero.
    #[error("level {level} must use non-zero spawn and move intervals")]
    ZeroInterval {
        /// One-based level with the zero interval.
        level: usize,
    },
    /// A level allowed no pawns at all.
    #[error("level {level} must allow at least one pawn")]
    ZeroPawnCap {
        /// One-based level with the zero cap.
        level: usize,
    },
}

/// Ordered threshold table mapping scores to levels and pacing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelSpec>", into = "Vec<LevelSpec>")]
pub struct DifficultyTable {
    levels: Vec<LevelSpec>,
}

impl DifficultyTable {
    /// Validates and constructs a table from level descriptions ordered by level.
    pub fn new(levels: Vec<LevelSpec>) -> Result<Self, DifficultyError> {
        let first = levels.first().ok_or(DifficultyError::Empty)?;
        if levels.len() > MAX_LEVELS {
            return Err(DifficultyError::TooManyLevels {
                count: levels.len(),
            });
        }
        if first.threshold != 0 {
            return Err(DifficultyError::FirstThresholdNotZero {
                threshold: first.threshold,
            });
        }

        for (index, spec) in levels.iter().enumerate() {
            let level = index + 1;
            if spec.spawn_interval_ms == 0 || spec.move_interval_ms == 0 {
                return Err(DifficultyError::ZeroInterval { level });
            }
            if spec.max_pawns == 0 {
                return Err(DifficultyError::ZeroPawnCap { level });
            }
        }

        if let Some(index) = levels
            .windows(2)
            .position(|pair| pair[1].threshold <= pair[0].threshold)
        {
            return Err(DifficultyError::ThresholdsNotAscending { level: index + 2 });
        }

        Ok(Self { levels })
    }

    /// Resolves the level reached with the provided score.
    ///
    /// Thresholds are matched exactly, not interpolated: the level is the
    /// highest one whose threshold does not exceed the score.
    #[must_use]
    pub fn level_for_score(&self, score: u32) -> Level {
        let reached = self
            .levels
            .iter()
            .rposition(|spec| score >= spec.threshold)
            .unwrap_or(0);
        Level::new((reached + 1) as u8)
    }

    /// Pacing attached to the provided level.
    ///
    /// Levels beyond the table reuse its final row.
    #[must_use]
    pub fn settings(&self, level: Level) -> LevelSettings {
        let index = level.index().min(self.levels.len() - 1);
        self.levels[index].settings()
    }

    /// Highest level described by the table.
    #[must_use]
    pub fn max_level(&self) -> Level {
        Level::new(self.levels.len() as u8)
    }

    /// Level descriptions ordered from the first level upward.
    #[must_use]
    pub fn levels(&self) -> &[LevelSpec] {
        &self.levels
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS.to_vec(),
        }
    }
}

impl TryFrom<Vec<LevelSpec>> for DifficultyTable {
    type Error = DifficultyError;

    fn try_from(levels: Vec<LevelSpec>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<DifficultyTable> for Vec<LevelSpec> {
    fn from(table: DifficultyTable) -> Self {
        table.levels
    }
}
