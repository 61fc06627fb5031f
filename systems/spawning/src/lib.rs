#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting pawn spawn commands.
//!
//! A game opens with one spawn attempt, every captured pawn earns a
//! replacement attempt, and a timer adds one attempt per spawn interval. The
//! interval is sampled from the level settings each time the timer is armed,
//! so a level change only affects the next countdown.

use std::time::Duration;

use knight_adventure_core::{Command, Event, LevelSettings};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided column generator seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that deterministically emits spawn commands while a game runs.
#[derive(Debug)]
pub struct Spawning {
    active: bool,
    armed_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            active: false,
            armed_interval: Duration::ZERO,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// `free_columns` lists the columns holding no pawn and `pawn_count` the
    /// number of live pawns, both as observed before any emitted command is
    /// applied.
    pub fn handle(
        &mut self,
        events: &[Event],
        settings: LevelSettings,
        free_columns: &[i32],
        pawn_count: usize,
        out: &mut Vec<Command>,
    ) {
        let mut attempts = 0_usize;

        for event in events {
            match event {
                Event::GameStarted { .. } => {
                    self.active = true;
                    self.accumulator = Duration::ZERO;
                    self.armed_interval = settings.spawn_interval;
                    attempts = 1;
                }
                Event::GameOver { .. } => {
                    self.active = false;
                    self.accumulator = Duration::ZERO;
                    attempts = 0;
                }
                Event::PawnCaptured { .. } if self.active => attempts += 1,
                Event::TimeAdvanced { dt } if self.active => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                    attempts += self.resolve_timer(settings.spawn_interval);
                }
                _ => {}
            }
        }

        if attempts == 0 {
            return;
        }

        self.emit_attempts(attempts, settings, free_columns, pawn_count, out);
    }

    fn resolve_timer(&mut self, next_interval: Duration) -> usize {
        if self.armed_interval.is_zero() {
            return 0;
        }

        let mut fired = 0;
        while self.accumulator >= self.armed_interval {
            self.accumulator -= self.armed_interval;
            self.armed_interval = next_interval;
            fired += 1;
            if self.armed_interval.is_zero() {
                break;
            }
        }
        fired
    }

    fn emit_attempts(
        &mut self,
        attempts: usize,
        settings: LevelSettings,
        free_columns: &[i32],
        pawn_count: usize,
        out: &mut Vec<Command>,
    ) {
        let max_pawns = usize::try_from(settings.max_pawns).unwrap_or(usize::MAX);
        let mut capacity = max_pawns.saturating_sub(pawn_count);
        let mut columns = free_columns.to_vec();

        for _ in 0..attempts {
            if capacity == 0 || columns.is_empty() {
                debug!(
                    pawn_count,
                    max_pawns,
                    free = columns.len(),
                    "spawn attempt skipped"
                );
                continue;
            }

            let column = columns.swap_remove(self.rng.gen_range(0..columns.len()));
            capacity -= 1;
            out.push(Command::SpawnPawn { column });
        }
    }
}
