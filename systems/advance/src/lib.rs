#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-pawn advance timers that drive pawns down the board.
//!
//! Each pawn becomes due one move interval after it spawns and again one
//! move interval after every answered advance, whether the pawn stepped or
//! was blocked. The system releases a single `AdvancePawn` per call so that
//! timers falling inside the same tick resolve strictly in due-time order.

use std::{collections::BTreeMap, time::Duration};

use knight_adventure_core::{Command, Event, LevelSettings, PawnId};
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Timer {
    due_at: Duration,
    armed: bool,
}

/// Pure system that tracks advance timers and emits pawn advance commands.
#[derive(Debug, Default)]
pub struct PawnAdvance {
    active: bool,
    clock: Duration,
    timers: BTreeMap<PawnId, Timer>,
}

impl PawnAdvance {
    /// Creates an idle advance system that waits for a game to start.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and emits at most one advance command.
    ///
    /// `settings` supplies the move interval used for timers armed while
    /// handling these events.
    pub fn handle(&mut self, events: &[Event], settings: LevelSettings, out: &mut Vec<Command>) {
        for event in events {
            self.observe(event, settings.move_interval);
        }

        if !self.active {
            return;
        }

        if let Some(pawn) = self.next_due() {
            if let Some(timer) = self.timers.get_mut(&pawn) {
                timer.armed = false;
            }
            trace!(pawn = pawn.get(), clock = ?self.clock, "pawn advance due");
            out.push(Command::AdvancePawn { pawn });
        }
    }

    /// Number of pawns with a live timer.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.timers.len()
    }

    fn observe(&mut self, event: &Event, move_interval: Duration) {
        match event {
            Event::GameStarted { .. } => {
                self.active = true;
                self.clock = Duration::ZERO;
                self.timers.clear();
            }
            Event::GameOver { .. } => {
                self.active = false;
                self.timers.clear();
            }
            Event::TimeAdvanced { dt } if self.active => {
                self.clock = self.clock.saturating_add(*dt);
            }
            Event::PawnSpawned { pawn, .. } if self.active => {
                let _ = self.timers.insert(
                    *pawn,
                    Timer {
                        due_at: self.clock.saturating_add(move_interval),
                        armed: true,
                    },
                );
            }
            Event::PawnAdvanced { pawn, .. } | Event::PawnBlocked { pawn, .. } => {
                if let Some(timer) = self.timers.get_mut(pawn) {
                    timer.due_at = timer.due_at.saturating_add(move_interval);
                    timer.armed = true;
                }
            }
            Event::PawnCaptured { pawn, .. } => {
                let _ = self.timers.remove(pawn);
            }
            _ => {}
        }
    }

    fn next_due(&self) -> Option<PawnId> {
        self.timers
            .iter()
            .filter(|(_, timer)| timer.armed && timer.due_at <= self.clock)
            .min_by_key(|(pawn, timer)| (timer.due_at, **pawn))
            .map(|(pawn, _)| *pawn)
    }
}
