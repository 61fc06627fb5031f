#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Maps world events to fire-and-forget sound cues.

use knight_adventure_core::{Event, SoundCue, PAWN_EXIT_ROW};

/// Stateless system translating events into the cues a host should play.
#[derive(Debug, Default, Clone, Copy)]
pub struct AudioCues;

impl AudioCues {
    /// Creates a new cue mapper.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Appends one cue per audible event, preserving event order.
    pub fn handle(&self, events: &[Event], out: &mut Vec<SoundCue>) {
        out.extend(events.iter().filter_map(cue_for));
    }
}

fn cue_for(event: &Event) -> Option<SoundCue> {
    match event {
        Event::GameStarted { .. } => Some(SoundCue::GameStart),
        Event::KnightMoved { .. } => Some(SoundCue::Move),
        Event::KnightMoveRejected { reason, .. } if reason.is_illegal_target() => {
            Some(SoundCue::Illegal)
        }
        Event::PawnSpawned { .. } => Some(SoundCue::PawnSpawn),
        // The escaping step is covered by the game over cue.
        Event::PawnAdvanced { to, .. } if to.row() < PAWN_EXIT_ROW => Some(SoundCue::PawnMove),
        Event::PawnCaptured { .. } => Some(SoundCue::Capture),
        Event::LevelChanged { .. } => Some(SoundCue::LevelUp),
        Event::GameOver { .. } => Some(SoundCue::GameOver),
        _ => None,
    }
}
