use std::io::Write;

use anyhow::{Context, Result};
use knight_adventure_core::SoundCue;
use tracing::{debug, warn};

/// Presentation hook that plays sound cues.
pub(crate) trait CueSink {
    fn play(&mut self, cue: SoundCue) -> Result<()>;
}

/// Sink that only records cues in the trace log.
#[derive(Debug, Default)]
pub(crate) struct TraceSink;

impl CueSink for TraceSink {
    fn play(&mut self, cue: SoundCue) -> Result<()> {
        debug!(?cue, "sound cue");
        Ok(())
    }
}

/// Sink that writes one cue name per line.
#[derive(Debug)]
pub(crate) struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> CueSink for WriterSink<W> {
    fn play(&mut self, cue: SoundCue) -> Result<()> {
        writeln!(self.writer, "{cue:?}").context("failed to write sound cue")
    }
}

/// Plays every cue, logging failures without interrupting the game.
pub(crate) fn play_all(sink: &mut dyn CueSink, cues: Vec<SoundCue>) -> usize {
    let mut failures = 0;
    for cue in cues {
        if let Err(error) = sink.play(cue) {
            warn!(?cue, error = %format!("{error:#}"), "sound cue failed");
            failures += 1;
        }
    }
    failures
}
