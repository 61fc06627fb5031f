use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::Path,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use knight_adventure_core::GameSummary;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Result of a finished game as persisted by the high-score store.
///
/// Encoded as `{ identity, score, timeTaken, timestamp }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HighScoreRecord {
    /// Player the score belongs to.
    pub identity: String,
    /// Number of pawns captured.
    pub score: u32,
    /// Game length rendered as `M:SS.t`.
    pub time_taken: String,
    /// Moment the game ended.
    pub timestamp: DateTime<Utc>,
}

impl HighScoreRecord {
    pub(crate) fn new(identity: &str, summary: &GameSummary, timestamp: DateTime<Utc>) -> Self {
        Self {
            identity: identity.to_owned(),
            score: summary.score,
            time_taken: summary.time_taken(),
            timestamp,
        }
    }
}

/// Destination for finished-game records.
pub(crate) trait HighScoreStore {
    fn append(&mut self, record: &HighScoreRecord) -> Result<()>;
}

/// Store writing one JSON document per line.
#[derive(Debug)]
pub(crate) struct JsonLinesStore<W> {
    writer: W,
}

impl JsonLinesStore<File> {
    /// Opens `path` for appending, creating it when missing.
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open high score file at {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> JsonLinesStore<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> HighScoreStore for JsonLinesStore<W> {
    fn append(&mut self, record: &HighScoreRecord) -> Result<()> {
        let line = serde_json::to_string(record).context("failed to encode high score record")?;
        writeln!(self.writer, "{line}").context("failed to write high score record")?;
        self.writer.flush().context("failed to flush high score record")
    }
}

/// Reads every record from a JSON-lines source, skipping blank lines.
pub(crate) fn read_records(reader: impl BufRead) -> Result<Vec<HighScoreRecord>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read high score line")?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .with_context(|| format!("malformed high score on line {}", index + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Best recorded score in the file at `path`, if the file exists.
pub(crate) fn best_in_file(path: &Path) -> Result<Option<HighScoreRecord>> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path)
        .with_context(|| format!("failed to open high score file at {}", path.display()))?;
    let records = read_records(BufReader::new(file))?;
    Ok(records.into_iter().max_by_key(|record| record.score))
}

/// Trimmed identity of a signed-in player, or `None` for anonymous play.
pub(crate) fn signed_in(identity: Option<&str>) -> Option<&str> {
    identity.map(str::trim).filter(|identity| !identity.is_empty())
}

/// Hands a finished game to `store` on behalf of `identity`.
///
/// Without a signed-in player nothing is written and `Ok(None)` is returned.
pub(crate) fn submit(
    store: &mut dyn HighScoreStore,
    identity: Option<&str>,
    summary: &GameSummary,
    timestamp: DateTime<Utc>,
) -> Result<Option<HighScoreRecord>> {
    let Some(identity) = signed_in(identity) else {
        info!(score = summary.score, "no signed-in player; high score not submitted");
        return Ok(None);
    };

    let record = HighScoreRecord::new(identity, summary, timestamp);
    store.append(&record)?;
    info!(
        identity = %record.identity,
        score = record.score,
        time = %record.time_taken,
        "high score submitted"
    );
    Ok(Some(record))
}
