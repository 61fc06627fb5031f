#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Knight Adventure headlessly.
//!
//! The adapter drives a session with a fixed frame step. Each frame first
//! delivers input (scripted taps or the autopilot) and then advances the
//! clock, printing the final HUD and submitting a high score when the game
//! ends.

mod autopilot;
mod config;
mod cues;
mod high_scores;
mod script;

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use cues::{CueSink, TraceSink, WriterSink};
use glam::Vec2;
use high_scores::JsonLinesStore;
use knight_adventure_core::GamePhase;
use knight_adventure_session::{BoardLayout, Session};
use knight_adventure_world::query;
use script::TapScript;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Headless Knight Adventure driver.
#[derive(Debug, Parser)]
#[command(name = "knight-adventure", version, about)]
struct Args {
    /// TOML file overriding the stock game configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for pawn spawn columns, overriding the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Stop after this many simulated seconds even if the game still runs.
    #[arg(long, default_value_t = 600)]
    max_seconds: u64,
    /// Screen size of one board cell, used to interpret scripted taps.
    #[arg(long, default_value_t = 64.0)]
    tile_size: f32,
    /// Screen position of the board's top-left corner as `x,y`.
    #[arg(long, value_parser = parse_point, default_value = "0,0")]
    origin: Vec2,
    /// File of `frame x y` taps replacing the autopilot.
    #[arg(long)]
    taps: Option<PathBuf>,
    /// Signed-in player; scores are only recorded when present.
    #[arg(long)]
    player: Option<String>,
    /// JSON-lines file receiving high score records.
    #[arg(long, default_value = "high_scores.jsonl")]
    scores: PathBuf,
    /// File receiving one sound cue name per line instead of the trace log.
    #[arg(long)]
    cue_log: Option<PathBuf>,
    /// Increase log verbosity; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Entry point for the Knight Adventure command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut game_config = config::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        game_config.rng_seed = seed;
    }

    let layout = BoardLayout::new(args.origin, args.tile_size);
    let mut session = Session::new(game_config, layout).context("invalid game configuration")?;
    let script = args.taps.as_deref().map(TapScript::load).transpose()?;
    let mut sink = open_cue_sink(args.cue_log.as_deref())?;

    println!("{}", query::welcome_banner(session.world()));
    session.start();

    let frame = Duration::from_millis(args.frame_ms.max(1));
    let limit = Duration::from_secs(args.max_seconds);
    let mut frame_index = 0_u64;
    let mut cue_failures = 0;

    while session.phase() == GamePhase::Running && session.hud().elapsed < limit {
        drive_input(&mut session, script.as_ref(), frame_index);
        session.advance(frame);
        cue_failures += cues::play_all(sink.as_mut(), session.take_cues());
        frame_index += 1;
    }

    if cue_failures > 0 {
        info!(cue_failures, "some sound cues could not be played");
    }

    println!("{}", session.hud());
    match session.outcome() {
        Some(outcome) => {
            println!("game over: {outcome:?}");
            record_score(&session, args.player.as_deref(), &args.scores)?;
        }
        None => println!("stopped after {frame_index} frames"),
    }

    Ok(())
}

fn drive_input(session: &mut Session, script: Option<&TapScript>, frame_index: u64) {
    match script {
        Some(script) => {
            for point in script.taps_for(frame_index) {
                let outcome = session.tap(*point);
                debug!(frame = frame_index, ?point, ?outcome, "scripted tap");
            }
        }
        None => {
            let knight = query::knight(session.world());
            let pawns = query::pawn_view(session.world());
            if let Some(to) = autopilot::choose_move(knight, &pawns) {
                let outcome = session.attempt_move(to);
                debug!(frame = frame_index, %to, ?outcome, "autopilot move");
            }
        }
    }
}

fn record_score(session: &Session, player: Option<&str>, scores: &Path) -> Result<()> {
    let summary = session.summary();
    match high_scores::signed_in(player) {
        Some(identity) => {
            let mut store = JsonLinesStore::open(scores)?;
            let _ = high_scores::submit(&mut store, Some(identity), &summary, Utc::now())?;
        }
        None => info!(
            score = summary.score,
            "no signed-in player; high score not submitted"
        ),
    }

    if let Some(best) = high_scores::best_in_file(scores)? {
        println!(
            "best: {} pawns in {} by {}",
            best.score, best.time_taken, best.identity
        );
    }
    Ok(())
}

fn open_cue_sink(path: Option<&Path>) -> Result<Box<dyn CueSink>> {
    let Some(path) = path else {
        return Ok(Box::new(TraceSink));
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open cue log at {}", path.display()))?;
    Ok(Box::new(WriterSink::new(file)))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn parse_point(value: &str) -> Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, found `{value}`"))?;
    let x = x
        .trim()
        .parse::<f32>()
        .map_err(|error| format!("bad x coordinate `{x}`: {error}"))?;
    let y = y
        .trim()
        .parse::<f32>()
        .map_err(|error| format!("bad y coordinate `{y}`: {error}"))?;
    Ok(Vec2::new(x, y))
}
