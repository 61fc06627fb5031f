use std::{fs, path::Path};

use anyhow::{Context, Result};
use knight_adventure_core::GameConfig;

/// Loads a game configuration from a TOML file, or the stock values when no
/// path is supplied.
pub(crate) fn load(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read game config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid game config at {}", path.display()))
}

fn parse(contents: &str) -> Result<GameConfig> {
    toml::from_str(contents).context("failed to parse game config toml contents")
}
