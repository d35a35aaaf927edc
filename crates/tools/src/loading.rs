//! File inputs for the command-line drivers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dungeon_core::{InputJournal, SimConfig};

/// Defaults when no path is given; a partial file only overrides what it names.
pub fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: SimConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    config.validate().with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(config)
}

pub fn load_journal(path: &Path) -> Result<InputJournal> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read journal file: {}", path.display()))?;
    serde_json::from_str(&text).context("failed to deserialize journal JSON")
}

pub fn save_journal(path: &Path, journal: &InputJournal) -> Result<()> {
    let text = serde_json::to_string_pretty(journal).context("failed to serialize journal")?;
    fs::write(path, text).with_context(|| format!("failed to write journal: {}", path.display()))
}
