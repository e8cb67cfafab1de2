use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use slug_dungeon_core::{SlugKind, SlugRoster, RESERVED_LEVEL_SYMBOLS};
use thiserror::Error;

/// Errors raised while interpreting a roster file.
#[derive(Debug, Error)]
pub(crate) enum RosterError {
    /// The file is not valid TOML or names an unknown slug variant.
    #[error("could not parse roster: {0}")]
    Parse(#[from] toml::de::Error),
    /// A key holds anything other than exactly one character.
    #[error("roster symbol `{0}` must be a single character")]
    InvalidSymbol(String),
    /// A key collides with a symbol the level format already uses.
    #[error("roster symbol `{0}` is reserved by the level format")]
    ReservedSymbol(char),
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    slugs: BTreeMap<String, SlugKind>,
}

/// Parses roster TOML of the form:
///
/// ```toml
/// [slugs]
/// N = "nice"
/// x = "angry"
/// ```
///
/// The result replaces the default roster entirely.
pub(crate) fn parse_roster(text: &str) -> Result<SlugRoster, RosterError> {
    let file: RosterFile = toml::from_str(text)?;
    let mut roster = SlugRoster::empty();
    for (key, kind) in file.slugs {
        let mut chars = key.chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(symbol), None) => symbol,
            _ => return Err(RosterError::InvalidSymbol(key)),
        };
        if RESERVED_LEVEL_SYMBOLS.contains(&symbol) {
            return Err(RosterError::ReservedSymbol(symbol));
        }
        let _ = roster.insert(symbol, kind);
    }
    Ok(roster)
}

/// Reads and parses the roster stored at `path`.
pub(crate) fn load_roster(path: &Path) -> Result<SlugRoster> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    parse_roster(&text).with_context(|| format!("invalid roster {}", path.display()))
}
