//! Parsing of textual level descriptions into the world's data model.

use std::{collections::BTreeMap, str::FromStr};

use slug_dungeon_core::{
    Position, SlugRoster, Weapon, WeaponKind, FLOOR_SYMBOL, GOAL_SYMBOL, PLAYER_SYMBOL,
    WALL_SYMBOL,
};
use thiserror::Error;

use crate::{Player, Slug, Tile, World};

/// Reasons a level description or its parsed form cannot become a world.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The description contained nothing but whitespace.
    #[error("level description is empty")]
    Empty,
    /// The first line did not hold a positive integer.
    #[error("invalid player health `{0}`, expected a positive integer")]
    InvalidHealth(String),
    /// No grid rows followed the health line.
    #[error("level description contains no grid rows")]
    NoRows,
    /// A grid row differs in length from the first row.
    #[error("grid row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },
    /// The grid is too large to address with signed positions.
    #[error("grid of {rows}x{columns} tiles is too large")]
    GridTooLarge {
        /// Number of rows in the grid.
        rows: usize,
        /// Number of columns in the grid.
        columns: usize,
    },
    /// The grid did not mark a player start.
    #[error("level has no player start `P`")]
    MissingPlayer,
    /// The grid marked more than one player start.
    #[error("player start at {second} duplicates the one at {first}")]
    DuplicatePlayer {
        /// First player start encountered.
        first: Position,
        /// Second player start encountered.
        second: Position,
    },
    /// A grid character is neither terrain, a weapon nor a roster slug.
    #[error("unknown level symbol `{symbol}` at {position}")]
    UnknownSymbol {
        /// Character that could not be resolved.
        symbol: char,
        /// Position of the character within the grid.
        position: Position,
    },
    /// The player would start outside the grid or on a blocking tile.
    #[error("player cannot start at {0}")]
    InvalidPlayerPosition(Position),
    /// A slug would start outside the grid, on a blocking tile or on the player.
    #[error("slug cannot start at {0}")]
    InvalidSlugPosition(Position),
}

/// A level description resolved into tiles and combatants.
#[derive(Debug)]
pub struct Level {
    tiles: Vec<Vec<Tile>>,
    slugs: BTreeMap<Position, Slug>,
    player: Player,
    player_position: Position,
}

impl Level {
    /// Parses a textual level description.
    ///
    /// The first line holds the player's max health; every following non-empty
    /// line is one grid row. Characters not covered by the level format are
    /// looked up in `roster` and spawn the matching slug on a floor tile.
    pub fn parse(description: &str, roster: &SlugRoster) -> Result<Self, LevelError> {
        if description.trim().is_empty() {
            return Err(LevelError::Empty);
        }

        let mut lines = description.lines();
        let health_line = lines.next().unwrap_or_default().trim();
        let max_health = match health_line.parse::<u32>() {
            Ok(value) if value > 0 => value,
            _ => return Err(LevelError::InvalidHealth(health_line.to_owned())),
        };

        let rows: Vec<&str> = lines.filter(|line| !line.is_empty()).collect();
        let expected = rows.first().ok_or(LevelError::NoRows)?.chars().count();

        let mut tiles = Vec::with_capacity(rows.len());
        let mut slugs = BTreeMap::new();
        let mut player_position: Option<Position> = None;

        for (row_index, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(LevelError::RaggedRow {
                    row: row_index,
                    expected,
                    found,
                });
            }

            let mut row = Vec::with_capacity(found);
            for (column_index, symbol) in line.chars().enumerate() {
                let position = position_at(row_index, column_index, rows.len(), expected)?;
                let tile = match symbol {
                    WALL_SYMBOL => Tile::wall(),
                    FLOOR_SYMBOL => Tile::floor(),
                    GOAL_SYMBOL => Tile::goal(),
                    PLAYER_SYMBOL => {
                        if let Some(first) = player_position {
                            return Err(LevelError::DuplicatePlayer {
                                first,
                                second: position,
                            });
                        }
                        player_position = Some(position);
                        Tile::floor()
                    }
                    other => {
                        if let Some(weapon) = WeaponKind::from_level_symbol(other) {
                            Tile::floor().with_weapon(Weapon::new(weapon))
                        } else if let Some(kind) = roster.kind_for(other) {
                            let _ = slugs.insert(position, Slug::new(kind));
                            Tile::floor()
                        } else {
                            return Err(LevelError::UnknownSymbol {
                                symbol: other,
                                position,
                            });
                        }
                    }
                };
                row.push(tile);
            }
            tiles.push(row);
        }

        let player_position = player_position.ok_or(LevelError::MissingPlayer)?;
        Ok(Self {
            tiles,
            slugs,
            player: Player::new(max_health),
            player_position,
        })
    }

    /// Position the player starts on.
    #[must_use]
    pub const fn player_position(&self) -> Position {
        self.player_position
    }

    /// Number of `(rows, columns)` in the grid.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.tiles.len(), self.tiles.first().map_or(0, Vec::len))
    }

    /// Number of slugs the level spawns.
    #[must_use]
    pub fn slug_count(&self) -> usize {
        self.slugs.len()
    }

    /// Builds the world described by the level.
    pub fn into_world(self) -> Result<World, LevelError> {
        World::new(self.tiles, self.slugs, self.player, self.player_position)
    }
}

impl FromStr for Level {
    type Err = LevelError;

    /// Parses a level using the default slug roster.
    fn from_str(description: &str) -> Result<Self, Self::Err> {
        Self::parse(description, &SlugRoster::default())
    }
}

fn position_at(
    row: usize,
    column: usize,
    rows: usize,
    columns: usize,
) -> Result<Position, LevelError> {
    let too_large = || LevelError::GridTooLarge { rows, columns };
    let row = i32::try_from(row).map_err(|_| too_large())?;
    let column = i32::try_from(column).map_err(|_| too_large())?;
    Ok(Position::new(row, column))
}
