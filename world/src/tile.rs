//! Tile grid storage for the dungeon.

use slug_dungeon_core::{Position, TileSnapshot, Weapon, FLOOR_SYMBOL, GOAL_SYMBOL, WALL_SYMBOL};

/// Terrain kinds a tile can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Impassable wall.
    Wall,
    /// Walkable floor.
    Floor,
    /// Walkable goal tile that ends the level once every slug is gone.
    Goal,
}

impl TileKind {
    /// Display symbol of the terrain.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => WALL_SYMBOL,
            Self::Floor => FLOOR_SYMBOL,
            Self::Goal => GOAL_SYMBOL,
        }
    }

    /// Reports whether the terrain blocks movement.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// A single grid cell that may hold one weapon.
#[derive(Debug, PartialEq, Eq)]
pub struct Tile {
    kind: TileKind,
    weapon: Option<Weapon>,
}

impl Tile {
    /// Creates an empty tile of the provided terrain.
    #[must_use]
    pub const fn new(kind: TileKind) -> Self {
        Self { kind, weapon: None }
    }

    /// Creates an impassable wall tile.
    #[must_use]
    pub const fn wall() -> Self {
        Self::new(TileKind::Wall)
    }

    /// Creates an empty floor tile.
    #[must_use]
    pub const fn floor() -> Self {
        Self::new(TileKind::Floor)
    }

    /// Creates an empty goal tile.
    #[must_use]
    pub const fn goal() -> Self {
        Self::new(TileKind::Goal)
    }

    /// Returns the tile with `weapon` lying on it.
    #[must_use]
    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapon = Some(weapon);
        self
    }

    /// Terrain of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Display symbol of the terrain.
    #[must_use]
    pub const fn symbol(&self) -> char {
        self.kind.symbol()
    }

    /// Reports whether the tile blocks movement.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        self.kind.is_blocking()
    }

    /// Reports whether the tile is a goal tile.
    #[must_use]
    pub const fn is_goal(&self) -> bool {
        matches!(self.kind, TileKind::Goal)
    }

    /// Weapon lying on the tile, if any.
    #[must_use]
    pub fn weapon(&self) -> Option<&Weapon> {
        self.weapon.as_ref()
    }

    /// Places `weapon` on the tile, returning whatever was lying there before.
    pub fn set_weapon(&mut self, weapon: Weapon) -> Option<Weapon> {
        self.weapon.replace(weapon)
    }

    /// Lifts the weapon off the tile.
    pub fn take_weapon(&mut self) -> Option<Weapon> {
        self.weapon.take()
    }

    pub(crate) fn snapshot(&self, position: Position) -> TileSnapshot {
        TileSnapshot {
            position,
            symbol: self.symbol(),
            blocking: self.is_blocking(),
            weapon: self.weapon.as_ref().map(Weapon::kind),
        }
    }
}

/// Dense row-major storage for the dungeon's tiles.
#[derive(Debug)]
pub(crate) struct TileGrid {
    rows: usize,
    columns: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Flattens rectangular rows into a grid. Callers validate the shape.
    pub(crate) fn from_rows(rows: Vec<Vec<Tile>>) -> Self {
        let row_count = rows.len();
        let columns = rows.first().map_or(0, Vec::len);
        let tiles = rows.into_iter().flatten().collect();
        Self {
            rows: row_count,
            columns,
            tiles,
        }
    }

    pub(crate) fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub(crate) fn get(&self, position: Position) -> Option<&Tile> {
        self.index(position).and_then(|index| self.tiles.get(index))
    }

    pub(crate) fn get_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.index(position).and_then(|index| self.tiles.get_mut(index))
    }

    /// Reports whether a combatant could stand on `position`, ignoring occupants.
    pub(crate) fn is_walkable(&self, position: Position) -> bool {
        self.get(position).map_or(false, |tile| !tile.is_blocking())
    }

    /// Iterates over every tile together with its position in row-major order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let row = i32::try_from(index / columns).unwrap_or(i32::MAX);
            let column = i32::try_from(index % columns).unwrap_or(i32::MAX);
            (Position::new(row, column), tile)
        })
    }

    fn index(&self, position: Position) -> Option<usize> {
        let row = usize::try_from(position.row()).ok()?;
        let column = usize::try_from(position.column()).ok()?;
        if row < self.rows && column < self.columns {
            Some(row * self.columns + column)
        } else {
            None
        }
    }
}
