#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Slug Dungeon engine.
//!
//! This crate defines the message surface that connects adapters and the
//! authoritative world. Adapters submit [`Command`] values describing the
//! player's intent, the world resolves the full turn via its `apply` entry
//! point, and then reports every observable state change as [`Event`] values.
//! Renderers never reach into the world directly; they consume the read-only
//! snapshot types declared here.

use std::{collections::BTreeMap, fmt, iter};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Slug Dungeon.";

/// Level symbol describing an impassable wall tile.
pub const WALL_SYMBOL: char = '#';
/// Level symbol describing an empty floor tile.
pub const FLOOR_SYMBOL: char = ' ';
/// Level symbol describing the goal tile.
pub const GOAL_SYMBOL: char = 'G';
/// Display symbol of the player, also used to mark the start in level files.
pub const PLAYER_SYMBOL: char = 'P';
/// Display symbol of a generic combat entity.
pub const ENTITY_SYMBOL: char = 'E';
/// Display symbol of a generic slug.
pub const SLUG_SYMBOL: char = 'M';

/// Maximum health assigned to the player when a level does not override it.
pub const DEFAULT_PLAYER_MAX_HEALTH: u32 = 20;

/// Symbols with a fixed meaning in level descriptions that can never name a slug.
pub const RESERVED_LEVEL_SYMBOLS: [char; 7] = [
    WALL_SYMBOL,
    FLOOR_SYMBOL,
    GOAL_SYMBOL,
    PLAYER_SYMBOL,
    WeaponKind::PoisonDart.symbol(),
    WeaponKind::PoisonSword.symbol(),
    WeaponKind::HealingRock.symbol(),
];

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player step one tile in the provided direction.
    ///
    /// Accepted moves resolve the complete turn, including every slug reaction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Reports that a move was refused. No state changed.
    PlayerMoveRejected {
        /// Position the player occupies.
        from: Position,
        /// Position the player attempted to enter.
        attempted: Position,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// Confirms that the player moved between two positions.
    PlayerMoved {
        /// Position the player occupied before moving.
        from: Position,
        /// Position the player occupies after moving.
        to: Position,
    },
    /// Confirms that the player picked up the weapon lying on a tile.
    WeaponPickedUp {
        /// Tile the weapon was lifted from.
        position: Position,
        /// Weapon the player now holds.
        weapon: WeaponKind,
        /// Weapon the player held before, which is discarded.
        discarded: Option<WeaponKind>,
    },
    /// Reports that a weapon effect reached a combatant.
    EffectApplied {
        /// Combatant wielding the weapon.
        attacker: Combatant,
        /// Combatant receiving the effect.
        target: Combatant,
        /// Effect bundle that was applied.
        effect: Effect,
        /// Target health after the effect resolved.
        health: u32,
        /// Target poison stacks after the effect resolved.
        poison: u32,
    },
    /// Reports that poison dealt damage to a combatant.
    PoisonTicked {
        /// Combatant suffering from poison.
        target: Combatant,
        /// Health lost to the tick.
        damage: u32,
        /// Health remaining after the tick.
        health: u32,
        /// Poison stacks remaining after the tick.
        poison: u32,
    },
    /// Announces that a slug died and was removed from the dungeon.
    SlugDied {
        /// Identifier of the slug that died.
        slug: SlugId,
        /// Variant of the slug that died.
        kind: SlugKind,
        /// Tile the slug occupied.
        position: Position,
        /// Weapon left behind on the slug's tile.
        dropped: Option<WeaponKind>,
    },
    /// Marks the end of a fully resolved turn.
    TurnEnded {
        /// Number of turns completed since the level started.
        turn: u64,
    },
    /// Announces that the player reached the goal with every slug defeated.
    ///
    /// Emitted once, on the turn the game is decided.
    GameWon,
    /// Announces that the player ran out of health.
    ///
    /// Emitted once, on the turn the game is decided.
    GameLost,
}

/// Reasons a player move may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The destination lies outside the tile grid.
    OutOfBounds,
    /// The destination tile blocks movement.
    Blocked,
    /// A slug occupies the destination tile.
    Occupied,
}

/// Identifies a combat participant in events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combatant {
    /// The user-controlled player.
    Player,
    /// The slug with the provided identifier.
    Slug(SlugId),
}

/// Unique identifier assigned to a slug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlugId(u32);

impl SlugId {
    /// Creates a new slug identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
///
/// Coordinates are signed because weapon reach is purely geometric and may
/// extend past the grid edges. Ordering compares the row first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: i32,
    column: i32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the position.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the position.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Returns the position displaced by the provided row and column deltas.
    #[must_use]
    pub const fn offset(self, delta_row: i32, delta_column: i32) -> Self {
        Self {
            row: self.row.saturating_add(delta_row),
            column: self.column.saturating_add(delta_column),
        }
    }

    /// Returns the neighbouring position in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (delta_row, delta_column) = direction.delta();
        self.offset(delta_row, delta_column)
    }

    /// Squared Euclidean distance between two positions.
    ///
    /// Orders positions exactly like the Euclidean distance without leaving
    /// integer arithmetic.
    #[must_use]
    pub fn squared_distance(self, other: Position) -> i64 {
        let rows = i64::from(self.row) - i64::from(other.row);
        let columns = i64::from(self.column) - i64::from(other.column);
        rows * rows + columns * columns
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in the order slugs inspect their neighbours.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit `(row, column)` displacement of the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Converts a unit cardinal displacement back into a direction.
    #[must_use]
    pub const fn from_delta(delta_row: i32, delta_column: i32) -> Option<Self> {
        match (delta_row, delta_column) {
            (-1, 0) => Some(Self::Up),
            (1, 0) => Some(Self::Down),
            (0, -1) => Some(Self::Left),
            (0, 1) => Some(Self::Right),
            _ => None,
        }
    }
}

/// Bundle of magnitudes applied atomically to a combatant by a single hit.
///
/// Missing magnitudes are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    damage: u32,
    poison: u32,
    healing: u32,
}

impl Effect {
    /// Effect that changes nothing.
    pub const NONE: Effect = Effect::new();

    /// Creates an empty effect bundle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            damage: 0,
            poison: 0,
            healing: 0,
        }
    }

    /// Returns the bundle with its damage replaced.
    #[must_use]
    pub const fn with_damage(self, damage: u32) -> Self {
        Self { damage, ..self }
    }

    /// Returns the bundle with its poison replaced.
    #[must_use]
    pub const fn with_poison(self, poison: u32) -> Self {
        Self { poison, ..self }
    }

    /// Returns the bundle with its healing replaced.
    #[must_use]
    pub const fn with_healing(self, healing: u32) -> Self {
        Self { healing, ..self }
    }

    /// Health removed by the effect.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Poison stacks added by the effect.
    #[must_use]
    pub const fn poison(&self) -> u32 {
        self.poison
    }

    /// Health restored by the effect.
    #[must_use]
    pub const fn healing(&self) -> u32 {
        self.healing
    }

    /// Reports whether the effect changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.damage == 0 && self.poison == 0 && self.healing == 0
    }
}

/// Immutable weapon definitions known to the dungeon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Placeholder weapon with no reach and no effect.
    Abstract,
    /// Ranged weapon that poisons its targets.
    PoisonDart,
    /// Melee weapon that damages and poisons its target.
    PoisonSword,
    /// Ranged item that heals whoever it reaches.
    HealingRock,
}

impl WeaponKind {
    /// Human readable name of the weapon.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Abstract => "AbstractWeapon",
            Self::PoisonDart => "PoisonDart",
            Self::PoisonSword => "PoisonSword",
            Self::HealingRock => "HealingRock",
        }
    }

    /// Display symbol of the weapon, shared with level descriptions.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Abstract => 'W',
            Self::PoisonDart => 'D',
            Self::PoisonSword => 'S',
            Self::HealingRock => 'H',
        }
    }

    /// Effect applied to every combatant the weapon reaches.
    #[must_use]
    pub const fn effect(self) -> Effect {
        match self {
            Self::Abstract => Effect::NONE,
            Self::PoisonDart => Effect::new().with_poison(2),
            Self::PoisonSword => Effect::new().with_damage(2).with_poison(1),
            Self::HealingRock => Effect::new().with_healing(2),
        }
    }

    /// Number of tiles the weapon reaches along each cardinal direction.
    #[must_use]
    pub const fn range(self) -> u32 {
        match self {
            Self::Abstract => 0,
            Self::PoisonDart => 2,
            Self::PoisonSword => 1,
            Self::HealingRock => 2,
        }
    }

    /// Resolves the weapon that a level symbol places on a floor tile.
    #[must_use]
    pub const fn from_level_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'D' => Some(Self::PoisonDart),
            'S' => Some(Self::PoisonSword),
            'H' => Some(Self::HealingRock),
            _ => None,
        }
    }

    /// Positions reached by the weapon when wielded at `origin`.
    ///
    /// Reach ignores walls and occupants. Cells are listed direction by
    /// direction (down, up, right, left) with increasing distance.
    #[must_use]
    pub fn targets(self, origin: Position) -> Vec<Position> {
        const TARGET_ORDER: [Direction; 4] = [
            Direction::Down,
            Direction::Up,
            Direction::Right,
            Direction::Left,
        ];

        let reach = i32::try_from(self.range()).unwrap_or(i32::MAX);
        TARGET_ORDER
            .iter()
            .flat_map(|direction| {
                let (delta_row, delta_column) = direction.delta();
                (1..=reach).map(move |step| origin.offset(delta_row * step, delta_column * step))
            })
            .collect()
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single weapon instance.
///
/// Weapons are deliberately neither `Clone` nor `Copy`: an instance lives in
/// exactly one slot at a time (a tile or a combatant) and changes hands by
/// being moved.
#[derive(Debug, PartialEq, Eq)]
pub struct Weapon {
    kind: WeaponKind,
}

impl Weapon {
    /// Forges a new weapon instance of the provided kind.
    #[must_use]
    pub const fn new(kind: WeaponKind) -> Self {
        Self { kind }
    }

    /// Definition backing the weapon.
    #[must_use]
    pub const fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Human readable name of the weapon.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Display symbol of the weapon.
    #[must_use]
    pub const fn symbol(&self) -> char {
        self.kind.symbol()
    }

    /// Effect applied to every combatant the weapon reaches.
    #[must_use]
    pub const fn effect(&self) -> Effect {
        self.kind.effect()
    }

    /// Reach of the weapon in tiles.
    #[must_use]
    pub const fn range(&self) -> u32 {
        self.kind.range()
    }

    /// Positions reached by the weapon when wielded at `origin`.
    #[must_use]
    pub fn targets(&self, origin: Position) -> Vec<Position> {
        self.kind.targets(origin)
    }
}

/// Variants of slug that inhabit the dungeon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugKind {
    /// Harmless slug that heals anything nearby and never relocates.
    Nice,
    /// Slug that pursues the player with a poisoned sword.
    Angry,
    /// Slug that flees from the player while throwing darts.
    Scared,
}

impl SlugKind {
    /// Human readable name of the slug variant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nice => "NiceSlug",
            Self::Angry => "AngrySlug",
            Self::Scared => "ScaredSlug",
        }
    }

    /// Display symbol of the slug variant.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Nice => 'N',
            Self::Angry => 'A',
            Self::Scared => 'L',
        }
    }

    /// Health pool the variant spawns with.
    #[must_use]
    pub const fn max_health(self) -> u32 {
        match self {
            Self::Nice => 10,
            Self::Angry => 5,
            Self::Scared => 3,
        }
    }

    /// Weapon equipped when the variant spawns.
    #[must_use]
    pub const fn weapon(self) -> WeaponKind {
        match self {
            Self::Nice => WeaponKind::HealingRock,
            Self::Angry => WeaponKind::PoisonSword,
            Self::Scared => WeaponKind::PoisonDart,
        }
    }

    /// Movement policy of the variant.
    #[must_use]
    pub const fn behavior(self) -> Behavior {
        match self {
            Self::Nice => Behavior::Passive,
            Self::Angry => Behavior::Aggressive,
            Self::Scared => Behavior::Evasive,
        }
    }
}

impl fmt::Display for SlugKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Movement policies available to slugs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Behavior {
    /// Never relocates.
    Passive,
    /// Closes in on the player.
    Aggressive,
    /// Keeps as far from the player as possible.
    Evasive,
}

impl Behavior {
    /// Picks the destination among `candidates` and `current`.
    ///
    /// Distance ties resolve on position ordering: the aggressive policy keeps
    /// the smallest position, the evasive policy the largest.
    #[must_use]
    pub fn choose_move(
        self,
        candidates: &[Position],
        current: Position,
        player: Position,
    ) -> Position {
        let options = candidates.iter().copied().chain(iter::once(current));
        match self {
            Self::Passive => current,
            Self::Aggressive => options
                .min_by_key(|position| (position.squared_distance(player), *position))
                .unwrap_or(current),
            Self::Evasive => options
                .max_by_key(|position| (position.squared_distance(player), *position))
                .unwrap_or(current),
        }
    }
}

/// Caller-supplied mapping from level symbols to slug variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlugRoster {
    symbols: BTreeMap<char, SlugKind>,
}

impl SlugRoster {
    /// Creates a roster that recognises no slug symbols.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            symbols: BTreeMap::new(),
        }
    }

    /// Registers `symbol` as a spawn marker for `kind`, returning the variant it replaced.
    pub fn insert(&mut self, symbol: char, kind: SlugKind) -> Option<SlugKind> {
        self.symbols.insert(symbol, kind)
    }

    /// Variant spawned by `symbol`, if any.
    #[must_use]
    pub fn kind_for(&self, symbol: char) -> Option<SlugKind> {
        self.symbols.get(&symbol).copied()
    }

    /// Iterator over every registered symbol in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (char, SlugKind)> + '_ {
        self.symbols.iter().map(|(symbol, kind)| (*symbol, *kind))
    }
}

impl Default for SlugRoster {
    /// Maps every variant's own display symbol to it.
    fn default() -> Self {
        let symbols = [SlugKind::Nice, SlugKind::Angry, SlugKind::Scared]
            .into_iter()
            .map(|kind| (kind.symbol(), kind))
            .collect();
        Self { symbols }
    }
}

/// Immutable representation of a single tile used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TileSnapshot {
    /// Position of the tile within the grid.
    pub position: Position,
    /// Display symbol of the tile itself.
    pub symbol: char,
    /// Indicates whether the tile blocks movement.
    pub blocking: bool,
    /// Weapon lying on the tile, if any.
    pub weapon: Option<WeaponKind>,
}

/// Immutable representation of a combatant's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EntitySnapshot {
    /// Human readable name of the combatant.
    pub name: &'static str,
    /// Display symbol of the combatant.
    pub symbol: char,
    /// Position the combatant occupies.
    pub position: Position,
    /// Upper bound of the combatant's health.
    pub max_health: u32,
    /// Current health.
    pub health: u32,
    /// Current poison stacks.
    pub poison: u32,
    /// Equipped weapon, if any.
    pub weapon: Option<WeaponKind>,
}

/// Immutable representation of a single slug's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SlugSnapshot {
    /// Unique identifier assigned to the slug.
    pub id: SlugId,
    /// Variant of the slug.
    pub kind: SlugKind,
    /// Combat state of the slug.
    pub entity: EntitySnapshot,
    /// Indicates whether the slug may act on the next turn.
    pub can_move: bool,
    /// Indicates whether the slug is stunned.
    pub stunned: bool,
}

/// Read-only snapshot describing all slugs within the dungeon.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlugView {
    snapshots: Vec<SlugSnapshot>,
}

impl SlugView {
    /// Creates a new slug view, ordering the snapshots by position.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SlugSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.entity.position);
        Self { snapshots }
    }

    /// Iterator over the captured slug snapshots in position order.
    pub fn iter(&self) -> impl Iterator<Item = &SlugSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the slug occupying `position`, if any.
    #[must_use]
    pub fn at(&self, position: Position) -> Option<&SlugSnapshot> {
        self.snapshots
            .binary_search_by_key(&position, |snapshot| snapshot.entity.position)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of slugs captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no slugs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<SlugSnapshot> {
        self.snapshots
    }
}

/// Overall progress of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The player is alive and has not won yet.
    InProgress,
    /// The player stands on the goal and no slugs remain.
    Won,
    /// The player has no health left.
    Lost,
}

impl GameStatus {
    /// Reports whether the level has concluded.
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Complete read-only description of a dungeon, suitable for rendering or export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DungeonSnapshot {
    /// Number of tile rows.
    pub rows: usize,
    /// Number of tile columns.
    pub columns: usize,
    /// Number of completed turns.
    pub turn: u64,
    /// Progress of the level.
    pub status: GameStatus,
    /// Tiles in row-major order, one inner vector per row.
    pub tiles: Vec<Vec<TileSnapshot>>,
    /// State of the player.
    pub player: EntitySnapshot,
    /// Surviving slugs ordered by position.
    pub slugs: SlugView,
}
