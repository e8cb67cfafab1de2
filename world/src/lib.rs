#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Slug Dungeon.
//!
//! The [`World`] owns the tile grid, the slugs keyed by position and the
//! player. A single accepted player move resolves the whole turn
//! synchronously: pickup, player attack, poison, slug deaths, slug attacks and
//! cadence bookkeeping all happen inside [`apply`]. Invalid input never fails;
//! it only produces a rejection event.

mod entity;
mod level;
mod tile;

use std::collections::BTreeMap;

use slug_dungeon_core::{
    Combatant, Command, Direction, Event, GameStatus, MoveRejection, Position, SlugId, Weapon,
    WELCOME_BANNER,
};
use tracing::{debug, info, trace};

pub use entity::{Combat, Entity, Player, Slug};
pub use level::{Level, LevelError};
pub use tile::{Tile, TileKind};

use tile::TileGrid;

/// Represents the authoritative Slug Dungeon world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tiles: TileGrid,
    slugs: BTreeMap<Position, Slug>,
    player: Player,
    player_position: Position,
    previous_player_position: Position,
    turn: u64,
    reported_status: GameStatus,
}

impl World {
    /// Creates a world from already parsed level data.
    ///
    /// `tiles` must be a non-empty rectangle. The player has to stand on a
    /// walkable tile inside the grid, and so does every slug, none of them on
    /// the player. Slugs receive identifiers in position order.
    pub fn new(
        tiles: Vec<Vec<Tile>>,
        slugs: BTreeMap<Position, Slug>,
        player: Player,
        player_position: Position,
    ) -> Result<Self, LevelError> {
        let columns = tiles.first().map_or(0, Vec::len);
        if columns == 0 {
            return Err(LevelError::NoRows);
        }
        if let Some((row, found)) = tiles
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, found)| *found != columns)
        {
            return Err(LevelError::RaggedRow {
                row,
                expected: columns,
                found,
            });
        }
        let rows = tiles.len();
        if i32::try_from(rows).is_err() || i32::try_from(columns).is_err() {
            return Err(LevelError::GridTooLarge { rows, columns });
        }

        let tiles = TileGrid::from_rows(tiles);
        if !tiles.is_walkable(player_position) {
            return Err(LevelError::InvalidPlayerPosition(player_position));
        }

        let mut slugs = slugs;
        for (index, (position, slug)) in slugs.iter_mut().enumerate() {
            if !tiles.is_walkable(*position) || *position == player_position {
                return Err(LevelError::InvalidSlugPosition(*position));
            }
            let id = u32::try_from(index).unwrap_or(u32::MAX);
            slug.assign_id(SlugId::new(id));
        }

        debug!(
            rows,
            columns,
            slugs = slugs.len(),
            player = %player_position,
            "world constructed"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            tiles,
            slugs,
            player,
            player_position,
            previous_player_position: player_position,
            turn: 0,
            reported_status: GameStatus::InProgress,
        })
    }

    /// Builds the world described by `level`.
    pub fn from_level(level: Level) -> Result<Self, LevelError> {
        level.into_world()
    }

    /// Positions the slug could relocate to this turn.
    ///
    /// A slug that may not move, or that has no free orthogonal neighbour,
    /// can only stay where it is. Unknown slugs yield no positions.
    #[must_use]
    pub fn valid_slug_positions(&self, slug: SlugId) -> Vec<Position> {
        let Some((current, slug)) = self.slug_by_id(slug) else {
            return Vec::new();
        };
        if !slug.can_move() {
            return vec![current];
        }

        let candidates: Vec<Position> = Direction::ALL
            .iter()
            .map(|direction| current.step(*direction))
            .filter(|candidate| {
                self.tiles.is_walkable(*candidate)
                    && !self.slugs.contains_key(candidate)
                    && *candidate != self.player_position
            })
            .collect();

        if candidates.is_empty() {
            vec![current]
        } else {
            candidates
        }
    }

    /// Resolves an attack by `attacker` wielding its weapon at `origin`.
    ///
    /// The player hits every slug in reach; slugs only ever hit the player.
    /// Unarmed or unknown attackers do nothing.
    pub fn perform_attack(
        &mut self,
        attacker: Combatant,
        origin: Position,
        out_events: &mut Vec<Event>,
    ) {
        let entity = match attacker {
            Combatant::Player => Some(self.player.entity()),
            Combatant::Slug(id) => self.slug_by_id(id).map(|(_, slug)| slug.entity()),
        };
        let Some(entity) = entity.filter(|entity| entity.weapon().is_some()) else {
            return;
        };
        let effect = entity.weapon_effect();
        let targets = entity.weapon_targets(origin);

        match attacker {
            Combatant::Player => {
                for (position, slug) in self.slugs.iter_mut() {
                    if !targets.contains(position) {
                        continue;
                    }
                    slug.entity_mut().apply_effects(effect);
                    trace!(slug = slug.id().get(), target = %position, ?effect, "player hit slug");
                    out_events.push(Event::EffectApplied {
                        attacker,
                        target: Combatant::Slug(slug.id()),
                        effect,
                        health: slug.entity().health(),
                        poison: slug.entity().poison(),
                    });
                }
            }
            Combatant::Slug(id) => {
                if !targets.contains(&self.player_position) {
                    return;
                }
                let entity = self.player.entity_mut();
                entity.apply_effects(effect);
                trace!(slug = id.get(), from = %origin, ?effect, "slug hit player");
                out_events.push(Event::EffectApplied {
                    attacker,
                    target: Combatant::Player,
                    effect,
                    health: entity.health(),
                    poison: entity.poison(),
                });
            }
        }
    }

    /// Attempts to step the player in `direction`.
    ///
    /// Moves off the grid, into walls or onto slugs are rejected without
    /// changing any state. Accepted moves pick up any weapon on the
    /// destination, attack from there and resolve the rest of the turn.
    pub fn handle_player_move(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let from = self.player_position;
        let to = from.step(direction);

        let rejection = match self.tiles.get(to) {
            None => Some(MoveRejection::OutOfBounds),
            Some(tile) if tile.is_blocking() => Some(MoveRejection::Blocked),
            Some(_) if self.slugs.contains_key(&to) => Some(MoveRejection::Occupied),
            Some(_) => None,
        };
        if let Some(reason) = rejection {
            debug!(from = %from, attempted = %to, ?reason, "player move rejected");
            out_events.push(Event::PlayerMoveRejected {
                from,
                attempted: to,
                reason,
            });
            return;
        }

        self.player_position = to;
        out_events.push(Event::PlayerMoved { from, to });

        if let Some(weapon) = self.tiles.get_mut(to).and_then(Tile::take_weapon) {
            let picked = weapon.kind();
            let discarded = self.player.entity_mut().equip(weapon).map(|old| old.kind());
            debug!(weapon = %picked, position = %to, "player picked up weapon");
            out_events.push(Event::WeaponPickedUp {
                position: to,
                weapon: picked,
                discarded,
            });
        }

        self.perform_attack(Combatant::Player, to, out_events);
        self.end_turn(out_events);
    }

    /// Resolves everything that happens after the player acted.
    ///
    /// The order is fixed: player poison, slug poison and deaths, movement
    /// eligibility, slug attacks, cadence flip. Dead slugs are removed before
    /// any survivor acts. `GameWon` or `GameLost` is emitted only on the turn
    /// the outcome changes.
    pub fn end_turn(&mut self, out_events: &mut Vec<Event>) {
        let poisoned = self.player.entity().poison() > 0;
        let damage = self.player.entity_mut().apply_poison();
        if poisoned {
            trace!(damage, "poison ticked on player");
            out_events.push(Event::PoisonTicked {
                target: Combatant::Player,
                damage,
                health: self.player.entity().health(),
                poison: self.player.entity().poison(),
            });
        }

        let mut dead: Vec<Position> = Vec::new();
        for (position, slug) in self.slugs.iter_mut() {
            if slug.is_poisoned() {
                let damage = slug.entity_mut().apply_poison();
                out_events.push(Event::PoisonTicked {
                    target: Combatant::Slug(slug.id()),
                    damage,
                    health: slug.entity().health(),
                    poison: slug.entity().poison(),
                });
            }
            if !slug.entity().is_alive() {
                dead.push(*position);
            }
        }
        for position in dead {
            self.bury_slug(position, out_events);
        }

        for slug in self.slugs.values_mut() {
            let restrained = slug.is_poisoned() || slug.is_stunned();
            slug.set_can_move(!restrained);
        }

        let attackers: Vec<(SlugId, Position)> = self
            .slugs
            .iter()
            .filter(|(_, slug)| slug.can_move())
            .map(|(position, slug)| (slug.id(), *position))
            .collect();
        for (id, position) in attackers {
            self.perform_attack(Combatant::Slug(id), position, out_events);
        }

        for slug in self.slugs.values_mut() {
            slug.end_turn();
        }

        self.previous_player_position = self.player_position;
        self.turn = self.turn.saturating_add(1);
        debug!(turn = self.turn, slugs = self.slugs.len(), "turn ended");
        out_events.push(Event::TurnEnded { turn: self.turn });

        let status = self.status();
        if status == self.reported_status {
            return;
        }
        self.reported_status = status;
        match status {
            GameStatus::Lost => {
                info!(turn = self.turn, "player lost");
                out_events.push(Event::GameLost);
            }
            GameStatus::Won => {
                info!(turn = self.turn, "player won");
                out_events.push(Event::GameWon);
            }
            GameStatus::InProgress => {}
        }
    }

    /// Reports whether the player has run out of health.
    #[must_use]
    pub fn has_lost(&self) -> bool {
        !self.player.entity().is_alive()
    }

    /// Reports whether the player stands on the goal with no slugs left.
    #[must_use]
    pub fn has_won(&self) -> bool {
        let on_goal = self
            .tiles
            .get(self.player_position)
            .map_or(false, Tile::is_goal);
        on_goal && self.slugs.is_empty()
    }

    /// Overall progress of the level. A defeated player never counts as winning.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.has_lost() {
            GameStatus::Lost
        } else if self.has_won() {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    fn slug_by_id(&self, id: SlugId) -> Option<(Position, &Slug)> {
        self.slugs
            .iter()
            .find(|(_, slug)| slug.id() == id)
            .map(|(position, slug)| (*position, slug))
    }

    fn bury_slug(&mut self, position: Position, out_events: &mut Vec<Event>) {
        let Some(mut slug) = self.slugs.remove(&position) else {
            return;
        };

        let dropped = slug.entity_mut().unequip();
        let dropped_kind = dropped.as_ref().map(Weapon::kind);
        if let (Some(weapon), Some(tile)) = (dropped, self.tiles.get_mut(position)) {
            let _ = tile.set_weapon(weapon);
        }

        info!(slug = slug.id().get(), kind = %slug.kind(), position = %position, "slug died");
        out_events.push(Event::SlugDied {
            slug: slug.id(),
            kind: slug.kind(),
            position,
            dropped: dropped_kind,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MovePlayer { direction } => world.handle_player_move(direction, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use slug_dungeon_core::{
        DungeonSnapshot, EntitySnapshot, GameStatus, Position, SlugId, SlugView, TileSnapshot,
    };

    use super::{Combat, Player, Slug, Tile, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of `(rows, columns)` in the tile grid.
    #[must_use]
    pub fn dimensions(world: &World) -> (usize, usize) {
        world.tiles.dimensions()
    }

    /// Tile at `position`, if it lies inside the grid.
    #[must_use]
    pub fn tile(world: &World, position: Position) -> Option<&Tile> {
        world.tiles.get(position)
    }

    /// Captures every tile, one inner vector per row.
    #[must_use]
    pub fn tile_snapshots(world: &World) -> Vec<Vec<TileSnapshot>> {
        let (rows, columns) = world.tiles.dimensions();
        let mut grid: Vec<Vec<TileSnapshot>> = Vec::with_capacity(rows);
        for (position, tile) in world.tiles.iter() {
            if grid.last().map_or(true, |row| row.len() == columns) {
                grid.push(Vec::with_capacity(columns));
            }
            if let Some(row) = grid.last_mut() {
                row.push(tile.snapshot(position));
            }
        }
        grid
    }

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Position the player occupies.
    #[must_use]
    pub fn player_position(world: &World) -> Position {
        world.player_position
    }

    /// Position the player occupied when the previous turn ended.
    #[must_use]
    pub fn previous_player_position(world: &World) -> Position {
        world.previous_player_position
    }

    /// Captures the player's combat state.
    #[must_use]
    pub fn player_snapshot(world: &World) -> EntitySnapshot {
        world.player.snapshot(world.player_position)
    }

    /// Slug standing at `position`, if any.
    #[must_use]
    pub fn slug_at(world: &World, position: Position) -> Option<&Slug> {
        world.slugs.get(&position)
    }

    /// Iterates over every slug in position order.
    pub fn slugs(world: &World) -> impl Iterator<Item = (Position, &Slug)> {
        world.slugs.iter().map(|(position, slug)| (*position, slug))
    }

    /// Captures a read-only view of the slugs inhabiting the dungeon.
    #[must_use]
    pub fn slug_view(world: &World) -> SlugView {
        let snapshots = world
            .slugs
            .iter()
            .map(|(position, slug)| slug.slug_snapshot(*position))
            .collect();
        SlugView::from_snapshots(snapshots)
    }

    /// Destination the slug's movement policy would pick this turn.
    #[must_use]
    pub fn slug_intent(world: &World, slug: SlugId) -> Option<Position> {
        let (current, found) = world.slug_by_id(slug)?;
        let candidates = world.valid_slug_positions(slug);
        Some(found.choose_move(&candidates, current, world.player_position))
    }

    /// Number of turns completed since the level started.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.turn
    }

    /// Overall progress of the level.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status()
    }

    /// Captures the complete dungeon state.
    #[must_use]
    pub fn snapshot(world: &World) -> DungeonSnapshot {
        let (rows, columns) = dimensions(world);
        DungeonSnapshot {
            rows,
            columns,
            turn: world.turn,
            status: world.status(),
            tiles: tile_snapshots(world),
            player: player_snapshot(world),
            slugs: slug_view(world),
        }
    }
}
