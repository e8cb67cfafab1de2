//! Combatants that inhabit the dungeon.

use slug_dungeon_core::{
    Behavior, Effect, EntitySnapshot, Position, SlugId, SlugKind, SlugSnapshot, Weapon,
    DEFAULT_PLAYER_MAX_HEALTH, PLAYER_SYMBOL,
};

/// Health, poison and weapon state shared by every combatant.
///
/// Health always stays within `0..=max_health`.
#[derive(Debug, PartialEq, Eq)]
pub struct Entity {
    max_health: u32,
    health: u32,
    poison: u32,
    weapon: Option<Weapon>,
}

impl Entity {
    /// Creates an unarmed, unpoisoned entity at full health.
    #[must_use]
    pub const fn new(max_health: u32) -> Self {
        Self {
            max_health,
            health: max_health,
            poison: 0,
            weapon: None,
        }
    }

    /// Upper bound of the entity's health.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Current poison stacks.
    #[must_use]
    pub const fn poison(&self) -> u32 {
        self.poison
    }

    /// Equipped weapon, if any.
    #[must_use]
    pub fn weapon(&self) -> Option<&Weapon> {
        self.weapon.as_ref()
    }

    /// Equips `weapon`, handing back the weapon held before.
    pub fn equip(&mut self, weapon: Weapon) -> Option<Weapon> {
        self.weapon.replace(weapon)
    }

    /// Removes and returns the equipped weapon.
    pub fn unequip(&mut self) -> Option<Weapon> {
        self.weapon.take()
    }

    /// Positions the equipped weapon reaches from `origin`.
    #[must_use]
    pub fn weapon_targets(&self, origin: Position) -> Vec<Position> {
        self.weapon
            .as_ref()
            .map(|weapon| weapon.targets(origin))
            .unwrap_or_default()
    }

    /// Effect of the equipped weapon, or an empty effect when unarmed.
    #[must_use]
    pub fn weapon_effect(&self) -> Effect {
        self.weapon.as_ref().map_or(Effect::NONE, Weapon::effect)
    }

    /// Applies a single hit.
    ///
    /// Healing and damage combine before the result is clamped to
    /// `0..=max_health`; poison stacks accumulate.
    pub fn apply_effects(&mut self, effect: Effect) {
        let restored = self.health.saturating_add(effect.healing());
        self.health = restored
            .saturating_sub(effect.damage())
            .min(self.max_health);
        self.poison = self.poison.saturating_add(effect.poison());
    }

    /// Deals damage equal to the current poison stacks, then removes one stack.
    ///
    /// Returns the health actually lost. Does nothing without poison.
    pub fn apply_poison(&mut self) -> u32 {
        if self.poison == 0 {
            return 0;
        }

        let before = self.health;
        self.health = self.health.saturating_sub(self.poison);
        self.poison -= 1;
        before - self.health
    }

    /// Reports whether the entity has health left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Capabilities shared by the player and slugs.
pub trait Combat {
    /// Shared combat state.
    fn entity(&self) -> &Entity;

    /// Mutable access to the shared combat state.
    fn entity_mut(&mut self) -> &mut Entity;

    /// Human readable name.
    fn name(&self) -> &'static str;

    /// Display symbol.
    fn symbol(&self) -> char;

    /// Captures the combatant's state while standing at `position`.
    fn snapshot(&self, position: Position) -> EntitySnapshot {
        let entity = self.entity();
        EntitySnapshot {
            name: self.name(),
            symbol: self.symbol(),
            position,
            max_health: entity.max_health(),
            health: entity.health(),
            poison: entity.poison(),
            weapon: entity.weapon().map(Weapon::kind),
        }
    }
}

/// The user-controlled combatant.
#[derive(Debug, PartialEq, Eq)]
pub struct Player {
    entity: Entity,
}

impl Player {
    /// Creates an unarmed player with the provided health pool.
    #[must_use]
    pub const fn new(max_health: u32) -> Self {
        Self {
            entity: Entity::new(max_health),
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER_MAX_HEALTH)
    }
}

impl Combat for Player {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn name(&self) -> &'static str {
        "Player"
    }

    fn symbol(&self) -> char {
        PLAYER_SYMBOL
    }
}

/// An enemy combatant with a movement policy.
///
/// `can_move` alternates every turn through [`Slug::end_turn`]; the world
/// overrides it each turn from the slug's poison and stun status.
#[derive(Debug, PartialEq, Eq)]
pub struct Slug {
    id: SlugId,
    kind: SlugKind,
    entity: Entity,
    can_move: bool,
    stunned: bool,
}

impl Slug {
    /// Spawns a slug of the provided variant carrying its standard weapon.
    ///
    /// The identifier is assigned once the slug joins a world.
    #[must_use]
    pub fn new(kind: SlugKind) -> Self {
        let mut entity = Entity::new(kind.max_health());
        let _ = entity.equip(Weapon::new(kind.weapon()));
        Self {
            id: SlugId::new(0),
            kind,
            entity,
            can_move: true,
            stunned: false,
        }
    }

    /// Identifier assigned by the owning world.
    #[must_use]
    pub const fn id(&self) -> SlugId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: SlugId) {
        self.id = id;
    }

    /// Variant of the slug.
    #[must_use]
    pub const fn kind(&self) -> SlugKind {
        self.kind
    }

    /// Movement policy of the slug.
    #[must_use]
    pub const fn behavior(&self) -> Behavior {
        self.kind.behavior()
    }

    /// Reports whether the slug may act this turn.
    #[must_use]
    pub const fn can_move(&self) -> bool {
        self.can_move
    }

    /// Overrides whether the slug may act this turn.
    pub fn set_can_move(&mut self, can_move: bool) {
        self.can_move = can_move;
    }

    /// Registers a completed turn, alternating the movement cadence.
    pub fn end_turn(&mut self) {
        self.can_move = !self.can_move;
    }

    /// Reports whether the slug carries poison stacks.
    #[must_use]
    pub const fn is_poisoned(&self) -> bool {
        self.entity.poison() > 0
    }

    /// Reports whether the slug is stunned. No current rule stuns a slug.
    #[must_use]
    pub const fn is_stunned(&self) -> bool {
        self.stunned
    }

    /// Picks where the slug would relocate given its valid destinations.
    #[must_use]
    pub fn choose_move(
        &self,
        candidates: &[Position],
        current: Position,
        player: Position,
    ) -> Position {
        self.behavior().choose_move(candidates, current, player)
    }

    pub(crate) fn slug_snapshot(&self, position: Position) -> SlugSnapshot {
        SlugSnapshot {
            id: self.id,
            kind: self.kind,
            entity: self.snapshot(position),
            can_move: self.can_move,
            stunned: self.stunned,
        }
    }
}

impl Combat for Slug {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn symbol(&self) -> char {
        self.kind.symbol()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slug_dungeon_core::WeaponKind;

    #[test]
    fn damage_is_clamped_at_zero() {
        let mut entity = Entity::new(5);
        entity.apply_effects(Effect::new().with_damage(9));
        assert_eq!(entity.health(), 0);
        assert!(!entity.is_alive());
    }

    #[test]
    fn healing_is_clamped_at_max_health() {
        let mut entity = Entity::new(10);
        entity.apply_effects(Effect::new().with_damage(1));
        entity.apply_effects(Effect::new().with_healing(5));
        assert_eq!(entity.health(), 10);
    }

    #[test]
    fn healing_and_damage_combine_before_clamping() {
        let mut entity = Entity::new(10);
        entity.apply_effects(Effect::new().with_healing(4).with_damage(3));
        assert_eq!(entity.health(), 10);

        let mut wounded = Entity::new(10);
        wounded.apply_effects(Effect::new().with_damage(9));
        wounded.apply_effects(Effect::new().with_healing(2).with_damage(3));
        assert_eq!(wounded.health(), 0);
    }

    #[test]
    fn poison_stacks_accumulate() {
        let mut entity = Entity::new(20);
        entity.apply_effects(WeaponKind::PoisonSword.effect());
        entity.apply_effects(WeaponKind::PoisonDart.effect());
        assert_eq!(entity.poison(), 3);
        assert_eq!(entity.health(), 18);
    }

    #[test]
    fn poison_deals_stacks_then_decays() {
        let mut entity = Entity::new(20);
        entity.apply_effects(Effect::new().with_poison(3));

        assert_eq!(entity.apply_poison(), 3);
        assert_eq!((entity.health(), entity.poison()), (17, 2));
        assert_eq!(entity.apply_poison(), 2);
        assert_eq!(entity.apply_poison(), 1);
        assert_eq!((entity.health(), entity.poison()), (14, 0));
        assert_eq!(entity.apply_poison(), 0);
        assert_eq!(entity.health(), 14);
    }

    #[test]
    fn poison_cannot_push_health_below_zero() {
        let mut entity = Entity::new(2);
        entity.apply_effects(Effect::new().with_poison(5));
        assert_eq!(entity.apply_poison(), 2);
        assert_eq!((entity.health(), entity.poison()), (0, 4));
    }

    #[test]
    fn equipping_returns_previous_weapon() {
        let mut entity = Entity::new(3);
        assert!(entity.equip(Weapon::new(WeaponKind::PoisonDart)).is_none());
        let previous = entity.equip(Weapon::new(WeaponKind::HealingRock));
        assert_eq!(previous.map(|weapon| weapon.kind()), Some(WeaponKind::PoisonDart));
        assert_eq!(entity.weapon_effect(), WeaponKind::HealingRock.effect());
    }

    #[test]
    fn unarmed_entities_reach_nothing() {
        let entity = Entity::new(3);
        assert!(entity.weapon_targets(Position::new(1, 1)).is_empty());
        assert!(entity.weapon_effect().is_empty());
    }

    #[test]
    fn player_defaults_to_twenty_health() {
        let player = Player::default();
        assert_eq!(player.entity().max_health(), 20);
        assert_eq!(player.entity().health(), 20);
        assert_eq!(player.symbol(), 'P');
        assert!(player.entity().weapon().is_none());
    }

    #[test]
    fn slugs_spawn_with_their_loadout() {
        let slug = Slug::new(SlugKind::Angry);
        assert_eq!(slug.entity().max_health(), 5);
        assert_eq!(slug.entity().weapon().map(Weapon::kind), Some(WeaponKind::PoisonSword));
        assert_eq!(slug.name(), "AngrySlug");
        assert!(slug.can_move());
        assert!(!slug.is_stunned());
    }

    #[test]
    fn end_turn_alternates_movement() {
        let mut slug = Slug::new(SlugKind::Scared);
        slug.end_turn();
        assert!(!slug.can_move());
        slug.end_turn();
        assert!(slug.can_move());
        slug.set_can_move(false);
        assert!(!slug.can_move());
    }

    #[test]
    fn poisoned_slugs_report_it() {
        let mut slug = Slug::new(SlugKind::Nice);
        assert!(!slug.is_poisoned());
        slug.entity_mut().apply_effects(WeaponKind::PoisonDart.effect());
        assert!(slug.is_poisoned());
    }

    #[test]
    fn snapshots_capture_combat_state() {
        let slug = Slug::new(SlugKind::Scared);
        let snapshot = slug.slug_snapshot(Position::new(2, 4));
        assert_eq!(snapshot.kind, SlugKind::Scared);
        assert_eq!(snapshot.entity.position, Position::new(2, 4));
        assert_eq!(snapshot.entity.health, 3);
        assert_eq!(snapshot.entity.weapon, Some(WeaponKind::PoisonDart));
        assert_eq!(snapshot.entity.symbol, 'L');
    }
}
