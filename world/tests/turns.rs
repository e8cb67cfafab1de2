use slug_dungeon_core::{
    Combatant, Command, Direction, Effect, Event, GameStatus, MoveRejection, Position, SlugId,
    SlugKind, WeaponKind,
};
use slug_dungeon_world::{apply, query, Combat, Level, Tile, World};

fn load(description: &str) -> World {
    description
        .parse::<Level>()
        .expect("level parses")
        .into_world()
        .expect("world builds")
}

fn step(world: &mut World, direction: Direction) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, Command::MovePlayer { direction }, &mut events);
    events
}

fn player_vitals(world: &World) -> (u32, u32) {
    let entity = query::player(world).entity();
    (entity.health(), entity.poison())
}

#[test]
fn moving_into_wall_changes_nothing() {
    let mut world = load("20\n#####\n#P  #\n#####");

    let events = step(&mut world, Direction::Up);

    assert_eq!(query::player_position(&world), Position::new(1, 1));
    assert_eq!(query::turn(&world), 0);
    assert_eq!(
        events,
        vec![Event::PlayerMoveRejected {
            from: Position::new(1, 1),
            attempted: Position::new(0, 1),
            reason: MoveRejection::Blocked,
        }]
    );
}

#[test]
fn moving_off_the_grid_is_rejected() {
    let mut world = load("20\nP  \n   ");

    let events = step(&mut world, Direction::Left);

    assert_eq!(query::player_position(&world), Position::new(0, 0));
    assert!(matches!(
        events.as_slice(),
        [Event::PlayerMoveRejected {
            reason: MoveRejection::OutOfBounds,
            ..
        }]
    ));
}

#[test]
fn moving_onto_a_slug_is_rejected_without_a_turn() {
    let mut world = load("20\n#####\n#PA #\n#####");

    let events = step(&mut world, Direction::Right);

    assert_eq!(query::player_position(&world), Position::new(1, 1));
    assert_eq!(query::turn(&world), 0);
    assert_eq!(player_vitals(&world), (20, 0));
    assert!(matches!(
        events.as_slice(),
        [Event::PlayerMoveRejected {
            reason: MoveRejection::Occupied,
            ..
        }]
    ));
}

#[test]
fn accepted_move_ends_the_turn() {
    let mut world = load("20\n#####\n#P  #\n#####");

    let events = step(&mut world, Direction::Right);

    assert_eq!(query::player_position(&world), Position::new(1, 2));
    assert_eq!(query::previous_player_position(&world), Position::new(1, 2));
    assert_eq!(query::turn(&world), 1);
    assert_eq!(
        events,
        vec![
            Event::PlayerMoved {
                from: Position::new(1, 1),
                to: Position::new(1, 2),
            },
            Event::TurnEnded { turn: 1 },
        ]
    );
}

#[test]
fn stepping_on_a_weapon_equips_it_and_clears_the_tile() {
    let mut world = load("20\n#####\n#PS #\n#####");

    let events = step(&mut world, Direction::Right);

    let held = query::player(&world).entity().weapon().map(|weapon| weapon.kind());
    assert_eq!(held, Some(WeaponKind::PoisonSword));
    assert!(query::tile(&world, Position::new(1, 2))
        .and_then(Tile::weapon)
        .is_none());
    assert!(events.contains(&Event::WeaponPickedUp {
        position: Position::new(1, 2),
        weapon: WeaponKind::PoisonSword,
        discarded: None,
    }));
}

#[test]
fn angry_slug_strikes_once_the_player_is_adjacent() {
    let mut world = load("20\n#####\n#P  #\n#   #\n#  A#\n#####");

    let _ = step(&mut world, Direction::Right);
    assert_eq!(player_vitals(&world), (20, 0));
    let _ = step(&mut world, Direction::Right);
    assert_eq!(player_vitals(&world), (20, 0));

    let events = step(&mut world, Direction::Down);
    assert_eq!(query::player_position(&world), Position::new(2, 3));
    assert_eq!(player_vitals(&world), (18, 1));
    assert!(events.contains(&Event::EffectApplied {
        attacker: Combatant::Slug(SlugId::new(0)),
        target: Combatant::Player,
        effect: WeaponKind::PoisonSword.effect(),
        health: 18,
        poison: 1,
    }));

    let _ = step(&mut world, Direction::Up);
    assert_eq!(query::player_position(&world), Position::new(1, 3));
    assert_eq!(player_vitals(&world), (17, 0));
}

#[test]
fn slugs_attack_without_relocating() {
    let mut world = load("20\n#######\n#P    #\n#   A #\n#######");

    for direction in [Direction::Right, Direction::Right, Direction::Down, Direction::Left] {
        let _ = step(&mut world, direction);
        assert!(query::slug_at(&world, Position::new(2, 4)).is_some());
    }
}

#[test]
fn unpoisoned_slugs_strike_on_consecutive_turns() {
    let mut world = load("20\n#######\n#P   L#\n#######");

    let _ = step(&mut world, Direction::Right);
    assert_eq!(player_vitals(&world), (20, 0));

    let _ = step(&mut world, Direction::Right);
    assert_eq!(player_vitals(&world), (20, 2));

    let events = step(&mut world, Direction::Right);
    assert_eq!(player_vitals(&world), (18, 3));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::EffectApplied {
            target: Combatant::Player,
            poison: 3,
            ..
        }
    )));
}

#[test]
fn nice_slug_never_moves_and_only_heals() {
    let mut world = load("20\n######\n#P  N#\n######");

    for direction in [
        Direction::Right,
        Direction::Right,
        Direction::Left,
        Direction::Left,
        Direction::Right,
    ] {
        let events = step(&mut world, direction);
        let positions: Vec<_> = query::slugs(&world).map(|(position, _)| position).collect();
        assert_eq!(positions, vec![Position::new(1, 4)]);
        for event in events {
            if let Event::EffectApplied { effect, .. } = event {
                assert_eq!(effect, Effect::new().with_healing(2));
            }
        }
        assert_eq!(player_vitals(&world), (20, 0));
    }
}

#[test]
fn poisoned_slugs_hold_their_attack() {
    let mut world = load("20\n######\n#PD A#\n######");

    let events = step(&mut world, Direction::Right);
    assert_eq!(player_vitals(&world), (20, 0));
    assert!(!events.iter().any(|event| matches!(
        event,
        Event::EffectApplied {
            target: Combatant::Player,
            ..
        }
    )));

    let slug = query::slug_at(&world, Position::new(1, 4)).expect("slug survives");
    assert_eq!((slug.entity().health(), slug.entity().poison()), (3, 1));
}

#[test]
fn dead_slugs_leave_their_weapon_behind() {
    let mut world = load("20\n######\n#PD A#\n######");

    let _ = step(&mut world, Direction::Right);
    let events = step(&mut world, Direction::Right);

    assert!(query::slug_at(&world, Position::new(1, 4)).is_none());
    assert!(events.iter().any(|event| matches!(
        event,
        Event::SlugDied {
            kind: SlugKind::Angry,
            dropped: Some(WeaponKind::PoisonSword),
            ..
        }
    )));
    assert_eq!(
        query::tile(&world, Position::new(1, 4))
            .and_then(Tile::weapon)
            .map(|weapon| weapon.kind()),
        Some(WeaponKind::PoisonSword)
    );

    let events = step(&mut world, Direction::Right);
    assert!(events.contains(&Event::WeaponPickedUp {
        position: Position::new(1, 4),
        weapon: WeaponKind::PoisonSword,
        discarded: Some(WeaponKind::PoisonDart),
    }));
}

#[test]
fn reaching_the_goal_wins_only_without_slugs() {
    let mut world = load("20\n######\n#PG N#\n######");

    let _ = step(&mut world, Direction::Right);

    assert!(query::tile(&world, query::player_position(&world)).map_or(false, Tile::is_goal));
    assert!(!world.has_won());
    assert_eq!(query::status(&world), GameStatus::InProgress);
}

#[test]
fn clearing_the_dungeon_and_reaching_the_goal_wins() {
    let mut world = load("20\n#######\n#PD  G#\n#   L #\n#######");

    let _ = step(&mut world, Direction::Right);
    let _ = step(&mut world, Direction::Right);
    let _ = step(&mut world, Direction::Right);
    assert!(!world.has_won());
    let scared = query::slug_at(&world, Position::new(2, 4)).expect("scared slug");
    assert_eq!((scared.entity().health(), scared.entity().poison()), (1, 1));

    let events = step(&mut world, Direction::Right);

    assert_eq!(query::player_position(&world), Position::new(1, 5));
    assert_eq!(query::slug_view(&world).len(), 0);
    assert!(world.has_won());
    assert!(!world.has_lost());
    assert_eq!(events.last(), Some(&Event::GameWon));
    assert_eq!(
        query::tile(&world, Position::new(2, 4))
            .and_then(Tile::weapon)
            .map(|weapon| weapon.kind()),
        Some(WeaponKind::PoisonDart)
    );
}

#[test]
fn losing_ignores_remaining_poison() {
    let mut world = load("2\n#####\n#P A#\n#####");

    let events = step(&mut world, Direction::Right);

    assert_eq!(player_vitals(&world), (0, 1));
    assert!(world.has_lost());
    assert_eq!(query::status(&world), GameStatus::Lost);
    assert_eq!(events.last(), Some(&Event::GameLost));
}

#[test]
fn game_end_is_announced_once() {
    let mut world = load("2\n#####\n#P A#\n#####");

    let first = step(&mut world, Direction::Right);
    assert_eq!(first.last(), Some(&Event::GameLost));

    let later = step(&mut world, Direction::Left);
    assert!(later.contains(&Event::TurnEnded { turn: 2 }));
    assert!(!later.contains(&Event::GameLost));
    assert!(world.has_lost());
}

#[test]
fn player_poison_ticks_before_slugs_act() {
    let mut world = load("20\n#####\n#P  #\n#   #\n#  A#\n#####");

    let _ = step(&mut world, Direction::Right);
    let _ = step(&mut world, Direction::Right);
    let _ = step(&mut world, Direction::Down);
    let events = step(&mut world, Direction::Left);

    assert_eq!(query::player_position(&world), Position::new(2, 2));
    let first_tick = events
        .iter()
        .position(|event| matches!(event, Event::PoisonTicked { .. }))
        .expect("poison tick");
    assert_eq!(
        events[first_tick],
        Event::PoisonTicked {
            target: Combatant::Player,
            damage: 1,
            health: 17,
            poison: 0,
        }
    );
    assert_eq!(player_vitals(&world), (17, 0));
}

#[test]
fn snapshot_reflects_turn_progress() {
    let mut world = load("20\n#####\n#PD #\n#  A#\n#####");

    let _ = step(&mut world, Direction::Right);
    let snapshot = query::snapshot(&world);

    assert_eq!(snapshot.turn, 1);
    assert_eq!(snapshot.player.weapon, Some(WeaponKind::PoisonDart));
    assert_eq!(snapshot.player.position, Position::new(1, 2));
    assert_eq!(snapshot.tiles[1][2].weapon, None);
    let slug = snapshot.slugs.at(Position::new(2, 3)).expect("slug snapshot");
    assert_eq!(slug.kind, SlugKind::Angry);
}
