//! Plain-text rendering used for scripted runs and piped output.
//!
//! The interactive terminal UI reuses the map and table rows built here.

use std::fmt::Write as _;

use slug_dungeon_core::{Combatant, DungeonSnapshot, EntitySnapshot, Event, MoveRejection};

/// Column titles of the combatant table.
pub(crate) const INFO_HEADER: [&str; 5] = ["Name", "Position", "Weapon", "Health", "Poison"];

/// Draws the dungeon grid, one line per row.
///
/// Combatants cover weapons, and weapons cover the terrain beneath them.
pub(crate) fn render_map(snapshot: &DungeonSnapshot) -> String {
    let mut map = String::with_capacity(snapshot.rows * (snapshot.columns + 1));
    for row in &snapshot.tiles {
        for tile in row {
            let symbol = if tile.position == snapshot.player.position {
                snapshot.player.symbol
            } else if let Some(slug) = snapshot.slugs.at(tile.position) {
                slug.entity.symbol
            } else if let Some(weapon) = tile.weapon {
                weapon.symbol()
            } else {
                tile.symbol
            };
            map.push(symbol);
        }
        map.push('\n');
    }
    map
}

/// One table row for the player followed by one per slug in position order.
pub(crate) fn info_rows(snapshot: &DungeonSnapshot) -> Vec<[String; 5]> {
    std::iter::once(&snapshot.player)
        .chain(snapshot.slugs.iter().map(|slug| &slug.entity))
        .map(info_row)
        .collect()
}

/// Lays out the player and every slug as an aligned table.
pub(crate) fn render_info(snapshot: &DungeonSnapshot) -> String {
    let rows = info_rows(snapshot);

    let mut widths = INFO_HEADER.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut table = String::new();
    push_row(&mut table, &INFO_HEADER.map(str::to_owned), &widths);
    for row in &rows {
        push_row(&mut table, row, &widths);
    }
    table
}

/// Renders the full frame shown after each turn.
pub(crate) fn render_frame(snapshot: &DungeonSnapshot) -> String {
    format!(
        "Turn {}\n{}\n{}",
        snapshot.turn,
        render_map(snapshot),
        render_info(snapshot)
    )
}

/// Player-facing message for an event. Bookkeeping events have none.
pub(crate) fn describe_event(event: &Event) -> Option<String> {
    let message = match event {
        Event::PlayerMoveRejected { reason, .. } => match reason {
            MoveRejection::OutOfBounds => "You cannot leave the dungeon.".to_owned(),
            MoveRejection::Blocked => "A wall blocks your way.".to_owned(),
            MoveRejection::Occupied => "A slug blocks your way.".to_owned(),
        },
        Event::PlayerMoved { .. } | Event::TurnEnded { .. } => return None,
        Event::WeaponPickedUp {
            weapon, discarded, ..
        } => match discarded {
            Some(old) => format!("You picked up a {weapon} and threw away your {old}."),
            None => format!("You picked up a {weapon}."),
        },
        Event::EffectApplied {
            attacker,
            target,
            health,
            poison,
            ..
        } => format!(
            "{} hits {}: health {health}, poison {poison}.",
            combatant_label(*attacker),
            combatant_label(*target)
        ),
        Event::PoisonTicked { target, damage, .. } => {
            format!("Poison deals {damage} damage to {}.", combatant_label(*target))
        }
        Event::SlugDied {
            kind,
            position,
            dropped,
            ..
        } => match dropped {
            Some(weapon) => format!("{kind} at {position} died, leaving a {weapon} behind."),
            None => format!("{kind} at {position} died."),
        },
        Event::GameWon => "Every slug is gone and you reached the goal. You win!".to_owned(),
        Event::GameLost => "You have been defeated.".to_owned(),
    };
    Some(message)
}

fn combatant_label(combatant: Combatant) -> String {
    match combatant {
        Combatant::Player => "Player".to_owned(),
        Combatant::Slug(id) => format!("Slug #{}", id.get()),
    }
}

fn info_row(entity: &EntitySnapshot) -> [String; 5] {
    [
        entity.name.to_owned(),
        entity.position.to_string(),
        entity
            .weapon
            .map_or_else(|| "-".to_owned(), |weapon| weapon.name().to_owned()),
        format!("{}/{}", entity.health, entity.max_health),
        entity.poison.to_string(),
    ]
}

fn push_row(table: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let mut line = String::new();
    for (cell, &width) in cells.iter().zip(widths) {
        let _ = write!(line, "{cell:<width$}  ");
    }
    table.push_str(line.trim_end());
    table.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use slug_dungeon_core::{Position, SlugId, SlugKind, WeaponKind};
    use slug_dungeon_world::{query, Level};

    fn snapshot(description: &str) -> DungeonSnapshot {
        let world = description
            .parse::<Level>()
            .expect("level parses")
            .into_world()
            .expect("world builds");
        query::snapshot(&world)
    }

    #[test]
    fn map_layers_entities_over_weapons_over_tiles() {
        let frame = snapshot("12\n#######\n#P D  #\n#  A  #\n# N LG#\n#######\n");
        assert_eq!(
            render_map(&frame),
            "#######\n#P D  #\n#  A  #\n# N LG#\n#######\n"
        );
    }

    #[test]
    fn info_table_lists_player_then_slugs() {
        let frame = snapshot("12\n#####\n#P A#\n#####");
        let table = render_info(&frame);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[0].ends_with("Poison"));
        assert!(lines[1].starts_with("Player"));
        assert!(lines[1].contains("(1, 1)"));
        assert!(lines[1].contains("12/12"));
        assert!(lines[1].contains(" - "));
        assert!(lines[2].starts_with("AngrySlug"));
        assert!(lines[2].contains("PoisonSword"));
        assert!(lines[2].contains("5/5"));
    }

    #[test]
    fn frame_starts_with_turn() {
        let frame = snapshot("3\n###\n#P#\n###");
        assert!(render_frame(&frame).starts_with("Turn 0\n###\n#P#\n###\n"));
    }

    #[test]
    fn bookkeeping_events_are_silent() {
        assert_eq!(describe_event(&Event::TurnEnded { turn: 3 }), None);
        assert_eq!(
            describe_event(&Event::PlayerMoved {
                from: Position::new(1, 1),
                to: Position::new(1, 2),
            }),
            None
        );
    }

    #[test]
    fn events_read_as_sentences() {
        assert_eq!(
            describe_event(&Event::WeaponPickedUp {
                position: Position::new(1, 2),
                weapon: WeaponKind::PoisonSword,
                discarded: Some(WeaponKind::PoisonDart),
            })
            .as_deref(),
            Some("You picked up a PoisonSword and threw away your PoisonDart.")
        );
        assert_eq!(
            describe_event(&Event::SlugDied {
                slug: SlugId::new(0),
                kind: SlugKind::Scared,
                position: Position::new(2, 4),
                dropped: Some(WeaponKind::PoisonDart),
            })
            .as_deref(),
            Some("ScaredSlug at (2, 4) died, leaving a PoisonDart behind.")
        );
        assert_eq!(
            describe_event(&Event::PlayerMoveRejected {
                from: Position::new(1, 1),
                attempted: Position::new(0, 1),
                reason: MoveRejection::Blocked,
            })
            .as_deref(),
            Some("A wall blocks your way.")
        );
    }
}
