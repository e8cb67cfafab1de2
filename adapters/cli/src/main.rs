#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Slug Dungeon levels in the terminal.

mod input;
mod render;
mod roster;
mod tui;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use slug_dungeon_core::{Command, Direction, SlugRoster};
use slug_dungeon_world::{apply, query, Level, World};
use tracing::{debug, info};

/// Slug Dungeon: clear every slug, then reach the goal.
#[derive(Debug, Parser)]
#[command(name = "slug-dungeon", version)]
struct Args {
    /// Level description to play.
    level: PathBuf,

    /// TOML file mapping level symbols to slug variants.
    #[arg(long, value_name = "PATH")]
    roster: Option<PathBuf>,

    /// Plays the given w/a/s/d keys instead of opening the terminal UI.
    #[arg(long, value_name = "KEYS")]
    moves: Option<String>,

    /// Prints the final dungeon state as JSON.
    #[arg(long)]
    json: bool,
}

/// Entry point for the Slug Dungeon command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let roster = match &args.roster {
        Some(path) => roster::load_roster(path)?,
        None => SlugRoster::default(),
    };
    let description = fs::read_to_string(&args.level)
        .with_context(|| format!("failed to read level {}", args.level.display()))?;

    let world = match &args.moves {
        Some(keys) => {
            let mut world = load_world(&description, &roster)?;
            let mut out = io::stdout().lock();
            writeln!(out, "{}", query::welcome_banner(&world))?;
            play_scripted(&mut world, &input::parse_moves(keys), &mut out)?;
            world
        }
        None => tui::run(tui::App::new(&description, &roster)?)?,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&query::snapshot(&world))
            .context("failed to serialize dungeon snapshot")?;
        writeln!(io::stdout().lock(), "{json}")?;
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn load_world(description: &str, roster: &SlugRoster) -> Result<World> {
    let level = Level::parse(description, roster).context("failed to parse level")?;
    let world = level.into_world().context("level is not playable")?;
    let (rows, columns) = query::dimensions(&world);
    info!(rows, columns, "level loaded");
    Ok(world)
}

/// Applies a single move, then reports its events and the resulting frame.
fn play_move<W: Write>(world: &mut World, direction: Direction, out: &mut W) -> Result<()> {
    let mut events = Vec::new();
    apply(world, Command::MovePlayer { direction }, &mut events);
    debug!(?direction, events = events.len(), "move applied");

    for message in events.iter().filter_map(render::describe_event) {
        writeln!(out, "{message}")?;
    }
    write!(out, "{}", render::render_frame(&query::snapshot(world)))?;
    Ok(())
}

/// Plays `moves` in order, stopping early once the game is decided.
fn play_scripted<W: Write>(world: &mut World, moves: &[Direction], out: &mut W) -> Result<()> {
    write!(out, "{}", render::render_frame(&query::snapshot(world)))?;
    for direction in moves {
        if query::status(world).is_over() {
            break;
        }
        play_move(world, *direction, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slug_dungeon_core::GameStatus;

    const CORRIDOR: &str = "2\n######\n#PD G#\n######\n";
    const AMBUSH: &str = "2\n#####\n#P A#\n#####\n";

    #[test]
    fn scripted_moves_reach_the_goal() {
        let mut world = load_world(CORRIDOR, &SlugRoster::default()).expect("level loads");
        let mut out = Vec::new();

        play_scripted(&mut world, &input::parse_moves("ddd"), &mut out).expect("play succeeds");

        assert_eq!(query::status(&world), GameStatus::Won);
        assert_eq!(query::turn(&world), 3);
        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.contains("You picked up a PoisonDart."));
        assert!(text.contains("You win!"));
    }

    #[test]
    fn scripted_moves_stop_after_defeat() {
        let mut world = load_world(AMBUSH, &SlugRoster::default()).expect("level loads");
        let mut out = Vec::new();

        play_scripted(&mut world, &input::parse_moves("dadada"), &mut out).expect("play succeeds");

        assert_eq!(query::status(&world), GameStatus::Lost);
        assert_eq!(query::turn(&world), 1);
    }

    #[test]
    fn bundled_levels_load() {
        let first = include_str!("../../../levels/first.txt");
        assert!(load_world(first, &SlugRoster::default()).is_ok());

        let roster = roster::parse_roster(include_str!("../../../levels/roster.toml"))
            .expect("bundled roster parses");
        let custom = include_str!("../../../levels/custom.txt");
        let world = load_world(custom, &roster).expect("custom level loads");
        assert_eq!(query::slug_view(&world).len(), 3);
    }

    #[test]
    fn invalid_levels_surface_context() {
        let error = load_world("0\n#P#\n", &SlugRoster::default()).expect_err("bad health");
        assert_eq!(error.to_string(), "failed to parse level");
    }
}
