use crossterm::event::{KeyCode, KeyEvent};
use slug_dungeon_core::Direction;

/// Maps a movement key to the direction it steps the player.
///
/// Keys follow the `w`/`a`/`s`/`d` layout and ignore case.
pub(crate) fn direction_for_key(key: char) -> Option<Direction> {
    match key.to_ascii_lowercase() {
        'w' => Some(Direction::Up),
        'a' => Some(Direction::Left),
        's' => Some(Direction::Down),
        'd' => Some(Direction::Right),
        _ => None,
    }
}

/// Maps a terminal key press to a direction. Arrow keys work alongside `w`/`a`/`s`/`d`.
pub(crate) fn direction_for_key_event(key: &KeyEvent) -> Option<Direction> {
    match key.code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Char(key) => direction_for_key(key),
        _ => None,
    }
}

/// Translates a string of movement keys, skipping anything that is not one.
pub(crate) fn parse_moves(keys: &str) -> Vec<Direction> {
    keys.chars().filter_map(direction_for_key).collect()
}
