//! Interactive terminal frontend built on `ratatui` and `crossterm`.

use std::io;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as InputEvent, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, Paragraph, Row, Table},
    Frame, Terminal,
};
use slug_dungeon_core::{Command, SlugRoster};
use slug_dungeon_world::{apply, query, World};
use tracing::debug;

use crate::{input, load_world, render};

const MESSAGE_LINES: usize = 6;

/// Game session driven by key presses.
pub(crate) struct App<'a> {
    description: &'a str,
    roster: &'a SlugRoster,
    world: World,
    messages: Vec<String>,
    quit: bool,
}

impl<'a> App<'a> {
    /// Starts a session on a freshly loaded level.
    pub(crate) fn new(description: &'a str, roster: &'a SlugRoster) -> Result<Self> {
        let world = load_world(description, roster)?;
        let messages = vec![query::welcome_banner(&world).to_owned()];
        Ok(Self {
            description,
            roster,
            world,
            messages,
            quit: false,
        })
    }

    /// Reports whether the player asked to leave.
    pub(crate) fn should_quit(&self) -> bool {
        self.quit
    }

    /// Hands back the world as it stood when play stopped.
    pub(crate) fn into_world(self) -> World {
        self.world
    }

    /// Reacts to one key press.
    ///
    /// `q` or `Esc` quits at any time. While a game is running, movement keys
    /// step the player; once it is decided, `y` restarts the level and `n`
    /// quits.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | 'Q')) {
            self.quit = true;
            return Ok(());
        }

        if query::status(&self.world).is_over() {
            match key.code {
                KeyCode::Char('y' | 'Y') => {
                    self.world = load_world(self.description, self.roster)?;
                    self.messages.push("Level restarted.".to_owned());
                }
                KeyCode::Char('n' | 'N') => self.quit = true,
                _ => {}
            }
            return Ok(());
        }

        let Some(direction) = input::direction_for_key_event(&key) else {
            return Ok(());
        };
        let mut events = Vec::new();
        apply(&mut self.world, Command::MovePlayer { direction }, &mut events);
        debug!(?direction, events = events.len(), "move applied");
        self.messages
            .extend(events.iter().filter_map(render::describe_event));
        Ok(())
    }

    /// Draws the map, the combatant table, recent messages and the key help.
    pub(crate) fn render(&self, frame: &mut Frame<'_>) {
        let snapshot = query::snapshot(&self.world);
        let map_height = u16::try_from(snapshot.rows + 2).unwrap_or(u16::MAX);
        let table_height = u16::try_from(snapshot.slugs.len() + 4).unwrap_or(u16::MAX);
        let [map_area, table_area, message_area, help_area] = Layout::vertical([
            Constraint::Length(map_height),
            Constraint::Length(table_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let map: Vec<Line<'_>> = render::render_map(&snapshot)
            .lines()
            .map(|row| Line::from(row.to_owned()))
            .collect();
        let title = format!(" Slug Dungeon - turn {} ", snapshot.turn);
        frame.render_widget(Paragraph::new(map).block(Block::bordered().title(title)), map_area);

        let rows = render::info_rows(&snapshot).into_iter().map(Row::new);
        let table = Table::new(rows, [Constraint::Fill(1); 5])
            .header(Row::new(render::INFO_HEADER).style(Style::new().bold()))
            .block(Block::bordered());
        frame.render_widget(table, table_area);

        let start = self.messages.len().saturating_sub(MESSAGE_LINES);
        let recent: Vec<Line<'_>> = self.messages[start..]
            .iter()
            .map(|message| Line::from(message.as_str()))
            .collect();
        frame.render_widget(
            Paragraph::new(recent).block(Block::bordered().title(" Messages ")),
            message_area,
        );

        let help = if snapshot.status.is_over() {
            "Play again? y/n, q to quit"
        } else {
            "Move with w/a/s/d or arrows, q to quit"
        };
        frame.render_widget(Line::from(help).italic(), help_area);
    }
}

/// Runs the session in the alternate screen until the player quits.
///
/// The terminal is restored even when the loop fails.
pub(crate) fn run(mut app: App<'_>) -> Result<World> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let outcome = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    outcome?;
    Ok(app.into_world())
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App<'_>) -> Result<()> {
    while !app.should_quit() {
        let _ = terminal.draw(|frame| app.render(frame))?;
        if let InputEvent::Key(key) = event::read().context("failed to read terminal input")? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key)?;
            }
        }
    }
    Ok(())
}
