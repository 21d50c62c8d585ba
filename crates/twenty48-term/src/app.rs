use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use rand::Rng;
use twenty48_board::engine::{changed_cells, Direction};
use twenty48_board::input::{Point, TouchTracker};
use twenty48_board::session::Game;

use crate::config::Config;
use crate::palette::Palette;
use crate::render::{self, View};

/// A game plus what the screen needs to know about the last move.
pub struct Screen<R: Rng> {
    game: Game<R>,
    highlight: Vec<(usize, usize)>,
}

impl<R: Rng> Screen<R> {
    pub fn new(game: Game<R>) -> Self {
        Screen {
            game,
            highlight: Vec::new(),
        }
    }

    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    pub fn highlight(&self) -> &[(usize, usize)] {
        &self.highlight
    }

    /// Apply a move. Returns whether a redraw is needed; a move that changes
    /// nothing keeps the previous frame and its highlight.
    pub fn handle(&mut self, dir: Direction) -> bool {
        let before = self.game.grid().clone();
        let outcome = self.game.apply(dir);
        if outcome.changed {
            self.highlight = changed_cells(&before, self.game.grid());
        }
        outcome.changed
    }

    pub fn into_game(self) -> Game<R> {
        self.game
    }
}

/// Key name for a key code, spelled the way `Direction::from_key` expects.
pub(crate) fn key_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Left => Some("ArrowLeft".to_string()),
        KeyCode::Right => Some("ArrowRight".to_string()),
        KeyCode::Up => Some("ArrowUp".to_string()),
        KeyCode::Down => Some("ArrowDown".to_string()),
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

/// Presses and auto-repeats both act; releases are ignored.
fn acts(key: &KeyEvent) -> bool {
    matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Convert a mouse position (terminal cells) to pixels.
pub(crate) fn to_point(ev: &MouseEvent, cfg: &Config) -> Point {
    Point::new(
        ev.column as f64 * cfg.swipe.cell_width_px,
        ev.row as f64 * cfg.swipe.cell_height_px,
    )
}

/// Apply a comma-separated list of key names in order. Unknown names are skipped.
pub fn replay<R: Rng>(game: Game<R>, keys: &str) -> Game<R> {
    let mut screen = Screen::new(game);
    for name in keys.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match Direction::from_key(name) {
            Some(dir) => {
                if !screen.handle(dir) {
                    info!("{name}: no change");
                }
            }
            None => warn!("ignoring unknown key {name:?}"),
        }
    }
    screen.into_game()
}

/// Restores the terminal on drop, including on early return and panic unwinding.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Interactive loop: one event is handled to completion before the next is read.
pub fn run<R: Rng>(cfg: &Config, game: Game<R>) -> Result<Game<R>> {
    let palette: Palette = cfg.palette()?;
    let mut screen = Screen::new(game);
    let mut tracker = TouchTracker::new(cfg.swipe.threshold_px);
    let _guard = TerminalGuard::enter()?;
    let mut out = io::stdout().lock();

    let mut dirty = true;
    loop {
        if dirty {
            let highlight: &[(usize, usize)] = if cfg.render.highlight_changes {
                screen.highlight()
            } else {
                &[]
            };
            let view = View {
                palette: &palette,
                show_values: cfg.render.show_values,
                highlight,
            };
            render::draw(&mut out, screen.game().grid(), &view)?;
            dirty = false;
        }

        let dir = match event::read()? {
            Event::Key(key) if acts(&key) => {
                if is_quit(&key) {
                    break;
                }
                key_name(key.code).and_then(|name| Direction::from_key(&name))
            }
            Event::Mouse(ev) => match ev.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    tracker.touch_start(&[to_point(&ev, cfg)]);
                    None
                }
                MouseEventKind::Up(MouseButton::Left) => tracker.touch_end(&[to_point(&ev, cfg)]),
                _ => None,
            },
            Event::Resize(..) => {
                dirty = true;
                None
            }
            Event::FocusLost => {
                tracker.cancel();
                None
            }
            _ => None,
        };

        if let Some(dir) = dir {
            dirty |= screen.handle(dir);
        }
    }
    out.flush()?;
    Ok(screen.into_game())
}
