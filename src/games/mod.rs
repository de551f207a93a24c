pub mod breakout;
pub mod memory;
pub mod pong;
pub mod snake;
pub mod space_invaders;
pub mod tetris;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::engine::{Bounds, Chrome, InputState, Score, Surface, TimerId, TimerQueue};

/// Everything a game may touch while it advances.
pub struct GameContext<'a> {
    pub input: &'a InputState,
    pub chrome: &'a mut dyn Chrome,
    pub timers: &'a TimerQueue,
}

pub trait Game {
    fn name(&self) -> &'static str;

    /// Rebuild every entity from initial conditions and clear terminal flags.
    fn reset(&mut self);

    /// Advance by exactly `delta_ms`. No-op once the game is over.
    fn update(&mut self, delta_ms: f32, ctx: &mut GameContext<'_>);

    fn render(&self, surface: &mut dyn Surface);

    /// What the score display shows before anything has been scored.
    fn initial_score(&self) -> Score {
        Score::Points(0)
    }

    fn restart(&mut self, chrome: &mut dyn Chrome) {
        self.reset();
        chrome.update_score(self.initial_score());
        chrome.hide_overlay();
    }

    /// Release game-owned timers before the instance is dropped.
    fn cleanup(&mut self) {}

    /// A deferred action scheduled through [`GameContext::timers`] fired.
    fn on_timer(&mut self, _id: TimerId, _chrome: &mut dyn Chrome) {}

    fn get_score(&self) -> u32;

    /// True in either terminal state, lost or won.
    fn is_game_over(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    Snake,
    Pong,
    Breakout,
    Tetris,
    Memory,
    SpaceInvaders,
}

impl GameId {
    pub fn all() -> &'static [GameId] {
        &[
            GameId::Snake,
            GameId::Pong,
            GameId::Breakout,
            GameId::Tetris,
            GameId::Memory,
            GameId::SpaceInvaders,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            GameId::Snake => 0,
            GameId::Pong => 1,
            GameId::Breakout => 2,
            GameId::Tetris => 3,
            GameId::Memory => 4,
            GameId::SpaceInvaders => 5,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameId::Snake => "Snake",
            GameId::Pong => "Pong",
            GameId::Breakout => "Breakout",
            GameId::Tetris => "Tetris",
            GameId::Memory => "Memory",
            GameId::SpaceInvaders => "Space Invaders",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            GameId::Snake => "snake",
            GameId::Pong => "pong",
            GameId::Breakout => "breakout",
            GameId::Tetris => "tetris",
            GameId::Memory => "memory",
            GameId::SpaceInvaders => "space-invaders",
        }
    }

    pub fn create(&self, bounds: Bounds) -> Box<dyn Game> {
        match self {
            GameId::Snake => Box::new(snake::Snake::new(bounds)),
            GameId::Pong => Box::new(pong::Pong::new(bounds)),
            GameId::Breakout => Box::new(breakout::Breakout::new(bounds)),
            GameId::Tetris => Box::new(tetris::Tetris::new(bounds)),
            GameId::Memory => Box::new(memory::Memory::new(bounds)),
            GameId::SpaceInvaders => Box::new(space_invaders::SpaceInvaders::new(bounds)),
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for GameId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameId::all()
            .iter()
            .copied()
            .find(|id| id.slug() == s.to_lowercase())
            .ok_or_else(|| format!("unknown game '{s}'"))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::mpsc::{self, Receiver};

    use crossterm::event::{
        KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    };
    use ratatui::layout::Rect;

    use super::{Game, GameContext};
    use crate::engine::{Bounds, InputState, PageChrome, TimerQueue};
    use crate::event::Event;

    /// Drives a game outside the terminal.
    pub struct Harness {
        pub input: InputState,
        pub chrome: PageChrome,
        pub timers: TimerQueue,
        pub rx: Receiver<Event>,
    }

    impl Harness {
        pub fn new() -> Self {
            let (tx, rx) = mpsc::channel();
            let mut input = InputState::new(Bounds::default(), None);
            // one cell per 10x10 surface pixels
            input.set_viewport(Rect::new(0, 0, 80, 60));
            Self {
                input,
                chrome: PageChrome::new(),
                timers: TimerQueue::new(tx),
                rx,
            }
        }

        pub fn step(&mut self, game: &mut dyn Game, delta_ms: f32) {
            let mut ctx = GameContext {
                input: &self.input,
                chrome: &mut self.chrome,
                timers: &self.timers,
            };
            game.update(delta_ms, &mut ctx);
            self.input.end_frame(delta_ms);
        }

        pub fn press(&mut self, code: KeyCode) {
            self.key(code, KeyEventKind::Press);
        }

        pub fn release(&mut self, code: KeyCode) {
            self.key(code, KeyEventKind::Release);
        }

        /// Press and release the left button over the cell covering (x, y).
        pub fn click(&mut self, x: f32, y: f32) {
            let (column, row) = ((x / 10.0) as u16, (y / 10.0) as u16);
            for kind in [
                MouseEventKind::Down(MouseButton::Left),
                MouseEventKind::Up(MouseButton::Left),
            ] {
                self.input.mouse_event(&MouseEvent {
                    kind,
                    column,
                    row,
                    modifiers: KeyModifiers::NONE,
                });
            }
        }

        fn key(&mut self, code: KeyCode, kind: KeyEventKind) {
            self.input.key_event(&KeyEvent {
                code,
                modifiers: KeyModifiers::NONE,
                kind,
                state: KeyEventState::NONE,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Canvas;

    #[test]
    fn slugs_round_trip_through_from_str() {
        for id in GameId::all() {
            assert_eq!(id.slug().parse::<GameId>(), Ok(*id));
        }
        assert!("pacman".parse::<GameId>().is_err());
    }

    #[test]
    fn every_game_renders_something() {
        for id in GameId::all() {
            let game = id.create(Bounds::default());
            let mut canvas = Canvas::new();
            game.render(&mut canvas);
            assert!(!canvas.is_empty(), "{id} drew nothing");
            assert_eq!(game.name(), id.title());
            assert!(!game.is_game_over());
        }
    }
}
