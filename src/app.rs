use std::sync::mpsc::Sender;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};

use crate::config::ArcadeConfig;
use crate::engine::{Bounds, Canvas, InputState, PageChrome, TimerId, TimerQueue};
use crate::event::Event;
use crate::games::{GameContext, GameId};
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tab {
    Home,
    Play(GameId),
}

impl Tab {
    pub fn all() -> Vec<Tab> {
        std::iter::once(Tab::Home)
            .chain(GameId::all().iter().copied().map(Tab::Play))
            .collect()
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Play(id) => id.index() + 1,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize,
    pub show_best: bool,
    pub input: InputState,
    pub canvas: Canvas,
    pub chrome: PageChrome,
    pub session: Session,
    timers: TimerQueue,
}

impl App {
    /// `releases` is true when the terminal reports key releases; otherwise
    /// keys expire after the configured hold time.
    pub fn new(config: &ArcadeConfig, tx: Sender<Event>, releases: bool) -> Self {
        let bounds = Bounds::default();
        let hold = (!releases).then(|| config.key_hold());
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            show_best: false,
            input: InputState::new(bounds, hold),
            canvas: Canvas::new(),
            chrome: PageChrome::new(),
            session: Session::new(bounds, config.max_frame_delta()),
            timers: TimerQueue::new(tx),
        }
    }

    pub fn launch(&mut self, id: GameId) {
        self.current_tab = Tab::Play(id);
        self.selected_game = id.index();
        self.input.release_all();
        self.session.select(id, Instant::now(), &mut self.chrome);
    }

    fn go_home(&mut self) {
        self.current_tab = Tab::Home;
        self.session.close();
        self.chrome.reset();
        self.canvas = Canvas::new();
        self.input.release_all();
    }

    fn switch_to(&mut self, tab: Tab) {
        match tab {
            Tab::Home => self.go_home(),
            Tab::Play(id) => self.launch(id),
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.current_tab == Tab::Home {
            return;
        }
        let mut ctx = GameContext {
            input: &self.input,
            chrome: &mut self.chrome,
            timers: &self.timers,
        };
        if let Some(delta) = self.session.frame(now, &mut self.canvas, &mut ctx) {
            self.input.end_frame(delta);
        }
    }

    pub fn on_timer(&mut self, id: TimerId) {
        self.session.dispatch_timer(id, &mut self.chrome);
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if matches!(self.current_tab, Tab::Play(_)) {
            self.input.mouse_event(&mouse);
        }
    }

    pub fn on_focus_lost(&mut self) {
        self.input.release_all();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            self.input.key_event(&key);
            return;
        }

        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') if self.current_tab == Tab::Home => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc if self.current_tab != Tab::Home => {
                self.go_home();
                return;
            }
            _ => {}
        }

        match self.current_tab {
            Tab::Home => self.on_home_key(key),
            Tab::Play(_) => {
                if matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R')) && key.kind == KeyEventKind::Press {
                    self.session.restart(&mut self.chrome);
                }
                self.input.key_event(&key);
            }
        }
    }

    fn on_home_key(&mut self, key: KeyEvent) {
        let games = GameId::all();
        let count = games.len();
        // tiles are laid out in two rows of three
        let per_row = count / 2;
        match key.code {
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                self.launch(games[idx]);
            }
            KeyCode::Char('h') | KeyCode::Char('H') => self.show_best = !self.show_best,
            KeyCode::Right => self.selected_game = (self.selected_game + 1) % count,
            KeyCode::Left => self.selected_game = (self.selected_game + count - 1) % count,
            KeyCode::Down | KeyCode::Up => {
                self.selected_game = (self.selected_game + per_row) % count;
            }
            KeyCode::Enter => self.launch(games[self.selected_game]),
            _ => {}
        }
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + 1) % tabs.len()]);
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + tabs.len() - 1) % tabs.len()]);
    }
}
