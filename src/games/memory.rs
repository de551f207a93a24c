use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use ratatui::style::Color;

use crate::engine::{Aabb, Align, Bounds, Chrome, Score, Surface, TimerHandle, TimerId, BACKDROP};
use crate::games::{Game, GameContext};

const GRID_COLS: usize = 4;
const GRID_ROWS: usize = 4;
const CARD_SIZE: f32 = 120.0;
const CARD_PADDING: f32 = 10.0;
const REVEAL_DELAY: Duration = Duration::from_millis(1000);
const SYMBOLS: [char; 8] = ['♠', '♥', '♦', '♣', '★', '●', '▲', '■'];

const MATCHED: Color = Color::Rgb(78, 205, 196);
const CARD_BACK: Color = Color::Rgb(102, 126, 234);

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub symbol: char,
    pub x: f32,
    pub y: f32,
    pub flipped: bool,
    pub matched: bool,
}

impl Card {
    fn rect(&self) -> Aabb {
        Aabb::new(self.x, self.y, CARD_SIZE, CARD_SIZE)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub cards: Vec<Card>,
    /// Indices of face-up cards awaiting the match check; never more than two.
    pub flipped: Vec<usize>,
    pub matched_pairs: u32,
    pub moves: u32,
    pub game_won: bool,
}

pub struct Memory {
    grid_x: f32,
    grid_y: f32,
    rng: StdRng,
    started: Instant,
    pending: Option<TimerHandle>,
    state: State,
}

impl Memory {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_rng(bounds, StdRng::from_entropy())
    }

    pub fn with_seed(bounds: Bounds, seed: u64) -> Self {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: Bounds, rng: StdRng) -> Self {
        let grid_w = GRID_COLS as f32 * (CARD_SIZE + CARD_PADDING) - CARD_PADDING;
        let grid_h = GRID_ROWS as f32 * (CARD_SIZE + CARD_PADDING) - CARD_PADDING;
        let mut game = Self {
            grid_x: (bounds.width - grid_w) / 2.0,
            grid_y: (bounds.height - grid_h) / 2.0,
            rng,
            started: Instant::now(),
            pending: None,
            state: State {
                cards: Vec::new(),
                flipped: Vec::new(),
                matched_pairs: 0,
                moves: 0,
                game_won: false,
            },
        };
        game.reset();
        game
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn awaiting_check(&self) -> Option<TimerId> {
        self.pending.as_ref().map(TimerHandle::id)
    }

    fn deal(&mut self) -> Vec<Card> {
        let mut symbols: Vec<char> = SYMBOLS.iter().chain(SYMBOLS.iter()).copied().collect();
        symbols.shuffle(&mut self.rng);
        symbols
            .into_iter()
            .enumerate()
            .map(|(i, symbol)| {
                let (row, col) = (i / GRID_COLS, i % GRID_COLS);
                Card {
                    symbol,
                    x: self.grid_x + col as f32 * (CARD_SIZE + CARD_PADDING),
                    y: self.grid_y + row as f32 * (CARD_SIZE + CARD_PADDING),
                    flipped: false,
                    matched: false,
                }
            })
            .collect()
    }

    /// Face-down card under the pointer, if any.
    fn card_at(&self, x: f32, y: f32) -> Option<usize> {
        self.state
            .cards
            .iter()
            .position(|c| !c.flipped && !c.matched && c.rect().contains(x, y))
    }

    fn check_match(&mut self, chrome: &mut dyn Chrome) {
        let s = &mut self.state;
        let [a, b] = s.flipped[..] else {
            return;
        };
        if s.cards[a].symbol == s.cards[b].symbol {
            s.cards[a].matched = true;
            s.cards[b].matched = true;
            s.matched_pairs += 1;
            chrome.update_score(Score::Points(s.matched_pairs * 2));
        } else {
            s.cards[a].flipped = false;
            s.cards[b].flipped = false;
        }
        s.flipped.clear();

        if s.matched_pairs as usize == SYMBOLS.len() {
            s.game_won = true;
            let secs = self.started.elapsed().as_secs();
            chrome.show_overlay(
                "You Win!",
                &format!("Congratulations! Completed in {secs}s with {} moves!", s.moves),
            );
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }
}

impl Game for Memory {
    fn name(&self) -> &'static str {
        "Memory"
    }

    fn reset(&mut self) {
        self.cancel_pending();
        self.state.cards = self.deal();
        self.state.flipped.clear();
        self.state.matched_pairs = 0;
        self.state.moves = 0;
        self.state.game_won = false;
        self.started = Instant::now();
    }

    fn update(&mut self, _delta_ms: f32, ctx: &mut GameContext<'_>) {
        if self.state.game_won {
            return;
        }
        let pointer = ctx.input.pointer();
        if !pointer.clicked || self.state.flipped.len() >= 2 {
            return;
        }
        let Some(idx) = self.card_at(pointer.x, pointer.y) else {
            return;
        };

        self.state.cards[idx].flipped = true;
        self.state.flipped.push(idx);
        if self.state.flipped.len() == 2 {
            self.state.moves += 1;
            self.pending = Some(ctx.timers.schedule(REVEAL_DELAY));
        }
    }

    fn on_timer(&mut self, id: TimerId, chrome: &mut dyn Chrome) {
        if self.awaiting_check() != Some(id) {
            return;
        }
        self.pending = None;
        self.check_match(chrome);
    }

    fn cleanup(&mut self) {
        self.cancel_pending();
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (w, h) = (surface.width(), surface.height());
        surface.fill_rect(0.0, 0.0, w, h, BACKDROP);

        for card in &self.state.cards {
            let face = if card.matched {
                MATCHED
            } else if card.flipped {
                Color::White
            } else {
                CARD_BACK
            };
            surface.fill_rect(card.x, card.y, CARD_SIZE, CARD_SIZE, face);
            surface.stroke_rect(card.x, card.y, CARD_SIZE, CARD_SIZE, Color::White);

            let (cx, cy) = (card.x + CARD_SIZE / 2.0, card.y + CARD_SIZE / 2.0 + 10.0);
            if card.flipped || card.matched {
                surface.fill_text(&card.symbol.to_string(), cx, cy, Color::Black, Align::Center);
            } else {
                surface.fill_text("?", cx, cy, Color::White, Align::Center);
            }
        }

        let secs = self.started.elapsed().as_secs();
        surface.fill_text(
            &format!("Moves: {} | Time: {secs}s", self.state.moves),
            w / 2.0,
            30.0,
            Color::White,
            Align::Center,
        );

        if self.state.game_won {
            surface.fill_text("You Win!", w / 2.0, h - 50.0, MATCHED, Align::Center);
        }
    }

    fn get_score(&self) -> u32 {
        self.state.matched_pairs * 2
    }

    fn is_game_over(&self) -> bool {
        self.state.game_won
    }
}
