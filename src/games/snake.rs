use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::style::Color;

use crate::engine::{Align, Bounds, Chrome, Score, Surface, BACKDROP};
use crate::games::{Game, GameContext};

const CELL: f32 = 20.0;
const START_DELAY_MS: f32 = 150.0;
const MIN_DELAY_MS: f32 = 100.0;
const DELAY_STEP_MS: f32 = 2.0;
const FOOD_POINTS: u32 = 10;

const GRID_LINE: Color = Color::Rgb(26, 26, 42);
const FOOD: Color = Color::Rgb(255, 107, 107);
const HEAD: Color = Color::Rgb(78, 205, 196);
const BODY: Color = Color::Rgb(69, 183, 184);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct State {
    /// Head first.
    pub snake: Vec<Cell>,
    pub dx: i32,
    pub dy: i32,
    pub food: Cell,
    pub score: u32,
    pub game_over: bool,
    pub move_timer: f32,
    pub move_delay: f32,
}

pub struct Snake {
    cols: i32,
    rows: i32,
    rng: StdRng,
    state: State,
}

impl Snake {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_rng(bounds, StdRng::from_entropy())
    }

    pub fn with_seed(bounds: Bounds, seed: u64) -> Self {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: Bounds, rng: StdRng) -> Self {
        let mut s = Self {
            cols: (bounds.width / CELL) as i32,
            rows: (bounds.height / CELL) as i32,
            rng,
            state: State {
                snake: Vec::new(),
                dx: 0,
                dy: 0,
                food: Cell { x: 0, y: 0 },
                score: 0,
                game_over: false,
                move_timer: 0.0,
                move_delay: START_DELAY_MS,
            },
        };
        s.reset();
        s
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn grid_size(&self) -> (i32, i32) {
        (self.cols, self.rows)
    }

    /// Places the food explicitly; the caller must avoid the snake.
    pub fn set_food(&mut self, food: Cell) {
        self.state.food = food;
    }

    fn spawn_food(&mut self) -> Cell {
        loop {
            let food = Cell {
                x: self.rng.gen_range(0..self.cols),
                y: self.rng.gen_range(0..self.rows),
            };
            if !self.state.snake.contains(&food) {
                return food;
            }
        }
    }

    fn steer(&mut self, ctx: &GameContext<'_>) {
        let input = ctx.input;
        let s = &mut self.state;
        if input.is_key_pressed("arrowup") && s.dy == 0 {
            (s.dx, s.dy) = (0, -1);
        } else if input.is_key_pressed("arrowdown") && s.dy == 0 {
            (s.dx, s.dy) = (0, 1);
        } else if input.is_key_pressed("arrowleft") && s.dx == 0 {
            (s.dx, s.dy) = (-1, 0);
        } else if input.is_key_pressed("arrowright") && s.dx == 0 {
            (s.dx, s.dy) = (1, 0);
        }
    }

    fn advance(&mut self, chrome: &mut dyn Chrome) {
        if self.state.dx == 0 && self.state.dy == 0 {
            return;
        }
        let head = self.state.snake[0];
        let next = Cell {
            x: head.x + self.state.dx,
            y: head.y + self.state.dy,
        };

        let off_grid = next.x < 0 || next.x >= self.cols || next.y < 0 || next.y >= self.rows;
        if off_grid || self.state.snake.contains(&next) {
            self.end_game(chrome);
            return;
        }

        self.state.snake.insert(0, next);
        if next == self.state.food {
            self.state.score += FOOD_POINTS;
            chrome.update_score(Score::Points(self.state.score));
            self.state.food = self.spawn_food();
            self.state.move_delay = (self.state.move_delay - DELAY_STEP_MS).max(MIN_DELAY_MS);
        } else {
            self.state.snake.pop();
        }
    }

    fn end_game(&mut self, chrome: &mut dyn Chrome) {
        self.state.game_over = true;
        log::debug!("snake crashed at length {}", self.state.snake.len());
        chrome.show_overlay("Game Over!", &format!("Final Score: {}", self.state.score));
    }
}

impl Game for Snake {
    fn name(&self) -> &'static str {
        "Snake"
    }

    fn reset(&mut self) {
        self.state.snake = vec![Cell { x: 10, y: 10 }];
        self.state.dx = 0;
        self.state.dy = 0;
        self.state.score = 0;
        self.state.game_over = false;
        self.state.move_timer = 0.0;
        self.state.move_delay = START_DELAY_MS;
        self.state.food = self.spawn_food();
    }

    fn update(&mut self, delta_ms: f32, ctx: &mut GameContext<'_>) {
        if self.state.game_over {
            return;
        }
        self.steer(ctx);

        self.state.move_timer += delta_ms;
        if self.state.move_timer >= self.state.move_delay {
            self.state.move_timer = 0.0;
            self.advance(&mut *ctx.chrome);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (w, h) = (surface.width(), surface.height());
        surface.fill_rect(0.0, 0.0, w, h, BACKDROP);

        for i in 0..=self.cols {
            let x = i as f32 * CELL;
            surface.line(x, 0.0, x, h, GRID_LINE);
        }
        for i in 0..=self.rows {
            let y = i as f32 * CELL;
            surface.line(0.0, y, w, y, GRID_LINE);
        }

        let food = self.state.food;
        surface.fill_rect(
            food.x as f32 * CELL + 1.0,
            food.y as f32 * CELL + 1.0,
            CELL - 2.0,
            CELL - 2.0,
            FOOD,
        );

        for (i, seg) in self.state.snake.iter().enumerate() {
            let color = if i == 0 { HEAD } else { BODY };
            surface.fill_rect(
                seg.x as f32 * CELL + 1.0,
                seg.y as f32 * CELL + 1.0,
                CELL - 2.0,
                CELL - 2.0,
                color,
            );
        }

        if self.state.game_over {
            surface.fill_text("Game Over! Press R to restart", w / 2.0, h / 2.0, Color::White, Align::Center);
        } else if self.state.dx == 0 && self.state.dy == 0 {
            surface.fill_text(
                "Use Arrow Keys to Start",
                w / 2.0,
                h / 2.0,
                Color::Rgb(136, 136, 136),
                Align::Center,
            );
        }
    }

    fn get_score(&self) -> u32 {
        self.state.score
    }

    fn is_game_over(&self) -> bool {
        self.state.game_over
    }
}
