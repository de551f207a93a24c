use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::style::Color;

use crate::engine::{Align, Bounds, Chrome, Score, Surface, BACKDROP};
use crate::games::{Game, GameContext};

pub const COLS: usize = 10;
pub const ROWS: usize = 20;
const CELL: f32 = 30.0;
const GRID_TOP: f32 = 50.0;
const SPAWN_X: i32 = COLS as i32 / 2 - 1;
const START_FALL_MS: f32 = 1000.0;
const MIN_FALL_MS: f32 = 200.0;
const FALL_STEP_MS: f32 = 50.0;
const LINE_POINTS: u32 = 100;
const LINES_PER_LEVEL: u32 = 10;

/// Index 0 is the empty cell.
const PALETTE: [Color; 8] = [
    Color::Rgb(0, 0, 0),
    Color::Rgb(78, 205, 196),
    Color::Rgb(255, 230, 109),
    Color::Rgb(255, 107, 107),
    Color::Rgb(168, 230, 207),
    Color::Rgb(255, 139, 148),
    Color::Rgb(149, 225, 211),
    Color::Rgb(243, 129, 129),
];
const BOARD: Color = Color::Rgb(26, 26, 42);
const GRID_LINE: Color = Color::Rgb(42, 42, 58);

const SHAPES: [&[&[u8]]; 7] = [
    &[&[1, 1, 1, 1]],
    &[&[1, 1], &[1, 1]],
    &[&[0, 1, 0], &[1, 1, 1]],
    &[&[0, 1, 1], &[1, 1, 0]],
    &[&[1, 1, 0], &[0, 1, 1]],
    &[&[1, 0, 0], &[1, 1, 1]],
    &[&[0, 0, 1], &[1, 1, 1]],
];

pub type Shape = Vec<Vec<u8>>;

/// Clockwise quarter turn: transpose, then reverse each row.
pub fn rotate(shape: &[Vec<u8>]) -> Shape {
    let width = shape.first().map_or(0, Vec::len);
    (0..width)
        .map(|col| shape.iter().rev().map(|row| row[col]).collect())
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
    pub color: u8,
}

impl Piece {
    fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v != 0)
                .map(move |(c, _)| (self.x + c as i32, self.y + r as i32))
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub grid: Vec<Vec<u8>>,
    pub current: Piece,
    pub next: Piece,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub game_over: bool,
    pub fall_time: f32,
    pub fall_delay: f32,
}

pub struct Tetris {
    grid_x: f32,
    grid_y: f32,
    rng: StdRng,
    state: State,
}

impl Tetris {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_rng(bounds, StdRng::from_entropy())
    }

    pub fn with_seed(bounds: Bounds, seed: u64) -> Self {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: Bounds, mut rng: StdRng) -> Self {
        let board_h = ROWS as f32 * CELL;
        let current = random_piece(&mut rng);
        let next = random_piece(&mut rng);
        Self {
            grid_x: (bounds.width - COLS as f32 * CELL) / 2.0,
            // A 600 px surface cannot fit the board below the usual top margin.
            grid_y: GRID_TOP.min(bounds.height - board_h).max(0.0),
            rng,
            state: State {
                grid: empty_grid(),
                current,
                next,
                score: 0,
                lines: 0,
                level: 1,
                game_over: false,
                fall_time: 0.0,
                fall_delay: START_FALL_MS,
            },
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(x, y)| {
            if x < 0 || x >= COLS as i32 || y >= ROWS as i32 {
                return true;
            }
            y >= 0 && self.state.grid[y as usize][x as usize] != 0
        })
    }

    /// Promotes the preview piece and draws a new one. A promoted piece that
    /// already collides ends the game.
    fn spawn_piece(&mut self, chrome: &mut dyn Chrome) {
        let next = random_piece(&mut self.rng);
        self.state.current = std::mem::replace(&mut self.state.next, next);
        if self.collides(&self.state.current) {
            self.state.game_over = true;
            log::info!("tetris topped out at level {}", self.state.level);
            chrome.show_overlay("Game Over!", &format!("Final Score: {}", self.state.score));
        }
    }

    fn lock_piece(&mut self, chrome: &mut dyn Chrome) {
        let cells: Vec<(i32, i32)> = self.state.current.cells().collect();
        let color = self.state.current.color;
        for (x, y) in cells {
            if y >= 0 {
                self.state.grid[y as usize][x as usize] = color;
            }
        }
        self.clear_lines(chrome);
        self.spawn_piece(chrome);
    }

    fn clear_lines(&mut self, chrome: &mut dyn Chrome) {
        let before = self.state.grid.len();
        self.state.grid.retain(|row| row.iter().any(|c| *c == 0));
        let cleared = before - self.state.grid.len();
        if cleared == 0 {
            return;
        }
        for _ in 0..cleared {
            self.state.grid.insert(0, vec![0; COLS]);
        }

        let s = &mut self.state;
        s.lines += cleared as u32;
        s.score += cleared as u32 * LINE_POINTS * s.level;
        let level = s.lines / LINES_PER_LEVEL + 1;
        if level != s.level {
            log::debug!("tetris level {level}");
        }
        s.level = level;
        s.fall_delay = (START_FALL_MS - (s.level - 1) as f32 * FALL_STEP_MS).max(MIN_FALL_MS);
        chrome.update_score(Score::Points(s.score));
    }

    fn shift(&mut self, dx: i32) {
        let mut moved = self.state.current.clone();
        moved.x += dx;
        if !self.collides(&moved) {
            self.state.current = moved;
        }
    }

    fn rotate_piece(&mut self) {
        let mut turned = self.state.current.clone();
        turned.shape = rotate(&turned.shape);
        if !self.collides(&turned) {
            self.state.current = turned;
        }
    }

    /// Moves the piece down one row, locking it if it cannot go further.
    fn drop_one(&mut self, chrome: &mut dyn Chrome) {
        let mut lowered = self.state.current.clone();
        lowered.y += 1;
        if self.collides(&lowered) {
            self.lock_piece(chrome);
        } else {
            self.state.current = lowered;
        }
    }

    fn draw_cell(&self, surface: &mut dyn Surface, x: f32, y: f32, color: u8) {
        surface.fill_rect(x + 1.0, y + 1.0, CELL - 2.0, CELL - 2.0, PALETTE[color as usize]);
    }
}

fn empty_grid() -> Vec<Vec<u8>> {
    vec![vec![0; COLS]; ROWS]
}

fn random_piece(rng: &mut StdRng) -> Piece {
    let shape = SHAPES[rng.gen_range(0..SHAPES.len())];
    Piece {
        shape: shape.iter().map(|row| row.to_vec()).collect(),
        x: SPAWN_X,
        y: 0,
        color: rng.gen_range(1..PALETTE.len() as u8),
    }
}

impl Game for Tetris {
    fn name(&self) -> &'static str {
        "Tetris"
    }

    fn reset(&mut self) {
        let current = random_piece(&mut self.rng);
        let next = random_piece(&mut self.rng);
        self.state = State {
            grid: empty_grid(),
            current,
            next,
            score: 0,
            lines: 0,
            level: 1,
            game_over: false,
            fall_time: 0.0,
            fall_delay: START_FALL_MS,
        };
    }

    fn update(&mut self, delta_ms: f32, ctx: &mut GameContext<'_>) {
        if self.state.game_over {
            return;
        }
        let input = ctx.input;
        let pressed = |keys: &[&str]| keys.iter().any(|k| input.is_key_just_pressed(k));

        if pressed(&["arrowleft", "a"]) {
            self.shift(-1);
        }
        if pressed(&["arrowright", "d"]) {
            self.shift(1);
        }
        if pressed(&["arrowdown", "s"]) {
            self.drop_one(&mut *ctx.chrome);
            if self.state.game_over {
                return;
            }
        }
        if pressed(&[" ", "w", "arrowup"]) {
            self.rotate_piece();
        }

        self.state.fall_time += delta_ms;
        if self.state.fall_time >= self.state.fall_delay {
            self.state.fall_time = 0.0;
            self.drop_one(&mut *ctx.chrome);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (w, h) = (surface.width(), surface.height());
        let (gx, gy) = (self.grid_x, self.grid_y);
        let (gw, gh) = (COLS as f32 * CELL, ROWS as f32 * CELL);
        surface.fill_rect(0.0, 0.0, w, h, BACKDROP);
        surface.fill_rect(gx, gy, gw, gh, BOARD);

        for i in 0..=COLS {
            let x = gx + i as f32 * CELL;
            surface.line(x, gy, x, gy + gh, GRID_LINE);
        }
        for i in 0..=ROWS {
            let y = gy + i as f32 * CELL;
            surface.line(gx, y, gx + gw, y, GRID_LINE);
        }

        for (r, row) in self.state.grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate().filter(|(_, v)| **v != 0) {
                self.draw_cell(surface, gx + c as f32 * CELL, gy + r as f32 * CELL, *cell);
            }
        }
        let piece = &self.state.current;
        for (x, y) in piece.cells().filter(|(_, y)| *y >= 0) {
            self.draw_cell(surface, gx + x as f32 * CELL, gy + y as f32 * CELL, piece.color);
        }

        let info_x = gx + gw + 20.0;
        surface.fill_text(&format!("Level: {}", self.state.level), info_x, gy + 30.0, Color::White, Align::Left);
        surface.fill_text(&format!("Lines: {}", self.state.lines), info_x, gy + 60.0, Color::White, Align::Left);
        surface.fill_text("Next:", info_x, gy + 110.0, Color::White, Align::Left);
        let next = &self.state.next;
        for (x, y) in next.cells() {
            let px = info_x + (x - next.x) as f32 * CELL;
            let py = gy + 130.0 + (y - next.y) as f32 * CELL;
            self.draw_cell(surface, px, py, next.color);
        }

        if self.state.game_over {
            surface.fill_text("Game Over!", w / 2.0, h / 2.0, Color::White, Align::Center);
        }
    }

    fn get_score(&self) -> u32 {
        self.state.score
    }

    fn is_game_over(&self) -> bool {
        self.state.game_over
    }
}
