use ratatui::style::Color;

use crate::engine::{clamp, Aabb, Align, Bounds, Chrome, Score, Surface, BACKDROP};
use crate::games::{Game, GameContext};

const PADDLE_WIDTH: f32 = 100.0;
const PADDLE_HEIGHT: f32 = 10.0;
const PADDLE_SPEED: f32 = 0.5;
const BALL_SIZE: f32 = 8.0;
const BALL_SPEED: f32 = 0.25;
const DEFLECTION: f32 = 0.5;

const BRICK_ROWS: usize = 5;
const BRICK_COLS: usize = 8;
const BRICK_WIDTH: f32 = 80.0;
const BRICK_HEIGHT: f32 = 20.0;
const BRICK_PADDING: f32 = 5.0;
const BRICK_TOP: f32 = 50.0;
const BRICK_POINTS: u32 = 10;

const ROW_COLORS: [Color; 5] = [
    Color::Rgb(255, 107, 107),
    Color::Rgb(78, 205, 196),
    Color::Rgb(255, 230, 109),
    Color::Rgb(168, 230, 207),
    Color::Rgb(255, 139, 148),
];
const PADDLE_COLOR: Color = Color::Rgb(78, 205, 196);

#[derive(Clone, Debug, PartialEq)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
    pub color: Color,
    pub destroyed: bool,
}

impl Brick {
    fn rect(&self) -> Aabb {
        Aabb::new(self.x, self.y, BRICK_WIDTH, BRICK_HEIGHT)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub paddle_x: f32,
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_speed_x: f32,
    pub ball_speed_y: f32,
    pub bricks: Vec<Brick>,
    pub score: u32,
    pub game_over: bool,
    pub game_won: bool,
}

pub struct Breakout {
    bounds: Bounds,
    paddle_y: f32,
    state: State,
}

impl Breakout {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            paddle_y: bounds.height - 30.0,
            state: Self::initial_state(bounds),
        }
    }

    fn initial_state(bounds: Bounds) -> State {
        let layout_width = BRICK_COLS as f32 * (BRICK_WIDTH + BRICK_PADDING) - BRICK_PADDING;
        let left = (bounds.width - layout_width) / 2.0;
        let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                bricks.push(Brick {
                    x: left + col as f32 * (BRICK_WIDTH + BRICK_PADDING),
                    y: BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_PADDING),
                    color: ROW_COLORS[row % ROW_COLORS.len()],
                    destroyed: false,
                });
            }
        }

        State {
            paddle_x: (bounds.width - PADDLE_WIDTH) / 2.0,
            ball_x: bounds.width / 2.0,
            ball_y: bounds.height - 50.0,
            ball_speed_x: BALL_SPEED,
            ball_speed_y: -BALL_SPEED,
            bricks,
            score: 0,
            game_over: false,
            game_won: false,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn bricks_left(&self) -> usize {
        self.state.bricks.iter().filter(|b| !b.destroyed).count()
    }

    fn ball_box(&self) -> Aabb {
        Aabb::new(self.state.ball_x, self.state.ball_y, BALL_SIZE, BALL_SIZE)
    }

    fn move_paddle(&mut self, delta_ms: f32, ctx: &GameContext<'_>) {
        let input = ctx.input;
        let s = &mut self.state;
        if input.is_key_pressed("arrowleft") || input.is_key_pressed("a") {
            s.paddle_x -= PADDLE_SPEED * delta_ms;
        }
        if input.is_key_pressed("arrowright") || input.is_key_pressed("d") {
            s.paddle_x += PADDLE_SPEED * delta_ms;
        }
        s.paddle_x = clamp(s.paddle_x, 0.0, self.bounds.width - PADDLE_WIDTH);
    }

    fn move_ball(&mut self, delta_ms: f32) {
        let right = self.bounds.width - BALL_SIZE;
        let s = &mut self.state;
        s.ball_x += s.ball_speed_x * delta_ms;
        s.ball_y += s.ball_speed_y * delta_ms;

        if s.ball_x <= 0.0 {
            s.ball_speed_x = s.ball_speed_x.abs();
            s.ball_x = 0.0;
        } else if s.ball_x >= right {
            s.ball_speed_x = -s.ball_speed_x.abs();
            s.ball_x = right;
        }
        if s.ball_y <= 0.0 {
            s.ball_speed_y = s.ball_speed_y.abs();
            s.ball_y = 0.0;
        }
    }

    fn bounce_off_paddle(&mut self) {
        let paddle = Aabb::new(self.state.paddle_x, self.paddle_y, PADDLE_WIDTH, PADDLE_HEIGHT);
        if self.ball_box().overlaps(&paddle) {
            let s = &mut self.state;
            s.ball_speed_y = -s.ball_speed_y.abs();
            let hit = (s.ball_x - s.paddle_x) / PADDLE_WIDTH;
            s.ball_speed_x = (hit - 0.5) * DEFLECTION;
        }
    }

    /// Every brick the ball overlaps this frame is destroyed; each one
    /// reflects the axis along which centres are furthest apart.
    fn break_bricks(&mut self, chrome: &mut dyn Chrome) {
        let ball = self.ball_box();
        let (bcx, bcy) = ball.center();
        let mut broke = false;

        for brick in self.state.bricks.iter_mut().filter(|b| !b.destroyed) {
            let rect = brick.rect();
            if !ball.overlaps(&rect) {
                continue;
            }
            brick.destroyed = true;
            self.state.score += BRICK_POINTS;
            broke = true;

            let (rcx, rcy) = rect.center();
            let dx = bcx - rcx;
            let dy = bcy - rcy;
            if dx.abs() > dy.abs() {
                self.state.ball_speed_x = dx.signum() * self.state.ball_speed_x.abs();
            } else {
                self.state.ball_speed_y = if dy > 0.0 {
                    self.state.ball_speed_y.abs()
                } else {
                    -self.state.ball_speed_y.abs()
                };
            }
        }

        if broke {
            chrome.update_score(Score::Points(self.state.score));
        }
    }

    /// Loss takes priority; both flags are never set in the same frame.
    fn check_end(&mut self, chrome: &mut dyn Chrome) {
        if self.state.ball_y > self.bounds.height {
            self.state.game_over = true;
            chrome.show_overlay("Game Over!", &format!("Final Score: {}", self.state.score));
        } else if self.state.bricks.iter().all(|b| b.destroyed) {
            self.state.game_won = true;
            chrome.show_overlay(
                "You Win!",
                &format!("Congratulations! Final Score: {}", self.state.score),
            );
        }
    }
}

impl Game for Breakout {
    fn name(&self) -> &'static str {
        "Breakout"
    }

    fn reset(&mut self) {
        self.state = Self::initial_state(self.bounds);
    }

    fn update(&mut self, delta_ms: f32, ctx: &mut GameContext<'_>) {
        if self.state.game_over || self.state.game_won {
            return;
        }
        self.move_paddle(delta_ms, ctx);
        self.move_ball(delta_ms);
        self.bounce_off_paddle();
        self.break_bricks(&mut *ctx.chrome);
        self.check_end(&mut *ctx.chrome);
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (w, h) = (self.bounds.width, self.bounds.height);
        surface.fill_rect(0.0, 0.0, w, h, BACKDROP);

        for brick in self.state.bricks.iter().filter(|b| !b.destroyed) {
            surface.fill_rect(brick.x, brick.y, BRICK_WIDTH, BRICK_HEIGHT, brick.color);
            surface.stroke_rect(brick.x, brick.y, BRICK_WIDTH, BRICK_HEIGHT, Color::White);
        }

        surface.fill_rect(self.state.paddle_x, self.paddle_y, PADDLE_WIDTH, PADDLE_HEIGHT, PADDLE_COLOR);
        surface.fill_circle(
            self.state.ball_x + BALL_SIZE / 2.0,
            self.state.ball_y + BALL_SIZE / 2.0,
            BALL_SIZE / 2.0,
            Color::White,
        );

        if self.state.game_over {
            surface.fill_text("Game Over!", w / 2.0, h / 2.0, Color::White, Align::Center);
        } else if self.state.game_won {
            surface.fill_text("You Win!", w / 2.0, h / 2.0, Color::White, Align::Center);
        }
    }

    fn get_score(&self) -> u32 {
        self.state.score
    }

    fn is_game_over(&self) -> bool {
        self.state.game_over || self.state.game_won
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::Harness;
    use crossterm::event::KeyCode;

    fn breakout() -> Breakout {
        Breakout::new(Bounds::default())
    }

    #[test]
    fn layout_is_centred() {
        let game = breakout();
        assert_eq!(game.bricks_left(), 40);
        let first = &game.state().bricks[0];
        let last = &game.state().bricks[BRICK_COLS - 1];
        assert_eq!(first.x, 62.5);
        assert_eq!(800.0 - (last.x + BRICK_WIDTH), 62.5);
    }

    #[test]
    fn zero_delta_is_idempotent() {
        let mut game = breakout();
        let mut h = Harness::new();
        let before = game.state().clone();
        h.step(&mut game, 0.0);
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn destroying_the_last_brick_wins() {
        let mut game = breakout();
        for brick in game.state.bricks.iter_mut().skip(1) {
            brick.destroyed = true;
        }
        let target = game.state.bricks[0].clone();
        game.state.ball_x = target.x + 10.0;
        game.state.ball_y = target.y + BRICK_HEIGHT - 2.0;

        let mut h = Harness::new();
        h.step(&mut game, 0.0);

        let s = game.state();
        assert!(s.game_won);
        assert!(!s.game_over);
        assert_eq!(s.score, 10);
        assert_eq!(h.chrome.overlay.as_ref().map(|o| o.title.as_str()), Some("You Win!"));
    }

    #[test]
    fn falling_ball_loses_while_bricks_remain() {
        let mut game = breakout();
        game.state.ball_x = 10.0;
        game.state.ball_y = 601.0;
        game.state.ball_speed_y = BALL_SPEED;

        let mut h = Harness::new();
        h.step(&mut game, 0.0);
        assert!(game.state().game_over);
        assert!(!game.state().game_won);
    }

    #[test]
    fn loss_excludes_win_in_the_same_frame() {
        let mut game = breakout();
        for brick in game.state.bricks.iter_mut() {
            brick.destroyed = true;
        }
        game.state.ball_y = 700.0;
        let mut h = Harness::new();
        h.step(&mut game, 0.0);
        assert!(game.state().game_over);
        assert!(!game.state().game_won);
    }

    #[test]
    fn side_hit_reflects_horizontal_speed_only() {
        let mut game = breakout();
        let brick = game.state.bricks[BRICK_COLS].clone();
        // ball overlapping the brick's left edge, vertically centred
        game.state.ball_x = brick.x - BALL_SIZE + 1.0;
        game.state.ball_y = brick.y + BRICK_HEIGHT / 2.0 - BALL_SIZE / 2.0;
        game.state.ball_speed_x = BALL_SPEED;
        game.state.ball_speed_y = -BALL_SPEED;

        let mut h = Harness::new();
        h.step(&mut game, 0.0);
        assert!(game.state().bricks[BRICK_COLS].destroyed);
        assert_eq!(game.state().ball_speed_x, -BALL_SPEED);
        assert_eq!(game.state().ball_speed_y, -BALL_SPEED);
    }

    #[test]
    fn paddle_sends_the_ball_back_up() {
        let mut game = breakout();
        let paddle_x = game.state.paddle_x;
        game.state.ball_x = paddle_x + PADDLE_WIDTH - BALL_SIZE;
        game.state.ball_y = 565.0;
        game.state.ball_speed_y = BALL_SPEED;

        let mut h = Harness::new();
        h.step(&mut game, 0.0);
        assert!(game.state().ball_speed_y < 0.0);
        assert!(game.state().ball_speed_x > 0.0);
    }

    #[test]
    fn paddle_moves_with_keys_and_is_clamped() {
        let mut game = breakout();
        let mut h = Harness::new();
        h.press(KeyCode::Char('d'));
        h.step(&mut game, 10.0);
        assert_eq!(game.state().paddle_x, 355.0);
        h.step(&mut game, 10_000.0);
        assert_eq!(game.state().paddle_x, 700.0);
    }
}
