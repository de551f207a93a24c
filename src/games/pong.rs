use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::style::Color;

use crate::engine::{clamp, Aabb, Align, Bounds, Chrome, Score, Surface, BACKDROP};
use crate::games::{Game, GameContext};

const PADDLE_WIDTH: f32 = 10.0;
const PADDLE_HEIGHT: f32 = 80.0;
const PADDLE_SPEED: f32 = 0.4;
const AI_SPEED_FACTOR: f32 = 0.8;
const AI_DEADBAND: f32 = 5.0;
const BALL_SIZE: f32 = 10.0;
const BALL_SPEED_X: f32 = 0.3;
const BALL_SPEED_Y: f32 = 0.2;
/// Vertical speed at the very edge of a paddle is half of this.
const DEFLECTION: f32 = 0.4;
const WINNING_SCORE: u32 = 5;

const PLAYER_COLOR: Color = Color::Rgb(78, 205, 196);
const AI_COLOR: Color = Color::Rgb(255, 107, 107);
const NET: Color = Color::Rgb(51, 51, 51);

#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub player_y: f32,
    pub ai_y: f32,
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_speed_x: f32,
    pub ball_speed_y: f32,
    pub player_score: u32,
    pub ai_score: u32,
    pub game_over: bool,
}

pub struct Pong {
    bounds: Bounds,
    player_x: f32,
    ai_x: f32,
    rng: StdRng,
    state: State,
}

impl Pong {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_rng(bounds, StdRng::from_entropy())
    }

    pub fn with_seed(bounds: Bounds, seed: u64) -> Self {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: Bounds, rng: StdRng) -> Self {
        let mid_y = (bounds.height - PADDLE_HEIGHT) / 2.0;
        Self {
            bounds,
            player_x: 20.0,
            ai_x: bounds.width - 30.0,
            rng,
            state: State {
                player_y: mid_y,
                ai_y: mid_y,
                ball_x: bounds.width / 2.0,
                ball_y: bounds.height / 2.0,
                ball_speed_x: BALL_SPEED_X,
                ball_speed_y: BALL_SPEED_Y,
                player_score: 0,
                ai_score: 0,
                game_over: false,
            },
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    fn ball_box(&self) -> Aabb {
        Aabb::new(self.state.ball_x, self.state.ball_y, BALL_SIZE, BALL_SIZE)
    }

    /// `speed_y` from where the ball's centre meets the paddle: zero at the
    /// middle, ±DEFLECTION/2 at the ends.
    fn deflect(&self, paddle_y: f32) -> f32 {
        let center = self.state.ball_y + BALL_SIZE / 2.0;
        let hit = clamp((center - paddle_y) / PADDLE_HEIGHT, 0.0, 1.0);
        (hit - 0.5) * DEFLECTION
    }

    fn serve(&mut self) {
        let s = &mut self.state;
        s.ball_x = self.bounds.width / 2.0;
        s.ball_y = self.bounds.height / 2.0;
        s.ball_speed_x = if self.rng.gen_bool(0.5) { BALL_SPEED_X } else { -BALL_SPEED_X };
        s.ball_speed_y = (self.rng.gen::<f32>() - 0.5) * BALL_SPEED_Y;
    }

    fn move_paddles(&mut self, delta_ms: f32, ctx: &GameContext<'_>) {
        let input = ctx.input;
        let max_y = self.bounds.height - PADDLE_HEIGHT;
        let s = &mut self.state;

        if input.is_key_pressed("w") || input.is_key_pressed("arrowup") {
            s.player_y -= PADDLE_SPEED * delta_ms;
        }
        if input.is_key_pressed("s") || input.is_key_pressed("arrowdown") {
            s.player_y += PADDLE_SPEED * delta_ms;
        }
        s.player_y = clamp(s.player_y, 0.0, max_y);

        let ai_center = s.ai_y + PADDLE_HEIGHT / 2.0;
        if ai_center < s.ball_y - AI_DEADBAND {
            s.ai_y += PADDLE_SPEED * AI_SPEED_FACTOR * delta_ms;
        } else if ai_center > s.ball_y + AI_DEADBAND {
            s.ai_y -= PADDLE_SPEED * AI_SPEED_FACTOR * delta_ms;
        }
        s.ai_y = clamp(s.ai_y, 0.0, max_y);
    }

    fn move_ball(&mut self, delta_ms: f32) {
        let floor = self.bounds.height - BALL_SIZE;
        let s = &mut self.state;
        s.ball_x += s.ball_speed_x * delta_ms;
        s.ball_y += s.ball_speed_y * delta_ms;

        if s.ball_y <= 0.0 {
            s.ball_speed_y = s.ball_speed_y.abs();
            s.ball_y = 0.0;
        } else if s.ball_y >= floor {
            s.ball_speed_y = -s.ball_speed_y.abs();
            s.ball_y = floor;
        }
    }

    fn bounce_off_paddles(&mut self) {
        let ball = self.ball_box();
        let player = Aabb::new(self.player_x, self.state.player_y, PADDLE_WIDTH, PADDLE_HEIGHT);
        let ai = Aabb::new(self.ai_x, self.state.ai_y, PADDLE_WIDTH, PADDLE_HEIGHT);

        if ball.overlaps(&player) {
            self.state.ball_speed_x = self.state.ball_speed_x.abs();
            self.state.ball_speed_y = self.deflect(self.state.player_y);
        }
        if ball.overlaps(&ai) {
            self.state.ball_speed_x = -self.state.ball_speed_x.abs();
            self.state.ball_speed_y = self.deflect(self.state.ai_y);
        }
    }

    fn check_points(&mut self, chrome: &mut dyn Chrome) {
        let scored = if self.state.ball_x < 0.0 {
            self.state.ai_score += 1;
            true
        } else if self.state.ball_x > self.bounds.width {
            self.state.player_score += 1;
            true
        } else {
            false
        };
        if !scored {
            return;
        }

        self.serve();
        chrome.update_score(Score::Versus(self.state.player_score, self.state.ai_score));

        if self.state.player_score >= WINNING_SCORE || self.state.ai_score >= WINNING_SCORE {
            self.state.game_over = true;
            let winner = if self.state.player_score > self.state.ai_score { "You" } else { "AI" };
            chrome.show_overlay(
                "Game Over!",
                &format!(
                    "{winner} won! Final Score: {} - {}",
                    self.state.player_score, self.state.ai_score
                ),
            );
        }
    }
}

impl Game for Pong {
    fn name(&self) -> &'static str {
        "Pong"
    }

    fn initial_score(&self) -> Score {
        Score::Versus(0, 0)
    }

    fn reset(&mut self) {
        let rng = self.rng.clone();
        *self = Self::with_rng(self.bounds, rng);
    }

    fn update(&mut self, delta_ms: f32, ctx: &mut GameContext<'_>) {
        if self.state.game_over {
            return;
        }
        self.move_paddles(delta_ms, ctx);
        self.move_ball(delta_ms);
        self.bounce_off_paddles();
        self.check_points(&mut *ctx.chrome);
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (w, h) = (self.bounds.width, self.bounds.height);
        surface.fill_rect(0.0, 0.0, w, h, BACKDROP);

        let mut y = 0.0;
        while y < h {
            surface.line(w / 2.0, y, w / 2.0, (y + 5.0).min(h), NET);
            y += 10.0;
        }

        surface.fill_rect(self.player_x, self.state.player_y, PADDLE_WIDTH, PADDLE_HEIGHT, PLAYER_COLOR);
        surface.fill_rect(self.ai_x, self.state.ai_y, PADDLE_WIDTH, PADDLE_HEIGHT, AI_COLOR);

        surface.fill_circle(
            self.state.ball_x + BALL_SIZE / 2.0,
            self.state.ball_y + BALL_SIZE / 2.0,
            BALL_SIZE / 2.0,
            Color::White,
        );

        surface.fill_text(&self.state.player_score.to_string(), w / 4.0, 50.0, Color::White, Align::Center);
        surface.fill_text(&self.state.ai_score.to_string(), w * 3.0 / 4.0, 50.0, Color::White, Align::Center);

        if self.state.game_over {
            let winner = if self.state.player_score > self.state.ai_score {
                "You Win!"
            } else {
                "AI Wins!"
            };
            surface.fill_text(winner, w / 2.0, h / 2.0, Color::White, Align::Center);
        }
    }

    fn get_score(&self) -> u32 {
        self.state.player_score
    }

    fn is_game_over(&self) -> bool {
        self.state.game_over
    }
}
