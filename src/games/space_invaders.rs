use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use ratatui::style::Color;

use crate::engine::{clamp, Aabb, Align, Bounds, Chrome, Score, Surface, BACKDROP};
use crate::games::{Game, GameContext};

const PLAYER_WIDTH: f32 = 50.0;
const PLAYER_HEIGHT: f32 = 30.0;
const PLAYER_SPEED: f32 = 0.4;
const BULLET_WIDTH: f32 = 4.0;
const BULLET_HEIGHT: f32 = 10.0;
const PLAYER_BULLET_SPEED: f32 = 0.5;
const FIRE_COOLDOWN_MS: f32 = 300.0;
const ENEMY_BULLET_SPEED: f32 = 0.3;
const ENEMY_FIRE_MS: f32 = 2000.0;
const MIN_ENEMY_FIRE_MS: f32 = 500.0;
const ENEMY_FIRE_STEP_MS: f32 = 200.0;

const ENEMY_ROWS: usize = 5;
const ENEMY_COLS: usize = 8;
const ENEMY_WIDTH: f32 = 40.0;
const ENEMY_HEIGHT: f32 = 30.0;
const ENEMY_PADDING: f32 = 10.0;
const ENEMY_OFFSET: (f32, f32) = (50.0, 50.0);
const ENEMY_SPEED: f32 = 0.05;
const WAVE_SPEEDUP: f32 = 0.01;
const STEP_DOWN: f32 = 20.0;
const ENEMY_POINTS: u32 = 10;
const STARS: usize = 50;

const PLAYER_COLOR: Color = Color::Rgb(78, 205, 196);
const ENEMY_COLOR: Color = Color::Rgb(255, 107, 107);

/// `x` is the horizontal centre, `y` the top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
}

impl Bullet {
    fn rect(&self) -> Aabb {
        Aabb::new(self.x - BULLET_WIDTH / 2.0, self.y, BULLET_WIDTH, BULLET_HEIGHT)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub alive: bool,
}

impl Enemy {
    fn rect(&self) -> Aabb {
        Aabb::new(self.x, self.y, ENEMY_WIDTH, ENEMY_HEIGHT)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub player_x: f32,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub enemy_speed: f32,
    pub enemy_direction: f32,
    pub last_bullet_time: f32,
    pub last_enemy_bullet_time: f32,
    pub enemy_bullet_delay: f32,
    pub score: u32,
    pub wave: u32,
    pub game_over: bool,
}

pub struct SpaceInvaders {
    bounds: Bounds,
    player_y: f32,
    rng: StdRng,
    state: State,
}

fn formation() -> Vec<Enemy> {
    let mut enemies = Vec::with_capacity(ENEMY_ROWS * ENEMY_COLS);
    for row in 0..ENEMY_ROWS {
        for col in 0..ENEMY_COLS {
            enemies.push(Enemy {
                x: ENEMY_OFFSET.0 + col as f32 * (ENEMY_WIDTH + ENEMY_PADDING),
                y: ENEMY_OFFSET.1 + row as f32 * (ENEMY_HEIGHT + ENEMY_PADDING),
                alive: true,
            });
        }
    }
    enemies
}

impl SpaceInvaders {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_rng(bounds, StdRng::from_entropy())
    }

    pub fn with_seed(bounds: Bounds, seed: u64) -> Self {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: Bounds, rng: StdRng) -> Self {
        Self {
            bounds,
            player_y: bounds.height - 50.0,
            rng,
            state: Self::initial_state(bounds),
        }
    }

    fn initial_state(bounds: Bounds) -> State {
        State {
            player_x: (bounds.width - PLAYER_WIDTH) / 2.0,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: formation(),
            enemy_speed: ENEMY_SPEED,
            enemy_direction: 1.0,
            last_bullet_time: 0.0,
            last_enemy_bullet_time: 0.0,
            enemy_bullet_delay: ENEMY_FIRE_MS,
            score: 0,
            wave: 1,
            game_over: false,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    fn player_rect(&self) -> Aabb {
        Aabb::new(self.state.player_x, self.player_y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    fn move_player(&mut self, delta_ms: f32, ctx: &GameContext<'_>) {
        let input = ctx.input;
        let s = &mut self.state;
        if input.is_key_pressed("arrowleft") || input.is_key_pressed("a") {
            s.player_x -= PLAYER_SPEED * delta_ms;
        }
        if input.is_key_pressed("arrowright") || input.is_key_pressed("d") {
            s.player_x += PLAYER_SPEED * delta_ms;
        }
        s.player_x = clamp(s.player_x, 0.0, self.bounds.width - PLAYER_WIDTH);

        s.last_bullet_time += delta_ms;
        let firing = input.is_key_pressed(" ") || input.is_key_pressed("arrowup");
        if firing && s.last_bullet_time >= FIRE_COOLDOWN_MS {
            s.bullets.push(Bullet {
                x: s.player_x + PLAYER_WIDTH / 2.0,
                y: self.player_y,
            });
            s.last_bullet_time = 0.0;
        }
    }

    /// Slides the formation; reaching the edge it is heading for reverses it
    /// and steps every live enemy down once. Returns true if the formation
    /// reached the player.
    fn march(&mut self, delta_ms: f32) -> bool {
        let width = self.bounds.width;
        let s = &mut self.state;
        let dir = s.enemy_direction;
        let mut at_edge = false;
        for enemy in s.enemies.iter_mut().filter(|e| e.alive) {
            enemy.x += s.enemy_speed * dir * delta_ms;
            // an enemy already past the edge it left behind must not flip again
            if (dir > 0.0 && enemy.x + ENEMY_WIDTH >= width) || (dir < 0.0 && enemy.x <= 0.0) {
                at_edge = true;
            }
        }
        if !at_edge {
            return false;
        }

        s.enemy_direction = -s.enemy_direction;
        let mut landed = false;
        for enemy in s.enemies.iter_mut().filter(|e| e.alive) {
            enemy.y += STEP_DOWN;
            landed |= enemy.y + ENEMY_HEIGHT >= self.player_y;
        }
        landed
    }

    fn enemy_fire(&mut self, delta_ms: f32) {
        let s = &mut self.state;
        s.last_enemy_bullet_time += delta_ms;
        if s.last_enemy_bullet_time < s.enemy_bullet_delay {
            return;
        }
        let alive: Vec<&Enemy> = s.enemies.iter().filter(|e| e.alive).collect();
        if let Some(shooter) = alive.choose(&mut self.rng) {
            s.enemy_bullets.push(Bullet {
                x: shooter.x + ENEMY_WIDTH / 2.0,
                y: shooter.y + ENEMY_HEIGHT,
            });
        }
        s.last_enemy_bullet_time = 0.0;
        s.enemy_bullet_delay =
            (ENEMY_FIRE_MS - s.wave as f32 * ENEMY_FIRE_STEP_MS).max(MIN_ENEMY_FIRE_MS);
    }

    fn move_bullets(&mut self, delta_ms: f32) {
        let height = self.bounds.height;
        let s = &mut self.state;
        s.bullets.retain_mut(|b| {
            b.y -= PLAYER_BULLET_SPEED * delta_ms;
            b.y > 0.0
        });
        s.enemy_bullets.retain_mut(|b| {
            b.y += ENEMY_BULLET_SPEED * delta_ms;
            b.y < height
        });
    }

    /// Each player bullet is consumed by the first live enemy it touches.
    fn resolve_hits(&mut self, chrome: &mut dyn Chrome) {
        let s = &mut self.state;
        let before = s.score;
        let enemies = &mut s.enemies;
        let mut kills = 0;
        s.bullets.retain(|bullet| {
            let rect = bullet.rect();
            match enemies.iter_mut().find(|e| e.alive && e.rect().intersects(&rect)) {
                Some(enemy) => {
                    enemy.alive = false;
                    kills += 1;
                    false
                }
                None => true,
            }
        });
        s.score += kills * ENEMY_POINTS;
        if s.score != before {
            chrome.update_score(Score::Points(s.score));
        }
    }

    fn player_hit(&self) -> bool {
        let player = self.player_rect();
        self.state.enemy_bullets.iter().any(|b| b.rect().intersects(&player))
    }

    fn next_wave(&mut self) {
        let s = &mut self.state;
        s.wave += 1;
        s.enemy_speed += WAVE_SPEEDUP;
        s.enemies = formation();
        log::info!("space invaders wave {}", s.wave);
    }

    fn end_game(&mut self, chrome: &mut dyn Chrome) {
        self.state.game_over = true;
        chrome.show_overlay(
            "Game Over!",
            &format!("Final Score: {} | Wave: {}", self.state.score, self.state.wave),
        );
    }
}

impl Game for SpaceInvaders {
    fn name(&self) -> &'static str {
        "Space Invaders"
    }

    fn reset(&mut self) {
        self.state = Self::initial_state(self.bounds);
    }

    fn update(&mut self, delta_ms: f32, ctx: &mut GameContext<'_>) {
        if self.state.game_over {
            return;
        }
        self.move_player(delta_ms, ctx);
        if self.march(delta_ms) {
            self.end_game(&mut *ctx.chrome);
            return;
        }
        self.enemy_fire(delta_ms);
        self.move_bullets(delta_ms);
        self.resolve_hits(&mut *ctx.chrome);
        if self.player_hit() {
            self.end_game(&mut *ctx.chrome);
            return;
        }
        if self.state.enemies.iter().all(|e| !e.alive) {
            self.next_wave();
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (w, h) = (surface.width(), surface.height());
        surface.fill_rect(0.0, 0.0, w, h, BACKDROP);
        for i in 0..STARS {
            let x = (i as f32 * 37.0) % w;
            let y = (i as f32 * 73.0) % h;
            surface.fill_circle(x, y, 1.0, Color::White);
        }

        let px = self.state.player_x;
        surface.fill_rect(px, self.player_y, PLAYER_WIDTH, PLAYER_HEIGHT, PLAYER_COLOR);
        surface.fill_rect(px + 10.0, self.player_y - 5.0, 30.0, 5.0, PLAYER_COLOR);

        for b in &self.state.bullets {
            let r = b.rect();
            surface.fill_rect(r.x, r.y, r.w, r.h, Color::Rgb(255, 255, 0));
        }
        for e in self.state.enemies.iter().filter(|e| e.alive) {
            surface.fill_rect(e.x, e.y, ENEMY_WIDTH, ENEMY_HEIGHT, ENEMY_COLOR);
            surface.fill_rect(e.x + 5.0, e.y + 5.0, 10.0, 10.0, Color::White);
            surface.fill_rect(e.x + 25.0, e.y + 5.0, 10.0, 10.0, Color::White);
        }
        for b in &self.state.enemy_bullets {
            let r = b.rect();
            surface.fill_rect(r.x, r.y, r.w, r.h, Color::Rgb(255, 0, 0));
        }

        surface.fill_text(&format!("Wave: {}", self.state.wave), 20.0, 30.0, Color::White, Align::Left);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::Harness;
    use crossterm::event::KeyCode;

    fn invaders() -> SpaceInvaders {
        SpaceInvaders::with_seed(Bounds::default(), 5)
    }

    fn keep_only(game: &mut SpaceInvaders, idx: usize) {
        for (i, e) in game.state.enemies.iter_mut().enumerate() {
            e.alive = i == idx;
        }
    }

    fn bullet_on(enemy: &Enemy) -> Bullet {
        Bullet {
            x: enemy.x + ENEMY_WIDTH / 2.0,
            y: enemy.y + 5.0,
        }
    }

    #[test]
    fn zero_delta_is_idempotent() {
        let mut game = invaders();
        let mut h = Harness::new();
        let before = game.state().clone();
        h.step(&mut game, 0.0);
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn formation_reverses_and_steps_down_at_the_edge() {
        let mut game = invaders();
        keep_only(&mut game, 7);
        game.state.enemies[7].x = 800.0 - ENEMY_WIDTH - 0.5;
        let y = game.state.enemies[7].y;

        let mut h = Harness::new();
        h.step(&mut game, 20.0);

        let s = game.state();
        assert_eq!(s.enemy_direction, -1.0);
        assert_eq!(s.enemies[7].y, y + STEP_DOWN);
        // dead enemies stay put
        assert_eq!(s.enemies[0].y, 50.0);

        h.step(&mut game, 20.0);
        assert_eq!(game.state().enemies[7].y, y + STEP_DOWN);
        assert!(game.state().enemies[7].x < 800.0 - ENEMY_WIDTH);
    }

    #[test]
    fn long_frame_past_the_edge_steps_down_once() {
        let mut game = invaders();
        keep_only(&mut game, 7);
        game.state.enemies[7].x = 759.0;
        let y = game.state.enemies[7].y;

        let mut h = Harness::new();
        h.step(&mut game, 50.0);
        for _ in 0..5 {
            h.step(&mut game, 16.0);
        }

        let s = game.state();
        assert_eq!(s.enemies[7].y, y + STEP_DOWN);
        assert_eq!(s.enemy_direction, -1.0);
        assert!(s.enemies[7].x < 759.0);
    }

    #[test]
    fn left_edge_steps_down_once_then_heads_right() {
        let mut game = invaders();
        keep_only(&mut game, 0);
        game.state.enemies[0].x = 1.0;
        game.state.enemy_direction = -1.0;
        let y = game.state.enemies[0].y;

        let mut h = Harness::new();
        h.step(&mut game, 60.0);
        h.step(&mut game, 10.0);
        h.step(&mut game, 10.0);

        let s = game.state();
        assert_eq!(s.enemies[0].y, y + STEP_DOWN);
        assert_eq!(s.enemy_direction, 1.0);
    }

    #[test]
    fn formation_reaching_the_player_ends_the_game() {
        let mut game = invaders();
        keep_only(&mut game, 0);
        game.state.enemies[0].x = 0.5;
        game.state.enemies[0].y = 510.0;
        game.state.enemy_direction = -1.0;

        let mut h = Harness::new();
        h.step(&mut game, 20.0);
        assert!(game.is_game_over());
    }

    #[test]
    fn bullet_destroys_one_enemy() {
        let mut game = invaders();
        // stack a second enemy on top of the first
        game.state.enemies[1].x = game.state.enemies[0].x;
        game.state.bullets.push(bullet_on(&game.state.enemies[0]));

        let mut h = Harness::new();
        h.step(&mut game, 0.0);

        let s = game.state();
        assert!(!s.enemies[0].alive);
        assert!(s.enemies[1].alive);
        assert!(s.bullets.is_empty());
        assert_eq!(s.score, 10);
        assert_eq!(h.chrome.score, Score::Points(10));
    }

    #[test]
    fn clearing_a_wave_respawns_faster() {
        let mut game = invaders();
        keep_only(&mut game, 12);
        game.state.bullets.push(bullet_on(&game.state.enemies[12]));

        let mut h = Harness::new();
        h.step(&mut game, 0.0);

        let s = game.state();
        assert_eq!(s.wave, 2);
        assert!((s.enemy_speed - 0.06).abs() < 1e-6);
        assert_eq!(s.enemies.iter().filter(|e| e.alive).count(), 40);
        assert_eq!(s.score, 10);
    }

    #[test]
    fn enemy_bullet_on_the_player_ends_the_game() {
        let mut game = invaders();
        let px = game.state.player_x;
        game.state.enemy_bullets.push(Bullet { x: px + 25.0, y: 555.0 });

        let mut h = Harness::new();
        h.step(&mut game, 0.0);

        assert!(game.is_game_over());
        let overlay = h.chrome.overlay.as_ref().unwrap();
        assert_eq!(overlay.message, "Final Score: 0 | Wave: 1");
    }

    #[test]
    fn fire_respects_the_cooldown() {
        let mut game = invaders();
        let mut h = Harness::new();
        h.press(KeyCode::Char(' '));
        h.step(&mut game, 100.0);
        assert!(game.state().bullets.is_empty());
        h.step(&mut game, 200.0);
        assert_eq!(game.state().bullets.len(), 1);
        h.step(&mut game, 100.0);
        assert_eq!(game.state().bullets.len(), 1);
    }

    #[test]
    fn enemy_fire_delay_shrinks_with_the_wave() {
        let mut game = invaders();
        let mut h = Harness::new();
        h.step(&mut game, 1999.0);
        assert!(game.state().enemy_bullets.is_empty());
        h.step(&mut game, 1.0);
        assert_eq!(game.state().enemy_bullets.len(), 1);
        assert_eq!(game.state().enemy_bullet_delay, 1800.0);
    }
}
