//! Frame loop driver.
//!
//! The driver is either idle (no game bound) or running one game. Every tick
//! from the event thread becomes one [`LoopDriver::frame`]: update with the
//! elapsed time, clear the surface, render.

use std::time::Instant;

use crate::games::{Game, GameContext};

use super::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

pub struct LoopDriver {
    game: Option<Box<dyn Game>>,
    last_frame: Option<Instant>,
    max_delta_ms: Option<f32>,
}

impl LoopDriver {
    /// `max_delta_ms` caps the elapsed time handed to a game in one frame.
    pub fn new(max_delta_ms: Option<f32>) -> Self {
        Self {
            game: None,
            last_frame: None,
            max_delta_ms,
        }
    }

    pub fn state(&self) -> LoopState {
        if self.game.is_some() {
            LoopState::Running
        } else {
            LoopState::Idle
        }
    }

    pub fn start(&mut self, game: Box<dyn Game>, now: Instant) {
        log::info!("loop started: {}", game.name());
        self.game = Some(game);
        self.last_frame = Some(now);
    }

    /// Unbinds the game. Ticks that arrive afterwards are dropped.
    pub fn stop(&mut self) -> Option<Box<dyn Game>> {
        self.last_frame = None;
        let game = self.game.take();
        if let Some(game) = &game {
            log::info!("loop stopped: {}", game.name());
        }
        game
    }

    pub fn game(&self) -> Option<&dyn Game> {
        self.game.as_deref()
    }

    pub fn game_mut(&mut self) -> Option<&mut (dyn Game + 'static)> {
        self.game.as_deref_mut()
    }

    /// Runs one update/render pair. Returns the delta that was applied, or
    /// `None` when idle.
    pub fn frame(
        &mut self,
        now: Instant,
        surface: &mut dyn Surface,
        ctx: &mut GameContext<'_>,
    ) -> Option<f32> {
        let game = self.game.as_mut()?;
        let last = self.last_frame.unwrap_or(now);
        let raw_ms = now.saturating_duration_since(last).as_secs_f32() * 1000.0;
        let delta_ms = match self.max_delta_ms {
            Some(max) if raw_ms > max => {
                log::debug!("frame delta {raw_ms:.1}ms clamped to {max}ms");
                max
            }
            _ => raw_ms,
        };
        self.last_frame = Some(now);

        game.update(delta_ms, ctx);
        surface.clear();
        game.render(surface);
        Some(delta_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc;
    use std::time::Duration;

    use ratatui::style::Color;

    use crate::engine::chrome::PageChrome;
    use crate::engine::input::InputState;
    use crate::engine::surface::{Align, Bounds, Canvas};
    use crate::engine::timer::TimerQueue;

    #[derive(Default)]
    struct Probe {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl Game for Probe {
        fn name(&self) -> &'static str {
            "Probe"
        }
        fn reset(&mut self) {}
        fn update(&mut self, delta_ms: f32, _ctx: &mut GameContext<'_>) {
            self.calls.borrow_mut().push(format!("update {delta_ms:.0}"));
        }
        fn render(&self, surface: &mut dyn Surface) {
            self.calls.borrow_mut().push("render".to_string());
            surface.fill_text("probe", 0.0, 0.0, Color::White, Align::Left);
        }
        fn get_score(&self) -> u32 {
            0
        }
        fn is_game_over(&self) -> bool {
            false
        }
    }

    fn run_frame(driver: &mut LoopDriver, canvas: &mut Canvas, now: Instant) -> Option<f32> {
        let input = InputState::new(Bounds::default(), None);
        let mut chrome = PageChrome::new();
        let (tx, _rx) = mpsc::channel();
        let timers = TimerQueue::new(tx);
        let mut ctx = GameContext {
            input: &input,
            chrome: &mut chrome,
            timers: &timers,
        };
        driver.frame(now, canvas, &mut ctx)
    }

    #[test]
    fn update_precedes_render_and_surface_is_cleared() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let t0 = Instant::now();
        let mut driver = LoopDriver::new(None);
        driver.start(Box::new(Probe { calls: Rc::clone(&calls) }), t0);
        assert_eq!(driver.state(), LoopState::Running);

        let mut canvas = Canvas::new();
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, Color::Red);
        let delta = run_frame(&mut driver, &mut canvas, t0 + Duration::from_millis(16));

        assert!((delta.unwrap() - 16.0).abs() < 1e-3);
        assert_eq!(*calls.borrow(), vec!["update 16".to_string(), "render".to_string()]);
        assert_eq!(canvas.commands().len(), 1);
    }

    #[test]
    fn large_deltas_are_clamped() {
        let t0 = Instant::now();
        let mut driver = LoopDriver::new(Some(100.0));
        driver.start(Box::new(Probe::default()), t0);
        let mut canvas = Canvas::new();
        let delta = run_frame(&mut driver, &mut canvas, t0 + Duration::from_secs(30));
        assert_eq!(delta, Some(100.0));
    }

    #[test]
    fn stopped_driver_ignores_ticks() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let t0 = Instant::now();
        let mut driver = LoopDriver::new(None);
        driver.start(Box::new(Probe { calls: Rc::clone(&calls) }), t0);
        assert!(driver.stop().is_some());
        assert_eq!(driver.state(), LoopState::Idle);

        let mut canvas = Canvas::new();
        assert_eq!(run_frame(&mut driver, &mut canvas, t0 + Duration::from_millis(16)), None);
        assert!(calls.borrow().is_empty());
        assert!(canvas.is_empty());
    }
}
