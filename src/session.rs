//! Binds a chosen game to the loop driver.
//!
//! Only one game lives at a time. Switching tears the old instance down
//! (`cleanup`, then `stop`) before the replacement is constructed, so a
//! stale timer or queued tick can never reach it.

use std::time::Instant;

use crate::engine::{Bounds, Chrome, LoopDriver, LoopState, PageChrome, Surface, TimerId};
use crate::games::{Game, GameContext, GameId};
use crate::scores::SessionBests;

pub struct Session {
    bounds: Bounds,
    driver: LoopDriver,
    active: Option<GameId>,
    bests: SessionBests,
}

impl Session {
    pub fn new(bounds: Bounds, max_delta_ms: Option<f32>) -> Self {
        Self {
            bounds,
            driver: LoopDriver::new(max_delta_ms),
            active: None,
            bests: SessionBests::new(),
        }
    }

    pub fn active(&self) -> Option<GameId> {
        self.active
    }

    pub fn state(&self) -> LoopState {
        self.driver.state()
    }

    pub fn game(&self) -> Option<&dyn Game> {
        self.driver.game()
    }

    pub fn bests(&self) -> &SessionBests {
        &self.bests
    }

    pub fn select(&mut self, id: GameId, now: Instant, chrome: &mut PageChrome) {
        self.close();
        let game = id.create(self.bounds);
        self.install(id, game, now, chrome);
    }

    /// Starts an already constructed game under `id`.
    pub fn install(&mut self, id: GameId, game: Box<dyn Game>, now: Instant, chrome: &mut PageChrome) {
        self.close();
        chrome.reset();
        chrome.update_score(game.initial_score());
        self.driver.start(game, now);
        self.active = Some(id);
    }

    /// Tear down the running game, if any, and go idle.
    pub fn close(&mut self) {
        if let Some(game) = self.driver.game_mut() {
            game.cleanup();
        }
        self.driver.stop();
        if let Some(id) = self.active.take() {
            self.bests.clear_submitted(id);
        }
    }

    pub fn frame(&mut self, now: Instant, surface: &mut dyn Surface, ctx: &mut GameContext<'_>) -> Option<f32> {
        let delta = self.driver.frame(now, surface, ctx)?;
        if let (Some(id), Some(game)) = (self.active, self.driver.game()) {
            self.bests.observe(id, game.is_game_over(), game.get_score());
        }
        Some(delta)
    }

    pub fn dispatch_timer(&mut self, id: TimerId, chrome: &mut dyn Chrome) {
        match self.driver.game_mut() {
            Some(game) => game.on_timer(id, chrome),
            None => log::trace!("timer {} fired with no game bound", id.0),
        }
    }

    pub fn restart(&mut self, chrome: &mut dyn Chrome) {
        if let Some(game) = self.driver.game_mut() {
            log::info!("restarting {}", game.name());
            game.restart(chrome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use crossterm::event::KeyCode;
    use ratatui::style::Color;

    use crate::engine::{Align, Canvas, Score};
    use crate::games::testing::Harness;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        tag: &'static str,
        log: Log,
    }

    impl Game for Probe {
        fn name(&self) -> &'static str {
            self.tag
        }
        fn reset(&mut self) {}
        fn update(&mut self, _delta_ms: f32, _ctx: &mut GameContext<'_>) {
            self.log.borrow_mut().push(format!("{} update", self.tag));
        }
        fn render(&self, surface: &mut dyn Surface) {
            surface.fill_text(self.tag, 0.0, 0.0, Color::White, Align::Left);
        }
        fn cleanup(&mut self) {
            self.log.borrow_mut().push(format!("{} cleanup", self.tag));
        }
        fn on_timer(&mut self, id: TimerId, _chrome: &mut dyn Chrome) {
            self.log.borrow_mut().push(format!("{} timer {}", self.tag, id.0));
        }
        fn get_score(&self) -> u32 {
            0
        }
        fn is_game_over(&self) -> bool {
            false
        }
    }

    fn probe(tag: &'static str, log: &Log) -> Box<dyn Game> {
        Box::new(Probe { tag, log: Rc::clone(log) })
    }

    fn run_frame(session: &mut Session, h: &mut Harness, now: Instant) -> Option<f32> {
        let mut canvas = Canvas::new();
        let mut ctx = GameContext {
            input: &h.input,
            chrome: &mut h.chrome,
            timers: &h.timers,
        };
        session.frame(now, &mut canvas, &mut ctx)
    }

    #[test]
    fn swapping_cleans_up_the_old_game_first() {
        let log: Log = Rc::default();
        let mut h = Harness::new();
        let mut session = Session::new(Bounds::default(), None);
        let t0 = Instant::now();

        session.install(GameId::Snake, probe("A", &log), t0, &mut h.chrome);
        session.install(GameId::Pong, probe("B", &log), t0, &mut h.chrome);

        assert_eq!(*log.borrow(), vec!["A cleanup".to_string()]);
        assert_eq!(session.game().map(|g| g.name()), Some("B"));
        assert_eq!(session.active(), Some(GameId::Pong));

        run_frame(&mut session, &mut h, t0 + Duration::from_millis(16));
        assert_eq!(log.borrow().last().map(String::as_str), Some("B update"));
    }

    #[test]
    fn idle_session_ignores_ticks_and_timers() {
        let log: Log = Rc::default();
        let mut h = Harness::new();
        let mut session = Session::new(Bounds::default(), None);
        let t0 = Instant::now();
        session.install(GameId::Snake, probe("A", &log), t0, &mut h.chrome);
        session.close();

        assert_eq!(session.state(), LoopState::Idle);
        assert_eq!(session.active(), None);
        assert_eq!(run_frame(&mut session, &mut h, t0 + Duration::from_millis(16)), None);
        session.dispatch_timer(TimerId(1), &mut h.chrome);
        assert_eq!(*log.borrow(), vec!["A cleanup".to_string()]);
    }

    #[test]
    fn timers_reach_the_bound_game() {
        let log: Log = Rc::default();
        let mut h = Harness::new();
        let mut session = Session::new(Bounds::default(), None);
        session.install(GameId::Memory, probe("A", &log), Instant::now(), &mut h.chrome);
        session.dispatch_timer(TimerId(7), &mut h.chrome);
        assert_eq!(*log.borrow(), vec!["A timer 7".to_string()]);
    }

    #[test]
    fn selecting_resets_the_chrome() {
        let mut h = Harness::new();
        let mut session = Session::new(Bounds::default(), None);
        h.chrome.show_overlay("Game Over!", "Final Score: 10");
        session.select(GameId::Breakout, Instant::now(), &mut h.chrome);
        assert!(h.chrome.overlay.is_none());
        assert_eq!(session.game().map(|g| g.name()), Some("Breakout"));
    }

    #[test]
    fn leaving_memory_cancels_its_pending_check() {
        let mut h = Harness::new();
        let mut session = Session::new(Bounds::default(), None);
        let t0 = Instant::now();
        session.select(GameId::Memory, t0, &mut h.chrome);

        // flip the two top-left cards
        let mut now = t0;
        for (x, y) in [(205.0, 105.0), (335.0, 105.0)] {
            h.click(x, y);
            now += Duration::from_millis(16);
            run_frame(&mut session, &mut h, now);
            h.input.end_frame(16.0);
        }

        session.select(GameId::Snake, now, &mut h.chrome);
        assert!(h.rx.recv_timeout(Duration::from_millis(1500)).is_err());
    }

    #[test]
    fn selecting_pong_shows_a_versus_score() {
        let mut h = Harness::new();
        let mut session = Session::new(Bounds::default(), None);
        session.select(GameId::Snake, Instant::now(), &mut h.chrome);
        assert_eq!(h.chrome.score, Score::Points(0));
        session.select(GameId::Pong, Instant::now(), &mut h.chrome);
        assert_eq!(h.chrome.score, Score::Versus(0, 0));
    }

    #[test]
    fn restart_hides_the_overlay() {
        let mut h = Harness::new();
        let mut session = Session::new(Bounds::default(), None);
        let t0 = Instant::now();
        session.select(GameId::Snake, t0, &mut h.chrome);
        h.press(KeyCode::Up);
        let mut now = t0;
        for _ in 0..12 {
            now += Duration::from_millis(100);
            run_frame(&mut session, &mut h, now);
            now += Duration::from_millis(60);
            run_frame(&mut session, &mut h, now);
        }
        assert!(session.game().is_some_and(|g| g.is_game_over()));
        assert!(h.chrome.overlay.is_some());

        session.restart(&mut h.chrome);
        assert!(h.chrome.overlay.is_none());
        assert!(session.game().is_some_and(|g| !g.is_game_over()));
    }
}
