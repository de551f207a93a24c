use crate::games::GameId;

const NUM_GAMES: usize = 6;

/// Best score per game for the lifetime of the process.
#[derive(Clone, Debug, Default)]
pub struct SessionBests {
    best: [u32; NUM_GAMES],
    /// A finished round is recorded once, then ignored until it is restarted.
    submitted: [bool; NUM_GAMES],
}

impl SessionBests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self, id: GameId) -> u32 {
        self.best[id.index()]
    }

    /// Feed the active game's progress once per frame. Returns true when a
    /// finished round set a new best.
    pub fn observe(&mut self, id: GameId, game_over: bool, score: u32) -> bool {
        let idx = id.index();
        if !game_over {
            self.submitted[idx] = false;
            return false;
        }
        if self.submitted[idx] {
            return false;
        }
        self.submitted[idx] = true;
        if score > self.best[idx] {
            log::info!("new best for {id}: {score}");
            self.best[idx] = score;
            return true;
        }
        false
    }

    /// Forget the in-progress round, e.g. when the game is torn down.
    pub fn clear_submitted(&mut self, id: GameId) {
        self.submitted[id.index()] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_round_is_recorded_once() {
        let mut bests = SessionBests::new();
        assert!(!bests.observe(GameId::Snake, false, 30));
        assert!(bests.observe(GameId::Snake, true, 30));
        assert!(!bests.observe(GameId::Snake, true, 30));
        assert_eq!(bests.best(GameId::Snake), 30);
        assert_eq!(bests.best(GameId::Pong), 0);
    }

    #[test]
    fn lower_score_keeps_the_best() {
        let mut bests = SessionBests::new();
        bests.observe(GameId::Tetris, true, 500);
        bests.observe(GameId::Tetris, false, 0);
        assert!(!bests.observe(GameId::Tetris, true, 100));
        assert_eq!(bests.best(GameId::Tetris), 500);
    }
}
