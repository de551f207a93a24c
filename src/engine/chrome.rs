//! Notifications from the games to the surrounding chrome: score display and
//! the win/loss overlay.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Score {
    Points(u32),
    /// Head-to-head tally, e.g. Pong's `player - ai`.
    Versus(u32, u32),
}

impl Default for Score {
    fn default() -> Self {
        Score::Points(0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Points(n) => write!(f, "{}", group_thousands(*n)),
            Score::Versus(a, b) => write!(f, "{a} - {b}"),
        }
    }
}

fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlay {
    pub title: String,
    pub message: String,
}

/// Fire-and-forget sink; games never wait on it.
pub trait Chrome {
    fn update_score(&mut self, score: Score);
    fn show_overlay(&mut self, title: &str, message: &str);
    fn hide_overlay(&mut self);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageChrome {
    pub score: Score,
    pub overlay: Option<Overlay>,
}

impl PageChrome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.score = Score::default();
        self.overlay = None;
    }
}

impl Chrome for PageChrome {
    fn update_score(&mut self, score: Score) {
        self.score = score;
    }

    fn show_overlay(&mut self, title: &str, message: &str) {
        log::info!("{title} {message}");
        self.overlay = Some(Overlay {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn hide_overlay(&mut self) {
        self.overlay = None;
    }
}
