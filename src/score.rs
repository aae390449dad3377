//! Running score plus the best score on record.

use crate::entities::Vector2;
use crate::persistence::ScoreService;
use crate::surface::{Color, Draw, Surface};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Score {
    score: u32,
    high_score: Option<u32>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new game and ask the store for the best score so far.
    /// The answer arrives later through [`receive_high_score`](Self::receive_high_score).
    pub fn start(&mut self, service: &ScoreService) {
        self.score = 0;
        service.fetch_high_score();
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> Option<u32> {
        self.high_score
    }

    /// Record a high score reported by the store.  The shown value never goes
    /// down.
    pub fn receive_high_score(&mut self, high_score: u32) {
        self.high_score = Some(self.high_score.map_or(high_score, |hs| hs.max(high_score)));
    }
}

impl Draw for Score {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_text("SCORE", Vector2::new(20.0, 30.0), Color::White);
        surface.fill_text(&format!("{:04}", self.score), Vector2::new(20.0, 60.0), Color::Green);
        surface.fill_text("HI-SCORE", Vector2::new(380.0, 30.0), Color::White);
        if let Some(high_score) = self.high_score {
            surface.fill_text(
                &format!("{high_score:04}"),
                Vector2::new(380.0, 60.0),
                Color::Green,
            );
        }
    }
}
