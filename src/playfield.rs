//! Everything on the board during play, updated together once per tick.

use rand::RngCore;
use tracing::info;

use crate::aliens::Formation;
use crate::cannons::Cannons;
use crate::cities::Cities;
use crate::collision::Rect;
use crate::constants::{BOARD_WIDTH, GROUND_Y};
use crate::context::Context;
use crate::mystery::{BonusPoints, MysteryShips};
use crate::persistence::ScoreService;
use crate::score::Score;
use crate::surface::{Draw, Sprite, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    Continue,
    /// The last cannon is gone or an alien reached the cannon.
    GameOver,
}

#[derive(Clone, Debug, Default)]
pub struct Playfield {
    pub score: Score,
    pub cities: Cities,
    pub formation: Formation,
    pub mystery: MysteryShips,
    pub cannons: Cannons,
    wave: u32,
}

impl Playfield {
    pub fn new(bonus: BonusPoints) -> Self {
        Self {
            mystery: MysteryShips::new(bonus),
            ..Self::default()
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Reset every subsystem for a new game.
    pub fn start(&mut self, rng: &mut dyn RngCore, scores: &ScoreService) {
        self.score.start(scores);
        self.cities.start();
        self.formation.start();
        self.mystery.start(rng);
        self.cannons.start();
        self.wave = 1;
        info!("game started");
    }

    pub fn update(&mut self, ctx: &mut Context) -> PlayOutcome {
        let Self {
            score,
            cities,
            formation,
            mystery,
            cannons,
            ..
        } = self;

        cannons.update(ctx, formation, cities, mystery);
        if !cannons.respawn_pending() {
            formation.update(ctx, cannons, cities, score);
            mystery.update(ctx, score);
        }

        if formation.is_empty() {
            self.wave += 1;
            self.formation.start();
            info!(wave = self.wave, score = self.score.score(), "wave cleared");
        }

        if self.cannons.is_empty() {
            info!(score = self.score.score(), "game over");
            PlayOutcome::GameOver
        } else {
            PlayOutcome::Continue
        }
    }

    /// The board without the aliens and the mystery ship, shown behind the
    /// game-over screen.
    pub fn draw_backdrop(&self, surface: &mut dyn Surface) {
        self.cities.draw(surface);
        surface.draw_sprite(Sprite::Ground, Rect::new(0.0, GROUND_Y, BOARD_WIDTH, 3.0));
        self.cannons.draw(surface);
        self.score.draw(surface);
    }
}

impl Draw for Playfield {
    fn draw(&self, surface: &mut dyn Surface) {
        self.cities.draw(surface);
        surface.draw_sprite(Sprite::Ground, Rect::new(0.0, GROUND_Y, BOARD_WIDTH, 3.0));
        self.mystery.draw(surface);
        self.cannons.draw(surface);
        self.formation.draw(surface);
        self.score.draw(surface);
    }
}
