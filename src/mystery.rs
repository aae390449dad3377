//! The bonus ship that now and then crosses the top of the board.

use rand::Rng;
use tracing::debug;

use crate::collision::{intersects, Rect};
use crate::constants::{
    BOARD_WIDTH, MYSTERY_HEIGHT, MYSTERY_LEFT_START, MYSTERY_POINTS_MAX, MYSTERY_POINTS_MIN,
    MYSTERY_RIGHT_START, MYSTERY_SPAWN_MAX, MYSTERY_SPAWN_MIN, MYSTERY_SPEED, MYSTERY_WIDTH,
    MYSTERY_Y, PLAYGROUND_OFFSET,
};
use crate::context::{Context, Sound};
use crate::effects::Explosions;
use crate::entities::{Direction, ExplosionKind, Vector2};
use crate::score::Score;
use crate::surface::{Draw, Sprite, Surface};

/// The engine hum plays on every third tick of flight.
const MOVE_SOUND_PERIOD: u32 = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct MysteryShip {
    pub position: Vector2,
    pub direction: Direction,
    pub removed: bool,
    /// Left the board instead of being shot down.
    pub reached_border: bool,
}

impl MysteryShip {
    pub fn new(position: Vector2, direction: Direction) -> Self {
        Self {
            position,
            direction,
            removed: false,
            reached_border: false,
        }
    }

    /// A ship entering from the side opposite to `direction`.
    pub fn entering(direction: Direction) -> Self {
        let x = match direction {
            Direction::Left => MYSTERY_RIGHT_START,
            Direction::Right => MYSTERY_LEFT_START,
        };
        Self::new(Vector2::new(x, MYSTERY_Y), direction)
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.position, MYSTERY_WIDTH, MYSTERY_HEIGHT)
    }

    pub fn update(&mut self) {
        self.position.x += MYSTERY_SPEED * self.direction.sign();
        if self.position.x < PLAYGROUND_OFFSET
            || self.position.x + MYSTERY_WIDTH > BOARD_WIDTH - PLAYGROUND_OFFSET
        {
            self.removed = true;
            self.reached_border = true;
        }
    }
}

impl Draw for MysteryShip {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.draw_sprite(Sprite::MysteryShip, self.bounds());
    }
}

/// How much a downed ship is worth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BonusPoints {
    Fixed(u32),
    /// Uniform in `min..=max`.
    Random { min: u32, max: u32 },
}

impl Default for BonusPoints {
    fn default() -> Self {
        BonusPoints::Random {
            min: MYSTERY_POINTS_MIN,
            max: MYSTERY_POINTS_MAX,
        }
    }
}

impl BonusPoints {
    pub fn roll(self, rng: &mut dyn rand::RngCore) -> u32 {
        match self {
            BonusPoints::Fixed(points) => points,
            BonusPoints::Random { min, max } => rng.gen_range(min..=max),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MysteryShips {
    ship: Option<MysteryShip>,
    explosions: Explosions,
    /// Ticks until the next ship appears; only runs while none is flying.
    countdown: u32,
    hum: u32,
    bonus: BonusPoints,
}

impl MysteryShips {
    pub fn new(bonus: BonusPoints) -> Self {
        Self {
            bonus,
            ..Self::default()
        }
    }

    pub fn start(&mut self, rng: &mut dyn rand::RngCore) {
        self.ship = None;
        self.explosions.clear();
        self.countdown = rng.gen_range(MYSTERY_SPAWN_MIN..=MYSTERY_SPAWN_MAX);
        self.hum = 0;
    }

    pub fn ship(&self) -> Option<&MysteryShip> {
        self.ship.as_ref()
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn explosions(&self) -> &Explosions {
        &self.explosions
    }

    /// Put a ship on the board now, replacing any ship already flying.
    pub fn launch(&mut self, ship: MysteryShip) {
        debug!(x = ship.position.x, direction = ?ship.direction, "mystery ship launched");
        self.ship = Some(ship);
    }

    /// Flag the flying ship if `missile` overlaps it.
    pub fn mystery_ships_hit(&mut self, missile: Rect) -> bool {
        match self.ship.as_mut() {
            Some(ship) if !ship.removed && intersects(ship.bounds(), missile) => {
                ship.removed = true;
                true
            }
            _ => false,
        }
    }

    pub fn update(&mut self, ctx: &mut Context, score: &mut Score) {
        if self.ship.is_none() {
            self.countdown = self.countdown.saturating_sub(1);
            if self.countdown == 0 {
                let direction = if ctx.rng.gen_bool(0.5) {
                    Direction::Left
                } else {
                    Direction::Right
                };
                self.launch(MysteryShip::entering(direction));
                self.countdown = ctx.rng.gen_range(MYSTERY_SPAWN_MIN..=MYSTERY_SPAWN_MAX);
            }
        }

        if let Some(ship) = self.ship.as_mut() {
            self.hum = (self.hum + 1) % MOVE_SOUND_PERIOD;
            if self.hum == 0 {
                ctx.audio.play(Sound::MysteryShipMove);
            }
            if !ship.removed {
                ship.update();
            }
        }

        let finished = self.ship.as_ref().is_some_and(|ship| ship.removed);
        if let Some(ship) = finished.then(|| self.ship.take()).flatten() {
            if ship.reached_border {
                debug!("mystery ship escaped");
            } else {
                let points = self.bonus.roll(&mut *ctx.rng);
                self.explosions
                    .spawn(ExplosionKind::Ship { points }, ship.position);
                score.add_score(points);
                ctx.audio.play(Sound::MysteryShipExplosion);
                debug!(points, "mystery ship shot down");
            }
        }

        self.explosions.update();
    }
}

impl Draw for MysteryShips {
    fn draw(&self, surface: &mut dyn Surface) {
        if let Some(ship) = &self.ship {
            if !ship.removed {
                ship.draw(surface);
            }
        }
        self.explosions.draw(surface);
    }
}
