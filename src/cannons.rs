//! The player's cannon and the pool of lives behind it.

use tracing::debug;

use crate::aliens::Formation;
use crate::cities::Cities;
use crate::collision::{intersects, Rect};
use crate::constants::{
    ACTIVE_SLOT_X, ACTIVE_SLOT_Y, BOARD_WIDTH, CANNON_COUNT, CANNON_HEIGHT, CANNON_MUZZLE_OFFSET,
    CANNON_RESPAWN_TICKS, CANNON_SPEED, CANNON_WIDTH, CANNON_WRECK_PERIOD, RESERVE_SLOT_X,
    RESERVE_SLOT_Y,
};
use crate::context::{Audio, Context, Key, Sound};
use crate::entities::Vector2;
use crate::mystery::MysteryShips;
use crate::projectiles::Missiles;
use crate::surface::{Draw, Sprite, Surface};

// ── Cannon ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Cannon {
    pub position: Vector2,
    /// Destroyed; stays on screen as a wreck until the pool shifts it out.
    pub removed: bool,
    /// An alien reached the cannon.  Ends the game outright.
    pub captured: bool,
    missiles: Missiles,
    wreck_ticks: u32,
    explosion_played: bool,
}

impl Cannon {
    pub fn new(position: Vector2) -> Self {
        Self {
            position,
            removed: false,
            captured: false,
            missiles: Missiles::new(),
            wreck_ticks: 0,
            explosion_played: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.position, CANNON_WIDTH, CANNON_HEIGHT)
    }

    pub fn missiles(&self) -> &Missiles {
        &self.missiles
    }

    /// Which of the two wreck sprites is showing.
    pub fn wreck_frame(&self) -> u8 {
        ((self.wreck_ticks / CANNON_WRECK_PERIOD) % 2) as u8
    }

    /// Launch a missile from the muzzle.  Refused while a missile is still in
    /// flight or the cannon is destroyed.
    pub fn fire(&mut self, audio: &mut dyn Audio) -> bool {
        if self.removed || !self.missiles.is_empty() {
            return false;
        }
        let muzzle = self.position.offset(CANNON_MUZZLE_OFFSET, 0.0);
        self.missiles.fire(muzzle, audio);
        true
    }

    pub fn move_left(&mut self) {
        if !self.removed {
            self.position.x -= CANNON_SPEED;
        }
    }

    pub fn move_right(&mut self) {
        if !self.removed {
            self.position.x += CANNON_SPEED;
        }
    }

    fn stay_in_area(&mut self) {
        self.position.x = self.position.x.clamp(0.0, BOARD_WIDTH - CANNON_WIDTH);
    }

    /// Destroy the cannon if `shot` overlaps it.
    pub fn cannon_hit(&mut self, shot: Rect) -> bool {
        if self.removed || !intersects(self.bounds(), shot) {
            return false;
        }
        self.removed = true;
        debug!(x = self.position.x, "cannon destroyed");
        true
    }

    pub fn update(
        &mut self,
        ctx: &mut Context,
        formation: &mut Formation,
        cities: &mut Cities,
        ships: &mut MysteryShips,
    ) {
        if ctx.input.is_key_down(Key::Left) {
            self.move_left();
        }
        if ctx.input.is_key_down(Key::Right) {
            self.move_right();
        }
        if ctx.input.is_key_down(Key::Space) {
            self.fire(&mut *ctx.audio);
        }

        self.missiles.update(formation, cities, ships, &mut *ctx.audio);

        if formation.aliens_hit_cannon(self.position) {
            self.removed = true;
            self.captured = true;
        }
        self.stay_in_area();

        if self.removed {
            if !self.explosion_played {
                ctx.audio.play(Sound::CannonExplosion);
                self.explosion_played = true;
            }
            self.wreck_ticks += 1;
        }
    }
}

impl Draw for Cannon {
    fn draw(&self, surface: &mut dyn Surface) {
        let sprite = if self.removed {
            Sprite::CannonWreck {
                frame: self.wreck_frame(),
            }
        } else {
            Sprite::Cannon
        };
        surface.draw_sprite(sprite, self.bounds());
        self.missiles.draw(surface);
    }
}

// ── Cannon pool ──────────────────────────────────────────────────────────────

/// Three lives: the active cannon at index 0 and two reserves parked below
/// the ground line.
#[derive(Clone, Debug)]
pub struct Cannons {
    cannons: Vec<Cannon>,
    timer: u32,
}

impl Default for Cannons {
    fn default() -> Self {
        Self::new()
    }
}

impl Cannons {
    pub fn new() -> Self {
        Self {
            cannons: Vec::new(),
            timer: CANNON_RESPAWN_TICKS,
        }
    }

    pub fn start(&mut self) {
        self.cannons = (0..CANNON_COUNT).map(|_| Cannon::new(Vector2::default())).collect();
        self.arrange();
        self.timer = CANNON_RESPAWN_TICKS;
    }

    /// Put the first cannon in the active slot and the rest in reserve.
    fn arrange(&mut self) {
        let reserve = RESERVE_SLOT_X
            .iter()
            .map(|&x| Vector2::new(x, RESERVE_SLOT_Y));
        let slots = std::iter::once(Vector2::new(ACTIVE_SLOT_X, ACTIVE_SLOT_Y)).chain(reserve);
        for (cannon, slot) in self.cannons.iter_mut().zip(slots) {
            cannon.position = slot;
        }
    }

    pub fn cannons(&self) -> &[Cannon] {
        &self.cannons
    }

    pub fn active(&self) -> Option<&Cannon> {
        self.cannons.first()
    }

    pub fn len(&self) -> usize {
        self.cannons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cannons.is_empty()
    }

    /// Ticks left before a destroyed cannon is replaced.
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// True while a destroyed cannon is waiting to be replaced; the rest of
    /// the playfield holds still meanwhile.
    pub fn respawn_pending(&self) -> bool {
        self.timer != CANNON_RESPAWN_TICKS
    }

    /// Annihilate the active cannon's missiles overlapping `shot`.
    pub fn missiles_hit(&mut self, shot: Rect) -> bool {
        self.cannons
            .first_mut()
            .map(|cannon| cannon.missiles.annihilate(shot))
            .unwrap_or(false)
    }

    /// Beams and rays only ever test the active cannon.
    pub fn cannons_hit(&mut self, shot: Rect) -> bool {
        self.cannons
            .first_mut()
            .map(|cannon| cannon.cannon_hit(shot))
            .unwrap_or(false)
    }

    pub fn update(
        &mut self,
        ctx: &mut Context,
        formation: &mut Formation,
        cities: &mut Cities,
        ships: &mut MysteryShips,
    ) {
        let Some(active) = self.cannons.first_mut() else {
            return;
        };
        active.update(ctx, formation, cities, ships);

        if active.captured {
            debug!("cannon captured");
            self.cannons.clear();
        } else if active.removed {
            self.timer -= 1;
            if self.timer == 0 {
                self.cannons.remove(0);
                self.arrange();
                self.timer = CANNON_RESPAWN_TICKS;
                debug!(remaining = self.cannons.len(), "cannon respawned");
            }
        }
    }
}

impl Draw for Cannons {
    fn draw(&self, surface: &mut dyn Surface) {
        for cannon in &self.cannons {
            cannon.draw(surface);
        }
    }
}
