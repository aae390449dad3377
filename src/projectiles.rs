//! Straight-line shots: cannon missiles travelling up, alien beams and rays
//! travelling down.
//!
//! A projectile is removed the tick it leaves the playfield, strikes a
//! target or a city, or meets an opposing projectile.  The pool that owns it
//! decides which explosion marks the spot.

use crate::aliens::Formation;
use crate::cannons::Cannons;
use crate::cities::Cities;
use crate::collision::{intersects, Rect};
use crate::constants::{AIR_BURST_LINE, MISSILE_CEILING, SHOT_FLOOR};
use crate::context::{Audio, Sound};
use crate::effects::Explosions;
use crate::entities::{ExplosionKind, ProjectileKind, Vector2};
use crate::mystery::MysteryShips;
use crate::surface::{Draw, Sprite, Surface};

/// Why a projectile was taken off the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Impact {
    OutOfBounds,
    /// Struck an alien, the mystery ship or the cannon.
    Target,
    /// Struck an intact part of a city.
    Terrain,
    /// Collided with a projectile from the other side.
    Annihilated,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub position: Vector2,
    pub velocity: Vector2,
    pub removed: bool,
    pub impact: Option<Impact>,
}

impl Projectile {
    pub fn new(kind: ProjectileKind, position: Vector2) -> Self {
        Self {
            kind,
            position,
            velocity: kind.velocity(),
            removed: false,
            impact: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        let (w, h) = self.kind.size();
        Rect::at(self.position, w, h)
    }

    pub fn advance(&mut self) {
        self.position = self.position + self.velocity;
    }

    /// Flag for removal.  The first impact recorded wins.
    pub fn remove(&mut self, impact: Impact) {
        if !self.removed {
            self.removed = true;
            self.impact = Some(impact);
        }
    }
}

impl Draw for Projectile {
    fn draw(&self, surface: &mut dyn Surface) {
        if !self.removed {
            surface.draw_sprite(Sprite::Projectile(self.kind), self.bounds());
        }
    }
}

// ── Missiles ─────────────────────────────────────────────────────────────────

/// Missiles of one cannon plus the air/ground bursts they leave behind.
#[derive(Clone, Debug, Default)]
pub struct Missiles {
    missiles: Vec<Projectile>,
    explosions: Explosions,
}

impl Missiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&mut self, origin: Vector2, audio: &mut dyn Audio) {
        self.missiles.push(Projectile::new(ProjectileKind::Missile, origin));
        audio.play(Sound::CannonMissile);
    }

    pub fn len(&self) -> usize {
        self.missiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.missiles.iter()
    }

    pub fn explosions(&self) -> &Explosions {
        &self.explosions
    }

    /// Flag every live missile overlapping `shot`.  The burst is left to the
    /// next [`update`](Self::update).
    pub fn annihilate(&mut self, shot: Rect) -> bool {
        let mut hit = false;
        for missile in self.missiles.iter_mut().filter(|m| !m.removed) {
            if intersects(shot, missile.bounds()) {
                missile.remove(Impact::Annihilated);
                hit = true;
            }
        }
        hit
    }

    /// Move every missile and resolve its hits against alien shots, aliens,
    /// the mystery ship and the cities, in that order.
    pub fn update(
        &mut self,
        formation: &mut Formation,
        cities: &mut Cities,
        ships: &mut MysteryShips,
        audio: &mut dyn Audio,
    ) {
        for missile in self.missiles.iter_mut().filter(|m| !m.removed) {
            missile.advance();
            let bounds = missile.bounds();

            if formation.annihilate_shots(bounds) {
                missile.remove(Impact::Annihilated);
            } else if formation.aliens_hit(bounds) || ships.mystery_ships_hit(bounds) {
                missile.remove(Impact::Target);
            } else if cities.missile_hits_cities(missile) {
                missile.remove(Impact::Terrain);
            } else if missile.position.y < MISSILE_CEILING {
                missile.remove(Impact::OutOfBounds);
            }
        }

        let explosions = &mut self.explosions;
        self.missiles.retain(|missile| {
            if !missile.removed {
                return true;
            }
            let burst = match missile.impact {
                None => None,
                Some(Impact::Annihilated) => Some(ExplosionKind::Air),
                Some(_) if missile.position.y < AIR_BURST_LINE => Some(ExplosionKind::Air),
                Some(Impact::Target) => None,
                Some(_) => Some(ExplosionKind::Ground),
            };
            if let Some(kind) = burst {
                explosions.spawn(kind, missile.position);
                audio.play(match kind {
                    ExplosionKind::Air => Sound::AirExplosion,
                    _ => Sound::GroundExplosion,
                });
            }
            false
        });

        self.explosions.update();
    }
}

impl Draw for Missiles {
    fn draw(&self, surface: &mut dyn Surface) {
        for missile in &self.missiles {
            missile.draw(surface);
        }
        self.explosions.draw(surface);
    }
}

// ── Alien shots ──────────────────────────────────────────────────────────────

/// A pool of one kind of alien shot; the formation keeps one for beams and
/// one for rays.
#[derive(Clone, Debug)]
pub struct Shots {
    kind: ProjectileKind,
    shots: Vec<Projectile>,
    explosions: Explosions,
}

impl Shots {
    pub fn beams() -> Self {
        Self::new(ProjectileKind::Beam)
    }

    pub fn rays() -> Self {
        Self::new(ProjectileKind::Ray)
    }

    fn new(kind: ProjectileKind) -> Self {
        Self {
            kind,
            shots: Vec::new(),
            explosions: Explosions::default(),
        }
    }

    pub fn kind(&self) -> ProjectileKind {
        self.kind
    }

    pub fn start(&mut self) {
        self.shots.clear();
        self.explosions.clear();
    }

    /// Where a shot leaves an alien occupying `shooter`.
    pub fn muzzle(&self, shooter: Rect) -> Vector2 {
        let centre = shooter.x + shooter.w / 2.0;
        let x = match self.kind {
            ProjectileKind::Ray => centre - 3.0,
            _ => centre,
        };
        Vector2::new(x, shooter.bottom())
    }

    pub fn fire(&mut self, origin: Vector2, audio: &mut dyn Audio) {
        self.shots.push(Projectile::new(self.kind, origin));
        audio.play(Sound::AlienShot);
    }

    /// Push a projectile that is already in flight.
    pub fn push(&mut self, shot: Projectile) {
        self.shots.push(shot);
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.shots.iter()
    }

    pub fn explosions(&self) -> &Explosions {
        &self.explosions
    }

    /// Flag every live shot overlapping `missile`.
    pub fn annihilate(&mut self, missile: Rect) -> bool {
        let mut hit = false;
        for shot in self.shots.iter_mut().filter(|s| !s.removed) {
            if intersects(missile, shot.bounds()) {
                shot.remove(Impact::Annihilated);
                hit = true;
            }
        }
        hit
    }

    /// Move the shots down and resolve hits against the cannon's missiles,
    /// the cannon and the cities.
    ///
    /// Missiles test for shots after they move and shots test for missiles
    /// after they move, so a head-on pair cannot step past each other.
    pub fn update(&mut self, cannons: &mut Cannons, cities: &mut Cities, audio: &mut dyn Audio) {
        for shot in self.shots.iter_mut().filter(|s| !s.removed) {
            shot.advance();

            if cannons.missiles_hit(shot.bounds()) {
                shot.remove(Impact::Annihilated);
            } else if cannons.cannons_hit(shot.bounds()) {
                shot.remove(Impact::Target);
            } else if cities.projectile_hits_cities(shot) {
                shot.remove(Impact::Terrain);
            } else if shot.bounds().bottom() > SHOT_FLOOR {
                shot.remove(Impact::OutOfBounds);
            }
        }

        let drop = match self.kind {
            ProjectileKind::Ray => 10.0,
            _ => 3.0,
        };
        for i in (0..self.shots.len()).rev() {
            let shot = &self.shots[i];
            if !shot.removed {
                continue;
            }
            if matches!(shot.impact, Some(Impact::OutOfBounds | Impact::Terrain)) {
                self.explosions
                    .spawn(ExplosionKind::Ground, shot.position.offset(0.0, drop));
                audio.play(Sound::GroundExplosion);
            }
            self.shots.remove(i);
        }

        self.explosions.update();
    }
}

impl Draw for Shots {
    fn draw(&self, surface: &mut dyn Surface) {
        for shot in &self.shots {
            shot.draw(surface);
        }
        self.explosions.draw(surface);
    }
}
