//! Short-lived explosion sprites that expire on a tick timer.

use crate::collision::Rect;
use crate::constants::{EXPLOSION_TICKS, SHIP_EXPLOSION_TICKS};
use crate::entities::{ExplosionKind, Vector2};
use crate::surface::{Color, Draw, Sprite, Surface};

#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub position: Vector2,
    pub kind: ExplosionKind,
    /// Remaining ticks on screen.
    pub timer: u32,
}

impl Explosion {
    pub fn new(kind: ExplosionKind, position: Vector2) -> Self {
        let timer = match kind {
            ExplosionKind::Ship { .. } => SHIP_EXPLOSION_TICKS,
            _ => EXPLOSION_TICKS,
        };
        Self { position, kind, timer }
    }

    /// Sprite bounds; air and ground bursts are drawn centred on the impact.
    pub fn bounds(&self) -> Rect {
        let p = self.position;
        match self.kind {
            ExplosionKind::Alien | ExplosionKind::Ship { .. } => Rect::new(p.x, p.y, 35.0, 25.0),
            ExplosionKind::Air => Rect::new(p.x - 12.0, p.y, 24.0, 24.0),
            ExplosionKind::Ground => Rect::new(p.x - 10.0, p.y - 8.0, 18.0, 10.0),
        }
    }
}

impl Draw for Explosion {
    fn draw(&self, surface: &mut dyn Surface) {
        let bounds = self.bounds();
        surface.draw_sprite(Sprite::Explosion(self.kind), bounds);
        if let ExplosionKind::Ship { points } = self.kind {
            surface.fill_text(&points.to_string(), bounds.position().offset(0.0, 20.0), Color::Red);
        }
    }
}

/// A bag of running explosions owned by whichever subsystem spawned them.
#[derive(Clone, Debug, Default)]
pub struct Explosions {
    items: Vec<Explosion>,
}

impl Explosions {
    pub fn spawn(&mut self, kind: ExplosionKind, position: Vector2) {
        self.items.push(Explosion::new(kind, position));
    }

    /// Count every timer down one tick and drop the expired ones.
    pub fn update(&mut self) {
        for explosion in &mut self.items {
            explosion.timer = explosion.timer.saturating_sub(1);
        }
        self.items.retain(|e| e.timer > 0);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Explosion> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Draw for Explosions {
    fn draw(&self, surface: &mut dyn Surface) {
        for explosion in &self.items {
            explosion.draw(surface);
        }
    }
}
