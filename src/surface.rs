//! Drawing capability.  The simulation issues draw calls; the host owns the
//! surface and decides what pixels or cells they become.

use crate::cities::Bitmap;
use crate::collision::Rect;
use crate::entities::{AlienTier, ExplosionKind, ProjectileKind, Vector2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    White,
    Green,
    Red,
    Yellow,
    Cyan,
    DarkGrey,
}

/// Every image the game knows how to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Alien { tier: AlienTier, frame: u8 },
    Cannon,
    CannonWreck { frame: u8 },
    MysteryShip,
    Projectile(ProjectileKind),
    Explosion(ExplosionKind),
    Ground,
    ArrowLeft,
    ArrowRight,
}

/// 2D drawing surface with canvas-like semantics.
///
/// `translate` shifts the origin of every later call until the matching
/// `restore`.
pub trait Surface {
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_sprite(&mut self, sprite: Sprite, bounds: Rect);
    fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Vector2, color: Color);
    fn fill_text(&mut self, text: &str, at: Vector2, color: Color);
}

/// Anything that can put itself on a [`Surface`].
pub trait Draw {
    fn draw(&self, surface: &mut dyn Surface);
}
