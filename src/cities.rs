//! Destructible bunkers.
//!
//! Each city owns an alpha bitmap that *is* its health: a projectile only
//! registers a hit when the pixel it touches is still opaque, and every hit
//! clears a fixed stencil of small rectangles around the impact.  Damage is
//! therefore cumulative, irregular and never repaired.
//!
//! Cities live in a raster band whose top edge sits at world y
//! [`CITY_RASTER_TOP`]; world positions are translated into that band before
//! any test.

use crate::collision::{intersects, Rect};
use crate::constants::{
    CITY_ARCH_HALF_WIDTH, CITY_ARCH_HEIGHT, CITY_BASE_Y, CITY_CORNER_RADIUS, CITY_COUNT,
    CITY_FIRST_X, CITY_HEIGHT, CITY_RASTER_TOP, CITY_RASTER_TOP_RAY, CITY_SPACING, CITY_WIDTH,
};
use crate::entities::{ProjectileKind, Vector2};
use crate::projectiles::Projectile;
use crate::surface::{Color, Draw, Surface};

const OPAQUE: u8 = 0xff;

// ── Bitmap ───────────────────────────────────────────────────────────────────

/// Row-major alpha channel.  Reads outside the bitmap are transparent and
/// writes outside it are clipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    alpha: Vec<u8>,
}

impl Bitmap {
    /// A fully transparent bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn alpha(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map(|i| self.alpha[i]).unwrap_or(0)
    }

    pub fn is_set(&self, x: i32, y: i32) -> bool {
        self.alpha(x, y) != 0
    }

    fn fill(&mut self, x: usize, y: usize) {
        if let Some(i) = self.index(x as i32, y as i32) {
            self.alpha[i] = OPAQUE;
        }
    }

    pub fn clear_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        for row in y.max(0)..(y + h).min(self.height as i32) {
            for col in x.max(0)..(x + w).min(self.width as i32) {
                if let Some(i) = self.index(col, row) {
                    self.alpha[i] = 0;
                }
            }
        }
    }

    /// Number of opaque pixels left.
    pub fn coverage(&self) -> usize {
        self.alpha.iter().filter(|&&a| a != 0).count()
    }
}

// ── Damage stencils ──────────────────────────────────────────────────────────

/// Crater shape punched by one impact, chosen by projectile type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stencil {
    Missile,
    Beam,
    Ray,
}

impl Stencil {
    pub fn for_kind(kind: ProjectileKind) -> Self {
        match kind {
            ProjectileKind::Missile => Stencil::Missile,
            ProjectileKind::Beam => Stencil::Beam,
            ProjectileKind::Ray => Stencil::Ray,
        }
    }

    /// `(dx, dy, w, h)` holes relative to the snapped impact point.
    pub fn holes(self) -> &'static [(i32, i32, i32, i32)] {
        match self {
            Stencil::Missile => &[
                (-2, -6, 4, 10),
                (-4, -8, 2, 3),
                (2, -8, 2, 2),
                (4, -1, 2, 2),
                (2, 3, 2, 3),
                (-4, -4, 2, 2),
                (-6, -3, 2, 2),
            ],
            Stencil::Beam => &[
                (-2, -1, 4, 7),
                (2, -3, 2, 3),
                (4, 3, 2, 2),
                (2, 6, 2, 2),
                (-4, 5, 2, 3),
                (-6, 0, 2, 2),
                (-4, 3, 2, 2),
            ],
            Stencil::Ray => &[
                (-3, -1, 6, 5),
                (3, -3, 2, 3),
                (5, 1, 2, 2),
                (3, 4, 2, 2),
                (-5, 3, 2, 3),
                (-7, 0, 2, 2),
                (-5, -3, 2, 2),
            ],
        }
    }
}

// ── City ─────────────────────────────────────────────────────────────────────

/// Whether pixel `(px, py)` of an intact bunker is solid; `py` counts down
/// from the bunker's top edge.
fn bunker_covers(px: usize, py: usize) -> bool {
    let w = CITY_WIDTH as f32;
    let h = CITY_HEIGHT as f32;
    let r = CITY_CORNER_RADIUS;
    let u = px as f32 + 0.5;
    let v = py as f32 + 0.5;

    if u < r && v < r {
        return (u - r).powi(2) + (v - r).powi(2) <= r * r;
    }
    if u > w - r && v < r {
        return (u - (w - r)).powi(2) + (v - r).powi(2) <= r * r;
    }

    let rise = h - v;
    let du = (u - w / 2.0) / CITY_ARCH_HALF_WIDTH;
    let dv = rise / CITY_ARCH_HEIGHT;
    du * du + dv * dv >= 1.0
}

#[derive(Clone, Debug)]
pub struct City {
    /// Bottom-left corner in raster coordinates.
    pub position: Vector2,
    bitmap: Bitmap,
}

impl City {
    pub fn new(position: Vector2) -> Self {
        let mut bitmap = Bitmap::new(CITY_WIDTH, CITY_HEIGHT);
        for py in 0..CITY_HEIGHT {
            for px in 0..CITY_WIDTH {
                if bunker_covers(px, py) {
                    bitmap.fill(px, py);
                }
            }
        }
        Self { position, bitmap }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Visible footprint in raster coordinates.
    pub fn footprint(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y - CITY_HEIGHT as f32,
            CITY_WIDTH as f32,
            CITY_HEIGHT as f32,
        )
    }

    fn to_local(&self, x: i32, y: i32) -> (i32, i32) {
        let origin = self.footprint();
        (x - origin.x as i32, y - origin.y as i32)
    }

    /// Is the raster pixel at `(x, y)` still standing?
    pub fn is_intact_at(&self, x: f32, y: f32) -> bool {
        let (lx, ly) = self.to_local(x.floor() as i32, y.floor() as i32);
        self.bitmap.is_set(lx, ly)
    }

    /// Punch `stencil` into the bitmap around raster point `(x, y)`.
    pub fn generate_damage(&mut self, stencil: Stencil, x: f32, y: f32) {
        let sx = (x / 2.0).floor() as i32 * 2;
        let sy = (y / 2.0).floor() as i32 * 2;
        let (lx, ly) = self.to_local(sx, sy);
        for &(dx, dy, w, h) in stencil.holes() {
            self.bitmap.clear_rect(lx + dx, ly + dy, w, h);
        }
    }

    /// Test a shot given in raster coordinates; on a hit, carve damage.
    ///
    /// The pixel read only happens once the bounding boxes overlap.
    pub fn hit(&mut self, shot: Rect, stencil: Stencil) -> bool {
        if !intersects(self.footprint(), shot) {
            return false;
        }
        if !self.is_intact_at(shot.x, shot.y) {
            return false;
        }
        self.generate_damage(stencil, shot.x, shot.y);
        true
    }
}

// ── Cities ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Cities {
    cities: Vec<City>,
}

impl Cities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild all four bunkers undamaged.
    pub fn start(&mut self) {
        self.cities = (0..CITY_COUNT)
            .map(|i| City::new(Vector2::new(CITY_FIRST_X + CITY_SPACING * i as f32, CITY_BASE_Y)))
            .collect();
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    fn hits_any(&mut self, projectile: &Projectile, raster_top: f32) -> bool {
        let bounds = projectile.bounds();
        let shot = Rect::new(bounds.x, bounds.y - raster_top, bounds.w, bounds.h);
        let stencil = Stencil::for_kind(projectile.kind);
        self.cities.iter_mut().any(|city| city.hit(shot, stencil))
    }

    pub fn missile_hits_cities(&mut self, missile: &Projectile) -> bool {
        self.hits_any(missile, CITY_RASTER_TOP)
    }

    pub fn beam_hits_cities(&mut self, beam: &Projectile) -> bool {
        self.hits_any(beam, CITY_RASTER_TOP)
    }

    pub fn ray_hits_cities(&mut self, ray: &Projectile) -> bool {
        self.hits_any(ray, CITY_RASTER_TOP_RAY)
    }

    /// Dispatch on the projectile's kind.
    pub fn projectile_hits_cities(&mut self, projectile: &Projectile) -> bool {
        match projectile.kind {
            ProjectileKind::Missile => self.missile_hits_cities(projectile),
            ProjectileKind::Beam => self.beam_hits_cities(projectile),
            ProjectileKind::Ray => self.ray_hits_cities(projectile),
        }
    }
}

impl Draw for Cities {
    fn draw(&self, surface: &mut dyn Surface) {
        for city in &self.cities {
            let footprint = city.footprint();
            let origin = Vector2::new(footprint.x, CITY_RASTER_TOP + footprint.y);
            surface.draw_bitmap(city.bitmap(), origin, Color::Green);
        }
    }
}
