use space_invaders::cities::*;
use space_invaders::collision::Rect;
use space_invaders::constants::{CITY_RASTER_TOP, CITY_RASTER_TOP_RAY};
use space_invaders::entities::{ProjectileKind, Vector2};
use space_invaders::projectiles::Projectile;

fn make_cities() -> Cities {
    let mut cities = Cities::new();
    cities.start();
    cities
}

/// A projectile whose bounding box starts at raster point `(x, y)` of the
/// city band.
fn shot_at(kind: ProjectileKind, x: f32, y: f32) -> Projectile {
    let top = match kind {
        ProjectileKind::Ray => CITY_RASTER_TOP_RAY,
        _ => CITY_RASTER_TOP,
    };
    Projectile::new(kind, Vector2::new(x, y + top))
}

// ── Layout ────────────────────────────────────────────────────────────────────

#[test]
fn start_builds_four_cities() {
    let cities = make_cities();
    let xs: Vec<f32> = cities.cities().iter().map(|c| c.footprint().x).collect();
    assert_eq!(xs, vec![130.0, 330.0, 530.0, 730.0]);
    for city in cities.cities() {
        assert_eq!(city.footprint(), Rect::new(city.position.x, 4.0, 80.0, 51.0));
    }
}

#[test]
fn start_repairs_damage() {
    let mut cities = make_cities();
    let before = cities.cities()[0].bitmap().coverage();
    assert!(cities.missile_hits_cities(&shot_at(ProjectileKind::Missile, 170.0, 10.0)));
    assert!(cities.cities()[0].bitmap().coverage() < before);

    cities.start();
    assert_eq!(cities.cities()[0].bitmap().coverage(), before);
}

#[test]
fn intact_bunker_shape() {
    let city = City::new(Vector2::new(0.0, 51.0)); // footprint at the raster origin
    assert!(city.is_intact_at(40.0, 6.0)); // roof
    assert!(city.is_intact_at(1.0, 20.0)); // left wall
    assert!(!city.is_intact_at(0.0, 0.0)); // rounded corner
    assert!(!city.is_intact_at(79.0, 0.0));
    assert!(!city.is_intact_at(40.0, 50.0)); // under the arch
    assert!(!city.is_intact_at(-1.0, 10.0)); // outside
}

// ── Hits ──────────────────────────────────────────────────────────────────────

#[test]
fn same_pixel_hits_only_once() {
    let mut cities = make_cities();
    let missile = shot_at(ProjectileKind::Missile, 170.0, 10.0);
    assert!(cities.missile_hits_cities(&missile));
    assert!(!cities.missile_hits_cities(&missile));
}

#[test]
fn miss_between_cities() {
    let mut cities = make_cities();
    let missile = shot_at(ProjectileKind::Missile, 50.0, 10.0);
    assert!(!cities.missile_hits_cities(&missile));
    let beam = shot_at(ProjectileKind::Beam, 260.0, 10.0);
    assert!(!cities.beam_hits_cities(&beam));
}

#[test]
fn beam_and_ray_use_their_own_band() {
    let mut cities = make_cities();
    let beam = shot_at(ProjectileKind::Beam, 370.0, 10.0);
    assert!(cities.beam_hits_cities(&beam));
    let ray = shot_at(ProjectileKind::Ray, 570.0, 10.0);
    assert!(cities.ray_hits_cities(&ray));
}

#[test]
fn dispatch_by_kind() {
    let mut cities = make_cities();
    let ray = shot_at(ProjectileKind::Ray, 770.0, 10.0);
    assert!(cities.projectile_hits_cities(&ray));
    assert!(!cities.projectile_hits_cities(&ray));
}

#[test]
fn damage_never_grows_back() {
    let mut cities = make_cities();
    let mut last = cities.cities()[0].bitmap().coverage();
    for i in 0..30 {
        let x = 132.0 + (i * 7 % 76) as f32;
        let y = 4.0 + (i * 5 % 40) as f32;
        cities.missile_hits_cities(&shot_at(ProjectileKind::Missile, x, y));
        let now = cities.cities()[0].bitmap().coverage();
        assert!(now <= last);
        last = now;
    }
}

#[test]
fn hole_at_impact_point() {
    let mut city = City::new(Vector2::new(0.0, 51.0));
    assert!(city.hit(Rect::new(40.0, 20.0, 3.0, 5.0), Stencil::Missile));
    assert!(!city.is_intact_at(40.0, 20.0));
    assert!(!city.hit(Rect::new(40.0, 20.0, 3.0, 5.0), Stencil::Missile));
}

#[test]
fn damage_snaps_to_even_pixels() {
    let mut a = City::new(Vector2::new(0.0, 51.0));
    let mut b = City::new(Vector2::new(0.0, 51.0));
    a.generate_damage(Stencil::Beam, 40.0, 20.0);
    b.generate_damage(Stencil::Beam, 41.0, 21.0);
    assert_eq!(a.bitmap(), b.bitmap());
}

#[test]
fn stencils_differ_by_kind() {
    assert_eq!(Stencil::for_kind(ProjectileKind::Missile), Stencil::Missile);
    assert_eq!(Stencil::for_kind(ProjectileKind::Ray), Stencil::Ray);
    assert_ne!(Stencil::Beam.holes(), Stencil::Ray.holes());
}

// ── Bitmap ────────────────────────────────────────────────────────────────────

#[test]
fn bitmap_reads_outside_are_transparent() {
    let bitmap = Bitmap::new(4, 4);
    assert_eq!(bitmap.alpha(-1, 0), 0);
    assert_eq!(bitmap.alpha(4, 0), 0);
    assert_eq!(bitmap.coverage(), 0);
}

#[test]
fn clear_rect_is_clipped() {
    let mut city = City::new(Vector2::new(0.0, 51.0));
    let mut bitmap = city.bitmap().clone();
    bitmap.clear_rect(-10, -10, 20, 20);
    assert!(bitmap.coverage() < city.bitmap().coverage());
    // Damage entirely off the bitmap changes nothing.
    let before = city.bitmap().coverage();
    city.generate_damage(Stencil::Missile, 400.0, 400.0);
    assert_eq!(city.bitmap().coverage(), before);
}
