use space_invaders::aliens::*;
use space_invaders::cannons::Cannons;
use space_invaders::cities::Cities;
use space_invaders::collision::Rect;
use space_invaders::context::{Audio, Context, Input, Key, Sound};
use space_invaders::entities::{AlienTier, Direction, ProjectileKind, Vector2};
use space_invaders::score::Score;

use rand::rngs::StdRng;
use rand::SeedableRng;

struct NoKeys;

impl Input for NoKeys {
    fn is_key_down(&self, _key: Key) -> bool {
        false
    }
}

#[derive(Default)]
struct RecordingAudio {
    played: Vec<Sound>,
}

impl Audio for RecordingAudio {
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }
}

impl RecordingAudio {
    fn count(&self, sound: Sound) -> usize {
        self.played.iter().filter(|&&s| s == sound).count()
    }
}

fn make_formation() -> Formation {
    let mut formation = Formation::new();
    formation.start();
    formation
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── step_interval ─────────────────────────────────────────────────────────────

#[test]
fn step_interval_tiers() {
    assert_eq!(step_interval(55), 40);
    assert_eq!(step_interval(40), 40);
    assert_eq!(step_interval(39), 30);
    assert_eq!(step_interval(30), 30);
    assert_eq!(step_interval(29), 20);
    assert_eq!(step_interval(20), 20);
    assert_eq!(step_interval(19), 10);
    assert_eq!(step_interval(11), 10);
    assert_eq!(step_interval(10), 5);
    assert_eq!(step_interval(5), 5);
}

#[test]
fn endgame_stays_at_five_until_the_last_alien() {
    assert_eq!(step_interval(4), 5);
    assert_eq!(step_interval(3), 5);
    assert_eq!(step_interval(2), 5);
    assert_eq!(step_interval(1), 2);
    assert_eq!(step_interval(0), 2);
}

#[test]
fn six_aliens_step_every_five_ticks() {
    let mut formation = make_formation();
    formation.aliens_mut().truncate(6);
    assert_eq!(formation.current_step_interval(), 5);
}

// ── start ─────────────────────────────────────────────────────────────────────

#[test]
fn start_lays_out_55_aliens() {
    let formation = make_formation();
    assert_eq!(formation.len(), 55);
    assert_eq!(formation.direction(), Direction::Left);

    let aliens = formation.aliens();
    assert_eq!(aliens[0].position, Vector2::new(200.0, 130.0));
    assert_eq!(aliens[0].tier, AlienTier::Top);
    assert_eq!(aliens[11].position, Vector2::new(198.0, 167.0));
    assert_eq!(aliens[11].tier, AlienTier::Middle);
    assert_eq!(aliens[54].position, Vector2::new(696.0, 278.0));
    assert_eq!(aliens[54].tier, AlienTier::Bottom);
    assert!(aliens.iter().all(|a| !a.removed && a.direction == Direction::Left));
}

#[test]
fn tier_counts() {
    let formation = make_formation();
    let count = |tier: AlienTier| formation.aliens().iter().filter(|a| a.tier == tier).count();
    assert_eq!(count(AlienTier::Top), 11);
    assert_eq!(count(AlienTier::Middle), 22);
    assert_eq!(count(AlienTier::Bottom), 22);
}

#[test]
fn tier_points_and_widths() {
    assert_eq!(AlienTier::Top.points(), 30);
    assert_eq!(AlienTier::Middle.points(), 20);
    assert_eq!(AlienTier::Bottom.points(), 10);
    assert_eq!(AlienTier::Bottom.width(), 32.0);
}

// ── step / set_direction ──────────────────────────────────────────────────────

#[test]
fn step_moves_and_toggles_frame() {
    let mut formation = make_formation();
    let mut audio = RecordingAudio::default();
    formation.step(&mut audio);
    let first = &formation.aliens()[0];
    assert_eq!(first.position.x, 196.0);
    assert_eq!(first.version, 1);
    formation.step(&mut audio);
    assert_eq!(formation.aliens()[0].version, 0);
    assert_eq!(audio.played, vec![Sound::AlienMoveHigh, Sound::AlienMoveLow]);
}

#[test]
fn left_wall_flips_and_descends_once() {
    let mut formation = make_formation();
    let mut audio = RecordingAudio::default();
    let mut steps = 0;
    while formation.aliens().iter().all(|a| a.position.x >= 10.0) {
        formation.step(&mut audio);
        steps += 1;
        assert!(steps < 100);
    }
    let before: Vec<f32> = formation.aliens().iter().map(|a| a.position.y).collect();

    formation.set_direction();
    assert_eq!(formation.direction(), Direction::Right);
    for (alien, y) in formation.aliens().iter().zip(&before) {
        assert_eq!(alien.direction, Direction::Right);
        assert_eq!(alien.new_direction, Direction::Right);
        assert_eq!(alien.position.y, y + 50.0);
    }

    // Committing again changes nothing.
    formation.set_direction();
    for (alien, y) in formation.aliens().iter().zip(&before) {
        assert_eq!(alien.position.y, y + 50.0);
    }
}

#[test]
fn whole_formation_turns_together() {
    let mut formation = make_formation();
    let mut audio = RecordingAudio::default();
    for _ in 0..400 {
        formation.step(&mut audio);
        formation.set_direction();
        let direction = formation.direction();
        assert!(formation.aliens().iter().all(|a| a.direction == direction));
    }
}

#[test]
fn no_descent_into_the_ground_strip() {
    let mut formation = make_formation();
    formation.aliens_mut().truncate(1);
    let alien = &mut formation.aliens_mut()[0];
    alien.position = Vector2::new(5.0, 500.0);
    alien.new_direction = Direction::Right;

    formation.set_direction();
    assert_eq!(formation.direction(), Direction::Right);
    assert_eq!(formation.aliens()[0].position.y, 500.0);
}

#[test]
fn right_wall_requests_left() {
    let mut alien = Alien::new(AlienTier::Bottom, Vector2::new(860.0, 300.0), Direction::Right);
    alien.update(); // 864 + 32 > 890
    assert_eq!(alien.new_direction, Direction::Left);
    assert_eq!(alien.direction, Direction::Right);
}

// ── Hits ──────────────────────────────────────────────────────────────────────

#[test]
fn aliens_hit_flags_only_the_first() {
    let mut formation = make_formation();
    let missile = Rect::new(200.0, 130.0, 80.0, 5.0); // spans aliens 0 and 1
    assert!(formation.aliens_hit(missile));
    assert!(formation.aliens()[0].removed);
    assert!(!formation.aliens()[1].removed);

    assert!(formation.aliens_hit(missile));
    assert!(formation.aliens()[1].removed);
}

#[test]
fn aliens_hit_misses_empty_space() {
    let mut formation = make_formation();
    assert!(!formation.aliens_hit(Rect::new(100.0, 400.0, 3.0, 5.0)));
    assert!(formation.aliens().iter().all(|a| !a.removed));
}

#[test]
fn aliens_reaching_the_cannon() {
    let formation = make_formation();
    assert!(formation.aliens_hit_cannon(Vector2::new(200.0, 140.0)));
    assert!(!formation.aliens_hit_cannon(Vector2::new(150.0, 545.0)));
}

// ── Firing ────────────────────────────────────────────────────────────────────

#[test]
fn frontmost_alien_fires_for_its_column() {
    let mut formation = make_formation();
    assert_eq!(formation.frontmost_in_column(0), 44);
    assert_eq!(formation.frontmost_in_column(44), 44);
    assert_eq!(formation.frontmost_in_column(5), 49);

    formation.aliens_mut().remove(44);
    assert_eq!(formation.frontmost_in_column(0), 33);
}

#[test]
fn fire_from_uses_the_column_front() {
    let mut formation = make_formation();
    let mut audio = RecordingAudio::default();
    assert_eq!(formation.fire_from(0, &mut audio), Some(ProjectileKind::Beam));
    let beam = formation.beams.iter().next().cloned();
    // Bottom alien of column 0: x 196, width 32, bottom edge 302.
    assert_eq!(beam.map(|b| b.position), Some(Vector2::new(212.0, 302.0)));
    assert_eq!(audio.played, vec![Sound::AlienShot]);
}

#[test]
fn every_eighth_shot_is_a_ray() {
    let mut formation = make_formation();
    let mut audio = RecordingAudio::default();
    let kinds: Vec<_> = (0..16)
        .map(|i| formation.fire_from(i, &mut audio))
        .collect();
    assert_eq!(kinds[6], Some(ProjectileKind::Beam));
    assert_eq!(kinds[7], Some(ProjectileKind::Ray));
    assert_eq!(kinds[15], Some(ProjectileKind::Ray));
    assert_eq!(formation.beams.len(), 14);
    assert_eq!(formation.rays.len(), 2);
}

#[test]
fn fire_from_out_of_range() {
    let mut formation = Formation::new();
    let mut audio = RecordingAudio::default();
    assert_eq!(formation.fire_from(0, &mut audio), None);
    assert!(audio.played.is_empty());
}

// ── update ────────────────────────────────────────────────────────────────────

#[test]
fn update_steps_on_schedule() {
    let mut formation = make_formation();
    let mut cannons = Cannons::new();
    let mut cities = Cities::new();
    let mut score = Score::new();
    let mut audio = RecordingAudio::default();
    let mut rng = seeded_rng();

    for tick in 1..=80 {
        let mut ctx = Context {
            input: &NoKeys,
            audio: &mut audio,
            rng: &mut rng,
        };
        formation.update(&mut ctx, &mut cannons, &mut cities, &mut score);
        let moves = audio.count(Sound::AlienMoveHigh) + audio.count(Sound::AlienMoveLow);
        assert_eq!(moves, (tick / 40) as usize);
    }
}

#[test]
fn update_scores_and_removes_dead() {
    let mut formation = make_formation();
    let mut cannons = Cannons::new();
    let mut cities = Cities::new();
    let mut score = Score::new();
    let mut audio = RecordingAudio::default();
    let mut rng = seeded_rng();

    formation.aliens_hit(Rect::new(200.0, 130.0, 3.0, 5.0)); // top row, 30 points
    formation.aliens_hit(Rect::new(196.0, 278.0, 3.0, 5.0)); // bottom row, 10 points
    let mut ctx = Context {
        input: &NoKeys,
        audio: &mut audio,
        rng: &mut rng,
    };
    formation.update(&mut ctx, &mut cannons, &mut cities, &mut score);

    assert_eq!(formation.len(), 53);
    assert_eq!(score.score(), 40);
    assert_eq!(formation.explosions().len(), 2);
    assert_eq!(audio.count(Sound::AlienExplosion), 2);
}

#[test]
fn formation_returns_fire() {
    let mut formation = make_formation();
    let mut cannons = Cannons::new();
    let mut cities = Cities::new();
    let mut score = Score::new();
    let mut audio = RecordingAudio::default();
    let mut rng = seeded_rng();

    for _ in 0..600 {
        let mut ctx = Context {
            input: &NoKeys,
            audio: &mut audio,
            rng: &mut rng,
        };
        formation.update(&mut ctx, &mut cannons, &mut cities, &mut score);
    }
    assert!(audio.count(Sound::AlienShot) > 0);
}
