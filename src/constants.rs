//! Gameplay tunables.  All distances are in playfield pixels, all timers in
//! ticks.

use std::time::Duration;

// ── Playfield ────────────────────────────────────────────────────────────────

pub const BOARD_WIDTH: f32 = 900.0;
pub const BOARD_HEIGHT: f32 = 650.0;

/// Aliens and the mystery ship turn around this far from the side walls.
pub const PLAYGROUND_OFFSET: f32 = 10.0;

/// Height of the strip above the bottom edge the formation may never enter.
pub const GROUND_OFFSET: f32 = 105.0;

/// Top of the ground tiles.
pub const GROUND_Y: f32 = BOARD_HEIGHT - 75.0;

// ── Clock ────────────────────────────────────────────────────────────────────

/// One simulation step (60 Hz).
pub const TICK: Duration = Duration::from_micros(16_667);

/// Upper bound on catch-up steps after a stalled frame.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

// ── Aliens ───────────────────────────────────────────────────────────────────

pub const ALIEN_ROWS: usize = 5;
pub const ALIEN_COLUMNS: usize = 11;
pub const ALIEN_X_SPACING: f32 = 50.0;
pub const ALIEN_Y_SPACING: f32 = 37.0;
pub const FORMATION_TOP: f32 = 130.0;
pub const ALIEN_HEIGHT: f32 = 24.0;

/// Horizontal distance covered by one formation step.
pub const ALIEN_JUMP: f32 = 4.0;

/// Formation-wide drop on each direction flip.
pub const ALIEN_DESCENT: f32 = 50.0;

/// Per-tick probability that the formation fires.
pub const ALIEN_FIRE_CHANCE: f64 = 0.03;

/// Every this many shots one is a ray instead of a beam.
pub const RAY_ROTATION: u32 = 8;

/// `(minimum remaining aliens, ticks per formation step)`, checked top-down.
/// A tier holds through its round number: 40 aliens still march at 40.
pub const SPEED_TIERS: [(usize, u32); 5] = [(40, 40), (30, 30), (20, 20), (11, 10), (2, 5)];

/// Step interval for the last alien standing.
pub const FINAL_SPEED: u32 = 2;

// ── Cannon ───────────────────────────────────────────────────────────────────

pub const CANNON_COUNT: usize = 3;
pub const CANNON_WIDTH: f32 = 45.0;
pub const CANNON_HEIGHT: f32 = 28.0;

/// Height of the box an alien must touch to capture the cannon.
pub const CANNON_CAPTURE_HEIGHT: f32 = 25.0;
pub const CANNON_SPEED: f32 = 4.0;
pub const CANNON_MUZZLE_OFFSET: f32 = 21.0;
pub const CANNON_RESPAWN_TICKS: u32 = 180;

/// Frames per wreck sprite while a destroyed cannon smoulders.
pub const CANNON_WRECK_PERIOD: u32 = 10;

pub const ACTIVE_SLOT_X: f32 = 150.0;
pub const ACTIVE_SLOT_Y: f32 = BOARD_HEIGHT - 105.0;
pub const RESERVE_SLOT_Y: f32 = BOARD_HEIGHT - 35.0;
pub const RESERVE_SLOT_X: [f32; 2] = [10.0, 70.0];

// ── Projectiles ──────────────────────────────────────────────────────────────

pub const MISSILE_WIDTH: f32 = 3.0;
pub const MISSILE_HEIGHT: f32 = 5.0;
pub const MISSILE_SPEED: f32 = 8.0;

/// Missiles vanish once they climb above this line.
pub const MISSILE_CEILING: f32 = 80.0;

/// Missiles removed above this line burst in the air.
pub const AIR_BURST_LINE: f32 = 130.0;

pub const BEAM_WIDTH: f32 = 3.0;
pub const BEAM_HEIGHT: f32 = 5.0;
pub const BEAM_SPEED: f32 = 5.0;

pub const RAY_WIDTH: f32 = 6.0;
pub const RAY_HEIGHT: f32 = 11.0;
pub const RAY_SPEED: f32 = 4.0;

/// Alien shots vanish once their bottom edge passes this line.
pub const SHOT_FLOOR: f32 = 572.0;

// ── Effects ──────────────────────────────────────────────────────────────────

pub const EXPLOSION_TICKS: u32 = 15;
pub const SHIP_EXPLOSION_TICKS: u32 = 70;

// ── Mystery ship ─────────────────────────────────────────────────────────────

pub const MYSTERY_WIDTH: f32 = 35.0;
pub const MYSTERY_HEIGHT: f32 = 15.0;
pub const MYSTERY_Y: f32 = 90.0;
pub const MYSTERY_SPEED: f32 = 3.0;
pub const MYSTERY_LEFT_START: f32 = 15.0;
pub const MYSTERY_RIGHT_START: f32 = 850.0;
pub const MYSTERY_SPAWN_MIN: u32 = 1600;
pub const MYSTERY_SPAWN_MAX: u32 = 1900;
pub const MYSTERY_POINTS_MIN: u32 = 40;
pub const MYSTERY_POINTS_MAX: u32 = 80;

// ── Cities ───────────────────────────────────────────────────────────────────

pub const CITY_COUNT: usize = 4;
pub const CITY_WIDTH: usize = 80;
pub const CITY_HEIGHT: usize = 51;
pub const CITY_FIRST_X: f32 = 130.0;
pub const CITY_SPACING: f32 = 200.0;

/// Raster row the bunker bases stand on.
pub const CITY_BASE_Y: f32 = 55.0;

/// World y of the top of the city raster band.
pub const CITY_RASTER_TOP: f32 = 452.0;

/// Rays are sampled with a shallower offset so their tip, not their tail,
/// meets the bunker.
pub const CITY_RASTER_TOP_RAY: f32 = 439.0;

/// Bunker corner radius and base arch dimensions.
pub const CITY_CORNER_RADIUS: f32 = 15.0;
pub const CITY_ARCH_HALF_WIDTH: f32 = 25.0;
pub const CITY_ARCH_HEIGHT: f32 = 27.0;

// ── Screens ──────────────────────────────────────────────────────────────────

/// Reveal timers on the intro and game-over screens stop here.
pub const SCREEN_TIMER_CAP: u32 = 530;

/// Ticks between two revealed letters.
pub const LETTER_DELAY: u32 = 8;

pub const NAME_MAX_LEN: usize = 20;
pub const CURSOR_PERIOD: u32 = 60;

/// Pause between saving a result and showing the leaderboard.
pub const SAVE_DELAY: u32 = 60;

pub const HIGH_SCORE_PAGE: usize = 10;
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";
