//! Shared game value types. Pure data, no logic beyond trivial accessors.

use std::fmt;

use crate::constants::{
    BEAM_HEIGHT, BEAM_SPEED, BEAM_WIDTH, MISSILE_HEIGHT, MISSILE_SPEED, MISSILE_WIDTH,
    RAY_HEIGHT, RAY_SPEED, RAY_WIDTH,
};

// ── Coordinates ──────────────────────────────────────────────────────────────

/// A point or velocity in playfield pixels, origin top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::ops::Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Sign of the horizontal step in this direction.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

// ── Aliens ───────────────────────────────────────────────────────────────────

/// Row group of the formation.  Smaller aliens sit higher and are worth more.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlienTier {
    Top,
    Middle,
    Bottom,
}

impl AlienTier {
    pub fn width(self) -> f32 {
        match self {
            AlienTier::Top => 21.0,
            AlienTier::Middle => 27.0,
            AlienTier::Bottom => 32.0,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            AlienTier::Top => 30,
            AlienTier::Middle => 20,
            AlienTier::Bottom => 10,
        }
    }

    /// Left edge of the first alien in a row of this tier.
    pub fn row_origin(self) -> f32 {
        match self {
            AlienTier::Top => 200.0,
            AlienTier::Middle => 198.0,
            AlienTier::Bottom => 196.0,
        }
    }

    /// Tier of formation row `row` (0 = top).
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => AlienTier::Top,
            1 | 2 => AlienTier::Middle,
            _ => AlienTier::Bottom,
        }
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    /// Fired upward by the cannon.
    Missile,
    /// Common alien shot.
    Beam,
    /// Heavier alien shot, every eighth volley.
    Ray,
}

impl ProjectileKind {
    pub fn size(self) -> (f32, f32) {
        match self {
            ProjectileKind::Missile => (MISSILE_WIDTH, MISSILE_HEIGHT),
            ProjectileKind::Beam => (BEAM_WIDTH, BEAM_HEIGHT),
            ProjectileKind::Ray => (RAY_WIDTH, RAY_HEIGHT),
        }
    }

    /// Per-tick displacement.
    pub fn velocity(self) -> Vector2 {
        match self {
            ProjectileKind::Missile => Vector2::new(0.0, -MISSILE_SPEED),
            ProjectileKind::Beam => Vector2::new(0.0, BEAM_SPEED),
            ProjectileKind::Ray => Vector2::new(0.0, RAY_SPEED),
        }
    }
}

// ── Effects ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionKind {
    Alien,
    Air,
    Ground,
    /// A shot-down mystery ship, showing the points it paid out.
    Ship { points: u32 },
}

// ── Game mode ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Intro,
    Game,
    GameOver,
    HighScore,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Intro => write!(f, "intro"),
            GameStatus::Game => write!(f, "game"),
            GameStatus::GameOver => write!(f, "gameOver"),
            GameStatus::HighScore => write!(f, "highScore"),
        }
    }
}
