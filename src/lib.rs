//! Simulation core of a Space Invaders clone.
//!
//! Everything here is deterministic given an injected RNG and is driven one
//! fixed tick at a time.  Drawing, audio, keyboard and the leaderboard are
//! reached only through the capability traits in [`context`], [`surface`]
//! and [`persistence`].

pub mod aliens;
pub mod cannons;
pub mod cities;
pub mod clock;
pub mod collision;
pub mod constants;
pub mod context;
pub mod effects;
pub mod entities;
pub mod game;
pub mod mystery;
pub mod persistence;
pub mod playfield;
pub mod projectiles;
pub mod score;
pub mod screens;
pub mod state;
pub mod surface;

pub use game::SpaceInvaders;
