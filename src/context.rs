//! Capabilities the simulation borrows from its host: keyboard state, audio
//! and randomness, bundled per tick into a [`Context`].

use std::collections::HashMap;

use rand::RngCore;
use tracing::trace;

// ── Input ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Fires the cannon; typed as a blank during name entry.
    Space,
    Enter,
    Escape,
    Backspace,
    Delete,
    Char(char),
}

/// Polled keyboard state.
pub trait Input {
    fn is_key_down(&self, key: Key) -> bool;
}

/// A key counts as held if its last press/repeat arrived within this many
/// frames.  Terminals that never report releases still repeat faster than
/// this, so a held key stays live.
pub const HOLD_WINDOW: u64 = 4;

/// Held-key tracker fed from raw press/repeat/release events.
///
/// Records the frame each key was last seen.  Terminals with key-release
/// reporting clear keys immediately; the others let them expire after
/// [`HOLD_WINDOW`] frames of silence.
#[derive(Clone, Debug, Default)]
pub struct KeyTracker {
    last_seen: HashMap<Key, u64>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next rendered frame.
    pub fn next_frame(&mut self) {
        self.frame += 1;
    }

    /// Press or auto-repeat.
    pub fn press(&mut self, key: Key) {
        self.last_seen.insert(key, self.frame);
    }

    pub fn release(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    /// Drop every held key, used when the active screen changes.
    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}

impl Input for KeyTracker {
    fn is_key_down(&self, key: Key) -> bool {
        self.last_seen
            .get(&key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }
}

// ── Audio ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    CannonMissile,
    CannonExplosion,
    AlienShot,
    AlienExplosion,
    AlienMoveHigh,
    AlienMoveLow,
    AirExplosion,
    GroundExplosion,
    MysteryShipMove,
    MysteryShipExplosion,
}

/// Independent playback channels; a sound only ever interrupts sounds on its
/// own channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Explosion,
    Missile,
    Movement,
}

impl Sound {
    pub fn channel(self) -> Channel {
        match self {
            Sound::CannonExplosion
            | Sound::AlienExplosion
            | Sound::AirExplosion
            | Sound::GroundExplosion
            | Sound::MysteryShipExplosion => Channel::Explosion,
            Sound::CannonMissile | Sound::AlienShot => Channel::Missile,
            Sound::AlienMoveHigh | Sound::AlienMoveLow | Sound::MysteryShipMove => {
                Channel::Movement
            }
        }
    }
}

/// Fire-and-forget playback.
pub trait Audio {
    fn play(&mut self, sound: Sound);

    fn stop(&mut self, _sound: Sound) {}
}

/// Audio sink that only traces what would have played.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn play(&mut self, sound: Sound) {
        trace!(?sound, "play");
    }
}

// ── Tick context ─────────────────────────────────────────────────────────────

/// Everything a subsystem may touch outside its own state during one tick.
pub struct Context<'a> {
    pub input: &'a dyn Input,
    pub audio: &'a mut dyn Audio,
    pub rng: &'a mut dyn RngCore,
}
