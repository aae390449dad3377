//! Game-mode sequencing and key routing.
//!
//! A status change only records the new mode.  The driver calls
//! [`StateMachine::enter`] at the top of each tick and runs the mode's
//! initialisation when it returns `Some`, which happens once per entry no
//! matter how many frames the mode lasts.

use tracing::info;

use crate::entities::GameStatus;

#[derive(Clone, Debug)]
pub struct StateMachine {
    status: GameStatus,
    pending_entry: bool,
    /// Mode whose screen currently receives discrete key presses.
    route: Option<GameStatus>,
    entries: u64,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Starts at the intro, with its entry still to run.
    pub fn new() -> Self {
        Self {
            status: GameStatus::Intro,
            pending_entry: true,
            route: None,
            entries: 0,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Leave the current mode.  Its key route is dropped immediately; the new
    /// mode's route is registered on entry.
    pub fn set_status(&mut self, next: GameStatus) {
        info!(from = %self.status, "game status -> {next}");
        self.route = None;
        self.status = next;
        self.pending_entry = true;
    }

    /// `Some(status)` exactly once after each transition.
    pub fn enter(&mut self) -> Option<GameStatus> {
        if !self.pending_entry {
            return None;
        }
        self.pending_entry = false;
        self.route = Some(self.status);
        self.entries += 1;
        Some(self.status)
    }

    pub fn route(&self) -> Option<GameStatus> {
        self.route
    }

    /// Number of mode entries run so far.
    pub fn entries(&self) -> u64 {
        self.entries
    }
}
