//! The top-level driver: owns every subsystem and the host capabilities,
//! dispatches ticks, key presses and rendering by game mode.

use rand::RngCore;
use tracing::debug;

use crate::context::{Audio, Context, Key, KeyTracker};
use crate::entities::GameStatus;
use crate::mystery::BonusPoints;
use crate::persistence::{ScoreReply, ScoreService};
use crate::playfield::{PlayOutcome, Playfield};
use crate::screens::{GameOver, HighScoreBoard, Intro, ScreenAction};
use crate::state::StateMachine;
use crate::surface::{Draw, Surface};

/// Kind of raw key event coming from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPhase {
    Press,
    Repeat,
    Release,
}

pub struct SpaceInvaders<A: Audio, R: RngCore> {
    keys: KeyTracker,
    audio: A,
    rng: R,
    scores: ScoreService,
    machine: StateMachine,
    playfield: Playfield,
    intro: Intro,
    game_over: GameOver,
    high_scores: HighScoreBoard,
    quit: bool,
}

impl<A: Audio, R: RngCore> SpaceInvaders<A, R> {
    pub fn new(audio: A, rng: R, scores: ScoreService) -> Self {
        Self::with_bonus(audio, rng, scores, BonusPoints::default())
    }

    pub fn with_bonus(audio: A, rng: R, scores: ScoreService, bonus: BonusPoints) -> Self {
        Self {
            keys: KeyTracker::new(),
            audio,
            rng,
            scores,
            machine: StateMachine::new(),
            playfield: Playfield::new(bonus),
            intro: Intro::default(),
            game_over: GameOver::default(),
            high_scores: HighScoreBoard::default(),
            quit: false,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.machine.status()
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn playfield_mut(&mut self) -> &mut Playfield {
        &mut self.playfield
    }

    pub fn intro(&self) -> &Intro {
        &self.intro
    }

    pub fn game_over(&self) -> &GameOver {
        &self.game_over
    }

    pub fn high_scores(&self) -> &HighScoreBoard {
        &self.high_scores
    }

    pub fn scores(&self) -> &ScoreService {
        &self.scores
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Feed a raw key event.  Presses also go to the active screen.
    pub fn key_event(&mut self, key: Key, phase: KeyPhase) {
        match phase {
            KeyPhase::Press => {
                self.keys.press(key);
                self.handle_key(key);
            }
            KeyPhase::Repeat => self.keys.press(key),
            KeyPhase::Release => self.keys.release(key),
        }
    }

    /// Deliver a discrete key press to whichever screen holds the key route.
    pub fn handle_key(&mut self, key: Key) {
        let action = match self.machine.route() {
            Some(GameStatus::Intro) => self.intro.handle_key(key),
            Some(GameStatus::GameOver) => self.game_over.handle_key(key),
            Some(GameStatus::HighScore) => self.high_scores.handle_key(key),
            Some(GameStatus::Game) | None => ScreenAction::None,
        };
        self.apply(action);
    }

    /// Called once per rendered frame so held keys age.
    pub fn end_frame(&mut self) {
        self.keys.next_frame();
    }

    /// Advance the simulation by one tick.
    pub fn update(&mut self) {
        self.receive_replies();

        if let Some(status) = self.machine.enter() {
            self.on_enter(status);
        }

        let action = match self.machine.status() {
            GameStatus::Intro => {
                self.intro.update();
                ScreenAction::None
            }
            GameStatus::Game => {
                let mut ctx = Context {
                    input: &self.keys,
                    audio: &mut self.audio,
                    rng: &mut self.rng,
                };
                match self.playfield.update(&mut ctx) {
                    PlayOutcome::Continue => ScreenAction::None,
                    PlayOutcome::GameOver => ScreenAction::Goto(GameStatus::GameOver),
                }
            }
            GameStatus::GameOver => self.game_over.update(),
            GameStatus::HighScore => {
                self.high_scores.update();
                ScreenAction::None
            }
        };
        self.apply(action);
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear();
        match self.machine.status() {
            GameStatus::Intro => self.intro.draw(surface),
            GameStatus::Game => self.playfield.draw(surface),
            GameStatus::GameOver => {
                self.playfield.draw_backdrop(surface);
                self.game_over.draw(surface);
            }
            GameStatus::HighScore => self.high_scores.draw(surface),
        }
    }

    fn on_enter(&mut self, status: GameStatus) {
        self.keys.clear();
        match status {
            GameStatus::Intro => self.intro.init(),
            GameStatus::Game => self.playfield.start(&mut self.rng, &self.scores),
            GameStatus::GameOver => self.game_over.init(self.playfield.score.score()),
            GameStatus::HighScore => {
                let action = self.high_scores.init();
                self.apply(action);
            }
        }
    }

    fn apply(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::None => {}
            ScreenAction::Goto(status) => self.machine.set_status(status),
            ScreenAction::SaveResult { name, score } => self.scores.submit(&name, score),
            ScreenAction::FetchPage { offset, limit } => self.scores.fetch_page(offset, limit),
            ScreenAction::Quit => self.quit = true,
        }
    }

    fn receive_replies(&mut self) {
        for reply in self.scores.poll() {
            match reply {
                ScoreReply::HighScore(high_score) => {
                    self.playfield.score.receive_high_score(high_score)
                }
                ScoreReply::Page { offset, entries } => {
                    self.high_scores.receive_page(offset, entries)
                }
                ScoreReply::Submitted => debug!("result stored"),
            }
        }
    }
}
