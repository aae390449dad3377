//! The three non-playing screens: the intro menu, name entry after a lost
//! game and the paged leaderboard.
//!
//! Screens never talk to storage or switch modes themselves; they answer key
//! presses and ticks with a [`ScreenAction`] for the driver to carry out.

use crate::collision::Rect;
use crate::constants::{
    BOARD_WIDTH, CURSOR_PERIOD, HIGH_SCORE_PAGE, LETTER_DELAY, MYSTERY_HEIGHT, MYSTERY_WIDTH,
    NAME_MAX_LEN, SAVE_DELAY, SCREEN_TIMER_CAP,
};
use crate::context::Key;
use crate::entities::{AlienTier, Direction, GameStatus, Vector2};
use crate::persistence::ScoreEntry;
use crate::surface::{Color, Draw, Sprite, Surface};

/// What the driver should do after a screen handled a key or a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenAction {
    None,
    Goto(GameStatus),
    SaveResult { name: String, score: u32 },
    FetchPage { offset: usize, limit: usize },
    Quit,
}

/// The prefix of `text` revealed by `timer`, one letter every
/// [`LETTER_DELAY`] ticks once the timer has passed `start`.
pub fn reveal_letters(text: &str, timer: u32, start: u32) -> &str {
    if timer <= start {
        return "";
    }
    let shown = (timer / LETTER_DELAY - start / LETTER_DELAY) as usize;
    match text.char_indices().nth(shown) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

const CENTRE: f32 = BOARD_WIDTH / 2.0;

fn menu_color(highlighted: bool) -> Color {
    if highlighted {
        Color::Green
    } else {
        Color::White
    }
}

// ── Intro ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MenuItem {
    #[default]
    PlayGame,
    HighScores,
}

/// Tick at which each line of the points table starts to appear.
const INTRO_LINES: [(u32, Option<AlienTier>); 4] = [
    (50, None),
    (170, Some(AlienTier::Top)),
    (290, Some(AlienTier::Middle)),
    (410, Some(AlienTier::Bottom)),
];

#[derive(Clone, Debug, Default)]
pub struct Intro {
    timer: u32,
    selected: MenuItem,
}

impl Intro {
    pub fn init(&mut self) {
        self.timer = 0;
        self.selected = MenuItem::PlayGame;
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn selected(&self) -> MenuItem {
        self.selected
    }

    pub fn update(&mut self) {
        if self.timer < SCREEN_TIMER_CAP {
            self.timer += 1;
        }
    }

    pub fn handle_key(&mut self, key: Key) -> ScreenAction {
        match key {
            Key::Up | Key::Down => {
                self.selected = match self.selected {
                    MenuItem::PlayGame => MenuItem::HighScores,
                    MenuItem::HighScores => MenuItem::PlayGame,
                };
                ScreenAction::None
            }
            Key::Enter | Key::Space => ScreenAction::Goto(match self.selected {
                MenuItem::PlayGame => GameStatus::Game,
                MenuItem::HighScores => GameStatus::HighScore,
            }),
            Key::Escape => ScreenAction::Quit,
            _ => ScreenAction::None,
        }
    }
}

impl Draw for Intro {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.translate(CENTRE, 0.0);
        surface.fill_text("SPACE", Vector2::new(-60.0, 140.0), Color::White);
        surface.fill_text("INVADERS", Vector2::new(-90.0, 200.0), Color::Green);

        for (i, (start, tier)) in INTRO_LINES.into_iter().enumerate() {
            if self.timer <= start {
                continue;
            }
            let y = 300.0 + 40.0 * i as f32;
            let (sprite, text) = match tier {
                None => (Sprite::MysteryShip, " = ? MYSTERY".to_string()),
                Some(tier) => (
                    Sprite::Alien { tier, frame: 0 },
                    format!(" = {} POINTS", tier.points()),
                ),
            };
            let icon = Rect::new(-135.0, y - 15.0, MYSTERY_WIDTH, MYSTERY_HEIGHT);
            surface.draw_sprite(sprite, icon);
            surface.fill_text(
                reveal_letters(&text, self.timer, start),
                Vector2::new(-90.0, y),
                Color::White,
            );
        }

        let play = self.selected == MenuItem::PlayGame;
        surface.fill_text("PLAY GAME", Vector2::new(-90.0, 520.0), menu_color(play));
        surface.fill_text("HIGH SCORES", Vector2::new(-103.0, 560.0), menu_color(!play));
        surface.restore();
    }
}

// ── Game over ────────────────────────────────────────────────────────────────

const NAME_REVEAL: u32 = 320;
const GAME_OVER_TEXT: (&str, u32) = ("GAME OVER", 50);
const ENTER_NAME_TEXT: (&str, u32) = ("ENTER YOUR NAME", 170);

#[derive(Clone, Debug, Default)]
pub struct GameOver {
    timer: u32,
    cursor_timer: u32,
    score: u32,
    name: String,
    /// Ticks left before the leaderboard opens, once the result was saved.
    save_delay: Option<u32>,
}

impl GameOver {
    pub fn init(&mut self, score: u32) {
        self.timer = 0;
        self.cursor_timer = 0;
        self.score = score;
        self.name.clear();
        self.save_delay = None;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn saved(&self) -> bool {
        self.save_delay.is_some()
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_timer > CURSOR_PERIOD / 2
    }

    pub fn update(&mut self) -> ScreenAction {
        if self.timer < SCREEN_TIMER_CAP {
            self.timer += 1;
        }
        self.cursor_timer = (self.cursor_timer + 1) % CURSOR_PERIOD;

        match self.save_delay.as_mut() {
            Some(delay) => {
                *delay = delay.saturating_sub(1);
                if *delay == 0 {
                    ScreenAction::Goto(GameStatus::HighScore)
                } else {
                    ScreenAction::None
                }
            }
            None => ScreenAction::None,
        }
    }

    fn push(&mut self, c: char) {
        if self.name.chars().count() < NAME_MAX_LEN {
            self.name.push(c);
        }
    }

    pub fn handle_key(&mut self, key: Key) -> ScreenAction {
        if self.saved() {
            return ScreenAction::None;
        }
        match key {
            Key::Char(c) if c.is_alphanumeric() => self.push(c),
            Key::Char(' ') | Key::Space => self.push(' '),
            Key::Backspace | Key::Delete => {
                self.name.pop();
            }
            Key::Enter => {
                self.save_delay = Some(SAVE_DELAY);
                return ScreenAction::SaveResult {
                    name: self.name.clone(),
                    score: self.score,
                };
            }
            Key::Escape => return ScreenAction::Goto(GameStatus::Intro),
            _ => {}
        }
        ScreenAction::None
    }
}

impl Draw for GameOver {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.translate(CENTRE, 150.0);

        let (title, start) = GAME_OVER_TEXT;
        surface.fill_text(
            reveal_letters(title, self.timer, start),
            Vector2::new(-110.0, 0.0),
            Color::White,
        );
        let (prompt, start) = ENTER_NAME_TEXT;
        surface.fill_text(
            reveal_letters(prompt, self.timer, start),
            Vector2::new(-180.0, 62.0),
            Color::White,
        );

        if self.timer > NAME_REVEAL {
            surface.fill_text(&self.name, Vector2::new(-180.0, 133.0), Color::Green);
            if self.cursor_visible() && !self.saved() {
                let x = -180.0 + 25.0 * self.name.chars().count() as f32;
                surface.fill_rect(Rect::new(x, 110.0, 2.0, 25.0), Color::Green);
            }
        }

        surface.fill_text(
            &format!("YOUR SCORE {:04}", self.score),
            Vector2::new(-110.0, 200.0),
            Color::White,
        );
        surface.fill_text("ENTER  SAVE", Vector2::new(-110.0, 260.0), menu_color(self.saved()));
        surface.fill_text("ESC    CONTINUE", Vector2::new(-110.0, 300.0), Color::White);
        surface.restore();
    }
}

// ── High scores ──────────────────────────────────────────────────────────────

const SHIP_SPEED: f32 = 2.0;
const SHIP_MIN_X: f32 = -150.0;
const SHIP_MAX_X: f32 = 1020.0;

#[derive(Clone, Debug)]
pub struct HighScoreBoard {
    offset: usize,
    /// `None` until the page for `offset` has arrived.
    entries: Option<Vec<ScoreEntry>>,
    has_next: bool,
    ship: Vector2,
    ship_direction: Direction,
}

impl Default for HighScoreBoard {
    fn default() -> Self {
        Self {
            offset: 0,
            entries: None,
            has_next: false,
            ship: Vector2::new(SHIP_MIN_X, 90.0),
            ship_direction: Direction::Right,
        }
    }
}

impl HighScoreBoard {
    /// Show the first page; returns the fetch to issue.
    pub fn init(&mut self) -> ScreenAction {
        self.offset = 0;
        self.request_page()
    }

    fn request_page(&mut self) -> ScreenAction {
        self.entries = None;
        self.has_next = false;
        ScreenAction::FetchPage {
            offset: self.offset,
            limit: HIGH_SCORE_PAGE + 1,
        }
    }

    /// Accept rows fetched for `offset`.  One extra row beyond the page size
    /// only signals that a next page exists.
    pub fn receive_page(&mut self, offset: usize, mut entries: Vec<ScoreEntry>) {
        if offset != self.offset {
            return;
        }
        self.has_next = entries.len() > HIGH_SCORE_PAGE;
        entries.truncate(HIGH_SCORE_PAGE);
        self.entries = Some(entries);
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn entries(&self) -> Option<&[ScoreEntry]> {
        self.entries.as_deref()
    }

    pub fn has_previous(&self) -> bool {
        self.offset >= HIGH_SCORE_PAGE
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn ship_position(&self) -> Vector2 {
        self.ship
    }

    pub fn update(&mut self) {
        self.ship.x += SHIP_SPEED * self.ship_direction.sign();
        if self.ship.x < SHIP_MIN_X {
            self.ship_direction = Direction::Right;
        } else if self.ship.x + MYSTERY_WIDTH > SHIP_MAX_X {
            self.ship_direction = Direction::Left;
        }
    }

    pub fn handle_key(&mut self, key: Key) -> ScreenAction {
        match key {
            Key::Left if self.has_previous() => {
                self.offset -= HIGH_SCORE_PAGE;
                self.request_page()
            }
            Key::Right if self.has_next => {
                self.offset += HIGH_SCORE_PAGE;
                self.request_page()
            }
            Key::Enter => ScreenAction::Goto(GameStatus::Game),
            Key::Escape => ScreenAction::Goto(GameStatus::Intro),
            _ => ScreenAction::None,
        }
    }
}

impl Draw for HighScoreBoard {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.draw_sprite(
            Sprite::MysteryShip,
            Rect::at(self.ship, MYSTERY_WIDTH, MYSTERY_HEIGHT),
        );

        surface.save();
        surface.translate(CENTRE, 150.0);
        surface.fill_text("HIGH SCORES", Vector2::new(-100.0, 0.0), Color::Green);
        surface.fill_text("NAME", Vector2::new(-200.0, 50.0), Color::White);
        surface.fill_text("SCORE", Vector2::new(200.0, 50.0), Color::White);

        match &self.entries {
            None => surface.fill_text("LOADING", Vector2::new(-60.0, 100.0), Color::DarkGrey),
            Some(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    let y = 100.0 + 30.0 * i as f32;
                    let rank = format!("{}.", self.offset + i + 1);
                    surface.fill_text(&rank, Vector2::new(-280.0, y), Color::White);
                    surface.fill_text(&entry.name, Vector2::new(-200.0, y), Color::White);
                    surface.fill_text(&entry.score.to_string(), Vector2::new(200.0, y), Color::White);
                }
            }
        }

        if self.has_previous() {
            surface.draw_sprite(Sprite::ArrowLeft, Rect::new(-320.0, 410.0, 20.0, 20.0));
        }
        if self.has_next {
            surface.draw_sprite(Sprite::ArrowRight, Rect::new(280.0, 410.0, 20.0, 20.0));
        }
        surface.fill_text("ENTER  PLAY GAME", Vector2::new(-120.0, 460.0), Color::Green);
        surface.fill_text("ESC    BACK", Vector2::new(-120.0, 490.0), Color::White);
        surface.restore();
    }
}
