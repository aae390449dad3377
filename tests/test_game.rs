use std::thread;
use std::time::Duration;

use space_invaders::cities::Bitmap;
use space_invaders::collision::Rect;
use space_invaders::context::{Key, NullAudio};
use space_invaders::entities::{GameStatus, Vector2};
use space_invaders::game::*;
use space_invaders::persistence::{MemoryStore, ScoreEntry, ScoreService};
use space_invaders::surface::{Color, Sprite, Surface};

use rand::rngs::StdRng;
use rand::SeedableRng;

type Game = SpaceInvaders<NullAudio, StdRng>;

#[derive(Default)]
struct RecordingSurface {
    clears: usize,
    sprites: Vec<Sprite>,
    bitmaps: usize,
    texts: Vec<String>,
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.clears += 1;
    }
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn translate(&mut self, _dx: f32, _dy: f32) {}
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    fn draw_sprite(&mut self, sprite: Sprite, _bounds: Rect) {
        self.sprites.push(sprite);
    }
    fn draw_bitmap(&mut self, _bitmap: &Bitmap, _origin: Vector2, _color: Color) {
        self.bitmaps += 1;
    }
    fn fill_text(&mut self, text: &str, _at: Vector2, _color: Color) {
        self.texts.push(text.to_string());
    }
}

fn make_game_with(store: MemoryStore) -> Game {
    SpaceInvaders::new(
        NullAudio,
        StdRng::seed_from_u64(42),
        ScoreService::spawn(store),
    )
}

fn make_game() -> Game {
    make_game_with(MemoryStore::new())
}

/// Intro → game, with the game's entry already run.
fn start_playing(game: &mut Game) {
    game.update();
    game.key_event(Key::Enter, KeyPhase::Press);
    game.update();
    assert_eq!(game.status(), GameStatus::Game);
}

/// Park an alien on the active cannon.
fn capture_cannon(game: &mut Game) {
    let at = game
        .playfield()
        .cannons
        .active()
        .map(|c| c.position)
        .unwrap_or_default();
    game.playfield_mut().formation.aliens_mut()[44].position = at;
}

fn cannon_x(game: &Game) -> Option<f32> {
    game.playfield().cannons.active().map(|c| c.position.x)
}

/// Tick until `done` holds, giving the score worker time to answer.
fn update_until(game: &mut Game, done: impl Fn(&Game) -> bool) -> bool {
    for _ in 0..500 {
        game.update();
        if done(game) {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

// ── Status flow ───────────────────────────────────────────────────────────────

#[test]
fn starts_on_the_intro() {
    let mut game = make_game();
    game.update();
    assert_eq!(game.status(), GameStatus::Intro);
    assert_eq!(game.machine().entries(), 1);
    assert_eq!(game.intro().timer(), 1);
}

#[test]
fn enter_starts_a_game() {
    let mut game = make_game();
    start_playing(&mut game);
    let playfield = game.playfield();
    assert_eq!(playfield.formation.len(), 55);
    assert_eq!(playfield.cannons.len(), 3);
    assert_eq!(playfield.cities.cities().len(), 4);
    assert_eq!(playfield.score.score(), 0);
    assert_eq!(playfield.wave(), 1);
}

#[test]
fn game_is_initialised_once() {
    let mut game = make_game();
    start_playing(&mut game);
    for _ in 0..30 {
        game.update();
    }
    assert_eq!(game.machine().entries(), 2);
    assert_eq!(game.playfield().cannons.len(), 3);
}

#[test]
fn escape_on_intro_quits() {
    let mut game = make_game();
    game.update();
    game.handle_key(Key::Escape);
    assert!(game.quit_requested());
}

#[test]
fn keys_between_modes_go_nowhere() {
    let mut game = make_game();
    game.update();
    game.handle_key(Key::Enter);
    // The intro has let go of the keyboard; the game has not started yet.
    assert_eq!(game.machine().route(), None);
    game.handle_key(Key::Escape);
    assert!(!game.quit_requested());
}

#[test]
fn playing_ignores_screen_keys() {
    let mut game = make_game();
    start_playing(&mut game);
    game.key_event(Key::Escape, KeyPhase::Press);
    game.update();
    assert!(!game.quit_requested());
    assert_eq!(game.status(), GameStatus::Game);
}

// ── Playing ───────────────────────────────────────────────────────────────────

#[test]
fn held_key_moves_the_cannon() {
    let mut game = make_game();
    start_playing(&mut game);
    game.key_event(Key::Left, KeyPhase::Press);
    for _ in 0..5 {
        game.update();
    }
    assert_eq!(cannon_x(&game), Some(130.0));

    game.key_event(Key::Left, KeyPhase::Release);
    game.update();
    assert_eq!(cannon_x(&game), Some(130.0));
}

#[test]
fn unrepeated_key_expires() {
    let mut game = make_game();
    start_playing(&mut game);
    game.key_event(Key::Right, KeyPhase::Press);
    for _ in 0..5 {
        game.end_frame();
    }
    game.update();
    assert_eq!(cannon_x(&game), Some(150.0));
}

#[test]
fn losing_every_cannon_ends_the_game() {
    let mut game = make_game();
    start_playing(&mut game);

    let mut over = false;
    for _ in 0..3000 {
        let target = game
            .playfield()
            .cannons
            .active()
            .filter(|c| !c.removed)
            .map(|c| c.bounds());
        if let Some(bounds) = target {
            game.playfield_mut().cannons.cannons_hit(bounds);
        }
        game.update();
        if game.status() == GameStatus::GameOver {
            over = true;
            break;
        }
    }
    assert!(over);
    assert!(game.playfield().cannons.is_empty());

    game.update();
    assert_eq!(game.game_over().score(), game.playfield().score.score());
}

#[test]
fn capture_ends_the_game_at_once() {
    let mut game = make_game();
    start_playing(&mut game);
    capture_cannon(&mut game);
    game.update();
    assert_eq!(game.status(), GameStatus::GameOver);
}

#[test]
fn cleared_wave_brings_a_new_one() {
    let mut game = make_game();
    start_playing(&mut game);
    game.playfield_mut().formation.aliens_mut().clear();
    game.update();
    assert_eq!(game.playfield().formation.len(), 55);
    assert_eq!(game.playfield().wave(), 2);
}

#[test]
fn high_score_arrives_from_the_store() {
    let mut game = make_game_with(MemoryStore::with_entries([ScoreEntry::new("BBB", 1234)]));
    start_playing(&mut game);
    let arrived = update_until(&mut game, |g| g.playfield().score.high_score().is_some());
    assert!(arrived);
    assert_eq!(game.playfield().score.high_score(), Some(1234));
}

// ── Game over → leaderboard ───────────────────────────────────────────────────

#[test]
fn saved_name_shows_on_the_leaderboard() {
    let mut game = make_game_with(MemoryStore::with_entries([
        ScoreEntry::new("BBB", 1500),
        ScoreEntry::new("CCC", 500),
    ]));
    start_playing(&mut game);
    game.playfield_mut().score.add_score(1000);
    capture_cannon(&mut game);
    game.update();
    game.update(); // game-over entry
    assert_eq!(game.game_over().score(), 1000);

    for c in "AAA".chars() {
        game.key_event(Key::Char(c), KeyPhase::Press);
    }
    game.key_event(Key::Enter, KeyPhase::Press);
    assert!(game.game_over().saved());

    for _ in 0..60 {
        game.update();
    }
    assert_eq!(game.status(), GameStatus::HighScore);

    let loaded = update_until(&mut game, |g| g.high_scores().entries().is_some());
    assert!(loaded);
    let names: Vec<String> = game
        .high_scores()
        .entries()
        .unwrap_or_default()
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert_eq!(names, vec!["BBB", "AAA", "CCC"]);

    // Enter on the leaderboard starts a fresh game.
    game.key_event(Key::Enter, KeyPhase::Press);
    game.update();
    assert_eq!(game.status(), GameStatus::Game);
    assert_eq!(game.playfield().cannons.len(), 3);
    assert_eq!(game.playfield().score.score(), 0);
}

#[test]
fn escape_from_game_over_returns_to_intro() {
    let mut game = make_game();
    start_playing(&mut game);
    capture_cannon(&mut game);
    game.update();
    game.update();
    game.key_event(Key::Escape, KeyPhase::Press);
    game.update();
    assert_eq!(game.status(), GameStatus::Intro);
    assert_eq!(game.intro().timer(), 1);
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[test]
fn intro_renders_the_menu() {
    let mut game = make_game();
    game.update();
    let mut surface = RecordingSurface::default();
    game.render(&mut surface);
    assert_eq!(surface.clears, 1);
    assert!(surface.texts.iter().any(|t| t == "PLAY GAME"));
    assert!(surface.texts.iter().any(|t| t == "HIGH SCORES"));
}

#[test]
fn game_renders_the_board() {
    let mut game = make_game();
    start_playing(&mut game);
    let mut surface = RecordingSurface::default();
    game.render(&mut surface);

    assert_eq!(surface.bitmaps, 4);
    assert!(surface.sprites.contains(&Sprite::Cannon));
    assert!(surface.sprites.contains(&Sprite::Ground));
    let aliens = surface
        .sprites
        .iter()
        .filter(|s| matches!(s, Sprite::Alien { .. }))
        .count();
    assert_eq!(aliens, 55);
    assert!(surface.texts.iter().any(|t| t == "SCORE"));
    assert!(surface.texts.iter().any(|t| t == "0000"));
}

#[test]
fn game_over_renders_over_the_board() {
    let mut game = make_game();
    start_playing(&mut game);
    capture_cannon(&mut game);
    game.update();
    for _ in 0..200 {
        game.update();
    }
    let mut surface = RecordingSurface::default();
    game.render(&mut surface);
    assert_eq!(surface.bitmaps, 4);
    assert!(surface.texts.iter().any(|t| t == "GAME OVER"));
    assert!(!surface.sprites.iter().any(|s| matches!(s, Sprite::Alien { .. })));
}
