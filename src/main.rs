mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, trace};

use space_invaders::clock::TickDriver;
use space_invaders::context::{Audio, Channel, Key, Sound};
use space_invaders::game::KeyPhase;
use space_invaders::persistence::{JsonFileStore, ScoreService};
use space_invaders::SpaceInvaders;

use display::TerminalSurface;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS, two ticks per frame

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "space_invaders")]
#[command(about = "Space Invaders in the terminal")]
struct Config {
    /// Leaderboard file (default: ~/.space_invaders_scores.json)
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Write logs to this file; the terminal itself is busy drawing
    #[arg(long)]
    log: Option<PathBuf>,

    /// Fixed seed for the game's random numbers
    #[arg(long)]
    seed: Option<u64>,

    /// Ring the terminal bell on explosions
    #[arg(long)]
    bell: bool,
}

fn default_scores_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".space_invaders_scores.json")
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// The only speaker a terminal has is its bell.
enum TerminalAudio {
    Silent,
    Bell { pending: bool },
}

impl TerminalAudio {
    /// True once per frame in which something exploded.
    fn take_bell(&mut self) -> bool {
        match self {
            TerminalAudio::Silent => false,
            TerminalAudio::Bell { pending } => std::mem::take(pending),
        }
    }
}

impl Audio for TerminalAudio {
    fn play(&mut self, sound: Sound) {
        trace!(?sound, "play");
        if let TerminalAudio::Bell { pending } = self {
            if sound.channel() == Channel::Explosion {
                *pending = true;
            }
        }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    })
}

fn map_phase(kind: KeyEventKind) -> KeyPhase {
    match kind {
        KeyEventKind::Press => KeyPhase::Press,
        KeyEventKind::Repeat => KeyPhase::Repeat,
        KeyEventKind::Release => KeyPhase::Release,
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Runs until the player quits from the intro or presses Ctrl-C.
///
/// Key events are fed to the game as they arrive: presses and repeats mark
/// a key as held, releases (on terminals that report them) clear it, and
/// held keys otherwise expire after a few silent frames.  The simulation
/// then advances however many fixed ticks the wall clock asks for.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut SpaceInvaders<TerminalAudio, StdRng>,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut driver = TickDriver::default();
    let mut surface = TerminalSurface::new(out, terminal::size()?);

    loop {
        let frame_start = Instant::now();

        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            else {
                continue;
            };
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(());
            }
            if let Some(key) = map_key(code) {
                game.key_event(key, map_phase(kind));
            }
        }

        for _ in 0..driver.advance(frame_start) {
            game.update();
        }
        game.end_frame();
        if game.quit_requested() {
            return Ok(());
        }

        surface.resize(terminal::size()?);
        game.render(&mut surface);
        if game.audio_mut().take_bell() {
            surface.bell();
        }
        surface.finish().context("failed to draw frame")?;

        thread::sleep(FRAME.saturating_sub(frame_start.elapsed()));
    }
}

// ── Terminal ──────────────────────────────────────────────────────────────────

/// Raw mode and the alternate screen for as long as the guard lives.
struct RawTerminal {
    out: BufWriter<Stdout>,
    enhanced_keys: bool,
}

impl RawTerminal {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let mut term = Self {
            out: BufWriter::new(stdout()),
            enhanced_keys: false,
        };
        term.out
            .execute(terminal::EnterAlternateScreen)
            .context("failed to enter alternate screen")?;
        term.out.execute(cursor::Hide)?;
        // Without release reporting, held keys time out in the game instead.
        term.enhanced_keys = term
            .out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(term)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if self.enhanced_keys {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking event reads live on their own thread.
fn spawn_event_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        while let Ok(event) = event::read() {
            if tx.send(event).is_err() {
                break;
            }
        }
    });
    rx
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = Config::parse();
    if let Some(path) = &config.log {
        init_logging(path)?;
    }

    let scores_path = config.scores.clone().unwrap_or_else(default_scores_path);
    info!(scores = %scores_path.display(), seed = ?config.seed, "starting");
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let audio = if config.bell {
        TerminalAudio::Bell { pending: false }
    } else {
        TerminalAudio::Silent
    };
    let mut game = SpaceInvaders::new(
        audio,
        rng,
        ScoreService::spawn(JsonFileStore::new(scores_path)),
    );

    let result = {
        let mut term = RawTerminal::enter()?;
        let events = spawn_event_reader();
        game_loop(&mut term.out, &mut game, &events)
    };

    info!("bye");
    result
}
