//! Terminal rendering: the crossterm implementation of [`Surface`].
//!
//! The 900 × 650 playfield is scaled onto whatever grid of cells the
//! terminal offers.  Sprites become short glyph strings anchored at their
//! top-left cell; city bitmaps are shaded cell by cell from how much of the
//! cell is still standing.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use space_invaders::cities::Bitmap;
use space_invaders::collision::Rect;
use space_invaders::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use space_invaders::entities::{AlienTier, ExplosionKind, ProjectileKind, Vector2};
use space_invaders::surface::{self, Sprite, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_ALIEN_TOP: Color = Color::Magenta;
const C_ALIEN_MIDDLE: Color = Color::Cyan;
const C_ALIEN_BOTTOM: Color = Color::Green;
const C_CANNON: Color = Color::White;
const C_WRECK: Color = Color::Red;
const C_MYSTERY: Color = Color::Red;
const C_MISSILE: Color = Color::Cyan;
const C_ALIEN_SHOT: Color = Color::Yellow;
const C_EXPLOSION: Color = Color::Yellow;
const C_GROUND: Color = Color::Green;
const C_ARROW: Color = Color::Green;

fn palette(color: surface::Color) -> Color {
    match color {
        surface::Color::White => Color::White,
        surface::Color::Green => Color::Green,
        surface::Color::Red => Color::Red,
        surface::Color::Yellow => Color::Yellow,
        surface::Color::Cyan => Color::Cyan,
        surface::Color::DarkGrey => Color::DarkGrey,
    }
}

/// Glyph and colour for every sprite.
fn glyph(sprite: Sprite) -> (&'static str, Color) {
    match sprite {
        Sprite::Alien { tier, frame } => {
            let open = frame == 0;
            match tier {
                AlienTier::Top => (if open { "/o\\" } else { "\\o/" }, C_ALIEN_TOP),
                AlienTier::Middle => (if open { "{#}" } else { "}#{" }, C_ALIEN_MIDDLE),
                AlienTier::Bottom => (if open { "<W>" } else { ">W<" }, C_ALIEN_BOTTOM),
            }
        }
        Sprite::Cannon => ("/█\\", C_CANNON),
        Sprite::CannonWreck { frame } => (if frame == 0 { "*#*" } else { "#*#" }, C_WRECK),
        Sprite::MysteryShip => ("<=O=>", C_MYSTERY),
        Sprite::Projectile(ProjectileKind::Missile) => ("║", C_MISSILE),
        Sprite::Projectile(ProjectileKind::Beam) => ("↓", C_ALIEN_SHOT),
        Sprite::Projectile(ProjectileKind::Ray) => ("ǂ", C_ALIEN_SHOT),
        Sprite::Explosion(ExplosionKind::Alien) => ("\\*/", C_EXPLOSION),
        Sprite::Explosion(ExplosionKind::Air) => ("✶", C_EXPLOSION),
        Sprite::Explosion(ExplosionKind::Ground) => ("^", C_EXPLOSION),
        Sprite::Explosion(ExplosionKind::Ship { .. }) => ("<*>", C_MYSTERY),
        Sprite::Ground => ("─", C_GROUND),
        Sprite::ArrowLeft => ("◄", C_ARROW),
        Sprite::ArrowRight => ("►", C_ARROW),
    }
}

/// Shade for a cell of which `covered` of `total` bitmap pixels are opaque.
fn shade(covered: usize, total: usize) -> Option<&'static str> {
    if covered == 0 || total == 0 {
        return None;
    }
    let ratio = covered as f32 / total as f32;
    Some(if ratio >= 0.75 {
        "█"
    } else if ratio >= 0.5 {
        "▓"
    } else if ratio >= 0.25 {
        "▒"
    } else {
        "░"
    })
}

// ── Surface ───────────────────────────────────────────────────────────────────

pub struct TerminalSurface<'a, W: Write> {
    out: &'a mut W,
    cols: u16,
    rows: u16,
    origin: Vector2,
    saved: Vec<Vector2>,
    /// First write error of the frame; reported by [`finish`](Self::finish).
    error: Option<io::Error>,
}

impl<'a, W: Write> TerminalSurface<'a, W> {
    pub fn new(out: &'a mut W, (cols, rows): (u16, u16)) -> Self {
        Self {
            out,
            cols: cols.max(1),
            rows: rows.max(1),
            origin: Vector2::default(),
            saved: Vec::new(),
            error: None,
        }
    }

    pub fn resize(&mut self, (cols, rows): (u16, u16)) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
    }

    fn col_of(&self, x: f32) -> f32 {
        ((x + self.origin.x) / BOARD_WIDTH * self.cols as f32).floor()
    }

    fn row_of(&self, y: f32) -> f32 {
        ((y + self.origin.y) / BOARD_HEIGHT * self.rows as f32).floor()
    }

    /// Terminal cell holding playfield point `(x, y)`, if it is on screen.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let (col, row) = (self.col_of(x), self.row_of(y));
        let on_screen =
            col >= 0.0 && row >= 0.0 && col < self.cols as f32 && row < self.rows as f32;
        on_screen.then(|| (col as u16, row as u16))
    }

    fn put(&mut self, (col, row): (u16, u16), text: &str, color: Color) {
        if self.error.is_some() {
            return;
        }
        let room = usize::from(self.cols - col);
        let text: String = text.chars().take(room).collect();
        let result = self
            .out
            .queue(cursor::MoveTo(col, row))
            .and_then(|out| out.queue(style::SetForegroundColor(color)))
            .and_then(|out| out.queue(Print(text)))
            .map(|_| ());
        if let Err(e) = result {
            self.error = Some(e);
        }
    }

    pub fn bell(&mut self) {
        if self.error.is_none() {
            if let Err(e) = self.out.queue(Print('\x07')) {
                self.error = Some(e);
            }
        }
    }

    /// Flush the frame and report the first error hit while drawing it.
    pub fn finish(&mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}

impl<W: Write> Surface for TerminalSurface<'_, W> {
    fn clear(&mut self) {
        self.origin = Vector2::default();
        self.saved.clear();
        if let Err(e) = self.out.queue(terminal::Clear(terminal::ClearType::All)) {
            self.error = Some(e);
        }
    }

    fn save(&mut self) {
        self.saved.push(self.origin);
    }

    fn restore(&mut self) {
        if let Some(origin) = self.saved.pop() {
            self.origin = origin;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.origin = self.origin.offset(dx, dy);
    }

    fn fill_rect(&mut self, rect: Rect, color: surface::Color) {
        let Some((col, row)) = self.cell(rect.x, rect.y) else {
            return;
        };
        let right = self.col_of(rect.right()).max(col as f32 + 1.0);
        let width = (right - col as f32) as usize;
        self.put((col, row), &"█".repeat(width), palette(color));
    }

    fn draw_sprite(&mut self, sprite: Sprite, bounds: Rect) {
        let Some(cell) = self.cell(bounds.x, bounds.y) else {
            return;
        };
        let (text, color) = glyph(sprite);
        if sprite == Sprite::Ground {
            let right = self.col_of(bounds.right()).min(self.cols as f32);
            let width = (right - cell.0 as f32).max(1.0) as usize;
            self.put(cell, &text.repeat(width), color);
        } else {
            self.put(cell, text, color);
        }
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, origin: Vector2, color: surface::Color) {
        let (left, top) = (self.col_of(origin.x), self.row_of(origin.y));
        let right = self.col_of(origin.x + bitmap.width() as f32);
        let bottom = self.row_of(origin.y + bitmap.height() as f32);
        let px_per_col = BOARD_WIDTH / self.cols as f32;
        let px_per_row = BOARD_HEIGHT / self.rows as f32;
        let world = self.origin;

        for row in (top.max(0.0) as u16)..=(bottom.max(0.0) as u16).min(self.rows - 1) {
            let y0 = (row as f32 * px_per_row - world.y - origin.y).floor() as i32;
            let y1 = ((row + 1) as f32 * px_per_row - world.y - origin.y).floor() as i32;
            let mut line = String::new();
            let mut start = None;
            for col in (left.max(0.0) as u16)..=(right.max(0.0) as u16).min(self.cols - 1) {
                let x0 = (col as f32 * px_per_col - world.x - origin.x).floor() as i32;
                let x1 = ((col + 1) as f32 * px_per_col - world.x - origin.x).floor() as i32;
                let mut covered = 0;
                let mut total = 0;
                for y in y0.max(0)..y1.min(bitmap.height() as i32) {
                    for x in x0.max(0)..x1.min(bitmap.width() as i32) {
                        total += 1;
                        if bitmap.is_set(x, y) {
                            covered += 1;
                        }
                    }
                }
                match shade(covered, total) {
                    Some(block) => {
                        start.get_or_insert(col);
                        line.push_str(block);
                    }
                    None if start.is_some() => line.push(' '),
                    None => {}
                }
            }
            if let Some(col) = start {
                self.put((col, row), line.trim_end(), palette(color));
            }
        }
    }

    fn fill_text(&mut self, text: &str, at: Vector2, color: surface::Color) {
        if let Some(cell) = self.cell(at.x, at.y) {
            self.put(cell, text, palette(color));
        }
    }
}
