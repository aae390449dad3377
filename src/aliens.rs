//! The alien formation: a 5 × 11 grid that marches sideways in lock-step,
//! drops a row on every wall bounce, speeds up as it thins out and returns
//! fire from the front of its columns.

use rand::Rng;
use tracing::debug;

use crate::cannons::Cannons;
use crate::cities::Cities;
use crate::collision::{intersects, Rect};
use crate::constants::{
    ALIEN_COLUMNS, ALIEN_DESCENT, ALIEN_FIRE_CHANCE, ALIEN_HEIGHT, ALIEN_JUMP, ALIEN_ROWS,
    ALIEN_X_SPACING, ALIEN_Y_SPACING, BOARD_HEIGHT, BOARD_WIDTH, CANNON_CAPTURE_HEIGHT,
    CANNON_WIDTH, FINAL_SPEED, FORMATION_TOP, GROUND_OFFSET, PLAYGROUND_OFFSET, RAY_ROTATION,
    SPEED_TIERS,
};
use crate::context::{Audio, Context, Sound};
use crate::effects::Explosions;
use crate::entities::{AlienTier, Direction, ExplosionKind, ProjectileKind, Vector2};
use crate::projectiles::Shots;
use crate::score::Score;
use crate::surface::{Draw, Sprite, Surface};

/// Ticks between two formation steps with `remaining` aliens alive.
pub fn step_interval(remaining: usize) -> u32 {
    SPEED_TIERS
        .iter()
        .find(|&&(min, _)| remaining >= min)
        .map(|&(_, ticks)| ticks)
        .unwrap_or(FINAL_SPEED)
}

// ── Alien ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    pub position: Vector2,
    pub tier: AlienTier,
    /// Animation frame, 0 or 1.
    pub version: u8,
    pub direction: Direction,
    /// Direction requested by the last border check, committed formation-wide
    /// by [`Formation::set_direction`].
    pub new_direction: Direction,
    pub removed: bool,
}

impl Alien {
    pub fn new(tier: AlienTier, position: Vector2, direction: Direction) -> Self {
        Self {
            position,
            tier,
            version: 0,
            direction,
            new_direction: direction,
            removed: false,
        }
    }

    pub fn width(&self) -> f32 {
        self.tier.width()
    }

    pub fn height(&self) -> f32 {
        ALIEN_HEIGHT
    }

    pub fn points(&self) -> u32 {
        self.tier.points()
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.position, self.width(), self.height())
    }

    /// One step: flip the animation frame, jump sideways, then look for the
    /// wall.
    pub fn update(&mut self) {
        self.version ^= 1;
        self.position.x += ALIEN_JUMP * self.direction.sign();
        self.stay_in_area();
    }

    fn stay_in_area(&mut self) {
        if self.position.x < PLAYGROUND_OFFSET {
            self.new_direction = Direction::Right;
        } else if self.position.x + self.width() > BOARD_WIDTH - PLAYGROUND_OFFSET {
            self.new_direction = Direction::Left;
        }
    }
}

impl Draw for Alien {
    fn draw(&self, surface: &mut dyn Surface) {
        let sprite = Sprite::Alien {
            tier: self.tier,
            frame: self.version,
        };
        surface.draw_sprite(sprite, self.bounds());
    }
}

// ── Formation ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Formation {
    aliens: Vec<Alien>,
    direction: Direction,
    ticks_since_step: u32,
    high_note: bool,
    shots_fired: u32,
    pub beams: Shots,
    pub rays: Shots,
    explosions: Explosions,
}

impl Default for Formation {
    fn default() -> Self {
        Self::new()
    }
}

impl Formation {
    /// An empty formation; call [`start`](Self::start) to lay out a wave.
    pub fn new() -> Self {
        Self {
            aliens: Vec::new(),
            direction: Direction::Left,
            ticks_since_step: 0,
            high_note: false,
            shots_fired: 0,
            beams: Shots::beams(),
            rays: Shots::rays(),
            explosions: Explosions::default(),
        }
    }

    /// Lay out a fresh 5 × 11 wave heading left and clear every shot.
    pub fn start(&mut self) {
        self.direction = Direction::Left;
        self.aliens = (0..ALIEN_ROWS)
            .flat_map(|row| {
                let tier = AlienTier::for_row(row);
                let y = FORMATION_TOP + ALIEN_Y_SPACING * row as f32;
                (0..ALIEN_COLUMNS).map(move |col| {
                    let x = tier.row_origin() + ALIEN_X_SPACING * col as f32;
                    Alien::new(tier, Vector2::new(x, y), Direction::Left)
                })
            })
            .collect();
        self.ticks_since_step = 0;
        self.high_note = false;
        self.shots_fired = 0;
        self.beams.start();
        self.rays.start();
        self.explosions.clear();
        debug!(aliens = self.aliens.len(), "formation laid out");
    }

    pub fn aliens(&self) -> &[Alien] {
        &self.aliens
    }

    pub fn aliens_mut(&mut self) -> &mut Vec<Alien> {
        &mut self.aliens
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.aliens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliens.is_empty()
    }

    pub fn explosions(&self) -> &Explosions {
        &self.explosions
    }

    /// Ticks between steps at the current population.
    pub fn current_step_interval(&self) -> u32 {
        step_interval(self.aliens.len())
    }

    /// Advance every alien one jump and sound the next marching note.
    pub fn step(&mut self, audio: &mut dyn Audio) {
        for alien in &mut self.aliens {
            alien.update();
        }
        self.high_note = !self.high_note;
        audio.play(if self.high_note {
            Sound::AlienMoveHigh
        } else {
            Sound::AlienMoveLow
        });
    }

    /// Commit a pending direction change to the whole formation.
    ///
    /// On a flip every alien drops [`ALIEN_DESCENT`] unless that would take
    /// the lowest row into the ground strip.
    pub fn set_direction(&mut self) {
        let Some(turn) = self
            .aliens
            .iter()
            .map(|a| a.new_direction)
            .find(|&d| d != self.direction)
        else {
            return;
        };

        self.direction = turn;
        let lowest = self
            .aliens
            .iter()
            .map(|a| a.position.y)
            .fold(f32::MIN, f32::max);
        let descend = lowest + ALIEN_DESCENT < BOARD_HEIGHT - GROUND_OFFSET;

        for alien in &mut self.aliens {
            alien.direction = turn;
            alien.new_direction = turn;
            if descend {
                alien.position.y += ALIEN_DESCENT;
            }
        }
    }

    /// Flag the first live alien overlapping `missile`.
    pub fn aliens_hit(&mut self, missile: Rect) -> bool {
        match self
            .aliens
            .iter_mut()
            .find(|a| !a.removed && intersects(a.bounds(), missile))
        {
            Some(alien) => {
                alien.removed = true;
                true
            }
            None => false,
        }
    }

    /// Has any alien reached the cannon standing at `cannon`?
    pub fn aliens_hit_cannon(&self, cannon: Vector2) -> bool {
        let reach = Rect::at(cannon, CANNON_WIDTH, CANNON_CAPTURE_HEIGHT);
        self.aliens
            .iter()
            .any(|a| !a.removed && intersects(a.bounds(), reach))
    }

    /// Remove every beam and ray overlapping `missile`.
    pub fn annihilate_shots(&mut self, missile: Rect) -> bool {
        let beams = self.beams.annihilate(missile);
        let rays = self.rays.annihilate(missile);
        beams || rays
    }

    /// Index of the alien that actually fires when `picked` is chosen: the
    /// lowest alien in the picked alien's column.
    pub fn frontmost_in_column(&self, picked: usize) -> usize {
        let mut shooter = picked;
        for (i, alien) in self.aliens.iter().enumerate() {
            let current = &self.aliens[shooter];
            let column = Rect::new(
                current.position.x,
                current.position.y,
                current.width(),
                BOARD_HEIGHT - current.position.y,
            );
            if i != shooter && intersects(column, alien.bounds()) {
                shooter = i;
            }
        }
        shooter
    }

    fn fire(&mut self, ctx: &mut Context) {
        if self.aliens.is_empty() || !ctx.rng.gen_bool(ALIEN_FIRE_CHANCE) {
            return;
        }
        let picked = ctx.rng.gen_range(0..self.aliens.len());
        self.fire_from(picked, &mut *ctx.audio);
    }

    /// Fire the next shot of the rotation from the front of `picked`'s
    /// column.  Every eighth shot is a ray.
    pub fn fire_from(&mut self, picked: usize, audio: &mut dyn Audio) -> Option<ProjectileKind> {
        if picked >= self.aliens.len() {
            return None;
        }
        let shooter = self.aliens[self.frontmost_in_column(picked)].bounds();

        self.shots_fired = (self.shots_fired + 1) % RAY_ROTATION;
        let shots = if self.shots_fired == 0 {
            &mut self.rays
        } else {
            &mut self.beams
        };
        let origin = shots.muzzle(shooter);
        shots.fire(origin, audio);
        Some(shots.kind())
    }

    fn remove_dead(&mut self, score: &mut Score, audio: &mut dyn Audio) {
        for i in (0..self.aliens.len()).rev() {
            if self.aliens[i].removed {
                let alien = self.aliens.remove(i);
                self.explosions.spawn(ExplosionKind::Alien, alien.position);
                score.add_score(alien.points());
                audio.play(Sound::AlienExplosion);
            }
        }
    }

    /// One formation tick: bury the dead, march when due, commit turns, maybe
    /// fire, then move the alien shots.
    pub fn update(
        &mut self,
        ctx: &mut Context,
        cannons: &mut Cannons,
        cities: &mut Cities,
        score: &mut Score,
    ) {
        self.remove_dead(score, &mut *ctx.audio);

        self.ticks_since_step += 1;
        if !self.aliens.is_empty() && self.ticks_since_step >= self.current_step_interval() {
            self.ticks_since_step = 0;
            self.step(&mut *ctx.audio);
        }
        self.set_direction();

        self.fire(ctx);
        self.beams.update(cannons, cities, &mut *ctx.audio);
        self.rays.update(cannons, cities, &mut *ctx.audio);
        self.explosions.update();
    }
}

impl Draw for Formation {
    fn draw(&self, surface: &mut dyn Surface) {
        for alien in &self.aliens {
            alien.draw(surface);
        }
        self.explosions.draw(surface);
        self.beams.draw(surface);
        self.rays.draw(surface);
    }
}
