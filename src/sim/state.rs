//! Game state and core simulation types
//!
//! Entities, their per-frame update rules, and the session object that owns
//! them. Velocities are in pixels per reference frame (see
//! [`crate::consts::REFERENCE_FRAME_MS`]).

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::LevelFeatures;
use crate::consts::*;
use crate::settings::{Difficulty, Settings};
use crate::{frame_scale, velocity_from_heading, with_speed};

/// Current screen/mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Main menu, nothing simulated
    Start,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Every brick is down, waiting for the player to continue
    LevelComplete,
    /// Run ended; needs an explicit restart or main menu
    GameOver,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Launch speed
    pub speed: f32,
    /// Speed the ball was created with
    pub base_speed: f32,
    pub launched: bool,
    /// Recent positions, oldest first
    pub trail: VecDeque<TrailPoint>,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            speed,
            base_speed: speed,
            launched: false,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Send the ball upward at a random angle within ±22.5° of vertical.
    ///
    /// Callers must not launch a ball that is already moving.
    pub fn launch(&mut self, rng: &mut impl Rng) {
        let angle = (rng.random::<f32>() - 0.5) * LAUNCH_SPREAD;
        self.vel = velocity_from_heading(angle, self.speed);
        self.launched = true;
    }

    /// Advance position by `dt_ms` and record the trail
    pub fn update(&mut self, dt_ms: f32) {
        if !self.launched {
            return;
        }

        self.pos += self.vel * frame_scale(dt_ms);

        self.trail.push_back(TrailPoint {
            pos: self.pos,
            alpha: 1.0,
        });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }

        // Older points fade out
        let len = self.trail.len() as f32;
        for (i, point) in self.trail.iter_mut().enumerate() {
            point.alpha = i as f32 / len * TRAIL_MAX_ALPHA;
        }
    }

    /// Current speed magnitude
    #[inline]
    pub fn current_speed(&self) -> f32 {
        self.vel.length()
    }

    /// Raise launch speed by `increase` and rescale any current velocity to match.
    pub fn speed_up(&mut self, increase: f32) {
        self.speed += increase;
        if let Some(vel) = with_speed(self.vel, self.current_speed() + increase) {
            self.vel = vel;
        }
    }

    /// Top of the ball's bounding box
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    /// Bottom of the ball's bounding box
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Width at the start of the level, before any shrink
    pub original_width: f32,
    /// Keyboard speed in pixels per frame
    pub speed: f32,
}

impl Paddle {
    /// Centered paddle near the bottom of the playfield
    pub fn centered(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            pos: Vec2::new(
                canvas_width / 2.0 - PADDLE_WIDTH / 2.0,
                canvas_height - PADDLE_BOTTOM_OFFSET,
            ),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            original_width: PADDLE_WIDTH,
            speed: PADDLE_SPEED,
        }
    }

    /// Move from held arrow keys and an optional moving pointer.
    ///
    /// Keyboard steps a fixed distance per frame; the pointer eases the paddle
    /// toward its target. Both can apply in the same frame.
    pub fn update(&mut self, left: bool, right: bool, pointer_x: Option<f32>, canvas_width: f32) {
        let max_x = (canvas_width - self.width).max(0.0);

        if left && self.pos.x > 0.0 {
            self.pos.x -= self.speed;
        }
        if right && self.pos.x < max_x {
            self.pos.x += self.speed;
        }

        if let Some(px) = pointer_x {
            let target = (px - self.width / 2.0).clamp(0.0, max_x);
            self.pos.x += (target - self.pos.x) * PADDLE_POINTER_EASE;
        }

        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }

    /// Narrow the paddle by one step, never below the minimum width
    pub fn shrink(&mut self) {
        self.width = (self.width - PADDLE_SHRINK_STEP).max(PADDLE_MIN_WIDTH);
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }
}

/// Side-to-side motion of a moving brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingState {
    /// Pixels per reference frame
    pub speed: f32,
    /// +1 right, -1 left
    pub direction: f32,
    pub origin_x: f32,
    /// Maximum displacement from `origin_x` before reversing
    pub range: f32,
}

impl MovingState {
    pub fn new(speed: f32, direction: f32, origin_x: f32, range: f32) -> Self {
        Self {
            speed,
            direction,
            origin_x,
            range,
        }
    }

    #[inline]
    pub fn reverse(&mut self) {
        self.direction = -self.direction;
    }
}

/// Health regrowth of a regenerating brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenState {
    pub timer_ms: f32,
    /// Time to regrow one health point
    pub delay_ms: f32,
}

impl RegenState {
    pub fn new(delay_ms: f32) -> Self {
        Self {
            timer_ms: 0.0,
            delay_ms,
        }
    }

    /// Fraction of the way to the next health point (0-1)
    pub fn progress(&self) -> f32 {
        if self.delay_ms <= 0.0 {
            return 1.0;
        }
        (self.timer_ms / self.delay_ms).clamp(0.0, 1.0)
    }
}

/// Flickering opacity of an invisible brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvisibleState {
    pub alpha: f32,
}

/// Base opacity of invisible bricks
pub const INVISIBLE_ALPHA: f32 = 0.3;
/// Flicker amplitude around [`INVISIBLE_ALPHA`]
pub const INVISIBLE_FLICKER: f32 = 0.2;
/// Health of an obstacle; never reduced
pub const OBSTACLE_HEALTH: u32 = 999;

impl Default for InvisibleState {
    fn default() -> Self {
        Self {
            alpha: INVISIBLE_ALPHA,
        }
    }
}

/// Special behaviors a brick may carry. Traits are independent; a brick can
/// be moving, invisible and regenerating at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrickTraits {
    pub moving: Option<MovingState>,
    pub invisible: Option<InvisibleState>,
    pub regenerating: Option<RegenState>,
    pub multi_hit: bool,
    /// Indestructible: reflects the ball, never takes damage or scores
    pub obstacle: bool,
}

impl BrickTraits {
    /// True when no special behavior is set
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A brick entity
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub health: u32,
    pub max_health: u32,
    /// Color hue in degrees (0-359)
    pub hue: u16,
    pub points: u32,
    pub destroyed: bool,
    /// Hit pulse (1.0 on impact, decays each frame)
    pub impact: f32,
    pub traits: BrickTraits,
}

impl Brick {
    pub fn new(pos: Vec2, width: f32, height: f32, health: u32, hue: u16, points: u32) -> Self {
        Self {
            pos,
            width,
            height,
            health,
            max_health: health,
            hue,
            points,
            destroyed: false,
            impact: 0.0,
            traits: BrickTraits::default(),
        }
    }

    /// An indestructible brick that slides back and forth
    pub fn obstacle(pos: Vec2, size: f32, motion: MovingState) -> Self {
        let mut brick = Self::new(pos, size, size, OBSTACLE_HEALTH, 0, 0);
        brick.traits.obstacle = true;
        brick.traits.moving = Some(motion);
        brick
    }

    /// Apply one hit. Always registers; obstacles are skipped by the caller.
    pub fn take_damage(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.destroyed = true;
        }
        self.impact = 1.0;
        true
    }

    #[inline]
    pub fn is_obstacle(&self) -> bool {
        self.traits.obstacle
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    /// Advance motion, regrowth, flicker and the impact pulse.
    ///
    /// `clock_ms` is the session clock driving the invisible flicker.
    pub fn update(&mut self, dt_ms: f32, clock_ms: f64, canvas_width: f32) {
        let scale = frame_scale(dt_ms);

        if let Some(motion) = self.traits.moving.as_mut() {
            self.pos.x += motion.speed * motion.direction * scale;

            if (self.pos.x - motion.origin_x).abs() > motion.range {
                motion.reverse();
            }

            if self.pos.x < 0.0 || self.pos.x + self.width > canvas_width {
                motion.reverse();
                self.pos.x = self.pos.x.clamp(0.0, (canvas_width - self.width).max(0.0));
            }
        }

        if let Some(regen) = self.traits.regenerating.as_mut() {
            if self.health < self.max_health {
                regen.timer_ms += dt_ms;
                if regen.timer_ms >= regen.delay_ms {
                    self.health = (self.health + 1).min(self.max_health);
                    self.destroyed = false;
                    regen.timer_ms = 0.0;
                }
            }
        }

        if let Some(invisible) = self.traits.invisible.as_mut() {
            invisible.alpha = INVISIBLE_ALPHA + (clock_ms * 0.01).sin() as f32 * INVISIBLE_FLICKER;
        }

        if self.impact > 0.0 {
            self.impact = (self.impact - IMPACT_DECAY).max(0.0);
        }
    }

    /// Draw opacity: remaining health fraction, dimmed when invisible.
    /// Obstacles are always opaque.
    pub fn opacity(&self) -> f32 {
        if self.traits.obstacle {
            return 1.0;
        }
        let mut alpha = if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        };
        if let Some(invisible) = self.traits.invisible {
            alpha *= invisible.alpha;
        }
        alpha
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    MultiBall,
    WidePaddle,
    SlowBall,
    ExtraLife,
}

impl PowerUpKind {
    pub fn icon(&self) -> &'static str {
        match self {
            PowerUpKind::MultiBall => "⚫",
            PowerUpKind::WidePaddle => "↔",
            PowerUpKind::SlowBall => "⏱",
            PowerUpKind::ExtraLife => "♥",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PowerUpKind::MultiBall => "#00d4ff",
            PowerUpKind::WidePaddle => "#00ff9f",
            PowerUpKind::SlowBall => "#ffd400",
            PowerUpKind::ExtraLife => "#ff3d7f",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PowerUpKind::MultiBall => "Splits the ball",
            PowerUpKind::WidePaddle => "Widens the paddle",
            PowerUpKind::SlowBall => "Slows the ball",
            PowerUpKind::ExtraLife => "One more life",
        }
    }
}

/// Default fall speed of a power-up (pixels per reference frame)
pub const POWER_UP_FALL_SPEED: f32 = 2.0;

/// A falling collectible. Not yet wired into collisions.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Center
    pub pos: Vec2,
    pub dy: f32,
    pub rotation: f32,
    pub pulse: f32,
    pub scale: f32,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            dy: POWER_UP_FALL_SPEED,
            rotation: 0.0,
            pulse: 0.0,
            scale: 1.0,
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.pos.y += self.dy * frame_scale(dt_ms);
        self.rotation += 0.02;
        self.pulse += 0.1;
        self.scale = 1.0 + self.pulse.sin() * 0.1;
    }
}

/// Run statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    /// Current score multiplier
    pub combo: u32,
    pub max_combo: u32,
    pub bricks_destroyed: u32,
    /// Session clock when the run started
    pub start_time: f64,
    /// Run length, written once at game over
    #[serde(default)]
    pub elapsed_ms: Option<f64>,
}

impl Stats {
    pub fn new(lives: u32, start_time: f64) -> Self {
        Self {
            score: 0,
            level: 1,
            lives,
            combo: 1,
            max_combo: 1,
            bricks_destroyed: 0,
            start_time,
            elapsed_ms: None,
        }
    }

    /// Score a hit on a brick worth `points`; returns the points awarded.
    pub fn register_hit(&mut self, points: u32, destroyed: bool) -> u64 {
        let awarded = points as u64 * self.combo as u64;
        self.score += awarded;
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        if destroyed {
            self.bricks_destroyed += 1;
        }
        awarded
    }

    pub fn reset_combo(&mut self) {
        self.combo = 1;
    }

    /// Freeze run length at `now`
    pub fn freeze(&mut self, now: f64) {
        self.elapsed_ms = Some((now - self.start_time).max(0.0));
    }
}

/// Format milliseconds as `mm:ss`
pub fn format_time(ms: f64) -> String {
    let total_secs = (ms.max(0.0) / 1000.0).floor() as u64;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub difficulty: Difficulty,
    pub phase: GamePhase,
    pub stats: Stats,
    pub paddle: Paddle,
    /// Active balls; the first is the served ball
    pub balls: Vec<Ball>,
    /// Bricks of the current level, destroyed ones included
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    /// Features of the current level
    pub features: LevelFeatures,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Milliseconds of frame time fed to the session
    pub clock_ms: f64,
}

impl GameState {
    /// Create a session on the start screen
    pub fn new(difficulty: Difficulty, seed: u64, canvas_width: f32, canvas_height: f32) -> Self {
        let preset = difficulty.settings();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            phase: GamePhase::Start,
            stats: Stats::new(preset.lives, 0.0),
            paddle: Paddle::centered(canvas_width, canvas_height),
            balls: Vec::new(),
            bricks: Vec::new(),
            power_ups: Vec::new(),
            features: LevelFeatures::default(),
            canvas_width,
            canvas_height,
            clock_ms: 0.0,
        };
        state.reset_ball();
        state
    }

    /// Create a session from configuration
    pub fn from_settings(settings: &Settings, seed: u64) -> Self {
        Self::new(
            settings.difficulty,
            seed,
            settings.canvas_width,
            settings.canvas_height,
        )
    }

    /// Replace all balls with a single unlaunched ball at the serve position
    pub fn reset_ball(&mut self) {
        let pos = Vec2::new(
            self.canvas_width / 2.0,
            self.canvas_height - BALL_SPAWN_OFFSET,
        );
        let speed = self.difficulty.settings().ball_speed;
        self.balls = vec![Ball::new(pos, BALL_RADIUS, speed)];
    }

    /// Put a fresh paddle back in the middle
    pub fn reset_paddle(&mut self) {
        self.paddle = Paddle::centered(self.canvas_width, self.canvas_height);
    }

    /// The served ball, if any are in play
    pub fn primary_ball(&self) -> Option<&Ball> {
        self.balls.first()
    }

    /// True once every brick, obstacles included, is destroyed
    pub fn all_bricks_destroyed(&self) -> bool {
        self.bricks.iter().all(|b| b.destroyed)
    }

    /// Launch every ball still waiting; returns how many were launched
    pub fn launch_waiting_balls(&mut self) -> usize {
        let mut launched = 0;
        for ball in self.balls.iter_mut().filter(|b| !b.launched) {
            ball.launch(&mut self.rng);
            launched += 1;
        }
        launched
    }

    /// Elapsed run time as shown on screen
    pub fn run_time_ms(&self) -> f64 {
        self.stats
            .elapsed_ms
            .unwrap_or(self.clock_ms - self.stats.start_time)
    }
}
