//! Neon Breakout - a brick-breaking arcade simulation
//!
//! Core modules:
//! - `sim`: Simulation (entities, level generation, collisions, game phases)
//! - `platform`: Host input translation
//! - `driver`: Frame driver turning host timestamps into simulation steps
//! - `persistence`: Save/load of session state
//! - `settings`: Difficulty presets and configuration

pub mod driver;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use driver::{FrameDriver, Surface};
pub use error::GameError;
pub use settings::{Difficulty, DifficultySettings, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Velocities are expressed per reference frame of this many milliseconds
    pub const REFERENCE_FRAME_MS: f32 = 16.0;

    /// Default playfield dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 160.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Pixels per frame while an arrow key is held
    pub const PADDLE_SPEED: f32 = 10.0;
    /// Distance from the paddle's top edge to the bottom of the playfield
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;
    /// Fraction of the remaining distance covered per frame when following the pointer
    pub const PADDLE_POINTER_EASE: f32 = 0.2;
    pub const PADDLE_SHRINK_STEP: f32 = 20.0;
    pub const PADDLE_MIN_WIDTH: f32 = 80.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const EXTRA_BALL_RADIUS: f32 = 8.0;
    /// Serve position, measured up from the bottom of the playfield
    pub const BALL_SPAWN_OFFSET: f32 = 100.0;
    pub const EXTRA_BALL_SPAWN_OFFSET: f32 = 120.0;
    pub const EXTRA_BALL_SPACING: f32 = 50.0;
    /// Total launch cone (±22.5° around vertical)
    pub const LAUNCH_SPREAD: f32 = std::f32::consts::FRAC_PI_4;
    /// Total paddle deflection range across the paddle width
    pub const BOUNCE_SPREAD: f32 = std::f32::consts::FRAC_PI_3;
    pub const TRAIL_LENGTH: usize = 10;
    pub const TRAIL_MAX_ALPHA: f32 = 0.8;

    /// Brick grid
    pub const BRICK_COLUMNS: u32 = 10;
    pub const MAX_BRICK_ROWS: u32 = 8;
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_PADDING: f32 = 5.0;
    pub const BRICK_OFFSET_TOP: f32 = 80.0;

    /// Brick impact pulse decay per frame
    pub const IMPACT_DECAY: f32 = 0.1;

    /// Pointer counts as moving for this long after the last move event
    pub const POINTER_IDLE_MS: f64 = 100.0;
}

/// Scale a per-reference-frame quantity by elapsed milliseconds
#[inline]
pub fn frame_scale(dt_ms: f32) -> f32 {
    dt_ms / consts::REFERENCE_FRAME_MS
}

/// Rescale a velocity to a new magnitude, keeping its direction.
///
/// Returns `None` for a zero-length vector, which has no direction to keep.
#[inline]
pub fn with_speed(vel: Vec2, speed: f32) -> Option<Vec2> {
    let current = vel.length();
    if current <= f32::EPSILON {
        return None;
    }
    Some(vel * (speed / current))
}

/// Velocity for a heading measured from straight up (positive = rightward)
#[inline]
pub fn velocity_from_heading(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.sin() * speed, -angle.cos() * speed)
}
