//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Frame-time scaled movement (16 ms reference frame)
//! - Seeded RNG owned by the session
//! - Single-threaded; one step per host frame

pub mod collision;
pub mod level;
pub mod phase;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{
    BrickHit, ReflectAxis, ball_brick_collisions, ball_paddle_collision, ball_wall_collision,
    paddle_bounce_velocity, reflect, reflection_axis,
};
pub use level::{LevelFeatures, build_grid, init_level, row_count};
pub use phase::Command;
pub use snapshot::Snapshot;
pub use state::{
    Ball, Brick, BrickTraits, GamePhase, GameState, InvisibleState, MovingState, Paddle, PowerUp,
    PowerUpKind, RegenState, Stats, TrailPoint, format_time,
};
pub use tick::{TickInput, tick};
