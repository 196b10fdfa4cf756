//! Level generation
//!
//! Builds the brick grid for a level, sprinkles special behaviors over it,
//! and applies level-wide modifiers to the paddle and balls. Which behaviors
//! are active is a pure function of the level number; the RNG only decides
//! which bricks get them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Ball, Brick, GameState, InvisibleState, MovingState, RegenState};
use crate::consts::*;

/// Special behaviors active on a level
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelFeatures {
    pub moving_bricks: bool,
    pub multi_hit_bricks: bool,
    pub invisible_bricks: bool,
    pub regenerating_bricks: bool,
    pub paddle_shrink: bool,
    /// Added to ball speed at the start of the level
    pub ball_speed_increase: f32,
    pub extra_balls: u32,
    pub obstacles: bool,
}

impl LevelFeatures {
    pub fn for_level(level: u32) -> Self {
        Self {
            moving_bricks: level >= 2,
            multi_hit_bricks: level >= 4,
            invisible_bricks: level >= 6,
            regenerating_bricks: level >= 8,
            paddle_shrink: level >= 10,
            ball_speed_increase: (level / 3) as f32 * 0.5,
            extra_balls: if level > 0 && level % 5 == 0 { 1 } else { 0 },
            obstacles: level >= 15,
        }
    }
}

/// Chance a brick becomes multi-hit
pub const MULTI_HIT_CHANCE: f64 = 0.2;
/// Chance a brick becomes invisible
pub const INVISIBLE_CHANCE: f64 = 0.15;
/// Chance a brick becomes regenerating
pub const REGEN_CHANCE: f64 = 0.1;
/// Extra health on a multi-hit brick
pub const MULTI_HIT_BONUS_HEALTH: u32 = 2;
/// Time to regrow one health point
pub const REGEN_DELAY_MS: f32 = 5000.0;
/// Moving bricks drift at most this far from where they spawned
pub const MOVING_BRICK_RANGE: f32 = 60.0;
/// Moving bricks appear in rows above this one...
pub const MOVING_BRICK_ROWS: u32 = 2;
/// ...on every column divisible by this
pub const MOVING_BRICK_COLUMN_STRIDE: u32 = 4;

pub const MULTI_HIT_HUE: u16 = 270;
pub const REGEN_HUE: u16 = 120;

/// Obstacle geometry and motion
pub const OBSTACLE_COUNT: usize = 2;
pub const OBSTACLE_SIZE: f32 = 40.0;
pub const OBSTACLE_FIRST_X: f32 = 200.0;
pub const OBSTACLE_SPACING: f32 = 300.0;
pub const OBSTACLE_Y: f32 = 300.0;
pub const OBSTACLE_SPEED: f32 = 2.0;
pub const OBSTACLE_RANGE: f32 = 150.0;

/// Number of brick rows for a level
pub fn row_count(base_rows: u32, level: u32) -> u32 {
    (base_rows + level / 2).min(MAX_BRICK_ROWS)
}

/// Health of a plain brick in `row` on `level`
pub fn base_health(row: u32, level: u32) -> u32 {
    row / 2 + 1 + level / 5
}

/// Points for a plain brick with `health` on `level`
pub fn base_points(health: u32, level: u32) -> u32 {
    health * 10 * level
}

/// Hue of the cell, banded by row
pub fn cell_hue(row: u32, col: u32) -> u16 {
    ((row * 60 + col * 15) % 360) as u16
}

/// Left edge of the grid so it sits centered on the canvas
pub fn grid_offset_left(canvas_width: f32) -> f32 {
    (canvas_width - BRICK_COLUMNS as f32 * (BRICK_WIDTH + BRICK_PADDING)) / 2.0
}

/// Build the brick grid for `level`, row by row
pub fn build_grid(
    level: u32,
    base_rows: u32,
    canvas_width: f32,
    features: &LevelFeatures,
    rng: &mut impl Rng,
) -> Vec<Brick> {
    let rows = row_count(base_rows, level);
    let offset_left = grid_offset_left(canvas_width);
    let mut bricks = Vec::with_capacity((rows * BRICK_COLUMNS) as usize);

    for row in 0..rows {
        for col in 0..BRICK_COLUMNS {
            let health = base_health(row, level);
            let pos = Vec2::new(
                col as f32 * (BRICK_WIDTH + BRICK_PADDING) + offset_left,
                row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP,
            );
            let mut brick = Brick::new(
                pos,
                BRICK_WIDTH,
                BRICK_HEIGHT,
                health,
                cell_hue(row, col),
                base_points(health, level),
            );
            assign_traits(&mut brick, row, col, features, rng);
            bricks.push(brick);
        }
    }

    bricks
}

/// Roll special behaviors for one brick.
///
/// Each roll is independent, so traits stack. Hue is overwritten in roll
/// order, which makes regenerating win over multi-hit.
pub fn assign_traits(
    brick: &mut Brick,
    row: u32,
    col: u32,
    features: &LevelFeatures,
    rng: &mut impl Rng,
) {
    if features.moving_bricks
        && row < MOVING_BRICK_ROWS
        && col % MOVING_BRICK_COLUMN_STRIDE == 0
    {
        let speed = 1.0 + rng.random::<f32>();
        let direction = if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
        brick.traits.moving = Some(MovingState::new(
            speed,
            direction,
            brick.pos.x,
            MOVING_BRICK_RANGE,
        ));
    }

    if features.multi_hit_bricks && rng.random_bool(MULTI_HIT_CHANCE) {
        brick.health += MULTI_HIT_BONUS_HEALTH;
        brick.max_health = brick.health;
        brick.points *= 2;
        brick.hue = MULTI_HIT_HUE;
        brick.traits.multi_hit = true;
    }

    if features.invisible_bricks && rng.random_bool(INVISIBLE_CHANCE) {
        brick.traits.invisible = Some(InvisibleState::default());
        brick.points = brick.points * 3 / 2;
    }

    if features.regenerating_bricks && rng.random_bool(REGEN_CHANCE) {
        brick.traits.regenerating = Some(RegenState::new(REGEN_DELAY_MS));
        brick.hue = REGEN_HUE;
        brick.points *= 2;
    }
}

/// The two indestructible sliding obstacles
pub fn obstacles() -> Vec<Brick> {
    (0..OBSTACLE_COUNT)
        .map(|i| {
            let x = OBSTACLE_FIRST_X + i as f32 * OBSTACLE_SPACING;
            Brick::obstacle(
                Vec2::new(x, OBSTACLE_Y),
                OBSTACLE_SIZE,
                MovingState::new(OBSTACLE_SPEED, 1.0, x, OBSTACLE_RANGE),
            )
        })
        .collect()
}

/// Apply level-wide modifiers after the grid is built
pub fn apply_modifiers(state: &mut GameState, features: &LevelFeatures) {
    if features.ball_speed_increase > 0.0 {
        for ball in &mut state.balls {
            ball.speed_up(features.ball_speed_increase);
        }
    }

    if features.paddle_shrink {
        state.paddle.shrink();
    }

    if features.extra_balls > 0 {
        let speed = state
            .primary_ball()
            .map(|b| b.speed)
            .unwrap_or_else(|| state.difficulty.settings().ball_speed);
        for i in 0..features.extra_balls {
            let pos = Vec2::new(
                state.canvas_width / 2.0 + i as f32 * EXTRA_BALL_SPACING,
                state.canvas_height - EXTRA_BALL_SPAWN_OFFSET,
            );
            state.balls.push(Ball::new(pos, EXTRA_BALL_RADIUS, speed));
        }
    }

    if features.obstacles {
        log::warn!(
            "Level {} adds indestructible obstacles; completion still requires every brick destroyed",
            state.stats.level
        );
        state.bricks.extend(obstacles());
    }
}

/// Build the current level (`state.stats.level`) and apply its modifiers.
///
/// Expects the ball and paddle to have been reset for the new level.
pub fn init_level(state: &mut GameState) {
    let level = state.stats.level;
    let preset = state.difficulty.settings();
    let features = LevelFeatures::for_level(level);

    state.bricks = build_grid(
        level,
        preset.brick_rows,
        state.canvas_width,
        &features,
        &mut state.rng,
    );
    state.power_ups.clear();
    apply_modifiers(state, &features);
    state.features = features;

    let special = state.bricks.iter().filter(|b| !b.traits.is_plain()).count();
    log::info!(
        "Level {} ({}): {} bricks, {} special, features {:?}",
        level,
        state.difficulty.as_str(),
        state.bricks.len(),
        special,
        features
    );
}
