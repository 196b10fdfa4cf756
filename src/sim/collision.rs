//! Collision detection and response
//!
//! Axis-aligned playfield: walls on the left, right and top, the paddle at
//! the bottom, and rectangular bricks. Reflections negate a single velocity
//! component so they never change the ball's speed; only the paddle bounce
//! re-aims the ball.

use glam::Vec2;

use super::state::{Ball, Brick, Paddle, Stats};
use crate::consts::BOUNCE_SPREAD;
use crate::velocity_from_heading;

/// Velocity axis to negate on a bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectAxis {
    X,
    Y,
}

/// Negate one velocity component
#[inline]
pub fn reflect(vel: Vec2, axis: ReflectAxis) -> Vec2 {
    match axis {
        ReflectAxis::X => Vec2::new(-vel.x, vel.y),
        ReflectAxis::Y => Vec2::new(vel.x, -vel.y),
    }
}

/// Bounce off the side walls and ceiling. There is no floor.
///
/// Returns true if any wall was hit.
pub fn ball_wall_collision(ball: &mut Ball, canvas_width: f32) -> bool {
    let mut hit = false;

    if ball.pos.x <= ball.radius || ball.pos.x >= canvas_width - ball.radius {
        ball.vel = reflect(ball.vel, ReflectAxis::X);
        hit = true;
    }

    if ball.pos.y <= ball.radius {
        ball.vel = reflect(ball.vel, ReflectAxis::Y);
        hit = true;
    }

    hit
}

/// Ball's lower edge has reached the paddle, over its span, while falling
pub fn ball_paddle_overlap(ball: &Ball, paddle: &Paddle) -> bool {
    ball.bottom() >= paddle.pos.y
        && ball.pos.x >= paddle.pos.x
        && ball.pos.x <= paddle.right()
        && ball.vel.y > 0.0
}

/// Outgoing velocity for a paddle hit at `hit_pos` (0 = left edge, 1 = right edge).
///
/// The center sends the ball straight up; the edges deflect it by half of
/// [`BOUNCE_SPREAD`] from vertical.
pub fn paddle_bounce_velocity(hit_pos: f32, speed: f32) -> Vec2 {
    let angle = (hit_pos - 0.5) * BOUNCE_SPREAD;
    velocity_from_heading(angle, speed)
}

/// Re-aim the ball from where it struck the paddle, keeping its speed
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle) {
    let hit_pos = if paddle.width > 0.0 {
        (ball.pos.x - paddle.pos.x) / paddle.width
    } else {
        0.5
    };
    ball.vel = paddle_bounce_velocity(hit_pos, ball.current_speed());
}

/// Check and resolve a paddle hit. Returns true on a bounce.
pub fn ball_paddle_collision(ball: &mut Ball, paddle: &Paddle) -> bool {
    if !ball_paddle_overlap(ball, paddle) {
        return false;
    }
    bounce_off_paddle(ball, paddle);
    true
}

/// Ball's bounding box strictly overlaps the brick rectangle
pub fn ball_brick_overlap(ball: &Ball, brick: &Brick) -> bool {
    ball.pos.x + ball.radius > brick.pos.x
        && ball.pos.x - ball.radius < brick.right()
        && ball.pos.y + ball.radius > brick.pos.y
        && ball.pos.y - ball.radius < brick.bottom()
}

/// Pick the bounce axis from the ball's offset to the brick center,
/// normalized by brick size. Ties reflect vertically.
pub fn reflection_axis(ball_pos: Vec2, brick: &Brick) -> ReflectAxis {
    let offset = ball_pos - brick.center();
    if (offset.x / brick.width).abs() > (offset.y / brick.height).abs() {
        ReflectAxis::X
    } else {
        ReflectAxis::Y
    }
}

/// What a single brick hit did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickHit {
    /// Index into the brick list
    pub index: usize,
    pub axis: ReflectAxis,
    /// Points added to the score (0 for obstacles)
    pub awarded: u64,
    /// This hit brought the brick down
    pub destroyed: bool,
    pub obstacle: bool,
}

/// Resolve every live brick the ball overlaps, in list order.
///
/// Each overlap reflects the ball. Non-obstacle bricks take a hit and score
/// `points * combo`; obstacles only reflect.
pub fn ball_brick_collisions(ball: &mut Ball, bricks: &mut [Brick], stats: &mut Stats) -> Vec<BrickHit> {
    let mut hits = Vec::new();

    for (index, brick) in bricks.iter_mut().enumerate() {
        if brick.destroyed || !ball_brick_overlap(ball, brick) {
            continue;
        }

        let axis = reflection_axis(ball.pos, brick);
        ball.vel = reflect(ball.vel, axis);

        if brick.is_obstacle() {
            hits.push(BrickHit {
                index,
                axis,
                awarded: 0,
                destroyed: false,
                obstacle: true,
            });
            continue;
        }

        brick.take_damage();
        let awarded = stats.register_hit(brick.points, brick.destroyed);
        hits.push(BrickHit {
            index,
            axis,
            awarded,
            destroyed: brick.destroyed,
            obstacle: false,
        });
    }

    hits
}

/// Ball has fallen past the bottom of the playfield
#[inline]
pub fn ball_out_of_bounds(ball: &Ball, canvas_height: f32) -> bool {
    ball.pos.y > canvas_height
}
