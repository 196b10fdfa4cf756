//! Simulation step
//!
//! Advances the game by the elapsed frame time. Movement scales with
//! `dt_ms / 16`; there is no fixed-timestep accumulation, so a long frame
//! moves everything proportionally further in one step.

use super::collision::{
    ball_brick_collisions, ball_out_of_bounds, ball_paddle_collision, ball_wall_collision,
};
use super::phase::Command;
use super::state::{GamePhase, GameState};

/// Input for a single step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Left arrow held
    pub left: bool,
    /// Right arrow held
    pub right: bool,
    /// Pointer x while the pointer is moving
    pub pointer_x: Option<f32>,
    /// Launch key pressed this frame
    pub launch: bool,
    /// Pause key pressed this frame
    pub pause: bool,
    /// Idle/demo mode - the paddle tracks the ball on its own
    pub idle_mode: bool,
}

/// Advance the game state by `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    let dt_ms = dt_ms.max(0.0);
    state.clock_ms += dt_ms as f64;

    if input.pause {
        state.apply(Command::TogglePause);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        demo_input(state, &mut input);
    }
    let input = &input;

    if input.launch {
        state.apply(Command::Launch);
    }

    state
        .paddle
        .update(input.left, input.right, input.pointer_x, state.canvas_width);

    let clock_ms = state.clock_ms;
    let canvas_width = state.canvas_width;
    for brick in &mut state.bricks {
        brick.update(dt_ms, clock_ms, canvas_width);
    }

    let canvas_height = state.canvas_height;
    for power_up in &mut state.power_ups {
        power_up.update(dt_ms);
    }
    state.power_ups.retain(|p| p.pos.y <= canvas_height);

    let GameState {
        balls,
        bricks,
        paddle,
        stats,
        ..
    } = state;
    balls.retain_mut(|ball| {
        ball.update(dt_ms);
        ball_wall_collision(ball, canvas_width);
        ball_paddle_collision(ball, paddle);
        ball_brick_collisions(ball, bricks, stats);
        !ball_out_of_bounds(ball, canvas_height)
    });

    if state.balls.is_empty() {
        state.lose_ball_set();
    }

    if state.phase == GamePhase::Playing && state.all_bricks_destroyed() {
        state.complete_level();
    }
}

/// Steer toward the lowest falling ball and serve automatically
fn demo_input(state: &GameState, input: &mut TickInput) {
    if state.balls.iter().any(|b| !b.launched) {
        input.launch = true;
    }

    let target = state
        .balls
        .iter()
        .filter(|b| b.launched && b.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .or_else(|| state.primary_ball());

    if let Some(ball) = target {
        // Lead the ball a little so it comes off the paddle at an angle
        let lead = ball.vel.x * 2.0;
        input.pointer_x = Some(ball.pos.x + lead);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Difficulty;
    use crate::sim::state::{Ball, Brick, PowerUp, PowerUpKind};
    use glam::Vec2;

    const FRAME: f32 = 16.0;

    fn playing_state() -> GameState {
        let mut state = GameState::new(Difficulty::Normal, 12345, CANVAS_WIDTH, CANVAS_HEIGHT);
        state.apply(Command::Start);
        state
    }

    #[test]
    fn test_tick_start_screen_does_nothing() {
        let mut state = GameState::new(Difficulty::Normal, 1, CANVAS_WIDTH, CANVAS_HEIGHT);
        let before = state.paddle.clone();
        let input = TickInput {
            right: true,
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.paddle, before);
        assert!(!state.balls[0].launched);
    }

    #[test]
    fn test_tick_launch_and_move() {
        let mut state = playing_state();
        let input = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME);
        assert!(state.balls[0].launched);
        assert!(state.balls[0].pos.y < CANVAS_HEIGHT - BALL_SPAWN_OFFSET);
        assert_eq!(state.balls[0].trail.len(), 1);
    }

    #[test]
    fn test_tick_pause_freezes() {
        let mut state = playing_state();
        tick(
            &mut state,
            &TickInput {
                launch: true,
                ..Default::default()
            },
            FRAME,
        );
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, FRAME);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.balls[0].pos;
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.balls[0].pos, frozen);

        // Unpause runs the same frame
        tick(&mut state, &pause, FRAME);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_ne!(state.balls[0].pos, frozen);
    }

    #[test]
    fn test_paddle_follows_keys() {
        let mut state = playing_state();
        let x = state.paddle.pos.x;
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME);
        assert_eq!(state.paddle.pos.x, x - PADDLE_SPEED);
    }

    #[test]
    fn test_losing_all_balls_costs_a_life() {
        let mut state = playing_state();
        state.stats.combo = 4;
        state.balls[0].launched = true;
        state.balls[0].pos = Vec2::new(400.0, CANVAS_HEIGHT + 5.0);
        state.balls[0].vel = Vec2::new(0.0, 5.0);
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.stats.lives, 2);
        assert_eq!(state.stats.combo, 1);
        assert_eq!(state.balls.len(), 1);
        assert!(!state.balls[0].launched);
    }

    #[test]
    fn test_one_ball_left_keeps_lives() {
        let mut state = playing_state();
        let mut extra = Ball::new(Vec2::new(400.0, 300.0), EXTRA_BALL_RADIUS, 5.0);
        extra.launched = true;
        extra.vel = Vec2::new(0.0, -5.0);
        state.balls.push(extra);
        state.balls[0].launched = true;
        state.balls[0].pos = Vec2::new(400.0, CANVAS_HEIGHT + 5.0);
        state.balls[0].vel = Vec2::new(0.0, 5.0);
        state.stats.combo = 3;

        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.stats.lives, 3);
        assert_eq!(state.stats.combo, 3);
    }

    #[test]
    fn test_clearing_last_brick_completes_level() {
        let mut state = playing_state();
        state.bricks = vec![Brick::new(Vec2::new(100.0, 100.0), 70.0, 25.0, 1, 0, 10)];
        state.balls[0].launched = true;
        state.balls[0].pos = Vec2::new(135.0, 133.0);
        state.balls[0].vel = Vec2::new(0.0, -5.0);
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.stats.score, 10);
        assert_eq!(state.stats.bricks_destroyed, 1);
    }

    #[test]
    fn test_power_ups_fall_and_leave() {
        let mut state = playing_state();
        state
            .power_ups
            .push(PowerUp::new(PowerUpKind::MultiBall, Vec2::new(100.0, 200.0)));
        state.power_ups.push(PowerUp::new(
            PowerUpKind::SlowBall,
            Vec2::new(100.0, CANVAS_HEIGHT - 1.0),
        ));
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.power_ups.len(), 1);
        assert!(state.power_ups[0].pos.y > 200.0);
    }

    #[test]
    fn test_clock_runs_in_every_phase() {
        let mut state = GameState::new(Difficulty::Normal, 1, CANVAS_WIDTH, CANVAS_HEIGHT);
        tick(&mut state, &TickInput::default(), FRAME);
        tick(&mut state, &TickInput::default(), -5.0);
        assert_eq!(state.clock_ms, FRAME as f64);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing_state();
        let mut b = playing_state();
        let inputs = [
            TickInput {
                launch: true,
                ..Default::default()
            },
            TickInput {
                pointer_x: Some(200.0),
                ..Default::default()
            },
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input, FRAME);
                tick(&mut b, input, FRAME);
            }
        }
        assert_eq!(a.balls, b.balls);
        assert_eq!(a.bricks, b.bricks);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_idle_mode_serves() {
        let mut state = playing_state();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME);
        assert!(state.balls[0].launched);
    }
}
