//! Frame driver
//!
//! Owns one session and its input tracker. The host calls [`FrameDriver::frame`]
//! from its animation-frame callback with a monotonic timestamp; the driver
//! turns successive timestamps into elapsed milliseconds and runs one
//! simulation step.

use crate::error::GameError;
use crate::platform::InputTracker;
use crate::settings::Settings;
use crate::sim::{Command, GameState, Snapshot, Stats, tick};

/// Size of the host's rendering surface in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn validate(self) -> Result<Self, GameError> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if usable(self.width) && usable(self.height) {
            Ok(self)
        } else {
            Err(GameError::InvalidSurface {
                width: self.width,
                height: self.height,
            })
        }
    }
}

pub struct FrameDriver {
    state: GameState,
    input: InputTracker,
    /// Timestamp of the previous frame
    last_frame_ms: Option<f64>,
    /// Demo mode: the paddle plays itself
    idle_mode: bool,
}

impl FrameDriver {
    /// Create a session drawing onto `surface`.
    ///
    /// Fails if the host has no surface to draw on.
    pub fn new(surface: Option<Surface>, settings: &Settings, seed: u64) -> Result<Self, GameError> {
        let surface = surface.ok_or(GameError::MissingSurface)?.validate()?;

        let state = GameState::new(settings.difficulty, seed, surface.width, surface.height);
        log::info!(
            "Session ready: {}x{} surface, {} difficulty, seed {}",
            surface.width,
            surface.height,
            settings.difficulty.as_str(),
            seed
        );

        Ok(Self {
            state,
            input: InputTracker::new(settings.pointer_idle_ms),
            last_frame_ms: None,
            idle_mode: false,
        })
    }

    /// Run one frame at host time `now_ms` and return what to draw.
    ///
    /// The first frame has zero elapsed time. Timestamps that go backwards
    /// are treated as zero elapsed.
    pub fn frame(&mut self, now_ms: f64) -> Snapshot<'_> {
        let dt_ms = match self.last_frame_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);

        let mut input = self.input.take_tick_input(now_ms);
        input.idle_mode = self.idle_mode;
        tick(&mut self.state, &input, dt_ms as f32);

        self.state.snapshot()
    }

    /// Apply a menu/button action
    pub fn command(&mut self, command: Command) -> bool {
        self.state.apply(command)
    }

    pub fn input_mut(&mut self) -> &mut InputTracker {
        &mut self.input
    }

    pub fn set_idle_mode(&mut self, enabled: bool) {
        self.idle_mode = enabled;
        log::info!("Idle mode: {}", enabled);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    /// End the session, returning its final stats
    pub fn shutdown(self) -> Stats {
        log::info!(
            "Session closed in phase {:?} with score {}",
            self.state.phase,
            self.state.stats.score
        );
        self.state.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn driver() -> FrameDriver {
        FrameDriver::new(Some(Surface::new(800.0, 600.0)), &Settings::default(), 5).unwrap()
    }

    #[test]
    fn test_missing_surface_is_fatal() {
        let result = FrameDriver::new(None, &Settings::default(), 1);
        assert!(matches!(result, Err(GameError::MissingSurface)));
    }

    #[test]
    fn test_invalid_surface() {
        let result = FrameDriver::new(Some(Surface::new(0.0, 600.0)), &Settings::default(), 1);
        assert!(matches!(result, Err(GameError::InvalidSurface { .. })));
        let result = FrameDriver::new(Some(Surface::new(800.0, f32::NAN)), &Settings::default(), 1);
        assert!(matches!(result, Err(GameError::InvalidSurface { .. })));
    }

    #[test]
    fn test_frame_uses_timestamp_delta() {
        let mut driver = driver();
        driver.command(Command::Start);
        driver.input_mut().key_down(" ");

        driver.frame(1000.0);
        // First frame launches but has no elapsed time
        let ball = &driver.state().balls[0];
        assert!(ball.launched);
        let start_y = ball.pos.y;
        assert_eq!(driver.state().clock_ms, 0.0);

        driver.frame(1032.0);
        let ball = &driver.state().balls[0];
        let expected = start_y + ball.vel.y * 2.0;
        assert!((ball.pos.y - expected).abs() < 1e-3);
        assert_eq!(driver.state().clock_ms, 32.0);
    }

    #[test]
    fn test_pause_key_through_driver() {
        let mut driver = driver();
        driver.command(Command::Start);
        driver.input_mut().key_down("Escape");
        assert_eq!(driver.frame(0.0).phase, GamePhase::Paused);
        driver.input_mut().key_down("Escape");
        assert_eq!(driver.frame(16.0).phase, GamePhase::Playing);
    }

    #[test]
    fn test_pointer_drives_paddle_until_idle() {
        let mut driver = driver();
        driver.command(Command::Start);
        driver.frame(0.0);
        let x0 = driver.state().paddle.pos.x;

        driver.input_mut().pointer_move(100.0, 500.0, 5.0);
        driver.frame(16.0);
        let x1 = driver.state().paddle.pos.x;
        assert!(x1 < x0);

        // Past the idle window the paddle holds still
        driver.frame(200.0);
        let x2 = driver.state().paddle.pos.x;
        driver.frame(216.0);
        assert_eq!(driver.state().paddle.pos.x, x2);
    }

    #[test]
    fn test_shutdown_returns_stats() {
        let mut driver = driver();
        driver.command(Command::Start);
        let stats = driver.shutdown();
        assert_eq!(stats.level, 1);
        assert_eq!(stats.lives, 3);
    }
}
