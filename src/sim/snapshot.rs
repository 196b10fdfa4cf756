//! Read-only view of a session for renderers and HUDs

use super::level::LevelFeatures;
use super::state::{Ball, Brick, GamePhase, GameState, Paddle, PowerUp, Stats, format_time};
use crate::settings::Difficulty;

/// Everything a renderer needs for one frame, borrowed from the session
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub stats: &'a Stats,
    pub paddle: &'a Paddle,
    pub balls: &'a [Ball],
    pub bricks: &'a [Brick],
    pub power_ups: &'a [PowerUp],
    pub features: &'a LevelFeatures,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub clock_ms: f64,
}

impl<'a> Snapshot<'a> {
    /// Bricks that should be drawn. Destroyed regenerating bricks stay in
    /// view so their regrowth can be shown.
    pub fn visible_bricks(&self) -> impl Iterator<Item = &'a Brick> + 'a {
        self.bricks
            .iter()
            .filter(|b| !b.destroyed || b.traits.regenerating.is_some())
    }

    /// Bricks still standing
    pub fn remaining_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| !b.destroyed).count()
    }

    /// Simulation runs only while playing; paused frames still render
    pub fn is_live(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Whether gameplay entities should be drawn at all
    pub fn shows_playfield(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }

    /// A ball is waiting on the launch key
    pub fn awaiting_launch(&self) -> bool {
        self.balls.iter().any(|b| !b.launched)
    }

    /// HUD clock (`mm:ss`), frozen once the run is over
    pub fn run_time(&self) -> String {
        let ms = self
            .stats
            .elapsed_ms
            .unwrap_or(self.clock_ms - self.stats.start_time);
        format_time(ms)
    }
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            difficulty: self.difficulty,
            stats: &self.stats,
            paddle: &self.paddle,
            balls: &self.balls,
            bricks: &self.bricks,
            power_ups: &self.power_ups,
            features: &self.features,
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            clock_ms: self.clock_ms,
        }
    }
}
