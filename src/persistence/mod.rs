//! Save/load of session state
//!
//! Entities are stored as flat records (`x`, `y`, `dx`, ...) wrapped in a
//! versioned JSON envelope. Special brick behaviors ride along in an
//! optional `traits` field; saves without it load as plain bricks.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::settings::Difficulty;
use crate::sim::{Ball, Brick, BrickTraits, GamePhase, GameState, LevelFeatures, Paddle, Stats};

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallRecord {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub radius: f32,
    pub speed: f32,
    pub base_speed: f32,
    pub launched: bool,
}

impl From<&Ball> for BallRecord {
    fn from(ball: &Ball) -> Self {
        Self {
            x: ball.pos.x,
            y: ball.pos.y,
            dx: ball.vel.x,
            dy: ball.vel.y,
            radius: ball.radius,
            speed: ball.speed,
            base_speed: ball.base_speed,
            launched: ball.launched,
        }
    }
}

impl From<&BallRecord> for Ball {
    fn from(record: &BallRecord) -> Self {
        let mut ball = Ball::new(Vec2::new(record.x, record.y), record.radius, record.speed);
        ball.vel = Vec2::new(record.dx, record.dy);
        ball.base_speed = record.base_speed;
        ball.launched = record.launched;
        ball
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaddleRecord {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub original_width: f32,
    pub speed: f32,
}

impl From<&Paddle> for PaddleRecord {
    fn from(paddle: &Paddle) -> Self {
        Self {
            x: paddle.pos.x,
            y: paddle.pos.y,
            width: paddle.width,
            height: paddle.height,
            original_width: paddle.original_width,
            speed: paddle.speed,
        }
    }
}

impl From<&PaddleRecord> for Paddle {
    fn from(record: &PaddleRecord) -> Self {
        Paddle {
            pos: Vec2::new(record.x, record.y),
            width: record.width,
            height: record.height,
            original_width: record.original_width,
            speed: record.speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrickRecord {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: u32,
    pub max_health: u32,
    pub hue: u16,
    pub points: u32,
    pub destroyed: bool,
    /// Brick carries any special behavior
    pub special: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traits: Option<BrickTraits>,
}

impl From<&Brick> for BrickRecord {
    fn from(brick: &Brick) -> Self {
        let special = !brick.traits.is_plain();
        Self {
            x: brick.pos.x,
            y: brick.pos.y,
            width: brick.width,
            height: brick.height,
            health: brick.health,
            max_health: brick.max_health,
            hue: brick.hue,
            points: brick.points,
            destroyed: brick.destroyed,
            special,
            traits: special.then_some(brick.traits),
        }
    }
}

impl From<&BrickRecord> for Brick {
    fn from(record: &BrickRecord) -> Self {
        let mut brick = Brick::new(
            Vec2::new(record.x, record.y),
            record.width,
            record.height,
            record.health,
            record.hue,
            record.points,
        );
        brick.max_health = record.max_health;
        brick.destroyed = record.destroyed;
        brick.traits = record.traits.unwrap_or_default();
        brick
    }
}

/// A saved session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGame {
    pub version: u32,
    pub seed: u64,
    pub difficulty: Difficulty,
    pub phase: GamePhase,
    pub stats: Stats,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub clock_ms: f64,
    pub paddle: PaddleRecord,
    pub balls: Vec<BallRecord>,
    pub bricks: Vec<BrickRecord>,
}

impl SaveGame {
    /// Capture a session
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SAVE_VERSION,
            seed: state.seed,
            difficulty: state.difficulty,
            phase: state.phase,
            stats: state.stats.clone(),
            canvas_width: state.canvas_width,
            canvas_height: state.canvas_height,
            clock_ms: state.clock_ms,
            paddle: (&state.paddle).into(),
            balls: state.balls.iter().map(BallRecord::from).collect(),
            bricks: state.bricks.iter().map(BrickRecord::from).collect(),
        }
    }

    /// Rebuild a live session.
    ///
    /// The RNG restarts from the saved seed, so random draws after loading
    /// differ from the run that was saved. A save taken mid-play resumes paused.
    pub fn restore(&self) -> GameState {
        let mut state = GameState::new(
            self.difficulty,
            self.seed,
            self.canvas_width,
            self.canvas_height,
        );
        state.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            phase => phase,
        };
        state.stats = self.stats.clone();
        state.clock_ms = self.clock_ms;
        state.features = LevelFeatures::for_level(self.stats.level);
        state.paddle = (&self.paddle).into();
        state.balls = self.balls.iter().map(Ball::from).collect();
        state.bricks = self.bricks.iter().map(Brick::from).collect();
        state
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let save: SaveGame = serde_json::from_str(json)?;
        if save.version != SAVE_VERSION {
            return Err(GameError::UnsupportedSaveVersion {
                found: save.version,
                expected: SAVE_VERSION,
            });
        }
        Ok(save)
    }

    /// Write to `path`, going through a temporary file so a crash never
    /// leaves a half-written save behind
    pub fn save_to(&self, path: &Path) -> Result<(), GameError> {
        let json = self.to_json()?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        log::info!(
            "Game saved to {} (level {})",
            path.display(),
            self.stats.level
        );
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path)?;
        let save = Self::from_json(&json)?;
        log::info!(
            "Loaded save from {} at level {}",
            path.display(),
            save.stats.level
        );
        Ok(save)
    }
}
