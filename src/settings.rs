//! Difficulty presets and game configuration
//!
//! Settings are read from an optional JSON file; anything missing falls back
//! to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, POINTER_IDLE_MS};
use crate::error::GameError;

/// Named difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

/// Fixed tuning values behind a difficulty preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultySettings {
    /// Launch speed in pixels per reference frame
    pub ball_speed: f32,
    /// Brick rows at level 0 (grows with level)
    pub brick_rows: u32,
    pub lives: u32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "insane" => Some(Difficulty::Insane),
            _ => None,
        }
    }

    pub fn settings(&self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings {
                ball_speed: 4.0,
                brick_rows: 3,
                lives: 5,
            },
            Difficulty::Normal => DifficultySettings {
                ball_speed: 5.0,
                brick_rows: 4,
                lives: 3,
            },
            Difficulty::Hard => DifficultySettings {
                ball_speed: 6.5,
                brick_rows: 5,
                lives: 2,
            },
            Difficulty::Insane => DifficultySettings {
                ball_speed: 8.0,
                brick_rows: 6,
                lives: 1,
            },
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// RNG seed; a fresh one is chosen by the host when absent
    pub seed: Option<u64>,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// How long the pointer counts as moving after its last event
    pub pointer_idle_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            seed: None,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            pointer_idle_ms: POINTER_IDLE_MS,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file, using defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, GameError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), GameError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Tuning values for the configured difficulty
    pub fn preset(&self) -> DifficultySettings {
        self.difficulty.settings()
    }
}
