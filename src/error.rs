//! Error type shared by initialization, configuration and persistence

use std::fmt;

#[derive(Debug)]
pub enum GameError {
    /// The host supplied no rendering surface; the game cannot start
    MissingSurface,
    /// The rendering surface has unusable dimensions
    InvalidSurface { width: f32, height: f32 },
    /// A difficulty name did not match any preset
    UnknownDifficulty(String),
    /// A save file was written by an incompatible format version
    UnsupportedSaveVersion { found: u32, expected: u32 },
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSurface => {
                write!(f, "no rendering surface available; the game cannot start")
            }
            Self::InvalidSurface { width, height } => {
                write!(f, "rendering surface has invalid size {width}x{height}")
            }
            Self::UnknownDifficulty(name) => write!(
                f,
                "unknown difficulty '{name}' (expected easy, normal, hard or insane)"
            ),
            Self::UnsupportedSaveVersion { found, expected } => {
                write!(f, "save format version {found} is not supported (expected {expected})")
            }
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Json(e) => write!(f, "malformed json: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_surface_message() {
        let msg = GameError::MissingSurface.to_string();
        assert!(msg.contains("rendering surface"));
    }

    #[test]
    fn test_json_error_has_source() {
        let err: GameError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
