//! Error types for tickroll

use thiserror::Error;

use crate::song::Tick;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Track index {index} out of range ({len} tracks)")]
    TrackOutOfRange { index: usize, len: usize },
    #[error("Invalid song: {0}")]
    InvalidSong(String),
    #[error("Tick spacing must be positive, got {0}")]
    InvalidTickSpacing(Tick),
    #[error("Song length must be a positive number of measures, got {0}")]
    InvalidMeasures(Tick),
    #[error("Pasted content nested deeper than {0} levels")]
    PasteTooDeep(usize),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
