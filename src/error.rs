//! Error types
//!
//! Expected gameplay conditions never surface here; only contract
//! violations at construction, rejected operations and storage failures do.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid arena {width}x{height}: both dimensions must be positive")]
    InvalidArena { width: u32, height: u32 },
    #[error("invalid ball: {0}")]
    InvalidBall(String),
    #[error("invalid paddle: {0}")]
    InvalidPaddle(String),
    #[error("match is not running")]
    NotRunning,
    #[error("unknown match id: {0}")]
    UnknownMatch(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
