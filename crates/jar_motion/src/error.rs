//! Error types for motion input

use thiserror::Error;

/// Motion input errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionError {
    /// Sensor absent, disabled, or refused to start
    #[error("Motion source unavailable: {0}")]
    Unavailable(String),

    /// Source was asked to start twice
    #[error("Motion source already started")]
    AlreadyStarted,

    /// Source hung up its end of the sample channel
    #[error("Motion source disconnected")]
    Disconnected,
}

/// Result type for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
