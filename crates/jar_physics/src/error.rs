//! Error types for the arena

use crate::body::BodyHandle;
use thiserror::Error;

/// Arena errors
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Body not found in the physics world
    #[error("Body not found: {0:?}")]
    BodyNotFound(BodyHandle),

    /// Invalid configuration
    #[error("Invalid arena configuration: {0}")]
    InvalidConfig(String),

    /// Operation on an arena that has been torn down
    #[error("Arena has been torn down")]
    TornDown,
}

/// Result type for arena operations
pub type Result<T> = std::result::Result<T, ArenaError>;
