use thiserror::Error;

/// Errors raised while parsing levels or simulating moves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SokoError {
    /// A solution string contained a character outside `uUrRdDlL`.
    #[error("Invalid movement character: {0:?}")]
    InvalidMove(char),

    /// A move was requested after the level had already been solved.
    #[error("Level has been solved")]
    LevelSolved,

    /// The level text could not be turned into a playable level.
    #[error("Invalid level: {0}")]
    InvalidLevel(String),
}

pub type Result<T> = std::result::Result<T, SokoError>;
