//! Error types for the engine.

use crate::r#move::Move;

/// Errors surfaced by board access, move application and record loading.
///
/// Game endings are not errors; they are reported as `Outcome` values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Coordinate outside the 10x9 grid.
    #[error("square ({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },

    /// The move is not legal for the current position and side to move.
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    /// A FEN position string could not be parsed.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// A loaded record failed structural validation.
    #[error("malformed game record: {0}")]
    MalformedRecord(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::MalformedRecord(err.to_string())
    }
}
