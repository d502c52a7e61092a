//! Error types for move validation and move-log parsing.

use derive_more::{Display, Error};
use tracing::instrument;

/// Reasons a placement is refused by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum PlaceError {
    /// Row or column outside `0..3`.
    #[display("Coordinate ({}, {}) is off the board", _0, _1)]
    OutOfBounds(usize, usize),
    /// The target cell already holds a mark.
    #[display("Cell ({}, {}) is already occupied", _0, _1)]
    Occupied(usize, usize),
    /// The game has already been won or drawn.
    #[display("Game is already over")]
    GameOver,
}

/// Move-log parse error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Move log error: {} at {}:{}", message, file, line)]
pub struct MoveLogError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl MoveLogError {
    /// Creates a new move-log error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
