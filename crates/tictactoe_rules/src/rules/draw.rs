//! Draw detection logic for tic-tac-toe.

use tracing::instrument;

use super::win::check_winner;
use crate::{Board, Coord};

/// Whether every cell holds a mark. Cleared cells count as empty.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    Coord::ALL.iter().all(|coord| !board.is_empty(*coord))
}

/// Full board with no winning line.
///
/// Whether this ends the game depends on the [`GameMode`](crate::GameMode).
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}
