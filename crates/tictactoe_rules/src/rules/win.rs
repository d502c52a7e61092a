//! Win detection logic for tic-tac-toe.

use tracing::instrument;

use crate::{Board, Cell, Coord, Line, Mark};

/// Returns the first line, in [`Coord::LINES`] order, held entirely by one
/// mark, together with that mark.
///
/// Cleared cells read as empty and therefore break any line through them.
/// After repeated clears in Endless mode both marks may hold a line at once;
/// the earlier line in check order is reported.
#[instrument(skip(board))]
pub fn winning_line(board: &Board) -> Option<(Mark, Line)> {
    Coord::LINES.into_iter().find_map(|line| {
        let [a, b, c] = line;
        match board.get(a) {
            first @ Cell::Occupied(mark) if board.get(b) == first && board.get(c) == first => {
                Some((mark, line))
            }
            _ => None,
        }
    })
}

/// Returns the winning mark, if any.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    winning_line(board).map(|(mark, _)| mark)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: usize, col: usize) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let mut board = Board::new();
        for col in 0..3 {
            board.place(at(0, col), Mark::X);
        }
        assert_eq!(winning_line(&board), Some((Mark::X, Coord::LINES[0])));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let mut board = Board::new();
        board.place(at(0, 2), Mark::O);
        board.place(at(1, 1), Mark::O);
        board.place(at(2, 0), Mark::O);
        assert_eq!(winning_line(&board), Some((Mark::O, Coord::LINES[7])));
    }

    #[test]
    fn test_cleared_cell_breaks_line() {
        let mut board = Board::new();
        for row in 0..3 {
            board.place(at(row, 1), Mark::X);
        }
        assert_eq!(check_winner(&board), Some(Mark::X));

        board.clear(at(1, 1));
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_rows_checked_before_columns() {
        let mut board = Board::new();
        for col in 0..3 {
            board.place(at(2, col), Mark::O);
        }
        for row in 0..2 {
            board.place(at(row, 0), Mark::X);
        }
        board.place(at(0, 1), Mark::X);
        board.place(at(1, 1), Mark::X);
        board.place(at(0, 2), Mark::X);
        // X holds row 0 and O holds row 2.
        assert_eq!(winning_line(&board), Some((Mark::X, Coord::LINES[0])));

        // Once row 0 is broken, O's row 2 is reported.
        board.clear(at(0, 1));
        assert_eq!(winning_line(&board), Some((Mark::O, Coord::LINES[2])));
    }
}
