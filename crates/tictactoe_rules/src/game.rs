//! Game engine for tic-tac-toe.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::rules::{check_winner, is_draw, is_full, winning_line};
use crate::{Board, Cell, Coord, GameMode, Line, Mark, MoveLog, MoveRecord, PlaceError};

/// Terminal state of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are accepted.
    InProgress,
    /// A mark completed a line.
    Won {
        /// Winning mark.
        mark: Mark,
        /// The line that won.
        line: Line,
    },
    /// Classic-mode full board with no line.
    Draw,
}

impl GameStatus {
    /// Whether no further moves are accepted.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// What an accepted placement led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// The game goes on.
    Continue,
    /// The placing mark completed a line.
    Won(Mark),
    /// Classic mode: the board filled up without a line.
    Draw,
    /// Endless mode: the board filled up without a line. The game is still
    /// in progress and expects some tiles to be cleared.
    BoardFull,
}

/// Tic-tac-toe engine for one game.
///
/// Owns the board (with its cleared-position set), the move log and the
/// terminal status. The mark to move is derived from the number of
/// placements so far; clears do not pass the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    mode: GameMode,
    log: MoveLog,
    placements: usize,
    status: GameStatus,
}

impl Game {
    /// Creates a fresh game in the given mode.
    #[instrument]
    pub fn new(mode: GameMode) -> Self {
        Self {
            board: Board::new(),
            mode,
            log: MoveLog::new(),
            placements: 0,
            status: GameStatus::InProgress,
        }
    }

    /// Resets board, log, cleared set and status in place, keeping the mode.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn reset(&mut self) {
        *self = Self::new(self.mode);
        debug!("Game reset");
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the rule variant.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the move log.
    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Number of marks placed so far.
    pub fn placements(&self) -> usize {
        self.placements
    }

    /// Mark that places next.
    pub fn to_move(&self) -> Mark {
        Mark::for_placement(self.placements)
    }

    /// Cell at `(row, col)`. Cleared and off-board positions read as empty.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        Coord::new(row, col).map_or(Cell::Empty, |coord| self.board.get(coord))
    }

    /// Places the current mark at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError`] without touching the game if the coordinate is
    /// off the board, the cell is occupied, or the game is over.
    #[instrument(skip(self), fields(to_move = %self.to_move(), mode = %self.mode))]
    pub fn make_move(&mut self, row: usize, col: usize) -> Result<Placement, PlaceError> {
        if self.status.is_terminal() {
            return Err(PlaceError::GameOver);
        }
        let coord = Coord::new(row, col).ok_or(PlaceError::OutOfBounds(row, col))?;
        if !self.board.is_empty(coord) {
            return Err(PlaceError::Occupied(row, col));
        }

        let mark = self.to_move();
        self.board.place(coord, mark);
        self.log.push(MoveRecord::Place { coord, mark });
        self.placements += 1;
        debug!(%coord, %mark, placements = self.placements, "Mark placed");

        if let Some((winner, line)) = winning_line(&self.board) {
            self.status = GameStatus::Won { mark: winner, line };
            info!(%winner, "Line completed");
            return Ok(Placement::Won(winner));
        }

        if is_draw(&self.board) {
            if self.mode.full_board_is_draw() {
                self.status = GameStatus::Draw;
                info!("Board full, game drawn");
                return Ok(Placement::Draw);
            }
            info!("Board full in endless mode, waiting for clears");
            return Ok(Placement::BoardFull);
        }

        Ok(Placement::Continue)
    }

    /// Empties `(row, col)` and adds it to the cleared-position set.
    ///
    /// Returns `false` and does nothing when the coordinate is off the board,
    /// the cell is already empty, or the game is over.
    #[instrument(skip(self))]
    pub fn clear_tile(&mut self, row: usize, col: usize) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        let Some(coord) = Coord::new(row, col) else {
            return false;
        };
        if self.board.is_empty(coord) {
            return false;
        }

        self.board.clear(coord);
        self.log.push(MoveRecord::Clear { coord });
        debug!(%coord, "Tile cleared");
        true
    }

    /// Whether either mark currently holds a line, regardless of status.
    pub fn has_winner(&self) -> bool {
        check_winner(&self.board).is_some()
    }

    /// The first complete line and its mark, regardless of status.
    pub fn winning_line(&self) -> Option<(Mark, Line)> {
        winning_line(&self.board)
    }

    /// Whether the board has no empty cell left.
    pub fn is_board_full(&self) -> bool {
        is_full(&self.board)
    }

    /// `"X"`, `"O"`, `"DRAW"`, or `""` while the game is in progress.
    pub fn result_label(&self) -> &'static str {
        match self.status {
            GameStatus::InProgress => "",
            GameStatus::Won { mark, .. } => mark.into(),
            GameStatus::Draw => "DRAW",
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fills the board as X O X / X O O / O X X without a line.
    #[rustfmt::skip]
    const DRAW_SEQUENCE: [(usize, usize); 9] = [
        (0, 0), (0, 1), (0, 2),
        (1, 1), (1, 0), (1, 2),
        (2, 1), (2, 0), (2, 2),
    ];

    fn play(game: &mut Game, moves: &[(usize, usize)]) -> Placement {
        let mut last = Placement::Continue;
        for &(row, col) in moves {
            last = game.make_move(row, col).expect("legal move");
        }
        last
    }

    #[test]
    fn test_move_succeeds_once_per_cell() {
        let mut game = Game::new(GameMode::Classic);
        assert_eq!(game.make_move(1, 1), Ok(Placement::Continue));
        assert_eq!(game.make_move(1, 1), Err(PlaceError::Occupied(1, 1)));
        assert_eq!(game.placements(), 1);
        assert_eq!(game.log().len(), 1);
    }

    #[test]
    fn test_out_of_range_rejected_without_mutation() {
        let mut game = Game::new(GameMode::Classic);
        assert_eq!(game.make_move(3, 0), Err(PlaceError::OutOfBounds(3, 0)));
        assert_eq!(game.to_move(), Mark::X);
        assert!(game.log().is_empty());
    }

    #[test]
    fn test_turn_alternates_from_x() {
        let mut game = Game::new(GameMode::Endless);
        let expected = [Mark::X, Mark::O, Mark::X, Mark::O];
        for (i, (row, col)) in [(0, 0), (1, 1), (2, 2), (0, 2)].into_iter().enumerate() {
            assert_eq!(game.to_move(), expected[i]);
            game.make_move(row, col).unwrap();
            assert_eq!(game.cell(row, col), Cell::Occupied(expected[i]));
        }
    }

    #[test]
    fn test_top_row_win() {
        let mut game = Game::new(GameMode::Classic);
        let last = play(&mut game, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);
        assert_eq!(last, Placement::Won(Mark::X));
        assert_eq!(game.result_label(), "X");
        assert!(game.has_winner());
        assert_eq!(game.make_move(2, 0), Err(PlaceError::GameOver));
    }

    #[test]
    fn test_classic_full_board_is_draw() {
        let mut game = Game::new(GameMode::Classic);
        assert_eq!(play(&mut game, &DRAW_SEQUENCE), Placement::Draw);
        assert_eq!(game.status(), GameStatus::Draw);
        assert_eq!(game.result_label(), "DRAW");
    }

    #[test]
    fn test_endless_full_board_continues_after_clear() {
        let mut game = Game::new(GameMode::Endless);
        assert_eq!(play(&mut game, &DRAW_SEQUENCE), Placement::BoardFull);
        assert!(!game.has_winner());
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.result_label(), "");

        assert!(game.clear_tile(1, 1));
        assert!(!game.is_board_full());
        assert_eq!(game.cell(1, 1), Cell::Empty);
        assert_eq!(game.status(), GameStatus::InProgress);
        // Nine placements so far, so O moves next.
        assert_eq!(game.to_move(), Mark::O);
        assert_eq!(game.log().to_string().rsplit(';').next(), Some("1,1,CLEAR"));
    }

    #[test]
    fn test_clear_tile_noops() {
        let mut game = Game::new(GameMode::Endless);
        assert!(!game.clear_tile(0, 0));
        assert!(!game.clear_tile(5, 5));
        assert!(game.log().is_empty());

        game.make_move(0, 0).unwrap();
        assert!(game.clear_tile(0, 0));
        assert!(!game.clear_tile(0, 0));
        assert_eq!(game.log().len(), 2);
    }

    #[test]
    fn test_reoccupied_cell_counts_again() {
        let mut game = Game::new(GameMode::Endless);
        play(&mut game, &[(0, 0), (1, 0), (0, 1), (1, 1)]);
        game.clear_tile(0, 0);
        assert!(game.board().is_cleared(Coord::new(0, 0).unwrap()));
        // X to move: (0, 2) then O elsewhere, then X back on (0, 0).
        play(&mut game, &[(0, 2), (2, 2)]);
        assert_eq!(game.make_move(0, 0), Ok(Placement::Won(Mark::X)));
    }

    #[test]
    fn test_reset_keeps_mode() {
        let mut game = Game::new(GameMode::Endless);
        play(&mut game, &[(0, 0), (1, 1)]);
        game.clear_tile(0, 0);
        game.reset();
        assert_eq!(game, Game::new(GameMode::Endless));
    }
}
