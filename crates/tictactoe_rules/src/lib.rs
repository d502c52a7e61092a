//! Pure tic-tac-toe rules.
//!
//! This crate holds everything about a game that does not touch storage:
//! marks and cells, the 3x3 board with its cleared-position mask, line-win
//! and draw rules, the Classic/Endless [`GameMode`] split, the move log and
//! its text encoding, and the [`Game`] engine that ties them together.
//!
//! # Example
//!
//! ```
//! use tictactoe_rules::{Game, GameMode, Mark, Placement};
//!
//! let mut game = Game::new(GameMode::Classic);
//! for (row, col) in [(0, 0), (1, 1), (0, 1), (2, 2)] {
//!     game.make_move(row, col).unwrap();
//! }
//! assert_eq!(game.make_move(0, 2), Ok(Placement::Won(Mark::X)));
//! assert_eq!(game.result_label(), "X");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod game;
mod mode;
mod moves;
mod position;
pub mod rules;
mod types;

pub use error::{MoveLogError, PlaceError};
pub use game::{Game, GameStatus, Placement};
pub use mode::GameMode;
pub use moves::{MoveLog, MoveRecord};
pub use position::{Coord, Line};
pub use types::{Board, Cell, Mark};
