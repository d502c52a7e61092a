//! Tic-tac-toe with persisted player statistics and game history.
//!
//! # Architecture
//!
//! - **Rules**: board, win/draw detection and Classic/Endless modes live in
//!   [`tictactoe_rules`] and are re-exported here.
//! - **Session**: [`GameSession`] runs one game between two stored players
//!   and settles finished games.
//! - **Stores**: [`PlayerRepository`] and [`GameRepository`] on top of an
//!   owned SQLite pool, [`Database`].
//!
//! # Example
//!
//! ```no_run
//! use tictactoe::{Database, GameMode, GameSession};
//!
//! # fn example() -> anyhow::Result<()> {
//! let db = Database::open("tictactoe.db", 5)?;
//! let mut session = GameSession::new(db);
//! session.start_new_game("Alice", "Bob", GameMode::Classic)?;
//! let outcome = session.make_move(1, 1)?;
//! assert!(outcome.is_accepted());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod session;

pub use config::{AppConfig, ConfigError, DATABASE_URL_ENV};
pub use db::{
    CompletedGame, DEFAULT_POOL_SIZE, Database, DbError, GameId, GameOutcome,
    GameRecord, GameRepository, GameSummary, MIGRATIONS, NewGameRecord, NewPlayer, Player,
    PlayerId, PlayerRecord, PlayerRepository, SettledGame,
};
pub use session::{GameSession, MoveOutcome, SessionError, SessionState};

pub use tictactoe_rules::{
    Board, Cell, Coord, Game, GameMode, GameStatus, Line, Mark, MoveLog, MoveLogError, MoveRecord,
    PlaceError, Placement,
};
