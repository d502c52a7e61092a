//! Persistence layer for players and game history.

mod error;
mod games;
mod models;
mod players;
mod pool;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use games::GameRepository;
pub use models::{
    CompletedGame, GameId, GameOutcome, GameRecord, GameSummary, NewGameRecord, NewPlayer, Player,
    PlayerId, PlayerRecord, SettledGame,
};
pub use players::PlayerRepository;
pub use pool::{DEFAULT_POOL_SIZE, Database, MIGRATIONS};
