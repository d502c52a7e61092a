//! Database models and domain types.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tictactoe_rules::{GameMode, MoveLog};
use tracing::instrument;

use crate::db::{DbError, schema};

/// Store-assigned player identity.
pub type PlayerId = i32;

/// Store-assigned game identity.
pub type GameId = i32;

/// Player database model.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::players)]
pub struct Player {
    id: PlayerId,
    name: String,
    wins: i32,
    losses: i32,
    draws: i32,
    created_at: NaiveDateTime,
}

impl Player {
    /// Returns this player with the counter for `outcome` incremented.
    #[instrument(skip(self), fields(player_id = self.id))]
    pub fn with_outcome(mut self, outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::Win => self.wins += 1,
            GameOutcome::Loss => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }
        self
    }

    /// Total finished games.
    pub fn games_played(&self) -> i32 {
        self.wins + self.losses + self.draws
    }

    /// Win rate as a percentage (0.0–100.0).
    pub fn win_rate(&self) -> f64 {
        let total = self.games_played();
        if total == 0 {
            0.0
        } else {
            (self.wins as f64 / total as f64) * 100.0
        }
    }
}

/// Insertable player model. Counters start at zero.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::players)]
pub struct NewPlayer {
    name: String,
}

/// Input to [`PlayerRepository::save`](crate::PlayerRepository::save): a
/// player without an identity is inserted, one with an identity is updated.
#[derive(Debug, Clone, derive_more::From)]
pub enum PlayerRecord {
    /// Not stored yet.
    New(NewPlayer),
    /// Already stored; every mutable field is written back by id.
    Existing(Player),
}

/// Game outcome from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// Player won the game.
    Win,
    /// Player lost the game.
    Loss,
    /// Game ended in a draw.
    Draw,
}

/// Stored game history record.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: GameId,
    player1_id: PlayerId,
    player2_id: PlayerId,
    winner_id: Option<PlayerId>,
    is_draw: bool,
    game_mode: String,
    moves: String,
    played_at: NaiveDateTime,
}

impl GameRecord {
    /// Parses the stored mode column.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column holds an unknown mode.
    #[instrument(skip(self), fields(game_id = self.id, game_mode = %self.game_mode))]
    pub fn mode(&self) -> Result<GameMode, DbError> {
        GameMode::from_str(&self.game_mode)
            .map_err(|_| DbError::new(format!("Invalid game mode: '{}'", self.game_mode)))
    }

    /// Parses the stored move list.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column is not a valid move log.
    #[instrument(skip(self), fields(game_id = self.id))]
    pub fn move_log(&self) -> Result<MoveLog, DbError> {
        Ok(MoveLog::from_str(&self.moves)?)
    }
}

/// Insertable game history record.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    player1_id: PlayerId,
    player2_id: PlayerId,
    winner_id: Option<PlayerId>,
    is_draw: bool,
    game_mode: String,
    moves: String,
    played_at: NaiveDateTime,
}

/// A history record joined with the participants' display names.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameSummary {
    record: GameRecord,
    player1_name: String,
    player2_name: String,
    winner_name: Option<String>,
}

/// Everything needed to settle a finished game in one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct CompletedGame {
    player1_id: PlayerId,
    player2_id: PlayerId,
    winner_id: Option<PlayerId>,
    mode: GameMode,
    moves: MoveLog,
}

impl CompletedGame {
    /// A game won by `winner_id`, which must be one of the two participants.
    #[instrument(skip(moves))]
    pub fn won(
        player1_id: PlayerId,
        player2_id: PlayerId,
        winner_id: PlayerId,
        mode: GameMode,
        moves: MoveLog,
    ) -> Result<Self, DbError> {
        if winner_id != player1_id && winner_id != player2_id {
            return Err(DbError::new(format!(
                "Winner {} did not take part in the game",
                winner_id
            )));
        }
        Ok(Self {
            player1_id,
            player2_id,
            winner_id: Some(winner_id),
            mode,
            moves,
        })
    }

    /// A drawn game.
    #[instrument(skip(moves))]
    pub fn drawn(
        player1_id: PlayerId,
        player2_id: PlayerId,
        mode: GameMode,
        moves: MoveLog,
    ) -> Self {
        Self {
            player1_id,
            player2_id,
            winner_id: None,
            mode,
            moves,
        }
    }

    /// Whether the game ended without a winner.
    pub fn is_draw(&self) -> bool {
        self.winner_id.is_none()
    }

    /// Outcome for the given participant.
    pub fn outcome_for(&self, player_id: PlayerId) -> GameOutcome {
        match self.winner_id {
            None => GameOutcome::Draw,
            Some(winner) if winner == player_id => GameOutcome::Win,
            Some(_) => GameOutcome::Loss,
        }
    }

    /// Builds the history row, stamped with `played_at`.
    pub fn to_record(&self, played_at: NaiveDateTime) -> NewGameRecord {
        NewGameRecord::new(
            self.player1_id,
            self.player2_id,
            self.winner_id,
            self.is_draw(),
            self.mode.to_string(),
            self.moves.to_string(),
            played_at,
        )
    }
}

/// Result of settling a finished game: refreshed players and the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct SettledGame {
    player1: Player,
    player2: Player,
    record: GameRecord,
}
