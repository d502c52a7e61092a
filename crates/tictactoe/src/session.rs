//! Game session service.
//!
//! A [`GameSession`] owns one game at a time: the [`Game`] engine, the mode
//! and the two participants. It settles finished games through the stores
//! and exposes what a front-end needs to render.

use std::collections::VecDeque;

use derive_more::{Display, Error, From};
use rand::Rng;
use rand::seq::SliceRandom;
use tictactoe_rules::{Cell, Coord, Game, GameMode, GameStatus, Mark, PlaceError, Placement};
use tracing::{debug, error, info, instrument, warn};

use crate::db::{
    CompletedGame, Database, DbError, GameRepository, GameSummary, Player, PlayerId,
    PlayerRepository,
};

/// Errors surfaced by the session service.
#[derive(Debug, Clone, Display, Error, From)]
pub enum SessionError {
    /// A store operation failed.
    #[display("Operation failed: {}", _0)]
    #[from]
    Db(#[error(source)] DbError),
    /// Both seats were given the same player.
    #[display("A player cannot play against themselves: '{}'", _0)]
    SamePlayer(#[error(not(source))] String),
    /// A player name was empty or whitespace only.
    #[display("Player names must not be blank")]
    BlankName,
    /// Retry requested with nothing left to persist.
    #[display("No unsaved game outcome to retry")]
    NothingPending,
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionState {
    /// No game has been started yet.
    #[display("awaiting players")]
    AwaitingPlayers,
    /// Moves are accepted.
    #[display("in progress")]
    InProgress,
    /// Finished with a winner.
    #[display("won by {}", _0)]
    Won(Mark),
    /// Finished without a winner.
    #[display("drawn")]
    Draw,
}

impl SessionState {
    /// Whether the game has finished.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Won(_) | SessionState::Draw)
    }
}

/// Result of [`GameSession::make_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was refused; nothing changed.
    Rejected(Option<PlaceError>),
    /// Mark placed, play continues.
    Continue,
    /// Mark placed and completed a line.
    Won(Mark),
    /// Classic mode: mark placed and filled the board without a line.
    Draw,
    /// Endless mode: board full without a line. Clear some tiles and play on.
    BoardFull,
}

impl MoveOutcome {
    /// Whether the caller must react: the game ended, or an Endless board
    /// filled up and tiles should be cleared.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MoveOutcome::Won(_) | MoveOutcome::Draw | MoveOutcome::BoardFull
        )
    }

    /// Whether the move was placed.
    pub fn is_accepted(self) -> bool {
        !matches!(self, MoveOutcome::Rejected(_))
    }
}

/// The two seated players. Player 1 plays X.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Seats {
    player1: Player,
    player2: Player,
}

impl Seats {
    /// Replaces a seated player's snapshot with `fresh` if the ids match.
    fn refresh(&mut self, fresh: &Player) {
        for seat in [&mut self.player1, &mut self.player2] {
            if seat.id() == fresh.id() {
                *seat = fresh.clone();
            }
        }
    }

    fn id_for(&self, mark: Mark) -> PlayerId {
        match mark {
            Mark::X => *self.player1.id(),
            Mark::O => *self.player2.id(),
        }
    }

    fn player_for(&self, mark: Mark) -> &Player {
        match mark {
            Mark::X => &self.player1,
            Mark::O => &self.player2,
        }
    }
}

/// One active game plus its participants, backed by the stores.
///
/// Player snapshots are refreshed by id from the store whenever a game is
/// settled; the session never edits counters itself. Finished games that
/// could not be stored wait in `pending`, oldest first, and are settled
/// before any later game.
#[derive(Debug)]
pub struct GameSession {
    players: PlayerRepository,
    games: GameRepository,
    game: Game,
    seats: Option<Seats>,
    pending: VecDeque<CompletedGame>,
}

impl GameSession {
    /// Creates a session using the stores in `db`.
    #[instrument(skip(db), fields(url = %db.url()))]
    pub fn new(db: Database) -> Self {
        info!("Creating game session");
        Self::with_repositories(PlayerRepository::new(db.clone()), GameRepository::new(db))
    }

    /// Creates a session from existing repositories.
    #[instrument(skip_all)]
    pub fn with_repositories(players: PlayerRepository, games: GameRepository) -> Self {
        Self {
            players,
            games,
            game: Game::default(),
            seats: None,
            pending: VecDeque::new(),
        }
    }

    /// Seats `name1` (X) and `name2` (O), creating zero-stat players for
    /// unknown names, and starts a fresh game in `mode`. Returns player 1.
    ///
    /// Names are looked up exactly as given. Outcomes of earlier games that
    /// are still waiting to be stored stay queued.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Db`] if the player store fails. Besides store
    /// failures, a blank name ([`SessionError::BlankName`]) or the same name
    /// in both seats ([`SessionError::SamePlayer`]) is refused, since a game
    /// needs two distinct players to credit.
    #[instrument(skip(self))]
    pub fn start_new_game(
        &mut self,
        name1: &str,
        name2: &str,
        mode: GameMode,
    ) -> Result<Player, SessionError> {
        if name1.trim().is_empty() || name2.trim().is_empty() {
            return Err(SessionError::BlankName);
        }
        if name1 == name2 {
            return Err(SessionError::SamePlayer(name1.to_string()));
        }

        let player1 = self.players.find_or_create(name1).inspect_err(|e| {
            error!(error = %e, "Failed to resolve player 1");
        })?;
        let player2 = self.players.find_or_create(name2).inspect_err(|e| {
            error!(error = %e, "Failed to resolve player 2");
        })?;

        if !self.pending.is_empty() {
            warn!(
                pending = self.pending.len(),
                "Starting a new game with unsaved outcomes queued"
            );
        }

        self.game = Game::new(mode);
        self.seats = Some(Seats {
            player1: player1.clone(),
            player2,
        });
        info!(%mode, player1 = %name1, player2 = %name2, "Started new game");
        Ok(player1)
    }

    /// Places the current mark at `(row, col)`.
    ///
    /// Invalid moves come back as [`MoveOutcome::Rejected`]. A win or a
    /// Classic draw is queued behind any earlier unsaved outcomes and the
    /// whole queue is settled in the stores before returning.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Db`] if settling fails. The board keeps its
    /// final state and every unsettled outcome stays queued for
    /// [`retry_pending_outcome`](Self::retry_pending_outcome).
    #[instrument(skip(self), fields(state = %self.state()))]
    pub fn make_move(&mut self, row: usize, col: usize) -> Result<MoveOutcome, SessionError> {
        let Some(seats) = &self.seats else {
            warn!("Move attempted before players were seated");
            return Ok(MoveOutcome::Rejected(None));
        };

        let placement = match self.game.make_move(row, col) {
            Ok(placement) => placement,
            Err(e) => {
                warn!(error = %e, "Move rejected");
                return Ok(MoveOutcome::Rejected(Some(e)));
            }
        };

        let outcome = match placement {
            Placement::Continue => return Ok(MoveOutcome::Continue),
            Placement::BoardFull => {
                debug!("Endless board full, tiles must be cleared");
                return Ok(MoveOutcome::BoardFull);
            }
            Placement::Won(mark) => {
                let completed = CompletedGame::won(
                    *seats.player1.id(),
                    *seats.player2.id(),
                    seats.id_for(mark),
                    self.game.mode(),
                    self.game.log().clone(),
                )?;
                self.pending.push_back(completed);
                MoveOutcome::Won(mark)
            }
            Placement::Draw => {
                self.pending.push_back(CompletedGame::drawn(
                    *seats.player1.id(),
                    *seats.player2.id(),
                    self.game.mode(),
                    self.game.log().clone(),
                ));
                MoveOutcome::Draw
            }
        };

        self.settle_pending()?;
        Ok(outcome)
    }

    /// Re-runs the settlement of every finished game whose earlier attempt
    /// failed, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NothingPending`] if there is nothing to retry,
    /// or [`SessionError::Db`] if the store fails again. Games settled before
    /// the failure stay settled.
    #[instrument(skip(self), fields(pending = self.pending.len()))]
    pub fn retry_pending_outcome(&mut self) -> Result<(), SessionError> {
        if self.pending.is_empty() {
            return Err(SessionError::NothingPending);
        }
        self.settle_pending()
    }

    /// Whether a finished game still waits to be stored.
    pub fn has_pending_outcome(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of finished games waiting to be stored.
    pub fn pending_outcomes(&self) -> usize {
        self.pending.len()
    }

    fn settle_pending(&mut self) -> Result<(), SessionError> {
        while let Some(completed) = self.pending.front() {
            let settled = self.games.settle(completed).inspect_err(|e| {
                error!(error = %e, pending = self.pending.len(), "Failed to store game outcome");
            })?;

            self.pending.pop_front();
            if let Some(seats) = self.seats.as_mut() {
                seats.refresh(settled.player1());
                seats.refresh(settled.player2());
            }
            info!(game_id = settled.record().id(), "Game outcome stored");
        }
        Ok(())
    }

    /// Empties `(row, col)` and excludes it from win checks until it is
    /// played again. Returns whether anything was cleared.
    #[instrument(skip(self))]
    pub fn clear_tile(&mut self, row: usize, col: usize) -> bool {
        self.game.clear_tile(row, col)
    }

    /// Clears up to `count` occupied tiles chosen uniformly at random and
    /// returns them.
    #[instrument(skip(self, rng))]
    pub fn clear_random_tiles<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<Coord> {
        let mut occupied = self.game.board().occupied();
        occupied.shuffle(rng);
        occupied.truncate(count);
        occupied.retain(|coord| self.game.clear_tile(coord.row(), coord.col()));
        info!(cleared = occupied.len(), "Random tiles cleared");
        occupied
    }

    /// Starts the same pairing over with a fresh board. Players and their
    /// counters are untouched.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        self.game.reset();
        info!(mode = %self.game.mode(), "Game reset");
    }

    /// Lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.seats.is_none() {
            return SessionState::AwaitingPlayers;
        }
        match self.game.status() {
            GameStatus::InProgress => SessionState::InProgress,
            GameStatus::Won { mark, .. } => SessionState::Won(mark),
            GameStatus::Draw => SessionState::Draw,
        }
    }

    /// Whether either mark currently holds a line, regardless of state.
    pub fn has_winner(&self) -> bool {
        self.game.has_winner()
    }

    /// `"X"`, `"O"`, `"DRAW"`, or `""` while not finished.
    pub fn game_result(&self) -> &'static str {
        self.game.result_label()
    }

    /// Cell at `(row, col)`; cleared and off-board positions read as empty.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.game.cell(row, col)
    }

    /// The engine for the current game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Current mode.
    pub fn mode(&self) -> GameMode {
        self.game.mode()
    }

    /// Mark to move next.
    pub fn current_mark(&self) -> Mark {
        self.game.to_move()
    }

    /// Player whose turn it is, once players are seated.
    pub fn current_player(&self) -> Option<&Player> {
        self.seats
            .as_ref()
            .map(|seats| seats.player_for(self.game.to_move()))
    }

    /// Seated players with their latest stored counters.
    pub fn players(&self) -> Option<(&Player, &Player)> {
        self.seats
            .as_ref()
            .map(|seats| (&seats.player1, &seats.player2))
    }

    /// Leaderboard: players by wins, most first.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Db`] if the store fails.
    #[instrument(skip(self))]
    pub fn top_players(&self, limit: i64) -> Result<Vec<Player>, SessionError> {
        Ok(self.players.find_top_players(limit)?)
    }

    /// Most recent finished games with participant names.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Db`] if the store fails.
    #[instrument(skip(self))]
    pub fn recent_games(&self, limit: i64) -> Result<Vec<GameSummary>, SessionError> {
        Ok(self.games.find_recent_games(limit)?)
    }
}
