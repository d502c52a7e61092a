//! Game history store.

use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::players::update;
use crate::db::{
    CompletedGame, Database, DbError, GameId, GameRecord, GameSummary, NewGameRecord, Player,
    PlayerId, SettledGame, schema,
};

/// Append-only log of finished games.
///
/// Records are never updated or deleted.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db: Database,
}

impl GameRepository {
    /// Creates a repository backed by `db`.
    #[instrument(skip(db), fields(url = %db.url()))]
    pub fn new(db: Database) -> Self {
        info!("Creating GameRepository");
        Self { db }
    }

    /// Appends a history record and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a referenced player does not exist or a
    /// database error occurs.
    #[instrument(
        skip(self, record),
        fields(player1 = record.player1_id(), player2 = record.player2_id())
    )]
    pub fn save(&self, record: NewGameRecord) -> Result<GameRecord, DbError> {
        let mut conn = self.db.connection()?;
        insert(&mut conn, &record)
    }

    /// Settles a finished game atomically: both players' counters are
    /// re-read and incremented by id, and the history record is appended,
    /// all in one transaction. Nothing is written if any step fails.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a player is missing or a database error occurs.
    #[instrument(
        skip(self, game),
        fields(player1 = game.player1_id(), player2 = game.player2_id(), winner = ?game.winner_id())
    )]
    pub fn settle(&self, game: &CompletedGame) -> Result<SettledGame, DbError> {
        debug!(mode = %game.mode(), "Settling finished game");
        let mut pooled = self.db.connection()?;
        let conn: &mut SqliteConnection = &mut pooled;

        let settled = conn.transaction::<_, DbError, _>(|conn| {
            let player1 = reload(conn, *game.player1_id())?
                .with_outcome(game.outcome_for(*game.player1_id()));
            let player2 = reload(conn, *game.player2_id())?
                .with_outcome(game.outcome_for(*game.player2_id()));

            let player1 = update(conn, &player1)?;
            let player2 = update(conn, &player2)?;
            let record = insert(conn, &game.to_record(Utc::now().naive_utc()))?;
            Ok(SettledGame::new(player1, player2, record))
        })?;

        info!(game_id = settled.record().id(), "Game settled");
        Ok(settled)
    }

    /// Lookup by identity.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: GameId) -> Result<Option<GameRecord>, DbError> {
        let mut conn = self.db.connection()?;
        Ok(schema::games::table
            .find(id)
            .select(GameRecord::as_select())
            .first(&mut conn)
            .optional()?)
    }

    /// Most recent games first, at most `limit`, with participant names.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_recent_games(&self, limit: i64) -> Result<Vec<GameSummary>, DbError> {
        let mut conn = self.db.connection()?;

        let records = schema::games::table
            .order((schema::games::played_at.desc(), schema::games::id.desc()))
            .limit(limit.max(0))
            .select(GameRecord::as_select())
            .load(&mut conn)?;

        info!(count = records.len(), "Recent games loaded");
        summarize(&mut conn, records)
    }

    /// Every game `player_id` took part in, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_games_by_player(&self, player_id: PlayerId) -> Result<Vec<GameSummary>, DbError> {
        use schema::games::dsl;

        let mut conn = self.db.connection()?;

        let records = dsl::games
            .filter(dsl::player1_id.eq(player_id).or(dsl::player2_id.eq(player_id)))
            .order((dsl::played_at.desc(), dsl::id.desc()))
            .select(GameRecord::as_select())
            .load(&mut conn)?;

        info!(player_id, count = records.len(), "Player games loaded");
        summarize(&mut conn, records)
    }
}

#[instrument(skip(conn))]
fn reload(conn: &mut SqliteConnection, id: PlayerId) -> Result<Player, DbError> {
    schema::players::table
        .find(id)
        .select(Player::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| DbError::new(format!("Player {} does not exist", id)))
}

#[instrument(skip(conn, record))]
fn insert(conn: &mut SqliteConnection, record: &NewGameRecord) -> Result<GameRecord, DbError> {
    let stored = diesel::insert_into(schema::games::table)
        .values(record)
        .returning(GameRecord::as_returning())
        .get_result(conn)?;

    info!(game_id = stored.id(), is_draw = stored.is_draw(), "Game recorded");
    Ok(stored)
}

/// Attaches display names to each record. A missing winner stays `None`.
#[instrument(skip(conn, records), fields(count = records.len()))]
fn summarize(
    conn: &mut SqliteConnection,
    records: Vec<GameRecord>,
) -> Result<Vec<GameSummary>, DbError> {
    let mut ids: Vec<PlayerId> = records
        .iter()
        .flat_map(|r| [*r.player1_id(), *r.player2_id()])
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let names: HashMap<PlayerId, String> = schema::players::table
        .filter(schema::players::id.eq_any(ids))
        .select((schema::players::id, schema::players::name))
        .load::<(PlayerId, String)>(conn)?
        .into_iter()
        .collect();

    let name_of = |id: PlayerId| {
        names
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::new(format!("Game references unknown player {}", id)))
    };

    records
        .into_iter()
        .map(|record| {
            let player1_name = name_of(*record.player1_id())?;
            let player2_name = name_of(*record.player2_id())?;
            let winner_name = record.winner_id().map(&name_of).transpose()?;
            Ok::<_, DbError>(GameSummary::new(
                record,
                player1_name,
                player2_name,
                winner_name,
            ))
        })
        .collect()
}
