//! Player store.

use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::{Database, DbError, NewPlayer, Player, PlayerId, PlayerRecord, schema};

/// Create, find and update player records.
#[derive(Debug, Clone)]
pub struct PlayerRepository {
    db: Database,
}

impl PlayerRepository {
    /// Creates a repository backed by `db`.
    #[instrument(skip(db), fields(url = %db.url()))]
    pub fn new(db: Database) -> Self {
        info!("Creating PlayerRepository");
        Self { db }
    }

    /// Inserts a player without an identity, or writes back every mutable
    /// field of a stored player by id. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the name is already taken, the id does not
    /// exist, or a database error occurs.
    #[instrument(skip(self, record))]
    pub fn save(&self, record: impl Into<PlayerRecord>) -> Result<Player, DbError> {
        let mut conn = self.db.connection()?;
        match record.into() {
            PlayerRecord::New(new_player) => insert(&mut conn, &new_player),
            PlayerRecord::Existing(player) => update(&mut conn, &player),
        }
    }

    /// Inserts a fresh zero-stat player named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the name is already taken or a database error occurs.
    #[instrument(skip(self))]
    pub fn create(&self, name: &str) -> Result<Player, DbError> {
        self.save(NewPlayer::new(name.to_string()))
    }

    /// Exact-match lookup by display name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_by_name(&self, name: &str) -> Result<Option<Player>, DbError> {
        debug!(name = %name, "Looking up player by name");
        let mut conn = self.db.connection()?;

        let player = schema::players::table
            .filter(schema::players::name.eq(name))
            .select(Player::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = player.is_some(), "Player lookup done");
        Ok(player)
    }

    /// Lookup by identity.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: PlayerId) -> Result<Option<Player>, DbError> {
        let mut conn = self.db.connection()?;
        Ok(schema::players::table
            .find(id)
            .select(Player::as_select())
            .first(&mut conn)
            .optional()?)
    }

    /// Returns the existing player named `name`, creating one on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_or_create(&self, name: &str) -> Result<Player, DbError> {
        if let Some(player) = self.find_by_name(name)? {
            info!(player_id = player.id(), "Existing player found");
            return Ok(player);
        }

        info!(name = %name, "Creating new player");
        self.create(name)
    }

    /// Players ordered by wins, most first, at most `limit` of them.
    ///
    /// Players with equal wins are listed in the order they were created.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_top_players(&self, limit: i64) -> Result<Vec<Player>, DbError> {
        let mut conn = self.db.connection()?;

        let players = schema::players::table
            .order((schema::players::wins.desc(), schema::players::id.asc()))
            .limit(limit.max(0))
            .select(Player::as_select())
            .load(&mut conn)?;

        info!(count = players.len(), "Top players loaded");
        Ok(players)
    }
}

#[instrument(skip(conn, new_player), fields(name = %new_player.name()))]
fn insert(conn: &mut SqliteConnection, new_player: &NewPlayer) -> Result<Player, DbError> {
    let player = diesel::insert_into(schema::players::table)
        .values(new_player)
        .returning(Player::as_returning())
        .get_result(conn)?;

    info!(player_id = player.id(), name = %player.name(), "Player created");
    Ok(player)
}

/// Writes name and counters of `player` back by id.
#[instrument(skip(conn, player), fields(player_id = player.id()))]
pub(crate) fn update(conn: &mut SqliteConnection, player: &Player) -> Result<Player, DbError> {
    use schema::players::dsl;

    let updated = diesel::update(dsl::players.find(*player.id()))
        .set((
            dsl::name.eq(player.name()),
            dsl::wins.eq(*player.wins()),
            dsl::losses.eq(*player.losses()),
            dsl::draws.eq(*player.draws()),
        ))
        .returning(Player::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or_else(|| DbError::new(format!("Player {} does not exist", player.id())))?;

    info!(
        wins = updated.wins(),
        losses = updated.losses(),
        draws = updated.draws(),
        "Player updated"
    );
    Ok(updated)
}
