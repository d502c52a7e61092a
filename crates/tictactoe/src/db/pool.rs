//! Owned SQLite connection pool with embedded migrations.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::DbError;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// A connection checked out of the pool.
pub(crate) type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Per-connection SQLite settings applied on checkout.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Handle to the game database.
///
/// Owns a bounded connection pool. Every store operation checks out one
/// connection for its duration and returns it when done. Cloning is cheap
/// and shares the pool; the pool closes when the last clone is dropped.
///
/// Each pooled connection to `":memory:"` would see its own empty
/// database, so tests use a temporary file instead.
#[derive(Clone)]
pub struct Database {
    url: String,
    pool: Pool<ConnectionManager<SqliteConnection>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("url", &self.url)
            .field("pool_size", &self.pool.max_size())
            .finish()
    }
}

impl Database {
    /// Opens the database at `url` with a pool of `pool_size` connections
    /// and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the pool cannot be built or a migration fails.
    #[instrument(skip(url))]
    pub fn open(url: impl Into<String>, pool_size: u32) -> Result<Self, DbError> {
        let url = url.into();
        info!(url = %url, pool_size, "Opening database");

        let manager = ConnectionManager::<SqliteConnection>::new(&url);
        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .connection_customizer(Box::new(SqlitePragmas {
                busy_timeout: Duration::from_secs(5),
            }))
            .build(manager)
            .map_err(|e| DbError::new(format!("Failed to open '{}': {}", url, e)))?;

        let db = Self { url, pool };
        db.run_migrations()?;
        Ok(db)
    }

    /// Database location this pool connects to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Checks a connection out of the pool.
    #[instrument(skip(self))]
    pub(crate) fn connection(&self) -> Result<DbConnection, DbError> {
        debug!(
            url = %self.url,
            idle = self.pool.state().idle_connections,
            "Checking out connection"
        );
        Ok(self.pool.get()?)
    }

    #[instrument(skip(self))]
    fn run_migrations(&self) -> Result<(), DbError> {
        let mut pooled = self.connection()?;
        let conn: &mut SqliteConnection = &mut pooled;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(applied = applied.len(), "Migrations up to date");
        Ok(())
    }
}
