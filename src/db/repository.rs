//! SQLite-backed game history.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameHistoryRow, HistoryStore, NewGameHistoryRow, schema};
use crate::games::tictactoe::GameRecord;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Game history stored in a SQLite file.
///
/// A connection is opened per call; the schema is brought up to date once,
/// when the repository is created.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Opens the database at `db_path` and runs pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating GameRepository");
        let repo = Self { db_path };
        let mut conn = repo.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::open(&repo.db_path, format!("migration failed: {}", e)))?;
        debug!(applied = applied.len(), "Migrations run");
        Ok(repo)
    }

    /// Path the repository connects to.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::open(&self.db_path, e))
    }

    /// Inserts one finished game and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, record), fields(mode = %record.mode(), winner = %record.winner()))]
    pub fn insert(&self, username: &str, record: &GameRecord) -> Result<GameHistoryRow, DbError> {
        let mut conn = self.connection()?;
        let new_row = NewGameHistoryRow::from_record(username, record);

        let row = diesel::insert_into(schema::game_history::table)
            .values(&new_row)
            .returning(GameHistoryRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| DbError::save(username, e))?;

        info!(id = row.id(), username = %row.username(), "Game recorded");
        Ok(row)
    }

    /// Raw rows for `username`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn rows_for(&self, username: &str) -> Result<Vec<GameHistoryRow>, DbError> {
        use schema::game_history::dsl;

        let mut conn = self.connection()?;
        let rows = dsl::game_history
            .filter(dsl::username.eq(username))
            .order((dsl::timestamp.desc(), dsl::id.desc()))
            .select(GameHistoryRow::as_select())
            .load(&mut conn)
            .map_err(|e| DbError::load(username, e))?;

        debug!(count = rows.len(), "History rows loaded");
        Ok(rows)
    }
}

impl HistoryStore for GameRepository {
    fn save(&self, username: &str, record: &GameRecord) -> Result<(), DbError> {
        self.insert(username, record).map(|_| ())
    }

    fn load(&self, username: &str) -> Result<Vec<GameRecord>, DbError> {
        self.rows_for(username)?
            .iter()
            .map(GameHistoryRow::to_record)
            .collect()
    }
}
