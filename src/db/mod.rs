//! Persistence boundary for finished games.

mod error;
mod memory;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{DbError, HistoryOp};
pub use memory::MemoryStore;
pub use models::{GameHistoryRow, NewGameHistoryRow};
pub use repository::GameRepository;

use crate::games::tictactoe::GameRecord;

/// Storage for a user's finished games.
///
/// The engine hands one [`GameRecord`] outward per completed game and reads
/// a user's list back when a session signs in.
pub trait HistoryStore: std::fmt::Debug + Send {
    /// Persists one finished game for `username`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the record cannot be written.
    fn save(&self, username: &str, record: &GameRecord) -> Result<(), DbError>;

    /// Loads `username`'s games, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the history cannot be read or a row does not decode.
    fn load(&self, username: &str) -> Result<Vec<GameRecord>, DbError>;
}
