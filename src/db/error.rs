//! Storage error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// The history operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HistoryOp {
    /// Opening or migrating the store.
    #[display("open")]
    Open,
    /// Writing a finished game.
    #[display("save")]
    Save,
    /// Reading a user's games.
    #[display("load")]
    Load,
    /// Turning a stored row back into a game record.
    #[display("decode")]
    Decode,
}

/// Game history storage error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("History {} failed: {} at {}:{}", op, message, file, line)]
pub struct DbError {
    /// Operation that failed.
    pub op: HistoryOp,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a storage error for `op` with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(op: HistoryOp, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            op,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The store at `db_path` could not be opened or migrated.
    #[track_caller]
    pub fn open(db_path: &str, cause: impl std::fmt::Display) -> Self {
        Self::new(HistoryOp::Open, format!("'{}': {}", db_path, cause))
    }

    /// A game for `username` could not be written.
    #[track_caller]
    pub fn save(username: &str, cause: impl std::fmt::Display) -> Self {
        Self::new(HistoryOp::Save, format!("game for '{}': {}", username, cause))
    }

    /// The games of `username` could not be read.
    #[track_caller]
    pub fn load(username: &str, cause: impl std::fmt::Display) -> Self {
        Self::new(HistoryOp::Load, format!("games of '{}': {}", username, cause))
    }

    /// Stored game `row_id` does not describe a valid game.
    #[track_caller]
    pub fn bad_row(row_id: i32, reason: impl std::fmt::Display) -> Self {
        Self::new(HistoryOp::Decode, format!("stored game #{}: {}", row_id, reason))
    }
}
