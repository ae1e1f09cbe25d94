//! Database rows for finished games.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::{instrument, warn};

use crate::db::{DbError, schema};
use crate::games::tictactoe::{GameMode, GameRecord, MoveLog};

/// Stored game, as read back from `game_history`.
///
/// `moves` holds the encoded move log.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::game_history)]
pub struct GameHistoryRow {
    id: i32,
    username: String,
    game_mode: String,
    winner: String,
    moves: String,
    timestamp: NaiveDateTime,
}

impl GameHistoryRow {
    /// Decodes the row into a [`GameRecord`].
    ///
    /// Malformed move tokens are skipped by the log decoder; an unknown
    /// game mode fails the row.
    ///
    /// # Errors
    ///
    /// Returns a [`DbError`] naming the row if `game_mode` is not `PvP` or
    /// `PvAI`.
    #[instrument(skip(self), fields(id = self.id, game_mode = %self.game_mode))]
    pub fn to_record(&self) -> Result<GameRecord, DbError> {
        let mode = GameMode::from_str(&self.game_mode).map_err(|_| {
            warn!("Unknown game mode in stored row");
            DbError::bad_row(self.id, format!("Invalid game mode: '{}'", self.game_mode))
        })?;
        Ok(GameRecord::new(
            mode,
            self.winner.clone(),
            MoveLog::decode(&self.moves),
            self.timestamp,
        ))
    }
}

/// Insertable row for recording a finished game.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::game_history)]
pub struct NewGameHistoryRow {
    username: String,
    game_mode: String,
    winner: String,
    moves: String,
    timestamp: NaiveDateTime,
}

impl NewGameHistoryRow {
    /// Encodes `record` for `username`.
    #[instrument(skip(record), fields(mode = %record.mode(), winner = %record.winner()))]
    pub fn from_record(username: &str, record: &GameRecord) -> Self {
        Self::new(
            username.to_string(),
            record.mode().to_string(),
            record.winner().clone(),
            record.moves().encode(),
            *record.timestamp(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::HistoryOp;
    use crate::games::tictactoe::{Mark, Move, TIMESTAMP_FORMAT};

    fn ts() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-01-02 03:04:05", TIMESTAMP_FORMAT).expect("Valid timestamp")
    }

    #[test]
    fn test_new_row_encodes_moves() {
        let record = GameRecord::new(
            GameMode::PvAI,
            "AI".to_string(),
            MoveLog::try_from(vec![Move::new(0, 0, Mark::X), Move::new(1, 1, Mark::O)])
                .expect("Distinct cells"),
            ts(),
        );
        let row = NewGameHistoryRow::from_record("alice", &record);
        assert_eq!(row.game_mode(), "PvAI");
        assert_eq!(row.moves(), "0-0-X;1-1-O");
        assert_eq!(row.username(), "alice");
    }

    #[test]
    fn test_row_with_bad_mode_fails() {
        let row = GameHistoryRow {
            id: 1,
            username: "bob".to_string(),
            game_mode: "Solo".to_string(),
            winner: "Draw".to_string(),
            moves: String::new(),
            timestamp: ts(),
        };
        let err = row.to_record().expect_err("Unknown mode");
        assert_eq!(err.op, HistoryOp::Decode);
        assert!(err.message.contains("stored game #1"));
        assert!(err.message.contains("'Solo'"));
    }

    #[test]
    fn test_row_decodes() {
        let row = GameHistoryRow {
            id: 7,
            username: "bob".to_string(),
            game_mode: "PvP".to_string(),
            winner: "Player 2".to_string(),
            moves: "0-0-X;bad;1-1-O".to_string(),
            timestamp: ts(),
        };
        let record = row.to_record().expect("Valid row");
        assert_eq!(*record.mode(), GameMode::PvP);
        assert_eq!(record.moves().len(), 2);
        assert_eq!(*record.timestamp(), ts());
    }
}
