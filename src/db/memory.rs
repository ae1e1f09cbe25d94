//! In-process history store.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, instrument};

use crate::db::{DbError, HistoryStore};
use crate::games::tictactoe::GameRecord;

/// History kept in memory for the life of the process.
///
/// Used when no database is configured, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: Mutex<HashMap<String, Vec<GameRecord>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    #[instrument(skip(self, record))]
    fn save(&self, username: &str, record: &GameRecord) -> Result<(), DbError> {
        let mut games = self
            .games
            .lock()
            .map_err(|_| DbError::save(username, "history lock poisoned"))?;
        games.entry(username.to_string()).or_default().push(record.clone());
        debug!("Game stored in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    fn load(&self, username: &str) -> Result<Vec<GameRecord>, DbError> {
        let games = self
            .games
            .lock()
            .map_err(|_| DbError::load(username, "history lock poisoned"))?;
        let mut records = games.get(username).cloned().unwrap_or_default();
        // Stable sort keeps later inserts ahead of equal timestamps once reversed.
        records.sort_by_key(|r| *r.timestamp());
        records.reverse();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{GameMode, MoveLog, TIMESTAMP_FORMAT};
    use chrono::NaiveDateTime;

    fn record(ts: &str, winner: &str) -> GameRecord {
        GameRecord::new(
            GameMode::PvP,
            winner.to_string(),
            MoveLog::new(),
            NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).expect("Valid timestamp"),
        )
    }

    #[test]
    fn test_load_is_most_recent_first() {
        let store = MemoryStore::new();
        store.save("amy", &record("2025-01-01 10:00:00", "Player 1")).expect("Save");
        store.save("amy", &record("2025-01-03 10:00:00", "Draw")).expect("Save");
        store.save("amy", &record("2025-01-02 10:00:00", "Player 2")).expect("Save");

        let winners: Vec<_> = store
            .load("amy")
            .expect("Load")
            .iter()
            .map(|r| r.winner().clone())
            .collect();
        assert_eq!(winners, ["Draw", "Player 2", "Player 1"]);
    }

    #[test]
    fn test_users_are_separate() {
        let store = MemoryStore::new();
        store.save("amy", &record("2025-01-01 10:00:00", "Draw")).expect("Save");
        assert!(store.load("ben").expect("Load").is_empty());
    }
}
