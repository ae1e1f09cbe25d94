//! Per-process state: who is signed in and which games they have played.

use derive_getters::Getters;
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, HistoryStore};
use crate::games::tictactoe::{DRAW_LABEL, GameRecord};
use crate::replay::ReplayEngine;
use crate::session::WinnerLabels;

/// Text shown when the history is empty.
pub const EMPTY_HISTORY: &str = "No games have been played yet.";

/// Why a replay could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ReplayError {
    /// No game has been recorded.
    #[display("No games have been played yet")]
    NoGames,
    /// The game number is outside `1..=history.len()`.
    #[display("Game {} does not exist; choose 1 to {}", selection, available)]
    InvalidSelection {
        /// The number asked for.
        selection: usize,
        /// How many games exist.
        available: usize,
    },
    /// The chosen game has an empty move log.
    #[display("No move data available for game {}", _0)]
    NoMoveData(#[error(not(source))] usize),
}

/// Win, loss, and draw counts over a history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct HistoryStats {
    total_games: usize,
    player_wins: usize,
    computer_wins: usize,
    draws: usize,
}

impl HistoryStats {
    /// Classifies each record by its winner label.
    ///
    /// Any person's label counts as a player win. Unrecognized labels are
    /// counted as draws.
    #[instrument(skip(records, labels), fields(count = records.len()))]
    pub fn from_records(records: &[GameRecord], labels: &WinnerLabels) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total_games += 1;
            let winner = record.winner().as_str();
            if winner == labels.computer {
                stats.computer_wins += 1;
            } else if winner == labels.human || winner == labels.player_one || winner == labels.player_two {
                stats.player_wins += 1;
            } else {
                if winner != DRAW_LABEL {
                    warn!(winner, "Unknown winner label counted as a draw");
                }
                stats.draws += 1;
            }
        }
        stats
    }

    /// Player wins as a percentage of all games (0.0 to 100.0).
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (self.player_wins as f64 / self.total_games as f64) * 100.0
        }
    }
}

/// Signed-in user, their game history, and where it is stored.
///
/// Created once by the binary and passed to whatever needs it.
#[derive(Debug)]
pub struct SessionContext {
    user: Option<String>,
    history: Vec<GameRecord>,
    labels: WinnerLabels,
    store: Box<dyn HistoryStore>,
}

impl SessionContext {
    /// Creates a context with nobody signed in.
    #[instrument(skip(store, labels))]
    pub fn new(store: Box<dyn HistoryStore>, labels: WinnerLabels) -> Self {
        Self {
            user: None,
            history: Vec::new(),
            labels,
            store,
        }
    }

    /// Signs `username` in and loads their stored games.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the history cannot be loaded; the previous
    /// user stays signed in.
    #[instrument(skip(self))]
    pub fn sign_in(&mut self, username: &str) -> Result<(), DbError> {
        let history = self.store.load(username)?;
        info!(games = history.len(), "Signed in");
        self.user = Some(username.to_string());
        self.history = history;
        Ok(())
    }

    /// Signs out and forgets the loaded history.
    #[instrument(skip(self), fields(user = ?self.user))]
    pub fn sign_out(&mut self) {
        self.user = None;
        self.history.clear();
        debug!("Signed out");
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Winner labels used for stats.
    pub fn labels(&self) -> &WinnerLabels {
        &self.labels
    }

    /// Appends a finished game and persists it when someone is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store rejects the record. The record is
    /// kept in memory regardless.
    #[instrument(skip(self, record), fields(user = ?self.user, winner = %record.winner()))]
    pub fn record_game(&mut self, record: GameRecord) -> Result<(), DbError> {
        self.history.push(record);
        let Some(user) = self.user.as_deref() else {
            debug!("Nobody signed in; game kept in memory only");
            return Ok(());
        };
        if let Some(record) = self.history.last() {
            self.store.save(user, record)?;
            info!("Game saved");
        }
        Ok(())
    }

    /// Games known to this context.
    pub fn history(&self) -> &[GameRecord] {
        &self.history
    }

    /// One line per game, numbered from 1.
    #[instrument(skip(self), fields(count = self.history.len()))]
    pub fn history_lines(&self) -> Vec<String> {
        if self.history.is_empty() {
            return vec![EMPTY_HISTORY.to_string()];
        }
        self.history
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "Game {}: Mode: {}, Winner: {}, Time: {}",
                    i + 1,
                    r.mode(),
                    r.winner(),
                    r.timestamp_string()
                )
            })
            .collect()
    }

    /// Aggregate results over the history.
    pub fn stats(&self) -> HistoryStats {
        HistoryStats::from_records(&self.history, &self.labels)
    }

    /// Builds a replay of game number `selection`, counting from 1.
    ///
    /// # Errors
    ///
    /// Returns a [`ReplayError`] when there are no games, the number is out of
    /// range, or the chosen game has no moves.
    #[instrument(skip(self), fields(count = self.history.len()))]
    pub fn replay_engine(&self, selection: usize) -> Result<ReplayEngine, ReplayError> {
        if self.history.is_empty() {
            return Err(ReplayError::NoGames);
        }
        let record = selection
            .checked_sub(1)
            .and_then(|i| self.history.get(i))
            .ok_or(ReplayError::InvalidSelection {
                selection,
                available: self.history.len(),
            })?;
        if record.moves().is_empty() {
            warn!(selection, "Selected game has no moves");
            return Err(ReplayError::NoMoveData(selection));
        }
        Ok(ReplayEngine::from_record(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::games::tictactoe::{GameMode, Mark, Move, MoveLog, TIMESTAMP_FORMAT};
    use chrono::NaiveDateTime;

    fn record(winner: &str, moves: MoveLog) -> GameRecord {
        GameRecord::new(
            GameMode::PvAI,
            winner.to_string(),
            moves,
            NaiveDateTime::parse_from_str("2025-03-04 05:06:07", TIMESTAMP_FORMAT).expect("Valid timestamp"),
        )
    }

    fn context() -> SessionContext {
        SessionContext::new(Box::new(MemoryStore::new()), WinnerLabels::default())
    }

    #[test]
    fn test_empty_history_line() {
        assert_eq!(context().history_lines(), vec![EMPTY_HISTORY.to_string()]);
    }

    #[test]
    fn test_history_line_format() {
        let mut ctx = context();
        ctx.record_game(record("AI", MoveLog::new())).expect("Record");
        assert_eq!(
            ctx.history_lines(),
            vec!["Game 1: Mode: PvAI, Winner: AI, Time: 2025-03-04 05:06:07".to_string()]
        );
    }

    #[test]
    fn test_replay_selection_errors() {
        let mut ctx = context();
        assert_eq!(ctx.replay_engine(1).err(), Some(ReplayError::NoGames));

        ctx.record_game(record("Draw", MoveLog::new())).expect("Record");
        assert_eq!(
            ctx.replay_engine(0).err(),
            Some(ReplayError::InvalidSelection {
                selection: 0,
                available: 1
            })
        );
        assert_eq!(
            ctx.replay_engine(2).err(),
            Some(ReplayError::InvalidSelection {
                selection: 2,
                available: 1
            })
        );
        assert_eq!(ctx.replay_engine(1).err(), Some(ReplayError::NoMoveData(1)));
    }

    #[test]
    fn test_replay_selection_ok() {
        let mut ctx = context();
        let moves = MoveLog::try_from(vec![Move::new(1, 1, Mark::X)]).expect("Distinct cells");
        ctx.record_game(record("You", moves.clone())).expect("Record");
        let engine = ctx.replay_engine(1).expect("Replay");
        assert_eq!(engine.moves(), &moves);
    }

    #[test]
    fn test_stats_classify_labels() {
        let mut ctx = context();
        for winner in ["You", "AI", "Draw", "Player 2", "AI"] {
            ctx.record_game(record(winner, MoveLog::new())).expect("Record");
        }
        let stats = ctx.stats();
        assert_eq!(*stats.total_games(), 5);
        assert_eq!(*stats.player_wins(), 2);
        assert_eq!(*stats.computer_wins(), 2);
        assert_eq!(*stats.draws(), 1);
        assert!((stats.win_rate() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_games_persist_only_when_signed_in() {
        let mut ctx = context();
        ctx.record_game(record("AI", MoveLog::new())).expect("Record");
        ctx.sign_in("zoe").expect("Sign in");
        assert!(ctx.history().is_empty());

        ctx.record_game(record("You", MoveLog::new())).expect("Record");
        ctx.sign_out();
        assert!(ctx.history().is_empty());

        ctx.sign_in("zoe").expect("Sign in");
        assert_eq!(ctx.history().len(), 1);
        assert_eq!(ctx.history()[0].winner(), "You");
    }
}
