//! Sealed records of finished games.

use chrono::{Local, NaiveDateTime};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::move_log::MoveLog;

/// Label stored as the winner of a drawn game.
pub const DRAW_LABEL: &str = "Draw";

/// Timestamp layout used for display and for the string form at the storage boundary.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Who controls which mark.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum GameMode {
    /// Two people share the board.
    #[strum(serialize = "PvP")]
    PvP,
    /// A person plays X against the computer playing O.
    #[strum(serialize = "PvAI")]
    PvAI,
}

/// A completed game: mode, winner label, moves, and when it ended.
///
/// Only a session that reached a terminal state creates one. It is never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameRecord {
    mode: GameMode,
    winner: String,
    moves: MoveLog,
    timestamp: NaiveDateTime,
}

impl GameRecord {
    /// Creates a record with an explicit timestamp (used when loading from storage).
    #[instrument(skip(moves), fields(moves = moves.len()))]
    pub fn new(mode: GameMode, winner: String, moves: MoveLog, timestamp: NaiveDateTime) -> Self {
        Self {
            mode,
            winner,
            moves,
            timestamp,
        }
    }

    /// Seals a just-finished game, stamping it with the local time.
    #[instrument(skip(moves), fields(moves = moves.len()))]
    pub fn seal(mode: GameMode, winner: impl Into<String> + std::fmt::Debug, moves: MoveLog) -> Self {
        let winner = winner.into();
        let timestamp = Local::now().naive_local();
        info!(%mode, winner = %winner, "Game record sealed");
        Self::new(mode, winner, moves, timestamp)
    }

    /// True when the game ended without a winner.
    pub fn is_draw(&self) -> bool {
        self.winner == DRAW_LABEL
    }

    /// Timestamp rendered with [`TIMESTAMP_FORMAT`].
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
