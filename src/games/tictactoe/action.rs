//! First-class action types for tic-tac-toe.
//!
//! Moves are domain events, not side effects. They represent
//! a placed mark and are what the move log records and replays.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::types::{Mark, SIZE};

/// A move: a mark placed at (row, col).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Row, 0-2.
    pub row: usize,
    /// Column, 0-2.
    pub col: usize,
    /// The mark placed.
    pub player: Mark,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(row: usize, col: usize, player: Mark) -> Self {
        Self { row, col, player }
    }

    /// Returns true when both coordinates are on the grid.
    pub fn in_bounds(&self) -> bool {
        self.row < SIZE && self.col < SIZE
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.row, self.col, self.player.as_char())
    }
}

/// Reason a move was not applied.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Row or column outside 0-2.
    #[display("Cell ({}, {}) is off the board", row, col)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The cell already holds a mark.
    #[display("Cell ({}, {}) is already occupied", row, col)]
    CellOccupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The game has reached a terminal state.
    #[display("Game is already over")]
    GameInactive,

    /// The computer was asked to move when it is not its turn.
    #[display("It is not the computer's turn")]
    NotComputerTurn,

    /// A human move was submitted while the computer is to move.
    #[display("Waiting for the computer to move")]
    AwaitingComputer,

    /// The search had no empty cell to choose from.
    #[display("No legal move available")]
    NoLegalMove,
}

impl std::error::Error for MoveError {}
