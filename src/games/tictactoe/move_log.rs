//! Ordered move log and its text encoding.
//!
//! The encoding is the storage wire format: one `"<row>-<col>-<mark>"` token
//! per move, tokens joined by `;`, no trailing separator.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::action::{Move, MoveError};
use super::types::Mark;

/// Separator between move tokens.
pub const MOVE_SEPARATOR: &str = ";";

/// Separator between the fields of one token.
pub const FIELD_SEPARATOR: &str = "-";

/// Moves of one game in play order.
///
/// A cell appears at most once, so the log reconstructs the board history
/// uniquely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Move>", into = "Vec<Move>")]
pub struct MoveLog {
    moves: Vec<Move>,
}

impl MoveLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a move.
    ///
    /// # Errors
    ///
    /// Rejects moves off the grid and moves on a cell already in the log.
    #[instrument(skip(self), fields(len = self.moves.len()))]
    pub fn push(&mut self, mv: Move) -> Result<(), MoveError> {
        if !mv.in_bounds() {
            return Err(MoveError::OutOfBounds {
                row: mv.row,
                col: mv.col,
            });
        }
        if self.contains_cell(mv.row, mv.col) {
            return Err(MoveError::CellOccupied {
                row: mv.row,
                col: mv.col,
            });
        }
        self.moves.push(mv);
        Ok(())
    }

    /// True when a move at (row, col) is already logged.
    pub fn contains_cell(&self, row: usize, col: usize) -> bool {
        self.moves.iter().any(|m| m.row == row && m.col == col)
    }

    /// Returns the moves in play order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Returns the move at `index`.
    pub fn get(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True when no move has been logged.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Drops every move, for a restarted game.
    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Encodes the log into its storage string.
    #[instrument(skip(self), fields(len = self.moves.len()))]
    pub fn encode(&self) -> String {
        self.moves
            .iter()
            .map(Move::to_string)
            .collect::<Vec<_>>()
            .join(MOVE_SEPARATOR)
    }

    /// Decodes a storage string.
    ///
    /// An empty string is an empty log. Tokens that do not split into
    /// exactly three fields, carry a coordinate outside 0-2, name an unknown
    /// mark, or repeat a logged cell are skipped; the rest still decode.
    #[instrument(skip(encoded), fields(bytes = encoded.len()))]
    pub fn decode(encoded: &str) -> Self {
        let mut log = Self::new();
        if encoded.is_empty() {
            return log;
        }

        for token in encoded.split(MOVE_SEPARATOR) {
            let Some(mv) = parse_token(token) else {
                warn!(token, "Skipping malformed move token");
                continue;
            };
            if let Err(e) = log.push(mv) {
                warn!(token, error = %e, "Skipping move token");
            }
        }

        debug!(decoded = log.len(), "Move log decoded");
        log
    }
}

impl TryFrom<Vec<Move>> for MoveLog {
    type Error = MoveError;

    /// Builds a log by pushing each move in order.
    ///
    /// Fails on the first move that is off the grid or repeats a cell.
    fn try_from(moves: Vec<Move>) -> Result<Self, Self::Error> {
        let mut log = Self::new();
        for mv in moves {
            log.push(mv)?;
        }
        Ok(log)
    }
}

impl From<MoveLog> for Vec<Move> {
    fn from(log: MoveLog) -> Self {
        log.moves
    }
}

impl<'a> IntoIterator for &'a MoveLog {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

/// Parses one `"<row>-<col>-<mark>"` token. Only the mark field's first
/// character is significant.
fn parse_token(token: &str) -> Option<Move> {
    let parts: Vec<&str> = token.split(FIELD_SEPARATOR).collect();
    let [row, col, mark] = parts.as_slice() else {
        return None;
    };
    let row = row.parse::<usize>().ok()?;
    let col = col.parse::<usize>().ok()?;
    let mark = Mark::from_char(mark.chars().next()?)?;
    let mv = Move::new(row, col, mark);
    mv.in_bounds().then_some(mv)
}
