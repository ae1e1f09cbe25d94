//! Exhaustive minimax for the computer opponent.
//!
//! The computer always plays [`COMPUTER`]. Positions are scored only at
//! terminal leaves: +10 when the computer holds a line, -10 when the
//! opponent does, 0 for a full board. The 3x3 grid bounds the recursion at
//! nine plies, so the tree is walked to the leaves without pruning.

use tracing::{debug, instrument, warn};

use super::rules::{has_line, is_full};
use super::types::{Board, Cell, Mark, SIZE};

/// The mark the search plays for.
pub const COMPUTER: Mark = Mark::O;

/// Leaf score when the computer holds a line.
pub const WIN_SCORE: i32 = 10;

/// Leaf score when the opponent holds a line.
pub const LOSS_SCORE: i32 = -10;

/// Leaf score for a full board with no line.
pub const DRAW_SCORE: i32 = 0;

/// Lower bound that any real score beats at the root.
const WORST: i32 = -1000;

/// Chosen cell and its minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    /// Row of the chosen cell.
    pub row: usize,
    /// Column of the chosen cell.
    pub col: usize,
    /// Minimax value with the opponent replying optimally.
    pub score: i32,
}

/// Scores `board` with `to_move` about to play.
///
/// The computer's line is checked before the opponent's, then fullness.
/// Interior nodes carry no value of their own.
pub fn minimax(board: &mut Board, to_move: Mark) -> i32 {
    if has_line(board, COMPUTER) {
        return WIN_SCORE;
    }
    if has_line(board, COMPUTER.opponent()) {
        return LOSS_SCORE;
    }
    if is_full(board) {
        return DRAW_SCORE;
    }

    let maximizing = to_move == COMPUTER;
    let mut best = if maximizing { WORST } else { -WORST };

    for i in 0..SIZE * SIZE {
        if board.cells()[i] != Cell::Empty {
            continue;
        }
        board.cells_mut()[i] = Cell::Occupied(to_move);
        let score = minimax(board, to_move.opponent());
        board.cells_mut()[i] = Cell::Empty;

        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}

/// Picks the computer's move on `board`, assuming optimal replies.
///
/// Empty cells are tried in row-major order and a candidate replaces the
/// current best only when its score is strictly higher, so ties go to the
/// earliest cell. There is no preference for shorter wins.
///
/// Returns `None` when the board has no empty cell.
#[instrument(skip(board), fields(empty = board.empty_cells().len()))]
pub fn best_scored_move(board: &Board) -> Option<ScoredMove> {
    let mut scratch = *board;
    let mut best: Option<ScoredMove> = None;

    for (row, col) in board.empty_cells() {
        let i = row * SIZE + col;
        scratch.cells_mut()[i] = Cell::Occupied(COMPUTER);
        let score = minimax(&mut scratch, COMPUTER.opponent());
        scratch.cells_mut()[i] = Cell::Empty;

        debug!(row, col, score, "Scored candidate");

        if best.is_none_or(|b| score > b.score) {
            best = Some(ScoredMove { row, col, score });
        }
    }

    match best {
        Some(chosen) => debug!(row = chosen.row, col = chosen.col, score = chosen.score, "Move chosen"),
        None => warn!("Search called on a board with no empty cell"),
    }

    best
}

/// Picks the computer's move as a (row, col) pair.
///
/// See [`best_scored_move`].
pub fn best_move(board: &Board) -> Option<(usize, usize)> {
    best_scored_move(board).map(|m| (m.row, m.col))
}
