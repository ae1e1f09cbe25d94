//! Win detection logic for tic-tac-toe.

use strum::IntoEnumIterator;

use super::super::types::{Board, Cell, Mark};

/// The eight winning lines as row-major cell indices.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Checks if `mark` holds any full row, column, or diagonal.
///
/// Runs at every node of the search, so it stays uninstrumented.
pub fn has_line(board: &Board, mark: Mark) -> bool {
    let cells = board.cells();
    let target = Cell::Occupied(mark);
    LINES
        .iter()
        .any(|[a, b, c]| cells[*a] == target && cells[*b] == target && cells[*c] == target)
}

/// Returns the mark holding a line, if any.
///
/// X is checked first; on a board reached through legal play at most one
/// mark can hold a line.
pub fn winner(board: &Board) -> Option<Mark> {
    Mark::iter().find(|mark| has_line(board, *mark))
}
