//! Draw detection and terminal classification for tic-tac-toe.

use serde::{Deserialize, Serialize};

use super::super::types::{Board, Cell, Mark};
use super::win::has_line;

/// Classification of a board after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The mark completed a line.
    Won(Mark),
    /// Full board, no line.
    Draw,
    /// Play continues.
    InProgress,
}

impl Outcome {
    /// True for a win or a draw.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Checks if the board is full (all cells occupied).
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|c| *c != Cell::Empty)
}

/// A full board on which neither mark holds a line.
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && !has_line(board, Mark::X) && !has_line(board, Mark::O)
}

/// Classifies the board after `mover` has placed a mark.
///
/// Only the mover can have completed a line, so its line is checked first
/// and fullness second. A win on the last empty cell is a win, never a draw.
pub fn outcome_after(board: &Board, mover: Mark) -> Outcome {
    if has_line(board, mover) {
        Outcome::Won(mover)
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let board = Board::from_rows("    X    ");
        assert!(!is_full(&board));
    }

    #[test]
    fn test_full_board_regardless_of_win() {
        let board = Board::from_rows("XXXXXXXXX");
        assert!(is_full(&board));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_draw_detection() {
        // X O X / O X X / O X O
        let board = Board::from_rows("XOXOXXOXO");
        assert!(is_draw(&board));
        assert_eq!(outcome_after(&board, Mark::O), Outcome::Draw);
    }

    #[test]
    fn test_win_on_last_cell_is_not_draw() {
        // X O X / O X O / O X X  -- X completes the main diagonal last
        let board = Board::from_rows("XOXOXOOXX");
        assert!(is_full(&board));
        assert_eq!(outcome_after(&board, Mark::X), Outcome::Won(Mark::X));
    }

    #[test]
    fn test_in_progress() {
        let board = Board::from_rows("XO       ");
        assert_eq!(outcome_after(&board, Mark::O), Outcome::InProgress);
        assert!(!Outcome::InProgress.is_terminal());
    }
}
