//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::action::MoveError;
use super::rules;

/// Number of rows and columns on the board.
pub const SIZE: usize = 3;

/// Player mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O (the computer's side in player-vs-computer games).
    O,
}

impl Mark {
    /// Returns the opponent mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Single-character form used by the move-log codec.
    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    /// Parses the single-character form.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' => Some(Mark::X),
            'O' => Some(Mark::O),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell occupied by a mark.
    Occupied(Mark),
}

/// Converts a (row, col) pair into a row-major index, `None` when off the grid.
pub(crate) fn index(row: usize, col: usize) -> Option<usize> {
    (row < SIZE && col < SIZE).then_some(row * SIZE + col)
}

/// 3x3 grid snapshot.
///
/// `Board` is a plain value: copying it is how the search and the replay
/// presentation grid get their own scratch space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; SIZE * SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; SIZE * SIZE],
        }
    }

    /// Builds a board from rows written as `X`, `O`, and anything else for empty.
    ///
    /// Characters past the ninth are ignored; missing ones are empty.
    pub fn from_rows(text: &str) -> Self {
        let mut board = Self::new();
        for (slot, c) in board.cells.iter_mut().zip(text.chars()) {
            *slot = match Mark::from_char(c) {
                Some(mark) => Cell::Occupied(mark),
                None => Cell::Empty,
            };
        }
        board
    }

    /// Gets the cell at (row, col), `None` when off the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        index(row, col).map(|i| self.cells[i])
    }

    /// Sets the cell at (row, col) without any legality check.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), MoveError> {
        let i = index(row, col).ok_or(MoveError::OutOfBounds { row, col })?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Checks if a cell is on the grid and empty.
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(Cell::Empty))
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell; SIZE * SIZE] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell; SIZE * SIZE] {
        &mut self.cells
    }

    /// Empty cells as (row, col) pairs, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .map(|(i, _)| (i / SIZE, i % SIZE))
            .collect()
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                let symbol = match self.cells[row * SIZE + col] {
                    Cell::Empty => ' ',
                    Cell::Occupied(mark) => mark.as_char(),
                };
                result.push(symbol);
                if col < SIZE - 1 {
                    result.push('|');
                }
            }
            if row < SIZE - 1 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Live board for one game session.
///
/// A cell goes from empty to marked exactly once; only [`BoardState::reset`]
/// clears it again. Turn order is explicit: applying a move never flips the
/// active player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    board: Board,
    active_player: Mark,
    is_active: bool,
}

impl BoardState {
    /// Mark that opens every game.
    pub const STARTING_MARK: Mark = Mark::X;

    /// Creates an empty, active board with X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            active_player: Self::STARTING_MARK,
            is_active: true,
        }
    }

    /// Places `player` at (row, col).
    ///
    /// # Errors
    ///
    /// Rejects coordinates off the grid, occupied cells, and moves on a
    /// finished board. A rejected move leaves the state untouched.
    #[instrument(skip(self), fields(active = self.is_active))]
    pub fn apply_move(&mut self, row: usize, col: usize, player: Mark) -> Result<(), MoveError> {
        if !self.is_active {
            return Err(MoveError::GameInactive);
        }
        match self.board.get(row, col) {
            None => Err(MoveError::OutOfBounds { row, col }),
            Some(Cell::Occupied(_)) => Err(MoveError::CellOccupied { row, col }),
            Some(Cell::Empty) => {
                self.board.set(row, col, Cell::Occupied(player))?;
                debug!(row, col, player = ?player, "Mark placed");
                Ok(())
            }
        }
    }

    /// Hands the turn to the other mark.
    #[instrument(skip(self))]
    pub fn advance_turn(&mut self) {
        self.active_player = self.active_player.opponent();
        debug!(active_player = ?self.active_player, "Turn advanced");
    }

    /// Clears every cell and reactivates the board with X to move.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.active_player = Self::STARTING_MARK;
        self.is_active = true;
    }

    /// Stops accepting moves once a terminal state is reached.
    #[instrument(skip(self))]
    pub fn finish(&mut self) {
        self.is_active = false;
    }

    /// True when no empty cell remains.
    pub fn is_full(&self) -> bool {
        rules::is_full(&self.board)
    }

    /// True when `mark` holds a full row, column, or diagonal.
    pub fn check_winner(&self, mark: Mark) -> bool {
        rules::has_line(&self.board, mark)
    }

    /// Returns a snapshot of the grid.
    pub fn board(&self) -> Board {
        self.board
    }

    /// Returns the mark to move.
    pub fn active_player(&self) -> Mark {
        self.active_player
    }

    /// Returns whether moves are still accepted.
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}
