//! Game session: one board, its move log, and the events it emits.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::games::tictactoe::rules::{Outcome, outcome_after};
use crate::games::tictactoe::search::{self, COMPUTER};
use crate::games::tictactoe::{
    Board, BoardState, DRAW_LABEL, GameMode, GameRecord, Mark, Move, MoveError, MoveLog,
};

/// Notifications a session pushes to its subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A mark was placed.
    MoveApplied {
        /// Row of the placed mark.
        row: usize,
        /// Column of the placed mark.
        col: usize,
        /// The mark placed.
        player: Mark,
    },
    /// The game reached a terminal state.
    GameOver {
        /// Winner label, or `"Draw"`.
        outcome: String,
    },
}

/// Names reported as the winner of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinnerLabels {
    /// X in a two-person game.
    pub player_one: String,
    /// O in a two-person game.
    pub player_two: String,
    /// The person (X) in a game against the computer.
    pub human: String,
    /// The computer (O).
    pub computer: String,
}

impl Default for WinnerLabels {
    fn default() -> Self {
        Self {
            player_one: "Player 1".to_string(),
            player_two: "Player 2".to_string(),
            human: "You".to_string(),
            computer: "AI".to_string(),
        }
    }
}

impl WinnerLabels {
    /// Label for `mark` winning a game of `mode`.
    pub fn for_winner(&self, mode: GameMode, mark: Mark) -> &str {
        match (mode, mark) {
            (GameMode::PvP, Mark::X) => &self.player_one,
            (GameMode::PvP, Mark::O) => &self.player_two,
            (GameMode::PvAI, Mark::X) => &self.human,
            (GameMode::PvAI, Mark::O) => &self.computer,
        }
    }
}

/// Result of a move that was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Play continues with `next` to move.
    Continue {
        /// Mark now to move.
        next: Mark,
    },
    /// The move ended the game; the sealed record is handed over.
    Finished(GameRecord),
}

/// A single game between two sides.
///
/// The session owns the live [`BoardState`] and the [`MoveLog`] built beside
/// it. Nothing else mutates them. A finished game stays on the board, inactive,
/// until [`GameSession::reset`].
#[derive(Debug)]
pub struct GameSession {
    mode: GameMode,
    labels: WinnerLabels,
    state: BoardState,
    log: MoveLog,
    events: Option<mpsc::UnboundedSender<GameEvent>>,
}

impl GameSession {
    /// Creates a new session.
    #[instrument(skip(labels))]
    pub fn new(mode: GameMode, labels: WinnerLabels) -> Self {
        info!(%mode, "Creating new game session");
        Self {
            mode,
            labels,
            state: BoardState::new(),
            log: MoveLog::new(),
            events: None,
        }
    }

    /// Routes future events to a new channel and returns its receiver.
    ///
    /// Replaces any earlier subscriber.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<GameEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Winner labels in use.
    pub fn labels(&self) -> &WinnerLabels {
        &self.labels
    }

    /// Snapshot of the grid.
    pub fn board(&self) -> Board {
        self.state.board()
    }

    /// Mark to move.
    pub fn active_player(&self) -> Mark {
        self.state.active_player()
    }

    /// Whether moves are still accepted.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// True when no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.state.is_full()
    }

    /// True when `mark` holds a line.
    pub fn check_winner(&self, mark: Mark) -> bool {
        self.state.check_winner(mark)
    }

    /// Moves played so far in the current game.
    pub fn moves(&self) -> &MoveLog {
        &self.log
    }

    /// True when the computer is the side to move in a live game.
    pub fn needs_computer_move(&self) -> bool {
        self.mode == GameMode::PvAI && self.state.is_active() && self.state.active_player() == COMPUTER
    }

    /// Places `player` at (row, col), logs the move, and emits `MoveApplied`.
    ///
    /// Turn order and terminal checks are left to the caller; [`GameSession::play`]
    /// does both.
    ///
    /// # Errors
    ///
    /// Returns the board's rejection unchanged; nothing is logged or emitted.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn apply_move(&mut self, row: usize, col: usize, player: Mark) -> Result<(), MoveError> {
        self.state.apply_move(row, col, player).inspect_err(|e| {
            warn!(row, col, player = ?player, error = %e, "Move rejected");
        })?;
        self.log.push(Move::new(row, col, player))?;
        self.emit(GameEvent::MoveApplied { row, col, player });
        Ok(())
    }

    /// Plays the active mark at (row, col) on behalf of a person.
    ///
    /// # Errors
    ///
    /// Rejects out-of-range and occupied cells, finished games, and moves
    /// submitted while the computer is to move.
    #[instrument(skip(self), fields(mode = %self.mode, player = ?self.active_player()))]
    pub fn play(&mut self, row: usize, col: usize) -> Result<TurnOutcome, MoveError> {
        if self.needs_computer_move() {
            warn!(row, col, "Human move while the computer is to move");
            return Err(MoveError::AwaitingComputer);
        }
        self.place(row, col)
    }

    /// Chooses and plays the computer's move.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::GameInactive`] on a finished game,
    /// [`MoveError::NotComputerTurn`] outside a computer turn, and
    /// [`MoveError::NoLegalMove`] if the search finds no empty cell.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn computer_move(&mut self) -> Result<TurnOutcome, MoveError> {
        if !self.state.is_active() {
            return Err(MoveError::GameInactive);
        }
        if !self.needs_computer_move() {
            return Err(MoveError::NotComputerTurn);
        }
        let (row, col) = search::best_move(&self.state.board()).ok_or(MoveError::NoLegalMove)?;
        debug!(row, col, "Computer chose move");
        self.place(row, col)
    }

    /// Clears the board and the move log for a new game.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn reset(&mut self) {
        self.state.reset();
        self.log.clear();
        debug!("Session reset");
    }

    fn place(&mut self, row: usize, col: usize) -> Result<TurnOutcome, MoveError> {
        let mover = self.state.active_player();
        self.apply_move(row, col, mover)?;

        match outcome_after(&self.state.board(), mover) {
            Outcome::Won(mark) => {
                let label = self.labels.for_winner(self.mode, mark).to_string();
                Ok(TurnOutcome::Finished(self.conclude(label)))
            }
            Outcome::Draw => Ok(TurnOutcome::Finished(self.conclude(DRAW_LABEL.to_string()))),
            Outcome::InProgress => {
                self.state.advance_turn();
                Ok(TurnOutcome::Continue {
                    next: self.state.active_player(),
                })
            }
        }
    }

    fn conclude(&mut self, outcome: String) -> GameRecord {
        self.state.finish();
        info!(outcome = %outcome, moves = self.log.len(), "Game over");
        self.emit(GameEvent::GameOver {
            outcome: outcome.clone(),
        });
        GameRecord::seal(self.mode, outcome, self.log.clone())
    }

    fn emit(&self, event: GameEvent) {
        if let Some(tx) = &self.events
            && tx.send(event).is_err()
        {
            debug!("Event subscriber dropped");
        }
    }
}
