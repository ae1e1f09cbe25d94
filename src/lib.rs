//! Tic-tac-toe engine library
//!
//! A 3x3 game with a perfect-play computer opponent, persisted per-user
//! history, and deterministic replay of finished games.
//!
//! # Architecture
//!
//! - **Games**: board state, rules, minimax search, move log codec
//! - **Session**: one live game, emitting events over an mpsc channel
//! - **Context**: signed-in user, history, stats, replay selection
//! - **Driver**: async loop pacing computer replies
//! - **Replay**: timed step-through of a recorded move log
//! - **Db**: SQLite history via diesel, or an in-memory store
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_engine::{GameMode, GameSession, TurnOutcome, WinnerLabels};
//!
//! let mut session = GameSession::new(GameMode::PvAI, WinnerLabels::default());
//! session.play(1, 1)?;
//! if let TurnOutcome::Finished(record) = session.computer_move()? {
//!     println!("{}", record.winner());
//! }
//! # Ok::<(), tictactoe_engine::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod context;
mod db;
mod driver;
mod replay;
mod session;

pub mod games;

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig};

// Crate-level exports - Session context
pub use context::{EMPTY_HISTORY, HistoryStats, ReplayError, SessionContext};

// Crate-level exports - Persistence
pub use db::{
    DbError, GameHistoryRow, GameRepository, HistoryOp, HistoryStore, MemoryStore, NewGameHistoryRow,
};

// Crate-level exports - Async driver
pub use driver::{DriverNotice, GameDriver, PendingComputerMove, PlayerCommand};

// Crate-level exports - Replay
pub use replay::{DEFAULT_INTERVAL, ReplayEngine, ReplayFrame, ReplayHandle, ReplayState};

// Crate-level exports - Session
pub use session::{GameEvent, GameSession, TurnOutcome, WinnerLabels};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::search::{ScoredMove, best_move, best_scored_move};
pub use games::tictactoe::{
    Board, BoardState, Cell, DRAW_LABEL, GameMode, GameRecord, Mark, Move, MoveError, MoveLog,
    Outcome,
};
