//! Tic-tac-toe engine: board state, rules, search, move log, and records.

mod action;
mod move_log;
mod record;
mod types;

pub mod rules;
pub mod search;

pub use action::{Move, MoveError};
pub use move_log::{FIELD_SEPARATOR, MOVE_SEPARATOR, MoveLog};
pub use record::{DRAW_LABEL, GameMode, GameRecord, TIMESTAMP_FORMAT};
pub use rules::Outcome;
pub use types::{Board, BoardState, Cell, Mark, SIZE};
