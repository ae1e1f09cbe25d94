//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating a board snapshot.
//! Rules are separated from board storage so the live session, the
//! search, and the tests all classify positions the same way.

pub mod draw;
pub mod win;

pub use draw::{Outcome, is_draw, is_full, outcome_after};
pub use win::{LINES, has_line, winner};
