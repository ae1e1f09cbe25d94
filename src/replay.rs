//! Step-through playback of a recorded game.
//!
//! The engine owns a private presentation grid and only ever reads the move
//! log it was built from; replaying never touches a live session.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, instrument, warn};

use crate::games::tictactoe::{Board, Cell, GameRecord, Move, MoveLog};

/// Default delay between replayed moves.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Playback phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplayState {
    /// Built, not started.
    Idle,
    /// Emitting one move per tick.
    Playing,
    /// Every move emitted, or stopped early.
    Finished,
}

/// One replayed move and the grid after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayFrame {
    /// Zero-based position of the move in the log.
    pub index: usize,
    /// The move just shown.
    pub mv: Move,
    /// Presentation grid after the move.
    pub grid: Board,
}

/// Deterministic replay of a [`MoveLog`].
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    moves: MoveLog,
    move_index: usize,
    state: ReplayState,
    grid: Board,
}

impl ReplayEngine {
    /// Creates an idle engine over `moves`.
    #[instrument(skip(moves), fields(moves = moves.len()))]
    pub fn new(moves: MoveLog) -> Self {
        Self {
            moves,
            move_index: 0,
            state: ReplayState::Idle,
            grid: Board::new(),
        }
    }

    /// Creates an idle engine over a record's moves.
    pub fn from_record(record: &GameRecord) -> Self {
        Self::new(record.moves().clone())
    }

    /// Rewinds to the first move and starts playing.
    ///
    /// An empty log finishes immediately.
    #[instrument(skip(self), fields(moves = self.moves.len()))]
    pub fn start(&mut self) {
        self.move_index = 0;
        self.grid = Board::new();
        self.state = if self.moves.is_empty() {
            ReplayState::Finished
        } else {
            ReplayState::Playing
        };
        debug!(state = ?self.state, "Replay started");
    }

    /// Emits the next move and applies it to the presentation grid.
    ///
    /// Returns `None`, changing nothing, unless the engine is playing.
    #[instrument(skip(self), fields(index = self.move_index, state = ?self.state))]
    pub fn tick(&mut self) -> Option<Move> {
        if self.state != ReplayState::Playing {
            return None;
        }

        let mv = *self.moves.get(self.move_index)?;
        if let Err(e) = self.grid.set(mv.row, mv.col, Cell::Occupied(mv.player)) {
            warn!(error = %e, "Replayed move is off the grid");
        }
        self.move_index += 1;

        if self.move_index == self.moves.len() {
            self.state = ReplayState::Finished;
            info!(moves = self.moves.len(), "Replay finished");
        }

        Some(mv)
    }

    /// Stops playback. Safe in any state.
    #[instrument(skip(self), fields(index = self.move_index))]
    pub fn stop(&mut self) {
        if self.state != ReplayState::Finished {
            debug!("Replay stopped early");
        }
        self.state = ReplayState::Finished;
    }

    /// Current phase.
    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// Index of the next move to emit.
    pub fn move_index(&self) -> usize {
        self.move_index
    }

    /// The presentation grid.
    pub fn grid(&self) -> Board {
        self.grid
    }

    /// The log being replayed.
    pub fn moves(&self) -> &MoveLog {
        &self.moves
    }

    /// Starts the engine and ticks it every `period` on a background task.
    ///
    /// The first move lands one period after the call. Each frame goes to
    /// `frames`; playback stops if the receiver is dropped.
    #[instrument(skip(self, frames), fields(moves = self.moves.len()))]
    pub fn spawn(mut self, period: Duration, frames: mpsc::UnboundedSender<ReplayFrame>) -> ReplayHandle {
        self.start();
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            while self.state == ReplayState::Playing {
                ticker.tick().await;
                let index = self.move_index;
                let Some(mv) = self.tick() else { break };
                let frame = ReplayFrame {
                    index,
                    mv,
                    grid: self.grid,
                };
                if frames.send(frame).is_err() {
                    debug!("Replay receiver dropped");
                    self.stop();
                }
            }
            self
        });
        ReplayHandle { task: Some(task) }
    }
}

/// Owner of a spawned replay. Dropping it cancels any pending tick.
#[derive(Debug)]
pub struct ReplayHandle {
    task: Option<JoinHandle<ReplayEngine>>,
}

impl ReplayHandle {
    /// Cancels playback; no further frame is sent.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Replay task aborted");
        }
    }

    /// Waits for playback to end and returns the finished engine.
    ///
    /// Returns `None` if the replay was stopped before completing.
    #[instrument(skip(self))]
    pub async fn finished(mut self) -> Option<ReplayEngine> {
        let task = self.task.take()?;
        match task.await {
            Ok(engine) => Some(engine),
            Err(e) => {
                debug!(error = %e, "Replay task ended without finishing");
                None
            }
        }
    }
}

impl Drop for ReplayHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::Mark;

    fn three_moves() -> MoveLog {
        MoveLog::try_from(vec![
            Move::new(0, 0, Mark::X),
            Move::new(0, 1, Mark::O),
            Move::new(1, 1, Mark::X),
        ])
        .expect("Distinct cells")
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut engine = ReplayEngine::new(three_moves());
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.state(), ReplayState::Idle);
        assert_eq!(engine.move_index(), 0);
    }

    #[test]
    fn test_three_ticks_finish() {
        let mut engine = ReplayEngine::new(three_moves());
        engine.start();
        assert_eq!(engine.tick(), Some(Move::new(0, 0, Mark::X)));
        assert_eq!(engine.tick(), Some(Move::new(0, 1, Mark::O)));
        assert_eq!(engine.state(), ReplayState::Playing);
        assert_eq!(engine.tick(), Some(Move::new(1, 1, Mark::X)));
        assert_eq!(engine.state(), ReplayState::Finished);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.move_index(), 3);
        assert_eq!(engine.grid(), Board::from_rows("XO  X    "));
    }

    #[test]
    fn test_empty_log_finishes_on_start() {
        let mut engine = ReplayEngine::new(MoveLog::new());
        engine.start();
        assert_eq!(engine.state(), ReplayState::Finished);
        assert_eq!(engine.tick(), None);
    }

    #[test]
    fn test_stop_midway() {
        let mut engine = ReplayEngine::new(three_moves());
        engine.start();
        engine.tick();
        engine.stop();
        assert_eq!(engine.state(), ReplayState::Finished);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.move_index(), 1);
    }

    #[test]
    fn test_restart_rewinds() {
        let mut engine = ReplayEngine::new(three_moves());
        engine.start();
        while engine.tick().is_some() {}
        engine.start();
        assert_eq!(engine.state(), ReplayState::Playing);
        assert_eq!(engine.grid(), Board::new());
        assert_eq!(engine.tick(), Some(Move::new(0, 0, Mark::X)));
    }
}
