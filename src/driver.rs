//! Async game loop: player commands in, paced computer replies, records out.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Sleep, sleep};
use tracing::{debug, info, instrument, warn};

use crate::context::SessionContext;
use crate::db::DbError;
use crate::games::tictactoe::MoveError;
use crate::session::{GameSession, TurnOutcome};

/// Input from whoever is driving the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Play the active mark at (row, col).
    Move {
        /// Target row.
        row: usize,
        /// Target column.
        col: usize,
    },
    /// Abandon the current game and start a new one.
    Restart,
    /// Stop the driver.
    Quit,
}

/// Driver-level notifications, alongside the session's own events.
#[derive(Debug, Clone)]
pub enum DriverNotice {
    /// A command was refused; the board is unchanged.
    Rejected(MoveError),
    /// The computer's reply is scheduled.
    ComputerThinking,
    /// A finished game was handed to the context and the board cleared.
    GameRecorded {
        /// Winner label or `"Draw"`.
        winner: String,
    },
    /// The store refused the finished game. It is still in memory.
    StoreFailed(DbError),
    /// The board was cleared on request.
    Restarted,
}

/// The computer's reply, waiting out its presentation delay.
///
/// Dropping it cancels the reply.
#[derive(Debug)]
pub struct PendingComputerMove {
    delay: Pin<Box<Sleep>>,
}

impl PendingComputerMove {
    /// Schedules a reply `delay` from now.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: Box::pin(sleep(delay)),
        }
    }
}

impl Future for PendingComputerMove {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.get_mut().delay.as_mut().poll(cx)
    }
}

async fn computer_ready(pending: &mut Option<PendingComputerMove>) {
    if let Some(pending) = pending {
        pending.await;
    }
}

/// Runs one [`GameSession`] against a stream of [`PlayerCommand`]s.
///
/// Finished games go to the [`SessionContext`], then the session is reset so
/// the next game starts on a clear board.
#[derive(Debug)]
pub struct GameDriver {
    session: GameSession,
    context: SessionContext,
    delay: Duration,
    pending: Option<PendingComputerMove>,
}

impl GameDriver {
    /// Creates a driver that waits `delay` before each computer move.
    #[instrument(skip(session, context), fields(mode = %session.mode()))]
    pub fn new(session: GameSession, context: SessionContext, delay: Duration) -> Self {
        Self {
            session,
            context,
            delay,
            pending: None,
        }
    }

    /// The session being driven.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Mutable access, e.g. to subscribe to events before running.
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    /// The context receiving finished games.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Consumes the driver and returns its context.
    pub fn into_context(self) -> SessionContext {
        self.context
    }

    /// True while a computer reply is scheduled.
    pub fn has_pending_move(&self) -> bool {
        self.pending.is_some()
    }

    /// Processes commands until `Quit` or until the sender is dropped.
    ///
    /// Any scheduled computer move is cancelled on exit.
    #[instrument(skip_all, fields(mode = %self.session.mode()))]
    pub async fn run(
        &mut self,
        mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
        notices: mpsc::UnboundedSender<DriverNotice>,
    ) {
        info!("Game driver started");
        loop {
            if self.pending.is_none() && self.session.needs_computer_move() {
                debug!(delay_ms = self.delay.as_millis() as u64, "Scheduling computer move");
                self.pending = Some(PendingComputerMove::new(self.delay));
                notify(&notices, DriverNotice::ComputerThinking);
            }

            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    None | Some(PlayerCommand::Quit) => {
                        self.cancel_pending();
                        break;
                    }
                    Some(PlayerCommand::Restart) => {
                        self.cancel_pending();
                        self.session.reset();
                        notify(&notices, DriverNotice::Restarted);
                    }
                    Some(PlayerCommand::Move { row, col }) => match self.session.play(row, col) {
                        Ok(outcome) => self.handle_outcome(outcome, &notices),
                        Err(e) => notify(&notices, DriverNotice::Rejected(e)),
                    },
                },

                () = computer_ready(&mut self.pending), if self.pending.is_some() => {
                    self.pending = None;
                    match self.session.computer_move() {
                        Ok(outcome) => self.handle_outcome(outcome, &notices),
                        Err(e) => warn!(error = %e, "Scheduled computer move failed"),
                    }
                }
            }
        }
        info!("Game driver stopped");
    }

    fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            debug!("Pending computer move cancelled");
        }
    }

    fn handle_outcome(&mut self, outcome: TurnOutcome, notices: &mpsc::UnboundedSender<DriverNotice>) {
        let TurnOutcome::Finished(record) = outcome else {
            return;
        };
        let winner = record.winner().clone();
        if let Err(e) = self.context.record_game(record) {
            warn!(error = %e, "Failed to store finished game");
            notify(notices, DriverNotice::StoreFailed(e));
        }
        self.session.reset();
        notify(notices, DriverNotice::GameRecorded { winner });
    }
}

fn notify(notices: &mpsc::UnboundedSender<DriverNotice>, notice: DriverNotice) {
    if notices.send(notice).is_err() {
        debug!("Notice receiver dropped");
    }
}
