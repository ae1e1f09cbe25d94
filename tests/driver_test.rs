//! Tests for the async game driver.

use std::time::Duration;

use tictactoe_engine::{
    DriverNotice, GameDriver, GameEvent, GameMode, GameSession, Mark, MemoryStore, PlayerCommand,
    SessionContext, WinnerLabels,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

const DELAY: Duration = Duration::from_millis(100);

fn driver(mode: GameMode) -> GameDriver {
    let context = SessionContext::new(Box::new(MemoryStore::new()), WinnerLabels::default());
    GameDriver::new(GameSession::new(mode, WinnerLabels::default()), context, DELAY)
}

fn drain<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Ok(item) = rx.try_recv() {
        items.push(item);
    }
    items
}

#[tokio::test(start_paused = true)]
async fn test_computer_replies_after_delay() {
    let mut driver = driver(GameMode::PvAI);
    let mut events = driver.session_mut().subscribe();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (notice_tx, _notice_rx) = mpsc::unbounded_channel();

    let start = Instant::now();
    let task = tokio::spawn(async move {
        driver.run(command_rx, notice_tx).await;
        driver
    });

    command_tx.send(PlayerCommand::Move { row: 1, col: 1 }).expect("Driver running");
    assert_eq!(
        events.recv().await,
        Some(GameEvent::MoveApplied {
            row: 1,
            col: 1,
            player: Mark::X
        })
    );
    assert_eq!(
        events.recv().await,
        Some(GameEvent::MoveApplied {
            row: 0,
            col: 0,
            player: Mark::O
        })
    );
    assert!(start.elapsed() >= DELAY);

    command_tx.send(PlayerCommand::Quit).expect("Driver running");
    let driver = task.await.expect("Driver task");
    assert_eq!(driver.session().moves().encode(), "1-1-X;0-0-O");
    assert!(!driver.has_pending_move());
}

#[tokio::test(start_paused = true)]
async fn test_restart_cancels_pending_reply() {
    let mut driver = driver(GameMode::PvAI);
    let mut events = driver.session_mut().subscribe();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();

    command_tx.send(PlayerCommand::Move { row: 1, col: 1 }).expect("Open channel");
    command_tx.send(PlayerCommand::Restart).expect("Open channel");
    command_tx.send(PlayerCommand::Quit).expect("Open channel");
    driver.run(command_rx, notice_tx).await;

    assert!(driver.session().moves().is_empty());
    assert!(!driver.has_pending_move());
    assert_eq!(drain(&mut events).len(), 1);

    let notices = drain(&mut notice_rx);
    assert!(matches!(notices[0], DriverNotice::ComputerThinking));
    assert!(matches!(notices[1], DriverNotice::Restarted));
    assert_eq!(notices.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_human_move_during_computer_turn_rejected() {
    let mut driver = driver(GameMode::PvAI);
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();

    command_tx.send(PlayerCommand::Move { row: 1, col: 1 }).expect("Open channel");
    command_tx.send(PlayerCommand::Move { row: 2, col: 2 }).expect("Open channel");
    drop(command_tx);
    driver.run(command_rx, notice_tx).await;

    assert_eq!(driver.session().moves().len(), 1);
    let notices = drain(&mut notice_rx);
    assert!(
        notices
            .iter()
            .any(|n| matches!(n, DriverNotice::Rejected(tictactoe_engine::MoveError::AwaitingComputer)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_finished_game_is_recorded_and_board_cleared() {
    let mut driver = driver(GameMode::PvP);
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();

    for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
        command_tx.send(PlayerCommand::Move { row, col }).expect("Open channel");
    }
    command_tx.send(PlayerCommand::Move { row: 2, col: 2 }).expect("Open channel");
    command_tx.send(PlayerCommand::Quit).expect("Open channel");
    driver.run(command_rx, notice_tx).await;

    let history = driver.context().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].winner(), "Player 1");
    assert_eq!(history[0].moves().len(), 5);

    // The move after the win opened a fresh game.
    assert_eq!(driver.session().moves().encode(), "2-2-X");
    assert!(
        drain(&mut notice_rx)
            .iter()
            .any(|n| matches!(n, DriverNotice::GameRecorded { winner } if winner == "Player 1"))
    );
}
