//! tictactoe - command-line front end for the engine.

#![warn(missing_docs)]

mod cli;

use std::io::BufRead;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command, parse_command};
use tictactoe_engine::{
    Board, Cell, DriverNotice, EngineConfig, GameDriver, GameEvent, GameMode, GameRepository,
    GameSession, ReplayFrame, SessionContext, best_scored_move,
};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Play { mode, user } => run_play(config, mode.into(), user).await,
        Command::History { user, json } => run_history(config, &user, json),
        Command::Replay { user, game } => run_replay(config, &user, game).await,
        Command::BestMove { board } => run_best_move(&board),
    }
}

/// Reads the config file if given, then applies command-line overrides.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    Ok(match &cli.db_path {
        Some(db_path) => config.with_db_path(db_path.clone()),
        None => config,
    })
}

/// Opens the history database and wraps it in a fresh context.
#[instrument(skip(config), fields(db_path = %config.db_path()))]
fn open_context(config: &EngineConfig) -> Result<SessionContext> {
    let repo = GameRepository::new(config.db_path().clone())
        .with_context(|| format!("Failed to open database '{}'", config.db_path()))?;
    Ok(SessionContext::new(Box::new(repo), config.labels().clone()))
}

/// Plays games on stdin until `quit` or end of input.
async fn run_play(config: EngineConfig, mode: GameMode, user: Option<String>) -> Result<()> {
    let mut context = open_context(&config)?;
    if let Some(user) = &user {
        context.sign_in(user).context("Failed to sign in")?;
    }

    let session = GameSession::new(mode, config.labels().clone());
    let mut driver = GameDriver::new(session, context, config.computer_delay());
    let events = driver.session_mut().subscribe();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();

    println!("Mode: {}. Enter moves as `row col` (0-2), `r` to restart, `q` to quit.", mode);
    println!("{}\n", Board::new().display());

    let printer = tokio::spawn(print_updates(events, notice_rx));
    // Blocking stdin reads cannot be cancelled; this thread is never joined.
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(command) => {
                    if command_tx.send(command).is_err() {
                        break;
                    }
                }
                None => println!("Enter `row col`, `r`, or `q`."),
            }
        }
        debug!("Input closed");
    });

    driver.run(command_rx, notice_tx).await;
    let context = driver.into_context();
    printer.await.context("Output task failed")?;

    let stats = context.stats();
    println!(
        "Games: {}  Player wins: {}  Computer wins: {}  Draws: {}",
        stats.total_games(),
        stats.player_wins(),
        stats.computer_wins(),
        stats.draws()
    );
    info!("Play finished");
    Ok(())
}

/// Echoes session events and driver notices until both channels close.
async fn print_updates(
    mut events: mpsc::UnboundedReceiver<GameEvent>,
    mut notices: mpsc::UnboundedReceiver<DriverNotice>,
) {
    let mut board = Board::new();
    let mut events_open = true;
    let mut notices_open = true;

    while events_open || notices_open {
        tokio::select! {
            event = events.recv(), if events_open => match event {
                Some(GameEvent::MoveApplied { row, col, player }) => {
                    if let Err(e) = board.set(row, col, Cell::Occupied(player)) {
                        debug!(error = %e, row, col, "Echo board out of step with session");
                    }
                    println!("{} plays {} {}\n{}\n", player, row, col, board.display());
                }
                Some(GameEvent::GameOver { outcome }) if outcome == tictactoe_engine::DRAW_LABEL => {
                    println!("It's a draw!");
                }
                Some(GameEvent::GameOver { outcome }) => println!("{} wins!", outcome),
                None => events_open = false,
            },
            notice = notices.recv(), if notices_open => match notice {
                Some(DriverNotice::Rejected(e)) => println!("Move rejected: {}", e),
                Some(DriverNotice::ComputerThinking) => println!("Computer is thinking..."),
                Some(DriverNotice::GameRecorded { .. }) | Some(DriverNotice::Restarted) => {
                    board = Board::new();
                    println!("New game.\n{}\n", board.display());
                }
                Some(DriverNotice::StoreFailed(e)) => println!("Could not save game: {}", e),
                None => notices_open = false,
            },
        }
    }
}

/// Lists a user's games and their aggregate results.
fn run_history(config: EngineConfig, user: &str, json: bool) -> Result<()> {
    let mut context = open_context(&config)?;
    context.sign_in(user).context("Failed to load history")?;

    if json {
        println!("{}", serde_json::to_string_pretty(context.history())?);
        return Ok(());
    }

    for line in context.history_lines() {
        println!("{}", line);
    }
    let stats = context.stats();
    println!(
        "\nTotal: {}  Player wins: {}  Computer wins: {}  Draws: {}  Win rate: {:.1}%",
        stats.total_games(),
        stats.player_wins(),
        stats.computer_wins(),
        stats.draws(),
        stats.win_rate()
    );
    Ok(())
}

/// Animates one stored game at the configured cadence.
async fn run_replay(config: EngineConfig, user: &str, game: usize) -> Result<()> {
    let mut context = open_context(&config)?;
    context.sign_in(user).context("Failed to load history")?;
    let engine = context.replay_engine(game)?;

    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel::<ReplayFrame>();
    let handle = engine.spawn(config.replay_interval(), frame_tx);

    while let Some(frame) = frame_rx.recv().await {
        println!(
            "Move {}: {}\n{}\n",
            frame.index + 1,
            frame.mv,
            frame.grid.display()
        );
    }
    if handle.finished().await.is_none() {
        bail!("Replay stopped before the last move");
    }
    Ok(())
}

/// Prints the computer's choice for a nine-character board.
fn run_best_move(board: &str) -> Result<()> {
    if board.chars().count() != 9 {
        bail!("Board must be exactly 9 characters, got {}", board.chars().count());
    }
    let board = Board::from_rows(board);
    println!("{}\n", board.display());
    match best_scored_move(&board) {
        Some(best) => println!("Best move: {} {} (score {})", best.row, best.col, best.score),
        None => println!("No empty cell."),
    }
    Ok(())
}
