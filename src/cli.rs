//! Command-line interface for tictactoe.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tictactoe_engine::{GameMode, PlayerCommand};

/// Tic-tac-toe with a perfect-play opponent
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Tic-tac-toe with persisted history and animated replay", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the database path from the config
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Opponent selection on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Two people at one keyboard
    Pvp,
    /// One person against the computer
    Pvai,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pvp => GameMode::PvP,
            ModeArg::Pvai => GameMode::PvAI,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play games on stdin; enter moves as `row col`
    Play {
        /// Who plays O
        #[arg(short, long, value_enum, default_value = "pvai")]
        mode: ModeArg,

        /// Sign in to save finished games
        #[arg(short, long)]
        user: Option<String>,
    },

    /// List stored games and aggregate results
    History {
        /// User whose games to list
        #[arg(short, long)]
        user: String,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Animate a stored game
    Replay {
        /// User whose game to replay
        #[arg(short, long)]
        user: String,

        /// Game number as listed by `history`, starting at 1
        #[arg(short, long)]
        game: usize,
    },

    /// Print the computer's choice for a position
    BestMove {
        /// Nine cells, row by row; `X`, `O`, anything else is empty
        #[arg(short, long)]
        board: String,
    },
}

/// Parses one line of `play` input.
///
/// Accepts `row col` (either separated by spaces or a comma), `r`/`restart`,
/// and `q`/`quit`. Returns `None` for anything else.
pub fn parse_command(line: &str) -> Option<PlayerCommand> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "q" | "quit" => return Some(PlayerCommand::Quit),
        "r" | "restart" => return Some(PlayerCommand::Restart),
        _ => {}
    }
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(PlayerCommand::Move { row, col })
}
