//! skhelper-hook: CLI adapter between the game launcher and skhelper-core.
//!
//! The launcher calls this binary from its game start/stop scripts with the
//! game snapshot as JSON.
//!
//! ## Subcommands
//!
//! - `starting`: game is about to launch (start services, sync profiles)
//! - `stopped`: game exited (stop services)
//! - `resolve`: look up the Steam app id for a title and print the match

mod chooser;
mod error;
mod handle;
mod logging;
mod resolve;

use clap::{Parser, Subcommand, ValueEnum};
use skhelper_core::{HostMode, LifecycleEvent};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skhelper-hook")]
#[command(about = "Special K helper for game launcher lifecycle events")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Desktop,
    Fullscreen,
}

impl From<Mode> for HostMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Desktop => HostMode::Desktop,
            Mode::Fullscreen => HostMode::Fullscreen,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Game is starting (reads the game JSON from --game or stdin)
    Starting {
        /// Path to the game snapshot JSON
        #[arg(long, value_name = "PATH")]
        game: Option<PathBuf>,

        /// Launcher presentation mode; fullscreen runs unattended
        #[arg(long, value_enum, default_value = "desktop")]
        mode: Mode,

        /// Ask on the terminal when no automatic title match is found.
        /// Needs --game, since stdin is used for the answer.
        #[arg(long, requires = "game")]
        interactive: bool,
    },

    /// Game has stopped (reads the game JSON from --game or stdin)
    Stopped {
        /// Path to the game snapshot JSON
        #[arg(long, value_name = "PATH")]
        game: Option<PathBuf>,
    },

    /// Resolve a title to a Steam app id without touching any files
    Resolve {
        /// Game title as shown in the launcher
        #[arg(value_name = "TITLE")]
        title: String,

        /// Unattended matching: allow best-effort results, never prompt
        #[arg(long)]
        background: bool,
    },
}

fn main() {
    let _logging_guard = logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Starting {
            game,
            mode,
            interactive,
        } => handle::run(
            LifecycleEvent::GameStarting,
            game.as_deref(),
            mode.into(),
            interactive,
        ),
        Commands::Stopped { game } => handle::run(
            LifecycleEvent::GameStopped,
            game.as_deref(),
            HostMode::Desktop,
            false,
        ),
        Commands::Resolve { title, background } => resolve::run(&title, background),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "skhelper-hook failed");
        eprintln!("skhelper-hook: {}", e);
        let code = e.exit_code();
        if code != 0 {
            std::process::exit(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_requires_game_file() {
        let result = Cli::try_parse_from(["skhelper-hook", "starting", "--interactive"]);
        assert_eq!(
            result.err().map(|e| e.kind()),
            Some(clap::error::ErrorKind::MissingRequiredArgument)
        );

        let cli = Cli::try_parse_from([
            "skhelper-hook",
            "starting",
            "--game",
            "game.json",
            "--interactive",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Starting {
                interactive: true,
                game: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_starting_reads_stdin_without_flags() {
        let cli = Cli::try_parse_from(["skhelper-hook", "starting"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Starting {
                interactive: false,
                game: None,
                ..
            }
        ));
    }
}
