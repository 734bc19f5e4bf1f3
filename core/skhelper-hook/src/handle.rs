//! Lifecycle event handler.
//!
//! Reads the game snapshot, runs the event through the orchestrator with the
//! real OS collaborators and prints the step report as JSON on stdout.
//! Failed steps are reported, not turned into a failing exit code: the
//! launcher must go on starting the game regardless.

use fs_err as fs;
use skhelper_core::{
    Chooser, Collaborators, FileNotificationCenter, GameRecord, HostMode, Layout, LifecycleEvent,
    LifecycleReport, NamedEventProbe, Orchestrator, Settings, SteamStoreSearch, SystemLauncher,
};
use std::io::{self, Read, Write};
use std::path::Path;

use crate::chooser::TerminalChooser;
use crate::error::HookError;

pub fn run(
    event: LifecycleEvent,
    game_path: Option<&Path>,
    mode: HostMode,
    interactive: bool,
) -> Result<(), HookError> {
    let layout = Layout::from_env().ok_or(HookError::NoLayout)?;
    let game = parse_game(&read_game(game_path)?)?;

    let terminal = if interactive && !mode.is_background() {
        Some(TerminalChooser::stdio())
    } else {
        None
    };
    let chooser = terminal.as_ref().map(|c| c as &dyn Chooser);

    let report = execute(layout, event, &game, mode, chooser);

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report).map_err(HookError::Output)?;
    let _ = writeln!(stdout);
    Ok(())
}

fn read_game(path: Option<&Path>) -> Result<String, HookError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(HookError::ReadGame),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(HookError::ReadGame)?;
            Ok(input)
        }
    }
}

fn parse_game(input: &str) -> Result<GameRecord, HookError> {
    serde_json::from_str(input).map_err(HookError::ParseGame)
}

fn execute(
    layout: Layout,
    event: LifecycleEvent,
    game: &GameRecord,
    mode: HostMode,
    chooser: Option<&dyn Chooser>,
) -> LifecycleReport {
    let settings = Settings::load(&layout.settings_file());
    let notifications = FileNotificationCenter::new(layout.notifications_file());
    let catalog = SteamStoreSearch::default();

    let orchestrator = Orchestrator::new(
        layout,
        mode,
        Collaborators {
            launcher: &SystemLauncher,
            probe: &NamedEventProbe,
            notifications: &notifications,
            catalog: &catalog,
            chooser,
        },
    );

    let report = orchestrator.handle(event, game, &settings);
    let failed = report.failures().count();
    if failed > 0 {
        tracing::warn!(?event, game = %game.name, failed, "Lifecycle event finished with failures");
    } else {
        tracing::info!(?event, game = %game.name, "Lifecycle event finished");
    }
    report
}
