use super::{LifecycleEvent, Step};
use crate::service::Architecture;
use crate::settings::{ExecutionMode, Settings};
use crate::types::GameRecord;

/// Feature tag the launcher sets on games protected by Valve Anti-Cheat.
pub const VAC_FEATURE: &str = "Valve Anti-Cheat Enabled";
/// Opt-out tag honored in global mode.
pub const GLOBAL_MODE_DISABLE_FEATURE: &str = "[SK] Global Mode Disable";
/// Opt-in tag required in selective mode.
pub const SELECTIVE_MODE_ENABLE_FEATURE: &str = "[SW] Selective Mode Enable";

/// Whether the helper services should run for this game.
///
/// Tag rules only apply to games that carry tags at all; an untagged game is
/// judged by the platform filter alone, in either mode.
pub fn should_start_services(game: &GameRecord, settings: &Settings) -> bool {
    if !game.features.is_empty() && !passes_feature_rules(game, settings) {
        return false;
    }

    if settings.only_execute_pc_games && !game.is_pc_game() {
        return false;
    }

    true
}

fn passes_feature_rules(game: &GameRecord, settings: &Settings) -> bool {
    if settings.stop_execution_if_vac && game.has_feature(VAC_FEATURE) {
        tracing::info!(game = %game.name, "Anti-cheat protected game, services not started");
        return false;
    }

    match settings.execution_mode {
        ExecutionMode::Global if game.has_feature(GLOBAL_MODE_DISABLE_FEATURE) => {
            tracing::info!(game = %game.name, "Game opted out of global mode");
            return false;
        }
        ExecutionMode::Selective if !game.has_feature(SELECTIVE_MODE_ENABLE_FEATURE) => {
            tracing::info!(game = %game.name, "Game not opted in for selective mode");
            return false;
        }
        _ => {}
    }

    true
}

/// Steps to run for an event, in order.
pub fn plan(event: LifecycleEvent, game: &GameRecord, settings: &Settings) -> Vec<Step> {
    let stop_all = Architecture::ALL.map(Step::StopService).to_vec();

    match event {
        // Stopping also clears services left over from an earlier run.
        LifecycleEvent::GameStarting if !should_start_services(game, settings) => stop_all,
        LifecycleEvent::GameStarting => {
            let mut steps = Architecture::ALL.map(Step::StartService).to_vec();
            steps.extend([
                Step::ValidateDefaultProfile,
                Step::InjectCatalogId,
                Step::ValidateReshadeConfiguration,
            ]);
            steps
        }
        LifecycleEvent::GameStopped => stop_all,
    }
}
