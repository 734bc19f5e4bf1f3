use fs_err as fs;
use serde::Serialize;
use std::cell::Cell;

use super::{plan, LifecycleEvent, Step};
use crate::attempts::AttemptCache;
use crate::catalog::{is_native_steam_game, CatalogSearch};
use crate::error::{HelperError, Result};
use crate::matching::{normalize_game_name, Chooser, IdentityMatcher, MatchOptions};
use crate::notify::NotificationSink;
use crate::profiles;
use crate::service::{PollPolicy, ProcessLauncher, ReadinessProbe, ServiceController, ServiceState};
use crate::settings::Settings;
use crate::storage::Layout;
use crate::types::{GameRecord, HostMode};

const APP_ID_FILE: &str = "steam_appid.txt";

/// External capabilities the lifecycle depends on.
pub struct Collaborators<'a> {
    pub launcher: &'a dyn ProcessLauncher,
    pub probe: &'a dyn ReadinessProbe,
    pub notifications: &'a dyn NotificationSink,
    pub catalog: &'a dyn CatalogSearch,
    /// Interactive picker; `None` when nobody can answer one.
    pub chooser: Option<&'a dyn Chooser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Done,
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: Step,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleReport {
    pub event: LifecycleEvent,
    pub game_id: String,
    pub steps: Vec<StepOutcome>,
}

impl LifecycleReport {
    pub fn planned(&self) -> Vec<Step> {
        self.steps.iter().map(|outcome| outcome.step).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps
            .iter()
            .filter(|outcome| matches!(outcome.status, StepStatus::Failed { .. }))
    }

    pub fn status_of(&self, step: Step) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|outcome| outcome.step == step)
            .map(|outcome| &outcome.status)
    }
}

enum Injection {
    NativeIntegration,
    AppIdFilePresent,
    Injected(String),
}

/// Runs lifecycle events for one launcher host.
pub struct Orchestrator<'a> {
    layout: Layout,
    host_mode: HostMode,
    services: ServiceController<'a>,
    catalog: &'a dyn CatalogSearch,
    chooser: Option<&'a dyn Chooser>,
    attempts: AttemptCache,
    match_options: MatchOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(layout: Layout, host_mode: HostMode, deps: Collaborators<'a>) -> Self {
        Self {
            services: ServiceController::new(
                &layout,
                deps.launcher,
                deps.probe,
                deps.notifications,
            ),
            attempts: AttemptCache::new(layout.attempts_dir()),
            catalog: deps.catalog,
            chooser: deps.chooser,
            match_options: MatchOptions::default(),
            host_mode,
            layout,
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.services = self.services.with_policy(policy);
        self
    }

    /// Matching options for catalog lookups. `background` is always taken
    /// from the host mode.
    pub fn with_match_options(mut self, options: MatchOptions) -> Self {
        self.match_options = options;
        self
    }

    pub fn handle(
        &self,
        event: LifecycleEvent,
        game: &GameRecord,
        settings: &Settings,
    ) -> LifecycleReport {
        tracing::info!(?event, game = %game.name, id = %game.id, "Handling lifecycle event");

        let steps = plan(event, game, settings)
            .into_iter()
            .map(|step| {
                let status = self.run_step(step, game, settings);
                if let StepStatus::Failed { error } = &status {
                    tracing::warn!(?step, game = %game.name, error = %error, "Lifecycle step failed");
                }
                StepOutcome { step, status }
            })
            .collect();

        LifecycleReport {
            event,
            game_id: game.id.clone(),
            steps,
        }
    }

    fn run_step(&self, step: Step, game: &GameRecord, settings: &Settings) -> StepStatus {
        match step {
            Step::StartService(arch) => match self.services.start_service(arch) {
                ServiceState::Ready => StepStatus::Done,
                state => StepStatus::Failed {
                    error: format!("{} service ended in state {:?}", arch, state),
                },
            },
            Step::StopService(arch) => {
                if self.services.stop(arch) {
                    StepStatus::Done
                } else {
                    StepStatus::Failed {
                        error: format!("{} service not stopped", arch),
                    }
                }
            }
            Step::ValidateDefaultProfile => {
                status_from(profiles::validate_default_profile(&self.layout, settings))
            }
            Step::InjectCatalogId => match self.inject_catalog_id(game) {
                Ok(Injection::NativeIntegration) => StepStatus::Skipped {
                    reason: "launched through Steam".to_string(),
                },
                Ok(Injection::AppIdFilePresent) => StepStatus::Skipped {
                    reason: format!("{} already present", APP_ID_FILE),
                },
                Ok(Injection::Injected(id)) => {
                    tracing::info!(game = %game.name, catalog_id = %id, "Catalog id injected");
                    StepStatus::Done
                }
                Err(err) => StepStatus::Failed {
                    error: err.to_string(),
                },
            },
            Step::ValidateReshadeConfiguration => {
                status_from(profiles::validate_reshade_configuration(&self.layout, &game.id))
            }
        }
    }

    fn inject_catalog_id(&self, game: &GameRecord) -> Result<Injection> {
        if is_native_steam_game(game) {
            return Ok(Injection::NativeIntegration);
        }

        let app_id_file = game.valid_install_dir().map(|dir| dir.join(APP_ID_FILE));
        if app_id_file.as_ref().is_some_and(|path| path.exists()) {
            return Ok(Injection::AppIdFilePresent);
        }

        let search_failed = Cell::new(false);
        let catalog_id = self.attempts.get_or_resolve(&game.id, || {
            if game.is_pc_game() {
                self.resolve_catalog_id(game)
                    .inspect_err(|_| search_failed.set(true))
            } else {
                Ok(None)
            }
        });

        // A placeholder id file would stop the next launch from searching again.
        match &app_id_file {
            Some(_) if search_failed.get() => {
                tracing::info!(game = %game.name, "Catalog unavailable, app id file not written");
            }
            Some(path) => {
                if let Err(err) = fs::write(path, &catalog_id) {
                    let err = HelperError::persistence(path, err);
                    tracing::error!(error = %err, "Error while creating app id file");
                }
            }
            None => {}
        }

        // Profiles created for the game later copy the id from here.
        profiles::set_profile_app_id(&self.layout, &catalog_id)?;
        Ok(Injection::Injected(catalog_id))
    }

    /// `Ok(None)` when nothing matched; `Err` when the catalog could not be
    /// searched at all.
    fn resolve_catalog_id(&self, game: &GameRecord) -> Result<Option<String>> {
        let query = normalize_game_name(&game.name);
        let candidates = self.catalog.search(&query).inspect_err(|err| {
            tracing::warn!(game = %game.name, error = %err, "Catalog search failed");
        })?;

        let options = MatchOptions {
            background: self.host_mode.is_background(),
            ..self.match_options
        };
        let chooser = if options.background {
            None
        } else {
            self.chooser
        };

        Ok(IdentityMatcher::new(options)
            .resolve(&game.name, &candidates, chooser)
            .catalog_id)
    }
}

fn status_from(result: Result<usize>) -> StepStatus {
    match result {
        Ok(_) => StepStatus::Done,
        Err(err) => StepStatus::Failed {
            error: err.to_string(),
        },
    }
}
