//! Game lifecycle handling.
//!
//! The launcher reports two events per game session. [`plan`] turns an event
//! into an ordered list of [`Step`]s without touching anything; the
//! [`Orchestrator`] then runs them, logging and recording failures while
//! carrying on with the remaining steps. Nothing here ever aborts the game
//! launch itself.

mod orchestrator;
mod plan;

pub use orchestrator::{Collaborators, LifecycleReport, Orchestrator, StepOutcome, StepStatus};
pub use plan::{
    plan, should_start_services, GLOBAL_MODE_DISABLE_FEATURE, SELECTIVE_MODE_ENABLE_FEATURE,
    VAC_FEATURE,
};

use serde::Serialize;

use crate::service::Architecture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    GameStarting,
    GameStopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", content = "architecture", rename_all = "snake_case")]
pub enum Step {
    StartService(Architecture),
    StopService(Architecture),
    ValidateDefaultProfile,
    InjectCatalogId,
    ValidateReshadeConfiguration,
}
