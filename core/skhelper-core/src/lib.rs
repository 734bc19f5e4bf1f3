//! # skhelper-core
//!
//! Game lifecycle logic for the Special K helper: starts and stops the
//! injection service around game sessions, keeps its default profile in line
//! with user settings, and gives non-Steam games a Steam app id so the
//! service's Steam integration works for them too.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime. The only blocking wait is the bounded
//!   readiness poll when a service starts.
//! - **Never fatal**: Every failure is logged and reported; none of them can
//!   stop the game from launching.
//! - **Idempotent config writes**: INI files are only rewritten when a value
//!   actually changes.
//! - **Injected OS access**: process launching, event probing, catalog search
//!   and the chooser dialog are traits, so the lifecycle runs in tests without
//!   Windows or network access.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skhelper_core::*;
//!
//! let layout = Layout::from_env().expect("no home directory");
//! let settings = Settings::load(&layout.settings_file());
//! let notifications = FileNotificationCenter::new(layout.notifications_file());
//! let catalog = SteamStoreSearch::default();
//!
//! let orchestrator = Orchestrator::new(
//!     layout,
//!     HostMode::Desktop,
//!     Collaborators {
//!         launcher: &SystemLauncher,
//!         probe: &NamedEventProbe,
//!         notifications: &notifications,
//!         catalog: &catalog,
//!         chooser: None,
//!     },
//! );
//! let report = orchestrator.handle(LifecycleEvent::GameStarting, &game, &settings);
//! ```

pub mod attempts;
pub mod catalog;
pub mod error;
pub mod ini;
pub mod lifecycle;
pub mod matching;
pub mod notify;
pub mod patterns;
pub mod profiles;
pub mod service;
pub mod settings;
pub mod storage;
pub mod types;

pub use attempts::AttemptCache;
pub use catalog::{is_native_steam_game, CatalogSearch, SteamStoreSearch, NOT_FOUND_ID};
pub use error::{HelperError, Result};
pub use ini::{IniDocument, IniPatch};
pub use lifecycle::{
    plan, should_start_services, Collaborators, LifecycleEvent, LifecycleReport, Orchestrator,
    Step, StepOutcome, StepStatus,
};
pub use matching::{
    normalize_game_name, Chooser, IdentityMatcher, MatchOptions, MatchResult, MatchStatus,
    SearchCandidate,
};
pub use notify::{FileNotificationCenter, MemoryNotifications, Notification, NotificationSink};
pub use service::{
    Architecture, NamedEventProbe, PollPolicy, ProcessLauncher, ReadinessProbe, ServiceController,
    ServiceState, SystemLauncher,
};
pub use settings::{ExecutionMode, Settings};
pub use storage::Layout;
pub use types::*;
