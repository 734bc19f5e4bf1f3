//! Helper service lifecycle.
//!
//! The helper service comes as one injection library per CPU architecture
//! (`SpecialK32.dll`, `SpecialK64.dll`). It is installed and removed by
//! launching `rundll32` against the library; the launch returns immediately
//! and the only evidence that the install finished is a named event the
//! service creates once its global hook is in place.
//!
//! ```text
//! NotRunning ──start──▶ Starting ──event seen──▶ Ready ──stop──▶ Stopping ──▶ NotRunning
//!                          └──────polls exhausted──▶ StartFailed
//! ```
//!
//! # Module Structure
//!
//! - [`launcher`]: detached process spawning and `rundll32` selection
//! - [`signal`]: named event presence checks
//! - [`controller`]: start/stop with bounded readiness polling

pub mod controller;
pub mod launcher;
pub mod signal;

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use controller::ServiceController;
pub use launcher::{LaunchRequest, ProcessLauncher, SystemLauncher};
pub use signal::{NamedEventProbe, ReadinessProbe};

const READINESS_SIGNAL_PREFIX: &str = r"Local\SK_GlobalHookTeardown";
const INSTALL_VERB: &str = "RunDLL_InjectionManager Install";
const REMOVE_VERB: &str = "RunDLL_InjectionManager Remove";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X86,
    X64,
}

impl Architecture {
    /// Start and stop order used by the lifecycle.
    pub const ALL: [Architecture; 2] = [Architecture::X86, Architecture::X64];

    /// Bitness suffix used in library names, signal names and notification keys.
    pub fn suffix(self) -> &'static str {
        match self {
            Architecture::X86 => "32",
            Architecture::X64 => "64",
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Architecture::X86 => write!(f, "x86"),
            Architecture::X64 => write!(f, "x64"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    NotRunning,
    Starting,
    Ready,
    StartFailed,
    Stopping,
}

/// Everything needed to drive one architecture's service. Built per call and
/// never persisted; whether the service is running is only known to the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHandle {
    pub architecture: Architecture,
    pub helper_library: PathBuf,
    pub launcher: PathBuf,
    pub readiness_signal: String,
}

impl ServiceHandle {
    pub fn new(architecture: Architecture, base: &Path, system_root: &Path) -> Self {
        Self {
            architecture,
            helper_library: base.join(format!("SpecialK{}.dll", architecture.suffix())),
            launcher: launcher::rundll32_path(architecture, system_root),
            readiness_signal: format!("{}{}", READINESS_SIGNAL_PREFIX, architecture.suffix()),
        }
    }

    /// `"<library>",RunDLL_InjectionManager Install`
    pub fn install_arguments(&self) -> String {
        format!("\"{}\",{}", self.helper_library.display(), INSTALL_VERB)
    }

    pub fn remove_arguments(&self) -> String {
        format!("\"{}\",{}", self.helper_library.display(), REMOVE_VERB)
    }
}

/// Bounded readiness wait: sleep `interval`, check, up to `attempts` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: 12,
            interval: Duration::from_millis(40),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_names_follow_architecture() {
        let base = Path::new("/sk");
        let handle = ServiceHandle::new(Architecture::X86, base, Path::new("/missing-root"));
        assert_eq!(handle.helper_library, base.join("SpecialK32.dll"));
        assert_eq!(handle.readiness_signal, r"Local\SK_GlobalHookTeardown32");
        assert_eq!(handle.launcher, PathBuf::from("rundll32.exe"));

        let handle = ServiceHandle::new(Architecture::X64, base, Path::new("/missing-root"));
        assert_eq!(handle.helper_library, base.join("SpecialK64.dll"));
        assert_eq!(handle.readiness_signal, r"Local\SK_GlobalHookTeardown64");
    }

    #[test]
    fn test_arguments_quote_library_path() {
        let handle = ServiceHandle::new(Architecture::X64, Path::new("/sk"), Path::new("/win"));
        let library = handle.helper_library.display().to_string();
        assert_eq!(
            handle.install_arguments(),
            format!("\"{}\",RunDLL_InjectionManager Install", library)
        );
        assert_eq!(
            handle.remove_arguments(),
            format!("\"{}\",RunDLL_InjectionManager Remove", library)
        );
    }

    #[test]
    fn test_default_poll_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.attempts, 12);
        assert_eq!(policy.interval, Duration::from_millis(40));
    }
}
