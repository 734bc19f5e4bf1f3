use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::Architecture;

const RUNDLL32: &str = "rundll32.exe";

/// One detached process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub program: PathBuf,
    /// Passed to the program verbatim, without additional quoting.
    pub arguments: String,
    pub working_dir: PathBuf,
}

pub trait ProcessLauncher {
    /// Starts the process without waiting for it. An error means it could not
    /// be spawned at all.
    fn launch(&self, request: &LaunchRequest) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, request: &LaunchRequest) -> io::Result<()> {
        let mut command = Command::new(&request.program);
        command
            .current_dir(&request.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.raw_arg(&request.arguments);
        }
        #[cfg(not(windows))]
        {
            command.arg(&request.arguments);
        }

        // The child is dropped, not waited on.
        command.spawn().map(|_| ())
    }
}

/// `rundll32` to use for an architecture. The 64-bit one comes from the native
/// system directory when present (`Sysnative` from a 32-bit process);
/// otherwise the bare name is resolved through the search path.
pub fn rundll32_path(architecture: Architecture, system_root: &Path) -> PathBuf {
    if architecture == Architecture::X64 {
        let native_dir = if cfg!(target_pointer_width = "64") {
            "System32"
        } else {
            "Sysnative"
        };
        let candidate = system_root.join(native_dir).join(RUNDLL32);
        if candidate.is_file() {
            return candidate;
        }
    }

    PathBuf::from(RUNDLL32)
}
