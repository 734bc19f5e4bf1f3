use skhelper_core::HelperError;

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Cannot determine data directories")]
    NoLayout,

    #[error("Failed to read game snapshot: {0}")]
    ReadGame(#[source] std::io::Error),

    #[error("Failed to parse game snapshot: {0}")]
    ParseGame(#[source] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[source] serde_json::Error),

    #[error(transparent)]
    Core(#[from] HelperError),
}

impl HookError {
    /// Process exit code. Only unusable input, or a failed lookup for
    /// `resolve`, fails the process; the launcher treats anything else as a
    /// finished event.
    pub fn exit_code(&self) -> i32 {
        match self {
            HookError::ReadGame(_) | HookError::ParseGame(_) | HookError::Core(_) => 1,
            HookError::NoLayout | HookError::Output(_) => 0,
        }
    }
}
