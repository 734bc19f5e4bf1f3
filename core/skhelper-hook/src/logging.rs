//! File logging for the hook.
//!
//! The launcher discards the hook's stdout/stderr, so logs go to a daily file
//! under `<data_dir>/logs`. `SKHELPER_DEBUG_LOG=1` raises the level to debug;
//! otherwise `RUST_LOG` applies, defaulting to info.

use skhelper_core::Layout;
use std::env;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEBUG_ENV: &str = "SKHELPER_DEBUG_LOG";

fn debug_enabled() -> bool {
    env::var(DEBUG_ENV)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}

/// Installs the global subscriber. The returned guard flushes buffered lines
/// on drop and must be held for the life of the process. Returns `None` when
/// no log directory is available; the hook then runs without logging.
pub fn init() -> Option<WorkerGuard> {
    let logs_dir = Layout::from_env()?.logs_dir();
    if fs_err::create_dir_all(&logs_dir).is_err() {
        return None;
    }

    let filter = if debug_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let appender = tracing_appender::rolling::daily(&logs_dir, "skhelper-hook.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
