//! Permanent per-game memoization of catalog id lookups.
//!
//! Each game gets a plain-text record under `<data_dir>/attempts/<game id>`
//! holding the id that was resolved, or [`NOT_FOUND_ID`] when nothing was.
//! The presence of the record is the "already attempted" signal: once it
//! exists the resolver is never consulted again for that game, so a launcher
//! restart doesn't repeat network searches or chooser prompts.
//!
//! There is no expiry and no locking. The launcher runs lifecycle events for
//! one game sequentially, which makes the record single-writer.

use fs_err as fs;
use std::path::PathBuf;

use crate::catalog::NOT_FOUND_ID;
use crate::error::{HelperError, Result};
use crate::storage::{atomic_write, sanitize_file_name};

pub struct AttemptCache {
    dir: PathBuf,
}

impl AttemptCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn record_path(&self, game_id: &str) -> PathBuf {
        self.dir.join(sanitize_file_name(game_id))
    }

    /// Stored id for the game, if an attempt was recorded. An empty record
    /// reads as [`NOT_FOUND_ID`].
    pub fn lookup(&self, game_id: &str) -> Option<String> {
        let path = self.record_path(game_id);
        if !path.is_file() {
            return None;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                // An unreadable record still marks the game as attempted.
                tracing::warn!(path = %path.display(), error = %err, "Failed to read attempt record");
                return Some(NOT_FOUND_ID.to_string());
            }
        };

        let stored = content.trim();
        Some(if stored.is_empty() {
            NOT_FOUND_ID.to_string()
        } else {
            stored.to_string()
        })
    }

    /// Returns the stored id, or runs `resolver`, records its answer and
    /// returns it. A failed write is logged and the fresh answer still returned.
    ///
    /// A resolver error is not an answer: nothing is recorded, so the next
    /// event tries again, and [`NOT_FOUND_ID`] is returned for this one.
    pub fn get_or_resolve<F>(&self, game_id: &str, resolver: F) -> String
    where
        F: FnOnce() -> Result<Option<String>>,
    {
        if let Some(previous) = self.lookup(game_id) {
            tracing::info!(game_id, previous = %previous, "Attempt record found, skipping lookup");
            return previous;
        }

        let resolved = match resolver() {
            Ok(answer) => answer
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| NOT_FOUND_ID.to_string()),
            Err(err) => {
                tracing::warn!(game_id, error = %err, "Lookup failed, attempt not recorded");
                return NOT_FOUND_ID.to_string();
            }
        };

        if let Err(err) = self.store(game_id, &resolved) {
            tracing::error!(game_id, error = %err, "Failed to persist attempt record");
        }

        resolved
    }

    fn store(&self, game_id: &str, catalog_id: &str) -> Result<()> {
        let path = self.record_path(game_id);
        fs::create_dir_all(&self.dir).map_err(|e| HelperError::persistence(&self.dir, e))?;
        atomic_write(&path, catalog_id.as_bytes())
    }
}
