//! Idempotent INI configuration merges.
//!
//! A merge is a list of [`IniPatch`] entries applied to one file. Each entry
//! counts as a change only when the key is absent or its current value
//! differs byte for byte, and the file is rewritten only when at least one
//! entry changed. Running the same merge twice leaves the file untouched the
//! second time.

mod document;
mod sync;

pub use document::{IniDocument, TextEncoding};
pub use sync::{commit_if_changed, ensure_all, ensure_value, sync_file};

/// One desired `[section] key = value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniPatch {
    pub section: String,
    pub key: String,
    pub value: String,
}

impl IniPatch {
    pub fn new(section: &str, key: &str, value: impl Into<String>) -> Self {
        Self {
            section: section.to_string(),
            key: key.to_string(),
            value: value.into(),
        }
    }
}
