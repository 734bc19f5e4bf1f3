//! User-facing notifications.
//!
//! The launcher shows notifications in its own UI; skhelper only produces
//! them. A notification is identified by its key, and publishing the same
//! key again replaces the earlier one instead of stacking duplicates.

use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{HelperError, Result};
use crate::storage::atomic_write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub key: String,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn error(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
            severity: Severity::Error,
            created_at: Utc::now(),
        }
    }
}

/// Destination for notifications. Delivery failures are the sink's problem:
/// publishing never fails the caller.
pub trait NotificationSink {
    fn notify(&self, notification: Notification);
}

/// Persists notifications as a JSON object keyed by notification key, for the
/// launcher side to pick up.
pub struct FileNotificationCenter {
    path: PathBuf,
}

impl FileNotificationCenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All pending notifications, oldest first. A missing file means none.
    pub fn pending(&self) -> Result<Vec<Notification>> {
        let mut items: Vec<Notification> = self.read_map()?.into_values().collect();
        items.sort_by_key(|n| n.created_at);
        Ok(items)
    }

    fn read_map(&self) -> Result<BTreeMap<String, Notification>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| HelperError::io(format!("reading {}", self.path.display()), e))?;
        serde_json::from_str(&content).map_err(|e| HelperError::Json {
            context: format!("parsing {}", self.path.display()),
            source: e,
        })
    }

    fn publish(&self, notification: Notification) -> Result<()> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(error = %err, "Notification file unreadable, starting fresh");
                BTreeMap::new()
            }
        };
        map.insert(notification.key.clone(), notification);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| HelperError::persistence(parent, e))?;
        }
        let json = serde_json::to_vec_pretty(&map).map_err(|e| HelperError::Json {
            context: "serializing notifications".to_string(),
            source: e,
        })?;
        atomic_write(&self.path, &json)
    }
}

impl NotificationSink for FileNotificationCenter {
    fn notify(&self, notification: Notification) {
        tracing::info!(key = %notification.key, message = %notification.message, "Notification");
        if let Err(err) = self.publish(notification) {
            tracing::error!(error = %err, "Failed to publish notification");
        }
    }
}

/// Keeps notifications in memory, deduplicated by key.
#[derive(Default)]
pub struct MemoryNotifications {
    items: Mutex<Vec<Notification>>,
}

impl MemoryNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        match self.items.lock() {
            Ok(items) => items.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.snapshot().into_iter().map(|n| n.key).collect()
    }
}

impl NotificationSink for MemoryNotifications {
    fn notify(&self, notification: Notification) {
        let mut items = match self.items.lock() {
            Ok(items) => items,
            Err(poisoned) => poisoned.into_inner(),
        };
        items.retain(|n| n.key != notification.key);
        items.push(notification);
    }
}
