//! Collaborator hooks
//!
//! The engine never persists anything or talks to a user directly. Front ends
//! that want history or notifications plug an implementation of these traits
//! in at their own layer.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Key/value persistence used by front ends for history and settings
pub trait HistoryStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    fn store(&self, key: &str, value: &str);

    /// Load the value stored under `key`
    fn load(&self, key: &str) -> Option<String>;
}

/// In-process store; contents are lost when it is dropped
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn store(&self, key: &str, value: &str) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.to_string());
            }
            Err(poisoned) => {
                poisoned
                    .into_inner()
                    .insert(key.to_string(), value.to_string());
            }
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyLevel::Info => write!(f, "info"),
            NotifyLevel::Success => write!(f, "success"),
            NotifyLevel::Warning => write!(f, "warning"),
            NotifyLevel::Error => write!(f, "error"),
        }
    }
}

/// Surface a message to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: NotifyLevel);
}

/// Forwards notifications to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, level: NotifyLevel) {
        match level {
            NotifyLevel::Info | NotifyLevel::Success => log::info!("{message}"),
            NotifyLevel::Warning => log::warn!("{message}"),
            NotifyLevel::Error => log::error!("{message}"),
        }
    }
}
