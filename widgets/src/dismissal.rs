//! Dismissal persistence for announcement bars and popups.
//!
//! The generated script stores a flag in the visitor's `localStorage` when a
//! closeable widget is dismissed. [`DismissalPolicy`] supplies the keys that
//! script reads and runs the same decision logic against any
//! [`DismissalStore`], so the show/close/reload cycle can be exercised
//! without a browser.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Value written under the storage key when a widget is dismissed.
pub const DISMISSED_FLAG: &str = "1";

/// Minimal key/value surface of browser-local storage.
pub trait DismissalStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store standing in for `localStorage`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DismissalStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DismissalPolicy {
    pub closeable: bool,
    pub remember: bool,
    pub storage_key: String,
}

impl DismissalPolicy {
    /// Script configuration read by `isDismissed` and `rememberDismissal`.
    #[must_use]
    pub fn script_config(&self) -> Map<String, Value> {
        let mut config = Map::new();
        config.insert("closeable".into(), Value::Bool(self.closeable));
        config.insert("remember".into(), Value::Bool(self.remember));
        config.insert("storageKey".into(), Value::String(self.storage_key.clone()));
        config
    }

    /// Whether the widget should appear when its script initializes.
    #[must_use]
    pub fn should_show(&self, store: &impl DismissalStore) -> bool {
        if !(self.closeable && self.remember) {
            return true;
        }
        store.get(&self.storage_key).as_deref() != Some(DISMISSED_FLAG)
    }

    /// Handle a close action. Returns `true` if the widget closed.
    ///
    /// Non-closeable widgets ignore the action and persist nothing.
    pub fn dismiss(&self, store: &mut impl DismissalStore) -> bool {
        if !self.closeable {
            return false;
        }
        if self.remember {
            store.set(&self.storage_key, DISMISSED_FLAG);
        }
        true
    }
}

#[cfg(test)]
#[path = "dismissal_test.rs"]
mod tests;
