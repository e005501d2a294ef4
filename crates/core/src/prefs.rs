//! Per-session preference store.
//!
//! A single JSON file holds namespaced key/value pairs so UI inputs (the
//! bulk tag name and value fields, page sizes) survive reloads. Writes go
//! through to disk immediately; the store holds no other state.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix applied to every key as stored on disk.
pub const PREF_NAMESPACE: &str = "tagsweep_";

/// Key for the last-used bulk tag name.
pub const PREF_BULK_TAG_NAME: &str = "bulk_tag_name";

/// Key for the last-used bulk tag value.
pub const PREF_BULK_TAG_VALUE: &str = "bulk_tag_value";

// ---------------------------------------------------------------------------
// PrefStore
// ---------------------------------------------------------------------------

/// File-backed key/value store for small UI preferences.
///
/// Keys are namespaced with [`PREF_NAMESPACE`] on disk; callers use the
/// short form. Values are arbitrary JSON.
pub struct PrefStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, serde_json::Value>>,
}

impl PrefStore {
    /// Open (or create) the store at `path`.
    ///
    /// A missing file starts the store empty; a malformed file is an error
    /// rather than silent data loss.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Internal(format!(
                        "Failed to create preference directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                CoreError::Internal(format!(
                    "Malformed preference file {}: {e}",
                    path.display()
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(CoreError::Internal(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Read a value. Returns `None` for unset keys.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.lock().get(&Self::full_key(key)).cloned()
    }

    /// Write a value through to disk.
    pub fn set(&self, key: &str, value: serde_json::Value) -> Result<(), CoreError> {
        let mut values = self.lock();
        values.insert(Self::full_key(key), value);
        self.persist(&values)
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool, CoreError> {
        let mut values = self.lock();
        let removed = values.remove(&Self::full_key(key)).is_some();
        if removed {
            self.persist(&values)?;
        }
        Ok(removed)
    }

    /// All stored keys in sorted order, without the namespace prefix.
    pub fn keys(&self) -> Vec<String> {
        self.lock()
            .keys()
            .map(|k| k.strip_prefix(PREF_NAMESPACE).unwrap_or(k).to_string())
            .collect()
    }

    /// Namespaced form of `key` as stored on disk.
    fn full_key(key: &str) -> String {
        format!("{PREF_NAMESPACE}{key}")
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, serde_json::Value>> {
        // A poisoning writer cannot leave the map half-updated, so the
        // inner data is safe to reuse.
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, values: &BTreeMap<String, serde_json::Value>) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| CoreError::Internal(format!("Failed to serialise preferences: {e}")))?;
        std::fs::write(&self.path, json).map_err(|e| {
            CoreError::Internal(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}

/// Mirror the bulk tag inputs into the store.
///
/// An empty input clears its stored copy, so a cleared field stays cleared
/// on the next load instead of resurrecting the old text.
pub fn remember_bulk_tag(store: &PrefStore, name: &str, value: &str) -> Result<(), CoreError> {
    let name = name.trim();
    let value = value.trim();

    if name.is_empty() {
        store.remove(PREF_BULK_TAG_NAME)?;
    } else {
        store.set(PREF_BULK_TAG_NAME, serde_json::Value::from(name))?;
    }
    if value.is_empty() {
        store.remove(PREF_BULK_TAG_VALUE)?;
    } else {
        store.set(PREF_BULK_TAG_VALUE, serde_json::Value::from(value))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
