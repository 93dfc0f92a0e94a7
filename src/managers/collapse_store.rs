//! Collapse-State Store.
//!
//! Remembers, per bookmark folder, whether the user collapsed or expanded it.
//! The whole mapping is persisted under one key of the key-value store on
//! every change and read back once at startup.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::database::KeyValueStore;
use crate::types::errors::StorageError;

/// Folder ID to collapsed flag, plus the policy for folders without an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseState {
    entries: HashMap<String, bool>,
    default_collapsed: bool,
}

impl CollapseState {
    pub fn new(default_collapsed: bool) -> Self {
        Self {
            entries: HashMap::new(),
            default_collapsed,
        }
    }

    pub fn with_entries(entries: HashMap<String, bool>, default_collapsed: bool) -> Self {
        Self {
            entries,
            default_collapsed,
        }
    }

    /// Effective state of a folder: stored entry if any, default otherwise.
    pub fn is_collapsed(&self, folder_id: &str) -> bool {
        self.entries
            .get(folder_id)
            .copied()
            .unwrap_or(self.default_collapsed)
    }

    /// The stored entry, without applying the default.
    pub fn stored(&self, folder_id: &str) -> Option<bool> {
        self.entries.get(folder_id).copied()
    }

    pub fn set(&mut self, folder_id: &str, collapsed: bool) {
        self.entries.insert(folder_id.to_string(), collapsed);
    }

    /// Flips the effective state and records it. Returns the new state.
    pub fn toggle(&mut self, folder_id: &str) -> bool {
        let collapsed = !self.is_collapsed(folder_id);
        self.set(folder_id, collapsed);
        collapsed
    }

    pub fn default_collapsed(&self) -> bool {
        self.default_collapsed
    }

    pub fn entries(&self) -> &HashMap<String, bool> {
        &self.entries
    }

    fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), Value::Bool(*v)))
                .collect(),
        )
    }

    /// Accepts `{ "<id>": bool, ... }`; anything else is a serialization error.
    fn entries_from_value(value: Value) -> Result<HashMap<String, bool>, StorageError> {
        serde_json::from_value(value).map_err(|e| StorageError::SerializationError(e.to_string()))
    }
}

/// Durable owner of the [`CollapseState`].
pub struct CollapseStore {
    state: CollapseState,
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CollapseStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &str, default_collapsed: bool) -> Self {
        Self {
            state: CollapseState::new(default_collapsed),
            store,
            key: key.to_string(),
        }
    }

    /// Reads the persisted mapping. On failure the in-memory state is left empty.
    pub async fn load(&mut self) -> Result<(), StorageError> {
        let entries = match self.store.get(&self.key).await? {
            Some(value) => CollapseState::entries_from_value(value)?,
            None => HashMap::new(),
        };
        tracing::debug!(folders = entries.len(), "loaded folder states");
        self.state = CollapseState::with_entries(entries, self.state.default_collapsed);
        Ok(())
    }

    pub fn state(&self) -> &CollapseState {
        &self.state
    }

    /// Flips a folder in memory. Call [`persist`](Self::persist) afterwards.
    pub fn toggle(&mut self, folder_id: &str) -> bool {
        self.state.toggle(folder_id)
    }

    pub fn set(&mut self, folder_id: &str, collapsed: bool) {
        self.state.set(folder_id, collapsed);
    }

    /// Writes the whole mapping under the store key.
    pub async fn persist(&self) -> Result<(), StorageError> {
        self.store.set(&self.key, self.state.to_value()).await
    }
}
