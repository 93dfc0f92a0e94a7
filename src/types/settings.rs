use serde::{Deserialize, Serialize};

/// Top-level panel settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PanelSettings {
    pub refresh: RefreshSettings,
    pub bookmarks: BookmarkSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

/// Debounce windows for the change coalescer, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshSettings {
    pub debounce_ms: u64,
    pub fast_refresh_ms: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            fast_refresh_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookmarkSettings {
    /// Collapse state of a folder that has no stored entry.
    pub default_folder_collapsed: bool,
}

impl Default for BookmarkSettings {
    fn default() -> Self {
        Self {
            default_folder_collapsed: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// SQLite file for persisted UI state. `None` uses the platform data directory.
    pub database_path: Option<String>,
    /// Key holding the whole folder-id to collapsed mapping.
    pub folder_state_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            folder_state_key: "tabdeck.folder_states".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
