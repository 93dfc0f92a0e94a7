use std::fmt;

use super::snapshot::SnapshotPart;
use super::tab::{TabId, WindowId};

// === HostError ===

/// A single host platform call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// No tab with the given ID exists on the host.
    TabNotFound(TabId),
    /// No bookmark node with the given ID exists on the host.
    BookmarkNotFound(String),
    /// No window with the given ID exists on the host.
    WindowNotFound(WindowId),
    /// The host refused the request.
    Rejected(String),
    /// The host API could not be reached or returned garbage.
    Unavailable(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::TabNotFound(id) => write!(f, "Tab not found: {}", id),
            HostError::BookmarkNotFound(id) => write!(f, "Bookmark not found: {}", id),
            HostError::WindowNotFound(id) => write!(f, "Window not found: {}", id),
            HostError::Rejected(msg) => write!(f, "Host rejected request: {}", msg),
            HostError::Unavailable(msg) => write!(f, "Host unavailable: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}

// === StorageError ===

/// Errors from the key-value persistence service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// A stored value could not be encoded or decoded.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === InvalidMove ===

/// Reasons a drag gesture produces no host request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidMove {
    /// Source and target kinds are not allowed to interact.
    IncompatibleKinds,
    /// The source was dropped onto itself.
    SelfDrop,
    /// A folder was dropped onto its own descendant.
    DescendantCycle,
    /// The computed position equals the current one.
    NoChange,
    /// The gesture ended without a drop target.
    MissingDropTarget,
    /// The source or target is not part of the current order.
    UnknownEntity(String),
}

impl fmt::Display for InvalidMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidMove::IncompatibleKinds => write!(f, "Incompatible drag source and target"),
            InvalidMove::SelfDrop => write!(f, "Cannot drop an item onto itself"),
            InvalidMove::DescendantCycle => {
                write!(f, "Cannot move folder into its own descendant")
            }
            InvalidMove::NoChange => write!(f, "Move does not change position"),
            InvalidMove::MissingDropTarget => write!(f, "No drop target"),
            InvalidMove::UnknownEntity(id) => write!(f, "Unknown entity: {}", id),
        }
    }
}

impl std::error::Error for InvalidMove {}

// === PanelError ===

/// Aggregate error returned by panel controller operations.
///
/// None of these is fatal; the controller logs them and keeps its previous state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// A host call failed.
    Host(HostError),
    /// One half of a snapshot could not be loaded.
    PartialLoad { part: SnapshotPart, reason: String },
    /// A drag gesture was rejected.
    InvalidMove(InvalidMove),
    /// An input referenced an entity that disappeared in a rebuild.
    StaleReference(String),
    /// Persisting UI state failed.
    Storage(StorageError),
    /// A drag event arrived with no drag in progress.
    NoActiveDrag,
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::Host(e) => write!(f, "{}", e),
            PanelError::PartialLoad { part, reason } => {
                write!(f, "Failed to load {}: {}", part, reason)
            }
            PanelError::InvalidMove(e) => write!(f, "Invalid move: {}", e),
            PanelError::StaleReference(id) => write!(f, "Stale reference: {}", id),
            PanelError::Storage(e) => write!(f, "{}", e),
            PanelError::NoActiveDrag => write!(f, "No drag in progress"),
        }
    }
}

impl std::error::Error for PanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PanelError::Host(e) => Some(e),
            PanelError::InvalidMove(e) => Some(e),
            PanelError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HostError> for PanelError {
    fn from(e: HostError) -> Self {
        PanelError::Host(e)
    }
}

impl From<InvalidMove> for PanelError {
    fn from(e: InvalidMove) -> Self {
        PanelError::InvalidMove(e)
    }
}

impl From<StorageError> for PanelError {
    fn from(e: StorageError) -> Self {
        PanelError::Storage(e)
    }
}
