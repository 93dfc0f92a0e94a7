// Tabdeck host platform abstraction
// The host owns the real tab and bookmark state; the panel core only reads it
// and issues requests. Platform-specific paths live in `paths`.

pub mod memory;
pub mod paths;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::types::bookmark::{BookmarkDestination, BookmarkNode};
use crate::types::errors::HostError;
use crate::types::tab::{Tab, TabId, TabUpdate, WindowId};

pub use paths::{get_config_dir, get_data_dir};

/// Change notification published by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    TabCreated { tab_id: TabId },
    TabRemoved { tab_id: TabId },
    TabUpdated { tab_id: TabId },
    TabActivated { tab_id: TabId, window_id: WindowId },
    BookmarkCreated { id: String },
    BookmarkRemoved { id: String },
    BookmarkChanged { id: String },
    BookmarkMoved { id: String },
}

/// Discriminant of [`HostEvent`], used to build subscription lists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HostEventKind {
    TabCreated,
    TabRemoved,
    TabUpdated,
    TabActivated,
    BookmarkCreated,
    BookmarkRemoved,
    BookmarkChanged,
    BookmarkMoved,
}

impl HostEventKind {
    pub const ALL: [HostEventKind; 8] = [
        HostEventKind::TabCreated,
        HostEventKind::TabRemoved,
        HostEventKind::TabUpdated,
        HostEventKind::TabActivated,
        HostEventKind::BookmarkCreated,
        HostEventKind::BookmarkRemoved,
        HostEventKind::BookmarkChanged,
        HostEventKind::BookmarkMoved,
    ];
}

impl HostEvent {
    pub fn kind(&self) -> HostEventKind {
        match self {
            HostEvent::TabCreated { .. } => HostEventKind::TabCreated,
            HostEvent::TabRemoved { .. } => HostEventKind::TabRemoved,
            HostEvent::TabUpdated { .. } => HostEventKind::TabUpdated,
            HostEvent::TabActivated { .. } => HostEventKind::TabActivated,
            HostEvent::BookmarkCreated { .. } => HostEventKind::BookmarkCreated,
            HostEvent::BookmarkRemoved { .. } => HostEventKind::BookmarkRemoved,
            HostEvent::BookmarkChanged { .. } => HostEventKind::BookmarkChanged,
            HostEvent::BookmarkMoved { .. } => HostEventKind::BookmarkMoved,
        }
    }
}

/// Capability surface of the browser hosting the panel.
///
/// Every call is an asynchronous request. Overlapping calls are not guaranteed
/// to resolve in issue order.
#[async_trait]
pub trait HostPlatform: Send + Sync {
    /// All tabs of all windows, in host iteration order.
    async fn query_tabs(&self) -> Result<Vec<Tab>, HostError>;
    async fn get_tab(&self, tab_id: TabId) -> Result<Tab, HostError>;
    /// Moves a tab to `index` in `window_id`. The index is counted after the
    /// tab has been removed from its old position.
    async fn move_tab(&self, tab_id: TabId, window_id: WindowId, index: usize)
        -> Result<(), HostError>;
    async fn update_tab(&self, tab_id: TabId, update: TabUpdate) -> Result<(), HostError>;
    async fn remove_tab(&self, tab_id: TabId) -> Result<(), HostError>;
    async fn create_tab(&self, url: &str) -> Result<Tab, HostError>;
    async fn focus_window(&self, window_id: WindowId) -> Result<(), HostError>;

    /// The whole bookmark tree; the panel shows the root's children.
    async fn get_bookmark_tree(&self) -> Result<BookmarkNode, HostError>;
    /// A single node without its subtree.
    async fn get_bookmark(&self, id: &str) -> Result<BookmarkNode, HostError>;
    async fn get_bookmark_children(&self, parent_id: &str) -> Result<Vec<BookmarkNode>, HostError>;
    async fn move_bookmark(&self, id: &str, destination: BookmarkDestination)
        -> Result<(), HostError>;

    /// Opens a new change-notification stream.
    fn subscribe(&self) -> UnboundedReceiver<HostEvent>;
}
