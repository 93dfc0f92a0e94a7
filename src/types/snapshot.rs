use std::fmt;

use serde::{Deserialize, Serialize};

use super::bookmark::BookmarkNode;
use super::tab::{Tab, WindowId};

/// Unpinned tabs of one window, in host `index` order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowGroup {
    pub window_id: WindowId,
    pub tabs: Vec<Tab>,
}

/// Which half of a snapshot a read belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPart {
    Tabs,
    Bookmarks,
}

impl fmt::Display for SnapshotPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotPart::Tabs => write!(f, "tabs"),
            SnapshotPart::Bookmarks => write!(f, "bookmarks"),
        }
    }
}

/// A failed half of a snapshot load. The half is present but empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadFailure {
    pub part: SnapshotPart,
    pub reason: String,
}

/// Host state pulled in one load, shaped for the builder and the reorder engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub pinned_tabs: Vec<Tab>,
    pub open_tabs_by_window: Vec<WindowGroup>,
    pub bookmark_roots: Vec<BookmarkNode>,
    #[serde(default)]
    pub failures: Vec<LoadFailure>,
}

impl Snapshot {
    /// All unpinned tabs, windows concatenated in snapshot order.
    pub fn open_tabs(&self) -> impl Iterator<Item = &Tab> {
        self.open_tabs_by_window.iter().flat_map(|g| g.tabs.iter())
    }

    /// Pinned and unpinned tabs together.
    pub fn all_tabs(&self) -> impl Iterator<Item = &Tab> {
        self.pinned_tabs.iter().chain(self.open_tabs())
    }

    pub fn find_tab(&self, tab_id: i64) -> Option<&Tab> {
        self.all_tabs().find(|t| t.id == tab_id)
    }

    /// Depth-first search of the bookmark forest.
    pub fn find_bookmark(&self, id: &str) -> Option<&BookmarkNode> {
        let mut stack: Vec<&BookmarkNode> = self.bookmark_roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.id() == id {
                return Some(node);
            }
            stack.extend(node.children().iter().rev());
        }
        None
    }

    pub fn failed(&self, part: SnapshotPart) -> bool {
        self.failures.iter().any(|f| f.part == part)
    }
}
