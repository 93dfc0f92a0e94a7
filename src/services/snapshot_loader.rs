//! Snapshot Loader.
//!
//! Pulls the tab list and the bookmark tree from the host and shapes them for
//! the builder and the reorder engine. The two reads are independent: when one
//! fails, that half of the snapshot is empty and the failure is recorded, but
//! the other half is still delivered.

use std::sync::Arc;

use crate::platform::HostPlatform;
use crate::types::bookmark::BookmarkNode;
use crate::types::errors::HostError;
use crate::types::snapshot::{LoadFailure, Snapshot, SnapshotPart, WindowGroup};
use crate::types::tab::Tab;

/// Splits tabs into the pinned strip and per-window unpinned groups.
///
/// Pinned tabs and windows keep host iteration order; tabs inside a window
/// are ordered by their host `index`.
pub fn partition_tabs(tabs: Vec<Tab>) -> (Vec<Tab>, Vec<WindowGroup>) {
    let mut pinned = Vec::new();
    let mut groups: Vec<WindowGroup> = Vec::new();

    for tab in tabs {
        if tab.pinned {
            pinned.push(tab);
            continue;
        }
        match groups.iter_mut().find(|g| g.window_id == tab.window_id) {
            Some(group) => group.tabs.push(tab),
            None => groups.push(WindowGroup {
                window_id: tab.window_id,
                tabs: vec![tab],
            }),
        }
    }

    for group in &mut groups {
        group.tabs.sort_by_key(|t| t.index);
    }
    (pinned, groups)
}

/// Loads snapshots from a host platform.
pub struct SnapshotLoader {
    host: Arc<dyn HostPlatform>,
}

impl SnapshotLoader {
    pub fn new(host: Arc<dyn HostPlatform>) -> Self {
        Self { host }
    }

    /// Full load: tabs and bookmarks, read concurrently.
    pub async fn load_snapshot(&self) -> Snapshot {
        let (tabs, tree) = tokio::join!(self.host.query_tabs(), self.host.get_bookmark_tree());
        let mut snapshot = Snapshot::default();
        Self::apply_tabs(&mut snapshot, tabs);

        match tree {
            Ok(root) => snapshot.bookmark_roots = Self::top_level(root),
            Err(e) => {
                tracing::warn!(error = %e, "bookmark tree load failed; showing tabs only");
                snapshot.failures.push(LoadFailure {
                    part: SnapshotPart::Bookmarks,
                    reason: e.to_string(),
                });
            }
        }
        snapshot
    }

    /// Fast load: refetches tabs and reuses `previous` bookmarks.
    ///
    /// Used after the panel's own tab mutations, where the bookmark tree is
    /// known not to have changed.
    pub async fn load_tabs_only(&self, previous: &Snapshot) -> Snapshot {
        let mut snapshot = Snapshot {
            bookmark_roots: previous.bookmark_roots.clone(),
            failures: previous
                .failures
                .iter()
                .filter(|f| f.part == SnapshotPart::Bookmarks)
                .cloned()
                .collect(),
            ..Snapshot::default()
        };
        Self::apply_tabs(&mut snapshot, self.host.query_tabs().await);
        snapshot
    }

    fn apply_tabs(snapshot: &mut Snapshot, tabs: Result<Vec<Tab>, HostError>) {
        match tabs {
            Ok(tabs) => {
                let (pinned, groups) = partition_tabs(tabs);
                snapshot.pinned_tabs = pinned;
                snapshot.open_tabs_by_window = groups;
            }
            Err(e) => {
                tracing::warn!(error = %e, "tab query failed; showing bookmarks only");
                snapshot.failures.push(LoadFailure {
                    part: SnapshotPart::Tabs,
                    reason: e.to_string(),
                });
            }
        }
    }

    /// The panel shows the root's children, never the root itself.
    fn top_level(root: BookmarkNode) -> Vec<BookmarkNode> {
        match root {
            BookmarkNode::Folder(folder) => folder.children,
            BookmarkNode::Leaf(_) => Vec::new(),
        }
    }
}
