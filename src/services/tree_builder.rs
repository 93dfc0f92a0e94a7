//! Tree/List Builder.
//!
//! Pure transformation of a [`Snapshot`] and a [`CollapseState`] into the
//! [`VisualList`] the presentation layer paints. Folder toggles are derived
//! from the collapse state alone, so a folder keeps its state across full
//! rebuilds.

use crate::managers::collapse_store::CollapseState;
use crate::types::bookmark::BookmarkNode;
use crate::types::snapshot::Snapshot;
use crate::types::tab::Tab;
use crate::types::visual::{BookmarkEntry, FolderEntry, FolderToggle, TabEntry, VisualEntry, VisualList};

/// Builds the visual list: pinned strip, open tabs window by window, then the
/// bookmark roots with every expanded folder's children inlined below it.
pub fn build(snapshot: &Snapshot, collapse: &CollapseState) -> VisualList {
    let pinned = snapshot.pinned_tabs.iter().map(tab_entry).collect();

    let mut entries: Vec<VisualEntry> = snapshot
        .open_tabs()
        .map(|t| VisualEntry::Tab(tab_entry(t)))
        .collect();

    for root in &snapshot.bookmark_roots {
        push_bookmark(&mut entries, root, 0, collapse);
    }

    VisualList { pinned, entries }
}

fn tab_entry(tab: &Tab) -> TabEntry {
    TabEntry {
        tab_id: tab.id,
        window_id: tab.window_id,
        title: tab.display_title().to_string(),
        favicon_url: tab.favicon_url.clone(),
        highlighted: tab.active,
    }
}

fn push_bookmark(
    entries: &mut Vec<VisualEntry>,
    node: &BookmarkNode,
    depth: usize,
    collapse: &CollapseState,
) {
    match node {
        BookmarkNode::Folder(folder) => {
            let toggle = FolderToggle::from_collapsed(collapse.is_collapsed(&folder.id));
            entries.push(VisualEntry::Folder(FolderEntry {
                bookmark_id: folder.id.clone(),
                title: folder.title.clone(),
                depth,
                toggle,
                child_count: folder.children.len(),
            }));
            if !toggle.is_collapsed() {
                for child in &folder.children {
                    push_bookmark(entries, child, depth + 1, collapse);
                }
            }
        }
        BookmarkNode::Leaf(leaf) => entries.push(VisualEntry::Bookmark(BookmarkEntry {
            bookmark_id: leaf.id.clone(),
            title: leaf.title.clone(),
            url: leaf.url.clone(),
            depth,
            highlighted: false,
        })),
    }
}
