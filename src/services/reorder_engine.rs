//! Reorder Engine.
//!
//! Interprets a finished drag gesture against the current host order and
//! computes the single move request to send, or the reason to send nothing.
//!
//! Tabs are moved by per-window index. The host removes the tab before
//! reinserting it, so a target index past the source shifts left by one.
//!
//! Bookmarks are reparented. Dropping onto a folder (anything but its lower
//! half) files the node as the folder's first child; every other drop places
//! it next to the target among the target's siblings. A folder can never be
//! moved below itself.

use std::collections::HashMap;

use crate::types::bookmark::{BookmarkDestination, BookmarkNode};
use crate::types::drag::{DragContext, DropSide, EntityId, EntityKind, MoveRequest};
use crate::types::errors::InvalidMove;
use crate::types::snapshot::Snapshot;
use crate::types::tab::{TabId, WindowId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabPosition {
    pub tab_id: TabId,
    pub window_id: WindowId,
    pub index: usize,
    pub pinned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkPosition {
    pub id: String,
    pub parent_id: Option<String>,
    pub index: usize,
    pub is_folder: bool,
}

/// Positions of every entity in one snapshot, indexed for the engine.
#[derive(Debug, Clone, Default)]
pub struct EntityOrder {
    tabs: HashMap<TabId, TabPosition>,
    bookmarks: HashMap<String, BookmarkPosition>,
    siblings: HashMap<Option<String>, Vec<String>>,
}

impl EntityOrder {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut order = Self::default();
        for tab in snapshot.all_tabs() {
            order.tabs.insert(
                tab.id,
                TabPosition {
                    tab_id: tab.id,
                    window_id: tab.window_id,
                    index: tab.index,
                    pinned: tab.pinned,
                },
            );
        }
        for root in &snapshot.bookmark_roots {
            order.index_bookmark(root);
        }
        order
    }

    fn index_bookmark(&mut self, node: &BookmarkNode) {
        let parent = node.parent_id().map(str::to_string);
        self.siblings
            .entry(parent.clone())
            .or_default()
            .push(node.id().to_string());
        self.bookmarks.insert(
            node.id().to_string(),
            BookmarkPosition {
                id: node.id().to_string(),
                parent_id: parent,
                index: node.index(),
                is_folder: node.is_folder(),
            },
        );
        for child in node.children() {
            self.index_bookmark(child);
        }
    }

    pub fn tab(&self, tab_id: TabId) -> Option<&TabPosition> {
        self.tabs.get(&tab_id)
    }

    pub fn bookmark(&self, id: &str) -> Option<&BookmarkPosition> {
        self.bookmarks.get(id)
    }

    /// Children of `parent_id` in visual order.
    pub fn siblings(&self, parent_id: Option<&str>) -> &[String] {
        self.siblings
            .get(&parent_id.map(str::to_string))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Kind of an entity as it appears in this order, if present.
    pub fn kind_of(&self, id: &EntityId) -> Option<EntityKind> {
        match id {
            EntityId::Tab(tab_id) => self.tab(*tab_id).map(|t| {
                if t.pinned {
                    EntityKind::PinnedTab
                } else {
                    EntityKind::Tab
                }
            }),
            EntityId::Bookmark(bid) => self.bookmark(bid).map(|b| {
                if b.is_folder {
                    EntityKind::BookmarkFolder
                } else {
                    EntityKind::BookmarkLeaf
                }
            }),
        }
    }

    /// Walks the parent chain of `id`, nearest ancestor first.
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = self.bookmark(id).and_then(|b| b.parent_id.clone());
        while let Some(parent) = current {
            // A malformed tree must not loop forever.
            if chain.len() > self.bookmarks.len() || chain.contains(&parent) {
                break;
            }
            current = self.bookmark(&parent).and_then(|b| b.parent_id.clone());
            chain.push(parent);
        }
        chain
    }

    /// True if `node_id` is `ancestor_id` or sits anywhere below it.
    pub fn is_within(&self, node_id: &str, ancestor_id: &str) -> bool {
        node_id == ancestor_id || self.ancestors(node_id).iter().any(|a| a == ancestor_id)
    }
}

/// Index arithmetic for a tab drop.
///
/// `Below` aims one past the target. Within one window the host removes the
/// source before reinserting, so an aim past the source is pulled back by one.
pub fn tab_target_index(source_index: usize, target_index: usize, side: DropSide, same_window: bool) -> usize {
    let mut want = match side {
        DropSide::Below => target_index + 1,
        DropSide::Above | DropSide::Into => target_index,
    };
    if same_window && source_index < want {
        want -= 1;
    }
    want
}

/// Computes the host request for a finished drag, or why there is none.
pub fn compute_move(ctx: &DragContext, order: &EntityOrder) -> Result<MoveRequest, InvalidMove> {
    let target = ctx
        .drop_target_id
        .as_ref()
        .ok_or(InvalidMove::MissingDropTarget)?;
    let side = ctx.drop_side.unwrap_or(DropSide::Above);

    if *target == ctx.source_id {
        return Err(InvalidMove::SelfDrop);
    }

    let source_kind = order
        .kind_of(&ctx.source_id)
        .ok_or_else(|| InvalidMove::UnknownEntity(ctx.source_id.to_string()))?;
    if source_kind != ctx.kind {
        // Pinned state or folder-ness changed since the drag started.
        return Err(InvalidMove::UnknownEntity(ctx.source_id.to_string()));
    }
    let target_kind = order
        .kind_of(target)
        .ok_or_else(|| InvalidMove::UnknownEntity(target.to_string()))?;
    if !ctx.kind.accepts_drop_on(target_kind) {
        return Err(InvalidMove::IncompatibleKinds);
    }

    match (&ctx.source_id, target) {
        (EntityId::Tab(source), EntityId::Tab(target)) => tab_move(order, *source, *target, side),
        (EntityId::Bookmark(source), EntityId::Bookmark(target)) => {
            bookmark_move(order, source, target, side)
        }
        _ => Err(InvalidMove::IncompatibleKinds),
    }
}

fn tab_move(order: &EntityOrder, source: TabId, target: TabId, side: DropSide) -> Result<MoveRequest, InvalidMove> {
    let src = order
        .tab(source)
        .ok_or_else(|| InvalidMove::UnknownEntity(EntityId::Tab(source).to_string()))?;
    let tgt = order
        .tab(target)
        .ok_or_else(|| InvalidMove::UnknownEntity(EntityId::Tab(target).to_string()))?;

    let same_window = src.window_id == tgt.window_id;
    let index = tab_target_index(src.index, tgt.index, side, same_window);
    if same_window && index == src.index {
        return Err(InvalidMove::NoChange);
    }

    Ok(MoveRequest::Tab {
        tab_id: source,
        window_id: tgt.window_id,
        index,
    })
}

fn bookmark_move(order: &EntityOrder, source: &str, target: &str, side: DropSide) -> Result<MoveRequest, InvalidMove> {
    let src = order
        .bookmark(source)
        .ok_or_else(|| InvalidMove::UnknownEntity(source.to_string()))?;
    let tgt = order
        .bookmark(target)
        .ok_or_else(|| InvalidMove::UnknownEntity(target.to_string()))?;

    if order.is_within(target, source) {
        return Err(InvalidMove::DescendantCycle);
    }

    let destination = if tgt.is_folder && side != DropSide::Below {
        BookmarkDestination {
            parent_id: tgt.id.clone(),
            index: 0,
        }
    } else {
        let parent_id = tgt
            .parent_id
            .clone()
            .ok_or_else(|| InvalidMove::UnknownEntity(target.to_string()))?;
        let position = order
            .siblings(Some(parent_id.as_str()))
            .iter()
            .position(|id| id == target)
            .ok_or_else(|| InvalidMove::UnknownEntity(target.to_string()))?;
        let index = match side {
            DropSide::Below => position + 1,
            DropSide::Above | DropSide::Into => position,
        };
        BookmarkDestination { parent_id, index }
    };

    // Destination indices name slots before the source is lifted out, so the
    // slot right after the source is also its current position.
    let same_parent = src.parent_id.as_deref() == Some(destination.parent_id.as_str());
    if same_parent && (destination.index == src.index || destination.index == src.index + 1) {
        return Err(InvalidMove::NoChange);
    }

    Ok(MoveRequest::Bookmark {
        bookmark_id: source.to_string(),
        destination,
    })
}
