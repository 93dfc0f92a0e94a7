use std::fmt;

use serde::{Deserialize, Serialize};

use super::bookmark::BookmarkDestination;
use super::tab::{TabId, WindowId};

/// The four kinds of draggable entities shown in the panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    PinnedTab,
    Tab,
    BookmarkLeaf,
    BookmarkFolder,
}

impl EntityKind {
    pub fn is_bookmark(self) -> bool {
        matches!(self, EntityKind::BookmarkLeaf | EntityKind::BookmarkFolder)
    }

    /// Whether an entity of kind `self` may be dropped onto one of kind `target`.
    pub fn accepts_drop_on(self, target: EntityKind) -> bool {
        match self {
            EntityKind::PinnedTab => target == EntityKind::PinnedTab,
            EntityKind::Tab => target == EntityKind::Tab,
            EntityKind::BookmarkLeaf | EntityKind::BookmarkFolder => target.is_bookmark(),
        }
    }
}

/// Identity of a panel entity. Tabs use host integers, bookmarks host strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum EntityId {
    Tab(TabId),
    Bookmark(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Tab(id) => write!(f, "tab:{}", id),
            EntityId::Bookmark(id) => write!(f, "bookmark:{}", id),
        }
    }
}

/// Where, relative to the drop target, the pointer was released.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DropSide {
    Above,
    Below,
    Into,
}

/// A drag gesture in flight. Lives from drag start until drag end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DragContext {
    pub kind: EntityKind,
    pub source_id: EntityId,
    pub drop_target_id: Option<EntityId>,
    pub drop_side: Option<DropSide>,
}

impl DragContext {
    pub fn new(kind: EntityKind, source_id: EntityId) -> Self {
        Self {
            kind,
            source_id,
            drop_target_id: None,
            drop_side: None,
        }
    }

    pub fn with_target(mut self, target: EntityId, side: DropSide) -> Self {
        self.drop_target_id = Some(target);
        self.drop_side = Some(side);
        self
    }
}

/// A host mutation computed from a completed drag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveRequest {
    /// Move a tab to `index` within `window_id` (host semantics: remove, then reinsert).
    Tab {
        tab_id: TabId,
        window_id: WindowId,
        index: usize,
    },
    /// Reparent a bookmark node.
    Bookmark {
        bookmark_id: String,
        destination: BookmarkDestination,
    },
}
