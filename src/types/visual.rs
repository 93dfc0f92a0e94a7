use serde::{Deserialize, Serialize};

use super::drag::{EntityId, EntityKind};
use super::tab::{TabId, WindowId};

/// A tab row, used both in the pinned strip and in the open-tab list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabEntry {
    pub tab_id: TabId,
    pub window_id: WindowId,
    pub title: String,
    pub favicon_url: Option<String>,
    pub highlighted: bool,
}

/// Toggle state a folder row exposes for interaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FolderToggle {
    Collapsed,
    Expanded,
}

impl FolderToggle {
    pub fn from_collapsed(collapsed: bool) -> Self {
        if collapsed {
            FolderToggle::Collapsed
        } else {
            FolderToggle::Expanded
        }
    }

    pub fn is_collapsed(self) -> bool {
        self == FolderToggle::Collapsed
    }

    pub fn glyph(self) -> &'static str {
        match self {
            FolderToggle::Collapsed => "▶",
            FolderToggle::Expanded => "▼",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderEntry {
    pub bookmark_id: String,
    pub title: String,
    pub depth: usize,
    pub toggle: FolderToggle,
    pub child_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkEntry {
    pub bookmark_id: String,
    pub title: String,
    pub url: String,
    pub depth: usize,
    pub highlighted: bool,
}

/// One row of the unified list below the pinned strip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisualEntry {
    Tab(TabEntry),
    Folder(FolderEntry),
    Bookmark(BookmarkEntry),
}

impl VisualEntry {
    pub fn entity_id(&self) -> EntityId {
        match self {
            VisualEntry::Tab(t) => EntityId::Tab(t.tab_id),
            VisualEntry::Folder(f) => EntityId::Bookmark(f.bookmark_id.clone()),
            VisualEntry::Bookmark(b) => EntityId::Bookmark(b.bookmark_id.clone()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            VisualEntry::Tab(_) => EntityKind::Tab,
            VisualEntry::Folder(_) => EntityKind::BookmarkFolder,
            VisualEntry::Bookmark(_) => EntityKind::BookmarkLeaf,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        match self {
            VisualEntry::Tab(t) => t.highlighted,
            VisualEntry::Bookmark(b) => b.highlighted,
            VisualEntry::Folder(_) => false,
        }
    }
}

/// The structure handed to the presentation layer after each rebuild.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisualList {
    pub pinned: Vec<TabEntry>,
    pub entries: Vec<VisualEntry>,
}

impl VisualList {
    /// True when there is nothing to show; the presentation layer renders a placeholder.
    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.entries.is_empty()
    }

    pub fn tab_entries(&self) -> impl Iterator<Item = &TabEntry> {
        self.entries.iter().filter_map(|e| match e {
            VisualEntry::Tab(t) => Some(t),
            _ => None,
        })
    }

    /// Number of folder and leaf rows currently visible.
    pub fn bookmark_entry_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind().is_bookmark())
            .count()
    }

    pub fn folder(&self, bookmark_id: &str) -> Option<&FolderEntry> {
        self.entries.iter().find_map(|e| match e {
            VisualEntry::Folder(f) if f.bookmark_id == bookmark_id => Some(f),
            _ => None,
        })
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        match id {
            EntityId::Tab(tab_id) => {
                self.pinned.iter().any(|p| p.tab_id == *tab_id)
                    || self.tab_entries().any(|t| t.tab_id == *tab_id)
            }
            EntityId::Bookmark(_) => self.entries.iter().any(|e| &e.entity_id() == id),
        }
    }

    /// Moves the highlight to `id`, clearing every other row. Returns false
    /// when `id` is not visible.
    pub fn highlight(&mut self, id: &EntityId) -> bool {
        if !self.contains(id) {
            return false;
        }
        for pinned in &mut self.pinned {
            pinned.highlighted = matches!(id, EntityId::Tab(t) if *t == pinned.tab_id);
        }
        for entry in &mut self.entries {
            let is_target = entry.entity_id() == *id;
            match entry {
                VisualEntry::Tab(t) => t.highlighted = is_target,
                VisualEntry::Bookmark(b) => b.highlighted = is_target,
                VisualEntry::Folder(_) => {}
            }
        }
        true
    }

    pub fn highlighted(&self) -> Vec<EntityId> {
        self.pinned
            .iter()
            .filter(|p| p.highlighted)
            .map(|p| EntityId::Tab(p.tab_id))
            .chain(
                self.entries
                    .iter()
                    .filter(|e| e.is_highlighted())
                    .map(|e| e.entity_id()),
            )
            .collect()
    }
}
