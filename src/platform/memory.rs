//! In-process host platform.
//!
//! Keeps windows, tabs and a bookmark tree in memory with the same ordering
//! rules a browser applies: per-window contiguous tab indices, pinned tabs
//! ahead of unpinned ones, and bookmark indices counted among siblings.
//! Records every call it receives so tests can assert what the panel issued,
//! and can be told to fail reads or mutations.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{HostEvent, HostPlatform};
use crate::types::bookmark::{BookmarkDestination, BookmarkFolder, BookmarkLeaf, BookmarkNode};
use crate::types::errors::HostError;
use crate::types::tab::{Tab, TabId, TabUpdate, WindowId};

/// ID of the invisible bookmark root. The panel shows its children.
pub const ROOT_BOOKMARK_ID: &str = "0";

/// A request received by the host, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    QueryTabs,
    GetTab(TabId),
    MoveTab {
        tab_id: TabId,
        window_id: WindowId,
        index: usize,
    },
    UpdateTab {
        tab_id: TabId,
        update: TabUpdate,
    },
    RemoveTab(TabId),
    CreateTab(String),
    FocusWindow(WindowId),
    GetBookmarkTree,
    GetBookmark(String),
    GetBookmarkChildren(String),
    MoveBookmark {
        id: String,
        destination: BookmarkDestination,
    },
}

impl HostCall {
    /// Whether this call changes host state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            HostCall::MoveTab { .. }
                | HostCall::UpdateTab { .. }
                | HostCall::RemoveTab(_)
                | HostCall::CreateTab(_)
                | HostCall::FocusWindow(_)
                | HostCall::MoveBookmark { .. }
        )
    }
}

struct WindowState {
    id: WindowId,
    tabs: Vec<Tab>,
}

impl WindowState {
    fn reindex(&mut self) {
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            tab.index = i;
        }
    }

    fn pinned_count(&self) -> usize {
        self.tabs.iter().filter(|t| t.pinned).count()
    }

    /// Inserts `tab` at `index`, clamped so pinned tabs stay ahead of unpinned ones.
    fn insert_clamped(&mut self, tab: Tab, index: usize) {
        let pinned = self.pinned_count();
        let index = if tab.pinned {
            index.min(pinned)
        } else {
            index.clamp(pinned, self.tabs.len())
        };
        self.tabs.insert(index, tab);
        self.reindex();
    }
}

struct NodeRecord {
    parent_id: Option<String>,
    title: String,
    url: Option<String>,
    children: Vec<String>,
}

#[derive(Default)]
struct HostState {
    windows: Vec<WindowState>,
    focused_window: Option<WindowId>,
    next_tab_id: TabId,
    next_window_id: WindowId,
    nodes: HashMap<String, NodeRecord>,
    next_bookmark_id: u64,
    fail_tab_reads: bool,
    fail_bookmark_reads: bool,
    fail_mutations: bool,
    calls: Vec<HostCall>,
    subscribers: Vec<UnboundedSender<HostEvent>>,
}

impl HostState {
    fn emit(&mut self, event: HostEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn check_mutations(&self) -> Result<(), HostError> {
        if self.fail_mutations {
            return Err(HostError::Rejected("mutations disabled".to_string()));
        }
        Ok(())
    }

    fn locate_tab(&self, tab_id: TabId) -> Result<(usize, usize), HostError> {
        self.windows
            .iter()
            .enumerate()
            .find_map(|(w, win)| {
                win.tabs
                    .iter()
                    .position(|t| t.id == tab_id)
                    .map(|pos| (w, pos))
            })
            .ok_or(HostError::TabNotFound(tab_id))
    }

    fn window_slot(&self, window_id: WindowId) -> Result<usize, HostError> {
        self.windows
            .iter()
            .position(|w| w.id == window_id)
            .ok_or(HostError::WindowNotFound(window_id))
    }

    fn node(&self, id: &str) -> Result<&NodeRecord, HostError> {
        self.nodes
            .get(id)
            .ok_or_else(|| HostError::BookmarkNotFound(id.to_string()))
    }

    fn node_index(&self, id: &str) -> usize {
        self.nodes
            .get(id)
            .and_then(|n| n.parent_id.as_deref())
            .and_then(|p| self.nodes.get(p))
            .and_then(|p| p.children.iter().position(|c| c == id))
            .unwrap_or(0)
    }

    fn build_node(&self, id: &str, deep: bool) -> Result<BookmarkNode, HostError> {
        let record = self.node(id)?;
        let index = self.node_index(id);
        match &record.url {
            Some(url) => Ok(BookmarkNode::Leaf(BookmarkLeaf {
                id: id.to_string(),
                parent_id: record.parent_id.clone().unwrap_or_default(),
                index,
                title: record.title.clone(),
                url: url.clone(),
            })),
            None => {
                let children = if deep {
                    record
                        .children
                        .iter()
                        .map(|c| self.build_node(c, true))
                        .collect::<Result<Vec<_>, _>>()?
                } else {
                    Vec::new()
                };
                Ok(BookmarkNode::Folder(BookmarkFolder {
                    id: id.to_string(),
                    parent_id: record.parent_id.clone(),
                    index,
                    title: record.title.clone(),
                    children,
                }))
            }
        }
    }

    /// True when `id` is `ancestor` or lies somewhere below it.
    fn is_within(&self, id: &str, ancestor: &str) -> bool {
        let mut current = Some(id.to_string());
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.nodes.get(&cur).and_then(|n| n.parent_id.clone());
        }
        false
    }

    fn activate(&mut self, w: usize, pos: usize) -> HostEvent {
        let window = &mut self.windows[w];
        for (i, tab) in window.tabs.iter_mut().enumerate() {
            tab.active = i == pos;
        }
        HostEvent::TabActivated {
            tab_id: window.tabs[pos].id,
            window_id: window.id,
        }
    }
}

/// Host platform kept entirely in memory.
pub struct InMemoryHost {
    state: Mutex<HostState>,
}

impl InMemoryHost {
    /// Creates an empty host with only the bookmark root.
    pub fn new() -> Self {
        let mut state = HostState {
            next_tab_id: 1,
            next_window_id: 1,
            next_bookmark_id: 1,
            ..HostState::default()
        };
        state.nodes.insert(
            ROOT_BOOKMARK_ID.to_string(),
            NodeRecord {
                parent_id: None,
                title: String::new(),
                url: None,
                children: Vec::new(),
            },
        );
        Self {
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a new empty window and focuses it.
    pub fn add_window(&self) -> WindowId {
        let mut state = self.state();
        let id = state.next_window_id;
        state.next_window_id += 1;
        state.windows.push(WindowState {
            id,
            tabs: Vec::new(),
        });
        state.focused_window = Some(id);
        id
    }

    /// Seeds a tab at the end of its section without emitting events.
    /// The first tab of a window becomes its active tab.
    pub fn add_tab(&self, window_id: WindowId, title: &str, url: &str, pinned: bool) -> TabId {
        let mut state = self.state();
        let id = state.next_tab_id;
        state.next_tab_id += 1;
        let slot = match state.window_slot(window_id) {
            Ok(slot) => slot,
            Err(_) => {
                state.windows.push(WindowState {
                    id: window_id,
                    tabs: Vec::new(),
                });
                state.next_window_id = state.next_window_id.max(window_id + 1);
                state.windows.len() - 1
            }
        };
        let window = &mut state.windows[slot];
        let tab = Tab {
            id,
            window_id,
            index: 0,
            pinned,
            active: window.tabs.is_empty(),
            title: title.to_string(),
            url: url.to_string(),
            favicon_url: None,
        };
        let end = window.tabs.len();
        window.insert_clamped(tab, end);
        id
    }

    /// Seeds a folder as the last child of `parent_id` without emitting events.
    pub fn add_folder(&self, parent_id: &str, title: &str) -> String {
        self.add_node(parent_id, title, None)
    }

    /// Seeds a bookmark leaf as the last child of `parent_id` without emitting events.
    pub fn add_bookmark(&self, parent_id: &str, title: &str, url: &str) -> String {
        self.add_node(parent_id, title, Some(url.to_string()))
    }

    fn add_node(&self, parent_id: &str, title: &str, url: Option<String>) -> String {
        let mut state = self.state();
        let id = state.next_bookmark_id.to_string();
        state.next_bookmark_id += 1;
        state.nodes.insert(
            id.clone(),
            NodeRecord {
                parent_id: Some(parent_id.to_string()),
                title: title.to_string(),
                url,
                children: Vec::new(),
            },
        );
        if let Some(parent) = state.nodes.get_mut(parent_id) {
            parent.children.push(id.clone());
        }
        id
    }

    /// Removes a bookmark subtree, emitting `BookmarkRemoved`.
    pub fn remove_bookmark(&self, id: &str) {
        let mut state = self.state();
        let parent = state.nodes.get(id).and_then(|n| n.parent_id.clone());
        let mut stack = vec![id.to_string()];
        while let Some(cur) = stack.pop() {
            if let Some(record) = state.nodes.remove(&cur) {
                stack.extend(record.children);
            }
        }
        if let Some(parent_id) = parent {
            if let Some(parent) = state.nodes.get_mut(&parent_id) {
                parent.children.retain(|c| c != id);
            }
        }
        state.emit(HostEvent::BookmarkRemoved { id: id.to_string() });
    }

    /// Publishes an arbitrary event to all subscribers.
    pub fn emit(&self, event: HostEvent) {
        self.state().emit(event);
    }

    pub fn set_fail_tab_reads(&self, fail: bool) {
        self.state().fail_tab_reads = fail;
    }

    pub fn set_fail_bookmark_reads(&self, fail: bool) {
        self.state().fail_bookmark_reads = fail;
    }

    pub fn set_fail_mutations(&self, fail: bool) {
        self.state().fail_mutations = fail;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state().calls.clone()
    }

    pub fn mutation_calls(&self) -> Vec<HostCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.state().focused_window
    }

    /// Tab IDs of one window in index order.
    pub fn tab_order(&self, window_id: WindowId) -> Vec<TabId> {
        let state = self.state();
        state
            .windows
            .iter()
            .find(|w| w.id == window_id)
            .map(|w| w.tabs.iter().map(|t| t.id).collect())
            .unwrap_or_default()
    }

    /// Child IDs of a bookmark folder in index order.
    pub fn bookmark_children(&self, parent_id: &str) -> Vec<String> {
        self.state()
            .nodes
            .get(parent_id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostPlatform for InMemoryHost {
    async fn query_tabs(&self) -> Result<Vec<Tab>, HostError> {
        let mut state = self.state();
        state.calls.push(HostCall::QueryTabs);
        if state.fail_tab_reads {
            return Err(HostError::Unavailable("tab query failed".to_string()));
        }
        Ok(state
            .windows
            .iter()
            .flat_map(|w| w.tabs.iter().cloned())
            .collect())
    }

    async fn get_tab(&self, tab_id: TabId) -> Result<Tab, HostError> {
        let mut state = self.state();
        state.calls.push(HostCall::GetTab(tab_id));
        if state.fail_tab_reads {
            return Err(HostError::Unavailable("tab query failed".to_string()));
        }
        let (w, pos) = state.locate_tab(tab_id)?;
        Ok(state.windows[w].tabs[pos].clone())
    }

    async fn move_tab(
        &self,
        tab_id: TabId,
        window_id: WindowId,
        index: usize,
    ) -> Result<(), HostError> {
        let mut state = self.state();
        state.calls.push(HostCall::MoveTab {
            tab_id,
            window_id,
            index,
        });
        state.check_mutations()?;
        let target = state.window_slot(window_id)?;
        let (w, pos) = state.locate_tab(tab_id)?;
        let mut tab = state.windows[w].tabs.remove(pos);
        state.windows[w].reindex();
        tab.window_id = window_id;
        if w != target {
            tab.active = false;
        }
        state.windows[target].insert_clamped(tab, index);
        Ok(())
    }

    async fn update_tab(&self, tab_id: TabId, update: TabUpdate) -> Result<(), HostError> {
        let mut state = self.state();
        state.calls.push(HostCall::UpdateTab { tab_id, update });
        state.check_mutations()?;
        let (w, pos) = state.locate_tab(tab_id)?;

        if let Some(pinned) = update.pinned {
            if state.windows[w].tabs[pos].pinned != pinned {
                let window = &mut state.windows[w];
                let mut tab = window.tabs.remove(pos);
                tab.pinned = pinned;
                // Pinning appends to the pinned block, unpinning leads the unpinned block.
                let index = window.pinned_count();
                window.tabs.insert(index, tab);
                window.reindex();
                state.emit(HostEvent::TabUpdated { tab_id });
            }
        }

        if update.active == Some(true) {
            let (w, pos) = state.locate_tab(tab_id)?;
            let event = state.activate(w, pos);
            state.emit(event);
        }
        Ok(())
    }

    async fn remove_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        let mut state = self.state();
        state.calls.push(HostCall::RemoveTab(tab_id));
        state.check_mutations()?;
        let (w, pos) = state.locate_tab(tab_id)?;
        let removed = state.windows[w].tabs.remove(pos);
        state.windows[w].reindex();
        state.emit(HostEvent::TabRemoved { tab_id });

        if state.windows[w].tabs.is_empty() {
            let window_id = state.windows.remove(w).id;
            if state.focused_window == Some(window_id) {
                state.focused_window = state.windows.first().map(|win| win.id);
            }
        } else if removed.active {
            let next = pos.min(state.windows[w].tabs.len() - 1);
            let event = state.activate(w, next);
            state.emit(event);
        }
        Ok(())
    }

    async fn create_tab(&self, url: &str) -> Result<Tab, HostError> {
        let mut state = self.state();
        state.calls.push(HostCall::CreateTab(url.to_string()));
        state.check_mutations()?;

        let slot = match state.focused_window.and_then(|id| state.window_slot(id).ok()) {
            Some(slot) => slot,
            None if !state.windows.is_empty() => 0,
            None => {
                let id = state.next_window_id;
                state.next_window_id += 1;
                state.windows.push(WindowState {
                    id,
                    tabs: Vec::new(),
                });
                state.focused_window = Some(id);
                state.windows.len() - 1
            }
        };

        let id = state.next_tab_id;
        state.next_tab_id += 1;
        let window = &mut state.windows[slot];
        let tab = Tab {
            id,
            window_id: window.id,
            index: window.tabs.len(),
            pinned: false,
            active: false,
            title: url.to_string(),
            url: url.to_string(),
            favicon_url: None,
        };
        window.tabs.push(tab);
        let pos = window.tabs.len() - 1;
        state.emit(HostEvent::TabCreated { tab_id: id });
        let event = state.activate(slot, pos);
        state.emit(event);
        Ok(state.windows[slot].tabs[pos].clone())
    }

    async fn focus_window(&self, window_id: WindowId) -> Result<(), HostError> {
        let mut state = self.state();
        state.calls.push(HostCall::FocusWindow(window_id));
        state.check_mutations()?;
        state.window_slot(window_id)?;
        state.focused_window = Some(window_id);
        Ok(())
    }

    async fn get_bookmark_tree(&self) -> Result<BookmarkNode, HostError> {
        let mut state = self.state();
        state.calls.push(HostCall::GetBookmarkTree);
        if state.fail_bookmark_reads {
            return Err(HostError::Unavailable("bookmark tree failed".to_string()));
        }
        state.build_node(ROOT_BOOKMARK_ID, true)
    }

    async fn get_bookmark(&self, id: &str) -> Result<BookmarkNode, HostError> {
        let mut state = self.state();
        state.calls.push(HostCall::GetBookmark(id.to_string()));
        if state.fail_bookmark_reads {
            return Err(HostError::Unavailable("bookmark lookup failed".to_string()));
        }
        state.build_node(id, false)
    }

    async fn get_bookmark_children(&self, parent_id: &str) -> Result<Vec<BookmarkNode>, HostError> {
        let mut state = self.state();
        state
            .calls
            .push(HostCall::GetBookmarkChildren(parent_id.to_string()));
        if state.fail_bookmark_reads {
            return Err(HostError::Unavailable("bookmark lookup failed".to_string()));
        }
        state
            .node(parent_id)?
            .children
            .iter()
            .map(|c| state.build_node(c, false))
            .collect()
    }

    async fn move_bookmark(
        &self,
        id: &str,
        destination: BookmarkDestination,
    ) -> Result<(), HostError> {
        let mut state = self.state();
        state.calls.push(HostCall::MoveBookmark {
            id: id.to_string(),
            destination: destination.clone(),
        });
        state.check_mutations()?;

        if id == ROOT_BOOKMARK_ID {
            return Err(HostError::Rejected("cannot move the root".to_string()));
        }
        let old_parent = state
            .node(id)?
            .parent_id
            .clone()
            .ok_or_else(|| HostError::Rejected("node has no parent".to_string()))?;
        if state.node(&destination.parent_id)?.url.is_some() {
            return Err(HostError::Rejected(format!(
                "{} is not a folder",
                destination.parent_id
            )));
        }
        if state.is_within(&destination.parent_id, id) {
            return Err(HostError::Rejected(
                "cannot move folder into its own descendant".to_string(),
            ));
        }

        let old_index = state.node_index(id);
        // The index names a slot in the sibling list as it was before the move.
        let mut index = destination.index;
        if old_parent == destination.parent_id && index > old_index {
            index -= 1;
        }
        if let Some(parent) = state.nodes.get_mut(&old_parent) {
            parent.children.retain(|c| c != id);
        }
        if let Some(parent) = state.nodes.get_mut(&destination.parent_id) {
            let index = index.min(parent.children.len());
            parent.children.insert(index, id.to_string());
        }
        if let Some(node) = state.nodes.get_mut(id) {
            node.parent_id = Some(destination.parent_id.clone());
        }
        state.emit(HostEvent::BookmarkMoved { id: id.to_string() });
        Ok(())
    }

    fn subscribe(&self) -> UnboundedReceiver<HostEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state().subscribers.push(tx);
        rx
    }
}
