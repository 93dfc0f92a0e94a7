//! Panel controller for Tabdeck.
//!
//! Owns every piece of panel state and reconciles it with the host. The
//! controller is the single writer: host events and user intents are applied
//! one at a time, and every rebuild starts from a fresh host snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;

use crate::database::{Database, KeyValueStore, SqliteStore};
use crate::managers::collapse_store::{CollapseState, CollapseStore};
use crate::managers::drag_tracker::DragTracker;
use crate::managers::selection_manager::SelectionManager;
use crate::platform::{HostEvent, HostPlatform};
use crate::services::change_coalescer::{ChangeCoalescer, RefreshKind};
use crate::services::reorder_engine::{compute_move, EntityOrder};
use crate::services::snapshot_loader::SnapshotLoader;
use crate::services::tree_builder;
use crate::types::bookmark::BookmarkNode;
use crate::types::drag::{DragContext, DropSide, EntityId, EntityKind, MoveRequest};
use crate::types::errors::{HostError, InvalidMove, PanelError, StorageError};
use crate::types::intent::PanelIntent;
use crate::types::settings::{PanelSettings, StorageSettings};
use crate::types::snapshot::Snapshot;
use crate::types::tab::{TabId, TabUpdate};
use crate::types::visual::VisualList;

/// Opens the persistent state store named by `settings`, or the default file.
pub fn open_state_store(settings: &StorageSettings) -> Result<SqliteStore, StorageError> {
    let path = settings
        .database_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(Database::default_path);
    SqliteStore::open(&path)
}

/// The reconciler between host state and the visual list.
pub struct PanelController {
    host: Arc<dyn HostPlatform>,
    loader: SnapshotLoader,
    collapse: CollapseStore,
    drag: DragTracker,
    selection: SelectionManager,
    coalescer: ChangeCoalescer,
    snapshot: Snapshot,
    order: EntityOrder,
    view: VisualList,
    rebuilds: u64,
}

impl PanelController {
    pub fn new(
        host: Arc<dyn HostPlatform>,
        store: Arc<dyn KeyValueStore>,
        settings: &PanelSettings,
    ) -> Self {
        Self {
            loader: SnapshotLoader::new(host.clone()),
            host,
            collapse: CollapseStore::new(
                store,
                &settings.storage.folder_state_key,
                settings.bookmarks.default_folder_collapsed,
            ),
            drag: DragTracker::new(),
            selection: SelectionManager::new(),
            coalescer: ChangeCoalescer::from_settings(&settings.refresh),
            snapshot: Snapshot::default(),
            order: EntityOrder::default(),
            view: VisualList::default(),
            rebuilds: 0,
        }
    }

    /// Startup: restore folder states, then load and render the first snapshot.
    ///
    /// A storage failure is logged and the panel starts with default folder states.
    pub async fn start(&mut self) {
        if let Err(e) = self.collapse.load().await {
            tracing::warn!(error = %e, "could not restore folder states; using defaults");
        }
        self.refresh(RefreshKind::Full).await;
        tracing::info!(
            pinned = self.view.pinned.len(),
            entries = self.view.entries.len(),
            "panel started"
        );
    }

    pub fn view(&self) -> &VisualList {
        &self.view
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn collapse_state(&self) -> &CollapseState {
        self.collapse.state()
    }

    pub fn coalescer(&self) -> &ChangeCoalescer {
        &self.coalescer
    }

    pub fn drag_context(&self) -> Option<&DragContext> {
        self.drag.current()
    }

    /// Number of rebuilds from a host snapshot since creation.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    // === Refresh ===

    /// Reloads from the host and rebuilds. The rebuild is authoritative: any
    /// optimistic highlight is replaced by the host's active tab.
    pub async fn refresh(&mut self, kind: RefreshKind) {
        let snapshot = match kind {
            RefreshKind::Full => self.loader.load_snapshot().await,
            RefreshKind::Fast => self.loader.load_tabs_only(&self.snapshot).await,
        };
        self.order = EntityOrder::from_snapshot(&snapshot);
        self.snapshot = snapshot;
        self.view = tree_builder::build(&self.snapshot, self.collapse.state());
        self.selection.reconcile();
        self.rebuilds += 1;
        tracing::debug!(?kind, rebuild = self.rebuilds, "rebuilt visual list");
    }

    /// Re-renders the current snapshot after a local-only change, keeping
    /// the optimistic highlight.
    fn rerender(&mut self) {
        self.view = tree_builder::build(&self.snapshot, self.collapse.state());
        if let Some(id) = self.selection.pending() {
            self.view.highlight(id);
        }
    }

    /// Feeds a host notification to the coalescer.
    pub fn on_host_event(&mut self, event: &HostEvent, now: Instant) -> bool {
        self.coalescer.on_event(event, now)
    }

    /// Runs the pending refresh if its quiet window has elapsed.
    pub async fn run_due(&mut self, now: Instant) -> Option<RefreshKind> {
        let kind = self.coalescer.fire(now)?;
        self.refresh(kind).await;
        Some(kind)
    }

    // === Folders ===

    /// Flips a folder, re-renders immediately and persists the whole mapping.
    ///
    /// Returns the new collapsed state. A persistence failure is logged; the
    /// in-memory state keeps the toggle.
    pub async fn toggle_folder(&mut self, folder_id: &str) -> Result<bool, PanelError> {
        match self.order.bookmark(folder_id) {
            Some(node) if node.is_folder => {}
            _ => return Err(PanelError::StaleReference(folder_id.to_string())),
        }

        let collapsed = self.collapse.toggle(folder_id);
        self.rerender();

        if let Err(e) = self.collapse.persist().await {
            tracing::warn!(folder = folder_id, error = %e, "failed to persist folder state");
        }
        Ok(collapsed)
    }

    // === Selection and activation ===

    /// Highlights the tab at once, then asks the host to activate it and
    /// bring its window forward.
    pub async fn activate_tab(&mut self, tab_id: TabId) -> Result<(), PanelError> {
        let id = EntityId::Tab(tab_id);
        if !self.selection.select(id.clone(), &mut self.view) {
            return Err(PanelError::StaleReference(id.to_string()));
        }

        if let Err(e) = self.host.update_tab(tab_id, TabUpdate::activate()).await {
            self.revert_selection();
            return Err(e.into());
        }
        let tab = self.host.get_tab(tab_id).await?;
        self.host.focus_window(tab.window_id).await?;
        tracing::debug!(tab_id, window_id = tab.window_id, "tab activated");
        Ok(())
    }

    /// Highlights the bookmark at once and opens its URL in a new host tab.
    pub async fn activate_bookmark(&mut self, bookmark_id: &str) -> Result<TabId, PanelError> {
        let url = match self.snapshot.find_bookmark(bookmark_id) {
            Some(BookmarkNode::Leaf(leaf)) => leaf.url.clone(),
            _ => return Err(PanelError::StaleReference(bookmark_id.to_string())),
        };
        let id = EntityId::Bookmark(bookmark_id.to_string());
        if !self.selection.select(id.clone(), &mut self.view) {
            return Err(PanelError::StaleReference(id.to_string()));
        }

        let tab = match self.host.create_tab(&url).await {
            Ok(tab) => tab,
            Err(e) => {
                self.revert_selection();
                return Err(e.into());
            }
        };
        tracing::debug!(bookmark = bookmark_id, tab_id = tab.id, "bookmark opened");
        Ok(tab.id)
    }

    /// Drops an optimistic highlight the host refused and shows the
    /// snapshot's highlight again.
    fn revert_selection(&mut self) {
        self.selection.reconcile();
        self.rerender();
    }

    // === Tab actions ===

    pub async fn pin_tab(&mut self, tab_id: TabId) -> Result<(), PanelError> {
        self.set_pinned(tab_id, true).await
    }

    pub async fn unpin_tab(&mut self, tab_id: TabId) -> Result<(), PanelError> {
        self.set_pinned(tab_id, false).await
    }

    async fn set_pinned(&mut self, tab_id: TabId, pinned: bool) -> Result<(), PanelError> {
        if self.snapshot.find_tab(tab_id).is_none() {
            return Err(PanelError::StaleReference(EntityId::Tab(tab_id).to_string()));
        }
        self.host.update_tab(tab_id, TabUpdate::pin(pinned)).await?;
        self.coalescer.request(RefreshKind::Fast, Instant::now());
        Ok(())
    }

    /// Asks the host to close the tab. The row disappears with the rebuild
    /// that follows the host's removal notification.
    pub async fn close_tab(&mut self, tab_id: TabId) -> Result<(), PanelError> {
        if self.snapshot.find_tab(tab_id).is_none() {
            return Err(PanelError::StaleReference(EntityId::Tab(tab_id).to_string()));
        }
        self.host.remove_tab(tab_id).await?;
        Ok(())
    }

    // === Drag and drop ===

    /// Starts a drag. A drag already in progress is abandoned.
    pub fn begin_drag(&mut self, kind: EntityKind, source: EntityId) -> Result<(), PanelError> {
        if !self.view.contains(&source) {
            return Err(PanelError::StaleReference(source.to_string()));
        }
        self.drag.begin(kind, source);
        Ok(())
    }

    pub fn drag_over(&mut self, target: EntityId, side: DropSide) -> Result<(), PanelError> {
        self.drag.hover(target, side)
    }

    /// Ends the drag without a drop.
    pub fn end_drag(&mut self) {
        if let Some(ctx) = self.drag.finish() {
            tracing::trace!(source = %ctx.source_id, "drag cancelled");
        }
    }

    /// Completes the drag: computes the move and issues at most one host request.
    ///
    /// The drag context is cleared whatever the outcome.
    pub async fn complete_drag(&mut self) -> Result<MoveRequest, PanelError> {
        let ctx = self.drag.finish().ok_or(PanelError::NoActiveDrag)?;
        let request = compute_move(&ctx, &self.order).map_err(drop_error)?;

        match request {
            MoveRequest::Tab {
                tab_id,
                window_id,
                index,
            } => {
                self.host.move_tab(tab_id, window_id, index).await?;
                tracing::debug!(tab_id, window_id, index, "tab moved");
                self.coalescer.request(RefreshKind::Fast, Instant::now());
                Ok(request)
            }
            MoveRequest::Bookmark { .. } => self.drop_bookmark(&ctx, request).await,
        }
    }

    async fn drop_bookmark(
        &mut self,
        ctx: &DragContext,
        request: MoveRequest,
    ) -> Result<MoveRequest, PanelError> {
        let request = if self.bookmark_order_is_current(&request).await? {
            request
        } else {
            tracing::debug!(source = %ctx.source_id, "bookmark order changed under the drag; reloading");
            self.refresh(RefreshKind::Full).await;
            compute_move(ctx, &self.order).map_err(drop_error)?
        };

        if let MoveRequest::Bookmark {
            bookmark_id,
            destination,
        } = &request
        {
            self.host
                .move_bookmark(bookmark_id, destination.clone())
                .await?;
            tracing::debug!(
                bookmark = %bookmark_id,
                parent = %destination.parent_id,
                index = destination.index,
                "bookmark moved"
            );
            self.coalescer.request(RefreshKind::Full, Instant::now());
        }
        Ok(request)
    }

    /// Checks the snapshot positions a bookmark move was computed from
    /// against live host state.
    async fn bookmark_order_is_current(&self, request: &MoveRequest) -> Result<bool, PanelError> {
        let (source, destination) = match request {
            MoveRequest::Bookmark {
                bookmark_id,
                destination,
            } => (bookmark_id, destination),
            MoveRequest::Tab { .. } => return Ok(true),
        };

        let live = match self.host.get_bookmark(source).await {
            Ok(node) => node,
            Err(HostError::BookmarkNotFound(id)) => return Err(PanelError::StaleReference(id)),
            Err(e) => return Err(e.into()),
        };
        let source_current = self.order.bookmark(source).is_some_and(|known| {
            known.parent_id.as_deref() == live.parent_id() && known.index == live.index()
        });

        let siblings = match self.host.get_bookmark_children(&destination.parent_id).await {
            Ok(children) => children,
            Err(HostError::BookmarkNotFound(id)) => return Err(PanelError::StaleReference(id)),
            Err(e) => return Err(e.into()),
        };
        let siblings_current = siblings
            .iter()
            .map(BookmarkNode::id)
            .eq(self
                .order
                .siblings(Some(destination.parent_id.as_str()))
                .iter()
                .map(String::as_str));

        Ok(source_current && siblings_current)
    }

    // === Intents ===

    /// Applies one user intent.
    pub async fn handle_intent(&mut self, intent: PanelIntent) -> Result<(), PanelError> {
        match intent {
            PanelIntent::ActivateTab { tab_id } => self.activate_tab(tab_id).await,
            PanelIntent::ActivateBookmark { bookmark_id } => {
                self.activate_bookmark(&bookmark_id).await.map(|_| ())
            }
            PanelIntent::PinTab { tab_id } => self.pin_tab(tab_id).await,
            PanelIntent::UnpinTab { tab_id } => self.unpin_tab(tab_id).await,
            PanelIntent::CloseTab { tab_id } => self.close_tab(tab_id).await,
            PanelIntent::ToggleFolder { bookmark_id } => {
                self.toggle_folder(&bookmark_id).await.map(|_| ())
            }
            PanelIntent::DragStart { kind, source } => self.begin_drag(kind, source),
            PanelIntent::DragOver { target, side } => self.drag_over(target, side),
            PanelIntent::Drop => self.complete_drag().await.map(|_| ()),
            PanelIntent::DragEnd => {
                self.end_drag();
                Ok(())
            }
        }
    }

    /// The reconciliation loop.
    ///
    /// Publishes the first view, then every view that differs from the last
    /// one published. Returns when the intent channel closes.
    pub async fn run(
        mut self,
        mut events: UnboundedReceiver<HostEvent>,
        mut intents: UnboundedReceiver<PanelIntent>,
        views: UnboundedSender<VisualList>,
    ) -> Self {
        let mut published = self.view.clone();
        if views.send(published.clone()).is_err() {
            tracing::debug!("view receiver dropped before the first view; stopping");
            return self;
        }
        let mut events_open = true;

        loop {
            let deadline = self.coalescer.deadline();
            let due = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                event = events.recv(), if events_open => match event {
                    Some(event) => {
                        self.on_host_event(&event, Instant::now());
                    }
                    None => {
                        tracing::warn!("host event stream closed");
                        events_open = false;
                    }
                },
                intent = intents.recv() => match intent {
                    Some(intent) => {
                        if let Err(e) = self.handle_intent(intent).await {
                            report(&e);
                        }
                    }
                    None => break,
                },
                _ = due => {
                    self.run_due(Instant::now()).await;
                }
            }

            if self.view != published {
                published = self.view.clone();
                if views.send(published.clone()).is_err() {
                    tracing::debug!("view receiver dropped; stopping");
                    break;
                }
            }
        }
        self
    }
}

/// An entity that vanished from the current order is a stale reference,
/// not an invalid gesture.
fn drop_error(error: InvalidMove) -> PanelError {
    match error {
        InvalidMove::UnknownEntity(id) => PanelError::StaleReference(id),
        other => PanelError::InvalidMove(other),
    }
}

fn report(error: &PanelError) {
    match error {
        PanelError::InvalidMove(_) | PanelError::StaleReference(_) | PanelError::NoActiveDrag => {
            tracing::debug!(%error, "intent ignored")
        }
        _ => tracing::warn!(%error, "intent failed"),
    }
}
