//! Optimistic highlight of the entity the user last activated.

use crate::types::drag::EntityId;
use crate::types::visual::VisualList;

/// Tracks a highlight applied ahead of host confirmation.
///
/// The next rebuild from a host snapshot is authoritative: it discards the
/// optimistic highlight and shows whatever the host reports as active.
#[derive(Debug, Default)]
pub struct SelectionManager {
    optimistic: Option<EntityId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlights `id` in `list` immediately. Returns false if `id` is not visible.
    pub fn select(&mut self, id: EntityId, list: &mut VisualList) -> bool {
        if !list.highlight(&id) {
            return false;
        }
        self.optimistic = Some(id);
        true
    }

    pub fn pending(&self) -> Option<&EntityId> {
        self.optimistic.as_ref()
    }

    /// Drops the optimistic highlight after a rebuild from host state.
    pub fn reconcile(&mut self) {
        if let Some(id) = self.optimistic.take() {
            tracing::trace!(entity = %id, "optimistic highlight superseded by host state");
        }
    }
}
