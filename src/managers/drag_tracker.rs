//! Single-flight drag gesture state.

use crate::types::drag::{DragContext, DropSide, EntityId, EntityKind};
use crate::types::errors::PanelError;

/// Holds the one live [`DragContext`], if any.
///
/// Starting a new gesture while one is live aborts the old one. Ending a
/// gesture always clears the context, whatever the outcome.
#[derive(Debug, Default)]
pub struct DragTracker {
    current: Option<DragContext>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a gesture. Returns the context it replaced, if one was live.
    pub fn begin(&mut self, kind: EntityKind, source: EntityId) -> Option<DragContext> {
        let aborted = self.current.replace(DragContext::new(kind, source));
        if let Some(old) = &aborted {
            tracing::debug!(source = %old.source_id, "drag aborted by a new drag");
        }
        aborted
    }

    /// Records the entity under the pointer and the side it is on.
    pub fn hover(&mut self, target: EntityId, side: DropSide) -> Result<(), PanelError> {
        let ctx = self.current.as_mut().ok_or(PanelError::NoActiveDrag)?;
        ctx.drop_target_id = Some(target);
        ctx.drop_side = Some(side);
        Ok(())
    }

    pub fn current(&self) -> Option<&DragContext> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Ends the gesture and hands back its final context.
    pub fn finish(&mut self) -> Option<DragContext> {
        self.current.take()
    }
}
