use serde::{Deserialize, Serialize};

use super::drag::{DropSide, EntityId, EntityKind};
use super::tab::TabId;

/// User input forwarded unmodified by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum PanelIntent {
    ActivateTab { tab_id: TabId },
    ActivateBookmark { bookmark_id: String },
    PinTab { tab_id: TabId },
    UnpinTab { tab_id: TabId },
    CloseTab { tab_id: TabId },
    ToggleFolder { bookmark_id: String },
    DragStart { kind: EntityKind, source: EntityId },
    DragOver { target: EntityId, side: DropSide },
    Drop,
    DragEnd,
}
