use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier.
pub type TabId = i64;

/// Host-assigned window identifier.
pub type WindowId = i64;

/// A browser tab as reported by the host platform.
///
/// `index` is the zero-based position inside the tab's window. The host keeps
/// indices contiguous per window; the panel only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    pub window_id: WindowId,
    pub index: usize,
    pub pinned: bool,
    pub active: bool,
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub favicon_url: Option<String>,
}

impl Tab {
    /// Title shown to the user, falling back to "Untitled" for blank titles.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }
}

/// Partial update sent with `update_tab`. `None` leaves the field untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabUpdate {
    pub active: Option<bool>,
    pub pinned: Option<bool>,
}

impl TabUpdate {
    pub fn activate() -> Self {
        Self {
            active: Some(true),
            pinned: None,
        }
    }

    pub fn pin(pinned: bool) -> Self {
        Self {
            active: None,
            pinned: Some(pinned),
        }
    }
}
