// Tabdeck state managers
// Managers own the panel's mutable UI state: folder collapse flags, the live
// drag gesture and the optimistic selection.

pub mod collapse_store;
pub mod drag_tracker;
pub mod selection_manager;
