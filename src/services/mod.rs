// Tabdeck services
// Snapshot loading, change coalescing, list building, reorder computation and settings.

pub mod change_coalescer;
pub mod reorder_engine;
pub mod settings_engine;
pub mod snapshot_loader;
pub mod tree_builder;
