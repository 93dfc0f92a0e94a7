// Tabdeck shared type definitions
// Each submodule defines types used across the panel core.

pub mod bookmark;
pub mod drag;
pub mod errors;
pub mod intent;
pub mod settings;
pub mod snapshot;
pub mod tab;
pub mod visual;
