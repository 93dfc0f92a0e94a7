//! Tabdeck: the core of a browser side panel listing open tabs and bookmarks.
//!
//! The host browser owns all tab and bookmark state. This crate reads it
//! through [`platform::HostPlatform`], renders it into a flat visual list,
//! and turns user gestures into host requests.

pub mod app;
pub mod database;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
