//! vtmark - video timestamp bookmarks.
//!
//! Save timestamps within streaming videos, persist them locally, and
//! jump back to them later. The crate is the core of what used to be a
//! browser extension: a time codec, a record store over a single
//! `savedTimestamps` JSON collection, a message protocol between the
//! popup surface and the page endpoint, a synchronization controller,
//! and marker layout for the progress-bar overlay. Platform
//! collaborators (the page DOM, the active tab) are traits.

pub mod commands;
pub mod config;
pub mod content;
pub mod controller;
pub mod markers;
pub mod page;
pub mod protocol;
pub mod record;
pub mod store;
pub mod timecode;
pub mod tui;

pub use config::Config;
pub use content::ContentScript;
pub use controller::{Controller, Phase, SyncError, SyncOptions, Tab};
pub use page::{ScriptedPage, VideoInfo, VideoPage};
pub use protocol::{Request, Response};
pub use record::{extract_video_id, TimestampRecord};
pub use store::{FileBackend, MemoryBackend, SharedStore, StorageBackend, TimestampStore};
