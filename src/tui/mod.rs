//! TUI (Text User Interface) module for vtmark
//!
//! Terminal-based popup surface built on ratatui/crossterm, plus the
//! shared theme used for styled CLI output.

pub mod popup_app;
pub mod theme;

pub use popup_app::{run_popup, KeyResult, Mode, PopupApp};
pub use theme::{current_theme, Theme};
