//! TUI module for the archive admin panel
//!
//! Terminal user interface using Ratatui.

mod app;
mod backend;
mod console;
mod form;
mod help;
mod list;
mod ui;

pub use app::run;
pub use console::LogRing;
