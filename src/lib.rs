//! Read-only code snippet viewer.
//!
//! The core is [`viewer::CodeViewer`], a ratatui widget that shows a
//! [`snippet::CodeSnippet`] verbatim: whitespace preserved, long lines scrolled
//! (or wrapped), and terminal control sequences made visible instead of
//! executed. [`export`] renders the same snippet as escaped HTML or plain text.

pub mod cli;
pub mod config;
pub mod export;
pub mod gallery;
pub mod logging;
pub mod neutralize;
pub mod snippet;
pub mod tui;
pub mod viewer;

pub use snippet::{CodeSnippet, SnippetError};
pub use viewer::{CodeViewer, Overflow, ViewerState, ViewerTheme};
