//! TUI components shared across activities.

pub mod help;

pub use help::{GALLERY_FOOTER_ACTIONS, VIEWER_FOOTER_ACTIONS, format_footer, render_help};
