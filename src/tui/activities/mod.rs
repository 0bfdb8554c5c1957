//! Activity modules for the TUI.

pub mod gallery;
pub mod viewer;

pub use gallery::GalleryActivity;
pub use viewer::ViewerActivity;
