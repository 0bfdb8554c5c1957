//! Activity-based architecture for the TUI.
//!
//! Each screen in the TUI is an Activity with its own Application instance,
//! component IDs, and message types. The ActivityManager orchestrates transitions.

use std::io::Stdout;

use color_eyre::eyre::{Result, eyre};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::debug;

use super::activities::{GalleryActivity, ViewerActivity};
use crate::gallery::Gallery;
use crate::viewer::{Overflow, ViewerTheme};

/// Rendering settings shared by every snippet.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub tab_width: usize,
    pub overflow: Overflow,
    pub theme: ViewerTheme,
}

/// Shared context passed between activities.
pub struct Context {
    pub gallery: Gallery,
    /// Index of the snippet shown by the viewer
    pub selected: usize,
    pub settings: ViewSettings,
}

/// Exit reasons for activity transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum ExitReason {
    Quit,
    SwitchToGallery,
    SwitchToViewer,
}

/// Activity lifecycle trait.
///
/// Each activity owns its own tui-realm Application and handles its own events.
pub trait Activity {
    /// Initialize the activity with context from the manager.
    fn on_create(&mut self, context: Context);

    /// Draw the UI and handle one tick of events.
    fn on_draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()>;

    /// Check if activity wants to exit. Returns Some(reason) to exit, None to continue.
    fn will_umount(&self) -> Option<&ExitReason>;

    /// Clean up and return the context to the manager.
    fn on_destroy(&mut self) -> Option<Context>;
}

/// Activity types available in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityType {
    Gallery,
    Viewer,
}

impl ActivityType {
    /// A single snippet skips the picker.
    pub fn initial(gallery: &Gallery) -> Self {
        if gallery.len() > 1 {
            Self::Gallery
        } else {
            Self::Viewer
        }
    }
}

/// Manages activity lifecycle and transitions.
pub struct ActivityManager {
    context: Option<Context>,
    current: ActivityType,
}

impl ActivityManager {
    pub fn new(context: Context) -> Self {
        let current = ActivityType::initial(&context.gallery);
        Self {
            context: Some(context),
            current,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            let mut activity: Box<dyn Activity> = match self.current {
                ActivityType::Gallery => Box::<GalleryActivity>::default(),
                ActivityType::Viewer => Box::<ViewerActivity>::default(),
            };

            let context = self
                .context
                .take()
                .ok_or_else(|| eyre!("activity context was not returned"))?;
            debug!(activity = ?self.current, "Creating activity");
            activity.on_create(context);

            loop {
                activity.on_draw(terminal)?;

                if let Some(reason) = activity.will_umount() {
                    match reason {
                        ExitReason::Quit => {
                            activity.on_destroy();
                            return Ok(());
                        }
                        ExitReason::SwitchToGallery => {
                            self.context = activity.on_destroy();
                            self.current = ActivityType::Gallery;
                            break;
                        }
                        ExitReason::SwitchToViewer => {
                            self.context = activity.on_destroy();
                            self.current = ActivityType::Viewer;
                            break;
                        }
                    }
                }
            }
        }
    }
}
