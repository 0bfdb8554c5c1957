//! Interactive terminal shell around the code viewer.
//!
//! Architecture: Activity-based with tui-realm for components.
//! Each screen (activity) has its own Application instance and message types.

mod activities;
mod activity;
mod components;

use std::io::stdout;
use std::sync::LazyLock;

use color_eyre::eyre::Result;
use crossterm_actions::{
    ActionBinding, ActionConfig, AppEvent, EditingMode, TuiEvent, TuiRealmDispatcher,
    defaults, keys,
};
use ratatui::{
    Terminal,
    crossterm::ExecutableCommand,
    crossterm::terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    },
    prelude::CrosstermBackend,
};
use tracing::info;

use crate::gallery::Gallery;

pub use activity::{Context, ViewSettings};

use activity::ActivityManager;

// ============================================================================
// Event handling (shared across activities)
// ============================================================================

/// Unified application events - wraps TuiEvent + custom actions.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum AppAction {
    /// Standard TUI events (navigation, input, selection, app)
    Tui(TuiEvent),
    /// Switch between horizontal scrolling and wrapping
    ToggleWrap,
    /// Jump to the first line
    Top,
    /// Jump to the last line
    Bottom,
    /// Scroll one page down
    PageDown,
    /// Scroll one page up
    PageUp,
}

/// Events every activity reacts to the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalEvent {
    Quit,
    ShowHelp,
}

/// Global dispatcher instance - shared by all components.
pub static DISPATCHER: LazyLock<TuiRealmDispatcher<AppAction>> = LazyLock::new(|| {
    let mut config = ActionConfig::new(EditingMode::Emacs);

    // Import all standard TuiEvent bindings wrapped in AppAction::Tui
    for binding in defaults::emacs_defaults().bindings() {
        config.bind(ActionBinding {
            action: AppAction::Tui(binding.action),
            keys: binding.keys.clone(),
            description: binding.description.clone(),
        });
    }

    config.bind(
        ActionBinding::builder().action(AppAction::ToggleWrap)
            .key(keys::char('w'))
            .description("Toggle wrap")
            .build(),
    );
    config.bind(
        ActionBinding::builder().action(AppAction::Top)
            .key(keys::char('g'))
            .description("Top of snippet")
            .build(),
    );
    config.bind(
        ActionBinding::builder().action(AppAction::Bottom)
            .key(keys::char('G'))
            .description("Bottom of snippet")
            .build(),
    );
    config.bind(
        ActionBinding::builder().action(AppAction::PageDown)
            .key(keys::char(' '))
            .description("Page down")
            .build(),
    );
    config.bind(
        ActionBinding::builder().action(AppAction::PageUp)
            .key(keys::char('b'))
            .description("Page up")
            .build(),
    );

    config.compile();
    TuiRealmDispatcher::new(config)
});

/// Convenience function for components to access the dispatcher.
pub fn dispatcher() -> &'static TuiRealmDispatcher<AppAction> {
    &DISPATCHER
}

/// Handle global application events that are common across all components.
pub fn handle_global_app_events(action: &AppAction) -> Option<GlobalEvent> {
    match action {
        AppAction::Tui(TuiEvent::App(AppEvent::Quit)) => Some(GlobalEvent::Quit),
        AppAction::Tui(TuiEvent::App(AppEvent::Help)) => Some(GlobalEvent::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// TUI entry point
// ============================================================================

/// Run the interactive viewer over `gallery`.
pub fn run(gallery: Gallery, settings: ViewSettings) -> Result<()> {
    info!(entries = gallery.len(), "Starting interactive viewer");

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let context = Context {
        gallery,
        selected: 0,
        settings,
    };
    let mut manager = ActivityManager::new(context);

    let result = manager.run(&mut terminal);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}
