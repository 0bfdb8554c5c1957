//! Viewer activity - shows one snippet full screen.

use std::io::Stdout;
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use crossterm_actions::{NavigationEvent, SelectionEvent, TuiEvent};
use ratatui::{
    Terminal,
    crossterm::event::{self, Event as CrosstermEvent, KeyCode},
    layout::{Constraint, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Modifier, Style},
    widgets::Paragraph,
};
use tracing::debug;
use tuirealm::{
    Application, Component, Event, EventListenerCfg, MockComponent, PollStrategy, State,
    StateValue,
    command::{Cmd, CmdResult, Direction as CmdDirection, Position},
    event::Key,
    props::{AttrValue, Attribute, Props},
};

use crate::gallery::GalleryEntry;
use crate::neutralize::neutralize_line;
use crate::snippet::CodeSnippet;
use crate::tui::activity::{Activity, Context, ExitReason, ViewSettings};
use crate::tui::components::{VIEWER_FOOTER_ACTIONS, format_footer, render_help};
use crate::tui::{AppAction, GlobalEvent, dispatcher, handle_global_app_events};
use crate::viewer::{CodeViewer, Overflow, ViewerState, ViewerTheme};

/// Columns moved per horizontal scroll step.
const HORIZONTAL_STEP: usize = 4;

const CMD_PAGE_UP: &str = "page-up";
const CMD_PAGE_DOWN: &str = "page-down";

// ============================================================================
// Component identifiers (scoped to ViewerActivity)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Id {
    CodeView,
}

// ============================================================================
// Messages (scoped to ViewerActivity)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Quit,
    Back,
    ShowHelp,
    NextSnippet,
    PrevSnippet,
    OverflowChanged(Overflow),
    Scrolled,
}

// ============================================================================
// User events (required by tui-realm)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {}

// ============================================================================
// CodeView Component
// ============================================================================

/// tui-realm wrapper owning a snippet and its scroll state.
pub struct CodeView {
    props: Props,
    snippet: CodeSnippet,
    title: String,
    theme: ViewerTheme,
    overflow: Overflow,
    tab_width: usize,
    state: ViewerState,
}

impl CodeView {
    pub fn new(entry: &GalleryEntry, settings: &ViewSettings) -> Self {
        Self {
            props: Props::default(),
            snippet: entry.snippet.clone(),
            title: entry.title.clone(),
            theme: settings.theme,
            overflow: settings.overflow,
            tab_width: settings.tab_width,
            state: ViewerState::default(),
        }
    }

    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    pub fn viewer_state(&self) -> &ViewerState {
        &self.state
    }
}

impl MockComponent for CodeView {
    fn view(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let viewer = CodeViewer::new(&self.snippet)
            .title(&self.title)
            .theme(self.theme)
            .overflow(self.overflow)
            .tab_width(self.tab_width);
        frame.render_stateful_widget(viewer, area, &mut self.state);
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        let (x, y) = self.state.offset();
        State::Vec(vec![StateValue::Usize(x), StateValue::Usize(y)])
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        match cmd {
            Cmd::Scroll(CmdDirection::Up) => self.state.scroll_up(1),
            Cmd::Scroll(CmdDirection::Down) => self.state.scroll_down(1),
            Cmd::Scroll(CmdDirection::Left) => self.state.scroll_left(HORIZONTAL_STEP),
            Cmd::Scroll(CmdDirection::Right) => self.state.scroll_right(HORIZONTAL_STEP),
            Cmd::GoTo(Position::Begin) => self.state.home(),
            Cmd::GoTo(Position::End) => self.state.end(),
            Cmd::Custom(CMD_PAGE_UP) => self.state.page_up(),
            Cmd::Custom(CMD_PAGE_DOWN) => self.state.page_down(),
            Cmd::Toggle => {
                self.overflow = self.overflow.toggled();
                self.state.reset();
            }
            _ => return CmdResult::None,
        }
        CmdResult::Changed(self.state())
    }
}

impl Component<Msg, UserEvent> for CodeView {
    fn on(&mut self, ev: Event<UserEvent>) -> Option<Msg> {
        let Event::Keyboard(key_event) = ev else {
            return None;
        };

        // Keys not mapped in the dispatcher
        let direct = match key_event.code {
            Key::Esc => return Some(Msg::Back),
            Key::PageUp => Some(Cmd::Custom(CMD_PAGE_UP)),
            Key::PageDown => Some(Cmd::Custom(CMD_PAGE_DOWN)),
            Key::Home => Some(Cmd::GoTo(Position::Begin)),
            Key::End => Some(Cmd::GoTo(Position::End)),
            _ => None,
        };
        if let Some(cmd) = direct {
            self.perform(cmd);
            return Some(Msg::Scrolled);
        }

        let action = dispatcher().dispatch(&key_event)?;

        if let Some(global) = handle_global_app_events(&action) {
            return match global {
                GlobalEvent::Quit => Some(Msg::Quit),
                GlobalEvent::ShowHelp => Some(Msg::ShowHelp),
            };
        }

        let cmd = match action {
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Up)) => {
                Cmd::Scroll(CmdDirection::Up)
            }
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Down)) => {
                Cmd::Scroll(CmdDirection::Down)
            }
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Left)) => {
                Cmd::Scroll(CmdDirection::Left)
            }
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Right)) => {
                Cmd::Scroll(CmdDirection::Right)
            }
            AppAction::PageUp => Cmd::Custom(CMD_PAGE_UP),
            AppAction::PageDown => Cmd::Custom(CMD_PAGE_DOWN),
            AppAction::Top => Cmd::GoTo(Position::Begin),
            AppAction::Bottom => Cmd::GoTo(Position::End),
            AppAction::ToggleWrap => {
                self.perform(Cmd::Toggle);
                return Some(Msg::OverflowChanged(self.overflow));
            }

            // Snippet switching (Tab/Shift+Tab)
            AppAction::Tui(TuiEvent::Selection(SelectionEvent::Next)) => {
                return Some(Msg::NextSnippet);
            }
            AppAction::Tui(TuiEvent::Selection(SelectionEvent::Prev)) => {
                return Some(Msg::PrevSnippet);
            }

            _ => return None,
        };
        self.perform(cmd);
        Some(Msg::Scrolled)
    }
}

// ============================================================================
// ViewerActivity
// ============================================================================

#[derive(Default)]
pub struct ViewerActivity {
    app: Option<Application<Id, Msg, UserEvent>>,
    context: Option<Context>,
    exit_reason: Option<ExitReason>,
    show_help: bool,
    needs_clear: bool,
}

impl ViewerActivity {
    fn create_application() -> Application<Id, Msg, UserEvent> {
        Application::init(
            EventListenerCfg::default()
                .crossterm_input_listener(Duration::from_millis(20), 10)
                .poll_timeout(Duration::from_millis(50)),
        )
    }

    fn mount_code_view(app: &mut Application<Id, Msg, UserEvent>, context: &Context) {
        let Some(entry) = context.gallery.get(context.selected) else {
            return;
        };
        let _ = app.umount(&Id::CodeView);
        let code_view = CodeView::new(entry, &context.settings);
        if let Err(e) = app.mount(Id::CodeView, Box::new(code_view), vec![]) {
            tracing::error!("Failed to mount code view: {}", e);
        }
        let _ = app.active(&Id::CodeView);
    }

    fn select(&mut self, index: usize) {
        let (Some(context), Some(app)) = (self.context.as_mut(), self.app.as_mut()) else {
            return;
        };
        context.selected = index;
        debug!(index, "Switching snippet");
        self.needs_clear = true;
        Self::mount_code_view(app, context);
    }

    fn back(&mut self) {
        let has_list = self
            .context
            .as_ref()
            .is_some_and(|context| context.gallery.len() > 1);
        self.exit_reason = Some(if has_list {
            ExitReason::SwitchToGallery
        } else {
            ExitReason::Quit
        });
    }
}

impl Activity for ViewerActivity {
    fn on_create(&mut self, context: Context) {
        let mut app = Self::create_application();
        Self::mount_code_view(&mut app, &context);
        self.context = Some(context);
        self.app = Some(app);
    }

    fn on_draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        // Force full redraw when switching snippets to prevent ghost text
        if self.needs_clear {
            terminal.clear()?;
            self.needs_clear = false;
        }

        let app = self
            .app
            .as_mut()
            .ok_or_else(|| eyre!("viewer application not initialized"))?;
        let context = self
            .context
            .as_ref()
            .ok_or_else(|| eyre!("viewer context not set"))?;
        let count = context.gallery.len();
        let label = context
            .gallery
            .get(context.selected)
            .map(|entry| neutralize_line(entry.snippet.language_label(), 1).into_owned())
            .unwrap_or_default();
        let show_help = self.show_help;

        terminal.draw(|frame| {
            let [title_row, body, status_row] = Layout::vertical([
                Constraint::Length(1), // Title
                Constraint::Min(3),    // Code
                Constraint::Length(1), // Status
            ])
            .areas(frame.area());

            let title = format!(" snipview - [{}] {}/{}", label, context.selected + 1, count);
            let title_widget =
                Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD));
            frame.render_widget(title_widget, title_row);

            app.view(&Id::CodeView, frame, body);

            let status = format_footer(VIEWER_FOOTER_ACTIONS, &[("scroll", "arrows")]);
            let status_widget =
                Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
            frame.render_widget(status_widget, status_row);

            if show_help {
                render_help(frame);
            }
        })?;

        // Help modal intercepts all input while visible
        if self.show_help {
            if let CrosstermEvent::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                        self.show_help = false;
                    }
                    _ => {}
                }
            }
            return Ok(());
        }

        let messages = match app.tick(PollStrategy::Once) {
            Ok(messages) => messages,
            // Timeout, continue
            Err(_) => return Ok(()),
        };

        for msg in messages {
            match msg {
                Msg::Quit => {
                    self.exit_reason = Some(ExitReason::Quit);
                    return Ok(());
                }
                Msg::Back => {
                    self.back();
                    return Ok(());
                }
                Msg::ShowHelp => self.show_help = true,
                Msg::NextSnippet => {
                    let next = self
                        .context
                        .as_ref()
                        .map(|c| c.gallery.next_index(c.selected));
                    if let Some(next) = next {
                        self.select(next);
                    }
                }
                Msg::PrevSnippet => {
                    let prev = self
                        .context
                        .as_ref()
                        .map(|c| c.gallery.prev_index(c.selected));
                    if let Some(prev) = prev {
                        self.select(prev);
                    }
                }
                Msg::OverflowChanged(overflow) => {
                    if let Some(context) = self.context.as_mut() {
                        context.settings.overflow = overflow;
                    }
                    self.needs_clear = true;
                }
                Msg::Scrolled => {
                    // Already handled in component
                }
            }
        }

        Ok(())
    }

    fn will_umount(&self) -> Option<&ExitReason> {
        self.exit_reason.as_ref()
    }

    fn on_destroy(&mut self) -> Option<Context> {
        self.app = None;
        self.context.take()
    }
}
