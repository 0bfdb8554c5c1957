//! Gallery activity - pick a snippet from the loaded manifest.

use std::io::Stdout;
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use crossterm_actions::{InputEvent, NavigationEvent, TuiEvent};
use ratatui::{
    Terminal,
    crossterm::event::{self, Event as CrosstermEvent, KeyCode},
    layout::{Constraint, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tuirealm::{
    Application, Component, Event, EventListenerCfg, MockComponent, PollStrategy, State,
    StateValue,
    command::{Cmd, CmdResult, Direction as CmdDirection},
    event::Key,
    props::{AttrValue, Attribute, Props},
};

use crate::gallery::Gallery;
use crate::neutralize::neutralize_line;
use crate::tui::activity::{Activity, Context, ExitReason};
use crate::tui::components::{GALLERY_FOOTER_ACTIONS, format_footer, render_help};
use crate::tui::{AppAction, GlobalEvent, dispatcher, handle_global_app_events};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Id {
    SnippetList,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Quit,
    ShowHelp,
    Open(usize),
    Moved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {}

// ============================================================================
// SnippetList Component
// ============================================================================

/// One row per gallery entry: title, label and line count.
pub struct SnippetList {
    props: Props,
    rows: Vec<(String, String, usize)>,
    selected: usize,
}

impl SnippetList {
    pub fn new(gallery: &Gallery, selected: usize) -> Self {
        let rows = gallery
            .entries()
            .iter()
            .map(|entry| {
                (
                    neutralize_line(&entry.title, 1).into_owned(),
                    neutralize_line(entry.snippet.language_label(), 1).into_owned(),
                    entry.snippet.line_count(),
                )
            })
            .collect();
        Self {
            props: Props::default(),
            rows,
            selected,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn move_down(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }
}

impl MockComponent for SnippetList {
    fn view(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let title_width = self
            .rows
            .iter()
            .map(|(title, _, _)| title.chars().count())
            .max()
            .unwrap_or(0);

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|(title, label, lines)| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{title:<title_width$}  "),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("{label:<12}"), Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("{lines} lines"),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title(" Snippets ").borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::One(StateValue::Usize(self.selected))
    }

    fn perform(&mut self, cmd: Cmd) -> CmdResult {
        match cmd {
            Cmd::Move(CmdDirection::Up) => {
                self.move_up();
                CmdResult::Changed(self.state())
            }
            Cmd::Move(CmdDirection::Down) => {
                self.move_down();
                CmdResult::Changed(self.state())
            }
            Cmd::Submit => CmdResult::Submit(self.state()),
            _ => CmdResult::None,
        }
    }
}

impl Component<Msg, UserEvent> for SnippetList {
    fn on(&mut self, ev: Event<UserEvent>) -> Option<Msg> {
        let Event::Keyboard(key_event) = ev else {
            return None;
        };

        if key_event.code == Key::Enter {
            return Some(Msg::Open(self.selected));
        }

        let action = dispatcher().dispatch(&key_event)?;

        if let Some(global) = handle_global_app_events(&action) {
            return match global {
                GlobalEvent::Quit => Some(Msg::Quit),
                GlobalEvent::ShowHelp => Some(Msg::ShowHelp),
            };
        }

        match action {
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Up)) => {
                self.perform(Cmd::Move(CmdDirection::Up));
                Some(Msg::Moved)
            }
            AppAction::Tui(TuiEvent::Navigation(NavigationEvent::Down)) => {
                self.perform(Cmd::Move(CmdDirection::Down));
                Some(Msg::Moved)
            }
            AppAction::Tui(TuiEvent::Input(InputEvent::Confirm)) => Some(Msg::Open(self.selected)),
            _ => None,
        }
    }
}

// ============================================================================
// GalleryActivity
// ============================================================================

#[derive(Default)]
pub struct GalleryActivity {
    app: Option<Application<Id, Msg, UserEvent>>,
    context: Option<Context>,
    exit_reason: Option<ExitReason>,
    show_help: bool,
}

impl GalleryActivity {
    fn create_application() -> Application<Id, Msg, UserEvent> {
        Application::init(
            EventListenerCfg::default()
                .crossterm_input_listener(Duration::from_millis(20), 10)
                .poll_timeout(Duration::from_millis(50)),
        )
    }
}

impl Activity for GalleryActivity {
    fn on_create(&mut self, context: Context) {
        let mut app = Self::create_application();
        let list = SnippetList::new(&context.gallery, context.selected);
        if let Err(e) = app.mount(Id::SnippetList, Box::new(list), vec![]) {
            tracing::error!("Failed to mount snippet list: {}", e);
        }
        let _ = app.active(&Id::SnippetList);
        self.context = Some(context);
        self.app = Some(app);
    }

    fn on_draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let app = self
            .app
            .as_mut()
            .ok_or_else(|| eyre!("gallery application not initialized"))?;
        let show_help = self.show_help;

        terminal.draw(|frame| {
            let [title_row, body, status_row] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .areas(frame.area());

            let title_widget = Paragraph::new(" snipview - gallery")
                .style(Style::default().add_modifier(Modifier::BOLD));
            frame.render_widget(title_widget, title_row);

            app.view(&Id::SnippetList, frame, body);

            let status = format_footer(GALLERY_FOOTER_ACTIONS, &[("open", "Enter")]);
            let status_widget =
                Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
            frame.render_widget(status_widget, status_row);

            if show_help {
                render_help(frame);
            }
        })?;

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
            Err(_) => return Ok(()),
        };

        for msg in messages {
            match msg {
                Msg::Quit => {
                    self.exit_reason = Some(ExitReason::Quit);
                    return Ok(());
                }
                Msg::ShowHelp => self.show_help = true,
                Msg::Open(index) => {
                    if let Some(context) = self.context.as_mut() {
                        context.selected = index;
                    }
                    self.exit_reason = Some(ExitReason::SwitchToViewer);
                    return Ok(());
                }
                Msg::Moved => {}
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
