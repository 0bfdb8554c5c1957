//! Code viewer widget.
//!
//! Renders a [`CodeSnippet`] as a bordered block with a header row (title and
//! language label) above a monospaced body. The body never reinterprets the
//! snippet: every line passes through [`neutralize_line`] and is placed cell by
//! cell, so indentation and blank lines land exactly where they were.
//!
//! The widget holds no state. Scroll offsets live in [`ViewerState`], owned by
//! the host and threaded through [`StatefulWidget::render`].

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget,
    },
};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use crate::neutralize::{DEFAULT_TAB_WIDTH, display_width, neutralize_line};
use crate::snippet::CodeSnippet;

/// Title shown in the header when the host does not supply one.
pub const DEFAULT_TITLE: &str = "Agent Code";

/// How lines wider than the body are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// Keep each line on one row and scroll horizontally
    #[default]
    Scroll,
    /// Break lines at the body width, character by character
    Wrap,
}

impl Overflow {
    pub fn toggled(self) -> Self {
        match self {
            Self::Scroll => Self::Wrap,
            Self::Wrap => Self::Scroll,
        }
    }
}

/// Colors for the viewer chrome and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerTheme {
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub title: Color,
    pub label: Color,
    pub scrollbar: Color,
}

impl Default for ViewerTheme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Reset,
            border: Color::DarkGray,
            title: Color::Reset,
            label: Color::Gray,
            scrollbar: Color::DarkGray,
        }
    }
}

/// Stand-in for a glyph wider than the whole body.
const NARROW_PLACEHOLDER: char = '\u{fffd}';

/// Scroll position plus the extents measured at the last render.
///
/// A state follows one snippet: line measurements are cached on it and only
/// rebuilt when the content or tab width changes, so start from
/// `ViewerState::default()` when switching snippets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerState {
    offset_x: usize,
    offset_y: usize,
    viewport_width: usize,
    viewport_height: usize,
    content_width: usize,
    content_height: usize,
    index: LineIndex,
}

impl ViewerState {
    /// Current `(column, row)` offset of the body's top-left cell.
    pub fn offset(&self) -> (usize, usize) {
        (self.offset_x, self.offset_y)
    }

    /// Body size in cells at the last render.
    pub fn viewport(&self) -> (usize, usize) {
        (self.viewport_width, self.viewport_height)
    }

    /// Content size in cells (columns of the widest row, number of rows).
    pub fn content_size(&self) -> (usize, usize) {
        (self.content_width, self.content_height)
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.offset_y = self.offset_y.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.offset_y = (self.offset_y + rows).min(self.max_offset_y());
    }

    pub fn scroll_left(&mut self, columns: usize) {
        self.offset_x = self.offset_x.saturating_sub(columns);
    }

    pub fn scroll_right(&mut self, columns: usize) {
        self.offset_x = (self.offset_x + columns).min(self.max_offset_x());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.max(1));
    }

    pub fn home(&mut self) {
        self.offset_x = 0;
        self.offset_y = 0;
    }

    pub fn end(&mut self) {
        self.offset_y = self.max_offset_y();
    }

    /// Back to the origin with no measured extents. Cached line
    /// measurements survive.
    pub fn reset(&mut self) {
        *self = Self {
            index: std::mem::take(&mut self.index),
            ..Self::default()
        };
    }

    pub fn can_scroll_horizontally(&self) -> bool {
        self.content_width > self.viewport_width
    }

    pub fn can_scroll_vertically(&self) -> bool {
        self.content_height > self.viewport_height
    }

    fn max_offset_x(&self) -> usize {
        self.content_width.saturating_sub(self.viewport_width)
    }

    fn max_offset_y(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn measure(&mut self, viewport: Rect, content_width: usize, content_height: usize) {
        self.viewport_width = viewport.width as usize;
        self.viewport_height = viewport.height as usize;
        self.content_width = content_width;
        self.content_height = content_height;
        self.offset_x = self.offset_x.min(self.max_offset_x());
        self.offset_y = self.offset_y.min(self.max_offset_y());
    }
}

/// Per-line measurements of the content last drawn with a [`ViewerState`].
///
/// Built once per content and tab width. Wrapped row offsets are rebuilt
/// only when the body width changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LineIndex {
    /// Address, length and tab width of the measured content
    key: (usize, usize, usize),
    /// Byte offset where each line starts
    starts: Vec<usize>,
    /// Display width of each neutralized line
    widths: Vec<usize>,
    max_width: usize,
    /// Body width `row_starts` was built for
    wrap_width: usize,
    /// First wrapped row of each line, then the total row count
    row_starts: Vec<usize>,
}

impl LineIndex {
    fn refresh(&mut self, content: &str, tab_width: usize) {
        let key = (content.as_ptr() as usize, content.len(), tab_width);
        if key == self.key && !self.starts.is_empty() {
            return;
        }

        let mut starts = Vec::new();
        let mut widths = Vec::new();
        let mut start = 0;
        for line in content.split('\n') {
            starts.push(start);
            widths.push(display_width(&neutralize_line(line, tab_width)));
            start += line.len() + 1;
        }
        let max_width = widths.iter().copied().max().unwrap_or(0);

        *self = Self {
            key,
            starts,
            widths,
            max_width,
            wrap_width: 0,
            row_starts: Vec::new(),
        };
    }

    fn refresh_rows(&mut self, content: &str, tab_width: usize, width: usize) {
        if self.wrap_width == width && !self.row_starts.is_empty() {
            return;
        }

        let mut row_starts = Vec::with_capacity(self.len() + 1);
        let mut total = 0;
        for index in 0..self.len() {
            row_starts.push(total);
            total += if self.widths[index] <= width {
                1
            } else {
                wrapped_row_count(&neutralize_line(self.line(content, index), tab_width), width)
            };
        }
        row_starts.push(total);

        self.row_starts = row_starts;
        self.wrap_width = width;
    }

    fn len(&self) -> usize {
        self.starts.len()
    }

    fn line<'c>(&self, content: &'c str, index: usize) -> &'c str {
        let start = self.starts[index];
        let end = self
            .starts
            .get(index + 1)
            .map_or(content.len(), |next| next - 1);
        &content[start..end]
    }

    fn total_rows(&self) -> usize {
        self.row_starts.last().copied().unwrap_or(0)
    }

    /// Line holding wrapped `row`, and how many of its rows come before it.
    fn locate_row(&self, row: usize) -> (usize, usize) {
        let index = self
            .row_starts
            .partition_point(|&start| start <= row)
            .saturating_sub(1)
            .min(self.len().saturating_sub(1));
        let first = self.row_starts.get(index).copied().unwrap_or(0);
        (index, row.saturating_sub(first))
    }
}

/// Read-only code block for a single snippet.
#[derive(Debug, Clone)]
pub struct CodeViewer<'a> {
    snippet: &'a CodeSnippet,
    title: &'a str,
    theme: ViewerTheme,
    overflow: Overflow,
    tab_width: usize,
}

impl<'a> CodeViewer<'a> {
    pub fn new(snippet: &'a CodeSnippet) -> Self {
        Self {
            snippet,
            title: DEFAULT_TITLE,
            theme: ViewerTheme::default(),
            overflow: Overflow::default(),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn theme(mut self, theme: ViewerTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(self.theme.border));
        let inner = block.inner(area);
        block.render(area, buf);

        let title = neutralize_line(self.title, self.tab_width);
        let label = neutralize_line(self.snippet.language_label(), self.tab_width);
        let label_width = display_width(&label).min(inner.width as usize) as u16;

        let [title_area, _, label_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(label_width),
        ])
        .areas(inner);

        let title_style = Style::default()
            .fg(self.theme.title)
            .add_modifier(Modifier::BOLD);
        Paragraph::new(Span::styled(title, title_style)).render(title_area, buf);

        let label_style = Style::default().fg(self.theme.label);
        Paragraph::new(Span::styled(label, label_style))
            .alignment(Alignment::Right)
            .render(label_area, buf);
    }

    /// Rows visible in a `width` x `height` body starting at `state`'s offset.
    ///
    /// Also records the content extents on `state` so later scroll calls clamp
    /// against what was actually drawn. Only lines inside the window are
    /// neutralized and sliced.
    fn visible_rows(&self, body: Rect, state: &mut ViewerState) -> Vec<String> {
        let width = body.width as usize;
        let height = body.height as usize;
        let content = self.snippet.content();
        state.index.refresh(content, self.tab_width);

        match self.overflow {
            Overflow::Scroll => {
                let (content_width, line_count) = (state.index.max_width, state.index.len());
                state.measure(body, content_width, line_count);
                let (offset_x, offset_y) = state.offset();
                let index = &state.index;
                (offset_y..line_count.min(offset_y + height))
                    .map(|i| {
                        let line = neutralize_line(index.line(content, i), self.tab_width);
                        slice_columns(&line, offset_x, width)
                    })
                    .collect()
            }
            Overflow::Wrap => {
                state.index.refresh_rows(content, self.tab_width, width);
                let rows = state.index.total_rows();
                state.measure(body, width, rows);
                state.offset_x = 0;
                let (first_line, skip) = state.index.locate_row(state.offset_y);
                let index = &state.index;
                (first_line..index.len())
                    .flat_map(|i| {
                        wrap_columns(&neutralize_line(index.line(content, i), self.tab_width), width)
                    })
                    .skip(skip)
                    .take(height)
                    .collect()
            }
        }
    }
}

impl StatefulWidget for CodeViewer<'_> {
    type State = ViewerState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let base = Style::default()
            .bg(self.theme.background)
            .fg(self.theme.foreground);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(base.fg(self.theme.border))
            .style(base);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let [header, body] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);
        self.render_header(header, buf);

        if body.width == 0 || body.height == 0 {
            return;
        }

        let rows: Vec<Line> = self
            .visible_rows(body, state)
            .into_iter()
            .map(Line::raw)
            .collect();
        Paragraph::new(rows).style(base).render(body, buf);

        // Scrollbars sit on the border so they never cover body cells
        let scrollbar_style = Style::default().fg(self.theme.scrollbar);
        if state.can_scroll_vertically() {
            let track = Rect::new(area.x, body.y, area.width, body.height);
            let mut scrollbar_state = ScrollbarState::new(state.content_height)
                .viewport_content_length(state.viewport_height)
                .position(state.offset_y);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(scrollbar_style)
                .render(track, buf, &mut scrollbar_state);
        }
        if state.can_scroll_horizontally() {
            let track = Rect::new(body.x, area.y, body.width, area.height);
            let mut scrollbar_state = ScrollbarState::new(state.content_width)
                .viewport_content_length(state.viewport_width)
                .position(state.offset_x);
            Scrollbar::new(ScrollbarOrientation::HorizontalBottom)
                .style(scrollbar_style)
                .render(track, buf, &mut scrollbar_state);
        }
    }
}

impl Widget for CodeViewer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut state = ViewerState::default();
        StatefulWidget::render(self, area, buf, &mut state);
    }
}

/// Take the cells of `line` in columns `[start, start + width)`.
///
/// A wide glyph cut by either edge is replaced by spaces for the part that
/// falls inside the window.
fn slice_columns(line: &str, start: usize, width: usize) -> String {
    let end = start + width;
    let mut out = String::new();
    let mut column = 0usize;
    for c in line.chars() {
        if column >= end {
            break;
        }
        let w = c.width().unwrap_or(0);
        if column < start {
            if column + w > start {
                let visible = (column + w - start).min(width);
                push_cut_glyph(&mut out, w > width, visible);
            }
            column += w;
            continue;
        }
        if column + w > end {
            push_cut_glyph(&mut out, w > width, end - column);
            break;
        }
        out.push(c);
        column += w;
    }
    out
}

/// Fill `columns` cells for a glyph cut by a window edge. A glyph wider than
/// the whole window could never appear, so it leaves a placeholder.
fn push_cut_glyph(out: &mut String, wider_than_window: bool, columns: usize) {
    let mut columns = columns;
    if wider_than_window && columns > 0 {
        out.push(NARROW_PLACEHOLDER);
        columns -= 1;
    }
    out.extend(std::iter::repeat_n(' ', columns));
}

/// Width `c` takes in a `width`-column row; glyphs that cannot fit at all
/// become a one-column placeholder.
fn fitted(c: char, width: usize) -> (char, usize) {
    let w = c.width().unwrap_or(0);
    if w > width {
        (NARROW_PLACEHOLDER, 1)
    } else {
        (c, w)
    }
}

/// Break `line` into rows of at most `width` columns without dropping or
/// reordering characters. An empty line is one empty row.
fn wrap_columns(line: &str, width: usize) -> Vec<String> {
    let mut rows = vec![String::new()];
    let mut column = 0usize;
    for c in line.chars() {
        let (c, w) = fitted(c, width);
        if column + w > width && column > 0 {
            rows.push(String::new());
            column = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
        column += w;
    }
    rows
}

/// Number of rows [`wrap_columns`] produces, without building them.
fn wrapped_row_count(line: &str, width: usize) -> usize {
    let mut rows = 1;
    let mut column = 0usize;
    for c in line.chars() {
        let (_, w) = fitted(c, width);
        if column + w > width && column > 0 {
            rows += 1;
            column = 0;
        }
        column += w;
    }
    rows
}
