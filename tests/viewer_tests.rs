//! Rendering tests for the code viewer widget.
//!
//! Each test draws into an in-memory ratatui buffer and reads back the cells.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;
use snipview::{CodeSnippet, CodeViewer, Overflow, ViewerState};

fn render_with(viewer: CodeViewer<'_>, width: u16, height: u16, state: &mut ViewerState) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    StatefulWidget::render(viewer, area, &mut buf, state);
    buf
}

fn render(snippet: &CodeSnippet, width: u16, height: u16) -> Buffer {
    render_with(CodeViewer::new(snippet), width, height, &mut ViewerState::default())
}

fn row(buf: &Buffer, y: u16, from: u16, to: u16) -> String {
    (from..to).map(|x| buf[(x, y)].symbol()).collect()
}

fn screen(buf: &Buffer) -> String {
    let area = buf.area;
    (0..area.height)
        .map(|y| row(buf, y, 0, area.width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Body cells of row `index`, i.e. inside the frame and below the header.
fn body_row(buf: &Buffer, index: u16) -> String {
    row(buf, 3 + index, 1, buf.area.width - 1)
}

#[test]
fn renders_header_and_preserved_whitespace() {
    let snippet = CodeSnippet::new("line1\n\n  indented line\nline2", "Python");
    let buf = render(&snippet, 24, 8);

    insta::assert_snapshot!(screen(&buf), @r"
    ┌──────────────────────┐
    │Agent Code      Python│
    │──────────────────────│
    │line1                 │
    │                      │
    │  indented line       │
    │line2                 │
    └──────────────────────┘
    ");
}

#[test]
fn custom_title_replaces_default() {
    let snippet = CodeSnippet::new("x", "Rust");
    let mut state = ViewerState::default();
    let buf = render_with(CodeViewer::new(&snippet).title("Tool Call"), 24, 6, &mut state);
    assert!(row(&buf, 1, 1, 23).starts_with("Tool Call"));
    assert!(row(&buf, 1, 1, 23).ends_with("Rust"));
}

#[test]
fn visible_text_reproduces_printable_content() {
    let content = "def f(x):\n    return x  \n\n\tpass\nend";
    let snippet = CodeSnippet::new(content.replace('\t', "    "), "Python");
    let buf = render(&snippet, 30, 10);

    let rebuilt = snippet
        .content()
        .split('\n')
        .enumerate()
        .map(|(i, line)| row(&buf, 3 + i as u16, 1, 1 + line.chars().count() as u16))
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(rebuilt, snippet.content());
}

#[test]
fn tabs_expand_to_tab_stops() {
    let snippet = CodeSnippet::new("\tx\nab\ty", "Text");
    let buf = render(&snippet, 20, 7);
    assert_eq!(body_row(&buf, 0).trim_end(), "    x");
    assert_eq!(body_row(&buf, 1).trim_end(), "ab  y");
}

#[test]
fn long_line_scrolls_horizontally_without_truncation() {
    let line: String = (0..500).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    let snippet = CodeSnippet::new(line.clone(), "Text");
    let mut state = ViewerState::default();

    let buf = render_with(CodeViewer::new(&snippet), 40, 6, &mut state);
    assert_eq!(body_row(&buf, 0), &line[..38]);
    assert!(state.can_scroll_horizontally());
    assert_eq!(state.content_size(), (500, 1));

    // Every window lines up with the source, and the last one reaches the end
    loop {
        let (offset, _) = state.offset();
        let buf = render_with(CodeViewer::new(&snippet), 40, 6, &mut state);
        assert_eq!(body_row(&buf, 0), &line[offset..offset + 38]);
        if offset + 38 == line.len() {
            break;
        }
        state.scroll_right(38);
        assert!(state.offset().0 > offset);
    }
}

#[test]
fn horizontal_scrollbar_stays_on_the_border() {
    let snippet = CodeSnippet::new("x".repeat(200), "Text");
    let buf = render(&snippet, 30, 6);
    // Body cells are untouched by the scrollbar
    assert_eq!(body_row(&buf, 0), "x".repeat(28));
    let bottom = row(&buf, 5, 1, 29);
    assert!(!bottom.contains('x'));
}

#[test]
fn vertical_scroll_clamps_at_the_end() {
    let content = (0..50).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
    let snippet = CodeSnippet::new(content, "Text");
    let mut state = ViewerState::default();

    render_with(CodeViewer::new(&snippet), 20, 10, &mut state);
    assert!(state.can_scroll_vertically());
    assert_eq!(state.viewport(), (18, 6));

    state.end();
    let buf = render_with(CodeViewer::new(&snippet), 20, 10, &mut state);
    assert_eq!(state.offset().1, 44);
    assert_eq!(body_row(&buf, 5).trim_end(), "line 49");

    state.scroll_down(10);
    assert_eq!(state.offset().1, 44);

    state.home();
    let buf = render_with(CodeViewer::new(&snippet), 20, 10, &mut state);
    assert_eq!(body_row(&buf, 0).trim_end(), "line 0");
}

#[test]
fn wrap_breaks_long_lines_at_the_body_width() {
    let snippet = CodeSnippet::new("abcdefghij\nk", "Text");
    let mut state = ViewerState::default();
    let buf = render_with(
        CodeViewer::new(&snippet).overflow(Overflow::Wrap),
        8,
        8,
        &mut state,
    );
    assert_eq!(body_row(&buf, 0), "abcdef");
    assert_eq!(body_row(&buf, 1).trim_end(), "ghij");
    assert_eq!(body_row(&buf, 2).trim_end(), "k");
    assert!(!state.can_scroll_horizontally());
}

#[test]
fn empty_content_renders_an_empty_body() {
    let snippet = CodeSnippet::new("", "Python");
    let buf = render(&snippet, 20, 6);
    assert!(row(&buf, 1, 1, 19).ends_with("Python"));
    assert_eq!(body_row(&buf, 0).trim(), "");
    assert_eq!(body_row(&buf, 1).trim(), "");
}

#[test]
fn empty_label_leaves_label_region_blank() {
    let snippet = CodeSnippet::new("x = 1", "");
    let buf = render(&snippet, 20, 6);
    assert_eq!(row(&buf, 1, 1, 19).trim_end(), "Agent Code");
    assert_eq!(body_row(&buf, 0).trim_end(), "x = 1");
}

#[test]
fn markup_is_shown_literally() {
    let content = "<script>alert(1)</script>\n</code></pre><b>bold</b>";
    let snippet = CodeSnippet::new(content, "HTML");
    let buf = render(&snippet, 40, 7);
    assert_eq!(body_row(&buf, 0).trim_end(), "<script>alert(1)</script>");
    assert_eq!(body_row(&buf, 1).trim_end(), "</code></pre><b>bold</b>");
    // Frame is intact
    assert_eq!(row(&buf, 6, 1, 39), "─".repeat(38));
}

#[test]
fn terminal_escapes_never_reach_the_buffer() {
    let snippet = CodeSnippet::new("\x1b[2J\x1b]0;pwned\x07\u{202e}evil", "Sh\x1b[31m");
    let buf = render(&snippet, 40, 6);
    for cell in buf.content() {
        assert!(
            !cell.symbol().chars().any(|c| c.is_control()),
            "raw control character in cell {:?}",
            cell.symbol()
        );
    }
    assert!(body_row(&buf, 0).starts_with("\u{241b}[2J\u{241b}]0;pwned\u{2407}<U+202E>evil"));
}

#[test]
fn rendering_is_idempotent() {
    let snippet = CodeSnippet::new("fn main() {\n\tprintln!(\"hi\");\n}", "Rust");
    let first = render(&snippet, 30, 8);
    let second = render(&snippet, 30, 8);
    assert_eq!(first, second);
}

#[test]
fn wide_glyph_in_one_column_body_stays_visible() {
    let snippet = CodeSnippet::new("日本", "Text");
    let mut state = ViewerState::default();
    let viewer = CodeViewer::new(&snippet).overflow(Overflow::Wrap);
    let buf = render_with(viewer, 3, 7, &mut state);
    assert_eq!(body_row(&buf, 0), "\u{fffd}");
    assert_eq!(body_row(&buf, 1), "\u{fffd}");
    assert_eq!(state.content_size(), (1, 2));
}

#[test]
fn tiny_areas_do_not_panic() {
    let snippet = CodeSnippet::new("some code\nmore", "Python");
    for (w, h) in [(0, 0), (1, 1), (2, 2), (3, 3), (5, 4), (10, 3)] {
        render(&snippet, w, h);
    }
}
