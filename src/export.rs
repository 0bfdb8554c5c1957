//! Non-interactive renderings of a snippet: terminal-safe text and HTML.

use std::fmt::Write;

use crate::neutralize::{
    code_point_label, control_picture, display_lines, is_bidi_control, is_c1_control,
    neutralize_line,
};
use crate::snippet::CodeSnippet;
use crate::viewer::Overflow;

/// CSS class prefix for generated HTML elements.
pub const CLASS_PREFIX: &str = "snipview";

/// Plain text rendering: a header line followed by the neutralized body.
///
/// Control characters never reach the output raw, so the result is safe to
/// print to a terminal.
pub fn render_text(snippet: &CodeSnippet, title: &str, tab_width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} [{}]",
        neutralize_line(title, tab_width),
        neutralize_line(snippet.language_label(), tab_width)
    );
    for line in display_lines(snippet.content(), tab_width) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// HTML rendering as a self-contained block.
///
/// The snippet is escaped, never interpreted; whitespace survives through
/// `white-space: pre` (scroll) or `pre-wrap` (wrap), and tabs keep the
/// terminal's stop width through `tab-size`.
pub fn render_html(
    snippet: &CodeSnippet,
    title: &str,
    overflow: Overflow,
    tab_width: usize,
) -> String {
    let body_style = match overflow {
        Overflow::Scroll => "overflow-x:auto;white-space:pre;",
        Overflow::Wrap => "overflow-x:auto;white-space:pre-wrap;overflow-wrap:anywhere;",
    };

    let mut out = String::new();
    let _ = write!(out, "<div class=\"{CLASS_PREFIX}\">");
    let _ = write!(out, "<div class=\"{CLASS_PREFIX}-header\">");
    out.push_str("<h2>");
    html_escape_into(&mut out, title);
    out.push_str("</h2><span>");
    html_escape_into(&mut out, snippet.language_label());
    out.push_str("</span></div>");
    let _ = write!(
        out,
        "<pre class=\"{CLASS_PREFIX}-body\" style=\"{body_style}tab-size:{};font-family:monospace;\"><code>",
        tab_width.max(1)
    );
    html_escape_into(&mut out, snippet.content());
    out.push_str("</code></pre></div>\n");
    out
}

/// HTML-escape a string into the output buffer.
fn html_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' | '\t' | '\r' => out.push(c),
            c if c.is_ascii_control() => {
                let _ = write!(out, "&#x{:X};", control_picture(c) as u32);
            }
            c if is_c1_control(c) || is_bidi_control(c) => {
                html_escape_into(out, &code_point_label(c));
            }
            c if c.is_control() => out.push('\u{fffd}'),
            _ => out.push(c),
        }
    }
}
