//! Neutralization of snippet text before it reaches a terminal buffer.
//!
//! Terminal "markup" is control characters: ESC starts CSI/OSC sequences, BEL
//! rings, backspace and carriage return move the cursor, and bidi overrides
//! reorder the surrounding cells. None of these may reach the buffer raw.
//! Printable text (including `<`, `>` and `&`) passes through unchanged.

use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;

/// Default tab stop width in columns.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Split content into neutralized display lines.
///
/// Splits on `'\n'` only, so an empty string yields a single empty line and a
/// trailing newline yields a trailing empty line. Joining the result with
/// `"\n"` restores any content made of printable characters and newlines.
pub fn display_lines(content: &str, tab_width: usize) -> Vec<String> {
    content
        .split('\n')
        .map(|line| neutralize_line(line, tab_width).into_owned())
        .collect()
}

/// Neutralize a single line (which must not contain `'\n'`).
///
/// Returns the input borrowed when no character needs rewriting.
pub fn neutralize_line(line: &str, tab_width: usize) -> Cow<'_, str> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if !line.chars().any(needs_rewrite) {
        return Cow::Borrowed(line);
    }

    let mut out = String::with_capacity(line.len() + 8);
    let mut column = 0usize;
    for c in line.chars() {
        match c {
            '\t' => {
                let spaces = if tab_width == 0 {
                    1
                } else {
                    tab_width - column % tab_width
                };
                out.extend(std::iter::repeat_n(' ', spaces));
                column += spaces;
            }
            c if c.is_ascii_control() => {
                out.push(control_picture(c));
                column += 1;
            }
            c if is_c1_control(c) || is_bidi_control(c) => {
                let escaped = code_point_label(c);
                column += escaped.len();
                out.push_str(&escaped);
            }
            c => {
                out.push(c);
                column += c.width().unwrap_or(0);
            }
        }
    }
    Cow::Owned(out)
}

/// Width of already-neutralized text in terminal columns, summed per
/// character the same way the viewer places cells.
pub fn display_width(line: &str) -> usize {
    line.chars().map(|c| c.width().unwrap_or(0)).sum()
}

fn needs_rewrite(c: char) -> bool {
    c.is_ascii_control() || is_c1_control(c) || is_bidi_control(c)
}

pub(crate) fn control_picture(c: char) -> char {
    match c {
        '\x7f' => '\u{2421}',
        c => char::from_u32(0x2400 + c as u32).unwrap_or('\u{fffd}'),
    }
}

/// Visible `<U+XXXX>` stand-in for characters that have no control picture.
pub(crate) fn code_point_label(c: char) -> String {
    format!("<U+{:04X}>", c as u32)
}

pub(crate) fn is_c1_control(c: char) -> bool {
    ('\u{80}'..='\u{9f}').contains(&c)
}

pub(crate) fn is_bidi_control(c: char) -> bool {
    matches!(
        c,
        '\u{200e}' | '\u{200f}' | '\u{202a}'..='\u{202e}' | '\u{2066}'..='\u{2069}'
    )
}
