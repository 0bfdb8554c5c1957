//! The snippet payload handed to the viewer.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::neutralize::{display_width, neutralize_line};

/// Label used when no language can be inferred.
pub const FALLBACK_LABEL: &str = "Text";

/// Error type for snippet construction.
#[derive(Debug)]
pub enum SnippetError {
    /// Reading the source failed
    Io {
        path: Option<PathBuf>,
        source: std::io::Error,
    },
    /// Content is not valid UTF-8
    InvalidUtf8 { offset: usize },
}

impl std::fmt::Display for SnippetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                path: Some(path),
                source,
            } => write!(f, "Failed to read {}: {}", path.display(), source),
            Self::Io { path: None, source } => write!(f, "Failed to read input: {}", source),
            Self::InvalidUtf8 { offset } => {
                write!(f, "Snippet is not valid UTF-8 (first bad byte at {})", offset)
            }
        }
    }
}

impl std::error::Error for SnippetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidUtf8 { .. } => None,
        }
    }
}

/// Source text plus its display label.
///
/// Both fields are fixed at construction; the viewer only ever borrows them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSnippet {
    content: String,
    language_label: String,
}

impl CodeSnippet {
    pub fn new(content: impl Into<String>, language_label: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            language_label: language_label.into(),
        }
    }

    /// Build a snippet from raw bytes, rejecting anything that is not UTF-8.
    pub fn from_bytes(bytes: Vec<u8>, language_label: &str) -> Result<Self, SnippetError> {
        let content = String::from_utf8(bytes).map_err(|e| SnippetError::InvalidUtf8 {
            offset: e.utf8_error().valid_up_to(),
        })?;
        Ok(Self::new(content, language_label))
    }

    /// Read a snippet from a file.
    ///
    /// Without an explicit label, the language is inferred from the extension.
    #[instrument(level = "debug")]
    pub fn from_path(path: &Path, language_label: Option<&str>) -> Result<Self, SnippetError> {
        let bytes = std::fs::read(path).map_err(|source| SnippetError::Io {
            path: Some(path.to_path_buf()),
            source,
        })?;
        let label = language_label.unwrap_or_else(|| language_for_path(path));
        let snippet = Self::from_bytes(bytes, label)?;
        debug!(
            lines = snippet.line_count(),
            label = snippet.language_label(),
            "Loaded snippet"
        );
        Ok(snippet)
    }

    /// Read a snippet from any reader (stdin).
    pub fn from_reader(mut reader: impl Read, language_label: &str) -> Result<Self, SnippetError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| SnippetError::Io { path: None, source })?;
        Self::from_bytes(bytes, language_label)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn language_label(&self) -> &str {
        &self.language_label
    }

    /// Number of display lines (an empty snippet still has one).
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Widest line in terminal columns, after neutralization.
    pub fn max_line_width(&self, tab_width: usize) -> usize {
        self.content
            .split('\n')
            .map(|line| display_width(&neutralize_line(line, tab_width)))
            .max()
            .unwrap_or(0)
    }
}

impl Default for CodeSnippet {
    fn default() -> Self {
        Self::new("", FALLBACK_LABEL)
    }
}

/// Extension to display name table.
const LANGUAGES: &[(&str, &str)] = &[
    ("rs", "Rust"),
    ("py", "Python"),
    ("js", "JavaScript"),
    ("mjs", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TSX"),
    ("jsx", "JSX"),
    ("go", "Go"),
    ("sh", "Shell"),
    ("bash", "Shell"),
    ("toml", "TOML"),
    ("yaml", "YAML"),
    ("yml", "YAML"),
    ("json", "JSON"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("md", "Markdown"),
    ("c", "C"),
    ("h", "C"),
    ("cpp", "C++"),
    ("hpp", "C++"),
    ("java", "Java"),
    ("rb", "Ruby"),
    ("sql", "SQL"),
];

/// Look up a display name for a file extension (case-insensitive).
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, name)| *name)
}

/// Infer a display label from a path, falling back to [`FALLBACK_LABEL`].
pub fn language_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(language_for_extension)
        .unwrap_or(FALLBACK_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neutralize::DEFAULT_TAB_WIDTH;

    #[test]
    fn accessors_return_input_unchanged() {
        let snippet = CodeSnippet::new("def f():\n    pass\n", "Python");
        assert_eq!(snippet.content(), "def f():\n    pass\n");
        assert_eq!(snippet.language_label(), "Python");
        assert_eq!(snippet.line_count(), 3);
    }

    #[test]
    fn invalid_utf8_fails_fast() {
        let err = CodeSnippet::from_bytes(vec![b'o', b'k', 0xff, b'x'], "Text").unwrap_err();
        assert!(matches!(err, SnippetError::InvalidUtf8 { offset: 2 }));
    }

    #[test]
    fn reader_input() {
        let snippet = CodeSnippet::from_reader("echo hi".as_bytes(), "Shell").unwrap();
        assert_eq!(snippet.content(), "echo hi");
    }

    #[test]
    fn language_inference() {
        assert_eq!(language_for_extension("PY"), Some("Python"));
        assert_eq!(language_for_extension("xyz"), None);
        assert_eq!(language_for_path(Path::new("agent.rs")), "Rust");
        assert_eq!(language_for_path(Path::new("Makefile")), FALLBACK_LABEL);
    }

    #[test]
    fn max_width_uses_expanded_tabs() {
        let snippet = CodeSnippet::new("\tx\nabc", "Text");
        assert_eq!(snippet.max_line_width(4), 5);
        assert_eq!(snippet.max_line_width(DEFAULT_TAB_WIDTH), 5);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CodeSnippet::from_path(Path::new("/nonexistent/snippet.py"), None).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/snippet.py"));
    }
}
