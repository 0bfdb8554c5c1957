//! Ordered collections of snippets, loaded from YAML/JSON manifests.
//!
//! Manifest format:
//!
//! ```yaml
//! snippets:
//!   - title: Agent Code
//!     language: Python
//!     path: agent.py        # relative to the manifest
//!   - title: Inline
//!     content: "echo hi"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::snippet::{CodeSnippet, FALLBACK_LABEL, SnippetError, language_for_path};

/// Compiled-in sample: a small backend agent script.
pub const SAMPLE_AGENT: &str = include_str!("snippets/agent.py");

/// The sample shown when no input is given.
pub fn builtin_snippet() -> CodeSnippet {
    CodeSnippet::new(SAMPLE_AGENT, "Python")
}

/// Error type for gallery loading.
#[derive(Debug)]
pub enum GalleryError {
    /// Manifest could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Manifest is not valid YAML/JSON for the expected shape
    Parse { path: PathBuf, message: String },
    /// Manifest lists no snippets
    Empty { path: PathBuf },
    /// Entry has neither `content` nor `path`
    MissingSource { index: usize },
    /// Entry has both `content` and `path`
    AmbiguousSource { index: usize },
    /// Referenced snippet file failed to load
    Snippet(SnippetError),
}

impl std::fmt::Display for GalleryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "Failed to read {}: {}", path.display(), source),
            Self::Parse { path, message } => {
                write!(f, "Failed to parse {}: {}", path.display(), message)
            }
            Self::Empty { path } => write!(f, "{} lists no snippets", path.display()),
            Self::MissingSource { index } => {
                write!(f, "Snippet #{} needs either `content` or `path`", index + 1)
            }
            Self::AmbiguousSource { index } => write!(
                f,
                "Snippet #{} sets both `content` and `path`; pick one",
                index + 1
            ),
            Self::Snippet(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GalleryError {}

impl From<SnippetError> for GalleryError {
    fn from(e: SnippetError) -> Self {
        Self::Snippet(e)
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    snippets: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    title: Option<String>,
    language: Option<String>,
    content: Option<String>,
    path: Option<PathBuf>,
}

/// A titled snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    pub title: String,
    pub snippet: CodeSnippet,
}

/// Non-empty ordered list of snippets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    entries: Vec<GalleryEntry>,
}

// Every constructor yields at least one entry, so there is no `is_empty`.
#[allow(clippy::len_without_is_empty)]
impl Gallery {
    /// Gallery holding just `snippet`.
    pub fn single(title: impl Into<String>, snippet: CodeSnippet) -> Self {
        Self {
            entries: vec![GalleryEntry {
                title: title.into(),
                snippet,
            }],
        }
    }

    /// Load a YAML or JSON manifest (chosen by extension, YAML by default).
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        let content = std::fs::read_to_string(path).map_err(|source| GalleryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or(Path::new("."));
        let gallery = Self::parse(&content, path, base_dir)?;
        info!(entries = gallery.len(), path = %path.display(), "Loaded gallery");
        Ok(gallery)
    }

    fn parse(content: &str, path: &Path, base_dir: &Path) -> Result<Self, GalleryError> {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let manifest: Manifest = if is_json {
            serde_json::from_str::<Manifest>(content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<Manifest>(content).map_err(|e| e.to_string())
        }
        .map_err(|message| GalleryError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        if manifest.snippets.is_empty() {
            return Err(GalleryError::Empty {
                path: path.to_path_buf(),
            });
        }

        let entries = manifest
            .snippets
            .into_iter()
            .enumerate()
            .map(|(index, entry)| resolve_entry(index, entry, base_dir))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&GalleryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.entries.len()
    }

    pub fn prev_index(&self, index: usize) -> usize {
        (index + self.entries.len() - 1) % self.entries.len()
    }
}

fn resolve_entry(
    index: usize,
    entry: ManifestEntry,
    base_dir: &Path,
) -> Result<GalleryEntry, GalleryError> {
    let snippet = match (entry.content, entry.path) {
        (Some(_), Some(_)) => return Err(GalleryError::AmbiguousSource { index }),
        (None, None) => return Err(GalleryError::MissingSource { index }),
        (Some(content), None) => CodeSnippet::new(
            content,
            entry.language.as_deref().unwrap_or(FALLBACK_LABEL),
        ),
        (None, Some(path)) => {
            let path = if path.is_relative() {
                base_dir.join(path)
            } else {
                path
            };
            let label = entry
                .language
                .as_deref()
                .unwrap_or_else(|| language_for_path(&path));
            CodeSnippet::from_path(&path, Some(label))?
        }
    };

    let title = entry
        .title
        .unwrap_or_else(|| format!("Snippet {}", index + 1));
    debug!(index, title = %title, "Resolved gallery entry");

    Ok(GalleryEntry { title, snippet })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::DEFAULT_TITLE;

    #[test]
    fn builtin_is_the_agent_sample() {
        let gallery = Gallery::single(DEFAULT_TITLE, builtin_snippet());
        let entry = gallery.get(0).unwrap();
        assert_eq!(entry.title, "Agent Code");
        assert_eq!(entry.snippet.language_label(), "Python");
        assert!(entry.snippet.content().contains("StateGraph"));
    }

    #[test]
    fn indices_wrap_around() {
        let gallery = Gallery {
            entries: vec![
                GalleryEntry {
                    title: "a".into(),
                    snippet: CodeSnippet::default(),
                },
                GalleryEntry {
                    title: "b".into(),
                    snippet: CodeSnippet::default(),
                },
                GalleryEntry {
                    title: "c".into(),
                    snippet: CodeSnippet::default(),
                },
            ],
        };
        assert_eq!(gallery.next_index(2), 0);
        assert_eq!(gallery.prev_index(0), 2);
        assert_eq!(gallery.next_index(0), 1);
    }

    #[test]
    fn parse_yaml_inline_entries() {
        let yaml = r#"
snippets:
  - title: Hello
    language: Shell
    content: "echo <hi>"
  - content: "plain"
"#;
        let gallery = Gallery::parse(yaml, Path::new("g.yaml"), Path::new(".")).unwrap();
        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery.entries()[0].snippet.content(), "echo <hi>");
        assert_eq!(gallery.entries()[1].title, "Snippet 2");
        assert_eq!(gallery.entries()[1].snippet.language_label(), FALLBACK_LABEL);
    }

    #[test]
    fn parse_json_manifest() {
        let json = r#"{"snippets": [{"title": "J", "language": "JSON", "content": "{}"}]}"#;
        let gallery = Gallery::parse(json, Path::new("g.json"), Path::new(".")).unwrap();
        assert_eq!(gallery.entries()[0].snippet.language_label(), "JSON");
    }

    #[test]
    fn empty_manifest_is_rejected() {
        let err = Gallery::parse("snippets: []", Path::new("g.yaml"), Path::new(".")).unwrap_err();
        assert!(matches!(err, GalleryError::Empty { .. }));
    }

    #[test]
    fn entry_needs_exactly_one_source() {
        let both = "snippets:\n  - content: x\n    path: y.rs\n";
        let err = Gallery::parse(both, Path::new("g.yaml"), Path::new(".")).unwrap_err();
        assert!(matches!(err, GalleryError::AmbiguousSource { index: 0 }));

        let neither = "snippets:\n  - title: nothing\n";
        let err = Gallery::parse(neither, Path::new("g.yaml"), Path::new(".")).unwrap_err();
        assert!(matches!(err, GalleryError::MissingSource { index: 0 }));
    }
}
