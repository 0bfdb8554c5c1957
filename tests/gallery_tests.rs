//! Tests for loading snippet galleries from manifests.

use std::fs;

use snipview::gallery::{Gallery, GalleryError, builtin_snippet};
use tempfile::tempdir;

#[test]
fn loads_yaml_with_inline_and_file_entries() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();
    let manifest = dir.path().join("gallery.yaml");
    fs::write(
        &manifest,
        r#"
snippets:
  - title: Agent
    language: Python
    content: "print('hi')"
  - title: Entry point
    path: main.rs
  - content: plain
"#,
    )
    .unwrap();

    let gallery = Gallery::load(&manifest).unwrap();
    assert_eq!(gallery.len(), 3);

    let agent = gallery.get(0).unwrap();
    assert_eq!(agent.title, "Agent");
    assert_eq!(agent.snippet.language_label(), "Python");

    let entry = gallery.get(1).unwrap();
    assert_eq!(entry.snippet.content(), "fn main() {}\n");
    assert_eq!(entry.snippet.language_label(), "Rust");

    let plain = gallery.get(2).unwrap();
    assert_eq!(plain.title, "Snippet 3");
    assert_eq!(plain.snippet.language_label(), "Text");
}

#[test]
fn loads_json_by_extension() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("gallery.json");
    fs::write(
        &manifest,
        r#"{"snippets":[{"title":"One","language":"Go","content":"package main"}]}"#,
    )
    .unwrap();

    let gallery = Gallery::load(&manifest).unwrap();
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery.get(0).unwrap().snippet.language_label(), "Go");
}

#[test]
fn rejects_bad_manifests() {
    let dir = tempdir().unwrap();

    let empty = dir.path().join("empty.yaml");
    fs::write(&empty, "snippets: []\n").unwrap();
    assert!(matches!(Gallery::load(&empty), Err(GalleryError::Empty { .. })));

    let missing = dir.path().join("missing.yaml");
    fs::write(&missing, "snippets:\n  - title: Nothing\n").unwrap();
    assert!(matches!(
        Gallery::load(&missing),
        Err(GalleryError::MissingSource { index: 0 })
    ));

    let both = dir.path().join("both.yaml");
    fs::write(&both, "snippets:\n  - content: a\n    path: b.py\n").unwrap();
    assert!(matches!(
        Gallery::load(&both),
        Err(GalleryError::AmbiguousSource { index: 0 })
    ));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{not json").unwrap();
    assert!(matches!(Gallery::load(&broken), Err(GalleryError::Parse { .. })));

    assert!(matches!(
        Gallery::load(&dir.path().join("absent.yaml")),
        Err(GalleryError::Io { .. })
    ));
}

#[test]
fn navigation_wraps_around() {
    let gallery = Gallery::single("Only", builtin_snippet());
    assert_eq!(gallery.next_index(0), 0);
    assert_eq!(gallery.prev_index(0), 0);
}

#[test]
fn builtin_sample_is_python() {
    let sample = builtin_snippet();
    assert_eq!(sample.language_label(), "Python");
    assert!(sample.line_count() > 10);
}
