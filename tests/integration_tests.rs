use std::fs;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn cmd() -> Command {
    cargo_bin_cmd!("snipview")
}

#[test]
fn test_cli_text_shows_builtin_sample() {
    cmd()
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Agent Code [Python]\n"))
        .stdout(predicate::str::contains("StateGraph"));
}

#[test]
fn test_cli_reads_file_and_infers_language() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.rs");
    fs::write(&path, "fn main() {\n    println!(\"hi\");\n}\n").unwrap();

    cmd()
        .arg(&path)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Agent Code [Rust]\n"))
        .stdout(predicate::str::contains("    println!(\"hi\");\n"));
}

#[test]
fn test_cli_reads_stdin() {
    cmd()
        .args(["-", "--format", "text", "--language", "Shell", "--title", "Tool Call"])
        .write_stdin("echo \"$HOME\"\n")
        .assert()
        .success()
        .stdout("Tool Call [Shell]\necho \"$HOME\"\n\n");
}

#[test]
fn test_cli_html_escapes_markup() {
    cmd()
        .args(["-", "--format", "html", "--language", "HTML"])
        .write_stdin("<script>alert(1)</script>")
        .assert()
        .success()
        .stdout(predicate::str::contains("&lt;script&gt;alert(1)&lt;/script&gt;"))
        .stdout(predicate::str::contains("<script>").not());
}

#[test]
fn test_cli_text_neutralizes_escapes() {
    cmd()
        .args(["-", "--format", "text"])
        .write_stdin("\x1b]0;title\x07\x1b[2J")
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b").not())
        .stdout(predicate::str::contains("\u{241b}]0;title\u{2407}\u{241b}[2J"));
}

#[test]
fn test_cli_rejects_invalid_utf8() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("binary.py");
    fs::write(&path, [b'o', b'k', 0xff, 0xfe]).unwrap();

    cmd()
        .arg(&path)
        .args(["--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn test_cli_missing_file_fails() {
    cmd()
        .args(["/nonexistent/snippet.py", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_cli_gallery_renders_every_entry() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("gallery.yaml");
    fs::write(
        &manifest,
        "snippets:\n  - title: First\n    language: Python\n    content: a = 1\n  - title: Second\n    content: b\n",
    )
    .unwrap();

    cmd()
        .arg("--gallery")
        .arg(&manifest)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout("First [Python]\na = 1\n\nSecond [Text]\nb\n");
}

#[test]
fn test_cli_gallery_conflicts_with_title() {
    cmd()
        .args(["--gallery", "gallery.yaml", "--title", "Ignored", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_cli_writes_output_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("snippet.html");

    cmd()
        .args(["--format", "html", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote snippet to"));

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<div class=\"snipview\">"));
    assert!(html.contains("<h2>Agent Code</h2><span>Python</span>"));
}

#[test]
fn test_cli_config_file_and_save() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("snipview.toml");
    fs::write(&config, "[viewer]\ntitle = \"Configured\"\n").unwrap();
    let saved = dir.path().join("saved.toml");

    cmd()
        .args(["-", "--format", "text", "--tab-width", "2", "--config"])
        .arg(&config)
        .arg("--save-config")
        .arg(&saved)
        .write_stdin("\tx")
        .assert()
        .success()
        .stdout("Configured [Text]\n  x\n");

    let written = fs::read_to_string(&saved).unwrap();
    assert!(written.contains("title = \"Configured\""));
    assert!(written.contains("tab_width = 2"));
}

#[test]
fn test_cli_rejects_bad_color() {
    cmd()
        .args(["--format", "text", "--border", "not-a-color"])
        .assert()
        .failure();
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("snipview"));
}
