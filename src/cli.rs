//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::config::ThemeSection;
use crate::viewer::Overflow;

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Interactive terminal viewer (default)
    #[default]
    Tui,
    /// Plain text with control characters made visible
    Text,
    /// Self-contained HTML block
    Html,
}

/// CLI-compatible overflow enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
pub enum OverflowArg {
    /// Keep long lines on one row and scroll horizontally
    Scroll,
    /// Break long lines at the viewer width
    Wrap,
}

impl From<OverflowArg> for Overflow {
    fn from(arg: OverflowArg) -> Self {
        match arg {
            OverflowArg::Scroll => Overflow::Scroll,
            OverflowArg::Wrap => Overflow::Wrap,
        }
    }
}

fn css_color(s: &str) -> Result<String, String> {
    s.parse::<csscolorparser::Color>()
        .map(|_| s.to_string())
        .map_err(|e| e.to_string())
}

/// Read-only code snippet viewer with whitespace-preserving, escape-safe rendering.
#[derive(Parser, Debug)]
#[command(name = "snipview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Snippet file to show ("-" reads stdin). Defaults to the built-in sample.
    #[arg(value_name = "FILE", conflicts_with = "gallery")]
    pub input: Option<PathBuf>,

    /// Language label shown in the header (inferred from the file extension if omitted).
    /// Gallery entries carry their own labels.
    #[arg(short, long, conflicts_with = "gallery")]
    pub language: Option<String>,

    /// Header title. Gallery entries carry their own titles.
    #[arg(short, long, conflicts_with = "gallery")]
    pub title: Option<String>,

    /// YAML or JSON manifest listing several snippets
    #[arg(short, long, value_name = "FILE")]
    pub gallery: Option<PathBuf>,

    /// Output format: tui, text or html
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tui)]
    pub format: OutputFormat,

    /// Output file for text/html (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Long line handling
    #[arg(long, value_enum)]
    pub overflow: Option<OverflowArg>,

    /// Tab stop width in columns
    #[arg(long, value_name = "COLUMNS")]
    pub tab_width: Option<usize>,

    /// Body background color in any CSS format
    #[arg(long, value_parser = css_color)]
    pub background: Option<String>,

    /// Body text color in any CSS format
    #[arg(long, value_parser = css_color)]
    pub foreground: Option<String>,

    /// Border color in any CSS format
    #[arg(long, value_parser = css_color)]
    pub border: Option<String>,

    /// Load configuration from TOML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Save the resolved configuration to TOML file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Log file path (default: snipview.log)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error (default: info)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Generate shell completions for the specified shell
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}

/// Nested view of the flags that map onto [`crate::config::ViewerConfig`].
///
/// Only flags the user set are serialized, so Figment layering lets them win
/// over the TOML file without clobbering it with defaults.
#[derive(Debug, Default, Serialize)]
pub struct ConfigOverrides {
    pub viewer: ViewerOverrides,
    pub theme: ThemeSection,
}

#[derive(Debug, Default, Serialize)]
pub struct ViewerOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
}

impl Cli {
    /// Convert flat CLI args to nested overrides for Figment merging.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            viewer: ViewerOverrides {
                title: self.title.clone(),
                tab_width: self.tab_width,
                overflow: self.overflow.map(Into::into),
            },
            theme: ThemeSection {
                background: self.background.clone(),
                foreground: self.foreground.clone(),
                border: self.border.clone(),
                ..Default::default()
            },
        }
    }
}
