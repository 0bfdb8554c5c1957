//! TOML configuration file support for the viewer.

use std::path::Path;

use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::neutralize::DEFAULT_TAB_WIDTH;
use crate::viewer::{DEFAULT_TITLE, Overflow, ViewerTheme};

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading/writing file
    Io(std::io::Error),
    /// TOML parsing error
    Parse(toml::de::Error),
    /// TOML serialization error
    Serialize(toml::ser::Error),
    /// Layered extraction error
    Figment(Box<figment::Error>),
    /// Invalid color format
    InvalidColor(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "TOML parse error: {}", e),
            Self::Serialize(e) => write!(f, "TOML serialize error: {}", e),
            Self::Figment(e) => write!(f, "Configuration error: {}", e),
            Self::InvalidColor(s) => write!(f, "Invalid color: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Serialize(e)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Figment(Box::new(e))
    }
}

/// Root configuration structure for TOML files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Layout and text handling
    pub viewer: ViewerSection,
    /// Colors
    pub theme: ThemeSection,
}

/// Layout and text handling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSection {
    /// Header title
    pub title: String,
    /// Tab stop width in columns
    pub tab_width: usize,
    /// Long line handling: scroll or wrap
    pub overflow: Overflow,
}

impl Default for ViewerSection {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            tab_width: DEFAULT_TAB_WIDTH,
            overflow: Overflow::Scroll,
        }
    }
}

/// Viewer colors (any CSS color format). Unset fields keep terminal defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrollbar: Option<String>,
}

impl ViewerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Layer defaults, an optional TOML file, then explicit overrides.
    ///
    /// `overrides` must only carry the keys the user actually set; anything it
    /// serializes wins over the file.
    pub fn resolve<T: Serialize>(file: Option<&Path>, overrides: &T) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            if !path.exists() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} not found", path.display()),
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        let config = figment.merge(Serialized::defaults(overrides)).extract()?;
        Ok(config)
    }

    /// Parse the configured colors into a [`ViewerTheme`].
    pub fn theme(&self) -> Result<ViewerTheme, ConfigError> {
        let defaults = ViewerTheme::default();
        let pick = |value: &Option<String>, fallback: Color| -> Result<Color, ConfigError> {
            value.as_deref().map_or(Ok(fallback), parse_color)
        };
        Ok(ViewerTheme {
            background: pick(&self.theme.background, defaults.background)?,
            foreground: pick(&self.theme.foreground, defaults.foreground)?,
            border: pick(&self.theme.border, defaults.border)?,
            title: pick(&self.theme.title, defaults.title)?,
            label: pick(&self.theme.label, defaults.label)?,
            scrollbar: pick(&self.theme.scrollbar, defaults.scrollbar)?,
        })
    }
}

/// Parse any CSS color string into a terminal RGB color.
pub fn parse_color(s: &str) -> Result<Color, ConfigError> {
    let color = s
        .parse::<csscolorparser::Color>()
        .map_err(|e| ConfigError::InvalidColor(format!("{s}: {e}")))?;
    let [r, g, b, _] = color.to_rgba8();
    Ok(Color::Rgb(r, g, b))
}
