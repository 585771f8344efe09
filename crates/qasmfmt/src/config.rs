//! Formatter configuration.

use serde::Deserialize;

use crate::error::FormatResult;

/// Upper bound accepted for [`FormatConfig::indent_width`].
pub const MAX_INDENT_WIDTH: usize = 1000;

/// Indent width used when none is configured.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Options controlling the printed layout.
///
/// Values are fixed once constructed; the `with_*` methods return a new
/// config. Out-of-range indent widths are clamped into
/// `0..=MAX_INDENT_WIDTH`.
///
/// A config is usually read from TOML; YAML is accepted as well. Unknown
/// keys are ignored and missing keys take their defaults:
///
/// ```rust
/// use qasmfmt::FormatConfig;
///
/// let config = FormatConfig::from_toml("indent_width = 4\ntrailing_newline = false\n").unwrap();
/// assert_eq!(config.indent_width(), 4);
/// assert!(!config.trailing_newline());
///
/// let config = FormatConfig::from_yaml("indent_width: 4\n").unwrap();
/// assert_eq!(config.indent_width(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    #[serde(alias = "indent")]
    indent_width: usize,
    #[serde(alias = "newline")]
    trailing_newline: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            trailing_newline: true,
        }
    }
}

impl FormatConfig {
    /// Create a config, clamping `indent_width` into range.
    pub fn new(indent_width: usize, trailing_newline: bool) -> Self {
        Self {
            indent_width: indent_width.min(MAX_INDENT_WIDTH),
            trailing_newline,
        }
    }

    /// Parse a TOML configuration document.
    pub fn from_toml(text: &str) -> FormatResult<Self> {
        let raw: Self = toml::from_str(text)?;
        Ok(Self::new(raw.indent_width, raw.trailing_newline))
    }

    /// Parse a YAML configuration document.
    pub fn from_yaml(text: &str) -> FormatResult<Self> {
        let raw: Self = serde_yaml_ng::from_str(text)?;
        Ok(Self::new(raw.indent_width, raw.trailing_newline))
    }

    /// Spaces per nesting level.
    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    /// Whether non-empty output ends with a newline.
    pub fn trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    #[must_use]
    pub fn with_indent_width(self, indent_width: usize) -> Self {
        Self::new(indent_width, self.trailing_newline)
    }

    #[must_use]
    pub fn with_trailing_newline(self, trailing_newline: bool) -> Self {
        Self::new(self.indent_width, trailing_newline)
    }

    /// Leading whitespace for a line nested `level` scopes deep.
    pub fn indent_str(&self, level: usize) -> String {
        " ".repeat(self.indent_width * level)
    }
}
