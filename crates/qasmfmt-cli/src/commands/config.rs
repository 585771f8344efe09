//! Discovery and loading of `qasmfmt.toml` (or `qasmfmt.yaml`).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use qasmfmt::FormatConfig;
use tracing::debug;

use super::format::is_stdin;

/// Files looked up in the input's directory and its ancestors, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["qasmfmt.toml", "qasmfmt.yaml"];

/// Read a configuration file. An empty file yields the defaults.
///
/// `.yaml` and `.yml` files are read as YAML, anything else as TOML.
pub fn load_file(path: &Path) -> Result<FormatConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(FormatConfig::default());
    }
    let is_yaml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let config = if is_yaml {
        FormatConfig::from_yaml(&text)
    } else {
        FormatConfig::from_toml(&text)
    };
    config.with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Directory where the upward search for a config file begins.
///
/// The named stdin file wins, then the first path argument; a directory
/// argument is searched from itself, a file from its parent.
pub fn search_start(paths: &[PathBuf], stdin_filename: Option<&Path>) -> PathBuf {
    let parent_of = |path: &Path| {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    };

    if let Some(name) = stdin_filename {
        return parent_of(name);
    }
    match paths.first() {
        Some(path) if is_stdin(path) => PathBuf::from("."),
        Some(path) if path.is_dir() => path.clone(),
        Some(path) => parent_of(path),
        None => PathBuf::from("."),
    }
}

/// Nearest config file at or above `start`.
pub fn find_config_file(start: &Path) -> Result<Option<PathBuf>> {
    let start = if start.is_absolute() {
        start.to_path_buf()
    } else {
        env::current_dir()
            .context("failed to resolve the current directory")?
            .join(start)
    };

    Ok(start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }))
}

/// Load the nearest config file at or above `start`, or the defaults.
pub fn discover(start: &Path) -> Result<FormatConfig> {
    match find_config_file(start)? {
        Some(path) => {
            debug!(path = %path.display(), "using config file");
            load_file(&path)
        }
        None => Ok(FormatConfig::default()),
    }
}
