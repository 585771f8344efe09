//! Formatting of files, directories and stdin.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use qasmfmt::{FormatConfig, format_with_config};
use tracing::debug;
use walkdir::WalkDir;

use super::{Mode, Summary, diff};

/// Path argument that stands for standard input.
pub const STDIN_PATH: &str = "-";

/// Name shown for standard input when none is given.
pub const STDIN_DISPLAY: &str = "<stdin>";

/// File extension of the sources picked up from directories.
const QASM_EXTENSION: &str = "qasm";

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_PATH
}

/// Format one command-line path, recording the outcome in `summary`.
///
/// Errors are reported on stderr and counted; they never stop the run.
pub fn run_path(
    path: &Path,
    stdin_name: &Path,
    config: &FormatConfig,
    mode: Mode,
    summary: &mut Summary,
) {
    if is_stdin(path) {
        let result = read_stdin().and_then(|input| format_source(&input, stdin_name, config, mode));
        record(summary, stdin_name, result);
    } else if path.is_dir() {
        for file in qasm_files(path) {
            let result = format_file(&file, config, mode);
            record(summary, &file, result);
        }
    } else {
        let result = format_file(path, config, mode);
        record(summary, path, result);
    }
}

fn record(summary: &mut Summary, path: &Path, result: Result<bool>) {
    match result {
        Ok(changed) => {
            summary.files += 1;
            if changed {
                summary.changed += 1;
            }
        }
        Err(e) => {
            eprintln!(
                "{} {}: {:#}",
                style("Error:").red().bold(),
                path.display(),
                e
            );
            summary.failed += 1;
        }
    }
}

/// Every `.qasm` file below `dir`, in a stable order.
pub fn qasm_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext == QASM_EXTENSION)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    Ok(input)
}

/// Format a file according to `mode`. Returns whether it changed.
fn format_file(path: &Path, config: &FormatConfig, mode: Mode) -> Result<bool> {
    debug!(path = %path.display(), "formatting file");
    let input =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    if mode != Mode::Write {
        return format_source(&input, path, config, mode);
    }

    let output = format_with_config(&input, config)?;
    if input == output {
        return Ok(false);
    }
    fs::write(path, &output).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("Formatted: {}", path.display());
    Ok(true)
}

/// Format text that is not written back. Returns whether it changed.
fn format_source(input: &str, path: &Path, config: &FormatConfig, mode: Mode) -> Result<bool> {
    let output = format_with_config(input, config)?;
    let changed = input != output;

    let mut stdout = io::stdout().lock();
    match mode {
        Mode::Print | Mode::Write => stdout.write_all(output.as_bytes())?,
        Mode::Check => {
            if changed {
                eprintln!("Would reformat: {}", path.display());
            }
        }
        Mode::Diff => {
            if changed {
                diff::write_diff(&mut stdout, input, &output, path)?;
            }
        }
    }
    stdout.flush()?;
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdin_path() {
        assert!(is_stdin(Path::new("-")));
        assert!(!is_stdin(Path::new("-.qasm")));
        assert!(!is_stdin(Path::new("a.qasm")));
    }

    #[test]
    fn test_qasm_files_walks_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("b.qasm"), "").unwrap();
        fs::write(dir.path().join("a.qasm"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("sub/deeper/c.qasm"), "").unwrap();
        fs::create_dir_all(dir.path().join("dir.qasm")).unwrap();

        let names: Vec<_> = qasm_files(dir.path())
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            [
                PathBuf::from("a.qasm"),
                PathBuf::from("b.qasm"),
                PathBuf::from("sub/deeper/c.qasm"),
            ]
        );
    }

    #[test]
    fn test_write_mode_rewrites_only_changed_files() {
        let dir = tempfile::tempdir().unwrap();
        let messy = dir.path().join("messy.qasm");
        let clean = dir.path().join("clean.qasm");
        fs::write(&messy, "qubit q;h q;").unwrap();
        fs::write(&clean, "qubit q;\n").unwrap();

        let config = FormatConfig::default();
        assert!(format_file(&messy, &config, Mode::Write).unwrap());
        assert!(!format_file(&clean, &config, Mode::Write).unwrap());
        assert_eq!(fs::read_to_string(&messy).unwrap(), "qubit q;\nh q;\n");
    }

    #[test]
    fn test_errors_are_counted_and_named() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.qasm");
        fs::write(&broken, "malformed qasm").unwrap();

        let mut summary = Summary::default();
        let config = FormatConfig::default();
        run_path(&broken, Path::new(STDIN_DISPLAY), &config, Mode::Check, &mut summary);
        run_path(
            &dir.path().join("missing.qasm"),
            Path::new(STDIN_DISPLAY),
            &config,
            Mode::Check,
            &mut summary,
        );
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.files, 0);
        assert_eq!(summary.exit_status(Mode::Check), 1);
    }
}
