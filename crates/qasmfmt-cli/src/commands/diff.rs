//! Line-by-line change listing for `--diff`.

use std::io::{self, Write};
use std::path::Path;

use console::style;

/// One changed line, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine<'a> {
    Removed(usize, &'a str),
    Added(usize, &'a str),
}

/// Compare the two texts line by line at equal line numbers.
///
/// A line present on only one side is reported as removed or added.
pub fn line_diff<'a>(original: &'a str, formatted: &'a str) -> Vec<DiffLine<'a>> {
    let old: Vec<&str> = original.lines().collect();
    let new: Vec<&str> = formatted.lines().collect();

    let mut changes = Vec::new();
    for i in 0..old.len().max(new.len()) {
        let (before, after) = (old.get(i), new.get(i));
        if before == after {
            continue;
        }
        if let Some(&line) = before {
            changes.push(DiffLine::Removed(i + 1, line));
        }
        if let Some(&line) = after {
            changes.push(DiffLine::Added(i + 1, line));
        }
    }
    changes
}

/// Write the `---`/`+++` header and the changed lines for `path`.
///
/// Nothing is written when the texts differ only in line endings.
pub fn write_diff(
    out: &mut impl Write,
    original: &str,
    formatted: &str,
    path: &Path,
) -> io::Result<()> {
    let changes = line_diff(original, formatted);
    if changes.is_empty() {
        return Ok(());
    }

    writeln!(out, "{}", style(format!("--- {}", path.display())).bold())?;
    writeln!(out, "{}", style(format!("+++ {}", path.display())).bold())?;
    for change in changes {
        match change {
            DiffLine::Removed(n, line) => writeln!(out, "{}", style(format!("-{n}: {line}")).red())?,
            DiffLine::Added(n, line) => writeln!(out, "{}", style(format!("+{n}: {line}")).green())?,
        }
    }
    Ok(())
}
