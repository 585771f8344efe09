//! CLI command implementations.

pub mod config;
pub mod diff;
pub mod format;

/// What to do with each formatted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print formatted source to stdout.
    Print,
    /// Rewrite files that change.
    Write,
    /// Report files that would change.
    Check,
    /// Print the changed lines of files that would change.
    Diff,
}

/// Counts gathered over one run.
#[derive(Debug, Default)]
pub struct Summary {
    pub files: usize,
    pub changed: usize,
    pub failed: usize,
}

impl Summary {
    /// Process exit status: 1 on any failure, or on any change in check
    /// and diff modes.
    pub fn exit_status(&self, mode: Mode) -> u8 {
        let reports_changes = matches!(mode, Mode::Check | Mode::Diff);
        u8::from(self.failed > 0 || (reports_changes && self.changed > 0))
    }
}
