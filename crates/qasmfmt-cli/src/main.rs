//! qasmfmt Command-Line Interface
//!
//! Formats `OpenQASM` 3 files in place, prints them, or reports which
//! files would change.
//!
//! ```text
//! qasmfmt circuit.qasm             # print formatted source
//! qasmfmt -w src/                  # rewrite every .qasm file under src/
//! qasmfmt --check src/             # exit 1 if anything would change
//! cat bell.qasm | qasmfmt --diff   # show line changes for stdin
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser;
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{Mode, Summary, config, format};

/// qasmfmt - canonical source formatter for OpenQASM 3
#[derive(Parser, Debug)]
#[command(name = "qasmfmt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files or directories to format; `-` reads stdin
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Write formatted output back to the files
    #[arg(short, long, conflicts_with_all = ["check", "diff"])]
    write: bool,

    /// Exit 1 if any file is not formatted
    #[arg(long, conflicts_with = "diff")]
    check: bool,

    /// Print the changed lines of each file that is not formatted
    #[arg(long)]
    diff: bool,

    /// Spaces per indentation level
    #[arg(short, long, value_name = "N")]
    indent: Option<usize>,

    /// Do not end output with a newline
    #[arg(long)]
    no_newline: bool,

    /// Name used for stdin in messages and for config discovery
    #[arg(long, value_name = "PATH")]
    stdin_filename: Option<PathBuf>,

    /// Configuration file to use instead of discovering `qasmfmt.toml`
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore configuration files
    #[arg(long)]
    no_config: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.write {
            Mode::Write
        } else if self.check {
            Mode::Check
        } else if self.diff {
            Mode::Diff
        } else {
            Mode::Print
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so formatted output on stdout stays clean
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mode = cli.mode();
    let stdin_is_terminal = io::stdin().is_terminal();

    let paths = if cli.paths.is_empty() {
        if stdin_is_terminal {
            bail!("no input files provided");
        }
        vec![PathBuf::from(format::STDIN_PATH)]
    } else {
        cli.paths
    };

    if mode == Mode::Write && paths.iter().any(|p| format::is_stdin(p)) {
        eprintln!(
            "{} cannot use --write with stdin input",
            style("Error:").red().bold()
        );
        return Ok(ExitCode::from(2));
    }

    let mut config = if cli.no_config {
        qasmfmt::FormatConfig::default()
    } else if let Some(path) = &cli.config {
        config::load_file(path)?
    } else {
        let start = config::search_start(&paths, cli.stdin_filename.as_deref());
        config::discover(&start)?
    };
    if let Some(indent) = cli.indent {
        config = config.with_indent_width(indent);
    }
    if cli.no_newline {
        config = config.with_trailing_newline(false);
    }
    debug!(?mode, ?config, "resolved options");

    let stdin_name = cli
        .stdin_filename
        .as_deref()
        .unwrap_or(Path::new(format::STDIN_DISPLAY));

    let mut summary = Summary::default();
    for path in &paths {
        format::run_path(path, stdin_name, &config, mode, &mut summary);
    }
    debug!(
        files = summary.files,
        changed = summary.changed,
        failed = summary.failed,
        "done"
    );

    Ok(ExitCode::from(summary.exit_status(mode)))
}
