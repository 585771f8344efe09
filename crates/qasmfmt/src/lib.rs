//! Canonical source formatter for `OpenQASM` 3
//!
//! `qasmfmt` rewrites QASM3 programs into one canonical layout: one
//! statement per line, one space after commas, bodies indented, blank lines
//! only where the layout rules call for them. Comments are kept on the line
//! they were written on. Formatting is idempotent.
//!
//! # Pipeline
//!
//! 1. [`normalize`] splits concatenated statements onto their own lines and
//!    repairs missing spaces (`qubit[2]q`, `hq[0]`, `measureq->c`).
//! 2. [`parse`] tokenizes (comments go to a hidden channel) and builds the
//!    syntax tree.
//! 3. [`collect_comments`] gathers the hidden-channel comments.
//! 4. [`print`] renders the tree and interleaves the comments.
//!
//! # Supported Syntax
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version declaration | ✅ | `OPENQASM 3.0;` |
//! | Includes | ✅ | `include "stdgates.inc";` |
//! | Qubit declarations | ✅ | `qubit[5] q;` |
//! | Classical declarations | ✅ | `const int[32] n = 4;` |
//! | Gate calls and modifiers | ✅ | `ctrl @ rz(pi/4) q[0], q[1];` |
//! | Measurements | ✅ | `measure q -> c;`, `c = measure q;` |
//! | Barrier, reset, delay | ✅ | `barrier q;`, `delay[100ns] q;` |
//! | Control flow | ✅ | `if`, `else`, `for`, `while`, `box` |
//! | Definitions | ✅ | `gate`, `def` |
//! | Comments | ✅ | `// line`, `/* block */` |
//! | Other statements | kept as tokens | `let r = q[0:1];` |
//!
//! # Example
//!
//! ```rust
//! use qasmfmt::{FormatConfig, check, format};
//!
//! let formatted = format("OPENQASM 3.0;qubit[2]q;hq[0];cxq[0],q[1];").unwrap();
//! assert_eq!(formatted, "OPENQASM 3.0;\nqubit[2] q;\nh q[0];\ncx q[0], q[1];\n");
//!
//! assert!(check(&formatted, &FormatConfig::default()).unwrap());
//! ```
//!
//! # Example: Configuration
//!
//! ```rust
//! use qasmfmt::{FormatConfig, format_with_config};
//!
//! let config = FormatConfig::new(4, false);
//! let formatted = format_with_config("gate g a { h a; }", &config).unwrap();
//! assert_eq!(formatted, "gate g a {\n    h a;\n}");
//! ```

mod ast;
mod config;
mod error;
mod lexer;
mod normalize;
mod parser;
mod printer;
mod trivia;

use tracing::{debug, instrument};

pub use config::{DEFAULT_INDENT_WIDTH, FormatConfig, MAX_INDENT_WIDTH};
pub use error::{FormatError, FormatResult, ParseError, ParseResult};
pub use normalize::normalize;
pub use parser::ParsedSource;
pub use printer::{Category, blank_line_between, print};
pub use trivia::{Comment, collect_comments};

/// Largest input accepted by the formatting entry points.
pub const MAX_INPUT_BYTES: usize = 16 * 1024 * 1024;

// Re-export tree and token types for tooling
pub mod syntax {
    pub use crate::ast::*;
    pub use crate::lexer::{Channel, SpannedToken, Token, tokenize};
}

/// Format `source` with the default configuration.
pub fn format(source: &str) -> FormatResult<String> {
    format_with_config(source, &FormatConfig::default())
}

/// Format `source`.
///
/// Empty or whitespace-only input is returned unchanged.
///
/// # Errors
///
/// [`FormatError::InputTooLarge`] above [`MAX_INPUT_BYTES`], and
/// [`FormatError::ParseFailure`] when the normalized source does not parse.
#[instrument(skip_all, fields(len = source.len()))]
pub fn format_with_config(source: &str, config: &FormatConfig) -> FormatResult<String> {
    if source.trim().is_empty() {
        return Ok(source.to_string());
    }
    if source.len() > MAX_INPUT_BYTES {
        return Err(FormatError::InputTooLarge {
            size: source.len(),
            limit: MAX_INPUT_BYTES,
        });
    }

    let normalized = normalize(source);
    debug!(lines = normalized.lines().count(), "normalized");

    let parsed = parse(&normalized)?;
    let comments = collect_comments(&parsed.tokens);
    debug!(
        statements = parsed.program.statements.len(),
        comments = comments.len(),
        "parsed"
    );

    Ok(print(&parsed.program, &comments, config))
}

/// Whether `source` is already formatted under `config`.
///
/// # Errors
///
/// Same as [`format_with_config`].
pub fn check(source: &str, config: &FormatConfig) -> FormatResult<bool> {
    Ok(format_with_config(source, config)? == source)
}

/// Tokenize and parse `source` without normalizing it first.
///
/// # Errors
///
/// [`FormatError::ParseFailure`] when the source does not parse.
pub fn parse(source: &str) -> FormatResult<ParsedSource> {
    Ok(parser::parse(source)?)
}
