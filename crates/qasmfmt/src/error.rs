//! Error types for the formatter.

use thiserror::Error;

/// Errors raised while tokenizing or parsing normalized source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A character sequence no token matches.
    #[error("unrecognized input `{text}` at line {line}, column {column}")]
    Lex {
        line: usize,
        column: usize,
        text: String,
    },

    /// Unexpected token.
    #[error("unexpected token at line {line}: expected {expected}, found `{found}`")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("unexpected end of input: expected {0}")]
    UnexpectedEof(String),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors surfaced by the public formatting API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormatError {
    /// The normalized source could not be parsed into a program.
    #[error("failed to parse QASM: {0}")]
    ParseFailure(#[from] ParseError),

    /// Source exceeds [`MAX_INPUT_BYTES`](crate::MAX_INPUT_BYTES).
    #[error("input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },

    /// A TOML configuration document could not be read.
    #[error("invalid configuration: {0}")]
    InvalidToml(#[from] toml::de::Error),

    /// A YAML configuration document could not be read.
    #[error("invalid configuration: {0}")]
    InvalidYaml(#[from] serde_yaml_ng::Error),
}

/// Result type for formatting operations.
pub type FormatResult<T> = Result<T, FormatError>;
