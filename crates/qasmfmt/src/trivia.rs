//! Comment collection from the hidden token channel.

use crate::lexer::{Channel, SpannedToken};

/// A source comment and where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment text including its `//` or `/* */` delimiters.
    pub text: String,
    /// 1-based line of the comment's first character.
    pub line: usize,
    /// Byte offset of the comment's first character.
    pub offset: usize,
}

/// Collect comments from a token stream, in source order.
///
/// Trailing whitespace (such as a `\r` before a line break) is dropped.
pub fn collect_comments(tokens: &[SpannedToken]) -> Vec<Comment> {
    tokens
        .iter()
        .filter(|t| t.channel() == Channel::Hidden)
        .filter(|t| t.text.starts_with("//") || t.text.starts_with("/*"))
        .map(|t| Comment {
            text: t.text.trim_end().to_string(),
            line: t.line,
            offset: t.span.start,
        })
        .collect()
}
