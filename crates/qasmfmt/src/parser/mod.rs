//! Parser for `OpenQASM` 3.
//!
//! Recursive descent over the default-channel tokens. A statement that
//! does not match any known form but is still terminated by `;` (or by a
//! balanced `}`) is kept as [`Statement::Other`]; only input that cannot be
//! split into statements at all is an error.

mod expression;
mod statement;

use tracing::debug;

use crate::ast::{Block, Program, RawToken, Span, Statement, StatementOrScope, Version};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Channel, SpannedToken, Token, tokenize};

/// Result of [`parse`]: the tree plus every token, comments included.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub program: Program,
    pub tokens: Vec<SpannedToken>,
}

/// Parse normalized QASM3 source.
pub fn parse(source: &str) -> ParseResult<ParsedSource> {
    let tokens = tokenize(source)?;
    let program = Parser::new(&tokens).parse_program()?;
    Ok(ParsedSource { program, tokens })
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
}

#[allow(clippy::unnecessary_wraps)]
impl Parser {
    fn new(tokens: &[SpannedToken]) -> Self {
        Self {
            tokens: tokens
                .iter()
                .filter(|t| t.channel() == Channel::Default)
                .cloned()
                .collect(),
            pos: 0,
        }
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<Token> {
        self.peek_nth(0)
    }

    /// Peek `n` tokens past the current one.
    pub(super) fn peek_nth(&self, n: usize) -> Option<Token> {
        self.tokens.get(self.pos + n).map(|t| t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token.
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<SpannedToken> {
        if self.check(expected) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(&format!("`{expected}`")))
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: Token) -> bool {
        self.peek() == Some(token)
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Error describing the current token, or end of input.
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(found) => ParseError::UnexpectedToken {
                line: found.line,
                expected: expected.to_string(),
                found: found.text.clone(),
            },
            None => ParseError::UnexpectedEof(expected.to_string()),
        }
    }

    /// Line of the most recently consumed token.
    pub(super) fn previous_line(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(1, |t| t.line)
    }

    /// Span from token index `start` through the last consumed token.
    pub(super) fn span_from(&self, start: usize) -> Span {
        let last = self.pos.checked_sub(1).and_then(|i| self.tokens.get(i));
        match (self.tokens.get(start), last) {
            (Some(first), Some(last)) => Span {
                start: first.span.start,
                end: last.span.end,
                start_line: first.line,
                end_line: last.line,
            },
            _ => Span::default(),
        }
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> ParseResult<Program> {
        let version = if self.check(Token::OpenQasm) {
            Some(self.parse_version()?)
        } else {
            None
        };

        let mut statements = Vec::new();
        while !self.is_eof() {
            if self.consume(Token::Semicolon) {
                continue;
            }
            if self.check(Token::RBrace) {
                return Err(self.unexpected("statement"));
            }
            statements.push(self.parse_statement_or_scope()?);
        }

        Ok(Program {
            version,
            statements,
        })
    }

    /// Parse `OPENQASM <number>;`.
    fn parse_version(&mut self) -> ParseResult<Version> {
        let start = self.pos;
        self.expect(Token::OpenQasm)?;
        let number = match self.peek() {
            Some(Token::FloatLiteral | Token::IntLiteral) => {
                self.advance().map(|t| t.text).unwrap_or_default()
            }
            _ => return Err(self.unexpected("version number")),
        };
        self.expect(Token::Semicolon)?;
        Ok(Version {
            number,
            span: self.span_from(start),
        })
    }

    /// Parse one item, falling back to raw tokens when the statement is
    /// not understood but can still be delimited.
    pub(super) fn parse_statement_or_scope(&mut self) -> ParseResult<StatementOrScope> {
        if self.check(Token::LBrace) {
            return Ok(StatementOrScope::Scope(self.parse_block()?));
        }

        let start = self.pos;
        match self.parse_statement() {
            Ok(statement) => Ok(StatementOrScope::Statement(statement, self.span_from(start))),
            Err(err) => {
                self.pos = start;
                if let Some(tokens) = self.parse_raw_tokens() {
                    let span = self.span_from(start);
                    debug!(line = span.start_line, %err, "keeping statement as written");
                    Ok(StatementOrScope::Statement(Statement::Other(tokens), span))
                } else {
                    self.pos = start;
                    Err(err)
                }
            }
        }
    }

    /// Parse `{ statements }`.
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        let open = self.expect(Token::LBrace)?;
        let mut statements = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RBrace) => break,
                Some(Token::Semicolon) => self.pos += 1,
                Some(_) => statements.push(self.parse_statement_or_scope()?),
                None => return Err(ParseError::UnexpectedEof("`}`".into())),
            }
        }
        let close = self.expect(Token::RBrace)?;

        Ok(Block {
            statements,
            span: Span {
                start: open.span.start,
                end: close.span.end,
                start_line: open.line,
                end_line: close.line,
            },
        })
    }

    /// Parse a loop or branch body: a block, or a single statement.
    pub(super) fn parse_body(&mut self) -> ParseResult<Block> {
        if self.check(Token::LBrace) {
            return self.parse_block();
        }
        let header_line = self.previous_line();
        let statement = self.parse_statement_or_scope()?;
        let span = statement.span();
        Ok(Block {
            statements: vec![statement],
            span: Span {
                start_line: header_line,
                ..span
            },
        })
    }

    /// Consume tokens up to a `;` at nesting depth zero, or through the `}`
    /// closing a brace opened by the statement itself.
    ///
    /// Returns `None`, leaving the position unspecified, when input ends
    /// first or a closer belongs to an enclosing scope.
    pub(super) fn parse_raw_tokens(&mut self) -> Option<Vec<RawToken>> {
        let mut depth = 0usize;
        let mut raw = Vec::new();

        while let Some(token) = self.advance() {
            match token.token {
                Token::Semicolon if depth == 0 => return (!raw.is_empty()).then_some(raw),
                Token::LBrace | Token::LParen | Token::LBracket => depth += 1,
                Token::RBrace | Token::RParen | Token::RBracket => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 && token.token == Token::RBrace {
                        raw.push(RawToken {
                            kind: token.token,
                            text: token.text,
                        });
                        return Some(raw);
                    }
                }
                _ => {}
            }
            raw.push(RawToken {
                kind: token.token,
                text: token.text,
            });
        }

        None
    }

    /// Parse a statement kept verbatim.
    pub(super) fn parse_other(&mut self) -> ParseResult<Statement> {
        let start = self.pos;
        match self.parse_raw_tokens() {
            Some(tokens) => Ok(Statement::Other(tokens)),
            None => {
                self.pos = start;
                Err(self.unexpected("`;`"))
            }
        }
    }

    /// Parse identifier list.
    pub(super) fn parse_identifier_list(&mut self) -> ParseResult<Vec<String>> {
        let mut ids = vec![self.parse_identifier()?];
        while self.consume(Token::Comma) {
            ids.push(self.parse_identifier()?);
        }
        Ok(ids)
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        Ok(self.expect(Token::Identifier)?.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, GateCall, Operand};

    fn statements(source: &str) -> Vec<StatementOrScope> {
        parse(source).unwrap().program.statements
    }

    #[test]
    fn test_parse_bell_state() {
        let source = "OPENQASM 3.0;\nqubit[2] q;\nbit[2] c;\nh q[0];\ncx q[0], q[1];\nc = measure q;\n";
        let parsed = parse(source).unwrap();
        let program = parsed.program;

        assert_eq!(program.version.unwrap().number, "3.0");
        assert_eq!(program.statements.len(), 5);
    }

    #[test]
    fn test_version_is_optional() {
        let program = parse("qubit q;").unwrap().program;
        assert!(program.version.is_none());
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_spans_track_lines() {
        let items = statements("OPENQASM 3.0;\nqubit q;\ncx q,\n  r;\n");
        assert_eq!(
            items[1].span(),
            Span {
                start: 23,
                end: 33,
                start_line: 3,
                end_line: 4,
            }
        );
    }

    #[test]
    fn test_unknown_statement_is_kept() {
        let items = statements("let a = q[0:1];\nh q;");
        let StatementOrScope::Statement(Statement::Other(tokens), _) = &items[0] else {
            panic!("expected raw statement, got {:?}", items[0]);
        };
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["let", "a", "=", "q", "[", "0", ":", "1", "]"]);
        assert!(matches!(items[1], StatementOrScope::Statement(Statement::GateCall(_), _)));
    }

    #[test]
    fn test_malformed_statement_with_terminator_is_recovered() {
        let items = statements("qubit q;\n+ x q;\n");
        assert!(matches!(
            &items[1],
            StatementOrScope::Statement(Statement::Other(tokens), _) if tokens.len() == 3
        ));
    }

    #[test]
    fn test_unterminated_input_fails() {
        assert!(matches!(
            parse("malformed qasm"),
            Err(ParseError::UnexpectedEof(_))
        ));
        assert!(parse("gate g q { h q;").is_err());
        assert!(parse("h q;\n}").is_err());
    }

    #[test]
    fn test_stray_semicolons_are_skipped() {
        let items = statements("h q;;\n;x q;");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_bare_scope() {
        let items = statements("{\n  h q;\n}\n");
        let StatementOrScope::Scope(block) = &items[0] else {
            panic!("expected scope");
        };
        assert_eq!(block.statements.len(), 1);
        assert_eq!((block.span.start_line, block.span.end_line), (1, 3));
    }

    #[test]
    fn test_unbraced_body_becomes_block() {
        let items = statements("if (c == 1)\n  x q;\n");
        let StatementOrScope::Statement(Statement::If(stmt), _) = &items[0] else {
            panic!("expected if");
        };
        assert_eq!(stmt.then_body.span.start_line, 1);
        assert_eq!(stmt.then_body.span.end_line, 2);
        assert_eq!(
            stmt.then_body.statements[0],
            StatementOrScope::Statement(
                Statement::GateCall(GateCall {
                    modifiers: vec![],
                    name: "x".into(),
                    params: None,
                    operands: vec![Operand::name("q")],
                }),
                Span {
                    start: 14,
                    end: 18,
                    start_line: 2,
                    end_line: 2,
                },
            )
        );
        assert!(matches!(stmt.condition, Expression::Binary { .. }));
    }
}
