//! Lexer for `OpenQASM` 3.
//!
//! Whitespace is skipped. Comments are produced as ordinary tokens and
//! routed to [`Channel::Hidden`], so the parser never sees them but the
//! printer can put them back.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::error::{ParseError, ParseResult};

/// Tokens for `OpenQASM` 3.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // Trivia
    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    BlockComment,

    // Keywords
    #[token("OPENQASM")]
    OpenQasm,

    #[token("include")]
    Include,

    #[token("qubit")]
    Qubit,

    #[token("bit")]
    Bit,

    #[token("int")]
    Int,

    #[token("uint")]
    Uint,

    #[token("float")]
    Float,

    #[token("angle")]
    Angle,

    #[token("bool")]
    Bool,

    #[token("complex")]
    Complex,

    #[token("duration")]
    Duration,

    #[token("stretch")]
    Stretch,

    #[token("array")]
    Array,

    #[token("const")]
    Const,

    #[token("input")]
    Input,

    #[token("output")]
    Output,

    #[token("let")]
    Let,

    #[token("gate")]
    Gate,

    #[token("def")]
    Def,

    #[token("extern")]
    Extern,

    #[token("box")]
    BoxKeyword,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("for")]
    For,

    #[token("while")]
    While,

    #[token("in")]
    In,

    #[token("return")]
    Return,

    #[token("break")]
    Break,

    #[token("continue")]
    Continue,

    #[token("end")]
    End,

    #[token("measure")]
    Measure,

    #[token("reset")]
    Reset,

    #[token("barrier")]
    Barrier,

    #[token("delay")]
    Delay,

    // Gate modifiers
    #[token("ctrl")]
    Ctrl,

    #[token("negctrl")]
    NegCtrl,

    #[token("inv")]
    Inv,

    #[token("pow")]
    Pow,

    // Constants
    #[token("pi")]
    Pi,

    #[token("tau")]
    Tau,

    #[token("euler")]
    Euler,

    #[token("true")]
    True,

    #[token("false")]
    False,

    // Literals. Text is kept verbatim on the spanned token.
    #[regex(r"([0-9][0-9_]*\.[0-9_]*|\.[0-9][0-9_]*)([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    FloatLiteral,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[bB][01_]+")]
    #[regex(r"0[oO][0-7_]+")]
    IntLiteral,

    #[regex(r"([0-9][0-9_]*(\.[0-9_]*)?|\.[0-9][0-9_]*)([eE][+-]?[0-9]+)?(dt|ns|us|µs|ms|s)")]
    TimingLiteral,

    #[regex(r"([0-9][0-9_]*(\.[0-9_]*)?|\.[0-9][0-9_]*)([eE][+-]?[0-9]+)?im")]
    ImaginaryLiteral,

    #[regex(r#""[^"\n]*""#)]
    StringLiteral,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    #[regex(r"\$[0-9]+")]
    HardwareQubit,

    // Operators
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("**")]
    Power,

    #[token("++")]
    PlusPlus,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<")]
    Lt,

    #[token("<=")]
    LtEq,

    #[token(">")]
    Gt,

    #[token(">=")]
    GtEq,

    #[token("&&")]
    And,

    #[token("||")]
    Or,

    #[token("!")]
    Not,

    #[token("~")]
    Tilde,

    #[token("&")]
    Ampersand,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,

    #[token("<<")]
    LShift,

    #[token(">>")]
    RShift,

    #[token("=")]
    Eq,

    #[token("+=")]
    PlusEq,

    #[token("-=")]
    MinusEq,

    #[token("*=")]
    StarEq,

    #[token("/=")]
    SlashEq,

    #[token("%=")]
    PercentEq,

    #[token("**=")]
    PowerEq,

    #[token("&=")]
    AmpersandEq,

    #[token("|=")]
    PipeEq,

    #[token("^=")]
    CaretEq,

    #[token("<<=")]
    LShiftEq,

    #[token(">>=")]
    RShiftEq,

    #[token("->")]
    Arrow,

    #[token("@")]
    At,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,
}

/// Token stream a token is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Tokens the parser consumes.
    Default,
    /// Comments, kept for the printer.
    Hidden,
}

impl Token {
    pub fn channel(self) -> Channel {
        match self {
            Token::LineComment | Token::BlockComment => Channel::Hidden,
            _ => Channel::Default,
        }
    }

    /// Scalar or container type keywords that open a classical declaration.
    pub fn is_classical_type(self) -> bool {
        matches!(
            self,
            Token::Bit
                | Token::Int
                | Token::Uint
                | Token::Float
                | Token::Angle
                | Token::Bool
                | Token::Complex
                | Token::Duration
                | Token::Stretch
        )
    }

    pub fn is_assignment_op(self) -> bool {
        matches!(
            self,
            Token::Eq
                | Token::PlusEq
                | Token::MinusEq
                | Token::StarEq
                | Token::SlashEq
                | Token::PercentEq
                | Token::PowerEq
                | Token::AmpersandEq
                | Token::PipeEq
                | Token::CaretEq
                | Token::LShiftEq
                | Token::RShiftEq
        )
    }

    /// Operators written with a space on each side in spaced contexts.
    pub fn is_binary_operator(self) -> bool {
        self.is_assignment_op()
            || matches!(
                self,
                Token::Plus
                    | Token::Minus
                    | Token::Star
                    | Token::Slash
                    | Token::Percent
                    | Token::Power
                    | Token::PlusPlus
                    | Token::EqEq
                    | Token::NotEq
                    | Token::Lt
                    | Token::LtEq
                    | Token::Gt
                    | Token::GtEq
                    | Token::And
                    | Token::Or
                    | Token::Ampersand
                    | Token::Pipe
                    | Token::Caret
                    | Token::LShift
                    | Token::RShift
                    | Token::Arrow
                    | Token::At
            )
    }

    /// Tokens that end an operand: names, literals, closing brackets.
    pub fn ends_operand(self) -> bool {
        matches!(
            self,
            Token::Identifier
                | Token::HardwareQubit
                | Token::IntLiteral
                | Token::FloatLiteral
                | Token::TimingLiteral
                | Token::ImaginaryLiteral
                | Token::StringLiteral
                | Token::Pi
                | Token::Tau
                | Token::Euler
                | Token::True
                | Token::False
                | Token::RParen
                | Token::RBracket
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::LineComment => "line comment",
            Token::BlockComment => "block comment",
            Token::OpenQasm => "OPENQASM",
            Token::Include => "include",
            Token::Qubit => "qubit",
            Token::Bit => "bit",
            Token::Int => "int",
            Token::Uint => "uint",
            Token::Float => "float",
            Token::Angle => "angle",
            Token::Bool => "bool",
            Token::Complex => "complex",
            Token::Duration => "duration",
            Token::Stretch => "stretch",
            Token::Array => "array",
            Token::Const => "const",
            Token::Input => "input",
            Token::Output => "output",
            Token::Let => "let",
            Token::Gate => "gate",
            Token::Def => "def",
            Token::Extern => "extern",
            Token::BoxKeyword => "box",
            Token::If => "if",
            Token::Else => "else",
            Token::For => "for",
            Token::While => "while",
            Token::In => "in",
            Token::Return => "return",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::End => "end",
            Token::Measure => "measure",
            Token::Reset => "reset",
            Token::Barrier => "barrier",
            Token::Delay => "delay",
            Token::Ctrl => "ctrl",
            Token::NegCtrl => "negctrl",
            Token::Inv => "inv",
            Token::Pow => "pow",
            Token::Pi => "pi",
            Token::Tau => "tau",
            Token::Euler => "euler",
            Token::True => "true",
            Token::False => "false",
            Token::FloatLiteral => "float literal",
            Token::IntLiteral => "integer literal",
            Token::TimingLiteral => "duration literal",
            Token::ImaginaryLiteral => "imaginary literal",
            Token::StringLiteral => "string literal",
            Token::Identifier => "identifier",
            Token::HardwareQubit => "hardware qubit",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Power => "**",
            Token::PlusPlus => "++",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::And => "&&",
            Token::Or => "||",
            Token::Not => "!",
            Token::Tilde => "~",
            Token::Ampersand => "&",
            Token::Pipe => "|",
            Token::Caret => "^",
            Token::LShift => "<<",
            Token::RShift => ">>",
            Token::Eq => "=",
            Token::PlusEq => "+=",
            Token::MinusEq => "-=",
            Token::StarEq => "*=",
            Token::SlashEq => "/=",
            Token::PercentEq => "%=",
            Token::PowerEq => "**=",
            Token::AmpersandEq => "&=",
            Token::PipeEq => "|=",
            Token::CaretEq => "^=",
            Token::LShiftEq => "<<=",
            Token::RShiftEq => ">>=",
            Token::Arrow => "->",
            Token::At => "@",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::Dot => ".",
        };
        f.write_str(text)
    }
}

/// A token with its source text and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub text: String,
    /// Byte range in the tokenized source.
    pub span: Range<usize>,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based byte column of the first character.
    pub column: usize,
}

impl SpannedToken {
    pub fn channel(&self) -> Channel {
        self.token.channel()
    }
}

/// Byte offsets of line starts, for offset to line/column lookup.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.starts.partition_point(|&start| start <= offset);
        (line, offset - self.starts[line - 1] + 1)
    }
}

/// Tokenize a QASM3 source string, both channels included, in source order.
pub fn tokenize(source: &str) -> ParseResult<Vec<SpannedToken>> {
    let index = LineIndex::new(source);
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let (line, column) = index.position(span.start);
        let text = lexer.slice().to_string();
        match result {
            Ok(token) => tokens.push(SpannedToken {
                token,
                text,
                span,
                line,
                column,
            }),
            Err(()) => return Err(ParseError::Lex { line, column, text }),
        }
    }

    Ok(tokens)
}
