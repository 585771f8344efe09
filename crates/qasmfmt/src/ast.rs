//! Syntax tree for `OpenQASM` 3 source, as needed for formatting.
//!
//! Nodes keep literal and identifier text exactly as written. Every
//! top-level item carries a [`Span`] so comments can be placed back next
//! to the statement they were written beside.

use crate::lexer::Token;

/// Source region covered by a statement or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the first token.
    pub start: usize,
    /// Byte offset just past the last token.
    pub end: usize,
    /// 1-based line of the first token.
    pub start_line: usize,
    /// 1-based line of the last token.
    pub end_line: usize,
}

/// A complete QASM3 program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// `OPENQASM <number>;`, when present.
    pub version: Option<Version>,
    /// Top-level items in source order.
    pub statements: Vec<StatementOrScope>,
}

/// Version header.
#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    /// Version number as written, e.g. `3.0` or `3`.
    pub number: String,
    pub span: Span,
}

/// A statement or a braced scope.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOrScope {
    Statement(Statement, Span),
    Scope(Block),
}

impl StatementOrScope {
    pub fn span(&self) -> Span {
        match self {
            StatementOrScope::Statement(_, span) => *span,
            StatementOrScope::Scope(block) => block.span,
        }
    }

    /// Whether this item owns a braced body printed over several lines.
    pub fn has_body(&self) -> bool {
        match self {
            StatementOrScope::Statement(statement, _) => statement.has_body(),
            StatementOrScope::Scope(_) => true,
        }
    }
}

/// A `{ ... }` body.
///
/// An unbraced single-statement body is stored as a block holding that one
/// statement; its span then starts on the line of the header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<StatementOrScope>,
    /// `start_line` is the line of `{`, `end_line` the line of `}`.
    pub span: Span,
}

/// A statement in a QASM3 program.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Include statement: `include "file";`
    Include(String),

    /// Qubit declaration: `qubit[n] name;` or `qubit name;`
    QuantumDeclaration {
        size: Option<Expression>,
        name: String,
    },

    /// Classical declaration: `const int[32] n = 4;`, `bit[2] c;`
    ClassicalDeclaration {
        modifier: Option<DeclarationModifier>,
        ty: ClassicalType,
        name: String,
        init: Option<Expression>,
    },

    /// Gate application, including modifiers and zero-operand calls.
    GateCall(GateCall),

    /// Measurement: `measure q;` or `measure q -> c;`
    Measure {
        operand: Operand,
        target: Option<Operand>,
    },

    /// Classical assignment: `c[0] = measure q[0];`, `x += 1;`
    Assignment {
        target: Operand,
        op: AssignOp,
        value: Expression,
    },

    /// Barrier: `barrier;` or `barrier q;`
    Barrier { operands: Vec<Operand> },

    /// Reset: `reset q;`
    Reset { operand: Operand },

    /// Delay: `delay[duration] q;`
    Delay {
        duration: Expression,
        operands: Vec<Operand>,
    },

    /// If statement.
    If(IfStatement),

    /// For loop.
    For {
        ty: Option<ClassicalType>,
        variable: String,
        iterable: ForIterable,
        body: Block,
    },

    /// While loop.
    While { condition: Expression, body: Block },

    /// Gate definition.
    GateDefinition {
        name: String,
        params: Vec<String>,
        qubits: Vec<String>,
        body: Block,
    },

    /// Subroutine definition: `def name(args) -> type { ... }`
    SubroutineDefinition {
        name: String,
        args: Vec<SubroutineArg>,
        return_type: Option<ClassicalType>,
        body: Block,
    },

    /// Timing box: `box[duration] { ... }`
    Box {
        duration: Option<Expression>,
        body: Block,
    },

    /// `return;` or `return value;`
    Return(Option<Expression>),

    Break,

    Continue,

    End,

    /// A statement kept as its raw token sequence, without the closing `;`.
    Other(Vec<RawToken>),
}

impl Statement {
    /// The braced body of a loop, definition or box.
    ///
    /// `if` is excluded because it can carry two bodies.
    pub fn body(&self) -> Option<&Block> {
        match self {
            Statement::For { body, .. }
            | Statement::While { body, .. }
            | Statement::GateDefinition { body, .. }
            | Statement::SubroutineDefinition { body, .. }
            | Statement::Box { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn has_body(&self) -> bool {
        matches!(self, Statement::If(_)) || self.body().is_some()
    }
}

/// `if (condition) body [else body]`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_body: Block,
    pub else_branch: Option<ElseBranch>,
}

/// What follows `else`.
#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    /// `else if (...)`, printed on the closing line of the previous body.
    If(Box<IfStatement>),
    Block(Block),
}

/// `const`, `input` or `output` before a classical declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationModifier {
    Const,
    Input,
    Output,
}

impl DeclarationModifier {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclarationModifier::Const => "const",
            DeclarationModifier::Input => "input",
            DeclarationModifier::Output => "output",
        }
    }
}

/// A classical type such as `int[32]`, `float` or `complex[float[64]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassicalType {
    /// Type keyword as written.
    pub name: String,
    pub designator: Option<Box<Designator>>,
}

/// Contents of a type's `[...]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Designator {
    Width(Expression),
    Type(ClassicalType),
}

/// A gate call.
#[derive(Debug, Clone, PartialEq)]
pub struct GateCall {
    /// Modifiers in source order: `ctrl @ inv @ x q;`
    pub modifiers: Vec<GateModifier>,
    /// Gate name.
    pub name: String,
    /// Parenthesized arguments, when written.
    pub params: Option<Vec<Expression>>,
    /// Qubits the gate acts on.
    pub operands: Vec<Operand>,
}

/// Gate modifier.
#[derive(Debug, Clone, PartialEq)]
pub enum GateModifier {
    /// Control modifier: `ctrl @ gate` or `ctrl(n) @ gate`
    Ctrl(Option<Expression>),
    /// Negated control: `negctrl @ gate`
    NegCtrl(Option<Expression>),
    /// Inverse: `inv @ gate`
    Inv,
    /// Power: `pow(n) @ gate`
    Pow(Expression),
}

/// A qubit or classical operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `q`, `q[0]`, `q[0:2]`, `q[{0, 1}]`, `q[0][1]`
    Identifier {
        name: String,
        indices: Vec<Vec<IndexItem>>,
    },
    /// Physical qubit: `$0`
    Hardware(String),
}

impl Operand {
    pub fn name(name: impl Into<String>) -> Self {
        Operand::Identifier {
            name: name.into(),
            indices: Vec::new(),
        }
    }
}

/// One comma-separated entry inside `[...]`.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexItem {
    Expr(Expression),
    /// `start:end` or `start:step:end`; any part may be omitted.
    Range(Vec<Option<Expression>>),
    /// `{0, 1, 2}`
    Set(Vec<Expression>),
}

/// What a `for` loop iterates over.
#[derive(Debug, Clone, PartialEq)]
pub enum ForIterable {
    Range(Vec<Option<Expression>>),
    Set(Vec<Expression>),
    Expr(Expression),
}

/// A subroutine parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SubroutineArg {
    pub ty: ArgType,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgType {
    Classical(ClassicalType),
    Qubit(Option<Expression>),
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Numeric, duration, imaginary, string or boolean literal.
    Literal(String),
    /// Identifier, built-in constant or hardware qubit.
    Identifier(String),
    /// Prefix operation.
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    /// Binary operation.
    Binary {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
    /// Function call.
    Call { name: String, args: Vec<Expression> },
    /// Type cast: `int[32](x)`
    Cast {
        ty: ClassicalType,
        value: Box<Expression>,
    },
    /// Index expression: `arr[i]`.
    Index {
        target: Box<Expression>,
        items: Vec<IndexItem>,
    },
    /// Parenthesized expression.
    Paren(Box<Expression>),
    /// `measure q`, valid as an assignment or initializer value.
    Measure(Box<Operand>),
    /// `{a, b}`
    Set(Vec<Expression>),
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Concat,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::Concat => "++",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::LtEq => "<=",
            BinOp::Gt => ">",
            BinOp::GtEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::LShift => "<<",
            BinOp::RShift => ">>",
        }
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
}

impl AssignOp {
    pub fn from_token(token: Token) -> Option<Self> {
        Some(match token {
            Token::Eq => AssignOp::Assign,
            Token::PlusEq => AssignOp::Add,
            Token::MinusEq => AssignOp::Sub,
            Token::StarEq => AssignOp::Mul,
            Token::SlashEq => AssignOp::Div,
            Token::PercentEq => AssignOp::Mod,
            Token::PowerEq => AssignOp::Pow,
            Token::AmpersandEq => AssignOp::BitAnd,
            Token::PipeEq => AssignOp::BitOr,
            Token::CaretEq => AssignOp::BitXor,
            Token::LShiftEq => AssignOp::LShift,
            Token::RShiftEq => AssignOp::RShift,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::Pow => "**=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::LShift => "<<=",
            AssignOp::RShift => ">>=",
        }
    }
}

/// A token kept verbatim inside [`Statement::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub kind: Token,
    pub text: String,
}
