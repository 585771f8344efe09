//! Expression, operand and type rendering.

use crate::ast::{
    ClassicalType, Designator, Expression, ForIterable, IndexItem, Operand, RawToken,
};
use crate::lexer::Token;

/// How binary operators are spaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Spacing {
    /// `pi/4`: gate arguments, designators, indices, assigned values.
    Compact,
    /// `c == 1`: conditions and other free-standing expressions.
    Spaced,
}

pub(crate) fn expression(expr: &Expression, spacing: Spacing) -> String {
    let mut out = String::new();
    write_expression(&mut out, expr, spacing);
    out
}

fn write_expression(out: &mut String, expr: &Expression, spacing: Spacing) {
    match expr {
        Expression::Literal(text) | Expression::Identifier(text) => out.push_str(text),
        Expression::Unary { op, operand } => {
            out.push_str(op.symbol());
            write_after_operator(out, operand, spacing);
        }
        Expression::Binary { left, op, right } => {
            write_expression(out, left, spacing);
            if spacing == Spacing::Spaced {
                out.push(' ');
                out.push_str(op.symbol());
                out.push(' ');
            } else {
                out.push_str(op.symbol());
            }
            write_after_operator(out, right, spacing);
        }
        Expression::Call { name, args } => {
            out.push_str(name);
            out.push('(');
            write_list(out, args, spacing);
            out.push(')');
        }
        Expression::Cast { ty, value } => {
            out.push_str(&classical_type(ty));
            out.push('(');
            write_expression(out, value, spacing);
            out.push(')');
        }
        Expression::Index { target, items } => {
            write_expression(out, target, spacing);
            out.push('[');
            out.push_str(&index_items(items));
            out.push(']');
        }
        Expression::Paren(inner) => {
            out.push('(');
            write_expression(out, inner, spacing);
            out.push(')');
        }
        Expression::Measure(operand) => {
            out.push_str("measure ");
            out.push_str(&self::operand(operand));
        }
        Expression::Set(items) => {
            out.push('{');
            write_list(out, items, spacing);
            out.push('}');
        }
    }
}

/// Write the operand of an operator, separating `-` from a following `-`.
fn write_after_operator(out: &mut String, expr: &Expression, spacing: Spacing) {
    let start = out.len();
    write_expression(out, expr, spacing);
    if out[..start].ends_with('-') && out[start..].starts_with('-') {
        out.insert(start, ' ');
    }
}

fn write_list(out: &mut String, exprs: &[Expression], spacing: Spacing) {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expression(out, expr, spacing);
    }
}

/// Expressions separated by `, `.
pub(crate) fn expression_list(exprs: &[Expression], spacing: Spacing) -> String {
    let mut out = String::new();
    write_list(&mut out, exprs, spacing);
    out
}

pub(crate) fn operand(operand: &Operand) -> String {
    match operand {
        Operand::Identifier { name, indices } => {
            let mut out = name.clone();
            for items in indices {
                out.push('[');
                out.push_str(&index_items(items));
                out.push(']');
            }
            out
        }
        Operand::Hardware(name) => name.clone(),
    }
}

pub(crate) fn operand_list(operands: &[Operand]) -> String {
    operands.iter().map(operand).collect::<Vec<_>>().join(", ")
}

/// Contents of `[...]`, always compact.
fn index_items(items: &[IndexItem]) -> String {
    items
        .iter()
        .map(|item| match item {
            IndexItem::Expr(expr) => expression(expr, Spacing::Compact),
            IndexItem::Range(parts) => range(parts),
            IndexItem::Set(exprs) => format!("{{{}}}", expression_list(exprs, Spacing::Compact)),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn range(parts: &[Option<Expression>]) -> String {
    parts
        .iter()
        .map(|part| {
            part.as_ref()
                .map(|expr| expression(expr, Spacing::Compact))
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(":")
}

pub(crate) fn for_iterable(iterable: &ForIterable) -> String {
    match iterable {
        ForIterable::Range(parts) => format!("[{}]", range(parts)),
        ForIterable::Set(exprs) => format!("{{{}}}", expression_list(exprs, Spacing::Compact)),
        ForIterable::Expr(expr) => expression(expr, Spacing::Spaced),
    }
}

pub(crate) fn classical_type(ty: &ClassicalType) -> String {
    match ty.designator.as_deref() {
        Some(Designator::Width(width)) => {
            format!("{}[{}]", ty.name, expression(width, Spacing::Compact))
        }
        Some(Designator::Type(inner)) => format!("{}[{}]", ty.name, classical_type(inner)),
        None => ty.name.clone(),
    }
}

/// Join raw tokens with operator spacing: one space around binary
/// operators and after commas, none inside brackets or after a prefix
/// operator.
pub(crate) fn raw_tokens(tokens: &[RawToken]) -> String {
    let mut out = String::new();
    let mut prev: Option<Token> = None;
    let mut prev_is_prefix = false;

    for token in tokens {
        let kind = token.kind;
        let is_prefix = is_prefix_position(kind, prev);
        if let Some(before) = prev {
            if needs_space(before, prev_is_prefix, kind) {
                out.push(' ');
            }
        }
        out.push_str(&token.text);
        prev = Some(kind);
        prev_is_prefix = is_prefix;
    }

    out
}

/// Whether `kind` is a prefix operator where it stands.
fn is_prefix_position(kind: Token, prev: Option<Token>) -> bool {
    match kind {
        Token::Not | Token::Tilde => true,
        Token::Minus | Token::Plus => !prev.is_some_and(Token::ends_operand),
        _ => false,
    }
}

fn needs_space(prev: Token, prev_is_prefix: bool, curr: Token) -> bool {
    if prev_is_prefix {
        // `- -x` stays apart; `+ +x` would otherwise lex as `++`.
        return prev == curr && matches!(curr, Token::Minus | Token::Plus);
    }
    match curr {
        Token::Comma
        | Token::Semicolon
        | Token::RParen
        | Token::RBracket
        | Token::Colon
        | Token::Dot => return false,
        Token::LParen | Token::LBracket => {
            return !(prev.ends_operand() || prev.is_classical_type() || prev == Token::Pow);
        }
        _ => {}
    }
    match prev {
        Token::LParen | Token::LBracket | Token::Colon | Token::Dot => false,
        _ => true,
    }
}
