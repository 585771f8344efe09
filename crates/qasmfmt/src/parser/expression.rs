//! Expression parsing for QASM3.

use super::Parser;
use crate::ast::{BinOp, Expression, UnaryOp};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse an expression.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_expr(0)
    }

    /// Parse binary expression with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op_precedence(op);
            if prec < min_prec {
                break;
            }
            self.advance(); // consume operator

            // `**` is right-associative.
            let next_prec = if op == BinOp::Pow { prec } else { prec + 1 };
            let right = self.parse_binary_expr(next_prec)?;
            left = Expression::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse unary expression.
    fn parse_unary_expr(&mut self) -> ParseResult<Expression> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Not) => UnaryOp::Not,
            Some(Token::Tilde) => UnaryOp::BitNot,
            _ => return self.parse_postfix_expr(),
        };
        self.advance();
        let operand = self.parse_unary_expr()?;
        Ok(Expression::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// Parse a primary expression followed by any `[...]` indexing.
    fn parse_postfix_expr(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary_expr()?;
        while self.consume(Token::LBracket) {
            let items = self.parse_index_items()?;
            self.expect(Token::RBracket)?;
            expr = Expression::Index {
                target: Box::new(expr),
                items,
            };
        }
        Ok(expr)
    }

    /// Parse primary expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Expression> {
        let token = self
            .peek()
            .ok_or_else(|| ParseError::UnexpectedEof("expression".into()))?;

        match token {
            Token::IntLiteral
            | Token::FloatLiteral
            | Token::TimingLiteral
            | Token::ImaginaryLiteral
            | Token::StringLiteral
            | Token::True
            | Token::False => Ok(Expression::Literal(self.take_text())),
            Token::Pi | Token::Tau | Token::Euler | Token::HardwareQubit => {
                Ok(Expression::Identifier(self.take_text()))
            }
            Token::Identifier | Token::Pow => {
                let name = self.take_text();
                // Check for function call
                if self.consume(Token::LParen) {
                    let args = self.parse_expression_list(Token::RParen)?;
                    self.expect(Token::RParen)?;
                    Ok(Expression::Call { name, args })
                } else if token == Token::Pow {
                    Err(self.unexpected("`(`"))
                } else {
                    Ok(Expression::Identifier(name))
                }
            }
            t if t.is_classical_type() => {
                let ty = self.parse_classical_type()?;
                self.expect(Token::LParen)?;
                let value = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(Expression::Cast {
                    ty,
                    value: Box::new(value),
                })
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(Expression::Paren(Box::new(expr)))
            }
            Token::LBrace => {
                self.advance();
                let items = self.parse_expression_list(Token::RBrace)?;
                self.expect(Token::RBrace)?;
                Ok(Expression::Set(items))
            }
            Token::Measure => {
                self.advance();
                let operand = self.parse_operand()?;
                Ok(Expression::Measure(Box::new(operand)))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Consume the current token and return its text.
    fn take_text(&mut self) -> String {
        self.advance().map(|t| t.text).unwrap_or_default()
    }

    /// Peek at binary operator.
    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Percent => Some(BinOp::Mod),
            Token::Power => Some(BinOp::Pow),
            Token::PlusPlus => Some(BinOp::Concat),
            Token::EqEq => Some(BinOp::Eq),
            Token::NotEq => Some(BinOp::NotEq),
            Token::Lt => Some(BinOp::Lt),
            Token::LtEq => Some(BinOp::LtEq),
            Token::Gt => Some(BinOp::Gt),
            Token::GtEq => Some(BinOp::GtEq),
            Token::And => Some(BinOp::And),
            Token::Or => Some(BinOp::Or),
            Token::Ampersand => Some(BinOp::BitAnd),
            Token::Pipe => Some(BinOp::BitOr),
            Token::Caret => Some(BinOp::BitXor),
            Token::LShift => Some(BinOp::LShift),
            Token::RShift => Some(BinOp::RShift),
            _ => None,
        }
    }

    /// Parse a comma-separated expression list ending before `close`.
    pub(super) fn parse_expression_list(&mut self, close: Token) -> ParseResult<Vec<Expression>> {
        if self.check(close) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?];
        while self.consume(Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }
}

/// Get operator precedence.
fn op_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Or => 1,
        BinOp::And => 2,
        BinOp::BitOr => 3,
        BinOp::BitXor => 4,
        BinOp::BitAnd => 5,
        BinOp::Eq | BinOp::NotEq => 6,
        BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => 7,
        BinOp::LShift | BinOp::RShift => 8,
        BinOp::Add | BinOp::Sub | BinOp::Concat => 9,
        BinOp::Mul | BinOp::Div | BinOp::Mod => 10,
        BinOp::Pow => 11,
    }
}
