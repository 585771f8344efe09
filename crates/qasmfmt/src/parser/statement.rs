//! Statement parsing for QASM3.

use super::Parser;
use crate::ast::{
    ArgType, AssignOp, ClassicalType, DeclarationModifier, Designator, ElseBranch, Expression,
    ForIterable, GateCall, GateModifier, IfStatement, IndexItem, Operand, Statement,
    SubroutineArg,
};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self
            .peek()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        match token {
            Token::Include => self.parse_include(),
            Token::Qubit => self.parse_qubit_decl(),
            Token::Const | Token::Input | Token::Output => self.parse_modified_decl(),
            t if t.is_classical_type() => self.parse_classical_decl(None),
            Token::Measure => self.parse_measure(),
            Token::Reset => self.parse_reset(),
            Token::Barrier => self.parse_barrier(),
            Token::Delay => self.parse_delay(),
            Token::If => Ok(Statement::If(self.parse_if()?)),
            Token::For => self.parse_for(),
            Token::While => self.parse_while(),
            Token::Gate => self.parse_gate_def(),
            Token::Def => self.parse_subroutine_def(),
            Token::BoxKeyword => self.parse_box(),
            Token::Return => self.parse_return(),
            Token::Break => self.parse_keyword_statement(Statement::Break),
            Token::Continue => self.parse_keyword_statement(Statement::Continue),
            Token::End => self.parse_keyword_statement(Statement::End),
            Token::Ctrl | Token::NegCtrl | Token::Inv | Token::Pow => self.parse_gate_call(),
            Token::Identifier => self.parse_identifier_statement(),
            Token::Let | Token::Extern | Token::Array => self.parse_other(),
            _ => Err(self.unexpected("statement")),
        }
    }

    /// Parse include statement.
    fn parse_include(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Include)?;
        let literal = self.expect(Token::StringLiteral)?;
        self.expect(Token::Semicolon)?;
        let path = literal.text.trim_matches('"').to_string();
        Ok(Statement::Include(path))
    }

    /// Parse qubit declaration.
    fn parse_qubit_decl(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Qubit)?;
        let size = self.parse_optional_designator()?;
        let name = self.parse_identifier()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::QuantumDeclaration { size, name })
    }

    /// Parse `const`, `input` or `output` followed by a classical declaration.
    fn parse_modified_decl(&mut self) -> ParseResult<Statement> {
        let modifier = match self.advance().map(|t| t.token) {
            Some(Token::Const) => DeclarationModifier::Const,
            Some(Token::Input) => DeclarationModifier::Input,
            Some(Token::Output) => DeclarationModifier::Output,
            _ => return Err(self.unexpected("declaration modifier")),
        };
        if !self.peek().is_some_and(Token::is_classical_type) {
            return Err(self.unexpected("classical type"));
        }
        self.parse_classical_decl(Some(modifier))
    }

    /// Parse classical declaration, with optional initializer.
    fn parse_classical_decl(
        &mut self,
        modifier: Option<DeclarationModifier>,
    ) -> ParseResult<Statement> {
        let ty = self.parse_classical_type()?;
        let name = self.parse_identifier()?;
        let init = if self.consume(Token::Eq) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::ClassicalDeclaration {
            modifier,
            ty,
            name,
            init,
        })
    }

    /// Parse a classical type: `int`, `int[32]`, `complex[float[64]]`.
    pub(super) fn parse_classical_type(&mut self) -> ParseResult<ClassicalType> {
        if !self.peek().is_some_and(Token::is_classical_type) {
            return Err(self.unexpected("classical type"));
        }
        let name = self.advance().map(|t| t.text).unwrap_or_default();

        let designator = if self.consume(Token::LBracket) {
            let designator = if self.peek().is_some_and(Token::is_classical_type) {
                Designator::Type(self.parse_classical_type()?)
            } else {
                Designator::Width(self.parse_expression()?)
            };
            self.expect(Token::RBracket)?;
            Some(Box::new(designator))
        } else {
            None
        };

        Ok(ClassicalType { name, designator })
    }

    /// Parse `[expr]` if present.
    fn parse_optional_designator(&mut self) -> ParseResult<Option<Expression>> {
        if !self.consume(Token::LBracket) {
            return Ok(None);
        }
        let expr = self.parse_expression()?;
        self.expect(Token::RBracket)?;
        Ok(Some(expr))
    }

    /// Parse measure statement.
    fn parse_measure(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Measure)?;
        let operand = self.parse_operand()?;

        // Arrow syntax: measure q -> c;
        let target = if self.consume(Token::Arrow) {
            Some(self.parse_operand()?)
        } else {
            None
        };

        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure { operand, target })
    }

    /// Parse reset statement.
    fn parse_reset(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Reset)?;
        let operand = self.parse_operand()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Reset { operand })
    }

    /// Parse barrier statement.
    fn parse_barrier(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Barrier)?;
        let operands = self.parse_optional_operands()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Barrier { operands })
    }

    /// Parse delay statement.
    fn parse_delay(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Delay)?;
        self.expect(Token::LBracket)?;
        let duration = self.parse_expression()?;
        self.expect(Token::RBracket)?;
        let operands = self.parse_optional_operands()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Delay { duration, operands })
    }

    /// Parse if statement.
    fn parse_if(&mut self) -> ParseResult<IfStatement> {
        self.expect(Token::If)?;
        self.expect(Token::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(Token::RParen)?;

        let then_body = self.parse_body()?;

        let else_branch = if self.consume(Token::Else) {
            if self.check(Token::If) {
                Some(ElseBranch::If(Box::new(self.parse_if()?)))
            } else {
                Some(ElseBranch::Block(self.parse_body()?))
            }
        } else {
            None
        };

        Ok(IfStatement {
            condition,
            then_body,
            else_branch,
        })
    }

    /// Parse for loop.
    fn parse_for(&mut self) -> ParseResult<Statement> {
        self.expect(Token::For)?;
        let ty = if self.peek().is_some_and(Token::is_classical_type) {
            Some(self.parse_classical_type()?)
        } else {
            None
        };
        let variable = self.parse_identifier()?;
        self.expect(Token::In)?;

        let iterable = if self.consume(Token::LBracket) {
            let parts = self.parse_range_parts()?;
            self.expect(Token::RBracket)?;
            ForIterable::Range(parts)
        } else if self.consume(Token::LBrace) {
            let items = self.parse_expression_list(Token::RBrace)?;
            self.expect(Token::RBrace)?;
            ForIterable::Set(items)
        } else {
            ForIterable::Expr(self.parse_expression()?)
        };

        let body = self.parse_body()?;

        Ok(Statement::For {
            ty,
            variable,
            iterable,
            body,
        })
    }

    /// Parse while loop.
    fn parse_while(&mut self) -> ParseResult<Statement> {
        self.expect(Token::While)?;
        self.expect(Token::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(Token::RParen)?;
        let body = self.parse_body()?;
        Ok(Statement::While { condition, body })
    }

    /// Parse gate definition.
    fn parse_gate_def(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Gate)?;
        let name = self.parse_identifier()?;

        let params = if self.consume(Token::LParen) {
            let p = if self.check(Token::RParen) {
                vec![]
            } else {
                self.parse_identifier_list()?
            };
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };

        let qubits = self.parse_identifier_list()?;
        let body = self.parse_block()?;

        Ok(Statement::GateDefinition {
            name,
            params,
            qubits,
            body,
        })
    }

    /// Parse subroutine definition.
    fn parse_subroutine_def(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Def)?;
        let name = self.parse_identifier()?;

        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if !self.check(Token::RParen) {
            args.push(self.parse_subroutine_arg()?);
            while self.consume(Token::Comma) {
                args.push(self.parse_subroutine_arg()?);
            }
        }
        self.expect(Token::RParen)?;

        let return_type = if self.consume(Token::Arrow) {
            Some(self.parse_classical_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;

        Ok(Statement::SubroutineDefinition {
            name,
            args,
            return_type,
            body,
        })
    }

    fn parse_subroutine_arg(&mut self) -> ParseResult<SubroutineArg> {
        let ty = if self.consume(Token::Qubit) {
            ArgType::Qubit(self.parse_optional_designator()?)
        } else {
            ArgType::Classical(self.parse_classical_type()?)
        };
        let name = self.parse_identifier()?;
        Ok(SubroutineArg { ty, name })
    }

    /// Parse `box` statement.
    fn parse_box(&mut self) -> ParseResult<Statement> {
        self.expect(Token::BoxKeyword)?;
        let duration = self.parse_optional_designator()?;
        let body = self.parse_block()?;
        Ok(Statement::Box { duration, body })
    }

    /// Parse return statement.
    fn parse_return(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Return)?;
        let value = if self.check(Token::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Return(value))
    }

    /// Parse a keyword followed directly by `;`.
    fn parse_keyword_statement(&mut self, statement: Statement) -> ParseResult<Statement> {
        self.advance();
        self.expect(Token::Semicolon)?;
        Ok(statement)
    }

    /// Parse statement starting with identifier (gate call or assignment).
    fn parse_identifier_statement(&mut self) -> ParseResult<Statement> {
        match self.peek_nth(1) {
            Some(Token::LBracket) => self.parse_assignment(),
            Some(t) if t.is_assignment_op() => self.parse_assignment(),
            _ => self.parse_gate_call(),
        }
    }

    /// Parse assignment statement.
    fn parse_assignment(&mut self) -> ParseResult<Statement> {
        let target = self.parse_operand()?;
        let op = self
            .peek()
            .and_then(AssignOp::from_token)
            .ok_or_else(|| self.unexpected("assignment operator"))?;
        self.advance();
        let value = self.parse_expression()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Assignment { target, op, value })
    }

    /// Parse gate call, with any leading modifiers.
    fn parse_gate_call(&mut self) -> ParseResult<Statement> {
        let mut modifiers = Vec::new();
        loop {
            let modifier = match self.peek() {
                Some(Token::Inv) => {
                    self.advance();
                    GateModifier::Inv
                }
                Some(Token::Pow) => {
                    self.advance();
                    self.expect(Token::LParen)?;
                    let exponent = self.parse_expression()?;
                    self.expect(Token::RParen)?;
                    GateModifier::Pow(exponent)
                }
                Some(token @ (Token::Ctrl | Token::NegCtrl)) => {
                    self.advance();
                    let count = if self.consume(Token::LParen) {
                        let count = self.parse_expression()?;
                        self.expect(Token::RParen)?;
                        Some(count)
                    } else {
                        None
                    };
                    if token == Token::Ctrl {
                        GateModifier::Ctrl(count)
                    } else {
                        GateModifier::NegCtrl(count)
                    }
                }
                _ => break,
            };
            self.expect(Token::At)?;
            modifiers.push(modifier);
        }

        let name = self.parse_identifier()?;

        let params = if self.consume(Token::LParen) {
            let p = self.parse_expression_list(Token::RParen)?;
            self.expect(Token::RParen)?;
            Some(p)
        } else {
            None
        };

        let operands = self.parse_optional_operands()?;
        self.expect(Token::Semicolon)?;

        Ok(Statement::GateCall(GateCall {
            modifiers,
            name,
            params,
            operands,
        }))
    }

    /// Parse operands up to `;`, possibly none.
    fn parse_optional_operands(&mut self) -> ParseResult<Vec<Operand>> {
        if self.check(Token::Semicolon) {
            return Ok(vec![]);
        }
        let mut operands = vec![self.parse_operand()?];
        while self.consume(Token::Comma) {
            operands.push(self.parse_operand()?);
        }
        Ok(operands)
    }

    /// Parse a single operand: `q`, `q[0]`, `q[0:2][1]`, `$3`.
    pub(super) fn parse_operand(&mut self) -> ParseResult<Operand> {
        match self.peek() {
            Some(Token::HardwareQubit) => {
                let token = self.expect(Token::HardwareQubit)?;
                Ok(Operand::Hardware(token.text))
            }
            Some(Token::Identifier) => {
                let name = self.parse_identifier()?;
                let mut indices = Vec::new();
                while self.consume(Token::LBracket) {
                    indices.push(self.parse_index_items()?);
                    self.expect(Token::RBracket)?;
                }
                Ok(Operand::Identifier { name, indices })
            }
            _ => Err(self.unexpected("operand")),
        }
    }

    /// Parse the comma-separated contents of `[...]`.
    pub(super) fn parse_index_items(&mut self) -> ParseResult<Vec<IndexItem>> {
        let mut items = vec![self.parse_index_item()?];
        while self.consume(Token::Comma) {
            items.push(self.parse_index_item()?);
        }
        Ok(items)
    }

    fn parse_index_item(&mut self) -> ParseResult<IndexItem> {
        if self.consume(Token::LBrace) {
            let items = self.parse_expression_list(Token::RBrace)?;
            self.expect(Token::RBrace)?;
            return Ok(IndexItem::Set(items));
        }

        let mut parts = self.parse_range_parts()?;
        if parts.len() > 1 {
            return Ok(IndexItem::Range(parts));
        }
        match parts.pop() {
            Some(Some(expr)) => Ok(IndexItem::Expr(expr)),
            _ => Err(self.unexpected("index")),
        }
    }

    /// Parse `a`, `a:b` or `a:s:b`, where any part may be empty.
    pub(super) fn parse_range_parts(&mut self) -> ParseResult<Vec<Option<Expression>>> {
        let mut parts = Vec::new();
        loop {
            let empty = matches!(
                self.peek(),
                Some(Token::Colon | Token::RBracket | Token::Comma)
            );
            parts.push(if empty {
                None
            } else {
                Some(self.parse_expression()?)
            });
            if !self.consume(Token::Colon) {
                break;
            }
        }
        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::parse;

    fn first(source: &str) -> Statement {
        match parse(source).unwrap().program.statements.remove(0) {
            StatementOrScope::Statement(statement, _) => statement,
            StatementOrScope::Scope(_) => panic!("expected statement"),
        }
    }

    #[test]
    fn test_include_strips_quotes() {
        assert_eq!(
            first("include \"stdgates.inc\";"),
            Statement::Include("stdgates.inc".into())
        );
    }

    #[test]
    fn test_classical_declarations() {
        let Statement::ClassicalDeclaration {
            modifier,
            ty,
            name,
            init,
        } = first("const int[32] n = 4;")
        else {
            panic!("expected declaration");
        };
        assert_eq!(modifier, Some(DeclarationModifier::Const));
        assert_eq!(ty.name, "int");
        assert_eq!(name, "n");
        assert_eq!(init, Some(Expression::Literal("4".into())));

        let Statement::ClassicalDeclaration { ty, .. } = first("complex[float[64]] z;") else {
            panic!("expected declaration");
        };
        assert!(matches!(
            ty.designator.as_deref(),
            Some(Designator::Type(inner)) if inner.name == "float"
        ));
    }

    #[test]
    fn test_gate_call_with_modifiers() {
        let Statement::GateCall(call) = first("ctrl(2) @ inv @ rx(pi/2) q[0], q[1], $2;") else {
            panic!("expected gate call");
        };
        assert_eq!(call.modifiers.len(), 2);
        assert!(matches!(call.modifiers[1], GateModifier::Inv));
        assert_eq!(call.name, "rx");
        assert_eq!(call.params.as_ref().map(Vec::len), Some(1));
        assert_eq!(call.operands.len(), 3);
        assert_eq!(call.operands[2], Operand::Hardware("$2".into()));
    }

    #[test]
    fn test_zero_operand_call_keeps_parens() {
        let Statement::GateCall(call) = first("gphase(pi);") else {
            panic!("expected gate call");
        };
        assert!(call.operands.is_empty());
        assert_eq!(call.params, Some(vec![Expression::Identifier("pi".into())]));
    }

    #[test]
    fn test_measure_forms() {
        assert!(matches!(
            first("measure q -> c;"),
            Statement::Measure { target: Some(_), .. }
        ));
        assert!(matches!(
            first("c[0] = measure q[0];"),
            Statement::Assignment {
                op: AssignOp::Assign,
                value: Expression::Measure(_),
                ..
            }
        ));
    }

    #[test]
    fn test_compound_assignment() {
        assert!(matches!(
            first("x <<= 2;"),
            Statement::Assignment {
                op: AssignOp::LShift,
                ..
            }
        ));
    }

    #[test]
    fn test_index_forms() {
        let Statement::Reset { operand } = first("reset q[0:2:8][{1, 3}];") else {
            panic!("expected reset");
        };
        let Operand::Identifier { indices, .. } = operand else {
            panic!("expected named operand");
        };
        assert_eq!(indices.len(), 2);
        assert!(matches!(&indices[0][0], IndexItem::Range(parts) if parts.len() == 3));
        assert!(matches!(&indices[1][0], IndexItem::Set(items) if items.len() == 2));
    }

    #[test]
    fn test_else_if_chain() {
        let Statement::If(stmt) = first("if (a) { x q; } else if (b) { y q; } else z q;") else {
            panic!("expected if");
        };
        let Some(ElseBranch::If(nested)) = stmt.else_branch else {
            panic!("expected else-if");
        };
        assert!(matches!(nested.else_branch, Some(ElseBranch::Block(_))));
    }

    #[test]
    fn test_for_iterables() {
        assert!(matches!(
            first("for int i in [0:4] { x q[i]; }"),
            Statement::For {
                ty: Some(_),
                iterable: ForIterable::Range(_),
                ..
            }
        ));
        assert!(matches!(
            first("for i in {1, 2} x q[i];"),
            Statement::For {
                ty: None,
                iterable: ForIterable::Set(_),
                ..
            }
        ));
    }

    #[test]
    fn test_definitions() {
        let Statement::GateDefinition {
            params, qubits, body, ..
        } = first("gate rzz(theta) a, b { cx a, b; rz(theta) b; cx a, b; }")
        else {
            panic!("expected gate definition");
        };
        assert_eq!(params, ["theta"]);
        assert_eq!(qubits, ["a", "b"]);
        assert_eq!(body.statements.len(), 3);

        let Statement::SubroutineDefinition {
            args, return_type, ..
        } = first("def parity(bit[2] b, qubit q) -> bit { return b[0] ^ b[1]; }")
        else {
            panic!("expected subroutine");
        };
        assert_eq!(args.len(), 2);
        assert!(matches!(args[1].ty, ArgType::Qubit(None)));
        assert!(return_type.is_some());
    }

    #[test]
    fn test_timing_statements() {
        assert!(matches!(
            first("delay[100ns] q[0];"),
            Statement::Delay { .. }
        ));
        assert!(matches!(
            first("box[1us] { x q; }"),
            Statement::Box { duration: Some(_), .. }
        ));
    }
}
