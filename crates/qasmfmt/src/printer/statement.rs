//! Single-line statement text and block headers.

use super::expression::{
    Spacing, classical_type, expression, expression_list, for_iterable, operand, operand_list,
    raw_tokens,
};
use crate::ast::{
    ArgType, GateCall, GateModifier, IfStatement, Operand, Statement, SubroutineArg,
};
use crate::lexer::Token;

/// Render a statement without a body, terminator included.
///
/// Statements with a body render as their header alone.
pub(crate) fn render(statement: &Statement) -> String {
    match statement {
        Statement::Include(path) => format!("include \"{path}\";"),
        Statement::QuantumDeclaration { size, name } => match size {
            Some(size) => format!("qubit[{}] {name};", expression(size, Spacing::Compact)),
            None => format!("qubit {name};"),
        },
        Statement::ClassicalDeclaration {
            modifier,
            ty,
            name,
            init,
        } => {
            let mut out = String::new();
            if let Some(modifier) = modifier {
                out.push_str(modifier.keyword());
                out.push(' ');
            }
            out.push_str(&classical_type(ty));
            out.push(' ');
            out.push_str(name);
            if let Some(init) = init {
                out.push_str(" = ");
                out.push_str(&expression(init, Spacing::Compact));
            }
            out.push(';');
            out
        }
        Statement::GateCall(call) => gate_call(call),
        Statement::Measure { operand: source, target } => match target {
            Some(target) => format!("measure {} -> {};", operand(source), operand(target)),
            None => format!("measure {};", operand(source)),
        },
        Statement::Assignment { target, op, value } => format!(
            "{} {} {};",
            operand(target),
            op.symbol(),
            expression(value, Spacing::Compact)
        ),
        Statement::Barrier { operands } => with_operands("barrier", operands),
        Statement::Reset { operand: target } => format!("reset {};", operand(target)),
        Statement::Delay { duration, operands } => with_operands(
            &format!("delay[{}]", expression(duration, Spacing::Compact)),
            operands,
        ),
        Statement::Return(value) => match value {
            Some(value) => format!("return {};", expression(value, Spacing::Spaced)),
            None => "return;".to_string(),
        },
        Statement::Break => "break;".to_string(),
        Statement::Continue => "continue;".to_string(),
        Statement::End => "end;".to_string(),
        Statement::Other(tokens) => {
            let mut out = raw_tokens(tokens);
            if tokens.last().map(|t| t.kind) != Some(Token::RBrace) {
                out.push(';');
            }
            out
        }
        Statement::If(branch) => if_header(branch),
        Statement::For { .. }
        | Statement::While { .. }
        | Statement::GateDefinition { .. }
        | Statement::SubroutineDefinition { .. }
        | Statement::Box { .. } => header(statement).unwrap_or_default(),
    }
}

fn with_operands(keyword: &str, operands: &[Operand]) -> String {
    if operands.is_empty() {
        format!("{keyword};")
    } else {
        format!("{keyword} {};", operand_list(operands))
    }
}

fn gate_call(call: &GateCall) -> String {
    let mut out = String::new();
    for modifier in &call.modifiers {
        match modifier {
            GateModifier::Ctrl(None) => out.push_str("ctrl @ "),
            GateModifier::Ctrl(Some(n)) => {
                out.push_str(&format!("ctrl({}) @ ", expression(n, Spacing::Compact)));
            }
            GateModifier::NegCtrl(None) => out.push_str("negctrl @ "),
            GateModifier::NegCtrl(Some(n)) => {
                out.push_str(&format!("negctrl({}) @ ", expression(n, Spacing::Compact)));
            }
            GateModifier::Inv => out.push_str("inv @ "),
            GateModifier::Pow(k) => {
                out.push_str(&format!("pow({}) @ ", expression(k, Spacing::Compact)));
            }
        }
    }
    out.push_str(&call.name);
    if let Some(params) = &call.params {
        out.push('(');
        out.push_str(&expression_list(params, Spacing::Compact));
        out.push(')');
    }
    if !call.operands.is_empty() {
        out.push(' ');
        out.push_str(&operand_list(&call.operands));
    }
    out.push(';');
    out
}

/// `if (cond)` without the opening brace.
pub(crate) fn if_header(statement: &IfStatement) -> String {
    format!("if ({})", expression(&statement.condition, Spacing::Spaced))
}

/// Header line of a statement with a single body, without ` {`.
pub(crate) fn header(statement: &Statement) -> Option<String> {
    let text = match statement {
        Statement::For {
            ty,
            variable,
            iterable,
            ..
        } => match ty {
            Some(ty) => format!(
                "for {} {variable} in {}",
                classical_type(ty),
                for_iterable(iterable)
            ),
            None => format!("for {variable} in {}", for_iterable(iterable)),
        },
        Statement::While { condition, .. } => {
            format!("while ({})", expression(condition, Spacing::Spaced))
        }
        Statement::GateDefinition {
            name,
            params,
            qubits,
            ..
        } => {
            let mut out = format!("gate {name}");
            if !params.is_empty() {
                out.push_str(&format!("({})", params.join(", ")));
            }
            if !qubits.is_empty() {
                out.push(' ');
                out.push_str(&qubits.join(", "));
            }
            out
        }
        Statement::SubroutineDefinition {
            name,
            args,
            return_type,
            ..
        } => {
            let args = args.iter().map(subroutine_arg).collect::<Vec<_>>().join(", ");
            match return_type {
                Some(ty) => format!("def {name}({args}) -> {}", classical_type(ty)),
                None => format!("def {name}({args})"),
            }
        }
        Statement::Box { duration, .. } => match duration {
            Some(duration) => format!("box[{}]", expression(duration, Spacing::Compact)),
            None => "box".to_string(),
        },
        _ => return None,
    };
    Some(text)
}

fn subroutine_arg(arg: &SubroutineArg) -> String {
    match &arg.ty {
        ArgType::Classical(ty) => format!("{} {}", classical_type(ty), arg.name),
        ArgType::Qubit(Some(size)) => {
            format!("qubit[{}] {}", expression(size, Spacing::Compact), arg.name)
        }
        ArgType::Qubit(None) => format!("qubit {}", arg.name),
    }
}
