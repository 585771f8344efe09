//! Statement categories and the blank-line rules between them.

use crate::ast::{Statement, StatementOrScope};

/// Layout class of a printed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Version,
    Include,
    QuantumDeclaration,
    ClassicalDeclaration,
    GateCall,
    Measurement,
    GateDefinition,
    Barrier,
    Reset,
    Comment,
    Other,
}

impl Category {
    pub fn of(item: &StatementOrScope) -> Self {
        match item {
            StatementOrScope::Statement(statement, _) => Self::of_statement(statement),
            StatementOrScope::Scope(_) => Category::Other,
        }
    }

    pub fn of_statement(statement: &Statement) -> Self {
        match statement {
            Statement::Include(_) => Category::Include,
            Statement::QuantumDeclaration { .. } => Category::QuantumDeclaration,
            Statement::ClassicalDeclaration { .. } => Category::ClassicalDeclaration,
            Statement::GateCall(_) => Category::GateCall,
            Statement::Measure { .. } => Category::Measurement,
            Statement::GateDefinition { .. } => Category::GateDefinition,
            Statement::Barrier { .. } => Category::Barrier,
            Statement::Reset { .. } => Category::Reset,
            _ => Category::Other,
        }
    }
}

/// Whether one blank line separates a `prev` line from a following `curr`.
///
/// Includes are set apart from whatever follows them, and gate definitions
/// from their neighbours. Consecutive includes or consecutive gate
/// definitions stay together.
pub fn blank_line_between(prev: Category, curr: Category) -> bool {
    use Category::{GateDefinition, Include};

    match (prev, curr) {
        (Include, Include) | (GateDefinition, GateDefinition) => false,
        (Include, _) | (GateDefinition, _) | (_, GateDefinition) => true,
        _ => false,
    }
}
