use std::fmt;

use super::ast::Span;

/// A compilation error with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexer,
    Parser,
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind: ErrorKind::Lexer,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind: ErrorKind::Parser,
        }
    }

    /// Format the error with the column it points at. Expressions are single
    /// line, so only the column is reported.
    pub fn format_with_source(&self, source: &str) -> String {
        let col = source
            .char_indices()
            .take_while(|(i, _)| *i < self.span.start)
            .count()
            + 1;
        format!(
            "[{}] col {}: {}",
            match self.kind {
                ErrorKind::Lexer => "lexer",
                ErrorKind::Parser => "parser",
            },
            col,
            self.message,
        )
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CompileError {}

/// A fault raised while executing bytecode. `DivisionByZero` depends on the
/// input values and can come from any program; the others only arise from
/// hand-built or corrupted bytecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecError {
    StackUnderflow { pc: usize },
    DivisionByZero { pc: usize },
    InvalidOpcode { pc: usize, tag: i32 },
    /// `const` was the last element, with no operand after it.
    MissingOperand { pc: usize },
    /// More than one value left on the stack after the last instruction.
    UnbalancedStack { depth: usize },
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::StackUnderflow { pc } => write!(f, "stack underflow at pc {pc}"),
            ExecError::DivisionByZero { pc } => write!(f, "division by zero at pc {pc}"),
            ExecError::InvalidOpcode { pc, tag } => {
                write!(f, "invalid opcode {tag} at pc {pc}")
            }
            ExecError::MissingOperand { pc } => {
                write!(f, "missing operand for const at pc {pc}")
            }
            ExecError::UnbalancedStack { depth } => {
                write!(f, "{depth} values left on the stack, expected 1")
            }
        }
    }
}

impl std::error::Error for ExecError {}
