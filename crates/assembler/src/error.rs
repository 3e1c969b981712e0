//! Error types for the triad assembler.

use thiserror::Error;
use triad_common::ErrorClass;

/// Errors produced while turning source text into raw instruction nodes.
///
/// The assembler only checks what it needs to build nodes. Everything
/// else (unknown opcodes, operand counts, bad literals) is left to the
/// loader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// A variable or constant slot holds a token without a `prefix@`.
    #[error("line {line}: malformed operand '{token}'")]
    MalformedOperand { line: usize, token: String },

    /// More than three operands on one line.
    #[error("line {line}: {count} operands given, at most 3 allowed")]
    TooManyOperands { line: usize, count: usize },

    /// A `.triad` header after the first instruction, or an unknown directive.
    #[error("line {line}: unexpected directive '{token}'")]
    UnexpectedDirective { line: usize, token: String },
}

impl AsmError {
    /// Assembly errors are all structural.
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Structural
    }
}
