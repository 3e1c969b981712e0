//! Runtime errors for the triad VM.
//!
//! Every error carries the dense position (`at`) of the instruction that
//! failed. Each maps to exactly one [`ErrorClass`], which fixes the exit
//! status.

use thiserror::Error;
use triad_common::{ErrorClass, FrameKind, Opcode, TypeTag, Variable};

/// Errors that terminate a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// TF or LF referenced while that frame does not exist.
    #[error("frame {} does not exist at instruction {at}", frame.prefix())]
    UndefinedFrame { at: usize, frame: FrameKind },

    /// Name not declared in an existing frame.
    #[error("variable {var} is not defined at instruction {at}")]
    UndefinedVariable { at: usize, var: Variable },

    /// DEFVAR of a name that already exists in the frame.
    #[error("variable {var} redefined at instruction {at}")]
    Redefinition { at: usize, var: Variable },

    /// Jump or call to a label that was never defined.
    #[error("undefined label '{label}' at instruction {at}")]
    UndefinedLabel { at: usize, label: String },

    /// Read of a declared but never written variable.
    #[error("variable {var} has no value at instruction {at}")]
    UnsetVariable { at: usize, var: Variable },

    /// Pop from an empty operand stack.
    #[error("operand stack is empty at instruction {at}")]
    EmptyStack { at: usize },

    /// RETURN with no pending CALL.
    #[error("call stack is empty at instruction {at}")]
    EmptyCallStack { at: usize },

    /// A single operand has the wrong type.
    #[error("{opcode} expects {expected}, found {found} at instruction {at}")]
    WrongType {
        at: usize,
        opcode: Opcode,
        expected: TypeTag,
        found: TypeTag,
    },

    /// Two operands whose types cannot be combined.
    #[error("{opcode} cannot combine {left} and {right} at instruction {at}")]
    IncompatibleTypes {
        at: usize,
        opcode: Opcode,
        left: TypeTag,
        right: TypeTag,
    },

    /// SETCHAR with an empty replacement string.
    #[error("SETCHAR replacement is empty at instruction {at}")]
    EmptyReplacement { at: usize },

    /// IDIV or IDIVS with a zero divisor.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// EXIT with a code outside 0..=9.
    #[error("exit code {code} out of range 0..=9 at instruction {at}")]
    InvalidExitCode { at: usize, code: i64 },

    /// Character index outside the string.
    #[error("index {index} out of range for string of length {length} at instruction {at}")]
    IndexOutOfRange { at: usize, index: i64, length: usize },

    /// INT2CHAR input outside 0..=255.
    #[error("{code} is not a valid character code at instruction {at}")]
    InvalidCharCode { at: usize, code: i64 },

    /// An operand shape the loader should have rejected.
    #[error("malformed operand {index} for {opcode} at instruction {at}")]
    MalformedOperand {
        at: usize,
        opcode: Opcode,
        index: usize,
    },

    /// Reading input or writing output failed on the host side.
    #[error("i/o failure at instruction {at}: {message}")]
    Io { at: usize, message: String },
}

impl RuntimeError {
    /// The error class, which fixes the exit status.
    pub fn class(&self) -> ErrorClass {
        match self {
            RuntimeError::MalformedOperand { .. } => ErrorClass::Structural,
            RuntimeError::Redefinition { .. } | RuntimeError::UndefinedLabel { .. } => {
                ErrorClass::Semantic
            }
            RuntimeError::WrongType { .. }
            | RuntimeError::IncompatibleTypes { .. }
            | RuntimeError::EmptyReplacement { .. } => ErrorClass::OperandType,
            RuntimeError::UndefinedVariable { .. } => ErrorClass::UndefinedVariable,
            RuntimeError::UndefinedFrame { .. } => ErrorClass::UndefinedFrame,
            RuntimeError::UnsetVariable { .. }
            | RuntimeError::EmptyStack { .. }
            | RuntimeError::EmptyCallStack { .. } => ErrorClass::MissingValue,
            RuntimeError::DivisionByZero { .. } | RuntimeError::InvalidExitCode { .. } => {
                ErrorClass::OperandValue
            }
            RuntimeError::IndexOutOfRange { .. } | RuntimeError::InvalidCharCode { .. } => {
                ErrorClass::StringOperation
            }
            RuntimeError::Io { .. } => ErrorClass::Internal,
        }
    }

    /// Position of the failing instruction.
    pub fn at(&self) -> usize {
        match self {
            RuntimeError::UndefinedFrame { at, .. }
            | RuntimeError::UndefinedVariable { at, .. }
            | RuntimeError::Redefinition { at, .. }
            | RuntimeError::UndefinedLabel { at, .. }
            | RuntimeError::UnsetVariable { at, .. }
            | RuntimeError::EmptyStack { at }
            | RuntimeError::EmptyCallStack { at }
            | RuntimeError::WrongType { at, .. }
            | RuntimeError::IncompatibleTypes { at, .. }
            | RuntimeError::EmptyReplacement { at }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::InvalidExitCode { at, .. }
            | RuntimeError::IndexOutOfRange { at, .. }
            | RuntimeError::InvalidCharCode { at, .. }
            | RuntimeError::MalformedOperand { at, .. }
            | RuntimeError::Io { at, .. } => *at,
        }
    }
}
