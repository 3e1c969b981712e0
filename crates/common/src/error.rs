//! Error classes shared by the loader and the VM.
//!
//! Every failure maps to exactly one class, and each class has a fixed
//! process exit status.

use std::fmt;

/// Classification of a fatal error.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed instruction stream: bad order attribute, wrong operand
    /// count or kind, unknown opcode, unparsable literal.
    Structural = 32,
    /// Duplicate label, undefined label, variable redefinition.
    Semantic = 52,
    /// Wrong operand types for an operation.
    OperandType = 53,
    /// Variable not declared in an existing frame.
    UndefinedVariable = 54,
    /// Temporary or local frame does not exist.
    UndefinedFrame = 55,
    /// Empty stack, or read of an unset variable.
    MissingValue = 56,
    /// Division by zero, EXIT code out of range.
    OperandValue = 57,
    /// Bad string index or character code.
    StringOperation = 58,
    /// A host output sink failed.
    Internal = 99,
}

impl ErrorClass {
    /// Process exit status for this class.
    pub fn exit_code(&self) -> i32 {
        *self as i32
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorClass::Structural => "structural error",
            ErrorClass::Semantic => "semantic error",
            ErrorClass::OperandType => "operand type error",
            ErrorClass::UndefinedVariable => "undefined variable",
            ErrorClass::UndefinedFrame => "undefined frame",
            ErrorClass::MissingValue => "missing value",
            ErrorClass::OperandValue => "wrong operand value",
            ErrorClass::StringOperation => "string operation error",
            ErrorClass::Internal => "internal error",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(ErrorClass::Structural.exit_code(), 32);
        assert_eq!(ErrorClass::Semantic.exit_code(), 52);
        assert_eq!(ErrorClass::OperandType.exit_code(), 53);
        assert_eq!(ErrorClass::UndefinedVariable.exit_code(), 54);
        assert_eq!(ErrorClass::UndefinedFrame.exit_code(), 55);
        assert_eq!(ErrorClass::MissingValue.exit_code(), 56);
        assert_eq!(ErrorClass::OperandValue.exit_code(), 57);
        assert_eq!(ErrorClass::StringOperation.exit_code(), 58);
    }

    #[test]
    fn display_names() {
        assert_eq!(ErrorClass::UndefinedFrame.to_string(), "undefined frame");
        assert_eq!(ErrorClass::Structural.to_string(), "structural error");
    }
}
