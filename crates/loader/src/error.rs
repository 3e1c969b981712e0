//! Load errors for triad instruction streams.
//!
//! Every error names the instruction it was found in: by its declared
//! `order` attribute once that has been parsed, or by its position in the
//! source document before that.

use thiserror::Error;
use triad_common::{ErrorClass, Opcode};

/// Errors found while decoding raw instruction nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Instruction node has no `order` attribute.
    #[error("instruction #{node} has no order attribute")]
    MissingOrder { node: usize },

    /// `order` is not a positive decimal integer.
    #[error("invalid order attribute '{text}'")]
    InvalidOrder { text: String },

    /// Two instructions declare the same `order`.
    #[error("duplicate order {order}")]
    DuplicateOrder { order: u64 },

    /// Instruction node has no `opcode` attribute.
    #[error("instruction {order} has no opcode attribute")]
    MissingOpcode { order: u64 },

    /// Opcode is not part of the instruction set.
    #[error("instruction {order}: unknown opcode '{opcode}'")]
    UnknownOpcode { order: u64, opcode: String },

    /// Child element is not `arg1`, `arg2`, or `arg3`.
    #[error("instruction {order}: unexpected element '{tag}'")]
    UnexpectedChild { order: u64, tag: String },

    /// The same `argN` element appears twice.
    #[error("instruction {order}: duplicate element '{tag}'")]
    DuplicateChild { order: u64, tag: String },

    /// `arg2` without `arg1`, or `arg3` without both.
    #[error("instruction {order}: '{tag}' present without preceding arguments")]
    ArgumentGap { order: u64, tag: String },

    /// Operand count does not match the opcode.
    #[error("instruction {order}: {opcode} expects {expected} operand(s), found {found}")]
    WrongOperandCount {
        order: u64,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// Argument element has no `type` attribute.
    #[error("instruction {order}: {tag} has no type attribute")]
    MissingOperandKind { order: u64, tag: String },

    /// Argument `type` attribute is not a known operand kind.
    #[error("instruction {order}: unknown operand type '{kind}'")]
    UnknownOperandKind { order: u64, kind: String },

    /// Operand kind does not fit the opcode's signature.
    #[error("instruction {order}: {opcode} operand {index} cannot be of type '{kind}'")]
    OperandKindMismatch {
        order: u64,
        opcode: Opcode,
        index: usize,
        kind: String,
    },

    /// Variable text is not `GF@name`, `LF@name`, or `TF@name`.
    #[error("instruction {order}: invalid variable '{text}'")]
    InvalidVariable { order: u64, text: String },

    /// Non-empty integer literal that does not parse.
    #[error("instruction {order}: invalid integer literal '{text}'")]
    InvalidInt { order: u64, text: String },

    /// Boolean literal other than `true`/`false`.
    #[error("instruction {order}: invalid bool literal '{text}'")]
    InvalidBool { order: u64, text: String },

    /// Nil literal other than `nil`.
    #[error("instruction {order}: invalid nil literal '{text}'")]
    InvalidNil { order: u64, text: String },

    /// Type operand other than `int`, `string`, `bool`.
    #[error("instruction {order}: invalid type name '{text}'")]
    InvalidTypeName { order: u64, text: String },

    /// Label operand with empty text.
    #[error("instruction {order}: empty label name")]
    EmptyLabel { order: u64 },

    /// A label name is defined twice.
    #[error("instruction {order}: label '{name}' already defined")]
    DuplicateLabel { order: u64, name: String },
}

impl LoadError {
    /// The error class, which fixes the exit status.
    pub fn class(&self) -> ErrorClass {
        match self {
            LoadError::DuplicateLabel { .. } => ErrorClass::Semantic,
            _ => ErrorClass::Structural,
        }
    }
}
