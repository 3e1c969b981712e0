//! Opcode definitions for the triad instruction set.
//!
//! Every opcode has a fixed operand signature. The signature fixes both the
//! operand count (0 to 3) and what kind of operand each slot accepts.

/// What an operand slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// A variable reference (`GF@x`, `LF@x`, `TF@x`).
    Var,
    /// A variable reference or a constant.
    Symb,
    /// A label name.
    Label,
    /// A type name (`int`, `string`, `bool`). Only used by READ.
    Type,
}

use Slot::{Label as L, Symb as S, Type as T, Var as V};

/// Identifies the operation to perform.
///
/// The `*S` variants operate on the operand stack instead of explicit
/// operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frames and calls
    /// Create a fresh temporary frame, discarding any existing one.
    CreateFrame,
    /// Move the temporary frame onto the local-frame stack.
    PushFrame,
    /// Move the top of the local-frame stack into the temporary frame slot.
    PopFrame,
    /// Declare an unset variable.
    DefVar,
    /// Push the return position and jump to a label.
    Call,
    /// Pop the call stack and resume there.
    Return,

    // Data movement
    /// Copy a symbol into a variable.
    Move,
    /// Push a symbol onto the operand stack.
    Pushs,
    /// Pop the operand stack into a variable.
    Pops,
    /// Empty the operand stack.
    Clears,

    // Arithmetic, relational, logic
    /// Integer addition.
    Add,
    /// Integer subtraction.
    Sub,
    /// Integer multiplication.
    Mul,
    /// Integer division. Division by zero is an operand value error.
    Idiv,
    /// Less-than over int, string, or bool.
    Lt,
    /// Greater-than over int, string, or bool.
    Gt,
    /// Equality; `nil` compares with anything.
    Eq,
    /// Logical conjunction.
    And,
    /// Logical disjunction.
    Or,
    /// Logical negation.
    Not,
    Adds,
    Subs,
    Muls,
    Idivs,
    Lts,
    Gts,
    Eqs,
    Ands,
    Ors,
    Nots,

    // Conversions
    /// Integer code (0..=255) to one-character string.
    Int2Char,
    /// Code point of the character at an index.
    Stri2Int,
    Int2Chars,
    Stri2Ints,

    // Input/output
    /// Read one line from the input and parse it as the given type.
    Read,
    /// Print a symbol to standard output.
    Write,

    // Strings
    /// Concatenate two strings.
    Concat,
    /// Length of a string in characters.
    Strlen,
    /// One-character substring at an index.
    GetChar,
    /// Replace the character at an index in the destination string.
    SetChar,

    // Types
    /// Store the type name of a symbol as a string.
    Type,

    // Control flow
    /// Jump target. No runtime effect.
    Label,
    /// Unconditional jump.
    Jump,
    /// Jump if two symbols are equal.
    JumpIfEq,
    /// Jump if two symbols differ.
    JumpIfNeq,
    JumpIfEqs,
    JumpIfNeqs,
    /// Halt with an exit code in 0..=9.
    Exit,

    // Debugging
    /// Print a symbol to the diagnostic stream.
    Dprint,
    /// Print interpreter state to the diagnostic stream.
    Break,
}

/// All valid opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 50] = [
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::DefVar,
    Opcode::Call,
    Opcode::Return,
    Opcode::Move,
    Opcode::Pushs,
    Opcode::Pops,
    Opcode::Clears,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Idiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Adds,
    Opcode::Subs,
    Opcode::Muls,
    Opcode::Idivs,
    Opcode::Lts,
    Opcode::Gts,
    Opcode::Eqs,
    Opcode::Ands,
    Opcode::Ors,
    Opcode::Nots,
    Opcode::Int2Char,
    Opcode::Stri2Int,
    Opcode::Int2Chars,
    Opcode::Stri2Ints,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::Strlen,
    Opcode::GetChar,
    Opcode::SetChar,
    Opcode::Type,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::JumpIfEqs,
    Opcode::JumpIfNeqs,
    Opcode::Exit,
    Opcode::Dprint,
    Opcode::Break,
];

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::DefVar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Move => "MOVE",
            Opcode::Pushs => "PUSHS",
            Opcode::Pops => "POPS",
            Opcode::Clears => "CLEARS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Idiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Adds => "ADDS",
            Opcode::Subs => "SUBS",
            Opcode::Muls => "MULS",
            Opcode::Idivs => "IDIVS",
            Opcode::Lts => "LTS",
            Opcode::Gts => "GTS",
            Opcode::Eqs => "EQS",
            Opcode::Ands => "ANDS",
            Opcode::Ors => "ORS",
            Opcode::Nots => "NOTS",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::Stri2Int => "STRI2INT",
            Opcode::Int2Chars => "INT2CHARS",
            Opcode::Stri2Ints => "STRI2INTS",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::Strlen => "STRLEN",
            Opcode::GetChar => "GETCHAR",
            Opcode::SetChar => "SETCHAR",
            Opcode::Type => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::JumpIfEqs => "JUMPIFEQS",
            Opcode::JumpIfNeqs => "JUMPIFNEQS",
            Opcode::Exit => "EXIT",
            Opcode::Dprint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Look up an opcode by mnemonic, ignoring ASCII case.
    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(name))
            .copied()
    }

    /// The operand signature: one entry per required operand.
    pub fn signature(&self) -> &'static [Slot] {
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break
            | Opcode::Clears
            | Opcode::Adds
            | Opcode::Subs
            | Opcode::Muls
            | Opcode::Idivs
            | Opcode::Lts
            | Opcode::Gts
            | Opcode::Eqs
            | Opcode::Ands
            | Opcode::Ors
            | Opcode::Nots
            | Opcode::Int2Chars
            | Opcode::Stri2Ints => &[],

            Opcode::DefVar | Opcode::Pops => &[V],
            Opcode::Pushs | Opcode::Write | Opcode::Exit | Opcode::Dprint => &[S],
            Opcode::Call
            | Opcode::Label
            | Opcode::Jump
            | Opcode::JumpIfEqs
            | Opcode::JumpIfNeqs => &[L],

            Opcode::Move
            | Opcode::Int2Char
            | Opcode::Strlen
            | Opcode::Type
            | Opcode::Not => &[V, S],
            Opcode::Read => &[V, T],

            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Idiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Stri2Int
            | Opcode::Concat
            | Opcode::GetChar
            | Opcode::SetChar => &[V, S, S],
            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[L, S, S],
        }
    }

    /// Number of operands this opcode requires.
    pub fn arity(&self) -> usize {
        self.signature().len()
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
