//! Canonical, validated instruction form.
//!
//! The loader produces these from raw nodes. Constants are already parsed
//! and string escapes already decoded, so the VM never looks at source text.

use std::fmt;

use crate::opcode::Opcode;
use crate::type_tag::TypeTag;
use crate::value::Value;

/// Which frame a variable reference names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// `GF`: the global frame.
    Global,
    /// `LF`: the top of the local-frame stack.
    Local,
    /// `TF`: the temporary frame.
    Temporary,
}

impl FrameKind {
    /// The source prefix (`GF`, `LF`, `TF`).
    pub fn prefix(&self) -> &'static str {
        match self {
            FrameKind::Global => "GF",
            FrameKind::Local => "LF",
            FrameKind::Temporary => "TF",
        }
    }

    /// Parse a frame prefix. Case-sensitive.
    pub fn from_prefix(prefix: &str) -> Option<FrameKind> {
        match prefix {
            "GF" => Some(FrameKind::Global),
            "LF" => Some(FrameKind::Local),
            "TF" => Some(FrameKind::Temporary),
            _ => None,
        }
    }
}

/// A reference to a named variable in some frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    /// The frame the name is resolved in.
    pub frame: FrameKind,
    /// The variable name, without the frame prefix.
    pub name: String,
}

impl Variable {
    pub fn new(frame: FrameKind, name: impl Into<String>) -> Self {
        Self {
            frame,
            name: name.into(),
        }
    }

    /// Parse `GF@name`, `LF@name`, or `TF@name`.
    pub fn parse(text: &str) -> Option<Variable> {
        let (prefix, name) = text.split_once('@')?;
        if name.is_empty() {
            return None;
        }
        let frame = FrameKind::from_prefix(prefix)?;
        Some(Variable::new(frame, name))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.frame.prefix(), self.name)
    }
}

/// A decoded operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Variable reference.
    Var(Variable),
    /// Literal constant.
    Const(Value),
    /// Label name.
    Label(String),
    /// Type name (second operand of READ).
    Type(TypeTag),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Var(var) => write!(f, "{var}"),
            Operand::Const(Value::Str(s)) => write!(f, "string@{}", escape(s)),
            Operand::Const(value) => write!(f, "{}@{value}", value.type_tag()),
            Operand::Label(name) => f.write_str(name),
            Operand::Type(tag) => write!(f, "{tag}"),
        }
    }
}

/// Re-encode characters that cannot appear verbatim in source as `\ddd`.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let code = c as u32;
        if code <= 32 || c == '#' || c == '\\' {
            out.push_str(&format!("\\{code:03}"));
        } else {
            out.push(c);
        }
    }
    out
}

/// A single validated instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Dense, 1-based execution position.
    pub position: usize,
    /// The operation to perform.
    pub opcode: Opcode,
    /// Operands, matching `opcode.signature()` in count and kind.
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(position: usize, opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self {
            position,
            opcode,
            operands,
        }
    }

    /// Operand at `index`, if present.
    pub fn operand(&self, index: usize) -> Option<&Operand> {
        self.operands.get(index)
    }
}

/// Source form: mnemonic followed by space-separated operands.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        for operand in &self.operands {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}
