//! Type tags for triad values.

use std::fmt;

/// The type of a runtime value.
///
/// Also used as the second operand of READ, where it names the type the
/// input line should be parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Signed 64-bit integer.
    Int,
    /// `true` or `false`.
    Bool,
    /// Sequence of Unicode scalar values.
    String,
    /// The single `nil` value.
    Nil,
}

/// All type tags, in definition order.
pub const ALL_TYPE_TAGS: [TypeTag; 4] = [TypeTag::Int, TypeTag::Bool, TypeTag::String, TypeTag::Nil];

impl TypeTag {
    /// Returns the source-level name of this type, as written by TYPE.
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Bool => "bool",
            TypeTag::String => "string",
            TypeTag::Nil => "nil",
        }
    }

    /// Look up a type tag by its exact source-level name.
    pub fn from_name(name: &str) -> Option<TypeTag> {
        ALL_TYPE_TAGS.iter().find(|tt| tt.name() == name).copied()
    }

    /// Returns true if READ can be asked for this type.
    pub fn is_readable(&self) -> bool {
        !matches!(self, TypeTag::Nil)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
