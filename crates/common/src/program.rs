//! A loaded program: densely ordered instructions plus the label table.

use std::collections::HashMap;

use crate::instruction::Instruction;

/// Mapping from label name to the dense position of its LABEL instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    positions: HashMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label. Returns the previously recorded position if the name
    /// was already present, in which case the table is left unchanged.
    pub fn insert(&mut self, name: &str, position: usize) -> Result<(), usize> {
        match self.positions.get(name) {
            Some(&existing) => Err(existing),
            None => {
                self.positions.insert(name.to_string(), position);
                Ok(())
            }
        }
    }

    /// Resolved position of a label.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A triad program ready for execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Instructions; `instructions[i].position == i + 1`.
    pub instructions: Vec<Instruction>,
    /// Label name to dense position.
    pub labels: LabelTable,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>, labels: LabelTable) -> Self {
        Self {
            instructions,
            labels,
        }
    }

    /// Instruction at a dense 1-based position.
    pub fn fetch(&self, position: usize) -> Option<&Instruction> {
        position
            .checked_sub(1)
            .and_then(|index| self.instructions.get(index))
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
