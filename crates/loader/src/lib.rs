//! triad loader — turns raw instruction nodes into an executable program.
//!
//! The loader stops at the first error. Nodes are checked in document
//! order, so the reported error is the first one a reader of the source
//! would hit.
//!
//! # Usage
//!
//! ```
//! use triad_common::{Opcode, RawInstruction};
//! use triad_loader::load;
//!
//! let nodes = vec![
//!     RawInstruction::new("20", "WRITE").arg("string", "world"),
//!     RawInstruction::new("10", "WRITE").arg("string", "hello\\032"),
//! ];
//!
//! let program = load(&nodes).unwrap();
//! assert_eq!(program.len(), 2);
//! assert_eq!(program.fetch(1).unwrap().to_string(), "WRITE string@hello\\032");
//! assert_eq!(program.fetch(2).unwrap().opcode, Opcode::Write);
//! ```
//!
//! # Steps
//!
//! 1. **Structural** — order attribute, opcode, argument elements, operand
//!    kinds and literals, per node
//! 2. **Labels** — LABEL names collected, duplicates rejected
//! 3. **Renumbering** — nodes sorted by declared order and given dense
//!    1-based positions; labels resolved against those positions

pub mod error;
pub mod escape;
mod labels;
mod operand;
pub mod structural;

pub use error::LoadError;

use std::collections::HashMap;

use labels::LabelCollector;
use structural::{check_node, DecodedNode, OrderSet};
use tracing::debug;
use triad_common::{Instruction, Opcode, Operand, Program, RawInstruction};

/// Validate, renumber, and resolve labels for a set of raw nodes.
///
/// # Errors
///
/// Returns the first [`LoadError`] found. Its [`class`](LoadError::class)
/// is structural (32) for everything except duplicate labels (52).
pub fn load(nodes: &[RawInstruction]) -> Result<Program, LoadError> {
    let mut orders = OrderSet::default();
    let mut labels = LabelCollector::default();
    let mut decoded = Vec::with_capacity(nodes.len());

    for (index, node) in nodes.iter().enumerate() {
        let checked = check_node(node, index + 1, &mut orders)?;
        if checked.opcode == Opcode::Label {
            if let Some(Operand::Label(name)) = checked.operands.first() {
                labels.define(name, checked.order)?;
            }
        }
        decoded.push(checked);
    }

    Ok(renumber(decoded, labels))
}

/// Sort by declared order and assign dense positions.
fn renumber(mut decoded: Vec<DecodedNode>, labels: LabelCollector) -> Program {
    decoded.sort_by_key(|node| node.order);

    let mut position_of = HashMap::with_capacity(decoded.len());
    let instructions: Vec<Instruction> = decoded
        .into_iter()
        .enumerate()
        .map(|(i, node)| {
            position_of.insert(node.order, i + 1);
            Instruction::new(i + 1, node.opcode, node.operands)
        })
        .collect();

    let labels = labels.resolve(&position_of);
    debug!(
        instructions = instructions.len(),
        labels = labels.len(),
        "program loaded"
    );
    Program::new(instructions, labels)
}
