//! triad common types.
//!
//! This crate provides the foundational data structures shared by the
//! loader, the VM, and the assembler:
//!
//! - [`Opcode`] — the 50 opcodes and their operand signatures
//! - [`TypeTag`] — the four value types
//! - [`Value`] — runtime values
//! - [`RawInstruction`] — undecoded instruction nodes from a source reader
//! - [`Instruction`] / [`Operand`] — the validated, canonical form
//! - [`Program`] / [`LabelTable`] — a loaded, densely ordered program
//! - [`ErrorClass`] — the fixed error taxonomy and its exit codes

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod raw;
pub mod type_tag;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::ErrorClass;
pub use instruction::{FrameKind, Instruction, Operand, Variable};
pub use opcode::{Opcode, Slot};
pub use program::{LabelTable, Program};
pub use raw::{RawArgument, RawInstruction};
pub use type_tag::TypeTag;
pub use value::Value;
