//! Disassembler: loaded program → canonical source text.
//!
//! Output starts with the `.triad` header, then one instruction per line
//! in position order. No indentation, no comments, no blank lines.

use triad_common::Program;

/// Disassemble a program into canonical source text.
///
/// Assembling and loading the output yields an equal program.
pub fn disassemble(program: &Program) -> String {
    let mut out = String::from(".triad\n");
    for instr in &program.instructions {
        out.push_str(&instr.to_string());
        out.push('\n');
    }
    out
}

/// Numbered listing: `<position>  <instruction>` per line.
pub fn listing(program: &Program) -> String {
    let width = program.len().to_string().len();
    program
        .instructions
        .iter()
        .map(|instr| format!("{:>width$}  {instr}\n", instr.position))
        .collect()
}
