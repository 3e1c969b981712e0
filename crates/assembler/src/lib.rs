//! triad assembler — textual source ↔ instruction nodes.
//!
//! The assembler is a thin front end. It splits lines into tokens and
//! decides operand kinds; all validation beyond that is the loader's job.
//!
//! # Source format
//!
//! ```text
//! .triad                  # optional header, first line only
//! DEFVAR GF@x             # variables: GF@ LF@ TF@
//! MOVE GF@x int@5         # constants: int@ bool@ string@ nil@
//! READ GF@y int           # type slots take a bare word
//! JUMPIFEQ end GF@x GF@y  # label slots take a bare word
//! LABEL end
//! ```
//!
//! # Usage
//!
//! ```
//! use triad_assembler::{assemble, disassemble};
//!
//! let text = ".triad\nDEFVAR GF@x\nMOVE GF@x int@5\nWRITE GF@x\n";
//! let nodes = assemble(text).unwrap();
//! assert_eq!(nodes.len(), 3);
//! assert_eq!(nodes[1].order.as_deref(), Some("2"));
//!
//! let program = triad_loader::load(&nodes).unwrap();
//! assert_eq!(disassemble(&program), text);
//! ```

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use disassembler::{disassemble, listing};
pub use error::AsmError;

use lexer::{tokenize_line, Token};
use parser::parse_instruction;
use triad_common::RawInstruction;

/// Assemble source text into raw instruction nodes.
///
/// Each instruction line becomes one node whose order is its 1-based
/// instruction count. Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Vec<RawInstruction>, AsmError> {
    let mut nodes = Vec::new();
    let mut seen_content = false;

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line);
        if tokens.is_empty() {
            continue;
        }

        let first_content = !seen_content;
        seen_content = true;
        if first_content && is_header(&tokens) {
            continue;
        }

        nodes.push(parse_instruction(&tokens, nodes.len() + 1, line_num)?);
    }

    Ok(nodes)
}

fn is_header(tokens: &[Token<'_>]) -> bool {
    matches!(tokens, [Token::Directive(word)] if word.eq_ignore_ascii_case(".triad"))
}
