//! Parser for triad source tokens → raw instruction nodes.
//!
//! Operand kinds come from the opcode's signature where the opcode is
//! known: label and type slots take bare words, variable and symbol slots
//! take `prefix@body` tokens. Unknown opcodes still produce a node so the
//! loader can report them.

use crate::error::AsmError;
use crate::lexer::Token;
use triad_common::{FrameKind, Opcode, RawInstruction, Slot};

const MAX_OPERANDS: usize = 3;

/// Parse one instruction line into a node with the given order.
///
/// `tokens` must be non-empty; the first token is taken as the opcode.
pub(crate) fn parse_instruction(
    tokens: &[Token<'_>],
    order: usize,
    line_num: usize,
) -> Result<RawInstruction, AsmError> {
    let (head, args) = match tokens.split_first() {
        Some((head, args)) => (head, args),
        None => return Ok(RawInstruction::new(order.to_string(), "")),
    };

    if let Token::Directive(token) = head {
        return Err(AsmError::UnexpectedDirective {
            line: line_num,
            token: token.to_string(),
        });
    }
    if args.len() > MAX_OPERANDS {
        return Err(AsmError::TooManyOperands {
            line: line_num,
            count: args.len(),
        });
    }

    let mnemonic = head.text();
    let signature = Opcode::from_mnemonic(mnemonic).map_or(&[][..], |op| op.signature());

    let mut node = RawInstruction::new(order.to_string(), mnemonic);
    for (i, token) in args.iter().enumerate() {
        let (kind, text) = classify(token, signature.get(i).copied(), line_num)?;
        node = node.arg(kind, text);
    }
    Ok(node)
}

/// Operand kind and text for one token.
///
/// With no slot (unknown opcode, or more operands than the signature
/// has), the token's own shape decides.
fn classify<'s>(
    token: &Token<'s>,
    slot: Option<Slot>,
    line_num: usize,
) -> Result<(&'s str, &'s str), AsmError> {
    let malformed = || AsmError::MalformedOperand {
        line: line_num,
        token: token.text().to_string(),
    };

    match (slot, *token) {
        (Some(Slot::Label), token) => Ok(("label", token.text())),
        (Some(Slot::Type), token) => Ok(("type", token.text())),
        (_, Token::Tagged { prefix, body, text }) => {
            if FrameKind::from_prefix(prefix).is_some() {
                Ok(("var", text))
            } else if matches!(prefix, "int" | "bool" | "string" | "nil") {
                Ok((prefix, body))
            } else {
                Err(malformed())
            }
        }
        (None, Token::Word(word)) => Ok(("label", word)),
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize_line;
    use triad_common::RawArgument;

    fn parse(line: &str) -> Result<RawInstruction, AsmError> {
        parse_instruction(&tokenize_line(line), 1, 1)
    }

    #[test]
    fn variable_and_constant_operands() {
        let node = parse("MOVE LF@x string@a\\032b").unwrap();
        assert_eq!(node.opcode.as_deref(), Some("MOVE"));
        assert_eq!(
            node.children,
            vec![
                RawArgument::new("arg1", "var", "LF@x"),
                RawArgument::new("arg2", "string", "a\\032b"),
            ]
        );
    }

    #[test]
    fn label_and_type_slots_take_bare_words() {
        let node = parse("JUMPIFEQ end GF@a int@1").unwrap();
        assert_eq!(node.children[0], RawArgument::new("arg1", "label", "end"));

        let node = parse("read GF@n bool").unwrap();
        assert_eq!(node.children[1], RawArgument::new("arg2", "type", "bool"));
    }

    #[test]
    fn bare_word_in_symbol_slot_rejected() {
        assert_eq!(
            parse("WRITE hello"),
            Err(AsmError::MalformedOperand {
                line: 1,
                token: "hello".to_string()
            })
        );
        assert!(matches!(
            parse("PUSHS float@1.5"),
            Err(AsmError::MalformedOperand { .. })
        ));
    }

    #[test]
    fn unknown_opcode_passes_through() {
        let node = parse("HALT GF@x somewhere").unwrap();
        assert_eq!(node.opcode.as_deref(), Some("HALT"));
        assert_eq!(node.children[0].kind.as_deref(), Some("var"));
        assert_eq!(node.children[1].kind.as_deref(), Some("label"));
    }

    #[test]
    fn too_many_operands() {
        assert_eq!(
            parse("ADD GF@a int@1 int@2 int@3"),
            Err(AsmError::TooManyOperands { line: 1, count: 4 })
        );
    }

    #[test]
    fn empty_constant_body_kept() {
        let node = parse("PUSHS string@").unwrap();
        assert_eq!(node.children[0], RawArgument::new("arg1", "string", ""));
    }
}
