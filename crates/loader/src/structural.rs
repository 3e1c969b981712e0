//! Structural validation of individual instruction nodes.
//!
//! Checks the order attribute, the opcode, the argument element set, and
//! decodes each operand against the opcode's signature.

use std::collections::HashSet;

use crate::error::LoadError;
use crate::operand::decode_operand;
use triad_common::{Opcode, Operand, RawArgument, RawInstruction};

/// A node that passed structural validation but has not been renumbered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedNode {
    /// The declared order attribute.
    pub order: u64,
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
}

/// Tracks declared orders across the whole program.
#[derive(Debug, Default)]
pub(crate) struct OrderSet {
    seen: HashSet<u64>,
}

impl OrderSet {
    /// Parse and register a node's order attribute.
    ///
    /// `node` is the 1-based document index, reported when the attribute
    /// is missing.
    pub(crate) fn claim(&mut self, raw: Option<&str>, node: usize) -> Result<u64, LoadError> {
        let text = raw.ok_or(LoadError::MissingOrder { node })?;
        let order = parse_order(text)?;
        if !self.seen.insert(order) {
            return Err(LoadError::DuplicateOrder { order });
        }
        Ok(order)
    }
}

/// Order must be a positive decimal integer with no sign or whitespace.
fn parse_order(text: &str) -> Result<u64, LoadError> {
    let invalid = || LoadError::InvalidOrder {
        text: text.to_string(),
    };
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match text.parse::<u64>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(order) => Ok(order),
    }
}

/// Validate one node and decode its operands.
pub(crate) fn check_node(
    node: &RawInstruction,
    index: usize,
    orders: &mut OrderSet,
) -> Result<DecodedNode, LoadError> {
    let order = orders.claim(node.order.as_deref(), index)?;

    let name = node
        .opcode
        .as_deref()
        .ok_or(LoadError::MissingOpcode { order })?;
    let opcode = Opcode::from_mnemonic(name.trim()).ok_or_else(|| LoadError::UnknownOpcode {
        order,
        opcode: name.to_string(),
    })?;

    let args = order_arguments(&node.children, order)?;

    let signature = opcode.signature();
    if args.len() != signature.len() {
        return Err(LoadError::WrongOperandCount {
            order,
            opcode,
            expected: signature.len(),
            found: args.len(),
        });
    }

    let operands = args
        .iter()
        .zip(signature)
        .enumerate()
        .map(|(i, (arg, &slot))| decode_operand(arg, slot, opcode, i + 1, order))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedNode {
        order,
        opcode,
        operands,
    })
}

/// Arrange `argN` children by number, rejecting unknown tags, duplicates,
/// and gaps.
fn order_arguments(children: &[RawArgument], order: u64) -> Result<Vec<&RawArgument>, LoadError> {
    let mut slots: [Option<&RawArgument>; 3] = [None, None, None];

    for child in children {
        let n = match child.tag.as_str() {
            "arg1" => 0,
            "arg2" => 1,
            "arg3" => 2,
            other => {
                return Err(LoadError::UnexpectedChild {
                    order,
                    tag: other.to_string(),
                })
            }
        };
        if slots[n].replace(child).is_some() {
            return Err(LoadError::DuplicateChild {
                order,
                tag: child.tag.clone(),
            });
        }
    }

    let count = slots.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
    slots
        .into_iter()
        .take(count)
        .map(|slot| {
            slot.ok_or_else(|| LoadError::ArgumentGap {
                order,
                tag: format!("arg{count}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use triad_common::{FrameKind, Value, Variable};

    fn check(node: &RawInstruction) -> Result<DecodedNode, LoadError> {
        check_node(node, 1, &mut OrderSet::default())
    }

    #[test]
    fn valid_move() {
        let node = RawInstruction::new("3", "move")
            .arg("var", "GF@x")
            .arg("int", "5");
        let decoded = check(&node).unwrap();
        assert_eq!(decoded.order, 3);
        assert_eq!(decoded.opcode, Opcode::Move);
        assert_eq!(
            decoded.operands,
            vec![
                Operand::Var(Variable::new(FrameKind::Global, "x")),
                Operand::Const(Value::Int(5)),
            ]
        );
    }

    #[test]
    fn order_must_be_positive_digits() {
        for bad in ["0", "-1", "+2", "1.5", "", " 3", "abc", "99999999999999999999999"] {
            let node = RawInstruction::new(bad, "BREAK");
            assert_eq!(
                check(&node),
                Err(LoadError::InvalidOrder {
                    text: bad.to_string()
                }),
                "order {bad:?}"
            );
        }
    }

    #[test]
    fn missing_attributes() {
        let no_order = RawInstruction {
            opcode: Some("BREAK".to_string()),
            ..RawInstruction::default()
        };
        assert_eq!(check(&no_order), Err(LoadError::MissingOrder { node: 1 }));

        let no_opcode = RawInstruction {
            order: Some("1".to_string()),
            ..RawInstruction::default()
        };
        assert_eq!(check(&no_opcode), Err(LoadError::MissingOpcode { order: 1 }));
    }

    #[test]
    fn duplicate_order_across_nodes() {
        let mut orders = OrderSet::default();
        check_node(&RawInstruction::new("2", "BREAK"), 1, &mut orders).unwrap();
        assert_eq!(
            check_node(&RawInstruction::new("2", "BREAK"), 2, &mut orders),
            Err(LoadError::DuplicateOrder { order: 2 })
        );
    }

    #[test]
    fn unknown_opcode() {
        assert!(matches!(
            check(&RawInstruction::new("1", "HALT")),
            Err(LoadError::UnknownOpcode { .. })
        ));
    }

    #[test]
    fn children_in_any_document_order() {
        let node = RawInstruction::new("1", "MOVE")
            .child(RawArgument::new("arg2", "int", "1"))
            .child(RawArgument::new("arg1", "var", "GF@a"));
        let decoded = check(&node).unwrap();
        assert_eq!(decoded.operands[1], Operand::Const(Value::Int(1)));
    }

    #[test]
    fn gap_in_arguments() {
        let node = RawInstruction::new("1", "MOVE")
            .child(RawArgument::new("arg2", "int", "1"));
        assert_eq!(
            check(&node),
            Err(LoadError::ArgumentGap {
                order: 1,
                tag: "arg2".to_string()
            })
        );

        let node = RawInstruction::new("1", "ADD")
            .child(RawArgument::new("arg1", "var", "GF@a"))
            .child(RawArgument::new("arg3", "int", "1"));
        assert!(matches!(check(&node), Err(LoadError::ArgumentGap { .. })));
    }

    #[test]
    fn unexpected_child_tag() {
        let node = RawInstruction::new("1", "WRITE").child(RawArgument::new("arg4", "int", "1"));
        assert_eq!(
            check(&node),
            Err(LoadError::UnexpectedChild {
                order: 1,
                tag: "arg4".to_string()
            })
        );
    }

    #[test]
    fn duplicate_child_tag() {
        let node = RawInstruction::new("1", "WRITE")
            .child(RawArgument::new("arg1", "int", "1"))
            .child(RawArgument::new("arg1", "int", "2"));
        assert!(matches!(check(&node), Err(LoadError::DuplicateChild { .. })));
    }

    #[test]
    fn wrong_operand_count() {
        let node = RawInstruction::new("1", "CREATEFRAME").arg("var", "GF@x");
        assert_eq!(
            check(&node),
            Err(LoadError::WrongOperandCount {
                order: 1,
                opcode: Opcode::CreateFrame,
                expected: 0,
                found: 1
            })
        );
    }
}
