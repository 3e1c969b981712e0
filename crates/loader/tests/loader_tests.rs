//! Integration tests for the triad loader.
//!
//! Organized by decoding step: structure, operands, renumbering, labels.

use proptest::prelude::*;
use triad_common::{
    ErrorClass, FrameKind, Opcode, Operand, RawArgument, RawInstruction, TypeTag, Value, Variable,
};
use triad_loader::{load, LoadError};

// ============================================================
// Helper functions
// ============================================================

fn node(order: &str, opcode: &str) -> RawInstruction {
    RawInstruction::new(order, opcode)
}

fn class_of(nodes: &[RawInstruction]) -> ErrorClass {
    load(nodes).unwrap_err().class()
}

// ============================================================
// Structure
// ============================================================

#[test]
fn every_opcode_with_wrong_count_is_structural() {
    for &op in &triad_common::opcode::ALL_OPCODES {
        let mut raw = node("1", op.mnemonic());
        for _ in 0..=op.arity() {
            raw = raw.arg("var", "GF@x");
        }
        assert_eq!(class_of(&[raw]), ErrorClass::Structural, "{op}");
    }
}

#[test]
fn opcode_attribute_trimmed_and_case_insensitive() {
    let program = load(&[node("1", " createFrame ")]).unwrap();
    assert_eq!(program.instructions[0].opcode, Opcode::CreateFrame);
}

#[test]
fn duplicate_order_is_structural() {
    let nodes = vec![node("4", "BREAK"), node("4", "CLEARS")];
    assert_eq!(load(&nodes), Err(LoadError::DuplicateOrder { order: 4 }));
    assert_eq!(class_of(&nodes).exit_code(), 32);
}

#[test]
fn non_arg_child_is_structural() {
    let raw = node("1", "WRITE").child(RawArgument::new("value", "int", "1"));
    assert_eq!(class_of(&[raw]), ErrorClass::Structural);
}

#[test]
fn arg3_without_arg2_is_structural() {
    let raw = node("1", "ADD")
        .child(RawArgument::new("arg1", "var", "GF@a"))
        .child(RawArgument::new("arg3", "int", "1"));
    assert_eq!(class_of(&[raw]), ErrorClass::Structural);
}

// ============================================================
// Operands
// ============================================================

#[test]
fn operand_text_is_trimmed() {
    let raw = node("1", "MOVE")
        .arg("var", "\n   GF@x\t")
        .arg("string", "  hi  ");
    let program = load(&[raw]).unwrap();
    assert_eq!(
        program.instructions[0].operands,
        vec![
            Operand::Var(Variable::new(FrameKind::Global, "x")),
            Operand::Const(Value::from("hi")),
        ]
    );
}

#[test]
fn operand_trim_keeps_non_ascii_whitespace() {
    let raw = node("1", "WRITE").arg("string", " \u{a0}x\u{a0}\t");
    let program = load(&[raw]).unwrap();
    assert_eq!(
        program.instructions[0].operands[0],
        Operand::Const(Value::from("\u{a0}x\u{a0}"))
    );
}

#[test]
fn string_escapes_decoded_once() {
    let raw = node("1", "WRITE").arg("string", "\\092\\048\\054\\053");
    let program = load(&[raw]).unwrap();
    assert_eq!(
        program.instructions[0].operands[0],
        Operand::Const(Value::from("\\065"))
    );
}

#[test]
fn non_integer_int_literal_is_structural() {
    let raw = node("1", "WRITE").arg("int", "12abc");
    assert_eq!(class_of(&[raw]), ErrorClass::Structural);
}

#[test]
fn read_takes_type_operand() {
    let raw = node("1", "READ").arg("var", "GF@n").arg("type", "bool");
    let program = load(&[raw]).unwrap();
    assert_eq!(
        program.instructions[0].operands[1],
        Operand::Type(TypeTag::Bool)
    );

    let raw = node("1", "READ").arg("var", "GF@n").arg("string", "bool");
    assert_eq!(class_of(&[raw]), ErrorClass::Structural);
}

#[test]
fn label_slot_rejects_variable() {
    let raw = node("1", "JUMP").arg("var", "GF@x");
    assert!(matches!(
        load(&[raw]),
        Err(LoadError::OperandKindMismatch { index: 1, .. })
    ));
}

#[test]
fn bad_frame_prefix_is_structural() {
    let raw = node("1", "DEFVAR").arg("var", "XF@x");
    assert_eq!(class_of(&[raw]), ErrorClass::Structural);
}

// ============================================================
// Renumbering and labels
// ============================================================

#[test]
fn jump_positions_follow_sorted_order() {
    let nodes = vec![
        node("100", "LABEL").arg("label", "done"),
        node("3", "LABEL").arg("label", "top"),
        node("40", "JUMP").arg("label", "done"),
    ];
    let program = load(&nodes).unwrap();
    assert_eq!(program.labels.resolve("top"), Some(1));
    assert_eq!(program.labels.resolve("done"), Some(3));
    assert_eq!(program.fetch(2).unwrap().opcode, Opcode::Jump);
}

#[test]
fn duplicate_label_is_semantic() {
    let nodes = vec![
        node("1", "LABEL").arg("label", "x"),
        node("2", "LABEL").arg("label", " x "),
    ];
    assert_eq!(class_of(&nodes), ErrorClass::Semantic);
}

#[test]
fn undefined_label_is_not_a_load_error() {
    let nodes = vec![node("1", "JUMP").arg("label", "nowhere")];
    let program = load(&nodes).unwrap();
    assert_eq!(program.labels.resolve("nowhere"), None);
}

proptest! {
    /// Any permutation of distinct orders yields positions 1..=N in
    /// ascending order of the declared attribute.
    #[test]
    fn renumbering_is_dense_and_sorted(
        orders in prop::collection::hash_set(1u64..10_000, 1..40)
    ) {
        let nodes: Vec<_> = orders
            .iter()
            .map(|o| node(&o.to_string(), "LABEL").arg("label", &format!("l{o}")))
            .collect();
        let program = load(&nodes).unwrap();

        let mut sorted: Vec<_> = orders.iter().copied().collect();
        sorted.sort_unstable();
        for (i, o) in sorted.iter().enumerate() {
            prop_assert_eq!(program.instructions[i].position, i + 1);
            prop_assert_eq!(program.labels.resolve(&format!("l{o}")), Some(i + 1));
        }
    }
}
