//! triad virtual machine — executes loaded triad programs.
//!
//! The VM is a frame-based machine with:
//! - A global frame, an optional temporary frame, and a stack of local frames
//! - An operand stack for the stack-form opcodes
//! - A call stack of return positions
//!
//! Every failure is returned as a [`RuntimeError`]; nothing in this crate
//! terminates the process.
//!
//! # Usage
//!
//! ```
//! use std::collections::VecDeque;
//! use triad_common::{FrameKind, Instruction, LabelTable, Opcode, Operand, Program, Value, Variable};
//! use triad_vm::{run, Io};
//!
//! let x = Operand::Var(Variable::new(FrameKind::Global, "x"));
//! let program = Program::new(
//!     vec![
//!         Instruction::new(1, Opcode::DefVar, vec![x.clone()]),
//!         Instruction::new(2, Opcode::Move, vec![x.clone(), Operand::Const(Value::Int(42))]),
//!         Instruction::new(3, Opcode::Write, vec![x]),
//!     ],
//!     LabelTable::new(),
//! );
//!
//! let mut input = VecDeque::new();
//! let mut out = Vec::new();
//! let mut diag = Vec::new();
//! let status = run(&program, Io::new(&mut input, &mut out, &mut diag)).unwrap();
//! assert_eq!(status, 0);
//! assert_eq!(out, b"42");
//! ```

pub mod error;
pub mod execute;
pub mod frame;
pub mod io;
pub mod machine;
mod ops;
pub mod stack;

pub use error::RuntimeError;
pub use io::{Io, LineSource, Lines};
pub use machine::VM;

use triad_common::Program;

/// Execute a program to completion and flush its output.
///
/// Returns the exit status: 0 when execution runs off the end of the
/// program, or the operand of the EXIT that stopped it.
///
/// # Errors
///
/// Returns the [`RuntimeError`] that stopped execution. Output written
/// before the failure is still flushed.
pub fn run<'a>(program: &'a Program, io: Io<'a>) -> Result<i32, RuntimeError> {
    let mut vm = VM::new(program, io);
    let result = vm.execute();
    let flushed = vm.flush();
    let status = result?;
    flushed?;
    Ok(status)
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use triad_common::{
        FrameKind, Instruction, LabelTable, Opcode, Operand, Value, Variable,
    };

    fn gf(name: &str) -> Operand {
        Operand::Var(Variable::new(FrameKind::Global, name))
    }

    fn build(body: Vec<(Opcode, Vec<Operand>)>) -> Program {
        let instructions = body
            .into_iter()
            .enumerate()
            .map(|(i, (op, operands))| Instruction::new(i + 1, op, operands))
            .collect();
        Program::new(instructions, LabelTable::new())
    }

    fn exec(program: &Program) -> (Result<i32, RuntimeError>, String) {
        let mut input = VecDeque::new();
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let status = run(program, Io::new(&mut input, &mut out, &mut diag));
        (status, String::from_utf8_lossy(&out).into_owned())
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::Int),
            any::<bool>().prop_map(Value::Bool),
            "[a-z ]{0,8}".prop_map(Value::Str),
            Just(Value::Nil),
        ]
    }

    proptest! {
        /// PUSHS then POPS preserves both value and type.
        #[test]
        fn pushs_pops_round_trip(value in arb_value()) {
            let program = build(vec![
                (Opcode::DefVar, vec![gf("v")]),
                (Opcode::DefVar, vec![gf("t")]),
                (Opcode::Pushs, vec![Operand::Const(value.clone())]),
                (Opcode::Pops, vec![gf("v")]),
                (Opcode::Type, vec![gf("t"), gf("v")]),
                (Opcode::Write, vec![gf("t")]),
                (Opcode::Write, vec![Operand::Const(Value::from("|"))]),
                (Opcode::Write, vec![gf("v")]),
            ]);
            let (status, out) = exec(&program);
            prop_assert_eq!(status, Ok(0));
            prop_assert_eq!(out, format!("{}|{}", value.type_tag(), value.output_text()));
        }

        /// IDIV never yields a non-integer, and a zero divisor is always 57.
        #[test]
        fn idiv_integral_or_57(a in any::<i64>(), b in -5i64..5) {
            let program = build(vec![
                (Opcode::DefVar, vec![gf("q")]),
                (Opcode::DefVar, vec![gf("d")]),
                (Opcode::Move, vec![gf("d"), Operand::Const(Value::Int(b))]),
                (Opcode::Idiv, vec![gf("q"), Operand::Const(Value::Int(a)), gf("d")]),
                (Opcode::Write, vec![gf("q")]),
            ]);
            let (status, out) = exec(&program);
            if b == 0 {
                prop_assert_eq!(status.unwrap_err().class().exit_code(), 57);
            } else {
                prop_assert_eq!(status, Ok(0));
                prop_assert_eq!(out.parse::<i64>().unwrap(), a.wrapping_div(b));
            }
        }

        /// A second DEFVAR of the same name is 52 whatever runs in between.
        #[test]
        fn redefinition_always_52(filler in 0usize..6) {
            let mut body = vec![(Opcode::DefVar, vec![gf("x")])];
            for i in 0..filler {
                let name = format!("y{i}");
                body.push((Opcode::DefVar, vec![gf(&name)]));
                body.push((Opcode::Move, vec![gf(&name), Operand::Const(Value::Int(i as i64))]));
            }
            body.push((Opcode::DefVar, vec![gf("x")]));
            let (status, _) = exec(&build(body));
            prop_assert_eq!(status.unwrap_err().class().exit_code(), 52);
        }
    }
}
