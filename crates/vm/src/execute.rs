//! Main execution loop and opcode dispatch for the triad VM.

use tracing::{debug, trace};

use crate::error::RuntimeError;
use crate::frame::Frame;
use crate::machine::VM;
use crate::ops;
use triad_common::{FrameKind, Instruction, Opcode, Operand, TypeTag, Value};

/// What the run loop does after an instruction completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Advance to the next position.
    Next,
    /// Continue at the given position.
    Jump(usize),
    /// Stop with the given exit status.
    Halt(i32),
}

impl<'a> VM<'a> {
    /// Execute from the current position until the program halts, runs off
    /// its end, or fails.
    ///
    /// Returns the exit status: 0 when execution falls off the end, or the
    /// EXIT operand.
    pub fn execute(&mut self) -> Result<i32, RuntimeError> {
        let program = self.program;
        loop {
            let Some(instr) = program.fetch(self.pc) else {
                debug!(executed = self.executed, "end of program");
                return Ok(0);
            };
            self.executed += 1;
            trace!(position = self.pc, instruction = %instr, "execute");

            match self.step(instr) {
                Ok(Flow::Next) => self.pc += 1,
                Ok(Flow::Jump(target)) => self.pc = target,
                Ok(Flow::Halt(code)) => {
                    debug!(code, executed = self.executed, "halted");
                    return Ok(code);
                }
                Err(err) => {
                    debug!(position = self.pc, class = %err.class(), "failed: {err}");
                    return Err(err);
                }
            }
        }
    }

    fn step(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let op = instr.opcode;
        match op {
            // ---- Frames and calls ----
            Opcode::CreateFrame => self.temporary = Some(Frame::new()),
            Opcode::PushFrame => self.exec_pushframe()?,
            Opcode::PopFrame => self.exec_popframe()?,
            Opcode::DefVar => self.exec_defvar(instr)?,
            Opcode::Call => return self.exec_call(instr),
            Opcode::Return => return self.exec_return(),

            // ---- Data movement ----
            Opcode::Move => self.exec_unary(instr, |_, _, v| Ok(v.clone()))?,
            Opcode::Pushs => {
                let value = self.symb_operand(instr, 0)?;
                self.data.push(value);
            }
            Opcode::Pops => {
                let value = self.pop_value()?;
                let dest = self.var_operand(instr, 0)?;
                self.write_var(dest, value)?;
            }
            Opcode::Clears => self.data.clear(),

            // ---- Arithmetic, relational, logical ----
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Idiv => {
                self.exec_binary(instr, ops::arithmetic)?
            }
            Opcode::Lt | Opcode::Gt | Opcode::Eq => self.exec_binary(instr, ops::relational)?,
            Opcode::And | Opcode::Or => self.exec_binary(instr, ops::logical)?,
            Opcode::Not => self.exec_unary(instr, ops::not)?,

            Opcode::Adds | Opcode::Subs | Opcode::Muls | Opcode::Idivs => {
                self.exec_binary_stack(op, ops::arithmetic)?
            }
            Opcode::Lts | Opcode::Gts | Opcode::Eqs => self.exec_binary_stack(op, ops::relational)?,
            Opcode::Ands | Opcode::Ors => self.exec_binary_stack(op, ops::logical)?,
            Opcode::Nots => self.exec_unary_stack(op, ops::not)?,

            // ---- Conversions ----
            Opcode::Int2Char => self.exec_unary(instr, ops::int2char)?,
            Opcode::Stri2Int => self.exec_binary(instr, ops::stri2int)?,
            Opcode::Int2Chars => self.exec_unary_stack(op, ops::int2char)?,
            Opcode::Stri2Ints => self.exec_binary_stack(op, ops::stri2int)?,

            // ---- Input and output ----
            Opcode::Read => self.exec_read(instr)?,
            Opcode::Write => {
                let value = self.symb_operand(instr, 0)?;
                self.emit(&value.output_text())?;
            }

            // ---- Strings ----
            Opcode::Concat => self.exec_binary(instr, ops::concat)?,
            Opcode::Strlen => self.exec_unary(instr, ops::strlen)?,
            Opcode::GetChar => self.exec_binary(instr, ops::getchar)?,
            Opcode::SetChar => self.exec_setchar(instr)?,

            // ---- Types ----
            Opcode::Type => self.exec_type(instr)?,

            // ---- Control flow ----
            Opcode::Label => {}
            Opcode::Jump => return self.label_operand(instr, 0).map(Flow::Jump),
            Opcode::JumpIfEq | Opcode::JumpIfNeq => return self.exec_jumpif(instr),
            Opcode::JumpIfEqs | Opcode::JumpIfNeqs => return self.exec_jumpif_stack(instr),
            Opcode::Exit => return self.exec_exit(instr),

            // ---- Diagnostics ----
            Opcode::Dprint => {
                let value = self.symb_operand(instr, 0)?;
                self.diagnose(&value.to_string())?;
            }
            Opcode::Break => self.exec_break()?,
        }
        Ok(Flow::Next)
    }

    // ---- Frames and calls ----

    fn exec_pushframe(&mut self) -> Result<(), RuntimeError> {
        let frame = self.temporary.take().ok_or(RuntimeError::UndefinedFrame {
            at: self.pc,
            frame: FrameKind::Temporary,
        })?;
        self.locals.push(frame);
        Ok(())
    }

    fn exec_popframe(&mut self) -> Result<(), RuntimeError> {
        let frame = self.locals.pop().ok_or(RuntimeError::UndefinedFrame {
            at: self.pc,
            frame: FrameKind::Local,
        })?;
        self.temporary = Some(frame);
        Ok(())
    }

    fn exec_defvar(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let var = self.var_operand(instr, 0)?;
        let at = self.pc;
        if self.frame_mut(var.frame)?.declare(&var.name) {
            Ok(())
        } else {
            Err(RuntimeError::Redefinition {
                at,
                var: var.clone(),
            })
        }
    }

    /// Push this CALL's own position; RETURN resumes one past it.
    fn exec_call(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let target = self.label_operand(instr, 0)?;
        self.calls.push(self.pc);
        Ok(Flow::Jump(target))
    }

    fn exec_return(&mut self) -> Result<Flow, RuntimeError> {
        let caller = self
            .calls
            .pop()
            .ok_or(RuntimeError::EmptyCallStack { at: self.pc })?;
        Ok(Flow::Jump(caller + 1))
    }

    // ---- Generic operand shapes ----

    /// `dest := f(symb)`. The destination must exist before the operand is
    /// evaluated.
    fn exec_unary(
        &mut self,
        instr: &Instruction,
        f: fn(Opcode, usize, &Value) -> Result<Value, RuntimeError>,
    ) -> Result<(), RuntimeError> {
        let dest = self.var_operand(instr, 0)?;
        self.ensure_declared(dest)?;
        let value = self.symb_operand(instr, 1)?;
        let result = f(instr.opcode, self.pc, &value)?;
        self.write_var(dest, result)
    }

    /// `dest := f(symb1, symb2)`.
    fn exec_binary(
        &mut self,
        instr: &Instruction,
        f: fn(Opcode, usize, &Value, &Value) -> Result<Value, RuntimeError>,
    ) -> Result<(), RuntimeError> {
        let dest = self.var_operand(instr, 0)?;
        self.ensure_declared(dest)?;
        let left = self.symb_operand(instr, 1)?;
        let right = self.symb_operand(instr, 2)?;
        let result = f(instr.opcode, self.pc, &left, &right)?;
        self.write_var(dest, result)
    }

    /// Pop one value, push `f(value)`.
    fn exec_unary_stack(
        &mut self,
        op: Opcode,
        f: fn(Opcode, usize, &Value) -> Result<Value, RuntimeError>,
    ) -> Result<(), RuntimeError> {
        let value = self.pop_value()?;
        let result = f(op, self.pc, &value)?;
        self.data.push(result);
        Ok(())
    }

    /// Pop right then left, push `f(left, right)`.
    fn exec_binary_stack(
        &mut self,
        op: Opcode,
        f: fn(Opcode, usize, &Value, &Value) -> Result<Value, RuntimeError>,
    ) -> Result<(), RuntimeError> {
        let right = self.pop_value()?;
        let left = self.pop_value()?;
        let result = f(op, self.pc, &left, &right)?;
        self.data.push(result);
        Ok(())
    }

    // ---- Opcodes with their own shape ----

    fn exec_read(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let dest = self.var_operand(instr, 0)?;
        self.ensure_declared(dest)?;
        let tag = match instr.operand(1) {
            Some(Operand::Type(tag)) => *tag,
            _ => {
                return Err(RuntimeError::MalformedOperand {
                    at: self.pc,
                    opcode: instr.opcode,
                    index: 2,
                })
            }
        };
        let line = self.next_input_line()?;
        self.write_var(dest, ops::parse_input(line, tag))
    }

    /// The destination's current value is the string being edited.
    fn exec_setchar(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let dest = self.var_operand(instr, 0)?;
        let target = self.read_var(dest)?;
        let index = self.symb_operand(instr, 1)?;
        let replacement = self.symb_operand(instr, 2)?;
        let result = ops::setchar(instr.opcode, self.pc, &target, &index, &replacement)?;
        self.write_var(dest, result)
    }

    /// Writes the operand's type name; an unset variable yields "".
    fn exec_type(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let dest = self.var_operand(instr, 0)?;
        self.ensure_declared(dest)?;
        let name = match instr.operand(1) {
            Some(Operand::Var(var)) => self
                .var_type(var)?
                .map_or(String::new(), |tag| tag.name().to_string()),
            Some(Operand::Const(value)) => value.type_tag().name().to_string(),
            _ => {
                return Err(RuntimeError::MalformedOperand {
                    at: self.pc,
                    opcode: instr.opcode,
                    index: 2,
                })
            }
        };
        self.write_var(dest, Value::Str(name))
    }

    /// The label is resolved before either operand is evaluated.
    fn exec_jumpif(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let target = self.label_operand(instr, 0)?;
        let left = self.symb_operand(instr, 1)?;
        let right = self.symb_operand(instr, 2)?;
        Ok(branch(
            ops::jump_condition(instr.opcode, self.pc, &left, &right)?,
            target,
        ))
    }

    fn exec_jumpif_stack(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let target = self.label_operand(instr, 0)?;
        let right = self.pop_value()?;
        let left = self.pop_value()?;
        Ok(branch(
            ops::jump_condition(instr.opcode, self.pc, &left, &right)?,
            target,
        ))
    }

    fn exec_exit(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        match self.symb_operand(instr, 0)? {
            Value::Int(code @ 0..=9) => Ok(Flow::Halt(code as i32)),
            Value::Int(code) => Err(RuntimeError::InvalidExitCode { at: self.pc, code }),
            other => Err(RuntimeError::WrongType {
                at: self.pc,
                opcode: instr.opcode,
                expected: TypeTag::Int,
                found: other.type_tag(),
            }),
        }
    }

    /// Dump the machine state to the diagnostic sink.
    fn exec_break(&mut self) -> Result<(), RuntimeError> {
        let temporary = match &self.temporary {
            Some(frame) => frame.len().to_string(),
            None => "undefined".to_string(),
        };
        let report = format!(
            "position: {}\nexecuted: {}\nglobal frame: {}\ntemporary frame: {}\nlocal frames: {}\noperand stack: {}\ncall stack: {}\n",
            self.pc,
            self.executed,
            self.global.len(),
            temporary,
            self.locals.len(),
            self.data.len(),
            self.calls.len(),
        );
        self.diagnose(&report)
    }
}

fn branch(taken: bool, target: usize) -> Flow {
    if taken {
        Flow::Jump(target)
    } else {
        Flow::Next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Io;
    use std::collections::VecDeque;
    use triad_common::{Program, Variable};

    fn gf(name: &str) -> Operand {
        Operand::Var(Variable::new(FrameKind::Global, name))
    }

    fn int(n: i64) -> Operand {
        Operand::Const(Value::Int(n))
    }

    fn program(body: Vec<(Opcode, Vec<Operand>)>) -> Program {
        let instructions = body
            .into_iter()
            .enumerate()
            .map(|(i, (op, operands))| Instruction::new(i + 1, op, operands))
            .collect();
        Program::new(instructions, Default::default())
    }

    /// Run and return (status, stdout, VM global `x`).
    fn run(program: &Program) -> (Result<i32, RuntimeError>, String, Option<Value>) {
        let mut input = VecDeque::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut vm = VM::new(program, Io::new(&mut input, &mut out, &mut err));
        let status = vm.execute();
        let x = vm.global().slot("x").and_then(|s| s.value.clone());
        drop(vm);
        (status, String::from_utf8(out).unwrap(), x)
    }

    #[test]
    fn empty_program_exits_zero() {
        assert_eq!(run(&program(vec![])).0, Ok(0));
    }

    #[test]
    fn move_then_add() {
        let p = program(vec![
            (Opcode::DefVar, vec![gf("x")]),
            (Opcode::Move, vec![gf("x"), int(40)]),
            (Opcode::Add, vec![gf("x"), gf("x"), int(2)]),
        ]);
        assert_eq!(run(&p).2, Some(Value::Int(42)));
    }

    #[test]
    fn destination_checked_before_operands() {
        let p = program(vec![(Opcode::Add, vec![gf("x"), gf("missing"), int(1)])]);
        let (status, _, _) = run(&p);
        assert!(matches!(
            status,
            Err(RuntimeError::UndefinedVariable { var, .. }) if var.name == "x"
        ));
    }

    #[test]
    fn stack_forms_pop_right_first() {
        let p = program(vec![
            (Opcode::DefVar, vec![gf("x")]),
            (Opcode::Pushs, vec![int(10)]),
            (Opcode::Pushs, vec![int(3)]),
            (Opcode::Subs, vec![]),
            (Opcode::Pops, vec![gf("x")]),
        ]);
        assert_eq!(run(&p).2, Some(Value::Int(7)));
    }

    #[test]
    fn exit_stops_immediately() {
        let p = program(vec![
            (Opcode::Exit, vec![int(4)]),
            (Opcode::Write, vec![int(1)]),
        ]);
        let (status, out, _) = run(&p);
        assert_eq!(status, Ok(4));
        assert_eq!(out, "");
    }

    #[test]
    fn type_of_unset_is_empty_string() {
        let p = program(vec![
            (Opcode::DefVar, vec![gf("x")]),
            (Opcode::DefVar, vec![gf("u")]),
            (Opcode::Type, vec![gf("x"), gf("u")]),
        ]);
        assert_eq!(run(&p).2, Some(Value::from("")));
    }

    #[test]
    fn local_frame_written_in_place() {
        let lf = Operand::Var(Variable::new(FrameKind::Local, "v"));
        let p = program(vec![
            (Opcode::CreateFrame, vec![]),
            (Opcode::PushFrame, vec![]),
            (Opcode::DefVar, vec![lf.clone()]),
            (Opcode::Move, vec![lf.clone(), int(9)]),
            (Opcode::DefVar, vec![gf("x")]),
            (Opcode::Move, vec![gf("x"), lf]),
        ]);
        assert_eq!(run(&p).2, Some(Value::Int(9)));
    }

    #[test]
    fn popframe_without_locals_is_55() {
        let p = program(vec![(Opcode::PopFrame, vec![])]);
        assert_eq!(run(&p).0.unwrap_err().class().exit_code(), 55);
    }
}
