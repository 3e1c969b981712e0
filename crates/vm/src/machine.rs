//! VM state: frames, the three stacks, the instruction pointer, and the
//! operand accessors every handler goes through.

use crate::error::RuntimeError;
use crate::frame::{Frame, Slot};
use crate::io::Io;
use crate::stack::Stack;
use triad_common::{FrameKind, Instruction, Operand, Program, TypeTag, Value, Variable};

/// The triad virtual machine.
///
/// One instance owns all execution state for one run of one program.
pub struct VM<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Host streams.
    pub(crate) io: Io<'a>,
    /// GF: lives for the whole run.
    pub(crate) global: Frame,
    /// TF: absent until CREATEFRAME, taken by PUSHFRAME.
    pub(crate) temporary: Option<Frame>,
    /// LF is the top of this stack.
    pub(crate) locals: Stack<Frame>,
    /// Operand stack for PUSHS/POPS and the stack-form opcodes.
    pub(crate) data: Stack<Value>,
    /// Positions of pending CALL instructions.
    pub(crate) calls: Stack<usize>,
    /// Dense position of the instruction being executed.
    pub(crate) pc: usize,
    /// Number of instructions started so far.
    pub(crate) executed: usize,
}

impl<'a> VM<'a> {
    /// Create a VM positioned at the first instruction.
    pub fn new(program: &'a Program, io: Io<'a>) -> Self {
        Self {
            program,
            io,
            global: Frame::new(),
            temporary: None,
            locals: Stack::new(),
            data: Stack::new(),
            calls: Stack::new(),
            pc: 1,
            executed: 0,
        }
    }

    /// The global frame.
    pub fn global(&self) -> &Frame {
        &self.global
    }

    // ---- Frame resolution ----

    pub(crate) fn frame(&self, kind: FrameKind) -> Result<&Frame, RuntimeError> {
        let found = match kind {
            FrameKind::Global => Some(&self.global),
            FrameKind::Local => self.locals.top(),
            FrameKind::Temporary => self.temporary.as_ref(),
        };
        found.ok_or(RuntimeError::UndefinedFrame {
            at: self.pc,
            frame: kind,
        })
    }

    pub(crate) fn frame_mut(&mut self, kind: FrameKind) -> Result<&mut Frame, RuntimeError> {
        let at = self.pc;
        let found = match kind {
            FrameKind::Global => Some(&mut self.global),
            FrameKind::Local => self.locals.top_mut(),
            FrameKind::Temporary => self.temporary.as_mut(),
        };
        found.ok_or(RuntimeError::UndefinedFrame { at, frame: kind })
    }

    fn slot(&self, var: &Variable) -> Result<&Slot, RuntimeError> {
        self.frame(var.frame)?
            .slot(&var.name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                at: self.pc,
                var: var.clone(),
            })
    }

    /// Fail unless `var` names a declared slot in an existing frame.
    pub(crate) fn ensure_declared(&self, var: &Variable) -> Result<(), RuntimeError> {
        self.slot(var).map(|_| ())
    }

    /// Current value of a variable. Unset slots are a missing-value error.
    pub(crate) fn read_var(&self, var: &Variable) -> Result<Value, RuntimeError> {
        self.slot(var)?
            .value
            .clone()
            .ok_or_else(|| RuntimeError::UnsetVariable {
                at: self.pc,
                var: var.clone(),
            })
    }

    /// Type of a variable's value, or `None` if it was never written.
    pub(crate) fn var_type(&self, var: &Variable) -> Result<Option<TypeTag>, RuntimeError> {
        Ok(self.slot(var)?.value.as_ref().map(Value::type_tag))
    }

    pub(crate) fn write_var(&mut self, var: &Variable, value: Value) -> Result<(), RuntimeError> {
        let at = self.pc;
        let slot = self
            .frame_mut(var.frame)?
            .slot_mut(&var.name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                at,
                var: var.clone(),
            })?;
        slot.value = Some(value);
        Ok(())
    }

    // ---- Operand access ----

    /// Operand `index` as a variable reference.
    pub(crate) fn var_operand<'i>(
        &self,
        instr: &'i Instruction,
        index: usize,
    ) -> Result<&'i Variable, RuntimeError> {
        match instr.operand(index) {
            Some(Operand::Var(var)) => Ok(var),
            _ => Err(malformed(instr, index)),
        }
    }

    /// Operand `index` evaluated as a symbol: a constant, or a variable's
    /// current value.
    pub(crate) fn symb_operand(
        &self,
        instr: &Instruction,
        index: usize,
    ) -> Result<Value, RuntimeError> {
        match instr.operand(index) {
            Some(Operand::Const(value)) => Ok(value.clone()),
            Some(Operand::Var(var)) => self.read_var(var),
            _ => Err(malformed(instr, index)),
        }
    }

    /// Operand `index` as a label, resolved to its dense position.
    pub(crate) fn label_operand(
        &self,
        instr: &Instruction,
        index: usize,
    ) -> Result<usize, RuntimeError> {
        match instr.operand(index) {
            Some(Operand::Label(name)) => {
                self.program
                    .labels
                    .resolve(name)
                    .ok_or_else(|| RuntimeError::UndefinedLabel {
                        at: self.pc,
                        label: name.clone(),
                    })
            }
            _ => Err(malformed(instr, index)),
        }
    }

    // ---- Stacks ----

    pub(crate) fn pop_value(&mut self) -> Result<Value, RuntimeError> {
        self.data
            .pop()
            .ok_or(RuntimeError::EmptyStack { at: self.pc })
    }

    // ---- Host streams ----

    pub(crate) fn emit(&mut self, text: &str) -> Result<(), RuntimeError> {
        let at = self.pc;
        self.io
            .output
            .write_all(text.as_bytes())
            .map_err(|e| io_failure(at, e))
    }

    pub(crate) fn diagnose(&mut self, text: &str) -> Result<(), RuntimeError> {
        let at = self.pc;
        self.io
            .diagnostics
            .write_all(text.as_bytes())
            .map_err(|e| io_failure(at, e))
    }

    pub(crate) fn next_input_line(&mut self) -> Result<Option<String>, RuntimeError> {
        let at = self.pc;
        self.io.input.next_line().map_err(|e| io_failure(at, e))
    }

    /// Flush both sinks.
    pub(crate) fn flush(&mut self) -> Result<(), RuntimeError> {
        let at = self.pc;
        self.io.output.flush().map_err(|e| io_failure(at, e))?;
        self.io.diagnostics.flush().map_err(|e| io_failure(at, e))
    }
}

fn malformed(instr: &Instruction, index: usize) -> RuntimeError {
    RuntimeError::MalformedOperand {
        at: instr.position,
        opcode: instr.opcode,
        index: index + 1,
    }
}

fn io_failure(at: usize, err: std::io::Error) -> RuntimeError {
    RuntimeError::Io {
        at,
        message: err.to_string(),
    }
}
