//! Pure value operations shared by the operand and stack forms of each
//! opcode.
//!
//! `op` is the opcode being executed and `at` its position; both only feed
//! error reporting.

use std::cmp::Ordering;

use crate::error::RuntimeError;
use triad_common::{Opcode, TypeTag, Value};

fn expect_int(op: Opcode, at: usize, value: &Value) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(wrong_type(op, at, TypeTag::Int, other)),
    }
}

fn expect_bool(op: Opcode, at: usize, value: &Value) -> Result<bool, RuntimeError> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(wrong_type(op, at, TypeTag::Bool, other)),
    }
}

fn expect_str(op: Opcode, at: usize, value: &Value) -> Result<&str, RuntimeError> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(wrong_type(op, at, TypeTag::String, other)),
    }
}

fn wrong_type(op: Opcode, at: usize, expected: TypeTag, found: &Value) -> RuntimeError {
    RuntimeError::WrongType {
        at,
        opcode: op,
        expected,
        found: found.type_tag(),
    }
}

fn incompatible(op: Opcode, at: usize, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::IncompatibleTypes {
        at,
        opcode: op,
        left: left.type_tag(),
        right: right.type_tag(),
    }
}

/// Validate a character index against a string's scalar-value length.
fn char_index(at: usize, s: &str, index: i64) -> Result<usize, RuntimeError> {
    let length = s.chars().count();
    match usize::try_from(index) {
        Ok(i) if i < length => Ok(i),
        _ => Err(RuntimeError::IndexOutOfRange { at, index, length }),
    }
}

/// ADD, SUB, MUL, IDIV and their stack forms. Overflow wraps.
pub(crate) fn arithmetic(
    op: Opcode,
    at: usize,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    let a = expect_int(op, at, left)?;
    let b = expect_int(op, at, right)?;
    let result = match op {
        Opcode::Add | Opcode::Adds => a.wrapping_add(b),
        Opcode::Sub | Opcode::Subs => a.wrapping_sub(b),
        Opcode::Mul | Opcode::Muls => a.wrapping_mul(b),
        _ => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero { at });
            }
            a.wrapping_div(b)
        }
    };
    Ok(Value::Int(result))
}

/// LT, GT, EQ and their stack forms.
pub(crate) fn relational(
    op: Opcode,
    at: usize,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    let result = match op {
        Opcode::Eq | Opcode::Eqs => left.loose_eq(right),
        Opcode::Lt | Opcode::Lts => left.compare(right).map(|o| o == Ordering::Less),
        _ => left.compare(right).map(|o| o == Ordering::Greater),
    };
    result
        .map(Value::Bool)
        .ok_or_else(|| incompatible(op, at, left, right))
}

/// AND, OR and their stack forms.
pub(crate) fn logical(
    op: Opcode,
    at: usize,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    let a = expect_bool(op, at, left)?;
    let b = expect_bool(op, at, right)?;
    let result = match op {
        Opcode::And | Opcode::Ands => a && b,
        _ => a || b,
    };
    Ok(Value::Bool(result))
}

pub(crate) fn not(op: Opcode, at: usize, value: &Value) -> Result<Value, RuntimeError> {
    expect_bool(op, at, value).map(|b| Value::Bool(!b))
}

/// Equality test behind the conditional jumps.
pub(crate) fn jump_condition(
    op: Opcode,
    at: usize,
    left: &Value,
    right: &Value,
) -> Result<bool, RuntimeError> {
    let equal = left
        .loose_eq(right)
        .ok_or_else(|| incompatible(op, at, left, right))?;
    Ok(match op {
        Opcode::JumpIfEq | Opcode::JumpIfEqs => equal,
        _ => !equal,
    })
}

/// Integer code in 0..=255 to a one-character string.
pub(crate) fn int2char(op: Opcode, at: usize, value: &Value) -> Result<Value, RuntimeError> {
    let code = expect_int(op, at, value)?;
    u8::try_from(code)
        .map(|byte| Value::Str(char::from(byte).to_string()))
        .map_err(|_| RuntimeError::InvalidCharCode { at, code })
}

/// Code point of the character at `index`.
pub(crate) fn stri2int(
    op: Opcode,
    at: usize,
    string: &Value,
    index: &Value,
) -> Result<Value, RuntimeError> {
    let s = expect_str(op, at, string)?;
    let i = expect_int(op, at, index)?;
    let position = char_index(at, s, i)?;
    let c = s.chars().nth(position).unwrap_or_default();
    Ok(Value::Int(i64::from(u32::from(c))))
}

pub(crate) fn concat(
    op: Opcode,
    at: usize,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    let a = expect_str(op, at, left)?;
    let b = expect_str(op, at, right)?;
    Ok(Value::Str(format!("{a}{b}")))
}

pub(crate) fn strlen(op: Opcode, at: usize, value: &Value) -> Result<Value, RuntimeError> {
    let s = expect_str(op, at, value)?;
    Ok(Value::Int(s.chars().count() as i64))
}

/// One-character substring at `index`.
pub(crate) fn getchar(
    op: Opcode,
    at: usize,
    string: &Value,
    index: &Value,
) -> Result<Value, RuntimeError> {
    let s = expect_str(op, at, string)?;
    let i = expect_int(op, at, index)?;
    let position = char_index(at, s, i)?;
    Ok(Value::Str(s.chars().skip(position).take(1).collect()))
}

/// Copy of `target` with the character at `index` replaced by the first
/// character of `replacement`.
pub(crate) fn setchar(
    op: Opcode,
    at: usize,
    target: &Value,
    index: &Value,
    replacement: &Value,
) -> Result<Value, RuntimeError> {
    let s = expect_str(op, at, target)?;
    let i = expect_int(op, at, index)?;
    let position = char_index(at, s, i)?;
    let with = expect_str(op, at, replacement)?
        .chars()
        .next()
        .ok_or(RuntimeError::EmptyReplacement { at })?;
    let replaced: String = s
        .chars()
        .enumerate()
        .map(|(n, c)| if n == position { with } else { c })
        .collect();
    Ok(Value::Str(replaced))
}

/// Parse one input line as the requested type. Failures yield `nil`.
pub(crate) fn parse_input(line: Option<String>, tag: TypeTag) -> Value {
    let Some(line) = line else {
        return Value::Nil;
    };
    match tag {
        TypeTag::Int => line.trim().parse().map_or(Value::Nil, Value::Int),
        TypeTag::Bool => {
            let word = line.trim();
            if word.eq_ignore_ascii_case("true") {
                Value::Bool(true)
            } else if word.eq_ignore_ascii_case("false") {
                Value::Bool(false)
            } else {
                Value::Nil
            }
        }
        TypeTag::String => Value::Str(line),
        TypeTag::Nil => Value::Nil,
    }
}
