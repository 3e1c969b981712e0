//! Operand decoding: raw `type` attribute + text to a canonical [`Operand`].

use crate::error::LoadError;
use crate::escape::decode_escapes;
use triad_common::{Opcode, Operand, RawArgument, Slot, TypeTag, Value, Variable};

/// Decode one argument element for the given signature slot.
///
/// `index` is the 1-based operand number, used only for error reporting.
pub(crate) fn decode_operand(
    arg: &RawArgument,
    slot: Slot,
    opcode: Opcode,
    index: usize,
    order: u64,
) -> Result<Operand, LoadError> {
    let kind = arg
        .kind
        .as_deref()
        .ok_or_else(|| LoadError::MissingOperandKind {
            order,
            tag: arg.tag.clone(),
        })?;
    let text = arg
        .text
        .trim_matches(|c: char| c.is_ascii_whitespace() || c == '\0' || c == '\x0B');

    let fits = match kind {
        "var" => matches!(slot, Slot::Var | Slot::Symb),
        "int" | "bool" | "string" | "nil" => slot == Slot::Symb,
        "label" => slot == Slot::Label,
        "type" => slot == Slot::Type,
        other => {
            return Err(LoadError::UnknownOperandKind {
                order,
                kind: other.to_string(),
            })
        }
    };
    if !fits {
        return Err(LoadError::OperandKindMismatch {
            order,
            opcode,
            index,
            kind: kind.to_string(),
        });
    }

    match kind {
        "var" => Variable::parse(text)
            .map(Operand::Var)
            .ok_or_else(|| LoadError::InvalidVariable {
                order,
                text: text.to_string(),
            }),
        "int" => parse_int(text, order).map(|n| Operand::Const(Value::Int(n))),
        "bool" => match text {
            "true" => Ok(Operand::Const(Value::Bool(true))),
            "false" => Ok(Operand::Const(Value::Bool(false))),
            _ => Err(LoadError::InvalidBool {
                order,
                text: text.to_string(),
            }),
        },
        "string" => Ok(Operand::Const(Value::Str(decode_escapes(text)))),
        "nil" if text == "nil" => Ok(Operand::Const(Value::Nil)),
        "nil" => Err(LoadError::InvalidNil {
            order,
            text: text.to_string(),
        }),
        "label" if text.is_empty() => Err(LoadError::EmptyLabel { order }),
        "label" => Ok(Operand::Label(text.to_string())),
        _ => TypeTag::from_name(text)
            .filter(TypeTag::is_readable)
            .map(Operand::Type)
            .ok_or_else(|| LoadError::InvalidTypeName {
                order,
                text: text.to_string(),
            }),
    }
}

/// Integer literal: optional sign followed by decimal digits. Empty text
/// is accepted and means zero.
fn parse_int(text: &str, order: u64) -> Result<i64, LoadError> {
    if text.is_empty() {
        return Ok(0);
    }
    text.parse::<i64>().map_err(|_| LoadError::InvalidInt {
        order,
        text: text.to_string(),
    })
}
