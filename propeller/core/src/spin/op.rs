//! Typed form of one decoded Spin opcode.

use super::opcodes::{Shape, LOWER_END, LOWER_OPCODES, MATH_OPS, MEMORY_END, VARIABLE_END};
use super::reader::{ByteReader, Truncated};
use std::fmt;

/// What a variable or memory opcode does with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
    Reference,
    /// Compound assignment; carries the effect byte.
    Assign(u8),
}

impl Action {
    fn decode(opcode: u8, reader: &mut ByteReader<'_>) -> Result<Self, Truncated> {
        Ok(match opcode & 0x3 {
            0 => Action::Read,
            1 => Action::Write,
            2 => Action::Reference,
            _ => Action::Assign(reader.read()?),
        })
    }

    fn prefix(self) -> &'static str {
        match self {
            Action::Read => "rd",
            Action::Write => "wr",
            Action::Reference => "ref",
            Action::Assign(_) => "assign",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Method-local variable.
    Local,
    /// Interpreter stack slot.
    Stack,
}

/// Base address a memory opcode is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    /// Address popped from the stack; takes no offset.
    Caller,
    Object,
    Variable,
    Stack,
}

impl Base {
    fn name(self) -> &'static str {
        match self {
            Base::Caller => "popbase",
            Base::Object => "objbase",
            Base::Variable => "varbase",
            Base::Stack => "stackbase",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Byte,
    Word,
    Long,
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Size::Byte => "byte",
            Size::Word => "word",
            Size::Long => "long",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Value(u32),
    /// Object index and method index of an object call.
    Pair(u8, u8),
    Effect(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinOp {
    Lower {
        opcode: u8,
        mnemonic: &'static str,
        operand: Operand,
    },
    Variable {
        action: Action,
        storage: Storage,
        index: u8,
    },
    Memory {
        action: Action,
        size: Size,
        base: Base,
        offset: Option<u32>,
        indexed: bool,
    },
    Math(&'static str),
}

/// Decode one opcode and its operands at the reader's position.
///
/// On `Err` the reader has consumed part of the opcode; callers restart from
/// the position they saved before the call.
pub fn decode_op(reader: &mut ByteReader<'_>) -> Result<SpinOp, Truncated> {
    let opcode = reader.read()?;
    if opcode < LOWER_END {
        decode_lower(opcode, reader)
    } else if opcode < VARIABLE_END {
        decode_variable(opcode, reader)
    } else if opcode < MEMORY_END {
        decode_memory(opcode, reader)
    } else {
        Ok(SpinOp::Math(MATH_OPS[(opcode - MEMORY_END) as usize]))
    }
}

fn decode_lower(opcode: u8, reader: &mut ByteReader<'_>) -> Result<SpinOp, Truncated> {
    let entry = LOWER_OPCODES[opcode as usize];
    let operand = match entry.shape {
        Shape::None => Operand::None,
        Shape::Signed => Operand::Value(reader.read_varlen()?),
        Shape::Byte | Shape::PushMask | Shape::Register => Operand::Value(reader.read()? as u32),
        Shape::Object => {
            let object = reader.read()?;
            Operand::Pair(object, reader.read()?)
        }
        Shape::Effect => Operand::Effect(reader.read()?),
        Shape::PushBytes(count) => Operand::Value(reader.read_be(count)?),
    };
    Ok(SpinOp::Lower {
        opcode,
        mnemonic: entry.mnemonic,
        operand,
    })
}

fn decode_variable(opcode: u8, reader: &mut ByteReader<'_>) -> Result<SpinOp, Truncated> {
    let storage = if opcode & 0x20 != 0 {
        Storage::Stack
    } else {
        Storage::Local
    };
    Ok(SpinOp::Variable {
        action: Action::decode(opcode, reader)?,
        storage,
        index: (opcode >> 2) & 0x7,
    })
}

fn decode_memory(opcode: u8, reader: &mut ByteReader<'_>) -> Result<SpinOp, Truncated> {
    let base = match (opcode >> 2) & 0x3 {
        0 => Base::Caller,
        1 => Base::Object,
        2 => Base::Variable,
        _ => Base::Stack,
    };
    let size = match (opcode >> 5) & 0x3 {
        0 => Size::Byte,
        1 => Size::Word,
        _ => Size::Long,
    };
    let offset = match base {
        Base::Caller => None,
        _ => Some(reader.read_varlen()?),
    };
    Ok(SpinOp::Memory {
        action: Action::decode(opcode, reader)?,
        size,
        base,
        offset,
        indexed: opcode & 0x10 != 0,
    })
}

fn write_action(f: &mut fmt::Formatter<'_>, action: Action, target: fmt::Arguments<'_>) -> fmt::Result {
    write!(f, "{} {target}", action.prefix())?;
    if let Action::Assign(effect) = action {
        write!(f, " effect({effect})")?;
    }
    Ok(())
}

impl fmt::Display for SpinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SpinOp::Lower {
                mnemonic, operand, ..
            } => match operand {
                Operand::None => f.write_str(mnemonic),
                Operand::Value(value) => write!(f, "{mnemonic} {value}"),
                Operand::Pair(object, method) => write!(f, "{mnemonic} {object} {method}"),
                Operand::Effect(effect) => write!(f, "{mnemonic} effect({effect})"),
            },
            SpinOp::Variable {
                action,
                storage,
                index,
            } => {
                let kind = match storage {
                    Storage::Local => "var",
                    Storage::Stack => "stack",
                };
                write_action(f, action, format_args!("{kind}[{index}]"))
            }
            SpinOp::Memory {
                action,
                size,
                base,
                offset,
                indexed,
            } => {
                let mut target = format!("{size} {}", base.name());
                if let Some(offset) = offset {
                    target.push_str(&format!("+{offset}"));
                }
                if indexed {
                    target.push_str("+popidx");
                }
                write_action(f, action, format_args!("{target}"))
            }
            SpinOp::Math(name) => f.write_str(name),
        }
    }
}
