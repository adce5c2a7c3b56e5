//! Spin bytecode disassembler.
//!
//! A method is scanned forward once. Opcode bytes fall into four bands:
//! lower (`0x00..0x40`, table driven), variable (`0x40..0x80`), memory
//! (`0x80..0xE0`) and math (`0xE0..=0xFF`). The scan stops at the first
//! operand that would lie past the method; the bytes from the start of that
//! opcode to the end are reported as one undecodable chunk.

pub mod op;
pub mod opcodes;
pub mod reader;

pub use op::{decode_op, Action, Base, Operand, Size, SpinOp, Storage};
pub use opcodes::{LowerOp, Shape, LOWER_OPCODES, MATH_OPS};
pub use reader::{ByteReader, Truncated};

use crate::{debug_enabled, Chunk};

pub const HEADER_PREFIX: &str = "Spin Method: ";
pub const UNDECODABLE_TEXT: &str = "unable to decode";

/// Disassemble the `size` bytes of method `name` starting at `offset`.
///
/// The first chunk is always a zero-length header.
pub fn disassemble(binary: &[u8], offset: usize, size: usize, name: &str) -> Vec<Chunk> {
    let mut chunks = vec![Chunk::new(0, format!("{HEADER_PREFIX}{name}"))];
    let mut reader = ByteReader::new(binary, offset, size);
    while !reader.is_at_end() {
        let start = reader.pos();
        match decode_op(&mut reader) {
            Ok(op) => chunks.push(Chunk::new(reader.pos() - start, op.to_string())),
            Err(err) => {
                if debug_enabled() {
                    eprintln!(
                        "[propdis-spin] method={name} offset=0x{offset:04X} opcode_at=+{start} {err}"
                    );
                }
                chunks.push(Chunk::new(size - start, UNDECODABLE_TEXT));
                break;
            }
        }
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covered_len;

    #[test]
    fn header_comes_first() {
        let chunks = disassemble(&[0x35], 0, 1, "main");
        assert_eq!(chunks[0], Chunk::new(0, "Spin Method: main"));
        assert_eq!(chunks[1], Chunk::new(1, "push 0"));
    }

    #[test]
    fn empty_method_is_only_a_header() {
        let chunks = disassemble(&[], 0, 0, "empty");
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn abort_discards_partial_opcode() {
        // push 1, then a call missing its operand
        let chunks = disassemble(&[0x36, 0x05], 0, 2, "m");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2], Chunk::new(1, UNDECODABLE_TEXT));
        assert_eq!(covered_len(&chunks), 2);
    }

    #[test]
    fn declared_size_bounds_the_scan() {
        // The operand exists in the buffer but lies past the method.
        let chunks = disassemble(&[0x05, 0x01], 0, 1, "m");
        assert_eq!(chunks[1], Chunk::new(1, UNDECODABLE_TEXT));
    }
}
