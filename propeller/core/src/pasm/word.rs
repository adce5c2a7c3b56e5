use super::opcodes::{Category, CONDITIONS, OPCODES};

/// One 32-bit cog instruction, stored little-endian in the image.
///
/// Layout, most significant bit first:
/// `iiiiii zcri cccc ddddddddd sssssssss`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionWord(pub u32);

impl InstructionWord {
    /// Read a word from the first four bytes of `bytes`.
    pub fn from_le_slice(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
        Some(Self(u32::from_le_bytes(raw)))
    }

    pub fn opcode(self) -> usize {
        ((self.0 >> 26) & 0x3F) as usize
    }

    pub fn category(self) -> Category {
        OPCODES[self.opcode()]
    }

    pub fn zero_flag(self) -> bool {
        (self.0 >> 25) & 1 == 1
    }

    pub fn carry_flag(self) -> bool {
        (self.0 >> 24) & 1 == 1
    }

    /// `r` bit: the result is written back to the destination register.
    pub fn writes_result(self) -> bool {
        (self.0 >> 23) & 1 == 1
    }

    /// `i` bit: the source field is a literal rather than a register.
    pub fn immediate(self) -> bool {
        (self.0 >> 22) & 1 == 1
    }

    pub fn condition_code(self) -> usize {
        ((self.0 >> 18) & 0xF) as usize
    }

    /// Condition mnemonic; empty for "always".
    pub fn condition(self) -> &'static str {
        CONDITIONS[self.condition_code()]
    }

    pub fn dst(self) -> usize {
        ((self.0 >> 9) & 0x1FF) as usize
    }

    pub fn src(self) -> usize {
        (self.0 & 0x1FF) as usize
    }
}
