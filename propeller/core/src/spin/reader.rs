use thiserror::Error;

/// The one way a bytecode scan can fail: an operand lies beyond the method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("read past end of method at +{pos}")]
pub struct Truncated {
    pub pos: usize,
}

/// Cursor over `size` bytes of a method starting at `offset` in the image.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    binary: &'a [u8],
    offset: usize,
    size: usize,
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(binary: &'a [u8], offset: usize, size: usize) -> Self {
        Self {
            binary,
            offset,
            size,
            pos: 0,
        }
    }

    /// Bytes consumed so far, relative to the method start.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.size
    }

    pub fn read(&mut self) -> Result<u8, Truncated> {
        if self.pos >= self.size {
            return Err(Truncated { pos: self.pos });
        }
        let byte = self
            .offset
            .checked_add(self.pos)
            .and_then(|index| self.binary.get(index))
            .copied()
            .ok_or(Truncated { pos: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    /// One byte below 0x80, otherwise a 15-bit big-endian value across two
    /// bytes. The value is returned raw; no sign is applied.
    pub fn read_varlen(&mut self) -> Result<u32, Truncated> {
        let first = self.read()?;
        if first & 0x80 == 0 {
            return Ok(first as u32);
        }
        let second = self.read()?;
        Ok(((first as u32 & 0x7F) << 8) | second as u32)
    }

    /// `count` bytes accumulated big-endian.
    pub fn read_be(&mut self, count: u8) -> Result<u32, Truncated> {
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 8) | self.read()? as u32;
        }
        Ok(value)
    }
}
