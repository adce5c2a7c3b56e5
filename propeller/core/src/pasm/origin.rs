//! Region descriptors and the cog origin tracker.
//!
//! A DAT section is described by an ordered list of [`Region`]s. Walking that
//! list yields the byte cursor into the image and the cog address each
//! instruction will occupy once loaded. Both the label pass and the render
//! pass consume the same [`OriginWalker`] so they agree on every address.

use super::opcodes::COG_WORDS;
use super::word::InstructionWord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    /// Literal data bytes.
    Data(usize),
    /// Instruction bytes, decoded four at a time.
    Instructions(usize),
    /// Jump the cog origin to a byte address (`org`).
    SetOrigin(u32),
    /// Freeze (`true`) or resume (`false`) origin tracking (`orgx`).
    SuspendOrigin(bool),
}

impl Region {
    /// Build a descriptor from the compiler's `[kind, value]` encoding.
    pub fn from_pair(kind: u64, value: u64) -> Option<Self> {
        match kind {
            0 => Some(Region::Data(value as usize)),
            1 => Some(Region::Instructions(value as usize)),
            2 => Some(Region::SetOrigin(value as u32)),
            3 => Some(Region::SuspendOrigin(value == 1)),
            _ => None,
        }
    }

    /// Bytes of the image this descriptor covers.
    pub fn byte_len(&self) -> usize {
        match self {
            Region::Data(len) | Region::Instructions(len) => *len,
            Region::SetOrigin(_) | Region::SuspendOrigin(_) => 0,
        }
    }
}

/// Total bytes covered by a descriptor list.
pub fn regions_len(regions: &[Region]) -> usize {
    regions
        .iter()
        .fold(0usize, |total, region| total.saturating_add(region.byte_len()))
}

/// One unit produced while walking the descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Data { len: usize },
    Word { addr: usize, word: InstructionWord },
    /// Instruction bytes that do not form a whole word: the tail of a block,
    /// or a word the buffer does not hold.
    Illegal { len: usize },
}

impl Step {
    pub fn byte_len(&self) -> usize {
        match self {
            Step::Data { len } | Step::Illegal { len } => *len,
            Step::Word { .. } => 4,
        }
    }
}

pub struct OriginWalker<'a> {
    binary: &'a [u8],
    regions: std::slice::Iter<'a, Region>,
    cursor: usize,
    origin: u32,
    suspended: bool,
    block_left: usize,
}

impl<'a> OriginWalker<'a> {
    pub fn new(binary: &'a [u8], offset: usize, regions: &'a [Region]) -> Self {
        Self {
            binary,
            regions: regions.iter(),
            cursor: offset,
            origin: 0,
            suspended: false,
            block_left: 0,
        }
    }

    /// Word address of the current origin, folded into cog memory.
    pub fn word_addr(&self) -> usize {
        (self.origin >> 2) as usize & (COG_WORDS - 1)
    }

    fn advance(&mut self, len: usize) {
        self.cursor = self.cursor.saturating_add(len);
        if !self.suspended {
            self.origin = self.origin.wrapping_add(len as u32);
        }
    }

    fn next_word(&mut self) -> Step {
        if self.block_left < 4 {
            let len = self.block_left;
            self.block_left = 0;
            self.advance(len);
            return Step::Illegal { len };
        }
        self.block_left -= 4;
        let addr = self.word_addr();
        let word = self
            .binary
            .get(self.cursor..)
            .and_then(InstructionWord::from_le_slice);
        self.advance(4);
        match word {
            Some(word) => Step::Word { addr, word },
            None => Step::Illegal { len: 4 },
        }
    }
}

impl Iterator for OriginWalker<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        loop {
            if self.block_left > 0 {
                return Some(self.next_word());
            }
            match *self.regions.next()? {
                Region::Data(len) => {
                    self.advance(len);
                    return Some(Step::Data { len });
                }
                Region::Instructions(len) => self.block_left = len,
                Region::SetOrigin(addr) => self.origin = addr,
                Region::SuspendOrigin(suspended) => self.suspended = suspended,
            }
        }
    }
}
