//! Cog instruction (PASM) disassembler.
//!
//! Decoding is a two-stage pipeline: [`LabelTable::resolve`] scans the whole
//! region so that jump, return and data targets are known before the first
//! line is rendered, then [`render::render`] walks the region again and
//! formats each word against that table. The table lives for one call only.

pub mod labels;
pub mod opcodes;
pub mod origin;
pub mod render;
pub mod word;

pub use labels::{Label, LabelTable};
pub use opcodes::{Category, COG_WORDS, CONDITIONS, OPCODES, SPR_BASE, SPR_NAMES};
pub use origin::{regions_len, OriginWalker, Region, Step};
pub use render::{render_line, DATA_TEXT, ILLEGAL_TEXT};
pub use word::InstructionWord;

use crate::Chunk;

/// Disassemble the DAT region starting at `offset` and described by `regions`.
///
/// The returned chunk lengths sum to [`regions_len`]`(regions)`.
pub fn disassemble(binary: &[u8], offset: usize, regions: &[Region]) -> Vec<Chunk> {
    let labels = LabelTable::resolve(binary, offset, regions);
    render::render(binary, offset, regions, &labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covered_len;

    #[test]
    fn mov_immediate_renders_with_data_label() {
        let binary = [0x07, 0x0A, 0xFC, 0xA0];
        let chunks = disassemble(&binary, 0, &[Region::Instructions(4)]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len, 4);
        assert_eq!(chunks[0].text, "000             mov        var005, #$007");
    }

    #[test]
    fn partial_word_is_illegal_code() {
        let binary = [0x07, 0x0A, 0xFC, 0xA0, 0x00, 0x00];
        let chunks = disassemble(&binary, 0, &[Region::Instructions(6)]);
        let lens: Vec<usize> = chunks.iter().map(|c| c.len).collect();
        assert_eq!(lens, vec![4, 2]);
        assert_eq!(chunks[1].text, ILLEGAL_TEXT);
    }

    #[test]
    fn offset_skips_leading_bytes() {
        let binary = [0xEE, 0xEE, 0x07, 0x0A, 0xFC, 0xA0];
        let chunks = disassemble(&binary, 2, &[Region::Instructions(4)]);
        assert!(chunks[0].text.ends_with("mov        var005, #$007"));
    }

    #[test]
    fn data_runs_are_single_chunks() {
        let binary = [0u8; 10];
        let regions = [Region::Data(6), Region::Instructions(4)];
        let chunks = disassemble(&binary, 0, &regions);
        assert_eq!(chunks[0], Chunk::new(6, DATA_TEXT));
        assert_eq!(covered_len(&chunks), regions_len(&regions));
    }
}
