//! Label resolution: the first of the two instruction passes.

use super::opcodes::{Category, COG_WORDS, SPR_BASE, SPR_NAMES};
use super::origin::{OriginWalker, Region, Step};
use super::word::InstructionWord;

/// How a single cog address is referenced and what it is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    pub jump: bool,
    pub ret: bool,
    pub data: bool,
    /// Name used when an operand refers to this address.
    pub name: String,
    /// Inline label shown on the line at this address; empty when unreferenced.
    pub display: String,
}

/// Per-invocation label table, one slot per cog word.
#[derive(Debug, Clone)]
pub struct LabelTable {
    slots: [Label; COG_WORDS],
}

impl LabelTable {
    /// Scan every instruction described by `regions` and name the addresses
    /// they reference.
    pub fn resolve(binary: &[u8], offset: usize, regions: &[Region]) -> Self {
        let mut table = Self {
            slots: std::array::from_fn(|_| Label::default()),
        };
        for step in OriginWalker::new(binary, offset, regions) {
            if let Step::Word { word, .. } = step {
                table.mark(word);
            }
        }
        table.assign_names();
        table
    }

    fn mark(&mut self, word: InstructionWord) {
        let (dst, src) = (word.dst(), word.src());
        match word.category() {
            Category::Jump => {
                if word.writes_result() {
                    self.slots[dst].ret = true;
                }
                if word.immediate() {
                    self.slots[src].jump = true;
                }
            }
            Category::Loop(_) => {
                if word.writes_result() {
                    self.slots[dst].data = true;
                }
                if word.immediate() {
                    self.slots[src].jump = true;
                }
            }
            _ => {
                self.slots[dst].data = true;
                if !word.immediate() {
                    self.slots[src].data = true;
                }
            }
        }
    }

    fn assign_names(&mut self) {
        for (addr, label) in self.slots.iter_mut().enumerate() {
            if label.jump {
                label.name = format!("lbl{addr:03x}");
                label.display = label.name.clone();
            } else if label.data {
                label.name = format!("var{addr:03x}");
                label.display = label.name.clone();
            } else {
                label.name = format!("${addr:03x}");
            }
        }
        for (label, spr) in self.slots[SPR_BASE..].iter_mut().zip(SPR_NAMES) {
            label.name = spr.to_string();
            label.display = spr.to_string();
        }
    }

    pub fn get(&self, addr: usize) -> &Label {
        &self.slots[addr & (COG_WORDS - 1)]
    }

    pub fn name(&self, addr: usize) -> &str {
        &self.get(addr).name
    }

    pub fn display(&self, addr: usize) -> &str {
        &self.get(addr).display
    }

    pub fn is_return_target(&self, addr: usize) -> bool {
        self.get(addr).ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(opcode: u32, write: bool, imm: bool, dst: u32, src: u32) -> [u8; 4] {
        let word = (opcode << 26)
            | ((write as u32) << 23)
            | ((imm as u32) << 22)
            | (0xF << 18)
            | (dst << 9)
            | src;
        word.to_le_bytes()
    }

    fn table_for(words: &[[u8; 4]]) -> LabelTable {
        let binary: Vec<u8> = words.concat();
        LabelTable::resolve(&binary, 0, &[Region::Instructions(binary.len())])
    }

    #[test]
    fn data_operands_get_var_names() {
        let table = table_for(&[encode(40, true, false, 5, 6)]);
        assert!(table.get(5).data && table.get(6).data);
        assert_eq!(table.name(5), "var005");
        assert_eq!(table.display(6), "var006");
    }

    #[test]
    fn immediate_sources_are_not_labelled() {
        let table = table_for(&[encode(40, true, true, 5, 7)]);
        assert!(!table.get(7).data);
        assert_eq!(table.name(7), "$007");
        assert_eq!(table.display(7), "");
    }

    #[test]
    fn call_marks_return_and_jump_targets() {
        let table = table_for(&[encode(0x17, true, true, 0x20, 0x10)]);
        assert!(table.is_return_target(0x20));
        assert!(table.get(0x10).jump);
        assert_eq!(table.name(0x10), "lbl010");
        // A return slot alone is not a data or jump target.
        assert_eq!(table.display(0x20), "");
    }

    #[test]
    fn loop_without_write_leaves_destination_alone() {
        let table = table_for(&[encode(0x3A, false, true, 3, 0)]);
        assert!(!table.get(3).data);
        assert!(table.get(0).jump);
    }

    #[test]
    fn jump_names_win_over_data_names() {
        let table = table_for(&[
            encode(40, true, false, 8, 9),
            encode(0x17, false, true, 0, 8),
        ]);
        assert!(table.get(8).data && table.get(8).jump);
        assert_eq!(table.name(8), "lbl008");
    }

    #[test]
    fn special_registers_always_use_fixed_names() {
        let table = table_for(&[
            encode(40, true, false, 0x1F4, 0x1F2),
            encode(0x17, false, true, 0, 0x1F0),
        ]);
        assert_eq!(table.name(0x1F4), "outa");
        assert_eq!(table.name(0x1F2), "ina");
        assert_eq!(table.name(0x1F0), "par");
        for (idx, spr) in SPR_NAMES.iter().enumerate() {
            assert_eq!(table.display(SPR_BASE + idx), *spr);
        }
    }
}
