//! Render pass: turns each walked step into a chunk of listing text.

use super::labels::LabelTable;
use super::opcodes::Category;
use super::origin::{OriginWalker, Region, Step};
use super::word::InstructionWord;
use crate::Chunk;

pub const DATA_TEXT: &str = "Data";
pub const ILLEGAL_TEXT: &str = "Illegal Code";

const MNEMONIC_WIDTH: usize = 10;
const LABEL_WIDTH: usize = 8;

pub fn render(binary: &[u8], offset: usize, regions: &[Region], labels: &LabelTable) -> Vec<Chunk> {
    OriginWalker::new(binary, offset, regions)
        .map(|step| {
            let text = match step {
                Step::Data { .. } => DATA_TEXT.to_string(),
                Step::Illegal { .. } => ILLEGAL_TEXT.to_string(),
                Step::Word { addr, word } => render_line(word, addr, labels),
            };
            Chunk::new(step.byte_len(), text)
        })
        .collect()
}

/// Format one instruction located at cog word `addr`.
///
/// The condition field is decoded by [`InstructionWord::condition`] but is
/// not part of the line.
pub fn render_line(word: InstructionWord, addr: usize, labels: &LabelTable) -> String {
    let mut line = format!(
        "{addr:03x}   {label:<LABEL_WIDTH$}  {asm}",
        label = labels.display(addr),
        asm = render_asm(word, addr, labels),
    );
    if word.carry_flag() {
        line.push_str(" wc");
    }
    if word.zero_flag() {
        line.push_str(" wz");
    }
    line.trim_end().to_string()
}

fn render_asm(word: InstructionWord, addr: usize, labels: &LabelTable) -> String {
    let dst = labels.name(word.dst());
    let wr = word.writes_result();
    match word.category() {
        Category::WritePair { no_write, write } => {
            let mnemonic = if wr { write } else { no_write };
            format!("{mnemonic:<MNEMONIC_WIDTH$} {dst}, {}", source(word, labels))
        }
        Category::DefaultWrite(mnemonic) => format!(
            "{mnemonic:<MNEMONIC_WIDTH$} {dst}, {}{}",
            source(word, labels),
            if wr { "" } else { " nr" }
        ),
        Category::DefaultNoWrite(mnemonic) => format!(
            "{mnemonic:<MNEMONIC_WIDTH$} {dst}, {}{}",
            source(word, labels),
            if wr { " wr" } else { "" }
        ),
        Category::Jump => {
            if wr {
                format!("{:<MNEMONIC_WIDTH$} {}", "call", branch_target(word, labels))
            } else if labels.is_return_target(addr) {
                "ret".to_string()
            } else {
                format!("{:<MNEMONIC_WIDTH$} {}", "jmp", branch_target(word, labels))
            }
        }
        Category::Loop(mnemonic) => format!(
            "{mnemonic:<MNEMONIC_WIDTH$} {dst}, {}{}",
            branch_target(word, labels),
            write_suffix(wr)
        ),
        Category::Other(mnemonic) => format!(
            "{mnemonic:<MNEMONIC_WIDTH$} {dst}, {}{}",
            source(word, labels),
            write_suffix(wr)
        ),
    }
}

fn write_suffix(wr: bool) -> &'static str {
    if wr {
        " wr"
    } else {
        " nr"
    }
}

fn source(word: InstructionWord, labels: &LabelTable) -> String {
    if word.immediate() {
        format!("#${:03x}", word.src())
    } else {
        labels.name(word.src()).to_string()
    }
}

fn branch_target(word: InstructionWord, labels: &LabelTable) -> String {
    if word.immediate() {
        format!("#{}", labels.name(word.src()))
    } else {
        labels.name(word.src()).to_string()
    }
}
