//! Plain-text listing: offset, raw bytes and the decoded text of each chunk.

use crate::Chunk;
use std::io::{self, Write};

pub const BYTES_PER_LINE: usize = 16;

/// Width of a full line of grouped hex bytes (`8 * 4` digits, 3 spaces).
const HEX_WIDTH: usize = BYTES_PER_LINE * 2 + BYTES_PER_LINE / 4 - 1;

fn hex_bytes(binary: &[u8], offset: usize, len: usize) -> String {
    let mut hex = String::with_capacity(HEX_WIDTH);
    for i in 0..len {
        if i > 0 && i % 4 == 0 {
            hex.push(' ');
        }
        match binary.get(offset + i) {
            Some(byte) => hex.push_str(&format!("{byte:02X}")),
            None => hex.push_str("??"),
        }
    }
    hex
}

/// Lines for `chunks` laid out from byte `offset` of `binary`.
///
/// Chunks longer than [`BYTES_PER_LINE`] continue on lines with no text.
pub fn listing_lines(binary: &[u8], offset: usize, chunks: &[Chunk]) -> Vec<String> {
    let mut lines = Vec::with_capacity(chunks.len());
    let mut at = offset;
    for chunk in chunks {
        let mut left = chunk.len;
        let mut text = chunk.text.as_str();
        loop {
            let line_len = left.min(BYTES_PER_LINE);
            let line = format!(
                "0x{at:04X}  {hex:<HEX_WIDTH$}  {text}",
                hex = hex_bytes(binary, at, line_len)
            );
            lines.push(line.trim_end().to_string());
            at += line_len;
            left -= line_len;
            text = "";
            if left == 0 {
                break;
            }
        }
    }
    lines
}

pub fn write_listing<W: Write>(
    out: &mut W,
    binary: &[u8],
    offset: usize,
    chunks: &[Chunk],
) -> io::Result<()> {
    for line in listing_lines(binary, offset, chunks) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_chunks_have_no_bytes() {
        let lines = listing_lines(&[], 0x10, &[Chunk::new(0, "Spin Method: main")]);
        assert_eq!(lines, vec![format!("0x0010  {:HEX_WIDTH$}  Spin Method: main", "")]);
    }

    #[test]
    fn bytes_are_grouped_by_four() {
        let binary = [0x07, 0x0A, 0xFC, 0xA0, 0x01];
        let lines = listing_lines(&binary, 0, &[Chunk::new(5, "x")]);
        assert!(lines[0].starts_with("0x0000  070AFCA0 01 "));
        assert!(lines[0].ends_with("  x"));
    }

    #[test]
    fn long_chunks_wrap_without_repeating_text() {
        let binary = [0u8; 20];
        let lines = listing_lines(&binary, 0, &[Chunk::new(20, "Data"), Chunk::new(0, "end")]);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Data"));
        assert_eq!(lines[1], "0x0010  00000000");
        assert!(lines[2].starts_with("0x0014"));
    }

    #[test]
    fn missing_bytes_show_as_question_marks() {
        let lines = listing_lines(&[0xAB], 0, &[Chunk::new(2, "Illegal Code")]);
        assert!(lines[0].starts_with("0x0000  AB??"));
    }

    #[test]
    fn writes_one_line_per_entry() {
        let mut out = Vec::new();
        write_listing(&mut out, &[0x35], 0, &[Chunk::new(1, "push 0")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
