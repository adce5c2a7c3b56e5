//! Decoders for the fixed-layout segments of an object: header, method and
//! object tables, and the string pool. Bytes outside the image read as zero.

use crate::Chunk;

pub const INVALID_HEADER_TEXT: &str = "Invalid Object Header Entry";
pub const INVALID_ENTRY_TEXT: &str = "Invalid Entry";

const TABLE_ENTRY_LEN: usize = 4;

fn byte_at(binary: &[u8], at: usize) -> u8 {
    binary.get(at).copied().unwrap_or(0)
}

fn le16(binary: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([byte_at(binary, at), byte_at(binary, at + 1)])
}

fn quoted_name(names: &[String], idx: usize) -> String {
    names
        .get(idx)
        .map(|name| format!("\"{name}\""))
        .unwrap_or_else(|| "-unknown-".to_string())
}

/// The four-byte object header: object size, method count + 1, child count.
pub fn object_header(binary: &[u8], offset: usize, len: usize) -> Vec<Chunk> {
    if len != 4 {
        return vec![Chunk::new(len, INVALID_HEADER_TEXT)];
    }
    vec![
        Chunk::new(2, format!("Object Size: {}", le16(binary, offset))),
        Chunk::new(
            1,
            format!("Functions: {}", byte_at(binary, offset + 2) as i32 - 1),
        ),
        Chunk::new(1, format!("Child Objects: {}", byte_at(binary, offset + 3))),
    ]
}

/// Split a table into four-byte entries, formatting each with `entry`.
fn table(
    offset: usize,
    len: usize,
    mut entry: impl FnMut(usize, usize) -> String,
) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(len / TABLE_ENTRY_LEN + 1);
    let mut at = offset;
    let mut left = len;
    let mut idx = 0;
    while left > 0 {
        if left < TABLE_ENTRY_LEN {
            chunks.push(Chunk::new(left, INVALID_ENTRY_TEXT));
            break;
        }
        chunks.push(Chunk::new(TABLE_ENTRY_LEN, entry(idx, at)));
        at += TABLE_ENTRY_LEN;
        left -= TABLE_ENTRY_LEN;
        idx += 1;
    }
    chunks
}

/// Method table entries: entry point relative to the object, local size.
pub fn method_table(
    binary: &[u8],
    offset: usize,
    len: usize,
    object_base: usize,
    names: &[String],
) -> Vec<Chunk> {
    table(offset, len, |idx, at| {
        let entry = (object_base + le16(binary, at) as usize) & 0xFFFF;
        format!(
            "Method {} Entrypoint: 0x{entry:04X}, Locals: {}",
            quoted_name(names, idx),
            le16(binary, at + 2)
        )
    })
}

/// Child object table entries: object offset, variable section offset.
pub fn object_table(
    binary: &[u8],
    offset: usize,
    len: usize,
    object_base: usize,
    names: &[String],
) -> Vec<Chunk> {
    table(offset, len, |idx, at| {
        let entry = (object_base + le16(binary, at) as usize) & 0xFFFF;
        format!(
            "Object {} Entrypoint: 0x{entry:04X}, Var Section Offset: {:04X}",
            quoted_name(names, idx),
            le16(binary, at + 2)
        )
    })
}

/// NUL-terminated strings; an unterminated tail is reported as such.
pub fn string_pool(binary: &[u8], offset: usize, len: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < len {
        let start = pos;
        let mut text = String::new();
        let mut terminated = false;
        while pos < len {
            let ch = byte_at(binary, offset + pos);
            pos += 1;
            if ch == 0 {
                terminated = true;
                break;
            }
            text.push(char::from(ch));
        }
        let line = if terminated {
            format!("String \"{text}\"")
        } else {
            format!("String (missing terminating char) \"{text}\"")
        };
        chunks.push(Chunk::new(pos - start, line));
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covered_len;

    #[test]
    fn header_fields() {
        let binary = [0x34, 0x12, 0x03, 0x01];
        let chunks = object_header(&binary, 0, 4);
        assert_eq!(chunks[0], Chunk::new(2, "Object Size: 4660"));
        assert_eq!(chunks[1], Chunk::new(1, "Functions: 2"));
        assert_eq!(chunks[2], Chunk::new(1, "Child Objects: 1"));
    }

    #[test]
    fn header_must_be_four_bytes() {
        let chunks = object_header(&[0; 6], 0, 6);
        assert_eq!(chunks, vec![Chunk::new(6, INVALID_HEADER_TEXT)]);
    }

    #[test]
    fn method_entries_are_relative_to_object_base() {
        let binary = [0x10, 0x00, 0x04, 0x00, 0x20, 0x00, 0x00, 0x00, 0xAA];
        let names = vec!["start".to_string()];
        let chunks = method_table(&binary, 0, 9, 0x100, &names);
        assert_eq!(chunks[0].text, "Method \"start\" Entrypoint: 0x0110, Locals: 4");
        assert_eq!(chunks[1].text, "Method -unknown- Entrypoint: 0x0120, Locals: 0");
        assert_eq!(chunks[2], Chunk::new(1, INVALID_ENTRY_TEXT));
        assert_eq!(covered_len(&chunks), 9);
    }

    #[test]
    fn object_entries_show_var_offset_in_hex() {
        let binary = [0x08, 0x00, 0x1C, 0x00];
        let names = vec!["serial".to_string()];
        let chunks = object_table(&binary, 0, 4, 0, &names);
        assert_eq!(
            chunks[0].text,
            "Object \"serial\" Entrypoint: 0x0008, Var Section Offset: 001C"
        );
    }

    #[test]
    fn strings_split_on_nul() {
        let binary = b"hi\0there\0ab";
        let chunks = string_pool(binary, 0, binary.len());
        assert_eq!(chunks[0], Chunk::new(3, "String \"hi\""));
        assert_eq!(chunks[1], Chunk::new(6, "String \"there\""));
        assert_eq!(
            chunks[2],
            Chunk::new(2, "String (missing terminating char) \"ab\"")
        );
    }
}
