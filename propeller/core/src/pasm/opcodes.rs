//! Static tables for the cog instruction set.

/// Number of long (word) registers addressable by a cog.
pub const COG_WORDS: usize = 512;

/// First word address of the special-purpose register block.
pub const SPR_BASE: usize = 0x1F0;

/// Names of the special-purpose registers at `SPR_BASE..COG_WORDS`.
pub const SPR_NAMES: [&str; 16] = [
    "par", "cnt", "ina", "inb", "outa", "outb", "dira", "dirb", "ctra", "ctrb", "frqa", "frqb",
    "phsa", "phsb", "vcfg", "vscl",
];

/// Condition mnemonics indexed by the 4-bit condition field. Index 15 is
/// "always" and renders as nothing.
pub const CONDITIONS: [&str; 16] = [
    "if_never",
    "if_a",
    "if_z_and_nc",
    "if_ae",
    "if_nz_and_c",
    "if_ne",
    "if_z_ne_c",
    "if_nz_or_nc",
    "if_z_and_c",
    "if_z_eq_c",
    "if_e",
    "if_z_or_nc",
    "if_b",
    "if_nz_or_c",
    "if_be",
    "",
];

/// How an opcode class is classified for labels and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Two mnemonics sharing one class, picked by the write-result flag.
    WritePair {
        no_write: &'static str,
        write: &'static str,
    },
    /// Writes its result by default; `nr` marks the exception.
    DefaultWrite(&'static str),
    /// Discards its result by default; `wr` marks the exception.
    DefaultNoWrite(&'static str),
    /// `jmp`/`call`/`ret`, distinguished by the write flag and labels.
    Jump,
    /// Decrement/test-and-branch family.
    Loop(&'static str),
    Other(&'static str),
}

use Category::*;

/// Opcode classes indexed by the 6-bit instruction field.
pub const OPCODES: [Category; 64] = [
    WritePair { no_write: "wrbyte", write: "rdbyte" },
    WritePair { no_write: "wrword", write: "rdword" },
    WritePair { no_write: "wrlong", write: "rdlong" },
    Other("hubop"),
    Other("IllgMul"),
    Other("IllgMuls"),
    Other("IllgEnc"),
    Other("IllgOnes"),
    DefaultWrite("ror"),
    DefaultWrite("rol"),
    DefaultWrite("shr"),
    DefaultWrite("shl"),
    DefaultWrite("rcr"),
    DefaultWrite("rcl"),
    DefaultWrite("sar"),
    DefaultWrite("rev"),
    DefaultWrite("mins"),
    DefaultWrite("maxs"),
    DefaultWrite("min"),
    DefaultWrite("max"),
    DefaultWrite("movs"),
    DefaultWrite("movd"),
    DefaultWrite("movi"),
    Jump,
    DefaultWrite("and"),
    DefaultWrite("andn"),
    DefaultWrite("or"),
    DefaultWrite("xor"),
    DefaultWrite("muxc"),
    DefaultWrite("muxnc"),
    DefaultWrite("muxz"),
    DefaultWrite("muxnz"),
    DefaultWrite("add"),
    WritePair { no_write: "cmp", write: "sub" },
    DefaultWrite("addabs"),
    DefaultWrite("subabs"),
    DefaultWrite("sumc"),
    DefaultWrite("sumnc"),
    DefaultWrite("sumz"),
    DefaultWrite("sumnz"),
    DefaultWrite("mov"),
    DefaultWrite("neg"),
    DefaultWrite("abs"),
    DefaultWrite("absneg"),
    DefaultWrite("negc"),
    DefaultWrite("negnc"),
    DefaultWrite("negz"),
    DefaultWrite("negnz"),
    DefaultNoWrite("cmps"),
    DefaultNoWrite("cmpsx"),
    DefaultWrite("addx"),
    DefaultWrite("subx"),
    DefaultWrite("adds"),
    DefaultWrite("subs"),
    DefaultWrite("addsx"),
    DefaultWrite("subsx"),
    DefaultWrite("cmpsub"),
    Loop("djnz"),
    Loop("tjnz"),
    Loop("tjz"),
    DefaultNoWrite("waitpeq"),
    DefaultNoWrite("waitpne"),
    DefaultWrite("waitcnt"),
    DefaultNoWrite("waitvid"),
];
