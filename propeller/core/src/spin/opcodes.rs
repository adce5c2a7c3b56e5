//! Spin interpreter opcode tables.

/// Operand bytes that follow a lower-band opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    None,
    /// One byte, or two when the first has its high bit set.
    Signed,
    Byte,
    /// Object index then method index.
    Object,
    Effect,
    /// `push mask`: one byte.
    PushMask,
    /// Constant push of this many big-endian bytes.
    PushBytes(u8),
    /// Register operation: one raw operand byte.
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowerOp {
    pub mnemonic: &'static str,
    pub shape: Shape,
}

const fn op(mnemonic: &'static str, shape: Shape) -> LowerOp {
    LowerOp { mnemonic, shape }
}

const fn plain(mnemonic: &'static str) -> LowerOp {
    op(mnemonic, Shape::None)
}

pub const LOWER_OPCODES: [LowerOp; 64] = [
    plain("anchor:ret"),
    plain("anchor:ret; pop"),
    plain("anchor:abort"),
    plain("anchor:abort; pop"),
    op("jmp", Shape::Signed),
    op("call", Shape::Byte),
    op("call obj", Shape::Object),
    op("call obj[]", Shape::Object),
    op("loopstart", Shape::Signed),
    op("loopcontinue", Shape::Signed),
    op("jmpne", Shape::Signed),
    op("jmpe", Shape::Signed),
    plain("jmp"),
    op("case", Shape::Signed),
    op("caserange", Shape::Signed),
    plain("lookabort"),
    plain("lookup"),
    plain("lookdown"),
    plain("lookuprange"),
    plain("lookdownrange"),
    plain("quit"),
    plain("mark"),
    plain("strsize"),
    plain("strcomp"),
    plain("bytefill"),
    plain("wordfill"),
    plain("longfill"),
    plain("waitpeq"),
    plain("bytemove"),
    plain("wordmove"),
    plain("longmove"),
    plain("waitpne"),
    plain("clkset"),
    plain("cogstop"),
    plain("lockret"),
    plain("waitcnt"),
    plain("readidxspr"),
    plain("writeidxspr"),
    op("effectidxspr", Shape::Effect),
    plain("waitvid"),
    plain("coginitret"),
    plain("locknewret"),
    plain("locksetret"),
    plain("lockclrret"),
    plain("coginit"),
    plain("locknew"),
    plain("lockset"),
    plain("lockclr"),
    plain("abort"),
    plain("abortvalue"),
    plain("return"),
    plain("returnvalue"),
    plain("push -1"),
    plain("push 0"),
    plain("push 1"),
    op("push mask", Shape::PushMask),
    op("push", Shape::PushBytes(3)),
    op("push", Shape::PushBytes(2)),
    op("push", Shape::PushBytes(1)),
    op("push", Shape::PushBytes(0)),
    plain("illg"),
    op("memidx", Shape::Register),
    op("memrange", Shape::Register),
    op("memop", Shape::Register),
];

/// Operators for opcodes `0xE0..=0xFF`, indexed by `opcode - 0xE0`.
pub const MATH_OPS: [&str; 32] = [
    "ror", "rol", "shr", "shl", "min", "max", "neg", "not", "bitand", "abs", "bitor", "bitxor",
    "add", "sub", "sar", "rev", "logand", "enc", "logor", "dec", "mul", "mulupper", "div", "mod",
    "sqrt", "less", "greater", "neq", "eq", "lesseq", "greatereq", "lognot",
];

pub const LOWER_END: u8 = 0x40;
pub const VARIABLE_END: u8 = 0x80;
pub const MEMORY_END: u8 = 0xE0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_pushes_sit_at_0x34() {
        assert_eq!(LOWER_OPCODES[0x34].mnemonic, "push -1");
        assert_eq!(LOWER_OPCODES[0x35], plain("push 0"));
        assert_eq!(LOWER_OPCODES[0x36].mnemonic, "push 1");
        assert_eq!(LOWER_OPCODES[0x37].shape, Shape::PushMask);
    }

    #[test]
    fn push_width_shrinks_towards_0x3b() {
        for opcode in 0x38..=0x3Bu8 {
            assert_eq!(LOWER_OPCODES[opcode as usize].shape, Shape::PushBytes(0x3B - opcode));
        }
    }

    #[test]
    fn math_table_spans_top_band() {
        assert_eq!(MATH_OPS.len(), 0x100 - MEMORY_END as usize);
        assert_eq!(MATH_OPS[0x0C], "add");
        assert_eq!(MATH_OPS[0x1F], "lognot");
    }
}
