//! Disassembler for Propeller binary images.
//!
//! Two independent engines live here: [`pasm`] decodes the fixed-width cog
//! instruction set (with a label resolution pass ahead of rendering) and
//! [`spin`] decodes the variable-length Spin interpreter bytecode. Both are
//! pure functions over a borrowed byte slice and return ordered [`Chunk`]s.
//! [`image`] ties them to the compiler's annotated image format and
//! [`listing`] turns chunks into plain text.

use serde::Serialize;
use std::env;
use thiserror::Error;

pub mod image;
pub mod listing;
pub mod pasm;
pub mod spin;

pub use image::{AnnotatedImage, Segment, SegmentExtra, SegmentKind};
pub use listing::{write_listing, BYTES_PER_LINE};
pub use pasm::{InstructionWord, LabelTable, Region};
pub use spin::{decode_op, SpinOp};

/// Environment variable that turns on stderr diagnostics.
pub const DEBUG_ENV: &str = "PROPDIS_DEBUG";

pub(crate) fn debug_enabled() -> bool {
    env::var(DEBUG_ENV).is_ok()
}

/// One decoded piece of a region: `len` bytes of input described by `text`.
///
/// Zero-length chunks carry headings (the Spin method header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub len: usize,
    pub text: String,
}

impl Chunk {
    pub fn new(len: usize, text: impl Into<String>) -> Self {
        Self {
            len,
            text: text.into(),
        }
    }
}

/// Sum of the byte lengths covered by `chunks`.
pub fn covered_len(chunks: &[Chunk]) -> usize {
    chunks.iter().map(|chunk| chunk.len).sum()
}

pub type Result<T> = std::result::Result<T, ImageError>;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("annotation {index}: {reason}")]
    InvalidAnnotation { index: usize, reason: String },
    #[error("annotation {index}: unknown segment kind {kind}")]
    UnknownSegmentKind { index: usize, kind: u64 },
    #[error("annotation {index}: unknown region descriptor kind {kind}")]
    UnknownRegionKind { index: usize, kind: u64 },
    #[error("annotation {index}: regions describe {described} bytes, but the section is {len}")]
    RegionSizeMismatch {
        index: usize,
        described: usize,
        len: usize,
    },
    #[error("annotation size was {annotated}, but binary size was {binary}")]
    SizeMismatch { annotated: usize, binary: usize },
    #[error("segment {0} does not exist")]
    NoSuchSegment(usize),
}
