//! Annotated images as emitted by the compiler's `--annotated-output json`.
//!
//! The document pairs the raw image with an ordered list of
//! `[kind, size, extra?]` annotations that partition it. Classifying bytes is
//! the compiler's job; this module only trusts, places and decodes the
//! segments it is given.

pub mod tables;

use crate::pasm::{self, regions_len, Region};
use crate::{debug_enabled, spin, Chunk, ImageError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    ObjectHeader,
    MethodTable,
    ObjectTable,
    DatSection,
    Method,
    StringPool,
    Padding,
}

impl SegmentKind {
    pub fn from_code(code: u64) -> Option<Self> {
        Some(match code {
            0 => SegmentKind::ObjectHeader,
            1 => SegmentKind::MethodTable,
            2 => SegmentKind::ObjectTable,
            3 => SegmentKind::DatSection,
            4 => SegmentKind::Method,
            5 => SegmentKind::StringPool,
            6 => SegmentKind::Padding,
            _ => return None,
        })
    }

    pub fn description(self) -> &'static str {
        match self {
            SegmentKind::ObjectHeader => "Object Header",
            SegmentKind::MethodTable => "Method Table",
            SegmentKind::ObjectTable => "Child Object Table",
            SegmentKind::DatSection => "Dat Section",
            SegmentKind::Method => "Spin Method",
            SegmentKind::StringPool => "String Pool",
            SegmentKind::Padding => "Padding",
        }
    }
}

/// Kind-specific data carried by an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentExtra {
    None,
    /// Method or child-object names for a table.
    Names(Vec<String>),
    /// Layout of a DAT section.
    Regions(Vec<Region>),
    /// Name of a Spin method, taken from the preceding method table.
    MethodName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub offset: usize,
    pub len: usize,
    /// Offset of the object header this segment belongs to.
    pub object_base: usize,
    pub extra: SegmentExtra,
}

impl Segment {
    /// Description used for headings, with the method name when known.
    pub fn title(&self) -> String {
        match &self.extra {
            SegmentExtra::MethodName(name) => format!("{}: {name}", self.kind.description()),
            _ => self.kind.description().to_string(),
        }
    }

    fn names(&self) -> &[String] {
        match &self.extra {
            SegmentExtra::Names(names) => names,
            _ => &[],
        }
    }
}

#[derive(Deserialize)]
struct RawImage {
    binary: Vec<u8>,
    annotation: Vec<Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    pub binary: Vec<u8>,
    pub segments: Vec<Segment>,
}

/// Running state while placing annotations in order.
#[derive(Default)]
struct Placement {
    offset: usize,
    object_base: usize,
    method_names: Vec<String>,
    next_method: usize,
}

fn invalid(index: usize, reason: impl Into<String>) -> ImageError {
    ImageError::InvalidAnnotation {
        index,
        reason: reason.into(),
    }
}

fn parse_names(index: usize, extra: Option<&Value>) -> Result<Vec<String>> {
    let Some(extra) = extra else {
        return Ok(Vec::new());
    };
    let items = extra
        .as_array()
        .ok_or_else(|| invalid(index, "name list must be an array"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(index, "names must be strings"))
        })
        .collect()
}

fn parse_regions(index: usize, extra: Option<&Value>) -> Result<Vec<Region>> {
    let Some(extra) = extra else {
        return Ok(Vec::new());
    };
    let items = extra
        .as_array()
        .ok_or_else(|| invalid(index, "region list must be an array"))?;
    items
        .iter()
        .map(|item| {
            let pair = item
                .as_array()
                .filter(|pair| pair.len() == 2)
                .ok_or_else(|| invalid(index, "region descriptor must be [kind, value]"))?;
            let kind = pair[0]
                .as_u64()
                .ok_or_else(|| invalid(index, "region kind must be an unsigned integer"))?;
            let value = pair[1]
                .as_u64()
                .ok_or_else(|| invalid(index, "region value must be an unsigned integer"))?;
            Region::from_pair(kind, value).ok_or(ImageError::UnknownRegionKind { index, kind })
        })
        .collect()
}

impl AnnotatedImage {
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_raw(serde_json::from_str(text)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_raw(serde_json::from_reader(reader)?)
    }

    fn from_raw(raw: RawImage) -> Result<Self> {
        let mut state = Placement::default();
        let mut segments = Vec::with_capacity(raw.annotation.len());
        for (index, entry) in raw.annotation.iter().enumerate() {
            let code = entry
                .first()
                .and_then(Value::as_u64)
                .ok_or_else(|| invalid(index, "missing segment kind"))?;
            let len = entry
                .get(1)
                .and_then(Value::as_u64)
                .ok_or_else(|| invalid(index, "missing segment size"))? as usize;
            if len == 0 {
                continue;
            }
            let kind = SegmentKind::from_code(code)
                .ok_or(ImageError::UnknownSegmentKind { index, kind: code })?;
            let extra = entry.get(2);
            let extra = match kind {
                SegmentKind::ObjectHeader => {
                    state.object_base = state.offset;
                    state.method_names.clear();
                    state.next_method = 0;
                    SegmentExtra::None
                }
                SegmentKind::MethodTable => {
                    state.method_names = parse_names(index, extra)?;
                    state.next_method = 0;
                    SegmentExtra::Names(state.method_names.clone())
                }
                SegmentKind::ObjectTable => SegmentExtra::Names(parse_names(index, extra)?),
                SegmentKind::DatSection => {
                    let regions = parse_regions(index, extra)?;
                    let described = regions_len(&regions);
                    if described != len {
                        return Err(ImageError::RegionSizeMismatch {
                            index,
                            described,
                            len,
                        });
                    }
                    SegmentExtra::Regions(regions)
                }
                SegmentKind::Method => {
                    let name = state
                        .method_names
                        .get(state.next_method)
                        .cloned()
                        .unwrap_or_default();
                    state.next_method += 1;
                    SegmentExtra::MethodName(name)
                }
                SegmentKind::StringPool | SegmentKind::Padding => SegmentExtra::None,
            };
            if debug_enabled() {
                eprintln!(
                    "[propdis-image] annotation={index} kind={kind:?} offset=0x{:04X} size={len}",
                    state.offset
                );
            }
            segments.push(Segment {
                kind,
                offset: state.offset,
                len,
                object_base: state.object_base,
                extra,
            });
            state.offset += len;
        }
        if state.offset != raw.binary.len() {
            return Err(ImageError::SizeMismatch {
                annotated: state.offset,
                binary: raw.binary.len(),
            });
        }
        Ok(Self {
            binary: raw.binary,
            segments,
        })
    }

    pub fn segment(&self, idx: usize) -> Result<&Segment> {
        self.segments.get(idx).ok_or(ImageError::NoSuchSegment(idx))
    }

    pub fn decode_segment(&self, idx: usize) -> Result<Vec<Chunk>> {
        Ok(self.decode(self.segment(idx)?))
    }

    /// Decode one segment of this image into chunks tiling its bytes.
    pub fn decode(&self, segment: &Segment) -> Vec<Chunk> {
        let binary = self.binary.as_slice();
        let Segment {
            offset,
            len,
            object_base,
            ..
        } = *segment;
        if debug_enabled() {
            eprintln!(
                "[propdis-image] decode kind={:?} offset=0x{offset:04X} size={len}",
                segment.kind
            );
        }
        match (segment.kind, &segment.extra) {
            (SegmentKind::ObjectHeader, _) => tables::object_header(binary, offset, len),
            (SegmentKind::MethodTable, _) => {
                tables::method_table(binary, offset, len, object_base, segment.names())
            }
            (SegmentKind::ObjectTable, _) => {
                tables::object_table(binary, offset, len, object_base, segment.names())
            }
            (SegmentKind::DatSection, SegmentExtra::Regions(regions)) => {
                pasm::disassemble(binary, offset, regions)
            }
            (SegmentKind::Method, SegmentExtra::MethodName(name)) => {
                spin::disassemble(binary, offset, len, name)
            }
            (SegmentKind::Method, _) => spin::disassemble(binary, offset, len, ""),
            (SegmentKind::StringPool, _) => tables::string_pool(binary, offset, len),
            _ => vec![Chunk::new(len, segment.title())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: &str = r#"{
        "binary": [16, 0, 2, 0,  12, 0, 0, 0,  53, 50,  104, 0, 0, 0],
        "annotation": [[0, 4], [1, 4, ["main"]], [4, 2], [5, 2], [6, 0], [6, 2]]
    }"#;

    #[test]
    fn places_segments_in_order() {
        let image = AnnotatedImage::from_json(IMAGE).unwrap();
        let offsets: Vec<usize> = image.segments.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 4, 8, 10, 12]);
        assert_eq!(image.segments[2].title(), "Spin Method: main");
    }

    #[test]
    fn method_segment_decodes_as_bytecode() {
        let image = AnnotatedImage::from_json(IMAGE).unwrap();
        let chunks = image.decode_segment(2).unwrap();
        assert_eq!(chunks[0].text, "Spin Method: main");
        assert_eq!(chunks[1].text, "push 0");
        assert_eq!(chunks[2].text, "return");
    }

    #[test]
    fn padding_is_one_chunk() {
        let image = AnnotatedImage::from_json(IMAGE).unwrap();
        assert_eq!(image.decode_segment(4).unwrap(), vec![Chunk::new(2, "Padding")]);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let err = AnnotatedImage::from_json(r#"{"binary": [1, 2, 3], "annotation": [[6, 2]]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ImageError::SizeMismatch {
                annotated: 2,
                binary: 3
            }
        ));
    }

    #[test]
    fn unknown_kinds_are_rejected() {
        let err = AnnotatedImage::from_json(r#"{"binary": [1], "annotation": [[9, 1]]}"#)
            .unwrap_err();
        assert!(matches!(err, ImageError::UnknownSegmentKind { index: 0, kind: 9 }));
        let err =
            AnnotatedImage::from_json(r#"{"binary": [1], "annotation": [[3, 1, [[7, 1]]]]}"#)
                .unwrap_err();
        assert!(matches!(err, ImageError::UnknownRegionKind { index: 0, kind: 7 }));
    }

    #[test]
    fn dat_regions_must_cover_the_section() {
        let err = AnnotatedImage::from_json(
            r#"{"binary": [7, 10, 252, 160, 53, 50], "annotation": [[3, 4, [[1, 6]]], [4, 2]]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ImageError::RegionSizeMismatch {
                index: 0,
                described: 6,
                len: 4
            }
        ));
    }

    #[test]
    fn missing_segment_is_an_error() {
        let image = AnnotatedImage::from_json(IMAGE).unwrap();
        assert!(matches!(
            image.decode_segment(99),
            Err(ImageError::NoSuchSegment(99))
        ));
    }
}
