use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use propeller_disasm::{write_listing, AnnotatedImage, Chunk, Segment};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "propdis")]
#[command(about = "Disassemble an annotated Propeller image (compiler JSON output)", long_about = None)]
struct Args {
    /// Annotated image produced with `--annotated-output json`
    image: PathBuf,

    /// Only decode the segment with this index
    #[arg(long)]
    segment: Option<usize>,

    /// Print one line per segment instead of decoding
    #[arg(long, action = ArgAction::SetTrue)]
    summary: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Serialize)]
struct DecodedSegment<'a> {
    index: usize,
    title: String,
    offset: usize,
    size: usize,
    chunks: &'a [Chunk],
}

fn selected<'a>(image: &'a AnnotatedImage, only: Option<usize>) -> Result<Vec<(usize, &'a Segment)>> {
    match only {
        Some(idx) => Ok(vec![(idx, image.segment(idx)?)]),
        None => Ok(image.segments.iter().enumerate().collect()),
    }
}

fn print_summary(out: &mut impl Write, segments: &[(usize, &Segment)]) -> Result<()> {
    for (idx, segment) in segments {
        writeln!(
            out,
            "{idx:>4}  0x{:04X}  {:>6} bytes  {}",
            segment.offset,
            segment.len,
            segment.title()
        )?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let file = File::open(&args.image)
        .with_context(|| format!("failed to open {}", args.image.display()))?;
    let image = AnnotatedImage::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to load annotated image {}", args.image.display()))?;
    let segments = selected(&image, args.segment)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.summary {
        return print_summary(&mut out, &segments);
    }

    match args.format {
        OutputFormat::Text => {
            for (_, segment) in &segments {
                writeln!(out, "== {}", segment.title())?;
                let chunks = image.decode(segment);
                write_listing(&mut out, &image.binary, segment.offset, &chunks)?;
            }
        }
        OutputFormat::Json => {
            let decoded: Vec<(usize, &Segment, Vec<Chunk>)> = segments
                .iter()
                .map(|(idx, segment)| (*idx, *segment, image.decode(segment)))
                .collect();
            let payload: Vec<DecodedSegment<'_>> = decoded
                .iter()
                .map(|(idx, segment, chunks)| DecodedSegment {
                    index: *idx,
                    title: segment.title(),
                    offset: segment.offset,
                    size: segment.len,
                    chunks,
                })
                .collect();
            serde_json::to_writer_pretty(&mut out, &payload)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
