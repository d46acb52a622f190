use chrono::{DateTime, SecondsFormat, Utc};
use flate2::read::GzDecoder;
use log::{info, warn};
use nbtree::{DecodeOpts, NamedTag, Value};
use rayon::prelude::*;
use std::fmt::Display;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Longest list or array a file may declare unless told otherwise. Lists of
/// End cost memory per element without taking any input, so some limit is
/// always applied.
pub const DEFAULT_MAX_SEQ_LEN: usize = 1 << 20;

/// Deepest tree that will be rendered as JSON. Serializing recurses once per
/// level.
pub const MAX_JSON_DEPTH: usize = 256;

/// Why a single input file could not be dumped.
#[derive(Debug)]
pub enum FileError {
    Io(io::Error),
    Decode(nbtree::error::Error),
    TooDeep { max: usize },
    Json(serde_json::Error),
}

impl std::error::Error for FileError {}

impl Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::Io(e) => write!(f, "could not read: {}", e),
            FileError::Decode(e) => write!(f, "error at offset {}: {}", e.offset(), e.kind()),
            FileError::TooDeep { max } => {
                write!(f, "nested more than {} levels deep, too deep for JSON", max)
            }
            FileError::Json(e) => write!(f, "could not write JSON: {}", e),
        }
    }
}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        FileError::Io(e)
    }
}

impl From<nbtree::error::Error> for FileError {
    fn from(e: nbtree::error::Error) -> Self {
        FileError::Decode(e)
    }
}

impl From<serde_json::Error> for FileError {
    fn from(e: serde_json::Error) -> Self {
        FileError::Json(e)
    }
}

/// Decompress GZip data, or pass it through untouched if `raw`.
pub fn decompress(data: Vec<u8>, raw: bool) -> io::Result<Vec<u8>> {
    if raw {
        return Ok(data);
    }

    let mut decoder = GzDecoder::new(data.as_slice());
    let mut buf = vec![];
    decoder.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Read a whole file, decompressing it unless `raw`.
pub fn read_input(path: &Path, raw: bool) -> io::Result<Vec<u8>> {
    decompress(std::fs::read(path)?, raw)
}

/// A decoded file along with the size of its uncompressed data.
pub struct Decoded {
    pub len: usize,
    pub root: NamedTag,
}

pub fn decode_file(
    path: &Path,
    raw: bool,
    opts: DecodeOpts,
) -> std::result::Result<Decoded, FileError> {
    let data = read_input(path, raw)?;
    let root = nbtree::from_bytes_with_opts(&data, opts)?;
    Ok(Decoded {
        len: data.len(),
        root,
    })
}

/// How `dump_files` reads and prints each file.
#[derive(Debug, Clone)]
pub struct DumpOpts {
    pub json: bool,
    pub raw: bool,
    pub indent: usize,
    pub max_seq_len: usize,
}

impl Default for DumpOpts {
    fn default() -> Self {
        Self {
            json: false,
            raw: false,
            indent: 4,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
        }
    }
}

/// Decode and render every file, writing them to `out` in the order given.
/// A file that fails gets a single line saying why and does not stop the
/// others. Returns how many files failed.
pub fn dump_files<W: Write>(
    out: &mut W,
    files: &[PathBuf],
    opts: &DumpOpts,
) -> io::Result<usize> {
    let decode_opts = DecodeOpts::new().max_seq_len(opts.max_seq_len);

    // Each file is independent, render them all at once and print in order.
    let results: Vec<_> = files
        .par_iter()
        .map(|path| (path, dump_file(path, opts, decode_opts)))
        .collect();

    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(text) => out.write_all(&text)?,
            Err(e) => {
                warn!("failed to dump {}: {}", path.display(), e);
                writeln!(out, "{}: {}", path.display(), e)?;
                failed += 1;
            }
        }
    }

    Ok(failed)
}

fn dump_file(
    path: &Path,
    opts: &DumpOpts,
    decode_opts: DecodeOpts,
) -> std::result::Result<Vec<u8>, FileError> {
    let decoded = decode_file(path, opts.raw, decode_opts)?;
    info!("decoded {} ({} bytes)", path.display(), decoded.len);

    let mut text = vec![];
    writeln!(text, "{} {} bytes", path.display(), decoded.len)?;
    if opts.json {
        writeln!(text, "{}", render_json(&decoded.root)?)?;
    } else {
        render_tree(&mut text, &decoded.root, opts.indent)?;
    }

    Ok(text)
}

enum Line<'a> {
    Named(&'a NamedTag),
    Element(&'a Value),
}

/// Write the tree one tag per line, each level of nesting indented by
/// `indent` more spaces.
pub fn render_tree<W: Write>(out: &mut W, root: &NamedTag, indent: usize) -> io::Result<()> {
    // Trees can be deeper than the call stack allows, so walk with our own.
    let mut stack = vec![(0, Line::Named(root))];

    while let Some((depth, line)) = stack.pop() {
        let pad = depth * indent;
        let value = match line {
            Line::Named(tag) => {
                write!(out, "{:pad$}{}({:?}): ", "", tag.value.tag(), tag.name, pad = pad)?;
                &tag.value
            }
            Line::Element(value) => {
                write!(out, "{:pad$}{}: ", "", value.tag(), pad = pad)?;
                value
            }
        };

        writeln!(out, "{}", summary(value))?;

        match value {
            Value::Compound(children) => {
                stack.extend(children.iter().rev().map(|c| (depth + 1, Line::Named(c))));
            }
            Value::List(_, elements) => {
                stack.extend(elements.iter().rev().map(|e| (depth + 1, Line::Element(e))));
            }
            _ => {}
        }
    }

    Ok(())
}

/// The text after the tag and name on a line of the tree.
fn summary(value: &Value) -> String {
    match value {
        Value::End => "no data".to_owned(),
        Value::Byte(v) => v.to_string(),
        Value::Short(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Long(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::String(v) => format!("{:?}", v),
        Value::ByteArray(v) => format!("{} bytes {}", v.len(), hex(v)),
        Value::IntArray(v) => format!("{:?}", v),
        Value::LongArray(v) => format!("{:?}", v),
        Value::List(tag, elements) => format!("{} entries of {}", elements.len(), tag),
        Value::Compound(children) => format!("{} entries", children.len()),
    }
}

fn hex(bs: &[i8]) -> String {
    bs.iter().map(|b| format!("{:02x}", *b as u8)).collect()
}

/// Render the tree as pretty printed JSON. Trees nested deeper than
/// [`MAX_JSON_DEPTH`] are refused.
pub fn render_json(root: &NamedTag) -> std::result::Result<String, FileError> {
    if nesting_depth(&root.value, MAX_JSON_DEPTH) > MAX_JSON_DEPTH {
        return Err(FileError::TooDeep {
            max: MAX_JSON_DEPTH,
        });
    }

    Ok(serde_json::to_string_pretty(root)?)
}

/// How many levels deep `value` goes, a lone value being 1. Stops looking once
/// past `limit`.
fn nesting_depth(value: &Value, limit: usize) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(1, value)];

    while let Some((depth, value)) = stack.pop() {
        deepest = deepest.max(depth);
        if deepest > limit {
            break;
        }

        match value {
            Value::Compound(children) => {
                stack.extend(children.iter().map(|c| (depth + 1, &c.value)));
            }
            Value::List(_, elements) => stack.extend(elements.iter().map(|e| (depth + 1, e))),
            _ => {}
        }
    }

    deepest
}

/// Format milliseconds since the Unix epoch as an RFC 3339 UTC time, or `None`
/// if it is out of range.
pub fn format_epoch_millis(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
}
