//! This module contains the decoder that turns NBT bytes into a tree of
//! [`NamedTag`] and [`Value`].
//!
//! NBT is a tree of tags. Each tag in a compound is a tag id byte, a name, and
//! a payload whose layout depends on the tag. Lists carry a single element tag
//! and a count, followed by that many unnamed payloads. A file is a single
//! named compound.
//!
//! # Cursors
//!
//! Decoding is cursor-explicit. Every function takes the position to start
//! reading at and returns the position just after what it consumed, so the
//! same buffer can be decoded from any offset without copying it.
//!
//! ```
//! use nbtree::{de::decode_payload, Tag, Value};
//!
//! // A list of two ints.
//! let buf = [3, 0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0, 2];
//! let (value, cursor) = decode_payload(&buf, Tag::List, 0).unwrap();
//!
//! assert_eq!(value, Value::List(Tag::Int, vec![Value::Int(1), Value::Int(2)]));
//! assert_eq!(cursor, buf.len());
//! ```
//!
//! # Lists of End
//!
//! A list with element tag End contains no payload data at all, whatever count
//! it declares. It decodes to `count` [`Value::End`] placeholders and consumes
//! only its element tag and count.
//!
//! Since the count is not bounded by the input, use
//! [`DecodeOpts::max_seq_len`] when decoding untrusted data.
//!
//! # Errors
//!
//! The first problem found aborts the whole decode. No partial tree is ever
//! returned. See [`crate::error::ErrorKind`] for what can go wrong.

use crate::{
    error::{Error, Result},
    input::{
        read_f32, read_f64, read_i16, read_i32, read_i64, read_i8, read_len, read_raw_bytes,
        read_string, read_tag,
    },
    NamedTag, Tag, Value,
};

use byteorder::{BigEndian, ByteOrder};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Options for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOpts {
    max_seq_len: usize,
}

impl DecodeOpts {
    pub fn new() -> Self {
        Default::default()
    }

    /// Maximum number of elements a list or array may declare. Lists of End
    /// take no input per element, so without a limit a few bytes can ask for
    /// billions of placeholders. Defaults to no limit.
    pub fn max_seq_len(mut self, value: usize) -> Self {
        self.max_seq_len = value;
        self
    }
}

impl Default for DecodeOpts {
    fn default() -> Self {
        Self {
            max_seq_len: usize::MAX,
        }
    }
}

/// Decode a complete NBT file held in `buf`. The file must start with a named
/// compound. Bytes after the end of that compound are ignored.
pub fn from_bytes(buf: &[u8]) -> Result<NamedTag> {
    from_bytes_with_opts(buf, DecodeOpts::default())
}

/// Decode a complete NBT file held in `buf` with the given options.
pub fn from_bytes_with_opts(buf: &[u8], opts: DecodeOpts) -> Result<NamedTag> {
    if buf.starts_with(&GZIP_MAGIC) {
        return Err(Error::compressed_input());
    }

    root_at(buf, 0, opts).map(|(root, _)| root)
}

/// Decode a named root compound starting at `cursor`, returning it along with
/// the position just after its End tag.
pub fn from_bytes_at(buf: &[u8], cursor: usize) -> Result<(NamedTag, usize)> {
    root_at(buf, cursor, DecodeOpts::default())
}

fn root_at(buf: &[u8], cursor: usize, opts: DecodeOpts) -> Result<(NamedTag, usize)> {
    let (tag, next) = read_tag(buf, cursor)?;
    if tag != Tag::Compound {
        return Err(Error::no_root_compound(cursor, tag));
    }

    let (name, next) = read_string(buf, next)?;
    let (value, next) = decode_payload_with_opts(buf, tag, next, opts)?;

    Ok((NamedTag { name, value }, next))
}

/// Decode a single payload of type `tag` starting at `cursor`. Any name the
/// payload has must already be consumed.
pub fn decode_payload(buf: &[u8], tag: Tag, cursor: usize) -> Result<(Value, usize)> {
    decode_payload_with_opts(buf, tag, cursor, DecodeOpts::default())
}

pub fn decode_payload_with_opts(
    buf: &[u8],
    tag: Tag,
    cursor: usize,
    opts: DecodeOpts,
) -> Result<(Value, usize)> {
    let mut stack: Vec<Frame> = Vec::new();
    let (mut pending, mut cursor) = begin_payload(buf, tag, cursor, &opts)?;

    loop {
        match pending {
            Payload::Open(frame) => stack.push(frame),
            Payload::Complete(value) => match stack.last_mut() {
                Some(parent) => parent.push(value),
                None => return Ok((value, cursor)),
            },
        }

        // Either a child was just opened or one was added to its parent, so
        // there is always a frame to continue with here.
        let frame = match stack.last_mut() {
            Some(frame) => frame,
            None => unreachable!("no open compound or list"),
        };

        let (next, next_cursor) = frame.next_child(buf, cursor, &opts)?;
        cursor = next_cursor;

        pending = match next {
            Some(child) => child,
            None => match stack.pop() {
                Some(done) => Payload::Complete(done.into_value()),
                None => unreachable!("no open compound or list"),
            },
        };
    }
}

/// What reading the start of a payload produced.
enum Payload {
    /// Every value except compounds and lists is read in one go.
    Complete(Value),
    /// A compound or list whose children are still to be read.
    Open(Frame),
}

/// An open compound or list.
enum Frame {
    Compound {
        children: Vec<NamedTag>,
        /// Name of the child currently being decoded.
        child_name: String,
    },
    List {
        element_tag: Tag,
        remaining: usize,
        elements: Vec<Value>,
    },
}

impl Frame {
    /// Read up to the start of the next child, or return `None` if the frame
    /// is complete. A compound consumes its End tag here.
    fn next_child(
        &mut self,
        buf: &[u8],
        cursor: usize,
        opts: &DecodeOpts,
    ) -> Result<(Option<Payload>, usize)> {
        match self {
            Frame::Compound { child_name, .. } => {
                let (tag, cursor) = read_tag(buf, cursor)?;
                if tag == Tag::End {
                    return Ok((None, cursor));
                }

                let (name, cursor) = read_string(buf, cursor)?;
                *child_name = name;

                let (payload, cursor) = begin_payload(buf, tag, cursor, opts)?;
                Ok((Some(payload), cursor))
            }
            Frame::List {
                element_tag,
                remaining,
                ..
            } => {
                if *remaining == 0 {
                    return Ok((None, cursor));
                }
                *remaining -= 1;

                let (payload, cursor) = begin_payload(buf, *element_tag, cursor, opts)?;
                Ok((Some(payload), cursor))
            }
        }
    }

    fn push(&mut self, value: Value) {
        match self {
            Frame::Compound {
                children,
                child_name,
            } => children.push(NamedTag {
                name: std::mem::take(child_name),
                value,
            }),
            Frame::List { elements, .. } => elements.push(value),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Frame::Compound { children, .. } => Value::Compound(children),
            Frame::List {
                element_tag,
                elements,
                ..
            } => Value::List(element_tag, elements),
        }
    }
}

/// Read a length field and check it against the options.
fn seq_len(
    buf: &[u8],
    cursor: usize,
    min_width: usize,
    opts: &DecodeOpts,
) -> Result<(usize, usize)> {
    let (len, next) = read_len(buf, cursor, min_width)?;
    if len > opts.max_seq_len {
        return Err(Error::too_long(cursor, len, opts.max_seq_len));
    }
    Ok((len, next))
}

fn begin_payload(
    buf: &[u8],
    tag: Tag,
    cursor: usize,
    opts: &DecodeOpts,
) -> Result<(Payload, usize)> {
    Ok(match tag {
        // Only reachable for elements of a list of End, which take no space.
        Tag::End => (Payload::Complete(Value::End), cursor),
        Tag::Byte => {
            let (v, cursor) = read_i8(buf, cursor)?;
            (Payload::Complete(Value::Byte(v)), cursor)
        }
        Tag::Short => {
            let (v, cursor) = read_i16(buf, cursor)?;
            (Payload::Complete(Value::Short(v)), cursor)
        }
        Tag::Int => {
            let (v, cursor) = read_i32(buf, cursor)?;
            (Payload::Complete(Value::Int(v)), cursor)
        }
        Tag::Long => {
            let (v, cursor) = read_i64(buf, cursor)?;
            (Payload::Complete(Value::Long(v)), cursor)
        }
        Tag::Float => {
            let (v, cursor) = read_f32(buf, cursor)?;
            (Payload::Complete(Value::Float(v)), cursor)
        }
        Tag::Double => {
            let (v, cursor) = read_f64(buf, cursor)?;
            (Payload::Complete(Value::Double(v)), cursor)
        }
        Tag::String => {
            let (v, cursor) = read_string(buf, cursor)?;
            (Payload::Complete(Value::String(v)), cursor)
        }
        Tag::ByteArray => {
            let (len, cursor) = seq_len(buf, cursor, 1, opts)?;
            let (bs, cursor) = read_raw_bytes(buf, cursor, len)?;
            let data = bs.iter().map(|b| *b as i8).collect();
            (Payload::Complete(Value::ByteArray(data)), cursor)
        }
        Tag::IntArray => {
            let size = std::mem::size_of::<i32>();
            let (len, cursor) = seq_len(buf, cursor, size, opts)?;
            let (bs, cursor) = read_raw_bytes(buf, cursor, len * size)?;
            let mut data = vec![0; len];
            BigEndian::read_i32_into(bs, &mut data);
            (Payload::Complete(Value::IntArray(data)), cursor)
        }
        Tag::LongArray => {
            let size = std::mem::size_of::<i64>();
            let (len, cursor) = seq_len(buf, cursor, size, opts)?;
            let (bs, cursor) = read_raw_bytes(buf, cursor, len * size)?;
            let mut data = vec![0; len];
            BigEndian::read_i64_into(bs, &mut data);
            (Payload::Complete(Value::LongArray(data)), cursor)
        }
        Tag::List => {
            let (element_tag, cursor) = read_tag(buf, cursor)?;
            let (len, cursor) = seq_len(buf, cursor, element_tag.min_payload_len(), opts)?;

            // End elements take no input, so the count is not bounded by the
            // remaining input. Don't reserve for them.
            let capacity = if element_tag == Tag::End { 0 } else { len };

            let frame = Frame::List {
                element_tag,
                remaining: len,
                elements: Vec::with_capacity(capacity),
            };
            (Payload::Open(frame), cursor)
        }
        Tag::Compound => {
            let frame = Frame::Compound {
                children: Vec::new(),
                child_name: String::new(),
            };
            (Payload::Open(frame), cursor)
        }
    })
}
