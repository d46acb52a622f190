//! Cursor-explicit readers for the primitive NBT fields.
//!
//! Every reader is a pure function of the buffer and a cursor. It returns the
//! value along with the cursor advanced past the bytes it consumed, and checks
//! the remaining length before interpreting anything.

use byteorder::{BigEndian, ByteOrder};

use crate::{
    error::{Error, Result},
    Tag,
};

/// Take `n` bytes from `buf` at `cursor`.
fn take(buf: &[u8], cursor: usize, n: usize) -> Result<(&[u8], usize)> {
    let remaining = buf.len().saturating_sub(cursor);
    match cursor.checked_add(n).and_then(|end| buf.get(cursor..end)) {
        Some(bs) => Ok((bs, cursor + n)),
        None => Err(Error::truncated(cursor, n, remaining)),
    }
}

/// Read `n` raw bytes verbatim.
pub fn read_raw_bytes(buf: &[u8], cursor: usize, n: usize) -> Result<(&[u8], usize)> {
    take(buf, cursor, n)
}

/// Read a `width` byte big endian two's complement integer, where `width` is
/// one of 1, 2, 4 or 8. The result is sign extended.
pub fn read_signed(buf: &[u8], cursor: usize, width: usize) -> Result<(i64, usize)> {
    if !matches!(width, 1 | 2 | 4 | 8) {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        return Err(Error::invalid_length(cursor, width));
    }

    let (bs, cursor) = take(buf, cursor, width)?;
    Ok((BigEndian::read_int(bs, width), cursor))
}

pub fn read_u8(buf: &[u8], cursor: usize) -> Result<(u8, usize)> {
    let (bs, cursor) = take(buf, cursor, 1)?;
    Ok((bs[0], cursor))
}

pub fn read_i8(buf: &[u8], cursor: usize) -> Result<(i8, usize)> {
    let (bs, cursor) = take(buf, cursor, 1)?;
    Ok((bs[0] as i8, cursor))
}

pub fn read_i16(buf: &[u8], cursor: usize) -> Result<(i16, usize)> {
    let (bs, cursor) = take(buf, cursor, std::mem::size_of::<i16>())?;
    Ok((BigEndian::read_i16(bs), cursor))
}

pub fn read_u16(buf: &[u8], cursor: usize) -> Result<(u16, usize)> {
    let (bs, cursor) = take(buf, cursor, std::mem::size_of::<u16>())?;
    Ok((BigEndian::read_u16(bs), cursor))
}

pub fn read_i32(buf: &[u8], cursor: usize) -> Result<(i32, usize)> {
    let (bs, cursor) = take(buf, cursor, std::mem::size_of::<i32>())?;
    Ok((BigEndian::read_i32(bs), cursor))
}

pub fn read_i64(buf: &[u8], cursor: usize) -> Result<(i64, usize)> {
    let (bs, cursor) = take(buf, cursor, std::mem::size_of::<i64>())?;
    Ok((BigEndian::read_i64(bs), cursor))
}

pub fn read_f32(buf: &[u8], cursor: usize) -> Result<(f32, usize)> {
    let (bs, cursor) = take(buf, cursor, std::mem::size_of::<f32>())?;
    Ok((BigEndian::read_f32(bs), cursor))
}

pub fn read_f64(buf: &[u8], cursor: usize) -> Result<(f64, usize)> {
    let (bs, cursor) = take(buf, cursor, std::mem::size_of::<f64>())?;
    Ok((BigEndian::read_f64(bs), cursor))
}

/// Read a tag id byte.
pub fn read_tag(buf: &[u8], cursor: usize) -> Result<(Tag, usize)> {
    let (tag, next) = read_u8(buf, cursor)?;
    let tag = Tag::try_from(tag).map_err(|_| Error::unknown_tag(cursor, tag))?;
    Ok((tag, next))
}

/// Read a string prefixed with its unsigned 16 bit length.
pub fn read_string(buf: &[u8], cursor: usize) -> Result<(String, usize)> {
    let (len, start) = read_u16(buf, cursor)?;
    let (bs, end) = take(buf, start, len as usize).map_err(|_| {
        // Report the whole field, length prefix included.
        let remaining = buf.len().saturating_sub(cursor);
        Error::truncated(cursor, 2 + len as usize, remaining)
    })?;

    let s = std::str::from_utf8(bs).map_err(|_| Error::text_decode(start, bs))?;
    Ok((s.to_owned(), end))
}

/// Read a signed 32 bit length field for an array or list with elements at
/// least `min_width` bytes long. Negative lengths are rejected, as are lengths
/// that could not possibly fit in the rest of the input.
pub fn read_len(buf: &[u8], cursor: usize, min_width: usize) -> Result<(usize, usize)> {
    let (len, next) = read_i32(buf, cursor)?;
    let len = usize::try_from(len).map_err(|_| Error::invalid_length(cursor, len))?;

    let remaining = buf.len().saturating_sub(next);
    let needed = len.saturating_mul(min_width);
    if needed > remaining {
        return Err(Error::truncated(next, needed, remaining));
    }

    Ok((len, next))
}
