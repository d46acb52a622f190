//! nbtree decodes NBT data from *Minecraft: Java Edition* into an owned tree
//! of tags. This format is used by the game to store various things, such as
//! the world data (`level.dat`) and player inventories.
//!
//! * For the decoded tree see [`NamedTag`] and [`Value`].
//! * For the decoder itself see [`de`], with [`from_bytes`] as the usual entry
//!   point.
//! * For the cursor-explicit primitive readers see [`input`].
//! * For quick lookups of well known fields without decoding see [`scan`].
//!
//! The decoder works on an in-memory buffer of *uncompressed* NBT. Files on
//! disk are usually GZip compressed, so decompress them first.
//!
//! # Quick example
//!
//!```no_run
//! use flate2::read::GzDecoder;
//! use std::io::Read;
//!
//! fn main() {
//!     let args: Vec<_> = std::env::args().skip(1).collect();
//!     let file = std::fs::File::open(args[0].clone()).unwrap();
//!
//!     // level.dat files are compressed with GZip.
//!     let mut decoder = GzDecoder::new(file);
//!     let mut data = vec![];
//!     decoder.read_to_end(&mut data).unwrap();
//!
//!     let level = nbtree::from_bytes(&data).unwrap();
//!     let version = level
//!         .value
//!         .get("Data")
//!         .and_then(|data| data.get("DataVersion"))
//!         .and_then(|v| v.as_i64());
//!
//!     println!("{:?}", version);
//! }
//! ```
//!
//! # Depth
//!
//! Compounds and lists can nest arbitrarily deep. The decoder keeps open
//! compounds and lists on a heap allocated stack rather than recursing, so
//! deeply nested input cannot overflow the call stack.

use serde::Serialize;

pub mod de;
pub mod error;
pub mod input;
pub mod scan;

mod value;

pub use de::{
    decode_payload, decode_payload_with_opts, from_bytes, from_bytes_at, from_bytes_with_opts,
    DecodeOpts,
};
pub use value::*;

#[cfg(test)]
mod test;

/// An NBT tag. This does not carry the value or the name of the data.
#[derive(Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(any(test, feature = "arbitrary1"), derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same type.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

impl Tag {
    /// The smallest number of bytes a payload of this tag can occupy. Used to
    /// reject length fields that could never fit in the remaining input before
    /// allocating for them.
    pub(crate) fn min_payload_len(self) -> usize {
        match self {
            Tag::End => 0,
            Tag::Byte => 1,
            Tag::Short => 2,
            Tag::Int => 4,
            Tag::Long => 8,
            Tag::Float => 4,
            Tag::Double => 8,
            Tag::ByteArray => 4,
            Tag::String => 2,
            // element tag and length.
            Tag::List => 5,
            // just the end tag.
            Tag::Compound => 1,
            Tag::IntArray => 4,
            Tag::LongArray => 4,
        }
    }
}

impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
