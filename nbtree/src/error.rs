//! Contains the Error and Result type used by the decoder.
use crate::Tag;

/// An error that aborted decoding, along with where in the input it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    offset: usize,
}

/// The reason decoding failed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A value needed more bytes than were left in the input.
    TruncatedInput { needed: usize, remaining: usize },

    /// A length field for an array or list was negative.
    InvalidLength(i32),

    /// A list or array declared more elements than the decode options allow.
    TooLong { len: usize, max: usize },

    /// A tag id outside of the 13 known tags.
    UnknownTagKind(u8),

    /// A name or string was not valid UTF-8. Contains the offending bytes.
    TextDecode(Vec<u8>),

    /// The input did not start with a compound.
    NoRootCompound(Tag),

    /// The input starts with the GZip magic bytes, so has not been
    /// decompressed.
    CompressedInput,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte offset into the input of the field that could not be decoded.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self.kind, ErrorKind::TruncatedInput { .. })
    }

    pub(crate) fn truncated(offset: usize, needed: usize, remaining: usize) -> Self {
        Self {
            kind: ErrorKind::TruncatedInput { needed, remaining },
            offset,
        }
    }

    pub(crate) fn invalid_length(offset: usize, len: i32) -> Self {
        Self {
            kind: ErrorKind::InvalidLength(len),
            offset,
        }
    }

    pub(crate) fn too_long(offset: usize, len: usize, max: usize) -> Self {
        Self {
            kind: ErrorKind::TooLong { len, max },
            offset,
        }
    }

    pub(crate) fn unknown_tag(offset: usize, tag: u8) -> Self {
        Self {
            kind: ErrorKind::UnknownTagKind(tag),
            offset,
        }
    }

    pub(crate) fn text_decode(offset: usize, data: &[u8]) -> Self {
        Self {
            kind: ErrorKind::TextDecode(data.to_vec()),
            offset,
        }
    }

    pub(crate) fn no_root_compound(offset: usize, tag: Tag) -> Self {
        Self {
            kind: ErrorKind::NoRootCompound(tag),
            offset,
        }
    }

    pub(crate) fn compressed_input() -> Self {
        Self {
            kind: ErrorKind::CompressedInput,
            offset: 0,
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::TruncatedInput { needed, remaining } => write!(
                f,
                "truncated input: needed {} bytes, {} remaining",
                needed, remaining
            ),
            ErrorKind::InvalidLength(len) => write!(f, "invalid length: {}", len),
            ErrorKind::TooLong { len, max } => write!(
                f,
                "size ({}) greater than max sequence length ({})",
                len, max
            ),
            ErrorKind::UnknownTagKind(tag) => write!(f, "unknown tag kind: {}", tag),
            ErrorKind::TextDecode(data) => write!(
                f,
                "invalid string, non-unicode: {}",
                String::from_utf8_lossy(data)
            ),
            ErrorKind::NoRootCompound(tag) => {
                write!(f, "invalid nbt: no root compound, found {}", tag)
            }
            ErrorKind::CompressedInput => {
                f.write_str("invalid nbt: input looks like gzip data, decompress it first")
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}
