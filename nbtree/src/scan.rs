//! Quick lookups of well known fields by searching for their encoded header,
//! without decoding the tree.
//!
//! A tag in a compound is written as its tag id, the length of its name and
//! the name itself. Searching the raw bytes for that header finds the payload
//! of the first tag with that name and type, wherever it is in the tree.
//!
//! This is a best effort shortcut. Nothing around the match is validated, so
//! the same bytes appearing inside some unrelated payload give a false match.
//! Use [`crate::from_bytes`] when the structure matters.
//!
//! ```
//! use nbtree::scan;
//!
//! // an uncompressed level.dat
//! # let buf = [10, 0, 0, 4, 0, 4, 115, 101, 101, 100, 0, 0, 0, 0, 0, 0, 0, 42, 0];
//! if let Some(seed) = scan::find_long(&buf, "seed") {
//!     println!("seed: {}", seed);
//! }
//! ```

use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;

use crate::Tag;

/// Ticks in a Minecraft day.
pub const TICKS_PER_DAY: i64 = 24000;

/// Tick 0 is at 06:00, so the clock runs this far ahead of the tick counter.
const CLOCK_OFFSET: i64 = 6000;

/// The encoded header of a tag called `name`: tag id, name length, name.
/// `None` if the name is too long to be encoded.
pub fn tag_pattern(tag: Tag, name: &str) -> Option<Vec<u8>> {
    let len = u16::try_from(name.len()).ok()?;

    let mut pattern = Vec::with_capacity(3 + name.len());
    pattern.push(u8::from(tag));
    pattern.extend_from_slice(&len.to_be_bytes());
    pattern.extend_from_slice(name.as_bytes());
    Some(pattern)
}

/// Find the first occurrence of `pattern` and return the `width` bytes
/// immediately after it. `None` if the pattern is missing or not followed by
/// enough bytes.
pub fn find_after<'a>(buf: &'a [u8], pattern: &[u8], width: usize) -> Option<&'a [u8]> {
    if pattern.is_empty() {
        return None;
    }

    let start = buf.windows(pattern.len()).position(|w| w == pattern)? + pattern.len();
    buf.get(start..start.checked_add(width)?)
}

pub fn find_long(buf: &[u8], name: &str) -> Option<i64> {
    find_after(buf, &tag_pattern(Tag::Long, name)?, 8).map(BigEndian::read_i64)
}

pub fn find_int(buf: &[u8], name: &str) -> Option<i32> {
    find_after(buf, &tag_pattern(Tag::Int, name)?, 4).map(BigEndian::read_i32)
}

/// Find a string tag called `name`. Strings that are not valid UTF-8 are
/// converted lossily.
pub fn find_string(buf: &[u8], name: &str) -> Option<String> {
    let pattern = tag_pattern(Tag::String, name)?;
    let len = find_after(buf, &pattern, 2).map(BigEndian::read_u16)?;

    let mut with_len = pattern;
    with_len.extend_from_slice(&len.to_be_bytes());
    let bs = find_after(buf, &with_len, len as usize)?;

    Some(String::from_utf8_lossy(bs).into_owned())
}

/// Time of day in game, derived from the `DayTime` tick counter.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTime {
    /// Day number, starting from 1.
    pub day: i64,
    pub hour: u8,
    pub minute: u8,
}

impl DayTime {
    /// Tick 0 is 06:00 on the first day. Days start at midnight, so tick
    /// 18000 is 00:00 on the second day.
    pub fn from_ticks(ticks: i64) -> Self {
        let clock = ticks.saturating_add(CLOCK_OFFSET);
        let day = clock.div_euclid(TICKS_PER_DAY) + 1;
        let in_day = clock.rem_euclid(TICKS_PER_DAY);

        // 1000 ticks per hour.
        let hour = (in_day / 1000) as u8;
        let minute = ((in_day % 1000) * 60 / 1000) as u8;

        Self { day, hour, minute }
    }
}

impl std::fmt::Display for DayTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Day {} {:02}:{:02}", self.day, self.hour, self.minute)
    }
}

/// The fields of a `level.dat` that can be found by scanning.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelSummary {
    pub level_name: Option<String>,
    pub day_time: Option<DayTime>,
    /// Milliseconds since the Unix epoch.
    pub last_played: Option<i64>,
    pub seed: Option<i64>,
    /// Where worlds from before 1.16 keep their seed. Worlds upgraded since
    /// can have both.
    pub random_seed: Option<i64>,
}

impl LevelSummary {
    pub fn scan(buf: &[u8]) -> Self {
        Self {
            level_name: find_string(buf, "LevelName"),
            day_time: find_long(buf, "DayTime").map(DayTime::from_ticks),
            last_played: find_long(buf, "LastPlayed"),
            seed: find_long(buf, "seed"),
            random_seed: find_long(buf, "RandomSeed"),
        }
    }
}
