//! The code in this module was originally part of the codespan library https://github.com/brendanzab/codespan.
use std::ops::{Add, Sub};

use serde_derive::{Deserialize, Serialize};

/// A byte position in a source file.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ByteIndex(pub u32);

impl ByteIndex {
    /// Convert the position into a `usize`, for use in array indexing
    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl Sub for ByteIndex {
    type Output = ByteOffset;

    #[inline]
    fn sub(self, rhs: ByteIndex) -> ByteOffset {
        ByteOffset(self.0 as i64 - rhs.0 as i64)
    }
}

impl Add<ByteOffset> for ByteIndex {
    type Output = ByteIndex;

    #[inline]
    fn add(self, rhs: ByteOffset) -> ByteIndex {
        ByteIndex((self.0 as i64 + rhs.0) as u32)
    }
}

/// A byte offset in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ByteOffset(pub i64);

impl ByteOffset {
    /// Convert the offset into a `usize`, for use in array indexing
    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }
}

/// A region of source code delimited by a start and an end position.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: ByteIndex,
    pub end: ByteIndex,
}

impl Span {
    pub fn new(start: ByteIndex, end: ByteIndex) -> Span {
        Span { start, end }
    }

    /// Gives an empty span at the start of a source.
    pub const fn initial() -> Span {
        Span { start: ByteIndex(0), end: ByteIndex(0) }
    }

    /// Measure the span of a string.
    pub fn from_string(s: &str) -> Span {
        Span { start: ByteIndex(0), end: ByteIndex(s.len() as u32) }
    }

    /// The smallest span containing both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span { start: self.start.min(other.start), end: self.end.max(other.end) }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Span {
        Span { start: ByteIndex(range.start as u32), end: ByteIndex(range.end as u32) }
    }
}
