//! Range cursor state for range-dl
//!
//! Pure byte-offset bookkeeping for the download stepper: the current
//! `[start, end]` window, candidate computation for forward/backward steps,
//! bounds validation, and `Range` header construction. No I/O happens here;
//! the stepper commits a candidate only after its request succeeded.

use crate::core::error::{Error, Result};

/// Default number of bytes requested per step
pub const DEFAULT_CHUNK_SIZE: u64 = 1024;

/// An inclusive byte range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Validates caller-supplied absolute bounds for a resume step.
    ///
    /// Non-negativity is checked before ordering, matching the resume
    /// validation order (the opposite of a backward step).
    pub fn from_bounds(start: i64, end: i64) -> Result<Self> {
        if start < 0 || end < 0 {
            return Err(Error::InvalidRange {
                start,
                end,
                reason: "range start and end must be greater or equal to 0".to_string(),
            });
        }

        if start > end {
            return Err(Error::InvalidRange {
                start,
                end,
                reason: "range start must be less or equal to range end".to_string(),
            });
        }

        Ok(Self {
            start: start as u64,
            end: end as u64,
        })
    }
}

/// The range cursor: current window plus the fixed step width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    range: ByteRange,
    chunk_size: u64,
}

impl Cursor {
    /// Creates a cursor positioned at the first chunk, `[0, chunk_size - 1]`.
    pub fn new(chunk_size: u64) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidInput(
                "chunk size must be a positive number of bytes".to_string(),
            ));
        }

        Ok(Self {
            range: ByteRange {
                start: 0,
                end: chunk_size - 1,
            },
            chunk_size,
        })
    }

    pub fn range(&self) -> ByteRange {
        self.range
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Commits a validated range as the new cursor position.
    pub fn set(&mut self, range: ByteRange) {
        self.range = range;
    }

    /// Candidate window for a forward step: `[end + 1, end + chunk_size]`.
    ///
    /// Deliberately not clamped against any known content length. The chunk
    /// boundary is a client-side guess; the server truncates an out-of-bounds
    /// range and its response is authoritative.
    pub fn advanced(&self) -> ByteRange {
        ByteRange {
            start: self.range.end + 1,
            end: self.range.end + self.chunk_size,
        }
    }

    /// Candidate window for a backward step: both bounds moved down by one
    /// chunk. Ordering is checked before non-negativity. The cursor itself is
    /// untouched; a rejected candidate never becomes the current position.
    pub fn retreated(&self) -> Result<ByteRange> {
        let start = self.range.start as i64 - self.chunk_size as i64;
        let end = self.range.end as i64 - self.chunk_size as i64;

        if start > end {
            return Err(Error::InvalidRange {
                start,
                end,
                reason: "range start must be less or equal to range end".to_string(),
            });
        }

        if start < 0 || end < 0 {
            return Err(Error::InvalidRange {
                start,
                end,
                reason: "range start and end must be greater or equal to 0".to_string(),
            });
        }

        Ok(ByteRange {
            start: start as u64,
            end: end as u64,
        })
    }
}

/// Builds the `Range` header value for a window: one `<unit>=<start>-<end>`
/// term per accepted range unit, comma-joined. Only the single-unit `bytes`
/// form is ever exercised in practice.
pub fn fill_range_header(units: &[String], range: ByteRange) -> String {
    units
        .iter()
        .map(|unit| format!("{}={}-{}", unit, range.start, range.end))
        .collect::<Vec<_>>()
        .join(",")
}

/// Resource length learned from the capability probe.
///
/// An explicit tri-state: `Unknown` (no usable `Content-Length` seen yet) is
/// distinct from `Known(0)` (the server reported an empty resource).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentLength {
    #[default]
    Unknown,
    Known(u64),
}

impl ContentLength {
    /// True when the window's end offset reaches the final byte of a resource
    /// of known length. An unknown length never reports last; an empty
    /// resource always does.
    pub fn is_last(self, range: ByteRange) -> bool {
        match self {
            ContentLength::Unknown => false,
            ContentLength::Known(0) => true,
            ContentLength::Known(len) => range.end >= len - 1,
        }
    }
}
