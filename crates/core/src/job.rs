//! Job index domain and the values stored against it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::fibonacci::fibonacci;

/// Largest index the gateway accepts.
pub const MAX_INDEX: u32 = 40;

/// Sentinel written to the state store when a job is accepted.
pub const PLACEHOLDER_VALUE: &str = "Nothing yet!";

// ---------------------------------------------------------------------------
// JobIndex
// ---------------------------------------------------------------------------

/// A validated job index in `0..=MAX_INDEX`.
///
/// Construct with [`JobIndex::parse`] (request strings, channel payloads)
/// or [`JobIndex::new`] (already-numeric input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobIndex(u32);

impl JobIndex {
    /// Validate a numeric index against the accepted range.
    pub fn new(index: i64) -> Result<Self, CoreError> {
        if !(0..=i64::from(MAX_INDEX)).contains(&index) {
            return Err(CoreError::OutOfRange { index });
        }
        Ok(Self(index as u32))
    }

    /// Parse a decimal string (an optional leading sign is allowed).
    ///
    /// Non-numeric input is `InvalidInput`; a number outside the accepted
    /// range, negative values included, is `OutOfRange`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let index: i64 = raw
            .parse()
            .map_err(|_| CoreError::InvalidInput(raw.to_string()))?;
        Self::new(index)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Canonical state store key: the plain decimal form.
    pub fn key(self) -> String {
        self.0.to_string()
    }

    /// Compute the result value for this index.
    pub fn compute(self) -> u64 {
        fibonacci(self.0)
    }
}

impl fmt::Display for JobIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SlotValue
// ---------------------------------------------------------------------------

/// What the state store holds for one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotValue {
    /// Accepted, not yet computed.
    Pending,
    /// The computed result.
    Ready(u64),
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotValue::Pending => f.write_str(PLACEHOLDER_VALUE),
            SlotValue::Ready(value) => write!(f, "{value}"),
        }
    }
}

// ---------------------------------------------------------------------------
// AcceptedJob
// ---------------------------------------------------------------------------

/// One durable log row as exposed by the query surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedJob {
    pub number: i32,
}

impl From<JobIndex> for AcceptedJob {
    fn from(index: JobIndex) -> Self {
        Self {
            number: index.value() as i32,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
