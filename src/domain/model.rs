use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical hologram code: alphabetic prefix, zero padding, numeric suffix,
/// always exactly the canonicalizer's width.
///
/// Keys are only produced by [`crate::core::canonicalizer::Canonicalizer`], so
/// two keys of the same width order lexicographically the same way their
/// `(prefix, value)` pairs do.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

/// Prefix and numeric value recovered from a [`NormalizedKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParts<'a> {
    pub prefix: &'a str,
    pub value: u128,
}

impl NormalizedKey {
    pub(crate) fn from_canonical(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn prefix(&self) -> &str {
        let end = self
            .0
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(self.0.len());
        &self.0[..end]
    }

    pub fn split(&self) -> KeyParts<'_> {
        let prefix = self.prefix();
        let value = self.0[prefix.len()..]
            .bytes()
            .filter(u8::is_ascii_digit)
            .fold(0u128, |acc, b| {
                acc.saturating_mul(10).saturating_add(u128::from(b - b'0'))
            });
        KeyParts { prefix, value }
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One row of the serials sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerialRange {
    pub row_id: u64,
    pub reference: String,
    pub description: String,
    pub start: NormalizedKey,
    pub end: NormalizedKey,
    pub issued_on: NaiveDate,
}

impl SerialRange {
    /// Inclusive on both bounds.
    pub fn contains(&self, key: &NormalizedKey) -> bool {
        self.start <= *key && *key <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassificationStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAILURE")]
    Failure,
    #[serde(rename = "DOUBLE")]
    Double,
    #[serde(rename = "NOT-FOUND")]
    NotFound,
}

impl ClassificationStatus {
    pub const ALL: [ClassificationStatus; 4] = [
        ClassificationStatus::Ok,
        ClassificationStatus::Failure,
        ClassificationStatus::Double,
        ClassificationStatus::NotFound,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationStatus::Ok => "OK",
            ClassificationStatus::Failure => "FAILURE",
            ClassificationStatus::Double => "DOUBLE",
            ClassificationStatus::NotFound => "NOT-FOUND",
        }
    }
}

impl fmt::Display for ClassificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub status: ClassificationStatus,
    /// The code exactly as the sender typed it.
    pub code: String,
    pub key: NormalizedKey,
    pub message: String,
    /// Set only when exactly one range matched.
    pub matched: Option<SerialRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditFinding {
    PrefixMismatch {
        row_id: u64,
        start_prefix: String,
        end_prefix: String,
    },
    ReversedRange {
        row_id: u64,
    },
    Collision {
        prefix: String,
        first: u64,
        second: u64,
    },
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditFinding::PrefixMismatch { row_id, .. } => write!(
                f,
                "Start serial and end serial of row {} start with different letters.",
                row_id
            ),
            AuditFinding::ReversedRange { row_id } => write!(
                f,
                "Start serial of row {} is greater than its end serial.",
                row_id
            ),
            AuditFinding::Collision { first, second, .. } => write!(
                f,
                "There is a collision between row ids {} and {}.",
                first, second
            ),
        }
    }
}

/// One processed inbound message, as kept by the transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub status: ClassificationStatus,
    pub sender: String,
    pub message: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub ok: usize,
    pub failure: usize,
    pub double: usize,
    pub not_found: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: ClassificationStatus) {
        match status {
            ClassificationStatus::Ok => self.ok += 1,
            ClassificationStatus::Failure => self.failure += 1,
            ClassificationStatus::Double => self.double += 1,
            ClassificationStatus::NotFound => self.not_found += 1,
        }
    }

    pub fn get(&self, status: ClassificationStatus) -> usize {
        match status {
            ClassificationStatus::Ok => self.ok,
            ClassificationStatus::Failure => self.failure,
            ClassificationStatus::Double => self.double,
            ClassificationStatus::NotFound => self.not_found,
        }
    }

    pub fn total(&self) -> usize {
        self.ok + self.failure + self.double + self.not_found
    }
}
