//! The closed registry of column types.
//!
//! Every column in a table carries exactly one of these tags. The uppercase
//! spelling of each tag is wire-visible: it appears in the `type` field of
//! the table metadata document and nowhere else on disk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a textual type tag does not name a known column type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown column type tag: {0}")]
pub struct UnknownColumnType(pub String);

/// The kind of scalar a column holds.
///
/// The set is closed: the on-disk format supports exactly these twelve tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    /// 32-bit IEEE-754 floating point.
    Float,
    /// 64-bit IEEE-754 floating point.
    Double,
    /// 32-bit signed integer.
    Integer,
    /// 16-bit signed integer.
    Short,
    /// 64-bit signed integer.
    Long,
    /// Tri-state boolean stored as one signed byte (true / false / missing).
    Boolean,
    /// Calendar date packed into a 32-bit integer.
    LocalDate,
    /// Wall time packed into a 32-bit integer.
    LocalTime,
    /// Date and time packed into a 64-bit integer.
    LocalDateTime,
    /// Epoch-based instant packed into a 64-bit integer.
    Instant,
    /// Dictionary-encoded string.
    String,
    /// Unbounded free text, one length-prefixed value per row.
    Text,
}

impl ColumnType {
    /// Every supported column type, in declaration order.
    pub const ALL: [ColumnType; 12] = [
        ColumnType::Float,
        ColumnType::Double,
        ColumnType::Integer,
        ColumnType::Short,
        ColumnType::Long,
        ColumnType::Boolean,
        ColumnType::LocalDate,
        ColumnType::LocalTime,
        ColumnType::LocalDateTime,
        ColumnType::Instant,
        ColumnType::String,
        ColumnType::Text,
    ];

    /// Returns the canonical uppercase spelling used in metadata.
    #[must_use]
    pub const fn tag_name(self) -> &'static str {
        match self {
            ColumnType::Float => "FLOAT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Integer => "INTEGER",
            ColumnType::Short => "SHORT",
            ColumnType::Long => "LONG",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::LocalDate => "LOCAL_DATE",
            ColumnType::LocalTime => "LOCAL_TIME",
            ColumnType::LocalDateTime => "LOCAL_DATE_TIME",
            ColumnType::Instant => "INSTANT",
            ColumnType::String => "STRING",
            ColumnType::Text => "TEXT",
        }
    }

    /// Returns the fixed element width in bytes, or `None` for the two
    /// variable-width tags (`STRING` and `TEXT`).
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            ColumnType::Boolean => Some(1),
            ColumnType::Short => Some(2),
            ColumnType::Float
            | ColumnType::Integer
            | ColumnType::LocalDate
            | ColumnType::LocalTime => Some(4),
            ColumnType::Double
            | ColumnType::Long
            | ColumnType::LocalDateTime
            | ColumnType::Instant => Some(8),
            ColumnType::String | ColumnType::Text => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

impl FromStr for ColumnType {
    type Err = UnknownColumnType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnType::ALL
            .iter()
            .copied()
            .find(|t| t.tag_name() == s)
            .ok_or_else(|| UnknownColumnType(s.to_string()))
    }
}
