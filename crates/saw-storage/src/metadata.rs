//! The table metadata document.
//!
//! Every saved table carries an uncompressed JSON sidecar named
//! `Metadata.json` next to its column files:
//!
//! ```json
//! { "name": "...", "rowCount": 0, "columnMetadata": [
//!     { "id": "...", "type": "FLOAT", "name": "..." }, ...
//! ] }
//! ```
//!
//! The order of `columnMetadata` is the canonical column order. String
//! columns additionally record `keyWidth` (in bits) and `uniqueCount`, which
//! the reader needs to parse the dictionary sections; the format is not
//! self-describing, so readers always consult metadata first.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use saw_columns::column::Column;
use saw_columns::dictionary::KeyWidth;
use saw_columns::table::Table;
use saw_columns::types::ColumnType;

use crate::error::{SawError, SawResult};

/// Fixed name of the metadata document inside a table directory.
pub const METADATA_FILE_NAME: &str = "Metadata.json";

/// Per-column record in the metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    /// Stable, filesystem-safe identifier; also the column's file name.
    pub id: String,
    /// The column's type tag.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// The column's display name.
    pub name: String,
    /// Dictionary key width in bits; present only for `STRING` columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_width: Option<u8>,
    /// Dictionary unique-value count; present only for `STRING` columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_count: Option<usize>,
}

impl ColumnMetadata {
    /// Captures the metadata record for a column at the given position.
    #[must_use]
    pub fn from_column(index: usize, column: &Column) -> Self {
        let (key_width, unique_count) = match column {
            Column::String(c) => (
                Some(c.dictionary().key_width().bits()),
                Some(c.dictionary().unique_count()),
            ),
            _ => (None, None),
        };
        Self {
            id: make_column_id(index, column.name()),
            column_type: column.column_type(),
            name: column.name().to_string(),
            key_width,
            unique_count,
        }
    }

    /// Returns the dictionary layout of a `STRING` column record.
    pub fn string_layout(&self) -> SawResult<(KeyWidth, usize)> {
        let bits = self.key_width.ok_or_else(|| {
            SawError::corrupt(format!("string column {} has no keyWidth in metadata", self.id))
        })?;
        let width = KeyWidth::from_bits(bits).ok_or_else(|| {
            SawError::corrupt(format!("string column {} has invalid keyWidth {}", self.id, bits))
        })?;
        let unique_count = self.unique_count.ok_or_else(|| {
            SawError::corrupt(format!("string column {} has no uniqueCount in metadata", self.id))
        })?;
        Ok((width, unique_count))
    }
}

/// The table-level metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    /// The table's name.
    pub name: String,
    /// Number of rows in every column.
    pub row_count: usize,
    /// Per-column records in canonical column order.
    pub column_metadata: Vec<ColumnMetadata>,
}

impl TableMetadata {
    /// Captures the metadata for a table.
    #[must_use]
    pub fn from_table(table: &Table) -> Self {
        Self {
            name: table.name().to_string(),
            row_count: table.row_count(),
            column_metadata: table
                .columns()
                .iter()
                .enumerate()
                .map(|(i, c)| ColumnMetadata::from_column(i, c))
                .collect(),
        }
    }

    /// Serializes the document to its JSON text.
    pub fn to_json(&self) -> SawResult<String> {
        serde_json::to_string(self)
            .map_err(|e| SawError::internal(format!("metadata serialization failed: {e}")))
    }

    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> SawResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| SawError::corrupt(format!("unparseable table metadata: {e}")))
    }

    /// Writes the document, uncompressed, to the given file path.
    pub fn write_to(&self, path: &Path) -> SawResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reads a document from the given file path.
    pub fn read_from(path: &Path) -> SawResult<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| {
            SawError::corrupt(format!("unparseable table metadata at {}: {e}", path.display()))
        })
    }
}

/// Maps a display name to a form that is a legal file name on POSIX and
/// Windows: ASCII alphanumerics, `-` and `_` pass through, everything else
/// becomes `_`. The mapping is deterministic, so repeated saves of the same
/// table produce identical names.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Builds the stable identifier for the column at the given position.
#[must_use]
pub fn make_column_id(index: usize, name: &str) -> String {
    format!("{}_{}", index, sanitize_name(name))
}
