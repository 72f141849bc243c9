//! # saw-storage
//!
//! Compressed column-oriented persistence for tabular data (the "saw"
//! format).
//!
//! A saved table is a directory: an uncompressed JSON metadata document
//! (`Metadata.json`) plus one Snappy-framed file per column, named by the
//! column's stable id. Columns are written and read concurrently, one
//! worker per column, because they share nothing but the directory.
//!
//! ## Example
//!
//! ```rust,no_run
//! use saw_columns::{IntColumn, Table};
//! use saw_storage::{read_table, save_table};
//!
//! fn main() -> saw_storage::SawResult<()> {
//!     let mut table = Table::new("measurements");
//!     table.add_column(IntColumn::from_values("sample", vec![4, 8, 15]));
//!
//!     let dir = save_table("data/tables", &table)?;
//!     let reloaded = read_table(&dir)?;
//!     assert_eq!(reloaded, table);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod error;
pub mod frame;
pub mod metadata;
mod pool;
pub mod reader;
pub mod writer;

pub use config::{SawConfig, DEFAULT_WORKER_POOL_SIZE};
pub use error::{SawError, SawResult};
pub use metadata::{ColumnMetadata, TableMetadata, METADATA_FILE_NAME};
pub use reader::{read_table, read_table_with};
pub use writer::{save_table, save_table_with};
