//! # saw-columns
//!
//! In-memory tabular data model for the saw column store.
//!
//! This crate provides the structures the persistence layer operates on:
//!
//! - **Types**: the closed registry of column type tags ([`ColumnType`])
//! - **Columns**: one typed column per tag and the [`Column`] sum type
//! - **Dictionary**: the key-width-aware dictionary behind string columns
//! - **Table**: the ordered collection of equal-length columns
//!
//! ## Example
//!
//! ```rust
//! use saw_columns::{IntColumn, StringColumn, Table};
//!
//! let mut strings = StringColumn::new("city");
//! strings.append("Oslo");
//! strings.append("Lima");
//!
//! let mut table = Table::new("places");
//! table.add_column(IntColumn::from_values("id", vec![1, 2]));
//! table.add_column(strings);
//! assert_eq!(table.row_count(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod column;
pub mod dictionary;
pub mod table;
pub mod types;

pub use column::{
    BooleanColumn, Column, DateColumn, DateTimeColumn, DoubleColumn, FloatColumn, InstantColumn,
    IntColumn, LongColumn, ShortColumn, StringColumn, TextColumn, TimeColumn,
};
pub use dictionary::{DictKey, Dictionary, DictionaryMap, KeyWidth};
pub use table::Table;
pub use types::{ColumnType, UnknownColumnType};
