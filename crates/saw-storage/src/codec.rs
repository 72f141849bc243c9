//! Per-type column codecs.
//!
//! Each column is persisted to its own file as a single Snappy-framed
//! stream. The decompressed payload carries no length prefix, row count or
//! type tag; the reader learns both the type and the row count from the
//! table metadata and decodes to end of stream.
//!
//! # Payload layouts
//!
//! Fixed-width types (`FLOAT`, `DOUBLE`, `INTEGER`, `SHORT`, `LONG`,
//! `BOOLEAN`, `LOCAL_DATE`, `LOCAL_TIME`, `LOCAL_DATE_TIME`, `INSTANT`):
//! exactly `rowCount` big-endian elements of the type's natural width, in
//! row order. Temporal types store their packed integer representation;
//! booleans store the tri-state byte verbatim.
//!
//! `TEXT`: `rowCount` length-prefixed strings, one per row.
//!
//! `STRING`: five back-to-back sections with no separators. With `U` the
//! dictionary's unique-value count and key width per metadata:
//!
//! 1. `U` dictionary keys
//! 2. `U` length-prefixed strings, co-indexed with section 1
//! 3. `U` dictionary keys again
//! 4. `U` 32-bit counts, co-indexed with section 3
//! 5. `rowCount` keys in row order
//!
//! The distinct values are few relative to the rows, so writing the keys
//! twice is cheap and lets the reader rebuild both maps without seeking.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use saw_columns::column::{
    BooleanColumn, Column, DateColumn, DateTimeColumn, DoubleColumn, FloatColumn, InstantColumn,
    IntColumn, LongColumn, ShortColumn, StringColumn, TextColumn, TimeColumn,
};
use saw_columns::dictionary::{Dictionary, DictionaryMap, KeyWidth};
use saw_columns::types::ColumnType;

use crate::error::{SawError, SawResult};
use crate::frame::{FrameReader, FrameWriter};
use crate::metadata::ColumnMetadata;

/// Close the current compression block after this many elements so that no
/// single block grows unboundedly on large columns. Not wire-visible.
const FLUSH_EVERY_ELEMENTS: usize = 20_000;

/// Encodes one column to the given file.
pub fn write_column(column: &Column, path: &Path) -> SawResult<()> {
    let file = File::create(path)?;
    let mut writer = FrameWriter::new(file);
    match column {
        Column::Float(c) => write_f32_values(&mut writer, c.values())?,
        Column::Double(c) => write_f64_values(&mut writer, c.values())?,
        Column::Integer(c) => write_i32_values(&mut writer, c.values())?,
        Column::Short(c) => write_i16_values(&mut writer, c.values())?,
        Column::Long(c) => write_i64_values(&mut writer, c.values())?,
        Column::Boolean(c) => write_i8_values(&mut writer, c.bytes())?,
        Column::Date(c) => write_i32_values(&mut writer, c.values())?,
        Column::Time(c) => write_i32_values(&mut writer, c.values())?,
        Column::DateTime(c) => write_i64_values(&mut writer, c.values())?,
        Column::Instant(c) => write_i64_values(&mut writer, c.values())?,
        Column::String(c) => write_dictionary(&mut writer, c.dictionary())?,
        Column::Text(c) => write_text(&mut writer, c.values())?,
    }
    writer.flush()
}

/// Decodes one column from the given file, using the metadata record for
/// the type tag, the dictionary layout, and the display name, and the
/// table-level `row_count` for the element count.
pub fn read_column(path: &Path, meta: &ColumnMetadata, row_count: usize) -> SawResult<Column> {
    let file = File::open(path)?;
    let mut reader = FrameReader::new(BufReader::new(file));
    let name = meta.name.clone();
    let column = match meta.column_type {
        ColumnType::Float => {
            Column::Float(FloatColumn::from_values(name, read_f32_values(&mut reader, row_count)?))
        }
        ColumnType::Double => Column::Double(DoubleColumn::from_values(
            name,
            read_f64_values(&mut reader, row_count)?,
        )),
        ColumnType::Integer => {
            Column::Integer(IntColumn::from_values(name, read_i32_values(&mut reader, row_count)?))
        }
        ColumnType::Short => {
            Column::Short(ShortColumn::from_values(name, read_i16_values(&mut reader, row_count)?))
        }
        ColumnType::Long => {
            Column::Long(LongColumn::from_values(name, read_i64_values(&mut reader, row_count)?))
        }
        ColumnType::Boolean => {
            Column::Boolean(BooleanColumn::from_bytes(name, read_i8_values(&mut reader, row_count)?))
        }
        ColumnType::LocalDate => {
            Column::Date(DateColumn::from_values(name, read_i32_values(&mut reader, row_count)?))
        }
        ColumnType::LocalTime => {
            Column::Time(TimeColumn::from_values(name, read_i32_values(&mut reader, row_count)?))
        }
        ColumnType::LocalDateTime => Column::DateTime(DateTimeColumn::from_values(
            name,
            read_i64_values(&mut reader, row_count)?,
        )),
        ColumnType::Instant => Column::Instant(InstantColumn::from_values(
            name,
            read_i64_values(&mut reader, row_count)?,
        )),
        ColumnType::String => {
            let (width, unique_count) = meta.string_layout()?;
            let dictionary = read_dictionary(&mut reader, width, unique_count, row_count)?;
            Column::String(StringColumn::from_dictionary(name, dictionary))
        }
        ColumnType::Text => {
            Column::Text(TextColumn::from_values(name, read_text(&mut reader, row_count)?))
        }
    };
    reader.expect_end()?;
    Ok(column)
}

macro_rules! fixed_width_codec {
    ($write_fn:ident, $read_fn:ident, $elem:ty, $write:ident, $read:ident) => {
        fn $write_fn<W: Write>(writer: &mut FrameWriter<W>, values: &[$elem]) -> SawResult<()> {
            for (i, value) in values.iter().enumerate() {
                writer.$write(*value)?;
                if (i + 1) % FLUSH_EVERY_ELEMENTS == 0 {
                    writer.flush()?;
                }
            }
            Ok(())
        }

        fn $read_fn<R: Read>(reader: &mut FrameReader<R>, count: usize) -> SawResult<Vec<$elem>> {
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(reader.$read()?);
            }
            Ok(values)
        }
    };
}

fixed_width_codec!(write_i8_values, read_i8_values, i8, write_i8, read_i8);
fixed_width_codec!(write_i16_values, read_i16_values, i16, write_i16, read_i16);
fixed_width_codec!(write_i32_values, read_i32_values, i32, write_i32, read_i32);
fixed_width_codec!(write_i64_values, read_i64_values, i64, write_i64, read_i64);
fixed_width_codec!(write_f32_values, read_f32_values, f32, write_f32, read_f32);
fixed_width_codec!(write_f64_values, read_f64_values, f64, write_f64, read_f64);

fn write_text<W: Write>(writer: &mut FrameWriter<W>, values: &[String]) -> SawResult<()> {
    for (i, value) in values.iter().enumerate() {
        writer.write_utf(value)?;
        if (i + 1) % FLUSH_EVERY_ELEMENTS == 0 {
            writer.flush()?;
        }
    }
    Ok(())
}

fn read_text<R: Read>(reader: &mut FrameReader<R>, count: usize) -> SawResult<Vec<String>> {
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(reader.read_utf()?);
    }
    Ok(values)
}

fn write_dictionary<W: Write>(writer: &mut FrameWriter<W>, dictionary: &DictionaryMap) -> SawResult<()> {
    match dictionary {
        DictionaryMap::Byte(d) => write_byte_dictionary(writer, d),
        DictionaryMap::Short(d) => write_short_dictionary(writer, d),
        DictionaryMap::Int(d) => write_int_dictionary(writer, d),
    }
}

macro_rules! dictionary_codec {
    ($write_fn:ident, $read_fn:ident, $key:ty, $write_key:ident, $read_key:ident, $variant:ident) => {
        fn $write_fn<W: Write>(
            writer: &mut FrameWriter<W>,
            dictionary: &Dictionary<$key>,
        ) -> SawResult<()> {
            for key in dictionary.entries().keys() {
                writer.$write_key(*key)?;
            }
            for value in dictionary.entries().values() {
                writer.write_utf(value)?;
            }
            for key in dictionary.counts().keys() {
                writer.$write_key(*key)?;
            }
            for count in dictionary.counts().values() {
                writer.write_i32(*count)?;
            }
            for (i, key) in dictionary.values().iter().enumerate() {
                writer.$write_key(*key)?;
                if (i + 1) % FLUSH_EVERY_ELEMENTS == 0 {
                    writer.flush()?;
                }
            }
            Ok(())
        }

        fn $read_fn<R: Read>(
            reader: &mut FrameReader<R>,
            unique_count: usize,
            row_count: usize,
        ) -> SawResult<DictionaryMap> {
            let mut entry_keys = Vec::with_capacity(unique_count);
            for _ in 0..unique_count {
                entry_keys.push(reader.$read_key()?);
            }
            let mut entries = BTreeMap::new();
            for key in &entry_keys {
                entries.insert(*key, reader.read_utf()?);
            }
            if entries.len() != unique_count {
                return Err(SawError::corrupt(format!(
                    "dictionary declares {} unique values but entry keys collide",
                    unique_count
                )));
            }

            let mut count_keys = Vec::with_capacity(unique_count);
            for _ in 0..unique_count {
                count_keys.push(reader.$read_key()?);
            }
            let mut counts = BTreeMap::new();
            for key in &count_keys {
                counts.insert(*key, reader.read_i32()?);
            }
            if !counts.keys().eq(entries.keys()) {
                return Err(SawError::corrupt(
                    "dictionary count keys do not match entry keys",
                ));
            }

            let mut values = Vec::with_capacity(row_count);
            for _ in 0..row_count {
                values.push(reader.$read_key()?);
            }
            Ok(DictionaryMap::$variant(Dictionary::from_parts(
                entries, counts, values,
            )))
        }
    };
}

dictionary_codec!(write_byte_dictionary, read_byte_dictionary, i8, write_i8, read_i8, Byte);
dictionary_codec!(write_short_dictionary, read_short_dictionary, i16, write_i16, read_i16, Short);
dictionary_codec!(write_int_dictionary, read_int_dictionary, i32, write_i32, read_i32, Int);

fn read_dictionary<R: Read>(
    reader: &mut FrameReader<R>,
    width: KeyWidth,
    unique_count: usize,
    row_count: usize,
) -> SawResult<DictionaryMap> {
    match width {
        KeyWidth::Byte => read_byte_dictionary(reader, unique_count, row_count),
        KeyWidth::Short => read_short_dictionary(reader, unique_count, row_count),
        KeyWidth::Int => read_int_dictionary(reader, unique_count, row_count),
    }
}
