//! Typed columns and the column sum type.
//!
//! Each column is a named, ordered sequence of scalars of one type. The
//! numeric and temporal columns store their packed primitive representation
//! directly; what a missing value looks like is a per-type sentinel chosen
//! here (persistence preserves the bytes verbatim and never interprets
//! sentinels).

use crate::dictionary::DictionaryMap;
use crate::types::ColumnType;

macro_rules! impl_primitive_column {
    ($(#[$doc:meta])* $name:ident, $elem:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            name: String,
            data: Vec<$elem>,
        }

        impl $name {
            /// Creates an empty column with the given display name.
            #[must_use]
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    data: Vec::new(),
                }
            }

            /// Creates a column from existing values.
            #[must_use]
            pub fn from_values(name: impl Into<String>, data: Vec<$elem>) -> Self {
                Self {
                    name: name.into(),
                    data,
                }
            }

            /// The column's display name.
            #[must_use]
            pub fn name(&self) -> &str {
                &self.name
            }

            /// Appends one value.
            pub fn append(&mut self, value: $elem) {
                self.data.push(value);
            }

            /// The value at the given row, if in range.
            #[must_use]
            pub fn get(&self, row: usize) -> Option<$elem> {
                self.data.get(row).copied()
            }

            /// All values in row order.
            #[must_use]
            pub fn values(&self) -> &[$elem] {
                &self.data
            }

            /// Number of rows.
            #[must_use]
            pub fn len(&self) -> usize {
                self.data.len()
            }

            /// True when the column holds no rows.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.data.is_empty()
            }

            /// Iterates over the values in row order.
            pub fn iter(&self) -> impl Iterator<Item = $elem> + '_ {
                self.data.iter().copied()
            }
        }
    };
}

impl_primitive_column!(
    /// 32-bit floating point column.
    FloatColumn,
    f32
);
impl_primitive_column!(
    /// 64-bit floating point column.
    DoubleColumn,
    f64
);
impl_primitive_column!(
    /// 32-bit signed integer column.
    IntColumn,
    i32
);
impl_primitive_column!(
    /// 16-bit signed integer column.
    ShortColumn,
    i16
);
impl_primitive_column!(
    /// 64-bit signed integer column.
    LongColumn,
    i64
);
impl_primitive_column!(
    /// Calendar date column; each element is the packed 32-bit date.
    DateColumn,
    i32
);
impl_primitive_column!(
    /// Wall-time column; each element is the packed 32-bit time.
    TimeColumn,
    i32
);
impl_primitive_column!(
    /// Date-time column; each element is the packed 64-bit date-time.
    DateTimeColumn,
    i64
);
impl_primitive_column!(
    /// Instant column; each element is the packed 64-bit epoch instant.
    InstantColumn,
    i64
);

/// Tri-state boolean column stored as one signed byte per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanColumn {
    name: String,
    data: Vec<i8>,
}

impl BooleanColumn {
    /// Byte representing `true`.
    pub const TRUE: i8 = 1;
    /// Byte representing `false`.
    pub const FALSE: i8 = 0;
    /// Byte representing a missing value.
    pub const MISSING: i8 = i8::MIN;

    /// Creates an empty column with the given display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
        }
    }

    /// Creates a column from existing tri-state bytes.
    #[must_use]
    pub fn from_bytes(name: impl Into<String>, data: Vec<i8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// The column's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends `true` or `false`.
    pub fn append(&mut self, value: bool) {
        self.data.push(if value { Self::TRUE } else { Self::FALSE });
    }

    /// Appends a missing value.
    pub fn append_missing(&mut self) {
        self.data.push(Self::MISSING);
    }

    /// The tri-state byte at the given row, if in range.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<i8> {
        self.data.get(row).copied()
    }

    /// All tri-state bytes in row order.
    #[must_use]
    pub fn bytes(&self) -> &[i8] {
        &self.data
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the column holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Dictionary-encoded string column.
#[derive(Debug, Clone, PartialEq)]
pub struct StringColumn {
    name: String,
    dictionary: DictionaryMap,
}

impl StringColumn {
    /// Creates an empty column with the given display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dictionary: DictionaryMap::new(),
        }
    }

    /// Creates a column around an existing dictionary.
    #[must_use]
    pub fn from_dictionary(name: impl Into<String>, dictionary: DictionaryMap) -> Self {
        Self {
            name: name.into(),
            dictionary,
        }
    }

    /// The column's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends one value, interning it in the dictionary.
    pub fn append(&mut self, value: &str) {
        self.dictionary.append(value);
    }

    /// The value at the given row, if in range.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&str> {
        self.dictionary.get(row)
    }

    /// The backing dictionary.
    #[must_use]
    pub fn dictionary(&self) -> &DictionaryMap {
        &self.dictionary
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dictionary.len()
    }

    /// True when the column holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }
}

/// Free-text column; every row owns its own string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextColumn {
    name: String,
    data: Vec<String>,
}

impl TextColumn {
    /// Creates an empty column with the given display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
        }
    }

    /// Creates a column from existing values.
    #[must_use]
    pub fn from_values(name: impl Into<String>, data: Vec<String>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// The column's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends one value.
    pub fn append(&mut self, value: impl Into<String>) {
        self.data.push(value.into());
    }

    /// The value at the given row, if in range.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&str> {
        self.data.get(row).map(String::as_str)
    }

    /// All values in row order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.data
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the column holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A column of any supported type.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// 32-bit floating point.
    Float(FloatColumn),
    /// 64-bit floating point.
    Double(DoubleColumn),
    /// 32-bit signed integer.
    Integer(IntColumn),
    /// 16-bit signed integer.
    Short(ShortColumn),
    /// 64-bit signed integer.
    Long(LongColumn),
    /// Tri-state boolean.
    Boolean(BooleanColumn),
    /// Packed calendar date.
    Date(DateColumn),
    /// Packed wall time.
    Time(TimeColumn),
    /// Packed date-time.
    DateTime(DateTimeColumn),
    /// Packed epoch instant.
    Instant(InstantColumn),
    /// Dictionary-encoded string.
    String(StringColumn),
    /// Free text.
    Text(TextColumn),
}

impl Column {
    /// The column's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Column::Float(c) => c.name(),
            Column::Double(c) => c.name(),
            Column::Integer(c) => c.name(),
            Column::Short(c) => c.name(),
            Column::Long(c) => c.name(),
            Column::Boolean(c) => c.name(),
            Column::Date(c) => c.name(),
            Column::Time(c) => c.name(),
            Column::DateTime(c) => c.name(),
            Column::Instant(c) => c.name(),
            Column::String(c) => c.name(),
            Column::Text(c) => c.name(),
        }
    }

    /// The column's type tag.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Float(_) => ColumnType::Float,
            Column::Double(_) => ColumnType::Double,
            Column::Integer(_) => ColumnType::Integer,
            Column::Short(_) => ColumnType::Short,
            Column::Long(_) => ColumnType::Long,
            Column::Boolean(_) => ColumnType::Boolean,
            Column::Date(_) => ColumnType::LocalDate,
            Column::Time(_) => ColumnType::LocalTime,
            Column::DateTime(_) => ColumnType::LocalDateTime,
            Column::Instant(_) => ColumnType::Instant,
            Column::String(_) => ColumnType::String,
            Column::Text(_) => ColumnType::Text,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Float(c) => c.len(),
            Column::Double(c) => c.len(),
            Column::Integer(c) => c.len(),
            Column::Short(c) => c.len(),
            Column::Long(c) => c.len(),
            Column::Boolean(c) => c.len(),
            Column::Date(c) => c.len(),
            Column::Time(c) => c.len(),
            Column::DateTime(c) => c.len(),
            Column::Instant(c) => c.len(),
            Column::String(c) => c.len(),
            Column::Text(c) => c.len(),
        }
    }

    /// True when the column holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! impl_from_column {
    ($variant:ident, $inner:ty) => {
        impl From<$inner> for Column {
            fn from(column: $inner) -> Self {
                Column::$variant(column)
            }
        }
    };
}

impl_from_column!(Float, FloatColumn);
impl_from_column!(Double, DoubleColumn);
impl_from_column!(Integer, IntColumn);
impl_from_column!(Short, ShortColumn);
impl_from_column!(Long, LongColumn);
impl_from_column!(Boolean, BooleanColumn);
impl_from_column!(Date, DateColumn);
impl_from_column!(Time, TimeColumn);
impl_from_column!(DateTime, DateTimeColumn);
impl_from_column!(Instant, InstantColumn);
impl_from_column!(String, StringColumn);
impl_from_column!(Text, TextColumn);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::KeyWidth;

    #[test]
    fn test_primitive_column_basics() {
        let mut col = IntColumn::new("ints");
        col.append(3);
        col.append(-7);
        assert_eq!(col.len(), 2);
        assert_eq!(col.get(1), Some(-7));
        assert_eq!(col.get(2), None);
        assert_eq!(col.values(), &[3, -7]);
        assert_eq!(col.iter().collect::<Vec<_>>(), vec![3, -7]);
    }

    #[test]
    fn test_boolean_tri_state() {
        let mut col = BooleanColumn::new("flags");
        col.append(true);
        col.append(false);
        col.append_missing();
        assert_eq!(col.bytes(), &[1, 0, i8::MIN]);
    }

    #[test]
    fn test_string_column_interns() {
        let mut col = StringColumn::new("strings");
        col.append("x");
        col.append("x");
        col.append("y");
        assert_eq!(col.len(), 3);
        assert_eq!(col.get(0), Some("x"));
        assert_eq!(col.dictionary().unique_count(), 2);
        assert_eq!(col.dictionary().key_width(), KeyWidth::Byte);
    }

    #[test]
    fn test_column_dispatch() {
        let col: Column = DateColumn::from_values("d", vec![20_240_101]).into();
        assert_eq!(col.column_type(), ColumnType::LocalDate);
        assert_eq!(col.name(), "d");
        assert_eq!(col.len(), 1);
        assert!(!col.is_empty());
    }
}
