//! Dictionary maps backing string columns.
//!
//! A string column does not store its values row by row. It stores every
//! distinct string once, keyed by a small integer, together with the per-key
//! occurrence count and the per-row key sequence. The integer width grows
//! with cardinality: a dictionary starts with byte keys and is promoted to
//! short and then int keys as distinct values accumulate.

use std::collections::{BTreeMap, HashMap};

/// The integer width of a dictionary's keys. Wire-visible: the reader must
/// use the same width the writer used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyWidth {
    /// 8-bit keys.
    Byte,
    /// 16-bit keys.
    Short,
    /// 32-bit keys.
    Int,
}

impl KeyWidth {
    /// Returns the width in bits (8, 16 or 32).
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            KeyWidth::Byte => 8,
            KeyWidth::Short => 16,
            KeyWidth::Int => 32,
        }
    }

    /// Looks a width up from its bit count.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(KeyWidth::Byte),
            16 => Some(KeyWidth::Short),
            32 => Some(KeyWidth::Int),
            _ => None,
        }
    }
}

/// An integer type usable as a dictionary key.
pub trait DictKey: Copy + Ord {
    /// How many distinct values a dictionary with this key type can hold.
    const CAPACITY: usize;

    /// Converts an entry index (assigned 0, 1, 2, ...) to a key.
    fn from_index(index: usize) -> Self;
}

impl DictKey for i8 {
    const CAPACITY: usize = i8::MAX as usize + 1;

    fn from_index(index: usize) -> Self {
        index as i8
    }
}

impl DictKey for i16 {
    const CAPACITY: usize = i16::MAX as usize + 1;

    fn from_index(index: usize) -> Self {
        index as i16
    }
}

impl DictKey for i32 {
    const CAPACITY: usize = i32::MAX as usize + 1;

    fn from_index(index: usize) -> Self {
        index as i32
    }
}

/// The three co-indexed projections of a string column at one key width.
///
/// `entries` maps each key to its distinct string, `counts` maps each key to
/// its number of occurrences, and `values` is the full per-row key sequence.
/// The key sets of `entries` and `counts` are always identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary<K: DictKey> {
    entries: BTreeMap<K, String>,
    counts: BTreeMap<K, i32>,
    values: Vec<K>,
    lookup: HashMap<String, K>,
}

impl<K: DictKey> Default for Dictionary<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: DictKey> Dictionary<K> {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            counts: BTreeMap::new(),
            values: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Rebuilds a dictionary from its persisted projections.
    ///
    /// The caller is responsible for handing over projections that belong
    /// together; this is how the reader reconstitutes a column.
    #[must_use]
    pub fn from_parts(entries: BTreeMap<K, String>, counts: BTreeMap<K, i32>, values: Vec<K>) -> Self {
        let lookup = entries.iter().map(|(k, v)| (v.clone(), *k)).collect();
        Self {
            entries,
            counts,
            values,
            lookup,
        }
    }

    /// Appends one row. Returns `false` without changing anything when the
    /// value is new and the key space is exhausted; the caller then promotes
    /// to a wider key type and retries.
    pub fn try_append(&mut self, value: &str) -> bool {
        if let Some(&key) = self.lookup.get(value) {
            if let Some(count) = self.counts.get_mut(&key) {
                *count += 1;
            }
            self.values.push(key);
            return true;
        }
        let index = self.entries.len();
        if index >= K::CAPACITY {
            return false;
        }
        let key = K::from_index(index);
        self.entries.insert(key, value.to_string());
        self.counts.insert(key, 1);
        self.lookup.insert(value.to_string(), key);
        self.values.push(key);
        true
    }

    /// The key-to-string projection.
    #[must_use]
    pub fn entries(&self) -> &BTreeMap<K, String> {
        &self.entries
    }

    /// The key-to-occurrence-count projection.
    #[must_use]
    pub fn counts(&self) -> &BTreeMap<K, i32> {
        &self.counts
    }

    /// The per-row key sequence.
    #[must_use]
    pub fn values(&self) -> &[K] {
        &self.values
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the dictionary holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct values.
    #[must_use]
    pub fn unique_count(&self) -> usize {
        self.entries.len()
    }

    /// The string at the given row, if in range.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&str> {
        self.values
            .get(row)
            .and_then(|key| self.entries.get(key))
            .map(String::as_str)
    }
}

fn widened<A, B>(src: Dictionary<A>) -> Dictionary<B>
where
    A: DictKey + Into<B>,
    B: DictKey,
{
    Dictionary {
        entries: src.entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        counts: src.counts.into_iter().map(|(k, c)| (k.into(), c)).collect(),
        values: src.values.into_iter().map(Into::into).collect(),
        lookup: src.lookup.into_iter().map(|(v, k)| (v, k.into())).collect(),
    }
}

/// A dictionary at one of the three supported key widths.
///
/// The variant is the width: encoding and decoding dispatch on it, and it is
/// preserved verbatim across a save/read round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum DictionaryMap {
    /// Dictionary with 8-bit keys.
    Byte(Dictionary<i8>),
    /// Dictionary with 16-bit keys.
    Short(Dictionary<i16>),
    /// Dictionary with 32-bit keys.
    Int(Dictionary<i32>),
}

impl Default for DictionaryMap {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryMap {
    /// Creates an empty dictionary with byte keys.
    #[must_use]
    pub fn new() -> Self {
        DictionaryMap::Byte(Dictionary::new())
    }

    /// The key width of this dictionary.
    #[must_use]
    pub fn key_width(&self) -> KeyWidth {
        match self {
            DictionaryMap::Byte(_) => KeyWidth::Byte,
            DictionaryMap::Short(_) => KeyWidth::Short,
            DictionaryMap::Int(_) => KeyWidth::Int,
        }
    }

    /// Appends one row, promoting to a wider key type when the current key
    /// space is exhausted.
    pub fn append(&mut self, value: &str) {
        loop {
            let appended = match self {
                DictionaryMap::Byte(d) => d.try_append(value),
                DictionaryMap::Short(d) => d.try_append(value),
                DictionaryMap::Int(d) => d.try_append(value),
            };
            if appended {
                return;
            }
            self.promote();
        }
    }

    fn promote(&mut self) {
        let current = std::mem::take(self);
        *self = match current {
            DictionaryMap::Byte(d) => DictionaryMap::Short(widened(d)),
            DictionaryMap::Short(d) => DictionaryMap::Int(widened(d)),
            // An int dictionary cannot overflow in practice: the row count
            // limit is reached long before 2^31 distinct values.
            DictionaryMap::Int(d) => DictionaryMap::Int(d),
        };
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            DictionaryMap::Byte(d) => d.len(),
            DictionaryMap::Short(d) => d.len(),
            DictionaryMap::Int(d) => d.len(),
        }
    }

    /// True when the dictionary holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct values.
    #[must_use]
    pub fn unique_count(&self) -> usize {
        match self {
            DictionaryMap::Byte(d) => d.unique_count(),
            DictionaryMap::Short(d) => d.unique_count(),
            DictionaryMap::Int(d) => d.unique_count(),
        }
    }

    /// The string at the given row, if in range.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&str> {
        match self {
            DictionaryMap::Byte(d) => d.get(row),
            DictionaryMap::Short(d) => d.get(row),
            DictionaryMap::Int(d) => d.get(row),
        }
    }
}
