//! End-to-end save/read tests over real directories.

use std::fs;

use tempfile::TempDir;

use saw_columns::column::{
    BooleanColumn, Column, DateColumn, DateTimeColumn, DoubleColumn, FloatColumn, InstantColumn,
    IntColumn, LongColumn, ShortColumn, StringColumn, TextColumn, TimeColumn,
};
use saw_columns::dictionary::KeyWidth;
use saw_columns::table::Table;
use saw_columns::types::ColumnType;
use saw_storage::{
    read_table, read_table_with, save_table, save_table_with, SawConfig, SawError,
    METADATA_FILE_NAME,
};

fn string_column(name: &str, values: &[&str]) -> StringColumn {
    let mut column = StringColumn::new(name);
    for value in values {
        column.append(value);
    }
    column
}

/// The five-column fixture of the writer's original test suite: float,
/// date, string, long and boolean columns with five rows each.
fn five_column_table() -> Table {
    let mut float = FloatColumn::new("float");
    let mut date = DateColumn::new("date");
    let mut string = StringColumn::new("string");
    let mut long = LongColumn::new("long");
    let mut boolean = BooleanColumn::new("bool");
    for i in 0..5 {
        float.append(i as f32);
        date.append(20_240_100 + i as i32);
        string.append(&format!("Category {i}"));
        long.append(i as i64);
        boolean.append(i % 2 == 0);
    }

    let mut table = Table::new("t");
    table.add_column(float);
    table.add_column(date);
    table.add_column(string);
    table.add_column(long);
    table.add_column(boolean);
    table
}

#[test]
fn test_write_table_round_trip() {
    let tmp = TempDir::new().unwrap();
    let table = five_column_table();

    let dir = save_table(tmp.path().join("zeta"), &table).unwrap();
    let reloaded = read_table(&dir).unwrap();

    assert_eq!(reloaded.column_count(), table.column_count());
    assert_eq!(reloaded.row_count(), table.row_count());
    assert_eq!(reloaded.name(), table.name());

    let Some(Column::String(strings)) = reloaded.column(2) else {
        panic!("expected a string column at position 2");
    };
    for i in 0..table.row_count() {
        assert_eq!(strings.get(i), Some(format!("Category {i}").as_str()));
    }
    let Some(Column::Boolean(booleans)) = reloaded.column(4) else {
        panic!("expected a boolean column at position 4");
    };
    for i in 0..table.row_count() {
        assert_eq!(booleans.get(i), Some(if i % 2 == 0 { 1 } else { 0 }));
    }
    assert_eq!(reloaded, table);
}

#[test]
fn test_round_trip_every_column_type() {
    let mut boolean = BooleanColumn::new("boolean");
    boolean.append(true);
    boolean.append(false);
    boolean.append_missing();

    let mut table = Table::new("all types");
    table.add_column(FloatColumn::from_values("float", vec![1.5, -2.25, 0.0]));
    table.add_column(DoubleColumn::from_values("double", vec![f64::MIN, 0.125, 9.9]));
    table.add_column(IntColumn::from_values("integer", vec![i32::MIN, 0, i32::MAX]));
    table.add_column(ShortColumn::from_values("short", vec![i16::MIN, -1, i16::MAX]));
    table.add_column(LongColumn::from_values("long", vec![i64::MIN, 7, i64::MAX]));
    table.add_column(boolean);
    table.add_column(DateColumn::from_values("date", vec![0, 20_200_229, 20_991_231]));
    table.add_column(TimeColumn::from_values("time", vec![0, 86_399, 43_200]));
    table.add_column(DateTimeColumn::from_values(
        "date_time",
        vec![i64::MIN, 0, 20_240_101_120_000],
    ));
    table.add_column(InstantColumn::from_values(
        "instant",
        vec![-1, 1_700_000_000_000, 1_800_000_000_123],
    ));
    table.add_column(string_column("string", &["a", "b", "a"]));
    table.add_column(TextColumn::from_values(
        "text",
        vec!["first row".into(), "".into(), "emoji \u{1F600} and nul \u{0}".into()],
    ));

    let tmp = TempDir::new().unwrap();
    let dir = save_table(tmp.path(), &table).unwrap();
    let reloaded = read_table(&dir).unwrap();
    assert_eq!(reloaded, table);

    for (original, read_back) in table.columns().iter().zip(reloaded.columns()) {
        assert_eq!(original.column_type(), read_back.column_type());
        assert_eq!(original.name(), read_back.name());
    }
}

#[test]
fn test_write_table_twice() {
    let tmp = TempDir::new().unwrap();
    let table = five_column_table();

    save_table(tmp.path().join("mytables2"), &table).unwrap();
    let first = read_table(tmp.path().join("mytables2").join("t")).unwrap();

    let dir = save_table(tmp.path().join("mytables2"), &table).unwrap();
    let second = read_table(&dir).unwrap();

    assert_eq!(second.name(), table.name());
    assert_eq!(second.row_count(), table.row_count());
    assert_eq!(second.column_count(), table.column_count());
    assert_eq!(second, first);
}

#[test]
fn test_overwrite_leaves_no_residue() {
    let tmp = TempDir::new().unwrap();

    let mut wide = Table::new("shared name");
    wide.add_column(IntColumn::from_values("a", vec![1]));
    wide.add_column(IntColumn::from_values("b", vec![2]));
    wide.add_column(IntColumn::from_values("c", vec![3]));
    save_table(tmp.path(), &wide).unwrap();

    let mut narrow = Table::new("shared name");
    narrow.add_column(LongColumn::from_values("only", vec![42]));
    let dir = save_table(tmp.path(), &narrow).unwrap();

    let reloaded = read_table(&dir).unwrap();
    assert_eq!(reloaded, narrow);

    let mut file_names: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    file_names.sort();
    assert_eq!(file_names, vec!["0_only".to_string(), METADATA_FILE_NAME.to_string()]);
}

#[test]
fn test_save_empty_table() {
    let tmp = TempDir::new().unwrap();
    let empty = Table::new("empty table");

    let dir = save_table(tmp.path(), &empty).unwrap();

    let file_names: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(file_names, vec![METADATA_FILE_NAME.to_string()]);

    let reloaded = read_table(&dir).unwrap();
    assert_eq!(reloaded, empty);
    assert_eq!(reloaded.column_count(), 0);
    assert_eq!(reloaded.row_count(), 0);
}

#[test]
fn test_save_no_data_table() {
    let tmp = TempDir::new().unwrap();
    let mut no_data = Table::new("no data");
    no_data.add_column(IntColumn::new("empty int"));
    no_data.add_column(DoubleColumn::new("empty double"));

    let dir = save_table(tmp.path(), &no_data).unwrap();
    let reloaded = read_table(&dir).unwrap();

    assert_eq!(reloaded, no_data);
    assert_eq!(reloaded.column_count(), 2);
    assert_eq!(reloaded.row_count(), 0);
}

#[test]
fn test_save_instants() {
    let base = 1_690_000_000_000_i64;
    let mut instants = InstantColumn::new("Instants");
    let mut index = IntColumn::new("index1");
    for i in 0..100 {
        index.append(i);
        instants.append(base + i64::from(i) * 1_000);
    }

    let mut table = Table::new("Instants");
    table.add_column(index);
    table.add_column(instants);

    let tmp = TempDir::new().unwrap();
    let dir = save_table(tmp.path(), &table).unwrap();
    let reloaded = read_table(&dir).unwrap();

    assert_eq!(reloaded.column(0).unwrap().len(), 100);
    assert_eq!(reloaded.column(1).unwrap().column_type(), ColumnType::Instant);
    assert_eq!(reloaded.row_count(), table.row_count());
    let Some(Column::Instant(column)) = reloaded.column(1) else {
        panic!("expected an instant column");
    };
    assert_eq!(column.get(20), Some(base + 20_000));
}

#[test]
fn test_save_ints_and_text() {
    let mut index = IntColumn::new("index1");
    let mut text = TextColumn::new("text1");
    for i in 0..100 {
        index.append(i + 300);
        text.append(format!("{}", i + 300));
    }

    let mut table = Table::new("Ints and text");
    table.add_column(index);
    table.add_column(text);

    let tmp = TempDir::new().unwrap();
    let dir = save_table(tmp.path(), &table).unwrap();
    let reloaded = read_table(&dir).unwrap();

    assert!(reloaded.column(1).unwrap().len() > 0);
    assert_eq!(reloaded.column(1).unwrap().column_type(), ColumnType::Text);
    assert_eq!(reloaded.row_count(), table.row_count());
    assert_eq!(reloaded, table);
}

#[test]
fn test_string_dictionary_preserved_at_every_width() {
    let tmp = TempDir::new().unwrap();

    // Byte keys: a handful of uniques.
    let byte_values: Vec<String> = (0..500).map(|i| format!("cat {}", i % 5)).collect();
    // Short keys: more uniques than a byte dictionary can hold.
    let short_values: Vec<String> = (0..500).map(|i| format!("cat {}", i % 300)).collect();
    // Int keys: more uniques than a short dictionary can hold.
    let int_values: Vec<String> = (0..40_000).map(|i| format!("{i}")).collect();

    for (width, values) in [
        (KeyWidth::Byte, byte_values),
        (KeyWidth::Short, short_values),
        (KeyWidth::Int, int_values),
    ] {
        let mut column = StringColumn::new("strings");
        for value in &values {
            column.append(value);
        }
        assert_eq!(column.dictionary().key_width(), width);

        let mut table = Table::new("width check");
        table.add_column(column.clone());

        let dir = save_table(tmp.path(), &table).unwrap();
        let reloaded = read_table(&dir).unwrap();
        let Some(Column::String(read_back)) = reloaded.column(0) else {
            panic!("expected a string column");
        };

        assert_eq!(read_back.dictionary().key_width(), width);
        assert_eq!(read_back.dictionary(), column.dictionary());
        for (row, value) in values.iter().enumerate() {
            assert_eq!(read_back.get(row), Some(value.as_str()));
        }
    }
}

#[test]
fn test_save_strings_million_rows_double_round_trip() {
    let mut index1 = StringColumn::new("index1");
    for i in 0..1_000_000 {
        index1.append(&format!("{i}"));
    }
    let mut index2 = StringColumn::new("index2");
    for _ in 0..1_000 {
        for i in 0..1_000 {
            index2.append(&format!("{i}"));
        }
    }
    let mut index3 = StringColumn::new("index3");
    for _ in 0..10 {
        for i in 0..100_000 {
            index3.append(&format!("{i}"));
        }
    }

    let mut table = Table::new("million ints");
    table.add_column(index1);
    table.add_column(index2);
    table.add_column(index3);
    let original_string = |index: usize| match table.column(index) {
        Some(Column::String(c)) => c,
        _ => panic!("expected a string column at position {index}"),
    };

    let tmp = TempDir::new().unwrap();
    let dir = save_table(tmp.path(), &table).unwrap();
    let once = read_table(&dir).unwrap();
    assert_eq!(once.column_count(), table.column_count());
    assert_eq!(once.row_count(), table.row_count());

    let Some(Column::String(index2_once)) = once.column(1) else {
        panic!("expected a string column");
    };
    assert_eq!(index2_once.dictionary(), original_string(1).dictionary());

    // Save what was read and read again; the dictionaries must survive the
    // second generation untouched.
    let dir = save_table(tmp.path(), &once).unwrap();
    let twice = read_table(&dir).unwrap();

    let Some(Column::String(index1_twice)) = twice.column(0) else {
        panic!("expected a string column");
    };
    let Some(Column::String(index2_twice)) = twice.column(1) else {
        panic!("expected a string column");
    };
    assert_eq!(index1_twice.dictionary(), original_string(0).dictionary());
    assert_eq!(index2_twice.dictionary(), original_string(1).dictionary());
}

#[test]
fn test_save_ints_larger() {
    let n = 10_000_000usize;
    let values: Vec<i32> = (0..n as i32).collect();

    let mut table = Table::new("Ints only, larger");
    table.add_column(IntColumn::from_values("index1", values.clone()));
    table.add_column(IntColumn::from_values("index2", values));

    let tmp = TempDir::new().unwrap();
    let dir = save_table(tmp.path(), &table).unwrap();
    let reloaded = read_table(&dir).unwrap();

    assert_eq!(reloaded.row_count(), n);
    for position in [0, n / 2, n - 1] {
        for column in reloaded.columns() {
            let Column::Integer(ints) = column else {
                panic!("expected integer columns");
            };
            assert_eq!(ints.get(position), Some(position as i32));
        }
    }
}

#[test]
fn test_empty_parent_dir_rejected() {
    let err = save_table("", &five_column_table()).unwrap_err();
    assert!(matches!(err, SawError::InvalidArgument { .. }));
}

#[test]
fn test_custom_pool_sizes() {
    let tmp = TempDir::new().unwrap();
    let table = five_column_table();

    let write_config = SawConfig::new().with_worker_pool_size(2);
    let dir = save_table_with(tmp.path(), &table, &write_config).unwrap();

    let read_config = SawConfig::new().with_worker_pool_size(3);
    let reloaded = read_table_with(&dir, &read_config).unwrap();
    assert_eq!(reloaded, table);
}

#[test]
fn test_truncated_column_file_is_corrupt() {
    let tmp = TempDir::new().unwrap();
    let mut table = Table::new("damage");
    table.add_column(LongColumn::from_values("values", (0..1_000).collect()));

    let dir = save_table(tmp.path(), &table).unwrap();
    let column_path = dir.join("0_values");
    let bytes = fs::read(&column_path).unwrap();
    fs::write(&column_path, &bytes[..bytes.len() / 2]).unwrap();

    let err = read_table(&dir).unwrap_err();
    assert!(err.is_corruption(), "unexpected error: {err}");
}

#[test]
fn test_missing_metadata_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(read_table(tmp.path()).is_err());
}
