//! Saving tables.
//!
//! A table is persisted as a directory under the caller's parent directory,
//! named after the (sanitized) table name: the metadata document plus one
//! compressed file per column. Saving over an existing table of the same
//! name wipes the old directory first; re-saving replaces, never merges.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use saw_columns::column::Column;
use saw_columns::table::Table;

use crate::codec;
use crate::config::SawConfig;
use crate::error::{SawError, SawResult};
use crate::metadata::{sanitize_name, TableMetadata, METADATA_FILE_NAME};
use crate::pool;

/// Saves a table under `parent_dir` with default settings.
///
/// Returns the absolute path of the table's directory.
pub fn save_table(parent_dir: impl AsRef<Path>, table: &Table) -> SawResult<PathBuf> {
    save_table_with(parent_dir, table, &SawConfig::default())
}

/// Saves a table under `parent_dir`.
///
/// The parent directory (and its ancestors) are created if absent. If the
/// table's directory already exists its contents are deleted first; callers
/// overwrite by saving again. The metadata document is fully written before
/// any column, so a crash can never leave column files without metadata.
/// Columns are then written concurrently by a pool of at most
/// `config.worker_pool_size` workers. On any failure the partially written
/// directory is removed and the first error is returned.
///
/// Returns the absolute path of the table's directory.
pub fn save_table_with(
    parent_dir: impl AsRef<Path>,
    table: &Table,
    config: &SawConfig,
) -> SawResult<PathBuf> {
    let parent = parent_dir.as_ref();
    if parent.as_os_str().is_empty() {
        return Err(SawError::invalid_argument(
            "parent directory must not be empty",
        ));
    }
    config.validate()?;

    fs::create_dir_all(parent)?;
    let table_dir = parent.join(sanitize_name(table.name()));
    if table_dir.exists() {
        fs::remove_dir_all(&table_dir)?;
    }
    fs::create_dir_all(&table_dir)?;

    debug!(
        table = table.name(),
        rows = table.row_count(),
        columns = table.column_count(),
        "saving table"
    );

    let metadata = TableMetadata::from_table(table);
    metadata.write_to(&table_dir.join(METADATA_FILE_NAME))?;

    let jobs: Vec<(&Column, PathBuf)> = table
        .columns()
        .iter()
        .zip(&metadata.column_metadata)
        .map(|(column, meta)| (column, table_dir.join(&meta.id)))
        .collect();

    let outcome = pool::run_tasks(
        config.worker_pool_size,
        "saw-write",
        jobs,
        |(column, path): (&Column, PathBuf)| {
            trace!(column = column.name(), "writing column");
            codec::write_column(column, &path)
        },
    );

    if let Err(e) = outcome {
        // Leave no half-written table behind; the error wins over any
        // cleanup failure.
        let _ = fs::remove_dir_all(&table_dir);
        return Err(e);
    }

    debug!(table = table.name(), "table saved");
    Ok(table_dir.canonicalize()?)
}
