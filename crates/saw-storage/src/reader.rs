//! Reading tables.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use saw_columns::table::Table;

use crate::codec;
use crate::config::SawConfig;
use crate::error::SawResult;
use crate::metadata::{ColumnMetadata, TableMetadata, METADATA_FILE_NAME};
use crate::pool;

/// Reads a previously saved table from its directory, with default settings.
pub fn read_table(table_dir: impl AsRef<Path>) -> SawResult<Table> {
    read_table_with(table_dir, &SawConfig::default())
}

/// Reads a previously saved table from its directory.
///
/// The metadata document is consulted first; it names every column file and
/// carries the row count the fixed-width codecs need. Columns are decoded
/// concurrently by a pool of at most `config.worker_pool_size` workers and
/// assembled in metadata order, which is the canonical column order.
pub fn read_table_with(table_dir: impl AsRef<Path>, config: &SawConfig) -> SawResult<Table> {
    let dir = table_dir.as_ref();
    config.validate()?;

    let metadata = TableMetadata::read_from(&dir.join(METADATA_FILE_NAME))?;
    debug!(
        table = metadata.name.as_str(),
        rows = metadata.row_count,
        columns = metadata.column_metadata.len(),
        "reading table"
    );

    let row_count = metadata.row_count;
    let jobs: Vec<(&ColumnMetadata, PathBuf)> = metadata
        .column_metadata
        .iter()
        .map(|meta| (meta, dir.join(&meta.id)))
        .collect();

    let columns = pool::run_tasks(
        config.worker_pool_size,
        "saw-read",
        jobs,
        |(meta, path): (&ColumnMetadata, PathBuf)| {
            trace!(column = meta.name.as_str(), "reading column");
            codec::read_column(&path, meta, row_count)
        },
    )?;

    let mut table = Table::new(&metadata.name);
    for column in columns {
        table.add_column(column);
    }

    debug!(table = metadata.name.as_str(), "table read");
    Ok(table)
}
