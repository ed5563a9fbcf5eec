// src/process/chunk.rs
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::error::{ProcessError, Result};
use crate::process::csv_io::write_rows;
use crate::record::Record;

/// One bounded slice of the record set. `fieldnames` come from the first
/// record of the slice only, so every unit is self-consistent even if the
/// column sets drift between slices.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<'a> {
    pub index: usize,
    pub name: String,
    pub fieldnames: Vec<String>,
    pub rows: &'a [Record],
}

/// Receives finished units.
pub trait RecordSink {
    fn write_unit(&mut self, name: &str, fieldnames: &[String], rows: &[Record]) -> Result<()>;
}

/// Split `records` into `ceil(len / rows_per_chunk)` contiguous slices
/// named `{output_name}/{i}`.
pub fn chunk_records<'a>(
    output_name: &str,
    records: &'a [Record],
    rows_per_chunk: usize,
) -> Result<Vec<Chunk<'a>>> {
    if rows_per_chunk == 0 {
        return Err(ProcessError::InvalidChunkSize);
    }
    Ok(records
        .chunks(rows_per_chunk)
        .enumerate()
        .map(|(index, rows)| Chunk {
            index,
            name: format!("{}/{}", output_name, index),
            fieldnames: rows[0].columns().map(String::from).collect(),
            rows,
        })
        .collect())
}

/// Chunk `records` and hand every unit to `sink`. Returns the unit count.
#[instrument(level = "info", skip(sink, records), fields(records = records.len()))]
pub fn write_chunks<K: RecordSink>(
    sink: &mut K,
    output_name: &str,
    records: &[Record],
    rows_per_chunk: usize,
) -> Result<usize> {
    let chunks = chunk_records(output_name, records, rows_per_chunk)?;
    for chunk in &chunks {
        sink.write_unit(&chunk.name, &chunk.fieldnames, chunk.rows)?;
        debug!(unit = %chunk.name, rows = chunk.rows.len(), "wrote unit");
    }
    info!(units = chunks.len(), "chunks written");
    Ok(chunks.len())
}

/// Writes each unit as `<root>/<name>.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirSink {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl CsvDirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
        }
    }

    /// Files written so far, in unit order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl RecordSink for CsvDirSink {
    fn write_unit(&mut self, name: &str, fieldnames: &[String], rows: &[Record]) -> Result<()> {
        let path = self.root.join(format!("{}.csv", name));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        check_columns(name, fieldnames, rows)?;

        // write to a temp file first, then move into place
        let tmp_path = path.with_extension("csv.tmp");
        write_rows(&tmp_path, fieldnames, rows)?;
        fs::rename(&tmp_path, &path)?;
        self.written.push(path);
        Ok(())
    }
}

/// Every column a row carries must be in the unit header.
fn check_columns(unit: &str, fieldnames: &[String], rows: &[Record]) -> Result<()> {
    for row in rows {
        if let Some(column) = row.columns().find(|c| !fieldnames.iter().any(|f| f == c)) {
            return Err(ProcessError::UnknownColumn {
                unit: unit.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Create the output directory up front so an empty run still leaves it.
pub fn prepare_output_dir(root: &Path, output_name: &str) -> Result<PathBuf> {
    let dir = root.join(output_name);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
