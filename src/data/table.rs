//! Flat-file tabular store (hubdb tables).
//!
//! Each named table is one CSV file, read and written wholesale; there is
//! no row-level mutation. The first row holds the headers when a table is
//! read as mappings. Reads accept an optional single `key=value` equality
//! filter.

use super::{StoreError, validate_name};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

/// One row keyed by header.
pub type Row = BTreeMap<String, String>;

/// File-backed store for CSV tables.
pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read a table as header-keyed rows, preserving row order.
    ///
    /// A missing table file yields an empty result, not an error. A filter
    /// that is not exactly one `key=value` pair also yields an empty
    /// result; otherwise rows are retained on exact string equality.
    pub fn read(&self, name: &str, filter: Option<&str>) -> Result<Vec<Row>, StoreError> {
        validate_name(name)?;

        let path = self.table_path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let rows = read_rows(&path)?;
        match filter {
            None => Ok(rows),
            Some(filter) => {
                let Some((key, value)) = parse_filter(filter) else {
                    return Ok(Vec::new());
                };
                Ok(rows
                    .into_iter()
                    .filter(|row| row.get(key).is_some_and(|cell| cell == value))
                    .collect())
            }
        }
    }

    /// Overwrite a table with the given rows, verbatim.
    ///
    /// No schema validation and no header inference: the caller supplies
    /// the header row first if it wants one.
    pub fn write(&self, name: &str, rows: &[Vec<String>]) -> Result<(), StoreError> {
        validate_name(name)?;
        fs::create_dir_all(&self.dir)?;

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(self.table_path(name))
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| StoreError::Decode(e.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Delete a table file.
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        validate_name(name)?;

        fs::remove_file(self.table_path(name)).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(format!("table `{name}`")),
            _ => StoreError::Io(err),
        })
    }

    /// List table names, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "csv") {
                    path.file_stem().map(|s| s.to_string_lossy().into_owned())
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }
}

/// Parse a filter expression as exactly one `key=value` pair.
///
/// Returns `None` for anything else; the key must be non-empty. The value
/// may contain further `=` characters.
fn parse_filter(filter: &str) -> Option<(&str, &str)> {
    let (key, value) = filter.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse a CSV file into header-keyed rows.
fn read_rows(path: &Path) -> Result<Vec<Row>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| StoreError::Decode(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| StoreError::Decode(e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StoreError::Decode(e.to_string()))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), cell.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

// ============================================================================
// Tests
// ============================================================================
