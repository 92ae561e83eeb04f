//! CSV reading for a single table.
//!
//! The header is checked against [`Record::REQUIRED_COLUMNS`] before any row
//! is deserialized, so a missing column surfaces once per table instead of once
//! per row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, instrument};

use coursegraph_shared::{CourseGraphError, Record, Result};

/// Read and deserialize every row of the table at `path`.
#[instrument(skip_all, fields(table = T::TABLE, path = %path.display()))]
pub fn read_table<T: Record>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| {
        CourseGraphError::data_load(T::TABLE, format!("cannot open {}: {e}", path.display()))
    })?;

    let rows = parse_table::<T, _>(file)?;
    debug!(rows = rows.len(), "table loaded");
    Ok(rows)
}

/// Deserialize every row from any CSV source with a header row.
pub fn parse_table<T: Record, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| CourseGraphError::data_load(T::TABLE, format!("failed to read header: {e}")))?
        .clone();

    check_columns::<T>(&headers)?;

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<T>().enumerate() {
        // Line 1 is the header.
        let row = result.map_err(|e| {
            CourseGraphError::data_load(T::TABLE, format!("line {}: {e}", index + 2))
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Fail with the first required column missing from `headers`.
fn check_columns<T: Record>(headers: &StringRecord) -> Result<()> {
    for column in T::REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(CourseGraphError::schema_column(T::TABLE, *column));
        }
    }
    Ok(())
}
