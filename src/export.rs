use std::path::Path;

use anyhow::{Context, Result};

use crate::table::{Record, RecordSet};

/// Write a record set as CSV with the set's column list as the header row.
/// Missing values become empty fields.
pub fn write_csv(records: &RecordSet, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let columns: Vec<&str> = records.columns().collect();
    writer
        .write_record(&columns)
        .with_context(|| format!("failed to write header to {}", path.display()))?;

    for row in records.rows() {
        let fields: Vec<&str> = columns
            .iter()
            .map(|column| row.get(*column).map(String::as_str).unwrap_or(""))
            .collect();
        writer
            .write_record(&fields)
            .with_context(|| format!("failed to write row to {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;

    Ok(())
}

/// Read a CSV file back into a record set. Empty fields are treated as
/// missing values, mirroring [`write_csv`].
pub fn read_csv(path: &Path) -> Result<RecordSet> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = RecordSet::with_columns(headers.iter().cloned());
    for entry in reader.records() {
        let entry = entry.with_context(|| format!("failed to read row of {}", path.display()))?;
        let mut row = Record::new();
        for (column, field) in headers.iter().zip(entry.iter()) {
            if !field.is_empty() {
                row.insert(column.clone(), field.to_string());
            }
        }
        records.push(row);
    }

    Ok(records)
}
