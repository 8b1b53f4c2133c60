//! JSON snapshot codec
//!
//! The file is a pretty-printed JSON array; each element holds exactly the
//! entry attribute set.

use crate::catalog::{Catalog, Entry};
use crate::snapshot::{SnapshotError, SnapshotResult};
use serde_json::Value;
use std::io::{Read, Write};

/// Writes every catalog entry, in catalog order
///
/// # Returns
///
/// The number of entries written
pub fn dump<W: Write>(catalog: &Catalog, mut writer: W) -> SnapshotResult<usize> {
    let entries: Vec<&Entry> = catalog.iter().collect();
    serde_json::to_writer_pretty(&mut writer, &entries)
        .map_err(|e| SnapshotError::Format(e.to_string()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(entries.len())
}

/// Reads every record and validates it without touching a catalog
///
/// The first malformed record aborts the read.
pub fn read_entries<R: Read>(reader: R) -> SnapshotResult<Vec<Entry>> {
    let records: Vec<Value> =
        serde_json::from_reader(reader).map_err(|e| SnapshotError::Format(e.to_string()))?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let entry: Entry = serde_json::from_value(record)
                .map_err(|e| SnapshotError::Format(format!("record {}: {}", index, e)))?;
            entry
                .validate()
                .map_err(|reason| SnapshotError::Format(format!("record {}: {}", index, reason)))?;
            Ok(entry)
        })
        .collect()
}

/// Reads a snapshot and appends its entries to the catalog, in file order
///
/// Nothing is inserted unless every record is valid.
///
/// # Returns
///
/// The number of entries loaded
pub fn load<R: Read>(reader: R, catalog: &mut Catalog) -> SnapshotResult<usize> {
    let entries = read_entries(reader)?;
    let count = entries.len();
    for entry in entries {
        catalog
            .insert(entry)
            .map_err(|e| SnapshotError::Format(e.to_string()))?;
    }
    Ok(count)
}
