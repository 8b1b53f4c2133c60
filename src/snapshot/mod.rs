//! Snapshot module for persisting the catalog
//!
//! The catalog's entry set is written to and read from a single flat JSON
//! file. There is no header and no schema version: each record is exactly the
//! entry attribute set. Loading appends to whatever the catalog already holds.

mod json;

pub use json::{dump, load, read_entries};

use crate::catalog::Catalog;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading or writing a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot is malformed; nothing was loaded
    #[error("Malformed snapshot: {0}")]
    Format(String),
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Writes the catalog to `path`, replacing any existing file
///
/// # Returns
///
/// * `Ok(usize)` - Number of entries written
/// * `Err(SnapshotError)` - Failed to create or write the file
pub fn dump_to_path(catalog: &Catalog, path: &Path) -> SnapshotResult<usize> {
    let file = File::create(path)?;
    let count = dump(catalog, BufWriter::new(file))?;
    tracing::debug!("Wrote {} entries to {}", count, path.display());
    Ok(count)
}

/// Appends the entries stored at `path` to the catalog
///
/// # Returns
///
/// * `Ok(usize)` - Number of entries loaded
/// * `Err(SnapshotError)` - Unreadable or malformed file; the catalog is unchanged
pub fn load_from_path(path: &Path, catalog: &mut Catalog) -> SnapshotResult<usize> {
    let file = File::open(path)?;
    let count = load(BufReader::new(file), catalog)?;
    tracing::debug!("Read {} entries from {}", count, path.display());
    Ok(count)
}
