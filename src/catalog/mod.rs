//! In-memory entry catalog
//!
//! The catalog owns the entry set and keeps two derived indices over it:
//! by normalized code and by normalized title. Both indices store positions
//! into the entry vector and can be rebuilt from it at any time.
//!
//! # Example
//!
//! ```
//! use scp_catalog::catalog::{Catalog, Entry};
//!
//! let mut catalog = Catalog::new();
//! let entry = Entry::new(
//!     "SCP-173", "SCP-173", "Euclid", "series 1",
//!     "The Sculpture", "Moved to Site-19 1993.",
//!     "http://www.scp-wiki.net/scp-173",
//! ).unwrap();
//! catalog.insert(entry).unwrap();
//!
//! assert_eq!(catalog.find_by_code(" scp-173").len(), 1);
//! assert_eq!(catalog.find_by_title("THE SCULPTURE").len(), 1);
//! ```

mod entry;
mod index;

pub use entry::Entry;
pub use index::normalize_key;

use crate::CatalogError;
use index::KeyIndex;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The set of known entries plus the by-code and by-title indices
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<Arc<Entry>>,
    by_code: KeyIndex,
    by_title: KeyIndex,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and indexes it by code and by title
    ///
    /// An entry with an empty code or title is rejected and the catalog is
    /// left unchanged. No uniqueness is enforced here; crawls go through
    /// [`Catalog::insert_if_absent`].
    pub fn insert(&mut self, entry: Entry) -> Result<(), CatalogError> {
        entry.validate().map_err(CatalogError::InvalidEntry)?;

        let position = self.entries.len();
        self.by_code.add(&entry.code, position);
        self.by_title.add(&entry.title, position);
        self.entries.push(Arc::new(entry));
        Ok(())
    }

    /// Inserts the entry unless one with the same normalized code is already known
    ///
    /// Returns `Ok(true)` if the entry was inserted and `Ok(false)` if its code
    /// was already present.
    pub fn insert_if_absent(&mut self, entry: Entry) -> Result<bool, CatalogError> {
        entry.validate().map_err(CatalogError::InvalidEntry)?;

        if self.contains_code(&entry.code) {
            return Ok(false);
        }
        self.insert(entry)?;
        Ok(true)
    }

    /// Returns every entry whose normalized code matches `code`
    pub fn find_by_code(&self, code: &str) -> Vec<Arc<Entry>> {
        self.collect(self.by_code.get(code))
    }

    /// Returns every entry whose normalized title matches `title`
    pub fn find_by_title(&self, title: &str) -> Vec<Arc<Entry>> {
        self.collect(self.by_title.get(title))
    }

    /// Returns true if at least one entry has this normalized code
    pub fn contains_code(&self, code: &str) -> bool {
        !self.by_code.get(code).is_empty()
    }

    /// Returns the full entry set as of this call
    pub fn all(&self) -> Vec<Arc<Entry>> {
        self.entries.clone()
    }

    /// Iterates over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().map(|entry| entry.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct normalized codes
    pub fn distinct_codes(&self) -> usize {
        self.by_code.key_count()
    }

    /// Rebuilds both indices from the entry set
    pub fn reindex(&mut self) {
        self.by_code.clear();
        self.by_title.clear();
        for (position, entry) in self.entries.iter().enumerate() {
            self.by_code.add(&entry.code, position);
            self.by_title.add(&entry.title, position);
        }
    }

    fn collect(&self, positions: &[usize]) -> Vec<Arc<Entry>> {
        positions
            .iter()
            .filter_map(|&position| self.entries.get(position).cloned())
            .collect()
    }
}

/// A catalog shared between the crawl task and other operations
///
/// All mutation goes through one mutex, so check-and-insert stays atomic even
/// if two crawls run at once. The guard must not be held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<Mutex<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(catalog)),
        }
    }

    /// Locks the catalog
    ///
    /// A poisoned lock is recovered: every catalog mutation completes before
    /// anything that could panic, so the data is still consistent.
    pub fn lock(&self) -> MutexGuard<'_, Catalog> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Catalog> for SharedCatalog {
    fn from(catalog: Catalog) -> Self {
        Self::new(catalog)
    }
}
