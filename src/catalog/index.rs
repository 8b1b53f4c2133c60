//! Keyed lookup index over catalog positions
use std::collections::HashMap;

/// Normalizes a lookup key: surrounding whitespace trimmed, case folded
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Maps a normalized key to the positions of matching entries, in insertion order
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyIndex {
    positions: HashMap<String, Vec<usize>>,
}

impl KeyIndex {
    /// Records that the entry at `position` is keyed by `key`
    pub(crate) fn add(&mut self, key: &str, position: usize) {
        self.positions
            .entry(normalize_key(key))
            .or_default()
            .push(position);
    }

    /// Positions stored under the normalized form of `key`
    pub(crate) fn get(&self, key: &str) -> &[usize] {
        self.positions
            .get(&normalize_key(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn clear(&mut self) {
        self.positions.clear();
    }

    /// Number of distinct keys
    pub(crate) fn key_count(&self) -> usize {
        self.positions.len()
    }
}
