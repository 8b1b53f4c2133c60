//! Query module for looking entries up by what a user typed
//!
//! Bare numbers are turned into codes before the lookup: `76` and `076` both
//! find `SCP-076`, while `1234` becomes `SCP-1234` with no padding.

use crate::catalog::{Catalog, Entry};
use std::sync::Arc;

/// Width bare numbers are zero-padded to
const CODE_DIGITS: usize = 3;

/// Longest bare number that gets a prefix
const MAX_CODE_DIGITS: usize = 4;

/// Turns a user query into the code it refers to
///
/// Anything that isn't 1 to 4 ASCII digits is returned trimmed but
/// otherwise untouched.
///
/// # Examples
///
/// ```
/// use scp_catalog::query::normalize_query;
///
/// assert_eq!(normalize_query("76", "SCP"), "SCP-076");
/// assert_eq!(normalize_query("1234", "SCP"), "SCP-1234");
/// assert_eq!(normalize_query("scp-173", "SCP"), "scp-173");
/// ```
pub fn normalize_query(query: &str, prefix: &str) -> String {
    let query = query.trim();
    let numeric = !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit());

    if numeric && query.len() <= MAX_CODE_DIGITS {
        format!("{}-{:0>width$}", prefix, query, width = CODE_DIGITS)
    } else {
        query.to_string()
    }
}

/// Looks up entries by code, normalizing bare numbers first
///
/// An unmatched query yields an empty list.
pub fn lookup(catalog: &Catalog, query: &str, prefix: &str) -> Vec<Arc<Entry>> {
    let code = normalize_query(query, prefix);
    tracing::debug!("Looking up '{}' as code '{}'", query.trim(), code);
    catalog.find_by_code(&code)
}

/// Looks up entries by title
///
/// Separate from [`lookup`]; a failed code lookup does not fall back to this.
pub fn lookup_title(catalog: &Catalog, query: &str) -> Vec<Arc<Entry>> {
    catalog.find_by_title(query)
}

/// Formats query results for a reply, one entry per line
pub fn render_entries(query: &str, entries: &[Arc<Entry>]) -> String {
    if entries.is_empty() {
        return format!("No entries found for '{}'", query.trim());
    }

    entries
        .iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
