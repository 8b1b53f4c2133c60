//! Crawl summaries and catalog statistics
//!
//! This module provides the per-run counters a crawl returns and an overview
//! of what a catalog contains.

use crate::catalog::Catalog;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Outcome of one crawl run
///
/// A run never fails as a whole; individual failures only show up here and in
/// the reported events.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Index pages in the source list
    pub categories_total: usize,

    /// Index pages that could not be fetched or parsed
    pub categories_failed: usize,

    /// Entry references found on index pages
    pub references_seen: usize,

    /// Entries added to the catalog
    pub inserted: usize,

    /// References skipped because their code was already known
    pub duplicates_skipped: usize,

    /// References dropped because the detail page failed
    pub entries_failed: usize,
}

impl CrawlSummary {
    /// Creates an empty summary starting now
    pub fn new(categories_total: usize) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            categories_total,
            categories_failed: 0,
            references_seen: 0,
            inserted: 0,
            duplicates_skipped: 0,
            entries_failed: 0,
        }
    }

    /// Marks the run as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Returns true if every category and reference was handled without failure
    pub fn is_clean(&self) -> bool {
        self.categories_failed == 0 && self.entries_failed == 0
    }
}

/// Overview of a catalog's contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStatistics {
    pub total_entries: usize,
    pub distinct_codes: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_class: BTreeMap<String, usize>,
}

impl CatalogStatistics {
    /// Counts entries per category and per class
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut stats = Self {
            total_entries: catalog.len(),
            distinct_codes: catalog.distinct_codes(),
            ..Self::default()
        };

        for entry in catalog.iter() {
            *stats.by_category.entry(entry.category.clone()).or_default() += 1;
            *stats.by_class.entry(entry.class_tag.clone()).or_default() += 1;
        }

        stats
    }
}

/// Formats a crawl summary as a short report
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Crawl Summary ===");
    let _ = writeln!(out, "  Started: {}", summary.started_at.to_rfc3339());
    if let Some(seconds) = summary.duration_seconds() {
        let _ = writeln!(out, "  Duration: {:.1}s", seconds);
    }
    let _ = writeln!(
        out,
        "  Index pages: {} ({} failed)",
        summary.categories_total, summary.categories_failed
    );
    let _ = writeln!(out, "  References found: {}", summary.references_seen);
    let _ = writeln!(out, "  New entries: {}", summary.inserted);
    let _ = writeln!(out, "  Already known: {}", summary.duplicates_skipped);
    let _ = writeln!(out, "  Failed entries: {}", summary.entries_failed);
    out
}

/// Formats catalog statistics, largest groups first
pub fn format_statistics(stats: &CatalogStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Catalog Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Total entries: {}", stats.total_entries);
    let _ = writeln!(out, "  Distinct codes: {}", stats.distinct_codes);

    for (heading, counts) in [("By Category", &stats.by_category), ("By Class", &stats.by_class)] {
        if counts.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}:", heading);
        let mut sorted: Vec<_> = counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (name, count) in sorted {
            let percentage = (*count as f64 / stats.total_entries.max(1) as f64) * 100.0;
            let _ = writeln!(out, "  {}: {} ({:.1}%)", name, count, percentage);
        }
    }

    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CatalogStatistics) {
    print!("{}", format_statistics(stats));
}
