//! Output module for progress reporting and summaries
//!
//! This module handles:
//! - The reporter sink crawl progress and command results are delivered to
//! - Crawl run summaries
//! - Catalog statistics

mod console;
pub mod stats;
mod traits;

pub use console::{ConsoleReporter, MemoryReporter};
pub use stats::{format_statistics, format_summary, print_statistics, CatalogStatistics, CrawlSummary};
pub use traits::{CrawlEvent, Reporter};
