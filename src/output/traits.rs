//! Reporter trait and crawl events
//!
//! The host decides where human-readable progress goes; the crawler only
//! emits [`CrawlEvent`]s through a [`Reporter`].

use std::fmt;

/// Something that happened during a crawl, worth telling the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// A crawl run began
    RunStarted { categories: usize },

    /// Processing of one index page began
    CategoryStarted { url: String, category: String },

    /// An index page could not be fetched or parsed; its entries were skipped
    CategoryFailed {
        url: String,
        category: String,
        reason: String,
    },

    /// All references of one index page were processed
    CategoryFinished {
        category: String,
        references: usize,
        inserted: usize,
    },

    /// A reference whose code is already in the catalog
    DuplicateSkipped { code: String },

    /// A reference dropped because its detail page failed
    EntryFailed {
        code: String,
        url: String,
        reason: String,
    },

    /// An entry was added to the catalog
    EntryAdded { code: String, title: String },

    /// The crawl run finished
    RunFinished { inserted: usize, total: usize },
}

impl CrawlEvent {
    /// Returns true for events that describe a skipped item or category
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::CategoryFailed { .. } | Self::EntryFailed { .. })
    }
}

impl fmt::Display for CrawlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunStarted { categories } => {
                write!(f, "Crawl started, {} index pages to process", categories)
            }
            Self::CategoryStarted { url, category } => {
                write!(f, "Processing URL: {} ({})", url, category)
            }
            Self::CategoryFailed {
                url,
                category,
                reason,
            } => write!(f, "Skipping category {} ({}): {}", category, url, reason),
            Self::CategoryFinished {
                category,
                references,
                inserted,
            } => write!(
                f,
                "Finished {}: {} references, {} new entries",
                category, references, inserted
            ),
            Self::DuplicateSkipped { code } => write!(f, "Skipping {}, already loaded", code),
            Self::EntryFailed { code, url, reason } => {
                write!(f, "Skipping {} ({}): {}", code, url, reason)
            }
            Self::EntryAdded { code, title } => write!(f, "Added {} - {}", code, title),
            Self::RunFinished { inserted, total } => write!(
                f,
                "Crawl complete: {} new entries, {} entries in catalog",
                inserted, total
            ),
        }
    }
}

/// Sink for human-readable progress and results
pub trait Reporter: Send + Sync {
    /// Delivers a message to the operator
    fn notify(&self, message: &str);

    /// Reports a crawl event, rendered as text by default
    fn report(&self, event: &CrawlEvent) {
        self.notify(&event.to_string());
    }
}
