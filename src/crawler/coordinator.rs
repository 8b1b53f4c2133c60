//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that:
//! - Walks the configured index pages in order
//! - Extracts entry references from each index page
//! - Skips references whose code is already catalogued
//! - Fetches and parses each remaining detail page
//! - Inserts the resulting entries into the shared catalog
//!
//! Failures are isolated: a bad index page skips its category, a bad detail
//! page skips its entry, and the run always completes.

use crate::catalog::{Entry, SharedCatalog};
use crate::config::{Config, CrawlerConfig, SourceList};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::parser::{parse_detail_page, parse_index_page, EntryRef, IndexRules};
use crate::crawler::text::{HtmlStripper, TextNormalizer};
use crate::output::{CrawlEvent, CrawlSummary, Reporter};
use crate::CatalogError;
use std::sync::Arc;
use std::time::Duration;

/// Main crawler coordinator structure
pub struct Coordinator {
    lists: Vec<SourceList>,
    rules: IndexRules,
    request_delay: Duration,
    catalog: SharedCatalog,
    fetcher: Arc<dyn Fetcher>,
    normalizer: Arc<dyn TextNormalizer>,
    reporter: Arc<dyn Reporter>,
}

/// How a single reference ended
enum EntryOutcome {
    Inserted,
    Duplicate,
    Failed,
}

impl Coordinator {
    /// Creates a coordinator with explicit collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - Source list and crawl pacing
    /// * `catalog` - The catalog new entries are inserted into
    /// * `fetcher` - Transport used for every page
    /// * `normalizer` - Markup stripper applied to detail pages
    /// * `reporter` - Sink for progress messages
    pub fn new(
        config: &Config,
        catalog: SharedCatalog,
        fetcher: Arc<dyn Fetcher>,
        normalizer: Arc<dyn TextNormalizer>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, CatalogError> {
        let rules = IndexRules::from_config(&config.source)?;

        Ok(Self {
            lists: config.source.lists.clone(),
            rules,
            request_delay: request_delay(&config.crawler),
            catalog,
            fetcher,
            normalizer,
            reporter,
        })
    }

    /// Creates a coordinator that fetches over HTTP and strips markup with `scraper`
    pub fn with_http(
        config: &Config,
        catalog: SharedCatalog,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, CatalogError> {
        let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
        Self::new(
            config,
            catalog,
            Arc::new(fetcher),
            Arc::new(HtmlStripper),
            reporter,
        )
    }

    /// Runs one crawl over every configured index page
    ///
    /// Fetches are issued one at a time, in document order. The returned
    /// summary counts what was inserted, skipped and dropped.
    pub async fn run(&self) -> CrawlSummary {
        let mut summary = CrawlSummary::new(self.lists.len());
        let mut first_request = true;

        tracing::info!("Starting crawl over {} index pages", self.lists.len());
        self.reporter.report(&CrawlEvent::RunStarted {
            categories: self.lists.len(),
        });

        for list in &self.lists {
            self.reporter.report(&CrawlEvent::CategoryStarted {
                url: list.url.clone(),
                category: list.category.clone(),
            });

            let references = match self.fetch_references(list, &mut first_request).await {
                Ok(references) => references,
                Err(reason) => {
                    tracing::warn!("Skipping category {}: {}", list.category, reason);
                    summary.categories_failed += 1;
                    self.reporter.report(&CrawlEvent::CategoryFailed {
                        url: list.url.clone(),
                        category: list.category.clone(),
                        reason,
                    });
                    continue;
                }
            };

            tracing::info!(
                "Found {} references under {}",
                references.len(),
                list.category
            );
            summary.references_seen += references.len();

            let mut inserted_here = 0;
            for reference in &references {
                match self
                    .process_reference(reference, &list.category, &mut first_request)
                    .await
                {
                    EntryOutcome::Inserted => {
                        inserted_here += 1;
                        summary.inserted += 1;
                    }
                    EntryOutcome::Duplicate => summary.duplicates_skipped += 1,
                    EntryOutcome::Failed => summary.entries_failed += 1,
                }
            }

            self.reporter.report(&CrawlEvent::CategoryFinished {
                category: list.category.clone(),
                references: references.len(),
                inserted: inserted_here,
            });
        }

        summary.finish();
        let total = self.catalog.lock().len();

        tracing::info!(
            "Crawl completed: {} inserted, {} already known, {} failed, {} categories skipped",
            summary.inserted,
            summary.duplicates_skipped,
            summary.entries_failed,
            summary.categories_failed
        );
        self.reporter.report(&CrawlEvent::RunFinished {
            inserted: summary.inserted,
            total,
        });

        summary
    }

    /// Fetches and parses one index page
    async fn fetch_references(
        &self,
        list: &SourceList,
        first_request: &mut bool,
    ) -> Result<Vec<EntryRef>, String> {
        tracing::debug!("Fetching index page {}", list.url);
        let html = self
            .fetch(&list.url, first_request)
            .await
            .map_err(|e| e.to_string())?;
        parse_index_page(&html, &self.rules).map_err(|e| e.to_string())
    }

    /// Processes a single reference
    ///
    /// This method:
    /// 1. Skips codes already in the catalog
    /// 2. Fetches the detail page
    /// 3. Strips markup and parses the entry fields
    /// 4. Inserts the entry
    async fn process_reference(
        &self,
        reference: &EntryRef,
        category: &str,
        first_request: &mut bool,
    ) -> EntryOutcome {
        if self.catalog.lock().contains_code(&reference.code) {
            tracing::debug!("Skipping {}, already loaded", reference.code);
            self.reporter.report(&CrawlEvent::DuplicateSkipped {
                code: reference.code.clone(),
            });
            return EntryOutcome::Duplicate;
        }

        if reference.title.is_empty() {
            return self.entry_failed(reference, "no title next to the index link".to_string());
        }

        let html = match self.fetch(&reference.detail_url, first_request).await {
            Ok(html) => html,
            Err(e) => return self.entry_failed(reference, e.to_string()),
        };

        let text = self.normalizer.strip_markup(&html);
        let fields = match parse_detail_page(&text) {
            Ok(fields) => fields,
            Err(e) => return self.entry_failed(reference, e.to_string()),
        };

        let entry = match Entry::new(
            reference.code.as_str(),
            fields.lore_code,
            fields.class_tag,
            category,
            reference.title.as_str(),
            fields.description,
            reference.detail_url.as_str(),
        ) {
            Ok(entry) => entry,
            Err(e) => return self.entry_failed(reference, e.to_string()),
        };

        // Re-checked under the lock: another crawl may have added the code meanwhile
        let inserted = self.catalog.lock().insert_if_absent(entry);
        let inserted = match inserted {
            Ok(inserted) => inserted,
            Err(e) => return self.entry_failed(reference, e.to_string()),
        };
        if !inserted {
            self.reporter.report(&CrawlEvent::DuplicateSkipped {
                code: reference.code.clone(),
            });
            return EntryOutcome::Duplicate;
        }

        tracing::debug!("Added {} - {}", reference.code, reference.title);
        self.reporter.report(&CrawlEvent::EntryAdded {
            code: reference.code.clone(),
            title: reference.title.clone(),
        });
        EntryOutcome::Inserted
    }

    fn entry_failed(&self, reference: &EntryRef, reason: String) -> EntryOutcome {
        tracing::warn!("Skipping {}: {}", reference.code, reason);
        self.reporter.report(&CrawlEvent::EntryFailed {
            code: reference.code.clone(),
            url: reference.detail_url.clone(),
            reason,
        });
        EntryOutcome::Failed
    }

    /// Fetches a page, pausing first if a request delay is configured
    async fn fetch(
        &self,
        url: &str,
        first_request: &mut bool,
    ) -> Result<String, crate::TransportError> {
        if !*first_request && !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
        *first_request = false;
        self.fetcher.fetch(url).await
    }
}

fn request_delay(config: &CrawlerConfig) -> Duration {
    Duration::from_millis(config.request_delay_ms)
}

/// Runs a complete crawl over HTTP
///
/// # Example
///
/// ```no_run
/// use scp_catalog::catalog::{Catalog, SharedCatalog};
/// use scp_catalog::config::Config;
/// use scp_catalog::crawler::run_crawl;
/// use scp_catalog::output::ConsoleReporter;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = SharedCatalog::new(Catalog::new());
/// let summary = run_crawl(&Config::default(), catalog, Arc::new(ConsoleReporter::default())).await?;
/// println!("{} new entries", summary.inserted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    catalog: SharedCatalog,
    reporter: Arc<dyn Reporter>,
) -> Result<CrawlSummary, CatalogError> {
    let coordinator = Coordinator::with_http(config, catalog, reporter)?;
    Ok(coordinator.run().await)
}
