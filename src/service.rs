//! Catalog service
//!
//! Owns one catalog instance together with its configuration and reporter and
//! exposes the operations a host (the CLI, a chat bot) drives: crawl, dump,
//! load and query.

use crate::catalog::{Catalog, Entry, SharedCatalog};
use crate::config::Config;
use crate::crawler::{Coordinator, Fetcher, HtmlStripper};
use crate::output::{CatalogStatistics, CrawlSummary, Reporter};
use crate::query::{lookup, lookup_title, render_entries};
use crate::snapshot;
use crate::Result;
use std::path::Path;
use std::sync::Arc;

pub struct CatalogService {
    config: Config,
    catalog: SharedCatalog,
    reporter: Arc<dyn Reporter>,
}

impl CatalogService {
    /// Creates a service around an empty catalog
    pub fn new(config: Config, reporter: Arc<dyn Reporter>) -> Self {
        Self::with_catalog(config, SharedCatalog::new(Catalog::new()), reporter)
    }

    /// Creates a service around an existing catalog
    pub fn with_catalog(config: Config, catalog: SharedCatalog, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            config,
            catalog,
            reporter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle to the catalog this service operates on
    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }

    /// Where `dump` and `load` read and write
    pub fn snapshot_path(&self) -> &Path {
        Path::new(&self.config.snapshot.path)
    }

    /// Crawls every configured index page over HTTP
    pub async fn crawl(&self) -> Result<CrawlSummary> {
        let coordinator =
            Coordinator::with_http(&self.config, self.catalog.clone(), self.reporter.clone())?;
        Ok(coordinator.run().await)
    }

    /// Crawls using the given transport instead of HTTP
    pub async fn crawl_with(&self, fetcher: Arc<dyn Fetcher>) -> Result<CrawlSummary> {
        let coordinator = Coordinator::new(
            &self.config,
            self.catalog.clone(),
            fetcher,
            Arc::new(HtmlStripper),
            self.reporter.clone(),
        )?;
        Ok(coordinator.run().await)
    }

    /// Writes the whole catalog to the snapshot file
    ///
    /// # Returns
    ///
    /// The number of entries written
    pub fn dump(&self) -> Result<usize> {
        let path = self.snapshot_path();
        let catalog = self.catalog.lock();

        self.reporter
            .notify(&format!("Dumping {} entries to JSON", catalog.len()));
        let count = snapshot::dump_to_path(&catalog, path)?;
        drop(catalog);

        tracing::info!("Dumped {} entries to {}", count, path.display());
        self.reporter.notify("Dumping complete");
        Ok(count)
    }

    /// Appends the snapshot file's entries to the catalog
    ///
    /// A malformed file leaves the catalog untouched.
    ///
    /// # Returns
    ///
    /// The number of entries loaded
    pub fn load(&self) -> Result<usize> {
        let path = self.snapshot_path();
        let count = snapshot::load_from_path(path, &mut self.catalog.lock())?;

        self.reporter
            .notify(&format!("Loading {} entries from JSON", count));
        tracing::info!("Loaded {} entries from {}", count, path.display());
        self.reporter.notify("Loading complete");
        Ok(count)
    }

    /// Looks up entries by code
    pub fn find(&self, text: &str) -> Vec<Arc<Entry>> {
        lookup(&self.catalog.lock(), text, &self.config.source.code_prefix)
    }

    /// Looks up entries by code and renders them for a reply
    pub fn query(&self, text: &str) -> String {
        render_entries(text, &self.find(text))
    }

    /// Looks up entries by title and renders them for a reply
    pub fn query_title(&self, text: &str) -> String {
        render_entries(text, &lookup_title(&self.catalog.lock(), text))
    }

    /// Counts of what the catalog currently holds
    pub fn statistics(&self) -> CatalogStatistics {
        CatalogStatistics::from_catalog(&self.catalog.lock())
    }
}
