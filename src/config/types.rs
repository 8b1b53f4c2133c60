use serde::Deserialize;

/// Main configuration structure for the catalog builder
///
/// Every section has defaults, so an empty file (or no file) describes the
/// public SCP wiki series lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub snapshot: SnapshotConfig,
}

/// Where entries are discovered and how index pages are read
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL relative entry links are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Literal code prefix, e.g. "SCP" for codes like "SCP-173"
    #[serde(rename = "code-prefix")]
    pub code_prefix: String,

    /// CSS selector of the single content region on an index page
    #[serde(rename = "content-selector")]
    pub content_selector: String,

    /// Index pages to crawl, in order
    pub lists: Vec<SourceList>,
}

/// One index page and the category label its entries get
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceList {
    pub url: String,
    pub category: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Pause between consecutive fetches (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

/// Snapshot file configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Path to the JSON snapshot file
    pub path: String,
}

const WIKI_BASE: &str = "http://www.scp-wiki.net";

const DEFAULT_LISTS: &[(&str, &str)] = &[
    ("joke-scps", "joke"),
    ("archived-scps", "archived"),
    ("decommissioned-scps", "decommissioned"),
    ("scp-ex", "explained"),
    ("scp-series", "series 1"),
    ("scp-series-2", "series 2"),
    ("scp-series-3", "series 3"),
];

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: WIKI_BASE.to_string(),
            code_prefix: "SCP".to_string(),
            content_selector: "#page-content .content-panel.standalone.series".to_string(),
            lists: DEFAULT_LISTS
                .iter()
                .map(|(page, category)| SourceList {
                    url: format!("{}/{}", WIKI_BASE, page),
                    category: category.to_string(),
                })
                .collect(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            request_delay_ms: 0,
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/scp-catalog/scp-catalog".to_string(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: "catalog.json".to_string(),
        }
    }
}
