//! SCP Catalog: a queryable catalog of SCP wiki entries
//!
//! This crate crawls the wiki's fixed set of series index pages, parses every
//! listed entry's detail page and keeps the results in an in-memory catalog
//! indexed by code and by title. The catalog can be snapshotted to a JSON file
//! and queried by code.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;
pub mod query;
pub mod service;
pub mod snapshot;

use thiserror::Error;

/// Main error type for catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] snapshot::SnapshotError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failure to retrieve a page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (DNS, refused connection, timeout, broken body)
    #[error("Unable to fetch {url}: {message}")]
    Connection { url: String, message: String },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

impl TransportError {
    /// The URL the failed request was for
    pub fn url(&self) -> &str {
        match self {
            Self::Connection { url, .. } | Self::Status { url, .. } => url,
        }
    }
}

/// Expected structure was absent from a fetched document
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Content region '{selector}' not found, page layout may have changed")]
    MissingContent { selector: String },

    #[error("Invalid or unreadable entry: '{label}' not found")]
    MissingField { label: &'static str },

    #[error("Invalid CSS selector '{0}'")]
    InvalidSelector(String),

    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{Catalog, Entry, SharedCatalog};
pub use config::Config;
pub use query::lookup;
pub use service::CatalogService;
