use crate::config::types::{
    Config, CrawlerConfig, SnapshotConfig, SourceConfig, SourceList, UserAgentConfig,
};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_snapshot_config(&config.snapshot)?;
    Ok(())
}

/// Validates the wiki source description
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    validate_http_url(&config.base_url, "base_url")?;

    if config.code_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "code_prefix cannot be empty".to_string(),
        ));
    }

    if !config.code_prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "code_prefix must be alphanumeric, got '{}'",
            config.code_prefix
        )));
    }

    Selector::parse(&config.content_selector).map_err(|_| {
        ConfigError::Validation(format!(
            "content_selector '{}' is not a valid CSS selector",
            config.content_selector
        ))
    })?;

    validate_source_lists(&config.lists)
}

/// Validates index page entries
fn validate_source_lists(lists: &[SourceList]) -> Result<(), ConfigError> {
    if lists.is_empty() {
        return Err(ConfigError::Validation(
            "at least one source list is required".to_string(),
        ));
    }

    let mut categories = HashSet::new();
    for list in lists {
        validate_http_url(&list.url, "source list url")?;

        if list.category.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Source list '{}' must have a category",
                list.url
            )));
        }

        if !categories.insert(list.category.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Category '{}' is listed more than once",
                list.category
            )));
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates snapshot configuration
fn validate_snapshot_config(config: &SnapshotConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "snapshot path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates that a URL parses and uses http or https
fn validate_http_url(raw: &str, what: &str) -> Result<(), ConfigError> {
    let url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{} '{}': {}", what, raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            what, raw
        )));
    }

    Ok(())
}
