//! Crawler module for building the catalog from the wiki
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Index and detail page parsing
//! - Markup stripping for detail pages
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod text;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, format_user_agent, Fetcher, HttpFetcher};
pub use parser::{
    parse_detail_page, parse_index_page, truncate_description, DetailFields, EntryRef,
    IndexRules, DESCRIPTION_LIMIT, TRUNCATION_MARKER,
};
pub use text::{strip_markup, HtmlStripper, TextNormalizer};
