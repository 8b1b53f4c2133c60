//! Catalog entry definitions
//!
//! An entry is created by a successful detail-page parse during a crawl or by
//! reading a snapshot, and never changes afterwards.
use crate::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One catalog record describing a wiki entry
///
/// The serialized field names are the snapshot keys, shared with catalog files
/// written by earlier versions of the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Code as labelled on the index page (e.g. "SCP-173")
    #[serde(rename = "scp_id")]
    pub code: String,

    /// Code reported by the detail page itself ("Item #:")
    #[serde(rename = "lore_id")]
    pub lore_code: String,

    /// Object class, free text
    #[serde(rename = "scp_class")]
    pub class_tag: String,

    /// Label of the index page the entry was discovered under
    pub category: String,

    /// Display name
    pub title: String,

    /// Description, already truncated
    pub description: String,

    /// Absolute URL of the detail page
    #[serde(rename = "url")]
    pub source_url: String,
}

impl Entry {
    /// Creates a new entry, rejecting an empty code or title
    pub fn new(
        code: impl Into<String>,
        lore_code: impl Into<String>,
        class_tag: impl Into<String>,
        category: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let entry = Self {
            code: code.into(),
            lore_code: lore_code.into(),
            class_tag: class_tag.into(),
            category: category.into(),
            title: title.into(),
            description: description.into(),
            source_url: source_url.into(),
        };
        entry.validate().map_err(CatalogError::InvalidEntry)?;
        Ok(entry)
    }

    /// Checks the invariants an admitted entry must hold
    pub fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err(format!("entry '{}' has an empty code", self.title));
        }
        if self.title.trim().is_empty() {
            return Err(format!("entry '{}' has an empty title", self.code));
        }
        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Item Name: {}, Item #: {}, Class: {}, Description: {}",
            self.title, self.code, self.class_tag, self.description
        )
    }
}
