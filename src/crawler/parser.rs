//! Page parsers for index and detail pages
//!
//! This module turns fetched documents into structured data:
//! - Index pages: the ordered list of entry references (code, title, detail URL)
//! - Detail pages: the (lore code, class, description) triple
//!
//! Both parsers are pure; they never perform I/O.

use crate::config::SourceConfig;
use crate::ParseError;
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Maximum description length, in characters
pub const DESCRIPTION_LIMIT: usize = 250;

/// Appended to a description that was cut
pub const TRUNCATION_MARKER: &str = "...";

/// A link to an entry found on an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    /// Code as shown in the link text
    pub code: String,

    /// Title text following the link, may be empty
    pub title: String,

    /// Absolute URL of the entry's detail page
    pub detail_url: String,
}

/// Fields extracted from a detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
    pub lore_code: String,
    pub class_tag: String,
    pub description: String,
}

/// Compiled rules for reading index pages
#[derive(Debug, Clone)]
pub struct IndexRules {
    base_url: Url,
    content_selector: Selector,
    content_selector_text: String,
    link_selector: Selector,
    code_pattern: Regex,
}

impl IndexRules {
    /// Compiles index page rules
    ///
    /// # Arguments
    ///
    /// * `base_url` - URL relative links are resolved against
    /// * `code_prefix` - Literal prefix of entry codes (e.g. "SCP")
    /// * `content_selector` - CSS selector of the page's content region
    pub fn new(base_url: &str, code_prefix: &str, content_selector: &str) -> Result<Self, ParseError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ParseError::InvalidBaseUrl(base_url.to_string()))?;
        let selector = Selector::parse(content_selector)
            .map_err(|_| ParseError::InvalidSelector(content_selector.to_string()))?;
        let link_selector =
            Selector::parse("a[href]").map_err(|_| ParseError::InvalidSelector("a[href]".to_string()))?;
        let code_pattern = Regex::new(&format!(r"^{}-[A-Za-z0-9-]+$", regex::escape(code_prefix)))
            .map_err(|_| ParseError::InvalidSelector(code_prefix.to_string()))?;

        Ok(Self {
            base_url,
            content_selector: selector,
            content_selector_text: content_selector.to_string(),
            link_selector,
            code_pattern,
        })
    }

    /// Compiles the rules described by the source configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self, ParseError> {
        Self::new(
            &config.base_url,
            &config.code_prefix,
            &config.content_selector,
        )
    }

    /// Returns true if `text` is an entry code under these rules
    pub fn is_code(&self, text: &str) -> bool {
        self.code_pattern.is_match(text)
    }
}

/// Extracts entry references from an index page
///
/// Every link inside the content region whose text is an entry code becomes a
/// reference, in document order. The title is the text that follows the link
/// within its parent element, with a repeated code and separator dashes removed.
///
/// # Returns
///
/// * `Ok(Vec<EntryRef>)` - References in page order
/// * `Err(ParseError::MissingContent)` - The content region is absent
///
/// # Example
///
/// ```
/// use scp_catalog::crawler::{parse_index_page, IndexRules};
///
/// let rules = IndexRules::new("http://www.scp-wiki.net", "SCP", "#page-content").unwrap();
/// let html = r#"<div id="page-content"><ul>
///     <li><a href="/scp-173">SCP-173</a> - The Sculpture</li>
/// </ul></div>"#;
/// let refs = parse_index_page(html, &rules).unwrap();
/// assert_eq!(refs[0].title, "The Sculpture");
/// assert_eq!(refs[0].detail_url, "http://www.scp-wiki.net/scp-173");
/// ```
pub fn parse_index_page(html: &str, rules: &IndexRules) -> Result<Vec<EntryRef>, ParseError> {
    let document = Html::parse_document(html);

    let region = document
        .select(&rules.content_selector)
        .next()
        .ok_or_else(|| ParseError::MissingContent {
            selector: rules.content_selector_text.clone(),
        })?;

    let mut references = Vec::new();
    for link in region.select(&rules.link_selector) {
        let code = link.text().collect::<String>().trim().to_string();
        if !rules.is_code(&code) {
            continue;
        }

        let Some(href) = link.value().attr("href") else {
            continue;
        };

        let detail_url = match rules.base_url.join(href.trim()) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!("Ignoring {} with unusable link '{}': {}", code, href, e);
                continue;
            }
        };

        let title = clean_title(&following_text(link), &code);
        references.push(EntryRef {
            code,
            title,
            detail_url,
        });
    }

    Ok(references)
}

/// Extracts the (lore code, class, description) triple from a detail page
///
/// `text` is the page's plain-text rendering. Each field is the text between
/// its label and the next line break.
///
/// # Returns
///
/// * `Ok(DetailFields)` - All three fields were found
/// * `Err(ParseError::MissingField)` - Not a valid entry page
pub fn parse_detail_page(text: &str) -> Result<DetailFields, ParseError> {
    let lore_code = capture_field(text, ITEM_LABEL)?;
    let class_tag = capture_field(text, CLASS_LABEL)?;
    let description = capture_field(text, DESCRIPTION_LABEL)?;

    Ok(DetailFields {
        lore_code,
        class_tag,
        description: truncate_description(&description, DESCRIPTION_LIMIT),
    })
}

/// Cuts `text` to at most `limit` characters plus [`TRUNCATION_MARKER`]
///
/// A cut text is shortened further to its last space so words stay whole.
/// Text of `limit` characters or fewer is returned unchanged.
pub fn truncate_description(text: &str, limit: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(limit) else {
        return text.to_string();
    };

    let head = &text[..cut];
    let head = head.rsplit_once(' ').map_or(head, |(before, _)| before);
    format!("{}{}", head, TRUNCATION_MARKER)
}

const ITEM_LABEL: &str = "Item #:";
const CLASS_LABEL: &str = "Object Class:";
const DESCRIPTION_LABEL: &str = "Description:";

/// Text between the first occurrence of `label` and the next line break
fn capture_field(text: &str, label: &'static str) -> Result<String, ParseError> {
    let start = text
        .find(label)
        .ok_or(ParseError::MissingField { label })?
        + label.len();
    let rest = &text[start..];
    let end = rest.find(['\r', '\n']).unwrap_or(rest.len());

    let value = rest[..end].trim();
    if value.is_empty() {
        return Err(ParseError::MissingField { label });
    }
    Ok(value.to_string())
}

/// Collects the text of every node after `link` within the same parent
fn following_text(link: ElementRef<'_>) -> String {
    let mut text = String::new();
    for sibling in link.next_siblings() {
        match sibling.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(sibling) {
                    text.extend(element.text());
                }
            }
            _ => {}
        }
    }
    text
}

/// Removes a leading copy of the code and separator dashes, collapses whitespace
fn clean_title(raw: &str, code: &str) -> String {
    let mut title = raw.trim();

    if let Some(prefix) = title.get(..code.len()) {
        if prefix.eq_ignore_ascii_case(code) {
            title = &title[code.len()..];
        }
    }

    let title = title.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':'));
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> IndexRules {
        IndexRules::new(
            "http://www.scp-wiki.net",
            "SCP",
            "#page-content .content-panel.standalone.series",
        )
        .unwrap()
    }

    fn index_page(items: &str) -> String {
        format!(
            r#"<html><body><div id="page-content">
            <div class="content-panel standalone series"><ul>{}</ul></div>
            </div></body></html>"#,
            items
        )
    }

    #[test]
    fn test_parse_index_page_in_order() {
        let html = index_page(
            r#"<li><a href="/scp-002">SCP-002</a> - The "Living" Room</li>
               <li><a href="/scp-003">SCP-003</a> - Biological Motherboard</li>
               <li><a href="/scp-004">SCP-004</a> - The 12 Rusty Keys and the Door</li>"#,
        );

        let refs = parse_index_page(&html, &rules()).unwrap();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].code, "SCP-002");
        assert_eq!(refs[0].title, "The \"Living\" Room");
        assert_eq!(refs[0].detail_url, "http://www.scp-wiki.net/scp-002");
        assert_eq!(refs[2].code, "SCP-004");
    }

    #[test]
    fn test_non_code_links_ignored() {
        let html = index_page(
            r#"<li><a href="/about">About the Foundation</a></li>
               <li><a href="/scp-173">SCP-173</a> - The Sculpture</li>
               <li><a href="/scp-ex">SCP-EX explained</a></li>"#,
        );

        let refs = parse_index_page(&html, &rules()).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].code, "SCP-173");
    }

    #[test]
    fn test_links_outside_content_region_ignored() {
        let html = r#"<html><body>
            <div id="side-bar"><a href="/scp-001">SCP-001</a> - Sidebar</div>
            <div id="page-content"><div class="content-panel standalone series">
              <ul><li><a href="/scp-999">SCP-999</a> - The Tickle Monster</li></ul>
            </div></div></body></html>"#;

        let refs = parse_index_page(html, &rules()).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].code, "SCP-999");
    }

    #[test]
    fn test_missing_content_region() {
        let html = r#"<html><body><div id="page-content"><p>Moved</p></div></body></html>"#;
        let result = parse_index_page(html, &rules());
        assert!(matches!(result, Err(ParseError::MissingContent { .. })));
    }

    #[test]
    fn test_title_with_markup_and_alphanumeric_codes() {
        let html = index_page(
            r#"<li><a href="/scp-1000-j">SCP-1000-J</a> - <em>Bigfoot</em>, again</li>
               <li><a href="http://other.example/scp-ex-1">SCP-EX-1</a> – Explained</li>"#,
        );

        let refs = parse_index_page(&html, &rules()).unwrap();
        assert_eq!(refs[0].code, "SCP-1000-J");
        assert_eq!(refs[0].title, "Bigfoot, again");
        assert_eq!(refs[1].title, "Explained");
        assert_eq!(refs[1].detail_url, "http://other.example/scp-ex-1");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let html = index_page(r#"<li><a href="/scp-1234">SCP-1234</a></li>"#);
        let refs = parse_index_page(&html, &rules()).unwrap();
        assert_eq!(refs[0].title, "");
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title(" - The Sculpture ", "SCP-173"), "The Sculpture");
        assert_eq!(clean_title("SCP-173 - The Sculpture", "SCP-173"), "The Sculpture");
        assert_eq!(clean_title(" —  Two   Words", "SCP-1"), "Two Words");
        assert_eq!(clean_title("-", "SCP-1"), "");
    }

    #[test]
    fn test_invalid_rules() {
        assert!(matches!(
            IndexRules::new("not a url", "SCP", "div"),
            Err(ParseError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            IndexRules::new("http://x.example", "SCP", "div[["),
            Err(ParseError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_parse_detail_page() {
        let text = "SCP-173 - SCP Foundation\n\
                    Item #: SCP-173\n\
                    Object Class: Euclid\n\
                    Special Containment Procedures: Keep it in sight.\n\
                    Description: Moved to Site-19 1993. Origin is as of yet unknown.\n";

        let fields = parse_detail_page(text).unwrap();
        assert_eq!(fields.lore_code, "SCP-173");
        assert_eq!(fields.class_tag, "Euclid");
        assert_eq!(
            fields.description,
            "Moved to Site-19 1993. Origin is as of yet unknown."
        );
    }

    #[test]
    fn test_detail_page_missing_object_class() {
        let text = "Item #: SCP-173\nDescription: A statue.\n";
        assert_eq!(
            parse_detail_page(text),
            Err(ParseError::MissingField {
                label: "Object Class:"
            })
        );
    }

    #[test]
    fn test_detail_page_empty_field_is_missing() {
        let text = "Item #:   \nObject Class: Safe\nDescription: Something.\n";
        assert_eq!(
            parse_detail_page(text),
            Err(ParseError::MissingField { label: "Item #:" })
        );
    }

    #[test]
    fn test_detail_page_not_an_entry() {
        let text = "This page doesn't exist yet!\n";
        assert!(parse_detail_page(text).is_err());
    }

    #[test]
    fn test_detail_description_truncated() {
        let long = "word ".repeat(100);
        let text = format!("Item #: SCP-1\nObject Class: Safe\nDescription: {}\n", long);

        let fields = parse_detail_page(&text).unwrap();
        assert!(fields.description.ends_with(TRUNCATION_MARKER));
        assert!(fields.description.chars().count() <= DESCRIPTION_LIMIT + TRUNCATION_MARKER.len());
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        let exact = "a".repeat(DESCRIPTION_LIMIT);
        assert_eq!(truncate_description(&exact, DESCRIPTION_LIMIT), exact);
        assert_eq!(truncate_description("short", DESCRIPTION_LIMIT), "short");
    }

    #[test]
    fn test_truncate_long_text_without_spaces() {
        let long = "a".repeat(DESCRIPTION_LIMIT + 1);
        let truncated = truncate_description(&long, DESCRIPTION_LIMIT);
        assert_eq!(truncated, format!("{}...", "a".repeat(DESCRIPTION_LIMIT)));
    }

    #[test]
    fn test_truncate_at_word_boundary() {
        assert_eq!(truncate_description("one two three", 9), "one two...");
    }

    #[test]
    fn test_truncate_multibyte_characters() {
        let long = "é".repeat(DESCRIPTION_LIMIT + 10);
        let truncated = truncate_description(&long, DESCRIPTION_LIMIT);
        assert_eq!(
            truncated.chars().count(),
            DESCRIPTION_LIMIT + TRUNCATION_MARKER.len()
        );
    }
}
