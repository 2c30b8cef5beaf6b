//! Output types: the page-grouped document tree and conversion statistics.
//!
//! The serialised shape of [`Document`] is the file format written by
//! [`crate::convert::convert_to_file`]:
//!
//! ```text
//! { "pages": [ { "page_number": 1, "content": [ { "type": "paragraph",
//!   "section": …, "sub_section": …, "description": …, "text": …,
//!   "table_data": … } ] } ] }
//! ```
//!
//! Every `ContentItem` key is always present; absent values serialise as `null`.

use crate::config::Strategy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema-level kind of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Paragraph,
    Table,
    Chart,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentType::Paragraph => "paragraph",
            ContentType::Table => "table",
            ContentType::Chart => "chart",
        })
    }
}

/// One unit of page content.
///
/// `text` is populated for paragraphs only; `table_data` for tables only
/// (and may still be `None` when the table text could not be parsed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Section heading in effect when this item was read.
    pub section: Option<String>,
    /// Sub-section heading in effect when this item was read.
    pub sub_section: Option<String>,
    /// Caption, section-header marker and/or bounding-box annotation.
    pub description: Option<String>,
    pub text: Option<String>,
    pub table_data: Option<Vec<Vec<String>>>,
}

/// Content of a single page, in element-stream order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGroup {
    pub page_number: u32,
    pub content: Vec<ContentItem>,
}

/// The full converted document, pages ascending by number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<PageGroup>,
}

impl Document {
    /// Total number of content items across all pages.
    pub fn content_item_count(&self) -> usize {
        self.pages.iter().map(|p| p.content.len()).sum()
    }

    /// Look up a page by its 1-based number.
    pub fn page(&self, page_number: u32) -> Option<&PageGroup> {
        self.pages
            .binary_search_by_key(&page_number, |p| p.page_number)
            .ok()
            .map(|i| &self.pages[i])
    }
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Page count reported by the page counter (`None` if it failed).
    pub total_pages: Option<usize>,
    /// Pages present in the output (pages with at least one element).
    pub pages: usize,
    /// Content items across all pages.
    pub content_items: usize,
    /// Elements returned by the extraction engine.
    pub elements: usize,
    /// Strategy that produced the element stream.
    pub strategy: Strategy,
    /// Extraction attempts made, including the successful one.
    pub attempts: usize,
    pub duration_ms: u64,
}

/// Result of [`crate::convert::convert`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub document: Document,
    pub stats: ConversionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(content_type: ContentType) -> ContentItem {
        ContentItem {
            content_type,
            section: None,
            sub_section: None,
            description: None,
            text: None,
            table_data: None,
        }
    }

    #[test]
    fn absent_fields_serialise_as_null() {
        let json = serde_json::to_value(item(ContentType::Chart)).unwrap();
        assert_eq!(json["type"], "chart");
        for key in ["section", "sub_section", "description", "text", "table_data"] {
            assert!(json.get(key).is_some(), "missing key {key}");
            assert!(json[key].is_null(), "{key} should be null");
        }
    }

    #[test]
    fn page_lookup_and_counts() {
        let doc = Document {
            pages: vec![
                PageGroup {
                    page_number: 1,
                    content: vec![item(ContentType::Paragraph), item(ContentType::Table)],
                },
                PageGroup {
                    page_number: 4,
                    content: vec![item(ContentType::Chart)],
                },
            ],
        };
        assert_eq!(doc.content_item_count(), 3);
        assert_eq!(doc.page(4).map(|p| p.content.len()), Some(1));
        assert!(doc.page(2).is_none());
    }
}
