//! Single-pass scan of the element stream into a page-grouped document.
//!
//! [`PageAggregator`] is the accumulator of a fold over the elements. It
//! carries the section/sub-section in effect across elements and pages;
//! only `Title` elements change it. Everything else about an item is derived
//! from its own element.
//!
//! Elements must be pushed in stream order: an item's section depends on
//! every `Title` pushed before it.

use crate::output::{ContentItem, ContentType, Document, PageGroup};
use crate::pipeline::element::{DocumentElement, ElementCategory};
use crate::pipeline::{classify, section, table};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Carried heading state plus the items collected so far, keyed by page.
#[derive(Debug, Default)]
pub struct PageAggregator {
    current_section: Option<String>,
    current_subsection: Option<String>,
    pages: BTreeMap<u32, Vec<ContentItem>>,
}

impl PageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_section(&self) -> Option<&str> {
        self.current_section.as_deref()
    }

    pub fn current_subsection(&self) -> Option<&str> {
        self.current_subsection.as_deref()
    }

    /// Turn one element into a content item and append it to its page.
    pub fn push(&mut self, element: &DocumentElement) {
        let content_type = classify::classify(&element.category);
        let heading = section::detect(&element.text);

        if element.category == ElementCategory::Title {
            match &heading {
                Some(h) => {
                    self.current_section = Some(h.label.clone());
                    self.current_subsection = Some(h.remainder.clone());
                }
                None => {
                    self.current_section = Some(element.text.trim().to_string());
                    self.current_subsection = None;
                }
            }
        }

        let page = element.page_number();
        let mut item = ContentItem {
            content_type,
            section: self.current_section.clone(),
            sub_section: self.current_subsection.clone(),
            description: None,
            text: None,
            table_data: None,
        };

        match content_type {
            ContentType::Table => {
                item.table_data = match table::parse(&element.text) {
                    Ok(grid) => Some(grid),
                    Err(e) => {
                        warn!(page, "Failed to parse markdown table: {e}");
                        None
                    }
                };
                item.description = Some(format!("Table on page {page}"));
            }
            ContentType::Chart => {
                item.description = Some(format!(
                    "Chart/Image on page {page} (category: {})",
                    element.category
                ));
            }
            ContentType::Paragraph => {
                item.text = Some(element.text.clone());
                if heading.is_some() {
                    item.description = Some("Section header".to_string());
                }
            }
        }

        // Appended whatever the description already says.
        if let Some(coordinates) = element.coordinates() {
            let mut description = item.description.take().unwrap_or_default();
            description.push_str(&format!(" (bbox={coordinates})"));
            item.description = Some(description);
        }

        debug!(
            page,
            kind = %content_type,
            section = ?item.section,
            "aggregated {} element",
            element.category
        );
        self.pages.entry(page).or_default().push(item);
    }

    /// Pages in ascending order, items in arrival order.
    pub fn finish(self) -> Document {
        Document {
            pages: self
                .pages
                .into_iter()
                .map(|(page_number, content)| PageGroup {
                    page_number,
                    content,
                })
                .collect(),
        }
    }
}

/// Fold a whole element stream into a [`Document`].
pub fn aggregate<'a, I>(elements: I) -> Document
where
    I: IntoIterator<Item = &'a DocumentElement>,
{
    elements
        .into_iter()
        .fold(PageAggregator::new(), |mut acc, element| {
            acc.push(element);
            acc
        })
        .finish()
}
