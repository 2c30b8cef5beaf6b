//! The element stream produced by the extraction engine.
//!
//! A [`DocumentElement`] is one coarse unit of content (a title, a run of
//! narrative text, a table, an image…) with its page and optional geometry.
//! Elements (de)serialise in the engine's interchange shape so a stream can
//! be dumped to disk and replayed into [`crate::convert::aggregate_elements`]:
//!
//! ```json
//! {"type": "Title", "text": "1.2 Scope",
//!  "metadata": {"page_number": 3, "coordinates": {"points": [[72.0, 90.5], …]}}}
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Coarse category label assigned by the extraction engine.
///
/// The set is open: labels this crate does not know round-trip through
/// [`ElementCategory::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementCategory {
    Title,
    NarrativeText,
    UncategorizedText,
    ListItem,
    Table,
    Image,
    FigureCaption,
    Header,
    Footer,
    PageNumber,
    Formula,
    Other(String),
}

impl ElementCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ElementCategory::Title => "Title",
            ElementCategory::NarrativeText => "NarrativeText",
            ElementCategory::UncategorizedText => "UncategorizedText",
            ElementCategory::ListItem => "ListItem",
            ElementCategory::Table => "Table",
            ElementCategory::Image => "Image",
            ElementCategory::FigureCaption => "FigureCaption",
            ElementCategory::Header => "Header",
            ElementCategory::Footer => "Footer",
            ElementCategory::PageNumber => "PageNumber",
            ElementCategory::Formula => "Formula",
            ElementCategory::Other(label) => label,
        }
    }
}

impl From<String> for ElementCategory {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Title" => ElementCategory::Title,
            "NarrativeText" => ElementCategory::NarrativeText,
            "UncategorizedText" => ElementCategory::UncategorizedText,
            "ListItem" => ElementCategory::ListItem,
            "Table" => ElementCategory::Table,
            "Image" => ElementCategory::Image,
            "FigureCaption" => ElementCategory::FigureCaption,
            "Header" => ElementCategory::Header,
            "Footer" => ElementCategory::Footer,
            "PageNumber" => ElementCategory::PageNumber,
            "Formula" => ElementCategory::Formula,
            _ => ElementCategory::Other(label),
        }
    }
}

impl From<&str> for ElementCategory {
    fn from(label: &str) -> Self {
        ElementCategory::from(label.to_string())
    }
}

impl From<ElementCategory> for String {
    fn from(category: ElementCategory) -> Self {
        match category {
            ElementCategory::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounding geometry as a sequence of `(x, y)` points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub points: Vec<(f64, f64)>,
}

impl Coordinates {
    /// Axis-aligned box as four corners: top-left, bottom-left, bottom-right, top-right.
    pub fn from_box(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            points: vec![(left, top), (left, bottom), (right, bottom), (right, top)],
        }
    }
}

impl fmt::Display for Coordinates {
    /// `((x, y), (x, y), …)` with floats always carrying a fractional part.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, (x, y)) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({x:?}, {y:?})")?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementMetadata {
    /// 1-based page number.
    pub page_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// One element of the extraction engine's output stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentElement {
    #[serde(rename = "type")]
    pub category: ElementCategory,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    pub metadata: ElementMetadata,
}

impl DocumentElement {
    pub fn new(category: impl Into<ElementCategory>, text: impl Into<String>, page_number: u32) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
            metadata: ElementMetadata {
                page_number,
                coordinates: None,
            },
        }
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.metadata.coordinates = Some(coordinates);
        self
    }

    pub fn page_number(&self) -> u32 {
        self.metadata.page_number
    }

    pub fn coordinates(&self) -> Option<&Coordinates> {
        self.metadata.coordinates.as_ref()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_categories() {
        assert_eq!(ElementCategory::from("Table"), ElementCategory::Table);
        assert_eq!(
            ElementCategory::from("CodeSnippet"),
            ElementCategory::Other("CodeSnippet".into())
        );
        assert_eq!(ElementCategory::Other("Address".into()).to_string(), "Address");
    }

    #[test]
    fn deserialises_engine_shape() {
        let json = r#"[
            {"type": "Title", "element_id": "abc", "text": "1.2 Scope",
             "metadata": {"page_number": 3, "filename": "a.pdf",
                          "coordinates": {"points": [[1.0, 2.0], [3.5, 4.0]], "system": "PixelSpace"}}},
            {"type": "EmailAddress", "text": null, "metadata": {"page_number": 4}}
        ]"#;
        let elements: Vec<DocumentElement> = serde_json::from_str(json).unwrap();
        assert_eq!(elements[0].category, ElementCategory::Title);
        assert_eq!(elements[0].page_number(), 3);
        assert_eq!(
            elements[0].coordinates().map(|c| c.points.len()),
            Some(2)
        );
        assert_eq!(elements[1].category, ElementCategory::Other("EmailAddress".into()));
        assert_eq!(elements[1].text, "");
        assert!(elements[1].coordinates().is_none());
    }

    #[test]
    fn category_serialises_as_label() {
        let el = DocumentElement::new("FigureCaption", "Figure 1: x", 2);
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "FigureCaption");
        assert!(json["metadata"].get("coordinates").is_none());
    }

    #[test]
    fn coordinates_display() {
        let c = Coordinates::from_box(10.0, 20.0, 110.5, 40.0);
        assert_eq!(
            c.to_string(),
            "((10.0, 20.0), (10.0, 40.0), (110.5, 40.0), (110.5, 20.0))"
        );
    }
}
