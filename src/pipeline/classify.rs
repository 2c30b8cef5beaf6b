//! Element category → schema content kind.

use crate::output::ContentType;
use crate::pipeline::element::ElementCategory;

/// Map an engine category to the content kind it is emitted as.
///
/// Total: every category not listed below is a paragraph, titles included.
pub fn classify(category: &ElementCategory) -> ContentType {
    match category {
        ElementCategory::Table => ContentType::Table,
        ElementCategory::Image | ElementCategory::FigureCaption => ContentType::Chart,
        _ => ContentType::Paragraph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_mappings() {
        assert_eq!(classify(&ElementCategory::Table), ContentType::Table);
        assert_eq!(classify(&ElementCategory::Image), ContentType::Chart);
        assert_eq!(classify(&ElementCategory::FigureCaption), ContentType::Chart);
    }

    #[test]
    fn everything_else_is_a_paragraph() {
        for label in [
            "Title",
            "NarrativeText",
            "UncategorizedText",
            "ListItem",
            "Header",
            "Footer",
            "Formula",
            "CodeSnippet",
            "table",
            "",
        ] {
            assert_eq!(
                classify(&ElementCategory::from(label)),
                ContentType::Paragraph,
                "{label:?}"
            );
        }
    }
}
