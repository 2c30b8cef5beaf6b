//! Numbered-heading detection.
//!
//! A heading is a dotted run of digit groups (`1`, `1.2`, `2.3.4`), then
//! whitespace, then the heading text, all on one line. `1. Introduction` does
//! not qualify: a dot must be followed by another digit group.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_NUMBERED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)*)\s+(.+)$").unwrap());

/// A detected numbered heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeading {
    /// The full dotted number, e.g. `1.2`.
    pub label: String,
    /// Heading text following the number.
    pub remainder: String,
}

/// Detect whether `text` opens with a numbered heading.
///
/// Leading and trailing whitespace is ignored. Returns `None` for empty text
/// and for anything not of the form `<digits>(.<digits>)* <text>` on a single
/// line.
pub fn detect(text: &str) -> Option<SectionHeading> {
    let caps = RE_NUMBERED_HEADING.captures(text.trim())?;
    Some(SectionHeading {
        label: caps[1].to_string(),
        remainder: caps[2].to_string(),
    })
}
