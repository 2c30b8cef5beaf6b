//! Layout analysis for the built-in engine: positioned text → elements.
//!
//! Everything here is pure so it can be tested without a pdfium library.
//! Coordinates use a top-left origin with y growing downwards, in points.
//!
//! `hi_res` input is a [`PageContent`] (text fragments with font size and
//! bounds, plus image boxes):
//!
//! 1. fragments sharing a baseline (within 30 % of the font size) form a line
//! 2. runs of ≥ 2 consecutive lines that split into the same number of
//!    columns (gaps ≥ 15pt) become a `Table` with pipe-delimited text
//! 3. remaining lines are grouped into blocks on spacing, font-size and
//!    indentation changes, then each block is classified
//! 4. images become `Image` elements; everything is ordered top to bottom
//!
//! `fast` input is the plain page text; blocks are split on blank lines and
//! around heading-shaped lines, and carry no coordinates.

use crate::pipeline::element::{Coordinates, DocumentElement, ElementCategory};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Minimum horizontal gap between two table columns, in points.
const MIN_COLUMN_GAP: f32 = 15.0;
const MIN_TABLE_ROWS: usize = 2;
const MAX_TABLE_COLUMNS: usize = 8;
/// A block this much larger than the page's body text is a title candidate.
const TITLE_FONT_RATIO: f32 = 1.15;
const MAX_HEADING_WORDS: usize = 10;
const DEFAULT_LINE_SPACING: f32 = 12.0;

static RE_FIGURE_CAPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:figure|fig\.)\s*\d+").unwrap());

static RE_LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[•◦▪‣●○*–-]|\(?[0-9A-Za-z]{1,2}\))\s+\S").unwrap());

static RE_PAGE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:page\s+)?\d{1,4}$").unwrap());

static RE_NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)*\.?\s+\S").unwrap());

/// Axis-aligned box, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    fn union(self, other: Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    fn to_coordinates(self) -> Coordinates {
        Coordinates::from_box(
            round2(self.left),
            round2(self.top),
            round2(self.right),
            round2(self.bottom),
        )
    }
}

fn round2(v: f32) -> f64 {
    (f64::from(v) * 100.0).round() / 100.0
}

/// A run of text as placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub font_size: f32,
    pub rect: Rect,
}

/// Positioned content of one page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub page_number: u32,
    pub fragments: Vec<Fragment>,
    pub images: Vec<Rect>,
}

#[derive(Debug, Clone)]
struct Line {
    fragments: Vec<Fragment>,
    rect: Rect,
    font_size: f32,
}

impl Line {
    fn from_fragments(mut fragments: Vec<Fragment>) -> Self {
        fragments.sort_by(|a, b| a.rect.left.total_cmp(&b.rect.left));

        let rect = fragments
            .iter()
            .map(|f| f.rect)
            .reduce(Rect::union)
            .unwrap_or(Rect {
                left: 0.0,
                top: 0.0,
                right: 0.0,
                bottom: 0.0,
            });

        // Weighted by text length so one large drop-cap does not dominate.
        let chars: usize = fragments.iter().map(|f| f.text.chars().count()).sum();
        let font_size = if chars > 0 {
            fragments
                .iter()
                .map(|f| f.font_size * f.text.chars().count() as f32)
                .sum::<f32>()
                / chars as f32
        } else {
            fragments.first().map(|f| f.font_size).unwrap_or(0.0)
        };

        Self {
            fragments,
            rect,
            font_size,
        }
    }

    fn text(&self) -> String {
        join_fragments(&self.fragments)
    }

    /// Text grouped into cells separated by wide horizontal gaps.
    fn cells(&self) -> Vec<String> {
        let mut cells = Vec::new();
        let mut start = 0;
        for i in 1..self.fragments.len() {
            let gap = self.fragments[i].rect.left - self.fragments[i - 1].rect.right;
            if gap >= MIN_COLUMN_GAP {
                cells.push(join_fragments(&self.fragments[start..i]));
                start = i;
            }
        }
        cells.push(join_fragments(&self.fragments[start..]));
        cells
    }

    fn baseline(&self) -> f32 {
        self.rect.bottom
    }
}

/// Concatenate fragments, inserting a space where there is a visible gap.
fn join_fragments(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Fragment> = None;
    for f in fragments {
        if let Some(p) = prev {
            let gap = f.rect.left - p.rect.right;
            if gap > f.font_size * 0.15 {
                out.push(' ');
            }
        }
        out.push_str(&f.text);
        prev = Some(f);
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn group_lines(fragments: Vec<Fragment>) -> Vec<Line> {
    let mut fragments: Vec<Fragment> = fragments
        .into_iter()
        .filter(|f| !f.text.trim().is_empty())
        .collect();
    fragments.sort_by(|a, b| {
        a.rect
            .bottom
            .total_cmp(&b.rect.bottom)
            .then(a.rect.left.total_cmp(&b.rect.left))
    });

    let mut lines = Vec::new();
    let mut current: Vec<Fragment> = Vec::new();
    let mut current_y: Option<f32> = None;

    for f in fragments {
        let tolerance = f.font_size.max(1.0) * 0.3;
        match current_y {
            Some(y) if (f.rect.bottom - y).abs() <= tolerance => current.push(f),
            _ => {
                if !current.is_empty() {
                    lines.push(Line::from_fragments(std::mem::take(&mut current)));
                }
                current_y = Some(f.rect.bottom);
                current.push(f);
            }
        }
    }
    if !current.is_empty() {
        lines.push(Line::from_fragments(current));
    }
    lines
}

/// Most common font size on the page, weighted by character count.
fn body_font_size(lines: &[Line]) -> f32 {
    let mut histogram: HashMap<i32, usize> = HashMap::new();
    for line in lines {
        for f in &line.fragments {
            *histogram.entry((f.font_size * 2.0).round() as i32).or_default() +=
                f.text.chars().count();
        }
    }
    histogram
        .into_iter()
        .max_by(|(size_a, n_a), (size_b, n_b)| n_a.cmp(n_b).then(size_b.cmp(size_a)))
        .map(|(size, _)| size as f32 / 2.0)
        .unwrap_or(0.0)
}

fn average_line_spacing(lines: &[Line]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| w[1].baseline() - w[0].baseline())
        .filter(|s| *s > 0.1)
        .collect();
    if spacings.is_empty() {
        DEFAULT_LINE_SPACING
    } else {
        spacings.iter().sum::<f32>() / spacings.len() as f32
    }
}

enum Segment {
    Text(Vec<Line>),
    Table(Vec<Line>),
}

/// Split lines into runs of ordinary text and column-aligned table rows.
fn segment_tables(lines: Vec<Line>, infer_tables: bool, spacing: f32) -> Vec<Segment> {
    if !infer_tables {
        return vec![Segment::Text(lines)];
    }

    let counts: Vec<usize> = lines.iter().map(|l| l.cells().len()).collect();
    // (run length, is table)
    let mut runs: Vec<(usize, bool)> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let columns = counts[i];
        let mut j = i + 1;
        if (2..=MAX_TABLE_COLUMNS).contains(&columns) {
            while j < lines.len()
                && counts[j] == columns
                && lines[j].baseline() - lines[j - 1].baseline() <= spacing * 2.5
            {
                j += 1;
            }
        }
        if j - i >= MIN_TABLE_ROWS {
            runs.push((j - i, true));
            i = j;
        } else {
            match runs.last_mut() {
                Some((len, false)) => *len += 1,
                _ => runs.push((1, false)),
            }
            i += 1;
        }
    }

    let mut it = lines.into_iter();
    runs.into_iter()
        .map(|(len, is_table)| {
            let chunk: Vec<Line> = it.by_ref().take(len).collect();
            if is_table {
                Segment::Table(chunk)
            } else {
                Segment::Text(chunk)
            }
        })
        .collect()
}

fn starts_new_block(text: &str) -> bool {
    RE_LIST_MARKER.is_match(text) || RE_FIGURE_CAPTION.is_match(text)
}

fn should_break_block(prev: &Line, curr: &Line, spacing: f32) -> bool {
    curr.baseline() - prev.baseline() > spacing * 1.5
        || (prev.font_size - curr.font_size).abs() > 1.0
        || (prev.rect.left - curr.rect.left).abs() > 20.0
        || starts_new_block(&curr.text())
}

fn group_blocks(lines: Vec<Line>, spacing: f32) -> Vec<Vec<Line>> {
    let mut blocks: Vec<Vec<Line>> = Vec::new();
    for line in lines {
        match blocks.last_mut() {
            Some(block)
                if block
                    .last()
                    .is_some_and(|prev| !should_break_block(prev, &line, spacing)) =>
            {
                block.push(line)
            }
            _ => blocks.push(vec![line]),
        }
    }
    blocks
}

/// A short single line that is numbered (`2.1 Scope`, `3. Results`) or all caps.
fn is_heading_line(text: &str) -> bool {
    let words = text.split_whitespace().count();
    if words == 0 || words > MAX_HEADING_WORDS {
        return false;
    }
    if text.ends_with(['.', ',', ';', ':']) {
        return false;
    }
    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    let all_caps = letters >= 2 && !text.chars().any(|c| c.is_lowercase());
    (RE_NUMBERED_LINE.is_match(text) && letters > 0) || all_caps
}

fn classify_block(text: &str, line_count: usize, large_font: bool) -> ElementCategory {
    if RE_FIGURE_CAPTION.is_match(text) {
        ElementCategory::FigureCaption
    } else if RE_LIST_MARKER.is_match(text) {
        ElementCategory::ListItem
    } else if RE_PAGE_NUMBER.is_match(text) {
        ElementCategory::PageNumber
    } else if (large_font && line_count <= 2 && text.split_whitespace().count() <= 2 * MAX_HEADING_WORDS)
        || (line_count == 1 && is_heading_line(text))
    {
        ElementCategory::Title
    } else {
        ElementCategory::NarrativeText
    }
}

fn markdown_table(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|c| c.replace('|', "/")).collect();
        out.push_str("| ");
        out.push_str(&cells.join(" | "));
        out.push_str(" |\n");
        if i == 0 {
            out.push('|');
            for _ in 0..row.len() {
                out.push_str(" --- |");
            }
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}

fn union_of(lines: &[Line]) -> Option<Rect> {
    lines.iter().map(|l| l.rect).reduce(Rect::union)
}

/// Elements of one page for the `hi_res` strategy, in reading order.
pub fn hi_res_elements(page: PageContent, infer_tables: bool) -> Vec<DocumentElement> {
    let page_number = page.page_number;
    let lines = group_lines(page.fragments);
    let body = body_font_size(&lines);
    let spacing = average_line_spacing(&lines);

    let mut placed: Vec<(f32, DocumentElement)> = Vec::new();

    for segment in segment_tables(lines, infer_tables, spacing) {
        match segment {
            Segment::Table(rows) => {
                let Some(rect) = union_of(&rows) else { continue };
                let grid: Vec<Vec<String>> = rows.iter().map(Line::cells).collect();
                let element =
                    DocumentElement::new(ElementCategory::Table, markdown_table(&grid), page_number)
                        .with_coordinates(rect.to_coordinates());
                placed.push((rect.top, element));
            }
            Segment::Text(lines) => {
                for block in group_blocks(lines, spacing) {
                    let Some(rect) = union_of(&block) else { continue };
                    let text = block.iter().map(Line::text).collect::<Vec<_>>().join(" ");
                    let font = block.iter().map(|l| l.font_size).fold(0.0_f32, f32::max);
                    let large = body > 0.0 && font >= body * TITLE_FONT_RATIO;
                    let category = classify_block(&text, block.len(), large);
                    let element = DocumentElement::new(category, text, page_number)
                        .with_coordinates(rect.to_coordinates());
                    placed.push((rect.top, element));
                }
            }
        }
    }

    for rect in page.images {
        let element = DocumentElement::new(ElementCategory::Image, "", page_number)
            .with_coordinates(rect.to_coordinates());
        placed.push((rect.top, element));
    }

    placed.sort_by(|a, b| a.0.total_cmp(&b.0));
    placed.into_iter().map(|(_, element)| element).collect()
}

/// Elements of one page for the `fast` strategy.
pub fn fast_elements(page_number: u32, page_text: &str) -> Vec<DocumentElement> {
    let text = page_text.replace("\r\n", "\n").replace('\r', "\n");
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        if is_heading_line(line) {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            blocks.push(vec![line]);
            continue;
        }
        if starts_new_block(line) && !current.is_empty() {
            blocks.push(std::mem::take(&mut current));
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
        .into_iter()
        .map(|lines| {
            let joined = lines.join(" ");
            let category = classify_block(&joined, lines.len(), false);
            DocumentElement::new(category, joined, page_number)
        })
        .collect()
}
