//! Pipe-delimited table text → grid of string cells.
//!
//! The first non-blank line is the header. It names the columns and is not
//! part of the output. A markdown separator row (`|---|:--:|`) directly below
//! it is skipped. Columns whose header cell is empty, which is what leading
//! and trailing pipes produce, are dropped from every row.
//!
//! Rows shorter than the header are padded with empty cells; rows longer than
//! the header are a structural error.

use crate::error::TableParseError;

/// Parse `text` into data rows, header excluded, every cell trimmed.
pub fn parse(text: &str) -> Result<Vec<Vec<String>>, TableParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or(TableParseError::Empty)?;
    let header = split_cells(header);
    let keep: Vec<usize> = header
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .map(|(i, _)| i)
        .collect();
    if keep.is_empty() {
        return Err(TableParseError::NoColumns);
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (position, (index, line)) in lines.enumerate() {
        if position == 0 && is_separator_row(line) {
            continue;
        }
        let cells = split_cells(line);
        if cells.len() > header.len() {
            return Err(TableParseError::RaggedRow {
                line: index + 1,
                expected: header.len(),
                found: cells.len(),
            });
        }
        rows.push(
            keep.iter()
                .map(|&i| cells.get(i).cloned().unwrap_or_default())
                .collect(),
        );
    }

    if rows.is_empty() {
        return Err(TableParseError::NoRows);
    }
    Ok(rows)
}

fn split_cells(line: &str) -> Vec<String> {
    line.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// A row made only of `|`, `-`, `:` and whitespace, with at least one dash.
fn is_separator_row(line: &str) -> bool {
    line.contains('-')
        && line
            .chars()
            .all(|c| c == '|' || c == '-' || c == ':' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn bare_two_column_table() {
        assert_eq!(parse("A|B\n--|--\n1|2").unwrap(), grid(&[&["1", "2"]]));
    }

    #[test]
    fn outer_pipes_are_dropped() {
        let md = "| Name | Qty |\n|:-----|----:|\n| bolt |  12 |\n| nut  |   7 |\n";
        assert_eq!(
            parse(md).unwrap(),
            grid(&[&["bolt", "12"], &["nut", "7"]])
        );
    }

    #[test]
    fn missing_separator_keeps_first_data_row() {
        assert_eq!(
            parse("A|B\n1|2\n3|4").unwrap(),
            grid(&[&["1", "2"], &["3", "4"]])
        );
    }

    #[test]
    fn short_rows_are_padded() {
        assert_eq!(
            parse("| A | B | C |\n|---|---|---|\n| 1 | 2 |").unwrap(),
            grid(&[&["1", "2", ""]])
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(
            parse("\nA|B\n\n--|--\n1|2\n\n").unwrap(),
            grid(&[&["1", "2"]])
        );
    }

    #[test]
    fn plain_text_lines_form_a_single_column() {
        assert_eq!(
            parse("Quarter\nQ1\nQ2").unwrap(),
            grid(&[&["Q1"], &["Q2"]])
        );
    }

    #[test]
    fn structural_failures() {
        assert_eq!(parse(""), Err(TableParseError::Empty));
        assert_eq!(parse("  \n \n"), Err(TableParseError::Empty));
        assert_eq!(parse("no delimiters here"), Err(TableParseError::NoRows));
        assert_eq!(parse("A|B\n--|--"), Err(TableParseError::NoRows));
        assert_eq!(parse("|  |\n| 1 |"), Err(TableParseError::NoColumns));
        assert_eq!(
            parse("A|B\n--|--\n1|2|3"),
            Err(TableParseError::RaggedRow {
                line: 3,
                expected: 2,
                found: 3
            })
        );
    }
}
