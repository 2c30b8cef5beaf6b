//! Error types for the pdf2json library.
//!
//! Three error types reflect three distinct recovery policies:
//!
//! * [`Pdf2JsonError`] — **Fatal**: the conversion cannot proceed at all
//!   (missing input, every extraction strategy failed, output not writable).
//!   Returned as `Err(Pdf2JsonError)` from the top-level `convert*` functions.
//!
//! * [`PartitionError`] — **Recoverable once per strategy**: the extraction
//!   engine failed with one strategy. The strategy ladder in
//!   [`crate::pipeline::partition`] moves on to the next strategy and only
//!   wraps the last one in [`Pdf2JsonError::ExtractionFailed`].
//!
//! * [`TableParseError`] — **Recovered locally**: a table element's text could
//!   not be read as a grid. The aggregator logs it and emits the item with
//!   `table_data: null`.

use crate::config::Strategy;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2json library.
#[derive(Debug, Error)]
pub enum Pdf2JsonError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// Every strategy on the ladder failed; `strategy` is the last one tried.
    #[error("Extraction failed after {attempts} attempt(s); last strategy '{strategy}': {source}")]
    ExtractionFailed {
        strategy: Strategy,
        attempts: usize,
        #[source]
        source: PartitionError,
    },

    /// The page count was explicitly requested and could not be read.
    #[error("Could not read page count: {0}")]
    PageCountFailed(#[source] PartitionError),

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be serialised to JSON.
    #[error("Failed to serialise document: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A failure of the extraction engine for one strategy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PartitionError {
    /// The engine has no implementation of the requested strategy.
    #[error("strategy '{strategy}' is not supported by the {engine} engine")]
    UnsupportedStrategy { strategy: Strategy, engine: String },

    /// Could not bind to a pdfium library.
    #[error(
        "failed to bind to pdfium library: {0}\n\
Set PDFIUM_DYNAMIC_LIB_PATH to the directory containing libpdfium, \
or install it system-wide."
    )]
    PdfiumBinding(String),

    /// PDF requires a password but none was provided.
    #[error("'{path}' is encrypted and requires a password")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("wrong password for '{path}'")]
    WrongPassword { path: PathBuf },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("'{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// A single page could not be read.
    #[error("page {page}: {detail}")]
    Page { page: u32, detail: String },
}

/// Why a table element's text could not be read as a grid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableParseError {
    /// No non-blank lines at all.
    #[error("table text is empty")]
    Empty,

    /// The header row has no named columns.
    #[error("header row has no named columns")]
    NoColumns,

    /// Header (and separator) present but no data rows follow.
    #[error("no data rows after the header")]
    NoRows,

    /// A data row has more cells than the header.
    #[error("expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = Pdf2JsonError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("missing.pdf"), "got: {e}");
    }

    #[test]
    fn extraction_failed_names_last_strategy() {
        let e = Pdf2JsonError::ExtractionFailed {
            strategy: Strategy::Fast,
            attempts: 2,
            source: PartitionError::CorruptPdf {
                path: PathBuf::from("a.pdf"),
                detail: "bad xref".into(),
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("2 attempt"), "got: {msg}");
        assert!(msg.contains("'fast'"), "got: {msg}");
        assert!(msg.contains("bad xref"), "got: {msg}");
    }

    #[test]
    fn unsupported_strategy_display() {
        let e = PartitionError::UnsupportedStrategy {
            strategy: Strategy::OcrOnly,
            engine: "pdfium".into(),
        };
        assert!(e.to_string().contains("ocr_only"));
        assert!(e.to_string().contains("pdfium"));
    }

    #[test]
    fn ragged_row_display() {
        let e = TableParseError::RaggedRow {
            line: 4,
            expected: 2,
            found: 3,
        };
        assert_eq!(e.to_string(), "expected 2 fields in line 4, saw 3");
    }
}
