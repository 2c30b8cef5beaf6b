//! # pdf2json
//!
//! Convert PDF documents to page-grouped structured JSON.
//!
//! An extraction engine turns the PDF into an ordered stream of classified
//! elements (titles, paragraphs, tables, images, …). A single pass over that
//! stream maps each element to a paragraph, table or chart item, tracks the
//! section/sub-section heading in effect, reads table text into a cell grid,
//! and groups everything by page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      check the file exists and starts with %PDF
//!  ├─ 2. Partition  engine → elements (hi_res, falling back to fast)
//!  ├─ 3. Aggregate  classify, track sections, parse tables, group by page
//!  └─ 4. Output     page-grouped JSON + stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2json::{convert_to_file, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let stats = convert_to_file("document.pdf", "output.json", &config).await?;
//!     eprintln!(
//!         "{} pages, {} items via '{}'",
//!         stats.pages, stats.content_items, stats.strategy
//!     );
//!     Ok(())
//! }
//! ```
//!
//! The built-in engine needs a pdfium shared library; point
//! `PDFIUM_DYNAMIC_LIB_PATH` at the directory that contains it. Any other
//! engine can be plugged in through [`Partitioner`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2json` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2json = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, Strategy};
pub use convert::{
    aggregate_elements, convert, convert_from_bytes, convert_sync, convert_to_file, inspect,
    to_json_string,
};
pub use error::{PartitionError, Pdf2JsonError, TableParseError};
pub use output::{ContentItem, ContentType, ConversionOutput, ConversionStats, Document, PageGroup};
pub use pipeline::element::{Coordinates, DocumentElement, ElementCategory, ElementMetadata};
pub use pipeline::partition::{PageCounter, PartitionRequest, Partitioner};
pub use pipeline::pdfium::PdfiumEngine;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
