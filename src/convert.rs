//! Conversion entry points.
//!
//! [`convert`] runs the whole pipeline and returns the document in memory;
//! [`convert_to_file`] additionally writes it as JSON. Everything that talks
//! to the extraction engine runs inside `spawn_blocking`.

use crate::config::ConversionConfig;
use crate::error::Pdf2JsonError;
use crate::output::{ConversionOutput, ConversionStats, Document};
use crate::pipeline::aggregate::{self, PageAggregator};
use crate::pipeline::element::DocumentElement;
use crate::pipeline::input;
use crate::pipeline::partition::{PageCounter, PartitionRequest, Partitioner, StrategyLadder};
use crate::pipeline::pdfium::PdfiumEngine;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a PDF file to a page-grouped [`Document`].
///
/// # Errors
/// Returns `Err(Pdf2JsonError)` only for fatal errors:
/// - File not found / permission denied / not a PDF
/// - Every strategy on the ladder failed
///
/// A failing page count is not fatal; it shows up as
/// `stats.total_pages == None`.
pub async fn convert(
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2JsonError> {
    let start = Instant::now();

    // ── Step 1: Validate input ───────────────────────────────────────────
    let path = input::validate_local(pdf_path.as_ref())?;
    info!(
        "Processing PDF: {} with strategy '{}'",
        path.display(),
        config.strategy
    );

    // ── Step 2: Page count (informational) ───────────────────────────────
    let counter = page_counter(config);
    let total_pages = {
        let path = path.clone();
        let password = config.password.clone();
        match tokio::task::spawn_blocking(move || counter.page_count(&path, password.as_deref()))
            .await
        {
            Ok(Ok(n)) => {
                info!("PDF has {} pages", n);
                Some(n)
            }
            Ok(Err(e)) => {
                warn!("Could not determine page count: {}", e);
                None
            }
            Err(e) => {
                warn!("Page count task panicked: {}", e);
                None
            }
        }
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total_pages);
    }

    // ── Step 3: Extract elements, falling back between strategies ────────
    let ladder = StrategyLadder::new(config.strategy, &config.fallback_strategies);
    let engine = partitioner(config);
    let extraction = {
        let path = path.clone();
        let languages = config.languages.clone();
        let infer_table_structure = config.infer_table_structure;
        let password = config.password.clone();
        let callback = config.progress_callback.clone();

        tokio::task::spawn_blocking(move || {
            ladder.run(
                |strategy, is_primary| {
                    let request = PartitionRequest {
                        strategy,
                        languages: languages.clone(),
                        // Fallbacks are the cheap path: no table inference.
                        infer_table_structure: is_primary && infer_table_structure,
                        password: password.clone(),
                    };
                    debug!(engine = engine.name(), "Partitioning with strategy '{}'", strategy);
                    engine.partition(&path, &request)
                },
                |strategy, error, next| {
                    if let Some(ref cb) = callback {
                        cb.on_strategy_failed(strategy, &error.to_string(), next);
                    }
                },
            )
        })
        .await
        .map_err(|e| Pdf2JsonError::Internal(format!("Extraction task panicked: {}", e)))??
    };

    // ── Step 4: Aggregate into pages ─────────────────────────────────────
    let elements = extraction.elements;
    if let Some(ref cb) = config.progress_callback {
        cb.on_elements_start(elements.len());
    }

    let mut aggregator = PageAggregator::new();
    for (index, element) in elements.iter().enumerate() {
        aggregator.push(element);
        if let Some(ref cb) = config.progress_callback {
            cb.on_element_processed(index, element.page_number());
        }
    }
    let document = aggregator.finish();

    // ── Step 5: Stats ────────────────────────────────────────────────────
    let content_items = document.content_item_count();
    info!(
        "Processed {} pages with {} content items",
        document.pages.len(),
        content_items
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(document.pages.len(), content_items);
    }

    let stats = ConversionStats {
        total_pages,
        pages: document.pages.len(),
        content_items,
        elements: elements.len(),
        strategy: extraction.strategy,
        attempts: extraction.attempts,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    Ok(ConversionOutput { document, stats })
}

/// Convert a PDF and write the document JSON to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    pdf_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2JsonError> {
    let output = convert(pdf_path, config).await?;
    write_json(output_path.as_ref(), &output.document, config.indent).await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2JsonError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2JsonError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(pdf_path, config))
}

/// Convert PDF bytes in memory.
///
/// The bytes are written to a managed [`tempfile`] that is removed on
/// return, so callers holding PDF data from a database or network stream
/// need no file of their own.
pub async fn convert_from_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2JsonError> {
    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| Pdf2JsonError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.flush())
        .map_err(|e| Pdf2JsonError::Internal(format!("tempfile write: {e}")))?;
    // `tmp` is dropped (and the file deleted) when `convert` returns
    convert(tmp.path(), config).await
}

/// Page count of a PDF without extracting content.
pub async fn inspect(
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<usize, Pdf2JsonError> {
    let path = input::validate_local(pdf_path.as_ref())?;
    let counter = page_counter(config);
    let password = config.password.clone();

    tokio::task::spawn_blocking(move || counter.page_count(&path, password.as_deref()))
        .await
        .map_err(|e| Pdf2JsonError::Internal(format!("Page count task panicked: {}", e)))?
        .map_err(Pdf2JsonError::PageCountFailed)
}

/// Aggregate an already-extracted element stream.
///
/// This is the pure core of [`convert`]: no I/O, no engine.
pub fn aggregate_elements(elements: &[DocumentElement]) -> Document {
    aggregate::aggregate(elements)
}

/// Render a document as pretty-printed JSON with `indent` spaces per level.
///
/// Non-ASCII text is written as-is, never `\u`-escaped.
pub fn to_json_string(document: &Document, indent: usize) -> Result<String, Pdf2JsonError> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| Pdf2JsonError::Internal(format!("non-UTF-8 JSON: {e}")))
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn write_json(path: &Path, document: &Document, indent: usize) -> Result<(), Pdf2JsonError> {
    let json = to_json_string(document, indent)?;
    let write_err = |source| Pdf2JsonError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    // Atomic write: write to temp, then rename
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(write_err)?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }

    debug!("Wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}

fn partitioner(config: &ConversionConfig) -> Arc<dyn Partitioner> {
    match &config.partitioner {
        Some(p) => Arc::clone(p),
        None => Arc::new(PdfiumEngine::new()),
    }
}

fn page_counter(config: &ConversionConfig) -> Arc<dyn PageCounter> {
    match &config.page_counter {
        Some(c) => Arc::clone(c),
        None => Arc::new(PdfiumEngine::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Strategy;
    use crate::error::PartitionError;
    use crate::output::ContentType;

    struct Fixed(Vec<DocumentElement>);

    impl Partitioner for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn partition(
            &self,
            _path: &Path,
            _request: &PartitionRequest,
        ) -> Result<Vec<DocumentElement>, PartitionError> {
            Ok(self.0.clone())
        }
    }

    impl PageCounter for Fixed {
        fn page_count(&self, _path: &Path, _password: Option<&str>) -> Result<usize, PartitionError> {
            Ok(2)
        }
    }

    fn pdf_file() -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.4\n%fake\n").unwrap();
        f
    }

    #[test]
    fn json_uses_requested_indent_and_keeps_unicode() {
        let doc = aggregate_elements(&[DocumentElement::new("NarrativeText", "Résumé – ok", 1)]);
        let json = to_json_string(&doc, 4).unwrap();
        assert!(json.starts_with("{\n    \"pages\": ["));
        assert!(json.contains("Résumé – ok"));
        assert!(json.contains("\"table_data\": null"));

        let two = to_json_string(&doc, 2).unwrap();
        assert!(two.starts_with("{\n  \"pages\": ["));
    }

    #[test]
    fn convert_with_injected_engine() {
        let engine = Arc::new(Fixed(vec![
            DocumentElement::new("Title", "1.1 Scope", 1),
            DocumentElement::new("Table", "| A | B |\n|---|---|\n| 1 | 2 |", 2),
        ]));
        let config = ConversionConfig::builder()
            .partitioner(engine.clone())
            .page_counter(engine)
            .build()
            .unwrap();
        let f = pdf_file();

        let out = tokio_test::block_on(convert(f.path(), &config)).unwrap();
        assert_eq!(out.stats.total_pages, Some(2));
        assert_eq!(out.stats.pages, 2);
        assert_eq!(out.stats.elements, 2);
        assert_eq!(out.stats.strategy, Strategy::HiRes);
        assert_eq!(out.stats.attempts, 1);

        let table = &out.document.pages[1].content[0];
        assert_eq!(table.content_type, ContentType::Table);
        assert_eq!(table.section.as_deref(), Some("1.1"));
    }

    #[test]
    fn convert_sync_runs_its_own_runtime() {
        let engine = Arc::new(Fixed(vec![
            DocumentElement::new("Title", "2 Setup", 1),
            DocumentElement::new("NarrativeText", "Install it.", 1),
        ]));
        let config = ConversionConfig::builder()
            .partitioner(engine.clone())
            .page_counter(engine)
            .build()
            .unwrap();
        let f = pdf_file();

        let out = convert_sync(f.path(), &config).unwrap();
        assert_eq!(out.stats.content_items, 2);
        assert_eq!(out.document.pages[0].content[1].section.as_deref(), Some("2"));
    }

    /// Remembers the path it was handed.
    #[derive(Default)]
    struct SeenPath(std::sync::Mutex<Option<std::path::PathBuf>>);

    impl Partitioner for SeenPath {
        fn name(&self) -> &str {
            "seen-path"
        }

        fn partition(
            &self,
            path: &Path,
            _request: &PartitionRequest,
        ) -> Result<Vec<DocumentElement>, PartitionError> {
            assert!(path.exists());
            *self.0.lock().unwrap() = Some(path.to_path_buf());
            Ok(vec![DocumentElement::new("NarrativeText", "from memory", 1)])
        }
    }

    #[test]
    fn convert_from_bytes_cleans_up_its_temp_file() {
        let engine = Arc::new(SeenPath::default());
        let config = ConversionConfig::builder()
            .partitioner(engine.clone())
            .page_counter(Arc::new(Fixed(vec![])))
            .build()
            .unwrap();

        let out = tokio_test::block_on(convert_from_bytes(b"%PDF-1.4\n", &config)).unwrap();
        assert_eq!(out.stats.content_items, 1);

        let seen = engine.0.lock().unwrap().clone().unwrap();
        assert_eq!(seen.extension().and_then(|e| e.to_str()), Some("pdf"));
        assert!(!seen.exists(), "temp file left behind: {}", seen.display());
    }

    #[test]
    fn convert_from_bytes_rejects_non_pdf_bytes() {
        let config = ConversionConfig::builder()
            .partitioner(Arc::new(SeenPath::default()))
            .build()
            .unwrap();
        let err = tokio_test::block_on(convert_from_bytes(b"<html>", &config)).unwrap_err();
        assert!(matches!(err, Pdf2JsonError::NotAPdf { .. }));
    }

    #[test]
    fn inspect_reports_page_count() {
        let engine = Arc::new(Fixed(vec![]));
        let config = ConversionConfig::builder()
            .page_counter(engine)
            .build()
            .unwrap();
        let f = pdf_file();
        assert_eq!(tokio_test::block_on(inspect(f.path(), &config)).unwrap(), 2);
    }
}
