//! End-to-end tests against the real pdfium engine.
//!
//! These tests use real PDF files in `./test_cases/` and need a pdfium shared
//! library. They are gated behind the `E2E_ENABLED` environment variable so
//! they do not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_DYNAMIC_LIB_PATH=. cargo test --test e2e -- --nocapture

use pdf2json::{convert, convert_to_file, inspect, ContentType, ConversionConfig, Strategy};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

#[tokio::test]
async fn test_inspect_sample() {
    let pdf = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));
    let pages = inspect(&pdf, &ConversionConfig::default()).await.unwrap();
    assert!(pages > 0, "sample.pdf should have at least one page");
}

#[tokio::test]
async fn test_hi_res_sample() {
    let pdf = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));
    let output = convert(&pdf, &ConversionConfig::default()).await.unwrap();

    assert!(output.stats.content_items > 0);
    assert!(output
        .stats
        .total_pages
        .is_some_and(|n| n >= output.stats.pages));
    let numbers: Vec<u32> = output.document.pages.iter().map(|p| p.page_number).collect();
    assert!(numbers.windows(2).all(|w| w[0] < w[1]), "pages must ascend");

    // hi_res annotates every item with its bounding box.
    let all_boxed = output
        .document
        .pages
        .iter()
        .flat_map(|p| &p.content)
        .all(|item| {
            item.description
                .as_deref()
                .is_some_and(|d| d.contains("(bbox=("))
        });
    assert!(all_boxed);
}

#[tokio::test]
async fn test_fast_sample_has_no_tables() {
    let pdf = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));
    let config = ConversionConfig::builder()
        .strategy(Strategy::Fast)
        .fallback_strategies(vec![])
        .build()
        .unwrap();
    let output = convert(&pdf, &config).await.unwrap();

    assert_eq!(output.stats.strategy, Strategy::Fast);
    assert!(output
        .document
        .pages
        .iter()
        .flat_map(|p| &p.content)
        .all(|item| item.content_type != ContentType::Table));
}

#[tokio::test]
async fn test_ocr_only_falls_back() {
    let pdf = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));
    let out = std::env::temp_dir().join("pdf2json-e2e-ocr.json");
    let config = ConversionConfig::builder()
        .strategy(Strategy::OcrOnly)
        .build()
        .unwrap();

    let stats = convert_to_file(&pdf, &out, &config).await.unwrap();
    assert_eq!(stats.strategy, Strategy::Fast);
    assert_eq!(stats.attempts, 2);
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert!(json["pages"].is_array());
    std::fs::remove_file(&out).ok();
}
