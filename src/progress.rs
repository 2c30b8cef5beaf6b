//! Progress-callback trait for conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline extracts the PDF and scans its elements.
//!
//! # Example
//!
//! ```rust
//! use pdf2json::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     seen: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_element_processed(&self, index: usize, page_number: u32) {
//!         self.seen.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("element {} (page {})", index + 1, page_number);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { seen: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::config::Strategy;
use std::sync::Arc;

/// Called by the conversion pipeline as it runs.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive from whichever thread drives the
/// conversion, so implementations must be `Send + Sync`.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after the input was validated.
    ///
    /// # Arguments
    /// * `total_pages` — page count, or `None` when it could not be determined
    fn on_conversion_start(&self, total_pages: Option<usize>) {
        let _ = total_pages;
    }

    /// Called when an extraction strategy failed.
    ///
    /// # Arguments
    /// * `strategy` — the strategy that failed
    /// * `error`    — human-readable error description
    /// * `next`     — the strategy that will be tried next, if any
    fn on_strategy_failed(&self, strategy: Strategy, error: &str, next: Option<Strategy>) {
        let _ = (strategy, error, next);
    }

    /// Called once the element stream is available, before the scan.
    fn on_elements_start(&self, total_elements: usize) {
        let _ = total_elements;
    }

    /// Called after each element was turned into a content item.
    ///
    /// # Arguments
    /// * `index`       — 0-based position in the element stream
    /// * `page_number` — 1-based page the element belongs to
    fn on_element_processed(&self, index: usize, page_number: u32) {
        let _ = (index, page_number);
    }

    /// Called once the document has been assembled.
    fn on_conversion_complete(&self, pages: usize, content_items: usize) {
        let _ = (pages, content_items);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        elements: AtomicUsize,
        failures: AtomicUsize,
        items: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_strategy_failed(&self, _strategy: Strategy, _error: &str, _next: Option<Strategy>) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }

        fn on_element_processed(&self, _index: usize, _page_number: u32) {
            self.elements.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, _pages: usize, content_items: usize) {
            self.items.store(content_items, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(Some(3));
        cb.on_strategy_failed(Strategy::HiRes, "boom", Some(Strategy::Fast));
        cb.on_elements_start(2);
        cb.on_element_processed(0, 1);
        cb.on_conversion_complete(1, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_strategy_failed(Strategy::HiRes, "engine crashed", Some(Strategy::Fast));
        tracker.on_element_processed(0, 1);
        tracker.on_element_processed(1, 2);
        tracker.on_conversion_complete(2, 2);

        assert_eq!(tracker.failures.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.elements.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.items.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(None);
        cb.on_element_processed(0, 1);
    }
}
