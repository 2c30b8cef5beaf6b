//! Extraction-engine boundary and the strategy fallback ladder.
//!
//! The engine that turns PDF bytes into [`DocumentElement`]s and the utility
//! that counts pages are collaborators behind the [`Partitioner`] and
//! [`PageCounter`] traits. The built-in implementation lives in
//! [`crate::pipeline::pdfium`]; tests and embedders can inject their own via
//! [`crate::config::ConversionConfig`].
//!
//! Engine calls are whole-document and blocking: a failed call yields no
//! partial elements, and a retry starts from scratch with the next strategy.

use crate::config::Strategy;
use crate::error::{PartitionError, Pdf2JsonError};
use crate::pipeline::element::DocumentElement;
use std::path::Path;
use tracing::{info, warn};

/// Everything the engine needs for one extraction attempt besides the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRequest {
    pub strategy: Strategy,
    pub languages: Vec<String>,
    pub infer_table_structure: bool,
    pub password: Option<String>,
}

/// Turns a PDF into an ordered element stream.
pub trait Partitioner: Send + Sync {
    /// Short engine name used in logs and errors.
    fn name(&self) -> &str;

    /// Extract all elements of `path` in reading order.
    fn partition(
        &self,
        path: &Path,
        request: &PartitionRequest,
    ) -> Result<Vec<DocumentElement>, PartitionError>;
}

/// Reports how many pages a PDF has.
pub trait PageCounter: Send + Sync {
    fn page_count(&self, path: &Path, password: Option<&str>) -> Result<usize, PartitionError>;
}

/// A successful extraction and how it was obtained.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub elements: Vec<DocumentElement>,
    pub strategy: Strategy,
    pub attempts: usize,
}

/// Ordered, duplicate-free list of strategies to attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyLadder {
    strategies: Vec<Strategy>,
}

impl StrategyLadder {
    /// `primary` first, then each fallback not already on the ladder.
    pub fn new(primary: Strategy, fallbacks: &[Strategy]) -> Self {
        let mut strategies = vec![primary];
        for &s in fallbacks {
            if !strategies.contains(&s) {
                strategies.push(s);
            }
        }
        Self { strategies }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Try each strategy in turn until one succeeds.
    ///
    /// `attempt` receives the strategy and whether it is the primary one.
    /// `on_failure` is told about every failed strategy and the next one to
    /// be tried. When the ladder is exhausted the last error is returned.
    pub fn run<A, F>(&self, mut attempt: A, mut on_failure: F) -> Result<Extraction, Pdf2JsonError>
    where
        A: FnMut(Strategy, bool) -> Result<Vec<DocumentElement>, PartitionError>,
        F: FnMut(Strategy, &PartitionError, Option<Strategy>),
    {
        let mut last_error = None;

        for (i, &strategy) in self.strategies.iter().enumerate() {
            let next = self.strategies.get(i + 1).copied();
            match attempt(strategy, i == 0) {
                Ok(elements) => {
                    info!(
                        "Strategy '{}' produced {} elements",
                        strategy,
                        elements.len()
                    );
                    return Ok(Extraction {
                        elements,
                        strategy,
                        attempts: i + 1,
                    });
                }
                Err(e) => {
                    match next {
                        Some(n) => warn!("Strategy '{strategy}' failed: {e}. Falling back to '{n}'."),
                        None => warn!("Strategy '{strategy}' failed: {e}"),
                    }
                    on_failure(strategy, &e, next);
                    last_error = Some((strategy, e));
                }
            }
        }

        match last_error {
            Some((strategy, source)) => Err(Pdf2JsonError::ExtractionFailed {
                strategy,
                attempts: self.strategies.len(),
                source,
            }),
            None => Err(Pdf2JsonError::Internal("empty strategy ladder".into())),
        }
    }
}
