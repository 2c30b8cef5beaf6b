//! Configuration types for PDF-to-JSON conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The extraction engine and page counter
//! are injectable so the pipeline can run against any element source; when
//! left unset the built-in pdfium engine is used.

use crate::error::Pdf2JsonError;
use crate::pipeline::partition::{PageCounter, Partitioner};
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Largest accepted JSON indent width.
const MAX_INDENT: usize = 16;

/// Configuration for a PDF-to-JSON conversion.
///
/// # Example
/// ```rust
/// use pdf2json::{ConversionConfig, Strategy};
///
/// let config = ConversionConfig::builder()
///     .strategy(Strategy::HiRes)
///     .fallback_strategies(vec![Strategy::Fast])
///     .language("eng")
///     .build()
///     .unwrap();
/// assert_eq!(config.indent, 4);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Primary extraction strategy. Default: [`Strategy::HiRes`].
    pub strategy: Strategy,

    /// Strategies tried in order when the previous one failed. Default: `[Fast]`.
    ///
    /// Entries equal to the primary strategy (or repeated) are skipped, so a
    /// run with `strategy = Fast` and the default fallback makes one attempt.
    pub fallback_strategies: Vec<Strategy>,

    /// Language hints passed to the extraction engine. Default: `["eng"]`.
    pub languages: Vec<String>,

    /// Ask the engine to reconstruct table structure on the primary attempt. Default: true.
    pub infer_table_structure: bool,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Indent width of the pretty-printed JSON output. Default: 4.
    pub indent: usize,

    /// Pre-constructed extraction engine. Takes precedence over the built-in one.
    pub partitioner: Option<Arc<dyn Partitioner>>,

    /// Pre-constructed page counter. Takes precedence over the built-in one.
    pub page_counter: Option<Arc<dyn PageCounter>>,

    /// Receives progress events during conversion.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            fallback_strategies: vec![Strategy::Fast],
            languages: vec!["eng".to_string()],
            infer_table_structure: true,
            password: None,
            indent: 4,
            partitioner: None,
            page_counter: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("strategy", &self.strategy)
            .field("fallback_strategies", &self.fallback_strategies)
            .field("languages", &self.languages)
            .field("infer_table_structure", &self.infer_table_structure)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("indent", &self.indent)
            .field(
                "partitioner",
                &self.partitioner.as_ref().map(|p| p.name().to_string()),
            )
            .field(
                "page_counter",
                &self.page_counter.as_ref().map(|_| "<dyn PageCounter>"),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
            languages_set: false,
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
    languages_set: bool,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn fallback_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.config.fallback_strategies = strategies;
        self
    }

    /// Add a language hint. The first call replaces the default `eng`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        if !self.languages_set {
            self.config.languages.clear();
            self.languages_set = true;
        }
        self.config.languages.push(language.into());
        self
    }

    pub fn languages(mut self, languages: Vec<String>) -> Self {
        self.config.languages = languages;
        self.languages_set = true;
        self
    }

    pub fn infer_table_structure(mut self, v: bool) -> Self {
        self.config.infer_table_structure = v;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn indent(mut self, width: usize) -> Self {
        self.config.indent = width;
        self
    }

    pub fn partitioner(mut self, partitioner: Arc<dyn Partitioner>) -> Self {
        self.config.partitioner = Some(partitioner);
        self
    }

    pub fn page_counter(mut self, counter: Arc<dyn PageCounter>) -> Self {
        self.config.page_counter = Some(counter);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2JsonError> {
        let c = &self.config;
        if c.languages.is_empty() || c.languages.iter().any(|l| l.trim().is_empty()) {
            return Err(Pdf2JsonError::InvalidConfig(
                "At least one non-empty language hint is required".into(),
            ));
        }
        if c.indent > MAX_INDENT {
            return Err(Pdf2JsonError::InvalidConfig(format!(
                "Indent must be 0–{MAX_INDENT}, got {}",
                c.indent
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Named extraction profile trading fidelity for robustness and speed.
///
/// | Strategy | Built-in engine behaviour |
/// |----------|---------------------------|
/// | `hi_res`   | positioned text objects, font-size titles, images, table inference (default) |
/// | `fast`     | plain page text split on blank lines, no coordinates |
/// | `ocr_only` | needs an OCR engine; the pdfium engine rejects it |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    HiRes,
    Fast,
    OcrOnly,
}

impl Strategy {
    /// Canonical name, e.g. `hi_res`.
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::HiRes => "hi_res",
            Strategy::Fast => "fast",
            Strategy::OcrOnly => "ocr_only",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Pdf2JsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "hi_res" => Ok(Strategy::HiRes),
            "fast" => Ok(Strategy::Fast),
            "ocr_only" => Ok(Strategy::OcrOnly),
            other => Err(Pdf2JsonError::InvalidConfig(format!(
                "Unknown strategy '{other}' (expected hi_res, fast or ocr_only)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.strategy, Strategy::HiRes);
        assert_eq!(c.fallback_strategies, vec![Strategy::Fast]);
        assert_eq!(c.languages, vec!["eng".to_string()]);
        assert!(c.infer_table_structure);
        assert_eq!(c.indent, 4);
    }

    #[test]
    fn first_language_replaces_default() {
        let c = ConversionConfig::builder()
            .language("deu")
            .language("fra")
            .build()
            .unwrap();
        assert_eq!(c.languages, vec!["deu".to_string(), "fra".to_string()]);
    }

    #[test]
    fn empty_languages_rejected() {
        let err = ConversionConfig::builder()
            .languages(vec![])
            .build()
            .unwrap_err();
        assert!(matches!(err, Pdf2JsonError::InvalidConfig(_)));
    }

    #[test]
    fn oversized_indent_rejected() {
        assert!(ConversionConfig::builder().indent(17).build().is_err());
        assert!(ConversionConfig::builder().indent(0).build().is_ok());
    }

    #[test]
    fn strategy_names() {
        assert_eq!("hi_res".parse::<Strategy>().unwrap(), Strategy::HiRes);
        assert_eq!("hi-res".parse::<Strategy>().unwrap(), Strategy::HiRes);
        assert_eq!("FAST".parse::<Strategy>().unwrap(), Strategy::Fast);
        assert_eq!("ocr_only".parse::<Strategy>().unwrap(), Strategy::OcrOnly);
        assert!("auto".parse::<Strategy>().is_err());
        assert_eq!(Strategy::OcrOnly.to_string(), "ocr_only");
    }

    #[test]
    fn strategy_serde_uses_canonical_names() {
        let json = serde_json::to_string(&Strategy::HiRes).unwrap();
        assert_eq!(json, "\"hi_res\"");
        let back: Strategy = serde_json::from_str("\"ocr_only\"").unwrap();
        assert_eq!(back, Strategy::OcrOnly);
    }

    #[test]
    fn debug_redacts_password() {
        let c = ConversionConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
    }
}
