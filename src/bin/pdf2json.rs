//! CLI binary for pdf2json.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and reports results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2json::{
    convert_to_file, inspect, ConversionConfig, ConversionProgressCallback, ProgressCallback,
    Strategy,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner while the engine runs, then a bar over the element stream.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Extracting");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: Option<usize>) {
        self.bar.set_message(match total_pages {
            Some(n) => format!("{n} pages"),
            None => "page count unknown".to_string(),
        });
    }

    fn on_strategy_failed(&self, strategy: Strategy, error: &str, next: Option<Strategy>) {
        let next = next
            .map(|n| format!(", trying '{n}'"))
            .unwrap_or_default();
        self.bar.println(format!(
            "  {} strategy '{strategy}' failed: {}{next}",
            red("✗"),
            red(error)
        ));
    }

    fn on_elements_start(&self, total_elements: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} elements  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_elements as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Aggregating");
    }

    fn on_element_processed(&self, index: usize, page_number: u32) {
        self.bar.set_position(index as u64 + 1);
        self.bar.set_message(format!("page {page_number}"));
    }

    fn on_conversion_complete(&self, pages: usize, content_items: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} content items on {} pages",
            green("✔"),
            bold(&content_items.to_string()),
            pages
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes output.json)
  pdf2json document.pdf

  # Choose the output file
  pdf2json document.pdf -o report.json

  # Text-layer only, no layout analysis
  pdf2json --strategy fast document.pdf

  # Try hi_res, then ocr_only, then fast
  pdf2json --fallback ocr_only --fallback fast document.pdf

  # Print the page count and exit
  pdf2json --inspect-only document.pdf

STRATEGIES:
  hi_res    layout analysis: titles, lists, captions, tables, images + bounding boxes
  fast      plain text layer, split into blocks; no coordinates, no tables
  ocr_only  not available with the built-in engine (falls back)

ENVIRONMENT VARIABLES:
  PDFIUM_DYNAMIC_LIB_PATH  Directory containing the pdfium shared library
  RUST_LOG                 Overrides -v / -q log filtering
"#;

/// Convert PDF files to page-grouped structured JSON.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2json",
    version,
    about = "Convert PDF files to page-grouped structured JSON",
    long_about = "Extract paragraphs, tables and charts/images from a PDF, annotate each with \
the section and sub-section heading in effect, and write them grouped by page as JSON.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the input PDF.
    pdf_path: PathBuf,

    /// Write JSON to this file.
    #[arg(short, long, env = "PDF2JSON_OUTPUT", default_value = "output.json")]
    output: PathBuf,

    /// Primary extraction strategy.
    #[arg(short, long, env = "PDF2JSON_STRATEGY", value_enum, default_value = "hi_res")]
    strategy: StrategyArg,

    /// Strategy to try if the previous one fails (repeatable).
    #[arg(
        long = "fallback",
        env = "PDF2JSON_FALLBACK",
        value_enum,
        value_delimiter = ',',
        default_value = "fast"
    )]
    fallbacks: Vec<StrategyArg>,

    /// Language hint passed to the engine (repeatable).
    #[arg(
        long = "language",
        env = "PDF2JSON_LANGUAGES",
        value_delimiter = ',',
        default_value = "eng"
    )]
    languages: Vec<String>,

    /// Skip table-structure inference on the primary strategy.
    #[arg(long, env = "PDF2JSON_NO_TABLE_STRUCTURE")]
    no_table_structure: bool,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2JSON_PASSWORD")]
    password: Option<String>,

    /// JSON indent width in spaces (0–16).
    #[arg(long, env = "PDF2JSON_INDENT", default_value_t = 4,
          value_parser = clap::value_parser!(u8).range(0..=16))]
    indent: u8,

    /// Print the page count only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2JSON_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2JSON_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2JSON_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    #[value(name = "hi_res")]
    HiRes,
    Fast,
    #[value(name = "ocr_only")]
    OcrOnly,
}

impl From<StrategyArg> for Strategy {
    fn from(v: StrategyArg) -> Self {
        match v {
            StrategyArg::HiRes => Strategy::HiRes,
            StrategyArg::Fast => Strategy::Fast,
            StrategyArg::OcrOnly => Strategy::OcrOnly,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let show_progress = !cli.quiet && !cli.no_progress;
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let pages = inspect(&cli.pdf_path, &config)
            .await
            .context("Failed to inspect PDF")?;
        println!("File:   {}", cli.pdf_path.display());
        println!("Pages:  {}", pages);
        return Ok(());
    }

    // ── Run conversion ───────────────────────────────────────────────────
    match convert_to_file(&cli.pdf_path, &cli.output, &config).await {
        Ok(stats) => {
            info!("Successfully wrote JSON output to {}", cli.output.display());
            if !cli.quiet {
                eprintln!(
                    "{}  {} items / {} pages via '{}' ({} attempt{})  {}ms  →  {}",
                    green("✔"),
                    stats.content_items,
                    stats.pages,
                    stats.strategy,
                    stats.attempts,
                    if stats.attempts == 1 { "" } else { "s" },
                    stats.duration_ms,
                    bold(&cli.output.display().to_string()),
                );
            }
            Ok(())
        }
        Err(e) => {
            error!("Failed to process PDF: {}", e);
            Err(e).context("Conversion failed")
        }
    }
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .strategy(cli.strategy.into())
        .fallback_strategies(cli.fallbacks.iter().map(|&s| s.into()).collect())
        .languages(cli.languages.clone())
        .infer_table_structure(!cli.no_table_structure)
        .indent(cli.indent as usize);

    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
