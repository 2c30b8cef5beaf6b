//! Pipeline stages for PDF-to-JSON conversion.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ partition ──▶ aggregate ──▶ Document
//! (%PDF)    (engine +     (classify, section, table)
//!            fallback)
//! ```
//!
//! 1. [`input`]     — validate the user-supplied path is a readable PDF
//! 2. [`partition`] — run the extraction engine behind the [`partition::Partitioner`]
//!    trait, falling back through the strategy ladder; the built-in engine is
//!    [`pdfium`], with its layout heuristics in [`layout`]
//! 3. [`aggregate`] — single pass over the [`element`] stream, using
//!    [`classify`], [`section`] and [`table`] per element

pub mod aggregate;
pub mod classify;
pub mod element;
pub mod input;
pub mod layout;
pub mod partition;
pub mod pdfium;
pub mod section;
pub mod table;
