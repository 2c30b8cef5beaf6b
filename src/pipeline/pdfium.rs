//! Built-in extraction engine backed by pdfium.
//!
//! pdfium is not async-safe; every method here blocks and is meant to be
//! called from `spawn_blocking` (see [`crate::convert`]).
//!
//! Library lookup order:
//! 1. the directory in `PDFIUM_DYNAMIC_LIB_PATH`
//! 2. the current directory
//! 3. the system library search path

use crate::config::Strategy;
use crate::error::PartitionError;
use crate::pipeline::element::DocumentElement;
use crate::pipeline::layout::{self, Fragment, PageContent, Rect};
use crate::pipeline::partition::{PageCounter, PartitionRequest, Partitioner};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the directory holding the pdfium library.
pub const PDFIUM_LIB_DIR_ENV: &str = "PDFIUM_DYNAMIC_LIB_PATH";

/// [`Partitioner`] and [`PageCounter`] over a dynamically bound pdfium.
#[derive(Debug, Clone, Default)]
pub struct PdfiumEngine {
    library_dir: Option<PathBuf>,
}

impl PdfiumEngine {
    /// Engine that resolves the library from the environment.
    pub fn new() -> Self {
        Self {
            library_dir: std::env::var_os(PDFIUM_LIB_DIR_ENV).map(PathBuf::from),
        }
    }

    /// Engine bound to the platform library inside `dir`.
    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(dir.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium, PartitionError> {
        let bindings = match &self.library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| PartitionError::PdfiumBinding(format!("{e:?}")))?;
        Ok(Pdfium::new(bindings))
    }

    fn load<'a>(
        pdfium: &'a Pdfium,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<PdfDocument<'a>, PartitionError> {
        pdfium.load_pdf_from_file(path, password).map_err(|e| {
            let err_str = format!("{e:?}");
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    PartitionError::WrongPassword {
                        path: path.to_path_buf(),
                    }
                } else {
                    PartitionError::PasswordRequired {
                        path: path.to_path_buf(),
                    }
                }
            } else {
                PartitionError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: err_str,
                }
            }
        })
    }
}

impl Partitioner for PdfiumEngine {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn partition(
        &self,
        path: &Path,
        request: &PartitionRequest,
    ) -> Result<Vec<DocumentElement>, PartitionError> {
        if request.strategy == Strategy::OcrOnly {
            return Err(PartitionError::UnsupportedStrategy {
                strategy: request.strategy,
                engine: self.name().to_string(),
            });
        }
        // pdfium reads the embedded text layer; language hints only matter to OCR.
        debug!(languages = ?request.languages, "language hints not used by pdfium");

        let pdfium = self.bind()?;
        let document = Self::load(&pdfium, path, request.password.as_deref())?;
        let pages = document.pages();
        info!("PDF loaded: {} pages", pages.len());

        let mut elements = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            let page_number = index as u32 + 1;
            let page_elements = match request.strategy {
                Strategy::Fast => {
                    let text = page.text().map_err(|e| PartitionError::Page {
                        page: page_number,
                        detail: format!("{e:?}"),
                    })?;
                    layout::fast_elements(page_number, &text.all())
                }
                _ => layout::hi_res_elements(
                    page_content(&page, page_number),
                    request.infer_table_structure,
                ),
            };
            debug!(
                "Page {} → {} elements ({})",
                page_number,
                page_elements.len(),
                request.strategy
            );
            elements.extend(page_elements);
        }

        Ok(elements)
    }
}

impl PageCounter for PdfiumEngine {
    fn page_count(&self, path: &Path, password: Option<&str>) -> Result<usize, PartitionError> {
        let pdfium = self.bind()?;
        let document = Self::load(&pdfium, path, password)?;
        Ok(document.pages().len() as usize)
    }
}

/// Collect text runs and image boxes, flipped to a top-left origin.
fn page_content(page: &PdfPage, page_number: u32) -> PageContent {
    let height = page.height().value;
    let mut content = PageContent {
        page_number,
        ..Default::default()
    };

    for object in page.objects().iter() {
        let Ok(bounds) = object.bounds() else {
            continue;
        };
        let rect = Rect {
            left: bounds.left().value,
            top: height - bounds.top().value,
            right: bounds.right().value,
            bottom: height - bounds.bottom().value,
        };

        match object.object_type() {
            PdfPageObjectType::Text => {
                if let Some(text_object) = object.as_text_object() {
                    content.fragments.push(Fragment {
                        text: text_object.text(),
                        font_size: text_object.scaled_font_size().value,
                        rect,
                    });
                }
            }
            PdfPageObjectType::Image => content.images.push(rect),
            _ => {}
        }
    }

    content
}
