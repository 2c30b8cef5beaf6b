//! Input validation: make sure the path names a readable PDF.
//!
//! We look for the `%PDF` header up front so callers get a meaningful
//! error rather than an engine failure on every strategy of the ladder.

use crate::error::Pdf2JsonError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How far into the file the `%PDF` header may start. pdfium accepts junk
/// (a BOM, mail headers) before it.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Validate a local file path, returning it unchanged on success.
pub fn validate_local(path: &Path) -> Result<PathBuf, Pdf2JsonError> {
    let path = path.to_path_buf();

    if !path.is_file() {
        return Err(Pdf2JsonError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    let file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2JsonError::PermissionDenied { path });
        }
        Err(_) => return Err(Pdf2JsonError::FileNotFound { path }),
    };

    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    if let Err(e) = file.take(HEADER_SEARCH_WINDOW as u64).read_to_end(&mut head) {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            return Err(Pdf2JsonError::PermissionDenied { path });
        }
    }

    if !head.windows(4).any(|w| w == b"%PDF") {
        // Files shorter than the magic keep whatever bytes they had.
        let mut magic = [0u8; 4];
        let n = head.len().min(4);
        magic[..n].copy_from_slice(&head[..n]);
        return Err(Pdf2JsonError::NotAPdf { path, magic });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}
