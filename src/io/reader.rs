//! Page counting for rendered PDFs.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::io::PdfReader;
//! use std::path::Path;
//!
//! # async fn example() -> pdfbind::Result<()> {
//! let pages = PdfReader::new().page_count(Path::new("segment.pdf")).await?;
//! println!("segment has {pages} pages");
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::Path;

use crate::error::{PdfBindError, Result};

/// Reads page counts from PDF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Number of pages in the PDF at `path`.
    ///
    /// The document is parsed on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::PdfRead`] if the file is missing or is not a
    /// readable PDF.
    pub async fn page_count(&self, path: &Path) -> Result<u64> {
        let path_buf = path.to_path_buf();

        let loaded = tokio::task::spawn_blocking(move || {
            Document::load(&path_buf).map(|doc| doc.get_pages().len())
        })
        .await
        .map_err(|err| PdfBindError::pdf_read(path, err.to_string()))?;

        let pages = loaded.map_err(|err| PdfBindError::pdf_read(path, err.to_string()))?;
        Ok(pages as u64)
    }
}
