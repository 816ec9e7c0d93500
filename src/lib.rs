//! # pdfmark
//!
//! Layout-ordered PDF text extraction with inline position markers.
//!
//! pdfmark reads a PDF and emits its text as a linear stream in which every
//! paragraph is preceded by a marker line `!!<page>,<y>!!` recording the
//! 1-based page number and the truncated top edge of the paragraph's
//! bounding box. Blocks are ordered top-to-bottom, left-to-right per page;
//! pages follow document order.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdfmark::Result<()> {
//!     let text = pdfmark::extract_file("document.pdf")?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! ## Output format
//!
//! ```text
//! !!1,72!!
//! First paragraph of page one.
//! !!1,154!!
//! Second paragraph.
//! !!2,80!!
//! First paragraph of page two.
//! ```
//!
//! The marker's `y` is truncated toward zero, never rounded, and the wire
//! format is stable: downstream consumers parse it verbatim.
//!
//! ## Limitations
//!
//! The reading order is the classic `(y0, x0)` sort. It is correct for
//! single-column and near-single-column layouts, but it is not
//! topology-aware: a genuinely multi-column page whose columns interleave
//! vertically will come out in strict vertical order. This is intentional
//! and kept for output compatibility.

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{is_pdf_bytes, is_pdf_file, PdfVersion};
pub use error::{Error, Result};
pub use model::{BBox, Block, BlockKind, DocumentInfo, Marker, PageContent};
pub use parser::{ErrorMode, ExtractOptions, PdfExtractor};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;

/// Extract marker-annotated text from a PDF file.
///
/// # Example
///
/// ```no_run
/// let text = pdfmark::extract_file("document.pdf").unwrap();
/// assert!(text.is_empty() || text.starts_with("!!1,"));
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let extractor = PdfExtractor::open(path)?;
    extractor.marked_text()
}

/// Extract marker-annotated text from a PDF file with custom options.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<String> {
    let extractor = PdfExtractor::open_with_options(path, options)?;
    extractor.marked_text()
}

/// Extract marker-annotated text from PDF bytes.
///
/// The call is all-or-nothing: bytes that do not open as a PDF return a
/// document error and no partial output.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("document.pdf").unwrap();
/// let text = pdfmark::extract_bytes(&data).unwrap();
/// ```
pub fn extract_bytes(data: &[u8]) -> Result<String> {
    let extractor = PdfExtractor::from_bytes(data)?;
    extractor.marked_text()
}

/// Extract marker-annotated text from PDF bytes with custom options.
pub fn extract_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<String> {
    let extractor = PdfExtractor::from_bytes_with_options(data, options)?;
    extractor.marked_text()
}

/// Extract marker-annotated text from a reader.
pub fn extract_reader<R: Read>(reader: R) -> Result<String> {
    let extractor = PdfExtractor::from_reader(reader)?;
    extractor.marked_text()
}

/// Read document metadata from a PDF file.
pub fn document_info<P: AsRef<Path>>(path: P) -> Result<DocumentInfo> {
    let extractor = PdfExtractor::open(path)?;
    Ok(extractor.info())
}
