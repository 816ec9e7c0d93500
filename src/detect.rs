//! PDF header sniffing.
//!
//! Runs before the document is handed to lopdf so that arbitrary non-PDF
//! input fails fast with [`Error::UnknownFormat`] instead of a parser error
//! deep inside the loader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// PDF magic bytes: `%PDF-`.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Length of the version field after the magic, e.g. "1.7".
const VERSION_LEN: usize = 3;

/// PDF header version, e.g. `1.7` or `2.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfVersion(String);

impl PdfVersion {
    /// The version string as written in the header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.0)
    }
}

/// Sniff the start of a byte buffer for a PDF header.
///
/// Returns the header version on success, [`Error::UnknownFormat`] when the
/// magic bytes are missing or the version field is malformed.
pub fn sniff(data: &[u8]) -> Result<PdfVersion> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = std::str::from_utf8(version).map_err(|_| Error::UnknownFormat)?;

    // Header versions are single-digit dotted pairs, "1.0" through "2.x".
    let bytes = version.as_bytes();
    if !(bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()) {
        return Err(Error::UnknownFormat);
    }

    Ok(PdfVersion(version.to_string()))
}

/// Sniff the first bytes of a file for a PDF header.
pub fn sniff_file<P: AsRef<Path>>(path: P) -> Result<PdfVersion> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 16];
    let n = file.read(&mut header)?;
    sniff(&header[..n])
}

/// Check whether a byte buffer starts with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    sniff(data).is_ok()
}

/// Check whether a file starts with a PDF header.
pub fn is_pdf_file<P: AsRef<Path>>(path: P) -> bool {
    sniff_file(path).is_ok()
}
