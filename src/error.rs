//! Error types for the pdfmark library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a file or stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input does not carry a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The bytes could not be opened or parsed as a PDF document.
    #[error("Document parse error: {0}")]
    DocumentParse(String),

    /// The document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error while rendering extracted content.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error means the input is not a usable PDF document.
    ///
    /// Callers that only need a single accept/reject decision (e.g. an
    /// upload handler rejecting unsupported file types) can branch on this
    /// instead of matching individual variants.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownFormat | Error::DocumentParse(_) | Error::Encrypted
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::DocumentParse(err.to_string()),
        }
    }
}
