//! Document metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata read from the document information dictionary and trailer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Document keywords
    pub keywords: Option<String>,

    /// Application that created the original document
    pub creator: Option<String>,

    /// Application that produced the PDF
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// Number of pages
    pub page_count: u32,

    /// PDF version from the document catalog
    pub version: String,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

impl DocumentInfo {
    /// Create metadata carrying only the PDF version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }
}
