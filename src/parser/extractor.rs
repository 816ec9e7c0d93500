//! PDF document extractor built on lopdf.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{DocumentInfo, PageContent};
use crate::render;

use super::content;
use super::layout;
use super::options::{ErrorMode, ExtractOptions};

/// PDF document extractor.
///
/// Owns one `lopdf::Document` for the duration of the call chain; nothing
/// escapes the extractor, so independent callers can run extractions
/// concurrently without shared state.
pub struct PdfExtractor {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl PdfExtractor {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();

        // Sniff the header first so garbage fails fast and typed.
        detect::sniff_file(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Ok(Self { doc, options })
    }

    /// Open a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Open a PDF held in memory with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        detect::sniff(data)?;

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Ok(Self { doc, options })
    }

    /// Open a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ExtractOptions::default())
    }

    /// Open a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(
        mut reader: R,
        options: ExtractOptions,
    ) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Extract the whole document as marker-annotated text.
    ///
    /// Every retained paragraph is preceded by a `!!page,y!!` line; blocks
    /// are ordered top-to-bottom, left-to-right per page, pages in document
    /// order. Empty and image-only documents yield an empty string.
    pub fn marked_text(&self) -> Result<String> {
        let pages = self.pages()?;
        Ok(render::to_marked_text(&pages))
    }

    /// Extract the content blocks of every page, in document order.
    pub fn pages(&self) -> Result<Vec<PageContent>> {
        let page_ids = self.doc.get_pages();
        let mut pages = Vec::with_capacity(page_ids.len());

        for (page_num, page_id) in page_ids.iter() {
            match self.extract_page(*page_num, *page_id) {
                Ok(page) => pages.push(page),
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("skipping page {}: {}", page_num, e);
                    let (width, height) = self.page_dimensions(*page_id);
                    pages.push(PageContent::new(*page_num, width, height));
                }
            }
        }

        Ok(pages)
    }

    /// Extract a single page by its 1-based number.
    pub fn page(&self, number: u32) -> Result<PageContent> {
        let page_ids = self.doc.get_pages();
        let page_id = page_ids
            .get(&number)
            .copied()
            .ok_or(Error::PageOutOfRange(number, page_ids.len() as u32))?;
        self.extract_page(number, page_id)
    }

    /// Read document metadata.
    pub fn info(&self) -> DocumentInfo {
        let mut info = DocumentInfo::with_version(self.doc.version.clone());
        info.page_count = self.page_count();
        info.encrypted = self.doc.is_encrypted();

        if let Ok(Object::Reference(info_ref)) = self.doc.trailer.get(b"Info") {
            if let Ok(info_dict) = self.doc.get_dictionary(*info_ref) {
                info.title = get_string_from_dict(info_dict, b"Title");
                info.author = get_string_from_dict(info_dict, b"Author");
                info.subject = get_string_from_dict(info_dict, b"Subject");
                info.keywords = get_string_from_dict(info_dict, b"Keywords");
                info.creator = get_string_from_dict(info_dict, b"Creator");
                info.producer = get_string_from_dict(info_dict, b"Producer");

                if let Some(date) = get_string_from_dict(info_dict, b"CreationDate") {
                    info.created = parse_pdf_date(&date);
                }
                if let Some(date) = get_string_from_dict(info_dict, b"ModDate") {
                    info.modified = parse_pdf_date(&date);
                }
            }
        }

        info
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn extract_page(&self, number: u32, page_id: ObjectId) -> Result<PageContent> {
        let (width, height) = self.page_dimensions(page_id);
        let mut page = PageContent::new(number, width, height);

        let content = self.page_content(page_id)?;
        if content.is_empty() {
            return Ok(page);
        }

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::DocumentParse(e.to_string()))?;
        let image_xobjects = self.image_xobjects(page_id);

        let stream = content::interpret(&self.doc, &content, &fonts, &image_xobjects)?;
        page.blocks = layout::assemble_blocks(stream.spans, stream.images, height);

        Ok(page)
    }

    /// Page dimensions from the MediaBox, defaulting to US Letter.
    fn page_dimensions(&self, page_id: ObjectId) -> (f32, f32) {
        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        let x0 = array[0].as_float().unwrap_or(0.0);
                        let y0 = array[1].as_float().unwrap_or(0.0);
                        let x1 = array[2].as_float().unwrap_or(612.0);
                        let y1 = array[3].as_float().unwrap_or(792.0);
                        return (x1 - x0, y1 - y0);
                    }
                }
            }
        }

        (612.0, 792.0)
    }

    /// Collect a page's content stream bytes.
    ///
    /// A page with no Contents entry is a valid, empty page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::DocumentParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => self.stream_content(*r),
            Object::Stream(s) => Ok(decompressed(s)),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(data) = self.stream_content(*r) {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::DocumentParse("invalid content stream".to_string())),
        }
    }

    fn stream_content(&self, id: ObjectId) -> Result<Vec<u8>> {
        match self.doc.get_object(id) {
            Ok(Object::Stream(s)) => Ok(decompressed(s)),
            _ => Err(Error::DocumentParse("invalid content stream".to_string())),
        }
    }

    /// Names of the page's XObjects whose Subtype is Image.
    fn image_xobjects(&self, page_id: ObjectId) -> HashSet<Vec<u8>> {
        let mut names = HashSet::new();

        let Ok(page_dict) = self.doc.get_dictionary(page_id) else {
            return names;
        };
        let Ok(res) = page_dict.get(b"Resources") else {
            return names;
        };
        let res_dict = match res {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        };
        let Some(res_dict) = res_dict else {
            return names;
        };
        let Ok(xobjects) = res_dict.get(b"XObject") else {
            return names;
        };
        let xobj_dict = match xobjects {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        };
        let Some(xobj_dict) = xobj_dict else {
            return names;
        };

        for (name, obj) in xobj_dict.iter() {
            let is_image = obj
                .as_reference()
                .ok()
                .and_then(|r| self.doc.get_object(r).ok())
                .and_then(|o| match o {
                    Object::Stream(s) => s
                        .dict
                        .get(b"Subtype")
                        .ok()
                        .and_then(|st| st.as_name_str().ok())
                        .map(|st| st == "Image"),
                    _ => None,
                })
                .unwrap_or(false);

            if is_image {
                names.insert(name.clone());
            }
        }

        names
    }
}

fn decompressed(stream: &lopdf::Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => {
            // UTF-16BE with BOM is the PDF standard for Unicode strings.
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let utf16: Vec<u16> = bytes[2..]
                    .chunks(2)
                    .filter_map(|c| {
                        if c.len() == 2 {
                            Some(u16::from_be_bytes([c[0], c[1]]))
                        } else {
                            None
                        }
                    })
                    .collect();
                String::from_utf16(&utf16).ok()
            } else {
                String::from_utf8(bytes.clone())
                    .ok()
                    .or_else(|| Some(bytes.iter().map(|&b| b as char).collect()))
            }
        }
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    })
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:")?;

    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_pdf_date() {
        let date = parse_pdf_date("D:20240115103045").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_pdf_date_minimal() {
        let date = parse_pdf_date("D:2024").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 1);
    }

    #[test]
    fn test_parse_pdf_date_rejects_garbage() {
        assert!(parse_pdf_date("20240115").is_none());
        assert!(parse_pdf_date("D:20").is_none());
    }

    #[test]
    fn test_get_string_from_dict_utf16() {
        let mut dict = lopdf::Dictionary::new();
        dict.set(
            b"Title".to_vec(),
            Object::String(
                vec![0xFE, 0xFF, 0x00, b'H', 0x00, b'i'],
                lopdf::StringFormat::Literal,
            ),
        );
        assert_eq!(get_string_from_dict(&dict, b"Title"), Some("Hi".to_string()));
    }

    #[test]
    fn test_get_string_from_dict_missing_key() {
        let dict = lopdf::Dictionary::new();
        assert_eq!(get_string_from_dict(&dict, b"Title"), None);
    }
}
