//! Content-stream interpretation.
//!
//! Walks a page's decoded operation list, tracking the text matrix for show
//! operators and the CTM for image placements. Produces positioned text
//! spans and image rectangles in PDF user space (bottom-up Y); coordinate
//! flipping happens later, during block assembly.

use std::collections::{BTreeMap, HashSet};

use lopdf::{Document as LopdfDocument, Object};

use crate::error::{Error, Result};

use super::layout::TextSpan;

/// Kerning adjustments beyond this many text-space milliunits are treated as
/// word spaces when concatenating a TJ array.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// An image drawn on the page, in PDF user space.
///
/// `x`/`y` locate the lower-left corner of the transformed unit square;
/// `width`/`height` are its extents (negative under mirroring transforms).
#[derive(Debug, Clone, Copy)]
pub(crate) struct ImagePlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything the interpreter lifts out of one page's content stream.
#[derive(Debug, Default)]
pub(crate) struct PageStream {
    pub spans: Vec<TextSpan>,
    pub images: Vec<ImagePlacement>,
}

/// Interpret a page content stream.
///
/// `fonts` maps resource font names to their dictionaries (for encoding
/// lookup); `image_xobjects` names the XObjects classified as images.
pub(crate) fn interpret(
    doc: &LopdfDocument,
    content: &[u8],
    fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    image_xobjects: &HashSet<Vec<u8>>,
) -> Result<PageStream> {
    let content = lopdf::content::Content::decode(content)
        .map_err(|e| Error::DocumentParse(e.to_string()))?;

    let mut out = PageStream::default();
    let mut current_font_name: Vec<u8> = Vec::new();
    let mut current_font_size: f32 = 12.0;
    let mut text_matrix = TextMatrix::default();
    let mut in_text_block = false;

    let mut ctm = Matrix::identity();
    let mut ctm_stack: Vec<Matrix> = Vec::new();

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                text_matrix = TextMatrix::default();
            }
            "ET" => {
                in_text_block = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(font_name) = &op.operands[0] {
                        current_font_name = font_name.clone();
                    }
                    current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    text_matrix.translate(tx, ty);
                    if op.operator == "TD" {
                        text_matrix.leading = -ty;
                    }
                }
            }
            "TL" => {
                if let Some(tl) = op.operands.first().and_then(get_number) {
                    text_matrix.leading = tl;
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    text_matrix.set(
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => {
                text_matrix.next_line();
            }
            "Tj" | "TJ" => {
                if in_text_block {
                    let text = if op.operator == "TJ" {
                        if let Some(Object::Array(arr)) = op.operands.first() {
                            decode_tj_array(doc, fonts, &current_font_name, arr)
                        } else {
                            String::new()
                        }
                    } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                        decode_show_text(doc, fonts, &current_font_name, bytes)
                    } else {
                        String::new()
                    };

                    push_span(&mut out.spans, text, &text_matrix, current_font_size);
                }
            }
            "'" | "\"" => {
                text_matrix.next_line();
                if in_text_block {
                    // The " operator carries word/char spacing before the string.
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = decode_show_text(doc, fonts, &current_font_name, bytes);
                        push_span(&mut out.spans, text, &text_matrix, current_font_size);
                    }
                }
            }
            "q" => {
                ctm_stack.push(ctm);
            }
            "Q" => {
                if let Some(saved) = ctm_stack.pop() {
                    ctm = saved;
                }
            }
            "cm" => {
                if op.operands.len() >= 6 {
                    let m = Matrix {
                        a: get_number(&op.operands[0]).unwrap_or(1.0),
                        b: get_number(&op.operands[1]).unwrap_or(0.0),
                        c: get_number(&op.operands[2]).unwrap_or(0.0),
                        d: get_number(&op.operands[3]).unwrap_or(1.0),
                        e: get_number(&op.operands[4]).unwrap_or(0.0),
                        f: get_number(&op.operands[5]).unwrap_or(0.0),
                    };
                    ctm = m.concat(&ctm);
                }
            }
            "Do" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    if image_xobjects.contains(name.as_slice()) {
                        out.images.push(ImagePlacement {
                            x: ctm.e,
                            y: ctm.f,
                            width: ctm.a,
                            height: ctm.d,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    Ok(out)
}

fn push_span(spans: &mut Vec<TextSpan>, text: String, matrix: &TextMatrix, font_size: f32) {
    if text.trim().is_empty() {
        return;
    }
    let (x, y) = matrix.position();
    let effective_size = font_size * matrix.scale();
    spans.push(TextSpan::new(text, x, y, effective_size));
}

/// Decode a single show-text string through the current font's encoding,
/// falling back to byte-level guessing when the font carries none.
fn decode_show_text(
    doc: &LopdfDocument,
    fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    font_name: &[u8],
    bytes: &[u8],
) -> String {
    if let Some(font_dict) = fonts.get(font_name) {
        if let Ok(enc) = font_dict.get_font_encoding(doc) {
            if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                return text;
            }
        }
    }
    decode_text_simple(bytes)
}

/// Concatenate a TJ array, inserting word spaces at large kerning gaps.
fn decode_tj_array(
    doc: &LopdfDocument,
    fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    font_name: &[u8],
    arr: &[Object],
) -> String {
    let mut combined = String::new();

    for item in arr {
        match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode_show_text(doc, fonts, font_name, bytes));
            }
            other => {
                // Negative adjustments advance the pen; large ones are
                // inter-word gaps the font encodes without a space glyph.
                if let Some(n) = get_number(other) {
                    let adjustment = -n;
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                        && !combined.ends_with('\u{00A0}')
                    {
                        combined.push(' ');
                    }
                }
            }
        }
    }

    combined
}

/// Text matrix state across BT/ET, Td/TD/Tm/TL and the line operators.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            // Leading is unset until TL/TD; a body-text default keeps T*
            // streams that never set it from stacking lines.
            leading: 12.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.f -= self.leading * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// A 2D affine transform in PDF's six-number form.
#[derive(Debug, Clone, Copy)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self` applied first, then `other` (the cm concatenation order).
    fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
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
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1 fallback
    bytes.iter().map(|&b| b as char).collect()
}
