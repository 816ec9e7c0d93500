//! Block assembly from positioned text spans.
//!
//! Spans arrive in PDF user space (bottom-up Y, baseline coordinates).
//! Assembly groups them into baseline rows, splits rows at large horizontal
//! gaps, merges vertically adjacent left-aligned segments into blocks, and
//! emits blocks with top-left-origin bounding boxes ready for reading-order
//! sorting.

use std::cmp::Ordering;

use crate::model::{BBox, Block};

use super::content::ImagePlacement;

/// Spans whose baselines differ by less than this fraction of the font size
/// belong to the same row.
const ROW_TOLERANCE_FACTOR: f32 = 0.3;

/// Horizontal gaps wider than this fraction of the font size split a row
/// into separate segments (side-by-side blocks).
const SEGMENT_GAP_FACTOR: f32 = 2.0;

/// Vertical gaps larger than this fraction of the font size end a block.
const BLOCK_GAP_FACTOR: f32 = 1.5;

/// Left-edge shifts beyond this many points end a block.
const INDENT_SHIFT: f32 = 20.0;

/// Approximate ascender height as a fraction of font size.
const ASCENT_FACTOR: f32 = 0.8;

/// Approximate descender depth as a fraction of font size.
const DESCENT_FACTOR: f32 = 0.2;

/// Fallback per-character advance as a fraction of font size.
const CHAR_WIDTH_FACTOR: f32 = 0.5;

/// A positioned run of text in PDF user space.
#[derive(Debug, Clone)]
pub(crate) struct TextSpan {
    /// Decoded text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, bottom-up)
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a span, estimating its advance from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32) -> Self {
        let width = text.chars().count() as f32 * font_size * CHAR_WIDTH_FACTOR;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// Approximate top edge (baseline plus ascender).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * ASCENT_FACTOR
    }

    /// Approximate bottom edge (baseline minus descender).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * DESCENT_FACTOR
    }

    /// Right edge of the estimated advance.
    fn end(&self) -> f32 {
        self.x + self.width
    }
}

/// One row segment: spans sharing a baseline with no large gaps between.
#[derive(Debug)]
struct Segment {
    spans: Vec<TextSpan>,
    x: f32,
    y: f32,
    font_size: f32,
}

impl Segment {
    fn from_spans(spans: Vec<TextSpan>) -> Self {
        let x = spans[0].x;
        let y = spans[0].y;
        // Dominant size, weighted by text length.
        let total: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = if total > 0 {
            weighted / total as f32
        } else {
            spans[0].font_size
        };
        Self {
            spans,
            x,
            y,
            font_size,
        }
    }

    /// Combined text with spaces restored at span boundaries.
    fn text(&self) -> String {
        let mut result = String::new();
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - prev.end();
                let needs_space = gap > span.font_size * 0.15
                    && !prev.text.ends_with(' ')
                    && !span.text.starts_with(' ');
                if needs_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }
        result
    }
}

/// Assemble spans and image placements into blocks with top-down boxes.
pub(crate) fn assemble_blocks(
    spans: Vec<TextSpan>,
    images: Vec<ImagePlacement>,
    page_height: f32,
) -> Vec<Block> {
    let segments = segment_rows(spans);
    let mut blocks = merge_segments(segments, page_height);

    for image in images {
        blocks.push(Block::image(flip_image(&image, page_height)));
    }

    blocks
}

/// Sort spans top-to-bottom, group them into baseline rows, and split each
/// row at large horizontal gaps.
fn segment_rows(mut spans: Vec<TextSpan>) -> Vec<Segment> {
    if spans.is_empty() {
        return vec![];
    }

    // Y descending (PDF Y is bottom-up), then X ascending.
    spans.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal);
        if y_cmp == Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut rows: Vec<Vec<TextSpan>> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * ROW_TOLERANCE_FACTOR;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    rows.push(std::mem::take(&mut current));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }

    let mut segments = Vec::new();
    for mut row in rows {
        row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

        let mut run: Vec<TextSpan> = Vec::new();
        for span in row {
            let split = run.last().is_some_and(|prev: &TextSpan| {
                span.x - prev.end() > span.font_size * SEGMENT_GAP_FACTOR
            });
            if split {
                segments.push(Segment::from_spans(std::mem::take(&mut run)));
            }
            run.push(span);
        }
        if !run.is_empty() {
            segments.push(Segment::from_spans(run));
        }
    }

    segments
}

/// Merge vertically adjacent, left-aligned segments into text blocks.
fn merge_segments(segments: Vec<Segment>, page_height: f32) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Vec<Segment> = Vec::new();

    for segment in segments {
        if let Some(prev) = current.last() {
            if breaks_block(prev, &segment) {
                blocks.push(finish_block(std::mem::take(&mut current), page_height));
            }
        }
        current.push(segment);
    }
    if !current.is_empty() {
        blocks.push(finish_block(current, page_height));
    }

    blocks
}

/// Whether `curr` starts a new block after `prev`.
fn breaks_block(prev: &Segment, curr: &Segment) -> bool {
    let font = prev.font_size.max(curr.font_size);

    // Side-by-side segments on the same baseline are always distinct blocks.
    if (prev.y - curr.y).abs() <= font * ROW_TOLERANCE_FACTOR {
        return true;
    }

    // Paragraph gap.
    if (prev.y - curr.y).abs() > font * BLOCK_GAP_FACTOR {
        return true;
    }

    // Left-margin shift.
    (prev.x - curr.x).abs() > INDENT_SHIFT
}

/// Build a text block from its segments, flipping the box to top-down.
fn finish_block(segments: Vec<Segment>, page_height: f32) -> Block {
    let text = segments
        .iter()
        .map(Segment::text)
        .collect::<Vec<_>>()
        .join("\n");

    let mut x0 = f32::MAX;
    let mut x1 = f32::MIN;
    let mut top = f32::MIN;
    let mut bottom = f32::MAX;
    for span in segments.iter().flat_map(|s| &s.spans) {
        x0 = x0.min(span.x);
        x1 = x1.max(span.end());
        top = top.max(span.top());
        bottom = bottom.min(span.bottom());
    }

    let bbox = BBox::new(x0, page_height - top, x1, page_height - bottom);
    Block::text(bbox, text)
}

/// Normalize an image rectangle and flip it to top-down coordinates.
fn flip_image(image: &ImagePlacement, page_height: f32) -> BBox {
    let x0 = image.x.min(image.x + image.width);
    let x1 = image.x.max(image.x + image.width);
    let y_bottom = image.y.min(image.y + image.height);
    let y_top = image.y.max(image.y + image.height);
    BBox::new(x0, page_height - y_top, x1, page_height - y_bottom)
}
