//! Rendering extracted pages to output formats.

use std::cmp::Ordering;

use crate::error::Result;
use crate::model::{Block, Marker, PageContent};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormat {
    /// Pretty-printed with indentation
    Pretty,
    /// Compact single-line
    Compact,
}

/// Render pages as marker-annotated text.
///
/// Per page, blocks are sorted by the top edge of their bounding box, then
/// by the left edge — the top-to-bottom, left-to-right reading-order
/// approximation. The sort is deliberately not topology-aware: interleaved
/// multi-column layouts come out in vertical order, and downstream marker
/// consumers depend on that exact behavior.
///
/// Image blocks and blocks that trim to nothing are skipped. Every retained
/// block emits a `!!page,y!!` line followed by its trimmed text; all lines
/// are joined with `\n`. An empty or image-only document renders as an
/// empty string.
pub fn to_marked_text(pages: &[PageContent]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for page in pages {
        let mut blocks: Vec<&Block> = page.blocks.iter().collect();
        blocks.sort_by(|a, b| {
            let y_cmp = a
                .bbox
                .y0
                .partial_cmp(&b.bbox.y0)
                .unwrap_or(Ordering::Equal);
            if y_cmp == Ordering::Equal {
                a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal)
            } else {
                y_cmp
            }
        });

        for block in blocks {
            if !block.is_text() {
                continue;
            }
            let text = block.text.trim();
            if text.is_empty() {
                continue;
            }
            lines.push(Marker::new(page.number, block.bbox.y0).to_string());
            lines.push(text.to_string());
        }
    }

    lines.join("\n")
}

/// Render the page/block model as JSON.
pub fn to_json(pages: &[PageContent], format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(pages),
        JsonFormat::Compact => serde_json::to_string(pages),
    };
    json.map_err(|e| crate::error::Error::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn text_block(x0: f32, y0: f32, text: &str) -> Block {
        Block::text(BBox::new(x0, y0, x0 + 100.0, y0 + 12.0), text)
    }

    fn page_with(blocks: Vec<Block>) -> PageContent {
        let mut page = PageContent::new(1, 612.0, 792.0);
        page.blocks = blocks;
        page
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(to_marked_text(&[]), "");
        assert_eq!(to_marked_text(&[PageContent::new(1, 612.0, 792.0)]), "");
    }

    #[test]
    fn test_marker_truncates_y0() {
        let pages = vec![page_with(vec![text_block(0.0, 12.7, "hello")])];
        assert_eq!(to_marked_text(&pages), "!!1,12!!\nhello");
    }

    #[test]
    fn test_blocks_sorted_by_y0() {
        let pages = vec![page_with(vec![
            text_block(0.0, 50.5, "bottom"),
            text_block(0.0, 10.5, "top"),
            text_block(0.0, 30.5, "middle"),
        ])];
        assert_eq!(
            to_marked_text(&pages),
            "!!1,10!!\ntop\n!!1,30!!\nmiddle\n!!1,50!!\nbottom"
        );
    }

    #[test]
    fn test_equal_y0_tie_breaks_on_x0() {
        let pages = vec![page_with(vec![
            text_block(40.0, 82.4, "right"),
            text_block(5.0, 82.4, "left"),
        ])];
        assert_eq!(to_marked_text(&pages), "!!1,82!!\nleft\n!!1,82!!\nright");
    }

    #[test]
    fn test_image_blocks_are_skipped() {
        let pages = vec![page_with(vec![
            Block::image(BBox::new(0.0, 5.0, 200.0, 105.0)),
            text_block(0.0, 120.2, "caption"),
        ])];
        assert_eq!(to_marked_text(&pages), "!!1,120!!\ncaption");
    }

    #[test]
    fn test_whitespace_only_blocks_are_skipped() {
        let pages = vec![page_with(vec![
            text_block(0.0, 10.5, "   \t  "),
            text_block(0.0, 30.5, "real"),
        ])];
        assert_eq!(to_marked_text(&pages), "!!1,30!!\nreal");
    }

    #[test]
    fn test_block_text_is_trimmed() {
        let pages = vec![page_with(vec![text_block(0.0, 10.5, "  padded  ")])];
        assert_eq!(to_marked_text(&pages), "!!1,10!!\npadded");
    }

    #[test]
    fn test_pages_in_document_order() {
        let mut first = PageContent::new(1, 612.0, 792.0);
        first.blocks.push(text_block(0.0, 700.5, "page one"));
        let mut second = PageContent::new(2, 612.0, 792.0);
        second.blocks.push(text_block(0.0, 20.5, "page two"));

        assert_eq!(
            to_marked_text(&[first, second]),
            "!!1,700!!\npage one\n!!2,20!!\npage two"
        );
    }

    #[test]
    fn test_multi_line_block_keeps_interior_newlines() {
        let pages = vec![page_with(vec![text_block(0.0, 10.5, "first\nsecond")])];
        assert_eq!(to_marked_text(&pages), "!!1,10!!\nfirst\nsecond");
    }

    #[test]
    fn test_to_json_roundtrip() {
        let pages = vec![page_with(vec![text_block(0.0, 10.5, "x")])];
        let json = to_json(&pages, JsonFormat::Compact).unwrap();
        let parsed: Vec<PageContent> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].blocks[0].text, "x");
    }
}
