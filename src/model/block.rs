//! Page and block types.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in top-left-origin page coordinates.
///
/// Units are PDF points (1 point = 1/72 inch). `y0` is the top edge, `y1`
/// the bottom edge, so `y0 <= y1` for any normalized box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Classification of a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// A block of text
    Text,
    /// A placed image
    Image,
}

/// A rectangular content region on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Bounding box in top-left-origin coordinates
    pub bbox: BBox,
    /// Text or image
    pub kind: BlockKind,
    /// Text payload; empty for image blocks
    pub text: String,
}

impl Block {
    /// Create a text block.
    pub fn text(bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            kind: BlockKind::Text,
            text: text.into(),
        }
    }

    /// Create an image block.
    pub fn image(bbox: BBox) -> Self {
        Self {
            bbox,
            kind: BlockKind::Image,
            text: String::new(),
        }
    }

    /// Check if this block is a text block.
    pub fn is_text(&self) -> bool {
        self.kind == BlockKind::Text
    }
}

/// The extracted content of a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed, document order)
    pub number: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Content blocks, in discovery order (callers sort for reading order)
    pub blocks: Vec<Block>,
}

impl PageContent {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Check if the page has no content blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
