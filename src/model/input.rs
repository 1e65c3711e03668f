//! Input types: the page text extractor interface.
//!
//! The engine consumes pages already extracted from the source document by
//! an external collaborator, in original reading order. Nothing here does
//! layout reconstruction; positions are only used for edge-zone tests,
//! title merging and line classification.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page coordinates (y grows downward).
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
}

/// A run of text sharing one font size within a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSpan {
    /// The text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Span bounding box
    pub bbox: BBox,
}

impl RawSpan {
    /// Create a new span.
    pub fn new(text: impl Into<String>, size: f32, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            size,
            bbox,
        }
    }
}

/// An ordered sequence of spans at one vertical position on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLine {
    /// Spans in reading order
    pub spans: Vec<RawSpan>,
    /// Line bounding box, when the extractor provides one
    #[serde(default)]
    pub bbox: Option<BBox>,
}

impl RawLine {
    /// Create a line from spans, without an explicit line bbox.
    pub fn new(spans: Vec<RawSpan>) -> Self {
        Self { spans, bbox: None }
    }

    /// Vertical extent of the line: the line bbox when present, else the
    /// envelope of the span bboxes.
    pub fn y_range(&self) -> (f32, f32) {
        if let Some(b) = self.bbox {
            return (b.y0, b.y1);
        }
        let mut y0 = f32::INFINITY;
        let mut y1 = f32::NEG_INFINITY;
        for sp in &self.spans {
            y0 = y0.min(sp.bbox.y0);
            y1 = y1.max(sp.bbox.y1);
        }
        if self.spans.is_empty() {
            (0.0, 0.0)
        } else {
            (y0, y1)
        }
    }
}

/// An embedded image reference on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawImage {
    /// Underlying object reference; identical images share one xref
    pub xref: u64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bits per component
    pub bpc: u8,
    /// Color space name (e.g., "DeviceRGB")
    pub colorspace: String,
}

/// One page of extractor output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    /// Page height in points
    pub height: f32,
    /// Text lines in reading order
    pub lines: Vec<RawLine>,
    /// Embedded image references on this page
    #[serde(default)]
    pub images: Vec<RawImage>,
}

impl RawPage {
    /// Create an empty page with the given height.
    pub fn new(height: f32) -> Self {
        Self {
            height,
            lines: Vec::new(),
            images: Vec::new(),
        }
    }
}
