//! Deduplicated image records.

use serde::{Deserialize, Serialize};

/// Area below which a frequently recurring image is considered a logo.
pub const SMALL_AREA_THRESHOLD: u64 = 200 * 200;

/// Page-repeat ratio at or above which a small image is flagged as a logo.
pub const LOGO_REPEAT_RATIO: f32 = 0.6;

/// A deduplicated embedded image reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Underlying object reference
    pub xref: u64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bits per component
    pub bpc: u8,
    /// Color space name
    pub colorspace: String,
    /// First page the image appears on
    pub page: u32,
    /// All pages the image appears on, ascending
    pub pages: Vec<u32>,
    /// Whether this looks like a recurring page logo
    pub is_repeated_logo: bool,
}

impl ImageInfo {
    /// Pixel area of the image.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Fraction of document pages this image appears on.
    pub fn page_repeat_ratio(&self, total_pages: u32) -> f32 {
        if total_pages == 0 {
            return 0.0;
        }
        self.pages.len() as f32 / total_pages as f32
    }
}
