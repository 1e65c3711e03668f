//! Data model for document structure reconstruction.
//!
//! Input types describe what the external page text extractor hands us;
//! output types are the reconstructed outline the engine produces. Both
//! sides are serde-serializable so extractor dumps can be loaded from disk
//! and results handed to the caller as JSON.

mod image;
mod input;
mod section;
mod structure;

pub use image::{ImageInfo, LOGO_REPEAT_RATIO, SMALL_AREA_THRESHOLD};
pub use input::{BBox, RawImage, RawLine, RawPage, RawSpan};
pub use section::{Block, BlockKind, Section};
pub use structure::{DocumentStructure, ExtractStats, FilterSummary};
