//! The produced document structure and its bookkeeping records.

use serde::{Deserialize, Serialize};

use super::{ImageInfo, Section};
use crate::options::{ImageDedup, QcmMode};

/// The reconstructed structure of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Total number of pages in the source document
    pub page_count: u32,
    /// Derived body-text font size
    pub body_size: f32,
    /// Minimum font size qualifying a line as a heading candidate
    pub title_threshold: f32,
    /// Counters describing what the heuristics did
    pub stats: ExtractStats,
    /// Effective filter configuration used for this run
    pub filters: FilterSummary,
    /// Ordered sections of the outline
    pub sections: Vec<Section>,
    /// Deduplicated embedded images (metadata only, pixels are lazy)
    pub images: Vec<ImageInfo>,
}

impl DocumentStructure {
    /// Total number of course blocks across all sections.
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum()
    }

    /// Check whether any QCM content was detected.
    pub fn has_qcm(&self) -> bool {
        self.stats.qcm_sections > 0
    }
}

/// Counters reporting every heuristic decision taken during extraction.
///
/// Merge guards that fail are silent no-ops; these counters are the only
/// trace the pipeline leaves of what it changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractStats {
    /// Non-empty lines observed
    pub lines_total: u64,
    /// Lines kept as content blocks
    pub lines_kept: u64,
    /// Lines with no spans or empty normalized text, skipped outright
    pub lines_skipped_empty: u64,
    /// Edge-zone lines dropped as page numbers
    pub lines_dropped_page_number: u64,
    /// Edge-zone lines dropped as repeated headers/footers
    pub lines_dropped_repeated: u64,
    /// Short residual footer lines dropped
    pub lines_dropped_footer_short: u64,
    /// Title-candidate lines seen (including merged continuation lines)
    pub titles_found: u64,
    /// Secondary-bullet lines rewritten to the canonical prefix
    pub sub_bullets_normalized: u64,
    /// Lone bullet markers merged with their following text
    pub bullets_merged: u64,
    /// Wrapped line pairs merged
    pub wraps_merged: u64,
    /// Labels split off a merged block
    pub label_splits: u64,
    /// Sections in which QCM content was detected
    pub qcm_sections: u64,
    /// Blocks moved to `qcm_blocks` lists
    pub qcm_blocks: u64,
    /// Image references seen across all pages
    pub images_total: u64,
    /// Image records after deduplication
    pub images_unique: u64,
    /// Images flagged as repeated logos
    pub logos_flagged: u64,
}

impl ExtractStats {
    /// Lines dropped for any reason.
    pub fn lines_dropped(&self) -> u64 {
        self.lines_dropped_page_number + self.lines_dropped_repeated + self.lines_dropped_footer_short
    }
}

/// Echo of the effective configuration, embedded in the output record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSummary {
    /// Header zone fraction
    pub header_band: f32,
    /// Footer zone fraction
    pub footer_band: f32,
    /// Title length cap in characters
    pub max_title_chars: usize,
    /// Vertical gap within which consecutive title lines merge
    pub title_merge_gap: f32,
    /// Pages sampled for font statistics
    pub sample_pages: usize,
    /// Page-repetition ratio for header/footer detection
    pub repeat_ratio: f32,
    /// Absolute repetition floor
    pub min_repeat_pages: usize,
    /// Computed repetition threshold for this document
    pub repeat_threshold: usize,
    /// Number of distinct repeated header texts found
    pub repeated_headers: usize,
    /// Number of distinct repeated footer texts found
    pub repeated_footers: usize,
    /// Whether bullet normalization/merging ran
    pub merge_bullets: bool,
    /// Whether wrap merging/label splitting ran
    pub merge_wrap: bool,
    /// QCM handling mode
    pub qcm_mode: QcmMode,
    /// Image deduplication strategy
    pub image_dedup: ImageDedup,
}
