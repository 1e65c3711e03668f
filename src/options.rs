//! Extraction options and configuration.

use serde::{Deserialize, Serialize};

/// Options controlling structure reconstruction.
///
/// All thresholds default to the values tuned on French course material;
/// see the individual setters for their effect.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Fraction of page height treated as the header zone.
    pub header_band: f32,

    /// Fraction of page height treated as the footer zone.
    pub footer_band: f32,

    /// Maximum character length for a title candidate.
    pub max_title_chars: usize,

    /// Number of leading pages sampled for font statistics.
    pub sample_pages: usize,

    /// Fraction of pages a header/footer text must appear on to count as repeated.
    pub repeat_ratio: f32,

    /// Absolute floor for the repetition threshold.
    pub min_repeat_pages: usize,

    /// Whether to run sub-bullet normalization and bullet-marker merging.
    pub merge_bullets: bool,

    /// Whether to run line-wrap merging and label splitting.
    pub merge_wrap: bool,

    /// How to handle multiple-choice (QCM) content.
    pub qcm_mode: QcmMode,

    /// Image deduplication strategy.
    pub image_dedup: ImageDedup,

    /// Whether to parallelize the read-only statistics passes.
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header zone as a fraction of page height.
    pub fn with_header_band(mut self, fraction: f32) -> Self {
        self.header_band = fraction;
        self
    }

    /// Set the footer zone as a fraction of page height.
    pub fn with_footer_band(mut self, fraction: f32) -> Self {
        self.footer_band = fraction;
        self
    }

    /// Set the title length cap in characters.
    pub fn with_max_title_chars(mut self, chars: usize) -> Self {
        self.max_title_chars = chars;
        self
    }

    /// Set how many leading pages are sampled for font statistics.
    pub fn with_sample_pages(mut self, pages: usize) -> Self {
        self.sample_pages = pages;
        self
    }

    /// Set the page-repetition ratio for header/footer detection.
    pub fn with_repeat_ratio(mut self, ratio: f32) -> Self {
        self.repeat_ratio = ratio;
        self
    }

    /// Set the absolute repetition floor for header/footer detection.
    pub fn with_min_repeat_pages(mut self, pages: usize) -> Self {
        self.min_repeat_pages = pages;
        self
    }

    /// Enable or disable bullet normalization and merging.
    pub fn with_merge_bullets(mut self, enable: bool) -> Self {
        self.merge_bullets = enable;
        self
    }

    /// Enable or disable line-wrap merging and label splitting.
    pub fn with_merge_wrap(mut self, enable: bool) -> Self {
        self.merge_wrap = enable;
        self
    }

    /// Set QCM handling mode.
    pub fn with_qcm_mode(mut self, mode: QcmMode) -> Self {
        self.qcm_mode = mode;
        self
    }

    /// Set image deduplication strategy.
    pub fn with_image_dedup(mut self, mode: ImageDedup) -> Self {
        self.image_dedup = mode;
        self
    }

    /// Enable or disable parallel statistics passes.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            header_band: 0.10,
            footer_band: 0.12,
            max_title_chars: 90,
            sample_pages: 8,
            repeat_ratio: 0.6,
            min_repeat_pages: 3,
            merge_bullets: true,
            merge_wrap: true,
            qcm_mode: QcmMode::Separate,
            image_dedup: ImageDedup::Xref,
            parallel: true,
        }
    }
}

/// How multiple-choice (QCM) content is handled once detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QcmMode {
    /// Move QCM blocks into the section's `qcm_blocks` list.
    #[default]
    Separate,
    /// Drop QCM blocks entirely.
    Ignore,
    /// Leave QCM blocks inline with course content.
    Include,
}

/// Image deduplication strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDedup {
    /// One record per underlying reference, accumulating the page set.
    #[default]
    Xref,
    /// One record per (reference, page) pair.
    Page,
}
