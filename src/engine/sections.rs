//! Section building: the single ordered pass over document lines.
//!
//! The accumulator is an explicit finite-state machine over the measured
//! line stream. Its state is the open section, the pending title run and
//! the emitted section list; all segmentation decisions (where a section
//! starts, which lines are noise, whether a title continues) happen here
//! and are irreversible. Lines must be pushed in strict document order.

use super::font_stats::DocumentStats;
use super::repeats::RepeatSets;
use super::text::{char_len, has_alpha};
use crate::model::ExtractStats;
use crate::rules::HeuristicRules;

/// Title given to content that precedes the first detected heading.
const UNTITLED: &str = "Sans titre";

/// Minimum character length for a footer-zone line to survive as content.
const FOOTER_SHORT_CHARS: usize = 20;

/// One extractor line reduced to what segmentation needs.
#[derive(Debug, Clone)]
pub struct MeasuredLine {
    /// 1-based page number
    pub page: u32,
    /// Top of the line
    pub y0: f32,
    /// Bottom of the line
    pub y1: f32,
    /// Normalized line text (non-empty)
    pub text: String,
    /// Largest span size in the line
    pub max_size: f32,
    /// Median span size in the line
    pub median_size: f32,
    /// Whether the line sits in the header zone
    pub in_header: bool,
    /// Whether the line sits in the footer zone
    pub in_footer: bool,
}

/// A block before classification: page and text only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawBlock {
    pub page: u32,
    pub text: String,
}

/// A section before its blocks run through the pipeline and classifier.
#[derive(Debug, Clone)]
pub(crate) struct SectionDraft {
    pub title: String,
    pub page_start: u32,
    pub blocks: Vec<RawBlock>,
}

impl SectionDraft {
    fn untitled() -> Self {
        Self {
            title: UNTITLED.to_string(),
            page_start: 1,
            blocks: Vec::new(),
        }
    }
}

/// An in-progress title run: consecutive title-sized lines on one page.
#[derive(Debug, Clone)]
struct PendingTitle {
    text: String,
    page: u32,
    y1: f32,
}

/// Forward-pass accumulator turning measured lines into section drafts.
pub(crate) struct SectionAccumulator<'a> {
    rules: &'a HeuristicRules,
    repeats: &'a RepeatSets,
    doc_stats: DocumentStats,
    max_title_chars: usize,
    title_merge_gap: f32,
    sections: Vec<SectionDraft>,
    current: SectionDraft,
    pending: Option<PendingTitle>,
    stats: ExtractStats,
}

impl<'a> SectionAccumulator<'a> {
    pub fn new(
        rules: &'a HeuristicRules,
        repeats: &'a RepeatSets,
        doc_stats: DocumentStats,
        max_title_chars: usize,
    ) -> Self {
        Self {
            rules,
            repeats,
            doc_stats,
            max_title_chars,
            title_merge_gap: doc_stats.title_merge_gap(),
            sections: Vec::new(),
            current: SectionDraft::untitled(),
            pending: None,
            stats: ExtractStats::default(),
        }
    }

    /// Record a line with no usable text (skipped before segmentation).
    pub fn note_empty_line(&mut self) {
        self.stats.lines_skipped_empty += 1;
    }

    /// Feed the next line in document order.
    pub fn push_line(&mut self, line: MeasuredLine) {
        self.stats.lines_total += 1;

        let edge = line.in_header || line.in_footer;
        if edge && self.rules.is_page_number(&line.text) {
            self.stats.lines_dropped_page_number += 1;
            return;
        }
        if (line.in_header && self.repeats.is_repeated_header(&line.text))
            || (line.in_footer && self.repeats.is_repeated_footer(&line.text))
        {
            self.stats.lines_dropped_repeated += 1;
            return;
        }
        // Residual footer metadata tends to be short; real content is not.
        if line.in_footer && char_len(&line.text) < FOOTER_SHORT_CHARS {
            self.stats.lines_dropped_footer_short += 1;
            return;
        }

        if self.is_title_candidate(&line) {
            self.stats.titles_found += 1;
            if let Some(pending) = &mut self.pending {
                if pending.page == line.page && line.y0 - pending.y1 <= self.title_merge_gap {
                    // Heading wrapped onto another line; fold it in.
                    pending.text.push(' ');
                    pending.text.push_str(&line.text);
                    pending.y1 = line.y1;
                    return;
                }
            }
            self.open_pending_section();
            self.pending = Some(PendingTitle {
                text: line.text,
                page: line.page,
                y1: line.y1,
            });
        } else {
            self.open_pending_section();
            self.current.blocks.push(RawBlock {
                page: line.page,
                text: line.text,
            });
            self.stats.lines_kept += 1;
        }
    }

    /// Flush remaining state and return the drafts with the pass counters.
    ///
    /// A pending title that never attached a body block is dropped here:
    /// it opens a section that ends up with zero blocks, and empty
    /// sections are never emitted.
    pub fn finish(mut self) -> (Vec<SectionDraft>, ExtractStats) {
        self.open_pending_section();
        if !self.current.blocks.is_empty() {
            self.sections.push(self.current);
        }
        log::debug!(
            "section pass: {} sections, {} lines kept of {}",
            self.sections.len(),
            self.stats.lines_kept,
            self.stats.lines_total
        );
        (self.sections, self.stats)
    }

    /// Materialize the pending title into a fresh open section.
    ///
    /// The previously open section is emitted only if it collected blocks;
    /// an empty one (including the initial untitled section) is discarded.
    fn open_pending_section(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !self.current.blocks.is_empty() {
                let done = std::mem::replace(
                    &mut self.current,
                    SectionDraft {
                        title: pending.text,
                        page_start: pending.page,
                        blocks: Vec::new(),
                    },
                );
                self.sections.push(done);
            } else {
                self.current = SectionDraft {
                    title: pending.text,
                    page_start: pending.page,
                    blocks: Vec::new(),
                };
            }
        }
    }

    fn is_title_candidate(&self, line: &MeasuredLine) -> bool {
        let threshold = self.doc_stats.title_threshold;
        if char_len(&line.text) > self.max_title_chars {
            return false;
        }
        if self.rules.is_page_number(&line.text) || !has_alpha(&line.text) {
            return false;
        }
        if line.max_size < threshold {
            return false;
        }
        // A single oversized glyph (drop cap) must not promote an
        // otherwise normal line.
        if line.median_size < threshold * 0.85 && line.max_size - line.median_size > 2.0 {
            return false;
        }
        true
    }
}
