//! The structure reconstruction engine.
//!
//! Orchestrates the passes over extracted page content: font statistics,
//! repeated header/footer detection, the ordered section pass, per-section
//! normalization and classification, and image deduplication. The two
//! statistics passes are read-only over the pages and run before anything
//! else; segmentation consumes their results and is strictly sequential.

mod classify;
mod font_stats;
mod images;
mod normalize;
mod repeats;
mod sections;
pub(crate) mod text;

pub use font_stats::{compute_stats, DocumentStats};
pub use repeats::{collect_repeats, RepeatSets};
pub use sections::MeasuredLine;

use classify::{annotate_blocks, split_qcm_blocks};
use images::dedup_images;
use normalize::{merge_bullet_markers, merge_wrapped_lines, normalize_sub_bullets, split_labels};
use sections::{SectionAccumulator, SectionDraft};
use text::line_text;

use crate::model::{BlockKind, DocumentStructure, ExtractStats, FilterSummary, RawPage, Section};
use crate::options::{ExtractOptions, QcmMode};
use crate::rules::HeuristicRules;

/// Reconstruction engine binding the rule set to one options instance.
///
/// Reusable across documents; a run borrows the pages and leaves the
/// engine untouched.
pub struct StructureEngine {
    rules: HeuristicRules,
    options: ExtractOptions,
}

impl StructureEngine {
    /// Create an engine with the default heuristic rules.
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            rules: HeuristicRules::new(),
            options,
        }
    }

    /// Replace the heuristic rules, e.g. to install custom label markers.
    pub fn with_rules(mut self, rules: HeuristicRules) -> Self {
        self.rules = rules;
        self
    }

    /// Reconstruct the document structure from extracted pages.
    pub fn run(&self, pages: &[RawPage]) -> DocumentStructure {
        let doc_stats = compute_stats(pages, self.options.sample_pages, self.options.parallel);
        let repeats = collect_repeats(pages, &doc_stats, &self.rules, &self.options);

        let build = || self.build_sections(pages, doc_stats, &repeats);
        let images = || dedup_images(pages, self.options.image_dedup);
        let ((drafts, mut stats), (images, img_counters)) = if self.options.parallel {
            rayon::join(build, images)
        } else {
            (build(), images())
        };

        let sections = self.finalize_sections(drafts, &mut stats);
        stats.images_total = img_counters.total;
        stats.images_unique = img_counters.unique;
        stats.logos_flagged = img_counters.logos;

        log::debug!(
            "reconstruction done: {} pages, {} sections, {} images",
            pages.len(),
            sections.len(),
            images.len()
        );

        DocumentStructure {
            page_count: pages.len() as u32,
            body_size: doc_stats.body_size,
            title_threshold: doc_stats.title_threshold,
            filters: self.filter_summary(&doc_stats, &repeats),
            stats,
            sections,
            images,
        }
    }

    /// The ordered segmentation pass over every line of every page.
    fn build_sections(
        &self,
        pages: &[RawPage],
        doc_stats: DocumentStats,
        repeats: &RepeatSets,
    ) -> (Vec<SectionDraft>, ExtractStats) {
        let mut acc = SectionAccumulator::new(
            &self.rules,
            repeats,
            doc_stats,
            self.options.max_title_chars,
        );

        for (idx, page) in pages.iter().enumerate() {
            let page_no = idx as u32 + 1;
            let header_limit = self.options.header_band * page.height;
            let footer_limit = (1.0 - self.options.footer_band) * page.height;

            for line in &page.lines {
                if line.spans.is_empty() {
                    acc.note_empty_line();
                    continue;
                }
                let text = line_text(line);
                if text.is_empty() {
                    acc.note_empty_line();
                    continue;
                }
                let sizes: Vec<f32> = line.spans.iter().map(|sp| sp.size).collect();
                let max_size = sizes.iter().copied().fold(0.0_f32, f32::max);
                let median_size = font_stats::median(&sizes);
                let (y0, y1) = line.y_range();
                acc.push_line(MeasuredLine {
                    page: page_no,
                    y0,
                    y1,
                    text,
                    max_size,
                    median_size,
                    in_header: y0 < header_limit,
                    in_footer: y1 > footer_limit,
                });
            }
        }
        acc.finish()
    }

    /// Per-section postprocessing: QCM split, normalization, classification.
    fn finalize_sections(
        &self,
        drafts: Vec<SectionDraft>,
        stats: &mut ExtractStats,
    ) -> Vec<Section> {
        let mut sections = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let mut blocks = draft.blocks;
            if self.options.merge_bullets {
                let (out, n) = normalize_sub_bullets(blocks, &self.rules);
                stats.sub_bullets_normalized += n;
                let (out, n) = merge_bullet_markers(out, &self.rules);
                stats.bullets_merged += n;
                blocks = out;
            }
            if self.options.merge_wrap {
                let (out, n) = merge_wrapped_lines(blocks, &self.rules);
                stats.wraps_merged += n;
                let (out, n) = split_labels(out, &self.rules);
                stats.label_splits += n;
                blocks = out;
            }

            // QCM detection scans the repaired block list: a wrapped
            // question is one block by now, and a lone bullet glyph has
            // been reattached to the answer-like text that followed it.
            let (course, qcm, qcm_found) =
                split_qcm_blocks(blocks, self.options.qcm_mode, &self.rules);
            if qcm_found {
                stats.qcm_sections += 1;
            }

            let blocks = annotate_blocks(course, &self.rules, None);
            let qcm_blocks = if self.options.qcm_mode == QcmMode::Separate && !qcm.is_empty() {
                stats.qcm_blocks += qcm.len() as u64;
                Some(annotate_blocks(qcm, &self.rules, Some(BlockKind::Qcm)))
            } else {
                None
            };

            if blocks.is_empty() && qcm_blocks.is_none() {
                continue;
            }
            sections.push(Section {
                title: draft.title,
                page_start: draft.page_start,
                blocks,
                qcm_blocks,
            });
        }
        sections
    }

    fn filter_summary(&self, doc_stats: &DocumentStats, repeats: &RepeatSets) -> FilterSummary {
        FilterSummary {
            header_band: self.options.header_band,
            footer_band: self.options.footer_band,
            max_title_chars: self.options.max_title_chars,
            title_merge_gap: doc_stats.title_merge_gap(),
            sample_pages: self.options.sample_pages,
            repeat_ratio: self.options.repeat_ratio,
            min_repeat_pages: self.options.min_repeat_pages,
            repeat_threshold: repeats.threshold,
            repeated_headers: repeats.headers.len(),
            repeated_footers: repeats.footers.len(),
            merge_bullets: self.options.merge_bullets,
            merge_wrap: self.options.merge_wrap,
            qcm_mode: self.options.qcm_mode,
            image_dedup: self.options.image_dedup,
        }
    }
}
