//! Font statistics: deriving body size and title threshold.
//!
//! The body size is the mode of 0.5-quantized span sizes over a page
//! sample; the mode favors the dominant body font even when a few large
//! headings are present. A ratio guard falls back to the median when the
//! mode drifts too far from it (mixed-font documents), so a rare bold
//! caption size cannot hijack the baseline.

use std::collections::HashMap;

use rayon::prelude::*;

use super::text::norm_text;
use crate::model::RawPage;

/// Body size used when the sample contains no measurable span sizes.
const FALLBACK_BODY_SIZE: f32 = 12.0;

/// Typed artifact of the first analysis phase.
///
/// Must be fully computed before the classification pass starts; the
/// repeat detector and the section builder consume it read-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentStats {
    /// Dominant font size of running text
    pub body_size: f32,
    /// Minimum font size qualifying a line as a heading candidate
    pub title_threshold: f32,
}

impl DocumentStats {
    /// Vertical gap within which consecutive title lines merge into one heading.
    pub fn title_merge_gap(&self) -> f32 {
        (self.body_size * 0.8).max(4.0)
    }
}

/// Compute document font statistics from the first `sample_pages` pages.
pub fn compute_stats(pages: &[RawPage], sample_pages: usize, parallel: bool) -> DocumentStats {
    let sample = &pages[..sample_pages.min(pages.len())];

    let sizes: Vec<f32> = if parallel {
        sample.par_iter().flat_map_iter(page_sizes).collect()
    } else {
        sample.iter().flat_map(page_sizes).collect()
    };

    let body_size = derive_body_size(&sizes);
    let title_threshold = (body_size + 2.5).max(body_size * 1.18);

    log::debug!(
        "font stats: {} sampled sizes, body={:.2}, title_threshold={:.2}",
        sizes.len(),
        body_size,
        title_threshold
    );

    DocumentStats {
        body_size,
        title_threshold,
    }
}

/// Positive sizes of all non-empty spans on one page.
fn page_sizes(page: &RawPage) -> impl Iterator<Item = f32> + '_ {
    page.lines
        .iter()
        .flat_map(|line| line.spans.iter())
        .filter(|sp| sp.size > 0.0 && !norm_text(&sp.text).is_empty())
        .map(|sp| sp.size)
}

/// Pick the body size from observed span sizes.
fn derive_body_size(sizes: &[f32]) -> f32 {
    if sizes.is_empty() {
        log::warn!("no measurable font sizes, falling back to {FALLBACK_BODY_SIZE}pt");
        return FALLBACK_BODY_SIZE;
    }

    let med = median(sizes);

    // Histogram over half-point buckets; ties resolve toward the smaller size.
    let mut histogram: HashMap<i64, usize> = HashMap::new();
    for &size in sizes {
        *histogram.entry(quantize_key(size)).or_insert(0) += 1;
    }
    let mode = histogram
        .into_iter()
        .max_by_key(|&(key, count)| (count, -key))
        .map(|(key, _)| key as f32 * 0.5)
        .unwrap_or(med);

    // A mode deviating more than 30% from the median signals a mixed-font
    // document; prefer the median then.
    if med > 0.0 && (mode < 0.7 * med || mode > 1.3 * med) {
        med
    } else {
        mode
    }
}

/// Quantize a size to half-point units.
fn quantize_key(size: f32) -> i64 {
    (size * 2.0).round() as i64
}

/// Median of a size sample (average of the middle pair for even counts).
pub(crate) fn median(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut vs = values.to_vec();
    vs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = vs.len() / 2;
    if vs.len() % 2 == 1 {
        vs[mid]
    } else {
        (vs[mid - 1] + vs[mid]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, RawLine, RawSpan};

    fn page_with_sizes(sizes: &[f32]) -> RawPage {
        let bbox = BBox::new(0.0, 100.0, 50.0, 110.0);
        let mut page = RawPage::new(842.0);
        for &s in sizes {
            page.lines
                .push(RawLine::new(vec![RawSpan::new("texte", s, bbox)]));
        }
        page
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[10.0, 10.0, 10.0, 10.0, 14.0]), 10.0);
        assert_eq!(median(&[10.0, 12.0]), 11.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_mode_wins_over_heading_sizes() {
        // Sizes [10,10,10,10,14] -> body 10, threshold 12.5.
        let pages = vec![page_with_sizes(&[10.0, 10.0, 10.0, 10.0, 14.0])];
        let stats = compute_stats(&pages, 8, false);
        assert!((stats.body_size - 10.0).abs() < 1e-6);
        assert!((stats.title_threshold - 12.5).abs() < 1e-6);
    }

    #[test]
    fn test_mode_tie_breaks_toward_smaller() {
        let pages = vec![page_with_sizes(&[10.0, 10.0, 11.0, 11.0])];
        let stats = compute_stats(&pages, 8, false);
        assert!((stats.body_size - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_median_fallback_on_mixed_fonts() {
        // Mode 8.0 (4 hits) deviates more than 30% below the median (12.0).
        let sizes = [8.0, 8.0, 8.0, 8.0, 12.0, 12.0, 12.0, 13.0, 13.0];
        let pages = vec![page_with_sizes(&sizes)];
        let stats = compute_stats(&pages, 8, false);
        assert!((stats.body_size - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_sample_falls_back() {
        let pages = vec![RawPage::new(842.0)];
        let stats = compute_stats(&pages, 8, false);
        assert!((stats.body_size - 12.0).abs() < 1e-6);
        assert!((stats.title_threshold - 14.5).abs() < 1e-6);
    }

    #[test]
    fn test_sample_page_limit() {
        // Pages beyond the sample must not influence the result.
        let pages = vec![page_with_sizes(&[10.0, 10.0]), page_with_sizes(&[30.0; 50])];
        let stats = compute_stats(&pages, 1, false);
        assert!((stats.body_size - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages: Vec<RawPage> = (0..12)
            .map(|i| page_with_sizes(&[10.0, 10.0, 10.0, 14.0 + i as f32]))
            .collect();
        let seq = compute_stats(&pages, 8, false);
        let par = compute_stats(&pages, 8, true);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_title_merge_gap_floor() {
        let stats = DocumentStats {
            body_size: 4.0,
            title_threshold: 6.5,
        };
        assert!((stats.title_merge_gap() - 4.0).abs() < 1e-6);
        let stats = DocumentStats {
            body_size: 10.0,
            title_threshold: 12.5,
        };
        assert!((stats.title_merge_gap() - 8.0).abs() < 1e-6);
    }
}
