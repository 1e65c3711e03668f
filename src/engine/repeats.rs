//! Repeated header/footer detection.
//!
//! Counts exact line texts occurring in the edge zones across the whole
//! document. Only exact matches are collected; fuzzy merging would risk
//! deleting real content, while exact repetition is a safe boilerplate
//! signal. Page numbers are excluded here because a dedicated drop rule
//! handles them, and title-sized lines are excluded so a chapter heading
//! sitting near an edge is never treated as boilerplate.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use super::font_stats::DocumentStats;
use super::text::{char_len, line_text};
use crate::model::RawPage;
use crate::options::ExtractOptions;
use crate::rules::HeuristicRules;

/// Longest text considered a header/footer candidate.
const MAX_CANDIDATE_CHARS: usize = 120;

/// Exact-text sets of repeated edge lines.
#[derive(Debug, Clone, Default)]
pub struct RepeatSets {
    /// Texts repeated in the header zone
    pub headers: HashSet<String>,
    /// Texts repeated in the footer zone
    pub footers: HashSet<String>,
    /// Occurrence threshold used for this document
    pub threshold: usize,
}

impl RepeatSets {
    /// Check whether a header-zone text is known boilerplate.
    pub fn is_repeated_header(&self, text: &str) -> bool {
        self.headers.contains(text)
    }

    /// Check whether a footer-zone text is known boilerplate.
    pub fn is_repeated_footer(&self, text: &str) -> bool {
        self.footers.contains(text)
    }
}

/// Per-zone occurrence counts, mergeable across page workers.
#[derive(Debug, Default)]
struct ZoneCounts {
    headers: HashMap<String, usize>,
    footers: HashMap<String, usize>,
}

impl ZoneCounts {
    fn merge(mut self, other: ZoneCounts) -> ZoneCounts {
        for (text, n) in other.headers {
            *self.headers.entry(text).or_insert(0) += n;
        }
        for (text, n) in other.footers {
            *self.footers.entry(text).or_insert(0) += n;
        }
        self
    }
}

/// Detect repeated header/footer texts across the document.
pub fn collect_repeats(
    pages: &[RawPage],
    stats: &DocumentStats,
    rules: &HeuristicRules,
    options: &ExtractOptions,
) -> RepeatSets {
    let count_page = |page: &RawPage| count_page_zones(page, stats, rules, options);

    let counts = if options.parallel {
        pages
            .par_iter()
            .map(count_page)
            .reduce(ZoneCounts::default, ZoneCounts::merge)
    } else {
        pages
            .iter()
            .map(count_page)
            .fold(ZoneCounts::default(), ZoneCounts::merge)
    };

    let scaled = (pages.len() as f32 * options.repeat_ratio).ceil() as usize;
    let threshold = options.min_repeat_pages.max(scaled);

    let headers: HashSet<String> = counts
        .headers
        .into_iter()
        .filter(|&(_, n)| n >= threshold)
        .map(|(text, _)| text)
        .collect();
    let footers: HashSet<String> = counts
        .footers
        .into_iter()
        .filter(|&(_, n)| n >= threshold)
        .map(|(text, _)| text)
        .collect();

    log::debug!(
        "repeat detection: threshold={}, headers={}, footers={}",
        threshold,
        headers.len(),
        footers.len()
    );

    RepeatSets {
        headers,
        footers,
        threshold,
    }
}

fn count_page_zones(
    page: &RawPage,
    stats: &DocumentStats,
    rules: &HeuristicRules,
    options: &ExtractOptions,
) -> ZoneCounts {
    let mut counts = ZoneCounts::default();
    let header_limit = options.header_band * page.height;
    let footer_limit = (1.0 - options.footer_band) * page.height;

    for line in &page.lines {
        if line.spans.is_empty() {
            continue;
        }
        let text = line_text(line);
        if text.is_empty() || char_len(&text) > MAX_CANDIDATE_CHARS {
            continue;
        }
        if rules.is_page_number(&text) {
            continue;
        }
        let max_size = line.spans.iter().map(|sp| sp.size).fold(0.0_f32, f32::max);
        if max_size >= stats.title_threshold {
            continue;
        }

        let (y0, y1) = line.y_range();
        if y0 < header_limit {
            *counts.headers.entry(text).or_insert(0) += 1;
        } else if y1 > footer_limit {
            *counts.footers.entry(text).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, RawLine, RawSpan};

    fn stats() -> DocumentStats {
        DocumentStats {
            body_size: 10.0,
            title_threshold: 12.5,
        }
    }

    fn line_at(text: &str, size: f32, y0: f32, y1: f32) -> RawLine {
        RawLine::new(vec![RawSpan::new(text, size, BBox::new(50.0, y0, 200.0, y1))])
    }

    fn doc_with_footer(text: &str, pages_with: usize, pages_total: usize) -> Vec<RawPage> {
        (0..pages_total)
            .map(|i| {
                let mut page = RawPage::new(800.0);
                page.lines.push(line_at("Contenu du cours ordinaire.", 10.0, 300.0, 312.0));
                if i < pages_with {
                    page.lines.push(line_at(text, 9.0, 760.0, 772.0));
                }
                page
            })
            .collect()
    }

    #[test]
    fn test_footer_repeated_on_enough_pages() {
        // 5 of 6 pages, ratio 0.6 -> threshold max(3, ceil(3.6)) = 4.
        let pages = doc_with_footer("Lycée Jean Moulin - SVT", 5, 6);
        let sets = collect_repeats(&pages, &stats(), &HeuristicRules::new(), &ExtractOptions::default());
        assert_eq!(sets.threshold, 4);
        assert!(sets.is_repeated_footer("Lycée Jean Moulin - SVT"));
        assert!(sets.headers.is_empty());
    }

    #[test]
    fn test_footer_below_threshold() {
        let pages = doc_with_footer("Lycée Jean Moulin - SVT", 3, 6);
        let sets = collect_repeats(&pages, &stats(), &HeuristicRules::new(), &ExtractOptions::default());
        assert!(!sets.is_repeated_footer("Lycée Jean Moulin - SVT"));
    }

    #[test]
    fn test_page_numbers_never_counted() {
        let mut pages = doc_with_footer("3 / 12", 6, 6);
        for page in &mut pages {
            page.lines.push(line_at("Page 3", 9.0, 10.0, 22.0));
        }
        let sets = collect_repeats(&pages, &stats(), &HeuristicRules::new(), &ExtractOptions::default());
        assert!(sets.footers.is_empty());
        assert!(sets.headers.is_empty());
    }

    #[test]
    fn test_title_sized_edge_lines_excluded() {
        let pages: Vec<RawPage> = (0..6)
            .map(|_| {
                let mut page = RawPage::new(800.0);
                page.lines.push(line_at("Chapitre Premier", 18.0, 20.0, 40.0));
                page
            })
            .collect();
        let sets = collect_repeats(&pages, &stats(), &HeuristicRules::new(), &ExtractOptions::default());
        assert!(sets.headers.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages = doc_with_footer("Document interne", 8, 10);
        let rules = HeuristicRules::new();
        let seq = collect_repeats(&pages, &stats(), &rules, &ExtractOptions::default().sequential());
        let par = collect_repeats(&pages, &stats(), &rules, &ExtractOptions::default());
        assert_eq!(seq.headers, par.headers);
        assert_eq!(seq.footers, par.footers);
        assert_eq!(seq.threshold, par.threshold);
    }
}
