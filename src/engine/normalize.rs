//! Line normalization pipeline.
//!
//! Repairs extraction artifacts inside a section's block list: secondary
//! bullet glyphs rewritten to a canonical prefix, lone bullet markers
//! reattached to their text, wrapped lines merged back together, and
//! labels split off sentences they were glued to. Stages run in a fixed
//! order; later stages assume earlier ones already ran. Every guard that
//! fails leaves the blocks untouched.

use super::sections::RawBlock;
use super::text::char_len;
use crate::rules::{ends_with_terminal_punct, HeuristicRules, SUB_BULLET_PREFIX};

/// Lines at or below this length merge with a continuation even when they
/// end in terminal punctuation.
const WRAP_SHORT_CHARS: usize = 18;

/// Minimum remainder length for a label split.
const LABEL_REST_MIN_CHARS: usize = 25;

/// Stage 1: rewrite secondary-bullet lines ("o text", square glyphs) to
/// the canonical indented dash prefix.
pub(crate) fn normalize_sub_bullets(
    blocks: Vec<RawBlock>,
    rules: &HeuristicRules,
) -> (Vec<RawBlock>, u64) {
    let mut count = 0;
    let out = blocks
        .into_iter()
        .map(|blk| {
            if let Some(rest) = rules.sub_bullet_rest(blk.text.trim_start()) {
                let rest = rest.trim();
                if !rest.is_empty() {
                    count += 1;
                    return RawBlock {
                        page: blk.page,
                        text: format!("{SUB_BULLET_PREFIX}{rest}"),
                    };
                }
            }
            blk
        })
        .collect();
    (out, count)
}

/// Stage 2: merge a block that is only a bullet glyph with the next
/// non-empty block on the same page, unless that block starts its own
/// bullet.
pub(crate) fn merge_bullet_markers(
    blocks: Vec<RawBlock>,
    rules: &HeuristicRules,
) -> (Vec<RawBlock>, u64) {
    let mut out: Vec<RawBlock> = Vec::with_capacity(blocks.len());
    let mut merges = 0;
    let mut i = 0;
    while i < blocks.len() {
        let cur = &blocks[i];
        if let Some(prefix) = rules.bullet_only_prefix(cur.text.trim()) {
            let mut merged_here = false;
            let mut j = i + 1;
            while j < blocks.len() {
                let nxt = &blocks[j];
                if nxt.page != cur.page {
                    break;
                }
                let next_text = nxt.text.trim();
                if next_text.is_empty() {
                    j += 1;
                    continue;
                }
                if rules.is_new_bullet(next_text) {
                    break;
                }
                out.push(RawBlock {
                    page: nxt.page,
                    text: format!("{prefix}{next_text}"),
                });
                merges += 1;
                i = j + 1;
                merged_here = true;
                break;
            }
            if merged_here {
                continue;
            }
        }
        out.push(cur.clone());
        i += 1;
    }
    (out, merges)
}

/// Stage 3: merge wrapped lines back into one block.
///
/// A block absorbs its successors on the same page while it stays short
/// or unterminated and the successor reads as a lowercase/connector
/// continuation. Joining dehyphenates a trailing bare hyphen.
pub(crate) fn merge_wrapped_lines(
    blocks: Vec<RawBlock>,
    rules: &HeuristicRules,
) -> (Vec<RawBlock>, u64) {
    let mut out: Vec<RawBlock> = Vec::with_capacity(blocks.len());
    let mut merges = 0;
    let mut i = 0;
    while i < blocks.len() {
        if blocks[i].text.trim().is_empty() {
            i += 1;
            continue;
        }
        let page = blocks[i].page;
        let mut out_text = blocks[i].text.trim_end().to_string();
        let mut j = i;
        while j + 1 < blocks.len() && blocks[j + 1].page == page {
            let next_raw = &blocks[j + 1].text;
            if next_raw.trim().is_empty() {
                j += 1;
                continue;
            }
            if !should_merge_lines(&out_text, next_raw, rules) {
                break;
            }
            out_text = merge_line_text(&out_text, next_raw);
            merges += 1;
            j += 1;
        }
        out.push(RawBlock {
            page,
            text: out_text,
        });
        i = j + 1;
    }
    (out, merges)
}

fn should_merge_lines(text: &str, next_text: &str, rules: &HeuristicRules) -> bool {
    if text.is_empty() || next_text.is_empty() {
        return false;
    }
    if rules.is_new_bullet(next_text) {
        return false;
    }
    let t = text.trim();
    // A label split off by the later stage must stay split: never absorb
    // a continuation that starts with a label marker into a bare label.
    if rules.is_title_case_label(t) && rules.find_label_marker(next_text.trim()) == Some(0) {
        return false;
    }
    let short_line = char_len(t) <= WRAP_SHORT_CHARS;
    if !short_line && ends_with_terminal_punct(t) {
        return false;
    }
    rules.starts_with_lower_or_continuation(next_text.trim_start())
}

fn merge_line_text(text: &str, next_text: &str) -> String {
    let trimmed_start = text.trim_start();
    let lead = &text[..text.len() - trimmed_start.len()];
    let t = trimmed_start.trim_end();
    let n = next_text.trim_start();
    if t.ends_with('-') && !t.ends_with(" -") {
        format!("{lead}{}{n}", &t[..t.len() - 1])
    } else {
        format!("{lead}{t} {n}")
    }
}

/// Stage 4: split a short Title-Case label off a block where a marker
/// phrase glued it to the following sentence.
pub(crate) fn split_labels(blocks: Vec<RawBlock>, rules: &HeuristicRules) -> (Vec<RawBlock>, u64) {
    let mut out: Vec<RawBlock> = Vec::with_capacity(blocks.len());
    let mut count = 0;
    for blk in blocks {
        let text = blk.text.trim();
        if text.is_empty() || rules.is_new_bullet(text) {
            out.push(blk);
            continue;
        }
        let Some(offset) = rules.find_label_marker(text) else {
            out.push(blk);
            continue;
        };
        let label = text[..offset].trim();
        let rest = text[offset..].trim();
        if label.is_empty() || rest.is_empty() {
            out.push(blk);
            continue;
        }
        if label.ends_with([',', ':', ';', '.']) {
            out.push(blk);
            continue;
        }
        if !rules.is_title_case_label(label) {
            out.push(blk);
            continue;
        }
        if char_len(rest) < LABEL_REST_MIN_CHARS || char_len(rest) < char_len(label) + 10 {
            out.push(blk);
            continue;
        }
        out.push(RawBlock {
            page: blk.page,
            text: label.to_string(),
        });
        out.push(RawBlock {
            page: blk.page,
            text: rest.to_string(),
        });
        count += 1;
    }
    (out, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blk(page: u32, text: &str) -> RawBlock {
        RawBlock {
            page,
            text: text.to_string(),
        }
    }

    fn texts(blocks: &[RawBlock]) -> Vec<&str> {
        blocks.iter().map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_sub_bullet_normalization() {
        let rules = HeuristicRules::new();
        let (out, n) = normalize_sub_bullets(
            vec![blk(1, "o point secondaire"), blk(1, "texte ordinaire")],
            &rules,
        );
        assert_eq!(texts(&out), vec!["  - point secondaire", "texte ordinaire"]);
        assert_eq!(n, 1);
    }

    #[test]
    fn test_sub_bullet_square_glyph() {
        let rules = HeuristicRules::new();
        let (out, n) = normalize_sub_bullets(vec![blk(1, "\u{F0A7} cas particulier")], &rules);
        assert_eq!(texts(&out), vec!["  - cas particulier"]);
        assert_eq!(n, 1);
    }

    #[test]
    fn test_bullet_marker_merge() {
        let rules = HeuristicRules::new();
        let (out, n) = merge_bullet_markers(vec![blk(1, "•"), blk(1, "first point")], &rules);
        assert_eq!(texts(&out), vec!["• first point"]);
        assert_eq!(n, 1);
    }

    #[test]
    fn test_bullet_marker_not_merged_across_pages() {
        let rules = HeuristicRules::new();
        let (out, n) = merge_bullet_markers(vec![blk(1, "•"), blk(2, "autre page")], &rules);
        assert_eq!(texts(&out), vec!["•", "autre page"]);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_bullet_marker_not_merged_into_new_bullet() {
        let rules = HeuristicRules::new();
        let (out, n) =
            merge_bullet_markers(vec![blk(1, "•"), blk(1, "• déjà une puce")], &rules);
        assert_eq!(texts(&out), vec!["•", "• déjà une puce"]);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_bullet_marker_skips_blank_blocks() {
        let rules = HeuristicRules::new();
        let (out, n) =
            merge_bullet_markers(vec![blk(1, "-"), blk(1, "  "), blk(1, "texte")], &rules);
        assert_eq!(texts(&out), vec!["- texte"]);
        assert_eq!(n, 1);
    }

    #[test]
    fn test_wrap_merge_lowercase_continuation() {
        let rules = HeuristicRules::new();
        let (out, n) = merge_wrapped_lines(
            vec![
                blk(1, "Les résultats montrent"),
                blk(1, "une hausse significative."),
            ],
            &rules,
        );
        assert_eq!(
            texts(&out),
            vec!["Les résultats montrent une hausse significative."]
        );
        assert_eq!(n, 1);
    }

    #[test]
    fn test_wrap_merge_stops_at_terminated_long_line() {
        let rules = HeuristicRules::new();
        let (out, n) = merge_wrapped_lines(
            vec![
                blk(1, "Une phrase complète qui se termine ici."),
                blk(1, "une autre qui commence en minuscule"),
            ],
            &rules,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_wrap_merge_dehyphenation() {
        let rules = HeuristicRules::new();
        let (out, n) = merge_wrapped_lines(
            vec![blk(1, "Le réchauffe-"), blk(1, "ment climatique")],
            &rules,
        );
        assert_eq!(texts(&out), vec!["Le réchauffement climatique"]);
        assert_eq!(n, 1);
    }

    #[test]
    fn test_wrap_merge_keeps_spaced_hyphen() {
        let rules = HeuristicRules::new();
        let (out, _) = merge_wrapped_lines(vec![blk(1, "Bilan -"), blk(1, "en résumé")], &rules);
        assert_eq!(texts(&out), vec!["Bilan - en résumé"]);
    }

    #[test]
    fn test_wrap_merge_chains_multiple_lines() {
        let rules = HeuristicRules::new();
        let (out, n) = merge_wrapped_lines(
            vec![
                blk(1, "La température moyenne"),
                blk(1, "de la planète augmente"),
                blk(1, "depuis un siècle."),
            ],
            &rules,
        );
        assert_eq!(
            texts(&out),
            vec!["La température moyenne de la planète augmente depuis un siècle."]
        );
        assert_eq!(n, 2);
    }

    #[test]
    fn test_wrap_merge_never_into_bullet() {
        let rules = HeuristicRules::new();
        let (out, n) = merge_wrapped_lines(
            vec![blk(1, "Trois points"), blk(1, "- le premier")],
            &rules,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_wrap_merge_not_across_pages() {
        let rules = HeuristicRules::new();
        let (out, n) = merge_wrapped_lines(
            vec![blk(1, "Les résultats montrent"), blk(2, "une hausse nette.")],
            &rules,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_wrap_merge_never_reabsorbs_split_label() {
        // The output of a label split must be a fixpoint of the pipeline.
        let rules = HeuristicRules::new();
        let (out, n) = merge_wrapped_lines(
            vec![
                blk(1, "Définition"),
                blk(1, "En France, la population urbaine augmente depuis 1950."),
            ],
            &rules,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_label_split() {
        let rules = HeuristicRules::new();
        let (out, n) = split_labels(
            vec![blk(
                2,
                "Définition En France, la population urbaine augmente depuis 1950.",
            )],
            &rules,
        );
        assert_eq!(
            texts(&out),
            vec![
                "Définition",
                "En France, la population urbaine augmente depuis 1950."
            ]
        );
        assert_eq!(n, 1);
        assert_eq!(out[0].page, 2);
    }

    #[test]
    fn test_label_split_requires_title_case_label() {
        let rules = HeuristicRules::new();
        let (out, n) = split_labels(
            vec![blk(1, "la situation En France reste stable sur la décennie.")],
            &rules,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_label_split_requires_long_remainder() {
        let rules = HeuristicRules::new();
        let (out, n) = split_labels(vec![blk(1, "Bilan En France aussi.")], &rules);
        assert_eq!(out.len(), 1);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_label_split_skips_bullets() {
        let rules = HeuristicRules::new();
        let (out, n) = split_labels(
            vec![blk(1, "• Définition En France, la population urbaine augmente.")],
            &rules,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_pipeline_idempotence() {
        // Re-running every stage on its own output performs zero work.
        let rules = HeuristicRules::new();
        let blocks = vec![
            blk(1, "o point secondaire"),
            blk(1, "•"),
            blk(1, "premier point"),
            blk(1, "Les résultats montrent"),
            blk(1, "une hausse significative."),
            blk(2, "Définition En France, la population urbaine augmente depuis 1950."),
        ];
        let (blocks, _) = normalize_sub_bullets(blocks, &rules);
        let (blocks, _) = merge_bullet_markers(blocks, &rules);
        let (blocks, _) = merge_wrapped_lines(blocks, &rules);
        let (blocks, _) = split_labels(blocks, &rules);

        let snapshot = blocks.clone();
        let (blocks, n1) = normalize_sub_bullets(blocks, &rules);
        let (blocks, n2) = merge_bullet_markers(blocks, &rules);
        let (blocks, n3) = merge_wrapped_lines(blocks, &rules);
        let (blocks, n4) = split_labels(blocks, &rules);
        assert_eq!(blocks, snapshot);
        assert_eq!((n1, n2, n3, n4), (0, 0, 0, 0));
    }
}
