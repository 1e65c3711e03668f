//! Final block classification and QCM splitting.

use super::sections::RawBlock;
use crate::model::{Block, BlockKind};
use crate::options::QcmMode;
use crate::rules::HeuristicRules;

/// Parse a bullet prefix: marker kind, nesting level and remaining text.
///
/// `•` bullets are always level 0; dash bullets derive their level from
/// the leading-whitespace depth, two characters per level.
fn parse_bullet(text: &str) -> Option<(u32, String)> {
    let leading = text.chars().take_while(|c| c.is_whitespace()).count();
    let stripped = text.trim_start();
    if let Some(rest) = stripped.strip_prefix('•') {
        return Some((0, rest.trim_start().to_string()));
    }
    for dash in ['-', '–', '—'] {
        if let Some(rest) = stripped.strip_prefix(dash) {
            return Some(((leading / 2) as u32, rest.trim_start().to_string()));
        }
    }
    None
}

/// Classify pipeline output into finalized blocks.
///
/// `kind_override` force-tags every block (used for separated QCM lists).
pub(crate) fn annotate_blocks(
    blocks: Vec<RawBlock>,
    rules: &HeuristicRules,
    kind_override: Option<BlockKind>,
) -> Vec<Block> {
    blocks
        .into_iter()
        .map(|blk| {
            let bullet = parse_bullet(&blk.text);
            let kind = kind_override.unwrap_or_else(|| {
                if rules.is_qcm_line(blk.text.trim()) {
                    BlockKind::Qcm
                } else if bullet.is_some() {
                    BlockKind::Bullet
                } else if rules.is_label_line(&blk.text) {
                    BlockKind::Label
                } else if rules.is_title_line(&blk.text) {
                    BlockKind::Title
                } else {
                    BlockKind::Paragraph
                }
            });
            let (bullet_level, normalized_text) = match (kind, bullet) {
                (BlockKind::Bullet, Some((level, rest))) => (Some(level), rest),
                _ => (None, blk.text.trim().to_string()),
            };
            Block {
                page: blk.page,
                kind,
                bullet_level,
                normalized_text,
                text: blk.text,
            }
        })
        .collect()
}

/// Split a section's blocks at the first QCM line.
///
/// Detection is monotonic: once a question or answer marker is seen,
/// every following block in the section is QCM content. Returns the
/// course blocks, the QCM blocks (separate mode only) and whether QCM
/// content was found at all.
pub(crate) fn split_qcm_blocks(
    blocks: Vec<RawBlock>,
    mode: QcmMode,
    rules: &HeuristicRules,
) -> (Vec<RawBlock>, Vec<RawBlock>, bool) {
    if mode == QcmMode::Include {
        return (blocks, Vec::new(), false);
    }
    let mut course = Vec::new();
    let mut qcm = Vec::new();
    let mut in_qcm = false;
    let mut found = false;
    for blk in blocks {
        if !in_qcm && rules.is_qcm_line(blk.text.trim()) {
            in_qcm = true;
            found = true;
        }
        if in_qcm {
            if mode == QcmMode::Separate {
                qcm.push(blk);
            }
        } else {
            course.push(blk);
        }
    }
    (course, qcm, found)
}
