//! Section and block types.

use serde::{Deserialize, Serialize};

/// Kind of a finalized content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// A short inline title
    Title,
    /// Running body text
    Paragraph,
    /// A bullet item
    Bullet,
    /// A labeled callout ("Définition:", "Bilan")
    Label,
    /// Multiple-choice content (question or answer key)
    Qcm,
}

/// A single content block within a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// 1-based page the block appears on
    pub page: u32,
    /// Block text after the normalization pipeline
    pub text: String,
    /// Classified kind
    pub kind: BlockKind,
    /// Bullet nesting depth; set iff `kind == Bullet`
    pub bullet_level: Option<u32>,
    /// Text with bullet marker and surrounding whitespace stripped
    pub normalized_text: String,
}

impl Block {
    /// Check if this is a bullet block.
    pub fn is_bullet(&self) -> bool {
        self.kind == BlockKind::Bullet
    }

    /// Check if this is QCM content.
    pub fn is_qcm(&self) -> bool {
        self.kind == BlockKind::Qcm
    }
}

/// A titled section of the reconstructed outline.
///
/// A section owns its blocks exclusively and is immutable once the
/// document pass and pipeline complete. Sections with no body blocks are
/// never emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section title ("Sans titre" for content before the first heading)
    pub title: String,
    /// 1-based page where the section starts
    pub page_start: u32,
    /// Course content blocks in document order
    pub blocks: Vec<Block>,
    /// QCM blocks split out of this section (separate mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qcm_blocks: Option<Vec<Block>>,
}

impl Section {
    /// Total number of blocks, course and QCM combined.
    pub fn block_count(&self) -> usize {
        self.blocks.len() + self.qcm_blocks.as_ref().map_or(0, |q| q.len())
    }

    /// Plain text of the section body, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
