//! # docstruct
//!
//! Document structure reconstruction from extracted page text.
//!
//! This library turns the flat line/span output of a page text extractor
//! into a structured outline: titled sections with classified content
//! blocks (paragraphs, bullets, labels, QCM questions), with page
//! boilerplate stripped and wrapped lines repaired.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docstruct::{extract_file, JsonFormat};
//!
//! fn main() -> docstruct::Result<()> {
//!     // Load an extractor page dump and reconstruct its structure
//!     let doc = extract_file("pages.json")?;
//!
//!     for section in &doc.sections {
//!         println!("{} (p. {})", section.title, section.page_start);
//!     }
//!     println!("{}", docstruct::to_json(&doc, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Adaptive thresholds**: Body font size and title threshold derived
//!   per document, never hard-coded
//! - **Boilerplate removal**: Page numbers, repeated headers/footers,
//!   short footer residue
//! - **Line repair**: Bullet glyph normalization, wrap merging with
//!   dehyphenation, label splitting
//! - **QCM handling**: Multiple-choice content detected and separated
//! - **Image bookkeeping**: Deduplicated references with logo flagging,
//!   pixels materialized lazily
//! - **Parallel statistics**: Uses Rayon for the read-only passes

pub mod engine;
pub mod error;
pub mod export;
pub mod json;
pub mod model;
pub mod options;
pub mod rules;

// Re-export commonly used types
pub use engine::{DocumentStats, StructureEngine};
pub use error::{Error, Result};
pub use export::{materialize_rgb, ImageSource, PixelBuffer};
pub use json::{to_json, JsonFormat};
pub use model::{
    BBox, Block, BlockKind, DocumentStructure, ExtractStats, FilterSummary, ImageInfo, RawImage,
    RawLine, RawPage, RawSpan, Section,
};
pub use options::{ExtractOptions, ImageDedup, QcmMode};
pub use rules::HeuristicRules;

use std::io::Read;
use std::path::Path;

/// Reconstruct the structure of already-extracted pages.
///
/// # Example
///
/// ```no_run
/// use docstruct::{extract_pages, ExtractOptions, RawPage};
///
/// let pages: Vec<RawPage> = vec![];
/// let doc = extract_pages(&pages, ExtractOptions::default());
/// println!("Sections: {}", doc.sections.len());
/// ```
pub fn extract_pages(pages: &[RawPage], options: ExtractOptions) -> DocumentStructure {
    StructureEngine::new(options).run(pages)
}

/// Load a JSON page dump from a file and reconstruct its structure.
///
/// # Arguments
///
/// * `path` - Path to a JSON array of pages as produced by the extractor
///
/// # Example
///
/// ```no_run
/// use docstruct::extract_file;
///
/// let doc = extract_file("pages.json").unwrap();
/// println!("Pages: {}", doc.page_count);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<DocumentStructure> {
    extract_file_with_options(path, ExtractOptions::default())
}

/// Load a JSON page dump from a file with custom options.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<DocumentStructure> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    let data = std::fs::read(path)?;
    extract_bytes_with_options(&data, options)
}

/// Reconstruct structure from an in-memory JSON page dump.
pub fn extract_bytes(data: &[u8]) -> Result<DocumentStructure> {
    extract_bytes_with_options(data, ExtractOptions::default())
}

/// Reconstruct structure from an in-memory JSON page dump with custom options.
pub fn extract_bytes_with_options(
    data: &[u8],
    options: ExtractOptions,
) -> Result<DocumentStructure> {
    let pages: Vec<RawPage> = serde_json::from_slice(data)?;
    Ok(extract_pages(&pages, options))
}

/// Reconstruct structure from a JSON page dump reader.
///
/// # Example
///
/// ```no_run
/// use docstruct::extract_reader;
/// use std::fs::File;
///
/// let file = File::open("pages.json").unwrap();
/// let doc = extract_reader(file).unwrap();
/// ```
pub fn extract_reader<R: Read>(reader: R) -> Result<DocumentStructure> {
    extract_reader_with_options(reader, ExtractOptions::default())
}

/// Reconstruct structure from a reader with custom options.
pub fn extract_reader_with_options<R: Read>(
    reader: R,
    options: ExtractOptions,
) -> Result<DocumentStructure> {
    let pages: Vec<RawPage> = serde_json::from_reader(reader)?;
    Ok(extract_pages(&pages, options))
}

/// Builder for configuring and running structure reconstruction.
///
/// # Example
///
/// ```no_run
/// use docstruct::{Docstruct, JsonFormat, QcmMode};
///
/// let json = Docstruct::new()
///     .with_qcm_mode(QcmMode::Ignore)
///     .sequential()
///     .extract_file("pages.json")?
///     .to_json(JsonFormat::Pretty)?;
/// # Ok::<(), docstruct::Error>(())
/// ```
pub struct Docstruct {
    options: ExtractOptions,
    rules: Option<HeuristicRules>,
}

impl Docstruct {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
            rules: None,
        }
    }

    /// Set QCM handling mode.
    pub fn with_qcm_mode(mut self, mode: QcmMode) -> Self {
        self.options = self.options.with_qcm_mode(mode);
        self
    }

    /// Set the image deduplication strategy.
    pub fn with_image_dedup(mut self, mode: ImageDedup) -> Self {
        self.options = self.options.with_image_dedup(mode);
        self
    }

    /// Enable or disable bullet normalization and merging.
    pub fn with_merge_bullets(mut self, enable: bool) -> Self {
        self.options = self.options.with_merge_bullets(enable);
        self
    }

    /// Enable or disable wrap merging and label splitting.
    pub fn with_merge_wrap(mut self, enable: bool) -> Self {
        self.options = self.options.with_merge_wrap(enable);
        self
    }

    /// Replace the default label marker phrases.
    pub fn with_label_markers(mut self, markers: Vec<String>) -> Self {
        let rules = self.rules.take().unwrap_or_default();
        self.rules = Some(rules.with_label_markers(markers));
        self
    }

    /// Replace the full heuristic rule set.
    pub fn with_rules(mut self, rules: HeuristicRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Replace the full options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    fn engine(self) -> StructureEngine {
        let engine = StructureEngine::new(self.options);
        match self.rules {
            Some(rules) => engine.with_rules(rules),
            None => engine,
        }
    }

    /// Run reconstruction over already-extracted pages.
    pub fn extract(self, pages: &[RawPage]) -> DocstructResult {
        DocstructResult {
            structure: self.engine().run(pages),
        }
    }

    /// Load a JSON page dump from a file and run reconstruction.
    pub fn extract_file<P: AsRef<Path>>(self, path: P) -> Result<DocstructResult> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        self.extract_bytes(&data)
    }

    /// Run reconstruction over an in-memory JSON page dump.
    pub fn extract_bytes(self, data: &[u8]) -> Result<DocstructResult> {
        let pages: Vec<RawPage> = serde_json::from_slice(data)?;
        Ok(self.extract(&pages))
    }
}

impl Default for Docstruct {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a reconstruction run.
pub struct DocstructResult {
    /// The reconstructed document structure
    pub structure: DocumentStructure,
}

impl DocstructResult {
    /// Serialize the structure to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        json::to_json(&self.structure, format)
    }

    /// Get the structure.
    pub fn structure(&self) -> &DocumentStructure {
        &self.structure
    }

    /// Take ownership of the structure.
    pub fn into_structure(self) -> DocumentStructure {
        self.structure
    }
}
