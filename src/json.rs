//! JSON serialization of the reconstructed structure.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::DocumentStructure;

/// Output formatting for serialized structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Human-readable, indented output.
    #[default]
    Pretty,
    /// Single-line output.
    Compact,
}

/// Serialize a document structure to JSON.
pub fn to_json(structure: &DocumentStructure, format: JsonFormat) -> Result<String> {
    serialize(structure, format)
}

fn serialize<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let out = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };
    out.map_err(|e| Error::Serialize(e.to_string()))
}
