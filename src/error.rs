//! Error types for the docstruct library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading extractor output.
///
/// Structure reconstruction itself is a pure, best-effort computation:
/// heuristic guards that fail leave blocks untouched and are reported
/// through [`ExtractStats`](crate::ExtractStats), never as errors. The
/// fatal cases are limited to locating and decoding the input.
#[derive(Error, Debug)]
pub enum Error {
    /// The source page dump cannot be located.
    #[error("input not found: {0}")]
    InputNotFound(PathBuf),

    /// I/O error when reading input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The extractor page dump could not be decoded.
    #[error("malformed extractor output: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// Error producing the serialized document structure.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// An image reference could not be resolved by an [`ImageSource`](crate::ImageSource).
    #[error("image not found: xref {0}")]
    ImageNotFound(u64),

    /// Image pixel data is inconsistent with its declared geometry.
    #[error("invalid pixel buffer: {0}")]
    InvalidPixels(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InputNotFound(PathBuf::from("missing.json"));
        assert_eq!(err.to_string(), "input not found: missing.json");

        let err = Error::ImageNotFound(42);
        assert_eq!(err.to_string(), "image not found: xref 42");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::MalformedInput(_)));
    }
}
