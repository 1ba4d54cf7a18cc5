//! Error types for combining source maps.

use thiserror::Error;

use crate::types::{Offset, Position};

/// Errors that can occur while combining source maps.
///
/// Missing or unusable existing maps are not errors; they route a file to
/// freshly generated mappings instead.
#[derive(Debug, Error)]
pub enum CombineError {
    /// A map with inlined source could not be decoded, or the combined map
    /// could not be written
    #[error("Invalid source map: {0}")]
    SourceMap(#[from] sourcemap::Error),

    /// Shifting a position by a file's offset left the addressable range
    #[error("Offset {offset:?} moves position {position:?} out of range")]
    OffsetOverflow { position: Position, offset: Offset },

    /// A file has more lines than a source map can address
    #[error("{source_file} has too many lines for a source map")]
    TooManyLines { source_file: String },
}

/// Result alias for combining operations
pub type Result<T> = std::result::Result<T, CombineError>;
