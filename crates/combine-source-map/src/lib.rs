//! Source map combining for concatenated bundles
//!
//! Bundlers append many files into one output. This crate builds the single
//! source map for that output: each file added to a [`Combiner`] contributes
//! either its own existing map, shifted to where the file lands in the
//! bundle, or a line-by-line identity mapping onto its own text.
//!
//! # Overview
//!
//! The core types are:
//! - [`Combiner`]: Accumulates files in bundle order and serializes the result
//! - [`ExistingMap`]: What a file's `sourceMappingURL` pragma resolves to
//! - [`SourceMapGenerator`]: The append-only combined map underneath
//!
//! Decoding and encoding of the source map format itself is done by the
//! `sourcemap` crate.
//!
//! # Example
//!
//! ```rust
//! use combine_source_map::{FileOptions, Offset};
//!
//! let mut combiner = combine_source_map::create();
//! combiner
//!     .add_file(FileOptions::new("a.js", "var a = 1;\nvar b = 2;"), Offset::default())?
//!     .add_file(FileOptions::new("b.js", "var c = 3;"), Offset::lines(2))?;
//!
//! let comment = combiner.comment()?;
//! assert!(comment.starts_with("//# sourceMappingURL=data:application/json;charset=utf-8;base64,"));
//!
//! // Strip stale pragmas before concatenating
//! let stripped = combine_source_map::remove_comments(&format!("var d;\n{comment}"));
//! assert_eq!(stripped, "var d;\n");
//! # Ok::<(), combine_source_map::CombineError>(())
//! ```

pub mod combiner;
pub mod comment;
pub mod error;
pub mod generator;
pub mod resolve;
pub mod types;

// Re-export main types
pub use combiner::{Combiner, FileOptions, create};
pub use comment::{
    FsMapReader, MapFileReader, map_file_comment, remove_comments, remove_map_file_comments,
};
pub use error::{CombineError, Result};
pub use generator::SourceMapGenerator;
pub use resolve::ExistingMap;
pub use types::{Offset, OriginalPosition, Position, Segment};

// Decoded maps and the combined map are `sourcemap` values
pub use sourcemap::SourceMap;
