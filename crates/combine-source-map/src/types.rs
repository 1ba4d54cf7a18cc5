//! Core types for source map combining

use serde::{Deserialize, Serialize};

use crate::error::{CombineError, Result};

/// A position in either generated or original text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (0-indexed)
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Where a file lands inside the concatenated output
///
/// Missing fields default to zero, which leaves positions unshifted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offset {
    pub line: u32,
    pub column: u32,
}

impl Offset {
    pub fn new(line: u32, column: u32) -> Self {
        Offset { line, column }
    }

    /// Offset by whole lines only
    pub fn lines(line: u32) -> Self {
        Offset { line, column: 0 }
    }

    /// Shift a generated position by this offset
    ///
    /// Fails when the shifted position no longer fits a source map.
    pub fn apply(&self, position: Position) -> Result<Position> {
        match (
            position.line.checked_add(self.line),
            position.column.checked_add(self.column),
        ) {
            (Some(line), Some(column)) => Ok(Position { line, column }),
            _ => Err(CombineError::OffsetOverflow {
                position,
                offset: *self,
            }),
        }
    }
}

/// The original side of a mapping segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalPosition {
    /// Index into the combined map's sources
    pub source: u32,
    pub position: Position,
    /// Index into the combined map's names
    pub name: Option<u32>,
}

/// One generated-to-original mapping record
///
/// Segments without an original side only mark a generated position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub generated: Position,
    pub original: Option<OriginalPosition>,
}

impl Segment {
    pub fn generated_only(generated: Position) -> Self {
        Segment {
            generated,
            original: None,
        }
    }

    pub fn mapped(generated: Position, source: u32, original: Position) -> Self {
        Segment {
            generated,
            original: Some(OriginalPosition {
                source,
                position: original,
                name: None,
            }),
        }
    }
}
